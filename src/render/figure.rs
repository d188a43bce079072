//! PDF output
//!
//! Figures are drawn on an in-memory SVG canvas and converted to a single
//! page PDF whose physical size follows the canvas size and DPI.
//!
//! Text survives the conversion only if its font family resolves to an
//! installed face, so the generic families are pointed at faces that exist
//! on this machine and configured family names are checked before use.

use super::RenderResult;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;
use std::sync::{Arc, OnceLock};
use svg2pdf::usvg;
use svg2pdf::usvg::fontdb;

/// System fonts, loaded once per process
static FONT_DB: OnceLock<Arc<fontdb::Database>> = OnceLock::new();

const SERIF_FACES: &[&str] = &[
    "Times New Roman",
    "DejaVu Serif",
    "Liberation Serif",
    "Noto Serif",
    "FreeSerif",
];
const SANS_FACES: &[&str] = &[
    "Arial",
    "Helvetica",
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
    "FreeSans",
];
const MONO_FACES: &[&str] = &[
    "Courier New",
    "DejaVu Sans Mono",
    "Liberation Mono",
    "Noto Sans Mono",
    "FreeMono",
];

/// CSS generic families, mapped in the font database
const GENERIC_FAMILIES: &[&str] = &["serif", "sans-serif", "monospace"];

fn font_database() -> Arc<fontdb::Database> {
    FONT_DB
        .get_or_init(|| {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();
            map_generic_families(&mut db);
            eprintln!("DEBUG: loaded {} font faces", db.len());
            Arc::new(db)
        })
        .clone()
}

fn installed_families(db: &fontdb::Database) -> Vec<String> {
    let mut names: Vec<String> = db
        .faces()
        .flat_map(|face| face.families.iter().map(|(name, _)| name.clone()))
        .collect();
    names.sort();
    names.dedup();
    names
}

/// Point serif, sans-serif and monospace at installed faces
fn map_generic_families(db: &mut fontdb::Database) {
    let installed = installed_families(db);

    if let Some(family) = pick_family(&installed, SERIF_FACES, |n| {
        n.contains("serif") && !n.contains("sans")
    }) {
        eprintln!("DEBUG: serif -> {}", family);
        db.set_serif_family(family);
    }
    if let Some(family) = pick_family(&installed, SANS_FACES, |n| {
        n.contains("sans") && !n.contains("mono")
    }) {
        eprintln!("DEBUG: sans-serif -> {}", family);
        db.set_sans_serif_family(family);
    }
    if let Some(family) = pick_family(&installed, MONO_FACES, |n| n.contains("mono")) {
        eprintln!("DEBUG: monospace -> {}", family);
        db.set_monospace_family(family);
    }
}

/// Choose an installed family
///
/// Preferred names win in order, then the first installed name accepted by
/// `matches` (given in lowercase), then any installed family.
pub fn pick_family(
    installed: &[String],
    preferred: &[&str],
    matches: impl Fn(&str) -> bool,
) -> Option<String> {
    preferred
        .iter()
        .find_map(|want| installed.iter().find(|have| have.eq_ignore_ascii_case(want)))
        .or_else(|| installed.iter().find(|have| matches(&have.to_lowercase())))
        .or_else(|| installed.first())
        .cloned()
}

/// Family name to write into figures for a configured font
///
/// Generic names are kept; other names must be installed, otherwise the
/// figure falls back to serif.
pub fn resolve_font_family(requested: &str) -> String {
    resolve_against(&installed_families(&font_database()), requested)
}

fn resolve_against(installed: &[String], requested: &str) -> String {
    let requested = requested.trim();
    if let Some(generic) = GENERIC_FAMILIES
        .iter()
        .find(|g| g.eq_ignore_ascii_case(requested))
    {
        return generic.to_string();
    }
    if let Some(found) = installed
        .iter()
        .find(|have| have.eq_ignore_ascii_case(requested))
    {
        return found.clone();
    }
    eprintln!(
        "⚠ Font family '{}' is not installed. Using default: 'serif'",
        requested
    );
    "serif".to_string()
}

/// Draw a figure with `draw` on an SVG canvas of `size` pixels
pub fn render_svg<F>(size: (u32, u32), draw: F) -> RenderResult<String>
where
    F: FnOnce(&DrawingArea<SVGBackend<'_>, Shift>) -> RenderResult<()>,
{
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        draw(&root)?;
        root.present()?;
    }
    Ok(svg)
}

/// Convert SVG text to PDF and write it to `path`
///
/// Parent directories are created when missing.
pub fn write_pdf(path: &Path, svg: &str, dpi: f64) -> RenderResult<()> {
    let pdf = svg_to_pdf(svg, dpi)?;
    write_output(path, &pdf)?;
    Ok(())
}

/// Convert SVG text to PDF bytes
pub fn svg_to_pdf(svg: &str, dpi: f64) -> RenderResult<Vec<u8>> {
    let options = usvg::Options {
        fontdb: font_database(),
        ..usvg::Options::default()
    };
    let tree = usvg::Tree::from_str(svg, &options)?;

    let page = svg2pdf::PageOptions {
        dpi: dpi as f32,
        ..Default::default()
    };
    let pdf = svg2pdf::to_pdf(&tree, svg2pdf::ConversionOptions::default(), page)
        .map_err(|e| format!("PDF conversion failed: {:?}", e))?;
    Ok(pdf)
}

/// Write bytes, creating missing parent directories
pub fn write_output(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
            println!("  ... creating {}", parent.display());
        }
    }
    std::fs::write(path, bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::test_support::{contains_bytes, scratch_dir};

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_write_output_creates_parents() {
        let dir = scratch_dir();
        let path = dir.join("simulation_plots").join("small_grid").join("a.pdf");
        write_output(&path, b"%PDF-1.7").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.7");
        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_svg_to_pdf_without_text() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="50">
            <polyline points="0,50 50,10 100,30" fill="none" stroke="black"/>
        </svg>"#;
        let pdf = svg_to_pdf(svg, 100.0).unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }

    #[test]
    fn test_generic_serif_text_embeds_font() {
        let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="50">
            <text x="10" y="30" font-family="serif" font-size="14">Needle 0</text>
        </svg>"#;
        let pdf = svg_to_pdf(svg, 100.0).unwrap();
        assert!(contains_bytes(&pdf, b"/Font"));
    }

    #[test]
    fn test_pick_family_order() {
        let installed = names(&["DejaVu Sans", "DejaVu Sans Mono", "DejaVu Serif"]);
        let serif = pick_family(&installed, SERIF_FACES, |n| {
            n.contains("serif") && !n.contains("sans")
        });
        assert_eq!(serif.as_deref(), Some("DejaVu Serif"));

        // No preferred name: keyword match
        let installed = names(&["Acme Sans", "Acme Serif"]);
        let serif = pick_family(&installed, SERIF_FACES, |n| {
            n.contains("serif") && !n.contains("sans")
        });
        assert_eq!(serif.as_deref(), Some("Acme Serif"));

        // Nothing matches: any installed face
        let installed = names(&["Symbola"]);
        assert_eq!(
            pick_family(&installed, MONO_FACES, |n| n.contains("mono")).as_deref(),
            Some("Symbola")
        );
        assert_eq!(pick_family(&[], SERIF_FACES, |_| true), None);
    }

    #[test]
    fn test_resolve_font_family() {
        let installed = names(&["DejaVu Sans", "DejaVu Serif"]);
        assert_eq!(resolve_against(&installed, "serif"), "serif");
        assert_eq!(resolve_against(&installed, "Sans-Serif"), "sans-serif");
        assert_eq!(resolve_against(&installed, "dejavu sans"), "DejaVu Sans");
        assert_eq!(resolve_against(&installed, "Comic Sans MS"), "serif");
    }
}
