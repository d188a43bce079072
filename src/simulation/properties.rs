//! Plotter property definitions with defaults from plotter.json
//!
//! plotter.json is embedded at compile time and lists every tunable property
//! with its kind and default, so defaults live in ONE place. User overrides
//! come from a flat JSON object (`{"units": "normalized", "figure.dpi": 150}`).

use super::error::{Result, SimulationError};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// plotter.json embedded at compile time
const PLOTTER_JSON: &str = include_str!("../../plotter.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum PropertyKind {
    #[serde(rename = "StringProperty")]
    String,
    #[serde(rename = "EnumeratedProperty")]
    Enumerated,
    #[serde(rename = "NumberProperty")]
    Number,
}

/// Property definition from plotter.json
#[derive(Debug, Clone, Deserialize)]
pub struct PropertyDef {
    pub name: String,
    pub kind: PropertyKind,
    #[serde(rename = "defaultValue", default)]
    pub default_value: String,
    #[serde(default)]
    pub description: String,
    /// For EnumeratedProperty, the valid values
    #[serde(rename = "values")]
    pub valid_values: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct PlotterManifest {
    properties: Vec<PropertyDef>,
}

/// Registry of all plotter properties with their defaults
pub struct PropertyRegistry {
    properties: HashMap<String, PropertyDef>,
}

impl PropertyRegistry {
    /// Parse a manifest with a `properties` array
    pub fn from_json(json: &str) -> Result<Self> {
        let manifest: PlotterManifest = serde_json::from_str(json)
            .map_err(|e| SimulationError::Config(format!("invalid property manifest: {}", e)))?;

        let properties = manifest
            .properties
            .into_iter()
            .map(|p| (p.name.clone(), p))
            .collect();

        Ok(Self { properties })
    }

    /// Get the default value for a property
    pub fn get_default(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(|p| p.default_value.as_str())
    }

    /// Get the property definition
    pub fn get_property(&self, name: &str) -> Option<&PropertyDef> {
        self.properties.get(name)
    }

    /// Check if a value is valid for an enumerated property
    pub fn is_valid_enum_value(&self, name: &str, value: &str) -> bool {
        self.properties
            .get(name)
            .and_then(|p| p.valid_values.as_ref())
            .map(|values| values.iter().any(|v| v.eq_ignore_ascii_case(value)))
            .unwrap_or(true) // Non-enumerated properties accept any value
    }
}

/// Global registry instance (initialized lazily)
static REGISTRY: std::sync::OnceLock<PropertyRegistry> = std::sync::OnceLock::new();

/// Get the global property registry
///
/// plotter.json is compiled in, so a parse failure is a build defect and
/// panics instead of running with empty defaults.
pub fn registry() -> &'static PropertyRegistry {
    REGISTRY.get_or_init(|| {
        PropertyRegistry::from_json(PLOTTER_JSON).expect("plotter.json is invalid")
    })
}

/// Typed property reader
///
/// User values take precedence; everything else falls back to plotter.json.
#[derive(Debug, Clone, Default)]
pub struct PropertyReader {
    user_values: HashMap<String, String>,
}

impl PropertyReader {
    /// Reader with user overrides
    pub fn new(user_values: HashMap<String, String>) -> Self {
        let user_values = user_values
            .into_iter()
            .filter(|(_, v)| !v.is_empty()) // Empty = not set
            .collect();
        Self { user_values }
    }

    /// Reader using only plotter.json defaults
    pub fn defaults() -> Self {
        Self::default()
    }

    /// Parse a flat JSON object of overrides
    ///
    /// Strings, numbers and booleans are accepted; other values are ignored.
    pub fn from_json(json: &str) -> Result<Self> {
        let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)
            .map_err(|e| SimulationError::Config(format!("invalid override file: {}", e)))?;

        let mut user_values = HashMap::new();
        for (key, value) in map {
            let value_str = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                _ => {
                    eprintln!("⚠ Ignoring non-scalar value for property '{}'", key);
                    continue;
                }
            };
            if registry().get_property(&key).is_none() {
                eprintln!("⚠ Unknown property '{}' in override file", key);
            }
            user_values.insert(key, value_str);
        }

        Ok(Self::new(user_values))
    }

    /// Load overrides from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| SimulationError::io(path, e))?;
        Self::from_json(&json)
    }

    /// Get string property (user value or default)
    pub fn get_string(&self, name: &str) -> String {
        if let Some(value) = self.user_values.get(name) {
            eprintln!("DEBUG PropertyReader: '{}' = '{}' (user)", name, value);
            return value.clone();
        }

        registry().get_default(name).unwrap_or("").to_string()
    }

    /// Get enumerated property with validation
    ///
    /// Invalid user values fall back to the default with a warning.
    pub fn get_enum(&self, name: &str) -> String {
        let reg = registry();
        let default = reg.get_default(name).unwrap_or("");

        if let Some(value) = self.user_values.get(name) {
            if reg.is_valid_enum_value(name, value) {
                return value.to_lowercase();
            }
            let valid_values = reg
                .get_property(name)
                .and_then(|p| p.valid_values.as_ref())
                .map(|v| v.join(", "))
                .unwrap_or_default();
            eprintln!(
                "⚠ Invalid value '{}' for property '{}'. Valid values: [{}]. Using default: '{}'",
                value, name, valid_values, default
            );
        }

        default.to_string()
    }

    /// Get f64 property, falling back to the default when unparsable
    pub fn get_f64(&self, name: &str) -> f64 {
        let default = registry()
            .get_default(name)
            .and_then(|s| s.parse::<f64>().ok())
            .unwrap_or(0.0);

        let value = self.get_string(name);
        if value.is_empty() {
            return default;
        }

        match value.parse::<f64>() {
            Ok(v) => v,
            Err(_) => {
                eprintln!(
                    "⚠ Invalid numeric value '{}' for property '{}'. Using default: {}",
                    value, name, default
                );
                default
            }
        }
    }

    /// Get f64 property with range validation
    pub fn get_f64_in_range(&self, name: &str, min: f64, max: f64) -> f64 {
        let value = self.get_f64(name);
        if value >= min && value <= max {
            return value;
        }

        let default = registry()
            .get_default(name)
            .and_then(|s| s.parse::<f64>().ok())
            .unwrap_or(min);
        eprintln!(
            "⚠ Value {} for property '{}' out of range [{}, {}]. Using default: {}",
            value, name, min, max, default
        );
        default
    }

    /// Get a positive integer property (row strides, sizes)
    pub fn get_usize_in_range(&self, name: &str, min: usize, max: usize) -> usize {
        self.get_f64_in_range(name, min as f64, max as f64).round() as usize
    }
}
