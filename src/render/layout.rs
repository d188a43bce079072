//! Grid layout and axis-bound heuristics

/// Near-square grid of panels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub cols: usize,
    pub rows: usize,
    /// Number of panels actually drawn
    pub count: usize,
}

impl GridLayout {
    /// columns = floor(sqrt(count)), rows = ceil(count / columns)
    ///
    /// Returns None for an empty grid.
    pub fn near_square(count: usize) -> Option<Self> {
        if count == 0 {
            return None;
        }
        let cols = integer_sqrt(count);
        let rows = count.div_ceil(cols);
        Some(GridLayout { cols, rows, count })
    }

    /// (row, col) of each panel in row-major order; trailing cells stay empty
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.count).map(move |k| (k / self.cols, k % self.cols))
    }
}

fn integer_sqrt(n: usize) -> usize {
    let mut root = (n as f64).sqrt() as usize;
    while root * root > n {
        root -= 1;
    }
    while (root + 1) * (root + 1) <= n {
        root += 1;
    }
    root
}

/// Upper-bound clamp for series dominated by a few spikes
///
/// When max/mean of a series exceeds `ratio`, the axis is cut at
/// `factor` × mean so that the bulk of the curve stays readable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClampRule {
    pub ratio: f64,
    pub factor: f64,
}

impl Default for ClampRule {
    fn default() -> Self {
        ClampRule {
            ratio: 7.0,
            factor: 5.0,
        }
    }
}

impl ClampRule {
    /// Clamped upper bound, or None to fit the data
    pub fn upper_bound(&self, values: &[f64]) -> Option<f64> {
        let (max, mean) = max_and_mean(values)?;
        if mean > 0.0 && max / mean > self.ratio {
            Some(self.factor * mean)
        } else {
            None
        }
    }

    /// Clamped upper bound for one needle among many
    ///
    /// `reference` is the mean of the maxima of all needles in the figure.
    /// If the usual bound would exceed it, the bound becomes
    /// `reference + mean` so a single spiky needle cannot stretch its panel
    /// far beyond the others.
    pub fn upper_bound_with_reference(&self, values: &[f64], reference: f64) -> Option<f64> {
        let (max, mean) = max_and_mean(values)?;
        if !(mean > 0.0 && max / mean > self.ratio) {
            return None;
        }

        let bound = self.factor * mean;
        if bound > reference {
            Some(reference + mean)
        } else {
            Some(bound)
        }
    }
}

/// Maximum and arithmetic mean of the finite values
pub fn max_and_mean(values: &[f64]) -> Option<(f64, f64)> {
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = finite.iter().sum::<f64>() / finite.len() as f64;
    Some((max, mean))
}

/// Mean of the maxima of several series
pub fn mean_of_maxima<'a>(series: impl IntoIterator<Item = &'a [f64]>) -> Option<f64> {
    let maxima: Vec<f64> = series
        .into_iter()
        .filter_map(|s| max_and_mean(s).map(|(max, _)| max))
        .collect();
    if maxima.is_empty() {
        None
    } else {
        Some(maxima.iter().sum::<f64>() / maxima.len() as f64)
    }
}
