use serde::{Deserialize, Serialize};

/// Depth classes bounded above (inclusive) by each limit, plus one deep class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthBands {
    pub limits: Vec<f64>,
}

impl Default for DepthBands {
    fn default() -> Self {
        Self {
            limits: vec![35.0, 70.0, 150.0, 300.0, 500.0],
        }
    }
}

impl DepthBands {
    /// Number of classes, always one more than the number of limits.
    pub fn class_count(&self) -> usize {
        self.limits.len() + 1
    }

    pub fn classify(&self, depth: f64) -> usize {
        self.limits
            .iter()
            .position(|&limit| depth <= limit)
            .unwrap_or(self.limits.len())
    }

    /// Legend text for a class, e.g. `35 to 70` or `> 500`.
    pub fn label(&self, class: usize) -> String {
        match (class.checked_sub(1).and_then(|i| self.limits.get(i)), self.limits.get(class)) {
            (None, Some(upper)) => format!("0 to {upper}"),
            (Some(lower), Some(upper)) => format!("{lower} to {upper}"),
            (Some(lower), None) => format!("> {lower}"),
            (None, None) => "all depths".to_string(),
        }
    }
}

/// Linear mapping from magnitude to glyph diameter, in map degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerScale {
    pub min_magnitude: f64,
    pub max_magnitude: f64,
    pub min_size: f64,
    pub max_size: f64,
}

impl Default for MarkerScale {
    fn default() -> Self {
        Self {
            min_magnitude: 5.0,
            max_magnitude: 8.0,
            min_size: 2.0,
            max_size: 5.0,
        }
    }
}

impl MarkerScale {
    fn factor(&self) -> f64 {
        let span = self.max_magnitude - self.min_magnitude;
        if span == 0.0 {
            0.0
        } else {
            (self.max_size - self.min_size) / span
        }
    }

    /// Not clamped: magnitudes above the maximum draw larger than `max_size`.
    pub fn size(&self, magnitude: f64) -> f64 {
        self.min_size + (magnitude - self.min_magnitude) * self.factor()
    }

    pub fn mid_magnitude(&self) -> f64 {
        (self.min_magnitude + self.max_magnitude) / 2.0
    }
}
