use serde::{Deserialize, Serialize};
use std::fmt;

/// A derived metric value, or "not applicable" when the arithmetic that
/// produced it degenerated (zero denominator, overflow, NaN).
///
/// Serializes as a plain number or `null`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Figure(Option<f64>);

impl Figure {
    pub const NOT_APPLICABLE: Figure = Figure(None);

    pub fn new(value: f64) -> Self {
        if value.is_finite() {
            Figure(Some(value))
        } else {
            Figure(None)
        }
    }

    /// `numerator / denominator`, not applicable when the denominator is zero.
    pub fn ratio(numerator: f64, denominator: f64) -> Self {
        if denominator == 0.0 {
            return Figure::NOT_APPLICABLE;
        }
        Figure::new(numerator / denominator)
    }

    pub fn value(self) -> Option<f64> {
        self.0
    }

    pub fn is_applicable(self) -> bool {
        self.0.is_some()
    }

    pub fn map(self, f: impl FnOnce(f64) -> f64) -> Self {
        match self.0 {
            Some(value) => Figure::new(f(value)),
            None => Figure::NOT_APPLICABLE,
        }
    }

    pub fn unwrap_or(self, default: f64) -> f64 {
        self.0.unwrap_or(default)
    }

    pub fn is_above(self, threshold: f64) -> bool {
        self.0.is_some_and(|value| value > threshold)
    }

    pub fn is_below(self, threshold: f64) -> bool {
        self.0.is_some_and(|value| value < threshold)
    }
}

impl From<f64> for Figure {
    fn from(value: f64) -> Self {
        Figure::new(value)
    }
}

impl fmt::Display for Figure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.0, f.precision()) {
            (Some(value), Some(digits)) => write!(f, "{:.*}", digits, value),
            (Some(value), None) => write!(f, "{}", value),
            (None, _) => f.write_str("N/A"),
        }
    }
}
