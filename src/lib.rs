pub mod calculators;
pub mod catalog;
pub mod config;
pub mod diagnosis;
pub mod error;
pub mod figure;

pub use calculators::{CalculatorRequest, Classification, MetricResult, NamedFigure, Unit};
pub use catalog::{CalculatorId, CalculatorInfo, ModuleId, CATALOG};
pub use config::MetricsConfig;
pub use diagnosis::{diagnose, evaluate, Diagnosis, DiagnosisSnapshot, Recommendation, Severity};
pub use error::MetricsError;
pub use figure::Figure;

/// Runs one calculator with the reference defaults merged under `fields`.
pub fn compute(
    id: CalculatorId,
    fields: serde_json::Value,
    config: &MetricsConfig,
) -> Result<MetricResult, MetricsError> {
    id.run(fields, config)
}

pub fn format_number(value: f64) -> String {
    let rounded = value.round() as i64;
    let mut chars: Vec<char> = rounded.unsigned_abs().to_string().chars().collect();
    let mut result = String::new();
    let mut count = 0usize;

    while let Some(ch) = chars.pop() {
        if count == 3 {
            result.push(',');
            count = 0;
        }
        result.push(ch);
        count += 1;
    }
    if rounded < 0 {
        result.push('-');
    }

    result.chars().rev().collect()
}

pub fn format_currency(figure: Figure) -> String {
    match figure.value() {
        Some(value) if value < 0.0 => format!("-${}", format_number(-value)),
        Some(value) => format!("${}", format_number(value)),
        None => "-".to_string(),
    }
}

/// `value` is already a percentage (45.0 renders as "45.0%").
pub fn format_percent(figure: Figure) -> String {
    match figure.value() {
        Some(value) => format!("{:.1}%", value),
        None => "N/A".to_string(),
    }
}

pub fn format_float(figure: Figure, digits: usize) -> String {
    format!("{:.1$}", figure, digits)
}

pub fn format_figure(figure: Figure, unit: Unit) -> String {
    match unit {
        Unit::Currency => format_currency(figure),
        Unit::Percent => format_percent(figure),
        Unit::Multiplier => match figure.value() {
            Some(value) => format!("{:.2}x", value),
            None => "N/A".to_string(),
        },
        Unit::Ratio | Unit::Score => format_float(figure, 2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_grouped_numbers() {
        assert_eq!(format_number(1_234_567.4), "1,234,567");
        assert_eq!(format_number(-9_876.0), "-9,876");
        assert_eq!(format_number(12.0), "12");
    }

    #[test]
    fn not_applicable_figures_render_placeholders() {
        assert_eq!(format_currency(Figure::NOT_APPLICABLE), "-");
        assert_eq!(format_percent(Figure::NOT_APPLICABLE), "N/A");
        assert_eq!(format_figure(Figure::new(2.5), Unit::Multiplier), "2.50x");
        assert_eq!(format_currency(Figure::new(-1_500.0)), "-$1,500");
    }
}
