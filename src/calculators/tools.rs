use serde::{Deserialize, Serialize};

use crate::calculators::{Classification, MetricResult, Unit};
use crate::catalog::CalculatorId;
use crate::figure::Figure;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Two-sided critical value; 1.96 is the 95% confidence level.
    pub significance_z: f64,
    pub max_quality_score: f64,
    pub lag_decay_pct_per_day: f64,
    pub lag_floor_pct: f64,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            significance_z: 1.96,
            max_quality_score: 10.0,
            lag_decay_pct_per_day: 8.0,
            lag_floor_pct: 30.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CpcFromCpaInput {
    pub target_cpa: f64,
    pub conversion_rate_pct: f64,
}

impl Default for CpcFromCpaInput {
    fn default() -> Self {
        Self {
            target_cpa: 30.0,
            conversion_rate_pct: 2.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CpcFromCpaResult {
    pub max_cpc: Figure,
}

impl CpcFromCpaInput {
    pub fn compute(&self) -> CpcFromCpaResult {
        CpcFromCpaResult {
            max_cpc: Figure::new(self.target_cpa * self.conversion_rate_pct / 100.0),
        }
    }
}

impl CpcFromCpaResult {
    pub fn to_metric(&self) -> MetricResult {
        MetricResult::new(CalculatorId::CpcFromCpa)
            .figure("max_cpc", "Suggested max CPC", Unit::Currency, self.max_cpc)
            .classified(Classification::Neutral)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BreakEvenInput {
    pub margin_pct: f64,
    pub target_profit_pct: f64,
}

impl Default for BreakEvenInput {
    fn default() -> Self {
        Self {
            margin_pct: 40.0,
            target_profit_pct: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakEvenResult {
    pub break_even_roas: Figure,
    pub target_roas: Figure,
}

impl BreakEvenInput {
    pub fn compute(&self) -> BreakEvenResult {
        BreakEvenResult {
            break_even_roas: roas_for_margin(self.margin_pct),
            target_roas: roas_for_margin(self.margin_pct - self.target_profit_pct),
        }
    }
}

/// ROAS at which the given share of revenue exactly covers ad spend.
fn roas_for_margin(margin_pct: f64) -> Figure {
    if margin_pct <= 0.0 {
        return Figure::NOT_APPLICABLE;
    }
    Figure::new(100.0 / margin_pct)
}

impl BreakEvenResult {
    pub fn to_metric(&self) -> MetricResult {
        let metric = MetricResult::new(CalculatorId::BreakEvenRoas)
            .figure("break_even_roas", "Break-even ROAS", Unit::Ratio, self.break_even_roas)
            .figure("target_roas", "Target ROAS", Unit::Ratio, self.target_roas)
            .classified(Classification::Neutral);
        if self.target_roas.is_applicable() {
            metric
        } else {
            metric.with_subtext("Target profit leaves no margin for ad spend")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QualityScoreInput {
    pub cpc: f64,
    pub quality_score: f64,
}

impl Default for QualityScoreInput {
    fn default() -> Self {
        Self {
            cpc: 2.0,
            quality_score: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityScoreResult {
    pub optimized_cpc: Figure,
    pub savings: Figure,
}

impl QualityScoreInput {
    pub fn compute(&self, config: &ToolsConfig) -> QualityScoreResult {
        let optimized = Figure::new(self.cpc * (self.quality_score / config.max_quality_score));
        QualityScoreResult {
            optimized_cpc: optimized,
            savings: optimized.map(|cpc| self.cpc - cpc),
        }
    }
}

impl QualityScoreResult {
    pub fn to_metric(&self) -> MetricResult {
        MetricResult::new(CalculatorId::QualityScore)
            .figure("optimized_cpc", "CPC at top quality score", Unit::Currency, self.optimized_cpc)
            .figure("savings", "Saving per click", Unit::Currency, self.savings)
            .classified(Classification::Good)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AbTestInput {
    pub control_clicks: f64,
    pub control_conversions: f64,
    pub variant_clicks: f64,
    pub variant_conversions: f64,
}

impl Default for AbTestInput {
    fn default() -> Self {
        Self {
            control_clicks: 1_000.0,
            control_conversions: 50.0,
            variant_clicks: 1_000.0,
            variant_conversions: 60.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbTestResult {
    pub control_rate: Figure,
    pub variant_rate: Figure,
    pub relative_lift_pct: Figure,
    pub z_score: Figure,
    pub significant: bool,
}

impl AbTestInput {
    /// Two-proportion z-test with a pooled conversion rate.
    pub fn compute(&self, config: &ToolsConfig) -> AbTestResult {
        let control_rate = self.control_conversions / self.control_clicks;
        let variant_rate = self.variant_conversions / self.variant_clicks;
        let pooled = (self.control_conversions + self.variant_conversions)
            / (self.control_clicks + self.variant_clicks);
        let standard_error = (pooled
            * (1.0 - pooled)
            * (1.0 / self.control_clicks + 1.0 / self.variant_clicks))
            .sqrt();
        let z_score = Figure::new((control_rate - variant_rate).abs() / standard_error);

        AbTestResult {
            control_rate: Figure::new(control_rate),
            variant_rate: Figure::new(variant_rate),
            relative_lift_pct: Figure::ratio(variant_rate - control_rate, control_rate)
                .map(|lift| lift * 100.0),
            z_score,
            significant: z_score.is_above(config.significance_z),
        }
    }
}

impl AbTestResult {
    pub fn to_metric(&self) -> MetricResult {
        let metric = MetricResult::new(CalculatorId::AbTest)
            .figure("z_score", "Z score", Unit::Score, self.z_score)
            .figure("control_rate", "Control conversion rate", Unit::Ratio, self.control_rate)
            .figure("variant_rate", "Variant conversion rate", Unit::Ratio, self.variant_rate)
            .figure("relative_lift_pct", "Relative lift", Unit::Percent, self.relative_lift_pct);
        if self.significant {
            metric
                .classified(Classification::Good)
                .with_subtext("Significant difference")
        } else if self.z_score.is_applicable() {
            metric
                .classified(Classification::Warning)
                .with_subtext("Not significant")
        } else {
            metric
                .classified(Classification::Warning)
                .with_subtext("Inconclusive; not enough clicks or conversions")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LeadCacInput {
    pub cost_per_lead: f64,
    pub close_rate_pct: f64,
}

impl Default for LeadCacInput {
    fn default() -> Self {
        Self {
            cost_per_lead: 20.0,
            close_rate_pct: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadCacResult {
    pub cac: Figure,
}

impl LeadCacInput {
    pub fn compute(&self) -> LeadCacResult {
        LeadCacResult {
            cac: Figure::ratio(self.cost_per_lead, self.close_rate_pct / 100.0),
        }
    }
}

impl LeadCacResult {
    pub fn to_metric(&self) -> MetricResult {
        MetricResult::new(CalculatorId::LeadCac)
            .figure("cac", "Customer acquisition cost", Unit::Currency, self.cac)
            .classified(Classification::Neutral)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AttributionInput {
    pub panel_roas: f64,
    pub lag_days: f64,
}

impl Default for AttributionInput {
    fn default() -> Self {
        Self {
            panel_roas: 2.0,
            lag_days: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributionResult {
    pub reported_share_pct: Figure,
    pub true_roas: Figure,
}

impl AttributionInput {
    pub fn compute(&self, config: &ToolsConfig) -> AttributionResult {
        let reported_pct =
            (100.0 - self.lag_days * config.lag_decay_pct_per_day).max(config.lag_floor_pct);
        AttributionResult {
            reported_share_pct: Figure::new(reported_pct),
            true_roas: Figure::ratio(self.panel_roas, reported_pct / 100.0),
        }
    }
}

impl AttributionResult {
    pub fn to_metric(&self) -> MetricResult {
        MetricResult::new(CalculatorId::Attribution)
            .figure("true_roas", "Estimated true ROAS", Unit::Ratio, self.true_roas)
            .figure(
                "reported_share_pct",
                "Conversions reported so far",
                Unit::Percent,
                self.reported_share_pct,
            )
            .classified(Classification::Good)
    }
}
