//! Planning calculators: cross-channel budget split, unit economics and
//! peak-season budgeting.

use serde::{Deserialize, Serialize};

use crate::calculators::{percent_of, Classification, MetricResult, Unit};
use crate::catalog::CalculatorId;
use crate::figure::Figure;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    pub google_base_roas: f64,
    pub facebook_base_roas: f64,
    /// Spend at which a channel's ROAS would hit zero before flooring.
    pub saturation_spend: f64,
    pub saturation_exponent: f64,
    pub roas_floor: f64,
    pub balance_tolerance: f64,
    pub healthy_ltv_ratio: f64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            google_base_roas: 6.0,
            facebook_base_roas: 5.0,
            saturation_spend: 50_000.0,
            saturation_exponent: 0.8,
            roas_floor: 0.5,
            balance_tolerance: 0.5,
            healthy_ltv_ratio: 3.0,
        }
    }
}

/// Diminishing-returns ROAS for a channel at the given spend level.
pub fn channel_roas(spend: f64, base_roas: f64, config: &StrategyConfig) -> f64 {
    let saturation = (spend / config.saturation_spend).powf(config.saturation_exponent);
    // f64::max drops a NaN operand, so degenerate spend lands on the floor.
    (base_roas * (1.0 - saturation)).max(config.roas_floor)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MediaMixInput {
    pub budget: f64,
    pub google_share_pct: f64,
}

impl Default for MediaMixInput {
    fn default() -> Self {
        Self {
            budget: 20_000.0,
            google_share_pct: 60.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MixAdvice {
    Balanced,
    ShiftToGoogle,
    ShiftToFacebook,
}

impl MixAdvice {
    pub fn label(self) -> &'static str {
        match self {
            MixAdvice::Balanced => "Allocation is close to optimal; marginal returns are balanced.",
            MixAdvice::ShiftToGoogle => "Google is more efficient; shift budget toward Google.",
            MixAdvice::ShiftToFacebook => "Facebook is more efficient; shift budget toward Facebook.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaMixResult {
    pub google_spend: f64,
    pub facebook_spend: f64,
    pub google_roas: f64,
    pub facebook_roas: f64,
    pub total_revenue: f64,
    pub blended_roas: Figure,
    pub advice: MixAdvice,
}

impl MediaMixInput {
    pub fn compute(&self, config: &StrategyConfig) -> MediaMixResult {
        let google_spend = percent_of(self.budget, self.google_share_pct);
        let facebook_spend = self.budget - google_spend;
        let google_roas = channel_roas(google_spend, config.google_base_roas, config);
        let facebook_roas = channel_roas(facebook_spend, config.facebook_base_roas, config);
        let total_revenue = google_spend * google_roas + facebook_spend * facebook_roas;

        let advice = if (google_roas - facebook_roas).abs() < config.balance_tolerance {
            MixAdvice::Balanced
        } else if google_roas > facebook_roas {
            MixAdvice::ShiftToGoogle
        } else {
            MixAdvice::ShiftToFacebook
        };

        MediaMixResult {
            google_spend,
            facebook_spend,
            google_roas,
            facebook_roas,
            total_revenue,
            blended_roas: Figure::ratio(total_revenue, self.budget),
            advice,
        }
    }
}

impl MediaMixResult {
    pub fn to_metric(&self) -> MetricResult {
        MetricResult::new(CalculatorId::MediaMix)
            .figure("google_spend", "Google spend", Unit::Currency, self.google_spend)
            .figure("google_roas", "Google ROAS", Unit::Ratio, self.google_roas)
            .figure("facebook_spend", "Facebook spend", Unit::Currency, self.facebook_spend)
            .figure("facebook_roas", "Facebook ROAS", Unit::Ratio, self.facebook_roas)
            .figure("total_revenue", "Blended revenue", Unit::Currency, self.total_revenue)
            .figure("blended_roas", "Blended ROAS", Unit::Ratio, self.blended_roas)
            .classified(match self.advice {
                MixAdvice::Balanced => Classification::Good,
                _ => Classification::Warning,
            })
            .with_subtext(self.advice.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LtvInput {
    pub cpa: f64,
    pub ltv: f64,
}

impl Default for LtvInput {
    fn default() -> Self {
        Self {
            cpa: 45.0,
            ltv: 180.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LtvResult {
    pub ratio: Figure,
    pub healthy: bool,
}

impl LtvInput {
    pub fn compute(&self, config: &StrategyConfig) -> LtvResult {
        let ratio = if self.cpa > 0.0 {
            Figure::new(self.ltv / self.cpa)
        } else {
            Figure::NOT_APPLICABLE
        };
        LtvResult {
            ratio,
            healthy: ratio.is_above(config.healthy_ltv_ratio),
        }
    }
}

impl LtvResult {
    pub fn to_metric(&self) -> MetricResult {
        let metric = MetricResult::new(CalculatorId::Ltv).figure(
            "ratio",
            "LTV:CAC ratio",
            Unit::Ratio,
            self.ratio,
        );
        if !self.ratio.is_applicable() {
            return metric
                .classified(Classification::Warning)
                .with_subtext("CPA must be positive to compute the ratio");
        }
        if self.healthy {
            metric
                .classified(Classification::Good)
                .with_subtext("Healthy; room to bid up and scale")
        } else {
            metric
                .classified(Classification::Warning)
                .with_subtext("Loss-making or thin margin; needs optimization")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeasonalityInput {
    pub base_spend: f64,
    pub conversion_uplift_pct: f64,
    pub cpc_increase_pct: f64,
}

impl Default for SeasonalityInput {
    fn default() -> Self {
        Self {
            base_spend: 500.0,
            conversion_uplift_pct: 50.0,
            cpc_increase_pct: 30.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonalityResult {
    pub recommended_spend: Figure,
    pub multiplier: Figure,
}

impl SeasonalityInput {
    pub fn compute(&self) -> SeasonalityResult {
        let recommended = self.base_spend
            * (1.0 + self.conversion_uplift_pct / 100.0)
            * (1.0 + self.cpc_increase_pct / 100.0);
        SeasonalityResult {
            recommended_spend: Figure::new(recommended),
            multiplier: Figure::ratio(recommended, self.base_spend),
        }
    }
}

impl SeasonalityResult {
    pub fn to_metric(&self) -> MetricResult {
        MetricResult::new(CalculatorId::Seasonality)
            .figure(
                "recommended_spend",
                "Recommended peak-day budget",
                Unit::Currency,
                self.recommended_spend,
            )
            .figure("multiplier", "Multiple of base spend", Unit::Multiplier, self.multiplier)
            .classified(Classification::Neutral)
            .with_subtext(match self.multiplier.value() {
                Some(multiplier) => format!("{:.1}x the everyday budget", multiplier),
                None => "Base spend must be non-zero".to_string(),
            })
    }
}
