//! What-if simulations over budget, keyword match mix and device bids.

use serde::{Deserialize, Serialize};

use crate::calculators::{Classification, MetricResult, Unit};
use crate::catalog::CalculatorId;
use crate::figure::Figure;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub scale_factors: Vec<f64>,
    /// Share of revenue consumed by cost of goods and fulfilment.
    pub cost_ratio: f64,
    pub exact_match_roas: f64,
    pub broad_match_roas: f64,
    pub healthy_match_roas: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            scale_factors: vec![1.0, 1.5, 2.0, 3.0],
            cost_ratio: 0.4,
            exact_match_roas: 4.0,
            broad_match_roas: 2.5,
            healthy_match_roas: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BudgetScalerInput {
    pub daily_budget: f64,
    pub roas: f64,
}

impl Default for BudgetScalerInput {
    fn default() -> Self {
        Self {
            daily_budget: 100.0,
            roas: 3.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScalePoint {
    pub scale: f64,
    pub spend: Figure,
    pub revenue: Figure,
    pub profit: Figure,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetScalerResult {
    pub points: Vec<ScalePoint>,
}

impl BudgetScalerInput {
    pub fn compute(&self, config: &SimulationConfig) -> BudgetScalerResult {
        let points = config
            .scale_factors
            .iter()
            .map(|&scale| {
                let spend = self.daily_budget * scale;
                let revenue = spend * self.roas;
                ScalePoint {
                    scale,
                    spend: Figure::new(spend),
                    revenue: Figure::new(revenue),
                    profit: Figure::new(revenue - spend - revenue * config.cost_ratio),
                }
            })
            .collect();
        BudgetScalerResult { points }
    }
}

impl BudgetScalerResult {
    /// Scale point with the highest applicable profit; earlier points win ties.
    pub fn best(&self) -> Option<&ScalePoint> {
        let mut best: Option<(&ScalePoint, f64)> = None;
        for point in &self.points {
            let Some(profit) = point.profit.value() else {
                continue;
            };
            match best {
                Some((_, current)) if current >= profit => {}
                _ => best = Some((point, profit)),
            }
        }
        best.map(|(point, _)| point)
    }

    pub fn to_metric(&self) -> MetricResult {
        let mut metric = MetricResult::new(CalculatorId::BudgetScaler);
        for point in &self.points {
            metric = metric.figure(
                format!("profit_{}x", point.scale),
                format!("Profit at {}x budget", point.scale),
                Unit::Currency,
                point.profit,
            );
        }
        let subtext = match self.best() {
            Some(point) if point.profit.is_above(0.0) => {
                format!("Most profitable at {}x the current budget", point.scale)
            }
            Some(_) => "Scaling does not turn a profit at the current ROAS".to_string(),
            None => "No applicable scale points".to_string(),
        };
        metric.classified(Classification::Neutral).with_subtext(subtext)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatchTypeInput {
    pub broad_share_pct: f64,
}

impl Default for MatchTypeInput {
    fn default() -> Self {
        Self {
            broad_share_pct: 30.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchTypeResult {
    pub blended_roas: Figure,
    pub healthy: bool,
}

impl MatchTypeInput {
    pub fn compute(&self, config: &SimulationConfig) -> MatchTypeResult {
        let broad_weight = self.broad_share_pct / 100.0;
        let blended = Figure::new(
            broad_weight * config.broad_match_roas + (1.0 - broad_weight) * config.exact_match_roas,
        );
        MatchTypeResult {
            blended_roas: blended,
            healthy: blended.is_above(config.healthy_match_roas),
        }
    }
}

impl MatchTypeResult {
    pub fn to_metric(&self) -> MetricResult {
        MetricResult::new(CalculatorId::MatchType)
            .figure("blended_roas", "Blended ROAS", Unit::Ratio, self.blended_roas)
            .classified(if self.healthy {
                Classification::Good
            } else {
                Classification::Warning
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeviceInput {
    pub base_bid: f64,
    pub mobile_modifier_pct: f64,
    pub mobile_share_pct: f64,
}

impl Default for DeviceInput {
    fn default() -> Self {
        Self {
            base_bid: 2.0,
            mobile_modifier_pct: 20.0,
            mobile_share_pct: 60.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceResult {
    pub mobile_bid: Figure,
    pub weighted_cpc: Figure,
}

impl DeviceInput {
    pub fn compute(&self) -> DeviceResult {
        let mobile_bid = self.base_bid * (1.0 + self.mobile_modifier_pct / 100.0);
        let weighted = (mobile_bid * self.mobile_share_pct
            + self.base_bid * (100.0 - self.mobile_share_pct))
            / 100.0;
        DeviceResult {
            mobile_bid: Figure::new(mobile_bid),
            weighted_cpc: Figure::new(weighted),
        }
    }
}

impl DeviceResult {
    pub fn to_metric(&self) -> MetricResult {
        MetricResult::new(CalculatorId::Device)
            .figure("weighted_cpc", "Weighted CPC", Unit::Currency, self.weighted_cpc)
            .figure("mobile_bid", "Mobile bid", Unit::Currency, self.mobile_bid)
            .classified(Classification::Neutral)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PacerInput {
    pub monthly_budget: f64,
    pub spent: f64,
}

impl Default for PacerInput {
    fn default() -> Self {
        Self {
            monthly_budget: 5_000.0,
            spent: 1_200.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PacerResult {
    pub progress_pct: Figure,
    pub remaining: Figure,
}

impl PacerInput {
    pub fn compute(&self) -> PacerResult {
        PacerResult {
            progress_pct: Figure::ratio(self.spent, self.monthly_budget).map(|ratio| ratio * 100.0),
            remaining: Figure::new(self.monthly_budget - self.spent),
        }
    }
}

impl PacerResult {
    pub fn to_metric(&self) -> MetricResult {
        MetricResult::new(CalculatorId::Pacer)
            .figure("progress_pct", "Budget consumed", Unit::Percent, self.progress_pct)
            .figure("remaining", "Budget remaining", Unit::Currency, self.remaining)
            .classified(Classification::Neutral)
    }
}
