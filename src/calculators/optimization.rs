//! Campaign-level optimization calculators.

use serde::{Deserialize, Serialize};

use crate::calculators::{percent_of, signed_percent, Classification, MetricResult, Unit};
use crate::catalog::CalculatorId;
use crate::figure::Figure;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizationConfig {
    pub pmax_healthy_roas: f64,
    /// CPC premium per 100 points of impression-share gap.
    pub auction_premium_factor: f64,
    pub auction_alert_ratio: f64,
    pub geo_tier1_roas: f64,
    pub geo_tier2_roas: f64,
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        Self {
            pmax_healthy_roas: 2.5,
            auction_premium_factor: 1.5,
            auction_alert_ratio: 1.3,
            geo_tier1_roas: 2.8,
            geo_tier2_roas: 1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PmaxInput {
    pub spend: f64,
    pub roas: f64,
    pub brand_roas: f64,
    pub brand_share_pct: f64,
}

impl Default for PmaxInput {
    fn default() -> Self {
        Self {
            spend: 5_000.0,
            roas: 5.0,
            brand_roas: 15.0,
            brand_share_pct: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PmaxResult {
    pub total_revenue: Figure,
    pub brand_spend: Figure,
    pub brand_revenue: Figure,
    pub non_brand_spend: Figure,
    pub non_brand_revenue: Figure,
    pub true_roas: Figure,
    pub healthy: bool,
}

impl PmaxInput {
    pub fn compute(&self, config: &OptimizationConfig) -> PmaxResult {
        let total_revenue = self.spend * self.roas;
        let brand_spend = percent_of(self.spend, self.brand_share_pct);
        let brand_revenue = brand_spend * self.brand_roas;
        let non_brand_spend = self.spend - brand_spend;
        let non_brand_revenue = (total_revenue - brand_revenue).max(0.0);
        let true_roas = if non_brand_spend > 0.0 {
            Figure::new(non_brand_revenue / non_brand_spend)
        } else {
            Figure::new(0.0)
        };

        PmaxResult {
            total_revenue: Figure::new(total_revenue),
            brand_spend: Figure::new(brand_spend),
            brand_revenue: Figure::new(brand_revenue),
            non_brand_spend: Figure::new(non_brand_spend),
            non_brand_revenue: Figure::new(non_brand_revenue),
            true_roas,
            healthy: true_roas.is_above(config.pmax_healthy_roas),
        }
    }
}

impl PmaxResult {
    pub fn to_metric(&self) -> MetricResult {
        let (classification, subtext) = if self.healthy {
            (Classification::Good, "Non-brand traffic is profitable on its own")
        } else {
            (
                Classification::Bad,
                "Reported ROAS is propped up by brand traffic",
            )
        };
        MetricResult::new(CalculatorId::Pmax)
            .figure("true_roas", "True prospecting ROAS", Unit::Ratio, self.true_roas)
            .figure("brand_revenue", "Hidden brand revenue", Unit::Currency, self.brand_revenue)
            .figure("total_revenue", "Reported revenue", Unit::Currency, self.total_revenue)
            .figure("non_brand_spend", "Non-brand spend", Unit::Currency, self.non_brand_spend)
            .figure(
                "non_brand_revenue",
                "Non-brand revenue",
                Unit::Currency,
                self.non_brand_revenue,
            )
            .classified(classification)
            .with_subtext(subtext)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchTermInput {
    pub spend: f64,
    pub roas: f64,
    pub wasted_pct: f64,
}

impl Default for SearchTermInput {
    fn default() -> Self {
        Self {
            spend: 5_000.0,
            roas: 2.5,
            wasted_pct: 15.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchTermResult {
    pub after_roas: Figure,
    pub uplift_pct: Figure,
}

impl SearchTermInput {
    pub fn compute(&self) -> SearchTermResult {
        let revenue = self.spend * self.roas;
        let clean_spend = self.spend * (1.0 - self.wasted_pct / 100.0);
        let after_roas = Figure::ratio(revenue, clean_spend);
        let uplift_pct = after_roas.map(|after| (after - self.roas) / self.roas * 100.0);
        SearchTermResult {
            after_roas,
            uplift_pct,
        }
    }
}

impl SearchTermResult {
    pub fn to_metric(&self) -> MetricResult {
        MetricResult::new(CalculatorId::SearchTerm)
            .figure("after_roas", "ROAS after cleanup", Unit::Ratio, self.after_roas)
            .figure("uplift_pct", "ROAS uplift", Unit::Percent, self.uplift_pct)
            .classified(Classification::Good)
            .with_subtext(format!("Uplift {}", signed_percent(self.uplift_pct)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuctionInput {
    pub cpc: f64,
    pub current_share_pct: f64,
    pub target_share_pct: f64,
}

impl Default for AuctionInput {
    fn default() -> Self {
        Self {
            cpc: 2.5,
            current_share_pct: 20.0,
            target_share_pct: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuctionResult {
    pub required_cpc: Figure,
    pub increase_pct: Figure,
    pub alert: bool,
}

impl AuctionInput {
    pub fn compute(&self, config: &OptimizationConfig) -> AuctionResult {
        let gap = (self.target_share_pct - self.current_share_pct).max(0.0);
        let required = self.cpc * (1.0 + gap / 100.0 * config.auction_premium_factor);
        AuctionResult {
            required_cpc: Figure::new(required),
            increase_pct: Figure::ratio(required - self.cpc, self.cpc).map(|ratio| ratio * 100.0),
            alert: required > self.cpc * config.auction_alert_ratio,
        }
    }
}

impl AuctionResult {
    pub fn to_metric(&self) -> MetricResult {
        MetricResult::new(CalculatorId::Auction)
            .figure("required_cpc", "Required CPC", Unit::Currency, self.required_cpc)
            .figure("increase_pct", "CPC increase", Unit::Percent, self.increase_pct)
            .classified(if self.alert {
                Classification::Bad
            } else {
                Classification::Warning
            })
            .with_subtext(format!("Increase {}", signed_percent(self.increase_pct)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DaypartInput {
    pub target_cpa: f64,
    pub actual_cpa: f64,
}

impl Default for DaypartInput {
    fn default() -> Self {
        Self {
            target_cpa: 30.0,
            actual_cpa: 45.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaypartResult {
    pub modifier_pct: Figure,
}

impl DaypartInput {
    pub fn compute(&self) -> DaypartResult {
        DaypartResult {
            modifier_pct: Figure::ratio(self.target_cpa, self.actual_cpa)
                .map(|ratio| (ratio - 1.0) * 100.0),
        }
    }
}

impl DaypartResult {
    pub fn to_metric(&self) -> MetricResult {
        let metric = MetricResult::new(CalculatorId::Daypart).figure(
            "modifier_pct",
            "Bid adjustment",
            Unit::Percent,
            self.modifier_pct,
        );
        match self.modifier_pct.value() {
            Some(modifier) if modifier < 0.0 => metric
                .classified(Classification::Bad)
                .with_subtext("Cost too high; lower the bid for this time slot"),
            Some(_) => metric
                .classified(Classification::Good)
                .with_subtext("Cost is low; raise the bid for this time slot"),
            None => metric
                .classified(Classification::Neutral)
                .with_subtext("Actual CPA must be non-zero"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeoInput {
    pub tier1_allocation_pct: f64,
}

impl Default for GeoInput {
    fn default() -> Self {
        Self {
            tier1_allocation_pct: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoResult {
    pub blended_roas: Figure,
}

impl GeoInput {
    pub fn compute(&self, config: &OptimizationConfig) -> GeoResult {
        let tier1_weight = self.tier1_allocation_pct / 100.0;
        GeoResult {
            blended_roas: Figure::new(
                tier1_weight * config.geo_tier1_roas + (1.0 - tier1_weight) * config.geo_tier2_roas,
            ),
        }
    }
}

impl GeoResult {
    pub fn to_metric(&self) -> MetricResult {
        MetricResult::new(CalculatorId::Geo)
            .figure("blended_roas", "Blended ROAS", Unit::Ratio, self.blended_roas)
            .classified(Classification::Neutral)
    }
}
