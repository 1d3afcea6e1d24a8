//! Rule-based campaign diagnosis.
//!
//! A [`DiagnosisSnapshot`] is reduced to three percentage gaps, then every
//! rule in [`RULES`] is checked in order. Rules are independent: all that
//! match are returned, in rule order, each pointing at the calculator that
//! helps act on it.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::catalog::{CalculatorId, ModuleId};
use crate::figure::Figure;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosisConfig {
    /// ROAS gap (percent vs target) below which ROAS is flagged.
    pub roas_gap_pct: f64,
    /// CPA gap (percent vs target) above which CPA is flagged.
    pub cpa_gap_pct: f64,
    pub spend_rate_pct: f64,
}

impl Default for DiagnosisConfig {
    fn default() -> Self {
        Self {
            roas_gap_pct: -10.0,
            cpa_gap_pct: 20.0,
            spend_rate_pct: 95.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiagnosisSnapshot {
    pub roas: f64,
    pub target_roas: f64,
    pub cpa: f64,
    pub target_cpa: f64,
    pub budget: f64,
    pub spent: f64,
}

impl Default for DiagnosisSnapshot {
    fn default() -> Self {
        Self {
            roas: 2.0,
            target_roas: 3.0,
            cpa: 45.0,
            target_cpa: 30.0,
            budget: 5_000.0,
            spent: 4_800.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DiagnosisGaps {
    pub roas_gap_pct: Figure,
    pub cpa_gap_pct: Figure,
    pub spend_rate_pct: Figure,
    /// Unguarded quotients used by the rule checks: a zero denominator
    /// yields a signed infinity, and only `0 / 0` yields NaN.
    #[serde(skip)]
    raw: RawGaps,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct RawGaps {
    roas_gap_pct: f64,
    cpa_gap_pct: f64,
    spend_rate_pct: f64,
}

impl DiagnosisSnapshot {
    pub fn gaps(&self) -> DiagnosisGaps {
        let raw = RawGaps {
            roas_gap_pct: (self.roas - self.target_roas) / self.target_roas * 100.0,
            cpa_gap_pct: (self.cpa - self.target_cpa) / self.target_cpa * 100.0,
            spend_rate_pct: self.spent / self.budget * 100.0,
        };
        DiagnosisGaps {
            roas_gap_pct: Figure::new(raw.roas_gap_pct),
            cpa_gap_pct: Figure::new(raw.cpa_gap_pct),
            spend_rate_pct: Figure::new(raw.spend_rate_pct),
            raw,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Opportunity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub title: String,
    pub severity: Severity,
    pub description: String,
    pub action_label: String,
    pub target_module: ModuleId,
    pub target_tab: CalculatorId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    RoasBelowTarget,
    CpaAboveTarget,
    BudgetNearlySpent,
    ReadyToScale,
    AuctionCheck,
}

/// Evaluation order, which is also display priority.
pub const RULES: [Rule; 5] = [
    Rule::RoasBelowTarget,
    Rule::CpaAboveTarget,
    Rule::BudgetNearlySpent,
    Rule::ReadyToScale,
    Rule::AuctionCheck,
];

impl Rule {
    /// NaN gaps compare false everywhere, so an undefined gap never fires.
    pub fn matches(self, gaps: &DiagnosisGaps, config: &DiagnosisConfig) -> bool {
        let raw = &gaps.raw;
        match self {
            Rule::RoasBelowTarget => raw.roas_gap_pct < config.roas_gap_pct,
            Rule::CpaAboveTarget => raw.cpa_gap_pct > config.cpa_gap_pct,
            Rule::BudgetNearlySpent => raw.spend_rate_pct > config.spend_rate_pct,
            Rule::ReadyToScale => raw.roas_gap_pct >= 0.0 && raw.cpa_gap_pct <= 0.0,
            Rule::AuctionCheck => true,
        }
    }

    pub fn target(self) -> CalculatorId {
        match self {
            Rule::RoasBelowTarget => CalculatorId::SearchTerm,
            Rule::CpaAboveTarget => CalculatorId::Daypart,
            Rule::BudgetNearlySpent => CalculatorId::Pacer,
            Rule::ReadyToScale => CalculatorId::Seasonality,
            Rule::AuctionCheck => CalculatorId::Auction,
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            Rule::RoasBelowTarget | Rule::CpaAboveTarget | Rule::BudgetNearlySpent => {
                Severity::Critical
            }
            Rule::ReadyToScale | Rule::AuctionCheck => Severity::Opportunity,
        }
    }

    pub fn recommend(self, gaps: &DiagnosisGaps) -> Recommendation {
        let (title, description, action_label) = match self {
            Rule::RoasBelowTarget => (
                "ROAS below target",
                format!(
                    "Current ROAS is {} below target. Wasted search traffic or inflated PMax reporting is likely.",
                    whole_percent(gaps.raw.roas_gap_pct.abs())
                ),
                "Clean search terms & analyze PMax",
            ),
            Rule::CpaAboveTarget => (
                "CPA too high",
                format!(
                    "CPA is {} over target. Review day-part and geo bid modifiers to cut inefficient traffic.",
                    whole_percent(gaps.raw.cpa_gap_pct)
                ),
                "Adjust day-part / geo bids",
            ),
            Rule::BudgetNearlySpent => (
                "Budget nearly exhausted",
                "Budget is being consumed too fast and may miss the evening peak. Re-plan pacing or raise the budget."
                    .to_string(),
                "Budget simulation & monitoring",
            ),
            Rule::ReadyToScale => (
                "Strong performance, scale up",
                "All metrics are healthy. Test more aggressive bidding or raise the peak-season budget."
                    .to_string(),
                "Peak-season & scale-up simulation",
            ),
            Rule::AuctionCheck => (
                "Routine check: auction dynamics",
                "Want to know what outranking competitors would cost? Simulate the position premium."
                    .to_string(),
                "Auction rank simulation",
            ),
        };
        let target = self.target();
        Recommendation {
            title: title.to_string(),
            severity: self.severity(),
            description,
            action_label: action_label.to_string(),
            target_module: target.module(),
            target_tab: target,
        }
    }
}

/// Rounds half away from zero; a zero target renders as "far".
fn whole_percent(gap: f64) -> String {
    if gap.is_finite() {
        format!("{:.0}%", gap.round())
    } else {
        "far".to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnosis {
    pub gaps: DiagnosisGaps,
    pub recommendations: Vec<Recommendation>,
}

pub fn diagnose(snapshot: &DiagnosisSnapshot, config: &DiagnosisConfig) -> Diagnosis {
    let gaps = snapshot.gaps();
    Diagnosis {
        gaps,
        recommendations: recommendations_for(&gaps, config),
    }
}

pub fn evaluate(snapshot: &DiagnosisSnapshot, config: &DiagnosisConfig) -> Vec<Recommendation> {
    recommendations_for(&snapshot.gaps(), config)
}

fn recommendations_for(gaps: &DiagnosisGaps, config: &DiagnosisConfig) -> Vec<Recommendation> {
    let mut seen: HashSet<CalculatorId> = HashSet::new();
    RULES
        .iter()
        .filter(|rule| rule.matches(gaps, config))
        .filter(|rule| seen.insert(rule.target()))
        .map(|rule| rule.recommend(gaps))
        .collect()
}
