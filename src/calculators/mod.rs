pub mod optimization;
pub mod simulation;
pub mod strategy;
pub mod tools;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::catalog::CalculatorId;
use crate::config::MetricsConfig;
use crate::error::MetricsError;
use crate::figure::Figure;

pub use optimization::{
    AuctionInput, AuctionResult, DaypartInput, DaypartResult, GeoInput, GeoResult,
    OptimizationConfig, PmaxInput, PmaxResult, SearchTermInput, SearchTermResult,
};
pub use simulation::{
    BudgetScalerInput, BudgetScalerResult, DeviceInput, DeviceResult, MatchTypeInput,
    MatchTypeResult, PacerInput, PacerResult, ScalePoint, SimulationConfig,
};
pub use strategy::{
    channel_roas, LtvInput, LtvResult, MediaMixInput, MediaMixResult, MixAdvice,
    SeasonalityInput, SeasonalityResult, StrategyConfig,
};
pub use tools::{
    AbTestInput, AbTestResult, AttributionInput, AttributionResult, BreakEvenInput,
    BreakEvenResult, CpcFromCpaInput, CpcFromCpaResult, LeadCacInput, LeadCacResult,
    QualityScoreInput, QualityScoreResult, ToolsConfig,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Good,
    Warning,
    Bad,
    Neutral,
}

impl Classification {
    pub fn label(self) -> &'static str {
        match self {
            Classification::Good => "good",
            Classification::Warning => "warning",
            Classification::Bad => "bad",
            Classification::Neutral => "neutral",
        }
    }
}

/// How a figure should be rendered; formatting itself is left to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Currency,
    Ratio,
    Percent,
    Multiplier,
    Score,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedFigure {
    pub key: String,
    pub label: String,
    pub unit: Unit,
    pub value: Figure,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricResult {
    pub calculator: CalculatorId,
    pub figures: Vec<NamedFigure>,
    pub classification: Option<Classification>,
    pub subtext: Option<String>,
}

impl MetricResult {
    pub fn new(calculator: CalculatorId) -> Self {
        Self {
            calculator,
            figures: Vec::new(),
            classification: None,
            subtext: None,
        }
    }

    pub fn figure(
        mut self,
        key: impl Into<String>,
        label: impl Into<String>,
        unit: Unit,
        value: impl Into<Figure>,
    ) -> Self {
        self.figures.push(NamedFigure {
            key: key.into(),
            label: label.into(),
            unit,
            value: value.into(),
        });
        self
    }

    pub fn classified(mut self, classification: Classification) -> Self {
        self.classification = Some(classification);
        self
    }

    pub fn with_subtext(mut self, subtext: impl Into<String>) -> Self {
        self.subtext = Some(subtext.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<Figure> {
        self.figures
            .iter()
            .find(|figure| figure.key == key)
            .map(|figure| figure.value)
    }
}

/// One calculator invocation: the calculator id together with its input.
#[derive(Debug, Clone, PartialEq)]
pub enum CalculatorRequest {
    MediaMix(MediaMixInput),
    Ltv(LtvInput),
    Seasonality(SeasonalityInput),
    Pmax(PmaxInput),
    SearchTerm(SearchTermInput),
    Auction(AuctionInput),
    Daypart(DaypartInput),
    Geo(GeoInput),
    BudgetScaler(BudgetScalerInput),
    MatchType(MatchTypeInput),
    Device(DeviceInput),
    Pacer(PacerInput),
    CpcFromCpa(CpcFromCpaInput),
    BreakEvenRoas(BreakEvenInput),
    QualityScore(QualityScoreInput),
    AbTest(AbTestInput),
    LeadCac(LeadCacInput),
    Attribution(AttributionInput),
}

impl CalculatorRequest {
    /// Request carrying the reference defaults for `id`.
    pub fn with_defaults(id: CalculatorId) -> Self {
        match id {
            CalculatorId::MediaMix => CalculatorRequest::MediaMix(Default::default()),
            CalculatorId::Ltv => CalculatorRequest::Ltv(Default::default()),
            CalculatorId::Seasonality => CalculatorRequest::Seasonality(Default::default()),
            CalculatorId::Pmax => CalculatorRequest::Pmax(Default::default()),
            CalculatorId::SearchTerm => CalculatorRequest::SearchTerm(Default::default()),
            CalculatorId::Auction => CalculatorRequest::Auction(Default::default()),
            CalculatorId::Daypart => CalculatorRequest::Daypart(Default::default()),
            CalculatorId::Geo => CalculatorRequest::Geo(Default::default()),
            CalculatorId::BudgetScaler => CalculatorRequest::BudgetScaler(Default::default()),
            CalculatorId::MatchType => CalculatorRequest::MatchType(Default::default()),
            CalculatorId::Device => CalculatorRequest::Device(Default::default()),
            CalculatorId::Pacer => CalculatorRequest::Pacer(Default::default()),
            CalculatorId::CpcFromCpa => CalculatorRequest::CpcFromCpa(Default::default()),
            CalculatorId::BreakEvenRoas => CalculatorRequest::BreakEvenRoas(Default::default()),
            CalculatorId::QualityScore => CalculatorRequest::QualityScore(Default::default()),
            CalculatorId::AbTest => CalculatorRequest::AbTest(Default::default()),
            CalculatorId::LeadCac => CalculatorRequest::LeadCac(Default::default()),
            CalculatorId::Attribution => CalculatorRequest::Attribution(Default::default()),
        }
    }

    /// Builds a request from a JSON object of input fields. Missing fields
    /// keep their defaults, unknown fields are rejected.
    pub fn from_fields(id: CalculatorId, fields: Value) -> Result<Self, MetricsError> {
        let fields = object_or_empty(fields);
        let request = match id {
            CalculatorId::MediaMix => CalculatorRequest::MediaMix(parse_input(id, fields)?),
            CalculatorId::Ltv => CalculatorRequest::Ltv(parse_input(id, fields)?),
            CalculatorId::Seasonality => CalculatorRequest::Seasonality(parse_input(id, fields)?),
            CalculatorId::Pmax => CalculatorRequest::Pmax(parse_input(id, fields)?),
            CalculatorId::SearchTerm => CalculatorRequest::SearchTerm(parse_input(id, fields)?),
            CalculatorId::Auction => CalculatorRequest::Auction(parse_input(id, fields)?),
            CalculatorId::Daypart => CalculatorRequest::Daypart(parse_input(id, fields)?),
            CalculatorId::Geo => CalculatorRequest::Geo(parse_input(id, fields)?),
            CalculatorId::BudgetScaler => {
                CalculatorRequest::BudgetScaler(parse_input(id, fields)?)
            }
            CalculatorId::MatchType => CalculatorRequest::MatchType(parse_input(id, fields)?),
            CalculatorId::Device => CalculatorRequest::Device(parse_input(id, fields)?),
            CalculatorId::Pacer => CalculatorRequest::Pacer(parse_input(id, fields)?),
            CalculatorId::CpcFromCpa => CalculatorRequest::CpcFromCpa(parse_input(id, fields)?),
            CalculatorId::BreakEvenRoas => {
                CalculatorRequest::BreakEvenRoas(parse_input(id, fields)?)
            }
            CalculatorId::QualityScore => {
                CalculatorRequest::QualityScore(parse_input(id, fields)?)
            }
            CalculatorId::AbTest => CalculatorRequest::AbTest(parse_input(id, fields)?),
            CalculatorId::LeadCac => CalculatorRequest::LeadCac(parse_input(id, fields)?),
            CalculatorId::Attribution => CalculatorRequest::Attribution(parse_input(id, fields)?),
        };
        Ok(request)
    }

    pub fn id(&self) -> CalculatorId {
        match self {
            CalculatorRequest::MediaMix(_) => CalculatorId::MediaMix,
            CalculatorRequest::Ltv(_) => CalculatorId::Ltv,
            CalculatorRequest::Seasonality(_) => CalculatorId::Seasonality,
            CalculatorRequest::Pmax(_) => CalculatorId::Pmax,
            CalculatorRequest::SearchTerm(_) => CalculatorId::SearchTerm,
            CalculatorRequest::Auction(_) => CalculatorId::Auction,
            CalculatorRequest::Daypart(_) => CalculatorId::Daypart,
            CalculatorRequest::Geo(_) => CalculatorId::Geo,
            CalculatorRequest::BudgetScaler(_) => CalculatorId::BudgetScaler,
            CalculatorRequest::MatchType(_) => CalculatorId::MatchType,
            CalculatorRequest::Device(_) => CalculatorId::Device,
            CalculatorRequest::Pacer(_) => CalculatorId::Pacer,
            CalculatorRequest::CpcFromCpa(_) => CalculatorId::CpcFromCpa,
            CalculatorRequest::BreakEvenRoas(_) => CalculatorId::BreakEvenRoas,
            CalculatorRequest::QualityScore(_) => CalculatorId::QualityScore,
            CalculatorRequest::AbTest(_) => CalculatorId::AbTest,
            CalculatorRequest::LeadCac(_) => CalculatorId::LeadCac,
            CalculatorRequest::Attribution(_) => CalculatorId::Attribution,
        }
    }

    /// Input fields as a JSON object, in the shape `from_fields` accepts.
    pub fn fields(&self) -> Result<Value, MetricsError> {
        let value = match self {
            CalculatorRequest::MediaMix(input) => serde_json::to_value(input)?,
            CalculatorRequest::Ltv(input) => serde_json::to_value(input)?,
            CalculatorRequest::Seasonality(input) => serde_json::to_value(input)?,
            CalculatorRequest::Pmax(input) => serde_json::to_value(input)?,
            CalculatorRequest::SearchTerm(input) => serde_json::to_value(input)?,
            CalculatorRequest::Auction(input) => serde_json::to_value(input)?,
            CalculatorRequest::Daypart(input) => serde_json::to_value(input)?,
            CalculatorRequest::Geo(input) => serde_json::to_value(input)?,
            CalculatorRequest::BudgetScaler(input) => serde_json::to_value(input)?,
            CalculatorRequest::MatchType(input) => serde_json::to_value(input)?,
            CalculatorRequest::Device(input) => serde_json::to_value(input)?,
            CalculatorRequest::Pacer(input) => serde_json::to_value(input)?,
            CalculatorRequest::CpcFromCpa(input) => serde_json::to_value(input)?,
            CalculatorRequest::BreakEvenRoas(input) => serde_json::to_value(input)?,
            CalculatorRequest::QualityScore(input) => serde_json::to_value(input)?,
            CalculatorRequest::AbTest(input) => serde_json::to_value(input)?,
            CalculatorRequest::LeadCac(input) => serde_json::to_value(input)?,
            CalculatorRequest::Attribution(input) => serde_json::to_value(input)?,
        };
        Ok(value)
    }

    pub fn compute(&self, config: &MetricsConfig) -> MetricResult {
        match self {
            CalculatorRequest::MediaMix(input) => input.metric(config),
            CalculatorRequest::Ltv(input) => input.metric(config),
            CalculatorRequest::Seasonality(input) => input.metric(config),
            CalculatorRequest::Pmax(input) => input.metric(config),
            CalculatorRequest::SearchTerm(input) => input.metric(config),
            CalculatorRequest::Auction(input) => input.metric(config),
            CalculatorRequest::Daypart(input) => input.metric(config),
            CalculatorRequest::Geo(input) => input.metric(config),
            CalculatorRequest::BudgetScaler(input) => input.metric(config),
            CalculatorRequest::MatchType(input) => input.metric(config),
            CalculatorRequest::Device(input) => input.metric(config),
            CalculatorRequest::Pacer(input) => input.metric(config),
            CalculatorRequest::CpcFromCpa(input) => input.metric(config),
            CalculatorRequest::BreakEvenRoas(input) => input.metric(config),
            CalculatorRequest::QualityScore(input) => input.metric(config),
            CalculatorRequest::AbTest(input) => input.metric(config),
            CalculatorRequest::LeadCac(input) => input.metric(config),
            CalculatorRequest::Attribution(input) => input.metric(config),
        }
    }
}

/// A typed calculator input bound to the calculator it feeds.
pub trait Calculate: DeserializeOwned {
    const ID: CalculatorId;

    fn metric(&self, config: &MetricsConfig) -> MetricResult;
}

/// Formula entry point stored in [`crate::catalog::CATALOG`].
pub type RunFn = fn(Value, &MetricsConfig) -> Result<MetricResult, MetricsError>;

/// Parses `fields` over the defaults of `I` and computes its metric.
pub fn run<I: Calculate>(
    fields: Value,
    config: &MetricsConfig,
) -> Result<MetricResult, MetricsError> {
    let input: I = parse_input(I::ID, object_or_empty(fields))?;
    Ok(input.metric(config))
}

impl Calculate for MediaMixInput {
    const ID: CalculatorId = CalculatorId::MediaMix;

    fn metric(&self, config: &MetricsConfig) -> MetricResult {
        self.compute(&config.strategy).to_metric()
    }
}

impl Calculate for LtvInput {
    const ID: CalculatorId = CalculatorId::Ltv;

    fn metric(&self, config: &MetricsConfig) -> MetricResult {
        self.compute(&config.strategy).to_metric()
    }
}

impl Calculate for SeasonalityInput {
    const ID: CalculatorId = CalculatorId::Seasonality;

    fn metric(&self, _config: &MetricsConfig) -> MetricResult {
        self.compute().to_metric()
    }
}

impl Calculate for PmaxInput {
    const ID: CalculatorId = CalculatorId::Pmax;

    fn metric(&self, config: &MetricsConfig) -> MetricResult {
        self.compute(&config.optimization).to_metric()
    }
}

impl Calculate for SearchTermInput {
    const ID: CalculatorId = CalculatorId::SearchTerm;

    fn metric(&self, _config: &MetricsConfig) -> MetricResult {
        self.compute().to_metric()
    }
}

impl Calculate for AuctionInput {
    const ID: CalculatorId = CalculatorId::Auction;

    fn metric(&self, config: &MetricsConfig) -> MetricResult {
        self.compute(&config.optimization).to_metric()
    }
}

impl Calculate for DaypartInput {
    const ID: CalculatorId = CalculatorId::Daypart;

    fn metric(&self, _config: &MetricsConfig) -> MetricResult {
        self.compute().to_metric()
    }
}

impl Calculate for GeoInput {
    const ID: CalculatorId = CalculatorId::Geo;

    fn metric(&self, config: &MetricsConfig) -> MetricResult {
        self.compute(&config.optimization).to_metric()
    }
}

impl Calculate for BudgetScalerInput {
    const ID: CalculatorId = CalculatorId::BudgetScaler;

    fn metric(&self, config: &MetricsConfig) -> MetricResult {
        self.compute(&config.simulation).to_metric()
    }
}

impl Calculate for MatchTypeInput {
    const ID: CalculatorId = CalculatorId::MatchType;

    fn metric(&self, config: &MetricsConfig) -> MetricResult {
        self.compute(&config.simulation).to_metric()
    }
}

impl Calculate for DeviceInput {
    const ID: CalculatorId = CalculatorId::Device;

    fn metric(&self, _config: &MetricsConfig) -> MetricResult {
        self.compute().to_metric()
    }
}

impl Calculate for PacerInput {
    const ID: CalculatorId = CalculatorId::Pacer;

    fn metric(&self, _config: &MetricsConfig) -> MetricResult {
        self.compute().to_metric()
    }
}

impl Calculate for CpcFromCpaInput {
    const ID: CalculatorId = CalculatorId::CpcFromCpa;

    fn metric(&self, _config: &MetricsConfig) -> MetricResult {
        self.compute().to_metric()
    }
}

impl Calculate for BreakEvenInput {
    const ID: CalculatorId = CalculatorId::BreakEvenRoas;

    fn metric(&self, _config: &MetricsConfig) -> MetricResult {
        self.compute().to_metric()
    }
}

impl Calculate for QualityScoreInput {
    const ID: CalculatorId = CalculatorId::QualityScore;

    fn metric(&self, config: &MetricsConfig) -> MetricResult {
        self.compute(&config.tools).to_metric()
    }
}

impl Calculate for AbTestInput {
    const ID: CalculatorId = CalculatorId::AbTest;

    fn metric(&self, config: &MetricsConfig) -> MetricResult {
        self.compute(&config.tools).to_metric()
    }
}

impl Calculate for LeadCacInput {
    const ID: CalculatorId = CalculatorId::LeadCac;

    fn metric(&self, _config: &MetricsConfig) -> MetricResult {
        self.compute().to_metric()
    }
}

impl Calculate for AttributionInput {
    const ID: CalculatorId = CalculatorId::Attribution;

    fn metric(&self, config: &MetricsConfig) -> MetricResult {
        self.compute(&config.tools).to_metric()
    }
}

fn object_or_empty(fields: Value) -> Value {
    match fields {
        Value::Null => Value::Object(Default::default()),
        other => other,
    }
}

fn parse_input<T>(id: CalculatorId, fields: Value) -> Result<T, MetricsError>
where
    T: DeserializeOwned,
{
    serde_json::from_value(fields)
        .map_err(|err| MetricsError::invalid_input(id.tab(), err.to_string()))
}

pub(crate) fn percent_of(value: f64, pct: f64) -> f64 {
    value * (pct / 100.0)
}

pub(crate) fn signed_percent(figure: Figure) -> String {
    match figure.value() {
        Some(value) if value > 0.0 => format!("+{:.0}%", value.round()),
        Some(value) => format!("{:.0}%", value.round()),
        None => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_percent_rounds_ties_away_from_zero() {
        assert_eq!(signed_percent(Figure::new(12.5)), "+13%");
        assert_eq!(signed_percent(Figure::new(-2.5)), "-3%");
        assert_eq!(signed_percent(Figure::new(17.4)), "+17%");
        assert_eq!(signed_percent(Figure::NOT_APPLICABLE), "N/A");
    }
}
