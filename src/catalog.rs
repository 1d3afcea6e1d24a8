//! Static catalog of calculators and the navigation modules they live in.
//!
//! Deep links from the diagnosis hub resolve through [`CATALOG`] instead of
//! string matching, so every routable tab is a [`CalculatorId`] variant.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::calculators::{
    run, AbTestInput, AttributionInput, AuctionInput, BreakEvenInput, BudgetScalerInput,
    CpcFromCpaInput, DaypartInput, DeviceInput, GeoInput, LeadCacInput, LtvInput, MatchTypeInput,
    MediaMixInput, PacerInput, PmaxInput, QualityScoreInput, RunFn, SearchTermInput,
    SeasonalityInput,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleId {
    Hub,
    Strategy,
    Optimization,
    Simulation,
    Tools,
}

impl ModuleId {
    pub const ALL: [ModuleId; 5] = [
        ModuleId::Hub,
        ModuleId::Strategy,
        ModuleId::Optimization,
        ModuleId::Simulation,
        ModuleId::Tools,
    ];

    pub fn from_id(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "hub" | "diagnosis" => Some(ModuleId::Hub),
            "strategy" => Some(ModuleId::Strategy),
            "optimization" => Some(ModuleId::Optimization),
            "simulation" => Some(ModuleId::Simulation),
            "tools" => Some(ModuleId::Tools),
            _ => None,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            ModuleId::Hub => "hub",
            ModuleId::Strategy => "strategy",
            ModuleId::Optimization => "optimization",
            ModuleId::Simulation => "simulation",
            ModuleId::Tools => "tools",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ModuleId::Hub => "Smart diagnosis",
            ModuleId::Strategy => "Strategy",
            ModuleId::Optimization => "Optimization",
            ModuleId::Simulation => "Simulation",
            ModuleId::Tools => "Tools",
        }
    }

    /// Tab opened when the module is entered without a deep link.
    pub fn default_tab(self) -> Option<CalculatorId> {
        match self {
            ModuleId::Hub => None,
            ModuleId::Strategy => Some(CalculatorId::MediaMix),
            ModuleId::Optimization => Some(CalculatorId::Pmax),
            ModuleId::Simulation => Some(CalculatorId::BudgetScaler),
            ModuleId::Tools => Some(CalculatorId::CpcFromCpa),
        }
    }

    pub fn calculators(self) -> impl Iterator<Item = CalculatorId> {
        CATALOG
            .iter()
            .filter(move |info| info.module == self)
            .map(|info| info.id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CalculatorId {
    #[serde(rename = "mediamix")]
    MediaMix,
    #[serde(rename = "ltv")]
    Ltv,
    #[serde(rename = "seasonality")]
    Seasonality,
    #[serde(rename = "pmax")]
    Pmax,
    #[serde(rename = "searchterm")]
    SearchTerm,
    #[serde(rename = "auction")]
    Auction,
    #[serde(rename = "daypart")]
    Daypart,
    #[serde(rename = "geo")]
    Geo,
    #[serde(rename = "scaler")]
    BudgetScaler,
    #[serde(rename = "match")]
    MatchType,
    #[serde(rename = "device")]
    Device,
    #[serde(rename = "pacer")]
    Pacer,
    #[serde(rename = "calc")]
    CpcFromCpa,
    #[serde(rename = "roas")]
    BreakEvenRoas,
    #[serde(rename = "qs")]
    QualityScore,
    #[serde(rename = "ab")]
    AbTest,
    #[serde(rename = "lead")]
    LeadCac,
    #[serde(rename = "attr")]
    Attribution,
}

#[derive(Clone, Copy, Serialize)]
pub struct CalculatorInfo {
    pub id: CalculatorId,
    pub module: ModuleId,
    pub tab: &'static str,
    pub title: &'static str,
    /// Parses a JSON object of input fields and evaluates the formula.
    #[serde(skip)]
    pub run: RunFn,
}

impl fmt::Debug for CalculatorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalculatorInfo")
            .field("id", &self.id)
            .field("module", &self.module)
            .field("tab", &self.tab)
            .field("title", &self.title)
            .finish_non_exhaustive()
    }
}

/// Indexed by `CalculatorId as usize`; keep the order in sync with the enum.
pub static CATALOG: [CalculatorInfo; 18] = [
    entry(
        CalculatorId::MediaMix,
        ModuleId::Strategy,
        "mediamix",
        "Cross-channel media mix",
        run::<MediaMixInput>,
    ),
    entry(CalculatorId::Ltv, ModuleId::Strategy, "ltv", "LTV:CAC ratio", run::<LtvInput>),
    entry(
        CalculatorId::Seasonality,
        ModuleId::Strategy,
        "seasonality",
        "Peak-season budget",
        run::<SeasonalityInput>,
    ),
    entry(
        CalculatorId::Pmax,
        ModuleId::Optimization,
        "pmax",
        "PMax true ROAS",
        run::<PmaxInput>,
    ),
    entry(
        CalculatorId::SearchTerm,
        ModuleId::Optimization,
        "searchterm",
        "Search-term cleanup",
        run::<SearchTermInput>,
    ),
    entry(
        CalculatorId::Auction,
        ModuleId::Optimization,
        "auction",
        "Auction rank premium",
        run::<AuctionInput>,
    ),
    entry(
        CalculatorId::Daypart,
        ModuleId::Optimization,
        "daypart",
        "Day-part bid modifier",
        run::<DaypartInput>,
    ),
    entry(CalculatorId::Geo, ModuleId::Optimization, "geo", "Geo tier blend", run::<GeoInput>),
    entry(
        CalculatorId::BudgetScaler,
        ModuleId::Simulation,
        "scaler",
        "Budget scale-up profit",
        run::<BudgetScalerInput>,
    ),
    entry(
        CalculatorId::MatchType,
        ModuleId::Simulation,
        "match",
        "Match-type blend",
        run::<MatchTypeInput>,
    ),
    entry(
        CalculatorId::Device,
        ModuleId::Simulation,
        "device",
        "Device bid blend",
        run::<DeviceInput>,
    ),
    entry(CalculatorId::Pacer, ModuleId::Simulation, "pacer", "Budget pacing", run::<PacerInput>),
    entry(
        CalculatorId::CpcFromCpa,
        ModuleId::Tools,
        "calc",
        "Max CPC from target CPA",
        run::<CpcFromCpaInput>,
    ),
    entry(
        CalculatorId::BreakEvenRoas,
        ModuleId::Tools,
        "roas",
        "Break-even ROAS",
        run::<BreakEvenInput>,
    ),
    entry(
        CalculatorId::QualityScore,
        ModuleId::Tools,
        "qs",
        "Quality score CPC",
        run::<QualityScoreInput>,
    ),
    entry(CalculatorId::AbTest, ModuleId::Tools, "ab", "A/B significance", run::<AbTestInput>),
    entry(
        CalculatorId::LeadCac,
        ModuleId::Tools,
        "lead",
        "Lead-to-customer CAC",
        run::<LeadCacInput>,
    ),
    entry(
        CalculatorId::Attribution,
        ModuleId::Tools,
        "attr",
        "Attribution lag correction",
        run::<AttributionInput>,
    ),
];

const fn entry(
    id: CalculatorId,
    module: ModuleId,
    tab: &'static str,
    title: &'static str,
    run: RunFn,
) -> CalculatorInfo {
    CalculatorInfo {
        id,
        module,
        tab,
        title,
        run,
    }
}

impl CalculatorId {
    pub fn from_tab(value: &str) -> Option<Self> {
        let needle = value.trim().to_lowercase();
        CATALOG
            .iter()
            .find(|info| info.tab == needle)
            .map(|info| info.id)
    }

    pub fn info(self) -> &'static CalculatorInfo {
        &CATALOG[self as usize]
    }

    pub fn tab(self) -> &'static str {
        self.info().tab
    }

    pub fn module(self) -> ModuleId {
        self.info().module
    }

    pub fn title(self) -> &'static str {
        self.info().title
    }

    /// Evaluates this calculator through its catalog entry.
    pub fn run(
        self,
        fields: serde_json::Value,
        config: &crate::config::MetricsConfig,
    ) -> Result<crate::calculators::MetricResult, crate::error::MetricsError> {
        (self.info().run)(fields, config)
    }

    pub fn all() -> impl Iterator<Item = CalculatorId> {
        CATALOG.iter().map(|info| info.id)
    }
}
