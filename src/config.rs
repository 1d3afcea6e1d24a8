use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::calculators::{OptimizationConfig, SimulationConfig, StrategyConfig, ToolsConfig};
use crate::diagnosis::DiagnosisConfig;
use crate::error::MetricsError;

/// Reference constants for every calculator and the diagnosis thresholds.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub strategy: StrategyConfig,
    pub optimization: OptimizationConfig,
    pub simulation: SimulationConfig,
    pub tools: ToolsConfig,
    pub diagnosis: DiagnosisConfig,
}

impl MetricsConfig {
    pub fn load(path: Option<PathBuf>) -> Result<(Self, Option<PathBuf>), MetricsError> {
        let config_path = path.or_else(default_config_path);
        let mut config = match config_path.as_ref() {
            Some(path) if path.exists() => Self::read(path)?,
            _ => MetricsConfig::default(),
        };

        config.apply_env_overrides();
        Ok((config, config_path))
    }

    pub fn read(path: &Path) -> Result<Self, MetricsError> {
        let contents = std::fs::read_to_string(path).map_err(|source| MetricsError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }

    pub fn write(&self, path: &Path) -> Result<(), MetricsError> {
        let write_err = |source| MetricsError::ConfigWrite {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(write_err)?;
            }
        }
        let payload = toml::to_string_pretty(self)?;
        std::fs::write(path, payload).map_err(write_err)?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        override_f64("DIAGNOSIS_ROAS_GAP_PCT", &mut self.diagnosis.roas_gap_pct);
        override_f64("DIAGNOSIS_CPA_GAP_PCT", &mut self.diagnosis.cpa_gap_pct);
        override_f64("DIAGNOSIS_SPEND_RATE_PCT", &mut self.diagnosis.spend_rate_pct);
        override_f64("GEO_TIER1_ROAS", &mut self.optimization.geo_tier1_roas);
        override_f64("GEO_TIER2_ROAS", &mut self.optimization.geo_tier2_roas);
        override_f64("SCALER_COST_RATIO", &mut self.simulation.cost_ratio);
    }
}

fn override_f64(key: &str, target: &mut f64) {
    if let Ok(raw) = env::var(key) {
        match raw.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => *target = value,
            _ => tracing::warn!(key, value = %raw, "ignoring non-numeric override"),
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    env::var("METRICS_CONFIG_PATH")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| Some(PathBuf::from("config/metrics.toml")))
}
