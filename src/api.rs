use ads_metrics::diagnosis::DiagnosisGaps;
use ads_metrics::{
    CalculatorId, CalculatorRequest, Diagnosis, DiagnosisSnapshot, MetricsError, ModuleId,
    Recommendation,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Serialize)]
pub struct ApiCalculatorEntry {
    pub id: CalculatorId,
    pub module: ModuleId,
    pub module_label: &'static str,
    pub title: &'static str,
    pub defaults: Value,
}

impl ApiCalculatorEntry {
    pub fn from_id(id: CalculatorId) -> Result<Self, MetricsError> {
        Ok(Self {
            id,
            module: id.module(),
            module_label: id.module().label(),
            title: id.title(),
            defaults: CalculatorRequest::with_defaults(id).fields()?,
        })
    }
}

/// Every field is optional; omitted ones fall back to the reference snapshot.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiDiagnoseRequest {
    pub roas: Option<f64>,
    #[serde(alias = "targetRoas")]
    pub target_roas: Option<f64>,
    pub cpa: Option<f64>,
    #[serde(alias = "targetCpa")]
    pub target_cpa: Option<f64>,
    pub budget: Option<f64>,
    pub spent: Option<f64>,
}

impl ApiDiagnoseRequest {
    pub fn from_json(body: Value) -> Result<Self, MetricsError> {
        let body = match body {
            Value::Null => Value::Object(Default::default()),
            other => other,
        };
        serde_json::from_value(body)
            .map_err(|err| MetricsError::invalid_input("diagnose", err.to_string()))
    }

    pub fn into_snapshot(self) -> DiagnosisSnapshot {
        let mut snapshot = DiagnosisSnapshot::default();
        if let Some(value) = self.roas {
            snapshot.roas = value;
        }
        if let Some(value) = self.target_roas {
            snapshot.target_roas = value;
        }
        if let Some(value) = self.cpa {
            snapshot.cpa = value;
        }
        if let Some(value) = self.target_cpa {
            snapshot.target_cpa = value;
        }
        if let Some(value) = self.budget {
            snapshot.budget = value;
        }
        if let Some(value) = self.spent {
            snapshot.spent = value;
        }
        snapshot
    }
}

#[derive(Debug, Serialize)]
pub struct ApiRecommendation {
    #[serde(flatten)]
    pub recommendation: Recommendation,
    /// `module/tab` path the client navigates to.
    pub link: String,
}

#[derive(Debug, Serialize)]
pub struct ApiDiagnoseResponse {
    pub gaps: DiagnosisGaps,
    pub recommendations: Vec<ApiRecommendation>,
}

impl ApiDiagnoseResponse {
    pub fn from_diagnosis(diagnosis: Diagnosis) -> Self {
        let recommendations = diagnosis
            .recommendations
            .into_iter()
            .map(|recommendation| ApiRecommendation {
                link: format!(
                    "{}/{}",
                    recommendation.target_module.id(),
                    recommendation.target_tab.tab()
                ),
                recommendation,
            })
            .collect();
        Self {
            gaps: diagnosis.gaps,
            recommendations,
        }
    }
}
