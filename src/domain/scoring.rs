// Scoring domain models - typed results of the remote prediction functions
use super::asset::Asset;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The three remote functions the dashboard can invoke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringOperation {
    Risk,
    Ttm,
    Correlation,
}

#[derive(Debug, Error, PartialEq)]
#[error("unknown scoring operation `{0}`")]
pub struct UnknownOperation(pub String);

impl ScoringOperation {
    pub const ALL: [ScoringOperation; 3] = [
        ScoringOperation::Risk,
        ScoringOperation::Ttm,
        ScoringOperation::Correlation,
    ];

    /// Name of the remote function backing this operation
    pub fn function_name(self) -> &'static str {
        match self {
            ScoringOperation::Risk => "asset_predictive_maintenance",
            ScoringOperation::Ttm => "asset_ttm_forecast",
            ScoringOperation::Correlation => "asset_env_correlation",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            ScoringOperation::Risk => "risk",
            ScoringOperation::Ttm => "ttm",
            ScoringOperation::Correlation => "correlation",
        }
    }
}

impl FromStr for ScoringOperation {
    type Err = UnknownOperation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.slug() == s)
            .ok_or_else(|| UnknownOperation(s.to_string()))
    }
}

impl fmt::Display for ScoringOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Request body shared by every scoring function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringPayload {
    pub assets: Vec<Asset>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    pub assets: Vec<RiskScore>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskScore {
    pub id: String,
    /// Probability in [0, 1]
    pub failure_probability: f64,
    pub expected_drop_pct_per_period: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TtmForecast {
    pub forecast: Vec<TtmEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TtmEntry {
    pub id: String,
    pub ttm_days: f64,
}

/// Correlation output is shown verbatim, so only its object shape is enforced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationReport(pub serde_json::Map<String, serde_json::Value>);

impl CorrelationReport {
    /// Two-space indented JSON
    pub fn pretty(&self) -> String {
        format!("{:#}", serde_json::Value::Object(self.0.clone()))
    }
}
