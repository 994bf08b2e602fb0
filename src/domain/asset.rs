// Asset domain model
use super::numeric::coerce_number;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const DEFAULT_EFFICIENCY_HIST: [f64; 3] = [0.9, 0.89, 0.88];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    Solar,
    Wind,
}

#[derive(Debug, Error, PartialEq)]
#[error("unknown asset type `{0}` (expected `solar` or `wind`)")]
pub struct UnknownAssetType(pub String);

impl AssetType {
    /// The environmental metric tracked for this kind of asset
    pub fn env_metric(self) -> EnvMetric {
        match self {
            AssetType::Solar => EnvMetric::TempC,
            AssetType::Wind => EnvMetric::WindSpeed,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AssetType::Solar => "solar",
            AssetType::Wind => "wind",
        }
    }
}

impl FromStr for AssetType {
    type Err = UnknownAssetType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "solar" => Ok(AssetType::Solar),
            "wind" => Ok(AssetType::Wind),
            other => Err(UnknownAssetType(other.to_string())),
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvMetric {
    TempC,
    WindSpeed,
}

impl EnvMetric {
    /// Wire key used in `env` / `envHist`
    pub fn key(self) -> &'static str {
        match self {
            EnvMetric::TempC => "tempC",
            EnvMetric::WindSpeed => "windSpeed",
        }
    }
}

/// Current environmental reading, serialized as `{"tempC": 42}` or `{"windSpeed": 15}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EnvReading {
    #[serde(rename = "tempC")]
    TempC(f64),
    #[serde(rename = "windSpeed")]
    WindSpeed(f64),
}

/// Environmental history holding exactly one metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EnvHistory {
    #[serde(rename = "tempC")]
    TempC(Vec<f64>),
    #[serde(rename = "windSpeed")]
    WindSpeed(Vec<f64>),
}

impl EnvHistory {
    pub fn new(metric: EnvMetric, values: Vec<f64>) -> Self {
        match metric {
            EnvMetric::TempC => EnvHistory::TempC(values),
            EnvMetric::WindSpeed => EnvHistory::WindSpeed(values),
        }
    }

    pub fn metric(&self) -> EnvMetric {
        match self {
            EnvHistory::TempC(_) => EnvMetric::TempC,
            EnvHistory::WindSpeed(_) => EnvMetric::WindSpeed,
        }
    }

    pub fn values(&self) -> &[f64] {
        match self {
            EnvHistory::TempC(values) | EnvHistory::WindSpeed(values) => values,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    #[serde(default)]
    pub efficiency_hist: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<EnvReading>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_hist: Option<EnvHistory>,
}

impl Asset {
    /// Default record appended by "Add Asset"; `position` is the 1-based slot it lands in
    pub fn placeholder(position: usize) -> Self {
        Self {
            id: format!("asset-{}", position),
            asset_type: AssetType::Solar,
            efficiency_hist: DEFAULT_EFFICIENCY_HIST.to_vec(),
            env: None,
            env_hist: None,
        }
    }

    /// Most recent efficiency reading, 0 when there is no history
    pub fn last_efficiency(&self) -> f64 {
        self.efficiency_hist.last().copied().unwrap_or(0.0)
    }

    /// History for the metric matching the current type. A history recorded
    /// under the other metric reads as empty.
    pub fn env_values(&self) -> &[f64] {
        match &self.env_hist {
            Some(hist) if hist.metric() == self.asset_type.env_metric() => hist.values(),
            _ => &[],
        }
    }
}

/// The two assets a fresh dashboard starts with
pub fn seed_assets() -> Vec<Asset> {
    vec![
        Asset {
            id: "solar-1".to_string(),
            asset_type: AssetType::Solar,
            efficiency_hist: vec![0.92, 0.91, 0.90, 0.89],
            env: Some(EnvReading::TempC(42.0)),
            env_hist: Some(EnvHistory::TempC(vec![35.0, 37.0, 39.0, 41.0])),
        },
        Asset {
            id: "wind-2".to_string(),
            asset_type: AssetType::Wind,
            efficiency_hist: vec![0.88, 0.885, 0.882, 0.879],
            env: Some(EnvReading::WindSpeed(15.0)),
            env_hist: Some(EnvHistory::WindSpeed(vec![9.0, 12.0, 14.0, 16.0])),
        },
    ]
}

/// Parse comma separated efficiency readings, dropping blanks and anything that is not a number
pub fn parse_efficiency_list(raw: &str) -> Vec<f64> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(coerce_number)
        .filter(|value| !value.is_nan())
        .collect()
}

/// Parse comma separated environmental readings without filtering.
/// Blank tokens coerce to 0 and unparseable tokens to NaN.
pub fn parse_env_list(raw: &str) -> Vec<f64> {
    raw.split(',').map(coerce_number).collect()
}

/// Comma-joined text shown in the editor inputs
pub fn join_values(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
