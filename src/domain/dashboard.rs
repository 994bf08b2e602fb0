// Dashboard domain model
use super::asset::{join_values, Asset, AssetType};
use super::numeric::to_fixed;
use super::scoring::{RiskScore, TtmEntry};
use serde::Serialize;
use std::borrow::Borrow;

pub const TITLE: &str = "Predictive Maintenance - Dashboard";
pub const SUBTITLE: &str = "Risk, time-to-maintenance and env correlations.";

/// Figures derived from the asset list on every render
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub asset_count: usize,
    pub avg_efficiency: String,
    pub history_points: Option<usize>,
}

impl DashboardSummary {
    pub fn from_assets<A: Borrow<Asset>>(assets: &[A]) -> Self {
        let asset_count = assets.len();
        let avg_efficiency = if asset_count == 0 {
            0.0
        } else {
            assets
                .iter()
                .map(|a| a.borrow().last_efficiency())
                .sum::<f64>()
                / asset_count as f64
        };

        Self {
            asset_count,
            avg_efficiency: to_fixed(avg_efficiency, 3),
            history_points: assets.first().map(|a| a.borrow().efficiency_hist.len()),
        }
    }

    pub fn kpis(&self) -> Vec<Kpi> {
        vec![
            Kpi::new("Assets", self.asset_count.to_string()),
            Kpi::new("Avg Efficiency (last)", self.avg_efficiency.clone()),
            Kpi::new(
                "History Points",
                self.history_points
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
            Kpi::new("Editable", "Yes").with_hint("Modify inputs below"),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpi {
    pub label: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl Kpi {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            hint: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// One result card. `content` is absent until the first successful call,
/// in which case `hint` tells the user which button to press.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel<T> {
    pub title: String,
    pub loading: bool,
    pub error: Option<String>,
    pub hint: Option<String>,
    pub content: Option<T>,
}

impl<T> Panel<T> {
    pub fn new(
        title: &str,
        hint: &str,
        loading: bool,
        error: Option<String>,
        content: Option<T>,
    ) -> Self {
        let hint = if content.is_none() {
            Some(hint.to_string())
        } else {
            None
        };

        Self {
            title: title.to_string(),
            loading,
            error,
            hint,
            content,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskRow {
    pub id: String,
    pub failure_probability_pct: String,
    pub expected_drop_pct_per_period: f64,
}

impl From<&RiskScore> for RiskRow {
    fn from(score: &RiskScore) -> Self {
        Self {
            id: score.id.clone(),
            failure_probability_pct: format!("{}%", to_fixed(score.failure_probability * 100.0, 1)),
            expected_drop_pct_per_period: score.expected_drop_pct_per_period,
        }
    }
}

/// One bar of the TTM chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TtmBar {
    pub id: String,
    pub ttm_days: f64,
}

impl From<&TtmEntry> for TtmBar {
    fn from(entry: &TtmEntry) -> Self {
        Self {
            id: entry.id.clone(),
            ttm_days: entry.ttm_days,
        }
    }
}

/// Editor row bound to an asset by its position in the list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditorRow {
    pub index: usize,
    pub id: String,
    pub asset_type: AssetType,
    pub env_label: &'static str,
    pub efficiency_text: String,
    pub env_text: String,
}

impl EditorRow {
    pub fn new(index: usize, asset: &Asset) -> Self {
        Self {
            index,
            id: asset.id.clone(),
            asset_type: asset.asset_type,
            env_label: asset.asset_type.env_metric().key(),
            efficiency_text: join_values(&asset.efficiency_hist),
            env_text: join_values(asset.env_values()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub title: String,
    pub subtitle: String,
    pub summary: DashboardSummary,
    pub kpis: Vec<Kpi>,
    pub assets: Vec<EditorRow>,
    pub risk: Panel<Vec<RiskRow>>,
    pub ttm: Panel<Vec<TtmBar>>,
    pub correlation: Panel<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::asset::seed_assets;

    fn with_history(history: Vec<f64>) -> Asset {
        let mut asset = Asset::placeholder(1);
        asset.efficiency_hist = history;
        asset
    }

    #[test]
    fn test_avg_efficiency_counts_empty_history_as_zero() {
        let assets = vec![with_history(vec![0.9, 0.8]), with_history(vec![])];
        let summary = DashboardSummary::from_assets(&assets);
        assert_eq!(summary.avg_efficiency, "0.400");
        assert_eq!(summary.asset_count, 2);
        assert_eq!(summary.history_points, Some(2));
    }

    #[test]
    fn test_summary_of_seed_assets() {
        let summary = DashboardSummary::from_assets(&seed_assets());
        let avg: f64 = summary.avg_efficiency.parse().unwrap();
        assert!((avg - (0.89 + 0.879) / 2.0).abs() < 0.001);
        assert_eq!(summary.history_points, Some(4));

        let kpis = summary.kpis();
        assert_eq!(kpis[0].value, "2");
        assert_eq!(kpis[3].hint.as_deref(), Some("Modify inputs below"));
    }

    #[test]
    fn test_empty_summary() {
        let summary = DashboardSummary::from_assets::<Asset>(&[]);
        assert_eq!(summary.avg_efficiency, "0.000");
        assert_eq!(summary.history_points, None);
        assert_eq!(summary.kpis()[2].value, "-");
    }

    #[test]
    fn test_risk_row_formats_percentage() {
        let row = RiskRow::from(&RiskScore {
            id: "wind-2".to_string(),
            failure_probability: 0.1234,
            expected_drop_pct_per_period: 0.5,
        });
        assert_eq!(row.failure_probability_pct, "12.3%");
    }

    #[test]
    fn test_figures_round_exact_halves_up() {
        let summary = DashboardSummary::from_assets(&[with_history(vec![0.9, 0.8125])]);
        assert_eq!(summary.avg_efficiency, "0.813");

        let row = RiskRow::from(&RiskScore {
            id: "solar-1".to_string(),
            failure_probability: 0.0025,
            expected_drop_pct_per_period: 0.1,
        });
        assert_eq!(row.failure_probability_pct, "0.3%");
    }

    #[test]
    fn test_infinite_efficiency_is_spelled_out() {
        let summary = DashboardSummary::from_assets(&[with_history(vec![f64::INFINITY])]);
        assert_eq!(summary.avg_efficiency, "Infinity");
    }

    #[test]
    fn test_panel_hint_only_without_content() {
        let empty: Panel<String> = Panel::new("Env Correlations", "Click “Correlate”.", true, None, None);
        assert_eq!(empty.hint.as_deref(), Some("Click “Correlate”."));
        assert!(empty.loading);

        let ready = Panel::new("Env Correlations", "Click “Correlate”.", false, None, Some("{}".to_string()));
        assert!(ready.hint.is_none());
    }

    #[test]
    fn test_editor_row_uses_type_metric() {
        let assets = seed_assets();
        let row = EditorRow::new(1, &assets[1]);
        assert_eq!(row.env_label, "windSpeed");
        assert_eq!(row.env_text, "9,12,14,16");
        assert_eq!(row.efficiency_text, "0.88,0.885,0.882,0.879");
    }
}
