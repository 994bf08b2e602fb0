// HTTP request handlers
use crate::application::dashboard_service::SlotState;
use crate::domain::asset::{Asset, AssetType};
use crate::domain::dashboard::DashboardView;
use crate::domain::scoring::ScoringOperation;
use crate::presentation::app_state::AppState;
use crate::presentation::error::{parse_index, ApiError};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Body of every single-field edit; the raw text typed into the editor
#[derive(Debug, Deserialize)]
pub struct FieldUpdate {
    pub value: String,
}

/// Query string of `POST /scoring/:operation`
#[derive(Debug, Default, Deserialize)]
pub struct ScoringOptions {
    /// Hold the request until the call settles and answer with the slot state
    #[serde(default)]
    pub wait: bool,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct TriggerAccepted {
    pub operation: ScoringOperation,
    pub sequence: u64,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn get_dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardView> {
    Json(state.controller.view().await)
}

pub async fn list_assets(State(state): State<Arc<AppState>>) -> Json<Vec<Asset>> {
    Json(state.controller.assets().await)
}

pub async fn add_asset(State(state): State<Arc<AppState>>) -> Json<Vec<Asset>> {
    Json(state.controller.add_asset().await)
}

pub async fn remove_asset(
    Path(index): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Asset>>, ApiError> {
    Ok(Json(state.controller.remove_asset(parse_index(&index)?).await?))
}

pub async fn update_id(
    Path(index): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(update): Json<FieldUpdate>,
) -> Result<Json<Vec<Asset>>, ApiError> {
    Ok(Json(state.controller.set_id(parse_index(&index)?, update.value).await?))
}

pub async fn update_type(
    Path(index): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(update): Json<FieldUpdate>,
) -> Result<Json<Vec<Asset>>, ApiError> {
    let asset_type = update.value.parse::<AssetType>()?;
    Ok(Json(state.controller.set_type(parse_index(&index)?, asset_type).await?))
}

pub async fn update_efficiency(
    Path(index): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(update): Json<FieldUpdate>,
) -> Result<Json<Vec<Asset>>, ApiError> {
    Ok(Json(
        state.controller.set_efficiency_hist(parse_index(&index)?, &update.value).await?,
    ))
}

pub async fn update_env(
    Path(index): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(update): Json<FieldUpdate>,
) -> Result<Json<Vec<Asset>>, ApiError> {
    Ok(Json(state.controller.set_env_hist(parse_index(&index)?, &update.value).await?))
}

/// Fire a scoring call in the background; poll `GET /scoring/:operation` or the dashboard for the result.
/// With `?wait=true` the call runs inside the request and the settled slot is returned.
pub async fn trigger_scoring(
    Path(operation): Path<String>,
    Query(options): Query<ScoringOptions>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ApiError> {
    let operation = operation.parse::<ScoringOperation>()?;

    if options.wait {
        state.controller.score(operation).await;
        tracing::info!("Completed {} call", operation);
        return Ok(Json(state.controller.slot_state(operation).await).into_response());
    }

    let sequence = state.controller.trigger(operation).await;
    tracing::info!("Triggered {} call {}", operation, sequence);

    Ok((
        StatusCode::ACCEPTED,
        Json(TriggerAccepted {
            operation,
            sequence,
        }),
    )
        .into_response())
}

pub async fn scoring_state(
    Path(operation): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<SlotState>, ApiError> {
    let operation = operation.parse::<ScoringOperation>()?;
    Ok(Json(state.controller.slot_state(operation).await))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dashboard_service::DashboardController;
    use crate::application::scoring_gateway::fake::StaticGateway;
    use axum::body::to_bytes;
    use serde_json::{json, Value};

    fn state(gateway: StaticGateway) -> State<Arc<AppState>> {
        State(Arc::new(AppState {
            controller: DashboardController::new(Arc::new(gateway)),
        }))
    }

    fn background() -> Query<ScoringOptions> {
        Query(ScoringOptions::default())
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn field(value: &str) -> Json<FieldUpdate> {
        Json(FieldUpdate {
            value: value.to_string(),
        })
    }

    #[tokio::test]
    async fn test_health_check() {
        assert_eq!(health_check().await, "ok");
    }

    #[tokio::test]
    async fn test_editing_assets() {
        let state = state(StaticGateway::new());

        let Json(assets) = add_asset(state.clone()).await;
        assert_eq!(assets.len(), 3);

        let Json(assets) = update_id(Path("2".to_string()), state.clone(), field("hydro-3")).await.unwrap();
        assert_eq!(assets[2].id, "hydro-3");

        let Json(assets) = update_type(Path("2".to_string()), state.clone(), field("wind")).await.unwrap();
        assert_eq!(assets[2].asset_type, AssetType::Wind);

        let Json(assets) = update_env(Path("2".to_string()), state.clone(), field("7,8"))
            .await
            .unwrap();
        assert_eq!(
            serde_json::to_value(&assets[2]).unwrap()["envHist"],
            json!({"windSpeed": [7.0, 8.0]})
        );

        let Json(assets) = update_efficiency(Path("0".to_string()), state.clone(), field("0.5,x"))
            .await
            .unwrap();
        assert_eq!(assets[0].efficiency_hist, vec![0.5]);

        let Json(assets) = remove_asset(Path("1".to_string()), state.clone()).await.unwrap();
        let ids: Vec<&str> = assets.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["solar-1", "hydro-3"]);

        let Json(listed) = list_assets(state).await;
        assert_eq!(listed, assets);
    }

    #[tokio::test]
    async fn test_rejects_bad_input() {
        let state = state(StaticGateway::new());

        let err = update_type(Path("0".to_string()), state.clone(), field("hydro")).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let err = remove_asset(Path("9".to_string()), state.clone()).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err = trigger_scoring(Path("forecast".to_string()), background(), state)
            .await
            .err()
            .unwrap();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unparseable_index_is_not_found() {
        let state = state(StaticGateway::new());

        for raw in ["-1", "abc"] {
            let err = remove_asset(Path(raw.to_string()), state.clone()).await.unwrap_err();
            assert_eq!(err.status(), StatusCode::NOT_FOUND);

            let response = update_id(Path(raw.to_string()), state.clone(), field("x"))
                .await
                .unwrap_err()
                .into_response();
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
            assert_eq!(
                body_json(response).await,
                json!({"error": format!("no asset at index `{}`", raw)})
            );
        }

        let Json(listed) = list_assets(state).await;
        assert_eq!(listed.len(), 2);
    }

    #[tokio::test]
    async fn test_trigger_and_wait() {
        let gateway = StaticGateway::new().respond(
            "asset_ttm_forecast",
            json!({"forecast": [{"id": "solar-1", "ttm_days": 41.5}]}),
        );
        let state = state(gateway);

        let response = trigger_scoring(
            Path("ttm".to_string()),
            Query(ScoringOptions { wait: true }),
            state.clone(),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["loading"], false);
        assert_eq!(body["sequence"], 1);
        assert_eq!(body["error"], Value::Null);
        assert_eq!(body["data"]["forecast"][0]["ttm_days"], 41.5);

        let Json(view) = get_dashboard(state).await;
        assert_eq!(view.ttm.content.unwrap()[0].id, "solar-1");
    }

    #[tokio::test]
    async fn test_waiting_on_failed_call_reports_error() {
        let gateway = StaticGateway::new().fail("asset_risk_score", "model warming up");
        let state = state(gateway);

        let response = trigger_scoring(
            Path("risk".to_string()),
            Query(ScoringOptions { wait: true }),
            state,
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["loading"], false);
        assert_eq!(body["error"], "model warming up");
        assert_eq!(body["data"], Value::Null);
    }

    #[tokio::test]
    async fn test_trigger_and_poll() {
        let gateway = StaticGateway::new().respond("asset_env_correlation", json!({"r": 0.5}));
        let state = state(gateway);

        let response = trigger_scoring(Path("correlation".to_string()), background(), state.clone())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(
            body_json(response).await,
            json!({"operation": "correlation", "sequence": 1})
        );

        let mut settled = None;
        for _ in 0..200 {
            let Json(slot) = scoring_state(Path("correlation".to_string()), state.clone())
                .await
                .unwrap();
            if let SlotState::Correlation(result) = slot {
                if !result.loading {
                    settled = Some(result);
                    break;
                }
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }

        let result = settled.expect("correlation call never settled");
        assert_eq!(result.error, None);
        assert_eq!(result.data.unwrap().0["r"], 0.5);

        let Json(view) = get_dashboard(state).await;
        assert!(view.correlation.content.unwrap().contains("\"r\": 0.5"));
    }
}
