// Dashboard controller - owns the asset store and the three scoring slots
use crate::application::asset_store::{AssetStore, StoreError};
use crate::application::async_slot::{AsyncResult, AsyncSlot};
use crate::application::scoring_gateway::{decode_response, GatewayError, ScoringGateway};
use crate::domain::asset::{Asset, AssetType};
use crate::domain::dashboard::{
    DashboardSummary, DashboardView, EditorRow, Panel, RiskRow, TtmBar, SUBTITLE, TITLE,
};
use crate::domain::scoring::{
    CorrelationReport, RiskReport, ScoringOperation, ScoringPayload, TtmForecast,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Current state of one slot, whichever result type it carries
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SlotState {
    Risk(AsyncResult<RiskReport>),
    Ttm(AsyncResult<TtmForecast>),
    Correlation(AsyncResult<CorrelationReport>),
}

pub struct DashboardController {
    store: RwLock<AssetStore>,
    gateway: Arc<dyn ScoringGateway>,
    risk: Arc<AsyncSlot<RiskReport>>,
    ttm: Arc<AsyncSlot<TtmForecast>>,
    correlation: Arc<AsyncSlot<CorrelationReport>>,
}

impl DashboardController {
    /// Controller starting from the two seed assets
    pub fn new(gateway: Arc<dyn ScoringGateway>) -> Self {
        Self::with_store(gateway, AssetStore::seeded())
    }

    pub fn with_store(gateway: Arc<dyn ScoringGateway>, store: AssetStore) -> Self {
        Self {
            store: RwLock::new(store),
            gateway,
            risk: Arc::new(AsyncSlot::new("risk")),
            ttm: Arc::new(AsyncSlot::new("ttm")),
            correlation: Arc::new(AsyncSlot::new("correlation")),
        }
    }

    pub async fn assets(&self) -> Vec<Asset> {
        self.store.read().await.snapshot()
    }

    pub async fn set_id(&self, index: usize, value: String) -> Result<Vec<Asset>, StoreError> {
        self.edit(index, |store| store.set_id(index, value)).await
    }

    pub async fn set_type(&self, index: usize, value: AssetType) -> Result<Vec<Asset>, StoreError> {
        self.edit(index, |store| store.set_type(index, value)).await
    }

    pub async fn set_efficiency_hist(&self, index: usize, raw: &str) -> Result<Vec<Asset>, StoreError> {
        self.edit(index, |store| store.set_efficiency_hist(index, raw)).await
    }

    pub async fn set_env_hist(&self, index: usize, raw: &str) -> Result<Vec<Asset>, StoreError> {
        self.edit(index, |store| store.set_env_hist(index, raw)).await
    }

    pub async fn add_asset(&self) -> Vec<Asset> {
        let mut store = self.store.write().await;
        store.add_asset();
        tracing::debug!("Added asset, store now holds {}", store.len());
        store.snapshot()
    }

    pub async fn remove_asset(&self, index: usize) -> Result<Vec<Asset>, StoreError> {
        let mut store = self.store.write().await;
        let removed = store.remove_asset(index)?;
        tracing::debug!("Removed asset {} at index {}", removed.id, index);
        Ok(store.snapshot())
    }

    async fn edit<F>(&self, index: usize, update: F) -> Result<Vec<Asset>, StoreError>
    where
        F: FnOnce(&mut AssetStore) -> Result<(), StoreError>,
    {
        let mut store = self.store.write().await;
        update(&mut *store)?;
        tracing::debug!("Updated asset at index {}", index);
        Ok(store.snapshot())
    }

    /// Start `operation` against the current assets without waiting for it.
    /// Returns the sequence number issued to the call.
    pub async fn trigger(&self, operation: ScoringOperation) -> u64 {
        let assets = self.assets().await;
        match operation {
            ScoringOperation::Risk => self.spawn_call(operation, &self.risk, assets).await,
            ScoringOperation::Ttm => self.spawn_call(operation, &self.ttm, assets).await,
            ScoringOperation::Correlation => {
                self.spawn_call(operation, &self.correlation, assets).await
            }
        }
    }

    /// Run `operation` against the current assets and wait for its slot to settle
    pub async fn score(&self, operation: ScoringOperation) {
        let assets = self.assets().await;
        let gateway = self.gateway.as_ref();
        match operation {
            ScoringOperation::Risk => {
                self.risk.run(fetch(gateway, operation, assets)).await;
            }
            ScoringOperation::Ttm => {
                self.ttm.run(fetch(gateway, operation, assets)).await;
            }
            ScoringOperation::Correlation => {
                self.correlation.run(fetch(gateway, operation, assets)).await;
            }
        }
    }

    async fn spawn_call<T>(
        &self,
        operation: ScoringOperation,
        slot: &Arc<AsyncSlot<T>>,
        assets: Vec<Asset>,
    ) -> u64
    where
        T: DeserializeOwned + Clone + Send + 'static,
    {
        let ticket = slot.begin().await;
        let slot = Arc::clone(slot);
        let gateway = Arc::clone(&self.gateway);

        tokio::spawn(async move {
            let outcome = fetch::<T>(gateway.as_ref(), operation, assets).await;
            slot.complete(ticket, outcome).await;
        });

        ticket
    }

    pub async fn slot_state(&self, operation: ScoringOperation) -> SlotState {
        match operation {
            ScoringOperation::Risk => SlotState::Risk(self.risk.snapshot().await),
            ScoringOperation::Ttm => SlotState::Ttm(self.ttm.snapshot().await),
            ScoringOperation::Correlation => {
                SlotState::Correlation(self.correlation.snapshot().await)
            }
        }
    }

    pub async fn view(&self) -> DashboardView {
        let store = self.store.read().await;
        let summary = DashboardSummary::from_assets(store.assets());
        let assets = store
            .assets()
            .iter()
            .enumerate()
            .map(|(i, a)| EditorRow::new(i, a))
            .collect();
        drop(store);

        let risk = self.risk.snapshot().await;
        let ttm = self.ttm.snapshot().await;
        let correlation = self.correlation.snapshot().await;

        DashboardView {
            title: TITLE.to_string(),
            subtitle: SUBTITLE.to_string(),
            kpis: summary.kpis(),
            summary,
            assets,
            risk: Panel::new(
                "Risk Scores",
                "Click “Score Risk” to fetch.",
                risk.loading,
                risk.error,
                risk.data
                    .map(|report| report.assets.iter().map(RiskRow::from).collect()),
            ),
            ttm: Panel::new(
                "TTM Forecast (days)",
                "Click “TTM Forecast”.",
                ttm.loading,
                ttm.error,
                ttm.data
                    .map(|forecast| forecast.forecast.iter().map(TtmBar::from).collect()),
            ),
            correlation: Panel::new(
                "Env Correlations",
                "Click “Correlate”.",
                correlation.loading,
                correlation.error,
                correlation.data.map(|report| report.pretty()),
            ),
        }
    }
}

async fn fetch<T: DeserializeOwned>(
    gateway: &dyn ScoringGateway,
    operation: ScoringOperation,
    assets: Vec<Asset>,
) -> Result<T, GatewayError> {
    let function = operation.function_name();
    let payload = ScoringPayload { assets };

    tracing::info!("Calling {} with {} assets", function, payload.assets.len());
    let response = gateway
        .call(function, &payload)
        .await
        .inspect_err(log_call_failure)?;
    decode_response(function, response).inspect_err(log_call_failure)
}

fn log_call_failure(err: &GatewayError) {
    match err.status() {
        Some(status) => tracing::warn!("{} answered {}: {}", err.function(), status, err),
        None => tracing::warn!("{} failed: {}", err.function(), err),
    }
}
