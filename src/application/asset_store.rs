// Asset store - ordered asset list with copy-then-replace updates
use crate::domain::asset::{
    parse_efficiency_list, parse_env_list, seed_assets, Asset, AssetType, EnvHistory,
};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("no asset at index {index} (store holds {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Every update builds a new list in which the edited record is a fresh
/// allocation and all other records are shared with the previous list.
#[derive(Debug, Clone, Default)]
pub struct AssetStore {
    assets: Vec<Arc<Asset>>,
}

impl AssetStore {
    pub fn new(assets: Vec<Asset>) -> Self {
        Self {
            assets: assets.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn seeded() -> Self {
        Self::new(seed_assets())
    }

    pub fn assets(&self) -> &[Arc<Asset>] {
        &self.assets
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Owned copy of the current list, used as a remote call payload
    pub fn snapshot(&self) -> Vec<Asset> {
        self.assets.iter().map(|a| Asset::clone(a)).collect()
    }

    pub fn set_id(&mut self, index: usize, value: String) -> Result<(), StoreError> {
        self.replace_with(index, |asset| Asset {
            id: value,
            ..asset.clone()
        })
    }

    pub fn set_type(&mut self, index: usize, value: AssetType) -> Result<(), StoreError> {
        self.replace_with(index, |asset| Asset {
            asset_type: value,
            ..asset.clone()
        })
    }

    pub fn set_efficiency_hist(&mut self, index: usize, raw: &str) -> Result<(), StoreError> {
        let history = parse_efficiency_list(raw);
        self.replace_with(index, |asset| Asset {
            efficiency_hist: history,
            ..asset.clone()
        })
    }

    /// Replaces the whole env history with values for the asset's current
    /// type, discarding a history recorded under the other metric.
    pub fn set_env_hist(&mut self, index: usize, raw: &str) -> Result<(), StoreError> {
        let values = parse_env_list(raw);
        self.replace_with(index, |asset| Asset {
            env_hist: Some(EnvHistory::new(asset.asset_type.env_metric(), values)),
            ..asset.clone()
        })
    }

    pub fn add_asset(&mut self) {
        let mut next = self.assets.clone();
        next.push(Arc::new(Asset::placeholder(self.assets.len() + 1)));
        self.assets = next;
    }

    pub fn remove_asset(&mut self, index: usize) -> Result<Asset, StoreError> {
        let removed = self.get(index)?.clone();
        self.assets = self
            .assets
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, a)| Arc::clone(a))
            .collect();
        Ok(Asset::clone(&removed))
    }

    fn get(&self, index: usize) -> Result<&Arc<Asset>, StoreError> {
        self.assets.get(index).ok_or(StoreError::IndexOutOfRange {
            index,
            len: self.assets.len(),
        })
    }

    fn replace_with<F>(&mut self, index: usize, update: F) -> Result<(), StoreError>
    where
        F: FnOnce(&Asset) -> Asset,
    {
        let updated = update(self.get(index)?);
        let mut next = self.assets.clone();
        next[index] = Arc::new(updated);
        self.assets = next;
        Ok(())
    }
}
