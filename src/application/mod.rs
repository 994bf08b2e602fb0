// Application layer - Asset editing and scoring orchestration
pub mod asset_store;
pub mod async_slot;
pub mod dashboard_service;
pub mod scoring_gateway;
