// Domain layer - Asset records, scoring results and the dashboard view
pub mod asset;
pub mod dashboard;
pub mod numeric;
pub mod scoring;
