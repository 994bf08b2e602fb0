// HTTP error mapping
use crate::application::asset_store::StoreError;
use crate::domain::asset::UnknownAssetType;
use crate::domain::scoring::UnknownOperation;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    AssetType(#[from] UnknownAssetType),

    #[error(transparent)]
    Operation(#[from] UnknownOperation),

    /// Path segment that is not a non-negative integer
    #[error("no asset at index `{0}`")]
    InvalidIndex(String),
}

/// Parse the `:index` path segment. Anything that cannot name a position
/// is reported the same way as an index past the end of the list.
pub fn parse_index(raw: &str) -> Result<usize, ApiError> {
    raw.parse::<usize>()
        .map_err(|_| ApiError::InvalidIndex(raw.to_string()))
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Store(StoreError::IndexOutOfRange { .. }) => StatusCode::NOT_FOUND,
            ApiError::AssetType(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Operation(_) | ApiError::InvalidIndex(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::debug!("Request rejected with {}: {}", status, self);
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
