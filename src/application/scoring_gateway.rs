// Gateway trait for the remote scoring service
use crate::domain::scoring::ScoringPayload;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GatewayError {
    /// The request never produced a response
    #[error("{function} request failed: {message}")]
    Transport { function: String, message: String },

    /// The service answered with a non-success status; `message` is what it said
    #[error("{message}")]
    Status {
        function: String,
        status: u16,
        message: String,
    },

    #[error("malformed {function} response: {reason}")]
    MalformedResponse { function: String, reason: String },
}

impl GatewayError {
    /// Remote function the failed call was addressed to
    pub fn function(&self) -> &str {
        match self {
            GatewayError::Transport { function, .. }
            | GatewayError::Status { function, .. }
            | GatewayError::MalformedResponse { function, .. } => function,
        }
    }

    /// HTTP status, when the service answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[async_trait]
pub trait ScoringGateway: Send + Sync {
    /// Invoke remote function `function` with `payload` and return its raw JSON answer
    async fn call(&self, function: &str, payload: &ScoringPayload) -> Result<Value, GatewayError>;
}

/// Deserialize a raw response into the typed result for `function`
pub fn decode_response<T: DeserializeOwned>(function: &str, response: Value) -> Result<T, GatewayError> {
    serde_json::from_value(response).map_err(|e| GatewayError::MalformedResponse {
        function: function.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
pub mod fake {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory gateway answering from a fixed table and recording every call
    #[derive(Default)]
    pub struct StaticGateway {
        responses: HashMap<String, Result<Value, GatewayError>>,
        calls: Mutex<Vec<(String, ScoringPayload)>>,
    }

    impl StaticGateway {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn respond(mut self, function: &str, response: Value) -> Self {
            self.responses.insert(function.to_string(), Ok(response));
            self
        }

        pub fn fail(mut self, function: &str, message: &str) -> Self {
            self.responses.insert(
                function.to_string(),
                Err(GatewayError::Status {
                    function: function.to_string(),
                    status: 500,
                    message: message.to_string(),
                }),
            );
            self
        }

        pub fn calls(&self) -> Vec<(String, ScoringPayload)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ScoringGateway for StaticGateway {
        async fn call(&self, function: &str, payload: &ScoringPayload) -> Result<Value, GatewayError> {
            self.calls
                .lock()
                .unwrap()
                .push((function.to_string(), payload.clone()));

            self.responses.get(function).cloned().unwrap_or_else(|| {
                Err(GatewayError::Transport {
                    function: function.to_string(),
                    message: "no response configured".to_string(),
                })
            })
        }
    }
}
