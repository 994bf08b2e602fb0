// HTTP scoring gateway implementation
use crate::application::scoring_gateway::{GatewayError, ScoringGateway};
use crate::domain::scoring::ScoringPayload;
use crate::infrastructure::config::GatewaySettings;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct HttpScoringGateway {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpScoringGateway {
    pub fn new(settings: &GatewaySettings) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build scoring HTTP client")?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            token: settings.token.clone(),
        })
    }

    fn function_url(&self, function: &str) -> String {
        format!("{}/{}", self.base_url, function)
    }
}

#[async_trait]
impl ScoringGateway for HttpScoringGateway {
    async fn call(&self, function: &str, payload: &ScoringPayload) -> Result<Value, GatewayError> {
        let mut request = self
            .client
            .post(self.function_url(function))
            .header(ACCEPT, "application/json")
            .json(payload);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| GatewayError::Transport {
            function: function.to_string(),
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!("{} returned {}: {}", function, status, body);
            return Err(GatewayError::Status {
                function: function.to_string(),
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| GatewayError::MalformedResponse {
                function: function.to_string(),
                reason: e.to_string(),
            })
    }
}

/// Human readable message for a failed call. Prefers the `message` or
/// `error` string of a JSON error body.
fn error_message(status: StatusCode, body: &str) -> String {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|json| {
        ["message", "error"]
            .iter()
            .find_map(|key| json.get(key).and_then(Value::as_str).map(str::to_string))
    });

    match from_json {
        Some(message) => message,
        None if body.trim().is_empty() => format!("scoring service returned {}", status),
        None => format!("scoring service returned {}: {}", status, body.trim()),
    }
}
