// Async slot - loading/data/error state for one remote operation
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Display;
use std::future::Future;
use tokio::sync::Mutex;

/// Observable state of a slot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AsyncResult<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
    /// Number of runs issued so far; the latest one owns the slot
    pub sequence: u64,
    pub updated_at: Option<DateTime<Utc>>,
}

impl<T> Default for AsyncResult<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
            sequence: 0,
            updated_at: None,
        }
    }
}

/// Tracks one in-flight operation at a time.
///
/// Runs are numbered as they are issued. A completion only lands if its
/// number is still the latest issued, so overlapping runs resolve to the
/// most recently started one no matter which finishes first. A failure keeps
/// whatever data the slot already held.
pub struct AsyncSlot<T> {
    name: &'static str,
    state: Mutex<AsyncResult<T>>,
}

impl<T: Clone> AsyncSlot<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: Mutex::new(AsyncResult::default()),
        }
    }

    pub async fn snapshot(&self) -> AsyncResult<T> {
        self.state.lock().await.clone()
    }

    /// Mark the slot loading and hand out the ticket for this run
    pub async fn begin(&self) -> u64 {
        let mut state = self.state.lock().await;
        state.sequence += 1;
        state.loading = true;
        state.error = None;
        state.sequence
    }

    /// Record the outcome of run `ticket`. Returns false if a newer run has
    /// been issued since, in which case the outcome is dropped.
    pub async fn complete<E: Display>(&self, ticket: u64, outcome: Result<T, E>) -> bool {
        let mut state = self.state.lock().await;
        if ticket != state.sequence {
            tracing::debug!(
                "Discarding stale {} completion {} (latest is {})",
                self.name,
                ticket,
                state.sequence
            );
            return false;
        }

        match outcome {
            Ok(data) => state.data = Some(data),
            Err(e) => {
                let message = e.to_string();
                tracing::debug!("{} call {} settled with error: {}", self.name, ticket, message);
                state.error = Some(message);
            }
        }
        state.loading = false;
        state.updated_at = Some(Utc::now());
        true
    }

    /// Drive `operation` to completion through this slot
    pub async fn run<F, E>(&self, operation: F) -> bool
    where
        F: Future<Output = Result<T, E>>,
        E: Display,
    {
        let ticket = self.begin().await;
        let outcome = operation.await;
        self.complete(ticket, outcome).await
    }
}
