//! Timeout-bounded cache and network calls
//!
//! Interactors never see a raw failure: cache results are folded into a
//! [`DataState`] by [`handle_cache_result`], network results are logged.

use std::future::Future;
use std::time::Duration;

use crate::error::{Error, ErrorKind, Result};
use crate::state::{DataState, MessageType, Response, StateEvent, UiComponentType};

pub const CACHE_TIMEOUT: Duration = Duration::from_secs(2);
pub const NETWORK_TIMEOUT: Duration = Duration::from_secs(6);

pub const CACHE_ERROR_UNKNOWN: &str = "Unknown cache error";
pub const CACHE_ERROR_TIMEOUT: &str = "Cache timeout";
pub const NETWORK_ERROR_UNKNOWN: &str = "Unknown network error";
pub const NETWORK_ERROR_TIMEOUT: &str = "Network timeout: check your connection";

/// Upper bounds for a single cache or network call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallTimeouts {
    pub cache: Duration,
    pub network: Duration,
}

impl Default for CallTimeouts {
    fn default() -> Self {
        Self {
            cache: CACHE_TIMEOUT,
            network: NETWORK_TIMEOUT,
        }
    }
}

/// Run a cache call, turning an overrun into [`Error::Timeout`].
pub async fn safe_cache_call<T, F>(timeout: Duration, call: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    bounded(ErrorKind::Cache, timeout, call).await
}

/// Run a network call, turning an overrun into [`Error::Timeout`].
pub async fn safe_api_call<T, F>(timeout: Duration, call: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    bounded(ErrorKind::Network, timeout, call).await
}

async fn bounded<T, F>(kind: ErrorKind, after: Duration, call: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::time::timeout(after, call)
        .await
        .unwrap_or(Err(Error::Timeout { kind, after }))
}

/// Short, user-facing reason for a failed call.
pub const fn failure_reason(error: &Error) -> &'static str {
    match (error.kind(), error.is_timeout()) {
        (ErrorKind::Network, true) => NETWORK_ERROR_TIMEOUT,
        (ErrorKind::Network, false) => NETWORK_ERROR_UNKNOWN,
        (_, true) => CACHE_ERROR_TIMEOUT,
        (_, false) => CACHE_ERROR_UNKNOWN,
    }
}

/// Fold a cache result into a [`DataState`].
///
/// Failures become an error dialog whose message is the event's error info
/// followed by the failure reason.
pub fn handle_cache_result<T, V>(
    result: Result<T>,
    event: StateEvent,
    on_success: impl FnOnce(T, StateEvent) -> DataState<V>,
) -> DataState<V> {
    match result {
        Ok(value) => on_success(value, event),
        Err(error) => {
            tracing::warn!(event = event.event_name(), "Cache call failed: {error}");
            let message = format!(
                "{}\n\nReason: {}",
                event.error_info(),
                failure_reason(&error)
            );
            DataState::error(
                Response::new(message, UiComponentType::Dialog, MessageType::Error),
                event,
            )
        }
    }
}
