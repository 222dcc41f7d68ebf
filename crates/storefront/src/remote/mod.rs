//! Thin async REST wrappers over the remote catalog and user stores.
//!
//! # Transport policy
//!
//! Read-type calls (`list`, `get`, `search`, `filter`, `get_user`,
//! `order_history`) never surface a transport error: failures are logged
//! and converted to a neutral empty/absent value, so callers cannot
//! distinguish "not found" from "network down". Mutations return a
//! `Result` so the cart synchronizer can roll back its optimistic local
//! change. Authentication keeps the one special case: an HTTP 401 is
//! distinguished from every other failure and recorded in the session
//! error scalar.

pub mod catalog;
pub mod users;

pub use catalog::{CatalogApi, CatalogClient};
pub use users::{AuthFailure, UserApi, UserClient};

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors that can occur when talking to a remote store.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote responded with a non-success status.
    #[error("remote returned status {0}")]
    Status(u16),

    /// Response body was not the expected JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Check the status and decode a JSON body, reading the text first so a
/// decode failure can be logged with the offending payload.
pub(crate) async fn decode_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, RemoteError> {
    let status = response.status();
    if !status.is_success() {
        return Err(RemoteError::Status(status.as_u16()));
    }

    let text = response.text().await?;
    match serde_json::from_str(&text) {
        Ok(value) => Ok(value),
        Err(e) => {
            tracing::error!(
                body = %text.chars().take(500).collect::<String>(),
                "failed to parse remote response: {e}"
            );
            Err(RemoteError::Parse(e))
        }
    }
}

/// Check the status of a response whose body the caller does not need.
pub(crate) fn check_status(response: &reqwest::Response) -> Result<(), RemoteError> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(RemoteError::Status(status.as_u16()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_display() {
        assert_eq!(
            RemoteError::Status(502).to_string(),
            "remote returned status 502"
        );
    }
}
