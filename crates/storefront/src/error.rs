//! Unified error handling for the storefront engine.
//!
//! Validation failures are rejected before any remote call; authentication
//! failures carry the 401 / not-found distinction; transport failures on
//! read paths are swallowed into neutral empty values at the client
//! boundary and only mutations surface [`StoreError::Remote`] so the cart
//! synchronizer can roll back.

use thiserror::Error;

use keebcraft_core::ValidationError;

use crate::customize::CustomizeError;
use crate::remote::users::AuthFailure;
use crate::remote::RemoteError;

/// Engine-level error type for the storefront.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Client-side validation failed; no remote call was issued.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Customization draft was incomplete or unrecoverable.
    #[error("customization error: {0}")]
    Customize(#[from] CustomizeError),

    /// Authentication failed (wrong password vs unknown account).
    #[error("authentication error: {0}")]
    Auth(#[from] AuthFailure),

    /// Session identity is missing or disagrees with the user aggregate.
    #[error("no authenticated session")]
    Unauthenticated,

    /// A cart mutation referenced a line that is not in the local cart.
    #[error("no such cart line")]
    MissingLine,

    /// Remote call failed; any optimistic local change was rolled back.
    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),

    /// The persistent session store could not be read or written.
    #[error("session store error: {0}")]
    Session(#[from] std::io::Error),
}

/// Result type alias for `StoreError`.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        assert_eq!(
            StoreError::Unauthenticated.to_string(),
            "no authenticated session"
        );
        assert_eq!(StoreError::MissingLine.to_string(), "no such cart line");
        assert_eq!(
            StoreError::Validation(ValidationError::EmptyCredential).to_string(),
            "validation error: username and password must not be empty"
        );
    }
}
