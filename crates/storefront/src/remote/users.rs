//! User store client: accounts, authentication, and cart endpoints.
//!
//! The removal endpoint carries the full cart line as the removal key (the
//! remote store has no per-line identity), and the quantity endpoints carry
//! the pre-mutation line: the server applies its own +1/-1 rather than
//! receiving an absolute value.

use std::future::Future;
use std::sync::Arc;

use reqwest::StatusCode;
use thiserror::Error;
use tracing::{instrument, warn};
use url::Url;

use keebcraft_core::{CartLine, User};

use super::{RemoteError, check_status, decode_json};
use crate::session::SessionStore;

/// Why an authentication attempt failed.
///
/// An HTTP 401 means the account exists but the password is wrong; every
/// other failure (unknown account, store unreachable) is deliberately
/// indistinguishable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthFailure {
    /// The account exists but the password did not match (HTTP 401).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The account was not found, or the store was unreachable.
    #[error("account not found or store unreachable")]
    NotFound,
}

impl AuthFailure {
    /// The session error scalar recorded for this failure.
    #[must_use]
    pub const fn error_scalar(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "401",
            Self::NotFound => "other",
        }
    }
}

/// The user store surface the engine consumes.
///
/// Implemented by [`UserClient`] for the real REST store and by in-memory
/// fakes in tests.
pub trait UserApi: Send + Sync {
    /// One aggregate by username; absent when missing or unreachable.
    fn get_user(&self, username: &str) -> impl Future<Output = Option<User>> + Send;

    /// Create an account with an empty cart and history, logged in.
    fn create_user(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = Result<User, RemoteError>> + Send;

    /// Authenticate, distinguishing wrong-password from everything else.
    fn login(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = Result<User, AuthFailure>> + Send;

    /// Flip the remote login flag off.
    fn logout(
        &self,
        username: &str,
        password: &str,
    ) -> impl Future<Output = Result<(), RemoteError>> + Send;

    /// Replace the remote aggregate wholesale.
    fn update_user(&self, user: &User) -> impl Future<Output = Result<(), RemoteError>> + Send;

    /// Delete an account.
    fn delete_user(&self, username: &str) -> impl Future<Output = Result<(), RemoteError>> + Send;

    /// Append a cart line.
    fn add_to_cart(
        &self,
        line: &CartLine,
        username: &str,
    ) -> impl Future<Output = Result<(), RemoteError>> + Send;

    /// Remove one cart line matching the payload by value.
    fn remove_from_cart(
        &self,
        line: &CartLine,
        username: &str,
    ) -> impl Future<Output = Result<(), RemoteError>> + Send;

    /// Increment the matching line's quantity by one.
    fn increase_quantity(
        &self,
        line: &CartLine,
        username: &str,
    ) -> impl Future<Output = Result<(), RemoteError>> + Send;

    /// Decrement the matching line's quantity by one.
    fn decrease_quantity(
        &self,
        line: &CartLine,
        username: &str,
    ) -> impl Future<Output = Result<(), RemoteError>> + Send;

    /// Push a batch of lines into the order history.
    fn push_order_history(
        &self,
        username: &str,
        lines: &[CartLine],
    ) -> impl Future<Output = Result<(), RemoteError>> + Send;

    /// Empty the remote cart.
    fn clear_cart(&self, username: &str) -> impl Future<Output = Result<(), RemoteError>> + Send;

    /// Past purchases; empty on failure.
    fn order_history(&self, username: &str) -> impl Future<Output = Vec<CartLine>> + Send;
}

/// REST client for the remote user store.
#[derive(Debug, Clone)]
pub struct UserClient {
    inner: Arc<UserClientInner>,
}

#[derive(Debug)]
struct UserClientInner {
    client: reqwest::Client,
    base: Url,
    session: SessionStore,
}

impl UserClient {
    /// Create a client rooted at the user-store base URL
    /// (e.g. `http://localhost:8080/user`). The session store receives the
    /// error scalar whenever a call fails.
    #[must_use]
    pub fn new(base: Url, session: SessionStore) -> Self {
        Self {
            inner: Arc::new(UserClientInner {
                client: reqwest::Client::new(),
                base,
                session,
            }),
        }
    }

    fn url(&self, suffix: &str) -> String {
        format!("{}{suffix}", self.inner.base)
    }

    fn user_url(&self, username: &str, suffix: &str) -> String {
        format!(
            "{}/{}{suffix}",
            self.inner.base,
            urlencoding::encode(username)
        )
    }

    /// Record the generic error scalar and log; the caller decides whether
    /// the failure is surfaced (mutations) or swallowed (reads).
    fn note_failure(&self, what: &str, e: &RemoteError) {
        self.inner.session.set_error_status("other");
        warn!("{what} failed: {e}");
    }

    async fn put_line(
        &self,
        url: String,
        line: &CartLine,
        what: &str,
    ) -> Result<(), RemoteError> {
        let result = async {
            let response = self.inner.client.put(&url).json(line).send().await?;
            check_status(&response)
        }
        .await;
        if let Err(e) = &result {
            self.note_failure(what, e);
        }
        result
    }
}

impl UserApi for UserClient {
    #[instrument(skip(self), fields(username = %username))]
    async fn get_user(&self, username: &str) -> Option<User> {
        let url = self.user_url(username, "");
        let result = async {
            let response = self.inner.client.get(&url).send().await?;
            decode_json::<User>(response).await
        }
        .await;

        match result {
            Ok(user) => Some(user),
            Err(e) => {
                self.note_failure("get user", &e);
                None
            }
        }
    }

    #[instrument(skip(self, password), fields(username = %username))]
    async fn create_user(&self, username: &str, password: &str) -> Result<User, RemoteError> {
        let user = User::new(username.to_string(), password.to_string());
        let result = async {
            let response = self
                .inner
                .client
                .post(self.url(""))
                .json(&user)
                .send()
                .await?;
            decode_json(response).await
        }
        .await;
        if let Err(e) = &result {
            self.note_failure("create user", e);
        }
        result
    }

    #[instrument(skip(self, password), fields(username = %username))]
    async fn login(&self, username: &str, password: &str) -> Result<User, AuthFailure> {
        let url = self.url(&format!(
            "/login/username={}&password={}",
            urlencoding::encode(username),
            urlencoding::encode(password)
        ));

        let response = match self.inner.client.put(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("login transport failed: {e}");
                let failure = AuthFailure::NotFound;
                self.inner.session.set_error_status(failure.error_scalar());
                return Err(failure);
            }
        };

        // The one distinguished failure: wrong password for a known account.
        let failure = if response.status() == StatusCode::UNAUTHORIZED {
            AuthFailure::InvalidCredentials
        } else {
            AuthFailure::NotFound
        };

        match decode_json::<User>(response).await {
            Ok(user) => {
                self.inner.session.remove(crate::session::keys::ERROR_STATUS);
                Ok(user)
            }
            Err(e) => {
                warn!("login failed: {e}");
                self.inner.session.set_error_status(failure.error_scalar());
                Err(failure)
            }
        }
    }

    #[instrument(skip(self, password), fields(username = %username))]
    async fn logout(&self, username: &str, password: &str) -> Result<(), RemoteError> {
        let url = self.url(&format!(
            "/logout/username={}&password={}",
            urlencoding::encode(username),
            urlencoding::encode(password)
        ));
        let result = async {
            let response = self.inner.client.put(&url).send().await?;
            check_status(&response)
        }
        .await;
        if let Err(e) = &result {
            self.note_failure("logout", e);
        }
        result
    }

    #[instrument(skip(self, user), fields(username = %user.username))]
    async fn update_user(&self, user: &User) -> Result<(), RemoteError> {
        let result = async {
            let response = self
                .inner
                .client
                .put(self.url(""))
                .json(user)
                .send()
                .await?;
            check_status(&response)
        }
        .await;
        if let Err(e) = &result {
            self.note_failure("update user", e);
        }
        result
    }

    #[instrument(skip(self), fields(username = %username))]
    async fn delete_user(&self, username: &str) -> Result<(), RemoteError> {
        let url = self.user_url(username, "");
        let result = async {
            let response = self.inner.client.delete(&url).send().await?;
            check_status(&response)
        }
        .await;
        if let Err(e) = &result {
            self.note_failure("delete user", e);
        }
        result
    }

    #[instrument(skip(self, line), fields(username = %username, id = %line.id))]
    async fn add_to_cart(&self, line: &CartLine, username: &str) -> Result<(), RemoteError> {
        self.put_line(self.user_url(username, "/cart"), line, "add to cart")
            .await
    }

    #[instrument(skip(self, line), fields(username = %username, id = %line.id))]
    async fn remove_from_cart(&self, line: &CartLine, username: &str) -> Result<(), RemoteError> {
        // DELETE with the full line as the body: the removal key is the
        // complete value snapshot.
        let url = self.user_url(username, "/removeFromCart");
        let result = async {
            let response = self.inner.client.delete(&url).json(line).send().await?;
            check_status(&response)
        }
        .await;
        if let Err(e) = &result {
            self.note_failure("remove from cart", e);
        }
        result
    }

    #[instrument(skip(self, line), fields(username = %username, id = %line.id))]
    async fn increase_quantity(&self, line: &CartLine, username: &str) -> Result<(), RemoteError> {
        self.put_line(
            self.user_url(username, "/cart/increaseQuantity"),
            line,
            "increase quantity",
        )
        .await
    }

    #[instrument(skip(self, line), fields(username = %username, id = %line.id))]
    async fn decrease_quantity(&self, line: &CartLine, username: &str) -> Result<(), RemoteError> {
        self.put_line(
            self.user_url(username, "/cart/decreaseQuantity"),
            line,
            "decrease quantity",
        )
        .await
    }

    #[instrument(skip(self, lines), fields(username = %username, lines = lines.len()))]
    async fn push_order_history(
        &self,
        username: &str,
        lines: &[CartLine],
    ) -> Result<(), RemoteError> {
        let url = self.user_url(username, "/orders/addToOrderHistory");
        let result = async {
            let response = self.inner.client.post(&url).json(&lines).send().await?;
            check_status(&response)
        }
        .await;
        if let Err(e) = &result {
            self.note_failure("push order history", e);
        }
        result
    }

    #[instrument(skip(self), fields(username = %username))]
    async fn clear_cart(&self, username: &str) -> Result<(), RemoteError> {
        let url = self.user_url(username, "/clearCart");
        let result = async {
            let response = self.inner.client.delete(&url).send().await?;
            check_status(&response)
        }
        .await;
        if let Err(e) = &result {
            self.note_failure("clear cart", e);
        }
        result
    }

    #[instrument(skip(self), fields(username = %username))]
    async fn order_history(&self, username: &str) -> Vec<CartLine> {
        let url = self.user_url(username, "/orders");
        let result = async {
            let response = self.inner.client.get(&url).send().await?;
            decode_json::<User>(response).await
        }
        .await;

        match result {
            Ok(user) => user.order_history,
            Err(e) => {
                self.note_failure("get order history", &e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_failure_scalars() {
        assert_eq!(AuthFailure::InvalidCredentials.error_scalar(), "401");
        assert_eq!(AuthFailure::NotFound.error_scalar(), "other");
    }

    #[test]
    fn test_auth_failure_display() {
        assert_eq!(
            AuthFailure::InvalidCredentials.to_string(),
            "invalid credentials"
        );
    }
}
