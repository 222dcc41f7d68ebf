//! Catalog store client: keyboard CRUD, name search, and price filtering.

use std::future::Future;
use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{instrument, warn};
use url::Url;

use keebcraft_core::{Keyboard, KeyboardId, NewKeyboard};

use super::{RemoteError, check_status, decode_json};

/// The catalog store surface the engine consumes.
///
/// Implemented by [`CatalogClient`] for the real REST store and by
/// in-memory fakes in tests. Reads degrade to empty/absent values;
/// mutations surface their outcome.
pub trait CatalogApi: Send + Sync {
    /// All catalog records; empty on failure.
    fn list(&self) -> impl Future<Output = Vec<Keyboard>> + Send;

    /// One record by id; absent when missing or unreachable.
    fn get(&self, id: KeyboardId) -> impl Future<Output = Option<Keyboard>> + Send;

    /// Records whose name contains `term`; empty on failure.
    fn search(&self, term: &str) -> impl Future<Output = Vec<Keyboard>> + Send;

    /// Records priced within `[from, to]` inclusive; empty on failure.
    fn filter(&self, from: Decimal, to: Decimal) -> impl Future<Output = Vec<Keyboard>> + Send;

    /// Create a record; the store assigns the id.
    fn create(
        &self,
        keyboard: &NewKeyboard,
    ) -> impl Future<Output = Result<Keyboard, RemoteError>> + Send;

    /// Replace a record by its id.
    fn replace(
        &self,
        keyboard: &Keyboard,
    ) -> impl Future<Output = Result<Keyboard, RemoteError>> + Send;

    /// Delete a record by id.
    fn delete(&self, id: KeyboardId) -> impl Future<Output = Result<(), RemoteError>> + Send;
}

/// REST client for the remote catalog store.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

#[derive(Debug)]
struct CatalogClientInner {
    client: reqwest::Client,
    base: Url,
}

impl CatalogClient {
    /// Create a client rooted at the catalog base URL
    /// (e.g. `http://localhost:8080/keyboards`).
    #[must_use]
    pub fn new(base: Url) -> Self {
        Self {
            inner: Arc::new(CatalogClientInner {
                client: reqwest::Client::new(),
                base,
            }),
        }
    }

    fn url(&self, suffix: &str) -> String {
        format!("{}{suffix}", self.inner.base)
    }

    /// GET a list endpoint, degrading to an empty vec on any failure.
    async fn fetch_list(&self, url: String, what: &str) -> Vec<Keyboard> {
        let result = async {
            let response = self.inner.client.get(&url).send().await?;
            decode_json::<Vec<Keyboard>>(response).await
        }
        .await;

        match result {
            Ok(keyboards) => keyboards,
            Err(e) => {
                warn!("{what} failed: {e}");
                Vec::new()
            }
        }
    }
}

impl CatalogApi for CatalogClient {
    #[instrument(skip(self))]
    async fn list(&self) -> Vec<Keyboard> {
        self.fetch_list(self.url(""), "list keyboards").await
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get(&self, id: KeyboardId) -> Option<Keyboard> {
        let url = self.url(&format!("/{id}"));
        let result = async {
            let response = self.inner.client.get(&url).send().await?;
            decode_json::<Keyboard>(response).await
        }
        .await;

        match result {
            Ok(keyboard) => Some(keyboard),
            Err(e) => {
                warn!("get keyboard id={id} failed: {e}");
                None
            }
        }
    }

    #[instrument(skip(self), fields(term = %term))]
    async fn search(&self, term: &str) -> Vec<Keyboard> {
        let url = self.url(&format!("/?name={}", urlencoding::encode(term)));
        self.fetch_list(url, "search keyboards").await
    }

    #[instrument(skip(self))]
    async fn filter(&self, from: Decimal, to: Decimal) -> Vec<Keyboard> {
        let url = self.url(&format!("/filter/fromPrice={from}&toPrice={to}"));
        self.fetch_list(url, "filter keyboards").await
    }

    #[instrument(skip(self, keyboard), fields(name = %keyboard.name))]
    async fn create(&self, keyboard: &NewKeyboard) -> Result<Keyboard, RemoteError> {
        let response = self
            .inner
            .client
            .post(self.url(""))
            .json(keyboard)
            .send()
            .await?;
        decode_json(response).await
    }

    #[instrument(skip(self, keyboard), fields(id = %keyboard.id))]
    async fn replace(&self, keyboard: &Keyboard) -> Result<Keyboard, RemoteError> {
        let response = self
            .inner
            .client
            .put(self.url(""))
            .json(keyboard)
            .send()
            .await?;
        decode_json(response).await
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete(&self, id: KeyboardId) -> Result<(), RemoteError> {
        let url = self.url(&format!("/{id}"));
        let response = self.inner.client.delete(&url).send().await?;
        check_status(&response)
    }
}
