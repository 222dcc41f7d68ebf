//! The storefront facade: configuration, session, clients, and the
//! engines wired together behind one handle.

use std::sync::Arc;

use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use tracing::{instrument, warn};

use keebcraft_core::{CartLine, Keyboard, KeyboardId, NewKeyboard, User, ValidationError};

use crate::cart::CartSynchronizer;
use crate::config::Config;
use crate::customize::Customization;
use crate::error::{Result, StoreError};
use crate::remote::{CatalogApi, CatalogClient, UserApi, UserClient};
use crate::search::SearchPipeline;
use crate::session::SessionStore;

/// Credentials are stripped to ASCII alphanumerics and spaces and capped
/// at this length before any remote call.
const CREDENTIAL_MAX_LEN: usize = 14;

/// One storefront instance: cheap to clone, all clones share state.
#[derive(Debug, Clone)]
pub struct StoreApp {
    inner: Arc<StoreAppInner>,
}

#[derive(Debug)]
struct StoreAppInner {
    config: Config,
    session: SessionStore,
    catalog: CatalogClient,
    users: UserClient,
}

impl StoreApp {
    /// Wire up a storefront from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the configured session file exists but cannot
    /// be read or parsed.
    pub fn new(config: Config) -> Result<Self> {
        let session = match &config.session_file {
            Some(path) => SessionStore::open(path.clone())?,
            None => SessionStore::in_memory(),
        };
        let catalog = CatalogClient::new(config.catalog_url.clone());
        let users = UserClient::new(config.user_url.clone(), session.clone());
        Ok(Self {
            inner: Arc::new(StoreAppInner {
                config,
                session,
                catalog,
                users,
            }),
        })
    }

    /// The shared session store.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    /// The catalog client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// A cart synchronizer bound to this storefront's session.
    #[must_use]
    pub fn synchronizer(&self) -> CartSynchronizer<UserClient> {
        CartSynchronizer::new(self.inner.users.clone(), self.inner.session.clone())
    }

    /// Spawn a search pipeline with the configured debounce window.
    #[must_use]
    pub fn search_pipeline(&self) -> SearchPipeline {
        SearchPipeline::spawn(self.inner.catalog.clone(), self.inner.config.search_debounce)
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Authenticate and record the session identity.
    ///
    /// # Errors
    ///
    /// `EmptyCredential` when either credential normalizes to nothing;
    /// otherwise the authentication failure (wrong password vs everything
    /// else).
    #[instrument(skip(self, password), fields(username = %username))]
    pub async fn login(&self, username: &str, password: &str) -> Result<User> {
        let (username, password) = normalized_credentials(username, password)?;
        let user = self.inner.users.login(&username, &password).await?;
        self.inner.session.set_credentials(&username, &password);
        Ok(user)
    }

    /// Create an account and record the session identity.
    ///
    /// # Errors
    ///
    /// `EmptyCredential`, or the remote failure from account creation.
    #[instrument(skip(self, password), fields(username = %username))]
    pub async fn signup(&self, username: &str, password: &str) -> Result<User> {
        let (username, password) = normalized_credentials(username, password)?;
        let user = self.inner.users.create_user(&username, &password).await?;
        self.inner.session.set_credentials(&username, &password);
        Ok(user)
    }

    /// Flip the remote login flag off and drop every session scalar.
    ///
    /// The local session is cleared even when the remote call fails: the
    /// shopper is logged out of this client regardless.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        if let (Some(username), Some(password)) =
            (self.inner.session.username(), self.inner.session.password())
        {
            if let Err(e) = self
                .inner
                .users
                .logout(&username, password.expose_secret())
                .await
            {
                warn!("remote logout failed: {e}");
            }
        }
        self.inner.session.clear();
    }

    /// Fetch the aggregate for the session identity.
    ///
    /// # Errors
    ///
    /// `Unauthenticated` when there is no session identity, the aggregate
    /// cannot be fetched, or the two disagree.
    pub async fn current_user(&self) -> Result<User> {
        let username = self
            .inner
            .session
            .username()
            .ok_or(StoreError::Unauthenticated)?;
        let user = self
            .inner
            .users
            .get_user(&username)
            .await
            .ok_or(StoreError::Unauthenticated)?;
        if user.username != username {
            return Err(StoreError::Unauthenticated);
        }
        Ok(user)
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// All catalog records; empty on failure.
    pub async fn list_keyboards(&self) -> Vec<Keyboard> {
        self.inner.catalog.list().await
    }

    /// One catalog record; absent when missing or unreachable.
    pub async fn get_keyboard(&self, id: KeyboardId) -> Option<Keyboard> {
        self.inner.catalog.get(id).await
    }

    /// One-shot name search; empty on failure. Interactive input goes
    /// through [`Self::search_pipeline`] instead.
    pub async fn search_keyboards(&self, term: &str) -> Vec<Keyboard> {
        self.inner.catalog.search(term).await
    }

    /// Records priced within `[from, to]` inclusive.
    ///
    /// # Errors
    ///
    /// `InvalidPriceRange` when either bound is non-positive or the range
    /// is inverted; no remote call is issued in that case.
    pub async fn filter_keyboards(&self, from: Decimal, to: Decimal) -> Result<Vec<Keyboard>> {
        if from <= Decimal::ZERO || to <= Decimal::ZERO || from > to {
            return Err(ValidationError::InvalidPriceRange.into());
        }
        Ok(self.inner.catalog.filter(from, to).await)
    }

    /// Add a catalog record (inventory management).
    ///
    /// # Errors
    ///
    /// Validation failure before any remote call, or the remote failure.
    pub async fn add_keyboard(&self, keyboard: &NewKeyboard) -> Result<Keyboard> {
        keyboard.validate()?;
        Ok(self.inner.catalog.create(keyboard).await?)
    }

    /// Replace a catalog record by id (inventory management).
    ///
    /// # Errors
    ///
    /// Validation failure before any remote call, or the remote failure.
    pub async fn replace_keyboard(&self, keyboard: &Keyboard) -> Result<Keyboard> {
        keyboard.validate()?;
        Ok(self.inner.catalog.replace(keyboard).await?)
    }

    /// Delete a catalog record (inventory management).
    ///
    /// # Errors
    ///
    /// The remote failure, if any.
    pub async fn delete_keyboard(&self, id: KeyboardId) -> Result<()> {
        Ok(self.inner.catalog.delete(id).await?)
    }

    // =========================================================================
    // Customization and orders
    // =========================================================================

    /// Start customizing a keyboard.
    ///
    /// When the canonical fetch fails, the draft is rebuilt from session
    /// scalars so earlier choices survive a transient outage.
    ///
    /// # Errors
    ///
    /// `MissingProduct` when the record is unavailable and no draft was
    /// ever persisted.
    pub async fn customize(&self, id: KeyboardId) -> Result<Customization> {
        match self.inner.catalog.get(id).await {
            Some(keyboard) => Ok(Customization::begin(
                self.inner.session.clone(),
                &keyboard,
            )),
            None => Ok(Customization::begin_from_session(
                self.inner.session.clone(),
            )?),
        }
    }

    /// Commit a completed customization into the user's cart.
    ///
    /// # Errors
    ///
    /// `IncompleteCustomization`, or any cart synchronizer failure (the
    /// optimistic append is rolled back).
    pub async fn commit_customization(
        &self,
        customization: &Customization,
        user: &mut User,
    ) -> Result<()> {
        let line = customization.commit()?;
        self.synchronizer().add_line(user, line).await
    }

    /// Past purchases for the session identity; empty on failure.
    ///
    /// # Errors
    ///
    /// `Unauthenticated` when there is no session identity.
    pub async fn order_history(&self) -> Result<Vec<CartLine>> {
        let username = self
            .inner
            .session
            .username()
            .ok_or(StoreError::Unauthenticated)?;
        Ok(self.inner.users.order_history(&username).await)
    }
}

/// Strip both credentials to ASCII alphanumerics and spaces, cap the
/// length, and reject a pair where either side normalizes to nothing.
fn normalized_credentials(username: &str, password: &str) -> Result<(String, String)> {
    let username = normalize_credential(username);
    let password = normalize_credential(password);
    if username.trim().is_empty() || password.trim().is_empty() {
        return Err(ValidationError::EmptyCredential.into());
    }
    Ok((username, password))
}

fn normalize_credential(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .take(CREDENTIAL_MAX_LEN)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_and_caps() {
        assert_eq!(normalize_credential("mika!@#"), "mika");
        assert_eq!(normalize_credential("key board"), "key board");
        assert_eq!(
            normalize_credential("abcdefghijklmnopqrstuvwxyz"),
            "abcdefghijklmn"
        );
        assert_eq!(normalize_credential("<script>"), "script");
    }

    #[test]
    fn test_normalized_credentials_rejects_empty() {
        assert!(matches!(
            normalized_credentials("!!!", "hunter"),
            Err(StoreError::Validation(ValidationError::EmptyCredential))
        ));
        assert!(matches!(
            normalized_credentials("mika", "   "),
            Err(StoreError::Validation(ValidationError::EmptyCredential))
        ));
        let (u, p) = normalized_credentials("mika", "hunter").expect("valid pair");
        assert_eq!((u.as_str(), p.as_str()), ("mika", "hunter"));
    }

    #[tokio::test]
    async fn test_login_rejects_empty_credentials_before_any_call() {
        let app = StoreApp::new(Config::default()).expect("in-memory app");
        let result = app.login("$$$", "hunter").await;
        assert!(matches!(
            result,
            Err(StoreError::Validation(ValidationError::EmptyCredential))
        ));
        assert_eq!(app.session().username(), None);
    }

    #[tokio::test]
    async fn test_filter_rejects_bad_ranges_before_any_call() {
        let app = StoreApp::new(Config::default()).expect("in-memory app");
        for (from, to) in [(0, 10), (10, 0), (50, 20), (-5, 10)] {
            let result = app
                .filter_keyboards(Decimal::from(from), Decimal::from(to))
                .await;
            assert!(matches!(
                result,
                Err(StoreError::Validation(ValidationError::InvalidPriceRange))
            ));
        }
    }

    #[tokio::test]
    async fn test_order_history_requires_identity() {
        let app = StoreApp::new(Config::default()).expect("in-memory app");
        assert!(matches!(
            app.order_history().await,
            Err(StoreError::Unauthenticated)
        ));
    }
}
