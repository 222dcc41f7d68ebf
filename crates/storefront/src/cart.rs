//! Cart mutations: optimistic local updates reconciled with the remote
//! user store.
//!
//! Every mutation walks the same states: Idle until called, Pending while
//! the optimistic local change is applied and the remote call is in
//! flight, then Confirmed (local state kept as-is) or Failed. On failure
//! the inverse local operation is replayed before the error surfaces, so
//! the local cart never silently runs ahead of the server, and the session
//! error scalar is recorded for the next view.
//!
//! Concurrent mutations to the same line are unordered at the remote
//! store; callers must not assume serialization across awaits.

use tracing::instrument;
use uuid::Uuid;

use keebcraft_core::{CartLine, User, ValidationError};

use crate::error::{Result, StoreError};
use crate::remote::UserApi;
use crate::session::{SessionStore, keys};

/// The single authority for mutating a user's cart.
#[derive(Debug, Clone)]
pub struct CartSynchronizer<U> {
    users: U,
    session: SessionStore,
}

impl<U: UserApi> CartSynchronizer<U> {
    /// Create a synchronizer over a user-store client and the session.
    pub const fn new(users: U, session: SessionStore) -> Self {
        Self { users, session }
    }

    /// The session and the aggregate must agree on the identity, or the
    /// mutation is treated as unauthenticated.
    fn ensure_identity(&self, user: &User) -> Result<()> {
        if user.username.is_empty() {
            return Err(ValidationError::EmptyCredential.into());
        }
        match self.session.username() {
            Some(username) if username == user.username => Ok(()),
            _ => Err(StoreError::Unauthenticated),
        }
    }

    fn fail(&self, e: crate::remote::RemoteError) -> StoreError {
        self.session.set_error_status("other");
        e.into()
    }

    /// Append a freshly committed customization to the cart.
    ///
    /// # Errors
    ///
    /// Rejects an empty username or a line whose quantity is not 1 before
    /// any remote call; surfaces the remote error after rolling back the
    /// optimistic append.
    #[instrument(skip(self, user, line), fields(username = %user.username, id = %line.id))]
    pub async fn add_line(&self, user: &mut User, line: CartLine) -> Result<()> {
        self.ensure_identity(user)?;
        if line.quantity != 1 {
            return Err(ValidationError::NewLineQuantity.into());
        }

        user.cart.push(line.clone());
        if let Err(e) = self.users.add_to_cart(&line, &user.username).await {
            user.cart.pop();
            return Err(self.fail(e));
        }
        Ok(())
    }

    /// Remove the line with the given local key.
    ///
    /// Locally the synthetic key pins down exactly one line even among
    /// value-identical duplicates; the wire payload is the full-value line,
    /// which is all the remote store can match on.
    ///
    /// # Errors
    ///
    /// `MissingLine` when the key is not in the local cart; the remote
    /// error after reinserting the line at its old position.
    #[instrument(skip(self, user), fields(username = %user.username))]
    pub async fn remove_line(&self, user: &mut User, line_key: Uuid) -> Result<()> {
        self.ensure_identity(user)?;
        let pos = user
            .cart
            .iter()
            .position(|l| l.line_key == line_key)
            .ok_or(StoreError::MissingLine)?;

        let line = user.cart.remove(pos);
        if let Err(e) = self.users.remove_from_cart(&line, &user.username).await {
            user.cart.insert(pos, line);
            return Err(self.fail(e));
        }
        Ok(())
    }

    /// Increment a line's quantity by exactly one.
    ///
    /// The remote payload is the pre-increment line: the server applies
    /// its own +1, keeping local and remote increments symmetric.
    ///
    /// # Errors
    ///
    /// `MissingLine`, or the remote error after undoing the increment.
    #[instrument(skip(self, user), fields(username = %user.username))]
    pub async fn increase_quantity(&self, user: &mut User, line_key: Uuid) -> Result<()> {
        self.ensure_identity(user)?;
        let line = user.line_mut(line_key).ok_or(StoreError::MissingLine)?;
        let payload = line.clone();
        line.quantity += 1;

        if let Err(e) = self.users.increase_quantity(&payload, &user.username).await {
            if let Some(line) = user.line_mut(line_key) {
                line.quantity -= 1;
            }
            return Err(self.fail(e));
        }
        Ok(())
    }

    /// Decrement a line's quantity by exactly one, floored at 1.
    ///
    /// At the floor this is a no-op: no local change, no remote call.
    /// Removal is a distinct explicit operation.
    ///
    /// # Errors
    ///
    /// `MissingLine`, or the remote error after undoing the decrement.
    #[instrument(skip(self, user), fields(username = %user.username))]
    pub async fn decrease_quantity(&self, user: &mut User, line_key: Uuid) -> Result<()> {
        self.ensure_identity(user)?;
        let line = user.line_mut(line_key).ok_or(StoreError::MissingLine)?;
        if line.quantity <= 1 {
            return Ok(());
        }
        let payload = line.clone();
        line.quantity -= 1;

        if let Err(e) = self.users.decrease_quantity(&payload, &user.username).await {
            if let Some(line) = user.line_mut(line_key) {
                line.quantity += 1;
            }
            return Err(self.fail(e));
        }
        Ok(())
    }

    /// Check out: push the cart into order history, then clear the cart.
    ///
    /// The two calls are sequential: the clear is only issued once the
    /// history push has settled successfully. A failed clear after a
    /// successful push leaves the order placed; the owed clear is recorded
    /// in the session and retried via [`Self::retry_pending_clear`].
    ///
    /// # Errors
    ///
    /// The remote error when the history push fails (local state is left
    /// untouched in that case).
    #[instrument(skip(self, user), fields(username = %user.username, lines = user.cart.len()))]
    pub async fn place_order(&self, user: &mut User) -> Result<()> {
        self.ensure_identity(user)?;
        if user.cart.is_empty() {
            return Ok(());
        }

        if let Err(e) = self
            .users
            .push_order_history(&user.username, &user.cart)
            .await
        {
            return Err(self.fail(e));
        }

        // The order is placed; mirror it locally before clearing remotely.
        let lines: Vec<CartLine> = user.cart.drain(..).collect();
        user.order_history.extend(lines);

        if let Err(e) = self.users.clear_cart(&user.username).await {
            self.session.save(keys::PENDING_CLEAR, user.username.as_str());
            tracing::error!("cart clear after checkout failed, retry queued: {e}");
        }
        Ok(())
    }

    /// Retry a cart clear owed from an earlier checkout, if any.
    ///
    /// Intended to run at view activation, before the cart is re-fetched.
    ///
    /// # Errors
    ///
    /// The remote error when the clear fails again; the debt stays queued.
    pub async fn retry_pending_clear(&self) -> Result<()> {
        let Some(username) = self.session.read(keys::PENDING_CLEAR) else {
            return Ok(());
        };
        self.users.clear_cart(&username).await?;
        self.session.remove(keys::PENDING_CLEAR);
        Ok(())
    }
}
