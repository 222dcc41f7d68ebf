//! Integration tests for the Keebcraft storefront engine.
//!
//! The engine's remote surfaces ([`CatalogApi`] and [`UserApi`]) are
//! implemented here by stateful in-memory fakes with switchable outages,
//! so whole shopping flows run against real store semantics without a
//! network. Test files under `tests/` cover:
//!
//! - `shopping_flow` - signup through customization, cart, and checkout
//! - `cart_recovery` - rollback and compensation under remote outages
//! - `search_flow` - the debounced search pipeline over a live catalog

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};

use rust_decimal::Decimal;

use keebcraft_core::{CartLine, Keyboard, KeyboardId, NewKeyboard, User};
use keebcraft_storefront::remote::{CatalogApi, RemoteError, UserApi, users::AuthFailure};

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// Catalog fake
// =============================================================================

/// In-memory catalog store with the same matching semantics as the real
/// one: substring name search (case-insensitive) and inclusive price
/// filtering.
#[derive(Debug, Clone, Default)]
pub struct FakeCatalog {
    records: Arc<Mutex<HashMap<i32, Keyboard>>>,
    next_id: Arc<Mutex<i32>>,
}

impl FakeCatalog {
    /// Insert a record directly, bypassing validation (test setup).
    pub fn seed(&self, keyboard: NewKeyboard) -> Keyboard {
        let mut next = lock(&self.next_id);
        *next += 1;
        let record = Keyboard {
            id: KeyboardId::new(*next),
            name: keyboard.name,
            price: keyboard.price,
            quantity: keyboard.quantity,
            size: keyboard.size,
            switch_color: keyboard.switch_color,
        };
        lock(&self.records).insert(*next, record.clone());
        record
    }

    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.records).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        lock(&self.records).is_empty()
    }
}

impl CatalogApi for FakeCatalog {
    async fn list(&self) -> Vec<Keyboard> {
        let mut all: Vec<Keyboard> = lock(&self.records).values().cloned().collect();
        all.sort_by_key(|k| k.id);
        all
    }

    async fn get(&self, id: KeyboardId) -> Option<Keyboard> {
        lock(&self.records).get(&id.as_i32()).cloned()
    }

    async fn search(&self, term: &str) -> Vec<Keyboard> {
        let needle = term.to_lowercase();
        let mut matches: Vec<Keyboard> = lock(&self.records)
            .values()
            .filter(|k| k.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        matches.sort_by_key(|k| k.id);
        matches
    }

    async fn filter(&self, from: Decimal, to: Decimal) -> Vec<Keyboard> {
        let mut matches: Vec<Keyboard> = lock(&self.records)
            .values()
            .filter(|k| k.price >= from && k.price <= to)
            .cloned()
            .collect();
        matches.sort_by_key(|k| k.id);
        matches
    }

    async fn create(&self, keyboard: &NewKeyboard) -> Result<Keyboard, RemoteError> {
        Ok(self.seed(keyboard.clone()))
    }

    async fn replace(&self, keyboard: &Keyboard) -> Result<Keyboard, RemoteError> {
        let mut records = lock(&self.records);
        let slot = records
            .get_mut(&keyboard.id.as_i32())
            .ok_or(RemoteError::Status(404))?;
        *slot = keyboard.clone();
        Ok(keyboard.clone())
    }

    async fn delete(&self, id: KeyboardId) -> Result<(), RemoteError> {
        lock(&self.records)
            .remove(&id.as_i32())
            .map(|_| ())
            .ok_or(RemoteError::Status(404))
    }
}

// =============================================================================
// User store fake
// =============================================================================

/// In-memory user store whose cart endpoints match lines by full value,
/// exactly like the real store. Individual operations can be broken to
/// simulate outages.
#[derive(Debug, Clone, Default)]
pub struct FakeUserStore {
    users: Arc<Mutex<HashMap<String, User>>>,
    broken: Arc<Mutex<HashSet<String>>>,
}

impl FakeUserStore {
    /// Make one operation fail with HTTP 500 until restored.
    pub fn break_op(&self, op: &str) {
        lock(&self.broken).insert(op.to_string());
    }

    /// Restore a broken operation.
    pub fn restore_op(&self, op: &str) {
        lock(&self.broken).remove(op);
    }

    /// Peek at the stored aggregate (test assertions).
    #[must_use]
    pub fn stored(&self, username: &str) -> Option<User> {
        lock(&self.users).get(username).cloned()
    }

    fn check(&self, op: &str) -> Result<(), RemoteError> {
        if lock(&self.broken).contains(op) {
            Err(RemoteError::Status(500))
        } else {
            Ok(())
        }
    }

    fn with_user<T>(
        &self,
        username: &str,
        f: impl FnOnce(&mut User) -> T,
    ) -> Result<T, RemoteError> {
        let mut users = lock(&self.users);
        let user = users.get_mut(username).ok_or(RemoteError::Status(404))?;
        Ok(f(user))
    }

    fn mutate_line(
        &self,
        op: &str,
        username: &str,
        line: &CartLine,
        f: impl FnOnce(&mut Vec<CartLine>, usize),
    ) -> Result<(), RemoteError> {
        self.check(op)?;
        self.with_user(username, |user| {
            let pos = user
                .cart
                .iter()
                .position(|l| l.value_eq(line))
                .ok_or(RemoteError::Status(404))?;
            f(&mut user.cart, pos);
            Ok(())
        })?
    }
}

impl UserApi for FakeUserStore {
    async fn get_user(&self, username: &str) -> Option<User> {
        if self.check("get_user").is_err() {
            return None;
        }
        self.stored(username)
    }

    async fn create_user(&self, username: &str, password: &str) -> Result<User, RemoteError> {
        self.check("create_user")?;
        let mut users = lock(&self.users);
        if users.contains_key(username) {
            return Err(RemoteError::Status(409));
        }
        let user = User::new(username.to_string(), password.to_string());
        users.insert(username.to_string(), user.clone());
        Ok(user)
    }

    async fn login(&self, username: &str, password: &str) -> Result<User, AuthFailure> {
        if self.check("login").is_err() {
            return Err(AuthFailure::NotFound);
        }
        let mut users = lock(&self.users);
        let user = users.get_mut(username).ok_or(AuthFailure::NotFound)?;
        if user.password != password {
            return Err(AuthFailure::InvalidCredentials);
        }
        user.logged_in = true;
        Ok(user.clone())
    }

    async fn logout(&self, username: &str, _password: &str) -> Result<(), RemoteError> {
        self.check("logout")?;
        self.with_user(username, |user| user.logged_in = false)
    }

    async fn update_user(&self, user: &User) -> Result<(), RemoteError> {
        self.check("update_user")?;
        lock(&self.users).insert(user.username.clone(), user.clone());
        Ok(())
    }

    async fn delete_user(&self, username: &str) -> Result<(), RemoteError> {
        self.check("delete_user")?;
        lock(&self.users)
            .remove(username)
            .map(|_| ())
            .ok_or(RemoteError::Status(404))
    }

    async fn add_to_cart(&self, line: &CartLine, username: &str) -> Result<(), RemoteError> {
        self.check("add_to_cart")?;
        self.with_user(username, |user| user.cart.push(line.clone()))
    }

    async fn remove_from_cart(&self, line: &CartLine, username: &str) -> Result<(), RemoteError> {
        self.mutate_line("remove_from_cart", username, line, |cart, pos| {
            cart.remove(pos);
        })
    }

    async fn increase_quantity(&self, line: &CartLine, username: &str) -> Result<(), RemoteError> {
        self.mutate_line("increase_quantity", username, line, |cart, pos| {
            if let Some(l) = cart.get_mut(pos) {
                l.quantity += 1;
            }
        })
    }

    async fn decrease_quantity(&self, line: &CartLine, username: &str) -> Result<(), RemoteError> {
        self.mutate_line("decrease_quantity", username, line, |cart, pos| {
            if let Some(l) = cart.get_mut(pos) {
                l.quantity -= 1;
            }
        })
    }

    async fn push_order_history(
        &self,
        username: &str,
        lines: &[CartLine],
    ) -> Result<(), RemoteError> {
        self.check("push_order_history")?;
        self.with_user(username, |user| {
            user.order_history.extend(lines.iter().cloned());
        })
    }

    async fn clear_cart(&self, username: &str) -> Result<(), RemoteError> {
        self.check("clear_cart")?;
        self.with_user(username, |user| user.cart.clear())
    }

    async fn order_history(&self, username: &str) -> Vec<CartLine> {
        if self.check("order_history").is_err() {
            return Vec::new();
        }
        self.stored(username).map(|u| u.order_history).unwrap_or_default()
    }
}

// =============================================================================
// Shared fixtures
// =============================================================================

/// A catalog with three distinctly named and priced keyboards.
#[must_use]
pub fn seeded_catalog() -> FakeCatalog {
    use keebcraft_core::{Size, SwitchColor};

    let catalog = FakeCatalog::default();
    catalog.seed(NewKeyboard {
        name: "Aurora".to_string(),
        price: Decimal::from(120),
        quantity: 25,
        size: Size::Tenkeyless,
        switch_color: SwitchColor::Brown,
    });
    catalog.seed(NewKeyboard {
        name: "Borealis".to_string(),
        price: Decimal::from(80),
        quantity: 40,
        size: Size::Compact,
        switch_color: SwitchColor::Red,
    });
    catalog.seed(NewKeyboard {
        name: "Cascade".to_string(),
        price: Decimal::from(220),
        quantity: 5,
        size: Size::Full,
        switch_color: SwitchColor::Blue,
    });
    catalog
}
