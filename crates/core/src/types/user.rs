//! The user aggregate: identity, cart, and order history.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::cart::CartLine;

/// A user record as held by the remote user store.
///
/// The client keeps a read-mostly copy per view activation and re-fetches
/// on each activation; there is no long-lived local cache. The password
/// travels on the wire in the clear, which is the remote store's contract
/// (it performs the comparison server-side).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub password: String,
    #[serde(rename = "userCart")]
    pub cart: Vec<CartLine>,
    #[serde(rename = "userOrderHistory")]
    pub order_history: Vec<CartLine>,
    #[serde(rename = "loginStatus")]
    pub logged_in: bool,
}

impl User {
    /// A brand-new account: empty cart, empty history, logged in.
    #[must_use]
    pub fn new(username: String, password: String) -> Self {
        Self {
            username,
            password,
            cart: Vec::new(),
            order_history: Vec::new(),
            logged_in: true,
        }
    }

    /// Total price of the cart (`sum of price * quantity`).
    #[must_use]
    pub fn cart_total(&self) -> Decimal {
        self.cart.iter().map(CartLine::line_total).sum()
    }

    /// Find a cart line by its local synthetic key.
    #[must_use]
    pub fn line(&self, line_key: Uuid) -> Option<&CartLine> {
        self.cart.iter().find(|l| l.line_key == line_key)
    }

    /// Find a cart line by key, mutably.
    pub fn line_mut(&mut self, line_key: Uuid) -> Option<&mut CartLine> {
        self.cart.iter_mut().find(|l| l.line_key == line_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::id::KeyboardId;
    use crate::types::keyboard::{Size, SwitchColor};

    #[test]
    fn test_new_user_is_empty_and_logged_in() {
        let user = User::new("mika".to_string(), "hunter".to_string());
        assert!(user.cart.is_empty());
        assert!(user.order_history.is_empty());
        assert!(user.logged_in);
    }

    #[test]
    fn test_cart_total_sums_lines() {
        let mut user = User::new("mika".to_string(), "hunter".to_string());
        let mut a = CartLine::new(
            KeyboardId::new(1),
            "Alpha".to_string(),
            Decimal::from(50),
            Size::Compact,
            SwitchColor::Red,
        );
        a.quantity = 2;
        let b = CartLine::new(
            KeyboardId::new(2),
            "Beta".to_string(),
            Decimal::from(30),
            Size::Full,
            SwitchColor::Brown,
        );
        user.cart = vec![a, b];
        assert_eq!(user.cart_total(), Decimal::from(130));
    }

    #[test]
    fn test_wire_field_names() {
        let user = User::new("mika".to_string(), "hunter".to_string());
        let value = serde_json::to_value(&user).expect("serialize");
        assert!(value.get("userCart").is_some());
        assert!(value.get("userOrderHistory").is_some());
        assert_eq!(value["loginStatus"], true);
    }
}
