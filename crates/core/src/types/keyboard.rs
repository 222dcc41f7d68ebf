//! The canonical keyboard catalog record and its creation rules.
//!
//! Canonical [`Keyboard`] instances are owned by the remote catalog store;
//! the client never mutates one in place. Shopper-side customization works
//! on a draft copy (see the storefront crate) and only ever produces new
//! cart lines.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::id::KeyboardId;

/// Exclusive upper bound for a keyboard's unit price at creation time.
pub const MAX_PRICE: i64 = 300;

/// Exclusive upper bound for a keyboard's available quantity at creation time.
pub const MAX_QUANTITY: i64 = 400;

/// Bounds for a keyboard's name at creation time: 2 to 10 ASCII letters.
pub const NAME_LEN: std::ops::RangeInclusive<usize> = 2..=10;

/// Client-side validation failures.
///
/// These are rejected before any remote call is issued.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Price must be strictly between 0 and [`MAX_PRICE`].
    #[error("price must be between 0 and {MAX_PRICE} (exclusive)")]
    PriceOutOfBounds,

    /// Quantity must be strictly between 0 and [`MAX_QUANTITY`].
    #[error("quantity must be between 0 and {MAX_QUANTITY} (exclusive)")]
    QuantityOutOfBounds,

    /// Name must be 2-10 ASCII letters.
    #[error("name must consist of 2 to 10 alphabetical characters")]
    InvalidName,

    /// Username or password was empty.
    #[error("username and password must not be empty")]
    EmptyCredential,

    /// A freshly committed customization enters the cart as a single unit.
    #[error("a new cart line must have quantity 1")]
    NewLineQuantity,

    /// A price-range filter needs two positive bounds with from <= to.
    #[error("price filter bounds must be positive with from <= to")]
    InvalidPriceRange,
}

/// Physical form factor of a keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Size {
    Compact,
    Tenkeyless,
    Full,
}

/// Switch color, which doubles as the switch feel (tactile/linear/clicky).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SwitchColor {
    Brown,
    Red,
    Blue,
}

/// A canonical catalog record, as served by the remote inventory store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keyboard {
    /// Store-assigned identity.
    #[serde(rename = "keyboardId")]
    pub id: KeyboardId,
    #[serde(rename = "keyboardName")]
    pub name: String,
    pub price: Decimal,
    /// Units available in inventory.
    pub quantity: i64,
    pub size: Size,
    #[serde(rename = "switchColor")]
    pub switch_color: SwitchColor,
}

/// A keyboard about to be created in the catalog. The store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewKeyboard {
    #[serde(rename = "keyboardName")]
    pub name: String,
    pub price: Decimal,
    pub quantity: i64,
    pub size: Size,
    #[serde(rename = "switchColor")]
    pub switch_color: SwitchColor,
}

impl NewKeyboard {
    /// Check the creation bounds: `0 < price < 300`, `0 < quantity < 400`,
    /// name matching `^[A-Za-z]{2,10}$`.
    ///
    /// # Errors
    ///
    /// Returns the first failing [`ValidationError`]. Callers must not issue
    /// a remote create/replace call when validation fails.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.price <= Decimal::ZERO || self.price >= Decimal::from(MAX_PRICE) {
            return Err(ValidationError::PriceOutOfBounds);
        }
        if self.quantity <= 0 || self.quantity >= MAX_QUANTITY {
            return Err(ValidationError::QuantityOutOfBounds);
        }
        if !NAME_LEN.contains(&self.name.len())
            || !self.name.chars().all(|c| c.is_ascii_alphabetic())
        {
            return Err(ValidationError::InvalidName);
        }
        Ok(())
    }
}

impl Keyboard {
    /// Validate an existing record against the creation bounds.
    ///
    /// Used for catalog replace operations, which carry the same rules as
    /// creation.
    ///
    /// # Errors
    ///
    /// Returns the first failing [`ValidationError`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        NewKeyboard {
            name: self.name.clone(),
            price: self.price,
            quantity: self.quantity,
            size: self.size,
            switch_color: self.switch_color,
        }
        .validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_keyboard(name: &str, price: i64, quantity: i64) -> NewKeyboard {
        NewKeyboard {
            name: name.to_string(),
            price: Decimal::from(price),
            quantity,
            size: Size::Tenkeyless,
            switch_color: SwitchColor::Brown,
        }
    }

    #[test]
    fn test_validate_accepts_in_bounds() {
        assert_eq!(new_keyboard("Alpha", 50, 10).validate(), Ok(()));
        assert_eq!(new_keyboard("Ab", 299, 399).validate(), Ok(()));
        assert_eq!(new_keyboard("Abcdefghij", 1, 1).validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_price_bounds() {
        assert_eq!(
            new_keyboard("Alpha", 0, 10).validate(),
            Err(ValidationError::PriceOutOfBounds)
        );
        assert_eq!(
            new_keyboard("Alpha", 300, 10).validate(),
            Err(ValidationError::PriceOutOfBounds)
        );
        assert_eq!(
            new_keyboard("Alpha", -5, 10).validate(),
            Err(ValidationError::PriceOutOfBounds)
        );
    }

    #[test]
    fn test_validate_rejects_quantity_bounds() {
        assert_eq!(
            new_keyboard("Alpha", 50, 0).validate(),
            Err(ValidationError::QuantityOutOfBounds)
        );
        assert_eq!(
            new_keyboard("Alpha", 50, 400).validate(),
            Err(ValidationError::QuantityOutOfBounds)
        );
    }

    #[test]
    fn test_validate_rejects_bad_names() {
        // Too short, too long, non-alphabetic
        assert_eq!(
            new_keyboard("A", 50, 10).validate(),
            Err(ValidationError::InvalidName)
        );
        assert_eq!(
            new_keyboard("Abcdefghijk", 50, 10).validate(),
            Err(ValidationError::InvalidName)
        );
        assert_eq!(
            new_keyboard("Alpha1", 50, 10).validate(),
            Err(ValidationError::InvalidName)
        );
        assert_eq!(
            new_keyboard("Al pha", 50, 10).validate(),
            Err(ValidationError::InvalidName)
        );
    }

    #[test]
    fn test_keyboard_wire_field_names() {
        let keyboard = Keyboard {
            id: KeyboardId::new(3),
            name: "Alpha".to_string(),
            price: Decimal::from(50),
            quantity: 10,
            size: Size::Compact,
            switch_color: SwitchColor::Red,
        };
        let value = serde_json::to_value(&keyboard).expect("serialize");
        assert_eq!(value["keyboardId"], 3);
        assert_eq!(value["keyboardName"], "Alpha");
        assert_eq!(value["size"], "COMPACT");
        assert_eq!(value["switchColor"], "RED");
    }
}
