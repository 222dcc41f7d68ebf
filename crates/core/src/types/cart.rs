//! Cart lines: value snapshots of a customized keyboard at add time.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::id::KeyboardId;
use crate::types::keyboard::{Size, SwitchColor};

/// One line in a user's cart.
///
/// A line snapshots the keyboard's name and price at the moment it is
/// added, so later catalog edits do not retroactively alter carts. The
/// remote store has no per-line identity and matches lines by full value;
/// `line_key` is a client-side synthetic identity that lets the local cart
/// distinguish two value-identical lines. It never crosses the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Local-only synthetic line identity.
    #[serde(skip, default = "new_line_key")]
    pub line_key: Uuid,
    #[serde(rename = "keyboardId")]
    pub id: KeyboardId,
    #[serde(rename = "keyboardName")]
    pub name: String,
    pub price: Decimal,
    /// Units of this line in the cart; always >= 1.
    pub quantity: i64,
    pub size: Size,
    #[serde(rename = "switchColor")]
    pub switch_color: SwitchColor,
}

fn new_line_key() -> Uuid {
    Uuid::new_v4()
}

impl CartLine {
    /// Create a fresh line (quantity 1) for a customized keyboard.
    #[must_use]
    pub fn new(
        id: KeyboardId,
        name: String,
        price: Decimal,
        size: Size,
        switch_color: SwitchColor,
    ) -> Self {
        Self {
            line_key: new_line_key(),
            id,
            name,
            price,
            quantity: 1,
            size,
            switch_color,
        }
    }

    /// Whether two lines carry identical wire values (everything except
    /// `line_key`). This is the equality the remote store uses for removal.
    #[must_use]
    pub fn value_eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.price == other.price
            && self.quantity == other.quantity
            && self.size == other.size
            && self.switch_color == other.switch_color
    }

    /// Price of the whole line (`price * quantity`).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> CartLine {
        CartLine::new(
            KeyboardId::new(1),
            "Alpha".to_string(),
            Decimal::from(50),
            Size::Full,
            SwitchColor::Blue,
        )
    }

    #[test]
    fn test_new_line_starts_at_quantity_one() {
        assert_eq!(line().quantity, 1);
    }

    #[test]
    fn test_value_identical_lines_have_distinct_keys() {
        let a = line();
        let b = line();
        assert!(a.value_eq(&b));
        assert_ne!(a.line_key, b.line_key);
        assert_ne!(a, b);
    }

    #[test]
    fn test_value_eq_detects_field_differences() {
        let a = line();
        let mut b = line();
        b.quantity = 2;
        assert!(!a.value_eq(&b));
    }

    #[test]
    fn test_line_key_never_serialized() {
        let value = serde_json::to_value(line()).expect("serialize");
        assert!(value.get("line_key").is_none());
        assert!(value.get("keyboardId").is_some());
    }

    #[test]
    fn test_line_total() {
        let mut l = line();
        l.quantity = 3;
        assert_eq!(l.line_total(), Decimal::from(150));
    }
}
