//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i32` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_i32()`
/// - `From<i32>` and `Into<i32>` implementations
///
/// # Example
///
/// ```rust
/// # use keebcraft_core::define_id;
/// define_id!(OrderId);
///
/// let order_id = OrderId::new(1);
/// assert_eq!(order_id.as_i32(), 1);
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Create a new ID from an i32 value.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// Get the underlying i32 value.
            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// The catalog store assigns keyboard ids; the client never mints them.
define_id!(KeyboardId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyboard_id_roundtrip() {
        let id = KeyboardId::new(7);
        assert_eq!(id.as_i32(), 7);
        assert_eq!(i32::from(id), 7);
        assert_eq!(KeyboardId::from(7), id);
    }

    #[test]
    fn test_keyboard_id_serde_transparent() {
        let id = KeyboardId::new(42);
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "42");
        let back: KeyboardId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, id);
    }

    #[test]
    fn test_keyboard_id_display() {
        assert_eq!(KeyboardId::new(13).to_string(), "13");
    }
}
