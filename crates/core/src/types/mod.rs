//! Core types for Keebcraft.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod id;
pub mod keyboard;
pub mod user;

pub use cart::CartLine;
pub use id::*;
pub use keyboard::{Keyboard, NewKeyboard, Size, SwitchColor, ValidationError};
pub use user::User;
