//! Keebcraft Core - Shared domain types.
//!
//! This crate provides common types used across all Keebcraft components:
//! - `storefront` - The client-side cart and customization engine
//! - `cli` - Command-line driver standing in for the presentation layer
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, the keyboard catalog record, cart lines,
//!   and the user aggregate

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
