//! Keebcraft Storefront - client-side cart and customization engine.
//!
//! This crate is the state-synchronization core of the storefront: it keeps
//! a local session identity, derives customizable draft variants of catalog
//! keyboards, reconciles cart mutations against the remote user store with
//! optimistic local updates, and drives a debounced incremental catalog
//! search. Rendering, routing, and the remote store's persistence are all
//! external collaborators.
//!
//! # Components
//!
//! - [`session`] - persistent key/value scalars (identity, error code,
//!   pending customization fields)
//! - [`remote`] - thin async REST wrappers over the catalog and user stores
//! - [`customize`] - draft derivation and canonical reconciliation
//! - [`cart`] - optimistic cart mutations with rollback on remote failure
//! - [`search`] - debounced, duplicate-suppressing, latest-wins search
//! - [`state`] - the [`state::StoreApp`] facade wiring it all together

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod customize;
pub mod error;
pub mod remote;
pub mod search;
pub mod session;
pub mod state;

pub use cart::CartSynchronizer;
pub use config::Config;
pub use customize::Customization;
pub use error::{Result, StoreError};
pub use remote::{CatalogApi, CatalogClient, UserApi, UserClient};
pub use search::SearchPipeline;
pub use session::SessionStore;
pub use state::StoreApp;
