//! MetaClaw Registry - catalog of signed skills and capsules
//!
//! This crate provides artifact admission (validation and optional signature
//! verification), the file-backed catalog store, and the HTTP API in front of
//! them.

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod service;
pub mod store;
pub mod validate;

pub use error::{AppError, RegistryError, StoreError, ValidationError};
pub use routes::{create_router, AppState};
pub use service::Registry;
pub use store::{CatalogStore, FileStore};
