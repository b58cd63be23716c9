//! # narrative-accounts
//!
//! Session store for platform users.
//!
//! This crate is responsible for:
//! - The persisted `UserRecord` keyed by the platform user id
//! - Access token upserts after a successful login
//! - Narrative preference upserts from the profile page
//! - Roles and the capabilities they grant

#![warn(clippy::all)]

pub mod errors;
pub mod service;
pub mod traits;
pub mod types;

pub use errors::{AccountsError, Result};
pub use service::SessionStoreService;
pub use traits::SessionStore;
pub use types::*;
