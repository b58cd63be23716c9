//! X (Twitter) platform integration.
//!
//! This crate provides:
//! - OAuth 2.0 authorization-code login with per-request PKCE
//! - Exchange of the callback code for a bearer token and the user identity
//! - Content fetch of a user's posts with the stored token, or with the
//!   application token for roles that grant it
//!
//! # Security Note
//! The PKCE verifier never leaves the server: only its SHA-256 challenge is
//! sent to the authorize endpoint. Pending authorizations are single-use and
//! expire after ten minutes.

#![warn(missing_docs)]

pub mod client;
pub mod config;
pub mod errors;
pub mod pkce;
pub mod service;
pub mod traits;
pub mod types;

pub use client::XClient;
pub use config::XConfig;
pub use errors::{Result, XError};
pub use service::{AuthExchangeService, ContentService};
pub use traits::XApi;
pub use types::*;
