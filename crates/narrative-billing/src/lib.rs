//! # narrative-billing
//!
//! Hosted checkout for narrative plans.
//!
//! ## Responsibilities
//!
//! - Mapping a plan to its price and checkout mode
//! - Creating checkout sessions with the provider
//! - Building the success and cancel return URLs

pub mod client;
pub mod config;
pub mod errors;
pub mod traits;
pub mod types;

pub use client::StripeClient;
pub use config::BillingConfig;
pub use errors::{BillingError, Result};
pub use traits::CheckoutProvider;
pub use types::*;
