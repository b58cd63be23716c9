pub mod auth;
pub mod checkout;
pub mod posts;
pub mod profile;
