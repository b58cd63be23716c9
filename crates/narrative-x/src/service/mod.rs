//! Login and content services built on [`crate::XApi`].

mod auth;
mod content;

pub use auth::AuthExchangeService;
pub use content::ContentService;

use sha2::{Digest, Sha256};

/// Short, non-reversible tag for an OAuth state in logs
fn state_hash_for_log(state: &str) -> String {
    let digest = Sha256::digest(state.as_bytes());
    hex::encode(&digest[..8])
}

#[cfg(test)]
pub(crate) mod test_support;
