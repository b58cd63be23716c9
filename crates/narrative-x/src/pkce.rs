//! PKCE (RFC 7636) verifier and challenge generation.

use base64::prelude::*;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Challenge method sent to the authorize endpoint
pub const CHALLENGE_METHOD: &str = "S256";

/// A verifier and the challenge derived from it
#[derive(Clone)]
pub struct PkcePair {
    /// Secret kept server-side until the code exchange
    pub verifier: String,
    /// `BASE64URL(SHA256(verifier))`, sent with the authorize request
    pub challenge: String,
}

impl PkcePair {
    /// Generate a fresh pair from 32 random bytes
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        let verifier = BASE64_URL_SAFE_NO_PAD.encode(bytes);
        let challenge = challenge_for(&verifier);

        Self {
            verifier,
            challenge,
        }
    }
}

/// Derive the S256 challenge for `verifier`
pub fn challenge_for(verifier: &str) -> String {
    let digest = Sha256::digest(verifier.as_bytes());
    BASE64_URL_SAFE_NO_PAD.encode(digest)
}

/// Generate an unguessable OAuth `state` value
pub fn generate_state() -> String {
    hex::encode(rand::random::<[u8; 32]>())
}
