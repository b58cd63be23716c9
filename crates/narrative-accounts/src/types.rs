//! Session store type definitions.

use crate::errors::{AccountsError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum accepted length of a platform user id
pub const MAX_USER_ID_LEN: usize = 64;

/// User role
#[repr(u8)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    #[default]
    Member = 0x01,
    Admin = 0x02,
}

/// Operations gated by role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Read content with the application token when no user token is stored
    AppTokenFetch,
}

impl Role {
    /// Whether this role grants `capability`
    pub fn grants(self, capability: Capability) -> bool {
        match capability {
            Capability::AppTokenFetch => self == Role::Admin,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Member => "member",
            Role::Admin => "admin",
        }
    }
}

/// Persisted user record
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: String,
    pub access_token: Option<String>,
    pub tone: Option<String>,
    pub length: Option<String>,
    pub guidance: Option<String>,
    pub role: Role,
    pub created_at: u64,
    pub updated_at: u64,
}

impl UserRecord {
    /// Empty record for a user seen for the first time
    pub fn new(user_id: impl Into<String>, now: u64) -> Self {
        Self {
            user_id: user_id.into(),
            access_token: None,
            tone: None,
            length: None,
            guidance: None,
            role: Role::Member,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether a bearer token is stored for this user
    pub fn has_access_token(&self) -> bool {
        self.access_token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Whether the user's role grants `capability`
    pub fn can(&self, capability: Capability) -> bool {
        self.role.grants(capability)
    }
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("user_id", &self.user_id)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "<redacted>"),
            )
            .field("tone", &self.tone)
            .field("length", &self.length)
            .field("guidance", &self.guidance)
            .field("role", &self.role)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Narrative preferences submitted from the profile page
///
/// `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub tone: Option<String>,
    pub length: Option<String>,
    pub guidance: Option<String>,
}

impl ProfileUpdate {
    /// Apply the submitted fields to `record`
    pub fn apply(self, record: &mut UserRecord) {
        if let Some(tone) = self.tone {
            record.tone = Some(tone);
        }
        if let Some(length) = self.length {
            record.length = Some(length);
        }
        if let Some(guidance) = self.guidance {
            record.guidance = Some(guidance);
        }
    }
}

/// Check that `user_id` can be used as a store key and a path segment
pub fn validate_user_id(user_id: &str) -> Result<()> {
    let valid = !user_id.is_empty()
        && user_id.len() <= MAX_USER_ID_LEN
        && !user_id.chars().any(|c| c == '/' || c.is_whitespace() || c.is_control());

    if valid {
        Ok(())
    } else {
        Err(AccountsError::InvalidUserId(user_id.to_string()))
    }
}
