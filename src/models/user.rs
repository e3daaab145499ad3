//! User data structure (organizer identity).

use crate::models::tournament::TournamentId;
use serde::{Deserialize, Serialize};

/// Numeric user id, as supplied by the identity layer.
pub type UserId = u32;

/// Access level of a user account.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

/// A registered user. Tournaments are owned by their organizer; the relation
/// here is by id, the tournaments themselves live in the service.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    /// Salted sha-256 digest, hex-encoded. Never serialized to API responses.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: UserRole,
    /// Ids of tournaments this user organizes.
    pub organized_tournaments: Vec<TournamentId>,
}

impl User {
    pub fn new(id: UserId, username: impl Into<String>, password_hash: String) -> Self {
        Self {
            id,
            username: username.into(),
            password_hash,
            role: UserRole::User,
            organized_tournaments: Vec::new(),
        }
    }
}
