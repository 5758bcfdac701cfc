//! Common type definitions.
//!
//! This module defines:
//! - Type aliases for entity IDs (UserId, TodoId, etc.)
//! - The [`Resource`] enum used by error reporting and ownership checks
//! - The [`Importance`] level for due-date todos and the [`DueDateSort`] order
//!
//! All entity IDs are UUIDs wrapped in type aliases for better type safety.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::Error;

// Type aliases for IDs
pub type UserId = Uuid;
pub type CategoryId = Uuid;
pub type TodoId = Uuid;
pub type HashtagId = Uuid;

/// Abbreviate a UUID to its first 8 characters for more readable logs and traces
/// Example: "550e8400-e29b-41d4-a716-446655440000" -> "550e8400"
pub fn abbrev_uuid(uuid: &Uuid) -> String {
    uuid.to_string().chars().take(8).collect()
}

/// Resources that can be looked up and owned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    User,
    Category,
    DailyTodo,
    DueDateTodo,
    Hashtag,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::User => write!(f, "User"),
            Resource::Category => write!(f, "Category"),
            Resource::DailyTodo => write!(f, "Daily todo"),
            Resource::DueDateTodo => write!(f, "Due-date todo"),
            Resource::Hashtag => write!(f, "Hashtag"),
        }
    }
}

/// Importance level of a due-date todo.
///
/// Wire format is uppercase (`LOW`/`MEDIUM`/`HIGH`); the database stores a
/// postgres enum whose declaration order (low, medium, high) gives the
/// ascending sort used by importance-ordered listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "importance", rename_all = "lowercase")]
pub enum Importance {
    Low,
    Medium,
    High,
}

impl Importance {
    /// Parse a client-supplied importance string, case-insensitively.
    /// Unrecognized values are a client error, never silently defaulted.
    pub fn parse(value: &str) -> Result<Self, Error> {
        match value.to_ascii_uppercase().as_str() {
            "LOW" => Ok(Importance::Low),
            "MEDIUM" => Ok(Importance::Medium),
            "HIGH" => Ok(Importance::High),
            _ => Err(Error::InvalidEnumValue {
                value: value.to_string(),
                expected: "LOW, MEDIUM, HIGH",
            }),
        }
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Importance::Low => write!(f, "LOW"),
            Importance::Medium => write!(f, "MEDIUM"),
            Importance::High => write!(f, "HIGH"),
        }
    }
}

/// Sort order for due-date todo listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum DueDateSort {
    #[default]
    DueDate,
    Importance,
}
