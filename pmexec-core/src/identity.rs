//! Identity types for console entities

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Raw entity identifier. UUIDv7 embeds a Unix timestamp, making IDs
/// naturally sortable by creation time.
pub type EntityId = Uuid;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Calendar date without a time component.
pub type Date = NaiveDate;

/// Common behavior for strongly-typed entity identifiers.
pub trait EntityIdType: Copy + Eq + std::hash::Hash + fmt::Debug + fmt::Display {
    /// Short name of the entity kind, used in logs and error messages.
    const ENTITY_NAME: &'static str;

    /// Wrap a raw UUID.
    fn new(uuid: Uuid) -> Self;

    /// Unwrap to the raw UUID.
    fn as_uuid(&self) -> Uuid;

    /// Generate a fresh timestamp-sortable identifier.
    fn now_v7() -> Self {
        Self::new(Uuid::now_v7())
    }

    /// The all-zero identifier.
    fn nil() -> Self {
        Self::new(Uuid::nil())
    }
}

macro_rules! define_entity_id {
    ($(#[$meta:meta])* $name:ident, $entity:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl EntityIdType for $name {
            const ENTITY_NAME: &'static str = $entity;

            fn new(uuid: Uuid) -> Self {
                Self(uuid)
            }

            fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }
    };
}

define_entity_id!(
    /// Identifier of an acquired project resource.
    ResourceId,
    "resource"
);

define_entity_id!(
    /// Identifier of an issue or leadership action entry.
    LogEntryId,
    "log_entry"
);
