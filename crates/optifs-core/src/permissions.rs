//! Per-entity permission objects and the principals that hold them.
//!
//! Every [`DirectoryEntry`](crate::entry::DirectoryEntry) carries a
//! [`FilePermissions`] object: an access level for everyone else plus
//! explicit reader and writer principal sets. Permission *checks* happen on
//! the server side; the client only mirrors the objects so the UI can render
//! them and apply optimistic grants.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Access level granted to principals not named in the reader/writer sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OthersAccess {
    /// Everyone may read and write.
    #[default]
    #[serde(rename = "read/write")]
    ReadWrite,
    /// Everyone may read.
    #[serde(rename = "read")]
    Read,
    /// No access beyond the explicit reader/writer sets.
    #[serde(rename = "none")]
    None,
}

impl fmt::Display for OthersAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OthersAccess::ReadWrite => "read/write",
            OthersAccess::Read => "read",
            OthersAccess::None => "none",
        };
        f.write_str(s)
    }
}

impl FromStr for OthersAccess {
    type Err = UnknownAccessLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read/write" => Ok(OthersAccess::ReadWrite),
            "read" => Ok(OthersAccess::Read),
            "none" => Ok(OthersAccess::None),
            other => Err(UnknownAccessLevel(other.to_string())),
        }
    }
}

/// Error returned when parsing an [`OthersAccess`] keyword fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown access level: {0:?}")]
pub struct UnknownAccessLevel(pub String);

/// Which part of a [`FilePermissions`] object a grant targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionRole {
    /// The explicit reader set.
    Readers,
    /// The explicit writer set.
    Writers,
    /// The access level for everyone else.
    Others,
}

/// A principal receiving a grant: a user or group id, or (for the
/// [`PermissionRole::Others`] role) an [`OthersAccess`] keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionEntity(pub String);

impl PermissionEntity {
    /// Create an entity from a principal id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The principal id (or keyword) carried by this entity.
    pub fn id(&self) -> &str {
        &self.0
    }
}

/// Per-entity permissions: an "others" access level plus explicit reader and
/// writer principal sets.
///
/// New items start blank: `others = read/write` with empty sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePermissions {
    /// Access level for principals not named below.
    pub others: OthersAccess,
    /// Principal ids with read access.
    pub readers: BTreeSet<String>,
    /// Principal ids with write access.
    pub writers: BTreeSet<String>,
}

impl FilePermissions {
    /// Blank permissions for a newly created item.
    pub fn blank() -> Self {
        Self::default()
    }

    /// Apply a grant in place.
    ///
    /// Grants are total: an unrecognized `Others` keyword is logged and
    /// ignored rather than failing, since local mutations must not fail.
    pub fn grant(&mut self, role: PermissionRole, entity: &PermissionEntity) {
        match role {
            PermissionRole::Readers => {
                self.readers.insert(entity.0.clone());
            }
            PermissionRole::Writers => {
                self.writers.insert(entity.0.clone());
            }
            PermissionRole::Others => match entity.0.parse::<OthersAccess>() {
                Ok(level) => self.others = level,
                Err(err) => warn!(%err, "ignoring grant with unknown access level"),
            },
        }
    }
}

/// An authenticated principal's group memberships.
///
/// Produced by the authentication layer and consumed read-only; opaque to
/// this crate beyond membership queries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCustomClaims {
    /// Group ids the principal belongs to.
    pub groups: BTreeSet<String>,
}

impl UserCustomClaims {
    /// Blank claims for an unauthenticated or group-less principal.
    pub fn blank() -> Self {
        Self::default()
    }

    /// Whether the principal belongs to the given group.
    pub fn has_group(&self, group: &str) -> bool {
        self.groups.contains(group)
    }
}
