//! Domain entities: core data structures

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Separator between the segments of a folder path.
pub const PATH_SEPARATOR: char = '.';

/// Tenant identifier.
///
/// Opaque UUID-shaped key; ordering follows the UUID byte order, which fixes
/// the order in which organizations are visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrgId(Uuid);

impl OrgId {
    pub const fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a fresh random (v4) identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl FromStr for OrgId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

impl fmt::Display for OrgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// A named folder belonging to one organization.
///
/// `path` is the dot-separated chain of ancestor names from a root down to
/// and including this folder, e.g. `alpha.bravo.delta`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub name: String,
    pub org_id: OrgId,
    pub path: String,
}

impl Folder {
    pub fn new(name: impl Into<String>, org_id: OrgId, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            org_id,
            path: path.into(),
        }
    }

    /// Path segments, root first.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split(PATH_SEPARATOR)
    }

    /// Path of the parent folder, None for roots.
    pub fn parent_path(&self) -> Option<&str> {
        self.path
            .rfind(PATH_SEPARATOR)
            .map(|pos| &self.path[..pos])
    }

    /// Number of segments in the path (1 for roots).
    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    /// Same folder, relocated to `path`.
    pub(crate) fn with_path(&self, path: String) -> Self {
        Self {
            name: self.name.clone(),
            org_id: self.org_id,
            path,
        }
    }
}

impl fmt::Display for Folder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<12} {}  [{}]", self.name, self.path, self.org_id)
    }
}
