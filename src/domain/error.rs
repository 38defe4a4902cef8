//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::entities::OrgId;

/// Domain errors represent violations of the folder forest invariants.
/// These are independent of configuration and I/O concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid folder record {record}: {reason}")]
    Validation { record: String, reason: String },

    #[error("organization not found: {0}")]
    OrgNotFound(OrgId),

    #[error("folder does not exist: {0}")]
    FolderNotFound(String),

    #[error("folder does not exist in the specified organization: {name} (org {org_id})")]
    CrossTenant { name: String, org_id: OrgId },

    #[error("cannot move {name} into {new_parent}: target lies within the moved subtree")]
    Cycle { name: String, new_parent: String },
}

impl DomainError {
    pub(crate) fn validation(record: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            record: record.into(),
            reason: reason.into(),
        }
    }

    /// True for unknown organizations and unknown folder names.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::OrgNotFound(_) | Self::FolderNotFound(_))
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
