//! Provisioning error taxonomy.

use thiserror::Error;

use castellan_directory::DirectoryError;

use crate::notify::NotificationError;
use crate::validation::ValidationError;

/// Error produced by repositories, the role coordinator, or the
/// registration workflow.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// The addressed user does not exist.
    #[error("user not found: {uid}")]
    UserNotFound { uid: String },

    /// The addressed group does not exist.
    #[error("group not found: {name}")]
    GroupNotFound { name: String },

    /// A user with this unique id already exists.
    #[error("user already exists: {uid}")]
    AlreadyExists { uid: String },

    /// Rejected input: bad category, role, email or username format.
    #[error(transparent)]
    InvalidInput(#[from] ValidationError),

    /// The notification collaborator failed.
    #[error(transparent)]
    Notification(#[from] NotificationError),

    /// A compensating action failed after a primary failure.
    ///
    /// Logged by the workflow that attempted the compensation and never
    /// returned as the primary error: the caller always sees the error
    /// that triggered the compensation.
    #[error("compensation failed after {step}: {source}")]
    CompensationFailed {
        step: &'static str,
        #[source]
        source: Box<ProvisionError>,
    },

    /// Directory-layer failure, propagated unchanged.
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

impl ProvisionError {
    /// Wrap a failed compensating action for logging.
    pub fn compensation(step: &'static str, source: ProvisionError) -> Self {
        ProvisionError::CompensationFailed {
            step,
            source: Box::new(source),
        }
    }
}

/// Result type for provisioning operations.
pub type ProvisionResult<T> = Result<T, ProvisionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compensation_wraps_primary_shape() {
        let inner = ProvisionError::GroupNotFound {
            name: "default".to_string(),
        };
        let err = ProvisionError::compensation("role switch", inner);
        assert_eq!(
            err.to_string(),
            "compensation failed after role switch: group not found: default"
        );
    }

    #[test]
    fn directory_errors_pass_through() {
        let err: ProvisionError = DirectoryError::PoolClosed.into();
        assert_eq!(err.to_string(), "directory session pool is closed");
    }
}
