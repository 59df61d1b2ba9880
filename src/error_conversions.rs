//! Error conversion glue between layers.
//!
//! The domain layer must not depend on service/repository error types, so the
//! conversions live here instead of next to the error definitions.

use crate::archive::ArchiveError;
use crate::domain::types::TypeConstraintError;
use crate::repository::RepositoryError;
use crate::services::errors::ServiceError;

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

impl From<ArchiveError> for ServiceError {
    fn from(val: ArchiveError) -> Self {
        match val {
            ArchiveError::UnsupportedFormat(format) => ServiceError::UnsupportedFormat(format),
            ArchiveError::Read(message) => ServiceError::ArchiveRead(message),
            ArchiveError::Write(message) => ServiceError::Render(message),
        }
    }
}

/// Write-path mapping; read paths report [`ServiceError::Query`] instead.
impl From<RepositoryError> for ServiceError {
    fn from(val: RepositoryError) -> Self {
        match val {
            RepositoryError::DuplicateKey(message) => ServiceError::DuplicateKey(message),
            RepositoryError::Commit(message) => ServiceError::Commit(message),
            other => ServiceError::Storage(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archive_errors_keep_their_class() {
        let err: ServiceError = ArchiveError::UnsupportedFormat("rar".into()).into();
        assert_eq!(err, ServiceError::UnsupportedFormat("rar".into()));
        assert!(err.is_client_error());

        let err: ServiceError = ArchiveError::Write("disk full".into()).into();
        assert!(!err.is_client_error());
    }

    #[test]
    fn repository_errors_map_to_write_failures() {
        let err: ServiceError = RepositoryError::DuplicateKey("price id 1".into()).into();
        assert_eq!(err.kind(), "duplicate_key");

        let err: ServiceError = RepositoryError::Commit("locked".into()).into();
        assert_eq!(err, ServiceError::Commit("locked".into()));

        let err: ServiceError = RepositoryError::Pool("timed out".into()).into();
        assert_eq!(err.kind(), "storage_error");
        assert!(!err.is_client_error());
    }
}
