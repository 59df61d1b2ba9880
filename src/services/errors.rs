use thiserror::Error;

use crate::forms::import_export::RecordParseError;

/// Generic error type used by service layer functions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The archive format selector is neither `zip` nor `tar`.
    #[error("unsupported archive format: {0}")]
    UnsupportedFormat(String),
    /// The archive is corrupt, truncated or holds non-text content.
    #[error("failed to read archive: {0}")]
    ArchiveRead(String),
    /// A line of a contained file failed validation.
    #[error("{entry}: {source}")]
    InvalidRecord {
        entry: String,
        source: RecordParseError,
    },
    /// A record carried an id that already exists.
    #[error("duplicate key: {0}")]
    DuplicateKey(String),
    /// An insert or the aggregate query failed; the batch was rolled back.
    #[error("storage error: {0}")]
    Storage(String),
    /// The ingestion transaction could not be committed.
    #[error("failed to commit transaction: {0}")]
    Commit(String),
    /// Stored prices could not be read.
    #[error("failed to query prices: {0}")]
    Query(String),
    /// The download could not be rendered.
    #[error("failed to render download: {0}")]
    Render(String),
}

impl ServiceError {
    /// Whether the caller's input caused the failure.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedFormat(_)
                | Self::ArchiveRead(_)
                | Self::InvalidRecord { .. }
                | Self::DuplicateKey(_)
        )
    }

    /// Stable machine-readable name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedFormat(_) => "unsupported_format",
            Self::ArchiveRead(_) => "archive_read_error",
            Self::InvalidRecord { source, .. } => match source {
                RecordParseError::MalformedLine { .. } => "malformed_line",
                RecordParseError::InvalidId { .. } => "invalid_id",
                RecordParseError::InvalidPrice { .. } => "invalid_price",
                RecordParseError::InvalidDate { .. } => "invalid_date",
                RecordParseError::Unreadable { .. } => "unreadable_record",
            },
            Self::DuplicateKey(_) => "duplicate_key",
            Self::Storage(_) => "storage_error",
            Self::Commit(_) => "commit_error",
            Self::Query(_) => "query_error",
            Self::Render(_) => "render_error",
        }
    }
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;
