//! Error types for document sources and profile files.
//!
//! [`SourceError`] covers reading documents and configuration from disk and
//! converts into [`CatalogError`] for unified handling.

use beltcat_core::CatalogError;
use thiserror::Error;

/// Error type for document and configuration sources.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The document could not be parsed.
    #[error("PDF parse error: {0}")]
    Pdf(String),

    /// Error reading a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A page range string is malformed or out of bounds.
    #[error("invalid page range: {0}")]
    PageRange(String),

    /// A profile file is malformed.
    #[error("profile file error: {0}")]
    ProfileFile(String),

    /// A core library error.
    #[error(transparent)]
    Core(#[from] CatalogError),
}

impl From<SourceError> for CatalogError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::Pdf(msg) => CatalogError::Io(format!("PDF parse error: {msg}")),
            SourceError::Io(e) => CatalogError::Io(e.to_string()),
            SourceError::PageRange(msg) => {
                CatalogError::InvalidProfile(format!("invalid page range: {msg}"))
            }
            SourceError::ProfileFile(msg) => CatalogError::InvalidProfile(msg),
            SourceError::Core(e) => e,
        }
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::ProfileFile(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_error_message() {
        let err = SourceError::Pdf("invalid xref table".to_string());
        assert_eq!(err.to_string(), "PDF parse error: invalid xref table");
    }

    #[test]
    fn io_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: SourceError = io_err.into();
        assert!(matches!(err, SourceError::Io(_)));
        assert!(err.to_string().contains("file missing"));
    }

    #[test]
    fn core_error_is_transparent() {
        let err: SourceError = CatalogError::UnknownProfile("Z".to_string()).into();
        assert_eq!(err.to_string(), "unknown profile: Z");
        let back: CatalogError = err.into();
        assert_eq!(back, CatalogError::UnknownProfile("Z".to_string()));
    }

    #[test]
    fn page_range_converts_to_invalid_profile() {
        let err: CatalogError = SourceError::PageRange("page 0".to_string()).into();
        assert!(matches!(err, CatalogError::InvalidProfile(_)));
    }

    #[test]
    fn json_error_converts() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: SourceError = json_err.into();
        assert!(matches!(err, SourceError::ProfileFile(_)));
    }
}
