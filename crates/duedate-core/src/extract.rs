//! Text Extractor collaborator contract.

use thiserror::Error;

/// Failure reported by a [`TextExtractor`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("extractor timed out")]
    Timeout,
    #[error("extractor backend failed: {0}")]
    Backend(String),
    #[error("extractor returned malformed output: {0}")]
    Malformed(String),
}

/// Reads a document and reports the validity period it states for a subject.
///
/// `Ok(None)` means the document makes no usable claim. Implementations own
/// their timeouts and report them as [`ExtractError::Timeout`].
pub trait TextExtractor {
    fn extract(&self, subject: &str, document_text: &str) -> Result<Option<String>, ExtractError>;
}

impl<T: TextExtractor + ?Sized> TextExtractor for &T {
    fn extract(&self, subject: &str, document_text: &str) -> Result<Option<String>, ExtractError> {
        (**self).extract(subject, document_text)
    }
}

impl<T: TextExtractor + ?Sized> TextExtractor for Box<T> {
    fn extract(&self, subject: &str, document_text: &str) -> Result<Option<String>, ExtractError> {
        (**self).extract(subject, document_text)
    }
}
