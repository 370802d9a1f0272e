//! Error taxonomy for the translation core
//!
//! Every failure is returned to the immediate caller. Nothing here is
//! retried; retry policy belongs to whatever executes the built queries.

use crate::kinds::{GroupResource, MappingError};
use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, TranslateError>;

/// Errors produced while building queries or translating responses
#[derive(Debug, Error)]
pub enum TranslateError {
    /// The caller supplied zero objects to query
    #[error("no objects matched provided selector")]
    InvalidSelector,

    /// More objects than a single `one_of` clause can hold
    #[error("query requested for {count} objects, but allowed limit is {limit}")]
    BatchTooLarge { count: usize, limit: usize },

    /// Operation not available under the configured resource model
    #[error("operation not supported: {0}")]
    UnsupportedOperation(String),

    /// Backend returned no series for the metric
    #[error("metric {metric} not found for {resource}")]
    MetricNotFound {
        resource: GroupResource,
        metric: String,
    },

    /// Response shape contradicts what the query asked for
    #[error("backend contract violation: {0}")]
    BackendContractViolation(String),

    /// A point carries no usable numeric value
    #[error("malformed sample: {0}")]
    MalformedSample(String),

    /// An internal precondition was broken by the caller of a builder
    #[error("internal invariant violated: {0}")]
    InvariantViolation(String),

    /// Legacy resource model addresses pods by UID only
    #[error("object {name:?} has no UID, which the legacy resource model requires")]
    MissingObjectUid { name: String },

    /// Object of the wrong kind passed to a kind-specific request builder
    #[error("expected {expected} object, but {name:?} is a {found}")]
    KindMismatch {
        expected: &'static str,
        found: &'static str,
        name: String,
    },

    #[error(transparent)]
    Mapping(#[from] MappingError),
}

/// Coarse classification used by a serving layer to pick a response status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    BadRequest,
    NotFound,
    NotSupported,
    Internal,
}

impl ErrorClass {
    /// HTTP status code conventionally used for this class
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorClass::BadRequest => 400,
            ErrorClass::NotFound => 404,
            ErrorClass::NotSupported => 501,
            ErrorClass::Internal => 500,
        }
    }
}

impl TranslateError {
    pub fn class(&self) -> ErrorClass {
        match self {
            TranslateError::InvalidSelector
            | TranslateError::MalformedSample(_)
            | TranslateError::MissingObjectUid { .. }
            | TranslateError::KindMismatch { .. } => ErrorClass::BadRequest,
            TranslateError::MetricNotFound { .. } => ErrorClass::NotFound,
            TranslateError::UnsupportedOperation(_) => ErrorClass::NotSupported,
            TranslateError::BatchTooLarge { .. }
            | TranslateError::BackendContractViolation(_)
            | TranslateError::InvariantViolation(_)
            | TranslateError::Mapping(_) => ErrorClass::Internal,
        }
    }

    /// True when the backend simply has no data yet for the metric
    pub fn is_not_found(&self) -> bool {
        matches!(self, TranslateError::MetricNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_classified_as_bad_request() {
        assert_eq!(TranslateError::InvalidSelector.class(), ErrorClass::BadRequest);
        assert_eq!(
            TranslateError::MalformedSample("empty value".into()).class(),
            ErrorClass::BadRequest
        );
        assert_eq!(ErrorClass::BadRequest.http_status(), 400);
    }

    #[test]
    fn test_batch_too_large_is_internal() {
        let err = TranslateError::BatchTooLarge {
            count: 101,
            limit: 100,
        };
        assert_eq!(err.class(), ErrorClass::Internal);
        assert_eq!(err.class().http_status(), 500);
        assert!(err.to_string().contains("101"));
    }

    #[test]
    fn test_not_found_and_unsupported_are_distinct() {
        let not_found = TranslateError::MetricNotFound {
            resource: GroupResource::new("", "pods"),
            metric: "qps".into(),
        };
        assert!(not_found.is_not_found());
        assert_eq!(not_found.class().http_status(), 404);

        let unsupported = TranslateError::UnsupportedOperation("nodes".into());
        assert!(!unsupported.is_not_found());
        assert_eq!(unsupported.class(), ErrorClass::NotSupported);
    }

    #[test]
    fn test_mapping_error_message_passes_through() {
        let err: TranslateError = MappingError::UnknownResource(GroupResource::new("apps", "widgets")).into();
        assert_eq!(err.to_string(), "no kind is registered for resource widgets.apps");
        assert_eq!(err.class(), ErrorClass::Internal);
    }
}
