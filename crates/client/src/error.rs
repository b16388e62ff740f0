//! Client-side error taxonomy.

use std::collections::BTreeMap;

use thiserror::Error;

use fieldserve_core::DomainError;

/// What went wrong with a client operation.
///
/// Local domain checks fail before the wire as [`ClientError::Domain`]; the
/// rest maps from transport and backend responses. The 401/403 split matters
/// to callers: an expired session is recovered by signing in again, a
/// forbidden operation is not.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP 401. The session is gone; re-authenticate and retry.
    #[error("session expired")]
    SessionExpired,

    /// HTTP 403. The signed-in user may not perform this operation.
    #[error("forbidden")]
    Forbidden,

    /// HTTP 404.
    #[error("not found")]
    NotFound,

    /// HTTP 422 with field-level messages from the backend validator.
    #[error("validation failed on the server")]
    Validation {
        errors: BTreeMap<String, Vec<String>>,
    },

    /// Any other 4xx the backend answered with.
    #[error("request rejected ({status}): {message}")]
    Request { status: u16, message: String },

    /// 5xx. Nothing the caller sent was wrong.
    #[error("server error ({status})")]
    Server { status: u16 },

    /// The request produced no response at all (unreachable host, timeout).
    #[error("network error: {0}")]
    Network(String),

    /// A response arrived but its body did not match the expected shape.
    #[error("could not decode response: {0}")]
    Decode(String),

    /// The same mutation is already in flight.
    #[error("duplicate submission: {0}")]
    DuplicateSubmission(String),

    /// A local domain rule refused the operation before anything was sent.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// Whether signing in again would make the operation succeed.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, ClientError::SessionExpired)
    }

    /// Field messages from a server-side validation rejection.
    pub fn validation_errors(&self) -> Option<&BTreeMap<String, Vec<String>>> {
        match self {
            ClientError::Validation { errors } => Some(errors),
            _ => None,
        }
    }
}
