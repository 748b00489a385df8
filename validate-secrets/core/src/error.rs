use crate::Kind;
use thiserror::Error;

/// Reasons a workload is not admitted.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unsupported kind received: {0}")]
    UnsupportedKind(Kind),

    #[error("admission request missing 'object'")]
    MissingObject,

    #[error("could not interpret {kind} object: {source}")]
    MalformedPayload {
        kind: Kind,
        #[source]
        source: serde_json::Error,
    },

    #[error("checking permissions for secret {secret:?} failed: {error:#}")]
    AccessCheck {
        secret: String,
        error: anyhow::Error,
    },

    #[error("user {user:?} does not have access to the secret {secret:?} in the namespace {namespace:?}")]
    AccessDenied {
        user: String,
        secret: String,
        namespace: String,
        reason: Option<String>,
    },
}

// === impl Error ===

impl Error {
    /// A short, stable name for the class of error.
    pub fn label(&self) -> &'static str {
        match self {
            Self::UnsupportedKind(_) => "unsupported_kind",
            Self::MissingObject | Self::MalformedPayload { .. } => "malformed",
            Self::AccessCheck { .. } => "error",
            Self::AccessDenied { .. } => "denied",
        }
    }
}
