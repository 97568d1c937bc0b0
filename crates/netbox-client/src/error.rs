//! NetBox client errors

use thiserror::Error;

/// Errors that can occur when interacting with the NetBox API
#[derive(Debug, Error)]
pub enum NetBoxError {
    /// HTTP request/response error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// NetBox API returned an error (message is passed through verbatim)
    #[error("{0}")]
    Api(String),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Authentication failed (invalid token, expired, etc.)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// An identity lookup matched zero or several records where exactly one was required
    #[error("expected exactly one {kind} matching [{filters}], found {count}")]
    NotFoundCount {
        /// Entity kind, e.g. "cluster" or "platform"
        kind: &'static str,
        /// Rendered filter set that was used for the lookup
        filters: String,
        /// Number of records the lookup returned
        count: usize,
    },

    /// A write against a specific record failed
    #[error("unable to {action} {kind} {id}: {source}")]
    Operation {
        /// Operation verb, e.g. "update" or "delete"
        action: &'static str,
        /// Entity kind, e.g. "device"
        kind: &'static str,
        /// NetBox ID of the record
        id: u64,
        /// Underlying failure
        #[source]
        source: Box<NetBoxError>,
    },

    /// Invalid request (e.g., missing required fields)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl NetBoxError {
    /// Wraps a failed write with the operation that produced it.
    pub fn operation(action: &'static str, kind: &'static str, id: u64, source: NetBoxError) -> Self {
        Self::Operation {
            action,
            kind,
            id,
            source: Box::new(source),
        }
    }

    /// Returns true when the error means "no such record" rather than a transport failure.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) | Self::NotFoundCount { .. } => true,
            Self::Operation { source, .. } => source.is_not_found(),
            _ => false,
        }
    }
}
