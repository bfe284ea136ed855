use storefront_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by {endpoint} (retry after {retry_after_secs}s)")]
    RateLimited {
        endpoint: String,
        retry_after_secs: u64,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("GraphQL errors in {operation}: {}", messages.join("; "))]
    GraphQl {
        operation: String,
        messages: Vec<String>,
    },

    #[error("{operation} rejected by the storefront: {}", messages.join("; "))]
    UserErrors {
        operation: String,
        messages: Vec<String>,
    },

    #[error("{operation} returned no data")]
    MissingData { operation: String },

    #[error("{kind} not found: {handle}")]
    NotFound { kind: &'static str, handle: String },

    #[error("normalization error for {id}: {reason}")]
    Normalization { id: String, reason: String },

    #[error("no cart exists yet; {action} needs an existing cart")]
    NoCart { action: String },

    #[error("invalid client configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ClientError {
    /// `true` when the requested resource does not exist, as opposed to the
    /// upstream failing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::NotFound { .. })
    }
}
