use reqwest::StatusCode;

/// Everything that can go wrong between a screen asking for data and the
/// backend answering. The `#[error]` strings double as the user-facing
/// messages surfaced through the transient message store.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Any non-2xx response other than 401, with a best-effort message
    /// extracted from the response body.
    #[error("{message}")]
    Api { status: StatusCode, message: String },
    /// The backend answered 401; the stored token is missing or expired.
    #[error("Your session has expired. Please sign in again.")]
    AuthRequired,
    #[error("Network error. Please check your connection.")]
    Network(#[source] reqwest::Error),
    #[error("The server took too long to respond.")]
    Timeout,
    /// Bounded retries were exhausted; wraps the final underlying failure.
    #[error("Giving up after {attempts} attempts: {source}")]
    RetryExhausted {
        attempts: u32,
        #[source]
        source: Box<ClientError>,
    },
    /// A value present on the wire failed a hard coercion.
    #[error("Unexpected value for {field} in {resource} data: {reason}")]
    Normalization {
        resource: String,
        field: String,
        reason: String,
    },
    /// Client-side precondition failure; no request was made.
    #[error("{0}")]
    Validation(String),
    #[error("The operation was cancelled")]
    Cancelled,
}

impl ClientError {
    /// Transient failures worth retrying: no response, a timeout, or a
    /// server-side 5xx. Client errors (4xx) are not retried since the
    /// outcome would not change and retrying would mask a real failure.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout => true,
            Self::Api { status, .. } => status.is_server_error(),
            _ => false,
        }
    }

    pub fn is_auth_required(&self) -> bool {
        matches!(self, Self::AuthRequired)
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(e)
        }
    }
}
