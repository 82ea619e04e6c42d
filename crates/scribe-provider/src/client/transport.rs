//! Blocking HTTP transport for chat completions.

use std::time::Duration;

use ureq::Agent;

/// Failure below the provider protocol.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum TransportError {
    /// Server answered with a non-success status.
    #[error("HTTP error: {status} - {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
        /// Parsed `Retry-After` header.
        retry_after: Option<Duration>,
    },

    /// Could not reach the server.
    #[error("network error: {0}")]
    Network(String),

    /// Request exceeded the agent timeout.
    #[error("timeout: {0}")]
    Timeout(String),

    /// Anything else (TLS, protocol, unreadable body).
    #[error("{0}")]
    Other(String),
}

/// Sends one JSON POST and returns the raw response body.
///
/// Implementations block; callers run them on a blocking thread.
pub trait ChatTransport: Send + Sync {
    fn post_json(
        &self,
        url: &str,
        api_key: &str,
        body: &serde_json::Value,
    ) -> Result<String, TransportError>;
}

/// [`ChatTransport`] over a `ureq` agent.
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    /// Create a transport whose requests time out after `timeout`.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self { agent }
    }
}

impl ChatTransport for UreqTransport {
    fn post_json(
        &self,
        url: &str,
        api_key: &str,
        body: &serde_json::Value,
    ) -> Result<String, TransportError> {
        let response = self
            .agent
            .post(url)
            .header("Authorization", &format!("Bearer {api_key}"))
            .header("Accept", "application/json")
            .send_json(body)
            .map_err(map_ureq_error)?;

        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|value| value.to_str().ok())
            .and_then(parse_retry_after);
        let mut body_reader = response.into_body();

        if status >= 400 {
            let error_body = body_reader
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(TransportError::Status {
                status,
                body: error_body,
                retry_after,
            });
        }

        body_reader.read_to_string().map_err(map_ureq_error)
    }
}

fn map_ureq_error(error: ureq::Error) -> TransportError {
    match error {
        ureq::Error::Timeout(timeout) => TransportError::Timeout(timeout.to_string()),
        ureq::Error::Io(err) => TransportError::Network(err.to_string()),
        ureq::Error::HostNotFound => TransportError::Network("host not found".to_owned()),
        ureq::Error::ConnectionFailed => TransportError::Network("connection failed".to_owned()),
        other => TransportError::Other(other.to_string()),
    }
}

/// `Retry-After` in delta-seconds form. HTTP-date values are ignored.
fn parse_retry_after(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}
