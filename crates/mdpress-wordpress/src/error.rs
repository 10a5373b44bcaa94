use thiserror::Error;

/// Errors from talking to the WordPress REST API.
///
/// Transport failures ([`WordPressError::Connect`]) are kept apart from
/// responses that arrived but did not carry a success indicator
/// ([`WordPressError::Rejected`]), so callers can tell an unreachable site
/// from a refused request.
#[derive(Debug, Error)]
pub enum WordPressError {
  /// The request never got a response.
  #[error("Cannot reach WordPress at {url}: {source}")]
  Connect {
    url:    String,
    #[source]
    source: reqwest::Error,
  },

  /// WordPress answered, but not with the expected result.
  #[error("WordPress rejected the request with status {status}: {body}")]
  Rejected { status: u16, body: String },

  /// The response body could not be understood.
  #[error("Invalid response from {url}: {message}")]
  InvalidResponse { url: String, message: String },

  /// The client could not be set up.
  #[error("Invalid WordPress client configuration: {0}")]
  Config(String),
}

impl WordPressError {
  /// Whether the site could not be reached at all.
  #[must_use]
  pub const fn is_connect(&self) -> bool {
    matches!(self, Self::Connect { .. })
  }
}
