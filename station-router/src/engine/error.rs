//! Routing engine error types.

/// Errors from a routing engine client.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The engine could not be brought up (bad dataset, bad base URL).
    #[error("engine initialisation failed: {message}")]
    Init { message: String },

    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Engine answered with an unexpected HTTP status and no usable body
    #[error("engine error {status}: {message}")]
    Api { status: u16, message: String },

    /// Engine answered with a non-`Ok` response code
    #[error("engine returned {code}: {message}")]
    Code { code: String, message: String },

    /// Response body was not valid JSON
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Response was JSON but did not have the expected shape
    #[error("malformed engine response: {0}")]
    Malformed(String),

    /// The request was rejected before reaching the engine
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl EngineError {
    pub(crate) fn init(message: impl Into<String>) -> Self {
        EngineError::Init {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = EngineError::init("no such file");
        assert_eq!(err.to_string(), "engine initialisation failed: no such file");

        let err = EngineError::Api {
            status: 503,
            message: "Service Unavailable".into(),
        };
        assert_eq!(err.to_string(), "engine error 503: Service Unavailable");

        let err = EngineError::Code {
            code: "InvalidQuery".into(),
            message: "Query string malformed".into(),
        };
        assert_eq!(
            err.to_string(),
            "engine returned InvalidQuery: Query string malformed"
        );

        let err = EngineError::Malformed("waypoint has no hint".into());
        assert!(err.to_string().contains("waypoint has no hint"));
    }
}
