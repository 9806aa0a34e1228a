//! Error taxonomy for the market-data pipeline.
//!
//! Each variant maps to a distinct recovery policy:
//! - [`MarketDataError::Transport`]: terminal per call after the single
//!   TLS-verification fallback attempt.
//! - [`MarketDataError::Upstream`]: terminal per call, carries the provider's
//!   status code and message.
//! - [`MarketDataError::DataUnavailable`]: terminal per call; callers fall
//!   back to a neutral/default value instead of aborting the cycle.
//! - [`MarketDataError::Parse`]: row- or message-scoped only; never aborts an
//!   enclosing batch or connection.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream error (retCode {code}): {message}")]
    Upstream { code: i64, message: String },

    #[error("no data available for {context}")]
    DataUnavailable { context: String },

    #[error("malformed payload: {0}")]
    Parse(String),
}

impl MarketDataError {
    /// Shorthand for an empty-result failure with call context.
    #[must_use]
    pub fn unavailable(context: impl Into<String>) -> Self {
        Self::DataUnavailable {
            context: context.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_error_display() {
        let err = MarketDataError::Upstream {
            code: 10001,
            message: "params error".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "upstream error (retCode 10001): params error"
        );
    }

    #[test]
    fn test_unavailable_carries_context() {
        let err = MarketDataError::unavailable("kline BTCUSDT/1");
        assert!(err.to_string().contains("kline BTCUSDT/1"));
    }
}
