//! Bybit v5 REST client.
//!
//! Wraps the `{retCode, retMsg, result}` response envelope and implements the
//! single TLS-verification fallback: a request whose connect-layer failure
//! traces back to a TLS or certificate problem is retried exactly once with
//! certificate verification disabled, logged as a degraded-trust path. Any
//! other transport error or non-zero `retCode` is terminal for that call.

use market_signal_core::MarketDataError;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::time::Duration;

/// Header carrying the API key on every REST call.
const API_KEY_HEADER: &str = "X-BAPI-API-KEY";

/// Bybit v5 response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    #[serde(rename = "retCode")]
    pub ret_code: i64,
    #[serde(rename = "retMsg", default)]
    pub ret_msg: String,
    #[serde(default)]
    pub result: JsonValue,
}

/// Unwraps the envelope: `retCode == 0` signals success.
pub(crate) fn unwrap_envelope(envelope: Envelope) -> Result<JsonValue, MarketDataError> {
    if envelope.ret_code != 0 {
        return Err(MarketDataError::Upstream {
            code: envelope.ret_code,
            message: envelope.ret_msg,
        });
    }
    Ok(envelope.result)
}

pub struct BybitClient {
    http: reqwest::Client,
    /// Used only for the one-shot TLS fallback; never the first choice.
    insecure_http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl BybitClient {
    /// Creates a new client for the given base URL and API key.
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        let insecure_http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .danger_accept_invalid_certs(true)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            insecure_http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Issues a GET request and returns the envelope's `result` payload.
    ///
    /// # Errors
    /// Returns `Transport` after an exhausted TLS fallback, `Upstream` on a
    /// non-success HTTP status or non-zero `retCode`, and `Parse` when the
    /// envelope itself cannot be decoded.
    pub async fn get_result(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<JsonValue, MarketDataError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "requesting market data");

        let response = match self.send(&self.http, &url, query).await {
            Ok(response) => response,
            Err(e) if is_tls_failure(&e) => {
                tracing::warn!(
                    %url,
                    error = %e,
                    "TLS verification failure, retrying once with verification disabled"
                );
                self.send(&self.insecure_http, &url, query).await?
            }
            Err(e) => return Err(e.into()),
        };

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(MarketDataError::Upstream {
                code: i64::from(status.as_u16()),
                message: text,
            });
        }

        let envelope: Envelope = response
            .json()
            .await
            .map_err(|e| MarketDataError::Parse(e.to_string()))?;

        unwrap_envelope(envelope)
    }

    async fn send(
        &self,
        client: &reqwest::Client,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<reqwest::Response, reqwest::Error> {
        client
            .get(url)
            .query(query)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
    }
}

/// True when a connect-layer failure traces back to a TLS or certificate
/// problem. Plain refusals and DNS failures stay terminal.
fn is_tls_failure(err: &reqwest::Error) -> bool {
    err.is_connect() && chain_mentions_tls(err)
}

fn chain_mentions_tls(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = current {
        let text = e.to_string().to_lowercase();
        if text.contains("certificate") || text.contains("tls") || text.contains("handshake") {
            return true;
        }
        current = e.source();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_success_yields_result() {
        let envelope: Envelope =
            serde_json::from_value(json!({"retCode": 0, "retMsg": "OK", "result": {"list": []}}))
                .unwrap();
        let result = unwrap_envelope(envelope).unwrap();
        assert_eq!(result, json!({"list": []}));
    }

    #[test]
    fn test_nonzero_ret_code_is_upstream_error_with_no_partial_data() {
        let envelope: Envelope = serde_json::from_value(
            json!({"retCode": 10001, "retMsg": "params error", "result": {"list": [[1, 2]]}}),
        )
        .unwrap();

        match unwrap_envelope(envelope) {
            Err(MarketDataError::Upstream { code, message }) => {
                assert_eq!(code, 10001);
                assert_eq!(message, "params error");
            }
            other => panic!("expected Upstream error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_connection_refused_surfaces_transport_error() {
        // Nothing listens here; a plain refusal is not a TLS failure and
        // must stay terminal without an insecure retry.
        let client = BybitClient::new("http://127.0.0.1:9", "key");
        match client.get_result("/v5/market/kline", &[]).await {
            Err(MarketDataError::Transport(e)) => assert!(e.is_connect()),
            other => panic!("expected Transport error, got {other:?}"),
        }
    }

    #[test]
    fn test_certificate_failure_detected_in_error_chain() {
        let inner = std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "invalid peer certificate: UnknownIssuer",
        );
        let outer = std::io::Error::other(inner);
        assert!(chain_mentions_tls(&outer));

        let handshake = std::io::Error::other("tls handshake eof");
        assert!(chain_mentions_tls(&handshake));
    }

    #[test]
    fn test_plain_connect_errors_are_not_tls_failures() {
        let refused =
            std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
        assert!(!chain_mentions_tls(&refused));

        let dns = std::io::Error::other("failed to lookup address information");
        assert!(!chain_mentions_tls(&dns));
    }

    #[test]
    fn test_envelope_tolerates_missing_optional_fields() {
        let envelope: Envelope = serde_json::from_value(json!({"retCode": 0})).unwrap();
        assert_eq!(envelope.ret_msg, "");
        assert!(unwrap_envelope(envelope).unwrap().is_null());
    }
}
