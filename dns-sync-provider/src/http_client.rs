//! HTTP plumbing shared by provider implementations
//!
//! A provider prepares its `RequestBuilder` (URL, auth, body) and sends it
//! through [`HttpUtils::execute_request`]. Every call is a single attempt.

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::ProviderError;
use crate::utils::log_sanitizer::truncate_for_log;

/// Status and body of a completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    /// 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Request execution helpers
pub struct HttpUtils;

impl HttpUtils {
    /// Send `request` and read the whole body.
    ///
    /// Throttling (429) and gateway failures (502..=504) never reach the
    /// caller as a reply; they come back as `RateLimited` and `NetworkError`.
    /// Any other status is returned for the provider to interpret.
    pub async fn execute_request(
        request: RequestBuilder,
        provider: &str,
        method: &str,
        target: &str,
    ) -> Result<HttpReply, ProviderError> {
        log::debug!("[{provider}] {method} {target}");

        let response = request
            .send()
            .await
            .map_err(|e| transport_error(provider, &e))?;
        let status = response.status();
        log::debug!("[{provider}] {method} {target} -> {status}");

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = retry_after_secs(&response);
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{provider}] throttled by the API (retry-after {retry_after:?})");
            return Err(ProviderError::RateLimited {
                provider: provider.to_string(),
                retry_after,
                raw_message: Some(truncate_for_log(&body)),
            });
        }

        if matches!(
            status,
            StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT
        ) {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{provider}] upstream unavailable ({status})");
            return Err(ProviderError::NetworkError {
                provider: provider.to_string(),
                detail: format!("HTTP {}: {}", status.as_u16(), truncate_for_log(&body)),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::NetworkError {
                provider: provider.to_string(),
                detail: format!("failed to read response body: {e}"),
            })?;
        log::debug!("[{provider}] body: {}", truncate_for_log(&body));

        Ok(HttpReply {
            status: status.as_u16(),
            body,
        })
    }

    /// Decode a JSON body, mapping failures to `ParseError`.
    pub fn parse_json<T: DeserializeOwned>(body: &str, provider: &str) -> Result<T, ProviderError> {
        serde_json::from_str(body).map_err(|e| {
            log::error!(
                "[{provider}] undecodable response ({e}): {}",
                truncate_for_log(body)
            );
            ProviderError::ParseError {
                provider: provider.to_string(),
                detail: e.to_string(),
            }
        })
    }
}

fn transport_error(provider: &str, err: &reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout {
            provider: provider.to_string(),
            detail: err.to_string(),
        }
    } else {
        ProviderError::NetworkError {
            provider: provider.to_string(),
            detail: err.to_string(),
        }
    }
}

/// `Retry-After` in seconds, the HTTP-date form is ignored.
fn retry_after_secs(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}
