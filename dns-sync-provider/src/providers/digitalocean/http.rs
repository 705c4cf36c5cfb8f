//! DigitalOcean HTTP request methods

use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{ProviderError, Result};
use crate::http_client::HttpUtils;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};
use crate::utils::log_sanitizer::truncate_for_log;

use super::{DigitalOceanError, DigitalOceanProvider};

impl DigitalOceanProvider {
    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Execute a GET request and decode the JSON body
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str, ctx: ErrorContext) -> Result<T> {
        let url = self.url(path);
        let request = self.client.get(&url).bearer_auth(&self.api_token);

        let response_text = self.dispatch(request, "GET", &url, ctx).await?;
        HttpUtils::parse_json(&response_text, self.provider_name())
    }

    /// Execute a request with a JSON body, ignoring the response body
    pub(crate) async fn send_json<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        ctx: ErrorContext,
    ) -> Result<()> {
        let payload =
            serde_json::to_string(body).map_err(|e| ProviderError::SerializationError {
                provider: self.provider_name().to_string(),
                detail: e.to_string(),
            })?;
        log::debug!("[{}] Request Body: {payload}", self.provider_name());

        let url = self.url(path);
        let request = self
            .client
            .request(method.clone(), &url)
            .bearer_auth(&self.api_token)
            .header("Content-Type", "application/json")
            .body(payload);

        self.dispatch(request, method.as_str(), &url, ctx).await?;
        Ok(())
    }

    /// Execute a DELETE request
    pub(crate) async fn delete(&self, path: &str, ctx: ErrorContext) -> Result<()> {
        let url = self.url(path);
        let request = self.client.delete(&url).bearer_auth(&self.api_token);

        self.dispatch(request, "DELETE", &url, ctx).await?;
        Ok(())
    }

    /// Send the request and turn any non-2xx answer into a mapped error
    async fn dispatch(
        &self,
        request: RequestBuilder,
        method_name: &str,
        url: &str,
        ctx: ErrorContext,
    ) -> Result<String> {
        let reply =
            HttpUtils::execute_request(request, self.provider_name(), method_name, url).await?;

        if reply.is_success() {
            return Ok(reply.body);
        }

        let raw = match serde_json::from_str::<DigitalOceanError>(&reply.body) {
            Ok(body) => RawApiError::with_code(body.id, body.message),
            Err(_) => RawApiError::with_code(
                status_error_id(reply.status),
                format!("HTTP {}: {}", reply.status, truncate_for_log(&reply.body)),
            ),
        };
        log::error!(
            "[{}] API error on {method_name} {url}: {:?} - {}",
            self.provider_name(),
            raw.code,
            raw.message
        );
        Err(self.map_error(raw, ctx))
    }
}

/// Error id implied by a status code when the body carries none
fn status_error_id(status: u16) -> String {
    match status {
        401 => "unauthorized".to_string(),
        403 => "forbidden".to_string(),
        404 => "not_found".to_string(),
        422 => "unprocessable_entity".to_string(),
        other => other.to_string(),
    }
}
