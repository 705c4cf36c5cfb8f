//! DigitalOcean DNS Provider

mod error;
mod http;
mod provider;
mod types;

use reqwest::Client;

use crate::providers::common::create_http_client;

pub(crate) use types::{
    DigitalOceanError, DigitalOceanLinks, DomainListResponse, RecordListResponse,
};

pub(crate) const DO_API_BASE: &str = "https://api.digitalocean.com/v2";

/// DigitalOcean Domains API client
pub struct DigitalOceanProvider {
    pub(crate) client: Client,
    pub(crate) api_token: String,
    pub(crate) base_url: String,
}

/// DigitalOcean Provider Builder
pub struct DigitalOceanProviderBuilder {
    api_token: String,
    base_url: String,
    client: Option<Client>,
}

impl DigitalOceanProviderBuilder {
    fn new(api_token: String) -> Self {
        Self {
            api_token,
            base_url: DO_API_BASE.to_string(),
            client: None,
        }
    }

    /// Send requests to another endpoint (e.g. a mock server).
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Use a preconfigured HTTP client.
    #[must_use]
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    pub fn build(self) -> DigitalOceanProvider {
        DigitalOceanProvider {
            client: self.client.unwrap_or_else(create_http_client),
            api_token: self.api_token,
            base_url: self.base_url,
        }
    }
}

impl DigitalOceanProvider {
    pub fn new(api_token: String) -> Self {
        Self::builder(api_token).build()
    }

    pub fn builder(api_token: String) -> DigitalOceanProviderBuilder {
        DigitalOceanProviderBuilder::new(api_token)
    }
}
