//! Handler configuration: credentials, cache behavior and injected capabilities.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::metrics::{Metrics, NoopMetrics};
use crate::rate_limit::{RateLimiter, UnlimitedRateLimiter};
use crate::types::ProviderType;
use crate::utils::log_sanitizer::mask_token;

/// Property keys accepted for the API token, in lookup order.
pub const API_TOKEN_KEYS: [&str; 2] = ["DIGITALOCEAN_ACCESS_TOKEN", "apiToken"];

// ============ Credentials ============

/// Validation error for provider credentials.
///
/// Returned when credential fields are missing or empty.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CredentialValidationError {
    /// A required credential field is missing entirely.
    MissingField {
        /// Which provider the error relates to.
        provider: ProviderType,
        /// Machine-readable field key.
        field: String,
        /// Human-readable field label.
        label: String,
    },
    /// A credential field is present but empty/whitespace-only.
    EmptyField {
        /// Which provider the error relates to.
        provider: ProviderType,
        /// Machine-readable field key.
        field: String,
        /// Human-readable field label.
        label: String,
    },
}

impl std::fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { label, field, .. } => {
                write!(f, "Missing required field: {label} ({field})")
            }
            Self::EmptyField { label, field, .. } => {
                write!(f, "Field must not be empty: {label} ({field})")
            }
        }
    }
}

impl std::error::Error for CredentialValidationError {}

/// Credentials of the remote DNS service.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "provider", content = "credentials")]
pub enum ProviderCredentials {
    #[serde(rename = "digitalocean")]
    DigitalOcean {
        /// Personal access token with read/write scope.
        api_token: String,
    },
}

impl std::fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DigitalOcean { api_token } => f
                .debug_struct("DigitalOcean")
                .field("api_token", &mask_token(api_token))
                .finish(),
        }
    }
}

impl ProviderCredentials {
    /// Build credentials from a flat property map.
    ///
    /// The token is taken from the first of [`API_TOKEN_KEYS`] that is present.
    pub fn from_map(map: &HashMap<String, String>) -> Result<Self, CredentialValidationError> {
        let provider = ProviderType::DigitalOcean;
        let Some((key, value)) = API_TOKEN_KEYS
            .iter()
            .find_map(|key| map.get(*key).map(|value| (*key, value)))
        else {
            return Err(CredentialValidationError::MissingField {
                provider,
                field: API_TOKEN_KEYS.join("|"),
                label: "API Token".to_string(),
            });
        };

        if value.trim().is_empty() {
            return Err(CredentialValidationError::EmptyField {
                provider,
                field: key.to_string(),
                label: "API Token".to_string(),
            });
        }

        Ok(Self::DigitalOcean {
            api_token: value.trim().to_string(),
        })
    }

    pub fn provider_type(&self) -> ProviderType {
        match self {
            Self::DigitalOcean { .. } => ProviderType::DigitalOcean,
        }
    }

    pub(crate) fn api_token(&self) -> &str {
        match self {
            Self::DigitalOcean { api_token } => api_token,
        }
    }
}

// ============ Cache ============

/// Zone cache behavior.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CacheConfig {
    /// Maximum age of the cached zone list, `None` to keep it until invalidated.
    pub zones_ttl_secs: Option<u64>,
    /// Maximum age of a cached zone state, `None` to keep it until invalidated.
    pub zone_state_ttl_secs: Option<u64>,
    /// Fetch the zone state on every read (refreshes are still single-flight).
    pub disable_zone_state_cache: bool,
}

impl CacheConfig {
    pub fn zones_ttl(&self) -> Option<Duration> {
        self.zones_ttl_secs.map(Duration::from_secs)
    }

    pub fn zone_state_ttl(&self) -> Option<Duration> {
        self.zone_state_ttl_secs.map(Duration::from_secs)
    }
}

// ============ Handler ============

/// Everything the handler needs from its host.
#[derive(Clone)]
pub struct HandlerConfig {
    /// Flat provider properties (credentials).
    pub properties: HashMap<String, String>,
    pub cache: CacheConfig,
    /// Process-wide gate for outbound calls.
    pub rate_limiter: Arc<dyn RateLimiter>,
    pub metrics: Arc<dyn Metrics>,
    /// Override of the API endpoint, mainly for tests.
    pub api_base_url: Option<String>,
}

impl HandlerConfig {
    /// Configuration with an unlimited rate limiter and no metrics.
    pub fn new(properties: HashMap<String, String>) -> Self {
        Self {
            properties,
            cache: CacheConfig::default(),
            rate_limiter: Arc::new(UnlimitedRateLimiter),
            metrics: Arc::new(NoopMetrics),
            api_base_url: None,
        }
    }

    #[must_use]
    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    #[must_use]
    pub fn with_rate_limiter(mut self, rate_limiter: Arc<dyn RateLimiter>) -> Self {
        self.rate_limiter = rate_limiter;
        self
    }

    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<dyn Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    pub fn credentials(&self) -> Result<ProviderCredentials, CredentialValidationError> {
        ProviderCredentials::from_map(&self.properties)
    }
}
