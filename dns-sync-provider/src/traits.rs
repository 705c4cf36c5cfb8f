use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::types::{Page, PaginationParams, RecordPayload, RemoteRecord, RemoteZone};

/// Raw API error (internal use)
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// Error id as sent by the provider
    pub code: Option<String>,
    /// Error message as returned by the API
    pub message: String,
}

impl RawApiError {
    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

/// Extra information used when mapping an error (internal use)
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// Record id (for `RecordNotFound`)
    pub record_id: Option<String>,
    /// Domain name (for `DomainNotFound`)
    pub domain: Option<String>,
}

impl ErrorContext {
    pub fn domain(domain: &str) -> Self {
        Self {
            domain: Some(domain.to_string()),
            ..Self::default()
        }
    }

    pub fn record(domain: &str, record_id: u64) -> Self {
        Self {
            record_id: Some(record_id.to_string()),
            domain: Some(domain.to_string()),
        }
    }
}

/// Maps raw API errors to [`ProviderError`] (internal use)
pub(crate) trait ProviderErrorMapper {
    /// Provider identifier
    fn provider_name(&self) -> &'static str;

    /// Map a raw API error to the unified error type
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError;

    /// Shortcut: unknown error (fallback)
    fn unknown_error(&self, raw: RawApiError) -> ProviderError {
        ProviderError::Unknown {
            provider: self.provider_name().to_string(),
            raw_code: raw.code,
            raw_message: raw.message,
        }
    }
}

/// Remote DNS API, one method per HTTP call.
///
/// Implementations do not rate-limit, meter or paginate; that is the job of
/// [`DnsClient`](crate::DnsClient).
#[async_trait]
pub trait DnsApi: Send + Sync {
    /// Provider identifier
    fn id(&self) -> &'static str;

    /// Fetch one page of the domain list.
    async fn list_zones_page(&self, params: &PaginationParams) -> Result<Page<RemoteZone>>;

    /// Fetch one page of the records of `domain`.
    async fn list_records_page(
        &self,
        domain: &str,
        params: &PaginationParams,
    ) -> Result<Page<RemoteRecord>>;

    /// Create a record in `domain`.
    async fn create_record(&self, domain: &str, payload: &RecordPayload) -> Result<()>;

    /// Replace record `record_id` of `domain`.
    async fn update_record(
        &self,
        domain: &str,
        record_id: u64,
        payload: &RecordPayload,
    ) -> Result<()>;

    /// Delete record `record_id` of `domain`.
    async fn delete_record(&self, domain: &str, record_id: u64) -> Result<()>;
}
