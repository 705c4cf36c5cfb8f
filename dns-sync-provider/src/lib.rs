//! # dns-sync-provider
//!
//! DigitalOcean DNS provider adapter for a host reconciliation controller.
//!
//! The host asks the [`DigitalOceanHandler`] for the zones it is authoritative
//! for and for the current record-sets of a zone, computes the changes it
//! wants and hands them back as an ordered batch of [`ChangeRequest`]s.
//!
//! ## Components
//!
//! | Part | Role |
//! |------|------|
//! | [`DigitalOceanProvider`] | HTTP transport to the DigitalOcean v2 domains API |
//! | [`DnsClient`] | Paginated listing and single-record mutations, rate-limited and metered |
//! | [`normalize_zone_records`] | Canonical records and forwarded subdomains |
//! | [`ZoneState`] | Immutable record-set snapshot of one zone |
//! | [`ZoneCache`] | Single-flight per-zone memo, invalidated on conflicts |
//! | [`execute_requests`] | Ordered batch execution with a TTL floor |
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)*: use the platform's native TLS implementation.
//! - **`rustls`**: use rustls. Recommended for cross-compilation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::collections::HashMap;
//!
//! use dns_sync_provider::{
//!     ChangeRequest, DigitalOceanHandler, DnsRecordType, HandlerConfig, Record,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let props = HashMap::from([(
//!         "DIGITALOCEAN_ACCESS_TOKEN".to_string(),
//!         "your-token".to_string(),
//!     )]);
//!     let handler = DigitalOceanHandler::new(&HandlerConfig::new(props))?;
//!
//!     let zones = handler.get_zones().await?;
//!     let zone = &zones[0];
//!     let state = handler.get_zone_state(zone).await?;
//!     for set in state.sets().values() {
//!         println!("{} (ttl {})", set.key, set.ttl);
//!     }
//!
//!     let record = Record::new(zone.key(), "www.example.com", DnsRecordType::A, "1.2.3.4", 300);
//!     handler
//!         .execute_requests(zone, &state, &[ChangeRequest::create(record)])
//!         .await?;
//!
//!     handler.release().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Remote calls fail with [`ProviderError`]; the engine wraps them in
//! [`SyncError`]. A failed batch reports [`SyncError::ChangeFailed`] with the
//! number of requests applied before the failure. Nothing is retried: transient
//! errors (`NetworkError`, `Timeout`, `RateLimited`) surface immediately and
//! the host decides when to try again.

mod cache;
mod client;
mod config;
mod error;
mod executor;
mod handler;
mod http_client;
mod metrics;
mod normalize;
mod providers;
mod rate_limit;
mod state;
mod traits;
mod types;
mod utils;

#[cfg(test)]
mod test_utils;

// Re-export error types
pub use error::{ProviderError, Result, SyncError, SyncResult};

// Re-export the handler and its building blocks
pub use cache::{ZoneCache, ZoneSource};
pub use client::{DnsClient, floor_ttl, pages};
pub use executor::execute_requests;
pub use handler::DigitalOceanHandler;
pub use normalize::{NormalizedRecords, normalize_record, normalize_zone_records};
pub use state::ZoneState;

// Re-export configuration and injected capabilities
pub use config::{
    API_TOKEN_KEYS, CacheConfig, CredentialValidationError, HandlerConfig, ProviderCredentials,
};
pub use metrics::{Metrics, NoopMetrics, RequestType};
pub use rate_limit::{RateLimiter, UnlimitedRateLimiter};

// Re-export the remote API seam
pub use providers::{DigitalOceanProvider, DigitalOceanProviderBuilder};
pub use traits::DnsApi;

// Re-export types
pub use types::{
    ChangeAction, ChangeRequest, DnsRecordType, DnsSet, DnsSetEntry, DnsSetKey, MIN_TTL, PAGE_SIZE,
    Page, PaginationParams, ProviderType, Record, RecordPayload, RemoteRecord, RemoteZone, Zone,
};
