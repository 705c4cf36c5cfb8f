//! Rate-limited, metered access to the remote DNS API.
//!
//! Listing calls walk every page before returning; one logical call takes one
//! rate limiter token and one metric increment regardless of the page count.

use std::future::Future;
use std::sync::Arc;

use futures::stream::{self, Stream, TryStreamExt};

use crate::error::{Result, SyncError, SyncResult};
use crate::metrics::{Metrics, RequestType};
use crate::providers::common::full_name_to_relative;
use crate::rate_limit::RateLimiter;
use crate::traits::DnsApi;
use crate::types::{
    ChangeAction, MIN_TTL, Page, PaginationParams, Record, RecordPayload, RemoteRecord, RemoteZone,
};

/// Lazy sequence of pages starting at page 1.
///
/// `fetch` is called once per page until a page without successor is returned
/// or a fetch fails. The stream ends after the first error.
pub fn pages<'a, T, F, Fut>(fetch: F) -> impl Stream<Item = Result<Vec<T>>> + 'a
where
    T: 'a,
    F: Fn(PaginationParams) -> Fut + 'a,
    Fut: Future<Output = Result<Page<T>>> + 'a,
{
    stream::try_unfold(Some(1_u32), move |next| {
        let request = next.map(|page| (page, fetch(PaginationParams::page(page))));
        async move {
            let Some((current, request)) = request else {
                return Ok(None);
            };
            let page = request.await?;
            // a successor must move forward, anything else ends the listing
            let next = page.next_page.filter(|n| *n > current);
            Ok(Some((page.items, next)))
        }
    })
}

/// Raise a TTL to the service minimum.
pub fn floor_ttl(ttl: u32) -> u32 {
    ttl.max(MIN_TTL)
}

/// Remote listing and mutation client.
pub struct DnsClient {
    api: Arc<dyn DnsApi>,
    rate_limiter: Arc<dyn RateLimiter>,
    metrics: Arc<dyn Metrics>,
}

impl DnsClient {
    pub fn new(
        api: Arc<dyn DnsApi>,
        rate_limiter: Arc<dyn RateLimiter>,
        metrics: Arc<dyn Metrics>,
    ) -> Self {
        Self {
            api,
            rate_limiter,
            metrics,
        }
    }

    pub fn provider_name(&self) -> &'static str {
        self.api.id()
    }

    /// All zones of the account, in server order.
    pub async fn list_zones(&self) -> Result<Vec<RemoteZone>> {
        self.metrics.add_requests(RequestType::ListZones, 1);
        self.rate_limiter.accept().await;

        let api = &self.api;
        let zones: Vec<RemoteZone> =
            pages(move |params| async move { api.list_zones_page(&params).await })
                .try_concat()
                .await?;

        log::debug!("[{}] listed {} zone(s)", self.provider_name(), zones.len());
        Ok(zones)
    }

    /// All records of `domain`, in server order.
    pub async fn list_records(&self, domain: &str) -> Result<Vec<RemoteRecord>> {
        self.metrics
            .add_zone_requests(domain, RequestType::ListRecords, 1);
        self.rate_limiter.accept().await;

        let api = &self.api;
        let records: Vec<RemoteRecord> =
            pages(move |params| async move { api.list_records_page(domain, &params).await })
                .try_concat()
                .await?;

        log::debug!(
            "[{}] listed {} record(s) of '{domain}'",
            self.provider_name(),
            records.len()
        );
        Ok(records)
    }

    /// Create `record` in its zone.
    pub async fn create_record(&self, record: &Record) -> SyncResult<()> {
        let payload = Self::payload(record);

        self.metrics
            .add_zone_requests(&record.zone, RequestType::CreateRecords, 1);
        self.rate_limiter.accept().await;

        self.api.create_record(&record.zone, &payload).await?;
        Ok(())
    }

    /// Replace the record addressed by `record.id`.
    pub async fn update_record(&self, record: &Record) -> SyncResult<()> {
        let id = Self::parse_record_id(ChangeAction::Update, record)?;
        let payload = Self::payload(record);

        self.metrics
            .add_zone_requests(&record.zone, RequestType::UpdateRecords, 1);
        self.rate_limiter.accept().await;

        self.api.update_record(&record.zone, id, &payload).await?;
        Ok(())
    }

    /// Delete the record addressed by `record.id`.
    pub async fn delete_record(&self, record: &Record) -> SyncResult<()> {
        let id = Self::parse_record_id(ChangeAction::Delete, record)?;

        self.metrics
            .add_zone_requests(&record.zone, RequestType::DeleteRecords, 1);
        self.rate_limiter.accept().await;

        self.api.delete_record(&record.zone, id).await?;
        Ok(())
    }

    fn parse_record_id(action: ChangeAction, record: &Record) -> SyncResult<u64> {
        let Some(id) = record.id.as_deref() else {
            return Err(SyncError::MissingRecordId {
                action,
                record_type: record.record_type,
                name: record.name.clone(),
                value: record.value.clone(),
            });
        };

        id.parse::<u64>()
            .map_err(|e| SyncError::InvalidRecordId {
                action,
                record_type: record.record_type,
                name: record.name.clone(),
                id: id.to_string(),
                detail: e.to_string(),
            })
    }

    /// Wire payload: zone-relative name, absolute host names, floored TTL.
    fn payload(record: &Record) -> RecordPayload {
        let data = if record.record_type.has_hostname_value() && !record.value.ends_with('.') {
            format!("{}.", record.value)
        } else {
            record.value.clone()
        };

        RecordPayload {
            record_type: record.record_type.as_str().to_string(),
            name: full_name_to_relative(&record.name, &record.zone),
            data,
            ttl: floor_ttl(record.ttl),
        }
    }
}
