//! Test helpers
//!
//! Fake remote API and counting capabilities.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::metrics::{Metrics, RequestType};
use crate::rate_limit::RateLimiter;
use crate::traits::DnsApi;
use crate::types::{Page, PaginationParams, RecordPayload, RemoteRecord, RemoteZone};

// ===== FakeApi =====

/// One call received by [`FakeApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    ListZones { page: u32 },
    ListRecords { domain: String, page: u32 },
    Create { domain: String, payload: RecordPayload },
    Update { domain: String, id: u64, payload: RecordPayload },
    Delete { domain: String, id: u64 },
}

type FailurePredicate = Box<dyn Fn(&ApiCall) -> bool + Send + Sync>;

/// In-memory remote API serving canned pages and recording every call.
pub struct FakeApi {
    zone_pages: Vec<Vec<RemoteZone>>,
    record_pages: Mutex<HashMap<String, Vec<Vec<RemoteRecord>>>>,
    calls: Mutex<Vec<ApiCall>>,
    failures: Vec<FailurePredicate>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            zone_pages: Vec::new(),
            record_pages: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            failures: Vec::new(),
        }
    }

    /// Zone list split into pages of domain names.
    pub fn with_zone_pages(mut self, pages: Vec<Vec<String>>) -> Self {
        self.zone_pages = pages
            .into_iter()
            .map(|names| {
                names
                    .into_iter()
                    .map(|name| RemoteZone { name, ttl: Some(1800) })
                    .collect()
            })
            .collect();
        self
    }

    /// Zones on a single page.
    pub fn with_zones(self, names: &[&str]) -> Self {
        self.with_zone_pages(vec![names.iter().map(|n| (*n).to_string()).collect()])
    }

    /// Records of `domain` split into pages.
    pub fn with_record_pages(self, domain: &str, pages: Vec<Vec<RemoteRecord>>) -> Self {
        self.set_records(domain, pages);
        self
    }

    /// Records of `domain` on a single page.
    pub fn with_records(self, domain: &str, records: Vec<RemoteRecord>) -> Self {
        self.with_record_pages(domain, vec![records])
    }

    /// Replace the records served for `domain`.
    pub fn set_records(&self, domain: &str, pages: Vec<Vec<RemoteRecord>>) {
        self.record_pages
            .lock()
            .unwrap()
            .insert(domain.to_string(), pages);
    }

    /// Fail every call matching `predicate`.
    pub fn fail_when(mut self, predicate: impl Fn(&ApiCall) -> bool + Send + Sync + 'static) -> Self {
        self.failures.push(Box::new(predicate));
        self
    }

    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, predicate: impl Fn(&ApiCall) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| predicate(c)).count()
    }

    fn record(&self, call: ApiCall) -> Result<()> {
        let failed = self.failures.iter().any(|f| f(&call));
        let err = match &call {
            ApiCall::Update { id, .. } | ApiCall::Delete { id, .. } => {
                ProviderError::RecordNotFound {
                    provider: "fake".to_string(),
                    record_id: id.to_string(),
                    raw_message: None,
                }
            }
            _ => ProviderError::NetworkError {
                provider: "fake".to_string(),
                detail: "injected failure".to_string(),
            },
        };
        self.calls.lock().unwrap().push(call);
        if failed { Err(err) } else { Ok(()) }
    }

    fn page_of<T: Clone>(pages: &[Vec<T>], params: &PaginationParams) -> Page<T> {
        let index = params.page as usize - 1;
        let items = pages.get(index).cloned().unwrap_or_default();
        if index + 1 < pages.len() {
            Page::more(items, params.page + 1)
        } else {
            Page::last(items)
        }
    }
}

#[async_trait]
impl DnsApi for FakeApi {
    fn id(&self) -> &'static str {
        "fake"
    }

    async fn list_zones_page(&self, params: &PaginationParams) -> Result<Page<RemoteZone>> {
        self.record(ApiCall::ListZones { page: params.page })?;
        Ok(Self::page_of(&self.zone_pages, params))
    }

    async fn list_records_page(
        &self,
        domain: &str,
        params: &PaginationParams,
    ) -> Result<Page<RemoteRecord>> {
        self.record(ApiCall::ListRecords {
            domain: domain.to_string(),
            page: params.page,
        })?;
        let pages = self
            .record_pages
            .lock()
            .unwrap()
            .get(domain)
            .cloned()
            .unwrap_or_default();
        Ok(Self::page_of(&pages, params))
    }

    async fn create_record(&self, domain: &str, payload: &RecordPayload) -> Result<()> {
        self.record(ApiCall::Create {
            domain: domain.to_string(),
            payload: payload.clone(),
        })
    }

    async fn update_record(
        &self,
        domain: &str,
        record_id: u64,
        payload: &RecordPayload,
    ) -> Result<()> {
        self.record(ApiCall::Update {
            domain: domain.to_string(),
            id: record_id,
            payload: payload.clone(),
        })
    }

    async fn delete_record(&self, domain: &str, record_id: u64) -> Result<()> {
        self.record(ApiCall::Delete {
            domain: domain.to_string(),
            id: record_id,
        })
    }
}

/// Provider-native record with a relative name.
pub fn remote_record(id: u64, record_type: &str, name: &str, data: &str, ttl: u32) -> RemoteRecord {
    RemoteRecord {
        id,
        record_type: record_type.to_string(),
        name: name.to_string(),
        data: data.to_string(),
        ttl,
    }
}

// ===== Capabilities =====

#[derive(Default)]
pub struct CountingRateLimiter {
    accepted: AtomicUsize,
}

impl CountingRateLimiter {
    pub fn count(&self) -> usize {
        self.accepted.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RateLimiter for CountingRateLimiter {
    async fn accept(&self) {
        self.accepted.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct CountingMetrics {
    counts: Mutex<HashMap<RequestType, u64>>,
}

impl CountingMetrics {
    pub fn count(&self, request_type: RequestType) -> u64 {
        self.counts
            .lock()
            .unwrap()
            .get(&request_type)
            .copied()
            .unwrap_or_default()
    }

    pub fn total(&self) -> u64 {
        self.counts.lock().unwrap().values().sum()
    }
}

impl Metrics for CountingMetrics {
    fn add_requests(&self, request_type: RequestType, n: u64) {
        *self.counts.lock().unwrap().entry(request_type).or_default() += n;
    }
}
