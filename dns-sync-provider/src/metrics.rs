//! Metrics sink capability injected by the host.

use serde::{Deserialize, Serialize};

/// Kind of logical request reported to the metrics sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    ListZones,
    ListRecords,
    CreateRecords,
    UpdateRecords,
    DeleteRecords,
    /// Zone list served from the cache.
    CachedGetZones,
    /// Zone state served from the cache.
    CachedGetZoneState,
}

impl RequestType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ListZones => "list_zones",
            Self::ListRecords => "list_records",
            Self::CreateRecords => "create_records",
            Self::UpdateRecords => "update_records",
            Self::DeleteRecords => "delete_records",
            Self::CachedGetZones => "cached_getzones",
            Self::CachedGetZoneState => "cached_getzonestate",
        }
    }
}

/// Counter sink for remote and cached requests.
pub trait Metrics: Send + Sync {
    /// Add `n` requests of the given type.
    fn add_requests(&self, request_type: RequestType, n: u64);

    /// Add `n` requests of the given type against one zone.
    ///
    /// Defaults to the zone-less counter.
    fn add_zone_requests(&self, _zone: &str, request_type: RequestType, n: u64) {
        self.add_requests(request_type, n);
    }
}

/// Discards every count.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetrics;

impl Metrics for NoopMetrics {
    fn add_requests(&self, _request_type: RequestType, _n: u64) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_names() {
        assert_eq!(RequestType::ListZones.as_str(), "list_zones");
        assert_eq!(RequestType::DeleteRecords.as_str(), "delete_records");
        assert_eq!(RequestType::CachedGetZones.as_str(), "cached_getzones");
        assert_eq!(RequestType::CachedGetZoneState.as_str(), "cached_getzonestate");
    }

    #[test]
    fn zone_counts_fall_back_to_plain_counter() {
        struct Last(std::sync::Mutex<Option<(RequestType, u64)>>);

        impl Metrics for Last {
            fn add_requests(&self, request_type: RequestType, n: u64) {
                *self.0.lock().unwrap() = Some((request_type, n));
            }
        }

        let sink = Last(std::sync::Mutex::new(None));
        sink.add_zone_requests("example.com", RequestType::ListRecords, 3);
        assert_eq!(*sink.0.lock().unwrap(), Some((RequestType::ListRecords, 3)));
    }
}
