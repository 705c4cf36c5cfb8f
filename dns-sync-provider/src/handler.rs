//! DigitalOcean handler
//!
//! Entry point for the host reconciler. Composes the remote client, the zone
//! cache and the change executor.

use std::sync::Arc;

use async_trait::async_trait;

use crate::cache::{ZoneCache, ZoneSource};
use crate::client::DnsClient;
use crate::config::HandlerConfig;
use crate::error::SyncResult;
use crate::executor;
use crate::normalize::normalize_zone_records;
use crate::providers::DigitalOceanProvider;
use crate::state::ZoneState;
use crate::traits::DnsApi;
use crate::types::{ChangeRequest, ProviderType, Zone};
use crate::utils::log_sanitizer::mask_token;

/// Zone listing, zone state and change execution against DigitalOcean.
pub struct DigitalOceanHandler {
    client: Arc<DnsClient>,
    cache: ZoneCache,
}

impl DigitalOceanHandler {
    /// Handler talking to the DigitalOcean API with the configured token.
    pub fn new(config: &HandlerConfig) -> SyncResult<Self> {
        let credentials = config.credentials()?;

        let mut builder = DigitalOceanProvider::builder(credentials.api_token().to_string());
        if let Some(url) = &config.api_base_url {
            builder = builder.base_url(url.clone());
        }

        log::info!(
            "[{}] handler created with token {}",
            credentials.provider_type(),
            mask_token(credentials.api_token())
        );
        Ok(Self::with_api(Arc::new(builder.build()), config))
    }

    /// Handler over any remote API implementation.
    pub fn with_api(api: Arc<dyn DnsApi>, config: &HandlerConfig) -> Self {
        let client = Arc::new(DnsClient::new(
            api,
            config.rate_limiter.clone(),
            config.metrics.clone(),
        ));
        let source = Arc::new(RemoteZoneSource {
            client: client.clone(),
        });
        let cache = ZoneCache::new(config.cache.clone(), config.metrics.clone(), source);

        Self { client, cache }
    }

    pub fn provider_type(&self) -> ProviderType {
        ProviderType::DigitalOcean
    }

    /// Zones of the account with their delegated subdomains.
    pub async fn get_zones(&self) -> SyncResult<Arc<Vec<Zone>>> {
        self.cache.get_zones().await
    }

    /// Current record-sets of `zone`.
    pub async fn get_zone_state(&self, zone: &Zone) -> SyncResult<Arc<ZoneState>> {
        self.cache.get_zone_state(zone).await
    }

    /// Drop the cached state of `zone`. Returns whether the host should retry.
    pub async fn report_zone_state_conflict(
        &self,
        zone: &Zone,
        err: &(dyn std::error::Error + Send + Sync),
    ) -> bool {
        self.cache.report_zone_state_conflict(zone, err).await
    }

    /// Apply `requests` in order and feed the outcome back into the cache.
    ///
    /// `state` is the snapshot the requests were computed from.
    pub async fn execute_requests(
        &self,
        zone: &Zone,
        state: &ZoneState,
        requests: &[ChangeRequest],
    ) -> SyncResult<usize> {
        let result = executor::execute_requests(&self.client, zone, state, requests).await;
        self.cache
            .apply_requests(result.as_ref().err(), zone, requests)
            .await;
        result
    }

    /// Release cached state. The handler is unusable afterwards.
    pub async fn release(&self) {
        self.cache.release().await;
    }
}

/// Builds zones and zone states from remote listings.
struct RemoteZoneSource {
    client: Arc<DnsClient>,
}

#[async_trait]
impl ZoneSource for RemoteZoneSource {
    async fn fetch_zones(&self) -> SyncResult<Vec<Zone>> {
        let remote = self.client.list_zones().await?;
        let mut zones = Vec::with_capacity(remote.len());

        for domain in remote {
            let zone = Zone::new(domain.name.clone(), domain.name);
            let records = self.client.list_records(&zone.domain).await?;
            let forwarded = normalize_zone_records(zone.key(), &zone.apex, &records).forwarded;
            if !forwarded.is_empty() {
                log::debug!(
                    "[{}] zone '{}' delegates {forwarded:?}",
                    self.client.provider_name(),
                    zone.key()
                );
            }
            zones.push(zone.with_forwarded_domains(forwarded));
        }

        Ok(zones)
    }

    async fn fetch_zone_state(&self, zone: &Zone) -> SyncResult<ZoneState> {
        let records = self.client.list_records(&zone.domain).await?;
        let normalized = normalize_zone_records(zone.key(), &zone.apex, &records);
        ZoneState::build(zone.key(), normalized.records)
    }
}
