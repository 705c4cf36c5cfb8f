//! Zone cache
//!
//! Memoizes the zone list and one [`ZoneState`] per zone. Each slot sits
//! behind its own async mutex which is held across a refresh, so concurrent
//! readers of a stale slot wait for one fetch instead of issuing their own.
//! A reader that waited receives the outcome of that fetch, error included.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::{Mutex, MutexGuard, RwLock};

use crate::config::CacheConfig;
use crate::error::{SyncError, SyncResult};
use crate::metrics::{Metrics, RequestType};
use crate::state::ZoneState;
use crate::types::{ChangeAction, ChangeRequest, Zone};

/// Where the cache gets fresh data from.
#[async_trait]
pub trait ZoneSource: Send + Sync {
    /// Every zone of the account.
    async fn fetch_zones(&self) -> SyncResult<Vec<Zone>>;

    /// Current state of one zone.
    async fn fetch_zone_state(&self, zone: &Zone) -> SyncResult<ZoneState>;
}

/// One cached value with its validity.
struct Slot<T> {
    value: Option<Arc<T>>,
    valid: bool,
    fetched_at: Option<Instant>,
    /// Error of the last refresh, cleared by the next successful one.
    failure: Option<SyncError>,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self {
            value: None,
            valid: false,
            fetched_at: None,
            failure: None,
        }
    }
}

impl<T> Slot<T> {
    /// The value if it may be served without a refresh.
    fn fresh(&self, ttl: Option<Duration>) -> Option<Arc<T>> {
        if !self.valid {
            return None;
        }
        if let (Some(ttl), Some(at)) = (ttl, self.fetched_at)
            && at.elapsed() >= ttl
        {
            return None;
        }
        self.value.clone()
    }

    fn install(&mut self, value: T) -> Arc<T> {
        self.fetched_at = Some(Instant::now());
        self.failure = None;
        self.replace(value)
    }

    /// What the last refresh produced, as far as it still stands.
    fn last_outcome(&self) -> Option<SyncResult<Arc<T>>> {
        if let Some(err) = &self.failure {
            return Some(Err(err.clone()));
        }
        if !self.valid {
            return None;
        }
        self.value.clone().map(Ok)
    }

    /// Swap the value without touching its fetch time.
    fn replace(&mut self, value: T) -> Arc<T> {
        let value = Arc::new(value);
        self.value = Some(value.clone());
        self.valid = true;
        value
    }

    fn invalidate(&mut self) {
        self.valid = false;
    }
}

/// A slot and the number of refreshes completed under its lock.
struct Cell<T> {
    refreshes: AtomicU64,
    slot: Mutex<Slot<T>>,
}

impl<T> Default for Cell<T> {
    fn default() -> Self {
        Self {
            refreshes: AtomicU64::new(0),
            slot: Mutex::new(Slot::default()),
        }
    }
}

impl<T> Cell<T> {
    /// Lock the slot.
    ///
    /// When a refresh completed while this caller waited, its outcome comes
    /// back alongside the guard and must be served instead of fetching again.
    async fn lock(&self) -> (MutexGuard<'_, Slot<T>>, Option<SyncResult<Arc<T>>>) {
        let seen = self.refreshes.load(Ordering::SeqCst);
        let slot = self.slot.lock().await;
        let joined = if self.refreshes.load(Ordering::SeqCst) == seen {
            None
        } else {
            slot.last_outcome()
        };
        (slot, joined)
    }

    /// Store the result of a refresh run while holding `slot`.
    fn finish(&self, slot: &mut Slot<T>, result: SyncResult<T>) -> SyncResult<Arc<T>> {
        let outcome = match result {
            Ok(value) => Ok(slot.install(value)),
            Err(e) => {
                slot.failure = Some(e.clone());
                Err(e)
            }
        };
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        outcome
    }
}

type StateCell = Arc<Cell<ZoneState>>;

/// Per-zone memo of zone list and zone states.
pub struct ZoneCache {
    config: CacheConfig,
    metrics: Arc<dyn Metrics>,
    source: Arc<dyn ZoneSource>,
    zones: Cell<Vec<Zone>>,
    states: RwLock<HashMap<String, StateCell>>,
    released: AtomicBool,
}

impl ZoneCache {
    pub fn new(config: CacheConfig, metrics: Arc<dyn Metrics>, source: Arc<dyn ZoneSource>) -> Self {
        Self {
            config,
            metrics,
            source,
            zones: Cell::default(),
            states: RwLock::new(HashMap::new()),
            released: AtomicBool::new(false),
        }
    }

    /// Zone list, refreshed when stale.
    pub async fn get_zones(&self) -> SyncResult<Arc<Vec<Zone>>> {
        self.ensure_live()?;
        let (mut slot, joined) = self.zones.lock().await;
        if let Some(outcome) = joined {
            if outcome.is_ok() {
                self.metrics.add_requests(RequestType::CachedGetZones, 1);
            }
            return outcome;
        }

        if let Some(zones) = slot.fresh(self.config.zones_ttl()) {
            self.metrics.add_requests(RequestType::CachedGetZones, 1);
            return Ok(zones);
        }

        let fetched = self.source.fetch_zones().await;
        if let Ok(zones) = &fetched {
            log::debug!("cached {} zone(s)", zones.len());
        }
        self.zones.finish(&mut slot, fetched)
    }

    /// State of `zone`, refreshed when stale or when caching is disabled.
    pub async fn get_zone_state(&self, zone: &Zone) -> SyncResult<Arc<ZoneState>> {
        self.ensure_live()?;
        let cell = self.state_cell(zone.key()).await;
        let (mut slot, joined) = cell.lock().await;

        // even with caching disabled, waiters share the refresh they waited on
        if let Some(outcome) = joined {
            if outcome.is_ok() {
                self.metrics
                    .add_zone_requests(zone.key(), RequestType::CachedGetZoneState, 1);
            }
            return outcome;
        }

        if !self.config.disable_zone_state_cache
            && let Some(state) = slot.fresh(self.config.zone_state_ttl())
        {
            self.metrics
                .add_zone_requests(zone.key(), RequestType::CachedGetZoneState, 1);
            return Ok(state);
        }

        let fetched = self.source.fetch_zone_state(zone).await;
        cell.finish(&mut slot, fetched)
    }

    /// Invalidate the cached state of `zone` after a write conflict.
    ///
    /// Always asks the host to retry.
    pub async fn report_zone_state_conflict(
        &self,
        zone: &Zone,
        err: &(dyn std::error::Error + Send + Sync),
    ) -> bool {
        log::warn!(
            "conflict reported for zone '{}', invalidating cached state: {err}",
            zone.key()
        );
        self.invalidate(zone.key()).await;
        true
    }

    /// Reconcile the cached state of `zone` with an executed batch.
    ///
    /// A successful batch of updates and deletes is folded into a new
    /// snapshot. Creates have no id yet, so any create or any failure
    /// invalidates the entry.
    pub async fn apply_requests(
        &self,
        outcome: Option<&SyncError>,
        zone: &Zone,
        requests: &[ChangeRequest],
    ) {
        if let Some(err) = outcome {
            log::debug!("invalidating zone '{}' after failed batch: {err}", zone.key());
            self.invalidate(zone.key()).await;
            return;
        }
        if requests.is_empty() {
            return;
        }
        if requests.iter().any(|r| r.action == ChangeAction::Create) {
            self.invalidate(zone.key()).await;
            return;
        }

        let Some(cell) = self.existing_cell(zone.key()).await else {
            return;
        };
        let mut slot = cell.slot.lock().await;
        let Some(current) = slot.fresh(self.config.zone_state_ttl()) else {
            return;
        };

        match current.with_changes(requests) {
            Ok(next) => {
                slot.replace(next);
            }
            Err(e) => {
                log::debug!("cannot fold batch into zone '{}': {e}", zone.key());
                slot.invalidate();
            }
        }
    }

    /// Drop all cached data. Every later read fails with [`SyncError::Released`].
    pub async fn release(&self) {
        self.released.store(true, Ordering::SeqCst);
        self.states.write().await.clear();
        *self.zones.slot.lock().await = Slot::default();
        log::debug!("zone cache released");
    }

    fn ensure_live(&self) -> SyncResult<()> {
        if self.released.load(Ordering::SeqCst) {
            Err(SyncError::Released)
        } else {
            Ok(())
        }
    }

    async fn invalidate(&self, key: &str) {
        if let Some(cell) = self.existing_cell(key).await {
            cell.slot.lock().await.invalidate();
        }
    }

    async fn existing_cell(&self, key: &str) -> Option<StateCell> {
        self.states.read().await.get(key).cloned()
    }

    async fn state_cell(&self, key: &str) -> StateCell {
        if let Some(cell) = self.existing_cell(key).await {
            return cell;
        }
        self.states
            .write()
            .await
            .entry(key.to_string())
            .or_default()
            .clone()
    }
}
