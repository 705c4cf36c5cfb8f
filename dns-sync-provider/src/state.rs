//! Zone state snapshots
//!
//! A [`ZoneState`] groups the canonical records of one zone into record-sets.
//! Snapshots are immutable; every change produces a new one.

use std::collections::{BTreeMap, HashMap};

use crate::client::floor_ttl;
use crate::error::{SyncError, SyncResult};
use crate::providers::common::normalize_domain_name;
use crate::types::{ChangeAction, ChangeRequest, DnsSet, DnsSetEntry, DnsSetKey, Record};

/// Immutable record-set view of one zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneState {
    zone: String,
    sets: BTreeMap<DnsSetKey, DnsSet>,
    records: Vec<Record>,
    /// Record id to position in `records`.
    ids: HashMap<String, usize>,
}

impl ZoneState {
    /// Fold `records` into record-sets.
    ///
    /// Records sharing name and type merge into one set, entries in encounter
    /// order. The set TTL is the lowest entry TTL.
    pub fn build(zone: impl Into<String>, records: Vec<Record>) -> SyncResult<Self> {
        let zone = zone.into();
        let mut sets: BTreeMap<DnsSetKey, DnsSet> = BTreeMap::new();
        let mut ids = HashMap::with_capacity(records.len());

        for (index, record) in records.iter().enumerate() {
            if let Some(id) = &record.id
                && ids.insert(id.clone(), index).is_some()
            {
                return Err(SyncError::DuplicateRecordId {
                    zone,
                    id: id.clone(),
                });
            }

            let entry = DnsSetEntry {
                value: record.value.clone(),
                ttl: record.ttl,
            };
            sets.entry(record.set_key())
                .and_modify(|set| {
                    // strictly lower only, so ties keep the first TTL seen
                    if record.ttl < set.ttl {
                        set.ttl = record.ttl;
                    }
                    set.entries.push(entry.clone());
                })
                .or_insert_with(|| DnsSet {
                    key: record.set_key(),
                    ttl: record.ttl,
                    entries: vec![entry.clone()],
                });
        }

        log::debug!(
            "built state of zone '{zone}': {} record(s) in {} set(s)",
            records.len(),
            sets.len()
        );

        Ok(Self {
            zone,
            sets,
            records,
            ids,
        })
    }

    /// Key of the zone this snapshot belongs to.
    pub fn zone(&self) -> &str {
        &self.zone
    }

    /// Record-sets ordered by key.
    pub fn sets(&self) -> &BTreeMap<DnsSetKey, DnsSet> {
        &self.sets
    }

    pub fn get(&self, key: &DnsSetKey) -> Option<&DnsSet> {
        self.sets.get(key)
    }

    /// Underlying records in listing order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn record_by_id(&self, id: &str) -> Option<&Record> {
        self.ids.get(id).map(|&index| &self.records[index])
    }

    /// Provider id addressed by `record`.
    ///
    /// Uses the record's own id, else the snapshot record with the same name,
    /// type and value, else the only record of the matching set.
    pub fn resolve_id(&self, record: &Record) -> Option<String> {
        if let Some(id) = &record.id {
            return Some(id.clone());
        }

        let name = normalize_domain_name(&record.name);
        let value = comparable_value(record);
        let mut in_set = self
            .records
            .iter()
            .filter(|r| r.name == name && r.record_type == record.record_type);

        if let Some(exact) = in_set.clone().find(|r| r.value == value) {
            return exact.id.clone();
        }

        match (in_set.next(), in_set.next()) {
            (Some(only), None) => only.id.clone(),
            _ => None,
        }
    }

    /// New snapshot with `requests` applied to this one's records.
    ///
    /// Fails when an update or delete cannot be matched to a record.
    pub fn with_changes(&self, requests: &[ChangeRequest]) -> SyncResult<Self> {
        let mut records = self.records.clone();

        for request in requests {
            let mut target = request.record.clone();
            target.zone = self.zone.clone();
            target.name = normalize_domain_name(&target.name);
            target.value = comparable_value(&target);
            // the remote stores the floored TTL
            target.ttl = floor_ttl(target.ttl);

            match request.action {
                ChangeAction::Create => records.push(target),
                ChangeAction::Update | ChangeAction::Delete => {
                    let position = self
                        .resolve_id(&request.record)
                        .and_then(|id| records.iter().position(|r| r.id.as_deref() == Some(&id)));
                    let Some(position) = position else {
                        return Err(SyncError::MissingRecordId {
                            action: request.action,
                            record_type: target.record_type,
                            name: target.name,
                            value: target.value,
                        });
                    };

                    if request.action == ChangeAction::Delete {
                        records.remove(position);
                    } else {
                        target.id = records[position].id.clone();
                        records[position] = target;
                    }
                }
            }
        }

        Self::build(self.zone.clone(), records)
    }
}

/// Value as it appears in a listed snapshot.
fn comparable_value(record: &Record) -> String {
    if record.record_type.has_hostname_value() {
        normalize_domain_name(&record.value)
    } else {
        record.value.clone()
    }
}
