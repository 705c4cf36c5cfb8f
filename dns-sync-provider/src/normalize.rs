//! Provider record normalization
//!
//! Turns provider-native records into canonical [`Record`]s and separates out
//! NS delegations of subdomains.

use crate::providers::common::{normalize_domain_name, parse_record_type, relative_to_full_name};
use crate::types::{DnsRecordType, Record, RemoteRecord};

/// Canonical records of a zone together with its delegated subdomains.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedRecords {
    /// Records owned by the zone itself, in listing order.
    pub records: Vec<Record>,
    /// Names delegated away by NS records, deduplicated, in listing order.
    pub forwarded: Vec<String>,
}

/// Map one provider record to a canonical record of `zone_key`.
///
/// Returns `None` for record types the engine does not manage.
pub fn normalize_record(zone_key: &str, apex: &str, remote: &RemoteRecord) -> Option<Record> {
    let Some(record_type) = parse_record_type(&remote.record_type) else {
        log::debug!(
            "skipping unmanaged {} record '{}' (id {}) in zone '{zone_key}'",
            remote.record_type,
            remote.name,
            remote.id
        );
        return None;
    };

    let value = if record_type.has_hostname_value() {
        normalize_hostname_value(&remote.data, apex)
    } else {
        remote.data.clone()
    };

    Some(
        Record::new(
            zone_key,
            relative_to_full_name(&remote.name, apex),
            record_type,
            value,
            remote.ttl,
        )
        .with_id(remote.id.to_string()),
    )
}

/// Normalize a whole listing of one zone.
///
/// NS records below the apex are delegations: their names are reported as
/// forwarded and they are left out of the zone's own records.
pub fn normalize_zone_records(
    zone_key: &str,
    apex: &str,
    remote: &[RemoteRecord],
) -> NormalizedRecords {
    let apex = normalize_domain_name(apex);
    let mut out = NormalizedRecords::default();

    for record in remote
        .iter()
        .filter_map(|r| normalize_record(zone_key, &apex, r))
    {
        if record.record_type == DnsRecordType::Ns && record.name != apex {
            if !out.forwarded.contains(&record.name) {
                out.forwarded.push(record.name);
            }
            continue;
        }
        out.records.push(record);
    }

    out
}

/// `@` stands for the apex; anything else only loses its trailing dot.
fn normalize_hostname_value(value: &str, apex: &str) -> String {
    if value == "@" {
        normalize_domain_name(apex)
    } else {
        normalize_domain_name(value)
    }
}
