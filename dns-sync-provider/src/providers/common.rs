//! Provider common utility functions

use std::time::Duration;

use reqwest::Client;

use crate::types::DnsRecordType;

// ============ HTTP Client ============

/// Default connection timeout (seconds)
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Default request timeout (seconds)
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Create an HTTP client with timeout configuration
pub fn create_http_client() -> Client {
    Client::builder()
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
        .build()
        .unwrap_or_else(|e| {
            log::warn!("Failed to build HTTP client with timeouts, using defaults: {e}");
            Client::new()
        })
}

// ============ Record type conversion ============

/// Parse a provider type string, `None` for types the engine does not manage
pub fn parse_record_type(record_type: &str) -> Option<DnsRecordType> {
    match record_type.to_uppercase().as_str() {
        "A" => Some(DnsRecordType::A),
        "AAAA" => Some(DnsRecordType::Aaaa),
        "CNAME" => Some(DnsRecordType::Cname),
        "TXT" => Some(DnsRecordType::Txt),
        "NS" => Some(DnsRecordType::Ns),
        _ => None,
    }
}

// ============ Domain name processing ============

/// Remove the trailing dot from a domain name
pub fn normalize_domain_name(name: &str) -> String {
    name.trim_end_matches('.').to_string()
}

/// Convert a full domain name to a name relative to the zone
/// e.g.: "www.example.com" + "example.com" -> "www"
/// e.g.: "example.com" + "example.com" -> "@"
pub fn full_name_to_relative(full_name: &str, zone_name: &str) -> String {
    let full = normalize_domain_name(full_name);
    let zone = normalize_domain_name(zone_name);

    if full == zone {
        "@".to_string()
    } else if let Some(subdomain) = full.strip_suffix(&format!(".{zone}")) {
        subdomain.to_string()
    } else {
        full
    }
}

/// Convert a name relative to the zone to a full domain name
/// e.g.: "www" + "example.com" -> "www.example.com"
/// e.g.: "@" + "example.com" -> "example.com"
/// Names already inside the zone are only stripped of their trailing dot.
pub fn relative_to_full_name(relative_name: &str, zone_name: &str) -> String {
    let zone = normalize_domain_name(zone_name);
    let name = normalize_domain_name(relative_name);

    if name == "@" || name.is_empty() {
        zone
    } else if name == zone || name.ends_with(&format!(".{zone}")) {
        name
    } else {
        format!("{name}.{zone}")
    }
}
