//! DigitalOcean API type definition

use serde::Deserialize;

use crate::types::{RemoteRecord, RemoteZone};

/// Error body of every non-2xx response.
#[derive(Debug, Deserialize)]
pub struct DigitalOceanError {
    pub id: String,
    pub message: String,
}

/// `links` block of a listing response.
#[derive(Debug, Default, Deserialize)]
pub struct DigitalOceanLinks {
    #[serde(default)]
    pub pages: Option<DigitalOceanPages>,
}

/// Page URLs. Only present when the listing spans more than one page.
#[derive(Debug, Default, Deserialize)]
pub struct DigitalOceanPages {
    #[serde(default)]
    pub next: Option<String>,
}

impl DigitalOceanLinks {
    /// No `next` link means this is the last page.
    pub fn is_last_page(&self) -> bool {
        self.pages
            .as_ref()
            .and_then(|p| p.next.as_deref())
            .is_none_or(str::is_empty)
    }
}

/// Response payload of `GET /domains`.
#[derive(Debug, Deserialize)]
pub struct DomainListResponse {
    #[serde(default)]
    pub domains: Vec<RemoteZone>,
    #[serde(default)]
    pub links: DigitalOceanLinks,
}

/// Response payload of `GET /domains/{domain}/records`.
#[derive(Debug, Deserialize)]
pub struct RecordListResponse {
    #[serde(default)]
    pub domain_records: Vec<RemoteRecord>,
    #[serde(default)]
    pub links: DigitalOceanLinks,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn links_without_pages_is_last() {
        let resp: DomainListResponse =
            serde_json::from_str(r#"{"domains":[{"name":"example.com","ttl":1800}],"links":{},"meta":{"total":1}}"#)
                .unwrap();
        assert!(resp.links.is_last_page());
        assert_eq!(resp.domains.len(), 1);
    }

    #[test]
    fn links_with_next_is_not_last() {
        let resp: RecordListResponse = serde_json::from_str(
            r#"{"domain_records":[],"links":{"pages":{"last":"https://api.digitalocean.com/v2/domains/example.com/records?page=2","next":"https://api.digitalocean.com/v2/domains/example.com/records?page=2"}}}"#,
        )
        .unwrap();
        assert!(!resp.links.is_last_page());
    }

    #[test]
    fn links_on_final_page_is_last() {
        let resp: RecordListResponse = serde_json::from_str(
            r#"{"domain_records":[],"links":{"pages":{"first":"https://api.digitalocean.com/v2/domains/example.com/records?page=1","prev":"https://api.digitalocean.com/v2/domains/example.com/records?page=1"}}}"#,
        )
        .unwrap();
        assert!(resp.links.is_last_page());
    }

    #[test]
    fn missing_links_is_last() {
        let resp: DomainListResponse = serde_json::from_str(r#"{"domains":[]}"#).unwrap();
        assert!(resp.links.is_last_page());
    }
}
