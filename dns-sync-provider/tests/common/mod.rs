//! Shared test helpers: mock DigitalOcean server and response fixtures

#![allow(dead_code)]

use std::collections::HashMap;
use std::env;

use dns_sync_provider::{DigitalOceanHandler, HandlerConfig};
use serde_json::{Value, json};
use wiremock::matchers::{bearer_token, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_TOKEN: &str = "dop_v1_test_token_0000";

/// Skip a test when environment variables are missing
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("skipping test: missing environment variable {}", $var);
                return;
            }
        )+
    };
}

/// Assert that a `Result` is `Ok` and unwrap it (fails the test otherwise)
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// Mock server plus a handler pointed at it
pub struct MockContext {
    pub server: MockServer,
    pub handler: DigitalOceanHandler,
}

impl MockContext {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let props = HashMap::from([(
            "DIGITALOCEAN_ACCESS_TOKEN".to_string(),
            TEST_TOKEN.to_string(),
        )]);
        let config =
            HandlerConfig::new(props).with_api_base_url(format!("{}/v2", server.uri()));
        let handler = DigitalOceanHandler::new(&config).expect("handler from valid config");
        Self { server, handler }
    }

    /// Serve `pages` of the domain list, page numbers starting at 1
    pub async fn mount_domains(&self, pages: &[&[&str]]) {
        for (index, names) in pages.iter().enumerate() {
            let page = index + 1;
            let domains: Vec<Value> = names
                .iter()
                .map(|name| json!({ "name": name, "ttl": 1800, "zone_file": "" }))
                .collect();
            let body = json!({
                "domains": domains,
                "links": links(page, pages.len(), "/v2/domains"),
                "meta": { "total": pages.iter().map(|p| p.len()).sum::<usize>() }
            });
            Mock::given(method("GET"))
                .and(path("/v2/domains"))
                .and(query_param("page", page.to_string()))
                .and(query_param("per_page", "100"))
                .and(bearer_token(TEST_TOKEN))
                .respond_with(ResponseTemplate::new(200).set_body_json(body))
                .mount(&self.server)
                .await;
        }
    }

    /// Serve `pages` of the records of `domain`
    pub async fn mount_records(&self, domain: &str, pages: &[Vec<Value>]) {
        let records_path = format!("/v2/domains/{domain}/records");
        for (index, records) in pages.iter().enumerate() {
            let page = index + 1;
            let body = json!({
                "domain_records": records,
                "links": links(page, pages.len(), &records_path),
                "meta": { "total": pages.iter().map(Vec::len).sum::<usize>() }
            });
            Mock::given(method("GET"))
                .and(path(records_path.as_str()))
                .and(query_param("page", page.to_string()))
                .and(bearer_token(TEST_TOKEN))
                .respond_with(ResponseTemplate::new(200).set_body_json(body))
                .mount(&self.server)
                .await;
        }
    }
}

/// Record as returned by the API
pub fn record_json(id: u64, record_type: &str, name: &str, data: &str, ttl: u32) -> Value {
    json!({
        "id": id,
        "type": record_type,
        "name": name,
        "data": data,
        "priority": null,
        "port": null,
        "ttl": ttl,
        "weight": null,
        "flags": null,
        "tag": null
    })
}

/// API error body
pub fn error_json(id: &str, message: &str) -> Value {
    json!({ "id": id, "message": message })
}

/// `links` object of a listing page; the last page has no `next`
fn links(page: usize, total: usize, list_path: &str) -> Value {
    if page < total {
        json!({
            "pages": {
                "next": format!("https://api.digitalocean.com{list_path}?page={}", page + 1),
                "last": format!("https://api.digitalocean.com{list_path}?page={total}")
            }
        })
    } else {
        json!({})
    }
}

/// Live handler from the environment
pub fn live_handler() -> Option<DigitalOceanHandler> {
    let token = env::var("DIGITALOCEAN_ACCESS_TOKEN").ok()?;
    let props = HashMap::from([("DIGITALOCEAN_ACCESS_TOKEN".to_string(), token)]);
    DigitalOceanHandler::new(&HandlerConfig::new(props)).ok()
}
