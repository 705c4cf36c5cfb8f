//! DigitalOcean `DnsApi` trait implementation

use async_trait::async_trait;
use reqwest::Method;

use crate::error::Result;
use crate::traits::{DnsApi, ErrorContext, ProviderErrorMapper};
use crate::types::{Page, PaginationParams, RecordPayload, RemoteRecord, RemoteZone};

use super::{DigitalOceanLinks, DigitalOceanProvider, DomainListResponse, RecordListResponse};

impl DigitalOceanProvider {
    fn records_path(domain: &str) -> String {
        format!("/domains/{}/records", urlencoding::encode(domain))
    }

    fn record_path(domain: &str, record_id: u64) -> String {
        format!("{}/{record_id}", Self::records_path(domain))
    }

    /// The next page is always the requested page plus one
    fn to_page<T>(items: Vec<T>, links: &DigitalOceanLinks, params: &PaginationParams) -> Page<T> {
        if links.is_last_page() {
            Page::last(items)
        } else {
            Page::more(items, params.page + 1)
        }
    }
}

#[async_trait]
impl DnsApi for DigitalOceanProvider {
    fn id(&self) -> &'static str {
        self.provider_name()
    }

    async fn list_zones_page(&self, params: &PaginationParams) -> Result<Page<RemoteZone>> {
        let path = format!(
            "/domains?page={}&per_page={}",
            params.page, params.page_size
        );
        let response: DomainListResponse = self.get(&path, ErrorContext::default()).await?;
        Ok(Self::to_page(response.domains, &response.links, params))
    }

    async fn list_records_page(
        &self,
        domain: &str,
        params: &PaginationParams,
    ) -> Result<Page<RemoteRecord>> {
        let path = format!(
            "{}?page={}&per_page={}",
            Self::records_path(domain),
            params.page,
            params.page_size
        );
        let response: RecordListResponse = self.get(&path, ErrorContext::domain(domain)).await?;
        Ok(Self::to_page(
            response.domain_records,
            &response.links,
            params,
        ))
    }

    async fn create_record(&self, domain: &str, payload: &RecordPayload) -> Result<()> {
        self.send_json(
            Method::POST,
            &Self::records_path(domain),
            payload,
            ErrorContext::domain(domain),
        )
        .await
    }

    async fn update_record(
        &self,
        domain: &str,
        record_id: u64,
        payload: &RecordPayload,
    ) -> Result<()> {
        self.send_json(
            Method::PUT,
            &Self::record_path(domain, record_id),
            payload,
            ErrorContext::record(domain, record_id),
        )
        .await
    }

    async fn delete_record(&self, domain: &str, record_id: u64) -> Result<()> {
        self.delete(
            &Self::record_path(domain, record_id),
            ErrorContext::record(domain, record_id),
        )
        .await
    }
}
