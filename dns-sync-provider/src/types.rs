use serde::{Deserialize, Serialize};

/// Lowest TTL (seconds) ever submitted to the remote service.
pub const MIN_TTL: u32 = 30;

/// Page size used by every listing call.
pub const PAGE_SIZE: u32 = 100;

// ============ Pagination ============

/// Pagination parameters for a single page request.
///
/// Pages are 1-indexed.
///
/// # Default
///
/// The default is `page = 1, page_size = 100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    /// Page number (1-indexed).
    pub page: u32,
    /// Number of items per page.
    pub page_size: u32,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: PAGE_SIZE,
        }
    }
}

impl PaginationParams {
    /// Parameters for the given page with the standard page size.
    pub fn page(page: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: PAGE_SIZE,
        }
    }
}

/// One page of a listing response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items in this page, in server order.
    pub items: Vec<T>,
    /// Page number to request next, `None` on the last page.
    pub next_page: Option<u32>,
}

impl<T> Page<T> {
    /// A page followed by more pages.
    pub fn more(items: Vec<T>, next_page: u32) -> Self {
        Self {
            items,
            next_page: Some(next_page),
        }
    }

    /// The final page.
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_page: None,
        }
    }

    pub fn is_last(&self) -> bool {
        self.next_page.is_none()
    }
}

// ============ Provider Types ============

/// Identifies the remote DNS service.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    /// DigitalOcean Domains API.
    #[serde(rename = "digitalocean")]
    DigitalOcean,
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DigitalOcean => write!(f, "digitalocean"),
        }
    }
}

// ============ Provider-native Types ============

/// A domain as listed by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteZone {
    /// Domain name, also the zone key.
    pub name: String,
    /// Default TTL of the domain, if reported.
    #[serde(default)]
    pub ttl: Option<u32>,
}

/// A record as listed by the remote service, before normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRecord {
    /// Provider-assigned integer id.
    pub id: u64,
    /// Record type as sent by the provider (e.g. `"A"`, `"SOA"`).
    #[serde(rename = "type")]
    pub record_type: String,
    /// Name relative to the zone (`"@"` for the apex).
    pub name: String,
    /// Record data.
    pub data: String,
    /// Time to live in seconds.
    pub ttl: u32,
}

/// Payload of a create/update call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordPayload {
    #[serde(rename = "type")]
    pub record_type: String,
    /// Name relative to the zone (`"@"` for the apex).
    pub name: String,
    pub data: String,
    /// Already raised to [`MIN_TTL`].
    pub ttl: u32,
}

// ============ Canonical Types ============

/// Record types managed by the synchronization engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DnsRecordType {
    /// IPv4 address record.
    A,
    /// IPv6 address record.
    #[serde(rename = "AAAA")]
    Aaaa,
    /// Canonical name (alias) record.
    #[serde(rename = "CNAME")]
    Cname,
    /// Text record.
    #[serde(rename = "TXT")]
    Txt,
    /// Name server record.
    #[serde(rename = "NS")]
    Ns,
}

impl DnsRecordType {
    /// Upper-case wire name of the type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
            Self::Txt => "TXT",
            Self::Ns => "NS",
        }
    }

    /// Whether record values of this type are host names.
    pub fn has_hostname_value(self) -> bool {
        matches!(self, Self::Cname | Self::Ns)
    }
}

impl std::fmt::Display for DnsRecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A zone the provider is authoritative for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    /// Zone key.
    pub id: String,
    /// Domain name of the zone.
    pub domain: String,
    /// Authoritative apex name.
    pub apex: String,
    /// Subdomains delegated to other zones via NS records.
    pub forwarded_domains: Vec<String>,
}

impl Zone {
    pub fn new(id: impl Into<String>, domain: impl Into<String>) -> Self {
        let domain = domain.into();
        Self {
            id: id.into(),
            apex: domain.clone(),
            domain,
            forwarded_domains: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_forwarded_domains(mut self, forwarded: Vec<String>) -> Self {
        self.forwarded_domains = forwarded;
        self
    }

    /// Key used to address the zone in caches and records.
    pub fn key(&self) -> &str {
        &self.id
    }
}

/// Canonical DNS record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Key of the zone owning the record.
    pub zone: String,
    /// Fully qualified name without trailing dot.
    pub name: String,
    pub record_type: DnsRecordType,
    pub value: String,
    /// Time to live in seconds.
    pub ttl: u32,
    /// Provider-assigned id, `None` until the record exists remotely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Record {
    /// A record that does not exist remotely yet.
    pub fn new(
        zone: impl Into<String>,
        name: impl Into<String>,
        record_type: DnsRecordType,
        value: impl Into<String>,
        ttl: u32,
    ) -> Self {
        Self {
            zone: zone.into(),
            name: name.into(),
            record_type,
            value: value.into(),
            ttl,
            id: None,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Key of the record-set this record belongs to.
    pub fn set_key(&self) -> DnsSetKey {
        DnsSetKey {
            name: self.name.clone(),
            record_type: self.record_type,
        }
    }
}

/// Key of a record-set: name and type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsSetKey {
    pub name: String,
    pub record_type: DnsRecordType,
}

impl DnsSetKey {
    pub fn new(name: impl Into<String>, record_type: DnsRecordType) -> Self {
        Self {
            name: name.into(),
            record_type,
        }
    }
}

impl std::fmt::Display for DnsSetKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.name, self.record_type)
    }
}

/// One value of a record-set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsSetEntry {
    pub value: String,
    pub ttl: u32,
}

/// Values sharing one (name, type) key within a zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DnsSet {
    pub key: DnsSetKey,
    /// Effective TTL of the set, the lowest TTL among its entries.
    pub ttl: u32,
    /// Entries in encounter order.
    pub entries: Vec<DnsSetEntry>,
}

impl DnsSet {
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.value.as_str())
    }
}

// ============ Change Requests ============

/// Kind of remote mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeAction {
    Create,
    Update,
    Delete,
}

impl std::fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// A single requested mutation of the zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRequest {
    pub action: ChangeAction,
    /// Target record. For updates this carries the new attributes.
    pub record: Record,
}

impl ChangeRequest {
    pub fn create(record: Record) -> Self {
        Self {
            action: ChangeAction::Create,
            record,
        }
    }

    pub fn update(record: Record) -> Self {
        Self {
            action: ChangeAction::Update,
            record,
        }
    }

    pub fn delete(record: Record) -> Self {
        Self {
            action: ChangeAction::Delete,
            record,
        }
    }

    /// Derives the action from the record: marked for removal means delete,
    /// an existing id means update, otherwise create.
    pub fn from_record(record: Record, remove: bool) -> Self {
        let action = match (remove, record.id.is_some()) {
            (true, _) => ChangeAction::Delete,
            (false, true) => ChangeAction::Update,
            (false, false) => ChangeAction::Create,
        };
        Self { action, record }
    }
}
