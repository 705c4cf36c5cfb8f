use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::CredentialValidationError;
use crate::types::{ChangeAction, DnsRecordType};

/// Failure of a single remote API call.
///
/// Every variant names the provider it came from. The enum serializes with a
/// `code` tag so hosts can forward it as structured data.
///
/// `NetworkError`, `Timeout` and `RateLimited` are transient. This crate
/// reports them and leaves any retry to the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ProviderError {
    /// Connection, DNS or TLS failure, or a 502/503/504 from the gateway.
    NetworkError { provider: String, detail: String },

    /// The API token was rejected (HTTP 401).
    InvalidCredentials {
        provider: String,
        raw_message: Option<String>,
    },

    /// An addressed record id does not exist.
    RecordNotFound {
        provider: String,
        record_id: String,
        raw_message: Option<String>,
    },

    /// The API refused the submitted data (HTTP 400/422).
    InvalidParameter {
        provider: String,
        /// What was rejected, e.g. `record`.
        param: String,
        detail: String,
    },

    /// HTTP 429.
    RateLimited {
        provider: String,
        /// Seconds from the `Retry-After` header.
        retry_after: Option<u64>,
        raw_message: Option<String>,
    },

    Timeout { provider: String, detail: String },

    /// The domain is not part of the account.
    DomainNotFound {
        provider: String,
        domain: String,
        raw_message: Option<String>,
    },

    /// The token lacks the required scope (HTTP 403).
    PermissionDenied {
        provider: String,
        raw_message: Option<String>,
    },

    /// A response body did not match the expected shape.
    ParseError { provider: String, detail: String },

    /// A request body could not be encoded.
    SerializationError { provider: String, detail: String },

    /// Any error id without a dedicated variant.
    Unknown {
        provider: String,
        raw_code: Option<String>,
        raw_message: String,
    },
}

impl ProviderError {
    /// Caused by the request rather than by the service: logged at `warn`
    /// instead of `error`.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials { .. }
                | Self::RecordNotFound { .. }
                | Self::InvalidParameter { .. }
                | Self::DomainNotFound { .. }
                | Self::PermissionDenied { .. }
        )
    }

    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::NetworkError { .. } | Self::Timeout { .. } | Self::RateLimited { .. }
        )
    }
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkError { provider, detail } => {
                write!(f, "[{provider}] Network error: {detail}")
            }
            Self::Timeout { provider, detail } => {
                write!(f, "[{provider}] Request timeout: {detail}")
            }
            Self::InvalidCredentials {
                provider,
                raw_message,
            } => write!(
                f,
                "[{provider}] Invalid credentials{}",
                suffix(raw_message.as_deref())
            ),
            Self::PermissionDenied {
                provider,
                raw_message,
            } => write!(
                f,
                "[{provider}] Permission denied{}",
                suffix(raw_message.as_deref())
            ),
            Self::RecordNotFound {
                provider,
                record_id,
                ..
            } => write!(f, "[{provider}] Record '{record_id}' not found"),
            Self::DomainNotFound {
                provider,
                domain,
                raw_message,
            } => write!(
                f,
                "[{provider}] Domain '{domain}' not found{}",
                suffix(raw_message.as_deref())
            ),
            Self::InvalidParameter {
                provider,
                param,
                detail,
            } => write!(f, "[{provider}] Invalid parameter '{param}': {detail}"),
            Self::RateLimited {
                provider,
                retry_after: Some(secs),
                ..
            } => write!(f, "[{provider}] Rate limited (retry after {secs}s)"),
            Self::RateLimited { provider, .. } => write!(f, "[{provider}] Rate limited"),
            Self::ParseError { provider, detail } => {
                write!(f, "[{provider}] Parse error: {detail}")
            }
            Self::SerializationError { provider, detail } => {
                write!(f, "[{provider}] Serialization error: {detail}")
            }
            Self::Unknown {
                provider,
                raw_message,
                ..
            } => write!(f, "[{provider}] {raw_message}"),
        }
    }
}

/// `": msg"` when the API sent a message.
fn suffix(raw_message: Option<&str>) -> String {
    raw_message.map(|m| format!(": {m}")).unwrap_or_default()
}

impl std::error::Error for ProviderError {}

/// Convenience type alias for `Result<T, ProviderError>`.
pub type Result<T> = std::result::Result<T, ProviderError>;

/// Error type of the synchronization engine (listing, cache, change execution).
#[derive(Error, Debug, Clone)]
pub enum SyncError {
    /// The remote API call failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The record id of an update/delete is not a valid integer.
    #[error("invalid record id '{id}' for {action} of {record_type} record '{name}': {detail}")]
    InvalidRecordId {
        action: ChangeAction,
        record_type: DnsRecordType,
        name: String,
        id: String,
        detail: String,
    },

    /// An update/delete could not be matched to an existing record.
    #[error("no record id known for {action} of {record_type} record '{name}' with value '{value}'")]
    MissingRecordId {
        action: ChangeAction,
        record_type: DnsRecordType,
        name: String,
        value: String,
    },

    /// The remote listing returned the same record id twice.
    #[error("duplicate record id '{id}' in zone '{zone}'")]
    DuplicateRecordId { zone: String, id: String },

    /// Handler configuration is incomplete or malformed.
    #[error("invalid configuration: {0}")]
    Config(#[from] CredentialValidationError),

    /// A change batch stopped at its first failing request.
    #[error(
        "failed to {action} record {} of type {record_type} for DNS name '{name}' and value '{value}' ({applied} change(s) applied before): {source}",
        .id.as_deref().unwrap_or("<new>")
    )]
    ChangeFailed {
        /// Number of requests applied before the failing one.
        applied: usize,
        action: ChangeAction,
        record_type: DnsRecordType,
        name: String,
        value: String,
        id: Option<String>,
        #[source]
        source: Box<SyncError>,
    },

    /// The zone cache was released; no further reads are valid.
    #[error("zone cache has been released")]
    Released,
}

impl SyncError {
    /// The remote error at the root of this error, if any.
    pub fn provider_error(&self) -> Option<&ProviderError> {
        match self {
            Self::Provider(e) => Some(e),
            Self::ChangeFailed { source, .. } => source.provider_error(),
            _ => None,
        }
    }

    /// Whether the error was detected locally before any remote call.
    pub fn is_validation(&self) -> bool {
        match self {
            Self::InvalidRecordId { .. } | Self::MissingRecordId { .. } => true,
            Self::ChangeFailed { source, .. } => source.is_validation(),
            _ => false,
        }
    }
}

/// Convenience type alias for `Result<T, SyncError>`.
pub type SyncResult<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_network_error() {
        let e = ProviderError::NetworkError {
            provider: "test".to_string(),
            detail: "connection refused".to_string(),
        };
        assert_eq!(e.to_string(), "[test] Network error: connection refused");
    }

    #[test]
    fn display_invalid_credentials_with_message() {
        let e = ProviderError::InvalidCredentials {
            provider: "digitalocean".to_string(),
            raw_message: Some("Unable to authenticate you".to_string()),
        };
        assert_eq!(
            e.to_string(),
            "[digitalocean] Invalid credentials: Unable to authenticate you"
        );
    }

    #[test]
    fn display_rate_limited_with_retry() {
        let e = ProviderError::RateLimited {
            provider: "digitalocean".to_string(),
            retry_after: Some(30),
            raw_message: None,
        };
        assert_eq!(
            e.to_string(),
            "[digitalocean] Rate limited (retry after 30s)"
        );
    }

    #[test]
    fn display_domain_not_found_without_message() {
        let e = ProviderError::DomainNotFound {
            provider: "test".to_string(),
            domain: "example.com".to_string(),
            raw_message: None,
        };
        assert_eq!(e.to_string(), "[test] Domain 'example.com' not found");
    }

    #[test]
    fn display_unknown() {
        let e = ProviderError::Unknown {
            provider: "test".to_string(),
            raw_code: Some("server_error".to_string()),
            raw_message: "something broke".to_string(),
        };
        assert_eq!(e.to_string(), "[test] something broke");
    }

    #[test]
    fn serialize_json_tagged() {
        let e = ProviderError::RateLimited {
            provider: "digitalocean".to_string(),
            retry_after: Some(60),
            raw_message: Some("too many requests".to_string()),
        };
        let json = serde_json::to_string(&e).unwrap();
        assert!(json.contains("\"code\":\"RateLimited\""));
        assert!(json.contains("\"retry_after\":60"));
    }

    #[test]
    fn transient_classification() {
        assert!(
            ProviderError::Timeout {
                provider: "t".into(),
                detail: "x".into(),
            }
            .is_transient()
        );
        assert!(
            !ProviderError::RecordNotFound {
                provider: "t".into(),
                record_id: "7".into(),
                raw_message: None,
            }
            .is_transient()
        );
    }

    #[test]
    fn change_failed_mentions_record_and_cause() {
        let e = SyncError::ChangeFailed {
            applied: 2,
            action: ChangeAction::Update,
            record_type: DnsRecordType::A,
            name: "www.example.com".to_string(),
            value: "1.2.3.4".to_string(),
            id: Some("7".to_string()),
            source: Box::new(SyncError::Provider(ProviderError::RecordNotFound {
                provider: "digitalocean".to_string(),
                record_id: "7".to_string(),
                raw_message: None,
            })),
        };
        let msg = e.to_string();
        assert!(msg.starts_with("failed to update record 7 of type A"), "{msg}");
        assert!(msg.contains("'www.example.com'"));
        assert!(msg.contains("2 change(s) applied before"));
        assert!(msg.contains("Record '7' not found"));
        assert!(e.provider_error().is_some());
        assert!(!e.is_validation());
    }

    #[test]
    fn change_failed_for_new_record() {
        let e = SyncError::ChangeFailed {
            applied: 0,
            action: ChangeAction::Create,
            record_type: DnsRecordType::Txt,
            name: "t.example.com".to_string(),
            value: "hello".to_string(),
            id: None,
            source: Box::new(SyncError::Released),
        };
        assert!(e.to_string().starts_with("failed to create record <new>"));
    }

    #[test]
    fn validation_errors_are_flagged() {
        let e = SyncError::InvalidRecordId {
            action: ChangeAction::Delete,
            record_type: DnsRecordType::A,
            name: "a.example.com".to_string(),
            id: "abc".to_string(),
            detail: "invalid digit found in string".to_string(),
        };
        assert!(e.is_validation());
        assert!(e.provider_error().is_none());
    }
}
