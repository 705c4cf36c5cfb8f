//! DigitalOcean error mapping

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::DigitalOceanProvider;

/// DigitalOcean error id mapping
/// Reference: <https://docs.digitalocean.com/reference/api/api-reference/#section/Introduction/HTTP-Statuses>
impl ProviderErrorMapper for DigitalOceanProvider {
    fn provider_name(&self) -> &'static str {
        "digitalocean"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        match raw.code.as_deref() {
            Some("unauthorized") => ProviderError::InvalidCredentials {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            Some("forbidden") => ProviderError::PermissionDenied {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            // A record id in the context means the record was addressed, not the domain
            Some("not_found") => match (context.record_id, context.domain) {
                (Some(record_id), _) => ProviderError::RecordNotFound {
                    provider: self.provider_name().to_string(),
                    record_id,
                    raw_message: Some(raw.message),
                },
                (None, domain) => ProviderError::DomainNotFound {
                    provider: self.provider_name().to_string(),
                    domain: domain.unwrap_or_else(|| "<unknown>".to_string()),
                    raw_message: Some(raw.message),
                },
            },

            Some("too_many_requests") => ProviderError::RateLimited {
                provider: self.provider_name().to_string(),
                retry_after: None,
                raw_message: Some(raw.message),
            },

            Some("unprocessable_entity" | "bad_request") => ProviderError::InvalidParameter {
                provider: self.provider_name().to_string(),
                param: "record".to_string(),
                detail: raw.message,
            },

            _ => self.unknown_error(raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> DigitalOceanProvider {
        DigitalOceanProvider::new("test".to_string())
    }

    #[test]
    fn unauthorized_maps_to_invalid_credentials() {
        let err = provider().map_error(
            RawApiError::with_code("unauthorized", "Unable to authenticate you"),
            ErrorContext::default(),
        );
        assert!(
            matches!(err, ProviderError::InvalidCredentials { .. }),
            "got {err:?}"
        );
    }

    #[test]
    fn forbidden_maps_to_permission_denied() {
        let err = provider().map_error(
            RawApiError::with_code("forbidden", "read-only token"),
            ErrorContext::default(),
        );
        assert!(matches!(err, ProviderError::PermissionDenied { .. }), "got {err:?}");
    }

    #[test]
    fn not_found_with_record_context() {
        let err = provider().map_error(
            RawApiError::with_code("not_found", "missing"),
            ErrorContext::record("example.com", 7),
        );
        assert!(
            matches!(err, ProviderError::RecordNotFound { ref record_id, .. } if record_id == "7"),
            "got {err:?}"
        );
    }

    #[test]
    fn not_found_with_domain_context() {
        let err = provider().map_error(
            RawApiError::with_code("not_found", "missing"),
            ErrorContext::domain("example.com"),
        );
        assert!(
            matches!(err, ProviderError::DomainNotFound { ref domain, .. } if domain == "example.com"),
            "got {err:?}"
        );
    }

    #[test]
    fn too_many_requests_maps_to_rate_limited() {
        let err = provider().map_error(
            RawApiError::with_code("too_many_requests", "slow down"),
            ErrorContext::default(),
        );
        assert!(err.is_transient());
    }

    #[test]
    fn unprocessable_entity_maps_to_invalid_parameter() {
        let err = provider().map_error(
            RawApiError::with_code("unprocessable_entity", "Data needs to be an IPv4 address."),
            ErrorContext::default(),
        );
        assert!(
            matches!(err, ProviderError::InvalidParameter { ref param, .. } if param == "record"),
            "got {err:?}"
        );
    }

    #[test]
    fn unknown_id_maps_to_unknown() {
        let err = provider().map_error(
            RawApiError::with_code("server_error", "boom"),
            ErrorContext::default(),
        );
        assert!(
            matches!(err, ProviderError::Unknown { ref raw_code, .. } if raw_code.as_deref() == Some("server_error")),
            "got {err:?}"
        );
    }

    #[test]
    fn no_code_maps_to_unknown() {
        let err = provider().map_error(
            RawApiError {
                code: None,
                message: "boom".to_string(),
            },
            ErrorContext::default(),
        );
        assert!(matches!(err, ProviderError::Unknown { raw_code: None, .. }));
    }
}
