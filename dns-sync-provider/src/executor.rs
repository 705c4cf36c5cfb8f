//! Change batch execution

use crate::client::DnsClient;
use crate::error::{ProviderError, SyncError, SyncResult};
use crate::state::ZoneState;
use crate::types::{ChangeAction, ChangeRequest, Zone};

/// Apply `requests` to `zone` strictly in order.
///
/// Update and delete requests without an id are resolved against `state`.
/// The first failure aborts the batch; requests before it stay applied and
/// their count is reported in [`SyncError::ChangeFailed`]. Returns the number
/// of applied requests.
pub async fn execute_requests(
    client: &DnsClient,
    zone: &Zone,
    state: &ZoneState,
    requests: &[ChangeRequest],
) -> SyncResult<usize> {
    let provider = client.provider_name();

    for (applied, request) in requests.iter().enumerate() {
        let mut record = request.record.clone();
        record.zone = zone.key().to_string();
        if request.action != ChangeAction::Create && record.id.is_none() {
            record.id = state.resolve_id(&request.record);
        }

        let result = match request.action {
            ChangeAction::Create => client.create_record(&record).await,
            ChangeAction::Update => client.update_record(&record).await,
            ChangeAction::Delete => client.delete_record(&record).await,
        };

        if let Err(e) = result {
            if e.provider_error().is_none_or(ProviderError::is_expected) {
                log::warn!(
                    "[{provider}] {} of {} '{}' in zone '{}' rejected: {e}",
                    request.action,
                    record.record_type,
                    record.name,
                    zone.key()
                );
            } else {
                log::error!(
                    "[{provider}] {} of {} '{}' in zone '{}' failed: {e}",
                    request.action,
                    record.record_type,
                    record.name,
                    zone.key()
                );
            }

            return Err(SyncError::ChangeFailed {
                applied,
                action: request.action,
                record_type: record.record_type,
                name: record.name,
                value: record.value,
                id: record.id,
                source: Box::new(e),
            });
        }

        log::info!(
            "[{provider}] {} {} '{}' -> '{}' in zone '{}'",
            request.action,
            record.record_type,
            record.name,
            record.value,
            zone.key()
        );
    }

    Ok(requests.len())
}
