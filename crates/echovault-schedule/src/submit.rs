//! Sequential submission of expanded schedules.

use chrono::Utc;
use echovault_api::{ScheduledMessage, VaultClient};
use tracing::{debug, info, warn};

use crate::{ScheduleRequest, SubmitError};

/// Submit every delivery of a (possibly recurring) schedule request.
///
/// Validation and expansion happen up front; a validation error means no
/// request was issued. Deliveries are then submitted one at a time, each
/// response awaited before the next request goes out. There is no batching
/// and no rollback: this is at-least-once, non-atomic by design of the
/// upstream API, which assigns one record per delivery and has no batch or
/// idempotency mechanism. On failure at delivery k, deliveries 1..k-1 stay
/// scheduled remotely and are reported inside [`SubmitError::Partial`].
#[tracing::instrument(skip(client, request), fields(voice_note_id = %request.voice_note_id))]
pub async fn submit_schedule(
    client: &VaultClient,
    request: &ScheduleRequest,
) -> Result<Vec<ScheduledMessage>, SubmitError> {
    request.validate(Utc::now())?;
    let times = request.delivery_times()?;
    let total = times.len();

    let mut created = Vec::with_capacity(total);
    for (index, at) in times.into_iter().enumerate() {
        match client.create_scheduled(&request.to_create(at)).await {
            Ok(record) => {
                debug!(delivery = index + 1, total, scheduled_for = %at, "delivery scheduled");
                created.push(record);
            }
            Err(source) => {
                warn!(
                    failed = index + 1,
                    total,
                    already_created = created.len(),
                    error = %source,
                    "schedule submission failed part-way; earlier deliveries remain scheduled"
                );
                return Err(SubmitError::Partial {
                    created,
                    failed_index: index + 1,
                    total,
                    source,
                });
            }
        }
    }

    info!(count = total, "schedule submitted");
    Ok(created)
}
