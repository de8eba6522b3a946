//! Error types for schedule validation and submission.

use chrono::{DateTime, Utc};
use echovault_api::{ApiError, ScheduledMessage};
use thiserror::Error;

/// Errors raised while validating or expanding a schedule request.
///
/// These are synchronous and occur before any network call; a caller seeing
/// one of these knows nothing was submitted.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// Recurrence interval was zero.
    #[error("recurrence interval must be at least 1, got {0}")]
    InvalidInterval(u32),

    /// Occurrence count was zero.
    #[error("occurrence count must be at least 1, got {0}")]
    InvalidOccurrences(u32),

    /// A generated delivery date fell outside the representable range.
    #[error("generated delivery date is out of range")]
    DateOverflow,

    /// The anchor delivery time is not in the future.
    #[error("scheduled time {0} is not in the future")]
    AnchorNotFuture(DateTime<Utc>),

    /// Inline recipient with neither an email nor a phone number.
    #[error("recipient must name a saved contact or include an email or phone number")]
    MissingRecipient,
}

/// Errors raised by the submission loop.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The request failed validation; no deliveries were submitted.
    #[error(transparent)]
    Invalid(#[from] ScheduleError),

    /// Submission failed part-way through the sequence.
    ///
    /// Deliveries in `created` were accepted by the server and remain
    /// scheduled; there is no rollback. `failed_index` is 1-based over the
    /// full sequence (anchor included).
    #[error("submission failed at delivery {failed_index} of {total}: {source}")]
    Partial {
        created: Vec<ScheduledMessage>,
        failed_index: usize,
        total: usize,
        source: ApiError,
    },
}
