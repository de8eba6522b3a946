//! Recurrence expansion for scheduled deliveries.

use chrono::{DateTime, Duration, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::ScheduleError;

/// How often a scheduled delivery repeats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// No repetition; only the anchor delivery exists.
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

/// A recurrence rule attached to a schedule request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceRule {
    /// How often the delivery repeats.
    #[serde(rename = "type")]
    pub frequency: Frequency,
    /// Multiplier on the frequency step (every `interval` days/weeks/...).
    #[serde(default = "default_one")]
    pub interval: u32,
    /// Inclusive upper bound on generated delivery dates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// Total number of deliveries, the anchor counting as the first.
    #[serde(default = "default_one")]
    pub occurrences: u32,
}

fn default_one() -> u32 {
    1
}

impl RecurrenceRule {
    /// Check the rule's shape. Zero values are rejected, never clamped.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.interval == 0 {
            return Err(ScheduleError::InvalidInterval(self.interval));
        }
        if self.occurrences == 0 {
            return Err(ScheduleError::InvalidOccurrences(self.occurrences));
        }
        Ok(())
    }
}

/// Compute the follow-up delivery times for a recurring schedule.
///
/// The anchor is occurrence 1 and is not included in the output; occurrence
/// `i` is computed multiplicatively from the anchor (anchor + interval·i
/// steps), not cumulatively from the previous occurrence. Month and year
/// steps clamp to the last day of the target month when the anchor's
/// day-of-month does not exist there (Jan 31 + 1 month = Feb 28), which also
/// means a later occurrence can land back on the anchor's day (Jan 31 + 2
/// months = Mar 31).
///
/// Generation stops early once a date falls on a calendar day after
/// `end_date`; the partial sequence is returned, not an error. Pure function,
/// no I/O: the caller submits each returned time as an independent request.
pub fn expand(
    anchor: DateTime<Utc>,
    rule: &RecurrenceRule,
) -> Result<Vec<DateTime<Utc>>, ScheduleError> {
    rule.validate()?;

    if rule.frequency == Frequency::None || rule.occurrences <= 1 {
        return Ok(Vec::new());
    }

    let mut dates = Vec::with_capacity(rule.occurrences as usize - 1);
    for i in 1..rule.occurrences {
        let date = step(anchor, rule.frequency, rule.interval, i)?;

        if let Some(end) = rule.end_date
            && date.date_naive() > end
        {
            break;
        }
        dates.push(date);
    }

    Ok(dates)
}

/// Compute occurrence `i` (1-based from the second occurrence) from the anchor.
fn step(
    anchor: DateTime<Utc>,
    frequency: Frequency,
    interval: u32,
    i: u32,
) -> Result<DateTime<Utc>, ScheduleError> {
    let steps = (interval as i64)
        .checked_mul(i as i64)
        .ok_or(ScheduleError::DateOverflow)?;

    let date = match frequency {
        Frequency::None => unreachable!("expand returns early for Frequency::None"),
        Frequency::Daily => anchor.checked_add_signed(Duration::days(steps)),
        Frequency::Weekly => {
            let days = steps.checked_mul(7).ok_or(ScheduleError::DateOverflow)?;
            anchor.checked_add_signed(Duration::days(days))
        }
        Frequency::Monthly => {
            let months = u32::try_from(steps).map_err(|_| ScheduleError::DateOverflow)?;
            anchor.checked_add_months(Months::new(months))
        }
        Frequency::Yearly => {
            let months = steps.checked_mul(12).ok_or(ScheduleError::DateOverflow)?;
            let months = u32::try_from(months).map_err(|_| ScheduleError::DateOverflow)?;
            anchor.checked_add_months(Months::new(months))
        }
    };

    date.ok_or(ScheduleError::DateOverflow)
}
