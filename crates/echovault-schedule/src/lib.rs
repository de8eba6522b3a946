//! Recurring-schedule expansion and submission for EchoVault.
//!
//! This crate holds the one piece of client-side logic the dashboard has:
//! - Expands a recurrence rule into the concrete follow-up delivery times
//! - Validates a schedule request before anything touches the network
//! - Submits each delivery as an independent, sequential API call

mod error;
pub mod recurrence;
mod request;
mod submit;

pub use error::{ScheduleError, SubmitError};
pub use recurrence::{Frequency, RecurrenceRule, expand};
pub use request::{Recipient, ScheduleRequest};
pub use submit::submit_schedule;
