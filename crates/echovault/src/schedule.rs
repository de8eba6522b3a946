//! The `schedule` subcommand.

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, ValueEnum};
use miette::Result;
use tracing::warn;

use echovault_api::{DeliveryMethod, VaultClient};
use echovault_schedule::{
    Frequency, Recipient, RecurrenceRule, ScheduleRequest, SubmitError, submit_schedule,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MethodArg {
    Email,
    Phone,
    Both,
}

impl From<MethodArg> for DeliveryMethod {
    fn from(value: MethodArg) -> Self {
        match value {
            MethodArg::Email => DeliveryMethod::Email,
            MethodArg::Phone => DeliveryMethod::Phone,
            MethodArg::Both => DeliveryMethod::Both,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RepeatArg {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl From<RepeatArg> for Frequency {
    fn from(value: RepeatArg) -> Self {
        match value {
            RepeatArg::Daily => Frequency::Daily,
            RepeatArg::Weekly => Frequency::Weekly,
            RepeatArg::Monthly => Frequency::Monthly,
            RepeatArg::Yearly => Frequency::Yearly,
        }
    }
}

#[derive(Args)]
pub struct ScheduleArgs {
    /// Id of the voice note to deliver
    #[arg(long)]
    pub voice_note: String,

    /// First delivery time (RFC 3339, e.g. 2026-12-24T18:00:00Z)
    #[arg(long)]
    pub at: DateTime<Utc>,

    /// How to deliver the message
    #[arg(long, value_enum, default_value = "email")]
    pub method: MethodArg,

    /// Id of a saved contact to deliver to
    #[arg(long, conflicts_with_all = ["email", "phone"])]
    pub contact: Option<String>,

    /// Inline recipient email
    #[arg(long)]
    pub email: Option<String>,

    /// Inline recipient phone number
    #[arg(long)]
    pub phone: Option<String>,

    /// Message text shown alongside the recording
    #[arg(long)]
    pub message: Option<String>,

    /// Repeat the delivery
    #[arg(long, value_enum)]
    pub repeat: Option<RepeatArg>,

    /// Repeat every N days/weeks/months/years
    #[arg(long, default_value = "1", requires = "repeat")]
    pub interval: u32,

    /// Total number of deliveries, the first one included
    #[arg(long, default_value = "1", requires = "repeat")]
    pub count: u32,

    /// Do not deliver after this date (inclusive)
    #[arg(long, requires = "repeat")]
    pub until: Option<NaiveDate>,
}

pub async fn run(client: &VaultClient, args: ScheduleArgs) -> Result<()> {
    let recipient = match args.contact {
        Some(contact_id) => Recipient::Contact { contact_id },
        None => Recipient::Inline {
            email: args.email,
            phone: args.phone,
        },
    };

    let recurrence = args.repeat.map(|repeat| RecurrenceRule {
        frequency: repeat.into(),
        interval: args.interval,
        end_date: args.until,
        occurrences: args.count,
    });

    let request = ScheduleRequest {
        voice_note_id: args.voice_note,
        scheduled_for: args.at,
        delivery_method: args.method.into(),
        recipient,
        custom_message: args.message,
        recurrence,
    };

    match submit_schedule(client, &request).await {
        Ok(created) => {
            println!("scheduled {} delivery(ies):", created.len());
            for record in created {
                println!("  {}  {}", record.id, record.scheduled_for);
            }
            Ok(())
        }
        Err(SubmitError::Partial {
            created,
            failed_index,
            total,
            source,
        }) => {
            // The first created.len() deliveries are live on the server;
            // there is no rollback, so say so instead of a bare failure.
            warn!(created = created.len(), total, "partial schedule submission");
            for record in &created {
                println!("  scheduled: {}  {}", record.id, record.scheduled_for);
            }
            Err(miette::miette!(
                "delivery {} of {} failed: {}. The {} earlier delivery(ies) listed above remain scheduled; cancel them with `echovault scheduled cancel` if unwanted",
                failed_index,
                total,
                source,
                created.len()
            ))
        }
        Err(SubmitError::Invalid(e)) => Err(miette::miette!("{}", e)),
    }
}
