//! Schedule requests as built by the scheduling form.

use chrono::{DateTime, Utc};
use echovault_api::{CreateScheduled, DeliveryMethod};
use serde::{Deserialize, Serialize};

use crate::{RecurrenceRule, ScheduleError, recurrence};

/// Who receives a scheduled delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", untagged)]
pub enum Recipient {
    /// A saved contact, referenced by id.
    Contact { contact_id: String },
    /// An inline recipient; at least one of the two fields must be set.
    Inline {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        email: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        phone: Option<String>,
    },
}

/// A scheduled delivery as assembled before submission.
///
/// Lives only in memory during form submission. Each delivery time it expands
/// to becomes one independent create call; the server owns everything after
/// that.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    pub voice_note_id: String,
    /// The anchor delivery time; occurrence 1 of the sequence.
    pub scheduled_for: DateTime<Utc>,
    pub delivery_method: DeliveryMethod,
    pub recipient: Recipient,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<RecurrenceRule>,
}

impl ScheduleRequest {
    /// Validate the request relative to `now`.
    ///
    /// The anchor must be strictly in the future, the recipient well-formed,
    /// and any recurrence rule shape-valid. Runs before any network call.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), ScheduleError> {
        if self.scheduled_for <= now {
            return Err(ScheduleError::AnchorNotFuture(self.scheduled_for));
        }

        if let Recipient::Inline { email, phone } = &self.recipient
            && email.is_none()
            && phone.is_none()
        {
            return Err(ScheduleError::MissingRecipient);
        }

        if let Some(rule) = &self.recurrence {
            rule.validate()?;
        }

        Ok(())
    }

    /// All delivery times for this request: the anchor, then the expanded
    /// follow-up occurrences (if any).
    pub fn delivery_times(&self) -> Result<Vec<DateTime<Utc>>, ScheduleError> {
        let mut times = vec![self.scheduled_for];
        if let Some(rule) = &self.recurrence {
            times.extend(recurrence::expand(self.scheduled_for, rule)?);
        }
        Ok(times)
    }

    /// Build the wire body for one delivery at `scheduled_for`.
    pub fn to_create(&self, scheduled_for: DateTime<Utc>) -> CreateScheduled {
        let (contact_id, email, phone) = match &self.recipient {
            Recipient::Contact { contact_id } => (Some(contact_id.clone()), None, None),
            Recipient::Inline { email, phone } => (None, email.clone(), phone.clone()),
        };

        CreateScheduled {
            voice_note_id: self.voice_note_id.clone(),
            scheduled_for,
            delivery_method: self.delivery_method,
            recipient_contact_id: contact_id,
            recipient_email: email,
            recipient_phone: phone,
            custom_message: self.custom_message.clone(),
            metadata: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Frequency;
    use chrono::Duration;

    fn request() -> ScheduleRequest {
        ScheduleRequest {
            voice_note_id: "note-1".to_string(),
            scheduled_for: Utc::now() + Duration::days(7),
            delivery_method: DeliveryMethod::Email,
            recipient: Recipient::Contact {
                contact_id: "contact-1".to_string(),
            },
            custom_message: None,
            recurrence: None,
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(request().validate(Utc::now()).is_ok());
    }

    #[test]
    fn test_anchor_in_past_rejected() {
        let mut req = request();
        req.scheduled_for = Utc::now() - Duration::hours(1);
        assert!(matches!(
            req.validate(Utc::now()).unwrap_err(),
            ScheduleError::AnchorNotFuture(_)
        ));
    }

    #[test]
    fn test_anchor_exactly_now_rejected() {
        let now = Utc::now();
        let mut req = request();
        req.scheduled_for = now;
        assert!(req.validate(now).is_err());
    }

    #[test]
    fn test_empty_inline_recipient_rejected() {
        let mut req = request();
        req.recipient = Recipient::Inline {
            email: None,
            phone: None,
        };
        assert!(matches!(
            req.validate(Utc::now()).unwrap_err(),
            ScheduleError::MissingRecipient
        ));
    }

    #[test]
    fn test_inline_recipient_with_phone_only_accepted() {
        let mut req = request();
        req.recipient = Recipient::Inline {
            email: None,
            phone: Some("+15551234".to_string()),
        };
        assert!(req.validate(Utc::now()).is_ok());
    }

    #[test]
    fn test_bad_recurrence_rejected() {
        let mut req = request();
        req.recurrence = Some(RecurrenceRule {
            frequency: Frequency::Daily,
            interval: 0,
            end_date: None,
            occurrences: 3,
        });
        assert!(matches!(
            req.validate(Utc::now()).unwrap_err(),
            ScheduleError::InvalidInterval(0)
        ));
    }

    #[test]
    fn test_delivery_times_non_recurring_is_just_anchor() {
        let req = request();
        assert_eq!(req.delivery_times().unwrap(), vec![req.scheduled_for]);
    }

    #[test]
    fn test_delivery_times_includes_anchor_first() {
        let mut req = request();
        req.recurrence = Some(RecurrenceRule {
            frequency: Frequency::Daily,
            interval: 1,
            end_date: None,
            occurrences: 3,
        });

        let times = req.delivery_times().unwrap();
        assert_eq!(times.len(), 3);
        assert_eq!(times[0], req.scheduled_for);
        assert_eq!(times[1], req.scheduled_for + Duration::days(1));
        assert_eq!(times[2], req.scheduled_for + Duration::days(2));
    }

    #[test]
    fn test_to_create_maps_contact_recipient() {
        let req = request();
        let body = req.to_create(req.scheduled_for);
        assert_eq!(body.recipient_contact_id.as_deref(), Some("contact-1"));
        assert_eq!(body.recipient_email, None);
        assert_eq!(body.recipient_phone, None);
    }

    #[test]
    fn test_to_create_maps_inline_recipient() {
        let mut req = request();
        req.recipient = Recipient::Inline {
            email: Some("kid@example.com".to_string()),
            phone: None,
        };
        let body = req.to_create(req.scheduled_for);
        assert_eq!(body.recipient_contact_id, None);
        assert_eq!(body.recipient_email.as_deref(), Some("kid@example.com"));
    }
}
