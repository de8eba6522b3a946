//! Wire types for the EchoVault REST API.
//!
//! The server owns persistence, identifiers, and delivery status. These types
//! only describe what goes over the wire; nothing here mutates schedule state
//! after submission.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An authenticated session, as returned by `POST /auth/login`.
///
/// The session is held by the client and passed explicitly; the token is
/// never read from ambient storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Bearer token for the `Authorization` header.
    pub token: String,
    /// Server-side identifier of the authenticated user. Absent when the
    /// session was built from a pre-issued token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Email the session was created for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// How a scheduled message is delivered to its recipient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMethod {
    Email,
    Phone,
    Both,
}

/// A saved contact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Free-form relationship label ("daughter", "executor", ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Body for `POST /contacts` and `PUT /contacts/{id}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactUpsert {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationship: Option<String>,
}

/// A recorded voice note.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceNote {
    pub id: String,
    pub title: String,
    /// Recording length in seconds.
    pub duration_secs: u32,
    /// Stored size in bytes.
    pub size_bytes: u64,
    pub created_at: DateTime<Utc>,
}

/// Delivery status of a scheduled message, as reported by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleStatus {
    Pending,
    Delivered,
    Failed,
    Cancelled,
}

/// A scheduled message record, as returned by the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledMessage {
    pub id: String,
    pub voice_note_id: String,
    pub scheduled_for: DateTime<Utc>,
    pub delivery_method: DeliveryMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_contact_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_message: Option<String>,
    pub status: ScheduleStatus,
    pub created_at: DateTime<Utc>,
}

/// Body for `POST /scheduled`.
///
/// Exactly one of `recipient_contact_id` or the inline email/phone pair is
/// expected by the server; the scheduling layer enforces this before the
/// request is built.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateScheduled {
    pub voice_note_id: String,
    pub scheduled_for: DateTime<Utc>,
    pub delivery_method: DeliveryMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_contact_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// Counts and storage usage for the dashboard stats cards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_contacts: u64,
    pub total_voice_notes: u64,
    pub pending_scheduled: u64,
    pub storage_used_bytes: u64,
    pub storage_limit_bytes: u64,
}

/// Moderation state of an access request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Denied,
}

/// A pending request in the admin moderation queue (e.g. a survivor asking
/// for access to a vault).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessRequest {
    pub id: String,
    pub user_id: String,
    /// What is being requested ("vault_access", "will_release", ...).
    pub kind: String,
    pub status: RequestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Admin decision on an access request, sent to `POST /admin/requests/{id}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDecision {
    pub approve: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Role of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Member,
    Admin,
}

/// A user account, as seen by the admin screens.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub suspended: bool,
    pub created_at: DateTime<Utc>,
}

/// One entry in the admin audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    pub id: String,
    /// User id of whoever performed the action.
    pub actor: String,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    pub at: DateTime<Utc>,
}

/// Release state of a digital will.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WillStatus {
    Draft,
    Sealed,
    Released,
}

/// A digital will record, as seen by the admin screens.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Will {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub status: WillStatus,
    pub updated_at: DateTime<Utc>,
}
