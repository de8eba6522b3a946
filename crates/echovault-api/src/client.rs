//! HTTP client for the EchoVault REST API.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::debug;

use crate::{
    AccessRequest, AdminUser, ApiError, AuditLogEntry, Contact, ContactUpsert, CreateScheduled,
    DashboardStats, RequestDecision, ScheduledMessage, Session, VoiceNote, Will,
};

/// Client for the EchoVault REST API.
///
/// Holds the session explicitly; there is no ambient token storage. Mutating
/// calls are never retried automatically because the API has no idempotency
/// keys, so a blind retry of `create_scheduled` could double-book a delivery.
pub struct VaultClient {
    http: Client,
    base_url: String,
    session: Arc<RwLock<Option<Session>>>,
}

impl VaultClient {
    /// Create an unauthenticated client for the given API base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to build HTTP client");

        Self {
            http,
            base_url: base_url.into(),
            session: Arc::new(RwLock::new(None)),
        }
    }

    /// Create a client from a pre-issued bearer token.
    pub fn with_token(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        let client = Self::new(base_url);
        let session = Session {
            token: token.into(),
            user_id: None,
            email: None,
        };
        *client
            .session
            .try_write()
            .expect("fresh client lock is uncontended") = Some(session);
        client
    }

    /// Authenticate with email and password.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        #[derive(serde::Serialize)]
        struct LoginRequest<'a> {
            email: &'a str,
            password: &'a str,
        }

        let url = format!("{}/auth/login", self.base_url);

        let response = self
            .http
            .post(&url)
            .json(&LoginRequest { email, password })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.map_err(|e| {
                ApiError::Auth(format!(
                    "login failed ({}): failed to read response: {}",
                    status, e
                ))
            })?;
            return Err(ApiError::Auth(format!("login failed ({}): {}", status, text)));
        }

        let session: Session = response.json().await?;
        debug!(user_id = ?session.user_id, "authenticated with EchoVault API");

        *self.session.write().await = Some(session.clone());
        Ok(session)
    }

    /// Get the current bearer token, or an auth error if not logged in.
    pub async fn access_token(&self) -> Result<String, ApiError> {
        let session = self.session.read().await;
        session
            .as_ref()
            .map(|s| s.token.clone())
            .ok_or_else(|| ApiError::Auth("not authenticated".to_string()))
    }

    /// Get the API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // === Contacts ===

    /// List all saved contacts.
    pub async fn list_contacts(&self) -> Result<Vec<Contact>, ApiError> {
        let response = self.request(Method::GET, "/contacts").await?.send().await?;
        self.handle_response(response).await
    }

    /// Create a contact.
    pub async fn create_contact(&self, contact: &ContactUpsert) -> Result<Contact, ApiError> {
        let response = self
            .request(Method::POST, "/contacts")
            .await?
            .json(contact)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Update an existing contact.
    pub async fn update_contact(
        &self,
        id: &str,
        contact: &ContactUpsert,
    ) -> Result<Contact, ApiError> {
        let response = self
            .request(Method::PUT, &format!("/contacts/{}", id))
            .await?
            .json(contact)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(Self::not_found("contacts", id));
        }
        self.handle_response(response).await
    }

    /// Delete a contact.
    pub async fn delete_contact(&self, id: &str) -> Result<(), ApiError> {
        let response = self
            .request(Method::DELETE, &format!("/contacts/{}", id))
            .await?
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(Self::not_found("contacts", id));
        }
        self.expect_success(response).await
    }

    // === Voice notes ===

    /// List all voice notes.
    pub async fn list_voice_notes(&self) -> Result<Vec<VoiceNote>, ApiError> {
        let response = self
            .request(Method::GET, "/voice-notes")
            .await?
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Get a single voice note.
    pub async fn get_voice_note(&self, id: &str) -> Result<VoiceNote, ApiError> {
        let response = self
            .request(Method::GET, &format!("/voice-notes/{}", id))
            .await?
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(Self::not_found("voice-notes", id));
        }
        self.handle_response(response).await
    }

    /// Get a short-lived download URL for a voice note's audio.
    pub async fn voice_note_download_url(&self, id: &str) -> Result<String, ApiError> {
        #[derive(serde::Deserialize)]
        struct DownloadUrl {
            url: String,
        }

        let response = self
            .request(Method::GET, &format!("/voice-notes/{}/download-url", id))
            .await?
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(Self::not_found("voice-notes", id));
        }
        let body: DownloadUrl = self.handle_response(response).await?;
        Ok(body.url)
    }

    /// Delete a voice note.
    pub async fn delete_voice_note(&self, id: &str) -> Result<(), ApiError> {
        let response = self
            .request(Method::DELETE, &format!("/voice-notes/{}", id))
            .await?
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(Self::not_found("voice-notes", id));
        }
        self.expect_success(response).await
    }

    // === Scheduled messages ===

    /// List all scheduled messages.
    pub async fn list_scheduled(&self) -> Result<Vec<ScheduledMessage>, ApiError> {
        let response = self.request(Method::GET, "/scheduled").await?.send().await?;
        self.handle_response(response).await
    }

    /// Create one scheduled delivery.
    ///
    /// One call schedules exactly one delivery at one timestamp. Recurring
    /// schedules are expanded client-side and submitted as independent calls.
    pub async fn create_scheduled(
        &self,
        request: &CreateScheduled,
    ) -> Result<ScheduledMessage, ApiError> {
        let response = self
            .request(Method::POST, "/scheduled")
            .await?
            .json(request)
            .send()
            .await?;

        let created: ScheduledMessage = self.handle_response(response).await?;
        debug!(
            id = %created.id,
            scheduled_for = %created.scheduled_for,
            "created scheduled delivery"
        );
        Ok(created)
    }

    /// Cancel a scheduled message.
    pub async fn cancel_scheduled(&self, id: &str) -> Result<(), ApiError> {
        let response = self
            .request(Method::DELETE, &format!("/scheduled/{}", id))
            .await?
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(Self::not_found("scheduled", id));
        }
        self.expect_success(response).await
    }

    // === Dashboard ===

    /// Get the counts and storage usage shown on the dashboard.
    pub async fn get_stats(&self) -> Result<DashboardStats, ApiError> {
        let response = self.request(Method::GET, "/stats").await?.send().await?;
        self.handle_response(response).await
    }

    // === Admin ===

    /// List access requests in the moderation queue.
    pub async fn list_requests(&self) -> Result<Vec<AccessRequest>, ApiError> {
        let response = self
            .request(Method::GET, "/admin/requests")
            .await?
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Approve or deny an access request.
    pub async fn resolve_request(
        &self,
        id: &str,
        decision: &RequestDecision,
    ) -> Result<AccessRequest, ApiError> {
        let response = self
            .request(Method::POST, &format!("/admin/requests/{}", id))
            .await?
            .json(decision)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(Self::not_found("admin/requests", id));
        }
        self.handle_response(response).await
    }

    /// List user accounts.
    pub async fn list_users(&self) -> Result<Vec<AdminUser>, ApiError> {
        let response = self
            .request(Method::GET, "/admin/users")
            .await?
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Suspend or reinstate a user account.
    pub async fn set_user_suspended(
        &self,
        id: &str,
        suspended: bool,
    ) -> Result<AdminUser, ApiError> {
        #[derive(serde::Serialize)]
        struct SuspendRequest {
            suspended: bool,
        }

        let response = self
            .request(Method::POST, &format!("/admin/users/{}/suspended", id))
            .await?
            .json(&SuspendRequest { suspended })
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(Self::not_found("admin/users", id));
        }
        self.handle_response(response).await
    }

    /// List audit log entries.
    pub async fn list_logs(&self) -> Result<Vec<AuditLogEntry>, ApiError> {
        let response = self
            .request(Method::GET, "/admin/logs")
            .await?
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// List digital wills.
    pub async fn list_wills(&self) -> Result<Vec<Will>, ApiError> {
        let response = self
            .request(Method::GET, "/admin/wills")
            .await?
            .send()
            .await?;
        self.handle_response(response).await
    }

    // === Internals ===

    /// Build an authenticated request for the given path.
    async fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let token = self.access_token().await?;
        let url = format!("{}{}", self.base_url, path);
        Ok(self
            .http
            .request(method, &url)
            .header("Authorization", format!("Bearer {}", token)))
    }

    fn not_found(resource: &str, id: &str) -> ApiError {
        ApiError::NotFound {
            resource: resource.to_string(),
            id: id.to_string(),
        }
    }

    /// Handle an HTTP response and parse the JSON body.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok());
            return Err(ApiError::RateLimited { retry_after_secs });
        }

        if !status.is_success() {
            let text = response.text().await.map_err(|e| {
                ApiError::InvalidResponse(format!(
                    "request failed ({}): failed to read response: {}",
                    status, e
                ))
            })?;

            // Try to parse the server's structured error shape
            if let Ok(body) = serde_json::from_str::<ErrorBody>(&text) {
                return Err(ApiError::Api {
                    error: body.error,
                    message: body.message,
                });
            }

            return Err(ApiError::InvalidResponse(format!(
                "request failed ({}): {}",
                status, text
            )));
        }

        let body = response.json().await?;
        Ok(body)
    }

    /// Handle a response where only success matters (deletes, cancels).
    async fn expect_success(&self, response: reqwest::Response) -> Result<(), ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        // Reuse the error mapping; the Ok type is irrelevant here
        match self.handle_response::<serde_json::Value>(response).await {
            Ok(_) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

/// Structured error response from the server.
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    error: String,
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_client_creation() {
        let client = VaultClient::new("https://vault.example.com");
        assert_eq!(client.base_url(), "https://vault.example.com");
    }

    #[tokio::test]
    async fn test_access_token_without_session() {
        let client = VaultClient::new("https://vault.example.com");
        let result = client.access_token().await;

        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ApiError::Auth(_)));
    }

    #[tokio::test]
    async fn test_with_token_is_authenticated() {
        let client = VaultClient::with_token("https://vault.example.com", "tok-123");
        assert_eq!(client.access_token().await.unwrap(), "tok-123");
    }

    #[tokio::test]
    async fn test_login_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .and(body_json(serde_json::json!({
                "email": "user@example.com",
                "password": "hunter2"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "token": "session-token",
                "userId": "user-1",
                "email": "user@example.com"
            })))
            .mount(&mock_server)
            .await;

        let client = VaultClient::new(mock_server.uri());
        let session = client.login("user@example.com", "hunter2").await.unwrap();

        assert_eq!(session.user_id.as_deref(), Some("user-1"));
        assert_eq!(client.access_token().await.unwrap(), "session-token");
    }

    #[tokio::test]
    async fn test_login_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": "invalid_credentials",
                "message": "email or password incorrect"
            })))
            .mount(&mock_server)
            .await;

        let client = VaultClient::new(mock_server.uri());
        let result = client.login("user@example.com", "wrong").await;

        assert!(matches!(result.unwrap_err(), ApiError::Auth(_)));
    }

    #[tokio::test]
    async fn test_bearer_header_sent() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/contacts"))
            .and(header("Authorization", "Bearer tok-abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = VaultClient::with_token(mock_server.uri(), "tok-abc");
        let contacts = client.list_contacts().await.unwrap();
        assert!(contacts.is_empty());
    }

    #[tokio::test]
    async fn test_contact_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/contacts/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let client = VaultClient::with_token(mock_server.uri(), "tok");
        let result = client.delete_contact("missing").await;

        assert!(matches!(result.unwrap_err(), ApiError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_rate_limited() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/scheduled"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "30"))
            .mount(&mock_server)
            .await;

        let client = VaultClient::with_token(mock_server.uri(), "tok");
        let result = client.list_scheduled().await;

        match result.unwrap_err() {
            ApiError::RateLimited { retry_after_secs } => {
                assert_eq!(retry_after_secs, Some(30));
            }
            other => panic!("expected RateLimited, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_api_error_body_mapped() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/stats"))
            .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
                "error": "forbidden",
                "message": "admin role required"
            })))
            .mount(&mock_server)
            .await;

        let client = VaultClient::with_token(mock_server.uri(), "tok");
        let result = client.get_stats().await;

        match result.unwrap_err() {
            ApiError::Api { error, message } => {
                assert_eq!(error, "forbidden");
                assert_eq!(message, "admin role required");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_scheduled_round_trip() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/scheduled"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": "sched-1",
                "voiceNoteId": "note-1",
                "scheduledFor": "2025-06-01T10:00:00Z",
                "deliveryMethod": "email",
                "recipientContactId": "contact-1",
                "status": "pending",
                "createdAt": "2025-01-01T00:00:00Z"
            })))
            .mount(&mock_server)
            .await;

        let client = VaultClient::with_token(mock_server.uri(), "tok");
        let created = client
            .create_scheduled(&CreateScheduled {
                voice_note_id: "note-1".to_string(),
                scheduled_for: "2025-06-01T10:00:00Z".parse().unwrap(),
                delivery_method: crate::DeliveryMethod::Email,
                recipient_contact_id: Some("contact-1".to_string()),
                recipient_email: None,
                recipient_phone: None,
                custom_message: None,
                metadata: None,
            })
            .await
            .unwrap();

        assert_eq!(created.id, "sched-1");
        assert_eq!(created.status, crate::ScheduleStatus::Pending);
    }
}
