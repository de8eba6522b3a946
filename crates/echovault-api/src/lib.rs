//! Typed HTTP client for the EchoVault REST API.
//!
//! All data access in this workspace goes through [`VaultClient`]: contacts,
//! voice notes, scheduled messages, dashboard stats, and the admin moderation
//! endpoints. Business logic (delivery, storage lifecycle, billing) lives
//! server-side; this crate only moves typed data over the wire.
//!
//! ## Features
//!
//! - **Client**: bearer-token REST client with structured error mapping
//! - **Types**: serde wire model for every dashboard screen
//! - **Filter**: pure client-side pagination and filtering for list views

mod client;
mod error;
pub mod filter;
mod types;

pub use client::VaultClient;
pub use error::ApiError;
pub use filter::{Page, filter_contacts, filter_requests, paginate};
pub use types::*;
