//! Core types for the Klaviyo client.
//!
//! This crate does no I/O. It provides:
//!
//! - **Payloads**: `TrackOptions`, `ProfileAttributes`, `ListMembership`
//!   and the JSON:API documents built from them
//! - **Requests**: `Credentials` and `RequestBuilder`, which produce signed
//!   `HttpRequest` values
//! - **Responses**: `expect_accepted` / `expect_body`, which map an
//!   `HttpResponse` status to a result or a `KlaviyoError`
//!
//! # Target API
//!
//! Requests follow the JSON:API contract selected by the `revision` header
//! (default `2024-02-15`) and authenticate with
//! `Authorization: Klaviyo-API-Key <key>`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod document;
pub mod error;
pub mod event;
pub mod http;
pub mod ids;
pub mod list;
pub mod profile;
pub mod request;

/// Free-form JSON object used for event, customer and profile properties.
pub type Properties = serde_json::Map<String, serde_json::Value>;

pub use error::{ErrorKind, KlaviyoError, Result};
pub use event::{merge_identity, TrackOptions, TRACK_ONCE_MARKER};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use ids::{ListId, ProfileId};
pub use list::ListMembership;
pub use profile::{Location, ProfileAttributes};
pub use request::{
    expect_accepted, expect_body, Credentials, RequestBuilder, DEFAULT_BASE_URL, DEFAULT_REVISION,
};
