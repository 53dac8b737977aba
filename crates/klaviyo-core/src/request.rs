//! Request building and response mapping.
//!
//! [`RequestBuilder`] turns a high-level call into an authenticated
//! [`HttpRequest`]. The functions in this module map an [`HttpResponse`] to
//! the value the endpoint returns on success, or to [`KlaviyoError::Api`].

use std::fmt;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Serialize;

use crate::error::{KlaviyoError, Result};
use crate::event::{event_payload, TrackOptions};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::ids::{ListId, ProfileId};
use crate::list::ListMembership;
use crate::profile::{profile_import_payload, profile_update_payload, ProfileAttributes};
use crate::Properties;

/// Production API host.
pub const DEFAULT_BASE_URL: &str = "https://a.klaviyo.com";

/// API revision every request is pinned to.
pub const DEFAULT_REVISION: &str = "2024-02-15";

/// Characters escaped when an id is placed in a URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// API key, base URL and revision. Immutable once built.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_key: String,
    base_url: String,
    revision: String,
}

impl Credentials {
    /// Credentials for `base_url` at the default revision.
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            revision: DEFAULT_REVISION.to_string(),
        }
    }

    /// Override the revision.
    #[must_use]
    pub fn with_revision(mut self, revision: impl Into<String>) -> Self {
        self.revision = revision.into();
        self
    }

    /// The private API key.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Revision sent in the `revision` header.
    #[must_use]
    pub fn revision(&self) -> &str {
        &self.revision
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("revision", &self.revision)
            .finish()
    }
}

/// Builds authenticated requests for every supported endpoint.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    credentials: Credentials,
}

impl RequestBuilder {
    /// Create a builder over `credentials`.
    #[must_use]
    pub const fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    /// The credentials requests are signed with.
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// `POST /api/events`.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the options carry no subject identity.
    pub fn build_track(&self, event: &str, options: &TrackOptions) -> Result<HttpRequest> {
        let payload = event_payload(event, options)?;
        self.with_body(HttpMethod::Post, "api/events", &payload)
    }

    /// `POST /api/events` with the track-once marker set.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the options carry no subject identity.
    pub fn build_track_once(&self, event: &str, options: &TrackOptions) -> Result<HttpRequest> {
        self.build_track(event, &options.clone().once())
    }

    /// `POST /api/profile-import`.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the email is empty.
    pub fn build_identify(
        &self,
        attributes: &ProfileAttributes,
        custom_properties: &Properties,
    ) -> Result<HttpRequest> {
        let payload = profile_import_payload(attributes, custom_properties)?;
        self.with_body(HttpMethod::Post, "api/profile-import", &payload)
    }

    /// `GET /api/lists`.
    #[must_use]
    pub fn build_get_lists(&self) -> HttpRequest {
        self.without_body(HttpMethod::Get, "api/lists")
    }

    /// `POST /api/profile-subscription-bulk-create-jobs/`.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload cannot be serialized.
    pub fn build_add_to_list(&self, email: &str, list_id: &ListId) -> Result<HttpRequest> {
        let payload = ListMembership::new(email, list_id.clone()).to_payload();
        self.with_body(
            HttpMethod::Post,
            "api/profile-subscription-bulk-create-jobs/",
            &payload,
        )
    }

    /// `GET /api/profiles/{id}`.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the id is empty, `.` or `..`.
    pub fn build_get_profile(&self, id: &ProfileId) -> Result<HttpRequest> {
        let path = profile_path(id)?;
        Ok(self.without_body(HttpMethod::Get, &path))
    }

    /// `PATCH /api/profiles/{id}`.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the id is empty, `.` or `..`.
    pub fn build_update_profile(
        &self,
        id: &ProfileId,
        properties: &Properties,
    ) -> Result<HttpRequest> {
        let path = profile_path(id)?;
        let payload = profile_update_payload(id, properties);
        self.with_body(HttpMethod::Patch, &path, &payload)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.credentials.base_url)
    }

    fn auth_headers(&self) -> Vec<(String, String)> {
        vec![
            ("accept".to_string(), "application/json".to_string()),
            (
                "authorization".to_string(),
                format!("Klaviyo-API-Key {}", self.credentials.api_key),
            ),
            ("revision".to_string(), self.credentials.revision.clone()),
        ]
    }

    fn without_body(&self, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest {
            method,
            url: self.url(path),
            headers: self.auth_headers(),
            body: None,
        }
    }

    fn with_body<T: Serialize>(
        &self,
        method: HttpMethod,
        path: &str,
        payload: &T,
    ) -> Result<HttpRequest> {
        let body = serde_json::to_string(payload)?;
        let mut headers = self.auth_headers();
        headers.push(("content-type".to_string(), "application/json".to_string()));
        Ok(HttpRequest {
            method,
            url: self.url(path),
            headers,
            body: Some(body),
        })
    }
}

/// `api/profiles/{id}` with the id escaped as a single path segment.
fn profile_path(id: &ProfileId) -> Result<String> {
    // Dot segments are resolved by URL parsers even when percent-encoded.
    if matches!(id.as_str(), "" | "." | "..") {
        return Err(KlaviyoError::validation(format!("invalid profile id: {id:?}")));
    }
    Ok(format!(
        "api/profiles/{}",
        utf8_percent_encode(id.as_str(), PATH_SEGMENT)
    ))
}

/// Success only on `202 Accepted`.
///
/// # Errors
///
/// Returns [`KlaviyoError::Api`] for any other status.
pub fn expect_accepted(response: &HttpResponse) -> Result<bool> {
    check_status(response, &[202])?;
    Ok(true)
}

/// Success on any of `expected`, returning the parsed JSON object.
///
/// An empty success body parses as an empty object.
///
/// # Errors
///
/// Returns [`KlaviyoError::Api`] for an unexpected status, or a serialization
/// error if the body is not a JSON object.
pub fn expect_body(response: &HttpResponse, expected: &[u16]) -> Result<Properties> {
    check_status(response, expected)?;
    if response.body.trim().is_empty() {
        return Ok(Properties::new());
    }
    Ok(serde_json::from_str(&response.body)?)
}

fn check_status(response: &HttpResponse, expected: &[u16]) -> Result<()> {
    if expected.contains(&response.status) {
        return Ok(());
    }
    Err(KlaviyoError::api(response.status, &response.body))
}
