//! Klaviyo HTTP client implementation.

use std::time::Duration;

use klaviyo_core::{
    expect_accepted, expect_body, Credentials, HttpRequest, HttpResponse, KlaviyoError, ListId,
    ProfileAttributes, ProfileId, Properties, RequestBuilder, Result, TrackOptions,
};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::transport::{HttpTransport, ReqwestTransport};

/// Klaviyo API client.
///
/// Every method issues exactly one request and returns as soon as the
/// response is mapped. Nothing is retried.
#[derive(Debug, Clone)]
pub struct KlaviyoClient<T = ReqwestTransport> {
    requests: RequestBuilder,
    transport: T,
}

impl KlaviyoClient {
    /// Create a client over the default reqwest transport.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Private Klaviyo API key
    /// * `base_url` - API host (e.g., `"https://a.klaviyo.com"`)
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        Ok(Self::with_transport(
            Credentials::new(api_key, base_url),
            ReqwestTransport::new()?,
        ))
    }

    /// Create a client from a [`ClientConfig`].
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let transport =
            ReqwestTransport::with_timeout(config.timeout_seconds.map(Duration::from_secs))?;
        Ok(Self::with_transport(config.credentials(), transport))
    }

    /// Create a client from `KLAVIYO_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the environment is incomplete.
    pub fn from_env() -> Result<Self> {
        Self::from_config(&ClientConfig::from_env()?)
    }
}

impl<T: HttpTransport> KlaviyoClient<T> {
    /// Create a client over a caller-supplied transport.
    pub const fn with_transport(credentials: Credentials, transport: T) -> Self {
        Self {
            requests: RequestBuilder::new(credentials),
            transport,
        }
    }

    /// The credentials this client signs requests with.
    pub const fn credentials(&self) -> &Credentials {
        self.requests.credentials()
    }

    /// Track an event for a profile.
    ///
    /// Returns `true` when Klaviyo accepts the event (`202`).
    ///
    /// # Errors
    ///
    /// Returns a validation error if `options` has neither email nor id, or
    /// an API error for any status other than `202`.
    pub async fn track(&self, event: &str, options: &TrackOptions) -> Result<bool> {
        let request = self.requests.build_track(event, options)?;
        self.dispatch(request, expect_accepted).await
    }

    /// Track an event that Klaviyo records at most once per profile.
    ///
    /// # Errors
    ///
    /// Same as [`KlaviyoClient::track`].
    pub async fn track_once(&self, event: &str, options: &TrackOptions) -> Result<bool> {
        let request = self.requests.build_track_once(event, options)?;
        self.dispatch(request, expect_accepted).await
    }

    /// Create or update a profile.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the email is empty, or an API error for
    /// any status other than `200` or `201`.
    pub async fn identify(
        &self,
        attributes: &ProfileAttributes,
        custom_properties: &Properties,
    ) -> Result<Properties> {
        let request = self.requests.build_identify(attributes, custom_properties)?;
        self.dispatch(request, |response| expect_body(response, &[200, 201]))
            .await
    }

    /// Fetch the account's lists.
    ///
    /// # Errors
    ///
    /// Returns an API error for any status other than `200`.
    pub async fn get_lists(&self) -> Result<Properties> {
        let request = self.requests.build_get_lists();
        self.dispatch(request, |response| expect_body(response, &[200]))
            .await
    }

    /// Subscribe one email to a list.
    ///
    /// Returns `true` when the subscription job is accepted (`202`).
    ///
    /// # Errors
    ///
    /// Returns an API error for any status other than `202`.
    pub async fn add_to_list(&self, email: &str, list_id: &ListId) -> Result<bool> {
        let request = self.requests.build_add_to_list(email, list_id)?;
        self.dispatch(request, expect_accepted).await
    }

    /// Fetch a profile by id.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the id is empty, `.` or `..`, or an API
    /// error for any status other than `200`.
    pub async fn get_profile(&self, id: &ProfileId) -> Result<Properties> {
        let request = self.requests.build_get_profile(id)?;
        self.dispatch(request, |response| expect_body(response, &[200]))
            .await
    }

    /// Patch a profile's attributes.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the id is empty, `.` or `..`, or an API
    /// error for any status other than `200`.
    pub async fn update_profile(
        &self,
        id: &ProfileId,
        properties: &Properties,
    ) -> Result<Properties> {
        let request = self.requests.build_update_profile(id, properties)?;
        self.dispatch(request, |response| expect_body(response, &[200]))
            .await
    }

    /// Send one request and map its response.
    async fn dispatch<V>(
        &self,
        request: HttpRequest,
        parse: impl FnOnce(&HttpResponse) -> Result<V> + Send,
    ) -> Result<V> {
        let method = request.method;
        let url = request.url.clone();
        debug!(
            %method,
            %url,
            payload = request.body.as_deref().unwrap_or_default(),
            "Sending Klaviyo request"
        );

        let response = self.transport.execute(request).await?;
        let result = parse(&response);

        match &result {
            Ok(_) => debug!(%method, %url, status = response.status, "Klaviyo request succeeded"),
            Err(KlaviyoError::Api { status, body }) => {
                warn!(%method, %url, status, %body, "Klaviyo API returned an error");
            }
            Err(e) => warn!(%method, %url, error = %e, "Failed to read Klaviyo response"),
        }

        result
    }
}
