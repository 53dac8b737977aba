//! Klaviyo Client SDK.
//!
//! Async client for Klaviyo's event, profile and list endpoints.
//!
//! # Example
//!
//! ```no_run
//! use klaviyo_client::{KlaviyoClient, ProfileAttributes, Properties, TrackOptions};
//!
//! # async fn example() -> Result<(), klaviyo_client::KlaviyoError> {
//! let client = KlaviyoClient::new("pk_your_private_key", "https://a.klaviyo.com")?;
//!
//! // Record an event
//! client
//!     .track(
//!         "Placed Order",
//!         &TrackOptions::for_email("ann@example.com").with_property("value", 42.5),
//!     )
//!     .await?;
//!
//! // Create or update the profile behind it
//! let profile = client
//!     .identify(
//!         &ProfileAttributes::new("ann@example.com").with_first_name("Ann"),
//!         &Properties::new(),
//!     )
//!     .await?;
//! println!("profile: {profile:?}");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod config;
mod transport;

pub use client::KlaviyoClient;
pub use config::ClientConfig;
pub use transport::{HttpTransport, ReqwestTransport};

pub use klaviyo_core::{
    Credentials, ErrorKind, HttpMethod, HttpRequest, HttpResponse, KlaviyoError, ListId,
    ListMembership, Location, ProfileAttributes, ProfileId, Properties, Result, TrackOptions,
    DEFAULT_BASE_URL, DEFAULT_REVISION, TRACK_ONCE_MARKER,
};
