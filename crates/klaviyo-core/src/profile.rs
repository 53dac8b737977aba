//! Profile payloads: identify (profile import) and partial update.

use serde::{Deserialize, Serialize};

use crate::document::{Document, Resource};
use crate::error::{KlaviyoError, Result};
use crate::ids::ProfileId;
use crate::Properties;

/// Standard attributes of a profile being identified.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileAttributes {
    /// Email of the profile (required).
    pub email: String,
    /// First name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Last name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Postal location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl ProfileAttributes {
    /// Attributes for the given email.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Self::default()
        }
    }

    /// Set the first name.
    #[must_use]
    pub fn with_first_name(mut self, name: impl Into<String>) -> Self {
        self.first_name = Some(name.into());
        self
    }

    /// Set the last name.
    #[must_use]
    pub fn with_last_name(mut self, name: impl Into<String>) -> Self {
        self.last_name = Some(name.into());
        self
    }

    /// Set the location.
    #[must_use]
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }
}

/// Location fields accepted on a profile. All optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Street address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address1: Option<String>,
    /// Apartment, suite, etc.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,
    /// City.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// Country.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// State or province.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Postal code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<String>,
    /// IANA timezone name, e.g. `America/New_York`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    /// Latitude.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    /// Longitude.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

/// Attributes of a profile-import resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileImportAttributes {
    /// Standard attributes.
    #[serde(flatten)]
    pub base: ProfileAttributes,
    /// Custom properties.
    pub properties: Properties,
}

/// Body of `POST /api/profile-import`.
pub type ProfileImportPayload = Document<Resource<ProfileImportAttributes>>;

/// Body of `PATCH /api/profiles/{id}`.
pub type ProfileUpdatePayload = Document<Resource<Properties>>;

/// Build the identify body.
///
/// # Errors
///
/// Returns a validation error if the email is empty.
pub fn profile_import_payload(
    attributes: &ProfileAttributes,
    custom_properties: &Properties,
) -> Result<ProfileImportPayload> {
    if attributes.email.is_empty() {
        return Err(KlaviyoError::validation(
            "You must identify a user by email",
        ));
    }

    Ok(Document::new(Resource::new(
        "profile",
        ProfileImportAttributes {
            base: attributes.clone(),
            properties: custom_properties.clone(),
        },
    )))
}

/// Build a partial-update body whose attributes are exactly `properties`.
#[must_use]
pub fn profile_update_payload(id: &ProfileId, properties: &Properties) -> ProfileUpdatePayload {
    Document::new(Resource::with_id("profile", id.as_str(), properties.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn identify_requires_email() {
        let err = profile_import_payload(&ProfileAttributes::default(), &Properties::new())
            .unwrap_err();
        assert!(matches!(err, KlaviyoError::Validation { .. }));
    }

    #[test]
    fn identify_body_flattens_attributes() {
        let attributes = ProfileAttributes::new("ann@example.com")
            .with_first_name("Ann")
            .with_location(Location {
                city: Some("Boston".into()),
                ..Location::default()
            });
        let mut custom = Properties::new();
        custom.insert("plan".into(), json!("pro"));

        let body =
            serde_json::to_value(profile_import_payload(&attributes, &custom).unwrap()).unwrap();
        assert_eq!(
            body,
            json!({
                "data": {
                    "type": "profile",
                    "attributes": {
                        "email": "ann@example.com",
                        "first_name": "Ann",
                        "location": {"city": "Boston"},
                        "properties": {"plan": "pro"}
                    }
                }
            })
        );
    }

    #[test]
    fn update_body_uses_properties_verbatim() {
        let mut properties = Properties::new();
        properties.insert("first_name".into(), json!("Ann"));

        let body = serde_json::to_value(profile_update_payload(&ProfileId::new("123"), &properties))
            .unwrap();
        assert_eq!(body["data"]["id"], json!("123"));
        assert_eq!(body["data"]["type"], json!("profile"));
        assert_eq!(body["data"]["attributes"], json!({"first_name": "Ann"}));
    }
}
