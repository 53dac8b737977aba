//! Event tracking payloads.
//!
//! [`TrackOptions`] replaces the loose keyword options of a track call with
//! named fields and fixed defaults. [`event_payload`] validates the subject
//! identity and builds the `POST /api/events` body.

use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::Value;

use crate::document::{Document, Resource};
use crate::error::{KlaviyoError, Result};
use crate::Properties;

/// Property flag asking Klaviyo to record an event at most once per profile.
pub const TRACK_ONCE_MARKER: &str = "__track_once__";

/// Wire format for event timestamps (local wall-clock time, no offset).
pub const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Currency reported alongside an event's `value` unless overridden.
pub const DEFAULT_VALUE_CURRENCY: &str = "USD";

/// Options for a track call.
///
/// Either `email` or `id` must be non-empty. Both are copied into the
/// profile attributes of the event; the caller's `customer_properties`
/// are left untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackOptions {
    /// Profile id of the subject.
    pub id: Option<String>,
    /// Email of the subject.
    pub email: Option<String>,
    /// Event properties (default empty). A `"value"` entry becomes the event value.
    pub properties: Properties,
    /// Profile attributes sent with the event (default empty).
    pub customer_properties: Properties,
    /// When the event happened; omitted means "now" on Klaviyo's side.
    pub time: Option<NaiveDateTime>,
    /// Currency of the event value (default `"USD"`).
    pub value_currency: String,
}

impl Default for TrackOptions {
    fn default() -> Self {
        Self {
            id: None,
            email: None,
            properties: Properties::new(),
            customer_properties: Properties::new(),
            time: None,
            value_currency: DEFAULT_VALUE_CURRENCY.to_string(),
        }
    }
}

impl TrackOptions {
    /// Options identifying the subject by email.
    #[must_use]
    pub fn for_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Self::default()
        }
    }

    /// Options identifying the subject by profile id.
    #[must_use]
    pub fn for_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Set the email.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Set the profile id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Add one event property.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Replace the event properties.
    #[must_use]
    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    /// Add one customer property.
    #[must_use]
    pub fn with_customer_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.customer_properties.insert(key.into(), value.into());
        self
    }

    /// Replace the customer properties.
    #[must_use]
    pub fn with_customer_properties(mut self, properties: Properties) -> Self {
        self.customer_properties = properties;
        self
    }

    /// Set the event time.
    #[must_use]
    pub fn at(mut self, time: NaiveDateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Set the value currency.
    #[must_use]
    pub fn with_value_currency(mut self, currency: impl Into<String>) -> Self {
        self.value_currency = currency.into();
        self
    }

    /// Mark the event as track-once.
    #[must_use]
    pub fn once(self) -> Self {
        self.with_property(TRACK_ONCE_MARKER, true)
    }

    /// Non-empty email, if any.
    #[must_use]
    pub fn subject_email(&self) -> Option<&str> {
        non_empty(self.email.as_deref())
    }

    /// Non-empty profile id, if any.
    #[must_use]
    pub fn subject_id(&self) -> Option<&str> {
        non_empty(self.id.as_deref())
    }

    /// Check that the event resolves to a subject.
    ///
    /// # Errors
    ///
    /// Returns a validation error if both email and id are empty or absent.
    pub fn validate(&self) -> Result<()> {
        if self.subject_email().is_none() && self.subject_id().is_none() {
            return Err(KlaviyoError::validation(
                "You must identify a user by email or ID",
            ));
        }
        Ok(())
    }

    /// The event value: `properties["value"]`, or `0` when absent, null or `false`.
    #[must_use]
    pub fn value(&self) -> Value {
        self.properties
            .get("value")
            .filter(|v| !matches!(v, Value::Null | Value::Bool(false)))
            .cloned()
            .unwrap_or_else(|| Value::from(0))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Return a copy of `customer_properties` with the subject identity added.
///
/// Empty identity values are skipped.
#[must_use]
pub fn merge_identity(
    customer_properties: &Properties,
    email: Option<&str>,
    id: Option<&str>,
) -> Properties {
    let mut merged = customer_properties.clone();
    if let Some(email) = non_empty(email) {
        merged.insert("email".to_string(), Value::from(email));
    }
    if let Some(id) = non_empty(id) {
        merged.insert("id".to_string(), Value::from(id));
    }
    merged
}

/// Metric attributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricAttributes {
    /// Metric (event) name.
    pub name: String,
}

/// Attributes of an event resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventAttributes {
    /// Event properties.
    pub properties: Properties,
    /// Formatted event time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// Event value.
    pub value: Value,
    /// Currency of `value`.
    pub value_currency: String,
    /// The metric this event belongs to.
    pub metric: Document<Resource<MetricAttributes>>,
    /// The profile this event belongs to.
    pub profile: Document<Resource<Properties>>,
}

/// Body of `POST /api/events`.
pub type EventPayload = Document<Resource<EventAttributes>>;

/// Build the event body for `event`.
///
/// # Errors
///
/// Returns a validation error if the options carry no subject identity.
pub fn event_payload(event: &str, options: &TrackOptions) -> Result<EventPayload> {
    options.validate()?;

    let profile = merge_identity(
        &options.customer_properties,
        options.subject_email(),
        options.subject_id(),
    );

    let attributes = EventAttributes {
        properties: options.properties.clone(),
        time: options.time.map(|t| t.format(TIME_FORMAT).to_string()),
        value: options.value(),
        value_currency: options.value_currency.clone(),
        metric: Document::new(Resource::new(
            "metric",
            MetricAttributes {
                name: event.to_string(),
            },
        )),
        profile: Document::new(Resource::new("profile", profile)),
    };

    Ok(Document::new(Resource::new("event", attributes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn rejects_missing_identity() {
        let err = event_payload("Signed Up", &TrackOptions::default()).unwrap_err();
        assert!(matches!(err, KlaviyoError::Validation { .. }));

        let blank = TrackOptions::default().with_email("").with_id("");
        assert!(event_payload("Signed Up", &blank).is_err());
    }

    #[test]
    fn id_alone_is_enough() {
        assert!(event_payload("Signed Up", &TrackOptions::for_id("42")).is_ok());
    }

    #[test]
    fn builds_full_body() {
        let time = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 30, 5)
            .unwrap();
        let options = TrackOptions::for_email("ann@example.com")
            .with_id("42")
            .with_property("value", 19.99)
            .with_property("sku", "A-1")
            .with_customer_property("plan", "pro")
            .at(time);

        let body = serde_json::to_value(event_payload("Placed Order", &options).unwrap()).unwrap();
        assert_eq!(
            body,
            json!({
                "data": {
                    "type": "event",
                    "attributes": {
                        "properties": {"value": 19.99, "sku": "A-1"},
                        "time": "2024-03-01T09:30:05",
                        "value": 19.99,
                        "value_currency": "USD",
                        "metric": {"data": {
                            "type": "metric",
                            "attributes": {"name": "Placed Order"}
                        }},
                        "profile": {"data": {"type": "profile", "attributes": {
                            "plan": "pro",
                            "email": "ann@example.com",
                            "id": "42"
                        }}}
                    }
                }
            })
        );
    }

    #[test]
    fn value_defaults_to_zero() {
        let options = TrackOptions::for_email("a@b.com");
        assert_eq!(options.value(), json!(0));

        let options = options.with_property("value", Value::Null);
        assert_eq!(options.value(), json!(0));

        let options = options.with_property("value", false);
        assert_eq!(options.value(), json!(0));

        let options = options.with_property("value", 0.5);
        assert_eq!(options.value(), json!(0.5));
    }

    #[test]
    fn time_is_omitted_when_absent() {
        let payload = event_payload("Viewed", &TrackOptions::for_email("a@b.com")).unwrap();
        let body = serde_json::to_value(payload).unwrap();
        assert!(body["data"]["attributes"].get("time").is_none());
    }

    #[test]
    fn merge_identity_leaves_input_untouched() {
        let mut original = Properties::new();
        original.insert("plan".into(), json!("pro"));

        let merged = merge_identity(&original, Some("a@b.com"), Some(""));
        assert_eq!(original.len(), 1);
        assert_eq!(merged.get("email"), Some(&json!("a@b.com")));
        assert!(merged.get("id").is_none());
    }

    #[test]
    fn once_sets_marker() {
        let options = TrackOptions::for_email("a@b.com").once();
        assert_eq!(options.properties.get(TRACK_ONCE_MARKER), Some(&json!(true)));
    }
}
