//! JSON:API envelope types shared by every request body.

use serde::Serialize;

/// Top-level `{"data": ...}` wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document<T> {
    /// Primary data.
    pub data: T,
}

impl<T> Document<T> {
    /// Wrap primary data.
    pub const fn new(data: T) -> Self {
        Self { data }
    }
}

/// A resource object with a type tag, optional id, attributes and relationships.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resource<A, R = ()> {
    /// Resource type, e.g. `"event"` or `"profile"`.
    #[serde(rename = "type")]
    pub resource_type: &'static str,
    /// Resource id, present on updates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Resource attributes.
    pub attributes: A,
    /// Related resources.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relationships: Option<R>,
}

impl<A> Resource<A> {
    /// A resource without id or relationships.
    pub const fn new(resource_type: &'static str, attributes: A) -> Self {
        Self {
            resource_type,
            id: None,
            attributes,
            relationships: None,
        }
    }

    /// A resource addressed by id.
    pub fn with_id(resource_type: &'static str, id: impl Into<String>, attributes: A) -> Self {
        Self {
            resource_type,
            id: Some(id.into()),
            attributes,
            relationships: None,
        }
    }
}

/// A `{"type": ..., "id": ...}` pointer used inside relationships.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceRef {
    /// Resource type.
    #[serde(rename = "type")]
    pub resource_type: &'static str,
    /// Resource id.
    pub id: String,
}
