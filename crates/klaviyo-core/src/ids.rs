//! Identifier types for Klaviyo resources.
//!
//! Klaviyo identifiers are opaque strings. The `string_id_type!` macro wraps
//! them in newtypes so a list id cannot be passed where a profile id is
//! expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to define a string-backed identifier type with standard trait implementations.
macro_rules! string_id_type {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Return the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id_type!(ProfileId, "A Klaviyo profile identifier.");
string_id_type!(ListId, "A Klaviyo list identifier.");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_debug() {
        let id = ProfileId::new("01HXYZ");
        assert_eq!(id.to_string(), "01HXYZ");
        assert_eq!(format!("{id:?}"), "ProfileId(01HXYZ)");
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = ListId::from("Y6nRLr");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""Y6nRLr""#);
        let back: ListId = serde_json::from_str(r#""Y6nRLr""#).unwrap();
        assert_eq!(back, id);
    }
}
