//! List membership payloads.

use serde::Serialize;

use crate::document::{Document, Resource, ResourceRef};
use crate::ids::ListId;

/// One profile subscribed to one list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListMembership {
    /// Email of the profile.
    pub email: String,
    /// Target list.
    pub list_id: ListId,
}

/// Profile entry inside a subscription job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriberAttributes {
    /// Email of the profile.
    pub email: String,
}

/// Attributes of a subscription bulk-create job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionJobAttributes {
    /// Profiles to subscribe.
    pub profiles: Document<Vec<Resource<SubscriberAttributes>>>,
}

/// Relationships of a subscription bulk-create job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionJobRelationships {
    /// The list being subscribed to.
    pub list: Document<ResourceRef>,
}

/// Body of `POST /api/profile-subscription-bulk-create-jobs/`.
pub type SubscriptionJobPayload =
    Document<Resource<SubscriptionJobAttributes, SubscriptionJobRelationships>>;

impl ListMembership {
    /// Create a membership.
    pub fn new(email: impl Into<String>, list_id: impl Into<ListId>) -> Self {
        Self {
            email: email.into(),
            list_id: list_id.into(),
        }
    }

    /// Build the bulk-subscription job body for this single membership.
    #[must_use]
    pub fn to_payload(&self) -> SubscriptionJobPayload {
        let profile = Resource::new(
            "profile",
            SubscriberAttributes {
                email: self.email.clone(),
            },
        );

        Document::new(Resource {
            resource_type: "profile-subscription-bulk-create-job",
            id: None,
            attributes: SubscriptionJobAttributes {
                profiles: Document::new(vec![profile]),
            },
            relationships: Some(SubscriptionJobRelationships {
                list: Document::new(ResourceRef {
                    resource_type: "list",
                    id: self.list_id.to_string(),
                }),
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builds_subscription_job() {
        let body = serde_json::to_value(ListMembership::new("a@b.com", "L1").to_payload()).unwrap();
        assert_eq!(
            body,
            json!({
                "data": {
                    "type": "profile-subscription-bulk-create-job",
                    "attributes": {
                        "profiles": {"data": [
                            {"type": "profile", "attributes": {"email": "a@b.com"}}
                        ]}
                    },
                    "relationships": {
                        "list": {"data": {"type": "list", "id": "L1"}}
                    }
                }
            })
        );
    }
}
