use crate::{ResourceAttributes, SubjectAccessReview, SubjectAccessReviewSpec};

pub const SECRETS_RESOURCE: &str = "secrets";
pub const GET_VERB: &str = "get";

/// Builds a review asking whether `user` may `get` the secret `name` in
/// `namespace`.
///
/// Only the username is submitted; the user's group memberships are not part
/// of the review.
pub fn get_secret(user: &str, namespace: &str, name: &str) -> SubjectAccessReview {
    SubjectAccessReview {
        metadata: Default::default(),
        spec: SubjectAccessReviewSpec {
            user: Some(user.to_string()),
            resource_attributes: Some(ResourceAttributes {
                verb: Some(GET_VERB.to_string()),
                resource: Some(SECRETS_RESOURCE.to_string()),
                name: Some(name.to_string()),
                namespace: Some(namespace.to_string()),
                ..Default::default()
            }),
            ..Default::default()
        },
        status: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_secret_attributes() {
        let review = get_secret("alice", "prod", "db-creds");
        assert_eq!(review.spec.user.as_deref(), Some("alice"));
        assert!(review.spec.groups.is_none());
        assert!(review.spec.non_resource_attributes.is_none());

        let attrs = review
            .spec
            .resource_attributes
            .expect("resource attributes must be set");
        assert_eq!(attrs.verb.as_deref(), Some("get"));
        assert_eq!(attrs.resource.as_deref(), Some("secrets"));
        assert_eq!(attrs.name.as_deref(), Some("db-creds"));
        assert_eq!(attrs.namespace.as_deref(), Some("prod"));
        assert!(attrs.group.is_none());
        assert!(attrs.subresource.is_none());
    }

    #[test]
    fn get_secret_serializes_as_review() {
        let review = get_secret("bob", "dev", "token");
        let json = serde_json::to_value(&review).expect("review must serialize");
        assert_eq!(json["apiVersion"], "authorization.k8s.io/v1");
        assert_eq!(json["kind"], "SubjectAccessReview");
        assert_eq!(json["spec"]["user"], "bob");
        assert_eq!(json["spec"]["resourceAttributes"]["verb"], "get");
        assert_eq!(json["spec"]["resourceAttributes"]["resource"], "secrets");
        assert_eq!(json["spec"]["resourceAttributes"]["name"], "token");
        assert_eq!(json["spec"]["resourceAttributes"]["namespace"], "dev");
    }
}
