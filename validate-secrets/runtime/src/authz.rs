use crate::{
    core::{AccessChecker, AccessVerdict},
    k8s::{access_review, Api, Client, PostParams, SubjectAccessReview},
    metrics::AccessReviewMetrics,
};
use anyhow::{anyhow, Context, Result};
use tokio::time;
use tracing::{debug, instrument};

/// Checks secret access by creating a `SubjectAccessReview` for each query.
#[derive(Clone)]
pub struct SubjectAccessReviews {
    api: Api<SubjectAccessReview>,
    timeout: time::Duration,
    metrics: AccessReviewMetrics,
}

// === impl SubjectAccessReviews ===

impl SubjectAccessReviews {
    pub fn new(client: Client, timeout: time::Duration, metrics: AccessReviewMetrics) -> Self {
        Self {
            api: Api::all(client),
            timeout,
            metrics,
        }
    }
}

#[async_trait::async_trait]
impl AccessChecker for SubjectAccessReviews {
    #[instrument(skip(self))]
    async fn check(&self, user: &str, namespace: &str, secret: &str) -> Result<AccessVerdict> {
        let review = access_review::get_secret(user, namespace, secret);
        let verdict = time::timeout(self.timeout, self.api.create(&PostParams::default(), &review))
            .await
            .map_err(|_| anyhow!("SubjectAccessReview timed out after {:?}", self.timeout))
            .and_then(|rsp| rsp.context("failed to create SubjectAccessReview"))
            .and_then(into_verdict);
        debug!(?verdict);
        self.metrics.reviewed(&verdict);
        verdict
    }
}

fn into_verdict(review: SubjectAccessReview) -> Result<AccessVerdict> {
    let status = review
        .status
        .ok_or_else(|| anyhow!("SubjectAccessReview response missing 'status'"))?;
    if status.allowed {
        return Ok(AccessVerdict::allow());
    }

    let reason = status
        .reason
        .filter(|r| !r.is_empty())
        .or(status.evaluation_error.filter(|e| !e.is_empty()));
    Ok(AccessVerdict::deny(reason))
}
