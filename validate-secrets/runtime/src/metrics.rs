use crate::core::{AccessVerdict, Admit, Error};
use prometheus_client::{
    encoding::EncodeLabelSet,
    metrics::{counter::Counter, family::Family},
    registry::Registry,
};

#[derive(Clone, Debug)]
pub struct AdmissionMetrics {
    decisions: Family<ResultLabels, Counter>,
}

#[derive(Clone, Debug)]
pub struct AccessReviewMetrics {
    reviews: Family<ResultLabels, Counter>,
}

#[derive(Clone, Hash, PartialEq, Eq, EncodeLabelSet, Debug)]
struct ResultLabels {
    result: &'static str,
}

// === impl AdmissionMetrics ===

impl AdmissionMetrics {
    pub fn register(reg: &mut Registry) -> Self {
        let decisions = Family::<ResultLabels, Counter>::default();
        reg.register(
            "decisions",
            "Total number of admission reviews answered, by result",
            decisions.clone(),
        );
        Self { decisions }
    }

    pub(crate) fn decided(&self, result: &Result<Admit, Error>) {
        let result = match result {
            Ok(admit) => admit.label(),
            Err(error) => error.label(),
        };
        self.inc(result);
    }

    /// Records a review that could not be decoded into a request.
    pub(crate) fn invalid(&self) {
        self.inc("invalid");
    }

    fn inc(&self, result: &'static str) {
        self.decisions.get_or_create(&ResultLabels { result }).inc();
    }
}

// === impl AccessReviewMetrics ===

impl AccessReviewMetrics {
    pub fn register(reg: &mut Registry) -> Self {
        let reviews = Family::<ResultLabels, Counter>::default();
        reg.register(
            "access_reviews",
            "Total number of SubjectAccessReviews issued for referenced secrets, by result",
            reviews.clone(),
        );
        Self { reviews }
    }

    pub(crate) fn reviewed(&self, result: &anyhow::Result<AccessVerdict>) {
        let result = match result {
            Ok(AccessVerdict { allowed: true, .. }) => "allowed",
            Ok(AccessVerdict { allowed: false, .. }) => "denied",
            Err(_) => "error",
        };
        self.reviews.get_or_create(&ResultLabels { result }).inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(reg: &Registry) -> String {
        let mut buf = String::new();
        prometheus_client::encoding::text::encode(&mut buf, reg).expect("metrics must encode");
        buf
    }

    #[test]
    fn decisions_by_result() {
        let mut prom = Registry::default();
        let metrics = AdmissionMetrics::register(prom.sub_registry_with_prefix("admission"));

        metrics.decided(&Ok(Admit::Exempt));
        metrics.decided(&Ok(Admit::Authorized { secrets: 2 }));
        metrics.decided(&Ok(Admit::Authorized { secrets: 1 }));
        metrics.decided(&Err(Error::MissingObject));
        metrics.invalid();

        let text = encode(&prom);
        assert!(text.contains(r#"admission_decisions_total{result="exempt"} 1"#), "{text}");
        assert!(text.contains(r#"admission_decisions_total{result="allowed"} 2"#), "{text}");
        assert!(text.contains(r#"admission_decisions_total{result="malformed"} 1"#), "{text}");
        assert!(text.contains(r#"admission_decisions_total{result="invalid"} 1"#), "{text}");
        assert!(!text.contains(r#"result="denied""#), "{text}");
    }

    #[test]
    fn access_reviews_by_result() {
        let mut prom = Registry::default();
        let metrics = AccessReviewMetrics::register(prom.sub_registry_with_prefix("admission"));

        metrics.reviewed(&Ok(AccessVerdict::allow()));
        metrics.reviewed(&Ok(AccessVerdict::deny(None)));
        metrics.reviewed(&Ok(AccessVerdict::deny(Some("nope".to_string()))));
        metrics.reviewed(&Err(anyhow::anyhow!("timed out")));

        let text = encode(&prom);
        assert!(text.contains(r#"admission_access_reviews_total{result="allowed"} 1"#), "{text}");
        assert!(text.contains(r#"admission_access_reviews_total{result="denied"} 2"#), "{text}");
        assert!(text.contains(r#"admission_access_reviews_total{result="error"} 1"#), "{text}");
    }
}
