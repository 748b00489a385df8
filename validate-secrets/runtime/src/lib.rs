#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

pub use validate_secrets_core as core;
pub use validate_secrets_k8s_api as k8s;

mod admission;
mod args;
mod authz;
mod metrics;

pub use self::{
    admission::Admission,
    args::Args,
    authz::SubjectAccessReviews,
    metrics::{AccessReviewMetrics, AdmissionMetrics},
};
