#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod access_review;

pub use k8s_openapi::api::{
    authorization::v1::{
        ResourceAttributes, SubjectAccessReview, SubjectAccessReviewSpec, SubjectAccessReviewStatus,
    },
    core::v1::{Pod, PodSpec},
};
pub use kube::{
    api::{Api, PostParams},
    core::{admission, DynamicObject},
    Client,
};
