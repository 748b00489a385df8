#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

//! Decides whether the creator of a workload may read every secret the
//! workload references.

mod engine;
mod error;
pub mod exemption;
pub mod kind;
pub mod secrets;


pub use self::{
    engine::{Admit, AdmissionRequest, Engine, Verdict},
    error::Error,
    kind::{Decode, Kind},
};
use anyhow::Result;

/// The answer to a single access query.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AccessVerdict {
    pub allowed: bool,
    /// Why access was denied, when the authorizer says.
    pub reason: Option<String>,
}

/// Answers whether an identity may read a secret.
///
/// Implementations issue exactly one query per call and do not cache or
/// retry. A failure to obtain an answer is returned as an error and is never
/// interpreted as either an allow or a deny.
#[async_trait::async_trait]
pub trait AccessChecker {
    async fn check(&self, user: &str, namespace: &str, secret: &str) -> Result<AccessVerdict>;
}

// === impl AccessVerdict ===

impl AccessVerdict {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    pub fn deny(reason: Option<String>) -> Self {
        Self {
            allowed: false,
            reason,
        }
    }
}
