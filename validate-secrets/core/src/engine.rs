use crate::{
    exemption,
    kind::{self, Decode, Kind},
    secrets, AccessChecker, Error,
};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// A request to admit a workload, as seen by the engine.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AdmissionRequest {
    /// Echoed back on the verdict.
    pub uid: String,
    pub user: String,
    pub namespace: String,
    pub kind: Kind,
    /// The raw JSON of the object being admitted.
    pub object: Option<Vec<u8>>,
}

/// Why a workload was admitted.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Admit {
    /// The requesting user is a trusted controller.
    Exempt,
    /// The workload reads no secrets.
    NoSecrets,
    /// The user may read every referenced secret.
    Authorized { secrets: usize },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Verdict {
    pub uid: String,
    pub allowed: bool,
    /// Empty when allowed.
    pub message: String,
}

/// Admits workloads whose creator may read every secret they reference.
#[derive(Debug)]
pub struct Engine<C> {
    checker: C,
    decoders: BTreeMap<Kind, Decode>,
}

// === impl Engine ===

impl<C: AccessChecker> Engine<C> {
    /// Returns an engine that understands pods.
    pub fn new(checker: C) -> Self {
        Self {
            checker,
            decoders: BTreeMap::new(),
        }
        .with_decoder(Kind::pod(), kind::decode_pod)
    }

    /// Registers a decoder for an additional workload kind.
    pub fn with_decoder(mut self, kind: Kind, decode: Decode) -> Self {
        self.decoders.insert(kind, decode);
        self
    }

    pub fn checker(&self) -> &C {
        &self.checker
    }

    /// Decides a request. Every failure becomes a denial that carries the
    /// request's uid.
    pub async fn decide(&self, req: &AdmissionRequest) -> Verdict {
        let result = self.evaluate(req).await;
        Verdict::from_result(req.uid.clone(), &result)
    }

    pub async fn evaluate(&self, req: &AdmissionRequest) -> Result<Admit, Error> {
        if exemption::is_exempt(&req.user) {
            debug!(user = %req.user, "Controller user is exempt");
            return Ok(Admit::Exempt);
        }

        let decode = self
            .decoders
            .get(&req.kind)
            .ok_or_else(|| Error::UnsupportedKind(req.kind.clone()))?;
        let raw = req.object.as_deref().ok_or(Error::MissingObject)?;
        let spec = decode(raw).map_err(|source| Error::MalformedPayload {
            kind: req.kind.clone(),
            source,
        })?;

        let secrets = secrets::referenced(&spec);
        if secrets.is_empty() {
            debug!(kind = %req.kind, "No secrets referenced");
            return Ok(Admit::NoSecrets);
        }
        debug!(?secrets, "Checking secret access");

        for secret in &secrets {
            let verdict = self
                .checker
                .check(&req.user, &req.namespace, secret)
                .await
                .map_err(|error| {
                    warn!(
                        error = %format_args!("{error:#}"),
                        %secret,
                        namespace = %req.namespace,
                        "Failed to check access"
                    );
                    Error::AccessCheck {
                        secret: secret.clone(),
                        error,
                    }
                })?;

            if !verdict.allowed {
                info!(
                    user = %req.user,
                    namespace = %req.namespace,
                    %secret,
                    reason = verdict.reason.as_deref().unwrap_or_default(),
                    "Secret access denied"
                );
                return Err(Error::AccessDenied {
                    user: req.user.clone(),
                    secret: secret.clone(),
                    namespace: req.namespace.clone(),
                    reason: verdict.reason,
                });
            }
        }

        Ok(Admit::Authorized {
            secrets: secrets.len(),
        })
    }
}

// === impl Admit ===

impl Admit {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Exempt => "exempt",
            Self::NoSecrets => "no_secrets",
            Self::Authorized { .. } => "allowed",
        }
    }
}

// === impl Verdict ===

impl Verdict {
    pub fn allow(uid: String) -> Self {
        Self {
            uid,
            allowed: true,
            message: String::new(),
        }
    }

    pub fn deny(uid: String, message: impl ToString) -> Self {
        Self {
            uid,
            allowed: false,
            message: message.to_string(),
        }
    }

    pub fn from_result(uid: String, result: &Result<Admit, Error>) -> Self {
        match result {
            Ok(_) => Self::allow(uid),
            Err(error) => Self::deny(uid, error),
        }
    }
}
