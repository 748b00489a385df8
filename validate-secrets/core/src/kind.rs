use validate_secrets_k8s_api::{Pod, PodSpec};

/// Decodes a raw workload object into the pod-shaped spec it runs.
pub type Decode = fn(&[u8]) -> serde_json::Result<PodSpec>;

#[derive(Clone, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Kind {
    pub group: String,
    pub version: String,
    pub kind: String,
}

// === impl Kind ===

impl Kind {
    pub fn new(
        group: impl Into<String>,
        version: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
            kind: kind.into(),
        }
    }

    /// The core `v1` Pod.
    pub fn pod() -> Self {
        Self::new("", "v1", "Pod")
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.group.is_empty() {
            write!(f, "{}/{}", self.version, self.kind)
        } else {
            write!(f, "{}/{}/{}", self.group, self.version, self.kind)
        }
    }
}

pub fn decode_pod(raw: &[u8]) -> serde_json::Result<PodSpec> {
    let pod: Pod = serde_json::from_slice(raw)?;
    Ok(pod.spec.unwrap_or_default())
}
