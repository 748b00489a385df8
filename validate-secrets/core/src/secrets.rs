use validate_secrets_k8s_api::PodSpec;

/// Lists the names of all secrets a pod spec reads.
///
/// Volumes come first, followed by each container's `envFrom` and then `env`
/// references, in declaration order. Names are not deduplicated.
pub fn referenced(spec: &PodSpec) -> Vec<String> {
    let volumes = spec
        .volumes
        .iter()
        .flatten()
        .filter_map(|vol| vol.secret.as_ref())
        .map(|secret| secret.secret_name.clone().unwrap_or_default());

    let containers = spec.containers.iter().flat_map(|container| {
        let env_from = container
            .env_from
            .iter()
            .flatten()
            .filter_map(|env| env.secret_ref.as_ref())
            .map(|secret| secret.name.clone());

        let env = container
            .env
            .iter()
            .flatten()
            .filter_map(|env| env.value_from.as_ref()?.secret_key_ref.as_ref())
            .map(|key| key.name.clone());

        env_from.chain(env)
    });

    volumes.chain(containers).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spec(value: serde_json::Value) -> PodSpec {
        serde_json::from_value(value).expect("pod spec must be valid")
    }

    #[test]
    fn empty_spec() {
        assert!(referenced(&PodSpec::default()).is_empty());
    }

    #[test]
    fn volumes_without_secrets() {
        let spec = spec(json!({
            "containers": [{ "name": "app" }],
            "volumes": [
                { "name": "cache", "emptyDir": {} },
                { "name": "cfg", "configMap": { "name": "app-config" } },
            ],
        }));
        assert!(referenced(&spec).is_empty());
    }

    #[test]
    fn volume_secrets() {
        let spec = spec(json!({
            "containers": [{ "name": "app" }],
            "volumes": [
                { "name": "a", "secret": { "secretName": "db-creds" } },
                { "name": "b", "emptyDir": {} },
                { "name": "c", "secret": { "secretName": "tls" } },
            ],
        }));
        assert_eq!(referenced(&spec), vec!["db-creds", "tls"]);
    }

    #[test]
    fn env_from_secrets() {
        let spec = spec(json!({
            "containers": [{
                "name": "app",
                "envFrom": [
                    { "configMapRef": { "name": "settings" } },
                    { "secretRef": { "name": "api-keys" } },
                ],
            }],
        }));
        assert_eq!(referenced(&spec), vec!["api-keys"]);
    }

    #[test]
    fn env_secret_key_refs() {
        let spec = spec(json!({
            "containers": [{
                "name": "app",
                "env": [
                    { "name": "PLAIN", "value": "1" },
                    { "name": "POD", "valueFrom": { "fieldRef": { "fieldPath": "metadata.name" } } },
                    { "name": "PASSWORD", "valueFrom": { "secretKeyRef": { "name": "db-creds", "key": "password" } } },
                ],
            }],
        }));
        assert_eq!(referenced(&spec), vec!["db-creds"]);
    }

    #[test]
    fn ordering_and_duplicates() {
        let spec = spec(json!({
            "containers": [
                {
                    "name": "first",
                    "env": [
                        { "name": "A", "valueFrom": { "secretKeyRef": { "name": "s3", "key": "a" } } },
                    ],
                    "envFrom": [
                        { "secretRef": { "name": "s2" } },
                    ],
                },
                {
                    "name": "second",
                    "envFrom": [
                        { "secretRef": { "name": "s1" } },
                    ],
                    "env": [
                        { "name": "B", "valueFrom": { "secretKeyRef": { "name": "s4", "key": "b" } } },
                    ],
                },
            ],
            "volumes": [
                { "name": "v", "secret": { "secretName": "s1" } },
            ],
        }));
        assert_eq!(referenced(&spec), vec!["s1", "s2", "s3", "s1", "s4"]);
    }

    #[test]
    fn init_containers_are_not_inspected() {
        let spec = spec(json!({
            "containers": [{ "name": "app" }],
            "initContainers": [{
                "name": "init",
                "envFrom": [{ "secretRef": { "name": "hidden" } }],
            }],
        }));
        assert!(referenced(&spec).is_empty());
    }
}
