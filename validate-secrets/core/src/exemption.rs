/// Service accounts of the built-in workload controllers. These create pods
/// on behalf of users whose access was already checked when the owning
/// workload was admitted.
pub const CONTROLLER_USERS: [&str; 7] = [
    "system:serviceaccount:kube-system:cronjob-controller",
    "system:serviceaccount:kube-system:daemon-set-controller",
    "system:serviceaccount:kube-system:deployment-controller",
    "system:serviceaccount:kube-system:job-controller",
    "system:serviceaccount:kube-system:replicaset-controller",
    "system:serviceaccount:kube-system:replication-controller",
    "system:serviceaccount:kube-system:statefulset-controller",
];

/// Returns true if `user` is exactly one of the [`CONTROLLER_USERS`].
pub fn is_exempt(user: &str) -> bool {
    CONTROLLER_USERS.contains(&user)
}
