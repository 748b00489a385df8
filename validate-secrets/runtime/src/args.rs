use crate::{core::Engine, AccessReviewMetrics, Admission, AdmissionMetrics, SubjectAccessReviews};
use anyhow::{bail, Result};
use clap::Parser;
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::time::Duration;
use tracing::info;

#[derive(Debug, Parser)]
#[clap(
    name = "validate-secrets",
    about = "Rejects workloads that reference secrets their creator cannot read"
)]
pub struct Args {
    #[clap(
        long,
        default_value = "validate_secrets=info,warn",
        env = "VALIDATE_SECRETS_LOG"
    )]
    log_level: kubert::LogFilter,

    #[clap(long, default_value = "plain")]
    log_format: kubert::LogFormat,

    #[clap(flatten)]
    client: kubert::ClientArgs,

    #[clap(flatten)]
    server: kubert::ServerArgs,

    #[clap(flatten)]
    admin: kubert::AdminArgs,

    /// Time limit for each SubjectAccessReview, in milliseconds.
    #[clap(long, default_value = "5000")]
    access_review_timeout_ms: u64,
}

impl Args {
    #[inline]
    pub async fn parse_and_run() -> Result<()> {
        Self::parse().run().await
    }

    pub async fn run(self) -> Result<()> {
        let Self {
            admin,
            client,
            log_level,
            log_format,
            server,
            access_review_timeout_ms,
        } = self;

        let mut prom = <Registry>::default();
        let admission_reg = prom.sub_registry_with_prefix("admission");
        let admission_metrics = AdmissionMetrics::register(admission_reg);
        let review_metrics = AccessReviewMetrics::register(admission_reg);
        let rt_metrics = kubert::RuntimeMetrics::register(prom.sub_registry_with_prefix("kube"));

        let runtime = kubert::Runtime::builder()
            .with_log(log_level, log_format)
            .with_metrics(rt_metrics)
            .with_admin(admin.into_builder().with_prometheus(prom))
            .with_client(client)
            .with_server(server)
            .build()
            .await?;

        let timeout = Duration::from_millis(access_review_timeout_ms);
        let checker = SubjectAccessReviews::new(runtime.client(), timeout, review_metrics);
        let engine = Arc::new(Engine::new(checker));
        info!(?timeout, "Validating secret access");

        let runtime = runtime.spawn_server(Admission::new(engine, admission_metrics));

        // Block the main thread on the shutdown signal. Once it fires, wait for
        // in-flight reviews to complete before exiting.
        if runtime.run().await.is_err() {
            bail!("Aborted");
        }

        Ok(())
    }
}
