use crate::{
    core::{AccessChecker, AdmissionRequest, Engine, Kind, Verdict},
    k8s::{admission, DynamicObject},
    metrics::AdmissionMetrics,
};
use futures::future;
use http_body_util::BodyExt;
use hyper::{http, Request, Response};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, trace, warn};

/// The path the webhook configuration points at.
pub const VALIDATE_PATH: &str = "/validate";

/// Serves validating admission reviews for workloads.
pub struct Admission<C> {
    engine: Arc<Engine<C>>,
    metrics: AdmissionMetrics,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read request body: {0}")]
    Request(#[from] hyper::Error),

    #[error("failed to encode json response: {0}")]
    Json(#[from] serde_json::Error),
}

type Review = admission::AdmissionReview<DynamicObject>;
type KubeAdmissionRequest = admission::AdmissionRequest<DynamicObject>;
type AdmissionResponse = admission::AdmissionResponse;

type Body = http_body_util::Full<bytes::Bytes>;

// === impl Admission ===

impl<C> Clone for Admission<C> {
    fn clone(&self) -> Self {
        Self {
            engine: self.engine.clone(),
            metrics: self.metrics.clone(),
        }
    }
}

impl<C> tower::Service<Request<hyper::body::Incoming>> for Admission<C>
where
    C: AccessChecker + Send + Sync + 'static,
{
    type Response = Response<Body>;
    type Error = Error;
    type Future = future::BoxFuture<'static, Result<Response<Body>, Error>>;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<std::result::Result<(), Self::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<hyper::body::Incoming>) -> Self::Future {
        trace!(?req);
        if !is_review(&req) {
            return Box::pin(future::ok(
                Response::builder()
                    .status(http::StatusCode::NOT_FOUND)
                    .body(Body::default())
                    .expect("not found response must be valid"),
            ));
        }

        let admission = self.clone();
        Box::pin(async move {
            let bytes = req.into_body().collect().await?.to_bytes();
            admission.review(bytes).await
        })
    }
}

impl<C> Admission<C>
where
    C: AccessChecker + Send + Sync + 'static,
{
    pub fn new(engine: Arc<Engine<C>>, metrics: AdmissionMetrics) -> Self {
        Self { engine, metrics }
    }

    async fn review(self, bytes: bytes::Bytes) -> Result<Response<Body>, Error> {
        let (review, object) = match parse_review(&bytes) {
            Ok(parsed) => parsed,
            Err(error) => {
                warn!(%error, "Failed to parse request body");
                self.metrics.invalid();
                return json_response(AdmissionResponse::invalid(error).into_review());
            }
        };
        trace!(?review);

        let rsp = match review.try_into() {
            Ok(req) => {
                debug!(?req);
                self.admit(req, object).await
            }
            Err(error) => {
                warn!(%error, "Invalid admission request");
                self.metrics.invalid();
                AdmissionResponse::invalid(error)
            }
        };
        debug!(?rsp);
        json_response(rsp.into_review())
    }

    async fn admit(
        &self,
        req: KubeAdmissionRequest,
        object: Option<Vec<u8>>,
    ) -> AdmissionResponse {
        let rsp = AdmissionResponse::from(&req);
        let req = engine_request(req, object);

        let result = self.engine.evaluate(&req).await;
        self.metrics.decided(&result);
        if let Err(error) = &result {
            debug!(%error, uid = %req.uid, user = %req.user, kind = %req.kind, "Denied");
        }

        let Verdict {
            allowed, message, ..
        } = Verdict::from_result(req.uid, &result);
        if allowed {
            rsp
        } else {
            rsp.deny(message)
        }
    }
}

fn is_review<B>(req: &Request<B>) -> bool {
    req.method() == http::Method::POST && req.uri().path() == VALIDATE_PATH
}

/// Decodes the review envelope. The request's objects are taken out before
/// decoding so that a payload of any shape still yields a request with a uid;
/// `object` is returned as raw JSON for the engine to decode by kind.
fn parse_review(bytes: &[u8]) -> serde_json::Result<(Review, Option<Vec<u8>>)> {
    let mut value = serde_json::from_slice::<serde_json::Value>(bytes)?;
    let object = match value.get_mut("request").and_then(|r| r.as_object_mut()) {
        Some(request) => {
            request.remove("oldObject");
            request.remove("object")
        }
        None => None,
    };
    let object = object
        .filter(|o| !o.is_null())
        .map(|o| serde_json::to_vec(&o))
        .transpose()?;
    let review = serde_json::from_value(value)?;
    Ok((review, object))
}

fn engine_request(req: KubeAdmissionRequest, object: Option<Vec<u8>>) -> AdmissionRequest {
    AdmissionRequest {
        uid: req.uid,
        user: req.user_info.username.unwrap_or_default(),
        namespace: req.namespace.unwrap_or_default(),
        kind: Kind::new(req.kind.group, req.kind.version, req.kind.kind),
        object,
    }
}

fn json_response(rsp: admission::AdmissionReview<DynamicObject>) -> Result<Response<Body>, Error> {
    let bytes = serde_json::to_vec(&rsp)?;
    Ok(Response::builder()
        .status(http::StatusCode::OK)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(Body::from(bytes))
        .expect("admission review response must be valid"))
}
