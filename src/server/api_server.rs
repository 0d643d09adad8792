use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use warp::{Filter, Rejection, Reply};
use crate::config::constants::{API_PREFIX, API_VERSION, MULTIPART_OVERHEAD_BYTES};
use crate::errors::{SpectraceError, SpectraceResult};
use crate::server::handlers::{
    analyze_handler, compare_code_handler, compare_specs_handler, decompile_handler, handle_rejection,
    health_handler, index_handler, validate_compliance_handler,
};
use crate::services::pipeline_coordinator::PipelineCoordinator;

pub struct ApiServer {
    coordinator: Arc<PipelineCoordinator>,
}

impl ApiServer {
    pub fn new(coordinator: Arc<PipelineCoordinator>) -> Self {
        Self { coordinator }
    }

    pub async fn run<S>(self, addr: SocketAddr, shutdown: S) -> SpectraceResult<()>
    where
        S: Future<Output = ()> + Send + 'static,
    {
        let (bound, server) = warp::serve(routes(self.coordinator))
            .try_bind_with_graceful_shutdown(addr, shutdown)
            .map_err(|e| {
                SpectraceError::config_error(&format!("Cannot bind {}: {}", addr, e), Some("server.port"), None)
            })?;

        log::info!("🌐 Spectrace API listening on http://{}", bound);
        server.await;
        log::info!("✅ Spectrace API shut down");
        Ok(())
    }
}

pub fn routes(
    coordinator: Arc<PipelineCoordinator>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let payload_limit = coordinator.max_payload_bytes();
    let upload_limit = payload_limit.saturating_add(MULTIPART_OVERHEAD_BYTES);
    let pipeline_limit = payload_limit.saturating_mul(2).saturating_add(MULTIPART_OVERHEAD_BYTES);
    let coordinator_filter = warp::any().map(move || Arc::clone(&coordinator));
    let api = warp::path(API_PREFIX).and(warp::path(API_VERSION));

    let index = warp::path::end().and(warp::get()).and_then(index_handler);

    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .and_then(health_handler);

    let decompile = api
        .and(warp::path("decompile"))
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(upload_limit))
        .and(warp::multipart::form().max_length(upload_limit))
        .and(coordinator_filter.clone())
        .and_then(decompile_handler);

    let compare_code = api
        .and(warp::path("compare-code"))
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(payload_limit))
        .and(warp::body::json())
        .and(coordinator_filter.clone())
        .and_then(compare_code_handler);

    let compare_specs = api
        .and(warp::path("compare-specs"))
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(payload_limit))
        .and(warp::body::json())
        .and(coordinator_filter.clone())
        .and_then(compare_specs_handler);

    let validate_compliance = api
        .and(warp::path("validate-compliance"))
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(payload_limit))
        .and(warp::body::json())
        .and(coordinator_filter.clone())
        .and_then(validate_compliance_handler);

    let analyze = api
        .and(warp::path("analyze"))
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(pipeline_limit))
        .and(warp::multipart::form().max_length(pipeline_limit))
        .and(coordinator_filter)
        .and_then(analyze_handler);

    index
        .or(health)
        .or(decompile)
        .or(compare_code)
        .or(compare_specs)
        .or(validate_compliance)
        .or(analyze)
        .recover(move |err: Rejection| handle_rejection(err, payload_limit))
        .with(
            warp::cors()
                .allow_any_origin()
                .allow_headers(vec!["content-type"])
                .allow_methods(vec!["GET", "POST"]),
        )
}
