use std::convert::Infallible;
use std::sync::Arc;
use serde::Serialize;
use serde_json::json;
use warp::http::header::{HeaderValue, RETRY_AFTER};
use warp::http::StatusCode;
use warp::multipart::FormData;
use warp::reply::Response;
use warp::{Rejection, Reply};
use crate::config::constants::SERVICE_NAME;
use crate::enums::code_artifact::CodeArtifact;
use crate::errors::{SpectraceError, SpectraceResult};
use crate::server::multipart_form::MultipartForm;
use crate::services::pipeline_coordinator::PipelineCoordinator;
use crate::structs::api_response::{ApiErrorBody, ApiFailure, ApiResponse};
use crate::structs::compare_code_request::CompareCodeRequest;
use crate::structs::compare_specs_request::CompareSpecsRequest;
use crate::structs::decompilation_output::DecompilationOutput;
use crate::structs::pipeline_report::PipelineReport;
use crate::structs::pipeline_request::PipelineRequest;
use crate::structs::validate_compliance_request::ValidateComplianceRequest;

pub fn success_reply<T: Serialize>(data: T) -> Response {
    warp::reply::json(&ApiResponse::ok(data)).into_response()
}

pub fn failure_reply(error: &SpectraceError) -> Response {
    if error.http_status() >= 500 {
        log::error!("❌ {}: {}", error.kind(), error);
    } else {
        log::warn!("⚠️ {}: {}", error.kind(), error);
    }

    let status = StatusCode::from_u16(error.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut response = warp::reply::with_status(warp::reply::json(&ApiFailure::from(error)), status).into_response();
    if let Some(secs) = error.retry_after_secs() {
        if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
            response.headers_mut().insert(RETRY_AFTER, value);
        }
    }
    response
}

fn reply_with<T: Serialize>(result: SpectraceResult<T>) -> Response {
    match result {
        Ok(data) => success_reply(data),
        Err(e) => failure_reply(&e),
    }
}

pub async fn index_handler() -> Result<impl Reply, Infallible> {
    Ok(warp::reply::json(&json!({
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "features": [
            "binary decompilation",
            "code comparison",
            "specification comparison",
            "compliance validation",
            "end-to-end pipeline"
        ],
        "endpoints": {
            "decompile": "POST /api/v1/decompile",
            "compare_code": "POST /api/v1/compare-code",
            "compare_specs": "POST /api/v1/compare-specs",
            "validate_compliance": "POST /api/v1/validate-compliance",
            "analyze": "POST /api/v1/analyze",
            "health": "GET /health"
        }
    })))
}

pub async fn health_handler() -> Result<impl Reply, Infallible> {
    Ok(warp::reply::json(&json!({ "status": "healthy", "service": SERVICE_NAME })))
}

pub async fn decompile_handler(form: FormData, coordinator: Arc<PipelineCoordinator>) -> Result<Response, Infallible> {
    Ok(reply_with(decompile_form(form, &coordinator).await))
}

async fn decompile_form(form: FormData, coordinator: &PipelineCoordinator) -> SpectraceResult<DecompilationOutput> {
    let mut form = MultipartForm::read(form).await?;
    let architecture = form.take_text("architecture")?;
    let file = form
        .take("file")
        .ok_or_else(|| SpectraceError::invalid_input("file", "required file field is missing"))?;
    let filename = file.filename.unwrap_or_default();
    coordinator.decompile(&file.data, &filename, architecture).await
}

pub async fn compare_code_handler(
    request: CompareCodeRequest,
    coordinator: Arc<PipelineCoordinator>,
) -> Result<Response, Infallible> {
    Ok(reply_with(coordinator.compare_code(&request).await))
}

pub async fn compare_specs_handler(
    request: CompareSpecsRequest,
    coordinator: Arc<PipelineCoordinator>,
) -> Result<Response, Infallible> {
    Ok(reply_with(coordinator.compare_specs(&request).await))
}

pub async fn validate_compliance_handler(
    request: ValidateComplianceRequest,
    coordinator: Arc<PipelineCoordinator>,
) -> Result<Response, Infallible> {
    Ok(reply_with(
        coordinator
            .validate_compliance(&request.code_analysis, &request.spec_analysis)
            .await,
    ))
}

pub async fn analyze_handler(form: FormData, coordinator: Arc<PipelineCoordinator>) -> Result<Response, Infallible> {
    Ok(reply_with(analyze_form(form, &coordinator).await))
}

async fn analyze_form(form: FormData, coordinator: &PipelineCoordinator) -> SpectraceResult<PipelineReport> {
    let mut form = MultipartForm::read(form).await?;
    let request = PipelineRequest {
        old_code: code_artifact(&mut form, "old")?,
        new_code: code_artifact(&mut form, "new")?,
        old_spec: form.require_text("old_spec")?,
        new_spec: form.require_text("new_spec")?,
        firmware_type: form.take_text("firmware_type")?,
        architecture_hint: form.take_text("architecture")?,
    };
    coordinator.run(request).await
}

/// `<side>_code` as text or `<side>_binary` as an upload, exactly one of them.
fn code_artifact(form: &mut MultipartForm, side: &str) -> SpectraceResult<CodeArtifact> {
    let code_field = format!("{}_code", side);
    let binary_field = format!("{}_binary", side);
    let text = form.take_text(&code_field)?;
    let binary = form.take(&binary_field);

    match (text, binary) {
        (Some(text), None) => Ok(CodeArtifact::Source(text)),
        (None, Some(file)) => Ok(CodeArtifact::Binary {
            filename: file.filename.unwrap_or_else(|| binary_field.clone()),
            payload: file.data,
        }),
        (Some(_), Some(_)) => Err(SpectraceError::invalid_input(
            &code_field,
            &format!("provide either {} or {}, not both", code_field, binary_field),
        )),
        (None, None) => Err(SpectraceError::invalid_input(
            &code_field,
            &format!("one of {} or {} is required", code_field, binary_field),
        )),
    }
}

pub async fn handle_rejection(err: Rejection, payload_limit: u64) -> Result<Response, Infallible> {
    if err.is_not_found() {
        return Ok(plain_failure(StatusCode::NOT_FOUND, "not_found", "No such endpoint"));
    }
    if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        // The transport rejects before the body is read, so the exact size is unknown.
        return Ok(failure_reply(&SpectraceError::PayloadTooLarge {
            size: payload_limit.saturating_add(1),
            limit: payload_limit,
        }));
    }
    if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        return Ok(failure_reply(&SpectraceError::invalid_input("body", &e.to_string())));
    }
    if err.find::<warp::reject::LengthRequired>().is_some() {
        return Ok(plain_failure(StatusCode::LENGTH_REQUIRED, "invalid_input", "Content-Length header is required"));
    }
    if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        return Ok(plain_failure(StatusCode::METHOD_NOT_ALLOWED, "method_not_allowed", "Method not allowed"));
    }
    if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        return Ok(plain_failure(StatusCode::UNSUPPORTED_MEDIA_TYPE, "invalid_input", "Unsupported content type"));
    }

    log::error!("❌ Unhandled rejection: {:?}", err);
    Ok(plain_failure(StatusCode::INTERNAL_SERVER_ERROR, "system_error", "Unhandled request error"))
}

fn plain_failure(status: StatusCode, kind: &str, message: &str) -> Response {
    let body = ApiFailure {
        success: false,
        error: ApiErrorBody { kind: kind.to_string(), message: message.to_string(), retryable: false },
    };
    warp::reply::with_status(warp::reply::json(&body), status).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overloaded_failure_carries_retry_after() {
        let response = failure_reply(&SpectraceError::Overloaded {
            resource: "decompiler".to_string(),
            retry_after_secs: 30,
        });

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(response.headers().get(RETRY_AFTER).and_then(|v| v.to_str().ok()), Some("30"));
    }

    #[test]
    fn timeout_failure_is_gateway_timeout_without_retry_after() {
        let response = failure_reply(&SpectraceError::DecompilationTimeout {
            filename: "fw.bin".to_string(),
            timeout_secs: 300,
        });

        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
        assert!(response.headers().get(RETRY_AFTER).is_none());
    }
}
