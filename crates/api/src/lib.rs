use anyhow::Context;
use axum::{
    body::Bytes,
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use stockscope_core::domain::message::Message;
use stockscope_core::gateway::{GenerateReportRequest, ReportGateway};

#[derive(Debug, Clone)]
pub struct AppState {
    /// `None` when the completion client could not be configured; report requests then fail.
    pub gateway: Option<ReportGateway>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/generate-report", any(generate_report))
        .fallback(not_found)
        .with_state(state)
        .layer(middleware::from_fn(answer_preflight))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("POST, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
        .layer(TraceLayer::new_for_http())
}

// OPTIONS on any path is answered with an empty 200 before routing.
async fn answer_preflight(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    next.run(request).await
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}

// The body is parsed by hand so malformed input surfaces as a 500 like any other failure.
async fn generate_report(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Message>, ApiError> {
    let Some(gateway) = &state.gateway else {
        return Err(anyhow::anyhow!("completion provider is not configured").into());
    };

    let request = serde_json::from_slice::<GenerateReportRequest>(&body)
        .context("invalid generate-report request body")?;
    let message = gateway.generate_report(request).await?;
    Ok(Json(message))
}

pub struct ApiError(anyhow::Error);

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        sentry_anyhow::capture_anyhow(&self.0);
        tracing::error!(error = %format!("{:#}", self.0), "report generation failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": format!("{:#}", self.0) })),
        )
            .into_response()
    }
}
