// HTTP request handlers
use crate::application::visualizer_service::VisualizationRequest;
use crate::domain::error::VisualizerError;
use crate::domain::timeframe::Timeframe;
use crate::infrastructure::run_locator::RunLocatorError;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;

const MARKDOWN: &str = "text/markdown; charset=utf-8";
const DEFAULT_EXPRESSION: &str = "value";
const DEFAULT_RUN_SECONDS: u64 = 15;

#[derive(Deserialize)]
pub struct ReportQuery {
    pub dir: String,
    pub expr: String,
    pub seconds: Option<u64>,
    pub minutes: Option<u64>,
}

#[derive(Deserialize)]
pub struct RunReportQuery {
    pub expr: Option<String>,
    pub seconds: Option<u64>,
    pub minutes: Option<u64>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Report for an arbitrary data directory
pub async fn report(
    Query(query): Query<ReportQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let request = VisualizationRequest {
        source_dir: PathBuf::from(query.dir),
        expression: query.expr,
        window: Timeframe::resolve(query.seconds, query.minutes),
        interactive: false,
    };
    report_response(&state, request).await
}

/// Report for the data directory of a running configuration
pub async fn run_report(
    Path(config): Path<String>,
    Query(query): Query<RunReportQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let source_dir = match state.runs.locate(Some(&config)) {
        Ok(dir) => dir,
        Err(e) => {
            tracing::debug!("Run lookup for {} failed: {}", config, e);
            let status = match e {
                RunLocatorError::InvalidConfigName(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::NOT_FOUND,
            };
            return markdown(status, e.to_string());
        }
    };

    let window = match (query.seconds, query.minutes) {
        (None, None) => Timeframe::Seconds(DEFAULT_RUN_SECONDS),
        (seconds, minutes) => Timeframe::resolve(seconds, minutes),
    };

    let request = VisualizationRequest {
        source_dir,
        expression: query.expr.unwrap_or_else(|| DEFAULT_EXPRESSION.to_string()),
        window,
        interactive: false,
    };
    report_response(&state, request).await
}

async fn report_response(state: &AppState, request: VisualizationRequest) -> Response {
    match state.visualizer.report_async(request).await {
        Ok(body) => markdown(StatusCode::OK, body),
        Err(e) => {
            tracing::warn!("Report failed: {}", e);
            markdown(status_for(&e), e.to_string())
        }
    }
}

fn status_for(error: &VisualizerError) -> StatusCode {
    match error {
        VisualizerError::DirectoryNotFound(_)
        | VisualizerError::NoFiles(_)
        | VisualizerError::NoData { .. } => StatusCode::NOT_FOUND,
        VisualizerError::InvalidExpression { .. } => StatusCode::BAD_REQUEST,
        VisualizerError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn markdown(status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, MARKDOWN)], body).into_response()
}
