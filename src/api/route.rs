use crate::{
    api::{error::ApiError, response::ApiResponse},
    models::AggregatedReport,
    state::AppState,
    validation::parse_include_internal,
};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, Method},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tracing::info;

// GET /api/txs query parameters
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    pub address: Option<String>,
    pub include_internal: Option<String>,
}

// Create router with all routes
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let router = Router::new()
        .route("/api/txs", get(get_report))
        .with_state(app_state);
    with_service_layers(router, cors)
}

// CORS outermost, so panic responses carry its headers too
fn with_service_layers(router: Router, cors: CorsLayer) -> Router {
    router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors)
}

// GET /api/txs handler
async fn get_report(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> Result<ApiResponse<AggregatedReport>, ApiError> {
    let Query(params) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let address = params.address.unwrap_or_default();
    let include_internal = parse_include_internal(params.include_internal.as_deref());

    info!("Processing report request for address: {}, include internal: {}", address.trim(), include_internal);

    let report = state.reports.build_report(&address, include_internal).await?;
    Ok(ApiResponse(report))
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    ApiError::Internal(format!("handler panicked: {}", detail)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    async fn boom() -> &'static str {
        panic!("boom")
    }

    #[tokio::test]
    async fn panicking_handler_returns_json_500_with_cors() {
        let cors = CorsLayer::new().allow_origin(AnyOrigin);
        let router: Router = Router::new().route("/boom", get(boom));
        let app = with_service_layers(router, cors);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let res = reqwest::Client::new()
            .get(format!("http://{}/boom", addr))
            .header("Origin", "https://example.com")
            .send()
            .await
            .unwrap();

        assert_eq!(res.status().as_u16(), 500);
        assert_eq!(
            res.headers()
                .get("access-control-allow-origin")
                .and_then(|v| v.to_str().ok()),
            Some("*")
        );
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["error"], "Internal server error");
        server.abort();
    }
}
