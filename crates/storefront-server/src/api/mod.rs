mod cart;
mod collections;
mod home;
mod pages;
mod products;

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use storefront_client::{ClientError, StorefrontClient};
use storefront_core::AppConfig;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::middleware::{request_id, RequestId, REQUEST_ID_HEADER};

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<StorefrontClient>,
    pub config: Arc<AppConfig>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn new(data: T, request_id: String) -> Self {
        Self {
            data,
            meta: ResponseMeta::new(request_id),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "upstream_error" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (
            status,
            [(header::CACHE_CONTROL, HeaderValue::from_static("no-store"))],
            Json(self),
        )
            .into_response()
    }
}

/// Maps a failed critical fetch to its response: missing resources are 404,
/// rejected input is 400, everything upstream is 502.
pub(super) fn map_client_error(request_id: String, error: &ClientError) -> ApiError {
    match error {
        ClientError::NotFound { kind, handle } => {
            tracing::info!(kind, handle = %handle, "requested resource not found");
            ApiError::new(request_id, "not_found", format!("{kind} \"{handle}\" not found"))
        }
        ClientError::NoCart { .. } => ApiError::new(request_id, "bad_request", error.to_string()),
        ClientError::UserErrors { messages, .. } => {
            tracing::info!(errors = ?messages, "cart input rejected");
            ApiError::new(request_id, "validation_error", messages.join("; "))
        }
        ClientError::Core(e) => ApiError::new(request_id, "validation_error", e.to_string()),
        other => {
            tracing::error!(error = %other, "storefront request failed");
            ApiError::new(request_id, "upstream_error", "storefront request failed")
        }
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
}

fn catalog_router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/home", get(home::get_home))
        .route(
            "/api/v1/collections/{handle}",
            get(collections::get_collection),
        )
        .route("/api/v1/products/{handle}", get(products::get_product))
        .route("/api/v1/pages/{handle}", get(pages::get_page))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=60, stale-while-revalidate=300"),
        ))
}

fn cart_router() -> Router<AppState> {
    Router::new()
        .route("/cart", get(cart::get_cart).post(cart::post_cart))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .merge(catalog_router())
        .merge(cart_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(CompressionLayer::new())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(Extension(req_id): Extension<RequestId>) -> impl IntoResponse {
    Json(ApiResponse::new(HealthData { status: "ok" }, req_id.0))
}

#[cfg(test)]
#[path = "routes_test.rs"]
mod tests;
