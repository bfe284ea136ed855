//! `/cart` endpoint: form-encoded cart actions and the current snapshot.

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    Extension, Form, Json,
};
use serde::Deserialize;
use storefront_client::CART_COOKIE;
use storefront_core::{CartMutation, CartSnapshot};

use crate::middleware::RequestId;

use super::{map_client_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct CartForm {
    action: String,
    inputs: String,
}

/// Reads the cart id from the `Cookie` header, if any.
pub(super) fn cart_id_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == CART_COOKIE)
        .map(|(_, value)| value.trim_matches('"').to_owned())
        .filter(|value| !value.is_empty())
}

fn cart_cookie(cart_id: &str) -> Option<HeaderValue> {
    HeaderValue::from_str(&format!(
        "{CART_COOKIE}={cart_id}; Path=/; HttpOnly; SameSite=Lax"
    ))
    .ok()
}

fn snapshot_response(snapshot: CartSnapshot, request_id: String) -> Response {
    let cookie = cart_cookie(&snapshot.id);
    if cookie.is_none() {
        tracing::warn!(cart_id = %snapshot.id, "cart id cannot be set as a cookie");
    }
    let mut response = Json(ApiResponse::new(snapshot, request_id)).into_response();
    if let Some(cookie) = cookie {
        response.headers_mut().insert(header::SET_COOKIE, cookie);
    }
    response
}

pub(super) async fn get_cart(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let Some(cart_id) = cart_id_from_headers(&headers) else {
        return Err(ApiError::new(req_id.0, "not_found", "no cart"));
    };

    let snapshot = state
        .client
        .cart(&cart_id)
        .await
        .map_err(|e| map_client_error(req_id.0.clone(), &e))?;

    match snapshot {
        Some(snapshot) => Ok(snapshot_response(snapshot, req_id.0)),
        None => {
            tracing::info!(%cart_id, "cart expired or unknown");
            Err(ApiError::new(req_id.0, "not_found", "cart not found"))
        }
    }
}

/// Executes one cart action. A `LinesAdd` without a cart cookie creates the
/// cart; the response sets the cookie to the resulting cart id.
pub(super) async fn post_cart(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    headers: HeaderMap,
    Form(form): Form<CartForm>,
) -> Result<Response, ApiError> {
    let mutation = CartMutation::from_form(&form.action, &form.inputs).map_err(|e| {
        tracing::info!(action = %form.action, error = %e, "rejected cart form");
        ApiError::new(req_id.0.clone(), "bad_request", e.to_string())
    })?;
    if mutation.is_empty() {
        return Err(ApiError::new(
            req_id.0,
            "bad_request",
            "cart action has no lines",
        ));
    }

    let cart_id = cart_id_from_headers(&headers);
    let snapshot = state
        .client
        .apply_cart_mutation(cart_id.as_deref(), &mutation)
        .await
        .map_err(|e| map_client_error(req_id.0.clone(), &e))?;

    tracing::info!(
        action = %mutation.action(),
        cart_id = %snapshot.id,
        total_quantity = snapshot.total_quantity,
        "cart action applied"
    );
    Ok(snapshot_response(snapshot, req_id.0))
}
