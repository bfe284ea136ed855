use axum::{
    extract::{Path, State},
    Extension, Json,
};
use storefront_client::ContentPage;

use crate::middleware::RequestId;

use super::{map_client_error, ApiError, ApiResponse, AppState};

pub(super) async fn get_page(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(handle): Path<String>,
) -> Result<Json<ApiResponse<ContentPage>>, ApiError> {
    let page = state
        .client
        .page(&handle)
        .await
        .map_err(|e| map_client_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse::new(page, req_id.0)))
}
