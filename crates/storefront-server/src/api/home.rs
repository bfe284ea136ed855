use axum::{extract::State, Extension, Json};
use serde::Serialize;
use storefront_client::{CollectionQuery, MarketingModule};

use crate::middleware::RequestId;

use super::collections::{load_collection_page, CollectionPage};
use super::{map_client_error, ApiError, ApiResponse, AppState};

/// Upper bound on marketing modules rendered on the homepage.
const MAX_HOME_MODULES: u32 = 20;

#[derive(Debug, Serialize)]
pub(super) struct HomePage {
    featured: CollectionPage,
    modules: Vec<MarketingModule>,
}

/// The featured collection is critical; marketing modules load alongside it
/// and degrade to an empty list.
pub(super) async fn get_home(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<HomePage>>, ApiError> {
    let (featured, modules) = tokio::join!(
        load_collection_page(&state, &state.config.home_collection, CollectionQuery::default()),
        state
            .client
            .marketing_modules(&state.config.home_module_type, MAX_HOME_MODULES),
    );

    let featured = featured.map_err(|e| map_client_error(req_id.0.clone(), &e))?;
    let modules = modules.unwrap_or_else(|e| {
        tracing::warn!(
            kind = %state.config.home_module_type,
            error = %e,
            "homepage modules unavailable"
        );
        Vec::new()
    });

    Ok(Json(ApiResponse::new(HomePage { featured, modules }, req_id.0)))
}
