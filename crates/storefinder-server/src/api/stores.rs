use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::Serialize;
use storefinder_core::{SearchParams, StoreRecord};

use super::{map_find_error, ApiError, AppState, ResponseMeta};
use crate::middleware::RequestId;

// ----- Response bodies -----

#[derive(Debug, Serialize)]
pub struct FindStoresResponse {
    pub stores: Vec<StoreRecord>,
    pub meta: ResponseMeta,
}

// ----- Handlers -----

/// `POST /find-stores`
///
/// A body that is not valid JSON, or that names no usable location, is a
/// `validation_error`. An agent answer with no recoverable structure still
/// returns 200 with a single diagnostic record.
pub(super) async fn find_stores(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<SearchParams>, JsonRejection>,
) -> Result<Json<FindStoresResponse>, ApiError> {
    let Json(params) =
        body.map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.body_text()))?;

    let stores = state
        .finder
        .search(params)
        .await
        .map_err(|e| map_find_error(req_id.0.clone(), &e))?;

    tracing::debug!(request_id = %req_id.0, count = stores.len(), "returning stores");
    Ok(Json(FindStoresResponse {
        stores,
        meta: ResponseMeta::new(req_id.0),
    }))
}
