//! Handlers for the public `/locations` resource.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use smartqueue_core::error::CoreError;
use smartqueue_core::suggestion::{suggest, LocationStats, Suggestion};
use smartqueue_db::repositories::LocationRepo;

use crate::error::{AppError, AppResult};
use crate::notifications::snapshot::LocationView;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /locations/suggestion`.
#[derive(Debug, Deserialize)]
pub struct SuggestionQuery {
    /// Location id to exclude from the candidate set, typically the
    /// caller's current location.
    pub exclude: Option<String>,
}

/// GET /api/v1/locations
///
/// All locations with derived occupancy percentage and status tier.
pub async fn list(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<LocationView>>>> {
    let locations: Vec<LocationView> = LocationRepo::list(&state.pool)
        .await?
        .into_iter()
        .map(LocationView::from)
        .collect();
    Ok(Json(DataResponse { data: locations }))
}

/// GET /api/v1/locations/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<LocationView>>> {
    let location = LocationRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "location".into(),
                id: id.clone(),
            })
        })?;
    Ok(Json(DataResponse {
        data: LocationView::from(location),
    }))
}

/// GET /api/v1/locations/suggestion?exclude={id}
///
/// Best-alternative recommendation from a fresh snapshot. `data` is `null`
/// when no candidate is worth suggesting.
pub async fn suggestion(
    State(state): State<AppState>,
    Query(query): Query<SuggestionQuery>,
) -> AppResult<Json<DataResponse<Option<Suggestion>>>> {
    let stats: Vec<LocationStats> = LocationRepo::list(&state.pool)
        .await?
        .iter()
        .map(|loc| loc.stats())
        .collect();

    let suggestion = suggest(&stats, query.exclude.as_deref());
    Ok(Json(DataResponse { data: suggestion }))
}
