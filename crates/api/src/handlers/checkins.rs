//! Handlers for QR check-in and app-button exit.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use smartqueue_core::error::CoreError;
use smartqueue_core::qr::{parse_scan_payload, ScanAction};
use smartqueue_db::models::checkin::{Checkin, CreateCheckin};
use smartqueue_db::repositories::{CheckinRepo, LocationRepo, UserRepo};
use smartqueue_events::{names, QueueEvent};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Fraction (tenths) of the minutes spent inside credited as time saved on
/// exit, floored at one minute.
const EXIT_CREDIT_TENTHS: i64 = 3;

/// Request body for `POST /checkins`.
#[derive(Debug, Deserialize)]
pub struct CheckInRequest {
    /// Raw scanned string, e.g. `smartqueue://scan/main-canteen/entry/tok`.
    pub payload: String,
}

/// Response body for `POST /locations/{id}/exit`.
#[derive(Debug, Serialize)]
pub struct ExitResponse {
    pub checkin: Checkin,
    pub minutes_inside: i64,
    pub time_saved_mins: i32,
}

/// POST /api/v1/checkins
///
/// Check in by scanning a location's printed entry QR code. The payload must
/// parse, name an existing location, and carry that location's current entry
/// token. Exit payloads are rejected: leaving is an in-app action.
pub async fn check_in(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<CheckInRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Checkin>>)> {
    let scan = parse_scan_payload(&input.payload).map_err(AppError::Core)?;

    if scan.action == ScanAction::Exit {
        return Err(AppError::Core(CoreError::Validation(
            "Exit is performed in the app, not by scanning".into(),
        )));
    }

    let location = LocationRepo::find_by_id(&state.pool, &scan.location_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "location".into(),
                id: scan.location_id.clone(),
            })
        })?;

    // Exact, case-sensitive token match against the stored entry code.
    if scan.token != location.entry_qr_code {
        return Err(AppError::Core(CoreError::InvalidToken));
    }

    if let Some(active) = CheckinRepo::find_active_for_user(&state.pool, auth_user.user_id).await? {
        let message = if active.location_id == location.id {
            "You are already checked in here".to_string()
        } else {
            format!("Exit {} before checking in elsewhere", active.location_name)
        };
        return Err(AppError::Core(CoreError::Conflict(message)));
    }

    // The partial unique index backs this insert: a concurrent second
    // check-in loses with a constraint violation and maps to 409.
    let checkin = CheckinRepo::create(
        &state.pool,
        &CreateCheckin {
            user_id: auth_user.user_id,
            location_id: location.id.clone(),
            location_name: location.name.clone(),
        },
    )
    .await?;

    let occupancy = LocationRepo::adjust_occupancy(&state.pool, &location.id, 1).await?;
    UserRepo::set_current_location(&state.pool, auth_user.user_id, &location.id, &location.name)
        .await?;

    tracing::info!(
        user_id = auth_user.user_id,
        location_id = %location.id,
        occupancy = ?occupancy,
        "Checked in"
    );

    state.event_bus.publish(
        QueueEvent::new(names::CHECKIN_CREATED)
            .with_location(location.id.clone())
            .with_actor(auth_user.user_id)
            .with_payload(serde_json::json!({ "checkin_id": checkin.id })),
    );
    state
        .event_bus
        .publish(QueueEvent::new(names::LOCATION_UPDATED).with_location(location.id));

    Ok((StatusCode::CREATED, Json(DataResponse { data: checkin })))
}

/// GET /api/v1/checkins/current
///
/// The caller's active check-in, or `null` when they are not inside anywhere.
pub async fn current(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<Option<Checkin>>>> {
    let active = CheckinRepo::find_active_for_user(&state.pool, auth_user.user_id).await?;
    Ok(Json(DataResponse { data: active }))
}

/// POST /api/v1/locations/{id}/exit
///
/// Leave a location via the in-app button. Completes the active check-in,
/// decrements occupancy, clears the user's location pointer, and credits a
/// share of the time spent inside.
pub async fn exit(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(location_id): Path<String>,
) -> AppResult<Json<DataResponse<ExitResponse>>> {
    let active = CheckinRepo::find_active(&state.pool, auth_user.user_id, &location_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "checkin",
                id: location_id.clone(),
            })
        })?;

    let exit_time = Utc::now();
    let checkin = CheckinRepo::complete(&state.pool, active.id, exit_time)
        .await?
        .ok_or_else(|| {
            // Lost a race with another exit request for the same check-in.
            AppError::Core(CoreError::NotFound {
                entity: "checkin",
                id: location_id.clone(),
            })
        })?;

    let occupancy = LocationRepo::adjust_occupancy(&state.pool, &location_id, -1).await?;
    UserRepo::clear_current_location(&state.pool, auth_user.user_id).await?;

    let minutes_inside = (exit_time - checkin.entry_time).num_minutes().max(0);
    let time_saved_mins = ((minutes_inside * EXIT_CREDIT_TENTHS / 10) as i32).max(1);
    UserRepo::credit_time_saved(&state.pool, auth_user.user_id, time_saved_mins).await?;

    tracing::info!(
        user_id = auth_user.user_id,
        location_id = %location_id,
        minutes_inside,
        occupancy = ?occupancy,
        "Exited location"
    );

    state.event_bus.publish(
        QueueEvent::new(names::CHECKIN_COMPLETED)
            .with_location(location_id.clone())
            .with_actor(auth_user.user_id)
            .with_payload(serde_json::json!({ "checkin_id": checkin.id })),
    );
    state
        .event_bus
        .publish(QueueEvent::new(names::LOCATION_UPDATED).with_location(location_id));

    Ok(Json(DataResponse {
        data: ExitResponse {
            checkin,
            minutes_inside,
            time_saved_mins,
        },
    }))
}
