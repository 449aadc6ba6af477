//! Handlers for the admin surface: location provisioning, QR management,
//! admin grants, and the demo simulator toggle.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use smartqueue_core::error::CoreError;
use smartqueue_core::naming::slugify;
use smartqueue_core::qr::{entry_payload, generate_qr_token};
use smartqueue_core::roles::ROLE_ADMIN;
use smartqueue_core::types::DbId;
use smartqueue_db::models::admin::AdminRecord;
use smartqueue_db::models::location::{CreateLocation, UpdateLocation};
use smartqueue_db::repositories::{AdminRepo, CheckinRepo, LocationRepo, UserRepo};
use smartqueue_events::{names, QueueEvent};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::notifications::snapshot::LocationView;
use crate::response::DataResponse;
use crate::state::AppState;

/// Accepted location kinds, mirrored by the table CHECK constraint.
const LOCATION_KINDS: [&str; 4] = ["canteen", "library", "office", "cafe"];

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /admin/locations`. The slug id is derived from
/// the name, so the form only carries the display fields.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLocationRequest {
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub name: String,
    pub kind: String,
    #[validate(range(min = 1, message = "must be positive"))]
    pub max_capacity: i32,
    #[validate(range(min = 0, message = "must not be negative"))]
    pub avg_wait_time_mins: i32,
    pub position_x: f64,
    pub position_y: f64,
    /// Starting occupancy; defaults to empty.
    #[serde(default)]
    pub current_occupancy: i32,
}

/// Request body for `PUT /admin/locations/{id}`. Omitted fields are unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateLocationRequest {
    pub name: Option<String>,
    pub kind: Option<String>,
    pub max_capacity: Option<i32>,
    pub avg_wait_time_mins: Option<i32>,
    pub position_x: Option<f64>,
    pub position_y: Option<f64>,
}

/// Request body for `POST /admin/admins`.
#[derive(Debug, Deserialize, Validate)]
pub struct GrantAdminRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
}

/// The printable entry QR code for a location.
#[derive(Debug, Serialize)]
pub struct QrCodeResponse {
    pub location_id: String,
    /// Raw token stored on the location row.
    pub token: String,
    /// Full scannable payload to encode in the printed QR image.
    pub payload: String,
}

/// Demo simulator state.
#[derive(Debug, Serialize)]
pub struct DemoStatus {
    pub running: bool,
}

// ---------------------------------------------------------------------------
// Location provisioning
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/locations
pub async fn create_location(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateLocationRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<LocationView>>)> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;
    validate_kind(&input.kind)?;

    let id = slugify(&input.name);
    if id.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "name must contain at least one letter or digit".into(),
        )));
    }

    if LocationRepo::find_by_id(&state.pool, &id).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Location {id} already exists"
        ))));
    }

    let location = LocationRepo::create(
        &state.pool,
        &CreateLocation {
            id,
            name: input.name,
            kind: input.kind,
            current_occupancy: input.current_occupancy.max(0),
            max_capacity: input.max_capacity,
            avg_wait_time_mins: input.avg_wait_time_mins,
            position_x: input.position_x,
            position_y: input.position_y,
            entry_qr_code: generate_qr_token(),
        },
    )
    .await?;

    tracing::info!(
        admin_id = admin.user_id,
        location_id = %location.id,
        "Location created"
    );

    state.event_bus.publish(
        QueueEvent::new(names::LOCATION_CREATED)
            .with_location(location.id.clone())
            .with_actor(admin.user_id),
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: LocationView::from(location),
        }),
    ))
}

/// PUT /api/v1/admin/locations/{id}
pub async fn update_location(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
    Json(input): Json<UpdateLocationRequest>,
) -> AppResult<Json<DataResponse<LocationView>>> {
    if let Some(kind) = &input.kind {
        validate_kind(kind)?;
    }
    if matches!(input.max_capacity, Some(cap) if cap < 1) {
        return Err(AppError::Core(CoreError::Validation(
            "max_capacity must be positive".into(),
        )));
    }

    let location = LocationRepo::update(
        &state.pool,
        &id,
        &UpdateLocation {
            name: input.name,
            kind: input.kind,
            max_capacity: input.max_capacity,
            avg_wait_time_mins: input.avg_wait_time_mins,
            position_x: input.position_x,
            position_y: input.position_y,
        },
    )
    .await?
    .ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "location".into(),
            id: id.clone(),
        })
    })?;

    tracing::info!(admin_id = admin.user_id, location_id = %id, "Location updated");

    state.event_bus.publish(
        QueueEvent::new(names::LOCATION_UPDATED)
            .with_location(id)
            .with_actor(admin.user_id),
    );

    Ok(Json(DataResponse {
        data: LocationView::from(location),
    }))
}

/// DELETE /api/v1/admin/locations/{id}
///
/// Removes the location, then cleans up everything that pointed at it:
/// active check-ins are completed, user location pointers are cleared, and
/// tickets go with the row via the FK cascade. The row is removed first so
/// an unknown id returns 404 without touching any presence state.
pub async fn delete_location(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let deleted = LocationRepo::delete(&state.pool, &id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "location".into(),
            id,
        }));
    }

    let closed = CheckinRepo::complete_all_at_location(&state.pool, &id).await?;
    let cleared = UserRepo::clear_current_location_at(&state.pool, &id).await?;

    tracing::info!(
        admin_id = admin.user_id,
        location_id = %id,
        closed_checkins = closed,
        cleared_pointers = cleared,
        "Location deleted"
    );

    state.event_bus.publish(
        QueueEvent::new(names::LOCATION_DELETED)
            .with_location(id)
            .with_actor(admin.user_id),
    );

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Entry QR management
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/locations/{id}/qr
pub async fn get_qr(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<QrCodeResponse>>> {
    let location = LocationRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "location".into(),
                id: id.clone(),
            })
        })?;

    Ok(Json(DataResponse {
        data: qr_response(&location.id, &location.entry_qr_code),
    }))
}

/// POST /api/v1/admin/locations/{id}/qr/rotate
///
/// Replace the entry token. Previously printed codes stop working on the
/// next scan.
pub async fn rotate_qr(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<String>,
) -> AppResult<Json<DataResponse<QrCodeResponse>>> {
    let token = generate_qr_token();
    let location = LocationRepo::rotate_entry_qr(&state.pool, &id, &token)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "location".into(),
                id: id.clone(),
            })
        })?;

    tracing::info!(admin_id = admin.user_id, location_id = %id, "Entry QR rotated");

    Ok(Json(DataResponse {
        data: qr_response(&location.id, &location.entry_qr_code),
    }))
}

// ---------------------------------------------------------------------------
// Admin grants
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/admins
///
/// Grant the admin role marker to the user with the given email.
pub async fn grant_admin(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<GrantAdminRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<AdminRecord>>)> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "user".into(),
                id: input.email.clone(),
            })
        })?;

    let record = AdminRepo::grant(&state.pool, user.id, ROLE_ADMIN).await?;

    tracing::info!(
        admin_id = admin.user_id,
        granted_user_id = user.id,
        "Admin role granted"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: record })))
}

/// DELETE /api/v1/admin/admins/{user_id}
///
/// Revoke a user's admin role marker. Self-revocation is rejected so the
/// system cannot end up with zero admins by accident.
pub async fn revoke_admin(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(user_id): Path<DbId>,
) -> AppResult<StatusCode> {
    if user_id == admin.user_id {
        return Err(AppError::Core(CoreError::Validation(
            "You cannot revoke your own admin role".into(),
        )));
    }

    let revoked = AdminRepo::revoke(&state.pool, user_id).await?;
    if !revoked {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "admin".into(),
            id: user_id.to_string(),
        }));
    }

    tracing::info!(
        admin_id = admin.user_id,
        revoked_user_id = user_id,
        "Admin role revoked"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/admin/admins
pub async fn list_admins(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<AdminRecord>>>> {
    let records = AdminRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: records }))
}

// ---------------------------------------------------------------------------
// Demo simulator
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/demo/start
pub async fn start_demo(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> AppResult<Json<DataResponse<DemoStatus>>> {
    let started = state.simulator.start().await;
    if !started {
        tracing::debug!(admin_id = admin.user_id, "Demo simulator already running");
    }
    Ok(Json(DataResponse {
        data: DemoStatus { running: true },
    }))
}

/// POST /api/v1/admin/demo/stop
pub async fn stop_demo(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<DemoStatus>>> {
    state.simulator.stop().await;
    Ok(Json(DataResponse {
        data: DemoStatus { running: false },
    }))
}

/// GET /api/v1/admin/demo
pub async fn demo_status(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<DemoStatus>>> {
    Ok(Json(DataResponse {
        data: DemoStatus {
            running: state.simulator.is_running().await,
        },
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn validate_kind(kind: &str) -> AppResult<()> {
    if !LOCATION_KINDS.contains(&kind) {
        return Err(AppError::Core(CoreError::Validation(format!(
            "kind must be one of: {}",
            LOCATION_KINDS.join(", ")
        ))));
    }
    Ok(())
}

fn qr_response(location_id: &str, token: &str) -> QrCodeResponse {
    QrCodeResponse {
        location_id: location_id.to_string(),
        token: token.to_string(),
        payload: entry_payload(location_id, token),
    }
}
