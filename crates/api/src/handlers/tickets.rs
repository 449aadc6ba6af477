//! Handlers for virtual-queue tickets.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use smartqueue_core::error::CoreError;
use smartqueue_core::types::DbId;
use smartqueue_db::models::ticket::{CreateTicket, Ticket};
use smartqueue_db::repositories::{CheckinRepo, LocationRepo, TicketRepo, UserRepo};
use smartqueue_events::{names, QueueEvent};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Fraction (numerator/denominator over 10) of the estimated wait credited
/// as time saved when joining remotely instead of standing in line.
const JOIN_CREDIT_TENTHS: i32 = 7;

/// POST /api/v1/locations/{id}/queue
///
/// Join the virtual queue at a location. Rejected while the caller is
/// physically checked in anywhere, and while they already hold a ticket for
/// this location.
pub async fn join(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(location_id): Path<String>,
) -> AppResult<(StatusCode, Json<DataResponse<Ticket>>)> {
    let location = LocationRepo::find_by_id(&state.pool, &location_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "location".into(),
                id: location_id.clone(),
            })
        })?;

    if let Some(active) = CheckinRepo::find_active_for_user(&state.pool, auth_user.user_id).await? {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Exit {} before joining a queue",
            active.location_name
        ))));
    }

    let existing = TicketRepo::list_for_user(&state.pool, auth_user.user_id).await?;
    if existing.iter().any(|t| t.location_id == location_id) {
        return Err(AppError::Core(CoreError::Conflict(
            "You already hold a ticket for this queue".into(),
        )));
    }

    // Display estimate only: derived from the occupancy at join time, not a
    // serialized FIFO position.
    let position_in_line = (location.current_occupancy / 10 + 1).max(1);
    let estimated_time_mins = location.avg_wait_time_mins;

    let ticket = TicketRepo::create(
        &state.pool,
        &CreateTicket {
            user_id: auth_user.user_id,
            location_id: location.id.clone(),
            location_name: location.name.clone(),
            position_in_line,
            estimated_time_mins,
        },
    )
    .await?;

    // Joining remotely saves most of the physical wait.
    let credit = estimated_time_mins * JOIN_CREDIT_TENTHS / 10;
    UserRepo::record_queue_join(&state.pool, auth_user.user_id, credit).await?;

    tracing::info!(
        user_id = auth_user.user_id,
        location_id = %location.id,
        ticket_id = ticket.id,
        "Queue joined"
    );

    state.event_bus.publish(
        QueueEvent::new(names::TICKET_CREATED)
            .with_location(location.id)
            .with_actor(auth_user.user_id)
            .with_payload(serde_json::json!({ "ticket_id": ticket.id })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: ticket })))
}

/// GET /api/v1/tickets
///
/// The caller's tickets, newest first.
pub async fn list_mine(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Ticket>>>> {
    let tickets = TicketRepo::list_for_user(&state.pool, auth_user.user_id).await?;
    Ok(Json(DataResponse { data: tickets }))
}

/// DELETE /api/v1/tickets/{id}
///
/// Cancel a ticket. Idempotent: cancelling an unknown or already-cancelled
/// ticket still returns 204, and a ticket belonging to another user is
/// indistinguishable from a missing one.
pub async fn cancel(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(ticket_id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = TicketRepo::delete(&state.pool, ticket_id, auth_user.user_id).await?;

    if deleted {
        tracing::info!(
            user_id = auth_user.user_id,
            ticket_id,
            "Ticket cancelled"
        );
        state.event_bus.publish(
            QueueEvent::new(names::TICKET_CANCELLED)
                .with_actor(auth_user.user_id)
                .with_payload(serde_json::json!({ "ticket_id": ticket_id })),
        );
    }

    Ok(StatusCode::NO_CONTENT)
}
