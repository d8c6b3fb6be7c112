use axum::extract::{Path, State};
use axum::{Extension, Json};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::SessionUser;
use crate::database;
use crate::db;
use crate::error::ApiResult;
use crate::models::{NewReservation, Reservation};
use crate::AppState;

const RESERVATION_LIMIT: i64 = 10;

#[derive(Debug, Deserialize)]
pub struct CreateReservationRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Lists the session user's reservations.
pub async fn list_reservations(
    State(state): State<AppState>,
    Extension(SessionUser(guest_id)): Extension<SessionUser>,
) -> ApiResult<Json<Value>> {
    let reservations = db::run(&state.pool, move |conn| {
        database::get_all_reservations(conn, guest_id, RESERVATION_LIMIT)
    })
    .await?;
    Ok(Json(json!({ "reservations": reservations })))
}

/// Books a property for the session user. A property id that points
/// nowhere surfaces as a foreign key violation, answered as a 400.
pub async fn create_reservation(
    State(state): State<AppState>,
    Extension(SessionUser(guest_id)): Extension<SessionUser>,
    Path(property_id): Path<i32>,
    Json(body): Json<CreateReservationRequest>,
) -> ApiResult<Json<Reservation>> {
    let new_reservation = NewReservation {
        start_date: body.start_date,
        end_date: body.end_date,
        property_id,
        guest_id,
    };
    let reservation = db::run(&state.pool, move |conn| {
        database::add_reservation(conn, &new_reservation)
    })
    .await?;
    log::info!("Created reservation {} for guest {}", reservation.id, guest_id);
    Ok(Json(reservation))
}
