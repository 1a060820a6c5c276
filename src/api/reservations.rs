use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::params::parse_id;
use crate::db::models::{
    required_text, Flight, NewReservation, Passenger, Reservation, ReservationDetail,
};
use crate::db::repository::{FlightRepository, PassengerRepository, ReservationRepository};
use crate::error::AppError;

pub const RESERVATION_NOT_FOUND: &str = "La Reserva con ID introducido no fue encontrada";
pub const REFERENCES_NOT_FOUND: &str =
    "No se encontraron pasajeros o vuelos con los IDs introducidos";
pub const RESERVATION_DELETED: &str = "La Reserva con ID introducido fue eliminada exitosamente.";

/// The three repositories a reservation touches.
#[derive(Clone, Copy)]
pub struct Catalog<'a> {
    pub flights: &'a dyn FlightRepository,
    pub passengers: &'a dyn PassengerRepository,
    pub reservations: &'a dyn ReservationRepository,
}

/// Look up the flight and passenger a stored reservation points at.
/// `None` when either of them no longer exists.
async fn lookup(
    catalog: Catalog<'_>,
    reservation: &Reservation,
) -> Result<Option<ReservationDetail>, AppError> {
    let flight = catalog.flights.find_by_id(reservation.flight_id).await?;
    let passenger = catalog.passengers.find_by_id(reservation.passenger_id).await?;
    Ok(match (flight, passenger) {
        (Some(flight), Some(passenger)) => Some(ReservationDetail {
            id: reservation.id,
            seat: reservation.seat.clone(),
            flight,
            passenger,
        }),
        _ => None,
    })
}

/// Resolve the flight and passenger a stored reservation points at.
pub async fn resolve(
    catalog: Catalog<'_>,
    reservation: Reservation,
) -> Result<ReservationDetail, AppError> {
    lookup(catalog, &reservation).await?.ok_or_else(|| {
        AppError::Database(format!(
            "Reservation {} references missing flight {} or passenger {}",
            reservation.id, reservation.flight_id, reservation.passenger_id
        ))
    })
}

/// Resolve a list of reservations. Rows whose flight or passenger has gone
/// missing are logged and left out so one bad row does not hide the rest.
async fn resolve_all(
    catalog: Catalog<'_>,
    reservations: Vec<Reservation>,
) -> Result<Vec<ReservationDetail>, AppError> {
    let mut details = Vec::with_capacity(reservations.len());
    for reservation in reservations {
        match lookup(catalog, &reservation).await? {
            Some(detail) => details.push(detail),
            None => tracing::warn!(
                reservation_id = reservation.id,
                flight_id = reservation.flight_id,
                passenger_id = reservation.passenger_id,
                "Skipping reservation with missing flight or passenger"
            ),
        }
    }
    Ok(details)
}

/// A booking request checked against the stored flights and passengers.
struct CheckedBooking {
    booking: NewReservation,
    flight: Flight,
    passenger: Passenger,
}

impl CheckedBooking {
    fn into_detail(self, id: i64) -> ReservationDetail {
        ReservationDetail {
            id,
            seat: self.booking.seat,
            flight: self.flight,
            passenger: self.passenger,
        }
    }
}

/// Validate a booking request against the existing flights and passengers.
async fn check_booking(
    catalog: Catalog<'_>,
    booking: NewReservation,
) -> Result<CheckedBooking, AppError> {
    let seat = required_text("seat", &booking.seat)?;

    let flight = catalog.flights.find_by_id(booking.flight_id).await?;
    let passenger = catalog.passengers.find_by_id(booking.passenger_id).await?;
    match (flight, passenger) {
        (Some(flight), Some(passenger)) => Ok(CheckedBooking {
            booking: NewReservation { seat, ..booking },
            flight,
            passenger,
        }),
        _ => {
            tracing::warn!(
                flight_id = booking.flight_id,
                passenger_id = booking.passenger_id,
                "Booking references unknown flight or passenger"
            );
            Err(AppError::NotFound(REFERENCES_NOT_FOUND.into()))
        }
    }
}

pub async fn list_reservations(catalog: Catalog<'_>) -> Result<Vec<ReservationDetail>, AppError> {
    let all = catalog.reservations.list().await?;
    resolve_all(catalog, all).await
}

pub async fn get_reservation(
    catalog: Catalog<'_>,
    id: i64,
) -> Result<ReservationDetail, AppError> {
    let reservation = catalog
        .reservations
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(RESERVATION_NOT_FOUND.into()))?;
    resolve(catalog, reservation).await
}

/// The reservation with the given id as a list of zero or one element.
pub async fn reservations_by_id(
    catalog: Catalog<'_>,
    id: i64,
) -> Result<Vec<ReservationDetail>, AppError> {
    let found = catalog.reservations.find_by_id(id).await?;
    resolve_all(catalog, found.into_iter().collect()).await
}

pub async fn reservations_by_flight(
    catalog: Catalog<'_>,
    flight_id: i64,
) -> Result<Vec<ReservationDetail>, AppError> {
    let found = catalog.reservations.find_by_flight(flight_id).await?;
    resolve_all(catalog, found).await
}

pub async fn reservations_by_passenger(
    catalog: Catalog<'_>,
    passenger_id: i64,
) -> Result<Vec<ReservationDetail>, AppError> {
    let found = catalog.reservations.find_by_passenger(passenger_id).await?;
    resolve_all(catalog, found).await
}

/// Book a seat for an existing passenger on an existing flight.
pub async fn create_reservation(
    catalog: Catalog<'_>,
    booking: NewReservation,
) -> Result<ReservationDetail, AppError> {
    let checked = check_booking(catalog, booking).await?;
    let reservation = catalog.reservations.insert(checked.booking.clone()).await?;
    tracing::info!(
        reservation_id = reservation.id,
        flight_id = reservation.flight_id,
        passenger_id = reservation.passenger_id,
        seat = %reservation.seat,
        "Reservation created"
    );
    Ok(checked.into_detail(reservation.id))
}

/// Point an existing reservation at another flight, passenger or seat.
pub async fn update_reservation(
    catalog: Catalog<'_>,
    id: i64,
    booking: NewReservation,
) -> Result<ReservationDetail, AppError> {
    if catalog.reservations.find_by_id(id).await?.is_none() {
        return Err(AppError::NotFound(RESERVATION_NOT_FOUND.into()));
    }

    let checked = check_booking(catalog, booking).await?;
    if !catalog
        .reservations
        .update(checked.booking.clone().with_id(id))
        .await?
    {
        return Err(AppError::NotFound(RESERVATION_NOT_FOUND.into()));
    }
    tracing::info!(reservation_id = id, "Reservation updated");
    Ok(checked.into_detail(id))
}

pub async fn delete_reservation(catalog: Catalog<'_>, id: i64) -> Result<(), AppError> {
    if !catalog.reservations.delete(id).await? {
        return Err(AppError::NotFound(RESERVATION_NOT_FOUND.into()));
    }
    tracing::info!(reservation_id = id, "Reservation deleted");
    Ok(())
}

/// Query string of `POST /api/reserva/crear/params`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateParams {
    pub id_vuelo: String,
    pub id_pasajero: String,
    pub asiento: String,
}

impl CreateParams {
    pub fn into_booking(self) -> Result<NewReservation, AppError> {
        Ok(NewReservation {
            flight_id: parse_id(&self.id_vuelo)?,
            passenger_id: parse_id(&self.id_pasajero)?,
            seat: self.asiento,
        })
    }
}

/// Query string of `PUT /api/reserva/actualizar/params`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateParams {
    pub id_reserva: String,
    pub id_vuelo: String,
    pub id_pasajero: String,
    pub asiento: String,
}

/// Plain confirmation body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Axum handler for `GET /api/reserva/mostrar`.
pub async fn list_reservations_handler(
    State(state): State<crate::app::AppState>,
) -> Result<Json<Vec<ReservationDetail>>, AppError> {
    Ok(Json(list_reservations(state.catalog()).await?))
}

/// Axum handler for `GET /api/reserva/mostrar/{id}`.
pub async fn get_reservation_handler(
    State(state): State<crate::app::AppState>,
    Path(id): Path<String>,
) -> Result<Json<ReservationDetail>, AppError> {
    let id = parse_id(&id)?;
    Ok(Json(get_reservation(state.catalog(), id).await?))
}

/// Axum handler for `GET /api/reserva/mostrar/idreserva/{id}`.
pub async fn reservations_by_id_handler(
    State(state): State<crate::app::AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<ReservationDetail>>, AppError> {
    let id = parse_id(&id)?;
    Ok(Json(reservations_by_id(state.catalog(), id).await?))
}

/// Axum handler for `GET /api/reserva/mostrar/idvuelo/{id}`.
pub async fn reservations_by_flight_handler(
    State(state): State<crate::app::AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<ReservationDetail>>, AppError> {
    let id = parse_id(&id)?;
    Ok(Json(reservations_by_flight(state.catalog(), id).await?))
}

/// Axum handler for `GET /api/reserva/mostrar/idpasajero/{id}`.
pub async fn reservations_by_passenger_handler(
    State(state): State<crate::app::AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<ReservationDetail>>, AppError> {
    let id = parse_id(&id)?;
    Ok(Json(reservations_by_passenger(state.catalog(), id).await?))
}

/// Axum handler for `POST /api/reserva`.
pub async fn create_reservation_handler(
    State(state): State<crate::app::AppState>,
    Json(booking): Json<NewReservation>,
) -> Result<Json<ReservationDetail>, AppError> {
    Ok(Json(create_reservation(state.catalog(), booking).await?))
}

/// Axum handler for `POST /api/reserva/crear/params`.
pub async fn create_reservation_params_handler(
    State(state): State<crate::app::AppState>,
    Query(params): Query<CreateParams>,
) -> Result<Json<ReservationDetail>, AppError> {
    let booking = params.into_booking()?;
    Ok(Json(create_reservation(state.catalog(), booking).await?))
}

/// Axum handler for `PUT /api/reserva/actualizar/params`.
pub async fn update_reservation_params_handler(
    State(state): State<crate::app::AppState>,
    Query(params): Query<UpdateParams>,
) -> Result<Json<ReservationDetail>, AppError> {
    let id = parse_id(&params.id_reserva)?;
    let booking = CreateParams {
        id_vuelo: params.id_vuelo,
        id_pasajero: params.id_pasajero,
        asiento: params.asiento,
    }
    .into_booking()?;
    Ok(Json(update_reservation(state.catalog(), id, booking).await?))
}

/// Axum handler for `DELETE /api/reserva/borrar/{id}`.
pub async fn delete_reservation_handler(
    State(state): State<crate::app::AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = parse_id(&id)?;
    delete_reservation(state.catalog(), id).await?;
    Ok(Json(MessageResponse {
        message: RESERVATION_DELETED.to_string(),
    }))
}
