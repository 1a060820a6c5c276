use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::params::parse_id;
use crate::db::models::{required_text, NewPassenger, Passenger};
use crate::db::repository::{PassengerRepository, ReservationRepository};
use crate::error::AppError;

pub const PASSENGER_NOT_FOUND: &str = "El pasajero con el ID introducido no fue encontrado";

fn validate(passenger: NewPassenger) -> Result<NewPassenger, AppError> {
    Ok(NewPassenger {
        first_name: required_text("first_name", &passenger.first_name)?,
        last_name: required_text("last_name", &passenger.last_name)?,
        birth_date: passenger.birth_date,
    })
}

pub async fn list_passengers(repo: &dyn PassengerRepository) -> Result<Vec<Passenger>, AppError> {
    repo.list().await
}

pub async fn get_passenger(repo: &dyn PassengerRepository, id: i64) -> Result<Passenger, AppError> {
    repo.find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(PASSENGER_NOT_FOUND.into()))
}

pub async fn create_passenger(
    repo: &dyn PassengerRepository,
    passenger: NewPassenger,
) -> Result<Passenger, AppError> {
    let passenger = repo.insert(validate(passenger)?).await?;
    tracing::info!(passenger_id = passenger.id, "Passenger created");
    Ok(passenger)
}

pub async fn update_passenger(
    repo: &dyn PassengerRepository,
    passenger: Passenger,
) -> Result<Passenger, AppError> {
    let id = passenger.id;
    let checked = validate(NewPassenger {
        first_name: passenger.first_name,
        last_name: passenger.last_name,
        birth_date: passenger.birth_date,
    })?
    .with_id(id);

    if !repo.update(checked.clone()).await? {
        return Err(AppError::NotFound(PASSENGER_NOT_FOUND.into()));
    }
    tracing::info!(passenger_id = id, "Passenger updated");
    Ok(checked)
}

/// Delete a passenger that holds no reservations.
pub async fn delete_passenger(
    passengers: &dyn PassengerRepository,
    reservations: &dyn ReservationRepository,
    id: i64,
) -> Result<(), AppError> {
    if passengers.find_by_id(id).await?.is_none() {
        return Err(AppError::NotFound(PASSENGER_NOT_FOUND.into()));
    }

    let held = reservations.find_by_passenger(id).await?;
    if !held.is_empty() {
        tracing::warn!(passenger_id = id, reservations = held.len(), "Refusing to delete passenger with reservations");
        return Err(AppError::Conflict(format!(
            "El pasajero {id} tiene {} reserva(s) asociada(s)",
            held.len()
        )));
    }

    if !passengers.delete(id).await? {
        return Err(AppError::NotFound(PASSENGER_NOT_FOUND.into()));
    }
    tracing::info!(passenger_id = id, "Passenger deleted");
    Ok(())
}

/// Axum handler for `GET /api/pasajero`.
pub async fn list_passengers_handler(
    State(state): State<crate::app::AppState>,
) -> Result<Json<Vec<Passenger>>, AppError> {
    Ok(Json(list_passengers(state.passenger_repo.as_ref()).await?))
}

/// Axum handler for `GET /api/pasajero/{id}`.
pub async fn get_passenger_handler(
    State(state): State<crate::app::AppState>,
    Path(id): Path<String>,
) -> Result<Json<Passenger>, AppError> {
    let id = parse_id(&id)?;
    Ok(Json(get_passenger(state.passenger_repo.as_ref(), id).await?))
}

/// Axum handler for `POST /api/pasajero`.
pub async fn create_passenger_handler(
    State(state): State<crate::app::AppState>,
    Json(passenger): Json<NewPassenger>,
) -> Result<Json<Passenger>, AppError> {
    Ok(Json(
        create_passenger(state.passenger_repo.as_ref(), passenger).await?,
    ))
}

/// Axum handler for `PUT /api/pasajero`.
pub async fn update_passenger_handler(
    State(state): State<crate::app::AppState>,
    Json(passenger): Json<Passenger>,
) -> Result<Json<Passenger>, AppError> {
    Ok(Json(
        update_passenger(state.passenger_repo.as_ref(), passenger).await?,
    ))
}

/// Axum handler for `DELETE /api/pasajero/{id}`.
pub async fn delete_passenger_handler(
    State(state): State<crate::app::AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;
    delete_passenger(
        state.passenger_repo.as_ref(),
        state.reservation_repo.as_ref(),
        id,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Axum handler for `POST /api/pasajero/borrar`: delete by the id inside the body.
pub async fn delete_passenger_by_body_handler(
    State(state): State<crate::app::AppState>,
    Json(passenger): Json<Passenger>,
) -> Result<StatusCode, AppError> {
    delete_passenger(
        state.passenger_repo.as_ref(),
        state.reservation_repo.as_ref(),
        passenger.id,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
