use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::api::params::{parse_date, parse_id};
use crate::db::models::{required_text, Flight, NewFlight};
use crate::db::repository::{FlightRepository, ReservationRepository};
use crate::error::AppError;

pub const FLIGHT_NOT_FOUND: &str = "Vuelo con las características indicadas no encontrado";

/// Filter for the origin/destination/date flight search.
#[derive(Debug, Clone)]
pub struct FlightSearch {
    pub origin: String,
    pub destination: String,
    pub date: NaiveDate,
}

/// Query string of `GET /api/vuelo/buscar` and `GET /vuelo/params`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FlightSearchQuery {
    pub origen: String,
    pub destino: String,
    pub fecha: String,
}

impl FlightSearchQuery {
    pub fn parse(&self) -> Result<FlightSearch, AppError> {
        Ok(FlightSearch {
            origin: self.origen.clone(),
            destination: self.destino.clone(),
            date: parse_date("fecha", &self.fecha)?,
        })
    }
}

fn validate(flight: NewFlight) -> Result<NewFlight, AppError> {
    Ok(NewFlight {
        origin: required_text("origin", &flight.origin)?,
        destination: required_text("destination", &flight.destination)?,
        date: flight.date,
    })
}

pub async fn list_flights(repo: &dyn FlightRepository) -> Result<Vec<Flight>, AppError> {
    repo.list().await
}

pub async fn get_flight(repo: &dyn FlightRepository, id: i64) -> Result<Flight, AppError> {
    repo.find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(FLIGHT_NOT_FOUND.into()))
}

pub async fn create_flight(
    repo: &dyn FlightRepository,
    flight: NewFlight,
) -> Result<Flight, AppError> {
    let flight = repo.insert(validate(flight)?).await?;
    tracing::info!(flight_id = flight.id, origin = %flight.origin, destination = %flight.destination, "Flight created");
    Ok(flight)
}

/// Replace the flight identified by `flight.id`.
pub async fn update_flight(repo: &dyn FlightRepository, flight: Flight) -> Result<Flight, AppError> {
    let id = flight.id;
    let checked = validate(NewFlight {
        origin: flight.origin,
        destination: flight.destination,
        date: flight.date,
    })?
    .with_id(id);

    if !repo.update(checked.clone()).await? {
        return Err(AppError::NotFound(FLIGHT_NOT_FOUND.into()));
    }
    tracing::info!(flight_id = id, "Flight updated");
    Ok(checked)
}

/// Delete a flight. Flights that still carry reservations are kept.
pub async fn delete_flight(
    flights: &dyn FlightRepository,
    reservations: &dyn ReservationRepository,
    id: i64,
) -> Result<(), AppError> {
    if flights.find_by_id(id).await?.is_none() {
        return Err(AppError::NotFound(FLIGHT_NOT_FOUND.into()));
    }

    let booked = reservations.find_by_flight(id).await?;
    if !booked.is_empty() {
        tracing::warn!(flight_id = id, reservations = booked.len(), "Refusing to delete booked flight");
        return Err(AppError::Conflict(format!(
            "El vuelo {id} tiene {} reserva(s) asociada(s)",
            booked.len()
        )));
    }

    if !flights.delete(id).await? {
        return Err(AppError::NotFound(FLIGHT_NOT_FOUND.into()));
    }
    tracing::info!(flight_id = id, "Flight deleted");
    Ok(())
}

/// Flights matching origin and destination (case-insensitive) on an exact date.
///
/// An empty result is reported as `NotFound`.
pub async fn search_flights(
    repo: &dyn FlightRepository,
    search: &FlightSearch,
) -> Result<Vec<Flight>, AppError> {
    let origin = search.origin.trim().to_lowercase();
    let destination = search.destination.trim().to_lowercase();

    let matches: Vec<Flight> = repo
        .list()
        .await?
        .into_iter()
        .filter(|f| f.origin.to_lowercase() == origin)
        .filter(|f| f.destination.to_lowercase() == destination)
        .filter(|f| f.date == search.date)
        .collect();

    if matches.is_empty() {
        return Err(AppError::NotFound(FLIGHT_NOT_FOUND.into()));
    }
    Ok(matches)
}

/// Axum handler for `GET /api/vuelo`.
pub async fn list_flights_handler(
    State(state): State<crate::app::AppState>,
) -> Result<Json<Vec<Flight>>, AppError> {
    Ok(Json(list_flights(state.flight_repo.as_ref()).await?))
}

/// Axum handler for `GET /api/vuelo/{id}`.
pub async fn get_flight_handler(
    State(state): State<crate::app::AppState>,
    Path(id): Path<String>,
) -> Result<Json<Flight>, AppError> {
    let id = parse_id(&id)?;
    Ok(Json(get_flight(state.flight_repo.as_ref(), id).await?))
}

/// Axum handler for `GET /api/vuelo/buscar`.
pub async fn search_flights_handler(
    State(state): State<crate::app::AppState>,
    Query(query): Query<FlightSearchQuery>,
) -> Result<Json<Vec<Flight>>, AppError> {
    let search = query.parse()?;
    Ok(Json(search_flights(state.flight_repo.as_ref(), &search).await?))
}

/// Axum handler for `POST /api/vuelo`.
pub async fn create_flight_handler(
    State(state): State<crate::app::AppState>,
    Json(flight): Json<NewFlight>,
) -> Result<(StatusCode, Json<Flight>), AppError> {
    let created = create_flight(state.flight_repo.as_ref(), flight).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Axum handler for `PUT /api/vuelo`.
pub async fn update_flight_handler(
    State(state): State<crate::app::AppState>,
    Json(flight): Json<Flight>,
) -> Result<Json<Flight>, AppError> {
    Ok(Json(update_flight(state.flight_repo.as_ref(), flight).await?))
}

/// Axum handler for `DELETE /api/vuelo/{id}`.
pub async fn delete_flight_handler(
    State(state): State<crate::app::AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;
    delete_flight(
        state.flight_repo.as_ref(),
        state.reservation_repo.as_ref(),
        id,
    )
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
