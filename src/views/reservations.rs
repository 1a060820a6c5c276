//! HTML pages for reservations, including the three list views the search
//! form redirects to.

use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Form;
use serde::Deserialize;
use tera::Context;

use crate::api::flights::list_flights;
use crate::api::params::parse_id_or;
use crate::api::passengers::list_passengers;
use crate::api::reservations::{
    create_reservation, delete_reservation, get_reservation, list_reservations,
    reservations_by_flight, reservations_by_id, reservations_by_passenger, update_reservation,
    RESERVATION_DELETED,
};
use crate::app::AppState;
use crate::db::models::{NewReservation, ReservationDetail};
use crate::error::AppError;

pub const INVALID_RESERVATION_ID: &str = "ID de Reserva no válido";
pub const INVALID_FLIGHT_ID: &str = "ID de Vuelo no válido";
pub const INVALID_PASSENGER_ID: &str = "ID de Pasajero no válido";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct IdQuery {
    pub id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BookingForm {
    pub id_vuelo: String,
    pub id_pasajero: String,
    pub asiento: String,
}

impl BookingForm {
    fn parse(self) -> Result<NewReservation, AppError> {
        Ok(NewReservation {
            flight_id: parse_id_or(&self.id_vuelo, INVALID_FLIGHT_ID)?,
            passenger_id: parse_id_or(&self.id_pasajero, INVALID_PASSENGER_ID)?,
            seat: self.asiento,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RebookingForm {
    pub id_reserva: String,
    pub id_vuelo: String,
    pub id_pasajero: String,
    pub asiento: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReservationIdForm {
    pub id_reserva: String,
}

fn list_page(
    state: &AppState,
    heading: &str,
    reservations: &[ReservationDetail],
) -> Result<Response, AppError> {
    let mut ctx = Context::new();
    ctx.insert("heading", heading);
    ctx.insert("reservations", reservations);
    state.templates.render("reservations.html", &ctx)
}

fn detail_context(detail: &ReservationDetail) -> Context {
    let mut ctx = Context::new();
    ctx.insert("reservation", detail);
    ctx
}

/// `GET /reserva`
pub async fn list_page_handler(State(state): State<AppState>) -> Response {
    let result = async {
        let all = list_reservations(state.catalog()).await?;
        list_page(&state, "Reservas", &all)
    }
    .await;
    state.templates.or_error_page(result)
}

/// `GET /reserva/id?id=N`
pub async fn detail_page_handler(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Response {
    let result = async {
        let id = parse_id_or(&query.id, INVALID_RESERVATION_ID)?;
        let detail = get_reservation(state.catalog(), id).await?;
        state
            .templates
            .render("reservation.html", &detail_context(&detail))
    }
    .await;
    state.templates.or_error_page(result)
}

/// `GET /reserva/mostrar/idreserva/{id}`
pub async fn by_id_page_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let result = async {
        let id = parse_id_or(&id, INVALID_RESERVATION_ID)?;
        let found = reservations_by_id(state.catalog(), id).await?;
        list_page(&state, &format!("Reserva {id}"), &found)
    }
    .await;
    state.templates.or_error_page(result)
}

/// `GET /reserva/mostrar/idvuelo/{id}`
pub async fn by_flight_page_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let result = async {
        let id = parse_id_or(&id, INVALID_FLIGHT_ID)?;
        let found = reservations_by_flight(state.catalog(), id).await?;
        list_page(&state, &format!("Reservas del vuelo {id}"), &found)
    }
    .await;
    state.templates.or_error_page(result)
}

/// `GET /reserva/mostrar/idpasajero/{id}`
pub async fn by_passenger_page_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let result = async {
        let id = parse_id_or(&id, INVALID_PASSENGER_ID)?;
        let found = reservations_by_passenger(state.catalog(), id).await?;
        list_page(&state, &format!("Reservas del pasajero {id}"), &found)
    }
    .await;
    state.templates.or_error_page(result)
}

/// `GET /reserva/formcrear`: booking form with the flights and passengers to pick from.
pub async fn create_form_handler(State(state): State<AppState>) -> Response {
    let result = async {
        let mut ctx = Context::new();
        ctx.insert("flights", &list_flights(state.flight_repo.as_ref()).await?);
        ctx.insert(
            "passengers",
            &list_passengers(state.passenger_repo.as_ref()).await?,
        );
        state.templates.render("create_reservation.html", &ctx)
    }
    .await;
    state.templates.or_error_page(result)
}

/// `POST /reserva/crear`
pub async fn create_handler(
    State(state): State<AppState>,
    Form(form): Form<BookingForm>,
) -> Response {
    let result = async {
        let detail = create_reservation(state.catalog(), form.parse()?).await?;
        Ok::<_, AppError>(
            state
                .templates
                .message_page("Reserva creada correctamente.", detail_context(&detail)),
        )
    }
    .await;
    state.templates.or_error_page(result)
}

/// `POST /reserva/actualizar`
pub async fn update_handler(
    State(state): State<AppState>,
    Form(form): Form<RebookingForm>,
) -> Response {
    let result = async {
        let id = parse_id_or(&form.id_reserva, INVALID_RESERVATION_ID)?;
        let booking = BookingForm {
            id_vuelo: form.id_vuelo,
            id_pasajero: form.id_pasajero,
            asiento: form.asiento,
        }
        .parse()?;
        let detail = update_reservation(state.catalog(), id, booking).await?;
        Ok::<_, AppError>(state.templates.message_page(
            "Reserva actualizada correctamente.",
            detail_context(&detail),
        ))
    }
    .await;
    state.templates.or_error_page(result)
}

/// `POST /reserva/borrar`
pub async fn delete_handler(
    State(state): State<AppState>,
    Form(form): Form<ReservationIdForm>,
) -> Response {
    let result = async {
        let id = parse_id_or(&form.id_reserva, INVALID_RESERVATION_ID)?;
        delete_reservation(state.catalog(), id).await?;
        Ok::<_, AppError>(
            state
                .templates
                .message_page(RESERVATION_DELETED, Context::new()),
        )
    }
    .await;
    state.templates.or_error_page(result)
}
