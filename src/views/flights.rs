use axum::extract::{Query, State};
use axum::response::Response;
use axum::Form;
use serde::Deserialize;
use tera::Context;

use crate::api::flights::{
    create_flight, delete_flight, get_flight, list_flights, search_flights, update_flight,
    FlightSearchQuery,
};
use crate::api::params::{parse_date, parse_id_or};
use crate::app::AppState;
use crate::db::models::{Flight, NewFlight};
use crate::error::AppError;
use crate::views::reservations::{IdQuery, INVALID_FLIGHT_ID};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FlightForm {
    pub id: String,
    pub origen: String,
    pub destino: String,
    pub fecha: String,
}

impl FlightForm {
    fn parse_new(&self) -> Result<NewFlight, AppError> {
        Ok(NewFlight {
            origin: self.origen.clone(),
            destination: self.destino.clone(),
            date: parse_date("fecha", &self.fecha)?,
        })
    }

    fn parse_existing(&self) -> Result<Flight, AppError> {
        let id = parse_id_or(&self.id, INVALID_FLIGHT_ID)?;
        Ok(self.parse_new()?.with_id(id))
    }
}

fn list_page(state: &AppState, heading: &str, flights: &[Flight]) -> Result<Response, AppError> {
    let mut ctx = Context::new();
    ctx.insert("heading", heading);
    ctx.insert("flights", flights);
    state.templates.render("flights.html", &ctx)
}

fn flight_context(flight: &Flight) -> Context {
    let mut ctx = Context::new();
    ctx.insert("flight", flight);
    ctx
}

/// `GET /vuelo`
pub async fn list_page_handler(State(state): State<AppState>) -> Response {
    let result = async {
        let all = list_flights(state.flight_repo.as_ref()).await?;
        list_page(&state, "Vuelos", &all)
    }
    .await;
    state.templates.or_error_page(result)
}

/// `GET /vuelo/id?id=N`
pub async fn detail_page_handler(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Response {
    let result = async {
        let id = parse_id_or(&query.id, INVALID_FLIGHT_ID)?;
        let flight = get_flight(state.flight_repo.as_ref(), id).await?;
        state.templates.render("flight.html", &flight_context(&flight))
    }
    .await;
    state.templates.or_error_page(result)
}

/// `GET /vuelo/formbuscar`
pub async fn search_form_handler(State(state): State<AppState>) -> Response {
    let result = state.templates.render("search_flight.html", &Context::new());
    state.templates.or_error_page(result)
}

/// `GET /vuelo/params?origen&destino&fecha`
pub async fn search_page_handler(
    State(state): State<AppState>,
    Query(query): Query<FlightSearchQuery>,
) -> Response {
    let result = async {
        let search = query.parse()?;
        let found = search_flights(state.flight_repo.as_ref(), &search).await?;
        let heading = format!(
            "Vuelos de {} a {} el {}",
            search.origin, search.destination, search.date
        );
        list_page(&state, &heading, &found)
    }
    .await;
    state.templates.or_error_page(result)
}

/// `GET /vuelo/formcrear`
pub async fn create_form_handler(State(state): State<AppState>) -> Response {
    let result = state.templates.render("create_flight.html", &Context::new());
    state.templates.or_error_page(result)
}

/// `POST /vuelo/crear`
pub async fn create_handler(
    State(state): State<AppState>,
    Form(form): Form<FlightForm>,
) -> Response {
    let result = async {
        let flight = create_flight(state.flight_repo.as_ref(), form.parse_new()?).await?;
        Ok::<_, AppError>(
            state
                .templates
                .message_page("Vuelo creado correctamente.", flight_context(&flight)),
        )
    }
    .await;
    state.templates.or_error_page(result)
}

/// `POST /vuelo/actualizar`
pub async fn update_handler(
    State(state): State<AppState>,
    Form(form): Form<FlightForm>,
) -> Response {
    let result = async {
        let flight = update_flight(state.flight_repo.as_ref(), form.parse_existing()?).await?;
        Ok::<_, AppError>(
            state
                .templates
                .message_page("Vuelo actualizado correctamente.", flight_context(&flight)),
        )
    }
    .await;
    state.templates.or_error_page(result)
}

/// `POST /vuelo/borrar`
pub async fn delete_handler(
    State(state): State<AppState>,
    Form(form): Form<IdQuery>,
) -> Response {
    let result = async {
        let id = parse_id_or(&form.id, INVALID_FLIGHT_ID)?;
        delete_flight(
            state.flight_repo.as_ref(),
            state.reservation_repo.as_ref(),
            id,
        )
        .await?;
        Ok::<_, AppError>(
            state
                .templates
                .message_page("Vuelo eliminado correctamente.", Context::new()),
        )
    }
    .await;
    state.templates.or_error_page(result)
}
