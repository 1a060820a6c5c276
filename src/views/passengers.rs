use axum::extract::{Query, State};
use axum::response::Response;
use axum::Form;
use serde::Deserialize;
use tera::Context;

use crate::api::params::{parse_date, parse_id_or};
use crate::api::passengers::{
    create_passenger, delete_passenger, get_passenger, list_passengers, update_passenger,
};
use crate::app::AppState;
use crate::db::models::{NewPassenger, Passenger};
use crate::error::AppError;
use crate::views::reservations::{IdQuery, INVALID_PASSENGER_ID};

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PassengerForm {
    pub id: String,
    pub nombre: String,
    pub apellido: String,
    pub fecha_nacimiento: String,
}

impl PassengerForm {
    fn parse_new(&self) -> Result<NewPassenger, AppError> {
        Ok(NewPassenger {
            first_name: self.nombre.clone(),
            last_name: self.apellido.clone(),
            birth_date: parse_date("fechaNacimiento", &self.fecha_nacimiento)?,
        })
    }

    fn parse_existing(&self) -> Result<Passenger, AppError> {
        let id = parse_id_or(&self.id, INVALID_PASSENGER_ID)?;
        Ok(self.parse_new()?.with_id(id))
    }
}

fn passenger_context(passenger: &Passenger) -> Context {
    let mut ctx = Context::new();
    ctx.insert("passenger", passenger);
    ctx
}

/// `GET /pasajero`
pub async fn list_page_handler(State(state): State<AppState>) -> Response {
    let result = async {
        let mut ctx = Context::new();
        ctx.insert("heading", "Pasajeros");
        ctx.insert(
            "passengers",
            &list_passengers(state.passenger_repo.as_ref()).await?,
        );
        state.templates.render("passengers.html", &ctx)
    }
    .await;
    state.templates.or_error_page(result)
}

/// `GET /pasajero/id?id=N`
pub async fn detail_page_handler(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Response {
    let result = async {
        let id = parse_id_or(&query.id, INVALID_PASSENGER_ID)?;
        let passenger = get_passenger(state.passenger_repo.as_ref(), id).await?;
        state
            .templates
            .render("passenger.html", &passenger_context(&passenger))
    }
    .await;
    state.templates.or_error_page(result)
}

/// `GET /pasajero/formbuscar`
pub async fn search_form_handler(State(state): State<AppState>) -> Response {
    let result = state
        .templates
        .render("search_passenger.html", &Context::new());
    state.templates.or_error_page(result)
}

/// `GET /pasajero/formcrear`
pub async fn create_form_handler(State(state): State<AppState>) -> Response {
    let result = state
        .templates
        .render("create_passenger.html", &Context::new());
    state.templates.or_error_page(result)
}

/// `POST /pasajero/crear`
pub async fn create_handler(
    State(state): State<AppState>,
    Form(form): Form<PassengerForm>,
) -> Response {
    let result = async {
        let passenger =
            create_passenger(state.passenger_repo.as_ref(), form.parse_new()?).await?;
        Ok::<_, AppError>(state.templates.message_page(
            "Pasajero creado correctamente.",
            passenger_context(&passenger),
        ))
    }
    .await;
    state.templates.or_error_page(result)
}

/// `POST /pasajero/actualizar`
pub async fn update_handler(
    State(state): State<AppState>,
    Form(form): Form<PassengerForm>,
) -> Response {
    let result = async {
        let passenger =
            update_passenger(state.passenger_repo.as_ref(), form.parse_existing()?).await?;
        Ok::<_, AppError>(state.templates.message_page(
            "Pasajero actualizado correctamente.",
            passenger_context(&passenger),
        ))
    }
    .await;
    state.templates.or_error_page(result)
}

/// `POST /pasajero/borrar`
pub async fn delete_handler(
    State(state): State<AppState>,
    Form(form): Form<IdQuery>,
) -> Response {
    let result = async {
        let id = parse_id_or(&form.id, INVALID_PASSENGER_ID)?;
        delete_passenger(
            state.passenger_repo.as_ref(),
            state.reservation_repo.as_ref(),
            id,
        )
        .await?;
        Ok::<_, AppError>(
            state
                .templates
                .message_page("Pasajero eliminado correctamente.", Context::new()),
        )
    }
    .await;
    state.templates.or_error_page(result)
}
