use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::api::reservations::Catalog;
use crate::db::memory::{
    MemoryFlightRepository, MemoryPassengerRepository, MemoryReservationRepository,
};
use crate::db::repository::{FlightRepository, PassengerRepository, ReservationRepository};
use crate::error::AppError;
use crate::rendering::templates::Templates;
use crate::{api, search, views};

/// Shared application state passed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub flight_repo: Arc<dyn FlightRepository>,
    pub passenger_repo: Arc<dyn PassengerRepository>,
    pub reservation_repo: Arc<dyn ReservationRepository>,
    pub templates: Arc<Templates>,
}

impl AppState {
    pub fn new(
        flight_repo: Arc<dyn FlightRepository>,
        passenger_repo: Arc<dyn PassengerRepository>,
        reservation_repo: Arc<dyn ReservationRepository>,
    ) -> Result<Self, AppError> {
        Ok(Self {
            flight_repo,
            passenger_repo,
            reservation_repo,
            templates: Arc::new(Templates::new()?),
        })
    }

    /// State backed by empty in-memory repositories.
    pub fn in_memory() -> Result<Self, AppError> {
        Self::new(
            Arc::new(MemoryFlightRepository::new()),
            Arc::new(MemoryPassengerRepository::new()),
            Arc::new(MemoryReservationRepository::new()),
        )
    }

    pub fn catalog(&self) -> Catalog<'_> {
        Catalog {
            flights: self.flight_repo.as_ref(),
            passengers: self.passenger_repo.as_ref(),
            reservations: self.reservation_repo.as_ref(),
        }
    }
}

fn api_routes() -> Router<AppState> {
    Router::new()
        // Flights
        .route(
            "/api/vuelo",
            get(api::flights::list_flights_handler)
                .post(api::flights::create_flight_handler)
                .put(api::flights::update_flight_handler),
        )
        .route("/api/vuelo/buscar", get(api::flights::search_flights_handler))
        .route(
            "/api/vuelo/{id}",
            get(api::flights::get_flight_handler).delete(api::flights::delete_flight_handler),
        )
        // Passengers
        .route(
            "/api/pasajero",
            get(api::passengers::list_passengers_handler)
                .post(api::passengers::create_passenger_handler)
                .put(api::passengers::update_passenger_handler),
        )
        .route(
            "/api/pasajero/borrar",
            post(api::passengers::delete_passenger_by_body_handler),
        )
        .route(
            "/api/pasajero/{id}",
            get(api::passengers::get_passenger_handler)
                .delete(api::passengers::delete_passenger_handler),
        )
        // Reservations
        .route("/api/reserva", post(api::reservations::create_reservation_handler))
        .route(
            "/api/reserva/mostrar",
            get(api::reservations::list_reservations_handler),
        )
        .route(
            "/api/reserva/mostrar/{id}",
            get(api::reservations::get_reservation_handler),
        )
        .route(
            "/api/reserva/mostrar/idreserva/{id}",
            get(api::reservations::reservations_by_id_handler),
        )
        .route(
            "/api/reserva/mostrar/idvuelo/{id}",
            get(api::reservations::reservations_by_flight_handler),
        )
        .route(
            "/api/reserva/mostrar/idpasajero/{id}",
            get(api::reservations::reservations_by_passenger_handler),
        )
        .route(
            "/api/reserva/crear/params",
            post(api::reservations::create_reservation_params_handler),
        )
        .route(
            "/api/reserva/actualizar/params",
            put(api::reservations::update_reservation_params_handler),
        )
        .route(
            "/api/reserva/borrar/{id}",
            delete(api::reservations::delete_reservation_handler),
        )
}

fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(views::home::home_handler))
        // Reservation search form
        .route("/reserva/formbuscar", get(search::form::search_form_handler))
        .route(
            "/reserva/formbuscar/campo",
            get(search::form::field_fragment_handler),
        )
        .route("/reserva/buscar", get(search::form::search_redirect_handler))
        // Reservations
        .route("/reserva", get(views::reservations::list_page_handler))
        .route("/reserva/id", get(views::reservations::detail_page_handler))
        .route(
            "/reserva/mostrar/idreserva/{id}",
            get(views::reservations::by_id_page_handler),
        )
        .route(
            "/reserva/mostrar/idvuelo/{id}",
            get(views::reservations::by_flight_page_handler),
        )
        .route(
            "/reserva/mostrar/idpasajero/{id}",
            get(views::reservations::by_passenger_page_handler),
        )
        .route(
            "/reserva/formcrear",
            get(views::reservations::create_form_handler),
        )
        .route("/reserva/crear", post(views::reservations::create_handler))
        .route(
            "/reserva/actualizar",
            post(views::reservations::update_handler),
        )
        .route("/reserva/borrar", post(views::reservations::delete_handler))
        // Flights
        .route("/vuelo", get(views::flights::list_page_handler))
        .route("/vuelo/id", get(views::flights::detail_page_handler))
        .route("/vuelo/formbuscar", get(views::flights::search_form_handler))
        .route("/vuelo/params", get(views::flights::search_page_handler))
        .route("/vuelo/formcrear", get(views::flights::create_form_handler))
        .route("/vuelo/crear", post(views::flights::create_handler))
        .route("/vuelo/actualizar", post(views::flights::update_handler))
        .route("/vuelo/borrar", post(views::flights::delete_handler))
        // Passengers
        .route("/pasajero", get(views::passengers::list_page_handler))
        .route("/pasajero/id", get(views::passengers::detail_page_handler))
        .route(
            "/pasajero/formbuscar",
            get(views::passengers::search_form_handler),
        )
        .route(
            "/pasajero/formcrear",
            get(views::passengers::create_form_handler),
        )
        .route("/pasajero/crear", post(views::passengers::create_handler))
        .route(
            "/pasajero/actualizar",
            post(views::passengers::update_handler),
        )
        .route("/pasajero/borrar", post(views::passengers::delete_handler))
}

/// Build the full router: JSON API, HTML pages and request tracing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api_routes())
        .merge(page_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn status_of(uri: &str) -> StatusCode {
        let router = build_router(AppState::in_memory().unwrap());
        router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_static_segments_win_over_ids() {
        // An empty search is a 404; matching `{id}` would have been a 400
        assert_eq!(
            status_of("/api/vuelo/buscar?origen=a&destino=b&fecha=2024-01-01").await,
            StatusCode::NOT_FOUND
        );
        assert_eq!(status_of("/api/reserva/mostrar/idvuelo/1").await, StatusCode::OK);
        assert_eq!(status_of("/reserva/formbuscar").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_no_trailing_slash_routes() {
        assert_eq!(status_of("/api/vuelo").await, StatusCode::OK);
        assert_eq!(status_of("/api/vuelo/").await, StatusCode::NOT_FOUND);
    }
}
