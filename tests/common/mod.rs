#![allow(dead_code)]

use axum::Router;
use serde_json::{json, Value};

use agencia::app::{build_router, AppState};

/// Router over fresh in-memory repositories.
///
/// Every test builds its own environment, so ids always start at 1.
pub struct TestEnv {
    pub state: AppState,
    pub router: Router,
}

impl TestEnv {
    pub fn start() -> Self {
        let state = AppState::in_memory().expect("Failed to build in-memory state");
        let router = build_router(state.clone());
        Self { state, router }
    }

    /// Build an `axum_test::TestServer` from this environment's router.
    pub fn server(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .expect_success_by_default()
            .build(self.router.clone())
    }

    /// Build a `TestServer` that does NOT expect success by default (for error tests).
    pub fn server_permissive(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .build(self.router.clone())
    }

    /// Helper: create a flight via the API and return its JSON.
    pub async fn create_flight(
        &self,
        server: &axum_test::TestServer,
        origin: &str,
        destination: &str,
        date: &str,
    ) -> Value {
        server
            .post("/api/vuelo")
            .json(&json!({
                "origin": origin,
                "destination": destination,
                "date": date,
            }))
            .await
            .json()
    }

    /// Helper: create a passenger via the API and return its JSON.
    pub async fn create_passenger(
        &self,
        server: &axum_test::TestServer,
        first_name: &str,
        last_name: &str,
    ) -> Value {
        server
            .post("/api/pasajero")
            .json(&json!({
                "first_name": first_name,
                "last_name": last_name,
                "birth_date": "1990-05-04",
            }))
            .await
            .json()
    }

    /// Helper: book a seat via the API and return the reservation detail.
    pub async fn create_reservation(
        &self,
        server: &axum_test::TestServer,
        flight_id: i64,
        passenger_id: i64,
        seat: &str,
    ) -> Value {
        server
            .post("/api/reserva")
            .json(&json!({
                "flight_id": flight_id,
                "passenger_id": passenger_id,
                "seat": seat,
            }))
            .await
            .json()
    }
}
