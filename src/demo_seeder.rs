use chrono::NaiveDate;

use crate::app::AppState;
use crate::db::models::{NewFlight, NewPassenger};
use crate::error::AppError;

const DEMO_FLIGHTS: &[(&str, &str, &str)] = &[
    ("Madrid", "Paris", "2024-09-01"),
    ("Madrid", "Roma", "2024-09-01"),
    ("Barcelona", "Lima", "2024-10-15"),
    ("Sevilla", "Madrid", "2024-11-20"),
];

const DEMO_PASSENGERS: &[(&str, &str, &str)] = &[
    ("Juan", "García", "1985-11-02"),
    ("Lucía", "Fernández", "1992-04-17"),
    ("Carlos", "Ruiz", "1978-07-30"),
];

fn date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| AppError::Internal(format!("Invalid demo date '{raw}': {e}")))
}

/// Insert sample flights and passengers. Collections that already hold data
/// are left untouched.
pub async fn seed_demo_data(state: &AppState) -> Result<(), AppError> {
    tracing::info!("Starting demo data seeding...");

    if state.flight_repo.list().await?.is_empty() {
        for (origin, destination, day) in DEMO_FLIGHTS {
            let flight = state
                .flight_repo
                .insert(NewFlight {
                    origin: origin.to_string(),
                    destination: destination.to_string(),
                    date: date(day)?,
                })
                .await?;
            tracing::info!(flight_id = flight.id, "Seeded flight {} -> {}", origin, destination);
        }
    } else {
        tracing::info!("Flights already present, skipping.");
    }

    if state.passenger_repo.list().await?.is_empty() {
        for (first_name, last_name, born) in DEMO_PASSENGERS {
            let passenger = state
                .passenger_repo
                .insert(NewPassenger {
                    first_name: first_name.to_string(),
                    last_name: last_name.to_string(),
                    birth_date: date(born)?,
                })
                .await?;
            tracing::info!(passenger_id = passenger.id, "Seeded passenger {}", first_name);
        }
    } else {
        tracing::info!("Passengers already present, skipping.");
    }

    tracing::info!("Demo data seeding completed.");
    Ok(())
}
