use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// A scheduled flight, stored in the `flights` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flight {
    /// Sequential identifier assigned on insert.
    pub id: i64,
    /// Departure city.
    pub origin: String,
    /// Arrival city.
    pub destination: String,
    /// Departure date.
    pub date: NaiveDate,
}

/// A flight that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFlight {
    pub origin: String,
    pub destination: String,
    pub date: NaiveDate,
}

impl NewFlight {
    pub fn with_id(self, id: i64) -> Flight {
        Flight {
            id,
            origin: self.origin,
            destination: self.destination,
            date: self.date,
        }
    }
}

/// A registered passenger, stored in the `passengers` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passenger {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPassenger {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
}

impl NewPassenger {
    pub fn with_id(self, id: i64) -> Passenger {
        Passenger {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            birth_date: self.birth_date,
        }
    }
}

/// A seat booked by a passenger on a flight.
///
/// Only the ids of the flight and passenger are stored; see
/// [`ReservationDetail`] for the resolved form served to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    pub seat: String,
    pub flight_id: i64,
    pub passenger_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewReservation {
    pub flight_id: i64,
    pub passenger_id: i64,
    pub seat: String,
}

impl NewReservation {
    pub fn with_id(self, id: i64) -> Reservation {
        Reservation {
            id,
            seat: self.seat,
            flight_id: self.flight_id,
            passenger_id: self.passenger_id,
        }
    }
}

/// A reservation with its flight and passenger resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReservationDetail {
    pub id: i64,
    pub seat: String,
    pub flight: Flight,
    pub passenger: Passenger,
}

/// Trim a required text field, rejecting blank values.
pub fn required_text(field: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest(format!(
            "El campo '{field}' no puede estar vacío"
        )));
    }
    Ok(trimmed.to_string())
}
