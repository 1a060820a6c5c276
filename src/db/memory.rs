use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::db::models::{Flight, NewFlight, NewPassenger, NewReservation, Passenger, Reservation};
use crate::db::repository::{FlightRepository, PassengerRepository, ReservationRepository};
use crate::error::AppError;

struct Table<T> {
    rows: BTreeMap<i64, T>,
    last_id: i64,
}

/// Process-local table keyed by id. Ids are never reused, even after deletes.
struct MemoryStore<T> {
    table: Mutex<Table<T>>,
}

impl<T: Clone> MemoryStore<T> {
    fn new() -> Self {
        Self {
            table: Mutex::new(Table {
                rows: BTreeMap::new(),
                last_id: 0,
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Table<T>>, AppError> {
        self.table
            .lock()
            .map_err(|_| AppError::Database("in-memory store lock poisoned".into()))
    }

    fn list_where(&self, keep: impl Fn(&T) -> bool) -> Result<Vec<T>, AppError> {
        Ok(self.lock()?.rows.values().filter(|r| keep(r)).cloned().collect())
    }

    fn get(&self, id: i64) -> Result<Option<T>, AppError> {
        Ok(self.lock()?.rows.get(&id).cloned())
    }

    fn insert_with(&self, build: impl FnOnce(i64) -> T) -> Result<T, AppError> {
        let mut table = self.lock()?;
        table.last_id += 1;
        let id = table.last_id;
        let row = build(id);
        table.rows.insert(id, row.clone());
        Ok(row)
    }

    fn replace(&self, id: i64, row: T) -> Result<bool, AppError> {
        let mut table = self.lock()?;
        match table.rows.get_mut(&id) {
            Some(slot) => {
                *slot = row;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn remove(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.lock()?.rows.remove(&id).is_some())
    }
}

/// In-memory implementation of the FlightRepository.
pub struct MemoryFlightRepository {
    store: MemoryStore<Flight>,
}

impl MemoryFlightRepository {
    pub fn new() -> Self {
        Self {
            store: MemoryStore::new(),
        }
    }
}

impl Default for MemoryFlightRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FlightRepository for MemoryFlightRepository {
    async fn list(&self) -> Result<Vec<Flight>, AppError> {
        self.store.list_where(|_| true)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Flight>, AppError> {
        self.store.get(id)
    }

    async fn insert(&self, flight: NewFlight) -> Result<Flight, AppError> {
        self.store.insert_with(|id| flight.with_id(id))
    }

    async fn update(&self, flight: Flight) -> Result<bool, AppError> {
        self.store.replace(flight.id, flight)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        self.store.remove(id)
    }
}

/// In-memory implementation of the PassengerRepository.
pub struct MemoryPassengerRepository {
    store: MemoryStore<Passenger>,
}

impl MemoryPassengerRepository {
    pub fn new() -> Self {
        Self {
            store: MemoryStore::new(),
        }
    }
}

impl Default for MemoryPassengerRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PassengerRepository for MemoryPassengerRepository {
    async fn list(&self) -> Result<Vec<Passenger>, AppError> {
        self.store.list_where(|_| true)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Passenger>, AppError> {
        self.store.get(id)
    }

    async fn insert(&self, passenger: NewPassenger) -> Result<Passenger, AppError> {
        self.store.insert_with(|id| passenger.with_id(id))
    }

    async fn update(&self, passenger: Passenger) -> Result<bool, AppError> {
        self.store.replace(passenger.id, passenger)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        self.store.remove(id)
    }
}

/// In-memory implementation of the ReservationRepository.
pub struct MemoryReservationRepository {
    store: MemoryStore<Reservation>,
}

impl MemoryReservationRepository {
    pub fn new() -> Self {
        Self {
            store: MemoryStore::new(),
        }
    }
}

impl Default for MemoryReservationRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReservationRepository for MemoryReservationRepository {
    async fn list(&self) -> Result<Vec<Reservation>, AppError> {
        self.store.list_where(|_| true)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Reservation>, AppError> {
        self.store.get(id)
    }

    async fn find_by_flight(&self, flight_id: i64) -> Result<Vec<Reservation>, AppError> {
        self.store.list_where(|r| r.flight_id == flight_id)
    }

    async fn find_by_passenger(&self, passenger_id: i64) -> Result<Vec<Reservation>, AppError> {
        self.store.list_where(|r| r.passenger_id == passenger_id)
    }

    async fn insert(&self, reservation: NewReservation) -> Result<Reservation, AppError> {
        self.store.insert_with(|id| reservation.with_id(id))
    }

    async fn update(&self, reservation: Reservation) -> Result<bool, AppError> {
        self.store.replace(reservation.id, reservation)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        self.store.remove(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn new_flight(origin: &str) -> NewFlight {
        NewFlight {
            origin: origin.to_string(),
            destination: "Lima".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_ids_are_sequential_and_not_reused() {
        let repo = MemoryFlightRepository::new();
        let a = repo.insert(new_flight("Madrid")).await.unwrap();
        let b = repo.insert(new_flight("Sevilla")).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));

        assert!(repo.delete(b.id).await.unwrap());
        let c = repo.insert(new_flight("Vigo")).await.unwrap();
        assert_eq!(c.id, 3);
    }

    #[tokio::test]
    async fn test_update_missing_returns_false() {
        let repo = MemoryFlightRepository::new();
        let ghost = new_flight("Madrid").with_id(42);
        assert!(!repo.update(ghost).await.unwrap());
        assert!(!repo.delete(42).await.unwrap());
    }

    #[tokio::test]
    async fn test_reservations_filter_by_reference() {
        let repo = MemoryReservationRepository::new();
        for (flight_id, passenger_id, seat) in [(1, 1, "1A"), (2, 1, "2B"), (1, 2, "1C")] {
            repo.insert(NewReservation {
                flight_id,
                passenger_id,
                seat: seat.to_string(),
            })
            .await
            .unwrap();
        }

        let on_flight: Vec<String> = repo
            .find_by_flight(1)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.seat)
            .collect();
        assert_eq!(on_flight, vec!["1A", "1C"]);

        let held = repo.find_by_passenger(1).await.unwrap();
        assert_eq!(held.len(), 2);
        assert!(repo.find_by_passenger(9).await.unwrap().is_empty());
    }
}
