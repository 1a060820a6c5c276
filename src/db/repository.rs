use async_trait::async_trait;

use crate::db::models::{Flight, NewFlight, NewPassenger, NewReservation, Passenger, Reservation};
use crate::error::AppError;

/// Repository trait for flight operations.
///
/// This trait allows mocking the database layer in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FlightRepository: Send + Sync {
    /// List every flight, ordered by id.
    async fn list(&self) -> Result<Vec<Flight>, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Flight>, AppError>;

    /// Store a new flight under a freshly assigned id.
    async fn insert(&self, flight: NewFlight) -> Result<Flight, AppError>;

    /// Replace an existing flight. Returns `false` when no flight has that id.
    async fn update(&self, flight: Flight) -> Result<bool, AppError>;

    /// Returns `false` when no flight has that id.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;
}

/// Repository trait for passenger operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PassengerRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Passenger>, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Passenger>, AppError>;

    async fn insert(&self, passenger: NewPassenger) -> Result<Passenger, AppError>;

    async fn update(&self, passenger: Passenger) -> Result<bool, AppError>;

    async fn delete(&self, id: i64) -> Result<bool, AppError>;
}

/// Repository trait for reservation operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Reservation>, AppError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Reservation>, AppError>;

    /// Reservations booked on the given flight, ordered by id.
    async fn find_by_flight(&self, flight_id: i64) -> Result<Vec<Reservation>, AppError>;

    /// Reservations held by the given passenger, ordered by id.
    async fn find_by_passenger(&self, passenger_id: i64) -> Result<Vec<Reservation>, AppError>;

    async fn insert(&self, reservation: NewReservation) -> Result<Reservation, AppError>;

    async fn update(&self, reservation: Reservation) -> Result<bool, AppError>;

    async fn delete(&self, id: i64) -> Result<bool, AppError>;
}

pub const FLIGHTS_COLLECTION: &str = "flights";
pub const PASSENGERS_COLLECTION: &str = "passengers";
pub const RESERVATIONS_COLLECTION: &str = "reservations";
const COUNTERS_COLLECTION: &str = "counters";

fn db_err(e: mongodb::error::Error) -> AppError {
    AppError::Database(e.to_string())
}

/// A MongoDB collection of entities keyed by a numeric `id` field.
///
/// Ids come from a per-collection sequence document in `counters`, bumped
/// atomically with `$inc`.
struct MongoStore<T: Send + Sync> {
    collection: mongodb::Collection<T>,
    counters: mongodb::Collection<mongodb::bson::Document>,
    sequence: &'static str,
}

impl<T> MongoStore<T>
where
    T: serde::Serialize + serde::de::DeserializeOwned + Unpin + Send + Sync,
{
    fn new(db: &mongodb::Database, name: &'static str) -> Self {
        Self {
            collection: db.collection(name),
            counters: db.collection(COUNTERS_COLLECTION),
            sequence: name,
        }
    }

    async fn next_id(&self) -> Result<i64, AppError> {
        use mongodb::bson::doc;
        use mongodb::options::{FindOneAndUpdateOptions, ReturnDocument};

        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();

        let counter = self
            .counters
            .find_one_and_update(
                doc! { "_id": self.sequence },
                doc! { "$inc": { "seq": 1_i64 } },
            )
            .with_options(options)
            .await
            .map_err(db_err)?;

        counter
            .and_then(|c| c.get_i64("seq").ok())
            .ok_or_else(|| {
                AppError::Database(format!("Sequence '{}' returned no value", self.sequence))
            })
    }

    async fn find_many(&self, filter: mongodb::bson::Document) -> Result<Vec<T>, AppError> {
        use futures::TryStreamExt;
        use mongodb::bson::doc;
        use mongodb::options::FindOptions;

        let options = FindOptions::builder().sort(doc! { "id": 1 }).build();

        let cursor = self
            .collection
            .find(filter)
            .with_options(options)
            .await
            .map_err(db_err)?;

        cursor.try_collect().await.map_err(db_err)
    }

    async fn find_one(&self, id: i64) -> Result<Option<T>, AppError> {
        use mongodb::bson::doc;

        self.collection
            .find_one(doc! { "id": id })
            .await
            .map_err(db_err)
    }

    async fn insert(&self, item: &T) -> Result<(), AppError> {
        self.collection.insert_one(item).await.map_err(db_err)?;
        Ok(())
    }

    async fn replace(&self, id: i64, item: &T) -> Result<bool, AppError> {
        use mongodb::bson::doc;

        let result = self
            .collection
            .replace_one(doc! { "id": id }, item)
            .await
            .map_err(db_err)?;
        Ok(result.matched_count > 0)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        use mongodb::bson::doc;

        let result = self
            .collection
            .delete_one(doc! { "id": id })
            .await
            .map_err(db_err)?;
        Ok(result.deleted_count > 0)
    }
}

/// Create the unique `id` index on every entity collection.
pub async fn ensure_indexes(db: &mongodb::Database) -> Result<(), AppError> {
    use mongodb::bson::doc;
    use mongodb::options::IndexOptions;
    use mongodb::IndexModel;

    for name in [
        FLIGHTS_COLLECTION,
        PASSENGERS_COLLECTION,
        RESERVATIONS_COLLECTION,
    ] {
        let index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        db.collection::<mongodb::bson::Document>(name)
            .create_index(index)
            .await
            .map_err(db_err)?;
    }

    let reservations = db.collection::<mongodb::bson::Document>(RESERVATIONS_COLLECTION);
    for key in ["flight_id", "passenger_id"] {
        let mut keys = mongodb::bson::Document::new();
        keys.insert(key, 1);
        let index = IndexModel::builder().keys(keys).build();
        reservations.create_index(index).await.map_err(db_err)?;
    }

    tracing::debug!("MongoDB indexes ensured");
    Ok(())
}

/// MongoDB implementation of the FlightRepository.
pub struct MongoFlightRepository {
    store: MongoStore<Flight>,
}

impl MongoFlightRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            store: MongoStore::new(db, FLIGHTS_COLLECTION),
        }
    }
}

#[async_trait]
impl FlightRepository for MongoFlightRepository {
    async fn list(&self) -> Result<Vec<Flight>, AppError> {
        self.store.find_many(mongodb::bson::Document::new()).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Flight>, AppError> {
        self.store.find_one(id).await
    }

    async fn insert(&self, flight: NewFlight) -> Result<Flight, AppError> {
        let flight = flight.with_id(self.store.next_id().await?);
        self.store.insert(&flight).await?;
        Ok(flight)
    }

    async fn update(&self, flight: Flight) -> Result<bool, AppError> {
        self.store.replace(flight.id, &flight).await
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        self.store.delete(id).await
    }
}

/// MongoDB implementation of the PassengerRepository.
pub struct MongoPassengerRepository {
    store: MongoStore<Passenger>,
}

impl MongoPassengerRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            store: MongoStore::new(db, PASSENGERS_COLLECTION),
        }
    }
}

#[async_trait]
impl PassengerRepository for MongoPassengerRepository {
    async fn list(&self) -> Result<Vec<Passenger>, AppError> {
        self.store.find_many(mongodb::bson::Document::new()).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Passenger>, AppError> {
        self.store.find_one(id).await
    }

    async fn insert(&self, passenger: NewPassenger) -> Result<Passenger, AppError> {
        let passenger = passenger.with_id(self.store.next_id().await?);
        self.store.insert(&passenger).await?;
        Ok(passenger)
    }

    async fn update(&self, passenger: Passenger) -> Result<bool, AppError> {
        self.store.replace(passenger.id, &passenger).await
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        self.store.delete(id).await
    }
}

/// MongoDB implementation of the ReservationRepository.
pub struct MongoReservationRepository {
    store: MongoStore<Reservation>,
}

impl MongoReservationRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            store: MongoStore::new(db, RESERVATIONS_COLLECTION),
        }
    }
}

#[async_trait]
impl ReservationRepository for MongoReservationRepository {
    async fn list(&self) -> Result<Vec<Reservation>, AppError> {
        self.store.find_many(mongodb::bson::Document::new()).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Reservation>, AppError> {
        self.store.find_one(id).await
    }

    async fn find_by_flight(&self, flight_id: i64) -> Result<Vec<Reservation>, AppError> {
        use mongodb::bson::doc;

        self.store.find_many(doc! { "flight_id": flight_id }).await
    }

    async fn find_by_passenger(&self, passenger_id: i64) -> Result<Vec<Reservation>, AppError> {
        use mongodb::bson::doc;

        self.store
            .find_many(doc! { "passenger_id": passenger_id })
            .await
    }

    async fn insert(&self, reservation: NewReservation) -> Result<Reservation, AppError> {
        let reservation = reservation.with_id(self.store.next_id().await?);
        self.store.insert(&reservation).await?;
        Ok(reservation)
    }

    async fn update(&self, reservation: Reservation) -> Result<bool, AppError> {
        self.store.replace(reservation.id, &reservation).await
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        self.store.delete(id).await
    }
}
