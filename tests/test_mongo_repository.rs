//! Repository tests against a real MongoDB. Requires Docker:
//! `cargo test --test test_mongo_repository -- --ignored`

use chrono::NaiveDate;
use testcontainers::runners::AsyncRunner;
use testcontainers::ContainerAsync;
use testcontainers_modules::mongo::Mongo;

use agencia::db::models::{NewFlight, NewPassenger, NewReservation, Passenger};
use agencia::db::repository::{
    ensure_indexes, FlightRepository, MongoFlightRepository, MongoPassengerRepository,
    MongoReservationRepository, PassengerRepository, ReservationRepository,
};

async fn start_mongo() -> (ContainerAsync<Mongo>, mongodb::Database) {
    let container = Mongo::default()
        .start()
        .await
        .expect("Failed to start MongoDB container");
    let port = container
        .get_host_port_ipv4(27017)
        .await
        .expect("Failed to get MongoDB port");
    let client = mongodb::Client::with_uri_str(format!("mongodb://127.0.0.1:{port}"))
        .await
        .expect("Failed to connect to MongoDB");
    let db = client.database("agencia_test");
    ensure_indexes(&db).await.expect("Failed to create indexes");
    (container, db)
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, d).unwrap()
}

#[tokio::test]
#[ignore = "needs Docker"]
async fn flights_get_sequential_ids_and_round_trip() {
    let (_mongo, db) = start_mongo().await;
    let repo = MongoFlightRepository::new(&db);

    let first = repo
        .insert(NewFlight {
            origin: "Madrid".to_string(),
            destination: "Paris".to_string(),
            date: day(1),
        })
        .await
        .unwrap();
    let second = repo
        .insert(NewFlight {
            origin: "Madrid".to_string(),
            destination: "Roma".to_string(),
            date: day(2),
        })
        .await
        .unwrap();
    assert_eq!((first.id, second.id), (1, 2));

    let mut changed = first.clone();
    changed.destination = "Berlin".to_string();
    assert!(repo.update(changed).await.unwrap());

    let stored = repo.find_by_id(first.id).await.unwrap().unwrap();
    assert_eq!(stored.destination, "Berlin");
    assert_eq!(stored.date, day(1));

    assert!(repo.delete(second.id).await.unwrap());
    assert!(!repo.delete(second.id).await.unwrap());
    let ids: Vec<i64> = repo.list().await.unwrap().iter().map(|f| f.id).collect();
    assert_eq!(ids, vec![1]);

    let third = repo
        .insert(NewFlight {
            origin: "Madrid".to_string(),
            destination: "Oslo".to_string(),
            date: day(3),
        })
        .await
        .unwrap();
    assert_eq!(third.id, 3, "ids are never reused");
}

#[tokio::test]
#[ignore = "needs Docker"]
async fn reservations_filter_by_flight_and_passenger() {
    let (_mongo, db) = start_mongo().await;
    let passengers = MongoPassengerRepository::new(&db);
    let reservations = MongoReservationRepository::new(&db);

    let juan = passengers
        .insert(NewPassenger {
            first_name: "Juan".to_string(),
            last_name: "García".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1985, 11, 2).unwrap(),
        })
        .await
        .unwrap();
    let ghost = Passenger {
        id: 99,
        ..juan.clone()
    };
    assert!(!passengers.update(ghost).await.unwrap());

    for (flight_id, seat) in [(1, "1A"), (2, "2B"), (1, "3C")] {
        reservations
            .insert(NewReservation {
                flight_id,
                passenger_id: juan.id,
                seat: seat.to_string(),
            })
            .await
            .unwrap();
    }

    let on_flight: Vec<String> = reservations
        .find_by_flight(1)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.seat)
        .collect();
    assert_eq!(on_flight, vec!["1A", "3C"]);
    assert_eq!(reservations.find_by_passenger(juan.id).await.unwrap().len(), 3);
    assert!(reservations.find_by_passenger(42).await.unwrap().is_empty());
}
