use chrono::{Duration, Timelike, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

use flight_booking_system::db::Database;
use flight_booking_system::models::flight::{FlightInstance, NewFlight};
use flight_booking_system::services::flight_service::FlightService;
use flight_booking_system::services::seat_map_service::{SeatMapLayout, SeatMapService};

pub struct TestDb;

impl TestDb {
    // Fresh private in-memory database per test context. A single connection
    // keeps every query on the same database and serializes transactions.
    pub async fn get_instance() -> Result<SqlitePool, sqlx::Error> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        Database::init_schema(&pool).await?;

        Ok(pool)
    }
}

// Create a flight departing `departs_in_hours` from now, with a fully
// available seat map so tests can pick any seat.
pub async fn seed_flight(
    pool: &SqlitePool,
    flight_number: &str,
    departs_in_hours: i64,
) -> anyhow::Result<FlightInstance> {
    let flight_service = FlightService::new(pool.clone());
    let seat_maps = SeatMapService::with_seed(pool.clone(), 7);

    // whole seconds, so timestamps compare exactly after a database round trip
    let departure = (Utc::now() + Duration::hours(departs_in_hours))
        .with_nanosecond(0)
        .expect("valid timestamp");
    let flight = flight_service
        .create_flight(NewFlight {
            flight_number: flight_number.to_string(),
            flight_date: departure.date_naive(),
            origin: "JFK".to_string(),
            destination: "LAX".to_string(),
            scheduled_departure: departure,
            scheduled_arrival: departure + Duration::hours(6),
            gate: Some("B22".to_string()),
            terminal: Some("4".to_string()),
        })
        .await?;

    seat_maps
        .generate_for_flight(flight.id, &SeatMapLayout::default(), 1.0)
        .await?;

    Ok(flight)
}
