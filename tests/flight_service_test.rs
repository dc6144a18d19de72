use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, Timelike, Utc};
use sqlx::SqlitePool;
use test_context::{test_context, AsyncTestContext};

use flight_booking_system::models::flight::{FlightStatus, NewFlight};
use flight_booking_system::models::seat::SeatClass;
use flight_booking_system::services::flight_service::FlightService;
use flight_booking_system::services::seat_map_service::{SeatMapLayout, SeatMapService};
use flight_booking_system::utils::error::AppError;

mod common {
    pub mod test_utils;
}
use common::test_utils::{seed_flight, TestDb};

struct FlightServiceContext {
    pool: SqlitePool,
    flight_service: FlightService,
}

#[async_trait]
impl AsyncTestContext for FlightServiceContext {
    async fn setup() -> Self {
        let pool = TestDb::get_instance()
            .await
            .expect("Failed to get test database instance");

        let flight_service = FlightService::new(pool.clone());

        FlightServiceContext {
            pool,
            flight_service,
        }
    }

    async fn teardown(self) {
        self.pool.close().await;
    }
}

#[test_context(FlightServiceContext)]
#[tokio::test]
async fn test_flight_lookup_roundtrip(ctx: &FlightServiceContext) -> Result<()> {
    let seeded = seed_flight(&ctx.pool, "AA123", 30).await?;

    let found = ctx
        .flight_service
        .flight_instance("AA123", seeded.flight_date)
        .await?;

    assert_eq!(found.id, seeded.id);
    assert_eq!(found.origin, "JFK");
    assert_eq!(found.destination, "LAX");
    assert_eq!(found.scheduled_departure, seeded.scheduled_departure);
    assert_eq!(found.scheduled_arrival, seeded.scheduled_arrival);
    assert_eq!(found.status, FlightStatus::Scheduled);
    assert_eq!(found.gate.as_deref(), Some("B22"));

    let by_id = ctx.flight_service.flight_by_id(seeded.id).await?;
    assert_eq!(by_id.flight_number, "AA123");

    Ok(())
}

#[test_context(FlightServiceContext)]
#[tokio::test]
async fn test_flight_lookup_miss(ctx: &FlightServiceContext) -> Result<()> {
    let err = ctx
        .flight_service
        .flight_instance("ZZ999", Utc::now().date_naive())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound(_)));

    Ok(())
}

#[test_context(FlightServiceContext)]
#[tokio::test]
async fn test_rejects_inverted_schedule(ctx: &FlightServiceContext) -> Result<()> {
    let departure = Utc::now() + Duration::days(1);

    let err = ctx
        .flight_service
        .create_flight(NewFlight {
            flight_number: "AA500".to_string(),
            flight_date: departure.date_naive(),
            origin: "JFK".to_string(),
            destination: "LAX".to_string(),
            scheduled_departure: departure,
            scheduled_arrival: departure - Duration::hours(1),
            gate: None,
            terminal: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::ValidationError(_)));

    Ok(())
}

#[test_context(FlightServiceContext)]
#[tokio::test]
async fn test_seat_map_shape(ctx: &FlightServiceContext) -> Result<()> {
    let flight = seed_flight(&ctx.pool, "AA510", 30).await?;
    let seat_maps = SeatMapService::new(ctx.pool.clone());

    let rows = seat_maps.seat_map(flight.id).await?;

    assert_eq!(rows.len(), 30);
    assert!(rows.iter().all(|row| row.seats.len() == 6));
    assert_eq!(rows[0].seats[0].seat_number, "1A");

    // class assignment follows the row ranges
    let class_of = |row_number: i64| {
        rows.iter()
            .find(|r| r.row == row_number)
            .map(|r| r.seats[0].seat_class)
            .expect("row exists")
    };
    assert_eq!(class_of(1), SeatClass::First);
    assert_eq!(class_of(5), SeatClass::Business);
    assert_eq!(class_of(10), SeatClass::PremiumEconomy);
    assert_eq!(class_of(20), SeatClass::Economy);

    // seeded at full availability
    assert!(rows.iter().all(|r| r.seats.iter().all(|s| s.available)));

    Ok(())
}

#[test_context(FlightServiceContext)]
#[tokio::test]
async fn test_seat_generation_deterministic_with_seed(ctx: &FlightServiceContext) -> Result<()> {
    let departure = (Utc::now() + Duration::days(1))
        .with_nanosecond(0)
        .expect("valid timestamp");

    let mut flights = Vec::new();
    for number in ["AA520", "AA521"] {
        let flight = ctx
            .flight_service
            .create_flight(NewFlight {
                flight_number: number.to_string(),
                flight_date: departure.date_naive(),
                origin: "SFO".to_string(),
                destination: "ORD".to_string(),
                scheduled_departure: departure,
                scheduled_arrival: departure + Duration::hours(4),
                gate: None,
                terminal: None,
            })
            .await?;

        let seat_maps = SeatMapService::with_seed(ctx.pool.clone(), 9);
        seat_maps
            .generate_for_flight(flight.id, &SeatMapLayout::default(), 0.5)
            .await?;
        flights.push(flight);
    }

    let seat_maps = SeatMapService::new(ctx.pool.clone());
    let pattern_a: Vec<bool> = seat_maps
        .seat_map(flights[0].id)
        .await?
        .iter()
        .flat_map(|r| r.seats.iter().map(|s| s.available))
        .collect();
    let pattern_b: Vec<bool> = seat_maps
        .seat_map(flights[1].id)
        .await?
        .iter()
        .flat_map(|r| r.seats.iter().map(|s| s.available))
        .collect();

    assert_eq!(pattern_a, pattern_b);
    // half-availability leaves a mixed map
    assert!(pattern_a.iter().any(|available| *available));
    assert!(pattern_a.iter().any(|available| !*available));

    Ok(())
}

#[test_context(FlightServiceContext)]
#[tokio::test]
async fn test_reserve_and_release(ctx: &FlightServiceContext) -> Result<()> {
    let flight = seed_flight(&ctx.pool, "AA530", 30).await?;
    let seat_maps = SeatMapService::new(ctx.pool.clone());

    let mut tx = ctx.pool.begin().await?;
    seat_maps.reserve(&mut tx, flight.id, "13A").await?;
    tx.commit().await?;
    assert!(!seat_maps.is_available(flight.id, "13A").await?);

    // a second reservation of the same seat conflicts
    let mut tx = ctx.pool.begin().await?;
    let err = seat_maps.reserve(&mut tx, flight.id, "13A").await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
    tx.rollback().await?;

    // releasing puts it back into inventory
    seat_maps.release(flight.id, "13A").await?;
    assert!(seat_maps.is_available(flight.id, "13A").await?);

    // seats outside the map are NotFound
    let mut tx = ctx.pool.begin().await?;
    let err = seat_maps.reserve(&mut tx, flight.id, "99Z").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    tx.rollback().await?;

    let err = seat_maps.is_available(flight.id, "99Z").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    Ok(())
}

#[test_context(FlightServiceContext)]
#[tokio::test]
async fn test_seed_demo_flights_idempotent(ctx: &FlightServiceContext) -> Result<()> {
    let seat_maps = SeatMapService::new(ctx.pool.clone());

    ctx.flight_service.seed_demo_flights(&seat_maps).await?;
    ctx.flight_service.seed_demo_flights(&seat_maps).await?;

    let flights = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM flight")
        .fetch_one(&ctx.pool)
        .await?;
    assert_eq!(flights, 4);

    let seats = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM seat")
        .fetch_one(&ctx.pool)
        .await?;
    assert_eq!(seats, 4 * 30 * 6);

    Ok(())
}
