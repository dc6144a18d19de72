use chrono::{Duration, NaiveDate, Utc};
use sqlx::SqlitePool;

use crate::models::flight::{FlightInstance, FlightStatus, NewFlight};
use crate::services::seat_map_service::{SeatMapLayout, SeatMapService};
use crate::utils::error::{AppError, AppResult};

const SELECT_FLIGHT: &str = r#"
    SELECT id, flight_number, flight_date, origin, destination,
           scheduled_departure, scheduled_arrival,
           estimated_departure, estimated_arrival,
           status, gate, terminal
    FROM flight
"#;

pub struct FlightService {
    pool: SqlitePool,
}

impl FlightService {
    pub fn new(pool: SqlitePool) -> Self {
        FlightService { pool }
    }

    // Resolve one operated flight by (flight number, date)
    pub async fn flight_instance(
        &self,
        flight_number: &str,
        flight_date: NaiveDate,
    ) -> AppResult<FlightInstance> {
        let sql = format!("{} WHERE flight_number = ? AND flight_date = ?", SELECT_FLIGHT);
        sqlx::query_as::<_, FlightInstance>(&sql)
            .bind(flight_number)
            .bind(flight_date)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Flight {} on {} not found",
                    flight_number, flight_date
                ))
            })
    }

    pub async fn flight_by_id(&self, flight_id: i64) -> AppResult<FlightInstance> {
        let sql = format!("{} WHERE id = ?", SELECT_FLIGHT);
        sqlx::query_as::<_, FlightInstance>(&sql)
            .bind(flight_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Flight not found".to_string()))
    }

    pub async fn create_flight(&self, new_flight: NewFlight) -> AppResult<FlightInstance> {
        if new_flight.scheduled_arrival <= new_flight.scheduled_departure {
            return Err(AppError::ValidationError(
                "scheduled arrival must be after scheduled departure".to_string(),
            ));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO flight
            (flight_number, flight_date, origin, destination,
             scheduled_departure, scheduled_arrival, status, gate, terminal)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&new_flight.flight_number)
        .bind(new_flight.flight_date)
        .bind(&new_flight.origin)
        .bind(&new_flight.destination)
        .bind(new_flight.scheduled_departure)
        .bind(new_flight.scheduled_arrival)
        .bind(FlightStatus::Scheduled)
        .bind(&new_flight.gate)
        .bind(&new_flight.terminal)
        .execute(&self.pool)
        .await?;

        Ok(FlightInstance {
            id: result.last_insert_rowid(),
            flight_number: new_flight.flight_number,
            flight_date: new_flight.flight_date,
            origin: new_flight.origin,
            destination: new_flight.destination,
            scheduled_departure: new_flight.scheduled_departure,
            scheduled_arrival: new_flight.scheduled_arrival,
            estimated_departure: None,
            estimated_arrival: None,
            status: FlightStatus::Scheduled,
            gate: new_flight.gate,
            terminal: new_flight.terminal,
        })
    }

    // Placeholder flight data for the demo: a few departures over the next
    // days, each with a generated seat map at 70% availability. Idempotent,
    // runs once on an empty database.
    pub async fn seed_demo_flights(&self, seat_maps: &SeatMapService) -> AppResult<()> {
        let count = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM flight")
            .fetch_one(&self.pool)
            .await?;
        if count.0 > 0 {
            return Ok(());
        }

        let today = Utc::now();
        let demo = [
            ("AA123", "JFK", "LAX", 1, 9, 6, "B22", "4"),
            ("BA456", "LHR", "JFK", 1, 11, 8, "A14", "5"),
            ("UA789", "SFO", "ORD", 2, 7, 4, "C03", "1"),
            ("DL321", "ATL", "MIA", 3, 15, 2, "D11", "2"),
        ];

        for (number, origin, destination, days_out, hour, duration_h, gate, terminal) in demo {
            let departure = (today + Duration::days(days_out))
                .date_naive()
                .and_hms_opt(hour, 0, 0)
                .expect("valid departure time")
                .and_utc();
            let flight = self
                .create_flight(NewFlight {
                    flight_number: number.to_string(),
                    flight_date: departure.date_naive(),
                    origin: origin.to_string(),
                    destination: destination.to_string(),
                    scheduled_departure: departure,
                    scheduled_arrival: departure + Duration::hours(duration_h),
                    gate: Some(gate.to_string()),
                    terminal: Some(terminal.to_string()),
                })
                .await?;

            let seats = seat_maps
                .generate_for_flight(flight.id, &SeatMapLayout::default(), 0.70)
                .await?;
            tracing::info!(
                flight_number = number,
                flight_date = %flight.flight_date,
                seats,
                "seeded demo flight"
            );
        }

        Ok(())
    }
}
