use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::sync::Mutex;

use crate::models::seat::{Seat, SeatClass, SeatMapRow, SeatStatus, SeatView};
use crate::utils::error::{AppError, AppResult};

// Cabin layout: row count, seat letters per row, and the class assigned to
// each inclusive row range. Rows not covered by a range fall back to Economy.
#[derive(Debug, Clone)]
pub struct SeatMapLayout {
    pub rows: i64,
    pub letters: Vec<char>,
    pub class_ranges: Vec<(i64, i64, SeatClass)>,
}

impl Default for SeatMapLayout {
    fn default() -> Self {
        SeatMapLayout {
            rows: 30,
            letters: vec!['A', 'B', 'C', 'D', 'E', 'F'],
            class_ranges: vec![
                (1, 2, SeatClass::First),
                (3, 7, SeatClass::Business),
                (8, 12, SeatClass::PremiumEconomy),
                (13, 30, SeatClass::Economy),
            ],
        }
    }
}

impl SeatMapLayout {
    fn class_for_row(&self, row: i64) -> SeatClass {
        self.class_ranges
            .iter()
            .find(|(first, last, _)| row >= *first && row <= *last)
            .map(|(_, _, class)| *class)
            .unwrap_or(SeatClass::Economy)
    }
}

/// Seat inventory for one flight instance, persisted per (flight, seat) so
/// that reservation is a conditional update instead of a read-then-write.
pub struct SeatMapService {
    pool: SqlitePool,
    rng: Mutex<StdRng>,
}

impl SeatMapService {
    pub fn new(pool: SqlitePool) -> Self {
        SeatMapService {
            pool,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    // Deterministic occupancy for tests
    pub fn with_seed(pool: SqlitePool, seed: u64) -> Self {
        SeatMapService {
            pool,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    // Build the seat rows for a flight. Each seat starts available with
    // probability `availability_rate` (the demo seeds at 0.70).
    pub async fn generate_for_flight(
        &self,
        flight_id: i64,
        layout: &SeatMapLayout,
        availability_rate: f64,
    ) -> AppResult<u32> {
        let seats: Vec<(String, i64, SeatClass, SeatStatus)> = {
            let mut rng = self.rng.lock().expect("seat map rng poisoned");
            let mut seats = Vec::with_capacity((layout.rows as usize) * layout.letters.len());
            for row in 1..=layout.rows {
                let class = layout.class_for_row(row);
                for letter in &layout.letters {
                    let status = if rng.gen_bool(availability_rate) {
                        SeatStatus::Available
                    } else {
                        SeatStatus::Booked
                    };
                    seats.push((format!("{}{}", row, letter), row, class, status));
                }
            }
            seats
        };

        let mut inserted = 0u32;
        for (seat_number, row, class, status) in seats {
            sqlx::query(
                r#"
                INSERT INTO seat (flight_id, seat_number, cabin_row, seat_class, status)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(flight_id)
            .bind(&seat_number)
            .bind(row)
            .bind(class)
            .bind(status)
            .execute(&self.pool)
            .await?;
            inserted += 1;
        }

        Ok(inserted)
    }

    // Full snapshot, grouped into ordered rows
    pub async fn seat_map(&self, flight_id: i64) -> AppResult<Vec<SeatMapRow>> {
        let seats = sqlx::query_as::<_, Seat>(
            r#"
            SELECT flight_id, seat_number, cabin_row, seat_class, status
            FROM seat
            WHERE flight_id = ?
            ORDER BY cabin_row, seat_number
            "#,
        )
        .bind(flight_id)
        .fetch_all(&self.pool)
        .await?;

        let mut rows: Vec<SeatMapRow> = Vec::new();
        for seat in seats {
            let view = SeatView {
                seat_number: seat.seat_number,
                seat_class: seat.seat_class,
                available: seat.status == SeatStatus::Available,
            };
            match rows.last_mut() {
                Some(last) if last.row == seat.cabin_row => last.seats.push(view),
                _ => rows.push(SeatMapRow {
                    row: seat.cabin_row,
                    seats: vec![view],
                }),
            }
        }

        Ok(rows)
    }

    pub async fn is_available(&self, flight_id: i64, seat_number: &str) -> AppResult<bool> {
        let status = sqlx::query_as::<_, (SeatStatus,)>(
            r#"SELECT status FROM seat WHERE flight_id = ? AND seat_number = ?"#,
        )
        .bind(flight_id)
        .bind(seat_number)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Seat {} does not exist", seat_number)))?;

        Ok(status.0 == SeatStatus::Available)
    }

    // Transition available -> booked inside the caller's transaction. The
    // affected-row check is the double-booking guard: of two concurrent
    // reservations for one seat, exactly one sees an affected row.
    pub async fn reserve(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        flight_id: i64,
        seat_number: &str,
    ) -> AppResult<()> {
        let updated = sqlx::query(
            r#"
            UPDATE seat
            SET status = 'BOOKED'
            WHERE flight_id = ? AND seat_number = ? AND status = 'AVAILABLE'
            "#,
        )
        .bind(flight_id)
        .bind(seat_number)
        .execute(&mut **tx)
        .await?;

        if updated.rows_affected() == 1 {
            return Ok(());
        }

        let exists = sqlx::query_as::<_, (i64,)>(
            r#"SELECT COUNT(*) FROM seat WHERE flight_id = ? AND seat_number = ?"#,
        )
        .bind(flight_id)
        .bind(seat_number)
        .fetch_one(&mut **tx)
        .await?;

        if exists.0 == 0 {
            Err(AppError::NotFound(format!(
                "Seat {} does not exist",
                seat_number
            )))
        } else {
            Err(AppError::Conflict(format!(
                "Seat {} is no longer available",
                seat_number
            )))
        }
    }

    // Inverse of reserve, used when a booking is rolled back or cancelled
    pub async fn release(&self, flight_id: i64, seat_number: &str) -> AppResult<()> {
        let updated = sqlx::query(
            r#"
            UPDATE seat
            SET status = 'AVAILABLE'
            WHERE flight_id = ? AND seat_number = ? AND status = 'BOOKED'
            "#,
        )
        .bind(flight_id)
        .bind(seat_number)
        .execute(&self.pool)
        .await?;

        if updated.rows_affected() == 0 && !self.seat_exists(flight_id, seat_number).await? {
            return Err(AppError::NotFound(format!(
                "Seat {} does not exist",
                seat_number
            )));
        }

        Ok(())
    }

    async fn seat_exists(&self, flight_id: i64, seat_number: &str) -> AppResult<bool> {
        let count = sqlx::query_as::<_, (i64,)>(
            r#"SELECT COUNT(*) FROM seat WHERE flight_id = ? AND seat_number = ?"#,
        )
        .bind(flight_id)
        .bind(seat_number)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0 > 0)
    }
}
