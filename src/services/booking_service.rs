use chrono::{DateTime, Duration, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::collections::HashSet;
use validator::Validate;

use crate::models::booking::{
    BaggageItem, BaggageRequest, BaggageStatus, BaggageView, BoardingPass, Booking,
    BookingRequest, BookingResponse, BookingStatus, CheckInResponse, Passenger, PassengerView,
    PaymentStatus,
};
use crate::models::flight::FlightInstance;
use crate::models::seat::SeatClass;
use crate::services::fare_service;
use crate::services::flight_service::FlightService;
use crate::services::notification_service::NotificationService;
use crate::services::payment_service::{CardInfo, PaymentService};
use crate::services::seat_map_service::SeatMapService;
use crate::utils::codes::CodeGenerator;
use crate::utils::error::{AppError, AppResult};

// Bounded regenerate-and-retry attempts for confirmation and tracking numbers
const MAX_CODE_ATTEMPTS: u32 = 5;
const CHECK_IN_WINDOW_HOURS: i64 = 24;
const BOARDING_OFFSET_MINUTES: i64 = 30;

/// Orchestrates booking creation and check-in: validation, flight resolution,
/// pricing, payment authorization, the transactional write of the booking
/// aggregate, and the fire-and-forget confirmation notification.
///
/// Payment runs before the durable write. If persistence fails afterwards the
/// charge is compensated with a best-effort refund; a refund failure is logged
/// at error severity for manual reconciliation.
pub struct BookingService {
    pool: SqlitePool,
    flight_service: FlightService,
    seat_maps: SeatMapService,
    payments: PaymentService,
    notifier: NotificationService,
    codes: CodeGenerator,
}

impl BookingService {
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_gateway(pool, PaymentService::new(), CodeGenerator::new())
    }

    // Inject the gateway stub and code source, used by tests to pin outcomes
    pub fn with_gateway(pool: SqlitePool, payments: PaymentService, codes: CodeGenerator) -> Self {
        BookingService {
            flight_service: FlightService::new(pool.clone()),
            seat_maps: SeatMapService::new(pool.clone()),
            notifier: NotificationService::new(),
            payments,
            codes,
            pool,
        }
    }

    pub async fn create_booking(
        &self,
        user_id: i64,
        request: BookingRequest,
    ) -> AppResult<BookingResponse> {
        request
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        let mut selected = HashSet::new();
        for passenger in &request.passengers {
            if let Some(seat) = &passenger.seat_number {
                if !selected.insert(seat.as_str()) {
                    return Err(AppError::ValidationError(format!(
                        "Seat {} is selected more than once",
                        seat
                    )));
                }
            }
        }

        // one flight snapshot per request
        let flight = self
            .flight_service
            .flight_instance(&request.flight_number, request.flight_date)
            .await?;

        let now = Utc::now();
        if flight.scheduled_departure <= now {
            return Err(AppError::Conflict(format!(
                "Flight {} has already departed",
                flight.flight_number
            )));
        }

        // Fast fail before any money moves; the conditional update inside the
        // transaction below is the authoritative guard.
        for passenger in &request.passengers {
            if let Some(seat) = &passenger.seat_number {
                if !self.seat_maps.is_available(flight.id, seat).await? {
                    return Err(AppError::Conflict(format!(
                        "Seat {} is no longer available",
                        seat
                    )));
                }
            }
        }

        let classes: Vec<SeatClass> = request.passengers.iter().map(|p| p.seat_class).collect();
        let total_amount = fare_service::total_fare(&classes);
        let total_cents = (total_amount * Decimal::from(100))
            .to_i64()
            .ok_or_else(|| AppError::ValidationError("total amount out of range".to_string()))?;

        let charge = self
            .payments
            .charge(total_amount, &CardInfo::demo_card())
            .await?;
        if !charge.success {
            return Err(AppError::PaymentDeclined(
                charge
                    .error_message
                    .unwrap_or_else(|| "Payment was declined".to_string()),
            ));
        }
        let transaction_id = charge.transaction_id.ok_or_else(|| {
            AppError::DatabaseError("gateway approved a charge without a transaction id".to_string())
        })?;

        let persisted = self
            .persist_booking(user_id, &request, &flight, total_cents, &transaction_id, now)
            .await;

        let confirmation_number = match persisted {
            Ok(confirmation_number) => confirmation_number,
            Err(err) => {
                self.compensate_charge(&transaction_id, total_amount).await;
                return Err(err);
            }
        };

        tracing::info!(
            %confirmation_number,
            flight_number = %flight.flight_number,
            passengers = request.passengers.len(),
            %total_amount,
            "booking confirmed"
        );

        // Fire-and-forget: booking success is independent of delivery
        if let Some(email) = request.contact_email.clone() {
            let notifier = self.notifier.clone();
            let confirmation = confirmation_number.clone();
            tokio::spawn(async move {
                if !notifier
                    .send_booking_confirmation(&confirmation, &email, total_amount)
                    .await
                {
                    tracing::warn!(
                        confirmation_number = %confirmation,
                        "confirmation notification failed"
                    );
                }
            });
        }

        self.booking_details(&confirmation_number).await
    }

    pub async fn booking_details(&self, confirmation_number: &str) -> AppResult<BookingResponse> {
        let booking = self.booking_by_confirmation(confirmation_number).await?;
        let flight = self.flight_service.flight_by_id(booking.flight_id).await?;
        let passengers = self.passengers_for(booking.id).await?;
        let baggage = self.baggage_for(booking.id).await?;

        Ok(build_booking_response(booking, &flight, passengers, baggage))
    }

    pub async fn check_in(&self, confirmation_number: &str) -> AppResult<CheckInResponse> {
        let booking = self.booking_by_confirmation(confirmation_number).await?;
        let flight = self.flight_service.flight_by_id(booking.flight_id).await?;
        let now = Utc::now();

        match booking.status {
            BookingStatus::Confirmed => {}
            BookingStatus::CheckedIn => {
                return Err(AppError::Conflict(format!(
                    "Booking {} is already checked in",
                    booking.confirmation_number
                )));
            }
            BookingStatus::Pending | BookingStatus::Completed | BookingStatus::Cancelled => {
                return Err(AppError::Conflict(format!(
                    "Booking {} cannot be checked in from status {}",
                    booking.confirmation_number, booking.status
                )));
            }
        }

        if flight.scheduled_departure <= now {
            return Err(AppError::Conflict(format!(
                "Flight {} has already departed",
                flight.flight_number
            )));
        }

        let opens_at = flight.scheduled_departure - Duration::hours(CHECK_IN_WINDOW_HOURS);
        if now < opens_at {
            return Err(AppError::CheckInNotAvailable(format!(
                "Check-in for flight {} opens at {}",
                flight.flight_number,
                opens_at.to_rfc3339()
            )));
        }

        let mut tx = self.pool.begin().await?;

        // Conditional transition; a concurrent check-in loses the race here
        let updated = sqlx::query(
            r#"UPDATE booking SET status = 'CHECKED_IN' WHERE id = ? AND status = 'CONFIRMED'"#,
        )
        .bind(booking.id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(AppError::Conflict(format!(
                "Booking {} is already checked in",
                booking.confirmation_number
            )));
        }

        sqlx::query(r#"UPDATE passenger SET checked_in = 1, checked_in_at = ? WHERE booking_id = ?"#)
            .bind(now)
            .bind(booking.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let passengers = self.passengers_for(booking.id).await?;
        let primary = passengers.first().ok_or_else(|| {
            AppError::DatabaseError(format!(
                "booking {} has no passengers",
                booking.confirmation_number
            ))
        })?;

        let boarding_pass = BoardingPass {
            confirmation_number: booking.confirmation_number.clone(),
            passenger_name: format!("{} {}", primary.first_name, primary.last_name),
            flight_number: flight.flight_number.clone(),
            seat_number: primary
                .seat_number
                .clone()
                .unwrap_or_else(|| "TBD".to_string()),
            gate: flight.gate.clone().unwrap_or_else(|| "TBD".to_string()),
            boarding_time: flight.scheduled_departure
                - Duration::minutes(BOARDING_OFFSET_MINUTES),
            qr_payload: self.codes.boarding_qr_payload(&booking.confirmation_number),
        };

        tracing::info!(
            confirmation_number = %booking.confirmation_number,
            flight_number = %flight.flight_number,
            "passenger checked in"
        );

        Ok(CheckInResponse {
            confirmation_number: booking.confirmation_number,
            status: BookingStatus::CheckedIn,
            boarding_pass,
        })
    }

    // Reserve seats, insert the booking row and its passengers and baggage,
    // all in one transaction. Any error rolls the whole unit back.
    async fn persist_booking(
        &self,
        user_id: i64,
        request: &BookingRequest,
        flight: &FlightInstance,
        total_cents: i64,
        transaction_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<String> {
        let mut tx = self.pool.begin().await?;

        for passenger in &request.passengers {
            if let Some(seat) = &passenger.seat_number {
                self.seat_maps.reserve(&mut tx, flight.id, seat).await?;
            }
        }

        let (booking_id, confirmation_number) = self
            .insert_booking_row(&mut tx, user_id, request, flight, total_cents, transaction_id, now)
            .await?;

        for passenger in &request.passengers {
            sqlx::query(
                r#"
                INSERT INTO passenger
                (booking_id, first_name, last_name, date_of_birth, seat_number, seat_class, checked_in)
                VALUES (?, ?, ?, ?, ?, ?, 0)
                "#,
            )
            .bind(booking_id)
            .bind(&passenger.first_name)
            .bind(&passenger.last_name)
            .bind(passenger.date_of_birth)
            .bind(&passenger.seat_number)
            .bind(passenger.seat_class)
            .execute(&mut *tx)
            .await?;
        }

        if let Some(baggage) = &request.baggage {
            for item in baggage {
                self.insert_baggage_row(&mut tx, booking_id, item).await?;
            }
        }

        tx.commit().await?;

        Ok(confirmation_number)
    }

    // Insert with a bounded regenerate-and-retry on confirmation collisions
    async fn insert_booking_row(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        user_id: i64,
        request: &BookingRequest,
        flight: &FlightInstance,
        total_cents: i64,
        transaction_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<(i64, String)> {
        for _ in 0..MAX_CODE_ATTEMPTS {
            let confirmation_number = self.codes.confirmation_number();
            let result = sqlx::query(
                r#"
                INSERT INTO booking
                (confirmation_number, user_id, flight_id, status, payment_status,
                 payment_transaction_id, contact_email, total_amount_cents, created_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&confirmation_number)
            .bind(user_id)
            .bind(flight.id)
            .bind(BookingStatus::Confirmed)
            .bind(PaymentStatus::Completed)
            .bind(transaction_id)
            .bind(&request.contact_email)
            .bind(total_cents)
            .bind(now)
            .execute(&mut **tx)
            .await;

            match result {
                Ok(result) => return Ok((result.last_insert_rowid(), confirmation_number)),
                Err(err) if is_unique_violation(&err) => {
                    tracing::warn!(%confirmation_number, "confirmation number collided, regenerating");
                    continue;
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(AppError::DatabaseError(
            "could not allocate a unique confirmation number".to_string(),
        ))
    }

    async fn insert_baggage_row(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        booking_id: i64,
        item: &BaggageRequest,
    ) -> AppResult<()> {
        for _ in 0..MAX_CODE_ATTEMPTS {
            let tracking_number = self.codes.tracking_number();
            let result = sqlx::query(
                r#"
                INSERT INTO baggage (booking_id, tracking_number, baggage_type, weight_kg, status)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(booking_id)
            .bind(&tracking_number)
            .bind(item.baggage_type)
            .bind(item.weight_kg)
            .bind(BaggageStatus::CheckedIn)
            .execute(&mut **tx)
            .await;

            match result {
                Ok(_) => return Ok(()),
                Err(err) if is_unique_violation(&err) => {
                    tracing::warn!(%tracking_number, "tracking number collided, regenerating");
                    continue;
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(AppError::DatabaseError(
            "could not allocate a unique tracking number".to_string(),
        ))
    }

    // Best-effort refund after a failed persist; a charged-but-unbooked
    // customer must not be left stranded silently
    async fn compensate_charge(&self, transaction_id: &str, amount: Decimal) {
        match self.payments.refund(transaction_id, amount).await {
            Ok(refund) if refund.success => {
                tracing::warn!(%transaction_id, %amount, "booking persistence failed, charge refunded");
            }
            Ok(refund) => {
                tracing::error!(
                    %transaction_id,
                    %amount,
                    error = ?refund.error_message,
                    "compensating refund rejected, manual reconciliation required"
                );
            }
            Err(err) => {
                tracing::error!(
                    %transaction_id,
                    %amount,
                    %err,
                    "compensating refund failed, manual reconciliation required"
                );
            }
        }
    }

    async fn booking_by_confirmation(&self, confirmation_number: &str) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>(
            r#"
            SELECT id, confirmation_number, user_id, flight_id, status, payment_status,
                   payment_transaction_id, contact_email, total_amount_cents, created_at
            FROM booking
            WHERE confirmation_number = ?
            "#,
        )
        .bind(confirmation_number)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", confirmation_number)))
    }

    async fn passengers_for(&self, booking_id: i64) -> AppResult<Vec<Passenger>> {
        Ok(sqlx::query_as::<_, Passenger>(
            r#"
            SELECT id, booking_id, first_name, last_name, date_of_birth,
                   seat_number, seat_class, checked_in, checked_in_at
            FROM passenger
            WHERE booking_id = ?
            ORDER BY id
            "#,
        )
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn baggage_for(&self, booking_id: i64) -> AppResult<Vec<BaggageItem>> {
        Ok(sqlx::query_as::<_, BaggageItem>(
            r#"
            SELECT id, booking_id, tracking_number, baggage_type, weight_kg, status
            FROM baggage
            WHERE booking_id = ?
            ORDER BY id
            "#,
        )
        .bind(booking_id)
        .fetch_all(&self.pool)
        .await?)
    }
}

fn build_booking_response(
    booking: Booking,
    flight: &FlightInstance,
    passengers: Vec<Passenger>,
    baggage: Vec<BaggageItem>,
) -> BookingResponse {
    BookingResponse {
        confirmation_number: booking.confirmation_number,
        status: booking.status,
        payment_status: booking.payment_status,
        total_amount: Decimal::new(booking.total_amount_cents, 2),
        flight_number: flight.flight_number.clone(),
        flight_date: flight.flight_date,
        origin: flight.origin.clone(),
        destination: flight.destination.clone(),
        scheduled_departure: flight.scheduled_departure,
        passengers: passengers
            .into_iter()
            .map(|p| PassengerView {
                first_name: p.first_name,
                last_name: p.last_name,
                seat_number: p.seat_number,
                seat_class: p.seat_class,
                checked_in: p.checked_in,
            })
            .collect(),
        baggage: baggage
            .into_iter()
            .map(|b| BaggageView {
                tracking_number: b.tracking_number,
                baggage_type: b.baggage_type,
                weight_kg: b.weight_kg,
                status: b.status,
            })
            .collect(),
        created_at: booking.created_at,
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation)
    )
}
