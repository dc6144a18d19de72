use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum_macros::Display;
use validator::Validate;

use crate::models::seat::SeatClass;

// Booking Status Enum
//
// Lifecycle: Pending -> Confirmed -> CheckedIn -> Completed, with Cancelled
// reachable from Pending or Confirmed. Completed and Cancelled are terminal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, sqlx::Type, Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    #[sqlx(rename = "PENDING")]
    #[strum(serialize = "PENDING")]
    Pending,
    #[sqlx(rename = "CONFIRMED")]
    #[strum(serialize = "CONFIRMED")]
    Confirmed,
    #[sqlx(rename = "CHECKED_IN")]
    #[strum(serialize = "CHECKED_IN")]
    CheckedIn,
    #[sqlx(rename = "COMPLETED")]
    #[strum(serialize = "COMPLETED")]
    Completed,
    #[sqlx(rename = "CANCELLED")]
    #[strum(serialize = "CANCELLED")]
    Cancelled,
}

// Payment Status Enum
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, sqlx::Type, Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[sqlx(rename = "PENDING")]
    #[strum(serialize = "PENDING")]
    Pending,
    #[sqlx(rename = "PROCESSING")]
    #[strum(serialize = "PROCESSING")]
    Processing,
    #[sqlx(rename = "COMPLETED")]
    #[strum(serialize = "COMPLETED")]
    Completed,
    #[sqlx(rename = "FAILED")]
    #[strum(serialize = "FAILED")]
    Failed,
    #[sqlx(rename = "REFUNDED")]
    #[strum(serialize = "REFUNDED")]
    Refunded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BaggageType {
    #[sqlx(rename = "CARRY_ON")]
    CarryOn,
    #[sqlx(rename = "CHECKED")]
    Checked,
    #[sqlx(rename = "OVERSIZED")]
    Oversized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BaggageStatus {
    #[sqlx(rename = "CHECKED_IN")]
    CheckedIn,
    #[sqlx(rename = "LOADED")]
    Loaded,
    #[sqlx(rename = "DELIVERED")]
    Delivered,
    #[sqlx(rename = "LOST")]
    Lost,
}

// The booking aggregate root
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Booking {
    pub id: i64,
    pub confirmation_number: String,
    pub user_id: i64,
    pub flight_id: i64,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub payment_transaction_id: Option<String>,
    pub contact_email: Option<String>,
    pub total_amount_cents: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Passenger {
    pub id: i64,
    pub booking_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub seat_number: Option<String>,
    pub seat_class: SeatClass,
    pub checked_in: bool,
    pub checked_in_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BaggageItem {
    pub id: i64,
    pub booking_id: i64,
    pub tracking_number: String,
    pub baggage_type: BaggageType,
    pub weight_kg: f64,
    pub status: BaggageStatus,
}

#[derive(Debug, Serialize, Deserialize, Validate, JsonSchema)]
pub struct PassengerRequest {
    #[validate(length(min = 1, message = "passenger first name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "passenger last name is required"))]
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub seat_class: SeatClass,
    pub seat_number: Option<String>,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct BaggageRequest {
    pub baggage_type: BaggageType,
    #[validate(range(
        min = 0.1,
        max = 45.0,
        message = "baggage weight must be between 0.1 and 45 kg"
    ))]
    pub weight_kg: f64,
}

#[derive(Debug, Deserialize, Validate, JsonSchema)]
pub struct BookingRequest {
    #[validate(length(min = 1, message = "flight number is required"))]
    pub flight_number: String,
    pub flight_date: NaiveDate,
    #[validate(length(min = 1, message = "at least one passenger is required"), nested)]
    pub passengers: Vec<PassengerRequest>,
    #[validate(email(message = "contact email is not a valid address"))]
    pub contact_email: Option<String>,
    #[validate(nested)]
    pub baggage: Option<Vec<BaggageRequest>>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct PassengerView {
    pub first_name: String,
    pub last_name: String,
    pub seat_number: Option<String>,
    pub seat_class: SeatClass,
    pub checked_in: bool,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct BaggageView {
    pub tracking_number: String,
    pub baggage_type: BaggageType,
    pub weight_kg: f64,
    pub status: BaggageStatus,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct BookingResponse {
    pub confirmation_number: String,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    #[schemars(with = "String")]
    pub total_amount: Decimal,
    pub flight_number: String,
    pub flight_date: NaiveDate,
    pub origin: String,
    pub destination: String,
    pub scheduled_departure: DateTime<Utc>,
    pub passengers: Vec<PassengerView>,
    pub baggage: Vec<BaggageView>,
    pub created_at: DateTime<Utc>,
}

// Derived at check-in, never persisted
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct BoardingPass {
    pub confirmation_number: String,
    pub passenger_name: String,
    pub flight_number: String,
    pub seat_number: String,
    pub gate: String,
    pub boarding_time: DateTime<Utc>,
    pub qr_payload: String,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct CheckInResponse {
    pub confirmation_number: String,
    pub status: BookingStatus,
    pub boarding_pass: BoardingPass,
}
