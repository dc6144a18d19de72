use chrono::NaiveDate;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

// Seat Class Enum
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    sqlx::Type,
    Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatClass {
    #[sqlx(rename = "ECONOMY")]
    #[strum(serialize = "ECONOMY")]
    Economy,
    #[sqlx(rename = "PREMIUM_ECONOMY")]
    #[strum(serialize = "PREMIUM_ECONOMY")]
    PremiumEconomy,
    #[sqlx(rename = "BUSINESS")]
    #[strum(serialize = "BUSINESS")]
    Business,
    #[sqlx(rename = "FIRST")]
    #[strum(serialize = "FIRST")]
    First,
}

impl SeatClass {
    // Price scaling applied on top of the base fare
    pub fn fare_multiplier(&self) -> Decimal {
        match self {
            SeatClass::Economy => Decimal::new(10, 1),
            SeatClass::PremiumEconomy => Decimal::new(15, 1),
            SeatClass::Business => Decimal::new(25, 1),
            SeatClass::First => Decimal::new(40, 1),
        }
    }
}

// Seat Status Enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatStatus {
    #[sqlx(rename = "AVAILABLE")]
    Available,
    #[sqlx(rename = "BOOKED")]
    Booked,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Seat {
    pub flight_id: i64,
    pub seat_number: String,
    pub cabin_row: i64,
    pub seat_class: SeatClass,
    pub status: SeatStatus,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct SeatView {
    pub seat_number: String,
    pub seat_class: SeatClass,
    pub available: bool,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct SeatMapRow {
    pub row: i64,
    pub seats: Vec<SeatView>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct SeatMapResponse {
    pub flight_number: String,
    pub flight_date: NaiveDate,
    pub rows: Vec<SeatMapRow>,
}
