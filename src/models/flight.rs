use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

// Flight Status Enum
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, sqlx::Type, Display,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlightStatus {
    #[sqlx(rename = "SCHEDULED")]
    #[strum(serialize = "SCHEDULED")]
    Scheduled,
    #[sqlx(rename = "ON_TIME")]
    #[strum(serialize = "ON_TIME")]
    OnTime,
    #[sqlx(rename = "DELAYED")]
    #[strum(serialize = "DELAYED")]
    Delayed,
    #[sqlx(rename = "BOARDING")]
    #[strum(serialize = "BOARDING")]
    Boarding,
    #[sqlx(rename = "DEPARTED")]
    #[strum(serialize = "DEPARTED")]
    Departed,
    #[sqlx(rename = "IN_FLIGHT")]
    #[strum(serialize = "IN_FLIGHT")]
    InFlight,
    #[sqlx(rename = "ARRIVED")]
    #[strum(serialize = "ARRIVED")]
    Arrived,
    #[sqlx(rename = "CANCELLED")]
    #[strum(serialize = "CANCELLED")]
    Cancelled,
}

// One operated flight: a flight number on a concrete date
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FlightInstance {
    pub id: i64,
    pub flight_number: String,
    pub flight_date: NaiveDate,
    pub origin: String,
    pub destination: String,
    pub scheduled_departure: DateTime<Utc>,
    pub scheduled_arrival: DateTime<Utc>,
    pub estimated_departure: Option<DateTime<Utc>>,
    pub estimated_arrival: Option<DateTime<Utc>>,
    pub status: FlightStatus,
    pub gate: Option<String>,
    pub terminal: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewFlight {
    pub flight_number: String,
    pub flight_date: NaiveDate,
    pub origin: String,
    pub destination: String,
    pub scheduled_departure: DateTime<Utc>,
    pub scheduled_arrival: DateTime<Utc>,
    pub gate: Option<String>,
    pub terminal: Option<String>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct FlightResponse {
    pub flight_number: String,
    pub flight_date: NaiveDate,
    pub origin: String,
    pub destination: String,
    pub scheduled_departure: DateTime<Utc>,
    pub scheduled_arrival: DateTime<Utc>,
    pub estimated_departure: Option<DateTime<Utc>>,
    pub estimated_arrival: Option<DateTime<Utc>>,
    pub status: FlightStatus,
    pub gate: Option<String>,
    pub terminal: Option<String>,
}

impl From<FlightInstance> for FlightResponse {
    fn from(flight: FlightInstance) -> Self {
        FlightResponse {
            flight_number: flight.flight_number,
            flight_date: flight.flight_date,
            origin: flight.origin,
            destination: flight.destination,
            scheduled_departure: flight.scheduled_departure,
            scheduled_arrival: flight.scheduled_arrival,
            estimated_departure: flight.estimated_departure,
            estimated_arrival: flight.estimated_arrival,
            status: flight.status,
            gate: flight.gate,
            terminal: flight.terminal,
        }
    }
}
