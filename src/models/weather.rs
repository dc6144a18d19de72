use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct WeatherInfo {
    pub airport: String,
    pub condition: String,
    pub temperature_c: i32,
    pub wind_kph: i32,
    pub retrieved_at: DateTime<Utc>,
}
