use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

use crate::models::weather::WeatherInfo;
use crate::utils::error::{AppError, AppResult};

const CONDITIONS: &[&str] = &[
    "Clear",
    "Partly Cloudy",
    "Overcast",
    "Rain",
    "Thunderstorms",
    "Snow",
    "Fog",
];

/// Placeholder weather provider; fabricates conditions per airport instead of
/// calling a real upstream, and is occasionally "down" like one. Never
/// consulted by booking logic.
pub struct WeatherService {
    rng: Mutex<StdRng>,
    unavailable_rate: f64,
}

impl WeatherService {
    pub fn new() -> Self {
        Self::with_unavailable_rate(0.05)
    }

    // Pin the simulated outage probability, used by tests
    pub fn with_unavailable_rate(unavailable_rate: f64) -> Self {
        WeatherService {
            rng: Mutex::new(StdRng::from_entropy()),
            unavailable_rate,
        }
    }

    pub async fn weather(&self, airport_code: &str) -> AppResult<WeatherInfo> {
        if airport_code.len() != 3 || !airport_code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(AppError::BadRequest(
                "airport code must be a 3-letter IATA code".to_string(),
            ));
        }

        let (down, condition, temperature_c, wind_kph) = {
            let mut rng = self.rng.lock().expect("weather rng poisoned");
            (
                rng.gen_bool(self.unavailable_rate),
                CONDITIONS[rng.gen_range(0..CONDITIONS.len())],
                rng.gen_range(-10..35),
                rng.gen_range(0..40),
            )
        };

        if down {
            return Err(AppError::ServiceUnavailable(
                "Weather provider is currently unavailable".to_string(),
            ));
        }

        Ok(WeatherInfo {
            airport: airport_code.to_uppercase(),
            condition: condition.to_string(),
            temperature_c,
            wind_kph,
            retrieved_at: Utc::now(),
        })
    }
}

impl Default for WeatherService {
    fn default() -> Self {
        Self::new()
    }
}
