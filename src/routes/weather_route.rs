use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

use crate::models::weather::WeatherInfo;
use crate::services::weather_service::WeatherService;
use crate::utils::error::AppError;

/// Current conditions at an airport (stubbed provider)
#[openapi(tag = "Weather")]
#[get("/weather/<airport_code>")]
pub async fn get_weather(
    airport_code: String,
    weather_service: &State<WeatherService>,
) -> Result<Json<WeatherInfo>, AppError> {
    let weather = weather_service.weather(&airport_code).await?;
    Ok(Json(weather))
}
