use chrono::NaiveDate;
use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

use crate::models::flight::FlightResponse;
use crate::models::seat::SeatMapResponse;
use crate::services::flight_service::FlightService;
use crate::services::seat_map_service::SeatMapService;
use crate::utils::error::AppError;
use crate::utils::jwt::AuthenticatedUser;

/// Look up one operated flight by number and date
#[openapi(tag = "Flights")]
#[get("/flights/<flight_number>?<date>")]
pub async fn get_flight(
    flight_number: String,
    date: String,
    _auth: AuthenticatedUser,
    flight_service: &State<FlightService>,
) -> Result<Json<FlightResponse>, AppError> {
    let flight_date = parse_date(&date)?;
    let flight = flight_service
        .flight_instance(&flight_number, flight_date)
        .await?;
    Ok(Json(FlightResponse::from(flight)))
}

/// Seat map snapshot for one operated flight
#[openapi(tag = "Flights")]
#[get("/flights/<flight_number>/seats?<date>")]
pub async fn get_seat_map(
    flight_number: String,
    date: String,
    _auth: AuthenticatedUser,
    flight_service: &State<FlightService>,
    seat_map_service: &State<SeatMapService>,
) -> Result<Json<SeatMapResponse>, AppError> {
    let flight_date = parse_date(&date)?;
    let flight = flight_service
        .flight_instance(&flight_number, flight_date)
        .await?;
    let rows = seat_map_service.seat_map(flight.id).await?;
    Ok(Json(SeatMapResponse {
        flight_number: flight.flight_number,
        flight_date: flight.flight_date,
        rows,
    }))
}

fn parse_date(date: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest("Invalid date format".into()))
}
