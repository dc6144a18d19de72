use rocket::serde::json::Json;
use rocket::State;
use rocket_okapi::openapi;

use crate::models::booking::{BookingRequest, BookingResponse, CheckInResponse};
use crate::services::booking_service::BookingService;
use crate::utils::error::AppError;
use crate::utils::jwt::AuthenticatedUser;

/// Create a booking: price, charge, persist, confirm
#[openapi(tag = "Bookings")]
#[post("/bookings", format = "json", data = "<request>")]
pub async fn create_booking(
    request: Json<BookingRequest>,
    auth: AuthenticatedUser,
    booking_service: &State<BookingService>,
) -> Result<Json<BookingResponse>, AppError> {
    let response = booking_service
        .create_booking(auth.user_id, request.into_inner())
        .await?;
    Ok(Json(response))
}

/// Booking details by confirmation number
#[openapi(tag = "Bookings")]
#[get("/bookings/<confirmation_number>")]
pub async fn get_booking(
    confirmation_number: String,
    _auth: AuthenticatedUser,
    booking_service: &State<BookingService>,
) -> Result<Json<BookingResponse>, AppError> {
    let response = booking_service.booking_details(&confirmation_number).await?;
    Ok(Json(response))
}

/// Check in a confirmed booking and issue a boarding pass
#[openapi(tag = "Bookings")]
#[post("/bookings/<confirmation_number>/checkin")]
pub async fn check_in(
    confirmation_number: String,
    _auth: AuthenticatedUser,
    booking_service: &State<BookingService>,
) -> Result<Json<CheckInResponse>, AppError> {
    let response = booking_service.check_in(&confirmation_number).await?;
    Ok(Json(response))
}
