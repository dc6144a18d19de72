pub mod booking_route;
pub mod flight_route;
pub mod weather_route;
