pub mod booking_service;
pub mod fare_service;
pub mod flight_service;
pub mod notification_service;
pub mod payment_service;
pub mod seat_map_service;
pub mod weather_service;
