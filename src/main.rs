use dotenv::dotenv;
use rocket::fairing::AdHoc;
use rocket_okapi::openapi_get_routes;
use rocket_okapi::swagger_ui::make_swagger_ui;
use tracing_subscriber::EnvFilter;

use flight_booking_system::db::Database;
use flight_booking_system::routes;
use flight_booking_system::services::booking_service::BookingService;
use flight_booking_system::services::flight_service::FlightService;
use flight_booking_system::services::seat_map_service::SeatMapService;
use flight_booking_system::services::weather_service::WeatherService;
use flight_booking_system::swagger::swagger_ui;

#[rocket::launch]
async fn rocket() -> _ {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Connect to the database and make sure the schema exists
    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite:flight_booking.db".to_string());
    let database = Database::new(&database_url)
        .await
        .expect("Failed to connect to database");
    Database::init_schema(database.get_pool())
        .await
        .expect("Failed to initialise database schema");

    // Initialize the services
    let flight_service = FlightService::new(database.pool.clone());
    let seat_map_service = SeatMapService::new(database.pool.clone());
    let booking_service = BookingService::new(database.pool.clone());
    let weather_service = WeatherService::new();

    flight_service
        .seed_demo_flights(&seat_map_service)
        .await
        .expect("Failed to seed demo flights");

    rocket::build()
        .manage(flight_service)
        .manage(seat_map_service)
        .manage(booking_service)
        .manage(weather_service)
        .mount(
            "/api",
            openapi_get_routes![
                routes::flight_route::get_flight,
                routes::flight_route::get_seat_map,
                routes::booking_route::create_booking,
                routes::booking_route::get_booking,
                routes::booking_route::check_in,
                routes::weather_route::get_weather,
            ],
        )
        .mount("/swagger", make_swagger_ui(&swagger_ui()))
        .attach(AdHoc::on_response("CORS", |_, res| {
            Box::pin(async move {
                res.set_header(rocket::http::Header::new(
                    "Access-Control-Allow-Origin",
                    "*",
                ));
            })
        }))
}
