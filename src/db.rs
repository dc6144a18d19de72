use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

// Database connection manager
pub struct Database {
    pub pool: SqlitePool,
}

impl Database {
    // Create a new database connection pool
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(3))
            .connect_with(options)
            .await?;

        Ok(Database { pool })
    }

    // Get a reference to the connection pool
    pub fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }

    // Create the schema if it does not exist yet
    pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
        let tables = vec![
            "CREATE TABLE IF NOT EXISTS flight (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                flight_number TEXT NOT NULL,
                flight_date TEXT NOT NULL,
                origin TEXT NOT NULL,
                destination TEXT NOT NULL,
                scheduled_departure TEXT NOT NULL,
                scheduled_arrival TEXT NOT NULL,
                estimated_departure TEXT NULL,
                estimated_arrival TEXT NULL,
                status TEXT NOT NULL DEFAULT 'SCHEDULED',
                gate TEXT NULL,
                terminal TEXT NULL,
                CONSTRAINT flight_number_date_uindex UNIQUE (flight_number, flight_date)
            )",
            "CREATE TABLE IF NOT EXISTS seat (
                flight_id INTEGER NOT NULL,
                seat_number TEXT NOT NULL,
                cabin_row INTEGER NOT NULL,
                seat_class TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'AVAILABLE',
                PRIMARY KEY (flight_id, seat_number),
                CONSTRAINT seat_flight_id_fk
                    FOREIGN KEY (flight_id) REFERENCES flight(id)
                    ON DELETE CASCADE
            )",
            "CREATE TABLE IF NOT EXISTS booking (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                confirmation_number TEXT NOT NULL,
                user_id INTEGER NOT NULL,
                flight_id INTEGER NOT NULL,
                status TEXT NOT NULL,
                payment_status TEXT NOT NULL,
                payment_transaction_id TEXT NULL,
                contact_email TEXT NULL,
                total_amount_cents INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                CONSTRAINT booking_confirmation_uindex UNIQUE (confirmation_number),
                CONSTRAINT booking_flight_id_fk
                    FOREIGN KEY (flight_id) REFERENCES flight(id)
            )",
            "CREATE TABLE IF NOT EXISTS passenger (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                booking_id INTEGER NOT NULL,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                date_of_birth TEXT NULL,
                seat_number TEXT NULL,
                seat_class TEXT NOT NULL,
                checked_in INTEGER NOT NULL DEFAULT 0,
                checked_in_at TEXT NULL,
                CONSTRAINT passenger_booking_id_fk
                    FOREIGN KEY (booking_id) REFERENCES booking(id)
                    ON DELETE CASCADE
            )",
            "CREATE TABLE IF NOT EXISTS baggage (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                booking_id INTEGER NOT NULL,
                tracking_number TEXT NOT NULL,
                baggage_type TEXT NOT NULL,
                weight_kg REAL NOT NULL,
                status TEXT NOT NULL,
                CONSTRAINT baggage_tracking_uindex UNIQUE (tracking_number),
                CONSTRAINT baggage_booking_id_fk
                    FOREIGN KEY (booking_id) REFERENCES booking(id)
                    ON DELETE CASCADE
            )",
        ];

        for create_sql in tables {
            sqlx::query(create_sql).execute(pool).await?;
        }

        Ok(())
    }
}
