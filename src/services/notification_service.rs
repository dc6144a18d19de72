use rust_decimal::Decimal;
use std::time::Duration;

/// Stub e-mail delivery. The booking workflow spawns this fire-and-forget;
/// a failure here never fails the booking.
#[derive(Clone)]
pub struct NotificationService {
    latency: Duration,
}

impl NotificationService {
    pub fn new() -> Self {
        NotificationService {
            latency: Duration::from_millis(100),
        }
    }

    pub async fn send_booking_confirmation(
        &self,
        confirmation_number: &str,
        email: &str,
        total_amount: Decimal,
    ) -> bool {
        tokio::time::sleep(self.latency).await;
        tracing::info!(
            %confirmation_number,
            %email,
            %total_amount,
            "booking confirmation sent"
        );
        true
    }
}

impl Default for NotificationService {
    fn default() -> Self {
        Self::new()
    }
}
