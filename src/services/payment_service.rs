use chrono::{Datelike, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use std::sync::Mutex;
use std::time::Duration;
use uuid::Uuid;

use crate::utils::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct CardInfo {
    pub card_number: String,
    pub card_holder: String,
    pub expiry_month: u32,
    pub expiry_year: i32,
    pub cvv: String,
}

impl CardInfo {
    // The booking flow charges a synthesized demo card; no card data is
    // collected from callers.
    pub fn demo_card() -> Self {
        CardInfo {
            card_number: "4111111111111111".to_string(),
            card_holder: "DEMO CUSTOMER".to_string(),
            expiry_month: 12,
            expiry_year: 2030,
            cvv: "123".to_string(),
        }
    }
}

// A decline is a normal outcome, not an error
#[derive(Debug, Clone)]
pub struct ChargeOutcome {
    pub success: bool,
    pub transaction_id: Option<String>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RefundOutcome {
    pub success: bool,
    pub error_message: Option<String>,
}

/// Simulated payment gateway. Authorizations succeed with a configurable
/// probability after a simulated network latency; card validation failures
/// are typed errors so the workflow can surface them before any charge.
pub struct PaymentService {
    rng: Mutex<StdRng>,
    charge_success_rate: f64,
    refund_success_rate: f64,
    latency: Duration,
}

impl PaymentService {
    pub fn new() -> Self {
        Self::with_behavior(0.90, 0.95, Duration::from_millis(200))
    }

    // Pin the outcome probabilities and latency, used by tests
    pub fn with_behavior(
        charge_success_rate: f64,
        refund_success_rate: f64,
        latency: Duration,
    ) -> Self {
        PaymentService {
            rng: Mutex::new(StdRng::from_entropy()),
            charge_success_rate,
            refund_success_rate,
            latency,
        }
    }

    pub async fn charge(&self, amount: Decimal, card: &CardInfo) -> AppResult<ChargeOutcome> {
        if amount <= Decimal::ZERO {
            return Err(AppError::ValidationError(
                "charge amount must be positive".to_string(),
            ));
        }
        validate_card(card)?;

        tokio::time::sleep(self.latency).await;

        let approved = {
            let mut rng = self.rng.lock().expect("payment rng poisoned");
            rng.gen_bool(self.charge_success_rate)
        };

        if approved {
            let transaction_id = new_transaction_id();
            tracing::info!(%transaction_id, %amount, "charge authorized");
            Ok(ChargeOutcome {
                success: true,
                transaction_id: Some(transaction_id),
                error_message: None,
            })
        } else {
            tracing::info!(%amount, "charge declined");
            Ok(ChargeOutcome {
                success: false,
                transaction_id: None,
                error_message: Some("Card was declined by the issuing bank".to_string()),
            })
        }
    }

    pub async fn refund(&self, transaction_id: &str, amount: Decimal) -> AppResult<RefundOutcome> {
        if !transaction_id.starts_with("TXN-") {
            return Err(AppError::ValidationError(
                "unknown transaction id".to_string(),
            ));
        }

        tokio::time::sleep(self.latency).await;

        let accepted = {
            let mut rng = self.rng.lock().expect("payment rng poisoned");
            rng.gen_bool(self.refund_success_rate)
        };

        if accepted {
            tracing::info!(%transaction_id, %amount, "refund accepted");
            Ok(RefundOutcome {
                success: true,
                error_message: None,
            })
        } else {
            tracing::warn!(%transaction_id, %amount, "refund rejected by gateway");
            Ok(RefundOutcome {
                success: false,
                error_message: Some("Refund was rejected by the gateway".to_string()),
            })
        }
    }
}

impl Default for PaymentService {
    fn default() -> Self {
        Self::new()
    }
}

fn new_transaction_id() -> String {
    format!(
        "TXN-{}-{}",
        Utc::now().timestamp_millis(),
        Uuid::new_v4().simple()
    )
}

fn validate_card(card: &CardInfo) -> AppResult<()> {
    let digits_only = card.card_number.chars().all(|c| c.is_ascii_digit());
    if !digits_only || card.card_number.len() < 13 || card.card_number.len() > 19 {
        return Err(AppError::ValidationError(
            "card number must be 13 to 19 digits".to_string(),
        ));
    }

    if card.expiry_month < 1 || card.expiry_month > 12 {
        return Err(AppError::ValidationError(
            "card expiry month is invalid".to_string(),
        ));
    }

    let now = Utc::now();
    let expired = card.expiry_year < now.year()
        || (card.expiry_year == now.year() && card.expiry_month < now.month());
    if expired {
        return Err(AppError::ValidationError("card has expired".to_string()));
    }

    let cvv_digits = card.cvv.chars().all(|c| c.is_ascii_digit());
    if !cvv_digits || card.cvv.len() < 3 || card.cvv.len() > 4 {
        return Err(AppError::ValidationError(
            "card security code must be 3 or 4 digits".to_string(),
        ));
    }

    Ok(())
}
