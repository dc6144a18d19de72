use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::seat::SeatClass;

/// Fare pricing is a pure function of the passenger manifest: base fare times
/// the per-class multiplier, summed per passenger. All arithmetic stays in
/// `Decimal`; totals are rounded to cents with midpoint-away-from-zero.

// $299.99
pub fn base_fare() -> Decimal {
    Decimal::new(29999, 2)
}

pub fn total_fare(seat_classes: &[SeatClass]) -> Decimal {
    let total: Decimal = seat_classes
        .iter()
        .map(|class| base_fare() * class.fare_multiplier())
        .sum();

    total.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
