//! Derived ship rating.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Year the rating formula measures age against.
pub const REFERENCE_YEAR: i32 = 3019;
/// Decimal places kept in a rating.
pub const RATING_SCALE: u32 = 2;

const SPEED_WEIGHT: f64 = 80.0;
const NEW_COEFFICIENT: f64 = 1.0;
const USED_COEFFICIENT: f64 = 0.5;

/// Compute the rating for a ship with the given speed, production year and used flag.
///
/// `round(80 * speed * k / (3019 - year + 1), 2)` where `k` is 0.5 for used ships.
pub fn compute_rating(speed: f64, production_year: i32, used: bool) -> f64 {
    let coefficient = if used {
        USED_COEFFICIENT
    } else {
        NEW_COEFFICIENT
    };
    let age = REFERENCE_YEAR - production_year + 1;
    let raw = SPEED_WEIGHT * speed * coefficient / f64::from(age);
    round_half_up(raw, RATING_SCALE)
}

/// Round half away from zero using decimal arithmetic.
///
/// The value is first converted through its shortest decimal representation,
/// so `2.675` rounds to `2.68` even though its binary form is slightly below.
/// Values that do not fit a [`Decimal`] are returned unchanged.
pub fn round_half_up(value: f64, scale: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    match Decimal::from_str(&value.to_string()) {
        Ok(decimal) => decimal
            .round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero)
            .to_f64()
            .unwrap_or(value),
        Err(_) => value,
    }
}
