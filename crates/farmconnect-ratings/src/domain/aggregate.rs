//! Product score aggregation.

use farmconnect_core::records::RatingSummary;
use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places of the stored mean.
pub const RATING_SCALE: u32 = 2;

/// Mean of `stars` rounded half-up to two decimals, plus the count.
///
/// No stars yields `0.00` with a count of zero. The result always carries
/// exactly two decimal places.
#[must_use]
pub fn summarize(stars: &[i32]) -> RatingSummary {
    let total_ratings = i32::try_from(stars.len()).unwrap_or(i32::MAX);
    if stars.is_empty() {
        return RatingSummary {
            rating: Decimal::new(0, RATING_SCALE),
            total_ratings,
        };
    }

    let sum: i64 = stars.iter().map(|s| i64::from(*s)).sum();
    let mean = Decimal::from(sum) / Decimal::from(stars.len());
    let mut rating =
        mean.round_dp_with_strategy(RATING_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rating.rescale(RATING_SCALE);
    RatingSummary {
        rating,
        total_ratings,
    }
}
