//! Discount application.
//!
//! The discount percent is the payable share of the fee: `100` charges the
//! full fee, `85` charges 85% of it, and values above `100` act as a markup.
//! A missing, non-numeric, or negative percent is not an error; it falls
//! back to [`NO_DISCOUNT_PERCENT`].

use rust_decimal::Decimal;
use tracing::warn;

use crate::FeeError;

/// Percent that leaves the fee unchanged.
pub const NO_DISCOUNT_PERCENT: Decimal = Decimal::ONE_HUNDRED;

/// Effective discount and the fee it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedDiscount {
    pub effective_percent: Decimal,
    pub discounted_fee: Decimal,
}

/// Scales `original_fee` by `discount_percent / 100`.
///
/// # Errors
///
/// Returns [`FeeError::Overflow`] only if the product exceeds the decimal
/// range, which requires a markup on an astronomically large fee.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use fee_core::apply_discount;
///
/// let applied = apply_discount(dec!(67000), Some(dec!(85))).unwrap();
/// assert_eq!(applied.discounted_fee, dec!(56950));
///
/// let fallback = apply_discount(dec!(67000), Some(dec!(-5))).unwrap();
/// assert_eq!(fallback.effective_percent, dec!(100));
/// assert_eq!(fallback.discounted_fee, dec!(67000));
/// ```
pub fn apply_discount(
    original_fee: Decimal,
    discount_percent: Option<Decimal>,
) -> Result<AppliedDiscount, FeeError> {
    let effective_percent = effective_percent(discount_percent);

    let discounted_fee = if effective_percent == NO_DISCOUNT_PERCENT {
        original_fee
    } else {
        effective_percent
            .checked_div(Decimal::ONE_HUNDRED)
            .and_then(|factor| original_fee.checked_mul(factor))
            .ok_or(FeeError::Overflow)?
    };

    Ok(AppliedDiscount {
        effective_percent,
        discounted_fee,
    })
}

fn effective_percent(discount_percent: Option<Decimal>) -> Decimal {
    match discount_percent {
        Some(percent) if percent >= Decimal::ZERO => percent,
        Some(percent) => {
            warn!(
                discount_percent = %percent,
                "negative discount percent; charging the full fee"
            );
            NO_DISCOUNT_PERCENT
        }
        None => {
            warn!("missing or non-numeric discount percent; charging the full fee");
            NO_DISCOUNT_PERCENT
        }
    }
}
