//! Segmented accumulation of a base amount across rate brackets.
//!
//! Each bracket charges its marginal rate only on the slice of the base
//! amount that falls inside it:
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | `remaining = base_amount`, `previous_bound = 0` |
//! | 2    | `span = upper_bound - previous_bound` (infinite for the last bracket) |
//! | 3    | `amount_in_bracket = min(max(remaining, 0), span)` |
//! | 4    | `fee = amount_in_bracket × rate / 100`, added to the total |
//! | 5    | Stop as soon as nothing remains to allocate |
//!
//! An amount sitting exactly on a boundary is charged entirely at the lower
//! bracket's rate, because the lower span is consumed before the next
//! bracket is reached.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//!
//! use rust_decimal_macros::dec;
//! use fee_core::{Bracket, RateSchedule, ServiceCategory, accumulate};
//!
//! let schedule = RateSchedule::new(
//!     vec![
//!         Bracket::bounded(dec!(1000000), "up to 1M"),
//!         Bracket::bounded(dec!(5000000), "1M - 5M"),
//!         Bracket::unbounded("over 5M"),
//!     ],
//!     BTreeMap::from([(ServiceCategory::Goods, vec![dec!(1.50), dec!(1.10), dec!(0.80)])]),
//! )
//! .unwrap();
//!
//! let rates = schedule.rates_for(ServiceCategory::Goods).unwrap();
//! let accumulation = accumulate(dec!(6000000), &rates).unwrap();
//!
//! assert_eq!(accumulation.original_fee, dec!(67000));
//! assert_eq!(accumulation.breakdown.len(), 3);
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::{BracketContribution, BracketRate, FeeError};

/// Per-bracket breakdown and undiscounted total for one base amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accumulation {
    pub breakdown: Vec<BracketContribution>,
    pub original_fee: Decimal,
}

/// Allocates `base_amount` across `rates` and sums the marginal fees.
///
/// `rates` is expected to come from [`RateSchedule::rates_for`], which
/// guarantees ascending bounds and an unbounded last bracket, so the whole
/// amount is always allocated.
///
/// [`RateSchedule::rates_for`]: crate::RateSchedule::rates_for
///
/// # Errors
///
/// - [`FeeError::InvalidAmount`] if `base_amount` is negative.
/// - [`FeeError::Overflow`] if a bracket fee cannot be represented.
pub fn accumulate(
    base_amount: Decimal,
    rates: &[BracketRate<'_>],
) -> Result<Accumulation, FeeError> {
    if base_amount < Decimal::ZERO {
        return Err(FeeError::InvalidAmount(base_amount.to_string()));
    }

    let mut breakdown = Vec::new();
    let mut original_fee = Decimal::ZERO;
    let mut remaining = base_amount;
    let mut previous_bound = Decimal::ZERO;

    for BracketRate { bracket, rate } in rates {
        let available = remaining.max(Decimal::ZERO);
        let amount_in_bracket = match bracket.span(previous_bound) {
            Some(span) => available.min(span),
            None => available,
        };

        if amount_in_bracket <= Decimal::ZERO {
            break;
        }

        let fee = bracket_fee(amount_in_bracket, *rate)?;
        debug!(
            bracket = %bracket.label,
            rate = %rate,
            amount = %amount_in_bracket,
            fee = %fee,
            "allocated amount to bracket"
        );

        breakdown.push(BracketContribution {
            bracket_label: bracket.label.clone(),
            rate_applied: *rate,
            amount_in_bracket,
            fee_for_bracket: fee,
        });
        original_fee += fee;
        remaining -= amount_in_bracket;

        if let Some(bound) = bracket.upper_bound {
            previous_bound = bound;
        }
    }

    Ok(Accumulation {
        breakdown,
        original_fee,
    })
}

/// Fee owed on `amount` at `rate` percent.
fn bracket_fee(
    amount: Decimal,
    rate: Decimal,
) -> Result<Decimal, FeeError> {
    let fraction = rate
        .checked_div(Decimal::ONE_HUNDRED)
        .ok_or(FeeError::Overflow)?;
    amount.checked_mul(fraction).ok_or(FeeError::Overflow)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::{Bracket, RateSchedule, ServiceCategory};

    fn goods_schedule() -> RateSchedule {
        RateSchedule::new(
            vec![
                Bracket::bounded(dec!(1000000), "up to 1M"),
                Bracket::bounded(dec!(5000000), "1M - 5M"),
                Bracket::bounded(dec!(10000000), "5M - 10M"),
                Bracket::bounded(dec!(50000000), "10M - 50M"),
                Bracket::bounded(dec!(100000000), "50M - 100M"),
                Bracket::bounded(dec!(1000000000), "100M - 1B"),
                Bracket::unbounded("over 1B"),
            ],
            BTreeMap::from([(
                ServiceCategory::Goods,
                vec![
                    dec!(1.50),
                    dec!(1.10),
                    dec!(0.80),
                    dec!(0.50),
                    dec!(0.25),
                    dec!(0.05),
                    dec!(0.01),
                ],
            )]),
        )
        .unwrap()
    }

    fn run(base_amount: Decimal) -> Accumulation {
        let schedule = goods_schedule();
        let rates = schedule.rates_for(ServiceCategory::Goods).unwrap();
        accumulate(base_amount, &rates).unwrap()
    }

    fn allocated(accumulation: &Accumulation) -> Decimal {
        accumulation
            .breakdown
            .iter()
            .map(|line| line.amount_in_bracket)
            .sum()
    }

    // =========================================================================
    // scenario tests
    // =========================================================================

    #[test]
    fn accumulate_splits_six_million_across_three_brackets() {
        let result = run(dec!(6000000));

        assert_eq!(
            result.breakdown,
            vec![
                BracketContribution {
                    bracket_label: "up to 1M".to_string(),
                    rate_applied: dec!(1.50),
                    amount_in_bracket: dec!(1000000),
                    fee_for_bracket: dec!(15000),
                },
                BracketContribution {
                    bracket_label: "1M - 5M".to_string(),
                    rate_applied: dec!(1.10),
                    amount_in_bracket: dec!(4000000),
                    fee_for_bracket: dec!(44000),
                },
                BracketContribution {
                    bracket_label: "5M - 10M".to_string(),
                    rate_applied: dec!(0.80),
                    amount_in_bracket: dec!(1000000),
                    fee_for_bracket: dec!(8000),
                },
            ]
        );
        assert_eq!(result.original_fee, dec!(67000));
    }

    #[test]
    fn accumulate_stays_in_first_bracket_for_small_amounts() {
        let result = run(dec!(250000));

        assert_eq!(result.breakdown.len(), 1);
        assert_eq!(result.original_fee, dec!(3750));
    }

    #[test]
    fn accumulate_handles_fractional_amounts() {
        let result = run(dec!(0.50));

        assert_eq!(result.breakdown.len(), 1);
        assert_eq!(result.original_fee, dec!(0.0075));
    }

    // =========================================================================
    // zero and invalid amount tests
    // =========================================================================

    #[test]
    fn accumulate_zero_yields_empty_breakdown() {
        let result = run(dec!(0));

        assert!(result.breakdown.is_empty());
        assert_eq!(result.original_fee, dec!(0));
    }

    #[test]
    fn accumulate_treats_negative_zero_as_zero() {
        let result = run(-dec!(0));

        assert!(result.breakdown.is_empty());
    }

    #[test]
    fn accumulate_rejects_negative_amount() {
        let schedule = goods_schedule();
        let rates = schedule.rates_for(ServiceCategory::Goods).unwrap();

        let result = accumulate(dec!(-1), &rates);

        assert_eq!(result, Err(FeeError::InvalidAmount("-1".to_string())));
    }

    // =========================================================================
    // boundary tests
    // =========================================================================

    #[test]
    fn accumulate_assigns_exact_boundary_to_lower_bracket() {
        let result = run(dec!(1000000));

        assert_eq!(result.breakdown.len(), 1);
        assert_eq!(result.breakdown[0].amount_in_bracket, dec!(1000000));
        assert_eq!(result.original_fee, dec!(15000));
    }

    #[test]
    fn accumulate_is_continuous_at_boundaries() {
        let schedule = goods_schedule();
        let mut previous = Decimal::ZERO;
        let mut expected_fee = Decimal::ZERO;

        for pair in schedule.rates_for(ServiceCategory::Goods).unwrap() {
            let Some(bound) = pair.bracket.upper_bound else {
                break;
            };
            expected_fee += (bound - previous) * pair.rate / dec!(100);
            previous = bound;

            assert_eq!(run(bound).original_fee, expected_fee, "at bound {bound}");
        }
    }

    #[test]
    fn accumulate_moves_into_next_bracket_just_past_boundary() {
        let result = run(dec!(1000001));

        assert_eq!(result.breakdown.len(), 2);
        assert_eq!(result.breakdown[1].amount_in_bracket, dec!(1));
        assert_eq!(result.original_fee, dec!(15000.011));
    }

    #[test]
    fn accumulate_uses_unbounded_bracket_for_huge_amounts() {
        let result = run(dec!(1000000000000000));

        assert_eq!(result.breakdown.len(), 7);
        let last = result.breakdown.last().unwrap();
        assert_eq!(last.bracket_label, "over 1B");
        assert_eq!(last.amount_in_bracket, dec!(999999000000000));
        assert_eq!(allocated(&result), dec!(1000000000000000));
    }

    // =========================================================================
    // property tests
    // =========================================================================

    #[test]
    fn accumulate_conserves_base_amount() {
        let amounts = [
            dec!(1),
            dec!(999999.99),
            dec!(6000000),
            dec!(73500000.25),
            dec!(1000000000),
            dec!(4321987654.321),
        ];

        for amount in amounts {
            assert_eq!(allocated(&run(amount)), amount, "amount {amount}");
        }
    }

    #[test]
    fn accumulate_fee_is_monotonic_in_amount() {
        let mut previous_fee = Decimal::ZERO;
        let mut amount = Decimal::ZERO;

        while amount <= dec!(2000000000) {
            let fee = run(amount).original_fee;
            assert!(fee >= previous_fee, "fee dropped at {amount}");
            previous_fee = fee;
            amount += dec!(7500000);
        }
    }

    #[test]
    fn accumulate_does_not_list_unreached_brackets() {
        let result = run(dec!(6000000));

        assert!(result.breakdown.iter().all(|l| l.amount_in_bracket > Decimal::ZERO));
        assert!(result.breakdown.iter().all(|l| l.fee_for_bracket >= Decimal::ZERO));
    }

    #[test]
    fn accumulate_handles_single_flat_bracket() {
        let brackets = [Bracket::unbounded("flat")];
        let rates = [BracketRate {
            bracket: &brackets[0],
            rate: dec!(2),
        }];

        let result = accumulate(dec!(500), &rates).unwrap();

        assert_eq!(result.original_fee, dec!(10));
    }
}
