use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ServiceCategory;

/// The part of the base amount that fell into one bracket, and its fee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketContribution {
    pub bracket_label: String,

    /// Marginal rate in percent.
    pub rate_applied: Decimal,

    pub amount_in_bracket: Decimal,

    pub fee_for_bracket: Decimal,
}

/// Outcome of a fee calculation. Recomputed on every input change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub category: ServiceCategory,

    pub base_amount: Decimal,

    /// Brackets the base amount reached, lowest first. Brackets above the
    /// amount are omitted rather than listed with zero.
    pub breakdown: Vec<BracketContribution>,

    /// Sum of the bracket fees, before discount.
    pub original_fee: Decimal,

    /// Discount percent actually applied, after fallback normalization.
    pub discount_percent: Decimal,

    /// Fee payable after the discount.
    pub discounted_fee: Decimal,
}

impl CalculationResult {
    /// The breakdown with every bracket fee scaled by the effective discount.
    ///
    /// Intended for display next to `discounted_fee`; the scaled lines sum to
    /// it. Returns `None` if scaling overflows.
    pub fn discounted_breakdown(&self) -> Option<Vec<BracketContribution>> {
        let factor = self.discount_percent.checked_div(Decimal::ONE_HUNDRED)?;
        self.breakdown
            .iter()
            .map(|line| {
                Some(BracketContribution {
                    fee_for_bracket: line.fee_for_bracket.checked_mul(factor)?,
                    ..line.clone()
                })
            })
            .collect()
    }
}
