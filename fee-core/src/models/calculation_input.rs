use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Serialize};

use super::ServiceCategory;

/// Inputs for one fee calculation.
///
/// `None` in either numeric field means the caller had no usable number
/// (missing, non-numeric, or non-finite). The engine rejects a missing base
/// amount but treats a missing discount as "no discount".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationInput {
    /// Base amount, already converted to the schedule's monetary unit.
    pub base_amount: Option<Decimal>,
    pub category: ServiceCategory,
    /// Payable share of the fee, in percent. `100` means no discount.
    pub discount_percent: Option<Decimal>,
}

impl CalculationInput {
    pub fn new(
        category: ServiceCategory,
        base_amount: Decimal,
        discount_percent: Decimal,
    ) -> Self {
        Self {
            base_amount: Some(base_amount),
            category,
            discount_percent: Some(discount_percent),
        }
    }

    /// Builds an input from raw form text.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use fee_core::{CalculationInput, ServiceCategory};
    ///
    /// let input = CalculationInput::from_text(ServiceCategory::Goods, " 6000000 ", "abc");
    ///
    /// assert_eq!(input.base_amount, Some(dec!(6000000)));
    /// assert_eq!(input.discount_percent, None);
    /// ```
    pub fn from_text(
        category: ServiceCategory,
        base_amount: &str,
        discount_percent: &str,
    ) -> Self {
        Self {
            base_amount: parse_decimal(base_amount),
            category,
            discount_percent: parse_decimal(discount_percent),
        }
    }

    /// Builds an input from floating-point values. NaN and infinities map to
    /// `None`.
    pub fn from_f64(
        category: ServiceCategory,
        base_amount: f64,
        discount_percent: f64,
    ) -> Self {
        Self {
            base_amount: finite_decimal(base_amount),
            category,
            discount_percent: finite_decimal(discount_percent),
        }
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

fn finite_decimal(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_f64(value)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn from_text_parses_plain_numbers() {
        let input = CalculationInput::from_text(ServiceCategory::Works, "1500000.50", "85");

        assert_eq!(input.base_amount, Some(dec!(1500000.50)));
        assert_eq!(input.discount_percent, Some(dec!(85)));
    }

    #[test]
    fn from_text_parses_scientific_notation() {
        let input = CalculationInput::from_text(ServiceCategory::Works, "6e6", "");

        assert_eq!(input.base_amount, Some(dec!(6000000)));
    }

    #[test]
    fn from_text_maps_empty_and_garbage_to_none() {
        let input = CalculationInput::from_text(ServiceCategory::Goods, "   ", "ten");

        assert_eq!(input.base_amount, None);
        assert_eq!(input.discount_percent, None);
    }

    #[test]
    fn from_text_keeps_negative_values() {
        let input = CalculationInput::from_text(ServiceCategory::Goods, "-1", "-5");

        assert_eq!(input.base_amount, Some(dec!(-1)));
        assert_eq!(input.discount_percent, Some(dec!(-5)));
    }

    #[test]
    fn from_f64_maps_non_finite_to_none() {
        let input = CalculationInput::from_f64(ServiceCategory::Goods, f64::INFINITY, f64::NAN);

        assert_eq!(input.base_amount, None);
        assert_eq!(input.discount_percent, None);
    }

    #[test]
    fn from_f64_converts_finite_values() {
        let input = CalculationInput::from_f64(ServiceCategory::Services, 6000000.0, 85.0);

        assert_eq!(input.base_amount, Some(dec!(6000000)));
        assert_eq!(input.discount_percent, Some(dec!(85)));
    }
}
