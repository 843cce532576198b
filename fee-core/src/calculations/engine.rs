//! Fee engine facade.
//!
//! [`FeeEngine`] borrows an injected [`RateSchedule`] and turns a
//! [`CalculationInput`] into a [`CalculationResult`]. It holds no mutable
//! state, so one engine can serve any number of callers and threads.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//!
//! use rust_decimal_macros::dec;
//! use fee_core::{Bracket, CalculationInput, FeeEngine, RateSchedule, ServiceCategory};
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
//! let engine = FeeEngine::new(&schedule);
//! let input = CalculationInput::new(ServiceCategory::Goods, dec!(6000000), dec!(85));
//! let result = engine.calculate(&input).unwrap();
//!
//! assert_eq!(result.original_fee, dec!(67000));
//! assert_eq!(result.discounted_fee, dec!(56950));
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use super::{accumulate, apply_discount};
use crate::{CalculationInput, CalculationResult, FeeError, RateSchedule, ServiceCategory};

/// Calculator for progressive service fees.
#[derive(Debug, Clone, Copy)]
pub struct FeeEngine<'a> {
    schedule: &'a RateSchedule,
}

impl<'a> FeeEngine<'a> {
    pub fn new(schedule: &'a RateSchedule) -> Self {
        Self { schedule }
    }

    pub fn schedule(&self) -> &'a RateSchedule {
        self.schedule
    }

    /// Calculates the fee, its bracket breakdown, and the discounted total.
    ///
    /// # Errors
    ///
    /// - [`FeeError::InvalidAmount`] if the base amount is missing or
    ///   negative. No partial result is produced.
    /// - [`FeeError::UnknownCategory`] if the schedule has no rates for the
    ///   category.
    /// - [`FeeError::Overflow`] if a product leaves the decimal range.
    ///
    /// An invalid discount percent never fails; it is treated as no discount.
    pub fn calculate(
        &self,
        input: &CalculationInput,
    ) -> Result<CalculationResult, FeeError> {
        let base_amount = input
            .base_amount
            .ok_or_else(|| FeeError::InvalidAmount("missing or non-numeric".to_string()))?;

        self.calculate_amount(input.category, base_amount, input.discount_percent)
    }

    /// Same as [`calculate`](Self::calculate) for callers that already hold a
    /// decimal base amount.
    pub fn calculate_amount(
        &self,
        category: ServiceCategory,
        base_amount: Decimal,
        discount_percent: Option<Decimal>,
    ) -> Result<CalculationResult, FeeError> {
        if base_amount < Decimal::ZERO {
            return Err(FeeError::InvalidAmount(base_amount.to_string()));
        }

        let rates = self.schedule.rates_for(category)?;
        let accumulation = accumulate(base_amount, &rates)?;
        let discount = apply_discount(accumulation.original_fee, discount_percent)?;

        debug!(
            %category,
            %base_amount,
            original_fee = %accumulation.original_fee,
            discount_percent = %discount.effective_percent,
            discounted_fee = %discount.discounted_fee,
            "calculated fee"
        );

        Ok(CalculationResult {
            category,
            base_amount,
            breakdown: accumulation.breakdown,
            original_fee: accumulation.original_fee,
            discount_percent: discount.effective_percent,
            discounted_fee: discount.discounted_fee,
        })
    }
}
