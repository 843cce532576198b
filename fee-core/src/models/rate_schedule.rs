//! Rate schedule registry.
//!
//! A [`RateSchedule`] pairs an ordered list of [`Bracket`]s with, per
//! [`ServiceCategory`], a parallel list of marginal rates expressed in
//! percent. Schedules are plain data injected at startup; every constructor
//! runs the same validation so an invalid schedule can never reach the
//! accumulator.
//!
//! # Invariants
//!
//! - At least one bracket and at least one category.
//! - The first upper bound is strictly positive and bounds strictly increase.
//! - Exactly one bracket is unbounded, and it is the last.
//! - Every category has exactly one rate per bracket, each within `[0, 100]`.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//!
//! use rust_decimal_macros::dec;
//! use fee_core::{Bracket, RateSchedule, ServiceCategory};
//!
//! let brackets = vec![
//!     Bracket::bounded(dec!(1000000), "up to 1M"),
//!     Bracket::unbounded("over 1M"),
//! ];
//! let rates = BTreeMap::from([(ServiceCategory::Goods, vec![dec!(1.50), dec!(1.10)])]);
//!
//! let schedule = RateSchedule::new(brackets, rates).unwrap();
//! let goods = schedule.rates_for(ServiceCategory::Goods).unwrap();
//!
//! assert_eq!(goods.len(), 2);
//! assert_eq!(goods[1].rate, dec!(1.10));
//! assert!(schedule.rates_for(ServiceCategory::Works).is_err());
//! ```

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Bracket, ServiceCategory};
use crate::FeeError;

/// Reasons a schedule fails validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("rate schedule has no brackets")]
    NoBrackets,

    #[error("rate schedule defines no categories")]
    NoCategories,

    /// The first bracket must cover a non-empty range above zero.
    #[error("first bracket upper bound must be positive, got {0}")]
    NonPositiveFirstBound(Decimal),

    #[error("bracket {index} upper bound does not exceed the previous bound")]
    BoundsNotIncreasing { index: usize },

    #[error("bracket {index} is unbounded but is not the last bracket")]
    UnboundedNotLast { index: usize },

    #[error("last bracket must be unbounded")]
    MissingUnboundedBracket,

    #[error("category '{category}' has {actual} rates for {expected} brackets")]
    RateCountMismatch {
        category: ServiceCategory,
        expected: usize,
        actual: usize,
    },

    #[error("category '{category}' rate {index} must be between 0 and 100, got {rate}")]
    InvalidRate {
        category: ServiceCategory,
        index: usize,
        rate: Decimal,
    },
}

/// Unvalidated schedule data, as it appears in configuration files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateScheduleConfig {
    pub brackets: Vec<Bracket>,
    pub rates: BTreeMap<ServiceCategory, Vec<Decimal>>,
}

/// A bracket paired with the marginal rate (percent) one category pays in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BracketRate<'a> {
    pub bracket: &'a Bracket,
    pub rate: Decimal,
}

/// Validated, immutable rate schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RateScheduleConfig", into = "RateScheduleConfig")]
pub struct RateSchedule {
    brackets: Vec<Bracket>,
    rates: BTreeMap<ServiceCategory, Vec<Decimal>>,
}

impl RateSchedule {
    /// Builds a schedule, rejecting any data that breaks the invariants.
    ///
    /// # Errors
    ///
    /// Returns the first [`ScheduleError`] encountered.
    pub fn new(
        brackets: Vec<Bracket>,
        rates: BTreeMap<ServiceCategory, Vec<Decimal>>,
    ) -> Result<Self, ScheduleError> {
        validate_brackets(&brackets)?;
        validate_rates(brackets.len(), &rates)?;
        Ok(Self { brackets, rates })
    }

    pub fn brackets(&self) -> &[Bracket] {
        &self.brackets
    }

    /// Categories this schedule defines rates for, in enumeration order.
    pub fn categories(&self) -> impl Iterator<Item = ServiceCategory> + '_ {
        self.rates.keys().copied()
    }

    /// Ordered `(bracket, rate)` pairs for `category`.
    ///
    /// # Errors
    ///
    /// Returns [`FeeError::UnknownCategory`] if the schedule has no rates for
    /// the category.
    pub fn rates_for(
        &self,
        category: ServiceCategory,
    ) -> Result<Vec<BracketRate<'_>>, FeeError> {
        let rates = self
            .rates
            .get(&category)
            .ok_or_else(|| FeeError::UnknownCategory(category.to_string()))?;

        Ok(self
            .brackets
            .iter()
            .zip(rates.iter().copied())
            .map(|(bracket, rate)| BracketRate { bracket, rate })
            .collect())
    }
}

impl TryFrom<RateScheduleConfig> for RateSchedule {
    type Error = ScheduleError;

    fn try_from(config: RateScheduleConfig) -> Result<Self, Self::Error> {
        Self::new(config.brackets, config.rates)
    }
}

impl From<RateSchedule> for RateScheduleConfig {
    fn from(schedule: RateSchedule) -> Self {
        Self {
            brackets: schedule.brackets,
            rates: schedule.rates,
        }
    }
}

fn validate_brackets(brackets: &[Bracket]) -> Result<(), ScheduleError> {
    let Some(last) = brackets.last() else {
        return Err(ScheduleError::NoBrackets);
    };
    if !last.is_unbounded() {
        return Err(ScheduleError::MissingUnboundedBracket);
    }

    let last_index = brackets.len() - 1;
    let mut previous: Option<Decimal> = None;
    for (index, bracket) in brackets.iter().enumerate() {
        let Some(bound) = bracket.upper_bound else {
            if index != last_index {
                return Err(ScheduleError::UnboundedNotLast { index });
            }
            continue;
        };
        match previous {
            None if bound <= Decimal::ZERO => {
                return Err(ScheduleError::NonPositiveFirstBound(bound));
            }
            Some(prev) if bound <= prev => {
                return Err(ScheduleError::BoundsNotIncreasing { index });
            }
            _ => {}
        }
        previous = Some(bound);
    }
    Ok(())
}

fn validate_rates(
    bracket_count: usize,
    rates: &BTreeMap<ServiceCategory, Vec<Decimal>>,
) -> Result<(), ScheduleError> {
    if rates.is_empty() {
        return Err(ScheduleError::NoCategories);
    }

    let hundred = Decimal::ONE_HUNDRED;
    for (&category, category_rates) in rates {
        if category_rates.len() != bracket_count {
            return Err(ScheduleError::RateCountMismatch {
                category,
                expected: bracket_count,
                actual: category_rates.len(),
            });
        }
        if let Some((index, &rate)) = category_rates
            .iter()
            .enumerate()
            .find(|&(_, &rate)| rate < Decimal::ZERO || rate > hundred)
        {
            return Err(ScheduleError::InvalidRate {
                category,
                index,
                rate,
            });
        }
    }
    Ok(())
}
