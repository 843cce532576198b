//! Progressive fee calculation.
//!
//! The [`accumulator`] splits a base amount across the brackets of a rate
//! schedule, the [`discount`] applier scales the resulting fee, and the
//! [`engine`] ties both to an injected [`RateSchedule`](crate::RateSchedule).

pub mod accumulator;
pub mod discount;
pub mod engine;

pub use accumulator::{Accumulation, accumulate};
pub use discount::{AppliedDiscount, NO_DISCOUNT_PERCENT, apply_discount};
pub use engine::FeeEngine;
