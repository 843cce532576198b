pub mod calculations;
pub mod error;
pub mod models;

pub use calculations::{AppliedDiscount, FeeEngine, accumulate, apply_discount};
pub use error::FeeError;
pub use models::*;
