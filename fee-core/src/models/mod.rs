mod bracket;
mod calculation_input;
mod calculation_result;
mod rate_schedule;
mod service_category;

pub use bracket::Bracket;
pub use calculation_input::CalculationInput;
pub use calculation_result::{BracketContribution, CalculationResult};
pub use rate_schedule::{BracketRate, RateSchedule, RateScheduleConfig, ScheduleError};
pub use service_category::ServiceCategory;
