pub mod loader;

pub use loader::{
    RateScheduleLoader, RateScheduleLoaderError, RateScheduleRecord, default_schedule,
};
