pub mod assistant;
pub mod availability;
pub mod log;
pub mod notify;
pub mod timefmt;
pub mod tips;
