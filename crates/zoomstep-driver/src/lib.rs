//! Tick driver for the digital zoom step controller.

pub mod config;
pub mod driver;

pub use config::DriverConfig;
pub use driver::{DriverSummary, TickDriver};
