//! Dashboard payload
//!
//! Read-only data injected at page load: exchange rate, plan/fact records,
//! chart datasets, monetary fields and the results table.

pub mod error;
pub mod types;

pub use error::{PayloadError, PayloadResult};
pub use types::{DashboardPayload, PeriodRecord};
