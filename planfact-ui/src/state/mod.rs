//! State Management
//!
//! Reactive mirror of the dashboard view model.

pub mod dashboard;

pub use dashboard::{provide_dashboard_state, DashboardState};
