//! Forecourt Dealership Booking System
//!
//! A Rust implementation of the Forecourt booking server, providing a REST
//! JSON API for service bay, sales appointment and vehicle hire bookings:
//! slot/date availability, multi-step draft bookings, atomic conversion of
//! drafts into confirmed bookings, and snapshot-based cancellation refunds.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod scheduling;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
