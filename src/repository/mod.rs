//! Repository layer for database operations

pub mod bookings;
pub mod drafts;
pub mod payments;
pub mod resources;
pub mod settings;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub resources: resources::ResourcesRepository,
    pub settings: settings::SettingsRepository,
    pub drafts: drafts::DraftsRepository,
    pub bookings: bookings::BookingsRepository,
    pub payments: payments::PaymentsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            resources: resources::ResourcesRepository::new(pool.clone()),
            settings: settings::SettingsRepository::new(pool.clone()),
            drafts: drafts::DraftsRepository::new(pool.clone()),
            bookings: bookings::BookingsRepository::new(pool.clone()),
            payments: payments::PaymentsRepository::new(pool.clone()),
            pool,
        }
    }
}
