//! Business logic services

pub mod availability;
pub mod bookings;
pub mod drafts;
pub mod email;
pub mod payments;
pub mod settings;

use crate::{
    config::{BookingConfig, EmailConfig},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub availability: availability::AvailabilityService,
    pub drafts: drafts::DraftsService,
    pub bookings: bookings::BookingsService,
    pub payments: payments::PaymentsService,
    pub settings: settings::SettingsService,
    pub email: email::EmailService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(
        repository: Repository,
        booking_config: BookingConfig,
        email_config: EmailConfig,
    ) -> Self {
        let email = email::EmailService::new(email_config);
        Self {
            availability: availability::AvailabilityService::new(repository.clone()),
            drafts: drafts::DraftsService::new(repository.clone(), booking_config),
            bookings: bookings::BookingsService::new(repository.clone(), email.clone()),
            payments: payments::PaymentsService::new(repository.clone()),
            settings: settings::SettingsService::new(repository),
            email,
        }
    }
}
