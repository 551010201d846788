//! Payment recording
//!
//! The processor's hosted checkout and webhooks live outside this core;
//! by the time a payment is recorded here its facts are already resolved.
//! The refund policy snapshot is frozen at creation time.

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::payment::{CreatePayment, Payment},
    models::policy::PolicySnapshot,
    repository::Repository,
};

#[derive(Clone)]
pub struct PaymentsService {
    repository: Repository,
}

impl PaymentsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Record a resolved payment against a draft
    pub async fn record_for_draft(&self, token: Uuid, data: &CreatePayment) -> AppResult<Payment> {
        let draft = self.repository.drafts.get(token).await?;
        if draft.is_expired(chrono::Utc::now()) {
            return Err(AppError::DraftExpired(token));
        }

        if data.amount < Decimal::ZERO {
            return Err(AppError::Validation("Payment amount must not be negative".to_string()));
        }

        let snapshot = match self.repository.settings.get_policy().await? {
            Some(policy) => PolicySnapshot::capture(&policy),
            None => PolicySnapshot::empty(),
        };

        self.repository
            .payments
            .create_for_draft(token, data, &snapshot)
            .await
    }

    /// Get a payment by ID
    pub async fn get(&self, id: i32) -> AppResult<Payment> {
        self.repository.payments.get_by_id(id).await
    }

    /// Payment attached to a booking, if any
    pub async fn get_for_booking(&self, booking_id: i32) -> AppResult<Option<Payment>> {
        self.repository.payments.get_by_booking(booking_id).await
    }
}
