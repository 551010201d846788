//! Booking lifecycle: the conversion pipeline and cancellation
//!
//! Conversion is the only operation with a true transactional boundary.
//! Everything between locking the draft and deleting it happens in one
//! unit of work; any failure rolls the whole unit back and leaves the
//! draft intact and re-attemptable.

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::Acquire;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::booking::{Booking, CancelBooking, ConvertDraft, NewBooking},
    models::enums::{BookingStatus, PaymentStatus},
    models::policy::PolicySnapshot,
    repository::Repository,
    scheduling::{self, RefundResult},
    services::email::EmailService,
};

const REFERENCE_ATTEMPTS: usize = 3;

#[derive(Clone)]
pub struct BookingsService {
    repository: Repository,
    email: EmailService,
}

impl BookingsService {
    pub fn new(repository: Repository, email: EmailService) -> Self {
        Self { repository, email }
    }

    /// Get a booking by its reference code
    pub async fn get_by_reference(&self, reference: &str) -> AppResult<Booking> {
        self.repository.bookings.get_by_reference(reference).await
    }

    /// Convert a draft into a confirmed booking.
    ///
    /// One transaction covers the slot re-check, the booking insert, the
    /// payment re-link and the draft delete, so a draft can never produce
    /// two bookings and a crash can never leave both draft and booking
    /// alive. Storage failures inside the unit surface as
    /// `ConversionFailed`; the draft stays intact and re-attemptable. The
    /// confirmation email is dispatched after commit and its failure never
    /// fails the booking.
    pub async fn convert(&self, token: Uuid, data: &ConvertDraft) -> AppResult<Booking> {
        match self.convert_inner(token, data).await {
            Err(AppError::Database(e)) => Err(AppError::ConversionFailed(e.to_string())),
            other => other,
        }
    }

    async fn convert_inner(&self, token: Uuid, data: &ConvertDraft) -> AppResult<Booking> {
        let now = Utc::now();
        let mut tx = self.repository.pool.begin().await?;

        let draft = self.repository.drafts.get_for_update(&mut tx, token).await?;
        if draft.is_expired(now) {
            return Err(AppError::DraftExpired(token));
        }

        let (date, time) = match (draft.selected_date, draft.selected_time) {
            (Some(date), Some(time)) => (date, time),
            _ => {
                return Err(AppError::BusinessRule(
                    "Draft has no selected date and time".to_string(),
                ))
            }
        };

        // Freeze the refund-relevant policy. Conversion succeeds without a
        // policy; the snapshot is then empty and refunds degrade to 0%.
        let policy = self.repository.settings.get_policy().await?;
        let snapshot = match &policy {
            Some(policy) => PolicySnapshot::capture(policy),
            None => PolicySnapshot::empty(),
        };

        // Re-check the slot inside the transaction. The partial unique
        // index backs this up if a racing conversion commits first.
        let occupied = self
            .repository
            .bookings
            .occupied_times_in_tx(&mut tx, draft.resource_id, date)
            .await?;
        let spacing = policy
            .as_ref()
            .map(|p| p.slot_spacing_minutes as i64)
            .unwrap_or(0);
        if scheduling::has_conflict(&occupied, time, spacing) {
            return Err(AppError::SlotUnavailable { date, time });
        }

        let amount_total = data.calculated_total.unwrap_or(draft.calculated_total);

        let mut inserted = None;
        for _ in 0..REFERENCE_ATTEMPTS {
            let new_booking = NewBooking {
                reference_code: generate_reference_code(),
                resource_id: draft.resource_id,
                status: BookingStatus::Confirmed,
                payment_status: data.payment_status,
                payment_method: Some(data.payment_method),
                customer_name: draft.customer_name.clone(),
                customer_email: draft.customer_email.clone(),
                customer_phone: draft.customer_phone.clone(),
                booking_date: date,
                booking_time: time,
                add_ons: draft.add_ons.0.clone(),
                amount_total,
                amount_paid: data.amount_paid,
                deposit_amount: draft.calculated_deposit,
                estimated_completion: draft.estimated_completion,
                terms_version: draft.terms_version.clone(),
            };

            // Savepoint per attempt: a reference collision aborts only the
            // failed insert, not the surrounding unit of work.
            let mut sp = tx.begin().await?;
            match self.repository.bookings.insert_in_tx(&mut sp, &new_booking).await {
                Ok(booking) => {
                    sp.commit().await?;
                    inserted = Some(booking);
                    break;
                }
                Err(AppError::Conflict(_)) => {
                    sp.rollback().await?;
                    continue;
                }
                Err(e) => {
                    sp.rollback().await.ok();
                    return Err(e);
                }
            }
        }

        let booking = inserted.ok_or_else(|| {
            AppError::ConversionFailed("Could not allocate a unique reference code".to_string())
        })?;

        // Re-link the payment: supplied id first, then any payment already
        // recorded against the draft, else create one from the payment facts.
        if let Some(payment_id) = data.payment_id {
            self.repository
                .payments
                .attach_to_booking_in_tx(&mut tx, payment_id, booking.id, &snapshot)
                .await?;
        } else if let Some(payment) = self.repository.payments.get_by_draft(token).await? {
            self.repository
                .payments
                .attach_to_booking_in_tx(&mut tx, payment.id, booking.id, &snapshot)
                .await?;
        } else if data.amount_paid > Decimal::ZERO {
            self.repository
                .payments
                .create_for_booking_in_tx(
                    &mut tx,
                    booking.id,
                    data.amount_paid,
                    data.payment_status,
                    data.payment_method,
                    data.external_payment_reference.as_deref(),
                    &snapshot,
                )
                .await?;
        }

        self.repository.drafts.delete_in_tx(&mut tx, token).await?;

        tx.commit().await?;

        tracing::info!(
            reference = %booking.reference_code,
            resource = booking.resource_id,
            "draft {} converted",
            token
        );

        if let Some(address) = &booking.customer_email {
            if let Err(e) = self.email.send_booking_confirmation(address, &booking).await {
                tracing::warn!(
                    "Failed to send confirmation for {}: {}",
                    booking.reference_code,
                    e
                );
            }
        }

        Ok(booking)
    }

    /// Cancel a booking, computing the refund from the payment's stored
    /// policy snapshot - never from live settings.
    pub async fn cancel(
        &self,
        reference: &str,
        data: &CancelBooking,
    ) -> AppResult<(Booking, RefundResult)> {
        let booking = self.repository.bookings.get_by_reference(reference).await?;

        match booking.status {
            BookingStatus::Pending | BookingStatus::Confirmed | BookingStatus::InProgress => {}
            _ => {
                return Err(AppError::BusinessRule(format!(
                    "Booking {} cannot be cancelled from status {}",
                    reference, booking.status
                )))
            }
        }

        let payment = self.repository.payments.get_by_booking(booking.id).await?;
        let now = Utc::now().naive_utc();

        let mut tx = self.repository.pool.begin().await?;

        let (refund, payment_status) = match &payment {
            Some(payment) => {
                let refund = scheduling::compute_refund(
                    &payment.refund_policy_snapshot,
                    booking.start_datetime(),
                    now,
                    payment.amount,
                    payment.status == PaymentStatus::DepositPaid,
                    data.international_card,
                );

                let status = if refund.final_refund_amount <= Decimal::ZERO {
                    payment.status
                } else if refund.final_refund_amount >= payment.amount {
                    PaymentStatus::Refunded
                } else {
                    PaymentStatus::PartiallyRefunded
                };

                self.repository
                    .payments
                    .record_refund_in_tx(&mut tx, payment.id, refund.final_refund_amount, status)
                    .await?;

                (refund, status)
            }
            None => {
                // Nothing was paid; cancellation still proceeds.
                let refund = scheduling::compute_refund(
                    &PolicySnapshot::empty(),
                    booking.start_datetime(),
                    now,
                    Decimal::ZERO,
                    false,
                    data.international_card,
                );
                (refund, booking.payment_status)
            }
        };

        let cancelled = self
            .repository
            .bookings
            .cancel_in_tx(&mut tx, booking.id, payment_status)
            .await?;

        tx.commit().await?;

        tracing::info!(
            reference = %cancelled.reference_code,
            tier = %refund.tier,
            refund = %refund.final_refund_amount,
            "booking cancelled"
        );

        if let Some(address) = &cancelled.customer_email {
            if let Err(e) = self
                .email
                .send_cancellation_notice(address, &cancelled, &refund)
                .await
            {
                tracing::warn!(
                    "Failed to send cancellation notice for {}: {}",
                    cancelled.reference_code,
                    e
                );
            }
        }

        Ok((cancelled, refund))
    }
}

/// Short opaque booking reference. Ambiguous characters are excluded;
/// uniqueness is enforced by the database index and collisions retried.
fn generate_reference_code() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";
    let mut rng = rand::thread_rng();
    (0..8)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_code_shape() {
        let code = generate_reference_code();
        assert_eq!(code.len(), 8);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
        assert!(!code.contains('O') && !code.contains('0'));
        assert!(!code.contains('I') && !code.contains('1'));
    }

    #[test]
    fn test_reference_codes_vary() {
        let a = generate_reference_code();
        let b = generate_reference_code();
        let c = generate_reference_code();
        assert!(a != b || b != c);
    }
}
