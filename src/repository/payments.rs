//! Payments repository
//!
//! A payment row references either its draft or its confirmed booking; the
//! table's check constraint rejects rows holding both links.

use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{Pool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::enums::PaymentStatus,
    models::payment::{CreatePayment, Payment},
    models::policy::PolicySnapshot,
};

#[derive(Clone)]
pub struct PaymentsRepository {
    pool: Pool<Postgres>,
}

impl PaymentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Record a payment against a draft, freezing the policy snapshot
    pub async fn create_for_draft(
        &self,
        draft_token: Uuid,
        data: &CreatePayment,
        snapshot: &PolicySnapshot,
    ) -> AppResult<Payment> {
        let result = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (
                amount, status, method, external_reference,
                refund_policy_snapshot, draft_token
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(data.amount)
        .bind(data.status)
        .bind(data.method)
        .bind(&data.external_reference)
        .bind(Json(snapshot))
        .bind(draft_token)
        .fetch_one(&self.pool)
        .await;

        result.map_err(|e| match &e {
            sqlx::Error::Database(db)
                if db.constraint() == Some("payments_external_reference_key") =>
            {
                AppError::Conflict("Payment with this external reference already exists".to_string())
            }
            _ => AppError::Database(e),
        })
    }

    /// Get a payment by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Payment> {
        sqlx::query_as::<_, Payment>("SELECT * FROM payments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Payment with id {} not found", id)))
    }

    /// Latest payment recorded against a draft, if any
    pub async fn get_by_draft(&self, token: Uuid) -> AppResult<Option<Payment>> {
        let payment = sqlx::query_as::<_, Payment>(
            "SELECT * FROM payments WHERE draft_token = $1 ORDER BY created_at DESC LIMIT 1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(payment)
    }

    /// Payment attached to a confirmed booking, if any
    pub async fn get_by_booking(&self, booking_id: i32) -> AppResult<Option<Payment>> {
        let payment = sqlx::query_as::<_, Payment>(
            "SELECT * FROM payments WHERE booking_id = $1 ORDER BY created_at DESC LIMIT 1",
        )
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(payment)
    }

    /// Record a payment directly against a freshly converted booking.
    /// Used when conversion receives payment facts but no pre-existing
    /// payment row exists for the draft.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_for_booking_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        booking_id: i32,
        amount: Decimal,
        status: PaymentStatus,
        method: crate::models::enums::PaymentMethod,
        external_reference: Option<&str>,
        snapshot: &PolicySnapshot,
    ) -> AppResult<Payment> {
        let result = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (
                amount, status, method, external_reference,
                refund_policy_snapshot, booking_id
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(amount)
        .bind(status)
        .bind(method)
        .bind(external_reference)
        .bind(Json(snapshot))
        .bind(booking_id)
        .fetch_one(&mut **tx)
        .await;

        result.map_err(|e| match &e {
            sqlx::Error::Database(db)
                if db.constraint() == Some("payments_external_reference_key") =>
            {
                AppError::Conflict("Payment with this external reference already exists".to_string())
            }
            _ => AppError::Database(e),
        })
    }

    /// Point a payment at its confirmed booking, clearing the draft link
    /// and refreshing the stored snapshot. Conversion-transaction only.
    pub async fn attach_to_booking_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        payment_id: i32,
        booking_id: i32,
        snapshot: &PolicySnapshot,
    ) -> AppResult<Payment> {
        sqlx::query_as::<_, Payment>(
            r#"
            UPDATE payments
            SET booking_id = $2, draft_token = NULL,
                refund_policy_snapshot = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(payment_id)
        .bind(booking_id)
        .bind(Json(snapshot))
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Payment with id {} not found", payment_id)))
    }

    /// Record the refunded amount and resulting status after cancellation
    pub async fn record_refund_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        payment_id: i32,
        refunded_amount: Decimal,
        status: PaymentStatus,
    ) -> AppResult<Payment> {
        sqlx::query_as::<_, Payment>(
            r#"
            UPDATE payments
            SET refunded_amount = $2, status = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(payment_id)
        .bind(refunded_amount)
        .bind(status)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Payment with id {} not found", payment_id)))
    }
}
