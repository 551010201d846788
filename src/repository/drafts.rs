//! Draft bookings repository
//!
//! Drafts are keyed by their session token. Reads outside the conversion
//! transaction go through the pool; the conversion pipeline locks and
//! deletes the draft through its own transaction.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{Pool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::draft::{AddOn, DraftBooking},
    models::enums::PaymentMethod,
};

#[derive(Clone)]
pub struct DraftsRepository {
    pool: Pool<Postgres>,
}

impl DraftsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Create a fresh draft for a resource with the given TTL
    pub async fn create(&self, resource_id: i32, ttl_minutes: i64) -> AppResult<DraftBooking> {
        let token = Uuid::new_v4();
        let now = Utc::now();
        let expires_at = now + Duration::minutes(ttl_minutes);

        let draft = sqlx::query_as::<_, DraftBooking>(
            r#"
            INSERT INTO draft_bookings (token, resource_id, created_at, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(token)
        .bind(resource_id)
        .bind(now)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(draft)
    }

    /// Get a draft by its session token
    pub async fn get(&self, token: Uuid) -> AppResult<DraftBooking> {
        sqlx::query_as::<_, DraftBooking>("SELECT * FROM draft_bookings WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::DraftNotFound(token))
    }

    /// Lock a draft for the duration of a conversion transaction
    pub async fn get_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        token: Uuid,
    ) -> AppResult<DraftBooking> {
        sqlx::query_as::<_, DraftBooking>(
            "SELECT * FROM draft_bookings WHERE token = $1 FOR UPDATE",
        )
        .bind(token)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or(AppError::DraftNotFound(token))
    }

    /// Date/time selection step
    pub async fn update_schedule(
        &self,
        token: Uuid,
        date: NaiveDate,
        time: NaiveTime,
        estimated_completion: NaiveDate,
    ) -> AppResult<DraftBooking> {
        sqlx::query_as::<_, DraftBooking>(
            r#"
            UPDATE draft_bookings
            SET selected_date = $2, selected_time = $3, estimated_completion = $4
            WHERE token = $1
            RETURNING *
            "#,
        )
        .bind(token)
        .bind(date)
        .bind(time)
        .bind(estimated_completion)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::DraftNotFound(token))
    }

    /// Customer details step
    pub async fn update_customer(
        &self,
        token: Uuid,
        name: &str,
        email: &str,
        phone: Option<&str>,
    ) -> AppResult<DraftBooking> {
        sqlx::query_as::<_, DraftBooking>(
            r#"
            UPDATE draft_bookings
            SET customer_name = $2, customer_email = $3, customer_phone = $4
            WHERE token = $1
            RETURNING *
            "#,
        )
        .bind(token)
        .bind(name)
        .bind(email)
        .bind(phone)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::DraftNotFound(token))
    }

    /// Add-on selection step, with the recomputed totals
    pub async fn update_add_ons(
        &self,
        token: Uuid,
        add_ons: &[AddOn],
        calculated_total: Decimal,
        calculated_deposit: Decimal,
    ) -> AppResult<DraftBooking> {
        sqlx::query_as::<_, DraftBooking>(
            r#"
            UPDATE draft_bookings
            SET add_ons = $2, calculated_total = $3, calculated_deposit = $4
            WHERE token = $1
            RETURNING *
            "#,
        )
        .bind(token)
        .bind(Json(add_ons))
        .bind(calculated_total)
        .bind(calculated_deposit)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::DraftNotFound(token))
    }

    /// Payment method and terms acceptance step
    pub async fn update_payment_choice(
        &self,
        token: Uuid,
        method: PaymentMethod,
        terms_version: &str,
    ) -> AppResult<DraftBooking> {
        sqlx::query_as::<_, DraftBooking>(
            r#"
            UPDATE draft_bookings
            SET payment_method = $2, terms_version = $3
            WHERE token = $1
            RETURNING *
            "#,
        )
        .bind(token)
        .bind(method)
        .bind(terms_version)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::DraftNotFound(token))
    }

    /// Delete a draft inside the conversion transaction
    pub async fn delete_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        token: Uuid,
    ) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM draft_bookings WHERE token = $1")
            .bind(token)
            .execute(&mut **tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::DraftNotFound(token));
        }
        Ok(())
    }

    /// Remove drafts past their TTL; returns the number purged
    pub async fn purge_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM draft_bookings WHERE expires_at <= $1")
            .bind(now)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
