//! Bookings repository
//!
//! Occupied-slot reads are stale-tolerant and served from the pool; the
//! conversion pipeline re-reads and inserts through its transaction, where
//! the partial unique index on active slots turns a lost race into a
//! conflict.

use chrono::{NaiveDate, NaiveTime, Utc};
use sqlx::{Pool, Postgres, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::booking::{Booking, NewBooking},
    models::enums::{BookingStatus, PaymentStatus},
};

fn blocking_statuses() -> Vec<i16> {
    [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::InProgress,
    ]
    .into_iter()
    .map(i16::from)
    .collect()
}

#[derive(Clone)]
pub struct BookingsRepository {
    pool: Pool<Postgres>,
}

impl BookingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get a booking by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking with id {} not found", id)))
    }

    /// Get a booking by its reference code
    pub async fn get_by_reference(&self, reference: &str) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE reference_code = $1")
            .bind(reference)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", reference)))
    }

    /// Times occupied by blocking bookings on a date
    pub async fn occupied_times(
        &self,
        resource_id: i32,
        date: NaiveDate,
    ) -> AppResult<Vec<NaiveTime>> {
        let times = sqlx::query_scalar::<_, NaiveTime>(
            r#"
            SELECT booking_time FROM bookings
            WHERE resource_id = $1 AND booking_date = $2 AND status = ANY($3)
            ORDER BY booking_time
            "#,
        )
        .bind(resource_id)
        .bind(date)
        .bind(blocking_statuses())
        .fetch_all(&self.pool)
        .await?;
        Ok(times)
    }

    /// Same as [`occupied_times`], read inside the conversion transaction
    pub async fn occupied_times_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        resource_id: i32,
        date: NaiveDate,
    ) -> AppResult<Vec<NaiveTime>> {
        let times = sqlx::query_scalar::<_, NaiveTime>(
            r#"
            SELECT booking_time FROM bookings
            WHERE resource_id = $1 AND booking_date = $2 AND status = ANY($3)
            ORDER BY booking_time
            "#,
        )
        .bind(resource_id)
        .bind(date)
        .bind(blocking_statuses())
        .fetch_all(&mut **tx)
        .await?;
        Ok(times)
    }

    /// Insert a confirmed booking inside the conversion transaction.
    ///
    /// Maps the active-slot unique index to `SlotUnavailable` and a
    /// reference-code collision to `Conflict` so the caller can retry the
    /// code.
    pub async fn insert_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        booking: &NewBooking,
    ) -> AppResult<Booking> {
        let result = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (
                reference_code, resource_id, status, payment_status, payment_method,
                customer_name, customer_email, customer_phone,
                booking_date, booking_time, add_ons,
                amount_total, amount_paid, deposit_amount,
                estimated_completion, terms_version, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING *
            "#,
        )
        .bind(&booking.reference_code)
        .bind(booking.resource_id)
        .bind(booking.status)
        .bind(booking.payment_status)
        .bind(booking.payment_method)
        .bind(&booking.customer_name)
        .bind(&booking.customer_email)
        .bind(&booking.customer_phone)
        .bind(booking.booking_date)
        .bind(booking.booking_time)
        .bind(sqlx::types::Json(&booking.add_ons))
        .bind(booking.amount_total)
        .bind(booking.amount_paid)
        .bind(booking.deposit_amount)
        .bind(booking.estimated_completion)
        .bind(&booking.terms_version)
        .bind(Utc::now())
        .fetch_one(&mut **tx)
        .await;

        result.map_err(|e| match &e {
            sqlx::Error::Database(db) => match db.constraint() {
                Some("bookings_active_slot_idx") => AppError::SlotUnavailable {
                    date: booking.booking_date,
                    time: booking.booking_time,
                },
                Some("bookings_reference_code_key") => {
                    AppError::Conflict("Reference code collision".to_string())
                }
                _ => AppError::Database(e),
            },
            _ => AppError::Database(e),
        })
    }

    /// Mark a booking cancelled inside the cancellation transaction
    pub async fn cancel_in_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: i32,
        payment_status: PaymentStatus,
    ) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET status = $2, payment_status = $3, updated_at = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(BookingStatus::Cancelled)
        .bind(payment_status)
        .bind(Utc::now())
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Booking with id {} not found", id)))
    }
}
