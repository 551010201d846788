//! Settings repository: operating policy and blocked-date ranges

use chrono::{NaiveDate, NaiveTime, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::policy::{BlockedRange, CreateBlockedRange, OperatingPolicy, UpdatePolicyRequest},
};

#[derive(Clone)]
pub struct SettingsRepository {
    pool: Pool<Postgres>,
}

impl SettingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    // ---- Operating policy ----

    /// Load the operating policy, if one has been configured
    pub async fn get_policy(&self) -> AppResult<Option<OperatingPolicy>> {
        let policy = sqlx::query_as::<_, OperatingPolicy>(
            "SELECT * FROM operating_policy ORDER BY id LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(policy)
    }

    /// Write the operating policy (update the single row, insert if absent)
    pub async fn upsert_policy(&self, data: &UpdatePolicyRequest) -> AppResult<OperatingPolicy> {
        let start_time = parse_time(&data.start_time, "start_time")?;
        let end_time = parse_time(&data.end_time, "end_time")?;
        let same_day_cutoff = parse_time(&data.same_day_cutoff, "same_day_cutoff")?;
        let now = Utc::now();

        let updated = sqlx::query_as::<_, OperatingPolicy>(
            r#"
            UPDATE operating_policy SET
                start_time = $1, end_time = $2, slot_spacing_minutes = $3,
                same_day_cutoff = $4, allow_after_hours = $5, open_weekdays = $6,
                max_advance_days = $7, min_advance_hours = $8,
                deposit_mode = $9, deposit_flat_amount = $10, deposit_percentage = $11,
                full_refund_days = $12, partial_refund_days = $13,
                partial_refund_percentage = $14, minimal_refund_days = $15,
                minimal_refund_percentage = $16,
                deposit_full_refund_days = $17, deposit_partial_refund_days = $18,
                deposit_partial_refund_percentage = $19, deposit_minimal_refund_days = $20,
                deposit_minimal_refund_percentage = $21,
                deduct_processor_fee = $22, updated_at = $23
            WHERE id = (SELECT id FROM operating_policy ORDER BY id LIMIT 1)
            RETURNING *
            "#,
        )
        .bind(start_time)
        .bind(end_time)
        .bind(data.slot_spacing_minutes)
        .bind(same_day_cutoff)
        .bind(data.allow_after_hours)
        .bind(&data.open_weekdays)
        .bind(data.max_advance_days)
        .bind(data.min_advance_hours)
        .bind(data.deposit_mode)
        .bind(data.deposit_flat_amount)
        .bind(data.deposit_percentage)
        .bind(data.full_refund_days)
        .bind(data.partial_refund_days)
        .bind(data.partial_refund_percentage)
        .bind(data.minimal_refund_days)
        .bind(data.minimal_refund_percentage)
        .bind(data.deposit_full_refund_days)
        .bind(data.deposit_partial_refund_days)
        .bind(data.deposit_partial_refund_percentage)
        .bind(data.deposit_minimal_refund_days)
        .bind(data.deposit_minimal_refund_percentage)
        .bind(data.deduct_processor_fee)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(policy) = updated {
            return Ok(policy);
        }

        let inserted = sqlx::query_as::<_, OperatingPolicy>(
            r#"
            INSERT INTO operating_policy (
                start_time, end_time, slot_spacing_minutes, same_day_cutoff,
                allow_after_hours, open_weekdays, max_advance_days, min_advance_hours,
                deposit_mode, deposit_flat_amount, deposit_percentage,
                full_refund_days, partial_refund_days, partial_refund_percentage,
                minimal_refund_days, minimal_refund_percentage,
                deposit_full_refund_days, deposit_partial_refund_days,
                deposit_partial_refund_percentage, deposit_minimal_refund_days,
                deposit_minimal_refund_percentage, deduct_processor_fee, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                    $15, $16, $17, $18, $19, $20, $21, $22, $23)
            RETURNING *
            "#,
        )
        .bind(start_time)
        .bind(end_time)
        .bind(data.slot_spacing_minutes)
        .bind(same_day_cutoff)
        .bind(data.allow_after_hours)
        .bind(&data.open_weekdays)
        .bind(data.max_advance_days)
        .bind(data.min_advance_hours)
        .bind(data.deposit_mode)
        .bind(data.deposit_flat_amount)
        .bind(data.deposit_percentage)
        .bind(data.full_refund_days)
        .bind(data.partial_refund_days)
        .bind(data.partial_refund_percentage)
        .bind(data.minimal_refund_days)
        .bind(data.minimal_refund_percentage)
        .bind(data.deposit_full_refund_days)
        .bind(data.deposit_partial_refund_days)
        .bind(data.deposit_partial_refund_percentage)
        .bind(data.deposit_minimal_refund_days)
        .bind(data.deposit_minimal_refund_percentage)
        .bind(data.deduct_processor_fee)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(inserted)
    }

    // ---- Blocked ranges ----

    /// List blocked ranges, optionally intersected with a date window
    pub async fn list_blocked_ranges(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> AppResult<Vec<BlockedRange>> {
        let mut conditions = Vec::new();
        let mut idx = 1;

        if start_date.is_some() {
            conditions.push(format!("end_date >= ${}", idx));
            idx += 1;
        }
        if end_date.is_some() {
            conditions.push(format!("start_date <= ${}", idx));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT * FROM blocked_ranges {} ORDER BY start_date",
            where_clause
        );

        let mut builder = sqlx::query_as::<_, BlockedRange>(&query);
        if let Some(sd) = start_date {
            builder = builder.bind(sd);
        }
        if let Some(ed) = end_date {
            builder = builder.bind(ed);
        }

        let rows = builder.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    /// Create a blocked range
    pub async fn create_blocked_range(&self, data: &CreateBlockedRange) -> AppResult<BlockedRange> {
        let start = NaiveDate::parse_from_str(&data.start_date, "%Y-%m-%d")
            .map_err(|_| AppError::Validation("Invalid start_date".to_string()))?;
        let end = NaiveDate::parse_from_str(&data.end_date, "%Y-%m-%d")
            .map_err(|_| AppError::Validation("Invalid end_date".to_string()))?;

        if end < start {
            return Err(AppError::Validation(
                "end_date must not precede start_date".to_string(),
            ));
        }

        let row = sqlx::query_as::<_, BlockedRange>(
            "INSERT INTO blocked_ranges (start_date, end_date, reason) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(start)
        .bind(end)
        .bind(&data.reason)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Delete a blocked range
    pub async fn delete_blocked_range(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM blocked_ranges WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Blocked range {} not found", id)));
        }
        Ok(())
    }
}

fn parse_time(value: &str, field: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| AppError::Validation(format!("Invalid {} (use HH:MM)", field)))
}
