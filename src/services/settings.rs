//! Settings service: operating policy and blocked ranges
//!
//! Policy validation happens here, at write time. Calculation-time code
//! trusts whatever was stored.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::policy::{BlockedRange, CreateBlockedRange, OperatingPolicy, UpdatePolicyRequest},
    repository::Repository,
};

#[derive(Clone)]
pub struct SettingsService {
    repository: Repository,
}

impl SettingsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Current operating policy
    pub async fn get_policy(&self) -> AppResult<OperatingPolicy> {
        self.repository
            .settings
            .get_policy()
            .await?
            .ok_or_else(|| AppError::NotFound("Operating policy is not configured".to_string()))
    }

    /// Validate and write the operating policy
    pub async fn update_policy(&self, data: &UpdatePolicyRequest) -> AppResult<OperatingPolicy> {
        data.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let start = parse_time(&data.start_time, "start_time")?;
        let end = parse_time(&data.end_time, "end_time")?;
        parse_time(&data.same_day_cutoff, "same_day_cutoff")?;

        if start >= end {
            return Err(AppError::Validation(
                "start_time must precede end_time".to_string(),
            ));
        }

        if data.open_weekdays.iter().any(|d| !(0..=6).contains(d)) {
            return Err(AppError::Validation(
                "open_weekdays entries must be 0 (Monday) through 6 (Sunday)".to_string(),
            ));
        }

        for (name, pct) in [
            ("deposit_percentage", data.deposit_percentage),
            ("partial_refund_percentage", data.partial_refund_percentage),
            ("minimal_refund_percentage", data.minimal_refund_percentage),
            ("deposit_partial_refund_percentage", data.deposit_partial_refund_percentage),
            ("deposit_minimal_refund_percentage", data.deposit_minimal_refund_percentage),
        ] {
            if pct < Decimal::ZERO || pct > Decimal::ONE_HUNDRED {
                return Err(AppError::Validation(format!(
                    "{} must be between 0 and 100",
                    name
                )));
            }
        }

        if data.full_refund_days < data.partial_refund_days
            || data.partial_refund_days < data.minimal_refund_days
        {
            return Err(AppError::Validation(
                "Refund day thresholds must be ordered full >= partial >= minimal".to_string(),
            ));
        }
        if data.deposit_full_refund_days < data.deposit_partial_refund_days
            || data.deposit_partial_refund_days < data.deposit_minimal_refund_days
        {
            return Err(AppError::Validation(
                "Deposit refund day thresholds must be ordered full >= partial >= minimal"
                    .to_string(),
            ));
        }

        self.repository.settings.upsert_policy(data).await
    }

    /// List blocked ranges intersecting an optional window
    pub async fn list_blocked_ranges(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> AppResult<Vec<BlockedRange>> {
        self.repository
            .settings
            .list_blocked_ranges(start_date, end_date)
            .await
    }

    /// Create a blocked range
    pub async fn create_blocked_range(&self, data: &CreateBlockedRange) -> AppResult<BlockedRange> {
        self.repository.settings.create_blocked_range(data).await
    }

    /// Delete a blocked range
    pub async fn delete_blocked_range(&self, id: i32) -> AppResult<()> {
        self.repository.settings.delete_blocked_range(id).await
    }
}

fn parse_time(value: &str, field: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| AppError::Validation(format!("Invalid {} (use HH:MM)", field)))
}
