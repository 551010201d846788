//! Availability queries
//!
//! Thin orchestration over the pure calculator: loads the policy, blocked
//! ranges and occupied slots in single reads, then defers to
//! [`crate::scheduling`]. Results are advisory; the conversion pipeline
//! re-validates inside its transaction.

use chrono::{NaiveDate, Utc};

use crate::{
    error::{AppError, AppResult},
    models::policy::OperatingPolicy,
    models::resource::Resource,
    repository::Repository,
    scheduling,
};

#[derive(Clone)]
pub struct AvailabilityService {
    repository: Repository,
}

impl AvailabilityService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List active resources, optionally filtered by kind
    pub async fn list_resources(&self, kind: Option<i16>) -> AppResult<Vec<Resource>> {
        self.repository.resources.list_active(kind).await
    }

    /// Get a resource by ID
    pub async fn get_resource(&self, id: i32) -> AppResult<Resource> {
        self.repository.resources.get_by_id(id).await
    }

    async fn require_policy(&self) -> AppResult<OperatingPolicy> {
        self.repository
            .settings
            .get_policy()
            .await?
            .ok_or_else(|| AppError::BusinessRule("Operating policy is not configured".to_string()))
    }

    /// Bookable times on a date for a resource, as HH:MM strings
    pub async fn available_slots(
        &self,
        resource_id: i32,
        date: NaiveDate,
    ) -> AppResult<Vec<String>> {
        let resource = self.repository.resources.get_by_id(resource_id).await?;
        if !resource.active {
            return Err(AppError::BusinessRule("Resource is not bookable".to_string()));
        }

        let policy = self.require_policy().await?;
        let blocked = self
            .repository
            .settings
            .list_blocked_ranges(Some(date), Some(date))
            .await?;
        let occupied = self
            .repository
            .bookings
            .occupied_times(resource_id, date)
            .await?;

        let now = Utc::now().naive_utc();
        let slots = scheduling::available_slots(&policy, &blocked, &occupied, date, now);
        Ok(slots.iter().map(|t| t.format("%H:%M").to_string()).collect())
    }

    /// Bookable dates for a resource, as ISO date strings
    pub async fn available_dates(&self, resource_id: i32) -> AppResult<Vec<String>> {
        let resource = self.repository.resources.get_by_id(resource_id).await?;
        if !resource.active {
            return Err(AppError::BusinessRule("Resource is not bookable".to_string()));
        }

        let policy = self.require_policy().await?;
        let now = Utc::now().naive_utc();
        let today = now.date();

        // Resources without a delivery target are bookable through the
        // full advance window.
        let target = resource
            .target_date
            .unwrap_or(today + chrono::Duration::days(policy.max_advance_days as i64));

        let blocked = self
            .repository
            .settings
            .list_blocked_ranges(Some(today), Some(target))
            .await?;

        let dates = scheduling::available_dates(&policy, &blocked, target, now);
        Ok(dates.iter().map(|d| d.format("%Y-%m-%d").to_string()).collect())
    }
}
