//! Draft booking flow
//!
//! Each step mutates only the fields it owns and recomputes the derived
//! totals. Concurrent drafts over the same slot are expected and never
//! rejected here; contention is resolved by the conversion pipeline.

use chrono::{NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    config::BookingConfig,
    error::{AppError, AppResult},
    models::draft::{AddOnsStep, DetailsStep, DraftBooking, PaymentStep, ScheduleStep, StartDraft},
    repository::Repository,
    scheduling,
};

#[derive(Clone)]
pub struct DraftsService {
    repository: Repository,
    config: BookingConfig,
}

impl DraftsService {
    pub fn new(repository: Repository, config: BookingConfig) -> Self {
        Self { repository, config }
    }

    /// Start a draft for a resource
    pub async fn start(&self, data: &StartDraft) -> AppResult<DraftBooking> {
        let resource = self.repository.resources.get_by_id(data.resource_id).await?;
        if !resource.active {
            return Err(AppError::BusinessRule("Resource is not bookable".to_string()));
        }
        self.repository
            .drafts
            .create(resource.id, self.config.draft_ttl_minutes)
            .await
    }

    /// Get a live draft; expired drafts answer 410
    pub async fn get(&self, token: Uuid) -> AppResult<DraftBooking> {
        let draft = self.repository.drafts.get(token).await?;
        if draft.is_expired(Utc::now()) {
            return Err(AppError::DraftExpired(token));
        }
        Ok(draft)
    }

    /// Date/time selection step. The requested slot must be in the
    /// advisory available set at this moment.
    pub async fn set_schedule(&self, token: Uuid, step: &ScheduleStep) -> AppResult<DraftBooking> {
        let draft = self.get(token).await?;
        let date = parse_date(&step.date)?;
        let time = parse_time(&step.time)?;

        let resource = self.repository.resources.get_by_id(draft.resource_id).await?;
        let policy = self
            .repository
            .settings
            .get_policy()
            .await?
            .ok_or_else(|| AppError::BusinessRule("Operating policy is not configured".to_string()))?;
        let blocked = self
            .repository
            .settings
            .list_blocked_ranges(Some(date), Some(date))
            .await?;
        let occupied = self
            .repository
            .bookings
            .occupied_times(draft.resource_id, date)
            .await?;

        let now = Utc::now().naive_utc();
        let slots = scheduling::available_slots(&policy, &blocked, &occupied, date, now);
        if !slots.contains(&time) {
            return Err(AppError::SlotUnavailable { date, time });
        }

        let completion = scheduling::estimated_completion(date, resource.duration_days);
        self.repository
            .drafts
            .update_schedule(token, date, time, completion)
            .await
    }

    /// Customer details step
    pub async fn set_details(&self, token: Uuid, step: &DetailsStep) -> AppResult<DraftBooking> {
        self.get(token).await?;
        if step.customer_name.trim().is_empty() {
            return Err(AppError::Validation("customer_name must not be empty".to_string()));
        }
        if !step.customer_email.contains('@') {
            return Err(AppError::Validation("customer_email is not valid".to_string()));
        }
        self.repository
            .drafts
            .update_customer(
                token,
                step.customer_name.trim(),
                step.customer_email.trim(),
                step.customer_phone.as_deref(),
            )
            .await
    }

    /// Add-on selection step; recomputes total and deposit
    pub async fn set_add_ons(&self, token: Uuid, step: &AddOnsStep) -> AppResult<DraftBooking> {
        let draft = self.get(token).await?;

        if step.add_ons.iter().any(|a| a.price < Decimal::ZERO) {
            return Err(AppError::Validation("Add-on prices must not be negative".to_string()));
        }

        let resource = self.repository.resources.get_by_id(draft.resource_id).await?;
        let total = scheduling::booking_total(resource.daily_rate, resource.duration_days, &step.add_ons);
        let deposit = match self.repository.settings.get_policy().await? {
            Some(policy) => scheduling::deposit_amount(total, &policy),
            None => Decimal::ZERO,
        };

        self.repository
            .drafts
            .update_add_ons(token, &step.add_ons, total, deposit)
            .await
    }

    /// Payment method and terms acceptance step
    pub async fn set_payment_choice(&self, token: Uuid, step: &PaymentStep) -> AppResult<DraftBooking> {
        self.get(token).await?;
        if step.terms_version.trim().is_empty() {
            return Err(AppError::Validation("terms_version must not be empty".to_string()));
        }
        self.repository
            .drafts
            .update_payment_choice(token, step.payment_method, step.terms_version.trim())
            .await
    }

    /// Garbage-collect drafts past their TTL
    pub async fn purge_expired(&self) -> AppResult<u64> {
        self.repository.drafts.purge_expired(Utc::now()).await
    }
}

fn parse_date(value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date (use YYYY-MM-DD)".to_string()))
}

fn parse_time(value: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| AppError::Validation("Invalid time (use HH:MM)".to_string()))
}
