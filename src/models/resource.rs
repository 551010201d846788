//! Bookable resource model (service bay, sales slot, hire vehicle)

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use super::enums::BookingKind;

/// A bookable resource. One booking occupies exactly one
/// resource-date-time unit.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Resource {
    pub id: i32,
    pub kind: BookingKind,
    /// Display name ("Bay 2", "AB24 XYZ")
    pub name: String,
    /// Daily rate used when computing draft totals
    #[schema(value_type = String)]
    pub daily_rate: Decimal,
    /// Expected occupation in days (0 = same-day)
    pub duration_days: i32,
    /// Delivery/availability target; bookings can never be scheduled
    /// after this date
    pub target_date: Option<NaiveDate>,
    pub active: bool,
    pub created_at: Option<DateTime<Utc>>,
}

/// Query parameters for listing resources
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct ResourceQuery {
    /// Filter by booking kind
    pub kind: Option<i16>,
}
