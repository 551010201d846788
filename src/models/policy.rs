//! Operating policy, blocked-date ranges and the refund policy snapshot

use chrono::{DateTime, NaiveDate, NaiveTime, Utc, Weekday};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::enums::DepositMode;

// ---------------------------------------------------------------------------
// OperatingPolicy
// ---------------------------------------------------------------------------

/// The single-row operating policy, loaded fresh per request and passed
/// through explicitly. Refund-relevant fields are frozen into a
/// [`PolicySnapshot`] whenever a payment is created.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct OperatingPolicy {
    pub id: i32,
    /// First bookable time of day
    pub start_time: NaiveTime,
    /// Last bookable time of day
    pub end_time: NaiveTime,
    /// Grid spacing between candidate slots, minutes
    pub slot_spacing_minutes: i32,
    /// Latest bookable time when booking for the current day
    pub same_day_cutoff: NaiveTime,
    /// After-hours bookings bypass weekday and cutoff restrictions
    pub allow_after_hours: bool,
    /// Open weekdays (0=Monday .. 6=Sunday)
    pub open_weekdays: Vec<i16>,
    /// How far ahead of the resource target a booking may be placed
    pub max_advance_days: i32,
    /// Same-day lead time required before a slot
    pub min_advance_hours: i32,
    pub deposit_mode: DepositMode,
    #[schema(value_type = String)]
    pub deposit_flat_amount: Decimal,
    #[schema(value_type = String)]
    pub deposit_percentage: Decimal,
    pub full_refund_days: i32,
    pub partial_refund_days: i32,
    #[schema(value_type = String)]
    pub partial_refund_percentage: Decimal,
    pub minimal_refund_days: i32,
    #[schema(value_type = String)]
    pub minimal_refund_percentage: Decimal,
    pub deposit_full_refund_days: i32,
    pub deposit_partial_refund_days: i32,
    #[schema(value_type = String)]
    pub deposit_partial_refund_percentage: Decimal,
    pub deposit_minimal_refund_days: i32,
    #[schema(value_type = String)]
    pub deposit_minimal_refund_percentage: Decimal,
    /// Deduct the processor transaction fee from refunds
    pub deduct_processor_fee: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

impl OperatingPolicy {
    pub fn is_open_weekday(&self, weekday: Weekday) -> bool {
        let idx = weekday.num_days_from_monday() as i16;
        self.open_weekdays.contains(&idx)
    }
}

/// Update operating policy request. Times use HH:MM strings.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdatePolicyRequest {
    /// First bookable time (HH:MM)
    pub start_time: String,
    /// Last bookable time (HH:MM)
    pub end_time: String,
    #[validate(range(min = 1))]
    pub slot_spacing_minutes: i32,
    /// Same-day cutoff time (HH:MM)
    pub same_day_cutoff: String,
    pub allow_after_hours: bool,
    /// Open weekdays (0=Monday .. 6=Sunday)
    pub open_weekdays: Vec<i16>,
    #[validate(range(min = 0))]
    pub max_advance_days: i32,
    #[validate(range(min = 0))]
    pub min_advance_hours: i32,
    pub deposit_mode: DepositMode,
    #[schema(value_type = String)]
    pub deposit_flat_amount: Decimal,
    #[schema(value_type = String)]
    pub deposit_percentage: Decimal,
    #[validate(range(min = 0))]
    pub full_refund_days: i32,
    #[validate(range(min = 0))]
    pub partial_refund_days: i32,
    #[schema(value_type = String)]
    pub partial_refund_percentage: Decimal,
    #[validate(range(min = 0))]
    pub minimal_refund_days: i32,
    #[schema(value_type = String)]
    pub minimal_refund_percentage: Decimal,
    #[validate(range(min = 0))]
    pub deposit_full_refund_days: i32,
    #[validate(range(min = 0))]
    pub deposit_partial_refund_days: i32,
    #[schema(value_type = String)]
    pub deposit_partial_refund_percentage: Decimal,
    #[validate(range(min = 0))]
    pub deposit_minimal_refund_days: i32,
    #[schema(value_type = String)]
    pub deposit_minimal_refund_percentage: Decimal,
    pub deduct_processor_fee: bool,
}

// ---------------------------------------------------------------------------
// BlockedRange
// ---------------------------------------------------------------------------

/// An ad-hoc blocked date range (inclusive on both ends)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BlockedRange {
    pub id: i32,
    /// First blocked date
    pub start_date: NaiveDate,
    /// Last blocked date (inclusive)
    pub end_date: NaiveDate,
    /// Reason for the block
    pub reason: Option<String>,
    pub crea_date: Option<DateTime<Utc>>,
}

impl BlockedRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// Create blocked range request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBlockedRange {
    /// First blocked date (YYYY-MM-DD)
    pub start_date: String,
    /// Last blocked date, inclusive (YYYY-MM-DD)
    pub end_date: String,
    pub reason: Option<String>,
}

/// Query parameters for blocked ranges
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct BlockedRangeQuery {
    /// Only ranges ending on or after this date (YYYY-MM-DD)
    pub start_date: Option<String>,
    /// Only ranges starting on or before this date (YYYY-MM-DD)
    pub end_date: Option<String>,
}

// ---------------------------------------------------------------------------
// PolicySnapshot
// ---------------------------------------------------------------------------

/// Flattened copy of the refund-relevant policy fields, captured when a
/// payment is created. Refund computation reads this snapshot, never the
/// live policy, so later admin edits cannot change historical refunds.
/// An empty snapshot means no policy existed at capture time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicySnapshot(pub IndexMap<String, serde_json::Value>);

impl PolicySnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Freeze the refund-relevant fields of a policy
    pub fn capture(policy: &OperatingPolicy) -> Self {
        let mut map = IndexMap::new();
        map.insert("full_refund_days".into(), policy.full_refund_days.into());
        map.insert("partial_refund_days".into(), policy.partial_refund_days.into());
        map.insert(
            "partial_refund_percentage".into(),
            decimal_value(policy.partial_refund_percentage),
        );
        map.insert("minimal_refund_days".into(), policy.minimal_refund_days.into());
        map.insert(
            "minimal_refund_percentage".into(),
            decimal_value(policy.minimal_refund_percentage),
        );
        map.insert(
            "deposit_full_refund_days".into(),
            policy.deposit_full_refund_days.into(),
        );
        map.insert(
            "deposit_partial_refund_days".into(),
            policy.deposit_partial_refund_days.into(),
        );
        map.insert(
            "deposit_partial_refund_percentage".into(),
            decimal_value(policy.deposit_partial_refund_percentage),
        );
        map.insert(
            "deposit_minimal_refund_days".into(),
            policy.deposit_minimal_refund_days.into(),
        );
        map.insert(
            "deposit_minimal_refund_percentage".into(),
            decimal_value(policy.deposit_minimal_refund_percentage),
        );
        map.insert(
            "deduct_processor_fee".into(),
            policy.deduct_processor_fee.into(),
        );
        Self(map)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.0.get(key)?.as_i64()
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.0.get(key)?.as_bool()
    }

    /// Read a decimal stored either as a JSON number or a string
    pub fn get_decimal(&self, key: &str) -> Option<Decimal> {
        match self.0.get(key)? {
            serde_json::Value::String(s) => s.parse().ok(),
            serde_json::Value::Number(n) => n.to_string().parse().ok(),
            _ => None,
        }
    }
}

fn decimal_value(d: Decimal) -> serde_json::Value {
    serde_json::Value::String(d.normalize().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn policy() -> OperatingPolicy {
        OperatingPolicy {
            id: 1,
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            slot_spacing_minutes: 30,
            same_day_cutoff: NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
            allow_after_hours: false,
            open_weekdays: vec![0, 1, 2, 3, 4],
            max_advance_days: 30,
            min_advance_hours: 2,
            deposit_mode: DepositMode::Percentage,
            deposit_flat_amount: dec!(50),
            deposit_percentage: dec!(10),
            full_refund_days: 7,
            partial_refund_days: 3,
            partial_refund_percentage: dec!(50),
            minimal_refund_days: 1,
            minimal_refund_percentage: dec!(0),
            deposit_full_refund_days: 14,
            deposit_partial_refund_days: 7,
            deposit_partial_refund_percentage: dec!(25),
            deposit_minimal_refund_days: 2,
            deposit_minimal_refund_percentage: dec!(0),
            deduct_processor_fee: true,
            updated_at: None,
        }
    }

    #[test]
    fn test_capture_snapshot() {
        let snapshot = PolicySnapshot::capture(&policy());
        assert!(!snapshot.is_empty());
        assert_eq!(snapshot.get_i64("full_refund_days"), Some(7));
        assert_eq!(snapshot.get_decimal("partial_refund_percentage"), Some(dec!(50)));
        assert_eq!(snapshot.get_bool("deduct_processor_fee"), Some(true));
    }

    #[test]
    fn test_snapshot_survives_serde() {
        let snapshot = PolicySnapshot::capture(&policy());
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: PolicySnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn test_empty_snapshot_getters() {
        let snapshot = PolicySnapshot::empty();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.get_i64("full_refund_days"), None);
        assert_eq!(snapshot.get_decimal("partial_refund_percentage"), None);
    }

    #[test]
    fn test_get_decimal_from_number() {
        let mut map = IndexMap::new();
        map.insert("partial_refund_percentage".to_string(), serde_json::json!(37.5));
        let snapshot = PolicySnapshot(map);
        assert_eq!(snapshot.get_decimal("partial_refund_percentage"), Some(dec!(37.5)));
    }

    #[test]
    fn test_is_open_weekday() {
        let p = policy();
        assert!(p.is_open_weekday(Weekday::Mon));
        assert!(p.is_open_weekday(Weekday::Fri));
        assert!(!p.is_open_weekday(Weekday::Sat));
        assert!(!p.is_open_weekday(Weekday::Sun));
    }
}
