//! Tiered cancellation refund engine
//!
//! Operates exclusively on the policy snapshot stored with the payment;
//! an empty or incomplete snapshot degrades to a 0% refund rather than
//! guessing a default.

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::policy::PolicySnapshot;

/// Processor transaction fee constants. A static schedule, not a live
/// processor call.
#[derive(Debug, Clone)]
pub struct FeeSchedule {
    pub rate: Decimal,
    pub fixed: Decimal,
}

pub static DOMESTIC_CARD_FEES: Lazy<FeeSchedule> = Lazy::new(|| FeeSchedule {
    rate: Decimal::new(15, 3),  // 1.5%
    fixed: Decimal::new(20, 2), // 0.20
});

pub static INTERNATIONAL_CARD_FEES: Lazy<FeeSchedule> = Lazy::new(|| FeeSchedule {
    rate: Decimal::new(25, 3),  // 2.5%
    fixed: Decimal::new(20, 2),
});

/// Which day-threshold band a cancellation landed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum RefundTier {
    Full,
    Partial,
    Minimal,
    NoRefund,
}

impl std::fmt::Display for RefundTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            RefundTier::Full => "Full",
            RefundTier::Partial => "Partial",
            RefundTier::Minimal => "Minimal",
            RefundTier::NoRefund => "No refund",
        };
        write!(f, "{}", label)
    }
}

/// Outcome of a refund computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RefundResult {
    pub tier: RefundTier,
    /// Whole days between cancellation and booking start, floored
    pub days_before_start: i64,
    #[schema(value_type = String)]
    pub eligible_amount: Decimal,
    #[schema(value_type = String)]
    pub fee_deducted: Decimal,
    #[schema(value_type = String)]
    pub final_refund_amount: Decimal,
}

/// Compute the refund owed for a cancellation.
///
/// `days_before_start` is floored (partial days never round up in the
/// customer's favour). Deposit and full-payment cancellations read
/// independently configured threshold sets from the same snapshot. The
/// result is never negative.
pub fn compute_refund(
    snapshot: &PolicySnapshot,
    booking_start: NaiveDateTime,
    cancelled_at: NaiveDateTime,
    paid_amount: Decimal,
    is_deposit: bool,
    international: bool,
) -> RefundResult {
    let days_before_start = (booking_start - cancelled_at)
        .num_seconds()
        .div_euclid(86_400);

    let (tier, percentage) = select_tier(snapshot, days_before_start, is_deposit);

    let eligible_amount = (paid_amount * percentage / Decimal::ONE_HUNDRED).round_dp(2);

    let deduct = snapshot.get_bool("deduct_processor_fee").unwrap_or(false);
    let fee_deducted = if deduct && eligible_amount > Decimal::ZERO {
        let schedule = if international {
            &*INTERNATIONAL_CARD_FEES
        } else {
            &*DOMESTIC_CARD_FEES
        };
        (paid_amount * schedule.rate + schedule.fixed).round_dp(2)
    } else {
        Decimal::ZERO
    };

    let final_refund_amount = (eligible_amount - fee_deducted).max(Decimal::ZERO);

    RefundResult {
        tier,
        days_before_start,
        eligible_amount,
        fee_deducted,
        final_refund_amount,
    }
}

fn select_tier(snapshot: &PolicySnapshot, days: i64, is_deposit: bool) -> (RefundTier, Decimal) {
    if snapshot.is_empty() {
        tracing::warn!("refund policy snapshot is empty, refunding 0%");
        return (RefundTier::NoRefund, Decimal::ZERO);
    }

    let prefix = if is_deposit { "deposit_" } else { "" };
    let keys = (
        snapshot.get_i64(&format!("{prefix}full_refund_days")),
        snapshot.get_i64(&format!("{prefix}partial_refund_days")),
        snapshot.get_decimal(&format!("{prefix}partial_refund_percentage")),
        snapshot.get_i64(&format!("{prefix}minimal_refund_days")),
        snapshot.get_decimal(&format!("{prefix}minimal_refund_percentage")),
    );

    let (Some(full_days), Some(partial_days), Some(partial_pct), Some(minimal_days), Some(minimal_pct)) = keys
    else {
        tracing::warn!("refund policy snapshot is missing tier keys, refunding 0%");
        return (RefundTier::NoRefund, Decimal::ZERO);
    };

    if days >= full_days {
        (RefundTier::Full, Decimal::ONE_HUNDRED)
    } else if days >= partial_days {
        (RefundTier::Partial, partial_pct)
    } else if days >= minimal_days {
        (RefundTier::Minimal, minimal_pct)
    } else {
        (RefundTier::NoRefund, Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use rust_decimal_macros::dec;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    /// Tiers {full: 7d/100%, partial: 3d/50%, minimal: 1d/0%}, and a
    /// stricter deposit set, fee deduction off unless a test enables it.
    fn snapshot() -> PolicySnapshot {
        let mut map = IndexMap::new();
        map.insert("full_refund_days".to_string(), 7.into());
        map.insert("partial_refund_days".to_string(), 3.into());
        map.insert("partial_refund_percentage".to_string(), "50".into());
        map.insert("minimal_refund_days".to_string(), 1.into());
        map.insert("minimal_refund_percentage".to_string(), "0".into());
        map.insert("deposit_full_refund_days".to_string(), 14.into());
        map.insert("deposit_partial_refund_days".to_string(), 7.into());
        map.insert("deposit_partial_refund_percentage".to_string(), "25".into());
        map.insert("deposit_minimal_refund_days".to_string(), 2.into());
        map.insert("deposit_minimal_refund_percentage".to_string(), "0".into());
        map.insert("deduct_processor_fee".to_string(), false.into());
        PolicySnapshot(map)
    }

    fn snapshot_with_fees() -> PolicySnapshot {
        let mut s = snapshot();
        s.0.insert("deduct_processor_fee".to_string(), true.into());
        s
    }

    const START: &str = "2025-06-20 10:00";

    #[test]
    fn test_partial_tier_four_days_out() {
        let result = compute_refund(
            &snapshot(),
            dt(START),
            dt("2025-06-16 10:00"),
            dec!(200),
            false,
            false,
        );
        assert_eq!(result.tier, RefundTier::Partial);
        assert_eq!(result.days_before_start, 4);
        assert_eq!(result.final_refund_amount, dec!(100));
    }

    #[test]
    fn test_full_tier_at_threshold() {
        let result = compute_refund(
            &snapshot(),
            dt(START),
            dt("2025-06-13 10:00"),
            dec!(200),
            false,
            false,
        );
        assert_eq!(result.tier, RefundTier::Full);
        assert_eq!(result.final_refund_amount, dec!(200));
    }

    #[test]
    fn test_partial_day_floors_down() {
        // 6 days and 23 hours before start stays in the partial band
        let result = compute_refund(
            &snapshot(),
            dt(START),
            dt("2025-06-13 11:00"),
            dec!(200),
            false,
            false,
        );
        assert_eq!(result.days_before_start, 6);
        assert_eq!(result.tier, RefundTier::Partial);
    }

    #[test]
    fn test_minimal_tier_is_zero_percent() {
        let result = compute_refund(
            &snapshot(),
            dt(START),
            dt("2025-06-19 08:00"),
            dec!(200),
            false,
            false,
        );
        assert_eq!(result.tier, RefundTier::Minimal);
        assert_eq!(result.final_refund_amount, dec!(0));
    }

    #[test]
    fn test_cancellation_after_start_gets_nothing() {
        let result = compute_refund(
            &snapshot(),
            dt(START),
            dt("2025-06-20 18:00"),
            dec!(200),
            false,
            false,
        );
        assert!(result.days_before_start < 0);
        assert_eq!(result.tier, RefundTier::NoRefund);
        assert_eq!(result.final_refund_amount, dec!(0));
    }

    #[test]
    fn test_deposit_uses_its_own_thresholds() {
        // 4 days out: partial for a full payment, below minimal for a deposit
        let result = compute_refund(
            &snapshot(),
            dt(START),
            dt("2025-06-16 10:00"),
            dec!(50),
            true,
            false,
        );
        assert_eq!(result.tier, RefundTier::Minimal);
        assert_eq!(result.final_refund_amount, dec!(0));
    }

    #[test]
    fn test_fee_deduction_domestic() {
        let result = compute_refund(
            &snapshot_with_fees(),
            dt(START),
            dt("2025-06-16 10:00"),
            dec!(200),
            false,
            false,
        );
        // 50% of 200 = 100, minus (200 * 1.5% + 0.20) = 3.20
        assert_eq!(result.eligible_amount, dec!(100));
        assert_eq!(result.fee_deducted, dec!(3.20));
        assert_eq!(result.final_refund_amount, dec!(96.80));
    }

    #[test]
    fn test_fee_deduction_international() {
        let result = compute_refund(
            &snapshot_with_fees(),
            dt(START),
            dt("2025-06-16 10:00"),
            dec!(200),
            false,
            true,
        );
        // 50% of 200 = 100, minus (200 * 2.5% + 0.20) = 5.20
        assert_eq!(result.fee_deducted, dec!(5.20));
        assert_eq!(result.final_refund_amount, dec!(94.80));
    }

    #[test]
    fn test_refund_never_negative() {
        let result = compute_refund(
            &snapshot_with_fees(),
            dt(START),
            dt("2025-06-16 10:00"),
            dec!(0.10),
            false,
            true,
        );
        assert_eq!(result.final_refund_amount, dec!(0));
    }

    #[test]
    fn test_refund_is_monotonic_in_days_before_start() {
        let mut previous = Decimal::MAX;
        for days_out in (0..=10).rev() {
            let cancelled = dt(START) - chrono::Duration::days(days_out);
            let result =
                compute_refund(&snapshot(), dt(START), cancelled, dec!(200), false, false);
            assert!(result.final_refund_amount <= previous);
            previous = result.final_refund_amount;
        }
    }

    #[test]
    fn test_empty_snapshot_degrades_to_zero() {
        let result = compute_refund(
            &PolicySnapshot::empty(),
            dt(START),
            dt("2025-06-01 10:00"),
            dec!(200),
            false,
            false,
        );
        assert_eq!(result.tier, RefundTier::NoRefund);
        assert_eq!(result.final_refund_amount, dec!(0));
    }

    #[test]
    fn test_incomplete_snapshot_degrades_to_zero() {
        let mut map = IndexMap::new();
        map.insert("full_refund_days".to_string(), 7.into());
        let result = compute_refund(
            &PolicySnapshot(map),
            dt(START),
            dt("2025-06-01 10:00"),
            dec!(200),
            false,
            false,
        );
        assert_eq!(result.tier, RefundTier::NoRefund);
        assert_eq!(result.final_refund_amount, dec!(0));
    }
}
