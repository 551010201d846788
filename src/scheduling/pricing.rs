//! Draft pricing helpers shared by the flow steps

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::draft::AddOn;
use crate::models::enums::DepositMode;
use crate::models::policy::OperatingPolicy;

/// Expected completion/return date. A zero-day duration completes the
/// same day.
pub fn estimated_completion(service_date: NaiveDate, duration_days: i32) -> NaiveDate {
    service_date + chrono::Duration::days(duration_days.max(0) as i64)
}

/// Draft total: the resource rate over its occupation (minimum one day)
/// plus selected add-ons.
pub fn booking_total(daily_rate: Decimal, duration_days: i32, add_ons: &[AddOn]) -> Decimal {
    let days = Decimal::from(duration_days.max(1));
    let add_on_total: Decimal = add_ons.iter().map(|a| a.price).sum();
    (daily_rate * days + add_on_total).round_dp(2)
}

/// Deposit owed up front, derived from the policy's deposit mode.
/// Never negative, even against a misconfigured policy.
pub fn deposit_amount(total: Decimal, policy: &OperatingPolicy) -> Decimal {
    let amount = match policy.deposit_mode {
        DepositMode::Disabled => Decimal::ZERO,
        DepositMode::Flat => policy.deposit_flat_amount,
        DepositMode::Percentage => {
            (total * policy.deposit_percentage / Decimal::ONE_HUNDRED).round_dp(2)
        }
    };
    amount.max(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn policy_with(mode: DepositMode, flat: Decimal, pct: Decimal) -> OperatingPolicy {
        OperatingPolicy {
            id: 1,
            start_time: chrono::NaiveTime::MIN,
            end_time: chrono::NaiveTime::MIN,
            slot_spacing_minutes: 30,
            same_day_cutoff: chrono::NaiveTime::MIN,
            allow_after_hours: false,
            open_weekdays: vec![0, 1, 2, 3, 4],
            max_advance_days: 30,
            min_advance_hours: 0,
            deposit_mode: mode,
            deposit_flat_amount: flat,
            deposit_percentage: pct,
            full_refund_days: 7,
            partial_refund_days: 3,
            partial_refund_percentage: dec!(50),
            minimal_refund_days: 1,
            minimal_refund_percentage: dec!(0),
            deposit_full_refund_days: 7,
            deposit_partial_refund_days: 3,
            deposit_partial_refund_percentage: dec!(50),
            deposit_minimal_refund_days: 1,
            deposit_minimal_refund_percentage: dec!(0),
            deduct_processor_fee: false,
            updated_at: None,
        }
    }

    #[test]
    fn test_completion_zero_duration_is_same_day() {
        assert_eq!(estimated_completion(date("2025-06-16"), 0), date("2025-06-16"));
    }

    #[test]
    fn test_completion_adds_days() {
        assert_eq!(estimated_completion(date("2025-06-16"), 3), date("2025-06-19"));
    }

    #[test]
    fn test_total_single_day_with_add_ons() {
        let add_ons = vec![
            AddOn { code: "valet".into(), label: "Valet".into(), price: dec!(25) },
            AddOn { code: "mats".into(), label: "Mats".into(), price: dec!(15.50) },
        ];
        assert_eq!(booking_total(dec!(80), 0, &add_ons), dec!(120.50));
    }

    #[test]
    fn test_total_multi_day_hire() {
        assert_eq!(booking_total(dec!(45), 3, &[]), dec!(135));
    }

    #[test]
    fn test_deposit_disabled() {
        let p = policy_with(DepositMode::Disabled, dec!(50), dec!(10));
        assert_eq!(deposit_amount(dec!(500), &p), dec!(0));
    }

    #[test]
    fn test_deposit_flat() {
        let p = policy_with(DepositMode::Flat, dec!(50), dec!(0));
        assert_eq!(deposit_amount(dec!(500), &p), dec!(50));
    }

    #[test]
    fn test_deposit_percentage() {
        let p = policy_with(DepositMode::Percentage, dec!(0), dec!(10));
        assert_eq!(deposit_amount(dec!(499), &p), dec!(49.90));
    }

    #[test]
    fn test_deposit_never_negative() {
        let p = policy_with(DepositMode::Flat, dec!(-50), dec!(0));
        assert_eq!(deposit_amount(dec!(500), &p), dec!(0));
        let p = policy_with(DepositMode::Percentage, dec!(0), dec!(-10));
        assert_eq!(deposit_amount(dec!(500), &p), dec!(0));
    }
}
