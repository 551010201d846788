//! Slot and date availability calculator
//!
//! Candidates are generated on the policy's spacing grid and filtered
//! against blocked ranges, open weekdays, same-day cutoff and occupied
//! slots. Availability is advisory: a reported slot may be taken by a
//! racing conversion, which re-checks inside its transaction.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::models::policy::{BlockedRange, OperatingPolicy};

fn minutes_of(t: NaiveTime) -> i64 {
    (t.num_seconds_from_midnight() / 60) as i64
}

fn time_of(minutes: i64) -> NaiveTime {
    NaiveTime::from_num_seconds_from_midnight_opt((minutes * 60) as u32, 0)
        .unwrap_or(NaiveTime::MIN)
}

fn is_blocked(blocked: &[BlockedRange], date: NaiveDate) -> bool {
    blocked.iter().any(|r| r.contains(date))
}

/// True when `candidate` lies within `spacing_minutes` (inclusive) of any
/// occupied time. Shared with the conversion pipeline's in-transaction
/// re-check.
pub fn has_conflict(occupied: &[NaiveTime], candidate: NaiveTime, spacing_minutes: i64) -> bool {
    occupied
        .iter()
        .any(|occ| (minutes_of(candidate) - minutes_of(*occ)).abs() <= spacing_minutes)
}

/// Bookable times on `target_date`, in chronological order.
///
/// Steps from `start_time` to `end_time` inclusive on the spacing grid; an
/// off-grid `end_time` is never force-appended. Every candidate within
/// `spacing` minutes (inclusive) of an occupied slot is removed, so one
/// occupied slot masks its neighbours on both sides.
pub fn available_slots(
    policy: &OperatingPolicy,
    blocked: &[BlockedRange],
    occupied: &[NaiveTime],
    target_date: NaiveDate,
    now: NaiveDateTime,
) -> Vec<NaiveTime> {
    if is_blocked(blocked, target_date) {
        return Vec::new();
    }

    if !policy.allow_after_hours && !policy.is_open_weekday(target_date.weekday()) {
        return Vec::new();
    }

    let spacing = policy.slot_spacing_minutes as i64;
    if spacing <= 0 {
        return Vec::new();
    }

    // Same-day requests are clipped to the cutoff; after-hours policies
    // override the normal-hours rules instead of stacking with them.
    let mut end_time = policy.end_time;
    if target_date <= now.date() && !policy.allow_after_hours {
        end_time = end_time.min(policy.same_day_cutoff);
    }

    let start_min = minutes_of(policy.start_time);
    let end_min = minutes_of(end_time);

    let mut slots = Vec::new();
    let mut m = start_min;
    while m <= end_min {
        slots.push(time_of(m));
        m += spacing;
    }

    if target_date == now.date() && !policy.allow_after_hours {
        let lead_min = minutes_of(now.time()) + policy.min_advance_hours as i64 * 60;
        slots.retain(|t| minutes_of(*t) >= lead_min);
    }

    slots.retain(|t| !has_conflict(occupied, *t, spacing));

    slots
}

/// Bookable dates up to and including the resource target date.
///
/// The window is `[max(target - max_advance_days, today), target]`; blocked
/// dates are excluded, and closed weekdays are excluded unless after-hours
/// bookings are allowed. An empty `open_weekdays` set with after-hours
/// disabled yields an empty result - a valid degenerate configuration.
pub fn available_dates(
    policy: &OperatingPolicy,
    blocked: &[BlockedRange],
    resource_target_date: NaiveDate,
    now: NaiveDateTime,
) -> Vec<NaiveDate> {
    let max_date = resource_target_date;
    let earliest = resource_target_date - chrono::Duration::days(policy.max_advance_days as i64);
    let min_date = earliest.max(now.date());

    if min_date > max_date {
        return Vec::new();
    }

    let mut dates = Vec::new();
    let mut d = min_date;
    while d <= max_date {
        let open = policy.allow_after_hours || policy.is_open_weekday(d.weekday());
        if open && !is_blocked(blocked, d) {
            dates.push(d);
        }
        d += chrono::Duration::days(1);
    }
    dates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::DepositMode;
    use rust_decimal_macros::dec;

    fn policy() -> OperatingPolicy {
        OperatingPolicy {
            id: 1,
            start_time: time("09:00"),
            end_time: time("17:00"),
            slot_spacing_minutes: 30,
            same_day_cutoff: time("16:00"),
            allow_after_hours: false,
            open_weekdays: vec![0, 1, 2, 3, 4],
            max_advance_days: 7,
            min_advance_hours: 2,
            deposit_mode: DepositMode::Disabled,
            deposit_flat_amount: dec!(0),
            deposit_percentage: dec!(0),
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

    fn time(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn range(start: &str, end: &str) -> BlockedRange {
        BlockedRange {
            id: 1,
            start_date: date(start),
            end_date: date(end),
            reason: None,
            crea_date: None,
        }
    }

    // 2025-06-16 is a Monday; "now" well before the target keeps the
    // same-day rules out of the way.
    const NOW: &str = "2025-06-10 08:00";

    #[test]
    fn test_full_day_grid() {
        let slots = available_slots(&policy(), &[], &[], date("2025-06-16"), dt(NOW));
        assert_eq!(slots.len(), 17);
        assert_eq!(slots[0], time("09:00"));
        assert_eq!(slots[1], time("09:30"));
        assert_eq!(slots[16], time("17:00"));
    }

    #[test]
    fn test_grid_is_strictly_increasing_and_evenly_spaced() {
        let slots = available_slots(&policy(), &[], &[], date("2025-06-16"), dt(NOW));
        for pair in slots.windows(2) {
            let gap = minutes_of(pair[1]) - minutes_of(pair[0]);
            assert_eq!(gap, 30);
        }
    }

    #[test]
    fn test_off_grid_end_time_is_not_appended() {
        let mut p = policy();
        p.end_time = time("17:10");
        let slots = available_slots(&p, &[], &[], date("2025-06-16"), dt(NOW));
        assert_eq!(*slots.last().unwrap(), time("17:00"));
    }

    #[test]
    fn test_occupied_slot_masks_neighbours() {
        let slots = available_slots(
            &policy(),
            &[],
            &[time("10:00")],
            date("2025-06-16"),
            dt(NOW),
        );
        assert_eq!(slots.len(), 14);
        assert!(!slots.contains(&time("09:30")));
        assert!(!slots.contains(&time("10:00")));
        assert!(!slots.contains(&time("10:30")));
        assert!(slots.contains(&time("09:00")));
        assert!(slots.contains(&time("11:00")));
    }

    #[test]
    fn test_surviving_slots_outside_exclusion_window() {
        let occupied = vec![time("10:00"), time("14:15")];
        let slots = available_slots(&policy(), &[], &occupied, date("2025-06-16"), dt(NOW));
        for slot in &slots {
            for occ in &occupied {
                assert!((minutes_of(*slot) - minutes_of(*occ)).abs() > 30);
            }
        }
    }

    #[test]
    fn test_idempotent() {
        let occupied = vec![time("11:30")];
        let a = available_slots(&policy(), &[], &occupied, date("2025-06-16"), dt(NOW));
        let b = available_slots(&policy(), &[], &occupied, date("2025-06-16"), dt(NOW));
        assert_eq!(a, b);
    }

    #[test]
    fn test_blocked_date_has_no_slots() {
        let blocked = vec![range("2025-06-15", "2025-06-17")];
        let slots = available_slots(&policy(), &blocked, &[], date("2025-06-16"), dt(NOW));
        assert!(slots.is_empty());
    }

    #[test]
    fn test_closed_weekday_has_no_slots() {
        // 2025-06-15 is a Sunday
        let slots = available_slots(&policy(), &[], &[], date("2025-06-15"), dt(NOW));
        assert!(slots.is_empty());
    }

    #[test]
    fn test_after_hours_bypasses_weekday_filter() {
        let mut p = policy();
        p.allow_after_hours = true;
        let slots = available_slots(&p, &[], &[], date("2025-06-15"), dt(NOW));
        assert_eq!(slots.len(), 17);
    }

    #[test]
    fn test_after_hours_does_not_bypass_blocked_range() {
        let mut p = policy();
        p.allow_after_hours = true;
        let blocked = vec![range("2025-06-15", "2025-06-15")];
        let slots = available_slots(&p, &blocked, &[], date("2025-06-15"), dt(NOW));
        assert!(slots.is_empty());
    }

    #[test]
    fn test_same_day_clips_to_cutoff() {
        let slots = available_slots(&policy(), &[], &[], date("2025-06-16"), dt("2025-06-16 07:00"));
        // cutoff 16:00, lead time 2h from 07:00 removes nothing after 09:00
        assert_eq!(*slots.last().unwrap(), time("16:00"));
        assert_eq!(slots[0], time("09:00"));
    }

    #[test]
    fn test_same_day_lead_time_removes_earlier_slots() {
        let slots = available_slots(&policy(), &[], &[], date("2025-06-16"), dt("2025-06-16 09:10"));
        // 09:10 + 2h lead = 11:10, first available is 11:30
        assert_eq!(slots[0], time("11:30"));
    }

    #[test]
    fn test_dates_clamped_to_today_and_target() {
        let today = date("2025-06-16");
        let target = today + chrono::Duration::days(3);
        let mut p = policy();
        p.open_weekdays = vec![0, 1, 2, 3, 4, 5, 6];
        let dates = available_dates(&p, &[], target, dt("2025-06-16 08:00"));
        assert_eq!(
            dates,
            vec![
                today,
                today + chrono::Duration::days(1),
                today + chrono::Duration::days(2),
                target,
            ]
        );
    }

    #[test]
    fn test_dates_window_starts_at_advance_limit() {
        let mut p = policy();
        p.open_weekdays = vec![0, 1, 2, 3, 4, 5, 6];
        p.max_advance_days = 2;
        let target = date("2025-06-26");
        let dates = available_dates(&p, &[], target, dt("2025-06-16 08:00"));
        assert_eq!(dates, vec![date("2025-06-24"), date("2025-06-25"), date("2025-06-26")]);
    }

    #[test]
    fn test_dates_empty_when_target_in_past() {
        let dates = available_dates(&policy(), &[], date("2025-06-10"), dt("2025-06-16 08:00"));
        assert!(dates.is_empty());
    }

    #[test]
    fn test_dates_exclude_blocked_and_closed() {
        let mut p = policy();
        p.max_advance_days = 30;
        // window 2025-06-16 (Mon) .. 2025-06-22 (Sun); Tue blocked
        let blocked = vec![range("2025-06-17", "2025-06-17")];
        let dates = available_dates(&p, &blocked, date("2025-06-22"), dt("2025-06-16 08:00"));
        assert_eq!(
            dates,
            vec![date("2025-06-16"), date("2025-06-18"), date("2025-06-19"), date("2025-06-20")]
        );
    }

    #[test]
    fn test_no_open_weekdays_is_valid_and_empty() {
        let mut p = policy();
        p.open_weekdays = Vec::new();
        let dates = available_dates(&p, &[], date("2025-06-22"), dt("2025-06-16 08:00"));
        assert!(dates.is_empty());
    }

    #[test]
    fn test_after_hours_opens_every_weekday() {
        let mut p = policy();
        p.open_weekdays = Vec::new();
        p.allow_after_hours = true;
        p.max_advance_days = 30;
        let dates = available_dates(&p, &[], date("2025-06-18"), dt("2025-06-16 08:00"));
        assert_eq!(dates.len(), 3);
    }
}
