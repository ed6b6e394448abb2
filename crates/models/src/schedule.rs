use crate::days::DaySet;
use chrono::{Datelike, FixedOffset, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Campus-local timezone offset in seconds east of UTC.
///
/// All stored datetimes are UTC; every windowing comparison (weekday,
/// hour-of-day) happens in campus-local time. The academy operates on
/// America/Bogota time, a fixed UTC-5 with no DST. Deployments elsewhere
/// change this one constant; it is applied uniformly to campus window
/// validation and advance-time checks.
pub const CAMPUS_UTC_OFFSET_SECONDS: i32 = -5 * 3600;

pub fn campus_offset() -> FixedOffset {
    FixedOffset::east_opt(CAMPUS_UTC_OFFSET_SECONDS).expect("campus offset within +-24h")
}

/// Converts a stored UTC instant to campus-local wall-clock time.
pub fn to_campus_local(utc: NaiveDateTime) -> NaiveDateTime {
    utc.and_utc().with_timezone(&campus_offset()).naive_local()
}

/// ISO weekday (1=Monday .. 7=Sunday) of a UTC instant, in campus-local time.
pub fn campus_weekday(utc: NaiveDateTime) -> u32 {
    to_campus_local(utc).weekday().number_from_monday()
}

/// An open-hours window within a single day, inclusive at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl DayWindow {
    /// Creates a window if `start` is before `end`.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    pub fn contains(&self, time: NaiveTime) -> bool {
        self.start <= time && time <= self.end
    }
}

/// Why a proposed session window was rejected by a campus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum WindowViolation {
    DayNotAllowed { weekday: u32 },
    StartOutsideWindow { local_start: NaiveTime },
    EndOutsideWindow { local_end: NaiveTime },
}

/// Validates a proposed session window against a campus's allowed days and
/// the effective open-hours window for the session's (local) weekday.
///
/// The weekday is taken from the start instant after converting to
/// campus-local time; both endpoints' local hour-of-day must fall inside
/// the window, inclusive.
pub fn validate_session_window(
    allowed_days: DaySet,
    window: DayWindow,
    start_utc: NaiveDateTime,
    end_utc: NaiveDateTime,
) -> Result<(), WindowViolation> {
    let local_start = to_campus_local(start_utc);
    let local_end = to_campus_local(end_utc);

    let weekday = local_start.weekday().number_from_monday();
    if !allowed_days.allows_iso_weekday(weekday) {
        return Err(WindowViolation::DayNotAllowed { weekday });
    }

    if !window.contains(local_start.time()) {
        return Err(WindowViolation::StartOutsideWindow {
            local_start: local_start.time(),
        });
    }
    if !window.contains(local_end.time()) {
        return Err(WindowViolation::EndOutsideWindow {
            local_end: local_end.time(),
        });
    }

    Ok(())
}

/// Whole minutes from `now` until `instant` (both UTC); negative if past.
pub fn minutes_until(now_utc: NaiveDateTime, instant_utc: NaiveDateTime) -> i64 {
    (instant_utc - now_utc).num_minutes()
}

/// Fractional hour-of-day label (e.g. 7.5 for 07:30), used in messages.
pub fn hour_label(time: NaiveTime) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn business_window() -> DayWindow {
        DayWindow::new(time(7, 0), time(18, 0)).unwrap()
    }

    fn mon_to_sat() -> DaySet {
        DaySet::WEEKDAYS | DaySet::SATURDAY
    }

    #[test]
    fn test_utc_to_local_conversion() {
        // 17:00 UTC is 12:00 in Bogota.
        let local = to_campus_local(utc(2025, 6, 16, 17, 0));
        assert_eq!(local.time(), time(12, 0));
        assert_eq!(local.weekday().number_from_monday(), 1);
    }

    #[test]
    fn test_weekday_rolls_over_at_midnight_utc() {
        // 03:00 UTC Monday is 22:00 Sunday local.
        assert_eq!(campus_weekday(utc(2025, 6, 16, 3, 0)), 7);
    }

    #[test]
    fn test_sunday_blocked() {
        // 2025-06-15 is a Sunday; 12:00-13:00 local is 17:00-18:00 UTC.
        let err = validate_session_window(
            mon_to_sat(),
            business_window(),
            utc(2025, 6, 15, 17, 0),
            utc(2025, 6, 15, 18, 0),
        )
        .unwrap_err();
        assert_eq!(err, WindowViolation::DayNotAllowed { weekday: 7 });
    }

    #[test]
    fn test_start_before_opening() {
        // Monday 06:30-07:30 local is 11:30-12:30 UTC.
        let err = validate_session_window(
            mon_to_sat(),
            business_window(),
            utc(2025, 6, 16, 11, 30),
            utc(2025, 6, 16, 12, 30),
        )
        .unwrap_err();
        assert_eq!(
            err,
            WindowViolation::StartOutsideWindow {
                local_start: time(6, 30)
            }
        );
    }

    #[test]
    fn test_end_after_closing() {
        // Monday 17:30-18:30 local.
        let err = validate_session_window(
            mon_to_sat(),
            business_window(),
            utc(2025, 6, 16, 22, 30),
            utc(2025, 6, 16, 23, 30),
        )
        .unwrap_err();
        assert_eq!(
            err,
            WindowViolation::EndOutsideWindow {
                local_end: time(18, 30)
            }
        );
    }

    #[test]
    fn test_window_bounds_inclusive() {
        // Exactly 07:00-18:00 local is admissible.
        assert!(
            validate_session_window(
                mon_to_sat(),
                business_window(),
                utc(2025, 6, 16, 12, 0),
                utc(2025, 6, 16, 23, 0),
            )
            .is_ok()
        );
    }

    #[test]
    fn test_in_window_session_passes() {
        // Tuesday 09:00-10:00 local.
        assert!(
            validate_session_window(
                mon_to_sat(),
                business_window(),
                utc(2025, 6, 17, 14, 0),
                utc(2025, 6, 17, 15, 0),
            )
            .is_ok()
        );
    }

    #[test]
    fn test_minutes_until() {
        let now = utc(2025, 6, 16, 12, 0);
        assert_eq!(minutes_until(now, utc(2025, 6, 16, 12, 45)), 45);
        assert_eq!(minutes_until(now, utc(2025, 6, 16, 11, 0)), -60);
    }

    #[test]
    fn test_day_window_rejects_inverted() {
        assert!(DayWindow::new(time(18, 0), time(7, 0)).is_none());
        assert!(DayWindow::new(time(7, 0), time(7, 0)).is_none());
    }
}
