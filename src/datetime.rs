use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::Regex;

pub const TIMEZONE: Tz = chrono_tz::America::Bogota;

static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}/\d{2}/\d{4}$").expect("valid date regex"));
static TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01]?[0-9]|2[0-3]):[0-5][0-9]$").expect("valid time regex"));

pub fn now() -> DateTime<Tz> {
    Utc::now().with_timezone(&TIMEZONE)
}

/// Parses `dd/mm/yyyy` and `HH:mm` into one instant. `None` means the value
/// is not computable and each caller picks its own fallback.
pub fn combine_date_and_time(date: &str, time: &str) -> Option<DateTime<Tz>> {
    let date = parse_display_date(date)?;
    let time = parse_time(time)?;
    to_local(date, time)
}

pub fn is_future_date_time(date: &str, time: &str) -> bool {
    is_future_date_time_at(date, time, &now())
}

pub fn is_future_date_time_at(date: &str, time: &str, now: &DateTime<Tz>) -> bool {
    match combine_date_and_time(date, time) {
        Some(instant) => instant > *now,
        None => false,
    }
}

/// True once the scheduled instant is strictly in the past. Without a time the
/// event is considered to start at midnight.
pub fn is_event_finished(date: &str, time: Option<&str>) -> bool {
    is_event_finished_at(date, time, &now())
}

pub fn is_event_finished_at(date: &str, time: Option<&str>, now: &DateTime<Tz>) -> bool {
    let instant = match time {
        Some(time) => combine_date_and_time(date, time),
        None => parse_display_date(date).and_then(|day| to_local(day, NaiveTime::MIN)),
    };
    match instant {
        Some(instant) => instant < *now,
        None => false,
    }
}

pub fn is_valid_date_format(date: &str) -> bool {
    DATE_RE.is_match(date) && parse_display_date(date).is_some()
}

pub fn is_valid_time_format(time: &str) -> bool {
    TIME_RE.is_match(time)
}

pub fn compare_dates(a: &str, b: &str) -> bool {
    normalize_date(a) == normalize_date(b)
}

pub fn iso_to_display_date(iso: &str) -> String {
    let parts: Vec<&str> = iso.split('-').collect();
    match parts.as_slice() {
        [year, month, day] => format!("{day}/{month}/{year}"),
        _ => iso.to_string(),
    }
}

pub fn display_to_iso_date(display: &str) -> String {
    let parts: Vec<&str> = display.split('/').collect();
    match parts.as_slice() {
        [day, month, year] => format!("{year}-{month:0>2}-{day:0>2}"),
        _ => display.to_string(),
    }
}

pub fn to_12_hour(time: &str) -> String {
    let Some((hours, minutes)) = time.split_once(':') else {
        return time.to_string();
    };
    let Ok(hour) = hours.parse::<u32>() else {
        return time.to_string();
    };
    let period = if hour >= 12 { "PM" } else { "AM" };
    let hour12 = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{hour12}:{minutes} {period}")
}

pub fn to_24_hour(time: &str) -> String {
    let (clock, period) = match time.split_once(' ') {
        Some((clock, period)) => (clock, Some(period)),
        None => (time, None),
    };
    let Some((hours, minutes)) = clock.split_once(':') else {
        return time.to_string();
    };
    let Ok(mut hour) = hours.parse::<u32>() else {
        return time.to_string();
    };
    let max_hour = if period.is_some() { 12 } else { 23 };
    if hour > max_hour {
        return time.to_string();
    }
    match period {
        Some("PM") if hour != 12 => hour += 12,
        Some("AM") if hour == 12 => hour = 0,
        _ => {}
    }
    format!("{hour:02}:{minutes}")
}

pub fn min_input_date() -> String {
    now().date_naive().format("%Y-%m-%d").to_string()
}

pub fn parse_display_date(date: &str) -> Option<NaiveDate> {
    let mut parts = date.trim().split('/');
    let day = parts.next()?.parse::<u32>().ok()?;
    let month = parts.next()?.parse::<u32>().ok()?;
    let year = parts.next()?.parse::<i32>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_time(time: &str) -> Option<NaiveTime> {
    let (hours, minutes) = time.trim().split_once(':')?;
    NaiveTime::from_hms_opt(hours.parse().ok()?, minutes.parse().ok()?, 0)
}

fn normalize_date(date: &str) -> String {
    let trimmed = date.trim();
    if trimmed.contains('-') {
        iso_to_display_date(trimmed)
    } else {
        trimmed.to_string()
    }
}

fn to_local(date: NaiveDate, time: NaiveTime) -> Option<DateTime<Tz>> {
    let naive = NaiveDateTime::new(date, time);
    match TIMEZONE.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(dt, _) => Some(dt),
        LocalResult::None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Duration, Timelike};

    fn at(date: &str, time: &str) -> DateTime<Tz> {
        combine_date_and_time(date, time).expect("valid instant")
    }

    #[test]
    fn combines_display_date_and_time() {
        let instant = at("15/03/2025", "19:30");
        assert_eq!(instant.year(), 2025);
        assert_eq!(instant.month(), 3);
        assert_eq!(instant.day(), 15);
        assert_eq!(instant.hour(), 19);
        assert_eq!(instant.minute(), 30);
        assert_eq!(instant.with_timezone(&Utc).hour(), 0, "Bogotá is UTC-5");
    }

    #[test]
    fn malformed_input_is_not_computable() {
        assert!(combine_date_and_time("2025-03-15", "19:30").is_none());
        assert!(combine_date_and_time("31/02/2025", "19:30").is_none());
        assert!(combine_date_and_time("15/03/2025", "7pm").is_none());
        assert!(!is_future_date_time("garbage", "19:30"));
        assert!(!is_event_finished("garbage", None));
    }

    #[test]
    fn finished_and_future_are_complements() {
        let now = at("10/06/2025", "12:00");
        for (date, time) in [
            ("10/06/2025", "11:59"),
            ("10/06/2025", "12:01"),
            ("01/01/2020", "00:00"),
            ("31/12/2030", "23:59"),
        ] {
            assert_eq!(
                is_event_finished_at(date, Some(time), &now),
                !is_future_date_time_at(date, time, &now),
                "{date} {time}"
            );
        }
    }

    #[test]
    fn missing_time_means_midnight() {
        let now = at("10/06/2025", "00:30");
        assert!(is_event_finished_at("10/06/2025", None, &now));
        assert!(!is_event_finished_at("10/06/2025", Some("08:00"), &now));
        assert!(!is_event_finished_at("11/06/2025", None, &now));
    }

    #[test]
    fn wall_clock_predicates_track_now() {
        let tomorrow = now() + Duration::days(1);
        let date = tomorrow.format("%d/%m/%Y").to_string();
        assert!(is_future_date_time(&date, "12:00"));
        assert!(!is_event_finished(&date, Some("12:00")));
        assert!(is_event_finished("01/01/2000", Some("10:00")));
    }

    #[test]
    fn validates_calendar_dates() {
        assert!(is_valid_date_format("29/02/2020"));
        assert!(!is_valid_date_format("29/02/2021"));
        assert!(!is_valid_date_format("30/02/2024"));
        assert!(!is_valid_date_format("1/02/2024"));
        assert!(!is_valid_date_format("2024-02-01"));
        assert!(is_valid_date_format("31/12/1999"));
    }

    #[test]
    fn validates_clock_times() {
        assert!(is_valid_time_format("00:00"));
        assert!(is_valid_time_format("23:59"));
        assert!(is_valid_time_format("9:30"));
        assert!(!is_valid_time_format("24:00"));
        assert!(!is_valid_time_format("12:60"));
        assert!(!is_valid_time_format("12:5"));
    }

    #[test]
    fn compares_dates_across_encodings() {
        assert!(compare_dates("15/03/2025", "2025-03-15"));
        assert!(compare_dates("2025-03-15", "2025-03-15"));
        assert!(!compare_dates("15/03/2025", "16/03/2025"));
        assert!(compare_dates("15032025", "15032025"));
    }

    #[test]
    fn converts_between_input_encodings() {
        assert_eq!(iso_to_display_date("2025-03-15"), "15/03/2025");
        assert_eq!(display_to_iso_date("15/03/2025"), "2025-03-15");
        assert_eq!(display_to_iso_date("5/3/2025"), "2025-03-05");
        assert_eq!(iso_to_display_date(""), "");
        assert_eq!(display_to_iso_date("mañana"), "mañana");
    }

    #[test]
    fn converts_between_clock_formats() {
        assert_eq!(to_12_hour("14:05"), "2:05 PM");
        assert_eq!(to_12_hour("00:15"), "12:15 AM");
        assert_eq!(to_12_hour("12:00"), "12:00 PM");
        assert_eq!(to_24_hour("2:05 PM"), "14:05");
        assert_eq!(to_24_hour("12:15 AM"), "00:15");
        assert_eq!(to_24_hour("12:00 PM"), "12:00");
        assert_eq!(to_24_hour(""), "");
    }

    #[test]
    fn out_of_range_hours_pass_through() {
        assert_eq!(to_24_hour("4294967295:00 PM"), "4294967295:00 PM");
        assert_eq!(to_24_hour("24:00"), "24:00");
        assert_eq!(to_24_hour("23:30 PM"), "23:30 PM");
        assert_eq!(to_24_hour("11:59 PM"), "23:59");
    }
}
