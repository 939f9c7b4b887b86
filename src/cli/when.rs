use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// Parse a reminder time relative to `now`.
///
/// Accepts `+30m` / `+2h` / `+1d`, a bare `HH:MM` (next occurrence), a full
/// `YYYY-MM-DD HH:MM`, or a bare date (09:00 that day).
pub fn parse_when(input: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let s = input.trim();

    if let Some(rest) = s.strip_prefix('+') {
        let unit = rest.chars().last()?;
        let amount: i64 = rest[..rest.len() - unit.len_utf8()].parse().ok()?;
        let offset = match unit {
            'm' => Duration::try_minutes(amount)?,
            'h' => Duration::try_hours(amount)?,
            'd' => Duration::try_days(amount)?,
            _ => return None,
        };
        return now.checked_add_signed(offset);
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }

    if let Ok(time) = NaiveTime::parse_from_str(s, "%H:%M") {
        let today = now.date().and_time(time);
        return Some(if today <= now {
            today + Duration::days(1)
        } else {
            today
        });
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(9, 0, 0);
    }

    None
}
