//! 12-hour clock times ("8:00 AM", "12:30 pm") as seconds since local midnight.

pub const SECONDS_PER_DAY: u32 = 24 * 3600;

/// Parse a 12-hour clock time into seconds since midnight.
///
/// Accepts a 1-2 digit hour in 1..=12, a 2 digit minute, optional whitespace
/// before a case-insensitive AM/PM, and surrounding whitespace. "12:xx AM" is
/// just after midnight, "12:xx PM" just after noon. Anything else is `None`.
pub fn parse_clock_time(input: &str) -> Option<u32> {
    let (hour, rest) = input.trim().split_once(':')?;

    if hour.is_empty() || hour.len() > 2 || !hour.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let minute = rest.get(..2)?;
    if !minute.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let meridiem = rest.get(2..)?.trim_start();
    let is_pm = if meridiem.eq_ignore_ascii_case("am") {
        false
    } else if meridiem.eq_ignore_ascii_case("pm") {
        true
    } else {
        return None;
    };

    let hour: u32 = hour.parse().ok()?;
    let minute: u32 = minute.parse().ok()?;
    if !(1..=12).contains(&hour) || minute > 59 {
        return None;
    }

    let hour = hour % 12 + if is_pm { 12 } else { 0 };
    Some(hour * 3600 + minute * 60)
}

/// Render seconds since midnight as a 12-hour clock time, e.g. "9:30 AM".
///
/// Seconds are truncated and values past one day wrap around.
pub fn format_clock_time(seconds: u32) -> String {
    let seconds = seconds % SECONDS_PER_DAY;
    let hour = seconds / 3600;
    let minute = (seconds % 3600) / 60;
    let meridiem = if hour < 12 { "AM" } else { "PM" };
    let display_hour = match hour % 12 {
        0 => 12,
        h => h,
    };

    format!("{}:{:02} {}", display_hour, minute, meridiem)
}
