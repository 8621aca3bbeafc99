//! Excel serial dates (1900 system) rendered as ISO 8601 text.

const SECS_PER_DAY: i64 = 86_400;
/// Serial number of 1970-01-01.
const UNIX_EPOCH_SERIAL: i64 = 25_569;

/// `2024-05-17`, `2024-05-17 08:30:00`, or `08:30:00` for a time with no date part.
pub(super) fn serial_to_iso(serial: f64) -> String {
    if !serial.is_finite() {
        return serial.to_string();
    }
    let mut days = serial.floor() as i64;
    let mut secs = ((serial - serial.floor()) * SECS_PER_DAY as f64).round() as i64;
    if secs >= SECS_PER_DAY {
        days += 1;
        secs -= SECS_PER_DAY;
    }
    let time = format!("{:02}:{:02}:{:02}", secs / 3600, secs % 3600 / 60, secs % 60);
    if days == 0 {
        return time;
    }
    let (y, m, d) = civil_from_days(days - UNIX_EPOCH_SERIAL);
    if secs == 0 {
        format!("{:04}-{:02}-{:02}", y, m, d)
    } else {
        format!("{:04}-{:02}-{:02} {}", y, m, d, time)
    }
}

/// Number format that displays `serial` the way [`serial_to_iso`] renders it.
pub(super) fn number_format(serial: f64) -> &'static str {
    if serial.fract() == 0.0 {
        "yyyy-mm-dd"
    } else if serial < 1.0 {
        "hh:mm:ss"
    } else {
        "yyyy-mm-dd hh:mm:ss"
    }
}

/// Proleptic Gregorian (year, month, day) for days since 1970-01-01.
fn civil_from_days(days: i64) -> (i64, i64, i64) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = doy - (153 * mp + 2) / 5 + 1;
    let m = if mp < 10 { mp + 3 } else { mp - 9 };
    let y = yoe + era * 400 + i64::from(m <= 2);
    (y, m, d)
}
