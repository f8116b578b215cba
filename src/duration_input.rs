//! Free-form duration and session-count parsing for user supplied text.
//!
//! Nothing here ever fails: every attempt is total and falls through to the
//! next one, ending at the caller's default.

use std::time::Duration;

/// Session count used when the text is missing, malformed or not positive.
pub const DEFAULT_SESSIONS: u32 = 4;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Resolve `text` to a phase length.
///
/// Tried in order: blank text, unit-suffixed text (`30s`, `1h30m`, `1.5h`),
/// a bare integer read as minutes, and finally `default_minutes`.
pub fn parse_duration_input(text: &str, default_minutes: u64) -> Duration {
    let text = text.trim();
    if text.is_empty() {
        return minutes(default_minutes);
    }

    parse_unit_duration(text)
        .or_else(|| parse_whole_minutes(text))
        .filter(|d| !d.is_zero())
        .unwrap_or_else(|| minutes(default_minutes))
}

/// Resolve `text` to a number of work sessions, coercing anything that is
/// not a positive integer to `fallback`.
pub fn parse_session_count(text: &str, fallback: u32) -> u32 {
    text.trim()
        .parse::<i64>()
        .ok()
        .filter(|n| *n > 0)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(fallback)
}

pub fn minutes(n: u64) -> Duration {
    Duration::from_secs(n.saturating_mul(60))
}

fn parse_whole_minutes(text: &str) -> Option<Duration> {
    let n = text.parse::<u64>().ok()?;
    n.checked_mul(60).map(Duration::from_secs)
}

fn unit_nanos(unit: &str) -> Option<u128> {
    let nanos = match unit.to_ascii_lowercase().as_str() {
        "ns" => 1,
        "us" | "µs" | "μs" => 1_000,
        "ms" => 1_000_000,
        "s" => NANOS_PER_SEC,
        "m" => 60 * NANOS_PER_SEC,
        "h" => 3_600 * NANOS_PER_SEC,
        _ => return None,
    };
    Some(nanos)
}

/// `[+]<number><unit>[<number><unit>...]`, e.g. `1h30m` or `2.5m`.
fn parse_unit_duration(text: &str) -> Option<Duration> {
    let mut rest = text.strip_prefix('+').unwrap_or(text);
    if rest.is_empty() {
        return None;
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let int_len = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        let (int_part, after_int) = rest.split_at(int_len);

        let (frac_part, after_number) = match after_int.strip_prefix('.') {
            Some(tail) => {
                let frac_len = tail.find(|c: char| !c.is_ascii_digit()).unwrap_or(tail.len());
                tail.split_at(frac_len)
            }
            None => ("", after_int),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return None;
        }

        let unit_len = after_number
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(after_number.len());
        let (unit, tail) = after_number.split_at(unit_len);
        let scale = unit_nanos(unit)?;

        let whole = if int_part.is_empty() {
            0
        } else {
            int_part.parse::<u128>().ok()?
        };
        total = total.checked_add(whole.checked_mul(scale)?)?;

        if !frac_part.is_empty() {
            let fraction = format!("0.{frac_part}").parse::<f64>().ok()?;
            total = total.checked_add((fraction * scale as f64).round() as u128)?;
        }

        rest = tail;
    }

    let secs = u64::try_from(total / NANOS_PER_SEC).ok()?;
    Some(Duration::new(secs, (total % NANOS_PER_SEC) as u32))
}
