//! Repairs catalog origin times into comparable instants.
//!
//! The catalog writes dates as `yyyy/mm/dd` and occasionally reports a
//! seconds value of `60.x`. [`normalize`] rewrites both into an ISO 8601
//! style `yyyy-mm-ddThh:mm:ss.s` string. The seconds repair only clamps the
//! tens digit to `0`, so an affected time lands up to a minute early instead
//! of carrying into the minute field.

use crate::prelude::TimestampError;
use chrono::NaiveDateTime;

pub const NORMALIZED_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

const DATE_LEN: usize = 10;
const MIN_TIME_LEN: usize = 8;

fn check_structure(date: &str, time: &str) -> Result<(), TimestampError> {
    let date_bytes = date.as_bytes();
    let time_bytes = time.as_bytes();
    let well_formed = date.is_ascii()
        && time.is_ascii()
        && date_bytes.len() == DATE_LEN
        && date_bytes[4] == b'/'
        && date_bytes[7] == b'/'
        && time_bytes.len() >= MIN_TIME_LEN
        && time_bytes[2] == b':'
        && time_bytes[5] == b':';
    if well_formed {
        Ok(())
    } else {
        Err(TimestampError::Structure {
            date: date.to_string(),
            time: time.to_string(),
        })
    }
}

/// Joins a catalog date and time into `yyyy-mm-ddThh:mm:ss.s`.
pub fn normalize(date: &str, time: &str) -> Result<String, TimestampError> {
    check_structure(date, time)?;

    let seconds = &time[6..];
    let seconds = match seconds.strip_prefix('6') {
        Some(rest) => format!("0{rest}"),
        None => seconds.to_string(),
    };

    Ok(format!(
        "{}-{}-{}T{}{}",
        &date[0..4],
        &date[5..7],
        &date[8..10],
        &time[..6],
        seconds
    ))
}

pub fn parse_instant(normalized: &str) -> Result<NaiveDateTime, TimestampError> {
    NaiveDateTime::parse_from_str(normalized, NORMALIZED_FORMAT)
        .map_err(|_| TimestampError::Unparseable(normalized.to_string()))
}

pub fn to_instant(date: &str, time: &str) -> Result<NaiveDateTime, TimestampError> {
    parse_instant(&normalize(date, time)?)
}

/// Reads a user-supplied window bound.
///
/// Accepts the normalized form (`2010-01-01T00:00:00.0`), a bare date
/// (`2010-01-01`), or the catalog's own `2010/01/01 00:00:00.0`.
pub fn parse_bound(text: &str) -> Result<NaiveDateTime, TimestampError> {
    let text = text.trim();
    if text.contains('/') {
        let mut parts = text.splitn(2, |c: char| c == 'T' || c.is_whitespace());
        let date = parts.next().unwrap_or_default();
        let time = parts.next().map(str::trim).unwrap_or("00:00:00.0");
        return to_instant(date, time);
    }
    if text.len() == DATE_LEN {
        return parse_instant(&format!("{text}T00:00:00"));
    }
    parse_instant(text)
}
