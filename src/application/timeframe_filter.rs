// Timeframe filtering - Trailing window relative to the newest sample
use crate::domain::sample::Series;
use crate::domain::timeframe::Timeframe;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse an ISO-8601 timestamp. Offset-less forms are read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Keep samples no older than `window` before the latest parseable
/// timestamp. With a window, samples whose timestamp cannot be parsed are
/// dropped; without one the series is returned untouched. If no timestamp
/// parses at all the unfiltered series is returned.
pub fn filter_series(series: &Series, window: Timeframe) -> Series {
    let Some(window_secs) = window.window_seconds() else {
        return series.clone();
    };

    let parsed: Vec<Option<DateTime<Utc>>> = series
        .timestamps()
        .iter()
        .map(|ts| parse_timestamp(ts))
        .collect();

    let Some(latest) = parsed.iter().flatten().max().copied() else {
        tracing::warn!("No parseable timestamps; ignoring {}s window", window_secs);
        return series.clone();
    };

    let cutoff = i64::try_from(window_secs)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .and_then(|delta| latest.checked_sub_signed(delta))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);

    let filtered: Series = parsed
        .iter()
        .enumerate()
        .filter(|(_, dt)| dt.is_some_and(|dt| dt >= cutoff))
        .filter_map(|(idx, _)| series.get(idx))
        .collect();

    let unparsable = parsed.iter().filter(|dt| dt.is_none()).count();
    tracing::debug!(
        "Window {}s kept {} of {} samples ({} with unparsable timestamps dropped)",
        window_secs,
        filtered.len(),
        series.len(),
        unparsable
    );

    if filtered.is_empty() {
        return series.clone();
    }
    filtered
}
