//! Cache Inspection
//!
//! Text reports printed by the `cache_manager` maintenance tool.

use std::fmt::{self, Write};

use chrono::{DateTime, Local, Utc};

use crate::cache::{CacheStore, DataKind, RecentEntry, RECENT_LIMIT};
use crate::error::{Result, WeatherError};

fn local_time(ts: i64) -> String {
    DateTime::<Utc>::from_timestamp(ts, 0)
        .map(|dt| {
            dt.with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_else(|| ts.to_string())
}

/// Builds the `view` report: counts, database size and the most recent
/// weather entries with their validity at `now`.
pub fn render_view(store: &CacheStore, now: i64) -> Result<String> {
    let weather_count = store.count(DataKind::CurrentWeather)?;
    let forecast_count = store.count(DataKind::Forecast)?;
    let size_bytes = store.storage_size_bytes()?;
    let entries = store.list_recent(DataKind::CurrentWeather, RECENT_LIMIT)?;

    let mut out = String::new();
    write_view(
        &mut out,
        weather_count,
        forecast_count,
        size_bytes,
        &entries,
        now,
    )
    .map_err(|e| WeatherError::Internal(format!("cannot format cache report: {}", e)))?;
    Ok(out)
}

fn write_view(
    out: &mut impl Write,
    weather_count: u64,
    forecast_count: u64,
    size_bytes: u64,
    entries: &[RecentEntry],
    now: i64,
) -> fmt::Result {
    writeln!(out, "\n=== Weather Cache Status ===\n")?;
    writeln!(out, "Current weather entries: {}", weather_count)?;
    writeln!(out, "Forecast entries: {}", forecast_count)?;
    writeln!(out, "Database size: {:.2} KB", size_bytes as f64 / 1024.0)?;

    writeln!(out, "\n=== Recent Weather Cache Entries ===\n")?;
    if entries.is_empty() {
        writeln!(out, "No entries found in the cache.")?;
    }
    for entry in entries {
        let status = if entry.is_valid_at(now) {
            "Valid"
        } else {
            "Expired"
        };
        writeln!(out, "City: {}", entry.city)?;
        writeln!(out, "  Cached at: {}", local_time(entry.written_at))?;
        writeln!(out, "  Expires at: {}", local_time(entry.expires_at()))?;
        writeln!(out, "  Status: {}", status)?;
        writeln!(out)?;
    }
    Ok(())
}

/// Clears both tables and returns the summary line for the `clear` command.
pub fn clear_and_report(store: &CacheStore) -> Result<String> {
    let (weather, forecast) = store.clear_all()?;
    Ok(format!(
        "Cache cleared: {} weather entries and {} forecast entries deleted.",
        weather, forecast
    ))
}
