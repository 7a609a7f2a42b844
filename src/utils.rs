//! Utility functions for the pv_forecast crate

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Duration, Utc};

/// Create future timestamps for forecasting
pub fn future_timestamps(
    last_timestamp: DateTime<Utc>,
    horizon: usize,
    frequency: &str,
) -> Result<Vec<DateTime<Utc>>> {
    let duration = match frequency {
        "hourly" | "h" | "1h" => Duration::hours(1),
        "daily" | "d" | "1d" => Duration::days(1),
        "minute" | "min" | "1min" => Duration::minutes(1),
        _ => {
            return Err(ForecastError::InvalidSpec(format!(
                "unsupported frequency: {}",
                frequency
            )))
        }
    };

    let mut timestamps = Vec::with_capacity(horizon);
    let mut current = last_timestamp;
    for _ in 0..horizon {
        current = current + duration;
        timestamps.push(current);
    }

    Ok(timestamps)
}
