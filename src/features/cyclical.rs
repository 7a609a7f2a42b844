//! Cyclical encoding of calendar attributes.
//!
//! Maps periodic integer attributes (hour, weekday, month, day-of-year) onto
//! sine/cosine pairs so that period boundaries (23 -> 0, Dec -> Jan) stay
//! numerically adjacent instead of maximally distant.

use crate::data::TimeSeriesData;
use crate::error::{ForecastError, Result};
use chrono::{DateTime, Datelike, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Calendar attribute derivable from a timestamp index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalendarAttribute {
    /// Hour of day, 0..=23
    Hour,
    /// Day of week, Monday = 0 .. Sunday = 6
    Weekday,
    /// Month, 1..=12
    Month,
    /// Day of year, 1..=365 or 366
    DayOfYear,
}

impl CalendarAttribute {
    /// Column-name stem used for the derived `_sin`/`_cos` pair.
    pub fn name(&self) -> &'static str {
        match self {
            CalendarAttribute::Hour => "hour",
            CalendarAttribute::Weekday => "weekday",
            CalendarAttribute::Month => "month",
            CalendarAttribute::DayOfYear => "dayofyear",
        }
    }

    /// Resolve an attribute from its name.
    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "hour" => Ok(CalendarAttribute::Hour),
            "weekday" => Ok(CalendarAttribute::Weekday),
            "month" => Ok(CalendarAttribute::Month),
            "dayofyear" | "day_of_year" => Ok(CalendarAttribute::DayOfYear),
            other => Err(ForecastError::InvalidSpec(format!(
                "calendar attribute '{}' cannot be derived from the index",
                other
            ))),
        }
    }

    fn extract(&self, ts: &DateTime<Utc>) -> f64 {
        match self {
            CalendarAttribute::Hour => ts.hour() as f64,
            CalendarAttribute::Weekday => ts.weekday().num_days_from_monday() as f64,
            CalendarAttribute::Month => ts.month() as f64,
            CalendarAttribute::DayOfYear => ts.ordinal() as f64,
        }
    }
}

/// Period length of a cyclical attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CyclePeriod {
    /// Constant period length
    Fixed(u32),
    /// 366 for rows in a leap year, 365 otherwise
    LeapAware,
}

impl CyclePeriod {
    fn denominator(&self, ts: &DateTime<Utc>) -> f64 {
        match self {
            CyclePeriod::Fixed(p) => *p as f64,
            CyclePeriod::LeapAware => {
                if ts.date_naive().leap_year() {
                    366.0
                } else {
                    365.0
                }
            }
        }
    }
}

/// Mapping from calendar attributes to their cycle periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CyclicalSpec {
    encodings: Vec<(CalendarAttribute, CyclePeriod)>,
}

impl Default for CyclicalSpec {
    /// Hour over 24, weekday over 7, month over 12, day-of-year leap-aware.
    fn default() -> Self {
        Self {
            encodings: vec![
                (CalendarAttribute::Hour, CyclePeriod::Fixed(24)),
                (CalendarAttribute::Weekday, CyclePeriod::Fixed(7)),
                (CalendarAttribute::Month, CyclePeriod::Fixed(12)),
                (CalendarAttribute::DayOfYear, CyclePeriod::LeapAware),
            ],
        }
    }
}

impl CyclicalSpec {
    /// Create a spec from explicit (attribute, period) pairs.
    pub fn new(encodings: Vec<(CalendarAttribute, CyclePeriod)>) -> Result<Self> {
        for (attr, period) in &encodings {
            if let CyclePeriod::Fixed(0) = period {
                return Err(ForecastError::InvalidSpec(format!(
                    "cycle period for '{}' must be positive",
                    attr.name()
                )));
            }
        }
        Ok(Self { encodings })
    }

    /// The configured (attribute, period) pairs in encoding order.
    pub fn encodings(&self) -> &[(CalendarAttribute, CyclePeriod)] {
        &self.encodings
    }

    /// Return a copy of `data` augmented with `<attr>_sin` and `<attr>_cos`
    /// columns for each configured pair. Pure transform; no fitted state.
    pub fn encode(&self, data: &TimeSeriesData) -> Result<TimeSeriesData> {
        let timestamps = data.timestamps()?;
        let mut out = data.clone();

        for (attr, period) in &self.encodings {
            let mut sin_values = Vec::with_capacity(timestamps.len());
            let mut cos_values = Vec::with_capacity(timestamps.len());

            for ts in &timestamps {
                let value = attr.extract(ts);
                let angle = 2.0 * PI * value / period.denominator(ts);
                sin_values.push(angle.sin());
                cos_values.push(angle.cos());
            }

            out.add_column(&format!("{}_sin", attr.name()), sin_values)?;
            out.add_column(&format!("{}_cos", attr.name()), cos_values)?;
        }

        Ok(out)
    }
}
