//! Time series data handling for the forecasting pipeline

use crate::error::{ForecastError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

/// Time column name used by the in-memory constructors.
pub const DEFAULT_TIME_COLUMN: &str = "timestamp";

/// Timestamp-indexed table of named numeric columns.
///
/// Backed by a polars `DataFrame` whose time column holds epoch milliseconds.
/// Timestamps are validated to be unique and strictly increasing on every
/// construction path, so downstream lag arithmetic can rely on row order
/// being time order.
#[derive(Debug, Clone)]
pub struct TimeSeriesData {
    df: DataFrame,
    time_column: String,
}

impl TimeSeriesData {
    /// Create a time series from timestamps and named f64 columns.
    pub fn new(timestamps: Vec<DateTime<Utc>>, columns: Vec<(&str, Vec<f64>)>) -> Result<Self> {
        let n_rows = timestamps.len();
        let millis: Vec<i64> = timestamps.iter().map(|t| t.timestamp_millis()).collect();

        let mut series = Vec::with_capacity(columns.len() + 1);
        series.push(Series::new(DEFAULT_TIME_COLUMN, millis));

        for (name, values) in columns {
            if values.len() != n_rows {
                return Err(ForecastError::ColumnMismatch(format!(
                    "column '{}' has {} rows, expected {}",
                    name,
                    values.len(),
                    n_rows
                )));
            }
            series.push(Series::new(name, values));
        }

        let df = DataFrame::new(series)?;
        Self::from_dataframe(df, DEFAULT_TIME_COLUMN)
    }

    /// Wrap an existing DataFrame, normalizing the time column to epoch
    /// milliseconds and validating the timestamp invariant.
    pub fn from_dataframe(df: DataFrame, time_column: &str) -> Result<Self> {
        let time = df.column(time_column).map_err(|_| {
            ForecastError::ColumnMismatch(format!("time column '{}' not found", time_column))
        })?;

        let millis: Vec<i64> = match time.dtype() {
            DataType::Int64 => time
                .i64()?
                .into_iter()
                .enumerate()
                .map(|(i, v)| {
                    v.ok_or_else(|| {
                        ForecastError::DataError(format!("null timestamp at row {}", i))
                    })
                })
                .collect::<Result<_>>()?,
            DataType::Utf8 => time
                .utf8()?
                .into_iter()
                .enumerate()
                .map(|(i, v)| {
                    let raw = v.ok_or_else(|| {
                        ForecastError::DataError(format!("null timestamp at row {}", i))
                    })?;
                    parse_timestamp_millis(raw)
                })
                .collect::<Result<_>>()?,
            DataType::Datetime(unit, _) => {
                let divisor = match unit {
                    TimeUnit::Nanoseconds => 1_000_000,
                    TimeUnit::Microseconds => 1_000,
                    TimeUnit::Milliseconds => 1,
                };
                time.datetime()?
                    .into_iter()
                    .enumerate()
                    .map(|(i, v)| {
                        let raw = v.ok_or_else(|| {
                            ForecastError::DataError(format!("null timestamp at row {}", i))
                        })?;
                        Ok(raw / divisor)
                    })
                    .collect::<Result<_>>()?
            }
            other => {
                return Err(ForecastError::DataError(format!(
                    "time column '{}' has unsupported dtype {:?}",
                    time_column, other
                )))
            }
        };

        for (i, pair) in millis.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(ForecastError::DataError(format!(
                    "timestamps must be unique and strictly increasing: row {} ({}) does not advance past row {} ({})",
                    i + 1,
                    pair[1],
                    i,
                    pair[0]
                )));
            }
        }

        let mut df = df;
        df.with_column(Series::new(time_column, millis))?;

        Ok(Self {
            df,
            time_column: time_column.to_string(),
        })
    }

    /// Load a time series from a CSV file with a header row.
    pub fn from_csv<P: AsRef<Path>>(path: P, time_column: &str) -> Result<Self> {
        let file = File::open(path)?;
        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        Self::from_dataframe(df, time_column)
    }

    /// Get the underlying DataFrame
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    /// Get the time column name
    pub fn time_column(&self) -> &str {
        &self.time_column
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.df.height()
    }

    /// Whether the series has no rows
    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// All column names, time column included, in frame order
    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Whether a column with the given name exists
    pub fn has_column(&self, name: &str) -> bool {
        self.df.column(name).is_ok()
    }

    /// Get the timestamps as UTC datetimes
    pub fn timestamps(&self) -> Result<Vec<DateTime<Utc>>> {
        let millis = self.df.column(&self.time_column)?.i64()?;
        millis
            .into_iter()
            .enumerate()
            .map(|(i, v)| {
                let ms = v.ok_or_else(|| {
                    ForecastError::DataError(format!("null timestamp at row {}", i))
                })?;
                Utc.timestamp_millis_opt(ms).single().ok_or_else(|| {
                    ForecastError::DataError(format!("invalid timestamp {} at row {}", ms, i))
                })
            })
            .collect()
    }

    /// Extract a numeric column as f64 values
    pub fn column(&self, name: &str) -> Result<Vec<f64>> {
        let col = self.df.column(name).map_err(|_| {
            ForecastError::ColumnMismatch(format!("column '{}' not found", name))
        })?;

        let values: Vec<Option<f64>> = match col.dtype() {
            DataType::Float64 => col.f64()?.into_iter().collect(),
            DataType::Float32 => col.f32()?.into_iter().map(|v| v.map(f64::from)).collect(),
            DataType::Int64 => col.i64()?.into_iter().map(|v| v.map(|v| v as f64)).collect(),
            DataType::Int32 => col.i32()?.into_iter().map(|v| v.map(f64::from)).collect(),
            other => {
                return Err(ForecastError::DataError(format!(
                    "column '{}' has non-numeric dtype {:?}",
                    name, other
                )))
            }
        };

        values
            .into_iter()
            .enumerate()
            .map(|(i, v)| {
                v.ok_or_else(|| {
                    ForecastError::DataError(format!("null value in column '{}' at row {}", name, i))
                })
            })
            .collect()
    }

    /// Append a full-length f64 column, replacing any column of the same name
    pub fn add_column(&mut self, name: &str, values: Vec<f64>) -> Result<()> {
        if name == self.time_column {
            return Err(ForecastError::InvalidSpec(format!(
                "cannot overwrite time column '{}'",
                name
            )));
        }
        if values.len() != self.df.height() {
            return Err(ForecastError::ColumnMismatch(format!(
                "column '{}' has {} rows, expected {}",
                name,
                values.len(),
                self.df.height()
            )));
        }
        self.df.with_column(Series::new(name, values))?;
        Ok(())
    }

    /// Set every row of a column to the same value, adding the column if absent
    pub fn set_column_scalar(&mut self, name: &str, value: f64) -> Result<()> {
        self.add_column(name, vec![value; self.df.height()])
    }

    /// Remove a column
    pub fn drop_column(&self, name: &str) -> Result<Self> {
        let df = self.df.drop(name).map_err(|_| {
            ForecastError::ColumnMismatch(format!("column '{}' not found", name))
        })?;
        Ok(Self {
            df,
            time_column: self.time_column.clone(),
        })
    }

    /// Rows from `offset` to the end of the series
    pub fn skip_rows(&self, offset: usize) -> Self {
        let length = self.df.height().saturating_sub(offset);
        Self {
            df: self.df.slice(offset as i64, length),
            time_column: self.time_column.clone(),
        }
    }

    /// The last `n` rows (all rows when `n >= len`)
    pub fn tail(&self, n: usize) -> Self {
        Self {
            df: self.df.tail(Some(n)),
            time_column: self.time_column.clone(),
        }
    }

    /// A single row as an owned one-row series
    pub fn row(&self, index: usize) -> Result<Self> {
        if index >= self.df.height() {
            return Err(ForecastError::DataError(format!(
                "row index {} out of bounds for {} rows",
                index,
                self.df.height()
            )));
        }
        Ok(Self {
            df: self.df.slice(index as i64, 1),
            time_column: self.time_column.clone(),
        })
    }

    /// Stack another series below this one, aligning its columns to this
    /// frame's layout. Returns a new value; neither input is mutated.
    pub fn append(&self, other: &Self) -> Result<Self> {
        let names = self.df.get_column_names();
        let aligned = other.df.select(names).map_err(|e| {
            ForecastError::ColumnMismatch(format!("cannot align appended rows: {}", e))
        })?;
        let stacked = self.df.vstack(&aligned)?;
        Self::from_dataframe(stacked, &self.time_column)
    }
}

fn parse_timestamp_millis(raw: &str) -> Result<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc).timestamp_millis());
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(Utc.from_utc_datetime(&ndt).timestamp_millis());
        }
    }
    if let Ok(nd) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(ndt) = nd.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&ndt).timestamp_millis());
        }
    }
    Err(ForecastError::DataError(format!(
        "cannot parse timestamp '{}'",
        raw
    )))
}
