//! Feature engineering for timestamp-indexed series: cyclical calendar
//! encodings and autoregressive lag features.

pub mod cyclical;
pub mod lag;

pub use cyclical::{CalendarAttribute, CyclePeriod, CyclicalSpec};
pub use lag::LagSpec;
