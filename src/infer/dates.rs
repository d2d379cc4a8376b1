//! Date serial decoding and date/time column normalization
//!
//! Workbooks store dates as a floating-point count of days since an epoch,
//! with the time of day in the fractional part. Two epochs exist:
//!
//! - **1900 system**: serial 0 is 1899-12-30, so serial 1 is 1899-12-31.
//!   Excel itself counts a fictitious 1900-02-29, which makes serials below
//!   61 read one day earlier here than Excel displays them.
//! - **1904 system**: serial 0 is 1904-01-01.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::DateConversionError;
use crate::model::{error_text, CellValue, RawValue, SemanticType};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Largest whole-day count that still lands before year 10000
const MAX_SERIAL_DAYS: f64 = 2_958_466.0;

/// Workbook-wide date epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EpochMode {
    #[default]
    Epoch1900,
    Epoch1904,
}

impl EpochMode {
    /// Calendar date of serial 0
    pub fn base_date(self) -> NaiveDate {
        let (y, m, d) = match self {
            EpochMode::Epoch1900 => (1899, 12, 30),
            EpochMode::Epoch1904 => (1904, 1, 1),
        };
        NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
    }
}

/// Convert a date serial to a calendar date-time with millisecond precision
pub fn serial_to_datetime(
    serial: f64,
    epoch: EpochMode,
) -> Result<NaiveDateTime, DateConversionError> {
    if !serial.is_finite() {
        return Err(DateConversionError::NotFinite(serial));
    }
    if serial < 0.0 {
        return Err(DateConversionError::Negative(serial));
    }

    let days = serial.trunc();
    if days >= MAX_SERIAL_DAYS {
        return Err(DateConversionError::OutOfRange(serial));
    }
    let millis = ((serial - days) * MILLIS_PER_DAY).round() as i64;

    let datetime = epoch
        .base_date()
        .and_time(NaiveTime::MIN)
        .checked_add_signed(Duration::days(days as i64))
        .and_then(|dt| dt.checked_add_signed(Duration::milliseconds(millis)))
        .ok_or(DateConversionError::OutOfRange(serial))?;

    if datetime.date() > NaiveDate::from_ymd_opt(9999, 12, 31).unwrap_or(NaiveDate::MAX) {
        return Err(DateConversionError::OutOfRange(serial));
    }
    Ok(datetime)
}

/// Inverse of [`serial_to_datetime`]
pub fn datetime_to_serial(datetime: NaiveDateTime, epoch: EpochMode) -> f64 {
    let days = (datetime.date() - epoch.base_date()).num_days();

    let time = datetime.time();
    let millis = time.num_seconds_from_midnight() as f64 * 1000.0
        + (time.nanosecond() / 1_000_000) as f64;
    days as f64 + millis / MILLIS_PER_DAY
}

/// What a single serial actually encodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Granularity {
    DateOnly,
    TimeOnly,
    Full,
}

/// Conversion failure at a position in the column
#[derive(Debug, Clone, PartialEq)]
pub struct DateCellError {
    /// Offset of the failing value within the column window
    pub offset: usize,
    pub error: DateConversionError,
}

/// A normalized date column
#[derive(Debug, Clone, PartialEq)]
pub struct DateColumn {
    pub values: Vec<CellValue>,
    pub semantic_type: SemanticType,
}

/// Normalize a column of date serials and narrow its type
///
/// Every cell is decoded first; the column type depends on which calendar
/// parts appear anywhere in the column, so values are projected only after
/// the scan.
pub fn normalize_dates<'a, I>(values: I, epoch: EpochMode) -> Result<DateColumn, DateCellError>
where
    I: IntoIterator<Item = &'a RawValue>,
{
    let mut cells: Vec<Option<(NaiveDateTime, Granularity)>> = Vec::new();
    let mut with_date = false;
    let mut with_time = false;

    for (offset, value) in values.into_iter().enumerate() {
        let serial = match value {
            RawValue::Empty => None,
            RawValue::Number(n) if *n == 0.0 => None,
            RawValue::Number(n) => Some(*n),
            RawValue::Text(s) if s.is_empty() => None,
            RawValue::Text(s) => {
                return Err(DateCellError {
                    offset,
                    error: DateConversionError::NotASerial(s.clone()),
                })
            }
            RawValue::Error(code) => {
                return Err(DateCellError {
                    offset,
                    error: DateConversionError::NotASerial(error_text(*code)),
                })
            }
        };

        let Some(serial) = serial else {
            cells.push(None);
            continue;
        };

        let datetime = serial_to_datetime(serial, epoch)
            .map_err(|error| DateCellError { offset, error })?;
        // whole seconds only
        let datetime = datetime.with_nanosecond(0).unwrap_or(datetime);

        let granularity = if datetime.time() == NaiveTime::MIN {
            with_date = true;
            Granularity::DateOnly
        } else if serial.trunc() == 0.0 {
            with_time = true;
            Granularity::TimeOnly
        } else {
            with_date = true;
            with_time = true;
            Granularity::Full
        };
        cells.push(Some((datetime, granularity)));
    }

    let semantic_type = if !with_time {
        SemanticType::Date
    } else if !with_date {
        SemanticType::Time
    } else {
        SemanticType::DateTime
    };

    let values = cells
        .into_iter()
        .map(|cell| match cell {
            None => CellValue::Null,
            Some((datetime, _)) => match semantic_type {
                SemanticType::Date => CellValue::Date(datetime.date()),
                SemanticType::Time => CellValue::Time(datetime.time()),
                // date-only cells already sit at midnight and time-only cells
                // on the epoch's base date
                _ => CellValue::DateTime(datetime),
            },
        })
        .collect();

    Ok(DateColumn {
        values,
        semantic_type,
    })
}
