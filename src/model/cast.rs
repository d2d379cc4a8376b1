//! Conversion of cell values to a column type

use std::borrow::Cow;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::error::CastError;

use super::schema::SemanticType;
use super::table::CellValue;

const TRUE_VALUES: &[&str] = &["yes", "y", "true", "t", "1"];
const FALSE_VALUES: &[&str] = &["no", "n", "false", "f", "0"];

const MILLIS_PER_DAY: f64 = 86_400_000.0;

impl SemanticType {
    /// Convert a value to this type; null always stays null
    pub fn cast(self, value: CellValue) -> Result<CellValue, CastError> {
        if value.is_null() || value.conforms_to(self) {
            return Ok(value);
        }

        match self {
            SemanticType::Text => Ok(CellValue::String(Cow::Owned(to_text(&value)))),
            SemanticType::Number => cast_number(value),
            SemanticType::Boolean => cast_boolean(value),
            SemanticType::Date => cast_date(value),
            SemanticType::Time => cast_time(value),
            SemanticType::DateTime => cast_datetime(value),
            SemanticType::TimeDelta => cast_timedelta(value),
        }
    }
}

fn to_text(value: &CellValue) -> String {
    match value {
        CellValue::Date(d) => d.format("%Y-%m-%d").to_string(),
        CellValue::Time(t) => t.format("%H:%M:%S").to_string(),
        CellValue::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        other => other.display().into_owned(),
    }
}

fn fail(value: &CellValue, target: SemanticType) -> CastError {
    CastError::new(value.display(), target)
}

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn cast_number(value: CellValue) -> Result<CellValue, CastError> {
    match &value {
        CellValue::Bool(b) => Ok(CellValue::Number(if *b { 1.0 } else { 0.0 })),
        CellValue::String(s) if blank(s) => Ok(CellValue::Null),
        CellValue::String(s) => s
            .trim()
            .parse::<f64>()
            .map(CellValue::Number)
            .map_err(|_| fail(&value, SemanticType::Number)),
        _ => Err(fail(&value, SemanticType::Number)),
    }
}

fn cast_boolean(value: CellValue) -> Result<CellValue, CastError> {
    match &value {
        CellValue::Number(n) if *n == 1.0 => Ok(CellValue::Bool(true)),
        CellValue::Number(n) if *n == 0.0 => Ok(CellValue::Bool(false)),
        CellValue::String(s) if blank(s) => Ok(CellValue::Null),
        CellValue::String(s) => {
            let lowered = s.trim().to_lowercase();
            if TRUE_VALUES.contains(&lowered.as_str()) {
                Ok(CellValue::Bool(true))
            } else if FALSE_VALUES.contains(&lowered.as_str()) {
                Ok(CellValue::Bool(false))
            } else {
                Err(fail(&value, SemanticType::Boolean))
            }
        }
        _ => Err(fail(&value, SemanticType::Boolean)),
    }
}

fn cast_date(value: CellValue) -> Result<CellValue, CastError> {
    match &value {
        CellValue::DateTime(dt) if dt.time() == NaiveTime::MIN => Ok(CellValue::Date(dt.date())),
        CellValue::String(s) if blank(s) => Ok(CellValue::Null),
        CellValue::String(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(CellValue::Date)
            .map_err(|_| fail(&value, SemanticType::Date)),
        _ => Err(fail(&value, SemanticType::Date)),
    }
}

fn cast_time(value: CellValue) -> Result<CellValue, CastError> {
    match &value {
        CellValue::DateTime(dt) => Ok(CellValue::Time(dt.time())),
        CellValue::String(s) if blank(s) => Ok(CellValue::Null),
        CellValue::String(s) => {
            let s = s.trim();
            NaiveTime::parse_from_str(s, "%H:%M:%S")
                .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
                .map(CellValue::Time)
                .map_err(|_| fail(&value, SemanticType::Time))
        }
        _ => Err(fail(&value, SemanticType::Time)),
    }
}

fn cast_datetime(value: CellValue) -> Result<CellValue, CastError> {
    match &value {
        CellValue::Date(d) => Ok(CellValue::DateTime(d.and_time(NaiveTime::MIN))),
        CellValue::String(s) if blank(s) => Ok(CellValue::Null),
        CellValue::String(s) => {
            let s = s.trim();
            NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
                .or_else(|_| {
                    NaiveDate::parse_from_str(s, "%Y-%m-%d").map(|d| d.and_time(NaiveTime::MIN))
                })
                .map(CellValue::DateTime)
                .map_err(|_| fail(&value, SemanticType::DateTime))
        }
        _ => Err(fail(&value, SemanticType::DateTime)),
    }
}

fn cast_timedelta(value: CellValue) -> Result<CellValue, CastError> {
    match &value {
        CellValue::Time(t) => Ok(CellValue::TimeDelta(since_midnight(*t))),
        CellValue::Number(days) if days.is_finite() => Ok(CellValue::TimeDelta(
            Duration::milliseconds((days * MILLIS_PER_DAY).round() as i64),
        )),
        CellValue::String(s) if blank(s) => Ok(CellValue::Null),
        CellValue::String(s) => NaiveTime::parse_from_str(s.trim(), "%H:%M:%S")
            .map(|t| CellValue::TimeDelta(since_midnight(t)))
            .map_err(|_| fail(&value, SemanticType::TimeDelta)),
        _ => Err(fail(&value, SemanticType::TimeDelta)),
    }
}

fn since_midnight(t: NaiveTime) -> Duration {
    Duration::seconds(t.num_seconds_from_midnight() as i64)
        + Duration::nanoseconds(t.nanosecond() as i64)
}
