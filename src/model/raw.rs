//! Raw cells as handed over by the workbook decoder

use std::borrow::Cow;

use super::schema::LowLevelTypeTag;
use super::table::CellValue;

/// Undecoded cell value
///
/// Booleans arrive as `Number(1.0)` / `Number(0.0)` and dates as their serial
/// number; the tag on the owning [`RawCell`] says how to read them.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum RawValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    /// BIFF error code
    Error(u8),
}

impl RawValue {
    /// True for an empty cell or an empty string
    pub fn is_blank(&self) -> bool {
        match self {
            RawValue::Empty => true,
            RawValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Truthiness of the raw value
    pub fn truthy(&self) -> bool {
        match self {
            RawValue::Empty => false,
            RawValue::Text(s) => !s.is_empty(),
            // NaN != 0.0, so NaN is truthy
            RawValue::Number(n) => *n != 0.0,
            RawValue::Error(code) => *code != 0,
        }
    }

    /// Render as text, as used for header names
    pub fn to_text(&self) -> String {
        match self {
            RawValue::Empty => String::new(),
            RawValue::Text(s) => s.clone(),
            RawValue::Number(n) => number_to_text(*n),
            RawValue::Error(code) => error_text(*code),
        }
    }

    /// Loosely typed scalar, before any column type is applied
    pub fn to_cell_value(&self) -> CellValue {
        match self {
            RawValue::Empty => CellValue::Null,
            RawValue::Text(s) if s.is_empty() => CellValue::Null,
            RawValue::Text(s) => CellValue::String(Cow::Owned(s.clone())),
            RawValue::Number(n) => CellValue::Number(*n),
            RawValue::Error(code) => CellValue::String(Cow::Owned(error_text(*code))),
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

/// A decoded cell: raw value plus the decoder's type tag
#[derive(Debug, Clone, PartialEq)]
pub struct RawCell {
    pub value: RawValue,
    pub tag: LowLevelTypeTag,
}

impl RawCell {
    pub fn new(value: impl Into<RawValue>, tag: LowLevelTypeTag) -> Self {
        Self {
            value: value.into(),
            tag,
        }
    }

    pub fn empty() -> Self {
        Self {
            value: RawValue::Empty,
            tag: LowLevelTypeTag::Empty,
        }
    }

    pub fn text(s: &str) -> Self {
        Self::new(s, LowLevelTypeTag::Text)
    }

    pub fn number(n: f64) -> Self {
        Self::new(n, LowLevelTypeTag::Number)
    }

    pub fn boolean(b: bool) -> Self {
        Self::new(if b { 1.0 } else { 0.0 }, LowLevelTypeTag::Boolean)
    }

    pub fn date(serial: f64) -> Self {
        Self::new(serial, LowLevelTypeTag::Date)
    }

    pub fn error(code: u8) -> Self {
        Self::new(RawValue::Error(code), LowLevelTypeTag::Error)
    }
}

impl Default for RawCell {
    fn default() -> Self {
        Self::empty()
    }
}

/// Render a number as float text; integral values keep one decimal (`2019.0`)
pub fn number_to_text(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e16 {
        format!("{:.1}", n)
    } else {
        n.to_string()
    }
}

/// Display text for a BIFF error code
pub fn error_text(code: u8) -> String {
    match code {
        0x00 => "#NULL!".to_string(),
        0x07 => "#DIV/0!".to_string(),
        0x0F => "#VALUE!".to_string(),
        0x17 => "#REF!".to_string(),
        0x1D => "#NAME?".to_string(),
        0x24 => "#NUM!".to_string(),
        0x2A => "#N/A".to_string(),
        0x2B => "#GETTING_DATA".to_string(),
        other => format!("#ERR{}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(!RawValue::Empty.truthy());
        assert!(!RawValue::from("").truthy());
        assert!(RawValue::from("x").truthy());
        assert!(!RawValue::Number(0.0).truthy());
        assert!(RawValue::Number(-2.5).truthy());
        assert!(RawValue::Number(f64::NAN).truthy());
        assert!(RawValue::Error(0x07).truthy());
    }

    #[test]
    fn test_number_to_text() {
        assert_eq!(number_to_text(2019.0), "2019.0");
        assert_eq!(number_to_text(-3.0), "-3.0");
        assert_eq!(number_to_text(0.0), "0.0");
        assert_eq!(number_to_text(3.5), "3.5");
        assert_eq!(number_to_text(0.1), "0.1");
    }

    #[test]
    fn test_error_cells_render_as_excel_text() {
        assert_eq!(RawValue::Error(0x07).to_text(), "#DIV/0!");
        assert_eq!(RawValue::Error(0x2A).to_text(), "#N/A");
        assert_eq!(RawValue::Error(99).to_text(), "#ERR99");
    }

    #[test]
    fn test_to_cell_value() {
        assert_eq!(RawValue::Empty.to_cell_value(), CellValue::Null);
        assert_eq!(RawValue::from("").to_cell_value(), CellValue::Null);
        assert_eq!(RawValue::from("a").to_cell_value(), CellValue::from("a"));
        assert_eq!(RawValue::Number(4.0).to_cell_value(), CellValue::Number(4.0));
    }
}
