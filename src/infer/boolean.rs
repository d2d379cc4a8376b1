//! Boolean column normalization

use crate::model::{CellValue, RawValue};

/// Convert raw values to tri-state booleans
///
/// Empty cells and empty strings become null, everything else its truthiness.
pub fn normalize_booleans<'a, I>(values: I) -> Vec<CellValue>
where
    I: IntoIterator<Item = &'a RawValue>,
{
    values
        .into_iter()
        .map(|value| {
            if value.is_blank() {
                CellValue::Null
            } else {
                CellValue::Bool(value.truthy())
            }
        })
        .collect()
}
