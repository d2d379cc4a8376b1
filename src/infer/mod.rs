//! Column type inference and value normalization

mod boolean;
mod column;
pub mod dates;
mod unify;

pub use boolean::normalize_booleans;
pub use column::{build_column, Window};
pub use dates::{datetime_to_serial, normalize_dates, serial_to_datetime, EpochMode};
pub use unify::dominant_tag;
