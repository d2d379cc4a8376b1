//! Reduction of a column's cell tags to one dominant tag

use rustc_hash::FxHashSet;

use crate::model::LowLevelTypeTag;

/// Pick the single tag that represents a column
///
/// Empty cells are ignored. A column mixing two or more other tags is
/// treated as text; a column with nothing but empty cells stays `Empty`.
pub fn dominant_tag<I>(tags: I) -> LowLevelTypeTag
where
    I: IntoIterator<Item = LowLevelTypeTag>,
{
    let mut distinct: FxHashSet<LowLevelTypeTag> = tags.into_iter().collect();
    distinct.remove(&LowLevelTypeTag::Empty);

    match distinct.len() {
        0 => LowLevelTypeTag::Empty,
        1 => distinct
            .into_iter()
            .next()
            .unwrap_or(LowLevelTypeTag::Empty),
        _ => LowLevelTypeTag::Text,
    }
}
