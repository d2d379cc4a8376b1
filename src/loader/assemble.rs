//! Turn normalized columns into a row-major table

use rustc_hash::FxHashSet;

use crate::config::{ColumnTypes, LoadOptions};
use crate::error::{LoadError, LoadResult};
use crate::model::{column_letter, CellValue, Column, ColumnData, SemanticType, Table};

/// Assemble one sheet's table
///
/// `data_start` is the 0-based sheet row of the first value in every column.
pub fn assemble_table(
    columns: Vec<ColumnData>,
    data_start: usize,
    options: &LoadOptions,
) -> LoadResult<Table> {
    let row_count = columns.first().map(|c| c.values.len()).unwrap_or(0);
    debug_assert!(
        columns.iter().all(|c| c.values.len() == row_count),
        "columns must have equal length"
    );

    let names = resolve_names(&columns, options.column_names.as_deref())?;
    let types = resolve_types(&columns, &names, options.column_types.as_ref());

    let mut values: Vec<Vec<CellValue>> = Vec::with_capacity(columns.len());
    let mut schema = Vec::with_capacity(columns.len());
    for (index, ((column, name), ty)) in columns.into_iter().zip(names).zip(types).enumerate() {
        let cast = if ty == column.semantic_type {
            column.values
        } else {
            tracing::debug!(
                column = index,
                from = %column.semantic_type,
                to = %ty,
                "casting column"
            );
            cast_values(column.values, ty, &name, index, data_start)?
        };
        values.push(cast);
        schema.push(Column::new(name, index, ty));
    }

    let mut table = Table::new(schema);
    let mut iters: Vec<_> = values.into_iter().map(Vec::into_iter).collect();
    for i in 0..row_count {
        let cells = iters
            .iter_mut()
            .map(|it| it.next().unwrap_or(CellValue::Null))
            .collect();
        table.add_row(cells, data_start + i + 1);
    }

    Ok(table)
}

/// Final column names: explicit names win, then duplicates get numbered suffixes
fn resolve_names(
    columns: &[ColumnData],
    explicit: Option<&[String]>,
) -> LoadResult<Vec<Option<String>>> {
    let names: Vec<Option<String>> = match explicit {
        Some(names) if names.len() != columns.len() => {
            return Err(LoadError::InvalidArgument(format!(
                "column_names has {} entries but the sheet has {} columns",
                names.len(),
                columns.len()
            )))
        }
        Some(names) => names.iter().cloned().map(Some).collect(),
        None => columns.iter().map(|c| c.name.clone()).collect(),
    };

    let mut seen: FxHashSet<String> = FxHashSet::default();
    Ok(names
        .into_iter()
        .map(|name| {
            let name = name?;
            if seen.insert(name.clone()) {
                return Some(name);
            }
            let unique = (2..)
                .map(|n| format!("{}_{}", name, n))
                .find(|candidate| !seen.contains(candidate))
                .unwrap_or_else(|| name.clone());
            tracing::warn!(original = %name, renamed = %unique, "duplicate column name");
            seen.insert(unique.clone());
            Some(unique)
        })
        .collect())
}

/// Final column types: detected, then caller overrides on top
fn resolve_types(
    columns: &[ColumnData],
    names: &[Option<String>],
    overrides: Option<&ColumnTypes>,
) -> Vec<SemanticType> {
    let detected = columns.iter().map(|c| c.semantic_type);
    match overrides {
        None => detected.collect(),
        Some(ColumnTypes::Uniform(ty)) => vec![*ty; columns.len()],
        Some(ColumnTypes::Named(map)) => {
            for key in map.keys() {
                if !names.iter().any(|n| n.as_deref() == Some(key.as_str())) {
                    tracing::warn!(column = %key, "type override matches no column");
                }
            }
            detected
                .zip(names)
                .map(|(ty, name)| {
                    name.as_deref()
                        .and_then(|n| map.get(n))
                        .copied()
                        .unwrap_or(ty)
                })
                .collect()
        }
    }
}

fn cast_values(
    values: Vec<CellValue>,
    ty: SemanticType,
    name: &Option<String>,
    index: usize,
    data_start: usize,
) -> LoadResult<Vec<CellValue>> {
    values
        .into_iter()
        .enumerate()
        .map(|(offset, value)| {
            ty.cast(value).map_err(|source| LoadError::Cast {
                column: name.clone().unwrap_or_else(|| column_letter(index)),
                row: data_start + offset + 1,
                source,
            })
        })
        .collect()
}
