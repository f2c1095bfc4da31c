//! # Schema Canonicalizer
//!
//! Turns the raw catalog rows produced by a dialect adapter into the
//! deterministic, `CREATE TABLE`-style text block that grounds query
//! generation. Pure and I/O-free: the same logical input always renders to
//! byte-identical output.

use crate::types::{ColumnMetadata, ConstraintKind};
use std::collections::HashMap;

/// Renders a sequence of catalog rows as canonical schema text.
///
/// The catalog join fans out when a column participates in multiple
/// constraints, so duplicate (table, column) rows are expected. Dedup keeps
/// the first-seen row, except that a row carrying a constraint always wins
/// over one without, so the result does not depend on duplicate ordering.
/// Tables keep first-seen order; columns keep the order received, which is
/// ordinal from the adapter.
pub fn canonical_schema(columns: &[ColumnMetadata]) -> String {
    let deduped = dedup_columns(columns);

    let mut table_order: Vec<String> = Vec::new();
    let mut grouped: HashMap<String, Vec<&ColumnMetadata>> = HashMap::new();
    for column in &deduped {
        if !grouped.contains_key(&column.table) {
            table_order.push(column.table.clone());
        }
        grouped.entry(column.table.clone()).or_default().push(column);
    }

    table_order
        .iter()
        .map(|table| {
            let definitions: Vec<String> = grouped[table]
                .iter()
                .map(|column| render_column(column))
                .collect();
            format!(
                "CREATE TABLE {} (\n  {}\n);",
                table,
                definitions.join(",\n  ")
            )
        })
        .collect::<Vec<String>>()
        .join("\n\n")
}

/// Collapses duplicate (table, column) rows, keeping the richest one.
/// A row with a constraint is richer than a row without; between two
/// constrained rows the first-seen wins.
fn dedup_columns(columns: &[ColumnMetadata]) -> Vec<ColumnMetadata> {
    let mut kept: Vec<ColumnMetadata> = Vec::new();
    let mut index: HashMap<(String, String), usize> = HashMap::new();

    for column in columns {
        let key = (column.table.clone(), column.column.clone());
        match index.get(&key) {
            Some(&position) => {
                if kept[position].constraint.is_none() && column.constraint.is_some() {
                    kept[position] = column.clone();
                }
            }
            None => {
                index.insert(key, kept.len());
                kept.push(column.clone());
            }
        }
    }

    kept
}

/// Renders one column definition. The attribute order is fixed:
/// `name type[(length)][ NOT NULL][ PRIMARY KEY | REFERENCES t(c)][ DEFAULT expr]`.
fn render_column(column: &ColumnMetadata) -> String {
    let mut definition = format!("{} {}", column.column, column.data_type);

    if let Some(length) = column.max_length {
        definition.push_str(&format!("({length})"));
    }
    if !column.nullable {
        definition.push_str(" NOT NULL");
    }
    match column.constraint {
        Some(ConstraintKind::PrimaryKey) => definition.push_str(" PRIMARY KEY"),
        Some(ConstraintKind::ForeignKey) => {
            if let (Some(foreign_table), Some(foreign_column)) =
                (&column.foreign_table, &column.foreign_column)
            {
                definition.push_str(&format!(" REFERENCES {foreign_table}({foreign_column})"));
            }
        }
        None => {}
    }
    if let Some(default) = &column.default {
        definition.push_str(&format!(" DEFAULT {default}"));
    }

    definition
}
