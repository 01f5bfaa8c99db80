use crate::table::{Table, Value};

/// Marker column added to every uploaded table, zero in every row.
pub const QUERY_COLUMN: &str = "QUERY";

/// Sequential 1-based index column, always first after cleaning.
pub const ROW_NUMBER_COLUMN: &str = "Row Number";

/// Enrich an uploaded table with the two derived columns.
///
/// Appends `QUERY` with value 0 in every row, then puts a 1-based
/// `Row Number` column first; all other columns keep their relative order.
/// The row count never changes, and a zero-row table still gains both
/// columns in its header.
///
/// Cleaning is idempotent: any existing `QUERY` or `Row Number` columns are
/// replaced rather than duplicated, so re-running it on already-cleaned data
/// is safe.
pub fn clean(mut table: Table) -> Table {
    table.remove_column(QUERY_COLUMN);
    table.remove_column(ROW_NUMBER_COLUMN);

    table.columns.push(QUERY_COLUMN.to_string());
    for row in &mut table.rows {
        row.push(Value::Int(0));
    }

    table.columns.insert(0, ROW_NUMBER_COLUMN.to_string());
    for (i, row) in table.rows.iter_mut().enumerate() {
        row.insert(0, Value::Int(i as i64 + 1));
    }

    table
}
