//! Parcel table definition.

use super::DbResult;
use rusqlite::Connection;

/// Table backing the parcel store.
pub const PARCEL_TABLE: &str = "parcel";

/// Columns of `parcel` in positional order. Row decoding relies on it.
pub const PARCEL_COLUMNS: [&str; 5] = ["number", "client", "status", "address", "created_at"];

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Creates the `parcel` table and its client index if missing.
pub fn ensure_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

/// Returns the column names of `table` in declaration order.
///
/// An empty result means the table does not exist.
pub fn table_columns(conn: &Connection, table: &str) -> DbResult<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid;")?;
    let columns = stmt
        .query_map([table], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(columns)
}
