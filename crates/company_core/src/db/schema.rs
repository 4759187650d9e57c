//! Table definitions for the department/employee pair.
//!
//! `employees.department_id` references `departments.id`; create departments
//! first and drop employees first when managing both.

use super::DbResult;
use rusqlite::Connection;

pub const DEPARTMENTS_TABLE: &str = "departments";
pub const EMPLOYEES_TABLE: &str = "employees";

pub(crate) const CREATE_DEPARTMENTS_SQL: &str = "CREATE TABLE IF NOT EXISTS departments (
    id INTEGER PRIMARY KEY,
    name TEXT UNIQUE,
    location TEXT
);";

pub(crate) const DROP_DEPARTMENTS_SQL: &str = "DROP TABLE IF EXISTS departments;";

pub(crate) const CREATE_EMPLOYEES_SQL: &str = "CREATE TABLE IF NOT EXISTS employees (
    id INTEGER PRIMARY KEY,
    name TEXT,
    job_title TEXT,
    department_id INTEGER,
    FOREIGN KEY (department_id) REFERENCES departments(id)
);";

pub(crate) const DROP_EMPLOYEES_SQL: &str = "DROP TABLE IF EXISTS employees;";

/// Returns whether `table` is present in the schema catalog.
pub fn table_exists(conn: &Connection, table: &str) -> DbResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

/// Returns the number of rows currently stored in `table`.
///
/// `table` must be one of the known table names; it is interpolated into SQL.
pub fn row_count(conn: &Connection, table: &'static str) -> DbResult<i64> {
    let count = conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })?;
    Ok(count)
}
