use company_core::db::open_db_in_memory;
use company_core::db::schema::{row_count, table_exists, DEPARTMENTS_TABLE, EMPLOYEES_TABLE};
use company_core::{
    DepartmentRepository, EmployeeRepository, SqliteDepartmentRepository,
    SqliteEmployeeRepository,
};
use rusqlite::Connection;

fn setup() -> Connection {
    open_db_in_memory().unwrap()
}

#[test]
fn create_table_is_idempotent() {
    let conn = setup();
    let departments = SqliteDepartmentRepository::new(&conn);
    let employees = SqliteEmployeeRepository::new(&conn);

    departments.create_table().unwrap();
    departments.create_table().unwrap();
    employees.create_table().unwrap();
    employees.create_table().unwrap();

    assert!(table_exists(&conn, DEPARTMENTS_TABLE).unwrap());
    assert!(table_exists(&conn, EMPLOYEES_TABLE).unwrap());
}

#[test]
fn drop_table_is_idempotent() {
    let conn = setup();
    let employees = SqliteEmployeeRepository::new(&conn);

    employees.drop_table().unwrap();
    employees.create_table().unwrap();
    employees.drop_table().unwrap();
    employees.drop_table().unwrap();

    assert!(!table_exists(&conn, EMPLOYEES_TABLE).unwrap());
}

#[test]
fn dropping_employees_keeps_departments() {
    let conn = setup();
    let departments = SqliteDepartmentRepository::new(&conn);
    let employees = SqliteEmployeeRepository::new(&conn);
    departments.create_table().unwrap();
    employees.create_table().unwrap();

    employees.drop_table().unwrap();

    assert!(table_exists(&conn, DEPARTMENTS_TABLE).unwrap());
    assert!(!table_exists(&conn, EMPLOYEES_TABLE).unwrap());
}

#[test]
fn drop_then_create_leaves_an_empty_table() {
    let conn = setup();
    let departments = SqliteDepartmentRepository::new(&conn);
    departments.create_table().unwrap();
    departments.create("Payroll", "Building A").unwrap();
    assert_eq!(row_count(&conn, DEPARTMENTS_TABLE).unwrap(), 1);

    departments.drop_table().unwrap();
    assert!(!table_exists(&conn, DEPARTMENTS_TABLE).unwrap());

    departments.create_table().unwrap();
    assert!(table_exists(&conn, DEPARTMENTS_TABLE).unwrap());
    assert_eq!(row_count(&conn, DEPARTMENTS_TABLE).unwrap(), 0);
}

#[test]
fn employees_table_has_expected_columns() {
    let conn = setup();
    SqliteEmployeeRepository::new(&conn).create_table().unwrap();

    let mut stmt = conn.prepare("PRAGMA table_info(employees);").unwrap();
    let mut rows = stmt.query([]).unwrap();
    let mut columns = Vec::new();
    while let Some(row) = rows.next().unwrap() {
        let column_name: String = row.get(1).unwrap();
        columns.push(column_name);
    }
    assert_eq!(columns, ["id", "name", "job_title", "department_id"]);
}

#[test]
fn queries_against_missing_table_surface_storage_errors() {
    let conn = setup();
    let employees = SqliteEmployeeRepository::new(&conn);

    let err = employees.get_all().unwrap_err();
    assert!(err.to_string().contains("no such table"));
}
