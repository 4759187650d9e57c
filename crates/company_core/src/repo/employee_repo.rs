//! Employee repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Map `employees` rows to `Employee` records and back.
//! - Provide lookups by id, name and department.
//!
//! # Invariants
//! - Every fetched row yields a new `Employee` value; there is no identity
//!   map for employees.
//! - Update/delete never issue SQL for a record without an id.

use crate::db::schema::{CREATE_EMPLOYEES_SQL, DROP_EMPLOYEES_SQL};
use crate::model::department::{DepartmentId, DepartmentRef};
use crate::model::employee::{Employee, EmployeeId};
use crate::repo::department_repo::DepartmentRepository;
use crate::repo::{required_text, RepoError, RepoResult, WriteOutcome};
use log::debug;
use rusqlite::{params, Connection, Params, Row};

const EMPLOYEE_SELECT_SQL: &str = "SELECT
    id,
    name,
    job_title,
    department_id
FROM employees";

/// Repository interface for employee CRUD and lookups.
pub trait EmployeeRepository {
    /// Creates the `employees` table if it does not exist.
    fn create_table(&self) -> RepoResult<()>;
    /// Drops the `employees` table if it exists.
    fn drop_table(&self) -> RepoResult<()>;
    /// Inserts `employee` and stores the generated id on it.
    ///
    /// The caller is responsible for passing an unsaved record.
    fn insert(&self, employee: &mut Employee) -> RepoResult<EmployeeId>;
    /// Rewrites name, job title and department of the row with `employee.id`.
    fn update(&self, employee: &Employee) -> RepoResult<WriteOutcome>;
    /// Deletes the row with `employee.id` and clears the id.
    fn delete(&self, employee: &mut Employee) -> RepoResult<WriteOutcome>;
    fn find_by_id(&self, id: EmployeeId) -> RepoResult<Option<Employee>>;
    /// Returns the first employee with exactly this name.
    fn find_by_name(&self, name: &str) -> RepoResult<Option<Employee>>;
    fn find_by_department(&self, department_id: DepartmentId) -> RepoResult<Vec<Employee>>;
    fn get_all(&self) -> RepoResult<Vec<Employee>>;

    /// Builds and inserts a new employee in one call.
    fn create(
        &self,
        name: &str,
        job_title: &str,
        department_id: DepartmentId,
    ) -> RepoResult<Employee> {
        let mut employee = Employee::new(name, job_title, department_id);
        self.insert(&mut employee)?;
        Ok(employee)
    }

    /// Resolves the employee's department through `departments`.
    ///
    /// Returns `None` when no department has `employee.department_id`.
    fn get_department(
        &self,
        employee: &Employee,
        departments: &dyn DepartmentRepository,
    ) -> RepoResult<Option<DepartmentRef>> {
        departments.find_by_id(employee.department_id)
    }
}

/// SQLite-backed employee repository.
pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn query_one(&self, sql: &str, params: impl Params) -> RepoResult<Option<Employee>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_employee_row(row)?));
        }

        Ok(None)
    }

    fn query_many(&self, sql: &str, params: impl Params) -> RepoResult<Vec<Employee>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut employees = Vec::new();

        while let Some(row) = rows.next()? {
            employees.push(parse_employee_row(row)?);
        }

        Ok(employees)
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn create_table(&self) -> RepoResult<()> {
        self.conn.execute_batch(CREATE_EMPLOYEES_SQL)?;
        debug!("event=schema_create module=repo status=ok table=employees");
        Ok(())
    }

    fn drop_table(&self) -> RepoResult<()> {
        self.conn.execute_batch(DROP_EMPLOYEES_SQL)?;
        debug!("event=schema_drop module=repo status=ok table=employees");
        Ok(())
    }

    fn insert(&self, employee: &mut Employee) -> RepoResult<EmployeeId> {
        self.conn.execute(
            "INSERT INTO employees (name, job_title, department_id) VALUES (?1, ?2, ?3);",
            params![
                employee.name.as_str(),
                employee.job_title.as_str(),
                employee.department_id,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        employee.id = Some(id);
        debug!(
            "event=employee_insert module=repo status=ok employee_id={id} department_id={}",
            employee.department_id
        );
        Ok(id)
    }

    fn update(&self, employee: &Employee) -> RepoResult<WriteOutcome> {
        let Some(id) = employee.id else {
            return Ok(WriteOutcome::NotPersisted);
        };

        let changed = self.conn.execute(
            "UPDATE employees
             SET
                name = ?1,
                job_title = ?2,
                department_id = ?3
             WHERE id = ?4;",
            params![
                employee.name.as_str(),
                employee.job_title.as_str(),
                employee.department_id,
                id,
            ],
        )?;

        debug!("event=employee_update module=repo status=ok employee_id={id} changed={changed}");
        Ok(WriteOutcome::from_changed(changed))
    }

    fn delete(&self, employee: &mut Employee) -> RepoResult<WriteOutcome> {
        let Some(id) = employee.id else {
            return Ok(WriteOutcome::NotPersisted);
        };

        let changed = self
            .conn
            .execute("DELETE FROM employees WHERE id = ?1;", [id])?;
        employee.id = None;

        debug!("event=employee_delete module=repo status=ok employee_id={id} changed={changed}");
        Ok(WriteOutcome::from_changed(changed))
    }

    fn find_by_id(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        self.query_one(&format!("{EMPLOYEE_SELECT_SQL} WHERE id = ?1;"), [id])
    }

    fn find_by_name(&self, name: &str) -> RepoResult<Option<Employee>> {
        self.query_one(
            &format!("{EMPLOYEE_SELECT_SQL} WHERE name = ?1 ORDER BY id ASC LIMIT 1;"),
            [name],
        )
    }

    fn find_by_department(&self, department_id: DepartmentId) -> RepoResult<Vec<Employee>> {
        self.query_many(
            &format!("{EMPLOYEE_SELECT_SQL} WHERE department_id = ?1 ORDER BY id ASC;"),
            [department_id],
        )
    }

    fn get_all(&self) -> RepoResult<Vec<Employee>> {
        self.query_many(&format!("{EMPLOYEE_SELECT_SQL} ORDER BY id ASC;"), [])
    }
}

fn parse_employee_row(row: &Row<'_>) -> RepoResult<Employee> {
    let department_id = row
        .get::<_, Option<DepartmentId>>("department_id")?
        .ok_or_else(|| {
            RepoError::InvalidData("employees.department_id is NULL".to_string())
        })?;

    Ok(Employee {
        id: Some(row.get("id")?),
        name: required_text(row, "employees", "name")?,
        job_title: required_text(row, "employees", "job_title")?,
        department_id,
    })
}
