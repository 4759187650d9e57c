//! Department repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Map `departments` rows to shared `Department` handles and back.
//! - Keep one live handle per persisted id through an injected identity map.
//! - Answer the department -> employees relationship query.
//!
//! # Invariants
//! - Materializing a row whose id is already mapped refreshes `name` and
//!   `location` on the mapped handle and returns that same handle.
//! - Insert of a record that already has an id is an update.
//! - Delete removes the identity-map entry and clears the record id.
//! - Insert and delete fail with `RecordBusy` before touching the table when
//!   the handle is borrowed elsewhere.

use crate::db::schema::{CREATE_DEPARTMENTS_SQL, DROP_DEPARTMENTS_SQL};
use crate::model::department::{Department, DepartmentId, DepartmentRef};
use crate::model::employee::Employee;
use crate::repo::employee_repo::{EmployeeRepository, SqliteEmployeeRepository};
use crate::repo::identity_map::{IdentityMap, SharedIdentityMap};
use crate::repo::{required_text, RepoError, RepoResult, WriteOutcome};
use log::debug;
use rusqlite::{params, Connection, Params, Row};
use std::cell::{Ref, RefMut};
use std::rc::Rc;

const DEPARTMENT_SELECT_SQL: &str = "SELECT
    id,
    name,
    location
FROM departments";

/// Repository interface for department CRUD, lookups and relationships.
pub trait DepartmentRepository {
    /// Creates the `departments` table if it does not exist.
    fn create_table(&self) -> RepoResult<()>;
    /// Drops the `departments` table if it exists.
    fn drop_table(&self) -> RepoResult<()>;
    /// Inserts an unsaved department, or updates it when it already has an id.
    ///
    /// Returns the department id in both cases.
    fn insert(&self, department: &DepartmentRef) -> RepoResult<DepartmentId>;
    fn update(&self, department: &DepartmentRef) -> RepoResult<WriteOutcome>;
    fn delete(&self, department: &DepartmentRef) -> RepoResult<WriteOutcome>;
    fn find_by_id(&self, id: DepartmentId) -> RepoResult<Option<DepartmentRef>>;
    fn find_by_name(&self, name: &str) -> RepoResult<Option<DepartmentRef>>;
    fn get_all(&self) -> RepoResult<Vec<DepartmentRef>>;
    /// Lists employees assigned to `department`.
    ///
    /// An unsaved department has no employees.
    fn employees_of(&self, department: &DepartmentRef) -> RepoResult<Vec<Employee>>;

    /// Builds and inserts a new department in one call.
    fn create(&self, name: &str, location: &str) -> RepoResult<DepartmentRef> {
        let department = Department::new(name, location).into_ref();
        self.insert(&department)?;
        Ok(department)
    }
}

/// SQLite-backed department repository with an identity map.
pub struct SqliteDepartmentRepository<'conn> {
    conn: &'conn Connection,
    identity: SharedIdentityMap<Department>,
}

impl<'conn> SqliteDepartmentRepository<'conn> {
    /// Creates a repository with its own empty identity map.
    pub fn new(conn: &'conn Connection) -> Self {
        Self::with_identity_map(conn, IdentityMap::shared())
    }

    /// Creates a repository that shares `identity` with other holders.
    pub fn with_identity_map(
        conn: &'conn Connection,
        identity: SharedIdentityMap<Department>,
    ) -> Self {
        Self { conn, identity }
    }

    /// Returns the identity map used by this repository.
    pub fn identity_map(&self) -> SharedIdentityMap<Department> {
        Rc::clone(&self.identity)
    }

    fn query_one(&self, sql: &str, params: impl Params) -> RepoResult<Option<DepartmentRef>> {
        let row = {
            let mut stmt = self.conn.prepare(sql)?;
            let mut rows = stmt.query(params)?;
            match rows.next()? {
                Some(row) => Some(parse_department_row(row)?),
                None => None,
            }
        };

        row.map(|row| self.materialize(row)).transpose()
    }

    fn query_many(&self, sql: &str, params: impl Params) -> RepoResult<Vec<DepartmentRef>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut departments = Vec::new();

        while let Some(row) = rows.next()? {
            departments.push(self.materialize(parse_department_row(row)?)?);
        }

        Ok(departments)
    }

    fn materialize(&self, row: DepartmentRow) -> RepoResult<DepartmentRef> {
        let cached = self.identity.borrow().get(row.id);
        if let Some(handle) = cached {
            {
                let mut department = write(&handle)?;
                department.name = row.name;
                department.location = row.location;
            }
            return Ok(handle);
        }

        let handle = Department {
            id: Some(row.id),
            name: row.name,
            location: row.location,
        }
        .into_ref();
        self.identity.borrow_mut().put(row.id, Rc::clone(&handle));
        Ok(handle)
    }

    fn update_row(&self, record: &Department) -> RepoResult<WriteOutcome> {
        let Some(id) = record.id else {
            return Ok(WriteOutcome::NotPersisted);
        };

        let changed = self.conn.execute(
            "UPDATE departments
             SET
                name = ?1,
                location = ?2
             WHERE id = ?3;",
            params![record.name.as_str(), record.location.as_str(), id],
        )?;

        debug!(
            "event=department_update module=repo status=ok department_id={id} changed={changed}"
        );
        Ok(WriteOutcome::from_changed(changed))
    }
}

impl DepartmentRepository for SqliteDepartmentRepository<'_> {
    fn create_table(&self) -> RepoResult<()> {
        self.conn.execute_batch(CREATE_DEPARTMENTS_SQL)?;
        debug!("event=schema_create module=repo status=ok table=departments");
        Ok(())
    }

    fn drop_table(&self) -> RepoResult<()> {
        self.conn.execute_batch(DROP_DEPARTMENTS_SQL)?;
        debug!("event=schema_drop module=repo status=ok table=departments");
        Ok(())
    }

    fn insert(&self, department: &DepartmentRef) -> RepoResult<DepartmentId> {
        let mut record = write(department)?;
        if let Some(id) = record.id {
            self.update_row(&record)?;
            return Ok(id);
        }

        self.conn.execute(
            "INSERT INTO departments (name, location) VALUES (?1, ?2);",
            params![record.name.as_str(), record.location.as_str()],
        )?;

        let id = self.conn.last_insert_rowid();
        record.id = Some(id);
        drop(record);
        self.identity.borrow_mut().put(id, Rc::clone(department));

        debug!("event=department_insert module=repo status=ok department_id={id}");
        Ok(id)
    }

    fn update(&self, department: &DepartmentRef) -> RepoResult<WriteOutcome> {
        let record = read(department)?;
        self.update_row(&record)
    }

    fn delete(&self, department: &DepartmentRef) -> RepoResult<WriteOutcome> {
        let mut record = write(department)?;
        let Some(id) = record.id else {
            return Ok(WriteOutcome::NotPersisted);
        };

        let changed = self
            .conn
            .execute("DELETE FROM departments WHERE id = ?1;", [id])?;
        self.identity.borrow_mut().remove(id);
        record.id = None;
        drop(record);

        debug!(
            "event=department_delete module=repo status=ok department_id={id} changed={changed}"
        );
        Ok(WriteOutcome::from_changed(changed))
    }

    fn find_by_id(&self, id: DepartmentId) -> RepoResult<Option<DepartmentRef>> {
        self.query_one(&format!("{DEPARTMENT_SELECT_SQL} WHERE id = ?1;"), [id])
    }

    fn find_by_name(&self, name: &str) -> RepoResult<Option<DepartmentRef>> {
        self.query_one(&format!("{DEPARTMENT_SELECT_SQL} WHERE name = ?1;"), [name])
    }

    fn get_all(&self) -> RepoResult<Vec<DepartmentRef>> {
        self.query_many(&format!("{DEPARTMENT_SELECT_SQL} ORDER BY id ASC;"), [])
    }

    fn employees_of(&self, department: &DepartmentRef) -> RepoResult<Vec<Employee>> {
        let Some(id) = read(department)?.id else {
            return Ok(Vec::new());
        };

        SqliteEmployeeRepository::new(self.conn).find_by_department(id)
    }
}

struct DepartmentRow {
    id: DepartmentId,
    name: String,
    location: String,
}

fn parse_department_row(row: &Row<'_>) -> RepoResult<DepartmentRow> {
    Ok(DepartmentRow {
        id: row.get("id")?,
        name: required_text(row, "departments", "name")?,
        location: required_text(row, "departments", "location")?,
    })
}

fn read(department: &DepartmentRef) -> RepoResult<Ref<'_, Department>> {
    department
        .try_borrow()
        .map_err(|_| RepoError::RecordBusy("department"))
}

fn write(department: &DepartmentRef) -> RepoResult<RefMut<'_, Department>> {
    department
        .try_borrow_mut()
        .map_err(|_| RepoError::RecordBusy("department"))
}
