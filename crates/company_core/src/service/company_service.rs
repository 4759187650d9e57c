//! Company use-case service.
//!
//! # Responsibility
//! - Manage the department/employee schema as one unit.
//! - Provide hiring and navigation entry points over both repositories.
//! - Create a department together with its employees atomically.
//!
//! # Invariants
//! - Schema creation runs departments before employees; drop runs in reverse.
//! - A failed transactional create leaves no rows behind and restores the
//!   ids the records had before the call.

use crate::model::department::{Department, DepartmentId, DepartmentRef};
use crate::model::employee::{Employee, EmployeeId};
use crate::repo::department_repo::{DepartmentRepository, SqliteDepartmentRepository};
use crate::repo::employee_repo::{EmployeeRepository, SqliteEmployeeRepository};
use crate::repo::identity_map::SharedIdentityMap;
use crate::repo::{RepoError, RepoResult};
use log::{error, info};
use rusqlite::{Connection, TransactionBehavior};
use std::rc::Rc;
use std::time::Instant;

/// Use-case service wrapper over both repositories.
pub struct CompanyService<E: EmployeeRepository, D: DepartmentRepository> {
    employees: E,
    departments: D,
}

impl<E: EmployeeRepository, D: DepartmentRepository> CompanyService<E, D> {
    pub fn new(employees: E, departments: D) -> Self {
        Self {
            employees,
            departments,
        }
    }

    pub fn employees(&self) -> &E {
        &self.employees
    }

    pub fn departments(&self) -> &D {
        &self.departments
    }

    /// Creates both tables if missing.
    pub fn create_schema(&self) -> RepoResult<()> {
        self.departments.create_table()?;
        self.employees.create_table()
    }

    /// Drops both tables if present.
    pub fn drop_schema(&self) -> RepoResult<()> {
        self.employees.drop_table()?;
        self.departments.drop_table()
    }

    /// Creates and persists a department.
    pub fn open_department(&self, name: &str, location: &str) -> RepoResult<DepartmentRef> {
        self.departments.create(name, location)
    }

    /// Creates an employee in `department`.
    ///
    /// # Contract
    /// - The department is saved first (insert, or update when it has an id).
    /// - Returns the persisted employee.
    pub fn hire(
        &self,
        name: &str,
        job_title: &str,
        department: &DepartmentRef,
    ) -> RepoResult<Employee> {
        let department_id = self.departments.insert(department)?;
        self.employees.create(name, job_title, department_id)
    }

    /// Resolves the department an employee belongs to.
    pub fn department_of(&self, employee: &Employee) -> RepoResult<Option<DepartmentRef>> {
        self.employees.get_department(employee, &self.departments)
    }

    /// Lists the employees of a department.
    pub fn employees_of(&self, department: &DepartmentRef) -> RepoResult<Vec<Employee>> {
        self.departments.employees_of(department)
    }
}

/// Inserts `department` and `employees` in one immediate transaction.
///
/// Each employee's `department_id` is set to the department id before
/// insert. `identity` is the identity map the caller's department
/// repository uses, so the new department is registered there on success.
///
/// # Errors
/// - Returns the first storage error; the transaction is rolled back, the
///   department is evicted from `identity` if it was new, and every record
///   gets back the id it had before the call. Employees also get back their
///   prior `department_id`.
/// - `RecordBusy` when `department` is borrowed elsewhere; no row is written.
pub fn create_department_with_employees(
    conn: &mut Connection,
    identity: &SharedIdentityMap<Department>,
    department: &DepartmentRef,
    employees: &mut [Employee],
) -> RepoResult<DepartmentId> {
    let started_at = Instant::now();
    let prior_department_id = department
        .try_borrow()
        .map_err(|_| RepoError::RecordBusy("department"))?
        .id;
    let prior_employee_keys: Vec<(Option<EmployeeId>, DepartmentId)> = employees
        .iter()
        .map(|employee| (employee.id, employee.department_id))
        .collect();

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let result = insert_department_with_employees(&tx, identity, department, employees)
        .and_then(|id| tx.commit().map(|()| id).map_err(RepoError::from));

    match result {
        Ok(id) => {
            info!(
                "event=department_with_employees_create module=service status=ok department_id={id} employee_count={} duration_ms={}",
                employees.len(),
                started_at.elapsed().as_millis()
            );
            Ok(id)
        }
        Err(err) => {
            restore_department(identity, department, prior_department_id);
            for (employee, (prior_id, prior_department_id)) in
                employees.iter_mut().zip(prior_employee_keys)
            {
                employee.id = prior_id;
                employee.department_id = prior_department_id;
            }
            error!(
                "event=department_with_employees_create module=service status=error duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            );
            Err(err)
        }
    }
}

fn insert_department_with_employees(
    conn: &Connection,
    identity: &SharedIdentityMap<Department>,
    department: &DepartmentRef,
    employees: &mut [Employee],
) -> RepoResult<DepartmentId> {
    let departments = SqliteDepartmentRepository::with_identity_map(conn, Rc::clone(identity));
    let employee_repo = SqliteEmployeeRepository::new(conn);

    let department_id = departments.insert(department)?;
    for employee in employees.iter_mut() {
        employee.department_id = department_id;
        employee_repo.insert(employee)?;
    }

    Ok(department_id)
}

fn restore_department(
    identity: &SharedIdentityMap<Department>,
    department: &DepartmentRef,
    prior_id: Option<DepartmentId>,
) {
    let Ok(mut record) = department.try_borrow_mut() else {
        error!(
            "event=department_restore module=service status=error error_code=record_busy prior_id={prior_id:?}"
        );
        return;
    };
    if prior_id.is_none() {
        if let Some(assigned) = record.id {
            identity.borrow_mut().remove(assigned);
        }
    }
    record.id = prior_id;
}
