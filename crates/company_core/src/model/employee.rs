//! Employee record.

use super::department::DepartmentId;
use serde::{Deserialize, Serialize};

/// Primary key of an `employees` row.
pub type EmployeeId = i64;

/// One row of the `employees` table.
///
/// Employees are plain values: every fetch materializes a fresh record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Assigned by SQLite on insert; cleared on delete.
    pub id: Option<EmployeeId>,
    pub name: String,
    pub job_title: String,
    /// References `departments.id`.
    pub department_id: DepartmentId,
}

impl Employee {
    /// Creates an unsaved employee.
    pub fn new(
        name: impl Into<String>,
        job_title: impl Into<String>,
        department_id: DepartmentId,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            job_title: job_title.into(),
            department_id,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}
