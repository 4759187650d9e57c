//! Department record and its shared handle.
//!
//! # Invariants
//! - Within one identity map, a persisted department id maps to exactly one
//!   `DepartmentRef`; all holders observe the same field values.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

/// Primary key of a `departments` row.
pub type DepartmentId = i64;

/// Shared, mutable handle to a department tracked by an identity map.
pub type DepartmentRef = Rc<RefCell<Department>>;

/// One row of the `departments` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    /// Assigned by SQLite on insert; cleared on delete.
    pub id: Option<DepartmentId>,
    /// Unique across all departments (enforced by the schema).
    pub name: String,
    pub location: String,
}

impl Department {
    /// Creates an unsaved department.
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            location: location.into(),
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Wraps this record in a new shared handle.
    pub fn into_ref(self) -> DepartmentRef {
        Rc::new(RefCell::new(self))
    }
}

impl Display for Department {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.id {
            Some(id) => write!(f, "<Department {id}: {}, {}>", self.name, self.location),
            None => write!(f, "<Department None: {}, {}>", self.name, self.location),
        }
    }
}
