//! Core persistence layer for departments and employees.
//! Records map 1:1 onto the `departments` / `employees` SQLite tables.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::CompanyConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::department::{Department, DepartmentId, DepartmentRef};
pub use model::employee::{Employee, EmployeeId};
pub use repo::department_repo::{DepartmentRepository, SqliteDepartmentRepository};
pub use repo::employee_repo::{EmployeeRepository, SqliteEmployeeRepository};
pub use repo::identity_map::{IdentityMap, SharedIdentityMap};
pub use repo::{RepoError, RepoResult, WriteOutcome};
pub use service::company_service::{create_department_with_employees, CompanyService};

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
