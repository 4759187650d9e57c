//! Record shapes for departments and employees.
//!
//! # Responsibility
//! - Define the in-memory records mapped 1:1 onto table rows.
//! - Keep both entities in one module so neither depends on the other's
//!   repository.
//!
//! # Invariants
//! - `id == None` means the record has never been persisted or was deleted.

pub mod department;
pub mod employee;
