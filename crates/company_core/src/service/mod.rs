//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate department/employee repository calls into use-case APIs.
//! - Own the only multi-statement write path (transactional create).

pub mod company_service;
