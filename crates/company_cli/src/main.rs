//! Command-line entry point for company core.
//!
//! Usage: `company_cli [ping|seed|list]` (default `list`).
//! Database path and logging come from `COMPANY_*` environment variables.

use company_core::db::open_db;
use company_core::{
    init_logging, CompanyConfig, CompanyService, DepartmentRepository, SqliteDepartmentRepository,
    SqliteEmployeeRepository,
};
use log::info;
use std::error::Error;
use std::process::ExitCode;

const SEED_DEPARTMENT: (&str, &str) = ("Payroll", "Building A, 5th Floor");
const SEED_EMPLOYEE: (&str, &str) = ("Sasha", "Manager");

fn main() -> ExitCode {
    let command = std::env::args().nth(1).unwrap_or_else(|| "list".to_string());
    match run(command.as_str()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("company_cli {command} failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: &str) -> Result<(), Box<dyn Error>> {
    if command == "ping" {
        println!("company_core ping={}", company_core::ping());
        println!("company_core version={}", company_core::core_version());
        return Ok(());
    }

    let config = CompanyConfig::from_env();
    if let Some(log_dir) = config.log_dir.as_deref() {
        init_logging(&config.log_level, log_dir)?;
    }

    let conn = open_db(&config.db_path)?;
    let service = CompanyService::new(
        SqliteEmployeeRepository::new(&conn),
        SqliteDepartmentRepository::new(&conn),
    );
    service.create_schema()?;

    match command {
        "seed" => seed(&service),
        "list" => list(&service),
        other => Err(format!("unknown command `{other}`; expected ping|seed|list").into()),
    }
}

fn seed(
    service: &CompanyService<SqliteEmployeeRepository<'_>, SqliteDepartmentRepository<'_>>,
) -> Result<(), Box<dyn Error>> {
    let (name, location) = SEED_DEPARTMENT;
    let department = match service.departments().find_by_name(name)? {
        Some(existing) => existing,
        None => service.open_department(name, location)?,
    };

    let (employee_name, job_title) = SEED_EMPLOYEE;
    let employee = service.hire(employee_name, job_title, &department)?;
    info!(
        "event=seed module=cli status=ok employee_id={:?}",
        employee.id
    );
    println!("seeded {} into {}", employee.name, department.borrow());
    Ok(())
}

fn list(
    service: &CompanyService<SqliteEmployeeRepository<'_>, SqliteDepartmentRepository<'_>>,
) -> Result<(), Box<dyn Error>> {
    for department in service.departments().get_all()? {
        println!("{}", department.borrow());
        for employee in service.employees_of(&department)? {
            println!(
                "  #{} {} ({})",
                employee.id.unwrap_or_default(),
                employee.name,
                employee.job_title
            );
        }
    }
    Ok(())
}
