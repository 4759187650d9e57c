use company_core::db::open_db_in_memory;
use company_core::db::schema::{row_count, table_exists, DEPARTMENTS_TABLE, EMPLOYEES_TABLE};
use company_core::{
    create_department_with_employees, CompanyService, Department, DepartmentRepository, Employee,
    EmployeeRepository, IdentityMap, RepoError, SqliteDepartmentRepository,
    SqliteEmployeeRepository,
};
use rusqlite::Connection;
use std::rc::Rc;

fn setup() -> Connection {
    open_db_in_memory().unwrap()
}

fn service(
    conn: &Connection,
) -> CompanyService<SqliteEmployeeRepository<'_>, SqliteDepartmentRepository<'_>> {
    CompanyService::new(
        SqliteEmployeeRepository::new(conn),
        SqliteDepartmentRepository::new(conn),
    )
}

#[test]
fn payroll_scenario_roundtrips_both_directions() {
    let conn = setup();
    let service = service(&conn);
    service.create_schema().unwrap();

    let payroll = service.open_department("Payroll", "Building A").unwrap();
    let payroll_id = payroll.borrow().id.unwrap();
    let sasha = service
        .employees()
        .create("Sasha", "Manager", payroll_id)
        .unwrap();

    let fetched = service
        .employees()
        .find_by_id(sasha.id.unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(
        (fetched.name.as_str(), fetched.job_title.as_str(), fetched.department_id),
        ("Sasha", "Manager", payroll_id)
    );

    let staff = service.employees_of(&payroll).unwrap();
    assert_eq!(staff, vec![fetched.clone()]);

    let department = service.department_of(&fetched).unwrap().unwrap();
    assert!(Rc::ptr_eq(&department, &payroll));
}

#[test]
fn hire_saves_an_unsaved_department_first() {
    let conn = setup();
    let service = service(&conn);
    service.create_schema().unwrap();

    let audit = Department::new("Audit", "Building B").into_ref();
    let kim = service.hire("Kim", "Auditor", &audit).unwrap();

    let audit_id = audit.borrow().id.unwrap();
    assert_eq!(kim.department_id, audit_id);
    assert_eq!(service.employees_of(&audit).unwrap(), vec![kim]);
}

#[test]
fn schema_create_and_drop_cover_both_tables() {
    let conn = setup();
    let service = service(&conn);

    service.create_schema().unwrap();
    assert!(table_exists(&conn, DEPARTMENTS_TABLE).unwrap());
    assert!(table_exists(&conn, EMPLOYEES_TABLE).unwrap());

    let payroll = service.open_department("Payroll", "Building A").unwrap();
    service.hire("Sasha", "Manager", &payroll).unwrap();
    service.drop_schema().unwrap();
    assert!(!table_exists(&conn, DEPARTMENTS_TABLE).unwrap());
    assert!(!table_exists(&conn, EMPLOYEES_TABLE).unwrap());

    service.create_schema().unwrap();
    assert_eq!(row_count(&conn, DEPARTMENTS_TABLE).unwrap(), 0);
    assert_eq!(row_count(&conn, EMPLOYEES_TABLE).unwrap(), 0);
}

#[test]
fn transactional_create_persists_department_and_staff() {
    let mut conn = setup();
    service(&conn).create_schema().unwrap();
    let identity = IdentityMap::shared();

    let payroll = Department::new("Payroll", "Building A").into_ref();
    let mut staff = vec![
        Employee::new("Sasha", "Manager", 0),
        Employee::new("Lee", "Clerk", 0),
    ];
    let id = create_department_with_employees(&mut conn, &identity, &payroll, &mut staff).unwrap();

    assert_eq!(payroll.borrow().id, Some(id));
    assert!(identity.borrow().contains(id));
    assert!(staff.iter().all(|employee| employee.id.is_some()));
    assert!(staff.iter().all(|employee| employee.department_id == id));

    let departments = SqliteDepartmentRepository::with_identity_map(&conn, Rc::clone(&identity));
    let fetched = departments.find_by_id(id).unwrap().unwrap();
    assert!(Rc::ptr_eq(&fetched, &payroll));
    assert_eq!(departments.employees_of(&payroll).unwrap(), staff);
}

#[test]
fn failed_transactional_create_rolls_back_everything() {
    let mut conn = setup();
    service(&conn).create_schema().unwrap();
    service(&conn)
        .open_department("Payroll", "Building A")
        .unwrap();
    let identity = IdentityMap::shared();

    let audit = Department::new("Audit", "Building B").into_ref();
    let mut staff = vec![Employee::new("Kim", "Auditor", 0)];
    create_department_with_employees(&mut conn, &identity, &audit, &mut staff).unwrap();

    // Name collides with the department opened above.
    let payroll = Department::new("Payroll", "Building C").into_ref();
    let mut more_staff = vec![Employee::new("Ana", "Analyst", 0)];
    let err = create_department_with_employees(&mut conn, &identity, &payroll, &mut more_staff)
        .unwrap_err();
    assert!(err.is_constraint_violation());
    assert_eq!(payroll.borrow().id, None);
    assert_eq!(more_staff[0].id, None);
    assert_eq!(identity.borrow().len(), 1);
    assert_eq!(row_count(&conn, DEPARTMENTS_TABLE).unwrap(), 2);
    assert_eq!(row_count(&conn, EMPLOYEES_TABLE).unwrap(), 1);
}

#[test]
fn failed_employee_insert_rolls_back_the_new_department() {
    let mut conn = setup();
    let departments = SqliteDepartmentRepository::new(&conn);
    departments.create_table().unwrap();
    // No employees table: the first employee insert fails after the
    // department row was written inside the transaction.
    let identity = IdentityMap::shared();

    let payroll = Department::new("Payroll", "Building A").into_ref();
    let mut staff = vec![Employee::new("Sasha", "Manager", 0)];
    let err = create_department_with_employees(&mut conn, &identity, &payroll, &mut staff)
        .unwrap_err();

    assert!(err.to_string().contains("no such table"));
    assert_eq!(payroll.borrow().id, None);
    assert!(identity.borrow().is_empty());
    assert_eq!(staff[0].id, None);
    assert_eq!(staff[0].department_id, 0);
    assert_eq!(row_count(&conn, DEPARTMENTS_TABLE).unwrap(), 0);
}

#[test]
fn busy_department_aborts_transactional_create_untouched() {
    let mut conn = setup();
    service(&conn).create_schema().unwrap();
    let identity = IdentityMap::shared();

    let payroll = Department::new("Payroll", "Building A").into_ref();
    let mut staff = vec![Employee::new("Sasha", "Manager", 0)];
    let reader = payroll.borrow();
    let err = create_department_with_employees(&mut conn, &identity, &payroll, &mut staff)
        .unwrap_err();
    drop(reader);

    assert!(matches!(err, RepoError::RecordBusy("department")));
    assert_eq!(payroll.borrow().id, None);
    assert!(identity.borrow().is_empty());
    assert_eq!(staff[0].id, None);
    assert_eq!(staff[0].department_id, 0);
    assert_eq!(row_count(&conn, DEPARTMENTS_TABLE).unwrap(), 0);
    assert_eq!(row_count(&conn, EMPLOYEES_TABLE).unwrap(), 0);
}
