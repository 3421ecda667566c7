#![allow(dead_code)]

use std::path::PathBuf;

use tabula_core::schema::{Column, Schema, Table};
use tabula_sqlite::Storage;
use tempfile::TempDir;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Company {
    pub id: i64,
    pub name: String,
    pub age: i64,
    pub address: Option<String>,
    pub salary: Option<f64>,
}

impl Company {
    pub fn new(id: i64, name: &str, age: i64, address: &str, salary: f64) -> Self {
        Self {
            id,
            name: name.into(),
            age,
            address: Some(address.into()),
            salary: Some(salary),
        }
    }
}

pub fn company_table() -> Table<Company> {
    Table::<Company>::new("COMPANY")
        .column(Column::new("ID", |c: &Company| &c.id, |c, v| c.id = v).primary_key())
        .column(Column::new("NAME", |c: &Company| &c.name, |c, v| c.name = v))
        .column(Column::new("AGE", |c: &Company| &c.age, |c, v| c.age = v))
        .column(Column::new("ADDRESS", |c: &Company| &c.address, |c, v| c.address = v))
        .column(Column::new("SALARY", |c: &Company| &c.salary, |c, v| c.salary = v))
}

pub fn company_rows() -> Vec<Company> {
    vec![
        Company::new(1, "Paul", 32, "California", 20000.0),
        Company::new(2, "Allen", 25, "Texas", 15000.0),
        Company::new(3, "Teddy", 23, "Norway", 20000.0),
        Company::new(4, "Mark", 25, "Rich-Mond", 65000.0),
        Company::new(5, "David", 27, "Texas", 85000.0),
        Company::new(6, "Kim", 22, "South-Hall", 45000.0),
        Company::new(7, "James", 24, "Houston", 10000.0),
    ]
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub age: i64,
    pub email: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Visit {
    pub id: i64,
    pub employee_id: i64,
    pub place: String,
}

pub fn employee_table() -> Table<Employee> {
    Table::<Employee>::new("employees")
        .column(
            Column::new("id", |e: &Employee| &e.id, |e, v| e.id = v)
                .primary_key()
                .autoincrement(),
        )
        .column(Column::new("name", |e: &Employee| &e.name, |e, v| e.name = v))
        .column(Column::new("age", |e: &Employee| &e.age, |e, v| e.age = v))
        .column(Column::new("email", |e: &Employee| &e.email, |e, v| e.email = v))
}

pub fn visit_table() -> Table<Visit> {
    Table::<Visit>::new("visits")
        .column(Column::new("id", |v: &Visit| &v.id, |v, x| v.id = x).primary_key())
        .column(Column::new(
            "employee_id",
            |v: &Visit| &v.employee_id,
            |v, x| v.employee_id = x,
        ))
        .column(Column::new("place", |v: &Visit| &v.place, |v, x| v.place = x))
}

pub fn schema() -> Schema {
    Schema::new()
        .table(company_table())
        .table(employee_table())
        .table(visit_table())
}

/// In-memory storage with every table created.
pub fn memory_storage() -> Storage {
    let storage = Storage::open(":memory:", schema()).unwrap();
    storage.sync_schema(false).unwrap();
    storage
}

/// In-memory storage with the seven COMPANY rows.
pub fn company_storage() -> Storage {
    let storage = memory_storage();
    storage.replace_range(&company_rows()).unwrap();
    storage
}

pub fn db_path(dir: &TempDir, name: &str) -> PathBuf {
    dir.path().join(name)
}

pub fn employee(name: &str, age: i64) -> Employee {
    Employee {
        id: 0,
        name: name.into(),
        age,
        email: None,
    }
}
