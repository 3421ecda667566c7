#![allow(dead_code)]

use tabula_core::schema::{Column, Schema, Table};
use tabula_core::serializer::{serialize, SerializeContext, SerializeSql};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub age: i64,
    pub department_id: Option<i64>,
    pub salary: f64,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Department {
    pub id: i64,
    pub title: String,
}

pub fn schema() -> Schema {
    Schema::new()
        .table(
            Table::<Employee>::new("employees")
                .column(Column::new("id", |e: &Employee| &e.id, |e, v| e.id = v).primary_key())
                .column(Column::new("name", |e: &Employee| &e.name, |e, v| e.name = v))
                .column(Column::new("age", |e: &Employee| &e.age, |e, v| e.age = v))
                .column(Column::new(
                    "department_id",
                    |e: &Employee| &e.department_id,
                    |e, v| e.department_id = v,
                ))
                .column(Column::new("salary", |e: &Employee| &e.salary, |e, v| e.salary = v)),
        )
        .table(
            Table::<Department>::new("departments")
                .column(
                    Column::new("id", |d: &Department| &d.id, |d, v| d.id = v)
                        .primary_key()
                        .autoincrement(),
                )
                .column(Column::new("title", |d: &Department| &d.title, |d, v| d.title = v)),
        )
}

/// Serializes with table names, panicking with the node on failure.
pub fn sql<N: SerializeSql + std::fmt::Debug>(node: &N) -> String {
    let schema = schema();
    serialize(node, SerializeContext::new(&schema))
        .unwrap_or_else(|e| panic!("Failed to serialize: {node:?}\nError: {e}"))
}

/// Serializes without table names.
pub fn sql_unqualified<N: SerializeSql + std::fmt::Debug>(node: &N) -> String {
    let schema = schema();
    serialize(node, SerializeContext::new(&schema).without_table_names())
        .unwrap_or_else(|e| panic!("Failed to serialize: {node:?}\nError: {e}"))
}
