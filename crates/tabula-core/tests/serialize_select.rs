//! Tests for SELECT serialization: deduced FROM, joins through WHERE,
//! grouping, functions and subqueries.

mod common;
use common::*;

use tabula_core::builder::{
    avg, coalesce, col, count_all, from, group_by, having, lit, order_by, round, select, where_,
};
use tabula_core::schema::Schema;
use tabula_core::serializer::{serialize, SerializeContext};
use tabula_core::Error;

#[test]
fn select_with_explicit_from() {
    let query = select([col::<Employee>("name")])
        .clause(from::<Employee>())
        .clause(where_(col::<Employee>("age").gt(30)));

    assert_eq!(
        sql(&query),
        r#"SELECT employees."name" FROM "employees" WHERE employees."age" > 30"#
    );
}

#[test]
fn deduced_from_lists_tables_in_first_seen_order() {
    let query = select([col::<Employee>("name"), col::<Department>("title")]).clause(where_(
        col::<Employee>("department_id").eq(col::<Department>("id")),
    ));

    assert_eq!(
        sql(&query.with_deduced_from()),
        r#"SELECT employees."name", departments."title" FROM "employees", "departments" WHERE employees."department_id" == departments."id""#
    );
}

#[test]
fn group_by_with_having() {
    let query = select([col::<Employee>("department_id"), count_all()])
        .clause(from::<Employee>())
        .clause(group_by([col::<Employee>("department_id")]))
        .clause(having(count_all().gt(2)))
        .clause(order_by([count_all().desc()]));

    assert_eq!(
        sql(&query),
        r#"SELECT employees."department_id", COUNT(*) FROM "employees" GROUP BY employees."department_id" HAVING COUNT(*) > 2 ORDER BY COUNT(*) DESC"#
    );
}

#[test]
fn distinct_select() {
    let query = select([col::<Employee>("age")]).distinct();
    assert_eq!(sql(&query), r#"SELECT DISTINCT employees."age""#);
}

#[test]
fn nested_functions() {
    let expr = round(avg(coalesce([col::<Employee>("salary"), lit(0.0)])), 2);
    assert_eq!(
        sql_unqualified(&expr),
        r#"ROUND(AVG(COALESCE("salary", 0.0)), 2)"#
    );
}

#[test]
fn subquery_keeps_table_names_in_unqualified_context() {
    let sub = select([col::<Department>("id")])
        .clause(from::<Department>())
        .clause(where_(col::<Department>("title").like("Eng%")));
    let expr = col::<Employee>("department_id").is_in(sub);

    assert_eq!(
        sql_unqualified(&expr),
        r#""department_id" IN (SELECT departments."id" FROM "departments" WHERE departments."title" LIKE 'Eng%')"#
    );
}

#[test]
fn subquery_without_from_gets_its_own() {
    let sub = select([col::<Department>("id")])
        .clause(where_(col::<Department>("title").eq("Ops")));
    let expr = col::<Employee>("department_id").not_in(sub);

    assert_eq!(
        sql(&expr),
        r#"employees."department_id" NOT IN (SELECT departments."id" FROM "departments" WHERE departments."title" == 'Ops')"#
    );
}

#[test]
fn between_and_not_between() {
    assert_eq!(
        sql_unqualified(&col::<Employee>("age").between(20, 30)),
        r#""age" BETWEEN 20 AND 30"#
    );
    assert_eq!(
        sql_unqualified(&col::<Employee>("age").not_between(20, 30)),
        r#""age" NOT BETWEEN 20 AND 30"#
    );
}

#[test]
fn unary_operators() {
    assert_eq!(
        sql_unqualified(&col::<Employee>("department_id").is_not_null()),
        r#""department_id" IS NOT NULL"#
    );
    assert_eq!(
        sql_unqualified(&col::<Employee>("age").gt(3).not()),
        r#"NOT ("age" > 3)"#
    );
    assert_eq!(sql_unqualified(&col::<Employee>("age").neg()), r#"-"age""#);
}

#[test]
fn empty_schema_rejects_every_column() {
    let schema = Schema::new();
    let err = serialize(&col::<Employee>("age"), SerializeContext::new(&schema)).unwrap_err();
    assert!(matches!(err, Error::TypeNotMapped(_)));
}

#[test]
fn walk_reaches_columns_inside_subqueries() {
    let sub = select([col::<Department>("id")]).clause(from::<Department>());
    let expr = col::<Employee>("department_id").is_in(sub);

    let mut columns = Vec::new();
    expr.walk(&mut |node| {
        if let tabula_core::Expr::Column(c) = node {
            columns.push(c.name.clone());
        }
    });
    assert_eq!(columns, vec!["department_id", "id"]);
    assert_eq!(expr.referenced_tables().len(), 1);
}
