//! Context-sensitive SQL serialization of AST nodes.
//!
//! Column references are resolved through a [`SchemaLookup`]: a mapped type
//! becomes its table name and the column is checked against the table's
//! declaration. The same node renders qualified (`employees."age"`) or
//! unqualified (`"age"`) depending on the [`SerializeContext`] it is
//! serialized with; assignment lists always use the unqualified form.
//!
//! ```rust
//! use tabula_core::builder::col;
//! use tabula_core::schema::{Column, Schema, Table};
//! use tabula_core::serializer::{serialize, SerializeContext};
//!
//! #[derive(Default)]
//! struct Employee {
//!     age: i64,
//! }
//!
//! let schema = Schema::new().table(
//!     Table::<Employee>::new("employees")
//!         .column(Column::new("age", |e: &Employee| &e.age, |e, v| e.age = v)),
//! );
//! let expr = col::<Employee>("age").gt(30);
//!
//! let ctx = SerializeContext::new(&schema);
//! assert_eq!(serialize(&expr, ctx).unwrap(), r#"employees."age" > 30"#);
//! assert_eq!(
//!     serialize(&expr, ctx.without_table_names()).unwrap(),
//!     r#""age" > 30"#
//! );
//! ```

use crate::ast::{
    BinaryOp, Clause, ColumnRef, Expr, FunctionCall, Limit, OrderTerm, Select, TableKey,
    UnaryOp,
};
use crate::error::{Error, Result};
use crate::schema::TableSchema;

/// Resolves mapped types to their table metadata.
pub trait SchemaLookup {
    /// Returns the table mapped to `key`, if any.
    fn find_table(&self, key: TableKey) -> Option<&dyn TableSchema>;
}

/// Serialization settings, passed by value and never mutated in place.
#[derive(Clone, Copy)]
pub struct SerializeContext<'a> {
    schema: &'a dyn SchemaLookup,
    skip_table_name: bool,
}

impl<'a> SerializeContext<'a> {
    /// Creates a context that qualifies column references.
    #[must_use]
    pub fn new(schema: &'a dyn SchemaLookup) -> Self {
        Self {
            schema,
            skip_table_name: false,
        }
    }

    /// Returns a copy that qualifies column references with their table.
    #[must_use]
    pub const fn with_table_names(self) -> Self {
        Self {
            schema: self.schema,
            skip_table_name: false,
        }
    }

    /// Returns a copy that omits table names.
    #[must_use]
    pub const fn without_table_names(self) -> Self {
        Self {
            schema: self.schema,
            skip_table_name: true,
        }
    }

    /// Returns `true` if table names are omitted.
    #[must_use]
    pub const fn skips_table_name(&self) -> bool {
        self.skip_table_name
    }

    /// Returns the schema lookup.
    #[must_use]
    pub fn schema(&self) -> &'a dyn SchemaLookup {
        self.schema
    }

    fn table(&self, key: TableKey) -> Result<&'a dyn TableSchema> {
        self.schema
            .find_table(key)
            .ok_or(Error::TypeNotMapped(key.type_name()))
    }
}

/// A node that renders to SQL text.
pub trait SerializeSql {
    /// Renders the node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeNotMapped`] or [`Error::ColumnNotFound`] for
    /// unresolved column references and [`Error::InvalidConstraintBuilder`]
    /// for malformed assignment lists.
    fn serialize(&self, ctx: SerializeContext<'_>) -> Result<String>;
}

/// Renders `node` to SQL text.
///
/// # Errors
///
/// See [`SerializeSql::serialize`].
pub fn serialize<N: SerializeSql + ?Sized>(node: &N, ctx: SerializeContext<'_>) -> Result<String> {
    node.serialize(ctx)
}

/// Quotes an identifier with double quotes, doubling embedded quotes.
#[must_use]
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Keywords the engine reserves, sorted for binary search.
const KEYWORDS: &[&str] = &[
    "ABORT", "ACTION", "ADD", "AFTER", "ALL", "ALTER", "ALWAYS", "ANALYZE", "AND", "AS", "ASC",
    "ATTACH", "AUTOINCREMENT", "BEFORE", "BEGIN", "BETWEEN", "BY", "CASCADE", "CASE", "CAST",
    "CHECK", "COLLATE", "COLUMN", "COMMIT", "CONFLICT", "CONSTRAINT", "CREATE", "CROSS",
    "CURRENT", "CURRENT_DATE", "CURRENT_TIME", "CURRENT_TIMESTAMP", "DATABASE", "DEFAULT",
    "DEFERRABLE", "DEFERRED", "DELETE", "DESC", "DETACH", "DISTINCT", "DO", "DROP", "EACH",
    "ELSE", "END", "ESCAPE", "EXCEPT", "EXCLUDE", "EXCLUSIVE", "EXISTS", "EXPLAIN", "FAIL",
    "FILTER", "FIRST", "FOLLOWING", "FOR", "FOREIGN", "FROM", "FULL", "GENERATED", "GLOB",
    "GROUP", "GROUPS", "HAVING", "IF", "IGNORE", "IMMEDIATE", "IN", "INDEX", "INDEXED",
    "INITIALLY", "INNER", "INSERT", "INSTEAD", "INTERSECT", "INTO", "IS", "ISNULL", "JOIN",
    "KEY", "LAST", "LEFT", "LIKE", "LIMIT", "MATCH", "MATERIALIZED", "NATURAL", "NO", "NOT",
    "NOTHING", "NOTNULL", "NULL", "NULLS", "OF", "OFFSET", "ON", "OR", "ORDER", "OTHERS",
    "OUTER", "OVER", "PARTITION", "PLAN", "PRAGMA", "PRECEDING", "PRIMARY", "QUERY", "RAISE",
    "RANGE", "RECURSIVE", "REFERENCES", "REGEXP", "REINDEX", "RELEASE", "RENAME", "REPLACE",
    "RESTRICT", "RETURNING", "RIGHT", "ROLLBACK", "ROW", "ROWS", "SAVEPOINT", "SELECT", "SET",
    "TABLE", "TEMP", "TEMPORARY", "THEN", "TIES", "TO", "TRANSACTION", "TRIGGER", "UNBOUNDED",
    "UNION", "UNIQUE", "UPDATE", "USING", "VACUUM", "VALUES", "VIEW", "VIRTUAL", "WHEN", "WHERE",
    "WINDOW", "WITH", "WITHOUT",
];

/// Renders a table name as a column qualifier: bare when it is a plain
/// identifier, quoted when it is a keyword or contains other characters.
#[must_use]
pub fn qualifier(name: &str) -> String {
    let mut chars = name.chars();
    let plain = chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && KEYWORDS
            .binary_search(&name.to_ascii_uppercase().as_str())
            .is_err();
    if plain {
        name.to_string()
    } else {
        quote_identifier(name)
    }
}

/// Binding strength of a binary operator, higher binds tighter.
const fn precedence(op: BinaryOp) -> u8 {
    match op {
        BinaryOp::Assign => 0,
        BinaryOp::Or => 1,
        BinaryOp::And => 2,
        BinaryOp::Eq | BinaryOp::NotEq => 3,
        BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => 4,
        BinaryOp::Add | BinaryOp::Sub => 5,
        BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => 6,
        BinaryOp::Concat => 7,
    }
}

fn serialize_operand(
    operand: &Expr,
    parent: BinaryOp,
    right_side: bool,
    ctx: SerializeContext<'_>,
) -> Result<String> {
    let sql = operand.serialize(ctx)?;
    let wrap = match operand {
        Expr::Binary { .. } if parent.is_logical() => true,
        Expr::Binary { op, .. } => {
            let (inner, outer) = (precedence(*op), precedence(parent));
            inner < outer || (right_side && inner == outer)
        }
        Expr::In { .. } | Expr::Like { .. } | Expr::Glob { .. } | Expr::Between { .. } => {
            !parent.is_logical()
        }
        _ => false,
    };
    Ok(if wrap { format!("({sql})") } else { sql })
}

/// Operand of IN, LIKE, GLOB or BETWEEN. Anything binding looser than a
/// comparison is parenthesized.
fn serialize_predicate_operand(operand: &Expr, ctx: SerializeContext<'_>) -> Result<String> {
    let sql = operand.serialize(ctx)?;
    let wrap = match operand {
        Expr::Binary { .. }
        | Expr::In { .. }
        | Expr::Like { .. }
        | Expr::Glob { .. }
        | Expr::Between { .. } => true,
        Expr::Unary { op, .. } => !matches!(op, UnaryOp::Neg | UnaryOp::BitNot),
        _ => false,
    };
    Ok(if wrap { format!("({sql})") } else { sql })
}

fn serialize_column(column: &ColumnRef, ctx: SerializeContext<'_>) -> Result<String> {
    let table = ctx.table(column.table)?;
    if table.find_column(&column.name).is_none() {
        return Err(Error::ColumnNotFound {
            table: table.name().to_string(),
            column: column.name.clone(),
        });
    }
    let quoted = quote_identifier(&column.name);
    if ctx.skip_table_name {
        Ok(quoted)
    } else {
        Ok(format!("{}.{quoted}", qualifier(table.name())))
    }
}

fn serialize_list(items: &[Expr], ctx: SerializeContext<'_>) -> Result<String> {
    let parts = items
        .iter()
        .map(|item| item.serialize(ctx))
        .collect::<Result<Vec<_>>>()?;
    Ok(parts.join(", "))
}

fn serialize_function(call: &FunctionCall, ctx: SerializeContext<'_>) -> Result<String> {
    let mut sql = String::from(call.function.keyword());
    sql.push('(');
    if call.distinct {
        sql.push_str("DISTINCT ");
    }
    sql.push_str(&serialize_list(&call.args, ctx)?);
    sql.push(')');
    Ok(sql)
}

fn serialize_assignments(items: &[Expr], ctx: SerializeContext<'_>) -> Result<String> {
    let ctx = ctx.without_table_names();
    let parts = items
        .iter()
        .map(|item| match item {
            Expr::Binary {
                left,
                op: BinaryOp::Assign,
                right,
            } if matches!(**left, Expr::Column(_)) => {
                Ok(format!("{} = {}", left.serialize(ctx)?, right.serialize(ctx)?))
            }
            other => Err(Error::InvalidConstraintBuilder(format!(
                "assignment list entry is not `column = value`: {other:?}"
            ))),
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(parts.join(", "))
}

impl SerializeSql for Expr {
    fn serialize(&self, ctx: SerializeContext<'_>) -> Result<String> {
        match self {
            Self::Literal(value) => Ok(value.to_sql_inline()),
            Self::Column(column) => serialize_column(column, ctx),
            Self::Wildcard => Ok(String::from("*")),
            Self::Binary { left, op, right } => Ok(format!(
                "{} {} {}",
                serialize_operand(left, *op, false, ctx)?,
                op.as_str(),
                serialize_operand(right, *op, true, ctx)?
            )),
            Self::Unary { op, operand } => {
                let inner = operand.serialize(ctx)?;
                let inner = if matches!(
                    **operand,
                    Self::Binary { .. }
                        | Self::In { .. }
                        | Self::Like { .. }
                        | Self::Glob { .. }
                        | Self::Between { .. }
                ) {
                    format!("({inner})")
                } else {
                    inner
                };
                Ok(if op.is_postfix() {
                    format!("{inner} {}", op.as_str())
                } else if op.as_str().ends_with(char::is_alphabetic) {
                    format!("{} {inner}", op.as_str())
                } else {
                    format!("{}{inner}", op.as_str())
                })
            }
            Self::Function(call) => serialize_function(call, ctx),
            Self::Subquery(select) => Ok(format!(
                "({})",
                select.with_deduced_from().serialize(ctx.with_table_names())?
            )),
            Self::List(items) => serialize_list(items, ctx),
            Self::In {
                expr,
                target,
                negated,
            } => {
                let keyword = if *negated { "NOT IN" } else { "IN" };
                let target_sql = match **target {
                    Self::List(ref items) => format!("({})", serialize_list(items, ctx)?),
                    _ => target.serialize(ctx)?,
                };
                Ok(format!(
                    "{} {keyword} {target_sql}",
                    serialize_predicate_operand(expr, ctx)?
                ))
            }
            Self::Like {
                expr,
                pattern,
                negated,
            } => {
                let keyword = if *negated { "NOT LIKE" } else { "LIKE" };
                Ok(format!(
                    "{} {keyword} {}",
                    serialize_predicate_operand(expr, ctx)?,
                    serialize_predicate_operand(pattern, ctx)?
                ))
            }
            Self::Glob { expr, pattern } => Ok(format!(
                "{} GLOB {}",
                serialize_predicate_operand(expr, ctx)?,
                serialize_predicate_operand(pattern, ctx)?
            )),
            Self::Between {
                expr,
                low,
                high,
                negated,
            } => {
                let keyword = if *negated { "NOT BETWEEN" } else { "BETWEEN" };
                Ok(format!(
                    "{} {keyword} {} AND {}",
                    serialize_predicate_operand(expr, ctx)?,
                    serialize_predicate_operand(low, ctx)?,
                    serialize_predicate_operand(high, ctx)?
                ))
            }
            Self::Assignments(items) => serialize_assignments(items, ctx),
        }
    }
}

impl SerializeSql for OrderTerm {
    fn serialize(&self, ctx: SerializeContext<'_>) -> Result<String> {
        let expr = self.expr.serialize(ctx)?;
        Ok(match self.direction {
            Some(direction) => format!("{expr} {}", direction.as_str()),
            None => expr,
        })
    }
}

impl SerializeSql for Limit {
    fn serialize(&self, ctx: SerializeContext<'_>) -> Result<String> {
        Ok(match self {
            Self::Count(count) => format!("LIMIT {}", count.serialize(ctx)?),
            Self::WithOffset { limit, offset } => format!(
                "LIMIT {} OFFSET {}",
                limit.serialize(ctx)?,
                offset.serialize(ctx)?
            ),
            Self::Comma { first, second } => format!(
                "LIMIT {}, {}",
                first.serialize(ctx)?,
                second.serialize(ctx)?
            ),
        })
    }
}

impl SerializeSql for Clause {
    fn serialize(&self, ctx: SerializeContext<'_>) -> Result<String> {
        Ok(match self {
            Self::From(tables) => {
                let names = tables
                    .iter()
                    .map(|key| ctx.table(*key).map(|t| quote_identifier(t.name())))
                    .collect::<Result<Vec<_>>>()?;
                format!("FROM {}", names.join(", "))
            }
            Self::Where(expr) => format!("WHERE {}", expr.serialize(ctx)?),
            Self::GroupBy(exprs) => format!("GROUP BY {}", serialize_list(exprs, ctx)?),
            Self::Having(expr) => format!("HAVING {}", expr.serialize(ctx)?),
            Self::OrderBy(terms) => {
                let parts = terms
                    .iter()
                    .map(|term| term.serialize(ctx))
                    .collect::<Result<Vec<_>>>()?;
                format!("ORDER BY {}", parts.join(", "))
            }
            Self::Limit(limit) => limit.serialize(ctx)?,
        })
    }
}

/// Renders clauses in the given order, each preceded by a space.
///
/// # Errors
///
/// See [`SerializeSql::serialize`].
pub fn serialize_clauses(clauses: &[Clause], ctx: SerializeContext<'_>) -> Result<String> {
    let mut sql = String::new();
    for clause in clauses {
        sql.push(' ');
        sql.push_str(&clause.serialize(ctx)?);
    }
    Ok(sql)
}

impl SerializeSql for Select {
    fn serialize(&self, ctx: SerializeContext<'_>) -> Result<String> {
        let mut sql = String::from("SELECT ");
        if self.distinct {
            sql.push_str("DISTINCT ");
        }
        sql.push_str(&serialize_list(&self.columns, ctx)?);
        sql.push_str(&serialize_clauses(&self.clauses, ctx)?);
        Ok(sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{
        count_all, count_distinct, from, limit, limit_comma, limit_offset, lit, order_by, select,
        set, where_,
    };
    use crate::schema::{Column, Schema, Table};

    #[derive(Default)]
    struct Employee {
        id: i64,
        name: String,
        age: i64,
    }

    #[derive(Default)]
    struct Company {
        id: i64,
        age: i64,
        address: Option<String>,
        salary: Option<f64>,
    }

    struct Unmapped;

    fn schema() -> Schema {
        Schema::new()
            .table(
                Table::<Employee>::new("employees")
                    .column(Column::new("id", |e: &Employee| &e.id, |e, v| e.id = v).primary_key())
                    .column(Column::new("name", |e: &Employee| &e.name, |e, v| e.name = v))
                    .column(Column::new("Age", |e: &Employee| &e.age, |e, v| e.age = v)),
            )
            .table(
                Table::<Company>::new("COMPANY")
                    .column(Column::new("ID", |c: &Company| &c.id, |c, v| c.id = v).primary_key())
                    .column(Column::new("AGE", |c: &Company| &c.age, |c, v| c.age = v))
                    .column(Column::new("ADDRESS", |c: &Company| &c.address, |c, v| c.address = v))
                    .column(Column::new("SALARY", |c: &Company| &c.salary, |c, v| c.salary = v)),
            )
    }

    fn age() -> Expr {
        Expr::column::<Employee>("Age")
    }

    #[test]
    fn test_qualified_and_unqualified_columns() {
        let schema = schema();
        let ctx = SerializeContext::new(&schema);
        let expr = lit(5).eq(age());

        assert_eq!(serialize(&expr, ctx.without_table_names()).unwrap(), r#"5 == "Age""#);
        assert_eq!(serialize(&expr, ctx).unwrap(), r#"5 == employees."Age""#);
    }

    #[test]
    fn test_in_parenthesizes_lists_and_subqueries_only() {
        let schema = schema();
        let ctx = SerializeContext::new(&schema);

        let list = age().is_in([20, 30]);
        assert_eq!(serialize(&list, ctx).unwrap(), r#"employees."Age" IN (20, 30)"#);

        let sub = age().not_in(select([Expr::column::<Company>("AGE")]).clause(from::<Company>()));
        assert_eq!(
            serialize(&sub, ctx).unwrap(),
            r#"employees."Age" NOT IN (SELECT COMPANY."AGE" FROM "COMPANY")"#
        );

        let bare = lit(30).is_in(age());
        assert_eq!(serialize(&bare, ctx).unwrap(), r#"30 IN employees."Age""#);
    }

    #[test]
    fn test_predicate_operands_are_grouped() {
        let schema = schema();
        let ctx = SerializeContext::new(&schema).without_table_names();

        let either = age().eq(5).or(age().eq(2)).is_in([0]);
        assert_eq!(
            serialize(&either, ctx).unwrap(),
            r#"(("Age" == 5) OR ("Age" == 2)) IN (0)"#
        );

        let compared = age().between(1, 5).eq(0);
        assert_eq!(
            serialize(&compared, ctx).unwrap(),
            r#"("Age" BETWEEN 1 AND 5) == 0"#
        );

        let bounds = age().between(lit(1).add(1), 5);
        assert_eq!(
            serialize(&bounds, ctx).unwrap(),
            r#""Age" BETWEEN (1 + 1) AND 5"#
        );

        let negated = age().like("1%").not();
        assert_eq!(serialize(&negated, ctx).unwrap(), r#"NOT ("Age" LIKE '1%')"#);

        let joined = age().is_in([1]).and(age().gt(0));
        assert_eq!(
            serialize(&joined, ctx).unwrap(),
            r#""Age" IN (1) AND ("Age" > 0)"#
        );
    }

    #[test]
    fn test_qualifier_quotes_keywords_and_odd_names() {
        assert_eq!(qualifier("employees"), "employees");
        assert_eq!(qualifier("_t1"), "_t1");
        assert_eq!(qualifier("order"), r#""order""#);
        assert_eq!(qualifier("Group"), r#""Group""#);
        assert_eq!(qualifier("line items"), r#""line items""#);
        assert_eq!(qualifier("1st"), r#""1st""#);
    }

    #[test]
    fn test_keyword_table_qualifier() {
        #[derive(Default)]
        struct Order {
            qty: i64,
        }

        let schema = Schema::new().table(
            Table::<Order>::new("order")
                .column(Column::new("qty", |o: &Order| &o.qty, |o, v| o.qty = v)),
        );
        let ctx = SerializeContext::new(&schema);
        let filter = where_(Expr::column::<Order>("qty").gt(1));

        assert_eq!(serialize(&filter, ctx).unwrap(), r#"WHERE "order"."qty" > 1"#);
    }

    #[test]
    fn test_logical_operands_are_parenthesized() {
        let schema = schema();
        let ctx = SerializeContext::new(&schema).without_table_names();
        let expr = age().gt(18).and(age().lt(65)).or(age().is_null());

        assert_eq!(
            serialize(&expr, ctx).unwrap(),
            r#"(("Age" > 18) AND ("Age" < 65)) OR "Age" IS NULL"#
        );
    }

    #[test]
    fn test_arithmetic_grouping() {
        let schema = schema();
        let ctx = SerializeContext::new(&schema).without_table_names();
        let expr = age().add(1).mul(2);

        assert_eq!(serialize(&expr, ctx).unwrap(), r#"("Age" + 1) * 2"#);
    }

    #[test]
    fn test_limit_forms() {
        let schema = schema();
        let ctx = SerializeContext::new(&schema);

        assert_eq!(serialize(&limit(5), ctx).unwrap(), "LIMIT 5");
        assert_eq!(serialize(&limit_offset(5, 10), ctx).unwrap(), "LIMIT 5 OFFSET 10");
        assert_eq!(serialize(&limit_comma(10, 5), ctx).unwrap(), "LIMIT 10, 5");
    }

    #[test]
    fn test_clause_order_is_preserved() {
        let schema = schema();
        let ctx = SerializeContext::new(&schema);
        let query = select([Expr::column::<Employee>("name")])
            .clause(order_by([age().desc()]))
            .clause(where_(age().gt_eq(21)))
            .clause(from::<Employee>());

        assert_eq!(
            serialize(&query, ctx).unwrap(),
            r#"SELECT employees."name" ORDER BY employees."Age" DESC WHERE employees."Age" >= 21 FROM "employees""#
        );
    }

    #[test]
    fn test_aggregate_functions() {
        let schema = schema();
        let ctx = SerializeContext::new(&schema);

        assert_eq!(serialize(&count_all(), ctx).unwrap(), "COUNT(*)");
        assert_eq!(
            serialize(&count_distinct(age()), ctx).unwrap(),
            r#"COUNT(DISTINCT employees."Age")"#
        );
    }

    #[test]
    fn test_update_assignments_are_unqualified() {
        let schema = schema();
        let ctx = SerializeContext::new(&schema);
        let assignments = set([
            Expr::column::<Company>("ADDRESS").assign("Texas"),
            Expr::column::<Company>("SALARY").assign(20000.0),
        ]);
        let filter = where_(Expr::column::<Company>("AGE").lt(30));

        let sql = format!(
            "UPDATE \"COMPANY\" SET {} {}",
            serialize(&assignments, ctx).unwrap(),
            serialize(&filter, ctx).unwrap()
        );
        assert_eq!(
            sql,
            r#"UPDATE "COMPANY" SET "ADDRESS" = 'Texas', "SALARY" = 20000.0 WHERE COMPANY."AGE" < 30"#
        );
    }

    #[test]
    fn test_malformed_assignment() {
        let schema = schema();
        let ctx = SerializeContext::new(&schema);
        let assignments = set([age().eq(3)]);

        assert!(matches!(
            serialize(&assignments, ctx),
            Err(Error::InvalidConstraintBuilder(_))
        ));
    }

    #[test]
    fn test_unmapped_type_and_unknown_column() {
        let schema = schema();
        let ctx = SerializeContext::new(&schema);

        assert!(matches!(
            serialize(&Expr::column::<Unmapped>("x"), ctx),
            Err(Error::TypeNotMapped(_))
        ));
        assert_eq!(
            serialize(&Expr::column::<Employee>("salary"), ctx),
            Err(Error::ColumnNotFound {
                table: "employees".into(),
                column: "salary".into()
            })
        );
    }

    #[test]
    fn test_literals() {
        let schema = schema();
        let ctx = SerializeContext::new(&schema);

        assert_eq!(serialize(&lit("it's"), ctx).unwrap(), "'it''s'");
        assert_eq!(serialize(&lit(true), ctx).unwrap(), "1");
        assert_eq!(serialize(&lit(2.5), ctx).unwrap(), "2.5");
        assert_eq!(serialize(&lit(Option::<i64>::None), ctx).unwrap(), "NULL");
    }
}
