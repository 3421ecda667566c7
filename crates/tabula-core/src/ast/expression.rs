//! Expression AST types.

use std::any::TypeId;

use super::statement::Select;
use crate::value::{SqlValue, ToSqlValue};

/// Identity of a mapped Rust type, used by column references to find their
/// table through the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableKey {
    id: TypeId,
    type_name: &'static str,
}

impl TableKey {
    /// Returns the key of the mapped type `T`.
    #[must_use]
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Returns the `TypeId` of the mapped type.
    #[must_use]
    pub const fn type_id(&self) -> TypeId {
        self.id
    }

    /// Returns the Rust type name of the mapped type.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }
}

/// A reference to a mapped column: the owning type plus the column name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    /// Owning mapped type.
    pub table: TableKey,
    /// Column name as declared in the table.
    pub name: String,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Logical
    And,
    Or,

    // String
    Concat,

    /// `=` inside a SET clause.
    Assign,
}

impl BinaryOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Concat => "||",
            Self::Assign => "=",
        }
    }

    /// Returns `true` for `AND` and `OR`.
    #[must_use]
    pub const fn is_logical(&self) -> bool {
        matches!(self, Self::And | Self::Or)
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Negation (-)
    Neg,
    /// Logical NOT
    Not,
    /// Bitwise NOT (~)
    BitNot,
    /// Postfix IS NULL
    IsNull,
    /// Postfix IS NOT NULL
    IsNotNull,
}

impl UnaryOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Not => "NOT",
            Self::BitNot => "~",
            Self::IsNull => "IS NULL",
            Self::IsNotNull => "IS NOT NULL",
        }
    }

    /// Returns `true` when the operator follows its operand.
    #[must_use]
    pub const fn is_postfix(&self) -> bool {
        matches!(self, Self::IsNull | Self::IsNotNull)
    }
}

/// Built-in SQL functions with a fixed keyword each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinFunction {
    // Aggregates
    Count,
    Sum,
    Avg,
    Min,
    Max,
    Total,
    GroupConcat,

    // Scalars
    Abs,
    Length,
    Lower,
    Upper,
    Trim,
    Ltrim,
    Rtrim,
    Round,
    Coalesce,
    Ifnull,
    Nullif,
    Random,
    Typeof,
    Substr,
    Replace,
    Instr,
    Date,
    Time,
    Datetime,
    Julianday,
}

impl BuiltinFunction {
    /// Returns the SQL keyword of the function.
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Count => "COUNT",
            Self::Sum => "SUM",
            Self::Avg => "AVG",
            Self::Min => "MIN",
            Self::Max => "MAX",
            Self::Total => "TOTAL",
            Self::GroupConcat => "GROUP_CONCAT",
            Self::Abs => "ABS",
            Self::Length => "LENGTH",
            Self::Lower => "LOWER",
            Self::Upper => "UPPER",
            Self::Trim => "TRIM",
            Self::Ltrim => "LTRIM",
            Self::Rtrim => "RTRIM",
            Self::Round => "ROUND",
            Self::Coalesce => "COALESCE",
            Self::Ifnull => "IFNULL",
            Self::Nullif => "NULLIF",
            Self::Random => "RANDOM",
            Self::Typeof => "TYPEOF",
            Self::Substr => "SUBSTR",
            Self::Replace => "REPLACE",
            Self::Instr => "INSTR",
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::Datetime => "DATETIME",
            Self::Julianday => "JULIANDAY",
        }
    }
}

/// A function call expression.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    /// The function.
    pub function: BuiltinFunction,
    /// The arguments, in call order.
    pub args: Vec<Expr>,
    /// Whether DISTINCT was specified.
    pub distinct: bool,
}

/// An SQL expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value, inlined into the SQL text.
    Literal(SqlValue),

    /// A mapped column.
    Column(ColumnRef),

    /// `*`, only meaningful as a function argument or select column.
    Wildcard,

    /// A binary expression.
    Binary {
        /// Left operand.
        left: Box<Expr>,
        /// Operator.
        op: BinaryOp,
        /// Right operand.
        right: Box<Expr>,
    },

    /// A unary expression.
    Unary {
        /// Operator.
        op: UnaryOp,
        /// Operand.
        operand: Box<Expr>,
    },

    /// A function call.
    Function(FunctionCall),

    /// A subquery.
    Subquery(Box<Select>),

    /// A comma separated list of expressions.
    List(Vec<Expr>),

    /// IN / NOT IN.
    In {
        /// The expression to test.
        expr: Box<Expr>,
        /// A list, a subquery, a column or a scalar.
        target: Box<Expr>,
        /// Whether this is NOT IN.
        negated: bool,
    },

    /// LIKE / NOT LIKE.
    Like {
        /// The expression to match.
        expr: Box<Expr>,
        /// The pattern.
        pattern: Box<Expr>,
        /// Whether this is NOT LIKE.
        negated: bool,
    },

    /// GLOB.
    Glob {
        /// The expression to match.
        expr: Box<Expr>,
        /// The pattern.
        pattern: Box<Expr>,
    },

    /// BETWEEN / NOT BETWEEN.
    Between {
        /// The expression to check.
        expr: Box<Expr>,
        /// Lower bound.
        low: Box<Expr>,
        /// Upper bound.
        high: Box<Expr>,
        /// Whether this is NOT BETWEEN.
        negated: bool,
    },

    /// The assignment list of an UPDATE. Every element is a
    /// [`BinaryOp::Assign`] node whose left side is a column.
    Assignments(Vec<Expr>),
}

/// Conversion into an expression node.
///
/// Plain values become literals, [`Select`] becomes a subquery and arrays or
/// vectors of values become a list.
pub trait IntoExpr {
    /// Converts `self` into an expression.
    fn into_expr(self) -> Expr;
}

impl IntoExpr for Expr {
    fn into_expr(self) -> Expr {
        self
    }
}

impl IntoExpr for ColumnRef {
    fn into_expr(self) -> Expr {
        Expr::Column(self)
    }
}

impl IntoExpr for Select {
    fn into_expr(self) -> Expr {
        Expr::Subquery(Box::new(self))
    }
}

impl IntoExpr for SqlValue {
    fn into_expr(self) -> Expr {
        Expr::Literal(self)
    }
}

impl<T: ToSqlValue> IntoExpr for Option<T> {
    fn into_expr(self) -> Expr {
        Expr::Literal(self.to_sql_value())
    }
}

impl<T: ToSqlValue> IntoExpr for Vec<T> {
    fn into_expr(self) -> Expr {
        Expr::List(
            self.into_iter()
                .map(|v| Expr::Literal(v.to_sql_value()))
                .collect(),
        )
    }
}

impl<T: ToSqlValue, const N: usize> IntoExpr for [T; N] {
    fn into_expr(self) -> Expr {
        Expr::List(
            self.into_iter()
                .map(|v| Expr::Literal(v.to_sql_value()))
                .collect(),
        )
    }
}

macro_rules! impl_into_expr_literal {
    ($($ty:ty),+) => {
        $(
            impl IntoExpr for $ty {
                fn into_expr(self) -> Expr {
                    Expr::Literal(self.to_sql_value())
                }
            }
        )+
    };
}

impl_into_expr_literal!(bool, i64, i32, i16, i8, u32, u16, u8, f64, f32, String, &str);

impl From<ColumnRef> for Expr {
    fn from(column: ColumnRef) -> Self {
        Self::Column(column)
    }
}

impl Expr {
    /// Creates a reference to column `name` of the mapped type `T`.
    #[must_use]
    pub fn column<T: 'static>(name: impl Into<String>) -> Self {
        Self::Column(ColumnRef {
            table: TableKey::of::<T>(),
            name: name.into(),
        })
    }

    /// Creates a literal.
    #[must_use]
    pub fn literal<T: ToSqlValue>(value: T) -> Self {
        Self::Literal(value.to_sql_value())
    }

    /// Creates a binary expression.
    #[must_use]
    pub fn binary(self, op: BinaryOp, right: impl IntoExpr) -> Self {
        Self::Binary {
            left: Box::new(self),
            op,
            right: Box::new(right.into_expr()),
        }
    }

    fn unary(self, op: UnaryOp) -> Self {
        Self::Unary {
            op,
            operand: Box::new(self),
        }
    }

    /// Creates an equality expression (`==`).
    #[must_use]
    pub fn eq(self, right: impl IntoExpr) -> Self {
        self.binary(BinaryOp::Eq, right)
    }

    /// Creates an inequality expression.
    #[must_use]
    pub fn not_eq(self, right: impl IntoExpr) -> Self {
        self.binary(BinaryOp::NotEq, right)
    }

    /// Creates a less-than expression.
    #[must_use]
    pub fn lt(self, right: impl IntoExpr) -> Self {
        self.binary(BinaryOp::Lt, right)
    }

    /// Creates a less-than-or-equal expression.
    #[must_use]
    pub fn lt_eq(self, right: impl IntoExpr) -> Self {
        self.binary(BinaryOp::LtEq, right)
    }

    /// Creates a greater-than expression.
    #[must_use]
    pub fn gt(self, right: impl IntoExpr) -> Self {
        self.binary(BinaryOp::Gt, right)
    }

    /// Creates a greater-than-or-equal expression.
    #[must_use]
    pub fn gt_eq(self, right: impl IntoExpr) -> Self {
        self.binary(BinaryOp::GtEq, right)
    }

    /// Creates an AND expression.
    #[must_use]
    pub fn and(self, right: impl IntoExpr) -> Self {
        self.binary(BinaryOp::And, right)
    }

    /// Creates an OR expression.
    #[must_use]
    pub fn or(self, right: impl IntoExpr) -> Self {
        self.binary(BinaryOp::Or, right)
    }

    /// Creates an addition.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn add(self, right: impl IntoExpr) -> Self {
        self.binary(BinaryOp::Add, right)
    }

    /// Creates a subtraction.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn sub(self, right: impl IntoExpr) -> Self {
        self.binary(BinaryOp::Sub, right)
    }

    /// Creates a multiplication.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn mul(self, right: impl IntoExpr) -> Self {
        self.binary(BinaryOp::Mul, right)
    }

    /// Creates a division.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn div(self, right: impl IntoExpr) -> Self {
        self.binary(BinaryOp::Div, right)
    }

    /// Creates a modulo expression.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn rem(self, right: impl IntoExpr) -> Self {
        self.binary(BinaryOp::Mod, right)
    }

    /// Creates a string concatenation (`||`).
    #[must_use]
    pub fn concat(self, right: impl IntoExpr) -> Self {
        self.binary(BinaryOp::Concat, right)
    }

    /// Creates an assignment for an UPDATE SET clause.
    #[must_use]
    pub fn assign(self, value: impl IntoExpr) -> Self {
        self.binary(BinaryOp::Assign, value)
    }

    /// Negates the expression with NOT.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        self.unary(UnaryOp::Not)
    }

    /// Arithmetic negation.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn neg(self) -> Self {
        self.unary(UnaryOp::Neg)
    }

    /// Bitwise complement.
    #[must_use]
    pub fn bit_not(self) -> Self {
        self.unary(UnaryOp::BitNot)
    }

    /// Creates an IS NULL expression.
    #[must_use]
    pub fn is_null(self) -> Self {
        self.unary(UnaryOp::IsNull)
    }

    /// Creates an IS NOT NULL expression.
    #[must_use]
    pub fn is_not_null(self) -> Self {
        self.unary(UnaryOp::IsNotNull)
    }

    /// Creates an IN expression. The target may be a list, a subquery, a
    /// column or a scalar.
    #[must_use]
    pub fn is_in(self, target: impl IntoExpr) -> Self {
        Self::In {
            expr: Box::new(self),
            target: Box::new(target.into_expr()),
            negated: false,
        }
    }

    /// Creates a NOT IN expression.
    #[must_use]
    pub fn not_in(self, target: impl IntoExpr) -> Self {
        Self::In {
            expr: Box::new(self),
            target: Box::new(target.into_expr()),
            negated: true,
        }
    }

    /// Creates a LIKE expression.
    #[must_use]
    pub fn like(self, pattern: impl IntoExpr) -> Self {
        Self::Like {
            expr: Box::new(self),
            pattern: Box::new(pattern.into_expr()),
            negated: false,
        }
    }

    /// Creates a NOT LIKE expression.
    #[must_use]
    pub fn not_like(self, pattern: impl IntoExpr) -> Self {
        Self::Like {
            expr: Box::new(self),
            pattern: Box::new(pattern.into_expr()),
            negated: true,
        }
    }

    /// Creates a GLOB expression.
    #[must_use]
    pub fn glob(self, pattern: impl IntoExpr) -> Self {
        Self::Glob {
            expr: Box::new(self),
            pattern: Box::new(pattern.into_expr()),
        }
    }

    /// Creates a BETWEEN expression.
    #[must_use]
    pub fn between(self, low: impl IntoExpr, high: impl IntoExpr) -> Self {
        Self::Between {
            expr: Box::new(self),
            low: Box::new(low.into_expr()),
            high: Box::new(high.into_expr()),
            negated: false,
        }
    }

    /// Creates a NOT BETWEEN expression.
    #[must_use]
    pub fn not_between(self, low: impl IntoExpr, high: impl IntoExpr) -> Self {
        Self::Between {
            expr: Box::new(self),
            low: Box::new(low.into_expr()),
            high: Box::new(high.into_expr()),
            negated: true,
        }
    }

    /// Visits this node and every descendant exactly once, preorder.
    ///
    /// Expressions nested inside a subquery are visited as well.
    pub fn walk<F: FnMut(&Self)>(&self, f: &mut F) {
        self.visit(f, true);
    }

    /// Like [`walk`](Self::walk) but does not descend into subqueries.
    pub fn walk_outer<F: FnMut(&Self)>(&self, f: &mut F) {
        self.visit(f, false);
    }

    pub(crate) fn visit<F: FnMut(&Self)>(&self, f: &mut F, into_subqueries: bool) {
        f(self);
        match self {
            Self::Literal(_) | Self::Column(_) | Self::Wildcard => {}
            Self::Binary { left, right, .. } => {
                left.visit(f, into_subqueries);
                right.visit(f, into_subqueries);
            }
            Self::Unary { operand, .. } => operand.visit(f, into_subqueries),
            Self::Function(call) => {
                for arg in &call.args {
                    arg.visit(f, into_subqueries);
                }
            }
            Self::Subquery(select) => {
                if into_subqueries {
                    select.visit(f, true);
                }
            }
            Self::List(items) | Self::Assignments(items) => {
                for item in items {
                    item.visit(f, into_subqueries);
                }
            }
            Self::In { expr, target, .. } => {
                expr.visit(f, into_subqueries);
                target.visit(f, into_subqueries);
            }
            Self::Like { expr, pattern, .. } | Self::Glob { expr, pattern } => {
                expr.visit(f, into_subqueries);
                pattern.visit(f, into_subqueries);
            }
            Self::Between {
                expr, low, high, ..
            } => {
                expr.visit(f, into_subqueries);
                low.visit(f, into_subqueries);
                high.visit(f, into_subqueries);
            }
        }
    }

    /// Returns the distinct tables referenced by columns outside of
    /// subqueries, in first-seen order.
    #[must_use]
    pub fn referenced_tables(&self) -> Vec<TableKey> {
        let mut tables = Vec::new();
        self.walk_outer(&mut |node| {
            if let Self::Column(column) = node {
                if !tables.contains(&column.table) {
                    tables.push(column.table);
                }
            }
        });
        tables
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct User;

    #[test]
    fn test_expr_chaining() {
        let expr = Expr::column::<User>("age")
            .gt(18)
            .and(Expr::column::<User>("status").eq("active"));

        assert!(matches!(
            expr,
            Expr::Binary {
                op: BinaryOp::And,
                ..
            }
        ));
    }

    #[test]
    fn test_walk_is_preorder_and_complete() {
        let expr = Expr::column::<User>("a")
            .eq(1)
            .and(Expr::column::<User>("b").is_in([1, 2]));

        let mut seen = Vec::new();
        expr.walk(&mut |node| {
            seen.push(match node {
                Expr::Binary { op, .. } => op.as_str().to_string(),
                Expr::Column(c) => c.name.clone(),
                Expr::Literal(v) => v.to_sql_inline(),
                Expr::In { .. } => String::from("IN"),
                Expr::List(_) => String::from("LIST"),
                other => format!("{other:?}"),
            });
        });

        assert_eq!(
            seen,
            vec!["AND", "==", "a", "1", "IN", "b", "LIST", "1", "2"]
        );
    }

    #[test]
    fn test_referenced_tables_skips_subqueries() {
        struct Other;

        let inner = Select::new(vec![Expr::column::<Other>("id")]);
        let expr = Expr::column::<User>("id").is_in(inner);

        assert_eq!(expr.referenced_tables(), vec![TableKey::of::<User>()]);

        let mut all = 0;
        expr.walk(&mut |node| {
            if matches!(node, Expr::Column(_)) {
                all += 1;
            }
        });
        assert_eq!(all, 2);
    }

    #[test]
    fn test_into_expr_list() {
        let list = vec![1_i64, 2, 3].into_expr();
        assert_eq!(
            list,
            Expr::List(vec![
                Expr::Literal(SqlValue::Int(1)),
                Expr::Literal(SqlValue::Int(2)),
                Expr::Literal(SqlValue::Int(3)),
            ])
        );
    }
}
