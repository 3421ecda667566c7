//! Abstract Syntax Tree (AST) types for SQL expressions and statements.

mod expression;
mod statement;

pub use expression::{
    BinaryOp, BuiltinFunction, ColumnRef, Expr, FunctionCall, IntoExpr, TableKey, UnaryOp,
};
pub use statement::{Clause, Limit, OrderDirection, OrderTerm, Select};
