//! SELECT statements and the clauses callers append to statements.

use super::expression::{Expr, IntoExpr, TableKey};

/// Sort direction in ORDER BY (also used for primary-key ordering hints).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

impl OrderDirection {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// One term of an ORDER BY clause.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderTerm {
    /// Expression to sort by.
    pub expr: Expr,
    /// Explicit direction, if any.
    pub direction: Option<OrderDirection>,
}

impl OrderTerm {
    /// Sorts by `expr` without an explicit direction.
    #[must_use]
    pub fn new(expr: impl IntoExpr) -> Self {
        Self {
            expr: expr.into_expr(),
            direction: None,
        }
    }

    /// Sorts ascending.
    #[must_use]
    pub fn asc(mut self) -> Self {
        self.direction = Some(OrderDirection::Asc);
        self
    }

    /// Sorts descending.
    #[must_use]
    pub fn desc(mut self) -> Self {
        self.direction = Some(OrderDirection::Desc);
        self
    }
}

impl From<Expr> for OrderTerm {
    fn from(expr: Expr) -> Self {
        Self::new(expr)
    }
}

/// LIMIT clause shapes.
///
/// `WithOffset` and `Comma` are kept apart: they render differently and the
/// comma form places the offset first.
#[derive(Debug, Clone, PartialEq)]
pub enum Limit {
    /// `LIMIT n`
    Count(Expr),
    /// `LIMIT n OFFSET m`
    WithOffset {
        /// Maximum number of rows.
        limit: Expr,
        /// Rows to skip.
        offset: Expr,
    },
    /// `LIMIT a, b`
    Comma {
        /// First argument.
        first: Expr,
        /// Second argument.
        second: Expr,
    },
}

/// A clause appended after the head of a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    /// `FROM t1, t2`
    From(Vec<TableKey>),
    /// `WHERE expr`
    Where(Expr),
    /// `GROUP BY a, b`
    GroupBy(Vec<Expr>),
    /// `HAVING expr`
    Having(Expr),
    /// `ORDER BY a [ASC|DESC], ...`
    OrderBy(Vec<OrderTerm>),
    /// `LIMIT ...`
    Limit(Limit),
}

impl Clause {
    pub(crate) fn visit<F: FnMut(&Expr)>(&self, f: &mut F, into_subqueries: bool) {
        match self {
            Self::From(_) => {}
            Self::Where(expr) | Self::Having(expr) => expr.visit(f, into_subqueries),
            Self::GroupBy(exprs) => {
                for expr in exprs {
                    expr.visit(f, into_subqueries);
                }
            }
            Self::OrderBy(terms) => {
                for term in terms {
                    term.expr.visit(f, into_subqueries);
                }
            }
            Self::Limit(Limit::Count(expr)) => expr.visit(f, into_subqueries),
            Self::Limit(
                Limit::WithOffset {
                    limit: a,
                    offset: b,
                }
                | Limit::Comma {
                    first: a,
                    second: b,
                },
            ) => {
                a.visit(f, into_subqueries);
                b.visit(f, into_subqueries);
            }
        }
    }

    /// Visits every expression of the clause, preorder.
    pub fn walk<F: FnMut(&Expr)>(&self, f: &mut F) {
        self.visit(f, true);
    }
}

/// A SELECT statement: result columns followed by clauses in caller order.
#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    /// Whether DISTINCT was specified.
    pub distinct: bool,
    /// Result columns.
    pub columns: Vec<Expr>,
    /// Clauses, serialized in the order given.
    pub clauses: Vec<Clause>,
}

impl Select {
    /// Creates a SELECT of the given result columns.
    #[must_use]
    pub fn new(columns: Vec<Expr>) -> Self {
        Self {
            distinct: false,
            columns,
            clauses: vec![],
        }
    }

    /// Sets DISTINCT.
    #[must_use]
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Appends a clause.
    #[must_use]
    pub fn clause(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }

    /// Appends several clauses.
    #[must_use]
    pub fn clauses(mut self, clauses: impl IntoIterator<Item = Clause>) -> Self {
        self.clauses.extend(clauses);
        self
    }

    /// Returns `true` if the caller supplied a FROM clause.
    #[must_use]
    pub fn has_from(&self) -> bool {
        self.clauses.iter().any(|c| matches!(c, Clause::From(_)))
    }

    /// Returns the tables referenced by this statement's own columns and
    /// clauses (not by nested subqueries), in first-seen order.
    #[must_use]
    pub fn referenced_tables(&self) -> Vec<TableKey> {
        let mut tables = Vec::new();
        self.visit(
            &mut |node| {
                if let Expr::Column(column) = node {
                    if !tables.contains(&column.table) {
                        tables.push(column.table);
                    }
                }
            },
            false,
        );
        tables
    }

    /// Returns a copy with a FROM clause listing the referenced tables placed
    /// before the caller's clauses, unless a FROM clause is already present
    /// or no table is referenced.
    #[must_use]
    pub fn with_deduced_from(&self) -> Self {
        let tables = self.referenced_tables();
        if self.has_from() || tables.is_empty() {
            return self.clone();
        }
        let mut clauses = Vec::with_capacity(self.clauses.len() + 1);
        clauses.push(Clause::From(tables));
        clauses.extend(self.clauses.iter().cloned());
        Self {
            distinct: self.distinct,
            columns: self.columns.clone(),
            clauses,
        }
    }

    pub(crate) fn visit<F: FnMut(&Expr)>(&self, f: &mut F, into_subqueries: bool) {
        for column in &self.columns {
            column.visit(f, into_subqueries);
        }
        for clause in &self.clauses {
            clause.visit(f, into_subqueries);
        }
    }

    /// Visits every expression of the statement, preorder.
    pub fn walk<F: FnMut(&Expr)>(&self, f: &mut F) {
        self.visit(f, true);
    }
}
