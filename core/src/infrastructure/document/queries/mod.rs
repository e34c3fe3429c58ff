//! Dynamic SQL construction for collection queries.
//!
//! Collections have no static sea-orm entities; statements are assembled
//! with `sea_query` against the table layout derived from the collection
//! schema and executed as raw statements through the connection.

use std::collections::BTreeMap;

use sea_orm::sea_query::{
    Alias, ColumnRef, IntoColumnRef, JoinType, Order, SelectStatement, SimpleExpr,
};

pub mod build_query;
pub mod column_path;
pub mod filter;
pub mod order_by;

pub use build_query::build_list_query;
pub use column_path::resolve_column_path;
pub use filter::build_where;
pub use order_by::{SortOptions, build_order_by};

/// SQL-level type of a resolved column, used to pick sort eligibility and
/// filter value parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Number,
    Checkbox,
    Date,
    Json,
    Uuid,
    Timestamp,
}

impl ColumnKind {
    /// `jsonb` has no useful total order; everything else sorts.
    pub fn is_sortable(self) -> bool {
        !matches!(self, ColumnKind::Json)
    }
}

/// A field path resolved to a concrete column on a concrete table (the
/// collection table, its locales sibling, or a joined relation).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumn {
    pub table_name: String,
    pub column_name: String,
    pub kind: ColumnKind,
}

impl ResolvedColumn {
    pub fn column_ref(&self) -> ColumnRef {
        (Alias::new(&self.table_name), Alias::new(&self.column_name)).into_column_ref()
    }
}

/// A join required to reach a resolved column.
#[derive(Debug, Clone)]
pub struct JoinEntry {
    pub table: String,
    pub alias: Option<String>,
    pub on: SimpleExpr,
}

impl JoinEntry {
    /// Joins are deduplicated by the name they are visible under.
    pub fn key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.table)
    }
}

/// Mutable build state threaded through query construction: the primary
/// table plus the join and select-column side effects of path resolution.
#[derive(Debug)]
pub struct QueryScope {
    pub table_name: String,
    pub joins: Vec<JoinEntry>,
    pub select_fields: BTreeMap<String, ResolvedColumn>,
}

impl QueryScope {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            joins: Vec::new(),
            select_fields: BTreeMap::new(),
        }
    }

    pub fn add_join(&mut self, entry: JoinEntry) {
        if !self.joins.iter().any(|j| j.key() == entry.key()) {
            self.joins.push(entry);
        }
    }
}

/// A pre-built ordering expression that overrides the computed asc/desc
/// comparator for every resolved sort token.
#[derive(Debug, Clone)]
pub struct RawSort {
    pub expr: SimpleExpr,
    pub order: Order,
}

/// One entry of the final ordering list.
#[derive(Debug, Clone)]
pub enum OrderByClause {
    Column {
        table: String,
        column: String,
        order: Order,
    },
    Raw {
        expr: SimpleExpr,
        order: Order,
    },
}

pub(crate) fn apply_joins(select: &mut SelectStatement, joins: &[JoinEntry]) {
    for join in joins {
        match &join.alias {
            Some(alias) => {
                select.join_as(
                    JoinType::LeftJoin,
                    Alias::new(&join.table),
                    Alias::new(alias),
                    join.on.clone(),
                );
            }
            None => {
                select.join(JoinType::LeftJoin, Alias::new(&join.table), join.on.clone());
            }
        }
    }
}
