//! SQL preview of applied filters.
//!
//! [`WhereBuilder`] is a [`QueryBuilder`] that records what it is given and
//! renders it as a WHERE clause. Nothing here executes SQL.

use serde::Serialize;

use crate::ast::{Condition, Operator, Value};
use crate::filter::QueryBuilder;

/// Trait for converting filter nodes to SQL.
pub trait ToSql {
    /// Convert this node to a SQL string.
    fn to_sql(&self) -> String;
}

/// One recorded call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Clause {
    Where(Condition),
    OrWhere { conditions: Vec<Condition> },
}

/// Records filter calls; qualifies prefixed fields with `table`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WhereBuilder {
    table: Option<String>,
    clauses: Vec<Clause>,
}

impl WhereBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Qualify unprefixed fields as `table.field`.
    pub fn for_table(table: impl Into<String>) -> Self {
        Self {
            table: Some(table.into()),
            clauses: Vec::new(),
        }
    }

    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Render a single clause with this builder's qualification.
    pub fn clause_sql(&self, clause: &Clause) -> String {
        match clause {
            Clause::Where(cond) => self.condition_sql(cond),
            Clause::OrWhere { conditions } => {
                let parts: Vec<String> =
                    conditions.iter().map(|c| self.condition_sql(c)).collect();
                // Wrap OR groups in parentheses for correct precedence
                if parts.len() > 1 {
                    format!("({})", parts.join(" OR "))
                } else {
                    parts.join("")
                }
            }
        }
    }

    fn qualified(&self, cond: &Condition) -> String {
        match &self.table {
            Some(table) if cond.prefix_field && !cond.field.contains('.') => {
                format!("{}.{}", table, cond.field)
            }
            _ => cond.field.clone(),
        }
    }

    fn condition_sql(&self, cond: &Condition) -> String {
        let column = self.qualified(cond);
        match (cond.op, &cond.value) {
            (Operator::Between, Value::List(items)) if items.len() == 2 => {
                format!("{} BETWEEN {} AND {}", column, items[0], items[1])
            }
            (Operator::In | Operator::NotIn, Value::List(_)) => {
                format!("{} {} {}", column, cond.op, cond.value)
            }
            (Operator::In | Operator::NotIn, _) => {
                format!("{} {} ({})", column, cond.op, cond.value)
            }
            (op, value) => format!("{} {} {}", column, op, value),
        }
    }
}

impl QueryBuilder for WhereBuilder {
    fn and_where(&mut self, field: &str, op: Operator, value: Value, prefix_field: bool) {
        self.clauses.push(Clause::Where(Condition {
            field: field.to_string(),
            op,
            value,
            prefix_field,
        }));
    }

    fn or_where(&mut self, conditions: Vec<Condition>) {
        self.clauses.push(Clause::OrWhere { conditions });
    }
}

impl ToSql for WhereBuilder {
    /// Clauses joined with AND, prefixed by `WHERE`. Empty when nothing
    /// was recorded.
    fn to_sql(&self) -> String {
        if self.clauses.is_empty() {
            return String::new();
        }
        let parts: Vec<String> = self.clauses.iter().map(|c| self.clause_sql(c)).collect();
        format!("WHERE {}", parts.join(" AND "))
    }
}

impl ToSql for Condition {
    fn to_sql(&self) -> String {
        WhereBuilder::new().condition_sql(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Fields, TypeKey};
    use crate::filter::{apply_filters, parse_filters, AllowedFilters, FilterConfig};

    fn allowed() -> AllowedFilters {
        AllowedFilters::from([
            ("status".to_string(), FilterConfig::new("state")),
            (
                "age".to_string(),
                FilterConfig::new("age").kind(TypeKey::Number),
            ),
            (
                "q".to_string(),
                FilterConfig::new(Fields::from(["name", "email"])),
            ),
            (
                "owner".to_string(),
                FilterConfig::new("owners.name").prefix_field(false),
            ),
        ])
    }

    #[test]
    fn test_empty() {
        assert_eq!(WhereBuilder::new().to_sql(), "");
    }

    #[test]
    fn test_single_condition() {
        let filters = parse_filters([("status", "active")], &allowed());
        let mut builder = WhereBuilder::new();
        apply_filters(&mut builder, &filters);
        assert_eq!(builder.to_sql(), "WHERE state = 'active'");
    }

    #[test]
    fn test_or_group() {
        let filters = parse_filters([("q", "~:ann")], &allowed());
        let mut builder = WhereBuilder::new();
        apply_filters(&mut builder, &filters);
        assert_eq!(
            builder.to_sql(),
            "WHERE (name LIKE '%ann%' OR email LIKE '%ann%')"
        );
    }

    #[test]
    fn test_table_prefix() {
        let filters = parse_filters(
            [("age", "><:18,30"), ("owner", "!=:bob"), ("status", "in:a,b")],
            &allowed(),
        );
        let mut builder = WhereBuilder::for_table("users");
        apply_filters(&mut builder, &filters);
        assert_eq!(
            builder.to_sql(),
            "WHERE users.age BETWEEN 18 AND 30 AND owners.name != 'bob' AND users.state IN ('a', 'b')"
        );
    }

    #[test]
    fn test_condition_to_sql() {
        assert_eq!(
            Condition::new("id", Operator::NotIn, 7).to_sql(),
            "id NOT IN (7)"
        );
        assert_eq!(
            Condition::new("n", Operator::Between, vec![1]).to_sql(),
            "n BETWEEN (1)"
        );
    }

    #[test]
    fn test_clauses_serialize() {
        let mut builder = WhereBuilder::new();
        builder.and_where("a", Operator::Gte, Value::Int(1), true);
        let json = serde_json::to_value(builder.clauses()).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"kind": "where", "field": "a", "op": ">=", "value": 1, "prefix_field": true}
            ])
        );
    }
}
