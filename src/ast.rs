//! Filter AST types.
//!
//! The building blocks shared by the transformer, the pipeline and the
//! query builders: declared types, operators, typed values and conditions.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Declared semantic type of a filter parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKey {
    #[default]
    String,
    Number,
    Float,
    Bool,
    Date,
    /// Any name we don't know. Coerces as an identity pass-through.
    #[serde(other)]
    Unknown,
}

impl TypeKey {
    pub fn name(&self) -> &'static str {
        match self {
            TypeKey::String => "string",
            TypeKey::Number => "number",
            TypeKey::Float => "float",
            TypeKey::Bool => "bool",
            TypeKey::Date => "date",
            TypeKey::Unknown => "unknown",
        }
    }
}

impl From<&str> for TypeKey {
    fn from(name: &str) -> Self {
        match name {
            "string" => TypeKey::String,
            "number" => TypeKey::Number,
            "float" => TypeKey::Float,
            "bool" => TypeKey::Bool,
            "date" => TypeKey::Date,
            _ => TypeKey::Unknown,
        }
    }
}

impl FromStr for TypeKey {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(TypeKey::from(s))
    }
}

impl std::fmt::Display for TypeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Comparison operator of a condition.
///
/// Serialized as its canonical symbol (`>=`, `NOT LIKE`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Operator {
    #[default]
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Lte,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = "LIKE")]
    Like,
    #[serde(rename = "NOT LIKE")]
    NotLike,
    #[serde(rename = "IN")]
    In,
    #[serde(rename = "NOT IN")]
    NotIn,
    #[serde(rename = "BETWEEN")]
    Between,
}

impl Operator {
    /// Every operator, in prefix-table order.
    pub const ALL: [Operator; 11] = [
        Operator::Eq,
        Operator::Gt,
        Operator::Gte,
        Operator::Lt,
        Operator::Lte,
        Operator::Ne,
        Operator::Like,
        Operator::NotLike,
        Operator::In,
        Operator::NotIn,
        Operator::Between,
    ];

    /// Look up the operator written before the `:` of a raw token.
    ///
    /// Equality has no prefix, so `"="` is not recognized here.
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            ">" => Some(Operator::Gt),
            ">=" => Some(Operator::Gte),
            "<" => Some(Operator::Lt),
            "<=" => Some(Operator::Lte),
            "!=" => Some(Operator::Ne),
            "~" => Some(Operator::Like),
            "!~" => Some(Operator::NotLike),
            "in" => Some(Operator::In),
            "!in" => Some(Operator::NotIn),
            "><" => Some(Operator::Between),
            _ => None,
        }
    }

    /// The prefix a client writes before `:` to select this operator.
    pub fn prefix(&self) -> Option<&'static str> {
        match self {
            Operator::Eq => None,
            Operator::Gt => Some(">"),
            Operator::Gte => Some(">="),
            Operator::Lt => Some("<"),
            Operator::Lte => Some("<="),
            Operator::Ne => Some("!="),
            Operator::Like => Some("~"),
            Operator::NotLike => Some("!~"),
            Operator::In => Some("in"),
            Operator::NotIn => Some("!in"),
            Operator::Between => Some("><"),
        }
    }

    /// Canonical symbol handed to the query builder.
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::Ne => "!=",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT LIKE",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::Between => "BETWEEN",
        }
    }

    /// Operators whose payload is a comma-separated list.
    pub fn takes_list(&self) -> bool {
        matches!(self, Operator::In | Operator::NotIn | Operator::Between)
    }

    /// Operators whose value gets `%` wildcards on both sides.
    pub fn is_pattern(&self) -> bool {
        matches!(self, Operator::Like | Operator::NotLike)
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A typed filter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    /// Ordered values of `IN`, `NOT IN` and `BETWEEN`.
    List(Vec<Value>),
}

impl Value {
    /// Plain text form, without SQL quoting.
    pub fn as_text(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::List(items) => items
                .iter()
                .map(Value::as_text)
                .collect::<Vec<_>>()
                .join(","),
            other => other.to_string(),
        }
    }
}

/// SQL literal preview.
impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Value::List(items) => {
                write!(f, "(")?;
                for (i, v) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

/// Target field(s) of a filter: a bare name or an OR-combined list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Fields {
    One(String),
    Many(Vec<String>),
}

impl Fields {
    /// Normalized, ordered view of the field names.
    pub fn as_slice(&self) -> &[String] {
        match self {
            Fields::One(field) => std::slice::from_ref(field),
            Fields::Many(fields) => fields,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

impl From<&str> for Fields {
    fn from(field: &str) -> Self {
        Fields::One(field.to_string())
    }
}

impl From<String> for Fields {
    fn from(field: String) -> Self {
        Fields::One(field)
    }
}

impl From<Vec<String>> for Fields {
    fn from(fields: Vec<String>) -> Self {
        Fields::Many(fields)
    }
}

impl From<Vec<&str>> for Fields {
    fn from(fields: Vec<&str>) -> Self {
        Fields::Many(fields.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Fields {
    fn from(fields: [&str; N]) -> Self {
        Fields::Many(fields.iter().map(|f| f.to_string()).collect())
    }
}

/// One `field OP value` condition, as passed to `or_where`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub field: String,
    pub op: Operator,
    pub value: Value,
    pub prefix_field: bool,
}

impl Condition {
    pub fn new(field: impl Into<String>, op: Operator, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
            prefix_field: true,
        }
    }

    /// Set whether the query builder may qualify the field.
    pub fn prefixed(mut self, prefix_field: bool) -> Self {
        self.prefix_field = prefix_field;
        self
    }
}
