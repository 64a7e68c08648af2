//! Query parameters to filter descriptors, and descriptors to WHERE calls.
//!
//! ```text
//! ?status=active&q=~:smith&junk=1
//!        │            │        └── not in the allow-list, dropped
//!        │            └── q → [name, email]  → or_where([...LIKE...])
//!        └── status → state                  → and_where(state = 'active')
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::ast::{Condition, Fields, Operator, TypeKey, Value};
use crate::transform::get_operator_and_typed_value;

/// Where filter conditions end up.
///
/// `and_where` adds one condition; `or_where` adds a group of conditions
/// that are OR-combined with each other. Qualifying a field when
/// `prefix_field` is set is up to the implementation.
pub trait QueryBuilder {
    fn and_where(&mut self, field: &str, op: Operator, value: Value, prefix_field: bool);

    fn or_where(&mut self, conditions: Vec<Condition>);
}

/// Allow-list entry for one query parameter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Target field(s). Defaults to the parameter name.
    #[serde(default)]
    pub fields: Option<Fields>,

    #[serde(rename = "type", default)]
    pub kind: Option<TypeKey>,

    #[serde(default)]
    pub prefix_field: Option<bool>,
}

impl FilterConfig {
    pub fn new(fields: impl Into<Fields>) -> Self {
        Self {
            fields: Some(fields.into()),
            ..Default::default()
        }
    }

    pub fn kind(mut self, kind: TypeKey) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn prefix_field(mut self, prefix_field: bool) -> Self {
        self.prefix_field = Some(prefix_field);
        self
    }
}

/// Recognized parameter names and how each maps onto fields.
pub type AllowedFilters = HashMap<String, FilterConfig>;

/// One recognized query parameter, ready to apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterDescriptor {
    /// Query parameter it came from.
    pub name: String,
    /// Raw token, operator prefix included.
    pub value: String,
    pub fields: Fields,
    #[serde(rename = "type")]
    pub kind: TypeKey,
    pub prefix_field: bool,
}

/// Keep the allow-listed parameters, in `query_params` order.
pub fn parse_filters<I, K, V>(query_params: I, allowed: &AllowedFilters) -> Vec<FilterDescriptor>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut filters = Vec::new();

    for (name, value) in query_params {
        let name = name.as_ref();
        let Some(config) = allowed.get(name) else {
            debug!(param = name, "not an allowed filter, dropping");
            continue;
        };

        filters.push(FilterDescriptor {
            name: name.to_string(),
            value: value.as_ref().to_string(),
            fields: config
                .fields
                .clone()
                .unwrap_or_else(|| Fields::One(name.to_string())),
            kind: config.kind.unwrap_or_default(),
            prefix_field: config.prefix_field.unwrap_or(true),
        });
    }

    filters
}

/// Emit one `and_where` per single-field filter and one `or_where` per
/// multi-field filter.
///
/// The token is decoded separately for every field.
pub fn apply_filters<'q, Q>(query: &'q mut Q, filters: &[FilterDescriptor]) -> &'q mut Q
where
    Q: QueryBuilder + ?Sized,
{
    for filter in filters {
        match filter.fields.as_slice() {
            [] => {
                warn!(param = %filter.name, "filter has no fields, skipping");
            }
            [field] => {
                let (op, value) = get_operator_and_typed_value(&filter.value, filter.kind);
                debug!(param = %filter.name, field = %field, op = %op, "and_where");
                query.and_where(field, op, value, filter.prefix_field);
            }
            fields => {
                let conditions: Vec<Condition> = fields
                    .iter()
                    .map(|field| {
                        let (op, value) =
                            get_operator_and_typed_value(&filter.value, filter.kind);
                        Condition {
                            field: field.clone(),
                            op,
                            value,
                            prefix_field: filter.prefix_field,
                        }
                    })
                    .collect();
                debug!(param = %filter.name, fields = conditions.len(), "or_where");
                query.or_where(conditions);
            }
        }
    }

    query
}
