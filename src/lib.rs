//! # qail-filter — query-string filters for query builders
//!
//! > **Allow-list the parameters. Hook your WHERE.**
//!
//! Turns HTTP-style query parameters into typed conditions and hands them
//! to any [`QueryBuilder`](filter::QueryBuilder).
//!
//! ## Quick Example
//!
//! ```
//! use qail_filter::prelude::*;
//!
//! let allowed = AllowedFilters::from([
//!     ("status".to_string(), FilterConfig::new("state")),
//!     ("age".to_string(), FilterConfig::new("age").kind(TypeKey::Number)),
//!     ("q".to_string(), FilterConfig::new(["name", "email"])),
//! ]);
//!
//! let filters = parse_filters([("status", "active"), ("age", ">=:21"), ("q", "~:ann")], &allowed);
//!
//! let mut query = WhereBuilder::new();
//! apply_filters(&mut query, &filters);
//! assert_eq!(
//!     query.to_sql(),
//!     "WHERE state = 'active' AND age >= 21 AND (name LIKE '%ann%' OR email LIKE '%ann%')"
//! );
//! ```
//!
//! ## Operators
//!
//! | Prefix  | Operator   | Value                  |
//! |---------|------------|------------------------|
//! | (none)  | `=`        | scalar                 |
//! | `>:`    | `>`        | scalar                 |
//! | `>=:`   | `>=`       | scalar                 |
//! | `<:`    | `<`        | scalar                 |
//! | `<=:`   | `<=`       | scalar                 |
//! | `!=:`   | `!=`       | scalar                 |
//! | `~:`    | `LIKE`     | `%value%`              |
//! | `!~:`   | `NOT LIKE` | `%value%`              |
//! | `in:`   | `IN`       | comma-separated list   |
//! | `!in:`  | `NOT IN`   | comma-separated list   |
//! | `><:`   | `BETWEEN`  | `low,high`             |

pub mod ast;
pub mod config;
pub mod error;
pub mod filter;
pub mod transform;
pub mod transpiler;
pub mod url;

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::error::*;
    pub use crate::filter::{
        apply_filters, parse_filters, AllowedFilters, FilterConfig, FilterDescriptor, QueryBuilder,
    };
    pub use crate::transform::{coerce, get_operator_and_typed_value, transform_type, Coerced};
    pub use crate::transpiler::{Clause, ToSql, WhereBuilder};
    pub use crate::url::UrlFilterBuilder;
}

pub use filter::{apply_filters, parse_filters};
