//! Allow-list configuration.
//!
//! ```toml
//! [filters.status]
//! fields = "state"
//!
//! [filters.q]
//! fields = ["name", "email"]
//! type = "string"
//! prefix_field = false
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::ast::TypeKey;
use crate::error::{FilterError, FilterResult};
use crate::filter::AllowedFilters;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "QAIL_FILTER_CONFIG";

/// Top-level layout of a filters file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterFile {
    #[serde(default)]
    pub filters: AllowedFilters,
}

/// `<config dir>/qail-filter/filters.toml`, if the platform has one.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("qail-filter").join("filters.toml"))
}

/// Explicit path, then `QAIL_FILTER_CONFIG`, then [`default_path`].
pub fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from))
        .or_else(default_path)
}

pub fn from_toml_str(content: &str) -> FilterResult<AllowedFilters> {
    let file: FilterFile = toml::from_str(content)?;

    for (name, config) in &file.filters {
        if name.is_empty() {
            return Err(FilterError::config("filter name must not be empty"));
        }
        if config.fields.as_ref().is_some_and(|f| f.is_empty()) {
            return Err(FilterError::config(format!(
                "filter '{}' has an empty fields list",
                name
            )));
        }
        if config.kind == Some(TypeKey::Unknown) {
            warn!(filter = %name, "unknown type, values pass through as strings");
        }
    }

    Ok(file.filters)
}

pub fn load(path: &Path) -> FilterResult<AllowedFilters> {
    debug!(path = %path.display(), "loading filters");
    let content = std::fs::read_to_string(path)?;
    from_toml_str(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Fields;
    use crate::filter::FilterConfig;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const SAMPLE: &str = r#"
[filters.status]
fields = "state"

[filters.q]
fields = ["name", "email"]
type = "string"
prefix_field = false

[filters.created]
fields = "created_at"
type = "date"

[filters.tag]
type = "uuid"
"#;

    #[test]
    fn test_parse_sample() {
        let filters = from_toml_str(SAMPLE).unwrap();
        assert_eq!(filters.len(), 4);
        assert_eq!(filters["status"], FilterConfig::new("state"));
        assert_eq!(
            filters["q"],
            FilterConfig::new(Fields::from(["name", "email"]))
                .kind(TypeKey::String)
                .prefix_field(false)
        );
        assert_eq!(filters["created"].kind, Some(TypeKey::Date));
        assert_eq!(filters["tag"].kind, Some(TypeKey::Unknown));
        assert_eq!(filters["tag"].fields, None);
    }

    #[test]
    fn test_empty_file() {
        assert!(from_toml_str("").unwrap().is_empty());
    }

    #[test]
    fn test_rejects_empty_fields() {
        let err = from_toml_str("[filters.x]\nfields = []\n").unwrap_err();
        assert!(matches!(err, FilterError::Config(_)));
    }

    #[test]
    fn test_rejects_bad_toml() {
        let err = from_toml_str("[filters.x\n").unwrap_err();
        assert!(matches!(err, FilterError::Toml(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let filters = load(file.path()).unwrap();
        assert!(filters.contains_key("q"));

        let missing = file.path().with_extension("missing");
        assert!(matches!(load(&missing), Err(FilterError::Io(_))));
    }

    #[test]
    fn test_explicit_path_wins() {
        let path = Path::new("/tmp/filters.toml");
        assert_eq!(resolve_path(Some(path)), Some(path.to_path_buf()));
    }
}
