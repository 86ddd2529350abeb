//! Filter configuration loading
//!
//! Layers, lowest precedence first: built-in defaults, the optional config
//! file (format picked by extension), then `FHIR_FILTER_*` environment
//! variables. List values in the environment are comma separated, e.g.
//! `FHIR_FILTER_IDENTIFYING_FIELDS=name,birthdate`.

use anyhow::Context;
use config::{Config, Environment, File};
use fhir_filter::FilterConfig;
use std::path::Path;

const ENV_PREFIX: &str = "FHIR_FILTER";

pub fn load(path: Option<&Path>) -> anyhow::Result<FilterConfig> {
    load_with_prefix(path, ENV_PREFIX)
}

fn load_with_prefix(path: Option<&Path>, prefix: &str) -> anyhow::Result<FilterConfig> {
    let mut builder = Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(File::from(path).required(true));
    }

    builder = builder.add_source(
        Environment::with_prefix(prefix)
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("compare_operators")
            .with_list_parse_key("identifying_fields"),
    );

    let config: FilterConfig = builder
        .build()
        .context("Failed to read filter configuration")?
        .try_deserialize()
        .context("Invalid filter configuration")?;

    if config.compare_operators.is_empty() {
        anyhow::bail!("Invalid filter configuration: compare_operators must not be empty");
    }
    if config.max_depth == 0 {
        anyhow::bail!("Invalid filter configuration: max_depth must be positive");
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{}", std::process::id(), name));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_defaults_without_sources() {
        let config = load_with_prefix(None, "FHIR_FILTER_TEST_NONE").unwrap();
        assert_eq!(config.max_depth, FilterConfig::default().max_depth);
        assert_eq!(config.compare_operators.len(), 19);
        assert!(config.identifying_fields.is_empty());
    }

    #[test]
    fn test_file_source() {
        let path = write_temp(
            "filter-config.json",
            r#"{"identifying_fields": ["name", "birthdate"], "max_depth": 50}"#,
        );
        let config = load_with_prefix(Some(&path), "FHIR_FILTER_TEST_FILE").unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.identifying_fields, vec!["name", "birthdate"]);
        assert_eq!(config.max_depth, 50);
        assert!(config.is_compare_operator("sw"));
    }

    #[test]
    fn test_environment_overrides_file() {
        let path = write_temp("filter-config-env.json", r#"{"max_depth": 50}"#);
        std::env::set_var("FHIR_FILTER_TEST_ENV_MAX_DEPTH", "7");
        std::env::set_var("FHIR_FILTER_TEST_ENV_IDENTIFYING_FIELDS", "name,identifier");

        let config = load_with_prefix(Some(&path), "FHIR_FILTER_TEST_ENV").unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.max_depth, 7);
        assert_eq!(config.identifying_fields, vec!["name", "identifier"]);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let path = Path::new("/nonexistent/fhir-filter.toml");
        assert!(load_with_prefix(Some(path), "FHIR_FILTER_TEST_MISSING").is_err());
    }

    #[test]
    fn test_rejects_empty_operator_set() {
        let path = write_temp("filter-config-empty.json", r#"{"compare_operators": []}"#);
        let result = load_with_prefix(Some(&path), "FHIR_FILTER_TEST_EMPTY");
        std::fs::remove_file(&path).ok();

        assert!(result.is_err());
    }
}
