//! Runtime configuration, from `climop.toml` and `CLIMOP_*` environment
//! variables.

use std::env;
use std::path::PathBuf;

use anyhow::Context;
use serde::Deserialize;

use crate::catalog::Catalog;
use crate::docs::DocDir;

/// Settings for the catalog and the command-line tools.
///
/// Every field has a default, so a missing configuration file is not an
/// error. The file path comes from `CLIMOP_CONFIG_PATH` when set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Directory searched for per-operator documentation files.
    #[serde(default)]
    pub doc_dir: Option<PathBuf>,
    /// Operator declaration files loaded by `check` and `list`.
    #[serde(default)]
    pub declaration_files: Vec<PathBuf>,
    /// Names reserved on top of the built-in set.
    #[serde(default)]
    pub reserved_names: Vec<String>,
}

impl Config {
    /// Load configuration from disk and the environment.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let path =
            env::var("CLIMOP_CONFIG_PATH").unwrap_or_else(|_| "climop.toml".to_string());
        let settings = config::Config::builder()
            .add_source(config::File::with_name(&path).required(false))
            .add_source(config::Environment::with_prefix("CLIMOP").separator("__"))
            .build()
            .context("Failed to load configuration")?;
        settings
            .try_deserialize()
            .context("Failed to parse configuration")
    }

    /// Catalog wired with this configuration's documentation directory and
    /// extra reserved names.
    pub fn catalog(&self) -> Catalog {
        let mut builder = Catalog::builder();
        if let Some(dir) = &self.doc_dir {
            builder = builder.docs(DocDir::new(dir));
        }
        for name in &self.reserved_names {
            builder = builder.reserve(name.clone());
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn test_default_configuration_is_empty() {
        let config = Config::default();
        assert!(config.doc_dir.is_none());
        assert!(config.declaration_files.is_empty());
        assert!(config.reserved_names.is_empty());
    }

    #[test]
    fn test_parses_the_documented_fields() {
        let config: Config = toml::from_str(
            r#"
doc_dir = "doc/scripts"
declaration_files = ["operators.toml", "extra.toml"]
reserved_names = ["eval"]
"#,
        )
        .unwrap();
        assert_eq!(config.doc_dir.as_deref(), Some(Path::new("doc/scripts")));
        assert_eq!(
            config.declaration_files,
            vec![PathBuf::from("operators.toml"), PathBuf::from("extra.toml")]
        );
        assert_eq!(config.reserved_names, vec!["eval"]);
    }

    #[test]
    fn test_catalog_honors_extra_reserved_names() {
        let config = Config {
            reserved_names: vec!["eval".to_string()],
            ..Config::default()
        };
        let catalog = config.catalog();
        assert!(catalog.is_reserved("eval"));
        assert!(catalog.is_reserved("declare"));
    }
}
