//! esrows configuration
//!
//! Config file: $ESROWS_CONFIG, or ~/.config/esrows/config.toml
//! The dialect can also come from $ESROWS_DB_TYPE.

use crate::dialect::Dialect;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "ESROWS_CONFIG";

/// Environment variable carrying the dialect tag
pub const DIALECT_ENV: &str = "ESROWS_DB_TYPE";

/// How rows are written out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One JSON object per line
    #[default]
    Jsonl,
    /// A single pretty-printed JSON array
    Json,
    /// Aligned text table over the union of all fields
    Table,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "jsonl" | "ndjson" => Ok(OutputFormat::Jsonl),
            "json" => Ok(OutputFormat::Json),
            "table" => Ok(OutputFormat::Table),
            _ => anyhow::bail!("Invalid output format: '{}'. Valid values: jsonl, json, table", s),
        }
    }
}

/// Where responses come from
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Dialect tag (elasticsearch, awselasticsearch, odelasticsearch)
    #[serde(default)]
    pub dialect: Option<String>,
}

/// Output preferences
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

/// Main esrows configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EsrowsConfig {
    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl EsrowsConfig {
    /// Default user config path: ~/.config/esrows/config.toml
    pub fn user_config_path() -> Result<PathBuf> {
        let config_dir = match std::env::var("XDG_CONFIG_HOME") {
            Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => {
                let home = std::env::var("HOME").context("Cannot determine home directory")?;
                Path::new(&home).join(".config")
            }
        };

        Ok(config_dir.join("esrows").join("config.toml"))
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: EsrowsConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Load configuration
    ///
    /// Priority:
    /// 1. $ESROWS_CONFIG (must exist)
    /// 2. User config (~/.config/esrows/config.toml), if present
    /// 3. Defaults
    pub fn load() -> Result<Self> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::load_from(Path::new(&path));
        }

        if let Ok(user_path) = Self::user_config_path() {
            if user_path.exists() {
                return Self::load_from(&user_path);
            }
        }

        Ok(Self::default())
    }

    /// Pick the dialect: CLI flag, then $ESROWS_DB_TYPE, then config file.
    pub fn resolve_dialect(&self, cli_override: Option<&str>) -> Result<Dialect> {
        let env_tag = std::env::var(DIALECT_ENV).ok();
        self.resolve_dialect_with(cli_override, env_tag.as_deref())
    }

    fn resolve_dialect_with(&self, cli_override: Option<&str>, env_tag: Option<&str>) -> Result<Dialect> {
        let tag = cli_override
            .or(env_tag)
            .or(self.source.dialect.as_deref())
            .with_context(|| {
                format!(
                    "No dialect given. Pass --dialect, set ${} or [source] dialect in the config file",
                    DIALECT_ENV
                )
            })?;

        Ok(Dialect::parse(tag)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NormalizeError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = EsrowsConfig::default();
        assert_eq!(config.output.format, OutputFormat::Jsonl);
        assert!(config.source.dialect.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[source]\ndialect = \"odelasticsearch\"\n\n[output]\nformat = \"table\""
        )
        .unwrap();

        let config = EsrowsConfig::load_from(file.path()).unwrap();
        assert_eq!(config.source.dialect.as_deref(), Some("odelasticsearch"));
        assert_eq!(config.output.format, OutputFormat::Table);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[source]\ndialect = \"elasticsearch\"").unwrap();

        let config = EsrowsConfig::load_from(file.path()).unwrap();
        assert_eq!(config.output.format, OutputFormat::Jsonl);
    }

    #[test]
    fn test_bad_file_reports_path() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[output]\nformat = \"csv\"").unwrap();

        let err = EsrowsConfig::load_from(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_dialect_precedence() {
        let mut config = EsrowsConfig::default();
        config.source.dialect = Some("odelasticsearch".into());

        assert_eq!(
            config.resolve_dialect_with(Some("elasticsearch"), Some("awselasticsearch")).unwrap(),
            Dialect::Elasticsearch
        );
        assert_eq!(
            config.resolve_dialect_with(None, Some("awselasticsearch")).unwrap(),
            Dialect::AwsElasticsearch
        );
        assert_eq!(config.resolve_dialect_with(None, None).unwrap(), Dialect::OpenDistro);
    }

    #[test]
    fn test_missing_dialect() {
        let config = EsrowsConfig::default();
        assert!(config.resolve_dialect_with(None, None).is_err());
    }

    #[test]
    fn test_unknown_dialect_keeps_typed_error() {
        let config = EsrowsConfig::default();
        let err = config.resolve_dialect_with(Some("unknown"), None).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<NormalizeError>(),
            Some(NormalizeError::UnsupportedDialect(_))
        ));
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!(OutputFormat::parse("JSONL").unwrap(), OutputFormat::Jsonl);
        assert_eq!(OutputFormat::parse("ndjson").unwrap(), OutputFormat::Jsonl);
        assert_eq!(OutputFormat::parse("table").unwrap(), OutputFormat::Table);
        assert!(OutputFormat::parse("csv").is_err());
    }
}
