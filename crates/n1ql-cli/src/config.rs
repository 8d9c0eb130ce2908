use n1ql_request::RequestConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Project file (`n1ql.toml`) holding request defaults.
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    pub config_path: Option<PathBuf>,
    pub file: ConfigFile,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub defaults: RequestConfig,
}

impl ProjectConfig {
    /// Load the project file. A missing file is only an error when `required`.
    pub fn load(config_path: &Path, required: bool) -> anyhow::Result<Self> {
        if !required && !config_path.exists() {
            return Ok(Self {
                config_path: None,
                file: ConfigFile::default(),
            });
        }

        let raw = std::fs::read_to_string(config_path).map_err(|e| {
            anyhow::anyhow!(
                "failed to read config file {}: {e}",
                config_path.display()
            )
        })?;

        let file = parse(&raw).map_err(|e| {
            anyhow::anyhow!(
                "failed to parse config file {}: {e}",
                config_path.display()
            )
        })?;

        Ok(Self {
            config_path: Some(config_path.to_path_buf()),
            file,
        })
    }
}

fn parse(raw: &str) -> Result<ConfigFile, toml::de::Error> {
    toml::from_str(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use n1ql_request::ScanConsistency;

    #[test]
    fn parses_defaults_table() {
        let file = parse(
            r#"
[defaults]
base_uri = "http://127.0.0.1:8093/query/service"
timeout_ms = 75000
scan_consistency = "request_plus"
format = "JSON"
"#,
        )
        .unwrap();

        assert_eq!(file.defaults.timeout_ms, Some(75000));
        assert_eq!(
            file.defaults.scan_consistency,
            Some(ScanConsistency::RequestPlus)
        );
        assert!(file.defaults.base_uri.is_some());
    }

    #[test]
    fn empty_file_has_no_defaults() {
        let file = parse("").unwrap();
        assert_eq!(file.defaults, RequestConfig::default());
    }

    #[test]
    fn unknown_tables_are_rejected() {
        assert!(parse("[database]\nurl = \"x\"\n").is_err());
    }

    #[test]
    fn missing_optional_file_is_not_an_error() {
        let config = ProjectConfig::load(Path::new("does/not/exist/n1ql.toml"), false).unwrap();
        assert!(config.config_path.is_none());
        assert!(ProjectConfig::load(Path::new("does/not/exist/n1ql.toml"), true).is_err());
    }
}
