//! Field configuration: environment variables and custom network rule files.
//!
//! # Environment Variables
//!
//! - `CCFIELD_RULES`: path to a TOML rule file (see [`RuleFile`])
//! - `CCFIELD_MAX_DIGITS`: digit cap while no network is detected (unset = unbounded)
//! - `CCFIELD_LOG_PATH`: file that receives log output from the interactive binary
//!
//! Blank values are treated as unset.
//!
//! # Rule files
//!
//! ```toml
//! replace_builtin = false
//!
//! [[network]]
//! name = "jcb"
//! groups = [4, 4, 4, 4]
//! prefixes = ["35"]
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use tui_ccfield_core::{CardFormatter, RuleError, RuleTable};
use tui_ccfield_types::CardTypeRule;

pub const ENV_RULES: &str = "CCFIELD_RULES";
pub const ENV_MAX_DIGITS: &str = "CCFIELD_MAX_DIGITS";
pub const ENV_LOG_PATH: &str = "CCFIELD_LOG_PATH";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read rule file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse rule file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid rule: {0}")]
    Rule(#[from] RuleError),

    #[error("invalid value `{value}` for {var}")]
    InvalidEnv { var: &'static str, value: String },
}

/// One `[[network]]` entry of a rule file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NetworkSpec {
    pub name: String,
    pub groups: Vec<usize>,
    pub prefixes: Vec<String>,
}

impl From<NetworkSpec> for CardTypeRule {
    fn from(spec: NetworkSpec) -> Self {
        CardTypeRule {
            name: spec.name,
            digit_groups: spec.groups,
            prefixes: spec.prefixes,
        }
    }
}

/// Parsed TOML rule file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct RuleFile {
    /// Drop the built-in networks instead of appending after them.
    #[serde(default)]
    pub replace_builtin: bool,
    #[serde(default, rename = "network")]
    pub networks: Vec<NetworkSpec>,
}

impl RuleFile {
    pub fn parse(src: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(src).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let src = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&src, path)
    }

    /// Build the rule table this file describes.
    pub fn into_table(self) -> Result<RuleTable, ConfigError> {
        let mut table = if self.replace_builtin {
            RuleTable::new(Vec::new())?
        } else {
            RuleTable::builtin()
        };
        for spec in self.networks {
            table.push(spec.into())?;
        }
        for (a, b) in table.overlapping_prefixes() {
            warn!(first = a, second = b, "networks have overlapping prefixes");
        }
        Ok(table)
    }
}

/// Settings for a card number field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldConfig {
    pub rules_path: Option<PathBuf>,
    pub max_unknown_digits: Option<usize>,
    pub log_path: Option<PathBuf>,
}

impl FieldConfig {
    /// Create from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let max_unknown_digits = match non_blank(ENV_MAX_DIGITS) {
            Some(value) => Some(parse_max_digits(&value).ok_or(ConfigError::InvalidEnv {
                var: ENV_MAX_DIGITS,
                value,
            })?),
            None => None,
        };

        Ok(Self {
            rules_path: non_blank(ENV_RULES).map(PathBuf::from),
            max_unknown_digits,
            log_path: non_blank(ENV_LOG_PATH).map(PathBuf::from),
        })
    }

    pub fn with_rules_path(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.rules_path = path;
        }
        self
    }

    pub fn with_max_unknown_digits(mut self, max: Option<usize>) -> Self {
        if max.is_some() {
            self.max_unknown_digits = max;
        }
        self
    }

    pub fn with_log_path(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.log_path = path;
        }
        self
    }

    /// Load the rule table (built-in when no rule file is configured).
    pub fn rule_table(&self) -> Result<RuleTable, ConfigError> {
        match &self.rules_path {
            Some(path) => {
                let table = RuleFile::load(path)?.into_table()?;
                info!(path = %path.display(), networks = table.rules().len(), "loaded rule file");
                Ok(table)
            }
            None => Ok(RuleTable::builtin()),
        }
    }

    pub fn formatter(&self) -> Result<CardFormatter, ConfigError> {
        Ok(CardFormatter::new(self.rule_table()?).with_max_unknown_digits(self.max_unknown_digits))
    }
}

fn parse_max_digits(value: &str) -> Option<usize> {
    value.parse::<usize>().ok().filter(|&n| n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn env_defaults_are_unset() {
        let cfg = FieldConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg, FieldConfig::default());
    }

    #[test]
    fn env_values_are_trimmed_and_blank_ignored() {
        let cfg = FieldConfig::from_lookup(lookup(&[
            (ENV_MAX_DIGITS, " 19 "),
            (ENV_RULES, "  "),
            (ENV_LOG_PATH, "/tmp/ccfield.log"),
        ]))
        .unwrap();
        assert_eq!(cfg.max_unknown_digits, Some(19));
        assert_eq!(cfg.rules_path, None);
        assert_eq!(cfg.log_path, Some(PathBuf::from("/tmp/ccfield.log")));
    }

    #[test]
    fn invalid_max_digits_is_an_error() {
        for bad in ["zero", "0", "-3"] {
            let err = FieldConfig::from_lookup(lookup(&[(ENV_MAX_DIGITS, bad)])).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidEnv { var: ENV_MAX_DIGITS, .. }));
        }
    }

    #[test]
    fn overrides_only_apply_when_set() {
        let cfg = FieldConfig {
            max_unknown_digits: Some(19),
            ..Default::default()
        }
        .with_max_unknown_digits(None)
        .with_rules_path(Some(PathBuf::from("rules.toml")));
        assert_eq!(cfg.max_unknown_digits, Some(19));
        assert_eq!(cfg.rules_path, Some(PathBuf::from("rules.toml")));
    }

    #[test]
    fn rule_file_appends_after_builtin() {
        let file = RuleFile::parse(
            r#"
            [[network]]
            name = "jcb"
            groups = [4, 4, 4, 4]
            prefixes = ["35"]
            "#,
            Path::new("inline.toml"),
        )
        .unwrap();
        let table = file.into_table().unwrap();
        assert_eq!(table.rules().len(), 5);
        assert_eq!(table.detect_type("3528000000000000").name, "jcb");
        assert_eq!(table.detect_type("4111").name, "visa");
    }

    #[test]
    fn rule_file_can_replace_builtin() {
        let file = RuleFile::parse(
            r#"
            replace_builtin = true
            [[network]]
            name = "diners"
            groups = [4, 6, 4]
            prefixes = ["36", "38"]
            "#,
            Path::new("inline.toml"),
        )
        .unwrap();
        let table = file.into_table().unwrap();
        assert_eq!(table.rules().len(), 1);
        assert_eq!(table.detect_type("4111").name, "unknown");
        assert_eq!(table.detect_type("36").name, "diners");
    }

    #[test]
    fn invalid_rule_in_file_is_reported() {
        let file = RuleFile::parse(
            r#"
            [[network]]
            name = "visa"
            groups = [4]
            prefixes = ["9"]
            "#,
            Path::new("inline.toml"),
        )
        .unwrap();
        assert!(matches!(
            file.into_table(),
            Err(ConfigError::Rule(RuleError::DuplicateName(_)))
        ));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = RuleFile::parse("[[network]]\nname = 3", Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn config_loads_rule_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[[network]]\nname = \"unionpay\"\ngroups = [4, 4, 4, 4, 3]\nprefixes = [\"62\"]"
        )
        .unwrap();

        let cfg = FieldConfig::default()
            .with_rules_path(Some(file.path().to_path_buf()))
            .with_max_unknown_digits(Some(16));
        let formatter = cfg.formatter().unwrap();
        assert_eq!(formatter.max_unknown_digits(), Some(16));
        assert_eq!(
            formatter.init("6200000000000000005").state.text,
            "6200 0000 0000 0000 005"
        );
    }

    #[test]
    fn missing_rule_file_is_an_io_error() {
        let cfg = FieldConfig::default()
            .with_rules_path(Some(PathBuf::from("/nonexistent/ccfield-rules.toml")));
        assert!(matches!(cfg.rule_table(), Err(ConfigError::Io { .. })));
    }
}
