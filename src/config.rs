//! Style configuration.
//!
//! Options are read from a TOML file with a `[format-settings]` table:
//!
//! ```toml
//! [format-settings]
//! indent-type = "TAB"
//!
//! [format-settings.func]
//! name-type-case = "UPPERCASE"
//!
//! [format-settings.join]
//! start-indent-type = "NONE"
//! line-break-type = "OFF"
//! ```
//!
//! Missing keys keep their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{FmtResult, FormatError};

/// File name looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".pgsqlfmt.toml";

/// Indentation unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IndentType {
    Tab,
    #[default]
    TwoSpaces,
}

/// Casing applied to whitelisted function names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FuncNameCase {
    #[default]
    #[serde(rename = "LOWERCASE")]
    Lower,
    #[serde(rename = "UPPERCASE")]
    Upper,
}

/// Extra indentation before a join keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JoinStartIndent {
    None,
    #[default]
    OneSpace,
}

/// Whether a join's ON predicate starts on its own line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JoinLineBreak {
    #[default]
    OnClause,
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct FuncConfig {
    pub name_type_case: FuncNameCase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct JoinConfig {
    pub start_indent_type: JoinStartIndent,
    pub line_break_type: JoinLineBreak,
}

/// Formatting knobs threaded through every emitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct StyleConfig {
    pub indent_type: IndentType,
    pub func: FuncConfig,
    pub join: JoinConfig,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(rename = "format-settings", default)]
    format_settings: StyleConfig,
}

impl StyleConfig {
    /// One indentation unit.
    pub fn indent(&self) -> &'static str {
        match self.indent_type {
            IndentType::Tab => "\t",
            IndentType::TwoSpaces => "  ",
        }
    }

    /// `depth` indentation units.
    pub fn indent_by(&self, depth: usize) -> String {
        self.indent().repeat(depth)
    }

    pub fn with_indent_type(mut self, indent_type: IndentType) -> Self {
        self.indent_type = indent_type;
        self
    }

    pub fn with_func_name_case(mut self, case: FuncNameCase) -> Self {
        self.func.name_type_case = case;
        self
    }

    pub fn with_join_start_indent(mut self, start: JoinStartIndent) -> Self {
        self.join.start_indent_type = start;
        self
    }

    pub fn with_join_line_break(mut self, line_break: JoinLineBreak) -> Self {
        self.join.line_break_type = line_break;
        self
    }

    /// Parse the `[format-settings]` table out of TOML text.
    pub fn from_toml(text: &str) -> FmtResult<Self> {
        let file: ConfigFile =
            toml::from_str(text).map_err(|e| FormatError::Config(e.to_string()))?;
        Ok(file.format_settings)
    }

    /// Load a config file.
    pub fn load(path: &Path) -> FmtResult<Self> {
        let content = fs::read_to_string(path)?;
        let file: ConfigFile = toml::from_str(&content)
            .map_err(|e| FormatError::Config(format!("{}: {}", path.display(), e)))?;
        Ok(file.format_settings)
    }

    /// Load `./.pgsqlfmt.toml`, else `<config_dir>/pgsqlfmt/config.toml`,
    /// else the default style.
    pub fn discover() -> FmtResult<Self> {
        for path in Self::search_paths() {
            if path.is_file() {
                tracing::debug!(path = %path.display(), "loading style config");
                return Self::load(&path);
            }
        }
        Ok(Self::default())
    }

    fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("pgsqlfmt").join("config.toml"));
        }
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let conf = StyleConfig::default();
        assert_eq!(conf.indent(), "  ");
        assert_eq!(conf.func.name_type_case, FuncNameCase::Lower);
        assert_eq!(conf.join.start_indent_type, JoinStartIndent::OneSpace);
        assert_eq!(conf.join.line_break_type, JoinLineBreak::OnClause);
    }

    #[test]
    fn test_from_toml() {
        let conf = StyleConfig::from_toml(
            r#"
[format-settings]
indent-type = "TAB"

[format-settings.func]
name-type-case = "UPPERCASE"

[format-settings.join]
start-indent-type = "NONE"
line-break-type = "OFF"
"#,
        )
        .unwrap();

        let expected = StyleConfig::default()
            .with_indent_type(IndentType::Tab)
            .with_func_name_case(FuncNameCase::Upper)
            .with_join_start_indent(JoinStartIndent::None)
            .with_join_line_break(JoinLineBreak::Off);
        assert_eq!(conf, expected);
        assert_eq!(conf.indent_by(2), "\t\t");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let conf = StyleConfig::from_toml("[format-settings.join]\nline-break-type = \"OFF\"\n")
            .unwrap();
        assert_eq!(conf.indent_type, IndentType::TwoSpaces);
        assert_eq!(conf.join.start_indent_type, JoinStartIndent::OneSpace);
        assert_eq!(conf.join.line_break_type, JoinLineBreak::Off);

        assert_eq!(StyleConfig::from_toml("").unwrap(), StyleConfig::default());
    }

    #[test]
    fn test_invalid_value() {
        let err = StyleConfig::from_toml("[format-settings]\nindent-type = \"FOUR\"\n").unwrap_err();
        assert!(matches!(err, FormatError::Config(_)));
    }

    #[test]
    fn test_load_file() {
        let path = std::env::temp_dir().join(format!("pgsqlfmt-config-{}.toml", std::process::id()));
        fs::write(&path, "[format-settings]\nindent-type = \"TAB\"\n").unwrap();
        let conf = StyleConfig::load(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(conf.indent_type, IndentType::Tab);
    }

    #[test]
    fn test_load_error_names_file_once() {
        let path =
            std::env::temp_dir().join(format!("pgsqlfmt-bad-config-{}.toml", std::process::id()));
        fs::write(&path, "[format-settings]\nindent-type = \"FOUR\"\n").unwrap();
        let err = StyleConfig::load(&path).unwrap_err();
        fs::remove_file(&path).unwrap();

        let message = err.to_string();
        assert!(message.starts_with(&format!("Configuration error: {}: ", path.display())));
        assert_eq!(message.matches("Configuration error").count(), 1);
    }
}
