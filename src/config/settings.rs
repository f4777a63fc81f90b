use serde::Deserialize;

use crate::config::ConfigError;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub table: TableConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableConfig {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    #[serde(default)]
    pub columns: ColumnsConfig,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            path: None,
            delimiter: default_delimiter(),
            columns: ColumnsConfig::default(),
        }
    }
}

impl TableConfig {
    pub fn delimiter_byte(&self) -> Result<u8, ConfigError> {
        match self.delimiter.as_bytes() {
            [byte] if byte.is_ascii() => Ok(*byte),
            _ => Err(ConfigError::InvalidDelimiter(self.delimiter.clone())),
        }
    }
}

/// Header names of the course table columns.
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnsConfig {
    #[serde(default = "default_code_column")]
    pub code: String,
    #[serde(default = "default_title_column")]
    pub title: String,
    #[serde(default = "default_semester_column")]
    pub semester: String,
    #[serde(default = "default_prerequisites_column")]
    pub prerequisites: String,
    #[serde(default = "default_corequisites_column")]
    pub corequisites: String,
}

impl Default for ColumnsConfig {
    fn default() -> Self {
        Self {
            code: default_code_column(),
            title: default_title_column(),
            semester: default_semester_column(),
            prerequisites: default_prerequisites_column(),
            corequisites: default_corequisites_column(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub policy: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_x_gap")]
    pub x_gap: f64,
    #[serde(default = "default_y_gap")]
    pub y_gap: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            x_gap: default_x_gap(),
            y_gap: default_y_gap(),
        }
    }
}

fn default_delimiter() -> String {
    ",".to_string()
}

fn default_code_column() -> String {
    "Course Code".to_string()
}

fn default_title_column() -> String {
    "Course Title".to_string()
}

fn default_semester_column() -> String {
    "Semester".to_string()
}

fn default_prerequisites_column() -> String {
    "Prerequisites".to_string()
}

fn default_corequisites_column() -> String {
    "Corequisites".to_string()
}

fn default_x_gap() -> f64 {
    2.0
}

fn default_y_gap() -> f64 {
    1.5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_default_schema() {
        let settings: Settings = toml::from_str("").expect("parse empty config");
        assert_eq!(settings.table.columns.code, "Course Code");
        assert_eq!(settings.table.columns.corequisites, "Corequisites");
        assert_eq!(settings.table.delimiter_byte().expect("delimiter"), b',');
        assert_eq!(settings.layout.x_gap, 2.0);
        assert_eq!(settings.layout.y_gap, 1.5);
        assert!(settings.display.policy.is_none());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let settings: Settings = toml::from_str(
            r#"[table]
path = "courses.tsv"
delimiter = ";"

[table.columns]
code = "Code"

[display]
policy = "connected-closure"

[layout]
y_gap = 3.0
"#,
        )
        .expect("parse config");
        assert_eq!(settings.table.path.as_deref(), Some("courses.tsv"));
        assert_eq!(settings.table.delimiter_byte().expect("delimiter"), b';');
        assert_eq!(settings.table.columns.code, "Code");
        assert_eq!(settings.table.columns.title, "Course Title");
        assert_eq!(
            settings.display.policy.as_deref(),
            Some("connected-closure")
        );
        assert_eq!(settings.layout.x_gap, 2.0);
        assert_eq!(settings.layout.y_gap, 3.0);
    }

    #[test]
    fn multi_character_delimiter_is_rejected() {
        let table = TableConfig {
            delimiter: "::".to_string(),
            ..TableConfig::default()
        };
        assert!(matches!(
            table.delimiter_byte(),
            Err(ConfigError::InvalidDelimiter(_))
        ));
    }
}
