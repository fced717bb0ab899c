use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::theme::ThemeMode;
use crate::ui::components::{Column, Size, Variant};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Light or dark palette
    #[serde(default)]
    pub theme: ThemeMode,

    /// Accent color override (#RRGGBB or #RGB)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,

    /// Input field look
    #[serde(default)]
    pub variant: Variant,
    #[serde(default)]
    pub size: Size,

    /// Record field used as row identity for selection
    #[serde(default = "default_row_key")]
    pub row_key: String,

    /// Record field the filter text is matched against
    #[serde(default = "default_filter_field")]
    pub filter_field: String,

    /// Table columns, left to right
    #[serde(default = "default_columns")]
    pub columns: Vec<Column>,
}

fn default_row_key() -> String {
    "id".to_string()
}

fn default_filter_field() -> String {
    "name".to_string()
}

fn default_columns() -> Vec<Column> {
    vec![
        Column::new("name", "Name", "name").sortable(),
        Column::new("email", "Email", "email").sortable(),
    ]
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            theme: ThemeMode::default(),
            accent: None,
            variant: Variant::default(),
            size: Size::default(),
            row_key: default_row_key(),
            filter_field: default_filter_field(),
            columns: default_columns(),
        }
    }
}

impl AppConfig {
    /// Get the config file path
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("gridfield");

        if let Err(e) = std::fs::create_dir_all(&config_dir) {
            tracing::warn!("Could not create config directory: {}", e);
        }

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        let path = match Self::config_path() {
            Ok(p) => p,
            Err(_) => return Ok(AppConfig::default()),
        };

        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(content) => match Self::parse(&content) {
                    Ok(config) => return Ok(config),
                    Err(e) => tracing::warn!("Failed to parse config: {}", e),
                },
                Err(e) => tracing::warn!("Failed to read config: {}", e),
            }
            // Keep the user's broken file around for them to fix
            return Ok(AppConfig::default());
        }

        let config = AppConfig::default();
        if let Err(e) = config.save() {
            tracing::warn!("Could not write default config: {}", e);
        }
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut config: AppConfig = toml::from_str(content)?;

        // Column keys must be unique
        let mut seen = std::collections::HashSet::new();
        config.columns.retain(|c| {
            let fresh = seen.insert(c.key.clone());
            if !fresh {
                tracing::warn!("Ignoring duplicate column key '{}'", c.key);
            }
            fresh
        });

        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
