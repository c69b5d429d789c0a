//! Settings store for loading and saving `config.toml`.

use std::path::{Path, PathBuf};

use anyhow::Context;

use super::{Settings, parser, paths};

/// Environment variable overriding the registry base URL.
pub const REGISTRY_ENV: &str = "SKILLBOX_REGISTRY";

#[derive(Debug, Clone)]
pub struct SettingsStore {
    settings_path: PathBuf,
}

impl SettingsStore {
    pub fn from_default_location() -> anyhow::Result<Self> {
        let home_dir =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
        Ok(Self::from_dir(&paths::default_config_dir(&home_dir)))
    }

    pub fn from_dir(config_dir: &Path) -> Self {
        Self {
            settings_path: paths::settings_path(config_dir),
        }
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// Load settings, falling back to defaults when the file is missing.
    ///
    /// `SKILLBOX_REGISTRY` takes precedence over `registry.base_url`.
    pub fn load(&self) -> anyhow::Result<Settings> {
        let mut settings = if self.settings_path.exists() {
            parser::parse_settings(&self.settings_path)?
        } else {
            Settings::default()
        };

        if let Ok(url) = std::env::var(REGISTRY_ENV) {
            let url = url.trim();
            if !url.is_empty() {
                url::Url::parse(url)
                    .with_context(|| format!("{REGISTRY_ENV} is not a valid URL: {url}"))?;
                tracing::debug!(url, "registry base URL overridden from environment");
                settings.registry.base_url = url.to_string();
            }
        }

        Ok(settings)
    }

    pub fn save(&self, settings: &Settings) -> anyhow::Result<()> {
        let content = parser::to_toml(settings)?;
        if let Some(parent) = self.settings_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create settings directory: {}", parent.display())
            })?;
        }
        std::fs::write(&self.settings_path, content).with_context(|| {
            format!(
                "Failed to write settings file: {}",
                self.settings_path.display()
            )
        })?;
        Ok(())
    }
}
