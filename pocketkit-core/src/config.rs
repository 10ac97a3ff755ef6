use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::password::PasswordPolicy;

/// Overrides the config file location.
pub const CONFIG_ENV: &str = "POCKETKIT_CONFIG";
/// Overrides the directory the record files live in.
pub const DATA_DIR_ENV: &str = "POCKETKIT_DATA_DIR";

pub const BMI_HISTORY_FILE: &str = "bmi_data.json";
pub const VAULT_FILE: &str = "saved_passwords.json";

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Where record files are kept. Defaults to the platform data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Default generation policy.
    ///
    /// Example TOML:
    /// [password]
    /// length = 20
    /// exclude_ambiguous = true
    pub password: PasswordPolicy,
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::debug!(path = %path.display(), "loaded config");
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(path, self.to_toml()?)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }

        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    /// Directory holding the record files: env override, then config, then platform default.
    pub fn data_dir(&self) -> Result<PathBuf> {
        self.resolve_data_dir(env::var_os(DATA_DIR_ENV).map(PathBuf::from))
    }

    fn resolve_data_dir(&self, env_override: Option<PathBuf>) -> Result<PathBuf> {
        if let Some(dir) = env_override.or_else(|| self.data_dir.clone()) {
            return Ok(dir);
        }

        Ok(project_dirs()?.data_dir().to_path_buf())
    }

    pub fn bmi_history_path(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join(BMI_HISTORY_FILE))
    }

    pub fn vault_path(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join(VAULT_FILE))
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "pocketkit", "pocketkit")
        .ok_or_else(|| anyhow!("Could not determine platform config directory"))
}
