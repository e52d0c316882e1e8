// ABOUTME: Configuration record loading and persistence for the bl client
// ABOUTME: Stores the space URL, API key and default project as YAML under the XDG config dir

use anyhow::{anyhow, Context, Result};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::constants::config::{CONFIG_DIR, CONFIG_FILE, CONFIG_PATH_ENV};

#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub space_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub default_project: String,
}

// The API key must never reach logs or terminal output.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("space_url", &self.space_url)
            .field(
                "api_key",
                &if self.api_key.is_empty() {
                    ""
                } else {
                    "[REDACTED]"
                },
            )
            .field("default_project", &self.default_project)
            .finish()
    }
}

/// What every authenticated command needs
#[derive(Debug)]
pub struct Credential {
    pub space_url: String,
    pub api_key: SecretString,
}

impl Config {
    pub fn is_authenticated(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    pub fn require_credential(&self) -> Result<Credential> {
        if !self.is_authenticated() || self.space_url.trim().is_empty() {
            return Err(anyhow!("Not authenticated. Run `bl auth login` first"));
        }

        Ok(Credential {
            space_url: self.space_url.clone(),
            api_key: SecretString::new(self.api_key.clone().into_boxed_str()),
        })
    }

    pub fn default_project(&self) -> Option<&str> {
        Some(self.default_project.trim()).filter(|key| !key.is_empty())
    }
}

/// Reads and writes the single configuration record
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the standard location for this environment
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(Self::default_path()?))
    }

    /// `$BL_CONFIG`, then `$XDG_CONFIG_HOME/bl/config.yaml`, then
    /// `~/.config/bl/config.yaml`
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
            return Ok(PathBuf::from(path));
        }

        if let Some(config_home) = std::env::var_os("XDG_CONFIG_HOME").filter(|p| !p.is_empty()) {
            return Ok(PathBuf::from(config_home).join(CONFIG_DIR).join(CONFIG_FILE));
        }

        let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
        Ok(home.join(".config").join(CONFIG_DIR).join(CONFIG_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the record. A missing file is an empty record.
    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            log::debug!("No config file at {}", self.path.display());
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read config file: {}", self.path.display()))?;

        if content.trim().is_empty() {
            return Ok(Config::default());
        }

        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", self.path.display()))
    }

    /// Overwrite the record, creating parent directories as needed
    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = serde_yaml::to_string(config).context("Failed to serialize config")?;
        write_private(&self.path, content.as_bytes())
            .with_context(|| format!("Failed to write config file: {}", self.path.display()))?;

        log::debug!("Saved config to {}", self.path.display());
        Ok(())
    }

    /// Remove the record. Deleting a missing file succeeds.
    pub fn delete(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| {
                format!("Failed to delete config file: {}", self.path.display())
            }),
        }
    }
}

#[cfg(unix)]
fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // mode() only applies on creation
    file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    file.write_all(content)
}

#[cfg(not(unix))]
fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
    std::fs::write(path, content)
}
