mod settings;
mod wiring;

pub use settings::{
    parse_hourly_rate, parse_invoice_number, FilePolicy, SettingKey, Settings,
    DEFAULT_INVOICE_FOLDER, DEFAULT_INVOICE_NUMBER,
};
pub use wiring::WiringInstructions;

use crate::error::{InvoiceError, Result};
use directories::ProjectDirs;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the settings file inside the config directory
pub const SETTINGS_FILE: &str = "settings.toml";

/// Get the config directory path (XDG config dir, or ~/.monthly-invoice/)
pub fn config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "monthly-invoice") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    let home = dirs_home().ok_or_else(|| {
        InvoiceError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".monthly-invoice"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand ~ in paths
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_home() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Resolve the directory invoices are written under.
///
/// An explicit override wins, then the `vault_dir` setting (relative paths are taken
/// from the config directory), then the current working directory.
pub fn resolve_vault_dir(
    override_dir: Option<&Path>,
    settings: &Settings,
    cfg_dir: &Path,
) -> Result<PathBuf> {
    if let Some(dir) = override_dir {
        return Ok(dir.to_path_buf());
    }

    match settings.vault_dir.as_deref() {
        Some(dir) => {
            let expanded = expand_path(dir);
            if expanded.is_absolute() {
                Ok(expanded)
            } else {
                Ok(cfg_dir.join(expanded))
            }
        }
        None => Ok(std::env::current_dir()?),
    }
}

/// Persistence for [`Settings`]
pub trait SettingsStore {
    /// Persisted values merged over the defaults. A missing file yields the defaults.
    fn load(&self) -> Result<Settings>;

    fn save(&self, settings: &Settings) -> Result<()>;
}

/// Settings kept in a single file. `.json` files are read and written as JSON,
/// everything else as TOML.
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The store for `settings.toml` inside a config directory
    pub fn in_dir(cfg_dir: &Path) -> Self {
        Self::new(cfg_dir.join(SETTINGS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the file is read and written as JSON
    pub fn is_json(&self) -> bool {
        self.path.extension().is_some_and(|ext| ext == "json")
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> Result<Settings> {
        if !self.path.exists() {
            debug!("No settings at {}, using defaults", self.path.display());
            return Ok(Settings::default());
        }

        let content = fs::read_to_string(&self.path)?;
        if self.is_json() {
            serde_json::from_str(&content).map_err(|e| InvoiceError::SettingsJson {
                path: self.path.clone(),
                source: e,
            })
        } else {
            toml::from_str(&content).map_err(|e| InvoiceError::SettingsParse {
                path: self.path.clone(),
                source: e,
            })
        }
    }

    fn save(&self, settings: &Settings) -> Result<()> {
        let content = if self.is_json() {
            serde_json::to_string_pretty(settings)
                .map_err(|e| InvoiceError::SettingsSerialize(e.to_string()))?
        } else {
            toml::to_string_pretty(settings)
                .map_err(|e| InvoiceError::SettingsSerialize(e.to_string()))?
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, content)?;
        debug!("Saved settings to {}", self.path.display());
        Ok(())
    }
}

/// Template content for settings.toml
pub const SETTINGS_TEMPLATE: &str = r#"# Folder (inside the vault) that invoices are written to.
# Missing folders are created.
invoice_folder = "invoices"

# Number of the next invoice. Advanced after every generated invoice.
invoice_number = 1

issuer_name = "Your Name"
issuer_address = """
123 Business Street
San Francisco, CA 94102"""
issuer_email = "billing@example.com"

# Hourly rate in USD
hourly_rate = 0.0

# One field per line: account number, SWIFT/routing code, bank name
wiring_instructions = """
000123456789
BANKUS33
Example Bank"""

# "numbered": Invoice for March 2024 - Your Name (#0001).md, one per generate
# "skip-existing": Invoice 2024-03.md, skipped when that month was already invoiced
file_policy = "numbered"

# Root directory invoice_folder is relative to (default: current directory)
# vault_dir = "~/Documents/Notes"
"#;
