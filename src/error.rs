use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum InvoiceError {
    #[error("Config directory not found at {0}. Run 'monthly-invoice init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Config already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Settings file not found at {0}")]
    SettingsNotFound(PathBuf),

    #[error("Failed to parse settings file {path}: {source}")]
    SettingsParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to parse settings file {path}: {source}")]
    SettingsJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize settings: {0}")]
    SettingsSerialize(String),

    #[error("Invalid value '{value}' for setting '{key}': {reason}")]
    InvalidSetting {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Invalid month index {0} (expected 0-11)")]
    InvalidMonth(u32),

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Failed to create invoice folder {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write invoice {path}: {source}")]
    WriteInvoice {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invoice file already exists: {0}")]
    InvoiceExists(PathBuf),

    #[error("An invoice is already being generated")]
    GenerationInProgress,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, InvoiceError>;
