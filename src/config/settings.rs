use log::warn;
use serde::{de::IgnoredAny, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use super::wiring::WiringInstructions;
use crate::error::{InvoiceError, Result};

pub const DEFAULT_INVOICE_FOLDER: &str = "invoices";
pub const DEFAULT_INVOICE_NUMBER: u32 = 1;

/// How invoice files are named and what happens when one already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilePolicy {
    /// `Invoice for March 2024 - Jane Doe (#0007).md`, always created
    #[default]
    Numbered,
    /// `Invoice 2024-03.md`, skipped when the file is already there
    SkipExisting,
}

impl fmt::Display for FilePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilePolicy::Numbered => write!(f, "numbered"),
            FilePolicy::SkipExisting => write!(f, "skip-existing"),
        }
    }
}

impl FromStr for FilePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "numbered" => Ok(FilePolicy::Numbered),
            "skip-existing" => Ok(FilePolicy::SkipExisting),
            _ => Err("expected 'numbered' or 'skip-existing'".to_string()),
        }
    }
}

/// User configuration. Unset keys fall back to [`Settings::default`].
///
/// The camelCase aliases accept the `data.json` written by the note-taking plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(alias = "invoiceFolder")]
    pub invoice_folder: String,
    #[serde(alias = "invoiceNumber", deserialize_with = "lenient_invoice_number")]
    pub invoice_number: u32,
    #[serde(alias = "issuerName")]
    pub issuer_name: String,
    #[serde(alias = "issuerAddress")]
    pub issuer_address: String,
    #[serde(alias = "issuerEmail")]
    pub issuer_email: String,
    #[serde(alias = "hourlyRate", deserialize_with = "lenient_hourly_rate")]
    pub hourly_rate: f64,
    #[serde(alias = "wiringInstructions")]
    pub wiring_instructions: String,
    pub file_policy: FilePolicy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vault_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_period: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            invoice_folder: DEFAULT_INVOICE_FOLDER.to_string(),
            invoice_number: DEFAULT_INVOICE_NUMBER,
            issuer_name: String::new(),
            issuer_address: String::new(),
            issuer_email: String::new(),
            hourly_rate: 0.0,
            wiring_instructions: String::new(),
            file_policy: FilePolicy::default(),
            vault_dir: None,
            last_period: None,
        }
    }
}

/// Settings that can be changed from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SettingKey {
    InvoiceFolder,
    InvoiceNumber,
    IssuerName,
    IssuerAddress,
    IssuerEmail,
    HourlyRate,
    WiringInstructions,
    FilePolicy,
    VaultDir,
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SettingKey::InvoiceFolder => "invoice-folder",
            SettingKey::InvoiceNumber => "invoice-number",
            SettingKey::IssuerName => "issuer-name",
            SettingKey::IssuerAddress => "issuer-address",
            SettingKey::IssuerEmail => "issuer-email",
            SettingKey::HourlyRate => "hourly-rate",
            SettingKey::WiringInstructions => "wiring-instructions",
            SettingKey::FilePolicy => "file-policy",
            SettingKey::VaultDir => "vault-dir",
        };
        f.write_str(name)
    }
}

impl Settings {
    pub fn wiring(&self) -> WiringInstructions {
        WiringInstructions::parse(&self.wiring_instructions)
    }

    /// Validate and apply a single user edit. On error the previous value is kept.
    ///
    /// A literal `\n` in `value` becomes a line break so multi-line fields can be
    /// entered on one command line.
    pub fn set(&mut self, key: SettingKey, value: &str) -> Result<()> {
        let invalid = |reason: &str| InvoiceError::InvalidSetting {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        };
        let text = value.replace("\\n", "\n");

        match key {
            SettingKey::InvoiceFolder => self.invoice_folder = text.trim().to_string(),
            SettingKey::InvoiceNumber => {
                self.invoice_number = parse_invoice_number(value)
                    .ok_or_else(|| invalid("must be a whole number of at least 1"))?;
            }
            SettingKey::IssuerName => self.issuer_name = text,
            SettingKey::IssuerAddress => self.issuer_address = text,
            SettingKey::IssuerEmail => self.issuer_email = text.trim().to_string(),
            SettingKey::HourlyRate => {
                self.hourly_rate = parse_hourly_rate(value)
                    .ok_or_else(|| invalid("must be a number greater than or equal to 0"))?;
            }
            SettingKey::WiringInstructions => self.wiring_instructions = text,
            SettingKey::FilePolicy => {
                self.file_policy = value.parse().map_err(|e: String| invalid(&e))?;
            }
            SettingKey::VaultDir => {
                let dir = text.trim();
                self.vault_dir = if dir.is_empty() {
                    None
                } else {
                    Some(dir.to_string())
                };
            }
        }

        Ok(())
    }
}

pub fn parse_invoice_number(input: &str) -> Option<u32> {
    input.trim().parse::<u32>().ok().filter(|n| *n >= 1)
}

pub fn parse_hourly_rate(input: &str) -> Option<f64> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|rate| rate.is_finite() && *rate >= 0.0)
}

/// Numbers may arrive as numbers or as the strings a text input produced
#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient {
    Int(i64),
    Float(f64),
    Text(String),
    Other(IgnoredAny),
}

fn lenient_invoice_number<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<u32, D::Error> {
    let parsed = match Lenient::deserialize(d)? {
        Lenient::Int(n) => u32::try_from(n).ok().filter(|n| *n >= 1),
        Lenient::Float(f) if f.fract() == 0.0 && f >= 1.0 && f <= u32::MAX as f64 => {
            Some(f as u32)
        }
        Lenient::Text(s) => parse_invoice_number(&s),
        _ => None,
    };

    Ok(parsed.unwrap_or_else(|| {
        warn!("Ignoring invalid invoice number, using {DEFAULT_INVOICE_NUMBER}");
        DEFAULT_INVOICE_NUMBER
    }))
}

fn lenient_hourly_rate<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<f64, D::Error> {
    let parsed = match Lenient::deserialize(d)? {
        Lenient::Int(n) if n >= 0 => Some(n as f64),
        Lenient::Float(f) if f.is_finite() && f >= 0.0 => Some(f),
        Lenient::Text(s) => parse_hourly_rate(&s),
        _ => None,
    };

    Ok(parsed.unwrap_or_else(|| {
        warn!("Ignoring invalid hourly rate, using 0");
        0.0
    }))
}
