use crate::config::{FilePolicy, Settings};
use crate::period::Period;

/// Invoice number as it appears in file names: zero-padded to 4 digits
pub fn padded_number(number: u32) -> String {
    format!("{:04}", number)
}

/// File name of the invoice for `period` under the configured [`FilePolicy`]
pub fn invoice_file_name(settings: &Settings, period: &Period) -> String {
    match settings.file_policy {
        FilePolicy::Numbered => format!(
            "Invoice for {} - {} (#{}).md",
            period.label(),
            settings.issuer_name,
            padded_number(settings.invoice_number)
        ),
        FilePolicy::SkipExisting => {
            format!("Invoice {}-{:02}.md", period.year(), period.month() + 1)
        }
    }
}

/// The configured invoice folder without trailing separators
pub fn invoice_folder(settings: &Settings) -> &str {
    settings.invoice_folder.trim().trim_end_matches('/')
}

/// Path of the invoice relative to the vault root
pub fn invoice_path(settings: &Settings, period: &Period) -> String {
    let name = invoice_file_name(settings, period);
    match invoice_folder(settings) {
        "" => name,
        folder => format!("{}/{}", folder, name),
    }
}
