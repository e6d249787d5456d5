use chrono::NaiveDate;

use crate::config::{Settings, WiringInstructions};
use crate::markdown::render_markdown;
use crate::money::format_usd;
use crate::period::Period;

/// Issuer block of the invoice
#[derive(Debug, Clone)]
pub struct Issuer {
    pub name: String,
    pub address: String,
    pub email: String,
}

/// The single billed line of a monthly invoice
#[derive(Debug, Clone)]
pub struct InvoiceLineItem {
    pub description: String,
    pub hours: u32,
    pub rate: f64,
    pub amount: f64,
}

/// Everything the invoice template needs
#[derive(Debug, Clone)]
pub struct InvoiceData {
    /// Generation date, `DD-MM-YYYY`
    pub date: String,
    /// Unpadded invoice number
    pub number: u32,
    pub period: String,
    pub issuer: Issuer,
    pub item: InvoiceLineItem,
    pub total: f64,
    pub wiring: WiringInstructions,
}

impl InvoiceData {
    pub fn new(settings: &Settings, period: &Period, hours: u32, today: NaiveDate) -> Self {
        let amount = settings.hourly_rate * f64::from(hours);

        Self {
            date: today.format("%d-%m-%Y").to_string(),
            number: settings.invoice_number,
            period: period.label(),
            issuer: Issuer {
                name: settings.issuer_name.clone(),
                address: settings.issuer_address.clone(),
                email: settings.issuer_email.clone(),
            },
            item: InvoiceLineItem {
                description: format!("Services for {}", period.label()),
                hours,
                rate: settings.hourly_rate,
                amount,
            },
            total: amount,
            wiring: settings.wiring(),
        }
    }

    pub fn formatted_rate(&self) -> String {
        format_usd(self.item.rate)
    }

    pub fn formatted_total(&self) -> String {
        format_usd(self.total)
    }
}

/// Render the invoice document body for `period`
pub fn render_invoice(settings: &Settings, period: &Period, hours: u32, today: NaiveDate) -> String {
    render_markdown(&InvoiceData::new(settings, period, hours, today))
}
