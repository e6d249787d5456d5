use chrono::NaiveDate;
use log::{debug, info, warn};

use crate::config::{FilePolicy, Settings, SettingsStore};
use crate::error::{InvoiceError, Result};
use crate::invoice::{Generated, Generator};
use crate::period::{resolve_previous_month, Period};
use crate::storage::Storage;

/// A long-running invoice generator.
///
/// Other processes may edit the settings file while it runs, so every generation
/// starts from the persisted settings rather than the copy held here.
pub struct App<S, P> {
    settings: Settings,
    generator: Generator<S, P>,
}

impl<S: Storage, P: SettingsStore> App<S, P> {
    pub fn start(generator: Generator<S, P>) -> Result<Self> {
        let settings = generator.settings_store().load()?;
        Ok(Self::new(generator, settings))
    }

    /// Start from settings the caller already loaded
    pub fn new(generator: Generator<S, P>, settings: Settings) -> Self {
        debug!("Started, next invoice #{}", settings.invoice_number);
        Self {
            settings,
            generator,
        }
    }

    /// The settings as of the last load or generation
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn refresh(&mut self) -> Result<()> {
        self.settings = self.generator.settings_store().load()?;
        Ok(())
    }

    /// Mark `period` as handled; `skip_number` also moves past a number already on disk.
    fn record_period(&mut self, period: &Period, skip_number: bool) -> Result<()> {
        let mut next = self.settings.clone();
        next.last_period = Some(period.key());
        if skip_number {
            next.invoice_number = next.invoice_number.saturating_add(1);
        }
        self.generator.settings_store().save(&next)?;
        self.settings = next;
        Ok(())
    }

    /// User-triggered generation. Always runs.
    pub fn generate(&mut self, today: NaiveDate) -> Result<Generated> {
        self.refresh()?;
        self.generator.generate(&mut self.settings, today)
    }

    /// Timer-triggered generation: handles each period once, so repeated ticks in the
    /// same month never issue new invoice numbers.
    pub fn on_tick(&mut self, today: NaiveDate) -> Result<Option<Generated>> {
        self.refresh()?;

        let period = resolve_previous_month(today);
        if self.settings.last_period.as_deref() == Some(period.key().as_str()) {
            debug!("{} already invoiced", period);
            return Ok(None);
        }

        match self.generator.generate(&mut self.settings, today) {
            Ok(generated @ Generated::Skipped { .. }) => {
                self.record_period(&period, false)?;
                Ok(Some(generated))
            }
            // A numbered file for this period was written but the counter never advanced
            Err(InvoiceError::InvoiceExists(path))
                if self.settings.file_policy == FilePolicy::Numbered =>
            {
                warn!(
                    "Invoice #{} for {} already exists at {}, moving to the next number",
                    self.settings.invoice_number,
                    period,
                    path.display()
                );
                self.record_period(&period, true)?;
                Ok(None)
            }
            other => other.map(Some),
        }
    }

    /// Settings are persisted after every generation, so there is nothing left to save.
    pub fn shutdown(self) -> Result<()> {
        info!("Stopped, next invoice #{}", self.settings.invoice_number);
        Ok(())
    }
}
