use chrono::NaiveDate;
use log::info;
use std::sync::atomic::{AtomicBool, Ordering};

use super::data::render_invoice;
use super::path::{invoice_folder, invoice_path};
use crate::config::{FilePolicy, Settings, SettingsStore};
use crate::error::{InvoiceError, Result};
use crate::money::format_usd;
use crate::period::{resolve_previous_month, Period};
use crate::storage::{FileHandle, Storage};
use crate::workdays::count_billable_hours;

/// Result of one generation run
#[derive(Debug, Clone, PartialEq)]
pub enum Generated {
    Created {
        handle: FileHandle,
        period: Period,
        number: u32,
        hours: u32,
        amount: f64,
    },
    /// The month-keyed invoice already existed
    Skipped { path: String, period: Period },
}

/// Held while a generation is running; a second run fails instead of reusing the number.
#[derive(Debug, Default)]
pub(crate) struct GenerationLatch {
    busy: AtomicBool,
}

pub(crate) struct LatchGuard<'a> {
    latch: &'a GenerationLatch,
}

impl GenerationLatch {
    pub(crate) fn try_acquire(&self) -> Option<LatchGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| LatchGuard { latch: self })
    }
}

impl Drop for LatchGuard<'_> {
    fn drop(&mut self) {
        self.latch.busy.store(false, Ordering::Release);
    }
}

/// Ties period resolution, hour counting, naming, rendering and persistence together.
#[derive(Debug)]
pub struct Generator<S, P> {
    storage: S,
    settings_store: P,
    latch: GenerationLatch,
}

impl<S: Storage, P: SettingsStore> Generator<S, P> {
    pub fn new(storage: S, settings_store: P) -> Self {
        Self {
            storage,
            settings_store,
            latch: GenerationLatch::default(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn settings_store(&self) -> &P {
        &self.settings_store
    }

    /// Generate the invoice for the month before `today`.
    ///
    /// The invoice number in `settings` only advances once the document is written
    /// and the new settings are saved.
    pub fn generate(&self, settings: &mut Settings, today: NaiveDate) -> Result<Generated> {
        let _guard = self
            .latch
            .try_acquire()
            .ok_or(InvoiceError::GenerationInProgress)?;

        let period = resolve_previous_month(today);
        let hours = count_billable_hours(&period);
        let path = invoice_path(settings, &period);

        if settings.file_policy == FilePolicy::SkipExisting && self.storage.exists(&path) {
            info!("Invoice for {} already exists at {}, skipping", period, path);
            return Ok(Generated::Skipped { path, period });
        }

        let body = render_invoice(settings, &period, hours, today);

        let folder = invoice_folder(settings);
        if !folder.is_empty() {
            self.storage.mkdir(folder)?;
        }
        let handle = self.storage.create_file(&path, &body)?;

        let number = settings.invoice_number;
        let amount = settings.hourly_rate * f64::from(hours);
        info!(
            "Wrote invoice #{} for {} ({} hours, {})",
            number,
            period,
            hours,
            format_usd(amount)
        );

        let mut next = settings.clone();
        next.invoice_number = number.saturating_add(1);
        next.last_period = Some(period.key());
        self.settings_store.save(&next)?;
        *settings = next;

        Ok(Generated::Created {
            handle,
            period,
            number,
            hours,
            amount,
        })
    }
}
