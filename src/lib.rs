pub mod app;
pub mod config;
pub mod error;
pub mod invoice;
pub mod markdown;
pub mod money;
pub mod period;
pub mod storage;
pub mod workdays;

pub use app::App;
pub use config::{FilePolicy, FileSettingsStore, Settings, SettingsStore, WiringInstructions};
pub use error::{InvoiceError, Result};
pub use invoice::{Generated, Generator, InvoiceData};
pub use period::{resolve_previous_month, Period};
pub use storage::{FileHandle, FsStorage, Storage};
pub use workdays::count_billable_hours;
