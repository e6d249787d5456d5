use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use log::error;
use std::env;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tabled::{settings::Style, Table, Tabled};

use monthly_invoice::config::{
    config_dir, resolve_vault_dir, FileSettingsStore, SettingKey, Settings, SettingsStore,
    SETTINGS_TEMPLATE,
};
use monthly_invoice::invoice::{invoice_path, padded_number};
use monthly_invoice::money::format_usd;
use monthly_invoice::period::resolve_previous_month;
use monthly_invoice::workdays::{count_billable_hours, count_weekdays, HOURS_PER_DAY};
use monthly_invoice::{App, FsStorage, Generated, Generator, InvoiceError, Result};

/// Environment variable holding the log filter
const LOG_ENV: &str = "MONTHLY_INVOICE_LOG";

#[derive(Parser)]
#[command(name = "monthly-invoice")]
#[command(version, about = "Generate last month's invoice from your hourly rate", long_about = None)]
struct Cli {
    /// Path to config directory (default: XDG config dir or ~/.monthly-invoice)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    /// Settings file to use instead of settings.toml in the config directory.
    /// A .json file is read and written as JSON.
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Directory the invoice folder lives in (overrides the vault_dir setting)
    #[arg(long, global = true)]
    vault: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with a settings template
    Init,

    /// Generate the invoice for last month
    Generate {
        /// Pretend today is this date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// Open the generated invoice with the system default viewer
        #[arg(long)]
        open: bool,
    },

    /// Show settings and the next invoice
    Status,

    /// Show billable hours for last month
    Hours {
        /// Pretend today is this date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,
    },

    /// Change a setting
    Set {
        key: SettingKey,

        /// New value. Use \n for line breaks in multi-line fields.
        value: String,
    },

    /// Keep running and generate each month's invoice once it is due
    Watch {
        /// Seconds between checks
        #[arg(long, default_value_t = 300)]
        interval_secs: u64,

        /// Stop after this many checks (default: run until interrupted)
        #[arg(long)]
        ticks: Option<u64>,
    },
}

fn set_env_if_absent<K: AsRef<OsStr>, V: AsRef<OsStr>>(var: K, default: impl FnOnce() -> V) {
    if env::var(var.as_ref()).is_err() {
        env::set_var(var, default());
    }
}

fn main() {
    set_env_if_absent(LOG_ENV, || "info");
    pretty_env_logger::init_custom_env(LOG_ENV);

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Determine config directory
    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };
    let location = Location {
        cfg_dir,
        settings: cli.settings,
    };
    let vault = cli.vault.as_deref();

    match cli.command {
        Commands::Init => cmd_init(&location),
        Commands::Generate { date, open } => cmd_generate(&location, vault, date, open),
        Commands::Status => cmd_status(&location, vault),
        Commands::Hours { date } => cmd_hours(date),
        Commands::Set { key, value } => cmd_set(&location, key, &value),
        Commands::Watch {
            interval_secs,
            ticks,
        } => cmd_watch(&location, vault, interval_secs, ticks),
    }
}

/// Where the settings live: an explicit `--settings` file, or `settings.toml`
/// inside the config directory
struct Location {
    cfg_dir: PathBuf,
    settings: Option<PathBuf>,
}

impl Location {
    /// The store for an existing configuration
    fn store(&self) -> Result<FileSettingsStore> {
        match &self.settings {
            Some(path) if path.is_file() => Ok(FileSettingsStore::new(path.clone())),
            Some(path) => Err(InvoiceError::SettingsNotFound(path.clone())),
            None => {
                ensure_config(&self.cfg_dir)?;
                Ok(FileSettingsStore::in_dir(&self.cfg_dir))
            }
        }
    }

    /// Directory a relative `vault_dir` setting is resolved against
    fn base_dir(&self) -> &Path {
        self.settings
            .as_deref()
            .and_then(Path::parent)
            .unwrap_or(self.cfg_dir.as_path())
    }

    fn describe(&self) -> String {
        match &self.settings {
            Some(path) => format!("Settings file:    {}", path.display()),
            None => format!("Config directory: {}", self.cfg_dir.display()),
        }
    }
}

fn parse_date(date: Option<String>) -> Result<NaiveDate> {
    match date {
        Some(s) => {
            NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|_| InvoiceError::InvalidDate(s))
        }
        None => Ok(chrono::Local::now().date_naive()),
    }
}

fn ensure_config(cfg_dir: &Path) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(InvoiceError::ConfigNotFound(cfg_dir.to_path_buf()));
    }
    Ok(())
}

/// Load the settings once and wire a generator to the resolved vault
fn open_generator(
    location: &Location,
    vault: Option<&Path>,
) -> Result<(Generator<FsStorage, FileSettingsStore>, Settings)> {
    let store = location.store()?;
    let settings = store.load()?;
    let vault_dir = resolve_vault_dir(vault, &settings, location.base_dir())?;

    Ok((Generator::new(FsStorage::new(vault_dir), store), settings))
}

/// Initialize config with the settings template
fn cmd_init(location: &Location) -> Result<()> {
    let store = match &location.settings {
        Some(path) => {
            if path.exists() {
                return Err(InvoiceError::AlreadyInitialized(path.clone()));
            }
            FileSettingsStore::new(path.clone())
        }
        None => {
            if location.cfg_dir.exists() {
                return Err(InvoiceError::AlreadyInitialized(location.cfg_dir.clone()));
            }
            fs::create_dir_all(&location.cfg_dir)?;
            FileSettingsStore::in_dir(&location.cfg_dir)
        }
    };

    if store.is_json() {
        // JSON has no comments to carry the template's explanations
        store.save(&Settings::default())?;
    } else {
        if let Some(parent) = store.path().parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(store.path(), SETTINGS_TEMPLATE)?;
    }

    println!("Initialized monthly-invoice config at: {}", store.path().display());
    println!();
    println!("Next steps:");
    println!("  1. Fill in your details:  $EDITOR {}", store.path().display());
    println!("     or: monthly-invoice set hourly-rate 85");
    println!("  2. Generate last month's invoice:");
    println!("     monthly-invoice generate");

    Ok(())
}

fn print_generated(generated: &Generated) {
    match generated {
        Generated::Created {
            handle,
            period,
            number,
            hours,
            amount,
        } => {
            println!("Generated invoice #{} for {}", number, period);
            println!("  Hours:  {}", hours);
            println!("  Amount: {}", format_usd(*amount));
            println!("  Saved:  {}", handle.location.display());
        }
        Generated::Skipped { path, period } => {
            println!("Invoice for {} already exists: {}", period, path);
        }
    }
}

/// Generate last month's invoice
fn cmd_generate(
    location: &Location,
    vault: Option<&Path>,
    date: Option<String>,
    open: bool,
) -> Result<()> {
    let today = parse_date(date)?;

    let (generator, mut settings) = open_generator(location, vault)?;
    let generated = generator.generate(&mut settings, today)?;
    print_generated(&generated);

    if open {
        if let Generated::Created { handle, .. } = &generated {
            open_path(&handle.location)?;
        }
    }
    Ok(())
}

#[derive(Tabled)]
struct SettingRow {
    #[tabled(rename = "SETTING")]
    setting: String,
    #[tabled(rename = "VALUE")]
    value: String,
}

impl SettingRow {
    fn new(setting: impl ToString, value: impl ToString) -> Self {
        Self {
            setting: setting.to_string(),
            value: value.to_string(),
        }
    }
}

/// Show settings and the next invoice
fn cmd_status(location: &Location, vault: Option<&Path>) -> Result<()> {
    let settings = location.store()?.load()?;
    let vault_dir = resolve_vault_dir(vault, &settings, location.base_dir())?;

    let rows = vec![
        SettingRow::new(SettingKey::InvoiceFolder, &settings.invoice_folder),
        SettingRow::new(SettingKey::InvoiceNumber, settings.invoice_number),
        SettingRow::new(SettingKey::IssuerName, &settings.issuer_name),
        SettingRow::new(SettingKey::IssuerAddress, &settings.issuer_address),
        SettingRow::new(SettingKey::IssuerEmail, &settings.issuer_email),
        SettingRow::new(SettingKey::HourlyRate, format_usd(settings.hourly_rate)),
        SettingRow::new(SettingKey::WiringInstructions, &settings.wiring_instructions),
        SettingRow::new(SettingKey::FilePolicy, settings.file_policy),
        SettingRow::new(SettingKey::VaultDir, vault_dir.display()),
    ];

    let period = resolve_previous_month(chrono::Local::now().date_naive());
    let hours = count_billable_hours(&period);

    println!("Invoice Status");
    println!("{}", "-".repeat(50));
    println!("{}", location.describe());
    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");
    println!();
    println!("Next invoice:     #{}", padded_number(settings.invoice_number));
    println!("Period:           {}", period);
    println!("Hours:            {}", hours);
    println!(
        "Amount:           {}",
        format_usd(settings.hourly_rate * f64::from(hours))
    );
    println!("File:             {}", invoice_path(&settings, &period));
    if let Some(last) = &settings.last_period {
        println!("Last invoiced:    {}", last);
    }

    Ok(())
}

/// Show billable hours for last month
fn cmd_hours(date: Option<String>) -> Result<()> {
    let today = parse_date(date)?;
    let period = resolve_previous_month(today);

    println!("Period:   {}", period);
    println!("Days:     {}", period.days_in_month());
    println!("Weekdays: {}", count_weekdays(&period));
    println!(
        "Hours:    {} ({} per weekday)",
        count_billable_hours(&period),
        HOURS_PER_DAY
    );

    Ok(())
}

/// Change a setting
fn cmd_set(location: &Location, key: SettingKey, value: &str) -> Result<()> {
    let store = location.store()?;
    let mut settings = store.load()?;
    settings.set(key, value)?;
    store.save(&settings)?;

    println!("Set {}", key);
    Ok(())
}

/// Check on a timer and generate each period's invoice once
fn cmd_watch(
    location: &Location,
    vault: Option<&Path>,
    interval_secs: u64,
    ticks: Option<u64>,
) -> Result<()> {
    let (generator, settings) = open_generator(location, vault)?;
    let mut app = App::new(generator, settings);
    let mut count = 0;

    loop {
        match app.on_tick(chrono::Local::now().date_naive()) {
            Ok(Some(generated)) => print_generated(&generated),
            Ok(None) => {}
            // Keep the timer alive; the next tick retries
            Err(e) => error!("Invoice generation failed: {e}"),
        }

        count += 1;
        if ticks.is_some_and(|limit| count >= limit) {
            break;
        }
        thread::sleep(Duration::from_secs(interval_secs));
    }

    app.shutdown()
}

fn open_path(path: &Path) -> Result<()> {
    // Open with system default viewer
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(path).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(path).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", ""])
            .arg(path)
            .spawn()?;
    }
    Ok(())
}
