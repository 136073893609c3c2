// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info, warn};
use std::io::Write;
use std::path::PathBuf;

use substore::app_config::{LogLevel, StorageConfig};
use substore::{AgePolicy, FileObjectStore, SubtitleStorageManager, VideoSubtitleCollection};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for AgePolicy to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliAgePolicy {
    Added,
    Modified,
}

impl From<CliAgePolicy> for AgePolicy {
    fn from(cli_policy: CliAgePolicy) -> Self {
        match cli_policy {
            CliAgePolicy::Added => AgePolicy::AddedWithinWindow,
            CliAgePolicy::Modified => AgePolicy::ModifiedWithinWindow,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List every file in the data directory
    List,

    /// List subtitle collections stored recently
    Recent {
        /// Window in days (defaults to the configured value)
        #[arg(short, long)]
        days: Option<u32>,

        /// Timestamp the window is compared against
        #[arg(short, long, value_enum)]
        age_policy: Option<CliAgePolicy>,
    },

    /// Show the stored subtitles of one video
    Show {
        /// Host identifier of the video
        #[arg(value_name = "VIDEO_ID")]
        video_id: String,
    },
}

/// substore - subtitle storage inspector
///
/// Reads the per-video subtitle collections kept in a data directory.
#[derive(Parser, Debug)]
#[command(name = "substore")]
#[command(version)]
#[command(about = "Inspect stored subtitle collections")]
#[command(long_about = "substore reads the per-video subtitle collections kept in a data directory.

EXAMPLES:
    substore list                          # Every file in the data directory
    substore recent                        # Collections stored in the last 30 days
    substore recent -d 7 -a modified       # Collections updated in the last week
    substore show 12345                    # Parts, languages and records of one video
    substore --data-path ./DataItems list  # Use a specific data directory

CONFIGURATION:
    Configuration is stored in substore.json by default. You can specify a
    different file with --config. If the config file doesn't exist, a default
    one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "substore.json", global = true)]
    config_path: PathBuf,

    /// Data directory holding the stored collections
    #[arg(long, env = "SUBSTORE_DATA_PATH", global = true)]
    data_path: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour and tag for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "ERROR"),
            Level::Warn => ("1;33", "WARN "),
            Level::Info => ("1;32", "INFO "),
            Level::Debug => ("1;36", "DEBUG"),
            Level::Trace => ("1;35", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (colour, tag) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                colour, now, tag, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // The logger accepts everything; the effective level is set through max_level
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Some(cmd_log_level) = &cli.log_level {
        let level: LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = StorageConfig::load_or_default(&cli.config_path)?;

    if let Some(data_path) = &cli.data_path {
        config.data_path = Some(data_path.clone());
    }

    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if cli.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let data_path = config.resolved_data_path()?;
    info!("Using data directory {:?}", data_path);

    let manager = SubtitleStorageManager::new(FileObjectStore::new(&data_path))
        .with_age_policy(config.age_policy);

    match cli.command {
        Commands::List => run_list(&manager),
        Commands::Recent { days, age_policy } => {
            let manager = match age_policy {
                Some(policy) => manager.with_age_policy(policy.into()),
                None => manager,
            };
            run_recent(&manager, days.unwrap_or(config.recent_age_days))
        }
        Commands::Show { video_id } => run_show(&manager, &video_id),
    }
}

fn run_list(manager: &SubtitleStorageManager<FileObjectStore>) -> Result<()> {
    let files = manager
        .list_all_storage_files()
        .context("Failed to list data directory")?;

    if files.is_empty() {
        warn!("Data directory is empty");
    }
    for name in files {
        println!("{}", name);
    }
    Ok(())
}

fn run_recent(manager: &SubtitleStorageManager<FileObjectStore>, days: u32) -> Result<()> {
    let recent = manager
        .load_recent(days)
        .with_context(|| format!("Failed to load collections from the last {} days", days))?;

    info!(
        "{} collection(s) within {} day(s) by {}",
        recent.len(),
        days,
        manager.age_policy()
    );
    for (name, collection) in &recent {
        println!(
            "{}\t{}\t{} subtitle(s)",
            name,
            collection,
            collection.record_count()
        );
    }
    Ok(())
}

fn run_show(manager: &SubtitleStorageManager<FileObjectStore>, video_id: &str) -> Result<()> {
    let Some(collection) = manager
        .load(video_id)
        .with_context(|| format!("Failed to load subtitles for video {}", video_id))?
    else {
        warn!("No subtitles stored for video {}", video_id);
        return Ok(());
    };

    print_collection(&collection);
    Ok(())
}

fn print_collection(collection: &VideoSubtitleCollection) {
    println!("{}", collection);
    if let Some(version) = collection.version {
        println!("  schema version {}", version);
    }

    for (part_id, languages) in &collection.parts {
        for (lang, bucket) in languages {
            println!("  part {} [{}]", part_id, lang);
            for record in bucket.records() {
                let marker = if bucket.current_key() == Some(&record.key()) { "*" } else { " " };
                println!(
                    "   {} {}:{} score={} mode={} storage={} added={} md5={}",
                    marker,
                    record.provider_name,
                    record.subtitle_id,
                    record.score,
                    record.mode_verbose(),
                    record.storage_type,
                    record.date_added.format("%Y-%m-%d %H:%M"),
                    record.content_hash
                );
            }
        }
    }
}
