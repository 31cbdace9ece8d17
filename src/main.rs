// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use subsent::app_config::{self, Config};
use subsent::Controller;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch, merge and publish the transcripts of every video in the playlist
    Publish(PublishArgs),

    /// Merge local caption fragment JSON files into sentence transcripts
    Merge(MergeArgs),

    /// Generate shell completions for subsent
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct PublishArgs {
    /// YouTube Data API key
    #[arg(long, env = "YOUTUBE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Playlist to publish
    #[arg(long, env = "YOUTUBE_PLAYLIST_ID")]
    playlist_id: Option<String>,

    /// Public base URL the output directory is served from
    #[arg(long, env = "GITHUB_PAGES_BASE_URL")]
    base_url: Option<String>,

    /// Directory receiving index.json and the transcripts folder
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Number of videos processed at the same time
    #[arg(long)]
    concurrent_videos: Option<usize>,

    /// Character count that forces a sentence break
    #[arg(short, long)]
    max_chars: Option<usize>,
}

#[derive(Parser, Debug)]
struct MergeArgs {
    /// Fragment JSON file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Output directory (defaults to next to each input)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Character count that forces a sentence break
    #[arg(short, long)]
    max_chars: Option<usize>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,
}

/// subsent - sentence transcripts from automatic captions
///
/// Merges caption fragments into timed sentences and publishes them as
/// static JSON transcripts.
#[derive(Parser, Debug)]
#[command(name = "subsent")]
#[command(version)]
#[command(about = "Caption fragments to sentence transcripts")]
#[command(long_about = "subsent merges automatic caption fragments into sentence-level transcripts and publishes them as static JSON.

EXAMPLES:
    subsent publish                               # Publish the configured playlist
    subsent publish -o site/                      # Publish into another directory
    subsent merge captions.json                   # Write captions.sentences.json
    subsent merge -m 80 -o out/ raw/              # Merge a whole folder
    subsent completions bash > subsent.bash       # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically. YOUTUBE_API_KEY, YOUTUBE_PLAYLIST_ID and
    GITHUB_PAGES_BASE_URL are read from the environment when set.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: String,

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

    // @returns: Emoji and ANSI color for log level
    fn decoration_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌ ", "1;31"),
            Level::Warn => ("🚧 ", "1;33"),
            Level::Info => (" ", "1;32"),
            Level::Debug => ("🔍 ", "1;36"),
            Level::Trace => ("📋 ", "1;35"),
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
            let (emoji, color) = Self::decoration_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "\x1B[{}m{} {} {}\x1B[0m", color, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Accept everything here; the effective level is applied through set_max_level
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Some(cmd_log_level) = &cli.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "subsent", &mut std::io::stdout());
            Ok(())
        }
        Commands::Publish(args) => {
            let mut config = load_config(&cli.config_path, cli.log_level.is_some())?;

            if let Some(api_key) = args.api_key {
                config.youtube.api_key = api_key;
            }
            if let Some(playlist_id) = args.playlist_id {
                config.youtube.playlist_id = playlist_id;
            }
            if let Some(base_url) = args.base_url {
                config.publish.base_url = base_url;
            }
            if let Some(output_dir) = args.output_dir {
                config.publish.output_dir = output_dir;
            }
            if let Some(concurrent_videos) = args.concurrent_videos {
                config.publish.concurrent_videos = concurrent_videos;
            }
            if let Some(max_chars) = args.max_chars {
                config.merge.max_chars = max_chars;
            }

            config.validate_for_publish()
                .context("Configuration validation failed")?;

            let controller = Controller::with_config(config);
            let summary = controller.run_publish().await?;
            info!("Index written to {:?}", summary.index_path);
            Ok(())
        }
        Commands::Merge(args) => {
            let mut config = load_config(&cli.config_path, cli.log_level.is_some())?;

            if let Some(max_chars) = args.max_chars {
                config.merge.max_chars = max_chars;
            }

            config.validate()
                .context("Configuration validation failed")?;

            let controller = Controller::with_config(config);
            controller.run_merge(&args.input_path, args.output_dir.as_deref(), args.force_overwrite)?;
            Ok(())
        }
    }
}

/// Load or create the config file, applying its log level unless the CLI set one
fn load_config(config_path: &str, log_level_from_cli: bool) -> Result<Config> {
    let config = Config::load_or_create(config_path)?;

    if !log_level_from_cli {
        log::set_max_level(config.log_level.to_level_filter());
    }

    Ok(config)
}
