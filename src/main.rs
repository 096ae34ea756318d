// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, Context};
use log::{info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::PathBuf;
use std::io::Write;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand, Args};
use clap_complete::{generate, Shell};

use subtrack::app_config::{self, Config};
use subtrack::app_controller::Controller;
use subtrack::file_utils::FileManager;

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

/// Input file and track selection shared by the pipeline commands
#[derive(Args, Debug)]
struct SelectionArgs {
    /// Video container or SRT file
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Subtitle track index to use, repeatable (as printed by `list`);
    /// tracks are merged in ascending index order whatever the flag order
    #[arg(short = 's', long = "track", value_name = "INDEX")]
    tracks: Vec<usize>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the subtitle tracks of a video file
    List {
        /// Video container or SRT file
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,
    },

    /// Extract subtitle tracks into one SRT file
    Extract {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Output directory (defaults to the configured one)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Print a numbered translation request for the selected tracks
    Prompt {
        #[command(flatten)]
        selection: SelectionArgs,

        /// Target language code or name (e.g. 'fr', 'Brazilian Portuguese')
        #[arg(short, long)]
        target_language: Option<String>,

        /// Write the request to this file instead of stdout
        #[arg(short, long)]
        output_file: Option<PathBuf>,
    },

    /// Merge a translated reply back into the selected tracks
    Merge {
        #[command(flatten)]
        selection: SelectionArgs,

        /// File holding the translator's numbered reply
        #[arg(short, long, value_name = "FILE")]
        reply: PathBuf,

        /// Output directory (defaults to the configured one)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Generate shell completions for subtrack
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// subtrack - subtitle track extraction and copy/paste translation
///
/// Extracts subtitle tracks from video files, merges them into one SRT file
/// and round-trips the text through any translator via copy/paste.
#[derive(Parser, Debug)]
#[command(name = "subtrack")]
#[command(version)]
#[command(about = "Subtitle track extraction and copy/paste translation")]
#[command(long_about = "subtrack extracts subtitle tracks from video files with ffmpeg.

EXAMPLES:
    subtrack list movie.mkv                         # Show available subtitle tracks
    subtrack extract movie.mkv                      # Extract the first track
    subtrack extract -s 0 -s 2 movie.mkv            # Merge tracks 0 and 2 into one file
    subtrack prompt -t es movie.mkv > request.txt   # Build a translation request
    subtrack merge -r reply.txt movie.mkv           # Merge the translated reply
    subtrack completions bash > subtrack.bash       # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
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

    // @returns: Emoji and ANSI color for level
    fn decoration(level: Level) -> (&'static str, &'static str) {
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
            let (emoji, color) = Self::decoration(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                color, now, emoji, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Trace is the ceiling; the effective level is applied below
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "subtrack", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(level) = &cli.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = Config::load_or_create(&cli.config_path)?;

    // Update log level in config if specified via command line
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }
    log::set_max_level(config.log_level.to_level_filter());

    let controller = Controller::with_config(config)?;
    run_command(&controller, cli.command).await
}

async fn run_command(controller: &Controller, command: Commands) -> Result<()> {
    match command {
        Commands::List { input_path } => {
            let streams = controller.list_streams(&input_path).await?;
            if streams.is_empty() {
                println!("No subtitle tracks found");
            }
            for stream in streams {
                println!("[{}] {} (codec: {})", stream.index, stream.display_name, stream.codec);
            }
        }
        Commands::Extract { selection, output_dir } => {
            let output_dir = output_dir.unwrap_or_else(|| controller.config().output_dir());
            controller
                .extract(&selection.input_path, &selection.tracks, &output_dir)
                .await?;
        }
        Commands::Prompt { selection, target_language, output_file } => {
            let prompt = controller
                .prompt(&selection.input_path, &selection.tracks, target_language.as_deref())
                .await?;
            match output_file {
                Some(path) => {
                    FileManager::write_to_file(&path, prompt.as_bytes())
                        .context("Failed to write translation request")?;
                    info!("Translation request written to {}", path.display());
                }
                None => print!("{}", prompt),
            }
        }
        Commands::Merge { selection, reply, output_dir } => {
            let output_dir = output_dir.unwrap_or_else(|| controller.config().output_dir());
            let (_, report) = controller
                .merge(&selection.input_path, &selection.tracks, &reply, &output_dir)
                .await?;
            info!(
                "{} line(s) translated, {} kept original text",
                report.translated,
                report.fallbacks.len()
            );
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}
