use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::discovery::ProbeLimits;
use crate::session::{NoticeTimings, SessionSettings};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Target language of translation prompts (ISO code or language name)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Decoder and probing settings
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Output file settings
    #[serde(default)]
    pub output: OutputConfig,

    /// User notice settings
    #[serde(default)]
    pub notices: NoticeConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Decoder and probing configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ExtractionConfig {
    // @field: ffmpeg executable
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: String,

    // @field: Maximum number of discovery probes
    #[serde(default = "default_probe_limit")]
    pub probe_limit: usize,

    // @field: Seconds decoded by each probe
    #[serde(default = "default_probe_duration_secs")]
    pub probe_duration_secs: u64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            probe_limit: default_probe_limit(),
            probe_duration_secs: default_probe_duration_secs(),
        }
    }
}

/// Output file configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OutputConfig {
    /// Directory receiving subtitle files; the download directory when unset
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Prefix of generated file names
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            file_prefix: default_file_prefix(),
        }
    }
}

/// Notice display configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NoticeConfig {
    /// Milliseconds an error stays visible
    #[serde(default = "default_error_display_ms")]
    pub error_display_ms: u64,

    /// Milliseconds a success message stays visible
    #[serde(default = "default_success_display_ms")]
    pub success_display_ms: u64,
}

impl Default for NoticeConfig {
    fn default() -> Self {
        Self {
            error_display_ms: default_error_display_ms(),
            success_display_ms: default_success_display_ms(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Matching `log` filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_target_language() -> String {
    "fr".to_string()
}

fn default_ffmpeg_path() -> String {
    "ffmpeg".to_string()
}

fn default_probe_limit() -> usize {
    10
}

fn default_probe_duration_secs() -> u64 {
    1
}

fn default_file_prefix() -> String {
    "subtitles".to_string()
}

fn default_error_display_ms() -> u64 {
    5000
}

fn default_success_display_ms() -> u64 {
    3000
}

impl Config {
    /// Load a configuration file, or create one with defaults when missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        log::warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.target_language.trim().is_empty() {
            return Err(anyhow!("Target language must not be empty"));
        }

        if self.extraction.ffmpeg_path.trim().is_empty() {
            return Err(anyhow!("ffmpeg path must not be empty"));
        }

        if self.extraction.probe_limit == 0 {
            return Err(anyhow!("probe_limit must be at least 1"));
        }

        if self.extraction.probe_duration_secs == 0 {
            return Err(anyhow!("probe_duration_secs must be at least 1"));
        }

        if self.output.file_prefix.trim().is_empty()
            || self.output.file_prefix.contains(['/', '\\'])
        {
            return Err(anyhow!("Invalid output file prefix: '{}'", self.output.file_prefix));
        }

        Ok(())
    }

    /// Directory receiving output files
    pub fn output_dir(&self) -> PathBuf {
        self.output
            .output_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Session tunables derived from this configuration
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            probe_limits: ProbeLimits {
                max_probes: self.extraction.probe_limit,
                probe_duration: Duration::from_secs(self.extraction.probe_duration_secs),
            },
            notice_timings: NoticeTimings {
                error: Duration::from_millis(self.notices.error_display_ms),
                success: Duration::from_millis(self.notices.success_display_ms),
            },
            file_prefix: self.output.file_prefix.clone(),
        }
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            target_language: default_target_language(),
            extraction: ExtractionConfig::default(),
            output: OutputConfig::default(),
            notices: NoticeConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
