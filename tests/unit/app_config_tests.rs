/*!
 * Tests for application configuration functionality
 */

use std::path::PathBuf;
use std::time::Duration;
use anyhow::Result;
use subtrack::app_config::{Config, LogLevel};
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.target_language, "fr");
    assert_eq!(config.extraction.ffmpeg_path, "ffmpeg");
    assert_eq!(config.extraction.probe_limit, 10);
    assert_eq!(config.extraction.probe_duration_secs, 1);
    assert_eq!(config.output.file_prefix, "subtitles");
    assert!(config.output.output_dir.is_none());
    assert_eq!(config.notices.error_display_ms, 5000);
    assert_eq!(config.notices.success_display_ms, 3000);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();

    config.target_language = "  ".to_string();
    assert!(config.validate().is_err());
    config.target_language = "Brazilian Portuguese".to_string();
    assert!(config.validate().is_ok());

    config.extraction.probe_limit = 0;
    assert!(config.validate().is_err());
    config.extraction.probe_limit = 3;

    config.extraction.probe_duration_secs = 0;
    assert!(config.validate().is_err());
    config.extraction.probe_duration_secs = 2;

    config.extraction.ffmpeg_path = String::new();
    assert!(config.validate().is_err());
    config.extraction.ffmpeg_path = "/usr/bin/ffmpeg".to_string();

    config.output.file_prefix = "a/b".to_string();
    assert!(config.validate().is_err());
    config.output.file_prefix = "movie".to_string();

    assert!(config.validate().is_ok());
}

/// Test that session settings mirror the configuration
#[test]
fn test_session_settings_withCustomConfig_shouldCarryValues() {
    let mut config = Config::default();
    config.extraction.probe_limit = 4;
    config.extraction.probe_duration_secs = 2;
    config.notices.error_display_ms = 100;
    config.output.file_prefix = "movie".to_string();

    let settings = config.session_settings();

    assert_eq!(settings.probe_limits.max_probes, 4);
    assert_eq!(settings.probe_limits.probe_duration, Duration::from_secs(2));
    assert_eq!(settings.notice_timings.error, Duration::from_millis(100));
    assert_eq!(settings.notice_timings.success, Duration::from_millis(3000));
    assert_eq!(settings.file_prefix, "movie");
}

/// Test that a configured output directory wins over the default
#[test]
fn test_output_dir_withConfiguredDir_shouldUseIt() {
    let mut config = Config::default();
    config.output.output_dir = Some(PathBuf::from("/tmp/subs"));

    assert_eq!(config.output_dir(), PathBuf::from("/tmp/subs"));
}

/// Test that a missing config file is created with defaults
#[test]
fn test_load_or_create_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let config = Config::load_or_create(&path)?;

    assert!(path.exists());
    assert_eq!(config.target_language, "fr");
    let reloaded = Config::load_or_create(&path)?;
    assert_eq!(reloaded.extraction.probe_limit, config.extraction.probe_limit);
    Ok(())
}

/// Test that partial files are completed with defaults
#[test]
fn test_load_or_create_withPartialFile_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{ "target_language": "es", "extraction": { "probe_limit": 3 }, "log_level": "debug" }"#,
    )?;

    let config = Config::load_or_create(&path)?;

    assert_eq!(config.target_language, "es");
    assert_eq!(config.extraction.probe_limit, 3);
    assert_eq!(config.extraction.ffmpeg_path, "ffmpeg");
    assert_eq!(config.notices.success_display_ms, 3000);
    assert_eq!(config.log_level, LogLevel::Debug);
    Ok(())
}

/// Test that malformed files are an error
#[test]
fn test_load_or_create_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;

    assert!(Config::load_or_create(&path).is_err());
    Ok(())
}

/// Test log level mapping
#[test]
fn test_log_level_toLevelFilter_shouldMapEveryLevel() {
    assert_eq!(LogLevel::Error.to_level_filter(), log::LevelFilter::Error);
    assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
}
