use anyhow::{Result, Context, anyhow};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use indicatif::{ProgressBar, ProgressStyle};

use crate::app_config::Config;
use crate::decoder::{Decoder, DecoderInput, FfmpegDecoder, SharedDecoder};
use crate::discovery::StreamDescriptor;
use crate::file_utils::{FileManager, FileType};
use crate::language_utils;
use crate::session::{LogReporter, Session, StatusReporter};
use crate::translation::MergeReport;

// @module: Application controller driving sessions from the command line

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Where session notices go
    reporter: Arc<dyn StatusReporter>,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self {
            config,
            reporter: Arc::new(LogReporter),
        })
    }

    /// Replace the notice sink
    pub fn with_reporter(mut self, reporter: Arc<dyn StatusReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Configuration in use
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn ffmpeg(&self) -> FfmpegDecoder {
        FfmpegDecoder::new(&self.config.extraction.ffmpeg_path)
    }

    /// List the subtitle tracks of a file
    pub async fn list_streams(&self, input_file: &Path) -> Result<Vec<StreamDescriptor>> {
        self.list_streams_with(self.ffmpeg(), input_file).await
    }

    /// List the subtitle tracks of a file using the given decoder
    pub async fn list_streams_with<D: Decoder>(&self, decoder: D, input_file: &Path) -> Result<Vec<StreamDescriptor>> {
        let session = self.open_with(decoder, input_file).await?;
        Ok(session.streams().to_vec())
    }

    /// Extract tracks and write them as one subtitle file
    pub async fn extract(&self, input_file: &Path, tracks: &[usize], output_dir: &Path) -> Result<PathBuf> {
        self.extract_with(self.ffmpeg(), input_file, tracks, output_dir).await
    }

    /// Extract tracks with the given decoder and write them as one subtitle file
    pub async fn extract_with<D: Decoder>(
        &self,
        decoder: D,
        input_file: &Path,
        tracks: &[usize],
        output_dir: &Path,
    ) -> Result<PathBuf> {
        let mut session = self.open_with(decoder, input_file).await?;
        Self::extract_tracks(&mut session, tracks).await?;
        self.save_output(&session, output_dir)
    }

    /// Build the translation prompt for the selected tracks
    pub async fn prompt(&self, input_file: &Path, tracks: &[usize], target_language: Option<&str>) -> Result<String> {
        self.prompt_with(self.ffmpeg(), input_file, tracks, target_language).await
    }

    /// Build the translation prompt with the given decoder
    pub async fn prompt_with<D: Decoder>(
        &self,
        decoder: D,
        input_file: &Path,
        tracks: &[usize],
        target_language: Option<&str>,
    ) -> Result<String> {
        let mut session = self.open_with(decoder, input_file).await?;
        Self::extract_tracks(&mut session, tracks).await?;

        let label = self.target_label(target_language);
        let prompt = session.build_prompt(&label)?.to_string();
        Ok(prompt)
    }

    /// Merge a translated reply into the selected tracks and write the result
    pub async fn merge(
        &self,
        input_file: &Path,
        tracks: &[usize],
        translation_file: &Path,
        output_dir: &Path,
    ) -> Result<(PathBuf, MergeReport)> {
        self.merge_with(self.ffmpeg(), input_file, tracks, translation_file, output_dir).await
    }

    /// Merge a translated reply with the given decoder
    pub async fn merge_with<D: Decoder>(
        &self,
        decoder: D,
        input_file: &Path,
        tracks: &[usize],
        translation_file: &Path,
        output_dir: &Path,
    ) -> Result<(PathBuf, MergeReport)> {
        let response = FileManager::read_to_string(translation_file)?;

        let mut session = self.open_with(decoder, input_file).await?;
        Self::extract_tracks(&mut session, tracks).await?;

        let label = self.target_label(None);
        session.build_prompt(&label)?;
        session.mark_prompt_sent()?;
        let report = session.submit_translation(&response)?;

        if !report.is_complete() {
            warn!("{} line(s) kept their original text", report.fallbacks.len());
        }

        let path = self.save_output(&session, output_dir)?;
        Ok((path, report))
    }

    /// Open a session on a file: subtitle files are parsed, containers are probed
    pub async fn open_with<D: Decoder>(&self, decoder: D, input_file: &Path) -> Result<Session<D>> {
        if !input_file.exists() {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        let mut session = Session::new(
            SharedDecoder::new(decoder),
            Arc::clone(&self.reporter),
            self.config.session_settings(),
        );

        match FileManager::detect_file_type(input_file)? {
            FileType::Subtitle => {
                info!("Detected subtitle file, skipping extraction process");
                let content = FileManager::read_to_string(input_file)?;
                session.open_subtitle_text(&content);
            }
            FileType::Video => {
                let spinner = Self::spinner("Analyzing video...");
                let opened = match session.initialize().await {
                    Ok(()) => session
                        .open_container(DecoderInput::Path(input_file.to_path_buf()))
                        .await
                        .map(|streams| streams.len()),
                    Err(e) => Err(e),
                };
                spinner.finish_and_clear();

                let count = opened?;
                if count == 0 {
                    warn!("No subtitle tracks found in file: {:?}", input_file);
                }
            }
            FileType::Unknown => {
                return Err(anyhow!("Unsupported input file: {:?}", input_file));
            }
        }

        Ok(session)
    }

    // @selects: Requested tracks, the first track when none was requested
    async fn extract_tracks<D: Decoder>(session: &mut Session<D>, tracks: &[usize]) -> Result<()> {
        if session.streams().is_empty() {
            return Err(anyhow!("No subtitle tracks available"));
        }

        if tracks.is_empty() {
            if session.selected().is_empty() {
                let first = session.streams()[0].index;
                session.select_stream(first)?;
            }
        } else {
            for &track in tracks {
                session.select_stream(track)?;
            }
        }

        let spinner = Self::spinner("Extracting subtitles...");
        let extracted = session.extract_selected().await.map(|document| document.len());
        spinner.finish_and_clear();

        let blocks = extracted?;
        info!("Extracted {} subtitle block(s) from track(s) {:?}", blocks, session.selected());
        Ok(())
    }

    fn save_output<D: Decoder>(&self, session: &Session<D>, output_dir: &Path) -> Result<PathBuf> {
        let artifact = session.output()?;
        let path = FileManager::write_unique(output_dir, &artifact.file_name, &artifact.bytes)?;
        info!("Success: {}", path.display());
        Ok(path)
    }

    fn target_label(&self, target_language: Option<&str>) -> String {
        let requested = target_language.unwrap_or(&self.config.target_language);
        language_utils::target_language_label(requested)
    }

    fn spinner(message: &'static str) -> ProgressBar {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(style);
        spinner.set_message(message);
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner
    }
}
