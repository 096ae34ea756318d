/*!
 * Decoder backend driving the ffmpeg executable.
 *
 * Every instance owns a private temporary work area holding the loaded input
 * and the per-call outputs. The work area is removed when the decoder drops.
 */

use async_trait::async_trait;
use log::{debug, error};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use tokio::process::Command;

use super::{Artifact, Decoder, DecoderInput, StreamSelector};
use crate::errors::DecoderError;

// @const: Name of the container copied into the work area
const INPUT_NAME: &str = "input_video";

// @const: Prefixes of ffmpeg stderr lines that carry no diagnostic value
const NOISE_PREFIXES: [&str; 19] = [
    "ffmpeg version",
    "built with",
    "configuration:",
    "lib",
    "Input #",
    "Metadata:",
    "Duration:",
    "Chapter",
    "Stream #",
    "title",
    "BPS",
    "DURATION",
    "NUMBER_OF",
    "_STATISTICS",
    "Output #",
    "Stream mapping:",
    "Press [q]",
    "encoder",
    "handler_name",
];

/// Decoder backed by an ffmpeg process per command
#[derive(Debug)]
pub struct FfmpegDecoder {
    // @field: ffmpeg executable
    ffmpeg_path: PathBuf,

    // @field: Private work area, created by `initialize`
    work_dir: Option<TempDir>,

    // @field: Location of the loaded input
    input: Option<PathBuf>,
}

impl FfmpegDecoder {
    /// Create a decoder running the given ffmpeg executable
    pub fn new<P: Into<PathBuf>>(ffmpeg_path: P) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            work_dir: None,
            input: None,
        }
    }

    fn work_path(&self) -> Result<&Path, DecoderError> {
        self.work_dir
            .as_ref()
            .map(|dir| dir.path())
            .ok_or(DecoderError::NotInitialized)
    }

    // @builds: ffmpeg arguments for one extraction
    fn extract_args(input: &Path, selector: StreamSelector, bounded: Option<Duration>, output: &Path) -> Vec<String> {
        let mut args = vec![
            "-y".to_string(),
            "-i".to_string(),
            input.display().to_string(),
            "-map".to_string(),
            selector.to_string(),
        ];
        if let Some(bound) = bounded {
            args.push("-t".to_string());
            args.push(bound.as_secs_f64().to_string());
        }
        args.push("-c:s".to_string());
        args.push("srt".to_string());
        args.push(output.display().to_string());
        args
    }

    /// Keep only the meaningful ffmpeg stderr lines
    fn filter_stderr(stderr: &str) -> String {
        let meaningful: Vec<&str> = stderr
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter(|line| !NOISE_PREFIXES.iter().any(|p| line.starts_with(p)))
            .collect();

        if meaningful.is_empty() {
            "unknown ffmpeg error (stderr was empty after filtering)".to_string()
        } else {
            meaningful.join("\n")
        }
    }

    /// Classify a failed extraction from its stderr
    fn classify_failure(selector: StreamSelector, stderr: &str) -> DecoderError {
        let missing_stream = stderr.contains("matches no streams")
            || (stderr.contains("Stream map") && stderr.contains("does not exist"));
        if missing_stream {
            DecoderError::SelectorNotFound(selector.to_string())
        } else {
            DecoderError::DecodeError(Self::filter_stderr(stderr))
        }
    }
}

#[async_trait]
impl Decoder for FfmpegDecoder {
    async fn initialize(&mut self) -> Result<(), DecoderError> {
        if self.work_dir.is_some() {
            return Ok(());
        }

        let output = Command::new(&self.ffmpeg_path)
            .arg("-version")
            .output()
            .await
            .map_err(|e| DecoderError::Spawn(format!("{}: {}", self.ffmpeg_path.display(), e)))?;

        if !output.status.success() {
            return Err(DecoderError::Spawn(format!(
                "{} -version exited with {}",
                self.ffmpeg_path.display(),
                output.status
            )));
        }

        let work_dir = tempfile::Builder::new().prefix("subtrack-").tempdir()?;
        debug!("Decoder work area: {:?}", work_dir.path());
        self.work_dir = Some(work_dir);
        Ok(())
    }

    async fn load_input(&mut self, input: DecoderInput) -> Result<(), DecoderError> {
        let work_path = self.work_path()?.to_path_buf();
        self.input = None;

        let location = match input {
            DecoderInput::Bytes(bytes) => {
                let path = work_path.join(INPUT_NAME);
                tokio::fs::write(&path, bytes).await?;
                path
            }
            DecoderInput::Path(path) => {
                if !tokio::fs::try_exists(&path).await? {
                    return Err(DecoderError::Io(std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        format!("Input file does not exist: {}", path.display()),
                    )));
                }
                path
            }
        };

        self.input = Some(location);
        Ok(())
    }

    async fn extract_stream(
        &mut self,
        selector: StreamSelector,
        bounded: Option<Duration>,
    ) -> Result<Artifact, DecoderError> {
        let work_path = self.work_path()?.to_path_buf();
        let input = self.input.clone().ok_or(DecoderError::NoInput)?;

        let name = match bounded {
            Some(_) => format!("probe_{}.srt", selector.index()),
            None => format!("subtitle_{}.srt", selector.index()),
        };
        let output_path = work_path.join(&name);

        let args = Self::extract_args(&input, selector, bounded, &output_path);
        debug!("Running ffmpeg {}", args.join(" "));

        let output = Command::new(&self.ffmpeg_path)
            .args(&args)
            .output()
            .await
            .map_err(|e| DecoderError::Spawn(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let failure = Self::classify_failure(selector, &stderr);
            if let DecoderError::DecodeError(reason) = &failure {
                error!("Subtitle extraction failed: {}", reason);
            }
            let _ = tokio::fs::remove_file(&output_path).await;
            return Err(failure);
        }

        let bytes = tokio::fs::read(&output_path).await?;
        Ok(Artifact {
            name,
            text: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }

    async fn dispose(&mut self, artifact: Artifact) -> Result<(), DecoderError> {
        let path = self.work_path()?.join(&artifact.name);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
