/*!
 * Decoding collaborator boundary.
 *
 * The decoder demuxes a container and converts one subtitle stream to SRT text.
 * It exposes a single work area (one named input, one named output per call),
 * so calls must never overlap:
 * - `Decoder`: the command-style interface every backend implements
 * - `SharedDecoder`: the handle the pipeline uses, guarded by a mutex of capacity 1
 * - `ffmpeg`: backend driving the ffmpeg executable
 * - `mock`: scripted in-memory backend
 */

use async_trait::async_trait;
use std::fmt::{self, Debug};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, MutexGuard};

use crate::errors::DecoderError;

pub mod ffmpeg;
pub mod mock;

pub use ffmpeg::FfmpegDecoder;
pub use mock::MockDecoder;

/// Input handed to the decoder work area
#[derive(Debug, Clone)]
pub enum DecoderInput {
    /// Container bytes already in memory
    Bytes(Vec<u8>),
    /// Container file on disk
    Path(PathBuf),
}

/// Identifies one subtitle stream of the loaded input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamSelector(pub usize);

impl StreamSelector {
    /// Index of the subtitle stream among the input's subtitle streams
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for StreamSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // First input, n-th subtitle stream
        write!(f, "0:s:{}", self.0)
    }
}

/// Output produced by one extraction call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Name of the output in the work area
    pub name: String,
    /// Decoded subtitle text
    pub text: String,
}

/// Command-style interface of the decoding collaborator
///
/// Methods take `&mut self`: a backend is never asked to run two commands at once.
#[async_trait]
pub trait Decoder: Send + Debug {
    /// Start the decoder
    async fn initialize(&mut self) -> Result<(), DecoderError>;

    /// Load the container, replacing any previous input
    async fn load_input(&mut self, input: DecoderInput) -> Result<(), DecoderError>;

    /// Convert one subtitle stream to SRT text
    ///
    /// # Arguments
    /// * `selector` - Stream to extract
    /// * `bounded` - Only decode this much of the input, used for cheap probes
    async fn extract_stream(
        &mut self,
        selector: StreamSelector,
        bounded: Option<Duration>,
    ) -> Result<Artifact, DecoderError>;

    /// Remove an artifact from the work area
    async fn dispose(&mut self, artifact: Artifact) -> Result<(), DecoderError>;
}

/// Decoder handle shared by the pipeline, one command in flight at a time
#[derive(Debug)]
pub struct SharedDecoder<D> {
    inner: Arc<Mutex<D>>,
}

impl<D> Clone for SharedDecoder<D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<D: Decoder> SharedDecoder<D> {
    /// Wrap a decoder
    pub fn new(decoder: D) -> Self {
        Self {
            inner: Arc::new(Mutex::new(decoder)),
        }
    }

    /// Wait for exclusive use of the decoder
    pub async fn lock(&self) -> MutexGuard<'_, D> {
        self.inner.lock().await
    }
}
