/*!
 * Scripted in-memory decoder.
 *
 * Serves predetermined subtitle text per stream index, records every command
 * and can be told to fail in the ways a real decoder fails. Used by the test
 * suite and handy for dry runs without ffmpeg.
 */

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::{Artifact, Decoder, DecoderInput, StreamSelector};
use crate::errors::DecoderError;

/// One recorded `extract_stream` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCall {
    /// Requested selector
    pub selector: StreamSelector,
    /// Requested duration bound
    pub bounded: Option<Duration>,
}

/// Tracks how many commands overlap
#[derive(Debug, Default)]
pub struct InFlightTracker {
    current: AtomicUsize,
    max: AtomicUsize,
}

impl InFlightTracker {
    fn enter(&self) {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.max.fetch_max(now, Ordering::SeqCst);
    }

    fn leave(&self) {
        self.current.fetch_sub(1, Ordering::SeqCst);
    }

    /// Highest number of commands observed running at once
    pub fn max_in_flight(&self) -> usize {
        self.max.load(Ordering::SeqCst)
    }
}

/// Scripted decoder
#[derive(Debug, Default)]
pub struct MockDecoder {
    streams: Vec<String>,
    every_selector_exists: bool,
    fail_initialize: bool,
    decode_failures: HashSet<usize>,
    full_decode_failures: HashSet<usize>,
    io_failure_at: Option<usize>,
    latency: Option<Duration>,
    initialized: bool,
    input_loaded: bool,
    calls: Vec<MockCall>,
    disposed: Vec<String>,
    live_artifacts: HashSet<String>,
    tracker: Arc<InFlightTracker>,
}

impl MockDecoder {
    /// Decoder whose input holds one subtitle stream per text
    pub fn with_streams<I, S>(streams: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            streams: streams.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Every selector succeeds, no matter how large
    pub fn endless() -> Self {
        Self {
            every_selector_exists: true,
            ..Default::default()
        }
    }

    /// Make `initialize` fail
    pub fn failing_initialize(mut self) -> Self {
        self.fail_initialize = true;
        self
    }

    /// Make extraction of one stream fail with a decode error
    pub fn failing_decode(mut self, index: usize) -> Self {
        self.decode_failures.insert(index);
        self
    }

    /// Make full extraction of one stream fail while bounded probes succeed
    pub fn failing_full_decode(mut self, index: usize) -> Self {
        self.full_decode_failures.insert(index);
        self
    }

    /// Make extraction of one stream fail with an I/O error
    pub fn failing_io(mut self, index: usize) -> Self {
        self.io_failure_at = Some(index);
        self
    }

    /// Suspend every command for a while before answering
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Recorded extraction calls in issue order
    pub fn calls(&self) -> &[MockCall] {
        &self.calls
    }

    /// Names of disposed artifacts
    pub fn disposed(&self) -> &[String] {
        &self.disposed
    }

    /// Artifacts produced but not yet disposed
    pub fn live_artifacts(&self) -> usize {
        self.live_artifacts.len()
    }

    /// Overlap tracker, shareable with the test body
    pub fn tracker(&self) -> Arc<InFlightTracker> {
        Arc::clone(&self.tracker)
    }

    fn text_for(&self, index: usize) -> Option<String> {
        if self.every_selector_exists {
            return Some(format!("1\n00:00:00,000 --> 00:00:01,000\nStream {}\n", index));
        }
        self.streams.get(index).cloned()
    }

    async fn simulate_latency(&self) {
        match self.latency {
            Some(latency) => tokio::time::sleep(latency).await,
            None => tokio::task::yield_now().await,
        }
    }
}

#[async_trait]
impl Decoder for MockDecoder {
    async fn initialize(&mut self) -> Result<(), DecoderError> {
        if self.fail_initialize {
            return Err(DecoderError::Spawn("mock decoder refused to start".to_string()));
        }
        self.initialized = true;
        Ok(())
    }

    async fn load_input(&mut self, _input: DecoderInput) -> Result<(), DecoderError> {
        if !self.initialized {
            return Err(DecoderError::NotInitialized);
        }
        self.input_loaded = true;
        Ok(())
    }

    async fn extract_stream(
        &mut self,
        selector: StreamSelector,
        bounded: Option<Duration>,
    ) -> Result<Artifact, DecoderError> {
        self.tracker.enter();
        self.simulate_latency().await;
        self.calls.push(MockCall { selector, bounded });

        let result = if !self.initialized {
            Err(DecoderError::NotInitialized)
        } else if !self.input_loaded {
            Err(DecoderError::NoInput)
        } else if self.io_failure_at == Some(selector.index()) {
            Err(DecoderError::Io(std::io::Error::other("mock work area unavailable")))
        } else if self.decode_failures.contains(&selector.index())
            || (bounded.is_none() && self.full_decode_failures.contains(&selector.index()))
        {
            Err(DecoderError::DecodeError(format!("mock decode failure on {}", selector)))
        } else {
            match self.text_for(selector.index()) {
                Some(text) => {
                    let name = match bounded {
                        Some(_) => format!("probe_{}.srt", selector.index()),
                        None => format!("subtitle_{}.srt", selector.index()),
                    };
                    self.live_artifacts.insert(name.clone());
                    Ok(Artifact { name, text })
                }
                None => Err(DecoderError::SelectorNotFound(selector.to_string())),
            }
        };

        self.tracker.leave();
        result
    }

    async fn dispose(&mut self, artifact: Artifact) -> Result<(), DecoderError> {
        self.live_artifacts.remove(&artifact.name);
        self.disposed.push(artifact.name);
        Ok(())
    }
}
