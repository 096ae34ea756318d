/*!
 * Session state machine.
 *
 * A `Session` owns everything a pipeline run produces: discovered streams,
 * the track selection, the current document and the pending translation
 * prompt. Every operation checks the current phase, and every failure rolls
 * the session back to the closest stable phase and is reported through the
 * `StatusReporter` before being returned.
 */

use log::{debug, info};
use std::collections::BTreeSet;
use std::sync::Arc;

use super::models::{Notice, NoticeKind, NoticeTimings, OutputArtifact, Phase, StatusReporter};
use crate::decoder::{Decoder, DecoderInput, SharedDecoder};
use crate::discovery::{self, ProbeLimits, StreamDescriptor};
use crate::errors::PipelineError;
use crate::extraction;
use crate::subtitle_processor::SubtitleDocument;
use crate::translation::{self, MergeReport};

/// Tunables of a session
#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Discovery bounds
    pub probe_limits: ProbeLimits,
    /// Notice display intervals
    pub notice_timings: NoticeTimings,
    /// Prefix of output file names
    pub file_prefix: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            probe_limits: ProbeLimits::default(),
            notice_timings: NoticeTimings::default(),
            file_prefix: "subtitles".to_string(),
        }
    }
}

/// Where the current input came from
#[derive(Debug, Clone)]
enum InputSource {
    None,
    Container,
    SubtitleText(SubtitleDocument),
}

/// The single live pipeline session
pub struct Session<D: Decoder> {
    decoder: SharedDecoder<D>,
    reporter: Arc<dyn StatusReporter>,
    settings: SessionSettings,
    initialized: bool,
    phase: Phase,
    streams: Vec<StreamDescriptor>,
    selected: BTreeSet<usize>,
    source: InputSource,
    document: Option<SubtitleDocument>,
    prompt: Option<String>,
}

impl<D: Decoder> Session<D> {
    /// Create an idle session
    pub fn new(decoder: SharedDecoder<D>, reporter: Arc<dyn StatusReporter>, settings: SessionSettings) -> Self {
        Self {
            decoder,
            reporter,
            settings,
            initialized: false,
            phase: Phase::Idle,
            streams: Vec::new(),
            selected: BTreeSet::new(),
            source: InputSource::None,
            document: None,
            prompt: None,
        }
    }

    /// Start the decoder
    ///
    /// A failure is fatal for container input; it is not retried.
    pub async fn initialize(&mut self) -> Result<(), PipelineError> {
        let result = self.decoder.lock().await.initialize().await;
        match result {
            Ok(()) => {
                self.initialized = true;
                debug!("Decoder initialized");
                Ok(())
            }
            Err(e) => {
                let error = PipelineError::InitializationFailed(e.to_string());
                self.notify(NoticeKind::Error, error.to_string());
                Err(error)
            }
        }
    }

    /// True once the decoder started
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Streams of the current input
    pub fn streams(&self) -> &[StreamDescriptor] {
        &self.streams
    }

    /// Selected stream indices in extraction order
    pub fn selected(&self) -> Vec<usize> {
        self.selected.iter().copied().collect()
    }

    /// Current document, if any
    pub fn document(&self) -> Option<&SubtitleDocument> {
        self.document.as_ref()
    }

    /// Pending translation prompt, if any
    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    /// Whether the download action is available
    pub fn can_download(&self) -> bool {
        self.phase.allows_download() && !self.selected.is_empty()
    }

    /// Drop everything and go back to `Idle`
    pub fn clear(&mut self) {
        self.phase = Phase::Idle;
        self.streams.clear();
        self.selected.clear();
        self.source = InputSource::None;
        self.document = None;
        self.prompt = None;
    }

    /// Load a container and discover its subtitle streams
    pub async fn open_container(&mut self, input: DecoderInput) -> Result<&[StreamDescriptor], PipelineError> {
        self.clear();

        if !self.initialized {
            let error = PipelineError::InitializationFailed("decoder is not running".to_string());
            return Err(self.fail(Phase::Idle, error));
        }

        self.phase = Phase::Discovering;

        let loaded = self.decoder.lock().await.load_input(input).await;
        if let Err(e) = loaded {
            return Err(self.fail(Phase::Idle, PipelineError::DiscoveryFailed(e.to_string())));
        }

        match discovery::discover_streams(&self.decoder, self.settings.probe_limits).await {
            Ok(streams) => {
                self.streams = streams;
                self.source = InputSource::Container;
                self.phase = Phase::StreamsReady;
                Ok(&self.streams)
            }
            Err(error) => Err(self.fail(Phase::Idle, error)),
        }
    }

    /// Use subtitle text directly as input
    ///
    /// The text is parsed right away and exposed as a single pre-selected stream.
    pub fn open_subtitle_text(&mut self, text: &str) -> &[StreamDescriptor] {
        self.clear();

        let document = SubtitleDocument::parse(text);
        if document.is_empty() {
            self.notify(NoticeKind::ParseDegenerate, "No subtitle blocks found in the file".to_string());
        }

        let descriptor = StreamDescriptor::subtitle_file();
        self.selected.insert(descriptor.index);
        self.streams = vec![descriptor];
        self.source = InputSource::SubtitleText(document);
        self.phase = Phase::StreamsReady;
        &self.streams
    }

    /// Add a stream to the selection
    pub fn select_stream(&mut self, index: usize) -> Result<(), PipelineError> {
        self.check_selectable(index)?;
        self.selected.insert(index);
        Ok(())
    }

    /// Remove a stream from the selection
    pub fn deselect_stream(&mut self, index: usize) -> Result<(), PipelineError> {
        self.check_selectable(index)?;
        self.selected.remove(&index);
        Ok(())
    }

    /// Extract the selected streams into the current document
    ///
    /// On failure the session returns to `StreamsReady` without a document;
    /// the selection is kept.
    pub async fn extract_selected(&mut self) -> Result<&SubtitleDocument, PipelineError> {
        if !self.phase.allows_download() {
            return Err(self.reject("extract subtitles"));
        }
        if self.selected.is_empty() {
            return Err(self.report_error(PipelineError::NoStreamsSelected));
        }

        self.phase = Phase::Extracting;
        self.document = None;
        self.prompt = None;

        let is_container = matches!(self.source, InputSource::Container);
        let document = if let InputSource::SubtitleText(document) = &self.source {
            document.clone()
        } else if is_container {
            let indices = self.selected();
            match extraction::extract_many(&self.decoder, &indices).await {
                Ok(text) => SubtitleDocument::parse(&text),
                Err(error) => return Err(self.fail(Phase::StreamsReady, error)),
            }
        } else {
            return Err(self.fail(Phase::Idle, PipelineError::NoStreamsSelected));
        };

        if document.is_empty() {
            self.notify(NoticeKind::ParseDegenerate, "Extracted subtitles contain no blocks".to_string());
        }
        info!("Subtitle document ready with {} block(s)", document.len());

        self.phase = Phase::DocumentReady;
        Ok(&*self.document.insert(document))
    }

    /// Build the translation request for the current document
    pub fn build_prompt(&mut self, target_language: &str) -> Result<&str, PipelineError> {
        if self.phase != Phase::DocumentReady {
            return Err(self.reject("build a translation prompt"));
        }
        let request = match &self.document {
            Some(document) => translation::build_request(document, target_language),
            None => return Err(self.reject("build a translation prompt")),
        };

        self.phase = Phase::PromptReady;
        Ok(self.prompt.insert(request).as_str())
    }

    /// Record that the prompt was handed to the translator
    pub fn mark_prompt_sent(&mut self) -> Result<(), PipelineError> {
        if self.phase != Phase::PromptReady {
            return Err(self.reject("hand out the translation prompt"));
        }
        self.phase = Phase::AwaitingTranslation;
        Ok(())
    }

    /// Merge the translator's reply into a new document
    pub fn submit_translation(&mut self, response: &str) -> Result<MergeReport, PipelineError> {
        if !self.phase.accepts_translation() {
            return Err(self.reject("merge a translation"));
        }
        let (merged, report) = match &self.document {
            Some(document) => translation::merge_response(document, response),
            None => return Err(self.reject("merge a translation")),
        };

        if !report.is_complete() {
            let numbers: Vec<String> = report.fallbacks.iter().map(u64::to_string).collect();
            self.notify(
                NoticeKind::MergeMismatch,
                format!("No translation found for line(s) {}, original text kept", numbers.join(", ")),
            );
        }

        self.document = Some(merged);
        self.prompt = None;
        self.phase = Phase::DocumentReady;
        self.notify(NoticeKind::Success, "Translation merged successfully!".to_string());
        Ok(report)
    }

    /// Leave the translation round trip without merging
    pub fn abandon_translation(&mut self) -> Result<(), PipelineError> {
        if !self.phase.accepts_translation() {
            return Err(self.reject("abandon the translation"));
        }
        self.prompt = None;
        self.phase = Phase::DocumentReady;
        Ok(())
    }

    /// The downloadable file for the current document
    pub fn output(&self) -> Result<OutputArtifact, PipelineError> {
        match (&self.document, self.phase) {
            (Some(document), Phase::DocumentReady) => {
                let artifact = OutputArtifact::new(&self.settings.file_prefix, document.output_text());
                self.notify(NoticeKind::Success, "Subtitle downloaded successfully!".to_string());
                Ok(artifact)
            }
            _ => Err(self.reject("download subtitles")),
        }
    }

    fn check_selectable(&self, index: usize) -> Result<(), PipelineError> {
        if !self.phase.allows_download() {
            return Err(self.reject("change the track selection"));
        }
        if !self.streams.iter().any(|s| s.index == index) {
            return Err(self.report_error(PipelineError::InvalidSelection(index)));
        }
        Ok(())
    }

    // @returns: Error after rolling back to `phase` and reporting it
    fn fail(&mut self, phase: Phase, error: PipelineError) -> PipelineError {
        self.phase = phase;
        self.report_error(error)
    }

    fn reject(&self, action: &'static str) -> PipelineError {
        self.report_error(PipelineError::InvalidTransition { phase: self.phase, action })
    }

    fn report_error(&self, error: PipelineError) -> PipelineError {
        self.notify(NoticeKind::Error, error.to_string());
        error
    }

    fn notify(&self, kind: NoticeKind, message: String) {
        let dismiss_after = match kind {
            NoticeKind::Success => self.settings.notice_timings.success,
            _ => self.settings.notice_timings.error,
        };
        self.reporter.report(Notice { kind, message, dismiss_after });
    }
}
