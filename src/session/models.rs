/*!
 * Session-specific models.
 *
 * Pipeline phases, user-visible notices and the output artifact.
 */

use log::{error, info, warn};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Coarse pipeline phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Nothing loaded
    Idle,
    /// Probing the container for subtitle streams
    Discovering,
    /// Streams known, waiting for a selection
    StreamsReady,
    /// Extracting the selected streams
    Extracting,
    /// A document is available for download
    DocumentReady,
    /// Translation request built, not yet handed out
    PromptReady,
    /// Waiting for the translated text
    AwaitingTranslation,
}

impl Phase {
    /// Phases in which the download action is offered
    pub fn allows_download(&self) -> bool {
        matches!(self, Self::StreamsReady | Self::DocumentReady)
    }

    /// Phases in which a translated reply can be submitted
    pub fn accepts_translation(&self) -> bool {
        matches!(self, Self::PromptReady | Self::AwaitingTranslation)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Discovering => "discovering streams",
            Self::StreamsReady => "waiting for a track selection",
            Self::Extracting => "extracting",
            Self::DocumentReady => "holding a subtitle document",
            Self::PromptReady => "holding a translation prompt",
            Self::AwaitingTranslation => "awaiting a translation",
        };
        write!(f, "{}", name)
    }
}

/// Kind of user-visible notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// A step failed and the session rolled back
    Error,
    /// A step completed
    Success,
    /// Parsing produced no block
    ParseDegenerate,
    /// Some blocks kept their original text after a merge
    MergeMismatch,
}

/// Message for the user-visible layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Kind of notice
    pub kind: NoticeKind,
    /// Text shown to the user
    pub message: String,
    /// How long the message stays visible
    pub dismiss_after: Duration,
}

/// Display intervals for notices
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoticeTimings {
    /// Errors and informational notes
    pub error: Duration,
    /// Successes
    pub success: Duration,
}

impl Default for NoticeTimings {
    fn default() -> Self {
        Self {
            error: Duration::from_millis(5000),
            success: Duration::from_millis(3000),
        }
    }
}

/// Receives notices produced by the session
pub trait StatusReporter: Send + Sync {
    /// Show a notice
    fn report(&self, notice: Notice);
}

/// Reporter writing notices to the log
#[derive(Debug, Default)]
pub struct LogReporter;

impl StatusReporter for LogReporter {
    fn report(&self, notice: Notice) {
        match notice.kind {
            NoticeKind::Error => error!("{}", notice.message),
            NoticeKind::Success => info!("{}", notice.message),
            NoticeKind::ParseDegenerate | NoticeKind::MergeMismatch => warn!("{}", notice.message),
        }
    }
}

/// Reporter keeping every notice in memory
#[derive(Debug, Default)]
pub struct RecordingReporter {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingReporter {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Notices received so far
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }

    /// Kinds of the notices received so far
    pub fn kinds(&self) -> Vec<NoticeKind> {
        self.notices.lock().iter().map(|n| n.kind).collect()
    }
}

impl StatusReporter for RecordingReporter {
    fn report(&self, notice: Notice) {
        self.notices.lock().push(notice);
    }
}

/// Downloadable subtitle file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputArtifact {
    /// Suggested file name, derived from the current time
    pub file_name: String,
    /// MIME type of the content
    pub content_type: &'static str,
    /// File content
    pub bytes: Vec<u8>,
}

impl OutputArtifact {
    /// MIME type of SRT output
    pub const CONTENT_TYPE: &'static str = "text/plain";

    /// Build an artifact named `{prefix}_{unix millis}.srt`
    pub fn new(prefix: &str, content: &str) -> Self {
        let millis = chrono::Utc::now().timestamp_millis();
        Self {
            file_name: format!("{}_{}.srt", prefix, millis),
            content_type: Self::CONTENT_TYPE,
            bytes: content.as_bytes().to_vec(),
        }
    }
}
