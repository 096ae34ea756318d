/*!
 * Session module: the pipeline state machine.
 *
 * This module provides:
 * - The `Session` owning one pipeline run at a time
 * - Phase tracking and transition checks
 * - Notices for the user-visible layer and the output artifact
 */

pub mod manager;
pub mod models;

// Re-export main types
pub use manager::{Session, SessionSettings};
pub use models::{
    LogReporter, Notice, NoticeKind, NoticeTimings, OutputArtifact, Phase, RecordingReporter, StatusReporter,
};
