/*!
 * Common test utilities for the subtrack test suite
 */

use std::path::{Path, PathBuf};
use std::fs;
use std::sync::Arc;
use anyhow::Result;
use tempfile::TempDir;

use subtrack::decoder::{MockDecoder, SharedDecoder};
use subtrack::session::{RecordingReporter, Session, SessionSettings};

/// Two-block SRT sample
pub const HELLO_WORLD_SRT: &str = "1
00:00:01,000 --> 00:00:02,000
Hello

2
00:00:03,000 --> 00:00:04,000
World
";

/// Three-block SRT sample, the middle block on two lines
pub const THREE_BLOCK_SRT: &str = "1
00:00:01,000 --> 00:00:04,000
This is a test subtitle.

2
00:00:05,000 --> 00:00:09,000
It contains
multiple lines.

3
00:00:10,000 --> 00:00:14,000
For testing purposes.
";

/// One-block SRT whose text names the track
pub fn track_srt(name: &str) -> String {
    format!("1\n00:00:01,000 --> 00:00:02,000\n{}\n", name)
}

/// Route library logs to the test output, once per test binary
pub fn init_test_logging() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Debug)
        .try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Session over a mock decoder with a recording reporter
pub fn mock_session(decoder: MockDecoder) -> (Session<MockDecoder>, SharedDecoder<MockDecoder>, Arc<RecordingReporter>) {
    let shared = SharedDecoder::new(decoder);
    let reporter = Arc::new(RecordingReporter::new());
    let session = Session::new(shared.clone(), reporter.clone(), SessionSettings::default());
    (session, shared, reporter)
}
