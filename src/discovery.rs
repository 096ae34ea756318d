use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::decoder::{Decoder, SharedDecoder, StreamSelector};
use crate::errors::PipelineError;

// @module: Subtitle stream discovery by bounded probing

/// Default maximum number of probes
pub const DEFAULT_PROBE_LIMIT: usize = 10;

/// Default decoded duration per probe
pub const DEFAULT_PROBE_DURATION: Duration = Duration::from_secs(1);

/// A subtitle stream found in the loaded input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamDescriptor {
    /// Probe index, usable as a stream selector
    pub index: usize,
    /// Human readable name
    pub display_name: String,
    /// Codec the stream is delivered in
    pub codec: String,
}

impl StreamDescriptor {
    /// Descriptor for the `index`-th subtitle stream of a container
    pub fn for_probe(index: usize) -> Self {
        Self {
            index,
            display_name: format!("Subtitle Track {}", index + 1),
            codec: "srt".to_string(),
        }
    }

    /// Descriptor standing for a subtitle file given directly as input
    pub fn subtitle_file() -> Self {
        Self {
            index: 0,
            display_name: "Subtitle File".to_string(),
            codec: "srt".to_string(),
        }
    }
}

/// Bounds on discovery probing
#[derive(Debug, Clone, Copy)]
pub struct ProbeLimits {
    /// Maximum number of probes issued
    pub max_probes: usize,
    /// Duration decoded by each probe
    pub probe_duration: Duration,
}

impl Default for ProbeLimits {
    fn default() -> Self {
        Self {
            max_probes: DEFAULT_PROBE_LIMIT,
            probe_duration: DEFAULT_PROBE_DURATION,
        }
    }
}

/// Enumerate subtitle streams of the loaded input
///
/// Probes selectors 0, 1, 2, ... and stops at the first one the decoder
/// rejects or after `limits.max_probes` probes. An empty result means the
/// input has no subtitle stream. Probe artifacts are disposed right away.
///
/// # Errors
/// `PipelineError::DiscoveryFailed` when the decoder itself misbehaves
/// (not initialized, no input, I/O failure) rather than rejecting a stream.
pub async fn discover_streams<D: Decoder>(
    decoder: &SharedDecoder<D>,
    limits: ProbeLimits,
) -> Result<Vec<StreamDescriptor>, PipelineError> {
    let mut decoder = decoder.lock().await;
    let mut streams = Vec::new();

    for index in 0..limits.max_probes {
        let selector = StreamSelector(index);
        match decoder.extract_stream(selector, Some(limits.probe_duration)).await {
            Ok(artifact) => {
                if let Err(e) = decoder.dispose(artifact).await {
                    warn!("Failed to discard probe output for {}: {}", selector, e);
                }
                streams.push(StreamDescriptor::for_probe(index));
            }
            Err(e) if e.is_stream_failure() => {
                debug!("Probe {} stopped discovery: {}", selector, e);
                break;
            }
            Err(e) => return Err(PipelineError::DiscoveryFailed(e.to_string())),
        }
    }

    if streams.len() == limits.max_probes {
        warn!("Stopped probing after {} subtitle streams", limits.max_probes);
    }
    info!("Found {} subtitle track(s)", streams.len());

    Ok(streams)
}
