use log::{debug, info, warn};

use crate::decoder::{Decoder, SharedDecoder, StreamSelector};
use crate::errors::PipelineError;

// @module: Sequential subtitle extraction

/// Separator placed between the outputs of consecutive tracks
pub const TRACK_SEPARATOR: &str = "\n\n";

/// Extract one subtitle stream as text
///
/// # Errors
/// `PipelineError::ExtractionFailed` when the selector is invalid or decoding fails.
pub async fn extract_one<D: Decoder>(
    decoder: &SharedDecoder<D>,
    index: usize,
) -> Result<String, PipelineError> {
    let mut decoder = decoder.lock().await;
    extract_locked(&mut *decoder, index).await
}

/// Extract several subtitle streams and concatenate them
///
/// Streams are extracted one after the other in the given order while holding
/// the decoder; outputs are joined with a blank line. The first failure aborts
/// the sequence and nothing extracted so far is returned.
pub async fn extract_many<D: Decoder>(
    decoder: &SharedDecoder<D>,
    indices: &[usize],
) -> Result<String, PipelineError> {
    if indices.is_empty() {
        return Err(PipelineError::NoStreamsSelected);
    }

    let mut decoder = decoder.lock().await;
    let mut outputs = Vec::with_capacity(indices.len());

    for &index in indices {
        outputs.push(extract_locked(&mut *decoder, index).await?);
    }

    info!("Extracted {} subtitle track(s)", outputs.len());
    Ok(outputs.join(TRACK_SEPARATOR))
}

// @requires: Caller holds the decoder lock
async fn extract_locked<D: Decoder>(decoder: &mut D, index: usize) -> Result<String, PipelineError> {
    let selector = StreamSelector(index);
    debug!("Extracting subtitle stream {}", selector);

    let artifact = decoder
        .extract_stream(selector, None)
        .await
        .map_err(|e| PipelineError::ExtractionFailed {
            index,
            reason: e.to_string(),
        })?;

    let text = artifact.text.clone();
    if let Err(e) = decoder.dispose(artifact).await {
        warn!("Failed to clean up output of {}: {}", selector, e);
    }

    Ok(text)
}
