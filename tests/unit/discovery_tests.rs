/*!
 * Tests for subtitle stream discovery
 */

use std::time::Duration;
use subtrack::decoder::{Decoder, DecoderInput, MockDecoder, SharedDecoder};
use subtrack::discovery::{discover_streams, ProbeLimits, StreamDescriptor};
use subtrack::errors::PipelineError;

async fn loaded(decoder: MockDecoder) -> SharedDecoder<MockDecoder> {
    let shared = SharedDecoder::new(decoder);
    {
        let mut guard = shared.lock().await;
        guard.initialize().await.unwrap();
        guard.load_input(DecoderInput::Bytes(vec![0u8; 4])).await.unwrap();
    }
    shared
}

/// Test that discovery stops at the first missing stream
#[tokio::test]
async fn test_discover_withThreeStreams_shouldStopAtFirstFailure() {
    let decoder = loaded(MockDecoder::with_streams(["a", "b", "c"])).await;

    let streams = discover_streams(&decoder, ProbeLimits::default()).await.unwrap();

    assert_eq!(
        streams,
        vec![
            StreamDescriptor::for_probe(0),
            StreamDescriptor::for_probe(1),
            StreamDescriptor::for_probe(2),
        ]
    );
    assert_eq!(streams[2].display_name, "Subtitle Track 3");
    // Three hits plus the probe that found nothing
    assert_eq!(decoder.lock().await.calls().len(), 4);
}

/// Test that a decoder answering every probe is cut off at ten probes
#[tokio::test]
async fn test_discover_withEndlessDecoder_shouldIssueAtMostTenProbes() {
    let decoder = loaded(MockDecoder::endless()).await;

    let streams = discover_streams(&decoder, ProbeLimits::default()).await.unwrap();

    assert_eq!(streams.len(), 10);
    assert_eq!(decoder.lock().await.calls().len(), 10);
}

/// Test that the first probe failing is an empty result, not an error
#[tokio::test]
async fn test_discover_withNoStreams_shouldReturnEmpty() {
    let decoder = loaded(MockDecoder::with_streams(Vec::<String>::new())).await;

    let streams = discover_streams(&decoder, ProbeLimits::default()).await.unwrap();

    assert!(streams.is_empty());
}

/// Test that a decode error also ends discovery quietly
#[tokio::test]
async fn test_discover_withDecodeErrorOnSecondProbe_shouldKeepFirstStream() {
    let decoder = loaded(MockDecoder::with_streams(["a", "b"]).failing_decode(1)).await;

    let streams = discover_streams(&decoder, ProbeLimits::default()).await.unwrap();

    assert_eq!(streams.len(), 1);
}

/// Test that probes are bounded in duration and their output is discarded
#[tokio::test]
async fn test_discover_shouldUseBoundedProbesAndDisposeArtifacts() {
    let decoder = loaded(MockDecoder::with_streams(["a", "b"])).await;
    let limits = ProbeLimits {
        max_probes: 10,
        probe_duration: Duration::from_secs(1),
    };

    discover_streams(&decoder, limits).await.unwrap();

    let guard = decoder.lock().await;
    assert!(guard.calls().iter().all(|c| c.bounded == Some(Duration::from_secs(1))));
    assert_eq!(guard.disposed().len(), 2);
    assert_eq!(guard.live_artifacts(), 0);
}

/// Test that infrastructure failures are reported as discovery failures
#[tokio::test]
async fn test_discover_withIoFailure_shouldFail() {
    let decoder = loaded(MockDecoder::with_streams(["a", "b"]).failing_io(1)).await;

    let result = discover_streams(&decoder, ProbeLimits::default()).await;

    assert!(matches!(result, Err(PipelineError::DiscoveryFailed(_))));
}

/// Test that discovery without loaded input is a failure, not an empty result
#[tokio::test]
async fn test_discover_withoutInput_shouldFail() {
    let decoder = SharedDecoder::new(MockDecoder::with_streams(["a"]));
    decoder.lock().await.initialize().await.unwrap();

    let result = discover_streams(&decoder, ProbeLimits::default()).await;

    assert!(matches!(result, Err(PipelineError::DiscoveryFailed(_))));
}

/// Test a custom probe limit
#[tokio::test]
async fn test_discover_withLowerLimit_shouldRespectLimit() {
    let decoder = loaded(MockDecoder::endless()).await;
    let limits = ProbeLimits {
        max_probes: 3,
        ..ProbeLimits::default()
    };

    let streams = discover_streams(&decoder, limits).await.unwrap();

    assert_eq!(streams.len(), 3);
}
