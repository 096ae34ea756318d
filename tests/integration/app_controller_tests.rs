/*!
 * Controller tests against files on disk, using the scripted decoder
 */

use std::path::Path;
use std::sync::Arc;
use anyhow::Result;
use subtrack::app_config::Config;
use subtrack::app_controller::Controller;
use subtrack::decoder::MockDecoder;
use subtrack::file_utils::FileManager;
use subtrack::session::{NoticeKind, RecordingReporter};
use crate::common;

fn controller() -> (Controller, Arc<RecordingReporter>) {
    let reporter = Arc::new(RecordingReporter::new());
    let controller = Controller::with_config(Config::default())
        .unwrap()
        .with_reporter(reporter.clone());
    (controller, reporter)
}

fn video_file(dir: &Path) -> Result<std::path::PathBuf> {
    common::create_test_file(dir, "movie.mkv", "binary container data")
}

fn two_tracks() -> MockDecoder {
    MockDecoder::with_streams([common::track_srt("English"), common::track_srt("French")])
}

/// Test that an invalid configuration is refused
#[test]
fn test_with_config_withInvalidConfig_shouldFail() {
    let mut config = Config::default();
    config.extraction.probe_limit = 0;

    assert!(Controller::with_config(config).is_err());
}

/// Test listing the tracks of a video
#[tokio::test]
async fn test_list_streams_withVideo_shouldListTracks() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = video_file(temp_dir.path())?;
    let (controller, _) = controller();

    let streams = controller.list_streams_with(two_tracks(), &input).await?;

    assert_eq!(streams.len(), 2);
    assert_eq!(streams[0].display_name, "Subtitle Track 1");
    Ok(())
}

/// Test listing a subtitle file
#[tokio::test]
async fn test_list_streams_withSubtitleFile_shouldListSingleStream() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "movie.srt", common::HELLO_WORLD_SRT)?;
    let (controller, _) = controller();

    let streams = controller.list_streams_with(two_tracks(), &input).await?;

    assert_eq!(streams.len(), 1);
    assert_eq!(streams[0].display_name, "Subtitle File");
    Ok(())
}

/// Test that missing and unsupported inputs are rejected
#[tokio::test]
async fn test_list_streams_withBadInput_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let unknown = common::create_test_file(temp_dir.path(), "notes.txt", "nothing to see")?;
    let (controller, _) = controller();

    assert!(controller.list_streams_with(two_tracks(), &temp_dir.path().join("missing.mkv")).await.is_err());
    assert!(controller.list_streams_with(two_tracks(), &unknown).await.is_err());
    Ok(())
}

/// Test that extraction defaults to the first track
#[tokio::test]
async fn test_extract_withoutTracks_shouldWriteFirstTrack() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = video_file(temp_dir.path())?;
    let output_dir = temp_dir.path().join("out");
    let (controller, reporter) = controller();

    let path = controller.extract_with(two_tracks(), &input, &[], &output_dir).await?;

    assert!(path.starts_with(&output_dir));
    assert!(path.to_string_lossy().ends_with(".srt"));
    assert_eq!(FileManager::read_to_string(&path)?, common::track_srt("English"));
    assert_eq!(reporter.kinds(), vec![NoticeKind::Success]);
    Ok(())
}

/// Test extracting several tracks into one file
#[tokio::test]
async fn test_extract_withTwoTracks_shouldConcatenateTracks() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = video_file(temp_dir.path())?;
    let (controller, _) = controller();

    let path = controller.extract_with(two_tracks(), &input, &[1, 0], temp_dir.path()).await?;

    let expected = format!("{}\n\n{}", common::track_srt("English"), common::track_srt("French"));
    assert_eq!(FileManager::read_to_string(&path)?, expected);
    Ok(())
}

/// Test that an unknown track is an error and nothing is written
#[tokio::test]
async fn test_extract_withUnknownTrack_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = video_file(temp_dir.path())?;
    let output_dir = temp_dir.path().join("out");
    let (controller, _) = controller();

    let result = controller.extract_with(two_tracks(), &input, &[4], &output_dir).await;

    assert!(result.is_err());
    assert!(!output_dir.exists());
    Ok(())
}

/// Test that a video without subtitles cannot be extracted
#[tokio::test]
async fn test_extract_withNoTracks_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = video_file(temp_dir.path())?;
    let (controller, _) = controller();

    let result = controller
        .extract_with(MockDecoder::with_streams(Vec::<String>::new()), &input, &[], temp_dir.path())
        .await;

    assert!(result.is_err());
    Ok(())
}

/// Test that a decoder failing to start stops container input
#[tokio::test]
async fn test_extract_withFailingDecoder_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = video_file(temp_dir.path())?;
    let (controller, reporter) = controller();

    let result = controller
        .extract_with(two_tracks().failing_initialize(), &input, &[], temp_dir.path())
        .await;

    assert!(result.is_err());
    assert_eq!(reporter.kinds(), vec![NoticeKind::Error]);
    Ok(())
}

/// Test building a prompt with a language code
#[tokio::test]
async fn test_prompt_withLanguageCode_shouldUseLanguageName() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "movie.srt", common::THREE_BLOCK_SRT)?;
    let (controller, _) = controller();

    let prompt = controller.prompt_with(two_tracks(), &input, &[], Some("de")).await?;

    assert!(prompt.starts_with("Translate the following subtitles to German."));
    assert!(prompt.contains("\n1. This is a test subtitle.\n2. It contains multiple lines.\n3. For testing purposes.\n"));
    Ok(())
}

/// Test that the configured language is used by default
#[tokio::test]
async fn test_prompt_withoutLanguage_shouldUseConfiguredTarget() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "movie.srt", common::HELLO_WORLD_SRT)?;
    let (controller, _) = controller();

    let prompt = controller.prompt_with(two_tracks(), &input, &[], None).await?;

    assert!(prompt.contains("to French."));
    Ok(())
}

/// Test merging a reply file
#[tokio::test]
async fn test_merge_withPartialReply_shouldWriteMergedFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "movie.srt", common::THREE_BLOCK_SRT)?;
    let reply = common::create_test_file(
        temp_dir.path(),
        "reply.txt",
        "Voici la traduction :\n1. Ceci est un sous-titre de test.\n3. Pour les tests.\n",
    )?;
    let output_dir = temp_dir.path().join("out");
    let (controller, reporter) = controller();

    let (path, report) = controller.merge_with(two_tracks(), &input, &[], &reply, &output_dir).await?;

    assert_eq!(report.translated, 2);
    assert_eq!(report.fallbacks, vec![2]);
    assert_eq!(
        FileManager::read_to_string(&path)?,
        "1\n00:00:01,000 --> 00:00:04,000\nCeci est un sous-titre de test.\n\n\
         2\n00:00:05,000 --> 00:00:09,000\nIt contains multiple lines.\n\n\
         3\n00:00:10,000 --> 00:00:14,000\nPour les tests.\n"
    );
    assert_eq!(
        reporter.kinds(),
        vec![NoticeKind::MergeMismatch, NoticeKind::Success, NoticeKind::Success]
    );
    Ok(())
}

/// Test that a missing reply file fails before anything is opened
#[tokio::test]
async fn test_merge_withMissingReply_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = video_file(temp_dir.path())?;
    let (controller, reporter) = controller();

    let result = controller
        .merge_with(two_tracks(), &input, &[], &temp_dir.path().join("reply.txt"), temp_dir.path())
        .await;

    assert!(result.is_err());
    assert!(reporter.notices().is_empty());
    Ok(())
}
