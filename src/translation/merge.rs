/*!
 * Reconciliation of translated text with the original blocks.
 */

use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::subtitle_processor::{SubtitleBlock, SubtitleDocument};

/// Numbered response line: `12. some text`; `1.5x` is not a number marker
static NUMBERED_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d+)\.(?:\s+(.*))?$").unwrap()
});

/// Outcome of a merge
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Blocks that received translated text
    pub translated: usize,
    /// Numbers of blocks that kept their original text
    pub fallbacks: Vec<u64>,
}

impl MergeReport {
    /// True when every block was matched
    pub fn is_complete(&self) -> bool {
        self.fallbacks.is_empty()
    }
}

/// Merge translated text back into a document
///
/// Each block looks for the first response line numbered with the block's own
/// `number`; the line order of the response does not matter. Blocks without a
/// usable match keep their original text flattened to one line. Every block of
/// the result has exactly one line, numbers and timings are untouched.
pub fn merge_response(document: &SubtitleDocument, response: &str) -> (SubtitleDocument, MergeReport) {
    let candidates: Vec<(u64, &str)> = response
        .lines()
        .filter_map(|line| {
            let caps = NUMBERED_LINE_REGEX.captures(line)?;
            let number = caps.get(1)?.as_str().parse::<u64>().ok()?;
            Some((number, caps.get(2).map_or("", |m| m.as_str().trim())))
        })
        .collect();

    debug!("Translation response holds {} numbered lines", candidates.len());

    let mut report = MergeReport::default();
    let blocks = document
        .blocks
        .iter()
        .map(|block| {
            let translated = candidates
                .iter()
                .find(|(number, _)| *number == block.number)
                .map(|(_, text)| *text)
                .filter(|text| !text.is_empty());

            let text = match translated {
                Some(text) => {
                    report.translated += 1;
                    text.to_string()
                }
                None => {
                    report.fallbacks.push(block.number);
                    block.flattened_text()
                }
            };

            SubtitleBlock::new(block.number, block.timing.clone(), vec![text])
        })
        .collect();

    info!(
        "Merged translation: {} translated, {} kept original",
        report.translated,
        report.fallbacks.len()
    );

    (SubtitleDocument::from_blocks(blocks), report)
}
