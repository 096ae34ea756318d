use std::fmt;
use std::fs;
use std::path::Path;
use regex::Regex;
use once_cell::sync::Lazy;
use anyhow::{Result, Context};
use log::{warn, debug};

// @module: Subtitle block model, SRT parsing and serialization

// @const: Block number line, positive only
static NUMBER_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^0*[1-9]\d*$").unwrap()
});

// @const: Timing line, only the leading timestamp is checked
static TIMING_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{2}:\d{2}:\d{2}").unwrap()
});

// @struct: Single caption unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleBlock {
    // @field: Sequence number, the merge correlation key
    pub number: u64,

    // @field: Timing range, replayed verbatim
    pub timing: String,

    // @field: Caption text lines
    pub lines: Vec<String>,
}

impl SubtitleBlock {
    /// Creates a new subtitle block
    pub fn new(number: u64, timing: impl Into<String>, lines: Vec<String>) -> Self {
        SubtitleBlock {
            number,
            timing: timing.into(),
            lines,
        }
    }

    /// Caption text on a single line, lines separated by one space
    pub fn flattened_text(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for SubtitleBlock {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.number)?;
        writeln!(f, "{}", self.timing)?;
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        writeln!(f)
    }
}

/// Parsed subtitle file together with its text form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubtitleDocument {
    /// Blocks in file order
    pub blocks: Vec<SubtitleBlock>,

    /// Text form handed out as the output artifact
    raw: String,
}

// @struct: Block being collected by the parser
#[derive(Debug, Default)]
struct BlockAccumulator {
    number: Option<u64>,
    timing: Option<String>,
    lines: Vec<String>,
}

impl BlockAccumulator {
    fn has_text(&self) -> bool {
        !self.lines.is_empty()
    }

    // @flushes: Accumulated block into `blocks`, resets self
    fn flush_into(&mut self, blocks: &mut Vec<SubtitleBlock>) {
        let taken = std::mem::take(self);
        let number = match taken.number {
            Some(number) => number,
            None => {
                // Saturates: text after block u64::MAX stays under that number
                let inferred = blocks
                    .last()
                    .map_or(1, |b| b.number.checked_add(1).unwrap_or(b.number));
                warn!("Subtitle text without a block number, assuming {}", inferred);
                inferred
            }
        };
        blocks.push(SubtitleBlock {
            number,
            timing: taken.timing.unwrap_or_default(),
            lines: taken.lines,
        });
    }
}

impl SubtitleDocument {
    /// Build a document from blocks; the text form is their serialization
    pub fn from_blocks(blocks: Vec<SubtitleBlock>) -> Self {
        let raw = serialize_blocks(&blocks);
        SubtitleDocument { blocks, raw }
    }

    /// Parse SRT text into a document
    ///
    /// Blocks that never collect a text line are dropped. Numbers are kept as
    /// found: no renumbering and no gap or duplicate checks.
    pub fn parse(text: &str) -> Self {
        let mut blocks = Vec::new();
        let mut current = BlockAccumulator::default();

        for line in text.lines() {
            let trimmed = line.trim();

            if trimmed.is_empty() {
                if current.has_text() {
                    current.flush_into(&mut blocks);
                }
                continue;
            }

            if NUMBER_LINE_REGEX.is_match(trimmed) {
                if let Ok(number) = trimmed.parse::<u64>() {
                    if current.has_text() {
                        current.flush_into(&mut blocks);
                    }
                    current = BlockAccumulator {
                        number: Some(number),
                        ..Default::default()
                    };
                    continue;
                }
            }

            if TIMING_LINE_REGEX.is_match(trimmed) {
                current.timing = Some(trimmed.to_string());
                continue;
            }

            current.lines.push(trimmed.to_string());
        }

        if current.has_text() {
            current.flush_into(&mut blocks);
        }

        debug!("Parsed {} subtitle blocks", blocks.len());

        SubtitleDocument {
            blocks,
            raw: text.to_string(),
        }
    }

    /// Serialize the blocks to SRT text
    pub fn serialize(&self) -> String {
        serialize_blocks(&self.blocks)
    }

    /// Text handed out as the output artifact
    pub fn output_text(&self) -> &str {
        &self.raw
    }

    /// True when parsing produced no block
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Number of blocks
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Write the output text to a file, creating parent directories
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        fs::write(path, self.output_text())
            .with_context(|| format!("Failed to write subtitle file: {}", path.display()))?;

        Ok(())
    }
}

fn serialize_blocks(blocks: &[SubtitleBlock]) -> String {
    let mut output = String::new();
    for block in blocks {
        output.push_str(&block.to_string());
    }

    // Exactly one trailing newline
    let trimmed_len = output.trim_end_matches('\n').len();
    if trimmed_len == 0 {
        return String::new();
    }
    output.truncate(trimmed_len);
    output.push('\n');
    output
}

impl fmt::Display for SubtitleDocument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.serialize())
    }
}
