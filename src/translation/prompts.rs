/*!
 * Translation request text.
 *
 * The request is pasted into an external translator (a person or a chat tool)
 * and comes back through `merge`. The framing text is an instruction to that
 * translator; nothing here parses it back.
 */

use crate::subtitle_processor::SubtitleDocument;

/// Framing around the numbered lines of a translation request.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    header: String,
    footer: String,
}

impl PromptTemplate {
    /// Default text placed before the numbered lines.
    pub const HEADER: &'static str = "Translate the following subtitles to {target_language}.
Each line starts with a number followed by a period. Keep every number exactly as it is and translate only the text after it.
Return one line per number, in the same format.";

    /// Default text placed after the numbered lines.
    pub const FOOTER: &'static str = "Do not merge, split, skip or renumber lines.
A dash at the start of a line marks a change of speaker: keep it as a dash, do not turn it into a list bullet.
Reply with the translated numbered lines only.";

    /// Create a template from custom framing text.
    ///
    /// `{target_language}` is replaced in both parts.
    pub fn new(header: &str, footer: &str) -> Self {
        Self {
            header: header.to_string(),
            footer: footer.to_string(),
        }
    }

    /// Render the request for a document.
    ///
    /// Lines are numbered by position starting at 1, whatever the block numbers
    /// are, so the request stays dense when the file has gaps.
    pub fn render(&self, document: &SubtitleDocument, target_language: &str) -> String {
        let mut request = String::new();
        request.push_str(&self.header.replace("{target_language}", target_language));
        request.push_str("\n\n");

        for (position, block) in document.blocks.iter().enumerate() {
            request.push_str(&format!("{}. {}\n", position + 1, block.flattened_text()));
        }

        request.push('\n');
        request.push_str(&self.footer.replace("{target_language}", target_language));
        request.push('\n');
        request
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(Self::HEADER, Self::FOOTER)
    }
}

/// Build the translation request for a document with the default framing.
pub fn build_request(document: &SubtitleDocument, target_language: &str) -> String {
    PromptTemplate::default().render(document, target_language)
}
