use anyhow::{Result, Context};
use std::fs;
use std::path::{Path, PathBuf};
use std::io::Read;
use regex::Regex;
use once_cell::sync::Lazy;

// @module: File and directory utilities

// @const: Start of an SRT file: number line followed by a timing line
static SRT_SIGNATURE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d+\s*\r?\n\d{2}:\d{2}:\d{2},\d{3}\s+-->\s+\d{2}:\d{2}:\d{2},\d{3}").unwrap()
});

// @const: Bytes sniffed when the extension says nothing
const SNIFF_LEN: u64 = 4096;

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Write content into `dir` under `file_name`, never overwriting an existing file
    ///
    /// A numeric suffix is added when the name is taken.
    pub fn write_unique<P: AsRef<Path>>(dir: P, file_name: &str, content: &[u8]) -> Result<PathBuf> {
        let dir = dir.as_ref();
        let mut candidate = dir.join(file_name);
        let stem = Path::new(file_name)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| file_name.to_string());
        let extension = Path::new(file_name)
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        let mut counter = 1;
        while candidate.exists() {
            candidate = dir.join(format!("{}_{}{}", stem, counter, extension));
            counter += 1;
        }

        Self::write_to_file(&candidate, content)?;
        Ok(candidate)
    }

    /// Detect if a file is a subtitle file (SRT) or a video container
    pub fn detect_file_type<P: AsRef<Path>>(path: P) -> Result<FileType> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(anyhow::anyhow!("File does not exist: {:?}", path));
        }

        // Check file extension
        if let Some(ext) = path.extension() {
            let ext_str = ext.to_string_lossy().to_lowercase();

            if ext_str == "srt" {
                return Ok(FileType::Subtitle);
            }

            // Common container extensions carrying subtitle streams
            let video_extensions = [
                "mp4", "mkv", "avi", "mov", "wmv", "flv", "webm", "m4v",
                "mpg", "mpeg", "ogv", "ts", "mts", "m2ts"
            ];

            if video_extensions.contains(&ext_str.as_str()) {
                return Ok(FileType::Video);
            }
        }

        // Fall back to examining the first bytes
        let mut head = Vec::new();
        fs::File::open(path)
            .with_context(|| format!("Failed to open file: {:?}", path))?
            .take(SNIFF_LEN)
            .read_to_end(&mut head)?;

        let text = String::from_utf8_lossy(&head);
        let text = text.trim_start_matches('\u{feff}');
        if text.contains("-->") && SRT_SIGNATURE_REGEX.is_match(text) {
            return Ok(FileType::Subtitle);
        }

        Ok(FileType::Unknown)
    }
}

/// Enum representing different file types
#[derive(Debug, PartialEq, Eq)]
pub enum FileType {
    /// Subtitle file (SRT)
    Subtitle,
    /// Video container handed to the decoder
    Video,
    /// Unknown file type
    Unknown,
}
