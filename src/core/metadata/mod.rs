//! # Metadata Module
//!
//! Extracts the capture timestamp from image metadata.
//!
//! ## Extracted Tags
//! - DateTimeOriginal (preferred)
//! - DateTimeDigitized (fallback)
//!
//! Everything that can go wrong here (missing file, corrupt container, no
//! usable tag, unparseable value) degrades to "no capture info", never an
//! error: such images are still organized, just under the no-metadata
//! subdirectory.

use chrono::NaiveDateTime;
use exif::{In, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// EXIF timestamp layout, e.g. "2020:03:05 14:07:22"
const EXIF_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Capture-timestamp triple used to name and route dated images.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureInfo {
    /// Formatted "YYYY-MM-DD_HHMMSS"; becomes the destination base name
    pub timestamp_label: String,
    /// "YYYY"
    pub year: String,
    /// "MM", zero-padded
    pub month: String,
}

impl CaptureInfo {
    /// Build the triple from a parsed capture time.
    ///
    /// Sub-second precision and time zone are collapsed by the label
    /// format; two captures in the same second share a base name and rely
    /// on numbered-suffix collision handling downstream.
    pub fn from_datetime(taken: NaiveDateTime) -> Self {
        Self {
            timestamp_label: taken.format("%Y-%m-%d_%H%M%S").to_string(),
            year: taken.format("%Y").to_string(),
            month: taken.format("%m").to_string(),
        }
    }
}

/// Narrow interface the classifier depends on for capture timestamps.
///
/// Implement this to swap the metadata source (e.g. fixed values in tests).
pub trait CaptureMetadata {
    /// Return capture info for an image, or None when no usable tag exists.
    fn extract(&self, path: &Path) -> Option<CaptureInfo>;
}

/// Production extractor reading EXIF tags from the image container.
#[derive(Debug, Default)]
pub struct ExifMetadata;

impl CaptureMetadata for ExifMetadata {
    fn extract(&self, path: &Path) -> Option<CaptureInfo> {
        let file = File::open(path).ok()?;
        let mut reader = BufReader::new(file);
        let exif = Reader::new().read_from_container(&mut reader).ok()?;

        let field = exif
            .get_field(Tag::DateTimeOriginal, In::PRIMARY)
            .or_else(|| exif.get_field(Tag::DateTimeDigitized, In::PRIMARY))?;

        let raw = ascii_value(&field.value)?;
        let taken = NaiveDateTime::parse_from_str(raw, EXIF_DATETIME_FORMAT).ok()?;
        Some(CaptureInfo::from_datetime(taken))
    }
}

/// Decode an EXIF ASCII value into a trimmed string.
fn ascii_value(value: &Value) -> Option<&str> {
    if let Value::Ascii(ref vec) = value {
        let bytes = vec.first()?;
        let s = std::str::from_utf8(bytes).ok()?;
        let trimmed = s.trim_end_matches('\0').trim();
        if !trimmed.is_empty() {
            return Some(trimmed);
        }
    }
    None
}
