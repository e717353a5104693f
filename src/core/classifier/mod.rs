//! # Classifier Module
//!
//! Routes each candidate file by extension category:
//! - jpeg-family images are named by capture timestamp under year/month
//!   folders, falling back to the no-metadata subdirectory
//! - image formats that never carry capture tags go straight to the
//!   no-metadata subdirectory under their original name
//! - videos keep their original name under the video root
//!
//! Anything else is not a managed media type and is left untouched.

use crate::core::hasher;
use crate::core::index::IdentityIndex;
use crate::core::metadata::CaptureMetadata;
use crate::core::resolver::{self, PlacementDecision};
use crate::error::WranglerError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// jpeg-family images that may carry a capture timestamp
const EXIF_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg"];

/// Image formats known to never carry usable capture tags
const PLAIN_IMAGE_EXTENSIONS: &[&str] = &["png", "gif", "tif", "tiff", "bmp", "xcf", "psd"];

/// Video containers (no metadata extraction attempted)
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mpeg4", "avi", "mov", "mvi", "3gp"];

/// Media categories recognized by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaCategory {
    /// May carry a capture timestamp (jpg, jpeg)
    ExifImage,
    /// Never carries a usable capture timestamp (png, gif, tiff, ...)
    PlainImage,
    /// Video container (mp4, avi, mov, ...)
    Video,
}

impl MediaCategory {
    /// Detect the category from a file extension, case-insensitively.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_lowercase();
        let ext = ext.as_str();
        if EXIF_IMAGE_EXTENSIONS.contains(&ext) {
            Some(MediaCategory::ExifImage)
        } else if PLAIN_IMAGE_EXTENSIONS.contains(&ext) {
            Some(MediaCategory::PlainImage)
        } else if VIDEO_EXTENSIONS.contains(&ext) {
            Some(MediaCategory::Video)
        } else {
            None
        }
    }

    /// Detect the category from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

/// Destination subtrees the classifier routes into.
#[derive(Debug, Clone)]
pub struct DestinationLayout {
    /// Root for dated images (year/month folders hang off this)
    pub image_root: PathBuf,
    /// Root for videos
    pub video_root: PathBuf,
    /// Where images without usable capture info go
    pub no_metadata_dir: PathBuf,
}

/// Classifies candidate files and produces placement decisions.
///
/// Holds the destination layout and the metadata collaborator; the identity
/// index is passed per call because it is shared run state.
pub struct Classifier<'a> {
    layout: DestinationLayout,
    buffer_size: usize,
    metadata: &'a dyn CaptureMetadata,
}

impl<'a> Classifier<'a> {
    pub fn new(
        layout: DestinationLayout,
        buffer_size: usize,
        metadata: &'a dyn CaptureMetadata,
    ) -> Self {
        Self {
            layout,
            buffer_size,
            metadata,
        }
    }

    /// Classify one candidate file.
    ///
    /// Returns `None` for unmanaged extensions (no decision produced).
    /// For managed files, the content identity is computed first: an
    /// already-indexed identity is a duplicate and skips immediately.
    /// Otherwise the file is routed by category and the final name is
    /// delegated to the resolver; a `Copy` decision registers the identity
    /// in the index so every later file with the same content skips.
    pub fn classify(
        &self,
        source: &Path,
        index: &mut IdentityIndex,
    ) -> Result<Option<PlacementDecision>, WranglerError> {
        let Some(category) = MediaCategory::from_path(source) else {
            return Ok(None);
        };

        let id = hasher::hash_file(source, self.buffer_size)?;
        if index.contains(&id) {
            debug!(path = %source.display(), "content already indexed, skipping");
            return Ok(Some(PlacementDecision::Skip));
        }

        let extension = source
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_lowercase();
        let stem = source
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();

        let (out_dir, base_name) = match category {
            MediaCategory::Video => (self.layout.video_root.clone(), stem),
            MediaCategory::PlainImage => (self.layout.no_metadata_dir.clone(), stem),
            MediaCategory::ExifImage => match self.metadata.extract(source) {
                Some(info) => (
                    self.layout.image_root.join(&info.year).join(&info.month),
                    info.timestamp_label,
                ),
                None => {
                    debug!(path = %source.display(), "no usable capture info");
                    (self.layout.no_metadata_dir.clone(), stem)
                }
            },
        };

        let decision = resolver::resolve(&out_dir, &base_name, &extension, &id, self.buffer_size)?;
        if matches!(decision, PlacementDecision::Copy(_)) {
            index.insert(id, source.to_path_buf());
        }

        Ok(Some(decision))
    }
}
