//! # Organize Module
//!
//! One end-to-end organizing pass.
//!
//! ## Stages
//! 1. **Validate** - reject bad configuration before touching the filesystem
//! 2. **Prepare** - create the destination subtrees
//! 3. **Seed** - index content already present in the destination
//! 4. **Walk** - classify every source file and copy the accepted ones
//!
//! The source walk is single-threaded: the identity index and the
//! name-resolution probes are check-then-act sequences that must not race.

use crate::core::classifier::{Classifier, DestinationLayout};
use crate::core::hasher::DEFAULT_BUFFER_SIZE;
use crate::core::index::IdentityIndex;
use crate::core::metadata::{CaptureMetadata, ExifMetadata};
use crate::core::resolver::PlacementDecision;
use crate::error::{ConfigError, CopyError, Result, WranglerError};
use crate::events::{null_sender, Event, EventSender, OrganizeEvent, SeedEvent};
use serde::Serialize;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};
use walkdir::WalkDir;

pub const DEFAULT_IMAGE_DIR: &str = "pics";
pub const DEFAULT_VIDEO_DIR: &str = "vids";
pub const DEFAULT_NO_METADATA_DIR: &str = "NoExif";

/// Configuration for one organizing run
#[derive(Debug, Clone)]
pub struct OrganizeConfig {
    /// Directory walked for media files to organize
    pub source: PathBuf,
    /// Directory the organized tree is written into
    pub destination: PathBuf,
    /// Name of the image subdirectory inside the destination
    pub image_dir: String,
    /// Name of the video subdirectory inside the destination
    pub video_dir: String,
    /// Name of the no-metadata subdirectory inside the image subdirectory
    pub no_metadata_dir: String,
    /// Read buffer for hashing
    pub buffer_size: usize,
    /// Compute and report decisions without copying anything
    pub dry_run: bool,
}

impl OrganizeConfig {
    /// Configuration with the default layout names and buffer size.
    pub fn new(source: PathBuf, destination: PathBuf) -> Self {
        Self {
            source,
            destination,
            image_dir: DEFAULT_IMAGE_DIR.to_string(),
            video_dir: DEFAULT_VIDEO_DIR.to_string(),
            no_metadata_dir: DEFAULT_NO_METADATA_DIR.to_string(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            dry_run: false,
        }
    }

    /// Reject impossible configurations before any directory is touched.
    fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.buffer_size == 0 {
            return Err(ConfigError::ZeroBufferSize);
        }
        // Organizing a tree into itself would scan our own output mid-walk
        if normalized(&self.source) == normalized(&self.destination) {
            return Err(ConfigError::SameSourceAndDestination {
                path: self.source.clone(),
            });
        }
        if !self.source.is_dir() {
            return Err(ConfigError::SourceNotFound {
                path: self.source.clone(),
            });
        }
        Ok(())
    }

    fn layout(&self) -> DestinationLayout {
        let image_root = self.destination.join(&self.image_dir);
        let video_root = self.destination.join(&self.video_dir);
        let no_metadata_dir = image_root.join(&self.no_metadata_dir);
        DestinationLayout {
            image_root,
            video_root,
            no_metadata_dir,
        }
    }
}

/// Outcome of one organizing run
#[derive(Debug, Clone, Default, Serialize)]
pub struct OrganizeReport {
    /// Regular files visited in the source tree
    pub files_examined: usize,
    /// Files copied (or that would be copied, in a dry run)
    pub files_copied: usize,
    /// Files skipped because their content was already present
    pub duplicates_skipped: usize,
    /// Zero-byte files passed over entirely
    pub empty_skipped: usize,
    /// Files with unmanaged extensions, left untouched
    pub ignored: usize,
    /// Pre-existing destination files indexed before the walk
    pub destination_seeded: usize,
    /// Whether this run moved any bytes
    pub dry_run: bool,
    pub duration_ms: u64,
}

/// Runs one organizing pass over a source tree.
pub struct Organizer {
    config: OrganizeConfig,
    metadata: Box<dyn CaptureMetadata>,
}

impl Organizer {
    /// Organizer with the production EXIF metadata extractor.
    pub fn new(config: OrganizeConfig) -> Self {
        Self {
            config,
            metadata: Box::new(ExifMetadata),
        }
    }

    /// Swap the metadata collaborator (e.g. a fixed stub in tests).
    pub fn with_metadata(mut self, metadata: Box<dyn CaptureMetadata>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Run without progress reporting.
    pub fn run(&self) -> Result<OrganizeReport> {
        self.run_with_events(&null_sender())
    }

    /// Run one end-to-end pass, emitting progress events.
    pub fn run_with_events(&self, events: &EventSender) -> Result<OrganizeReport> {
        let start = Instant::now();

        self.config.validate()?;

        info!(
            source = %self.config.source.display(),
            destination = %self.config.destination.display(),
            image_dir = %self.config.image_dir,
            video_dir = %self.config.video_dir,
            no_metadata_dir = %self.config.no_metadata_dir,
            buffer_size = self.config.buffer_size,
            dry_run = self.config.dry_run,
            "starting organize run"
        );

        let layout = self.config.layout();
        for dir in [
            &self.config.destination,
            &layout.image_root,
            &layout.video_root,
            &layout.no_metadata_dir,
        ] {
            fs::create_dir_all(dir).map_err(|e| WranglerError::CreateDir {
                path: dir.clone(),
                source: e,
            })?;
        }

        // Index what the destination already holds so renamed copies of
        // existing content are recognized as duplicates.
        let seed_roots = [layout.image_root.clone(), layout.video_root.clone()];
        events.send(Event::Seed(SeedEvent::Started {
            roots: seed_roots.to_vec(),
        }));
        let mut index = IdentityIndex::new();
        let seeded = index.seed(&seed_roots, self.config.buffer_size, events)?;
        events.send(Event::Seed(SeedEvent::Completed {
            files_indexed: seeded,
        }));
        info!(files_indexed = seeded, "destination index ready");

        let classifier = Classifier::new(layout, self.config.buffer_size, self.metadata.as_ref());
        let mut report = OrganizeReport {
            destination_seeded: seeded,
            dry_run: self.config.dry_run,
            ..Default::default()
        };

        events.send(Event::Organize(OrganizeEvent::Started {
            source: self.config.source.clone(),
        }));

        for entry in WalkDir::new(&self.config.source).follow_links(false) {
            let entry = entry.map_err(walk_error)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            report.files_examined += 1;

            // Empty files are excluded from hashing, indexing and copying
            let size = entry.metadata().map_err(walk_error)?.len();
            if size == 0 {
                debug!(path = %path.display(), "empty file, skipping");
                report.empty_skipped += 1;
                continue;
            }

            match classifier.classify(path, &mut index)? {
                None => {
                    report.ignored += 1;
                }
                Some(PlacementDecision::Skip) => {
                    report.duplicates_skipped += 1;
                    events.send(Event::Organize(OrganizeEvent::DuplicateSkipped {
                        path: path.to_path_buf(),
                    }));
                }
                Some(PlacementDecision::Copy(destination)) => {
                    debug!(
                        from = %path.display(),
                        to = %destination.display(),
                        "placing file"
                    );
                    if !self.config.dry_run {
                        copy_file(path, &destination)?;
                    }
                    report.files_copied += 1;
                    events.send(Event::Organize(OrganizeEvent::FileCopied {
                        source: path.to_path_buf(),
                        destination,
                    }));
                }
            }
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        events.send(Event::Organize(OrganizeEvent::Completed {
            files_copied: report.files_copied,
        }));
        info!(
            copied = report.files_copied,
            duplicates = report.duplicates_skipped,
            ignored = report.ignored,
            "organize run complete"
        );

        Ok(report)
    }
}

/// Copy bytes and carry the source modification time over.
fn copy_file(from: &Path, to: &Path) -> std::result::Result<(), CopyError> {
    let io_error = |source| CopyError::Io {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };

    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    fs::copy(from, to).map_err(io_error)?;

    let metadata = fs::metadata(from).map_err(io_error)?;
    let mtime = filetime::FileTime::from_last_modification_time(&metadata);
    filetime::set_file_mtime(to, mtime).map_err(io_error)?;

    Ok(())
}

/// Lexical path normalization, enough to compare differently-spelled paths.
///
/// The destination may not exist yet, so canonicalization is not an option.
fn normalized(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        out
    }
}

fn walk_error(error: walkdir::Error) -> WranglerError {
    let path = error.path().map(Path::to_path_buf).unwrap_or_default();
    WranglerError::Walk {
        path,
        source: std::io::Error::new(std::io::ErrorKind::Other, error.to_string()),
    }
}
