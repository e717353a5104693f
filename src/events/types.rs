//! Event type definitions for progress reporting.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted during an organizing run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Destination pre-scan events
    Seed(SeedEvent),
    /// Source walk events
    Organize(OrganizeEvent),
}

/// Events while indexing content already in the destination tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SeedEvent {
    /// Pre-scan has started
    Started { roots: Vec<PathBuf> },
    /// An existing destination file was hashed and indexed
    FileIndexed { path: PathBuf },
    /// Pre-scan completed
    Completed { files_indexed: usize },
}

/// Events while walking and placing source files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OrganizeEvent {
    /// The source walk has started
    Started { source: PathBuf },
    /// A file was copied (or would be, in a dry run) to its destination
    FileCopied {
        source: PathBuf,
        destination: PathBuf,
    },
    /// A file's content was already present; nothing copied
    DuplicateSkipped { path: PathBuf },
    /// The run completed
    Completed { files_copied: usize },
}
