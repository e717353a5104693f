//! # Index Module
//!
//! Maps content identities to the first path ever seen with that content.
//!
//! ## Lifecycle
//! Created empty at run start, seeded by scanning the existing destination
//! tree, then grows monotonically as new files are accepted. Nothing is
//! persisted between runs; the next run re-derives the index from the
//! destination tree.
//!
//! ## Invariants
//! - At most one entry per identity; first writer wins and entries are
//!   never overwritten within a run.
//! - Zero-byte files never enter the index.

use crate::core::classifier::MediaCategory;
use crate::core::hasher::{self, ContentId};
use crate::error::{HashError, SeedError};
use crate::events::{Event, EventSender, SeedEvent};
use rayon::prelude::*;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Content identity to first-seen source path.
#[derive(Debug, Default)]
pub struct IdentityIndex {
    entries: HashMap<ContentId, PathBuf>,
}

impl IdentityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &ContentId) -> bool {
        self.entries.contains_key(id)
    }

    /// First-writer-wins insert.
    ///
    /// Returns true when the mapping was added, false when the identity was
    /// already present (the existing entry is left untouched).
    pub fn insert(&mut self, id: ContentId, path: PathBuf) -> bool {
        match self.entries.entry(id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(vacant) => {
                vacant.insert(path);
                true
            }
        }
    }

    /// Pre-populate the index from existing destination subtrees.
    ///
    /// Walks each root recursively (symlinks not followed), considers every
    /// non-empty file whose extension matches a known media category, hashes
    /// the candidates in parallel, then inserts sequentially so the
    /// collision check cannot race. Two distinct pre-existing files with the
    /// same identity abort the run: that is destination-tree corruption, and
    /// resolving it silently would hide real data problems.
    ///
    /// Returns the number of files indexed.
    pub fn seed(
        &mut self,
        roots: &[PathBuf],
        buffer_size: usize,
        events: &EventSender,
    ) -> Result<usize, SeedError> {
        let mut candidates: Vec<PathBuf> = Vec::new();

        for root in roots {
            // A fresh destination has nothing to seed
            if !root.is_dir() {
                continue;
            }
            for entry in WalkDir::new(root).follow_links(false) {
                let entry = entry.map_err(walk_error)?;
                if !entry.file_type().is_file() {
                    continue;
                }
                let path = entry.path();
                if MediaCategory::from_path(path).is_none() {
                    continue;
                }
                let size = entry.metadata().map_err(walk_error)?.len();
                if size == 0 {
                    continue;
                }
                candidates.push(path.to_path_buf());
            }
        }

        let hashed: Vec<(PathBuf, Result<ContentId, HashError>)> = candidates
            .into_par_iter()
            .map(|path| {
                let id = hasher::hash_file(&path, buffer_size);
                (path, id)
            })
            .collect();

        let mut seeded = 0;
        for (path, id) in hashed {
            let id = id?;
            if let Some(existing) = self.entries.get(&id) {
                return Err(SeedError::IdentityCollision {
                    existing: existing.clone(),
                    conflicting: path,
                });
            }
            self.entries.insert(id, path.clone());
            seeded += 1;
            events.send(Event::Seed(SeedEvent::FileIndexed { path }));
        }

        Ok(seeded)
    }
}

fn walk_error(error: walkdir::Error) -> SeedError {
    let path = error.path().map(Path::to_path_buf).unwrap_or_default();
    SeedError::ReadDirectory {
        path,
        source: std::io::Error::new(std::io::ErrorKind::Other, error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hasher::DEFAULT_BUFFER_SIZE;
    use crate::events::null_sender;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(content).unwrap();
        path
    }

    fn id_of(dir: &TempDir, content: &[u8]) -> ContentId {
        let path = write_file(dir.path(), "probe.bin", content);
        hasher::hash_file(&path, DEFAULT_BUFFER_SIZE).unwrap()
    }

    #[test]
    fn insert_is_first_writer_wins() {
        let dir = TempDir::new().unwrap();
        let id = id_of(&dir, b"content");
        let mut index = IdentityIndex::new();

        assert!(index.insert(id, PathBuf::from("/first.jpg")));
        assert!(!index.insert(id, PathBuf::from("/second.jpg")));
        assert_eq!(index.len(), 1);
        assert!(index.contains(&id));
    }

    #[test]
    fn seed_indexes_media_files_recursively() {
        let dest = TempDir::new().unwrap();
        let nested = dest.path().join("2020").join("03");
        fs::create_dir_all(&nested).unwrap();
        write_file(&nested, "photo.jpg", b"photo");
        write_file(dest.path(), "clip.mp4", b"clip");

        let mut index = IdentityIndex::new();
        let seeded = index
            .seed(
                &[dest.path().to_path_buf()],
                DEFAULT_BUFFER_SIZE,
                &null_sender(),
            )
            .unwrap();

        assert_eq!(seeded, 2);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn seed_ignores_unmanaged_and_empty_files() {
        let dest = TempDir::new().unwrap();
        write_file(dest.path(), "notes.txt", b"not media");
        write_file(dest.path(), "empty.jpg", b"");
        write_file(dest.path(), "real.jpg", b"bytes");

        let mut index = IdentityIndex::new();
        let seeded = index
            .seed(
                &[dest.path().to_path_buf()],
                DEFAULT_BUFFER_SIZE,
                &null_sender(),
            )
            .unwrap();

        assert_eq!(seeded, 1);
    }

    #[test]
    fn seed_skips_missing_roots() {
        let dest = TempDir::new().unwrap();
        let missing = dest.path().join("does-not-exist");

        let mut index = IdentityIndex::new();
        let seeded = index
            .seed(&[missing], DEFAULT_BUFFER_SIZE, &null_sender())
            .unwrap();

        assert_eq!(seeded, 0);
        assert!(index.is_empty());
    }

    #[test]
    fn seed_aborts_on_identity_collision_naming_both_paths() {
        let dest = TempDir::new().unwrap();
        write_file(dest.path(), "first.jpg", b"identical bytes");
        write_file(dest.path(), "second.jpg", b"identical bytes");

        let mut index = IdentityIndex::new();
        let result = index.seed(
            &[dest.path().to_path_buf()],
            DEFAULT_BUFFER_SIZE,
            &null_sender(),
        );

        match result {
            Err(SeedError::IdentityCollision {
                existing,
                conflicting,
            }) => {
                let names: Vec<_> = [&existing, &conflicting]
                    .iter()
                    .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
                    .collect();
                assert!(names.contains(&"first.jpg".to_string()));
                assert!(names.contains(&"second.jpg".to_string()));
            }
            other => panic!("expected collision, got {other:?}"),
        }
    }

    #[test]
    fn seed_emits_one_event_per_indexed_file() {
        let dest = TempDir::new().unwrap();
        write_file(dest.path(), "a.jpg", b"a");
        write_file(dest.path(), "b.mp4", b"b");

        let (sender, receiver) = crate::events::EventChannel::new();
        let mut index = IdentityIndex::new();
        index
            .seed(&[dest.path().to_path_buf()], DEFAULT_BUFFER_SIZE, &sender)
            .unwrap();
        drop(sender);

        let indexed = receiver
            .iter()
            .filter(|e| matches!(e, Event::Seed(SeedEvent::FileIndexed { .. })))
            .count();
        assert_eq!(indexed, 2);
    }
}
