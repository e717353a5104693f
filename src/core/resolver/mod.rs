//! # Resolver Module
//!
//! Decides where an accepted file actually lands inside one destination
//! directory: the canonical name, a numbered variant, or nowhere at all
//! when the exact content is already sitting under the desired name.

use crate::core::hasher::{self, ContentId};
use crate::error::ResolveError;
use std::path::{Path, PathBuf};

/// Highest numbered suffix probed before the run gives up.
const MAX_SUFFIX: u32 = 99;

/// Terminal outcome of resolving a single candidate file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlacementDecision {
    /// The same content is already present under the desired name;
    /// nothing to copy.
    Skip,
    /// Copy the candidate to this path.
    Copy(PathBuf),
}

/// Resolve the destination path for `base_name.extension` inside `out_dir`.
///
/// The canonical name wins when free. When it is taken by identical content
/// the candidate is a true duplicate. Otherwise numbered variants `_01`
/// through `_99` are probed in order and the first free slot wins; the
/// variants need no content comparison because the probe stops at the first
/// hole. A fully occupied range is a fatal error, not an invitation to
/// invent a 100th naming scheme.
pub fn resolve(
    out_dir: &Path,
    base_name: &str,
    extension: &str,
    candidate: &ContentId,
    buffer_size: usize,
) -> Result<PlacementDecision, ResolveError> {
    let canonical = out_dir.join(format!("{base_name}.{extension}"));
    if !canonical.is_file() {
        return Ok(PlacementDecision::Copy(canonical));
    }

    let existing = hasher::hash_file(&canonical, buffer_size)?;
    if existing == *candidate {
        return Ok(PlacementDecision::Skip);
    }

    for idx in 1..=MAX_SUFFIX {
        let variant = out_dir.join(format!("{base_name}_{idx:02}.{extension}"));
        if !variant.is_file() {
            return Ok(PlacementDecision::Copy(variant));
        }
    }

    Err(ResolveError::SuffixesExhausted {
        directory: out_dir.to_path_buf(),
        base_name: base_name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hasher::DEFAULT_BUFFER_SIZE;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(content).unwrap();
        path
    }

    fn id_of(content: &[u8]) -> ContentId {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "probe.bin", content);
        hasher::hash_file(&path, DEFAULT_BUFFER_SIZE).unwrap()
    }

    #[test]
    fn free_canonical_name_is_chosen() {
        let dir = TempDir::new().unwrap();
        let id = id_of(b"fresh");

        let decision =
            resolve(dir.path(), "2020-03-05_140722", "jpg", &id, DEFAULT_BUFFER_SIZE).unwrap();

        assert_eq!(
            decision,
            PlacementDecision::Copy(dir.path().join("2020-03-05_140722.jpg"))
        );
    }

    #[test]
    fn identical_content_at_canonical_name_skips() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "clip.mp4", b"movie bytes");
        let id = id_of(b"movie bytes");

        let decision = resolve(dir.path(), "clip", "mp4", &id, DEFAULT_BUFFER_SIZE).unwrap();

        assert_eq!(decision, PlacementDecision::Skip);
    }

    #[test]
    fn different_content_gets_first_numbered_variant() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "clip.mp4", b"original");
        let id = id_of(b"different");

        let decision = resolve(dir.path(), "clip", "mp4", &id, DEFAULT_BUFFER_SIZE).unwrap();

        // Two-digit suffix even for the first variant
        assert_eq!(
            decision,
            PlacementDecision::Copy(dir.path().join("clip_01.mp4"))
        );
    }

    #[test]
    fn probe_skips_occupied_variants() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "clip.mp4", b"original");
        write_file(dir.path(), "clip_01.mp4", b"first variant");
        write_file(dir.path(), "clip_02.mp4", b"second variant");
        let id = id_of(b"newcomer");

        let decision = resolve(dir.path(), "clip", "mp4", &id, DEFAULT_BUFFER_SIZE).unwrap();

        assert_eq!(
            decision,
            PlacementDecision::Copy(dir.path().join("clip_03.mp4"))
        );
    }

    #[test]
    fn variants_are_not_compared_by_content() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "clip.mp4", b"original");
        // A variant with the candidate's exact content does not short-circuit;
        // only the canonical name is content-compared.
        write_file(dir.path(), "clip_01.mp4", b"newcomer");
        let id = id_of(b"newcomer");

        let decision = resolve(dir.path(), "clip", "mp4", &id, DEFAULT_BUFFER_SIZE).unwrap();

        assert_eq!(
            decision,
            PlacementDecision::Copy(dir.path().join("clip_02.mp4"))
        );
    }

    #[test]
    fn exhausted_suffix_range_is_fatal() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "clip.mp4", b"original");
        for idx in 1..=99 {
            write_file(dir.path(), &format!("clip_{idx:02}.mp4"), b"occupied");
        }
        let id = id_of(b"no room left");

        let result = resolve(dir.path(), "clip", "mp4", &id, DEFAULT_BUFFER_SIZE);

        match result {
            Err(ResolveError::SuffixesExhausted {
                directory,
                base_name,
            }) => {
                assert_eq!(directory, dir.path());
                assert_eq!(base_name, "clip");
            }
            other => panic!("expected exhaustion, got {other:?}"),
        }
    }
}
