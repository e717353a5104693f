//! # Error Module
//!
//! Error types for the media wrangler.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, file names, what went wrong
//! - **Fail loudly** - destination corruption and an exhausted naming range
//!   abort the whole run instead of being papered over

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum WranglerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Destination pre-scan error: {0}")]
    Seed(#[from] SeedError),

    #[error("Hashing error: {0}")]
    Hash(#[from] HashError),

    #[error("Name resolution error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("Copy error: {0}")]
    Copy(#[from] CopyError),

    #[error("Failed to read directory {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors rejected up front, before any directory is touched
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Source and destination are the same directory: {path}")]
    SameSourceAndDestination { path: PathBuf },

    #[error("Hash read buffer must be greater than zero")]
    ZeroBufferSize,

    #[error("Source directory not found: {path}")]
    SourceNotFound { path: PathBuf },
}

/// Errors while pre-scanning the destination tree
#[derive(Error, Debug)]
pub enum SeedError {
    /// Two distinct pre-existing destination files hash identically.
    /// This indicates destination-tree corruption and is never resolved
    /// silently.
    #[error(
        "The destination tree has two files with the same content!\n  existing: {existing}\n  conflicting: {conflicting}"
    )]
    IdentityCollision {
        existing: PathBuf,
        conflicting: PathBuf,
    },

    #[error("Failed to read directory {path}: {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Hash(#[from] HashError),
}

/// Errors while hashing a file's content
#[derive(Error, Debug)]
pub enum HashError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors while resolving a destination name
#[derive(Error, Debug)]
pub enum ResolveError {
    /// All 99 numbered variants for one base name are taken. A directory
    /// this crowded signals a deeper hygiene problem, so the run stops.
    #[error("No free name for \"{base_name}\" in {directory} after 99 numbered variants")]
    SuffixesExhausted {
        directory: PathBuf,
        base_name: String,
    },

    #[error(transparent)]
    Hash(#[from] HashError),
}

/// Errors while copying an accepted file into place
#[derive(Error, Debug)]
pub enum CopyError {
    #[error("Failed to copy {from} to {to}: {source}")]
    Io {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, WranglerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_collision_names_both_paths() {
        let error = SeedError::IdentityCollision {
            existing: PathBuf::from("/dest/pics/2020/03/a.jpg"),
            conflicting: PathBuf::from("/dest/pics/NoExif/b.jpg"),
        };
        let message = error.to_string();
        assert!(message.contains("/dest/pics/2020/03/a.jpg"));
        assert!(message.contains("/dest/pics/NoExif/b.jpg"));
    }

    #[test]
    fn suffix_exhaustion_names_directory_and_base() {
        let error = ResolveError::SuffixesExhausted {
            directory: PathBuf::from("/dest/vids"),
            base_name: "holiday".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("/dest/vids"));
        assert!(message.contains("holiday"));
    }

    #[test]
    fn hash_error_includes_path() {
        let error = HashError::Open {
            path: PathBuf::from("/photos/broken.jpg"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(error.to_string().contains("/photos/broken.jpg"));
    }
}
