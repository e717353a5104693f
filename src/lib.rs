//! # Media Wrangler
//!
//! Organizes a tree of pictures and videos into a destination tree: images
//! named by capture timestamp under year/month folders, videos kept by name,
//! and byte-identical content copied at most once.
//!
//! ## Core Philosophy
//! - **Content decides** - a file is a duplicate when its bytes hash equal,
//!   never because of its name or location
//! - **Never clobber** - naming collisions get numbered variants; existing
//!   destination files are never overwritten
//! - **Loud on corruption** - a destination tree already holding duplicated
//!   content aborts the run instead of being quietly "fixed"
//!
//! ## Architecture
//! The library is split into a core engine (UI-agnostic) and presentation
//! layers:
//! - `core` - the classification, deduplication and placement engine
//! - `events` - event-driven progress reporting (GUI-ready)
//! - `error` - error types

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{Result, WranglerError};

/// Initialize tracing for the library
///
/// This should be called by the application entry point (CLI or GUI).
pub fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global default tracing subscriber");
}
