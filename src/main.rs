//! # media-wrangler CLI
//!
//! Command-line interface for the media wrangler.
//!
//! ## Usage
//! ```bash
//! media-wrangler ~/camera-dump ~/organized
//! media-wrangler ~/camera-dump ~/organized --dry-run --output json
//! ```

mod cli;

use media_wrangler::Result;

fn main() -> Result<()> {
    cli::run()
}
