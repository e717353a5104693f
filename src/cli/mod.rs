//! # CLI Module
//!
//! Command-line interface for the media wrangler.
//!
//! ## Usage
//! ```bash
//! # Organize a camera dump into a library
//! media-wrangler ~/camera-dump ~/organized
//!
//! # Custom subdirectory names
//! media-wrangler ~/camera-dump ~/organized --pic-dir photos --vid-dir movies
//!
//! # See what would happen without moving a byte
//! media-wrangler ~/camera-dump ~/organized --dry-run
//!
//! # JSON report for scripting
//! media-wrangler ~/camera-dump ~/organized --output json
//! ```

use clap::{Parser, ValueEnum};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use media_wrangler::core::organize::{
    OrganizeConfig, OrganizeReport, Organizer, DEFAULT_IMAGE_DIR, DEFAULT_NO_METADATA_DIR,
    DEFAULT_VIDEO_DIR,
};
use media_wrangler::error::Result;
use media_wrangler::events::{Event, EventChannel, OrganizeEvent, SeedEvent};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

/// Media Wrangler - organize pictures and videos without duplicating a byte
#[derive(Parser, Debug)]
#[command(name = "media-wrangler")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to walk and find files for organizing
    source: PathBuf,

    /// Directory where organized files are copied to
    destination: PathBuf,

    /// Name of the image subfolder in the destination
    #[arg(long, default_value = DEFAULT_IMAGE_DIR)]
    pic_dir: String,

    /// Name of the video subfolder in the destination
    #[arg(long, default_value = DEFAULT_VIDEO_DIR)]
    vid_dir: String,

    /// Where images without usable metadata go, inside the image subfolder
    #[arg(long, default_value = DEFAULT_NO_METADATA_DIR)]
    no_exif_dir: String,

    /// Size of the buffer used for hashing. Larger buffers may be faster
    /// for large files
    #[arg(long, default_value_t = 2048)]
    read_buffer: usize,

    /// Go through the motions, but don't copy anything
    #[arg(long)]
    dry_run: bool,

    /// Output format
    #[arg(short, long, default_value = "pretty")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
    /// Minimal output (counts only)
    Minimal,
}

/// Run the CLI
pub fn run() -> Result<()> {
    media_wrangler::init_tracing();

    let cli = Cli::parse();
    let term = Term::stderr();

    if matches!(cli.output, OutputFormat::Pretty) {
        term.write_line(&format!(
            "{} {}",
            style("Media Wrangler").bold().cyan(),
            style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
        ))
        .ok();
        term.write_line("").ok();
    }

    let config = OrganizeConfig {
        source: cli.source,
        destination: cli.destination,
        image_dir: cli.pic_dir,
        video_dir: cli.vid_dir,
        no_metadata_dir: cli.no_exif_dir,
        buffer_size: cli.read_buffer,
        dry_run: cli.dry_run,
    };
    let organizer = Organizer::new(config);

    // Progress spinner for pretty output, fed by events on a side thread
    let (sender, receiver) = EventChannel::new();
    let progress = if matches!(cli.output, OutputFormat::Pretty) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let progress_clone = progress.clone();
    let event_thread = thread::spawn(move || {
        let mut indexed = 0usize;
        let mut copied = 0usize;
        let mut skipped = 0usize;
        for event in receiver.iter() {
            let Some(ref pb) = progress_clone else {
                continue;
            };
            match event {
                Event::Seed(SeedEvent::Started { .. }) => {
                    pb.set_message("Indexing destination...");
                }
                Event::Seed(SeedEvent::FileIndexed { .. }) => {
                    indexed += 1;
                    pb.set_message(format!("Indexing destination... {indexed}"));
                }
                Event::Organize(OrganizeEvent::Started { .. }) => {
                    pb.set_message("Organizing...");
                }
                Event::Organize(OrganizeEvent::FileCopied { destination, .. }) => {
                    copied += 1;
                    pb.set_message(format!(
                        "{} copied, {} duplicates | {}",
                        copied,
                        skipped,
                        destination
                            .file_name()
                            .unwrap_or_default()
                            .to_string_lossy()
                    ));
                }
                Event::Organize(OrganizeEvent::DuplicateSkipped { .. }) => {
                    skipped += 1;
                    pb.set_message(format!("{copied} copied, {skipped} duplicates"));
                }
                Event::Organize(OrganizeEvent::Completed { .. }) => {
                    pb.finish_and_clear();
                }
                _ => {}
            }
        }
    });

    let result = organizer.run_with_events(&sender);

    // Drop the sender so the event thread sees the channel close
    drop(sender);
    event_thread.join().ok();
    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    let report = result?;

    match cli.output {
        OutputFormat::Pretty => print_pretty_report(&term, &report),
        OutputFormat::Json => print_json_report(&report),
        OutputFormat::Minimal => print_minimal_report(&report),
    }

    Ok(())
}

fn print_pretty_report(term: &Term, report: &OrganizeReport) {
    term.write_line(&format!(
        "{} Organize Complete{}",
        style("✓").green().bold(),
        if report.dry_run {
            style(" (dry run, nothing copied)").yellow().to_string()
        } else {
            String::new()
        }
    ))
    .ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} files examined in {:.1}s",
        style(report.files_examined).cyan(),
        report.duration_ms as f64 / 1000.0
    ))
    .ok();
    term.write_line(&format!(
        "  {} copied into place",
        style(report.files_copied).cyan()
    ))
    .ok();
    term.write_line(&format!(
        "  {} skipped as duplicates",
        style(report.duplicates_skipped).cyan()
    ))
    .ok();

    if report.empty_skipped > 0 {
        term.write_line(&format!(
            "  {} empty files passed over",
            style(report.empty_skipped).dim()
        ))
        .ok();
    }
    if report.ignored > 0 {
        term.write_line(&format!(
            "  {} non-media files left untouched",
            style(report.ignored).dim()
        ))
        .ok();
    }
    if report.destination_seeded > 0 {
        term.write_line(&format!(
            "  {} existing destination files indexed",
            style(report.destination_seeded).dim()
        ))
        .ok();
    }
}

fn print_json_report(report: &OrganizeReport) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Failed to serialize report: {e}"),
    }
}

fn print_minimal_report(report: &OrganizeReport) {
    println!(
        "examined={} copied={} duplicates={} empty={} ignored={}",
        report.files_examined,
        report.files_copied,
        report.duplicates_skipped,
        report.empty_skipped,
        report.ignored
    );
}
