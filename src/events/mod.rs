//! # Events Module
//!
//! Event-driven progress reporting for any front end.
//!
//! ## Design
//! The core library emits events through channels, allowing any UI
//! (CLI, GUI, web) to subscribe and display progress.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         match event {
//!             Event::Organize(OrganizeEvent::FileCopied { destination, .. }) => {
//!                 println!("-> {}", destination.display())
//!             }
//!             _ => {}
//!         }
//!     }
//! });
//!
//! organizer.run_with_events(&sender)?;
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
