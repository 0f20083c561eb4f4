//! # Events Module
//!
//! Progress reporting for the daily workflow.
//!
//! ## Design
//! The workflow emits events through a channel so any front end can
//! subscribe and render progress without touching workflow state.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::Process(ProcessEvent::VariantWritten(p)) = event {
//!             println!("{}/{} variants", p.completed, p.total);
//!         }
//!     }
//! });
//!
//! workflow.run_with_events(&sender)?;
//! ```

mod channel;
mod types;

pub use channel::{EventChannel, EventReceiver, EventSender, null_sender};
pub use types::*;
