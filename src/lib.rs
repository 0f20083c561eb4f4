//! # Bird Scrambler
//!
//! Picks a daily batch of bird photos, rejects the ones framed by a solid
//! border and cuts the rest into scrambled tile puzzles at several
//! difficulty levels.
//!
//! ## Architecture
//! The library is split into a core engine and presentation layers:
//! - `core` - Border detection, tile scrambling and the daily workflow
//! - `events` - Event-driven progress reporting
//! - `error` - Error types
//! - `cli` - Command-line interface (binary only)

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{Result, ScramblerError};

/// Initialize tracing for the library
///
/// This should be called by the application entry point. Fails if a global
/// subscriber is already installed.
pub fn init_tracing() -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| ScramblerError::Config(format!("Failed to install tracing subscriber: {}", e)))
}
