//! # Core Module
//!
//! The bird scrambler engine.
//!
//! ## Modules
//! - `scanner` - Discovers candidate images
//! - `border` - Detects solid-colour borders
//! - `scrambler` - Cuts images into tiles and shuffles them
//! - `difficulty` - Named tile counts
//! - `archive` - Moves processed originals aside
//! - `config` - Run configuration
//! - `workflow` - Orchestrates the daily run

pub mod archive;
pub mod border;
pub mod codec;
pub mod config;
pub mod difficulty;
pub mod scanner;
pub mod scrambler;
pub mod workflow;

// Re-export commonly used types
pub use border::{BorderConfig, BorderReport};
pub use config::ScramblerConfig;
pub use difficulty::DifficultyLevel;
pub use scanner::ImageFile;
pub use workflow::{Workflow, WorkflowResult};
