//! Run configuration.
//!
//! Every option has a default, so a JSON config file only needs the fields
//! it changes:
//!
//! ```json
//! {
//!   "source_dir": "/birdmash/images",
//!   "archive_dir": "/birdmash/used_images",
//!   "batch_size": 10,
//!   "border": { "width": 6, "tolerance": 10.0 }
//! }
//! ```

use crate::core::archive::CollisionPolicy;
use crate::core::border::BorderConfig;
use crate::core::difficulty::DifficultyLevel;
use crate::error::{Result, ScramblerError};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Images scrambled per run
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Name of the per-user config file
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Options for one daily run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScramblerConfig {
    /// Folder tree searched for candidate images
    pub source_dir: PathBuf,
    /// Flat folder receiving processed originals
    pub archive_dir: PathBuf,
    /// Parent of the per-run, date-stamped output folder
    pub output_root: PathBuf,
    /// Images to scramble per run
    pub batch_size: usize,
    /// Difficulty tags and their tile counts, in processing order
    pub difficulty_levels: Vec<DifficultyLevel>,
    /// Border rejection parameters
    pub border: BorderConfig,
    /// Date naming the run folder (today when unset)
    pub run_date: Option<NaiveDate>,
    /// Handling of archive name clashes
    pub on_collision: CollisionPolicy,
    /// Delete bordered candidates only once the batch is known to be full
    pub defer_deletion: bool,
    /// Consider hidden files and folders as candidates
    pub include_hidden: bool,
}

impl Default for ScramblerConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("images"),
            archive_dir: PathBuf::from("used_images"),
            output_root: PathBuf::from("output"),
            batch_size: DEFAULT_BATCH_SIZE,
            difficulty_levels: DifficultyLevel::defaults(),
            border: BorderConfig::default(),
            run_date: None,
            on_collision: CollisionPolicy::default(),
            defer_deletion: false,
            include_hidden: true,
        }
    }
}

impl ScramblerConfig {
    /// Read a JSON config file; missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            ScramblerError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&text).map_err(|e| {
            ScramblerError::Config(format!("Invalid config file {}: {}", path.display(), e))
        })
    }

    /// `<config_dir>/bird-scrambler/config.json`, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("bird-scrambler").join(CONFIG_FILE_NAME))
    }

    /// Load the per-user config file when it exists, defaults otherwise.
    pub fn load_or_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Reject configurations the workflow cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(ScramblerError::Config(
                "batch_size must be at least 1".to_string(),
            ));
        }

        if self.difficulty_levels.is_empty() {
            return Err(ScramblerError::Config(
                "at least one difficulty level is required".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for level in &self.difficulty_levels {
            level.validate().map_err(ScramblerError::Config)?;
            if !seen.insert(level.tag.to_lowercase()) {
                return Err(ScramblerError::Config(format!(
                    "difficulty tag '{}' is listed twice",
                    level.tag
                )));
            }
        }

        if !self.border.tolerance.is_finite() || self.border.tolerance < 0.0 {
            return Err(ScramblerError::Config(format!(
                "border tolerance must be a non-negative number, got {}",
                self.border.tolerance
            )));
        }

        Ok(())
    }

    /// The configured run date, or today's local date
    pub fn resolved_run_date(&self) -> NaiveDate {
        self.run_date.unwrap_or_else(|| Local::now().date_naive())
    }

    /// `<output_root>/<YYYY-MM-DD>`
    pub fn run_output_dir(&self, run_date: NaiveDate) -> PathBuf {
        self.output_root.join(run_date.format("%Y-%m-%d").to_string())
    }
}
