//! Daily run execution.

use crate::core::archive::{discard, Archiver, CollisionPolicy};
use crate::core::border::{BorderConfig, BorderDetector};
use crate::core::codec::{open_rgb, save_rgb};
use crate::core::config::ScramblerConfig;
use crate::core::difficulty::DifficultyLevel;
use crate::core::scanner::{ImageFile, ImageScanner, ScanConfig, WalkDirScanner};
use crate::core::scrambler::Scrambler;
use crate::error::{ProcessError, ScramblerError, WorkflowError};
use crate::events::{
    null_sender, ArchiveEvent, Event, EventSender, FilterEvent, ProcessEvent, ProcessProgress,
    WorkflowEvent, WorkflowPhase, WorkflowSummary,
};
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// One scrambled output file
#[derive(Debug, Clone, Serialize)]
pub struct ScrambledVariant {
    pub difficulty: String,
    pub tile_count: u32,
    pub path: PathBuf,
}

/// An original that was scrambled and archived
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedImage {
    /// Where the original was picked up
    pub source: PathBuf,
    /// Where the original now lives
    pub archived_to: PathBuf,
    /// One output per difficulty level
    pub variants: Vec<ScrambledVariant>,
}

/// Result of a completed run
#[derive(Debug, Serialize)]
pub struct WorkflowResult {
    /// Images scrambled and archived, in processing order
    pub processed: Vec<ProcessedImage>,
    /// Bordered candidates removed from the source folder
    pub rejected: Vec<PathBuf>,
    /// Candidates discovered before filtering
    pub candidates_found: usize,
    /// `<output_root>/<run_date>`
    pub output_dir: PathBuf,
    pub run_date: NaiveDate,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

/// Builder for workflow configuration
pub struct WorkflowBuilder {
    config: ScramblerConfig,
    scanner: Option<Box<dyn ImageScanner>>,
}

impl WorkflowBuilder {
    /// Create a builder with default configuration
    pub fn new() -> Self {
        Self {
            config: ScramblerConfig::default(),
            scanner: None,
        }
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: ScramblerConfig) -> Self {
        self.config = config;
        self
    }

    /// Folder tree to draw candidates from
    pub fn source_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.source_dir = dir.into();
        self
    }

    /// Flat folder receiving processed originals
    pub fn archive_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.archive_dir = dir.into();
        self
    }

    /// Parent of the date-stamped output folder
    pub fn output_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_root = dir.into();
        self
    }

    /// Images to scramble per run
    pub fn batch_size(mut self, size: usize) -> Self {
        self.config.batch_size = size;
        self
    }

    /// Difficulty levels, in processing order
    pub fn difficulty_levels(mut self, levels: Vec<DifficultyLevel>) -> Self {
        self.config.difficulty_levels = levels;
        self
    }

    /// Border rejection parameters
    pub fn border(mut self, border: BorderConfig) -> Self {
        self.config.border = border;
        self
    }

    /// Date naming the run folder
    pub fn run_date(mut self, date: NaiveDate) -> Self {
        self.config.run_date = Some(date);
        self
    }

    /// Archive name clash handling
    pub fn on_collision(mut self, policy: CollisionPolicy) -> Self {
        self.config.on_collision = policy;
        self
    }

    /// Postpone deleting bordered candidates until the batch is full
    pub fn defer_deletion(mut self, defer: bool) -> Self {
        self.config.defer_deletion = defer;
        self
    }

    /// Use a custom scanner instead of walking `source_dir`
    pub fn scanner(mut self, scanner: Box<dyn ImageScanner>) -> Self {
        self.scanner = Some(scanner);
        self
    }

    /// Build the workflow
    pub fn build(self) -> Workflow {
        let scan_config = ScanConfig {
            include_hidden: self.config.include_hidden,
            ..ScanConfig::default()
        };
        Workflow {
            config: self.config,
            scanner: self
                .scanner
                .unwrap_or_else(|| Box::new(WalkDirScanner::new(scan_config))),
        }
    }
}

impl Default for WorkflowBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The select, filter, scramble and archive run
pub struct Workflow {
    config: ScramblerConfig,
    scanner: Box<dyn ImageScanner>,
}

impl Workflow {
    /// Create a new workflow builder
    pub fn builder() -> WorkflowBuilder {
        WorkflowBuilder::new()
    }

    /// Run with the given RNG and no events
    pub fn run_with_rng<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<WorkflowResult, ScramblerError> {
        self.run_with(rng, &null_sender())
    }

    /// Run with a freshly seeded RNG, reporting progress
    pub fn run_with_events(&self, events: &EventSender) -> Result<WorkflowResult, ScramblerError> {
        self.run_with(&mut StdRng::from_os_rng(), events)
    }

    /// Run with the given RNG, reporting progress.
    ///
    /// The RNG drives both the candidate order and every tile permutation,
    /// so a seeded RNG reproduces a run exactly.
    pub fn run_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        events: &EventSender,
    ) -> Result<WorkflowResult, ScramblerError> {
        events.send(Event::Workflow(WorkflowEvent::Started));

        let result = self.execute(rng, events);
        if let Err(ref e) = result {
            tracing::error!("run aborted: {}", e);
            events.send(Event::Workflow(WorkflowEvent::Error {
                message: e.to_string(),
            }));
        }
        result
    }

    fn execute<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        events: &EventSender,
    ) -> Result<WorkflowResult, ScramblerError> {
        let start_time = Instant::now();
        self.config.validate()?;

        let required = self.config.batch_size;
        let run_date = self.config.resolved_run_date();
        let output_dir = self.config.run_output_dir(run_date);

        // Phase 1: Discovery
        events.send(Event::Workflow(WorkflowEvent::PhaseChanged {
            phase: WorkflowPhase::Discovering,
        }));

        let scan_result = self
            .scanner
            .scan_with_events(&self.config.source_dir, events)?;
        for error in &scan_result.errors {
            tracing::warn!("skipped during discovery: {}", error);
        }

        let mut candidates = scan_result.images;
        let candidates_found = candidates.len();
        tracing::info!(
            source = %self.config.source_dir.display(),
            found = candidates_found,
            "discovered candidate images"
        );

        if candidates_found < required {
            return Err(WorkflowError::InsufficientCandidates {
                found: candidates_found,
                required,
            }
            .into());
        }

        // Phase 2: Shuffle and border filtering
        events.send(Event::Workflow(WorkflowEvent::PhaseChanged {
            phase: WorkflowPhase::Filtering,
        }));

        // Walk order is filesystem-dependent; sort so a seeded run is reproducible
        candidates.sort_by(|a, b| a.path.cmp(&b.path));
        candidates.shuffle(rng);
        let (selected, rejected) = self.select_batch(&candidates, events)?;

        // Phase 3: Scrambling and archiving
        events.send(Event::Workflow(WorkflowEvent::PhaseChanged {
            phase: WorkflowPhase::Processing,
        }));

        let archiver = Archiver::new(&self.config.archive_dir, self.config.on_collision);
        let level_dirs = self.level_dirs(&output_dir);
        let sources: Vec<&Path> = selected.iter().map(|image| image.path.as_path()).collect();
        let names = archiver.plan_names(&sources, &level_dirs)?;

        archiver.ensure_dir()?;
        prepare_output_dirs(&level_dirs)?;

        let processed = self.process_batch(&selected, &names, &level_dirs, &archiver, rng, events)?;

        let duration_ms = start_time.elapsed().as_millis() as u64;

        tracing::info!(
            "Processed {} images. Scrambled versions saved in {}.",
            processed.len(),
            output_dir.display()
        );

        events.send(Event::Workflow(WorkflowEvent::Completed {
            summary: WorkflowSummary {
                processed: processed.len(),
                rejected: rejected.len(),
                output_root: output_dir.clone(),
                duration_ms,
            },
        }));

        Ok(WorkflowResult {
            processed,
            rejected,
            candidates_found,
            output_dir,
            run_date,
            duration_ms,
        })
    }

    /// Walk the shuffled candidates until the batch is full.
    ///
    /// Bordered candidates are deleted as they are found, or after the batch
    /// is confirmed full when deletion is deferred.
    fn select_batch(
        &self,
        candidates: &[ImageFile],
        events: &EventSender,
    ) -> Result<(Vec<ImageFile>, Vec<PathBuf>), ScramblerError> {
        let required = self.config.batch_size;
        let detector = BorderDetector::new(self.config.border);

        let mut selected = Vec::with_capacity(required);
        let mut rejected = Vec::new();

        for candidate in candidates {
            if selected.len() >= required {
                break;
            }

            let report = detector.check_path(&candidate.path)?;

            if report.has_border {
                tracing::warn!(
                    path = %candidate.path.display(),
                    max_deviation = report.max_deviation,
                    "rejecting bordered image"
                );
                events.send(Event::Filter(FilterEvent::Rejected {
                    path: candidate.path.clone(),
                    max_deviation: report.max_deviation,
                }));

                if !self.config.defer_deletion {
                    discard_rejected(&candidate.path, events)?;
                }
                rejected.push(candidate.path.clone());
                continue;
            }

            selected.push(candidate.clone());
            tracing::debug!(
                path = %candidate.path.display(),
                size = candidate.size,
                format = ?candidate.format,
                "accepted"
            );
            events.send(Event::Filter(FilterEvent::Accepted {
                path: candidate.path.clone(),
                accepted: selected.len(),
                required,
            }));
        }

        if selected.len() < required {
            return Err(WorkflowError::InsufficientBorderless {
                accepted: selected.len(),
                required,
                rejected: rejected.len(),
            }
            .into());
        }

        if self.config.defer_deletion {
            for path in &rejected {
                discard_rejected(path, events)?;
            }
        }

        Ok((selected, rejected))
    }

    /// `<output_dir>/<tag>` for every difficulty level, in level order
    fn level_dirs(&self, output_dir: &Path) -> Vec<PathBuf> {
        self.config
            .difficulty_levels
            .iter()
            .map(|level| output_dir.join(&level.tag))
            .collect()
    }

    /// Scramble every selected image at every level, then archive it.
    ///
    /// `names[i]` is the collision-free name of `selected[i]`, shared by its
    /// puzzles and its archived original.
    fn process_batch<R: Rng + ?Sized>(
        &self,
        selected: &[ImageFile],
        names: &[OsString],
        level_dirs: &[PathBuf],
        archiver: &Archiver,
        rng: &mut R,
        events: &EventSender,
    ) -> Result<Vec<ProcessedImage>, ScramblerError> {
        let levels = &self.config.difficulty_levels;
        let total = selected.len() * levels.len();
        let mut completed = 0usize;
        let mut scrambler = Scrambler::new();
        let mut processed = Vec::with_capacity(selected.len());

        events.send(Event::Process(ProcessEvent::Started {
            total_images: selected.len(),
            variants_per_image: levels.len(),
        }));

        for (image_file, name) in selected.iter().zip(names) {
            let original = open_rgb(&image_file.path)?;
            let mut variants = Vec::with_capacity(levels.len());

            for (level, dir) in levels.iter().zip(level_dirs) {
                let output_path = dir.join(name);
                let scrambled = scrambler.scramble(&original, level.tile_count, rng)?;
                save_rgb(&scrambled, &output_path)?;

                completed += 1;
                events.send(Event::Process(ProcessEvent::VariantWritten(ProcessProgress {
                    completed,
                    total,
                    difficulty: level.tag.clone(),
                    output_path: output_path.clone(),
                })));

                variants.push(ScrambledVariant {
                    difficulty: level.tag.clone(),
                    tile_count: level.tile_count,
                    path: output_path,
                });
            }

            let archived_to = archiver.move_into(&image_file.path, name)?;
            events.send(Event::Archive(ArchiveEvent::Moved {
                from: image_file.path.clone(),
                to: archived_to.clone(),
            }));

            processed.push(ProcessedImage {
                source: image_file.path.clone(),
                archived_to,
                variants,
            });
        }

        Ok(processed)
    }
}

/// Create every level folder under the run's output folder
fn prepare_output_dirs(level_dirs: &[PathBuf]) -> Result<(), ProcessError> {
    for dir in level_dirs {
        fs::create_dir_all(dir).map_err(|e| ProcessError::CreateDir {
            path: dir.clone(),
            source: e,
        })?;
    }
    Ok(())
}

fn discard_rejected(path: &Path, events: &EventSender) -> Result<(), ScramblerError> {
    discard(path)?;
    events.send(Event::Filter(FilterEvent::Deleted {
        path: path.to_path_buf(),
    }));
    Ok(())
}
