//! Event type definitions for progress reporting.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by the daily workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Discovery phase events
    Scan(ScanEvent),
    /// Border filtering events
    Filter(FilterEvent),
    /// Scrambling events
    Process(ProcessEvent),
    /// Archive move events
    Archive(ArchiveEvent),
    /// Workflow-level events
    Workflow(WorkflowEvent),
}

/// Events during discovery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    /// Discovery has started
    Started { root: PathBuf },
    /// Progress update during discovery
    Progress(ScanProgress),
    /// A candidate image was found
    ImageFound { path: PathBuf },
    /// Discovery completed
    Completed { total_images: usize },
}

/// Progress information during discovery
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanProgress {
    /// Number of directories scanned so far
    pub directories_scanned: usize,
    /// Number of images found so far
    pub images_found: usize,
    /// Current directory being scanned
    pub current_path: PathBuf,
}

/// Events during border filtering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FilterEvent {
    /// A candidate passed the border check and joined the batch
    Accepted {
        path: PathBuf,
        accepted: usize,
        required: usize,
    },
    /// A candidate has a solid border
    Rejected { path: PathBuf, max_deviation: f64 },
    /// A rejected candidate was removed from the source folder
    Deleted { path: PathBuf },
}

/// Events during scrambling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ProcessEvent {
    /// Scrambling has started
    Started { total_images: usize, variants_per_image: usize },
    /// A scrambled variant was written
    VariantWritten(ProcessProgress),
}

/// Progress information during scrambling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessProgress {
    /// Variants written so far
    pub completed: usize,
    /// Total variants for this run
    pub total: usize,
    /// Difficulty tag of the variant just written
    pub difficulty: String,
    /// Output path of the variant just written
    pub output_path: PathBuf,
}

/// Events during archiving
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ArchiveEvent {
    /// An original was moved into the archive
    Moved { from: PathBuf, to: PathBuf },
}

/// Workflow-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum WorkflowEvent {
    /// Run has started
    Started,
    /// Moving to a new phase
    PhaseChanged { phase: WorkflowPhase },
    /// Run completed successfully
    Completed { summary: WorkflowSummary },
    /// Run aborted with a fatal error
    Error { message: String },
}

/// Phases of the workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkflowPhase {
    Discovering,
    Filtering,
    Processing,
}

/// Summary of a completed run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowSummary {
    /// Images scrambled and archived
    pub processed: usize,
    /// Bordered images rejected
    pub rejected: usize,
    /// Per-run output directory
    pub output_root: PathBuf,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl std::fmt::Display for WorkflowPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkflowPhase::Discovering => write!(f, "Discovering"),
            WorkflowPhase::Filtering => write!(f, "Filtering"),
            WorkflowPhase::Processing => write!(f, "Scrambling"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_serializable() {
        let event = Event::Process(ProcessEvent::VariantWritten(ProcessProgress {
            completed: 3,
            total: 30,
            difficulty: "birder".to_string(),
            output_path: PathBuf::from("/output/2024-05-01/birder/robin.png"),
        }));

        let json = serde_json::to_string(&event).unwrap();
        let deserialized: Event = serde_json::from_str(&json).unwrap();

        match deserialized {
            Event::Process(ProcessEvent::VariantWritten(p)) => {
                assert_eq!(p.completed, 3);
                assert_eq!(p.difficulty, "birder");
            }
            _ => panic!("Wrong event type"),
        }
    }

    #[test]
    fn phase_display_is_human_readable() {
        assert_eq!(WorkflowPhase::Processing.to_string(), "Scrambling");
        assert_eq!(WorkflowPhase::Filtering.to_string(), "Filtering");
    }
}
