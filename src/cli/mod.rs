//! # CLI Module
//!
//! Command-line interface for the bird scrambler.
//!
//! ## Usage
//! ```bash
//! # Daily run with the per-user config file (or defaults)
//! bird-scrambler run
//!
//! # Explicit folders and a reproducible shuffle
//! bird-scrambler run --source ~/birdmash/images --archive ~/birdmash/used_images --seed 7
//!
//! # Border report for a few files (read-only)
//! bird-scrambler check ~/birdmash/images/*.jpg
//!
//! # Scramble a single image
//! bird-scrambler scramble robin.jpg robin_puzzle.jpg --difficulty bostik
//! ```

use bird_scrambler::core::archive::CollisionPolicy;
use bird_scrambler::core::border::{BorderConfig, BorderDetector, BorderReport};
use bird_scrambler::core::config::ScramblerConfig;
use bird_scrambler::core::difficulty::{resolve_tile_count, DifficultyLevel};
use bird_scrambler::core::scrambler::Scrambler;
use bird_scrambler::core::workflow::{Workflow, WorkflowResult};
use bird_scrambler::error::{Result, ScramblerError};
use bird_scrambler::events::{Event, EventChannel, ProcessEvent, WorkflowEvent};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use std::thread;

/// Bird Scrambler - daily tile puzzles from bird photos
#[derive(Parser, Debug)]
#[command(name = "bird-scrambler")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Select, filter, scramble and archive today's batch
    Run {
        /// JSON config file (defaults to the per-user config if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Folder tree to draw candidate images from
        #[arg(long)]
        source: Option<PathBuf>,

        /// Flat folder receiving processed originals
        #[arg(long)]
        archive: Option<PathBuf>,

        /// Parent folder of the date-stamped output
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Images to scramble
        #[arg(short, long)]
        batch_size: Option<usize>,

        /// Border band thickness in pixels
        #[arg(long)]
        border_width: Option<u32>,

        /// Maximum colour deviation for a solid border
        #[arg(long)]
        tolerance: Option<f64>,

        /// Run date used for the output folder (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,

        /// What to do when the archive already has a file with the same name
        #[arg(long)]
        on_collision: Option<Collision>,

        /// Only delete bordered images once the batch is known to be full
        #[arg(long)]
        defer_deletion: bool,

        /// Output format
        #[arg(long = "output-format", default_value = "pretty")]
        format: OutputFormat,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Report border measurements without touching any file
    Check {
        /// Images to check
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Border band thickness in pixels
        #[arg(long, default_value = "6")]
        border_width: u32,

        /// Maximum colour deviation for a solid border
        #[arg(long, default_value = "10")]
        tolerance: f64,

        /// Output format
        #[arg(long = "output-format", default_value = "pretty")]
        format: OutputFormat,
    },

    /// Scramble a single image
    Scramble {
        /// Image to scramble
        input: PathBuf,

        /// Destination; the extension selects the format
        output: PathBuf,

        /// Number of tiles
        #[arg(short, long, conflicts_with = "difficulty")]
        tiles: Option<u32>,

        /// Difficulty tag (ametaur, birder, bostik)
        #[arg(short, long)]
        difficulty: Option<String>,

        /// Seed for a reproducible shuffle
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Collision {
    /// Replace the archived file
    Overwrite,
    /// Abort the run
    Fail,
    /// Archive as name_1.ext, name_2.ext, ...
    Rename,
}

impl From<Collision> for CollisionPolicy {
    fn from(collision: Collision) -> Self {
        match collision {
            Collision::Overwrite => CollisionPolicy::Overwrite,
            Collision::Fail => CollisionPolicy::Fail,
            Collision::Rename => CollisionPolicy::Rename,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
}

/// Settings for `run` gathered from flags
struct RunOptions {
    config: Option<PathBuf>,
    source: Option<PathBuf>,
    archive: Option<PathBuf>,
    output: Option<PathBuf>,
    batch_size: Option<usize>,
    border_width: Option<u32>,
    tolerance: Option<f64>,
    date: Option<NaiveDate>,
    on_collision: Option<Collision>,
    defer_deletion: bool,
}

impl RunOptions {
    /// Config file (explicit or per-user), then flags on top
    fn resolve(self) -> Result<ScramblerConfig> {
        let mut config = match self.config {
            Some(path) => ScramblerConfig::load(&path)?,
            None => ScramblerConfig::load_or_default()?,
        };

        if let Some(source) = self.source {
            config.source_dir = source;
        }
        if let Some(archive) = self.archive {
            config.archive_dir = archive;
        }
        if let Some(output) = self.output {
            config.output_root = output;
        }
        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size;
        }
        if let Some(width) = self.border_width {
            config.border.width = width;
        }
        if let Some(tolerance) = self.tolerance {
            config.border.tolerance = tolerance;
        }
        if let Some(date) = self.date {
            config.run_date = Some(date);
        }
        if let Some(collision) = self.on_collision {
            config.on_collision = collision.into();
        }
        if self.defer_deletion {
            config.defer_deletion = true;
        }

        Ok(config)
    }
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            source,
            archive,
            output,
            batch_size,
            border_width,
            tolerance,
            date,
            seed,
            on_collision,
            defer_deletion,
            format,
            verbose,
        } => {
            let options = RunOptions {
                config,
                source,
                archive,
                output,
                batch_size,
                border_width,
                tolerance,
                date,
                on_collision,
                defer_deletion,
            };
            run_workflow(options.resolve()?, seed, format, verbose)
        }
        Commands::Check {
            files,
            border_width,
            tolerance,
            format,
        } => run_check(
            &files,
            BorderConfig {
                width: border_width,
                tolerance,
            },
            format,
        ),
        Commands::Scramble {
            input,
            output,
            tiles,
            difficulty,
            seed,
        } => run_scramble(&input, &output, tiles, difficulty.as_deref(), seed),
    }
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

fn run_workflow(
    config: ScramblerConfig,
    seed: Option<u64>,
    format: OutputFormat,
    verbose: bool,
) -> Result<()> {
    let term = Term::stderr();

    if matches!(format, OutputFormat::Pretty) {
        term.write_line(&format!(
            "{} {}",
            style("Bird Scrambler").bold().cyan(),
            style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
        ))
        .ok();
        term.write_line("").ok();
    }

    let workflow = Workflow::builder().config(config).build();

    let (sender, receiver) = EventChannel::new();

    let progress = if matches!(format, OutputFormat::Pretty) {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .map(|s| s.progress_chars("█▓░"))
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Some(pb)
    } else {
        None
    };

    let progress_clone = progress.clone();

    // Render events on a separate thread; the run itself stays on this one
    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            let Some(ref pb) = progress_clone else {
                continue;
            };
            match event {
                Event::Workflow(WorkflowEvent::PhaseChanged { phase }) => {
                    pb.set_message(format!("{}", phase));
                }
                Event::Process(ProcessEvent::Started {
                    total_images,
                    variants_per_image,
                }) => {
                    pb.set_length((total_images * variants_per_image) as u64);
                }
                Event::Process(ProcessEvent::VariantWritten(p)) => {
                    pb.set_position(p.completed as u64);
                    if verbose {
                        pb.set_message(format!(
                            "{} ({})",
                            p.output_path.file_name().unwrap_or_default().to_string_lossy(),
                            p.difficulty
                        ));
                    }
                }
                Event::Workflow(WorkflowEvent::Completed { .. })
                | Event::Workflow(WorkflowEvent::Error { .. }) => {
                    pb.finish_and_clear();
                }
                _ => {}
            }
        }
    });

    let result = match seed {
        Some(seed) => workflow.run_with(&mut StdRng::seed_from_u64(seed), &sender),
        None => workflow.run_with_events(&sender),
    };

    drop(sender);
    event_thread.join().ok();

    let result = result?;

    match format {
        OutputFormat::Pretty => print_pretty_results(&term, &result, verbose),
        OutputFormat::Json => print_json(&result)?,
    }

    Ok(())
}

fn print_pretty_results(term: &Term, result: &WorkflowResult, verbose: bool) {
    term.write_line(&format!("{} Run Complete", style("✓").green().bold()))
        .ok();
    term.write_line("").ok();

    term.write_line(&format!(
        "  {} candidates found, {} bordered images removed",
        style(result.candidates_found).cyan(),
        style(result.rejected.len()).yellow()
    ))
    .ok();

    if verbose {
        for image in &result.processed {
            term.write_line(&format!(
                "    {} {} -> {}",
                style("○").dim(),
                display_path(&image.source),
                display_path(&image.archived_to)
            ))
            .ok();
        }
        for rejected in &result.rejected {
            term.write_line(&format!(
                "    {} {}",
                style("✗").red(),
                display_path(rejected)
            ))
            .ok();
        }
    }

    term.write_line("").ok();

    println!(
        "Processed {} images. Scrambled versions saved in {}.",
        result.processed.len(),
        result.output_dir.display()
    );
}

fn run_check(files: &[PathBuf], border: BorderConfig, format: OutputFormat) -> Result<()> {
    let detector = BorderDetector::new(border);
    let mut reports = Vec::with_capacity(files.len());

    for path in files {
        let report = detector.check_path(path)?;
        reports.push((path, report));
    }

    match format {
        OutputFormat::Pretty => {
            let term = Term::stdout();
            for (path, report) in &reports {
                print_border_report(&term, path, report);
            }
        }
        OutputFormat::Json => {
            let output: Vec<_> = reports
                .iter()
                .map(|(path, report)| serde_json::json!({ "path": path, "report": report }))
                .collect();
            print_json(&output)?;
        }
    }

    Ok(())
}

fn print_border_report(term: &Term, path: &Path, report: &BorderReport) {
    let verdict = if report.has_border {
        style("bordered").red().bold()
    } else {
        style("clean").green().bold()
    };

    term.write_line(&format!(
        "{} {} (max deviation {:.1}, mean [{:.0}, {:.0}, {:.0}])",
        verdict,
        display_path(path),
        report.max_deviation,
        report.mean[0],
        report.mean[1],
        report.mean[2]
    ))
    .ok();
}

fn run_scramble(
    input: &Path,
    output: &Path,
    tiles: Option<u32>,
    difficulty: Option<&str>,
    seed: Option<u64>,
) -> Result<()> {
    let tile_count = resolve_tile_count(tiles, difficulty, &DifficultyLevel::defaults())?;

    let mut rng = make_rng(seed);
    Scrambler::new().scramble_file(input, output, tile_count, &mut rng)?;

    println!(
        "Scrambled {} into {} tiles: {}",
        display_path(input),
        tile_count,
        display_path(output)
    );
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| ScramblerError::Config(format!("Failed to serialize output: {}", e)))?;
    println!("{}", text);
    Ok(())
}

/// Shorten paths under the home directory to `~/...`
fn display_path(path: &Path) -> String {
    match dirs::home_dir().and_then(|home| path.strip_prefix(home).ok().map(Path::to_path_buf)) {
        Some(relative) => format!("~/{}", relative.display()),
        None => path.display().to_string(),
    }
}
