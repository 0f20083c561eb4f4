//! # Workflow Module
//!
//! Orchestrates one daily run.
//!
//! ## Stages
//! 1. **Discover** - Walk the source folder for `.jpg`, `.jpeg` and `.png` files
//! 2. **Filter** - Shuffle, then border-check candidates until the batch is full
//! 3. **Scramble** - Write one scrambled copy per difficulty level
//! 4. **Archive** - Move each original into the flat archive folder
//!
//! Runs are strictly sequential. The first error aborts the run; originals
//! archived before it stay archived and unreached candidates stay put.

mod executor;

pub use executor::{
    ProcessedImage, ScrambledVariant, Workflow, WorkflowBuilder, WorkflowResult,
};
