//! # Border Module
//!
//! Rejects images framed by a solid-colour border.
//!
//! The top, bottom, left and right bands (each `width` pixels deep) are
//! pooled, and the image counts as bordered when no channel of any band
//! pixel strays `tolerance` or more from the pooled mean.

mod detector;

pub use detector::{
    analyze, has_border, BorderConfig, BorderDetector, BorderReport, DEFAULT_BORDER_WIDTH,
    DEFAULT_TOLERANCE,
};
