//! Difficulty levels: named tile counts.

use crate::error::ScramblerError;
use serde::{Deserialize, Serialize};

/// A named tile count; the tag doubles as the output subdirectory name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyLevel {
    pub tag: String,
    pub tile_count: u32,
}

impl DifficultyLevel {
    pub fn new(tag: impl Into<String>, tile_count: u32) -> Self {
        Self {
            tag: tag.into(),
            tile_count,
        }
    }

    /// The standard three levels: ametaur (9), birder (36), bostik (144)
    pub fn defaults() -> Vec<DifficultyLevel> {
        vec![
            DifficultyLevel::new("ametaur", 9),
            DifficultyLevel::new("birder", 36),
            DifficultyLevel::new("bostik", 144),
        ]
    }

    /// Check the tag is usable as a single path component and the count is positive
    pub fn validate(&self) -> Result<(), String> {
        if self.tile_count == 0 {
            return Err(format!("difficulty '{}' must have at least one tile", self.tag));
        }
        let tag = self.tag.as_str();
        if tag.is_empty() || tag == "." || tag == ".." || tag.contains(['/', '\\']) {
            return Err(format!("difficulty tag '{}' is not a valid directory name", self.tag));
        }
        Ok(())
    }
}

/// Look up a level by tag, ignoring case
pub fn find_level<'a>(levels: &'a [DifficultyLevel], tag: &str) -> Option<&'a DifficultyLevel> {
    levels.iter().find(|level| level.tag.eq_ignore_ascii_case(tag))
}

/// Tile count for a one-off scramble.
///
/// An explicit count wins, then a tag looked up in `levels`; with neither,
/// the first level is used.
pub fn resolve_tile_count(
    tiles: Option<u32>,
    tag: Option<&str>,
    levels: &[DifficultyLevel],
) -> Result<u32, ScramblerError> {
    match (tiles, tag) {
        (Some(tiles), _) => Ok(tiles),
        (None, Some(tag)) => find_level(levels, tag)
            .map(|level| level.tile_count)
            .ok_or_else(|| ScramblerError::Config(format!("Unknown difficulty '{}'", tag))),
        (None, None) => Ok(levels.first().map(|level| level.tile_count).unwrap_or(1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_daily_puzzle_levels() {
        let levels = DifficultyLevel::defaults();
        let pairs: Vec<_> = levels.iter().map(|l| (l.tag.as_str(), l.tile_count)).collect();
        assert_eq!(pairs, vec![("ametaur", 9), ("birder", 36), ("bostik", 144)]);
    }

    #[test]
    fn zero_tiles_fails_validation() {
        assert!(DifficultyLevel::new("easy", 0).validate().is_err());
        assert!(DifficultyLevel::new("easy", 1).validate().is_ok());
    }

    #[test]
    fn tags_must_be_single_path_components() {
        assert!(DifficultyLevel::new("", 9).validate().is_err());
        assert!(DifficultyLevel::new("..", 9).validate().is_err());
        assert!(DifficultyLevel::new("a/b", 9).validate().is_err());
    }

    #[test]
    fn find_level_ignores_case() {
        let levels = DifficultyLevel::defaults();
        assert_eq!(find_level(&levels, "BIRDER").map(|l| l.tile_count), Some(36));
        assert!(find_level(&levels, "expert").is_none());
    }

    #[test]
    fn explicit_tile_count_wins_over_tag() {
        let levels = DifficultyLevel::defaults();
        assert_eq!(resolve_tile_count(Some(4), Some("bostik"), &levels).unwrap(), 4);
    }

    #[test]
    fn tag_resolves_to_its_level() {
        let levels = DifficultyLevel::defaults();
        assert_eq!(resolve_tile_count(None, Some("Birder"), &levels).unwrap(), 36);
    }

    #[test]
    fn no_choice_falls_back_to_first_level() {
        let levels = DifficultyLevel::defaults();
        assert_eq!(resolve_tile_count(None, None, &levels).unwrap(), 9);
        assert_eq!(resolve_tile_count(None, None, &[]).unwrap(), 1);
    }

    #[test]
    fn unknown_tag_is_config_error() {
        let levels = DifficultyLevel::defaults();
        let error = resolve_tile_count(None, Some("expert"), &levels).unwrap_err();
        assert!(matches!(error, ScramblerError::Config(_)));
        assert!(error.to_string().contains("expert"));
    }
}
