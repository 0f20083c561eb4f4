//! File filtering logic for the scanner.

use super::ImageFormat;
use std::collections::HashSet;
use std::path::Path;

/// Extensions accepted as candidate images
pub const DEFAULT_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Filters files to determine if they are candidate images
pub struct ImageFilter {
    /// Lowercase file extensions to include
    extensions: HashSet<String>,
    /// Whether to include hidden files
    include_hidden: bool,
}

impl ImageFilter {
    /// Create a filter for `.jpg`, `.jpeg` and `.png`, hidden files included
    pub fn new() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            include_hidden: true,
        }
    }

    /// Include hidden files (starting with .)
    pub fn with_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// Check if a file should be included
    pub fn should_include(&self, path: &Path) -> bool {
        if !self.include_hidden && is_hidden(path) {
            return false;
        }

        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => self.extensions.contains(&ext.to_lowercase()),
            None => false,
        }
    }

    /// Get the image format for a path
    pub fn get_format(&self, path: &Path) -> ImageFormat {
        path.extension()
            .and_then(|e| e.to_str())
            .map(ImageFormat::from_extension)
            .unwrap_or(ImageFormat::Unknown)
    }
}

impl Default for ImageFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// True when the last path component starts with a dot
pub(crate) fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_includes_jpeg_any_case() {
        let filter = ImageFilter::new();
        assert!(filter.should_include(Path::new("/birds/robin.jpg")));
        assert!(filter.should_include(Path::new("/birds/robin.JPEG")));
        assert!(filter.should_include(Path::new("/birds/robin.Png")));
    }

    #[test]
    fn filter_excludes_other_formats() {
        let filter = ImageFilter::new();
        assert!(!filter.should_include(Path::new("/birds/robin.gif")));
        assert!(!filter.should_include(Path::new("/birds/notes.txt")));
        assert!(!filter.should_include(Path::new("/birds/robin.jpg.bak")));
    }

    #[test]
    fn filter_includes_hidden_by_default() {
        let filter = ImageFilter::new();
        assert!(filter.should_include(Path::new("/birds/.robin.jpg")));
    }

    #[test]
    fn filter_can_exclude_hidden() {
        let filter = ImageFilter::new().with_hidden(false);
        assert!(!filter.should_include(Path::new("/birds/.robin.jpg")));
        assert!(filter.should_include(Path::new("/birds/robin.jpg")));
    }

    #[test]
    fn filter_handles_no_extension() {
        let filter = ImageFilter::new();
        assert!(!filter.should_include(Path::new("/birds/no_extension")));
    }
}
