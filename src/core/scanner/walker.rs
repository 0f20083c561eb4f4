//! Directory walking implementation using walkdir.

use super::filter::{is_hidden, ImageFilter};
use super::{ImageFile, ImageScanner, ScanResult};
use crate::error::ScanError;
use crate::events::{null_sender, Event, EventSender, ScanEvent, ScanProgress};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Configuration for the directory scanner
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Whether to follow symbolic links
    pub follow_symlinks: bool,
    /// Whether to include hidden files and directories
    pub include_hidden: bool,
    /// Maximum directory depth (None = unlimited)
    pub max_depth: Option<usize>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            include_hidden: true,
            max_depth: None,
        }
    }
}

/// Scanner implementation using the walkdir crate
pub struct WalkDirScanner {
    config: ScanConfig,
    filter: ImageFilter,
}

impl WalkDirScanner {
    /// Create a new scanner with the given configuration
    pub fn new(config: ScanConfig) -> Self {
        let filter = ImageFilter::new().with_hidden(config.include_hidden);
        Self { config, filter }
    }
}

impl ImageScanner for WalkDirScanner {
    fn scan(&self, root: &Path) -> Result<ScanResult, ScanError> {
        self.scan_with_events(root, &null_sender())
    }

    fn scan_with_events(
        &self,
        root: &Path,
        events: &EventSender,
    ) -> Result<ScanResult, ScanError> {
        if !root.is_dir() {
            return Err(ScanError::DirectoryNotFound {
                path: root.to_path_buf(),
            });
        }

        events.send(Event::Scan(ScanEvent::Started {
            root: root.to_path_buf(),
        }));

        let mut images = Vec::new();
        let mut errors = Vec::new();
        let mut directories_scanned = 0;

        let mut walker = WalkDir::new(root).follow_links(self.config.follow_symlinks);
        if let Some(depth) = self.config.max_depth {
            walker = walker.max_depth(depth);
        }

        let include_hidden = self.config.include_hidden;
        let entries = walker
            .into_iter()
            .filter_entry(|entry| include_hidden || entry.depth() == 0 || !is_hidden(entry.path()));

        for entry_result in entries {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().map(Path::to_path_buf).unwrap_or_default();
                    let error = if e.io_error().map(|io| io.kind())
                        == Some(std::io::ErrorKind::PermissionDenied)
                    {
                        ScanError::PermissionDenied { path }
                    } else {
                        ScanError::ReadDirectory {
                            path,
                            source: std::io::Error::other(e.to_string()),
                        }
                    };
                    tracing::warn!("{}", error);
                    errors.push(error);
                    continue;
                }
            };

            let path = entry.path();

            if entry.file_type().is_dir() {
                directories_scanned += 1;
                events.send(Event::Scan(ScanEvent::Progress(ScanProgress {
                    directories_scanned,
                    images_found: images.len(),
                    current_path: path.to_path_buf(),
                })));
                continue;
            }

            if !self.filter.should_include(path) {
                continue;
            }

            match fs::metadata(path) {
                Ok(metadata) => {
                    let image = ImageFile {
                        path: path.to_path_buf(),
                        size: metadata.len(),
                        format: self.filter.get_format(path),
                    };

                    events.send(Event::Scan(ScanEvent::ImageFound {
                        path: image.path.clone(),
                    }));

                    images.push(image);
                }
                Err(e) => {
                    let error = ScanError::ReadDirectory {
                        path: path.to_path_buf(),
                        source: e,
                    };
                    tracing::warn!("{}", error);
                    errors.push(error);
                }
            }
        }

        tracing::debug!(
            root = %root.display(),
            directories = directories_scanned,
            images = images.len(),
            "scan finished"
        );

        events.send(Event::Scan(ScanEvent::Completed {
            total_images: images.len(),
        }));

        Ok(ScanResult { images, errors })
    }
}

#[cfg(test)]
mod tests {
    use super::super::ImageFormat;
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn create_test_file(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        // Minimal JPEG header; the scanner never decodes
        file.write_all(&[0xFF, 0xD8, 0xFF, 0xE0]).unwrap();
        path
    }

    #[test]
    fn scan_empty_directory_returns_empty_vec() {
        let temp_dir = TempDir::new().unwrap();
        let scanner = WalkDirScanner::new(ScanConfig::default());

        let result = scanner.scan(temp_dir.path()).unwrap();

        assert!(result.images.is_empty());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn scan_detects_supported_formats_only() {
        let temp_dir = TempDir::new().unwrap();
        create_test_file(temp_dir.path(), "robin.jpg");
        create_test_file(temp_dir.path(), "wren.JPEG");
        create_test_file(temp_dir.path(), "jay.png");
        create_test_file(temp_dir.path(), "notes.txt");
        create_test_file(temp_dir.path(), "owl.gif");

        let scanner = WalkDirScanner::new(ScanConfig::default());
        let result = scanner.scan(temp_dir.path()).unwrap();

        assert_eq!(result.images.len(), 3);
        let formats: Vec<_> = result.images.iter().map(|i| i.format).collect();
        assert_eq!(formats.iter().filter(|f| **f == ImageFormat::Jpeg).count(), 2);
        assert!(formats.contains(&ImageFormat::Png));
    }

    #[test]
    fn scan_traverses_nested_directories() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("garden").join("feeder");
        fs::create_dir_all(&nested).unwrap();

        create_test_file(temp_dir.path(), "root.jpg");
        create_test_file(&nested, "nested.png");

        let scanner = WalkDirScanner::new(ScanConfig::default());
        let result = scanner.scan(temp_dir.path()).unwrap();

        assert_eq!(result.images.len(), 2);
        assert!(result.images.iter().any(|i| i.path.ends_with("feeder/nested.png")));
    }

    #[test]
    fn scan_skips_hidden_directories_when_configured() {
        let temp_dir = TempDir::new().unwrap();
        let hidden = temp_dir.path().join(".thumbnails");
        fs::create_dir(&hidden).unwrap();
        create_test_file(&hidden, "thumb.jpg");
        create_test_file(temp_dir.path(), "visible.jpg");

        let all = WalkDirScanner::new(ScanConfig::default())
            .scan(temp_dir.path())
            .unwrap();
        assert_eq!(all.images.len(), 2);

        let config = ScanConfig {
            include_hidden: false,
            ..Default::default()
        };
        let visible = WalkDirScanner::new(config).scan(temp_dir.path()).unwrap();
        assert_eq!(visible.images.len(), 1);
        assert!(visible.images[0].path.ends_with("visible.jpg"));
    }

    #[test]
    fn scan_nonexistent_directory_returns_error() {
        let scanner = WalkDirScanner::new(ScanConfig::default());
        let result = scanner.scan(Path::new("/nonexistent/path/12345"));

        assert!(matches!(result, Err(ScanError::DirectoryNotFound { .. })));
    }
}
