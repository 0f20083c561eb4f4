//! # Archive Module
//!
//! Moves processed originals into a flat archive folder and removes
//! rejected candidates.
//!
//! Only the file name is kept; two sources with the same name in different
//! subfolders collide in the archive, and `CollisionPolicy` decides what
//! happens then. The scrambled outputs reuse the archive name, so names are
//! planned for the whole batch before anything is written.

use crate::error::ArchiveError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};

/// What to do when the archive already holds a file with the same name
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Replace the archived original and earlier puzzles
    Overwrite,
    /// Abort with `ArchiveError::Collision`
    Fail,
    /// Archive under `name_1.ext`, `name_2.ext`, ...
    #[default]
    Rename,
}

/// Moves originals into a flat archive directory
#[derive(Debug, Clone)]
pub struct Archiver {
    dir: PathBuf,
    policy: CollisionPolicy,
}

impl Archiver {
    pub fn new(dir: impl Into<PathBuf>, policy: CollisionPolicy) -> Self {
        Self {
            dir: dir.into(),
            policy,
        }
    }

    /// Create the archive directory if it does not exist
    pub fn ensure_dir(&self) -> Result<(), ArchiveError> {
        fs::create_dir_all(&self.dir).map_err(|e| ArchiveError::CreateDir {
            path: self.dir.clone(),
            source: e,
        })
    }

    /// Pick the file name each source keeps in the archive, in order.
    ///
    /// A name is taken when it already exists in the archive or in any of
    /// `mirror_dirs`, or was handed to an earlier source of the same batch.
    /// Existing files are resolved by the collision policy. Two sources of
    /// one batch never share a name: `Fail` rejects the batch, the other
    /// policies number the later one.
    pub fn plan_names(
        &self,
        sources: &[&Path],
        mirror_dirs: &[PathBuf],
    ) -> Result<Vec<OsString>, ArchiveError> {
        let mut claimed: HashSet<OsString> = HashSet::new();
        let mut names = Vec::with_capacity(sources.len());

        for source in sources {
            let file_name = source.file_name().ok_or_else(|| ArchiveError::Move {
                from: source.to_path_buf(),
                to: self.dir.clone(),
                source: io::Error::new(io::ErrorKind::InvalidInput, "source has no file name"),
            })?;

            let name = if claimed.contains(file_name) {
                if self.policy == CollisionPolicy::Fail {
                    return Err(ArchiveError::Collision {
                        path: self.dir.join(file_name),
                    });
                }
                self.free_name(file_name, &claimed, mirror_dirs)
            } else {
                match self.existing(file_name, mirror_dirs) {
                    None => file_name.to_os_string(),
                    Some(path) => match self.policy {
                        CollisionPolicy::Overwrite => file_name.to_os_string(),
                        CollisionPolicy::Fail => return Err(ArchiveError::Collision { path }),
                        CollisionPolicy::Rename => {
                            self.free_name(file_name, &claimed, mirror_dirs)
                        }
                    },
                }
            };

            if name.as_os_str() != file_name {
                tracing::debug!(
                    source = %source.display(),
                    name = %name.to_string_lossy(),
                    "renamed to avoid a collision"
                );
            }
            claimed.insert(name.clone());
            names.push(name);
        }

        Ok(names)
    }

    /// Move `source` to `<archive>/<name>`, replacing any file there.
    pub fn move_into(&self, source: &Path, name: &OsStr) -> Result<PathBuf, ArchiveError> {
        let destination = self.dir.join(name);

        move_file(source, &destination).map_err(|e| ArchiveError::Move {
            from: source.to_path_buf(),
            to: destination.clone(),
            source: e,
        })?;

        tracing::debug!(from = %source.display(), to = %destination.display(), "archived");
        Ok(destination)
    }

    /// First of the archive and `mirror_dirs` that already holds `name`
    fn existing(&self, name: &OsStr, mirror_dirs: &[PathBuf]) -> Option<PathBuf> {
        std::iter::once(&self.dir)
            .chain(mirror_dirs)
            .map(|dir| dir.join(name))
            .find(|path| path.exists())
    }

    /// First `stem_N.ext`, counting from 1, that is neither claimed nor on disk
    fn free_name(
        &self,
        name: &OsStr,
        claimed: &HashSet<OsString>,
        mirror_dirs: &[PathBuf],
    ) -> OsString {
        let path = Path::new(name);
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("file");
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let mut counter = 1;
        loop {
            let candidate = OsString::from(if ext.is_empty() {
                format!("{}_{}", stem, counter)
            } else {
                format!("{}_{}.{}", stem, counter, ext)
            });
            if !claimed.contains(&candidate) && self.existing(&candidate, mirror_dirs).is_none() {
                return candidate;
            }
            counter += 1;
        }
    }
}

/// Delete a rejected candidate from the source folder
pub fn discard(path: &Path) -> Result<(), ArchiveError> {
    fs::remove_file(path).map_err(|e| ArchiveError::Remove {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Move a file, falling back to copy + delete across filesystems.
///
/// The source is only removed once the copy's size matches.
pub fn move_file(source: &Path, destination: &Path) -> io::Result<()> {
    if !source.is_file() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("{}: source file not found", source.display()),
        ));
    }

    fs::rename(source, destination).or_else(|_| {
        let source_size = fs::metadata(source)?.len();
        fs::copy(source, destination)?;

        let dest_size = fs::metadata(destination)?.len();
        if dest_size != source_size {
            let _ = fs::remove_file(destination);
            return Err(io::Error::other(format!(
                "Copy verification failed: source {} bytes, dest {} bytes",
                source_size, dest_size
            )));
        }

        fs::remove_file(source)
    })
}
