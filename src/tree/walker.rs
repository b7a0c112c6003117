//! Filesystem walker for enumerating a bundle directory

use crate::error::ManifestError;
use crate::tree::path;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

/// Basename suffixes that are always skipped: version-control and
/// notebook-checkpoint metadata.
pub const RESERVED_SUFFIXES: &[&str] = &[".git", ".ipynb_checkpoints"];

/// Kind of filesystem object behind an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryType {
    File,
    Directory,
}

/// One filesystem object discovered by a walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSystemEntry {
    pub entry_type: EntryType,
    /// Root-relative id, `/`-separated
    pub relative_path: String,
    /// Root-relative parent directory, `"."` for top-level entries
    pub parent_directory: String,
}

impl FileSystemEntry {
    pub fn file(relative_path: impl Into<String>) -> Self {
        Self::new(EntryType::File, relative_path)
    }

    pub fn directory(relative_path: impl Into<String>) -> Self {
        Self::new(EntryType::Directory, relative_path)
    }

    fn new(entry_type: EntryType, relative_path: impl Into<String>) -> Self {
        let relative_path = relative_path.into();
        let parent_directory = path::parent_of(&relative_path).to_string();
        Self {
            entry_type,
            relative_path,
            parent_directory,
        }
    }

    pub fn is_file(&self) -> bool {
        self.entry_type == EntryType::File
    }
}

/// Name-based exclusion rules.
///
/// Matching is flat: a basename is compared regardless of entry type or depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionPolicy {
    /// Exact basenames to skip
    pub omit_names: Vec<String>,
    /// Basename suffixes to skip
    pub reserved_suffixes: Vec<String>,
}

impl Default for ExclusionPolicy {
    fn default() -> Self {
        Self {
            omit_names: Vec::new(),
            reserved_suffixes: RESERVED_SUFFIXES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ExclusionPolicy {
    pub fn with_omit_names<I, S>(omit_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            omit_names: omit_names.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Whether an entry with this basename is skipped (and, for a directory, not descended).
    pub fn excludes(&self, name: &str) -> bool {
        self.omit_names.iter().any(|omit| omit == name)
            || self
                .reserved_suffixes
                .iter()
                .any(|suffix| name.ends_with(suffix.as_str()))
    }
}

/// Filesystem walker configuration
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Whether to follow symbolic links (default: false)
    pub follow_symlinks: bool,
    pub exclusions: ExclusionPolicy,
}

/// Anything that can produce the full entry list of a bundle.
///
/// The manifest builder consumes this so tests can substitute an in-memory tree.
pub trait EntrySource {
    fn collect_entries(&self) -> Result<Vec<FileSystemEntry>, ManifestError>;
}

/// Filesystem walker
pub struct Walker {
    root: PathBuf,
    config: WalkerConfig,
}

/// Lazy pre-order sequence of entries produced by [`Walker::entries`]
pub struct WalkEntries {
    root: PathBuf,
    inner: Box<dyn Iterator<Item = walkdir::Result<DirEntry>>>,
}

impl Walker {
    /// Create a new walker for the given root path
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            config: WalkerConfig::default(),
        }
    }

    /// Create a walker with custom configuration
    pub fn with_config(root: PathBuf, config: WalkerConfig) -> Self {
        Self { root, config }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Start a fresh depth-first, pre-order walk.
    ///
    /// Siblings are visited in file-name order. Excluded directories are pruned
    /// before their contents are read.
    pub fn entries(&self) -> Result<WalkEntries, ManifestError> {
        let metadata =
            std::fs::metadata(&self.root).map_err(|e| ManifestError::io(&self.root, e))?;
        if !metadata.is_dir() {
            return Err(ManifestError::io(
                &self.root,
                std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "walk root is not a directory",
                ),
            ));
        }

        let exclusions = self.config.exclusions.clone();
        let inner = WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name()
            .min_depth(1)
            .into_iter()
            .filter_entry(move |entry| {
                let name = entry.file_name().to_string_lossy();
                let keep = !exclusions.excludes(&name);
                if !keep {
                    trace!(path = %entry.path().display(), "Excluded entry");
                }
                keep
            });

        Ok(WalkEntries {
            root: self.root.clone(),
            inner: Box::new(inner),
        })
    }

    /// Walk the filesystem and collect all entries
    pub fn walk(&self) -> Result<Vec<FileSystemEntry>, ManifestError> {
        let entries = self.entries()?.collect::<Result<Vec<_>, _>>()?;
        debug!(root = %self.root.display(), entry_count = entries.len(), "Walked filesystem");
        Ok(entries)
    }
}

impl EntrySource for Walker {
    fn collect_entries(&self) -> Result<Vec<FileSystemEntry>, ManifestError> {
        self.walk()
    }
}

impl Iterator for WalkEntries {
    type Item = Result<FileSystemEntry, ManifestError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e
                        .path()
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| self.root.clone());
                    let source = e.into_io_error().unwrap_or_else(|| {
                        std::io::Error::new(std::io::ErrorKind::Other, "filesystem loop detected")
                    });
                    return Some(Err(ManifestError::io(path, source)));
                }
            };

            let file_type = entry.file_type();
            let entry_type = if file_type.is_dir() {
                EntryType::Directory
            } else if file_type.is_file() {
                EntryType::File
            } else if file_type.is_symlink() {
                // Unfollowed link: classify by target, never descend
                match std::fs::metadata(entry.path()) {
                    Ok(target) if target.is_dir() => EntryType::Directory,
                    Ok(target) if target.is_file() => EntryType::File,
                    Ok(_) => continue,
                    Err(e) => return Some(Err(ManifestError::io(entry.path(), e))),
                }
            } else {
                continue;
            };

            let relative_path = match path::relative_id(&self.root, entry.path()) {
                Ok(id) => id,
                Err(e) => return Some(Err(e)),
            };
            let parent_directory = path::parent_of(&relative_path).to_string();
            return Some(Ok(FileSystemEntry {
                entry_type,
                relative_path,
                parent_directory,
            }));
        }
    }
}
