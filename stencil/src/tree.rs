//! Read-only file trees that layouts are loaded from.
//!
//! Layout construction only ever reads, lists and stats paths relative to a
//! tree root. [`DirTree`] serves a real directory, [`MemoryTree`] keeps the
//! whole tree in memory, which is convenient for tests and for embedding
//! templates in a binary.

use std::collections::BTreeMap;
use std::io;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// What a path in a [`FileTree`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Base name of the entry.
    pub name: String,
    /// Whether the entry is a file or a directory.
    pub kind: EntryKind,
}

impl DirEntry {
    /// Create a new directory entry.
    pub fn new(name: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Whether this entry is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Hidden entries start with a dot and are never loaded.
    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }
}

/// A read-only hierarchical file tree.
///
/// All paths are relative to the tree root. Implementations report absent
/// paths with [`io::ErrorKind::NotFound`]; any other error kind means the
/// path may exist but could not be inspected.
pub trait FileTree: Send + Sync + std::fmt::Debug {
    /// Stat a path.
    fn metadata(&self, path: &Path) -> io::Result<EntryKind>;

    /// List a directory, sorted by entry name.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>>;

    /// Read a file's full contents.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// A [`FileTree`] backed by a directory on disk.
#[derive(Debug, Clone)]
pub struct DirTree {
    root: PathBuf,
}

impl DirTree {
    /// Serve the tree rooted at `root`.
    ///
    /// The root is not checked here; a missing root surfaces as missing
    /// paths when the tree is used.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory this tree serves.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FileTree for DirTree {
    fn metadata(&self, path: &Path) -> io::Result<EntryKind> {
        let metadata = std::fs::metadata(self.root.join(path))?;
        Ok(if metadata.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        })
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let dir = self.root.join(path);
        if !std::fs::metadata(&dir)?.is_dir() {
            return Err(io::Error::other(format!(
                "'{}' is not a directory",
                path.display()
            )));
        }

        WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .map(|entry| {
                let entry = entry.map_err(io::Error::from)?;
                let kind = if entry.file_type().is_dir() {
                    EntryKind::Directory
                } else {
                    EntryKind::File
                };
                Ok(DirEntry::new(entry.file_name().to_string_lossy(), kind))
            })
            .collect()
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(self.root.join(path))
    }
}

#[derive(Debug, Clone)]
enum MemoryEntry {
    File(Vec<u8>),
    Directory,
}

static ROOT: MemoryEntry = MemoryEntry::Directory;

/// A [`FileTree`] held entirely in memory.
///
/// Parent directories of inserted paths are created implicitly.
///
/// ```rust
/// use stencil::{EntryKind, FileTree, MemoryTree};
/// use std::path::Path;
///
/// let tree = MemoryTree::new()
///     .file("layouts/_defaults/_index.html.tmpl", "Hello\n")
///     .dir("layouts/blog");
///
/// assert_eq!(tree.metadata(Path::new("layouts")).unwrap(), EntryKind::Directory);
/// assert_eq!(tree.read_dir(Path::new("layouts")).unwrap().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryTree {
    entries: BTreeMap<String, MemoryEntry>,
}

impl MemoryTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, returning the tree for chaining.
    pub fn file(mut self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) -> Self {
        self.insert_file(path, contents);
        self
    }

    /// Add a directory, returning the tree for chaining.
    pub fn dir(mut self, path: impl AsRef<Path>) -> Self {
        self.insert_dir(path);
        self
    }

    /// Add or replace a file.
    pub fn insert_file(&mut self, path: impl AsRef<Path>, contents: impl Into<Vec<u8>>) {
        let key = normalize(path.as_ref());
        self.insert_parents(&key);
        self.entries.insert(key, MemoryEntry::File(contents.into()));
    }

    /// Add a directory.
    pub fn insert_dir(&mut self, path: impl AsRef<Path>) {
        let key = normalize(path.as_ref());
        self.insert_parents(&key);
        if !key.is_empty() {
            self.entries.entry(key).or_insert(MemoryEntry::Directory);
        }
    }

    fn insert_parents(&mut self, key: &str) {
        let mut end = 0;
        while let Some(offset) = key[end..].find('/') {
            end += offset;
            self.entries
                .entry(key[..end].to_string())
                .or_insert(MemoryEntry::Directory);
            end += 1;
        }
    }

    fn lookup(&self, key: &str) -> io::Result<&MemoryEntry> {
        if key.is_empty() {
            return Ok(&ROOT);
        }
        self.entries.get(key).ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("'{}' not found", key))
        })
    }
}

impl FileTree for MemoryTree {
    fn metadata(&self, path: &Path) -> io::Result<EntryKind> {
        Ok(match self.lookup(&normalize(path))? {
            MemoryEntry::File(_) => EntryKind::File,
            MemoryEntry::Directory => EntryKind::Directory,
        })
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let key = normalize(path);
        if let MemoryEntry::File(_) = self.lookup(&key)? {
            return Err(io::Error::other(format!("'{}' is not a directory", key)));
        }

        let prefix = if key.is_empty() {
            String::new()
        } else {
            format!("{}/", key)
        };

        Ok(self
            .entries
            .range(prefix.clone()..)
            .take_while(|(name, _)| name.starts_with(&prefix))
            .filter_map(|(name, entry)| {
                let child = &name[prefix.len()..];
                if child.contains('/') {
                    return None;
                }
                let kind = match entry {
                    MemoryEntry::File(_) => EntryKind::File,
                    MemoryEntry::Directory => EntryKind::Directory,
                };
                Some(DirEntry::new(child, kind))
            })
            .collect())
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        let key = normalize(path);
        match self.lookup(&key)? {
            MemoryEntry::File(contents) => Ok(contents.clone()),
            MemoryEntry::Directory => Err(io::Error::other(format!("'{}' is a directory", key))),
        }
    }
}

/// `a/./b/` and `a/b` name the same entry.
fn normalize(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
