//! Template tree shape checks.

use crate::error::{Result, StencilError};
use crate::tree::{EntryKind, FileTree};
use crate::{DEFAULT_LAYOUT, LAYOUTS_DIR};
use std::io;
use std::path::{Path, PathBuf};

/// Check that `layouts` and `layouts/_defaults` exist and are directories.
///
/// Nothing is read or parsed; this only stats the two paths so a malformed
/// tree is rejected with one precise error.
pub fn validate_tree(tree: &dyn FileTree) -> Result<()> {
    let layouts = PathBuf::from(LAYOUTS_DIR);
    require_directory(tree, &layouts)?;
    require_directory(tree, &layouts.join(DEFAULT_LAYOUT))?;

    tracing::debug!("template tree has the required layout directories");
    Ok(())
}

fn require_directory(tree: &dyn FileTree, path: &Path) -> Result<()> {
    match tree.metadata(path) {
        Ok(EntryKind::Directory) => Ok(()),
        Ok(EntryKind::File) => Err(StencilError::NotADirectory {
            path: path.to_path_buf(),
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(StencilError::DirectoryMissing {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(StencilError::stat(path, e)),
    }
}
