//! Error types for layout construction and rendering.

use crate::fragment::FragmentOrigin;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using StencilError.
pub type Result<T> = std::result::Result<T, StencilError>;

/// Broad classification of a [`StencilError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The template tree does not have the required shape.
    Configuration,
    /// A file or directory exists but could not be read.
    Read,
    /// Template source failed to compile.
    Syntax,
    /// No layout is registered under the requested name.
    Lookup,
    /// The template engine failed while rendering.
    Execution,
}

/// Errors that can occur while building a layout registry or rendering from it.
#[derive(Error, Debug)]
pub enum StencilError {
    /// A required directory is absent from the template tree.
    #[error("directory '{path}' does not exist in the template tree")]
    DirectoryMissing { path: PathBuf },

    /// A required directory exists but is a file.
    #[error("path '{path}' is not a directory in the template tree")]
    NotADirectory { path: PathBuf },

    /// Checking a path failed for a reason other than absence.
    #[error("failed to stat '{path}': {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `layouts/_defaults/_index.html.tmpl` is absent.
    #[error("mandatory defaults entry fragment '{path}' does not exist")]
    MissingDefaultsIndex { path: PathBuf },

    /// A composed namespace has no entry fragment.
    #[error("layout '{layout}' has no entry fragment")]
    MissingEntry { layout: String },

    /// Failed to list a directory.
    #[error("failed to read directory '{path}': {source}")]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read a fragment file.
    #[error("failed to read template file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Fragment source is not valid template syntax.
    #[error("failed to parse template {origin}: {source}")]
    Syntax {
        origin: FragmentOrigin,
        #[source]
        source: liquid::Error,
    },

    /// The template engine could not be configured.
    #[error("failed to configure template engine: {source}")]
    Engine {
        #[source]
        source: liquid::Error,
    },

    /// A composed namespace could not be compiled into a layout.
    #[error("failed to compile layout '{layout}': {source}")]
    Compile {
        layout: String,
        #[source]
        source: liquid::Error,
    },

    /// No layout is registered under the requested name.
    #[error("no layout with name '{name}'")]
    LayoutNotFound { name: String },

    /// Rendering a layout failed.
    #[error("could not render layout '{layout}': {source}")]
    Render {
        layout: String,
        #[source]
        source: liquid::Error,
    },

    /// Render data could not be converted into template globals.
    #[error("invalid render data: {source}")]
    InvalidData {
        #[source]
        source: liquid::Error,
    },
}

impl StencilError {
    /// The broad class this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DirectoryMissing { .. }
            | Self::NotADirectory { .. }
            | Self::Stat { .. }
            | Self::MissingDefaultsIndex { .. }
            | Self::MissingEntry { .. } => ErrorKind::Configuration,
            Self::ReadDirectory { .. } | Self::ReadFile { .. } => ErrorKind::Read,
            Self::Syntax { .. } | Self::Engine { .. } | Self::Compile { .. } => ErrorKind::Syntax,
            Self::LayoutNotFound { .. } => ErrorKind::Lookup,
            Self::Render { .. } | Self::InvalidData { .. } => ErrorKind::Execution,
        }
    }

    /// Whether the template tree has the wrong shape.
    pub fn is_configuration(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }

    /// Whether the requested layout does not exist.
    pub fn is_lookup(&self) -> bool {
        self.kind() == ErrorKind::Lookup
    }

    /// Whether rendering failed inside the template engine.
    pub fn is_execution(&self) -> bool {
        self.kind() == ErrorKind::Execution
    }

    pub(crate) fn stat(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Stat {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn read_directory(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadDirectory {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFile {
            path: path.into(),
            source,
        }
    }
}
