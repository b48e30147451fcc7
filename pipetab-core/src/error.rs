use std::{io, path::PathBuf};

use camino::Utf8PathBuf;
use snafu::Snafu;

/// Reasons a source file cannot be turned into a table.
#[derive(Debug, Snafu, PartialEq, Eq)]
#[snafu(visibility(pub(crate)))]
pub enum StructureError {
    /// The column count is read from the second line, so at least two lines are required
    #[snafu(display("expected at least 2 lines to infer the column count, found {found}"))]
    TooFewLines { found: usize },
    /// All lines are blank, so there is no header row to lowercase
    #[snafu(display("no non-blank line to use as the header row"))]
    MissingHeader,
}

/// Errors aborting a conversion run.
///
/// None of them are recovered from: the first one ends the batch, leaving files written so far in place.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ConvertError {
    #[snafu(display("Root directory {root} does not exist"))]
    RootNotFound { root: Utf8PathBuf },
    #[snafu(display("Root {root} is not a directory"))]
    RootNotDirectory { root: Utf8PathBuf },
    #[snafu(display("Accessing root directory {root}"))]
    RootAccess { root: Utf8PathBuf, source: io::Error },
    #[snafu(display("Path {} is not valid UTF-8 and can't be renamed", path.display()))]
    NonUtf8Path { path: PathBuf },
    #[snafu(display("Reading {path}"))]
    Read { path: Utf8PathBuf, source: io::Error },
    #[snafu(display("Malformed table in {path}"))]
    Structure {
        path: Utf8PathBuf,
        source: StructureError,
    },
    #[snafu(display("Writing {path}"))]
    Write { path: Utf8PathBuf, source: io::Error },
}

impl ConvertError {
    /// The structural problem behind this error, if it was caused by malformed input.
    pub fn structure(&self) -> Option<&StructureError> {
        match self {
            ConvertError::Structure { source, .. } => Some(source),
            _ => None,
        }
    }
}
