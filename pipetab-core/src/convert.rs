//! The batch converter: walks a directory tree and turns every `.csv` file into a `.tbl` file next to it.
//!
//! Files are converted one at a time, in file name order. The first error aborts the whole run;
//! outputs written before it are left in place.

use std::{fs, io};

use camino::{Utf8Path, Utf8PathBuf};
use snafu::{ensure, ResultExt};
use tracing::{debug, info, trace, warn};
use walkdir::WalkDir;

use crate::{
    error::{
        ConvertError, ReadSnafu, RootAccessSnafu, RootNotDirectorySnafu, RootNotFoundSnafu,
        StructureSnafu, WriteSnafu,
    },
    format::table::TableText,
    naming::{derive_output_path, is_source_path},
};

/// Directory the converter looks in when no other root is given.
pub const DEFAULT_ROOT: &str = "3MB";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertConfig {
    /// Directory to search for source files, recursively
    pub root: Utf8PathBuf,
}

impl ConvertConfig {
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT)
    }
}

/// A source file and the path its converted form goes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub input: Utf8PathBuf,
    pub output: Utf8PathBuf,
}

impl Conversion {
    pub fn for_source(input: Utf8PathBuf) -> Self {
        let output = derive_output_path(&input);
        Self { input, output }
    }
}

/// Outcome of a completed run. Not produced when the run fails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertReport {
    /// Conversions written, in the order they were performed
    pub conversions: Vec<Conversion>,
}

impl ConvertReport {
    pub fn len(&self) -> usize {
        self.conversions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversions.is_empty()
    }
}

pub struct Converter {
    config: ConvertConfig,
}

impl Converter {
    pub fn new(config: ConvertConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// List the conversions a run would perform, without reading or writing any file.
    pub fn plan(&self) -> Result<Vec<Conversion>, ConvertError> {
        self.sources()?.collect()
    }

    /// Convert every source file under the root.
    pub fn run(&self) -> Result<ConvertReport, ConvertError> {
        let mut report = ConvertReport::default();
        for conversion in self.sources()? {
            let conversion = conversion?;
            convert_file(&conversion)?;
            info!("Wrote {} -> {}", conversion.input, conversion.output);
            report.conversions.push(conversion);
        }

        Ok(report)
    }

    /// Walk the root lazily, so a failing file stops the walk before later files are even looked at.
    fn sources(
        &self,
    ) -> Result<impl Iterator<Item = Result<Conversion, ConvertError>>, ConvertError> {
        let root = &self.config.root;
        check_root(root)?;
        debug!("Searching for source files in {}", root);

        let walk = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    warn!("Skipping unreadable entry: {}", err);
                    None
                }
            })
            .filter(|entry| {
                // symlinks are not descended into, but a link to a file is read through
                entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
            })
            .filter(|entry| {
                let selected = is_source_path(entry.path());
                if !selected {
                    trace!("Skipping {}", entry.path().display());
                }
                selected
            })
            .map(|entry| {
                Utf8PathBuf::from_path_buf(entry.into_path())
                    .map(Conversion::for_source)
                    .map_err(|path| ConvertError::NonUtf8Path { path })
            });

        Ok(walk)
    }
}

/// Convert every source file under `config.root`.
pub fn convert(config: &ConvertConfig) -> Result<ConvertReport, ConvertError> {
    Converter::new(config.clone()).run()
}

/// Read and transform a single source file without writing anything.
pub fn preview_file(path: &Utf8Path) -> Result<TableText, ConvertError> {
    let source = fs::read_to_string(path).context(ReadSnafu {
        path: path.to_owned(),
    })?;
    TableText::from_source(&source).context(StructureSnafu {
        path: path.to_owned(),
    })
}

/// Transform `conversion.input` and write the result to `conversion.output`, replacing any existing file.
pub fn convert_file(conversion: &Conversion) -> Result<TableText, ConvertError> {
    let table = preview_file(&conversion.input)?;
    debug!(
        "{}: {} columns, {} rows",
        conversion.input,
        table.column_count(),
        table.rows().len()
    );
    fs::write(&conversion.output, table.render()).context(WriteSnafu {
        path: conversion.output.clone(),
    })?;

    Ok(table)
}

fn check_root(root: &Utf8Path) -> Result<(), ConvertError> {
    let metadata = match fs::metadata(root) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return RootNotFoundSnafu {
                root: root.to_owned(),
            }
            .fail();
        }
        Err(err) => {
            return Err(err).context(RootAccessSnafu {
                root: root.to_owned(),
            });
        }
    };
    ensure!(
        metadata.is_dir(),
        RootNotDirectorySnafu {
            root: root.to_owned(),
        }
    );

    Ok(())
}
