//! Selecting source files and naming their outputs.
//!
//! Both rules work on the path as a plain string: the suffix test does not parse extensions,
//! and the rename rewrites every occurrence of a token anywhere in the path, directories included.

use std::path::Path;

use camino::{Utf8Path, Utf8PathBuf};

pub const SOURCE_SUFFIX: &str = ".csv";
/// Removed from output names, `orders_table_1.csv` becomes `orders1.tbl`
pub const TABLE_MARKER: &str = "_table_";
pub const SOURCE_TOKEN: &str = "csv";
pub const TARGET_TOKEN: &str = "tbl";

/// Whether the converter should pick up the file at `path`.
///
/// Case-sensitive, so `data.CSV` is skipped.
pub fn is_source_path(path: impl AsRef<Path>) -> bool {
    path.as_ref()
        .as_os_str()
        .as_encoded_bytes()
        .ends_with(SOURCE_SUFFIX.as_bytes())
}

/// Derive the output path for a source file: drop every `_table_`, then turn every `csv` into `tbl`.
pub fn derive_output_path(path: &Utf8Path) -> Utf8PathBuf {
    path.as_str()
        .replace(TABLE_MARKER, "")
        .replace(SOURCE_TOKEN, TARGET_TOKEN)
        .into()
}
