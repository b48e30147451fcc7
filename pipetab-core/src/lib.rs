//! This crate implements the core functionality of pipetab
//!
//! This mostly includes the pipe-delimited table transform, the output naming rule
//! and the batch converter walking a directory tree of `.csv` dumps.

#![allow(clippy::uninlined_format_args)]

pub mod convert;
pub mod error;
pub mod format;
pub mod naming;

pub use convert::{convert, preview_file, Conversion, ConvertConfig, ConvertReport, Converter};
pub use error::{ConvertError, StructureError};
