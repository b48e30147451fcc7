//! Implement support for the text formats handled by the converter.

pub mod table;
