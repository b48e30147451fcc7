//! Header-annotated pipe-delimited tables.
//!
//! The output format is the source rows, trimmed and terminated with a delimiter,
//! preceded by a synthetic line holding the column count:
//!
//! ```text
//! 3
//! h1|h2|h3|
//! v1|v2|v3|
//! ```
//!
//! The header row (output line 1) is lowercased, all other rows keep their case.

use itertools::Itertools;
use snafu::{ensure, OptionExt};

use crate::error::{MissingHeaderSnafu, StructureError, TooFewLinesSnafu};

/// Separates values within a row. Also appended to the end of every output row.
pub const DELIMITER: char = '|';

/// Infer the number of columns from a row: one more than the number of delimiters in it.
pub fn count_columns(line: &str) -> usize {
    line.matches(DELIMITER).count() + 1
}

/// Split into lines, accepting `\n`, `\r\n` and a lone `\r` as line endings.
fn split_lines(source: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = source;
    while let Some(end) = rest.find(['\r', '\n']) {
        lines.push(&rest[..end]);
        let terminator_len = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
        rest = &rest[end + terminator_len..];
    }
    if !rest.is_empty() {
        lines.push(rest);
    }
    lines
}

/// Whitespace, plus the ASCII file/group/record/unit separators (`\x1c`..=`\x1f`).
fn is_blank(c: char) -> bool {
    c.is_whitespace() || ('\x1c'..='\x1f').contains(&c)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableText {
    column_count: usize,
    lines: Vec<String>,
}

impl TableText {
    /// Transform the contents of a source file.
    ///
    /// The column count is inferred from the second raw line (blank or not) and is not checked against the other rows.
    pub fn from_source(source: &str) -> Result<Self, StructureError> {
        let source_lines = split_lines(source);
        ensure!(
            source_lines.len() >= 2,
            TooFewLinesSnafu {
                found: source_lines.len()
            }
        );
        let column_count = count_columns(source_lines[1]);

        let mut lines = Vec::with_capacity(source_lines.len() + 1);
        lines.push(column_count.to_string());
        lines.extend(
            source_lines
                .iter()
                .map(|line| line.trim_matches(is_blank))
                .filter(|line| !line.is_empty())
                .map(|line| format!("{}{}", line, DELIMITER)),
        );

        // index 0 is the column count, so the header row is always at 1
        let header = lines.get_mut(1).context(MissingHeaderSnafu)?;
        *header = header.to_lowercase();

        Ok(Self {
            column_count,
            lines,
        })
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// All output lines, starting with the column count line.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn header(&self) -> &str {
        &self.lines[1]
    }

    /// Data rows following the header.
    pub fn rows(&self) -> &[String] {
        &self.lines[2..]
    }

    /// Join the lines with `\n`. There is no newline after the last line.
    pub fn render(&self) -> String {
        self.lines.iter().join("\n")
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::{count_columns, TableText};
    use crate::error::StructureError;

    #[test]
    fn columns() {
        assert_eq!(count_columns(""), 1);
        assert_eq!(count_columns("a"), 1);
        assert_eq!(count_columns("a|b|c"), 3);
        assert_eq!(count_columns("a|b|c|"), 4);
        assert_eq!(count_columns("||"), 3);
    }

    #[test]
    fn basic_table() {
        let table = TableText::from_source("h1|h2|h3\nv1|v2|v3\n\nv4|v5|v6\n").unwrap();

        assert_eq!(table.column_count(), 3);
        assert_eq!(table.header(), "h1|h2|h3|");
        assert_eq!(table.rows(), ["v1|v2|v3|", "v4|v5|v6|"]);
        assert_snapshot!(table.render(), @r"
        3
        h1|h2|h3|
        v1|v2|v3|
        v4|v5|v6|
        ");
    }

    #[test]
    fn no_trailing_newline() {
        let table = TableText::from_source("H1|H2\nv1|v2").unwrap();
        assert_eq!(table.render(), "2\nh1|h2|\nv1|v2|");
    }

    #[test]
    fn only_header_is_lowercased() {
        let table = TableText::from_source("NAME|Kind\nAlice|ADMIN\nBOB|User\n").unwrap();

        assert_eq!(
            table.lines(),
            ["2", "name|kind|", "Alice|ADMIN|", "BOB|User|"]
        );
    }

    #[test]
    fn rows_are_trimmed() {
        let table = TableText::from_source("  a|b \r\n\t1|2\t\r\n   \r\n 3|4\r\n").unwrap();

        assert_eq!(table.lines(), ["2", "a|b|", "1|2|", "3|4|"]);
    }

    #[test]
    fn line_endings() {
        let expected = ["2", "h|i|", "1|2|"];
        assert_eq!(TableText::from_source("H|I\r1|2\r").unwrap().lines(), expected);
        assert_eq!(TableText::from_source("H|I\r\n1|2\r\n").unwrap().lines(), expected);
        assert_eq!(TableText::from_source("H|I\n1|2").unwrap().lines(), expected);
        // mixed endings, `\r\n` stays a single break so the second line is still the data row
        assert_eq!(
            TableText::from_source("H|I\r\n1|2\r3|4\n").unwrap().lines(),
            ["2", "h|i|", "1|2|", "3|4|"]
        );
        // `\r` then `\r\n` is two line breaks, leaving a blank second line
        assert_eq!(
            TableText::from_source("H|I\r\r\n1|2\n").unwrap().lines(),
            ["1", "h|i|", "1|2|"]
        );
    }

    #[test]
    fn separator_controls_count_as_blank() {
        let table = TableText::from_source("A|B\n\x1f\n\x1c 1|2 \x1d\n").unwrap();

        assert_eq!(table.column_count(), 1);
        assert_eq!(table.lines(), ["1", "a|b|", "1|2|"]);
    }

    #[test]
    fn column_count_comes_from_second_raw_line() {
        // the blank second line still decides the column count
        let table = TableText::from_source("a|b|c\n\nx|y|z\n").unwrap();
        assert_eq!(table.column_count(), 1);
        assert_eq!(table.lines(), ["1", "a|b|c|", "x|y|z|"]);

        // and the count is not checked against the other rows
        let table = TableText::from_source("a|b\n1|2|3|4\n").unwrap();
        assert_eq!(table.column_count(), 4);
    }

    #[test]
    fn leading_blank_lines_shift_header() {
        let table = TableText::from_source("\nID|VALUE\n1|X\n").unwrap();

        assert_eq!(table.column_count(), 2);
        assert_eq!(table.lines(), ["2", "id|value|", "1|X|"]);
    }

    #[test]
    fn header_only() {
        let table = TableText::from_source("A|B\n\n").unwrap();

        assert_eq!(table.column_count(), 1);
        assert_eq!(table.lines(), ["1", "a|b|"]);
        assert!(table.rows().is_empty());
    }

    #[test]
    fn too_few_lines() {
        assert_eq!(
            TableText::from_source(""),
            Err(StructureError::TooFewLines { found: 0 })
        );
        assert_eq!(
            TableText::from_source("h1|h2\n"),
            Err(StructureError::TooFewLines { found: 1 })
        );
    }

    #[test]
    fn all_blank() {
        assert_eq!(
            TableText::from_source("\n  \n\t\n"),
            Err(StructureError::MissingHeader)
        );
    }
}
