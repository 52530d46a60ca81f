//! Field extraction from fixed-offset GDT lines
//!
//! A GDT line starts with a three digit length, followed by a four character
//! field identifier ("Kennung") and the field content up to the end of line:
//!
//! ```text
//! 0193101Mustermann
//! └┬┘└┬─┘└───┬────┘
//! len id    value
//! ```
//!
//! Offsets count characters, not bytes.

/// Something that can pull a field value out of metadata lines
pub trait FieldExtractor {
    /// Number of characters an identifier must have for this layout
    fn identifier_width(&self) -> usize;

    /// Find the first line carrying `identifier` and return its value
    ///
    /// Returns the zero-based line number together with the trimmed value,
    /// or `None` when no line matches.
    fn extract<S: AsRef<str>>(&self, identifier: &str, lines: &[S]) -> Option<(usize, String)>;
}

/// Fixed column layout of a metadata line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordLayout {
    /// Character offset where the identifier starts
    pub identifier_offset: usize,
    /// Identifier width in characters
    pub identifier_width: usize,
    /// Character offset where the value starts
    pub value_offset: usize,
}

impl RecordLayout {
    /// The GDT layout: identifier at 3..7, value from 7
    pub const GDT: Self = Self {
        identifier_offset: 3,
        identifier_width: 4,
        value_offset: 7,
    };

    fn identifier_of<'a>(&self, line: &'a str) -> Option<&'a str> {
        char_slice(line, self.identifier_offset, Some(self.identifier_width))
    }

    fn value_of<'a>(&self, line: &'a str) -> &'a str {
        char_slice(line, self.value_offset, None).unwrap_or_default()
    }
}

impl Default for RecordLayout {
    fn default() -> Self {
        Self::GDT
    }
}

impl FieldExtractor for RecordLayout {
    fn identifier_width(&self) -> usize {
        self.identifier_width
    }

    fn extract<S: AsRef<str>>(&self, identifier: &str, lines: &[S]) -> Option<(usize, String)> {
        lines.iter().enumerate().find_map(|(number, line)| {
            let line = line.as_ref();
            (self.identifier_of(line) == Some(identifier))
                .then(|| (number, self.value_of(line).trim().to_string()))
        })
    }
}

/// Slice `len` characters starting at character `start`
///
/// Returns `None` if the line is too short to provide the full slice.
fn char_slice(line: &str, start: usize, len: Option<usize>) -> Option<&str> {
    let mut boundaries = line
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(line.len()));

    let begin = boundaries.nth(start)?;
    match len {
        None => Some(&line[begin..]),
        Some(0) => Some(""),
        Some(len) => boundaries.nth(len - 1).map(|end| &line[begin..end]),
    }
}
