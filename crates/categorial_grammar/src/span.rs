//! Source locations in grammar files.
//!
//! The loader works one line at a time, so a `Span` carries byte offsets
//! into its line plus the 1-based line and column used in error messages.

use categorial_foundation::ErrorContext;

/// A region of one grammar source line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Span {
    /// Byte offset of the first character, within the line.
    pub start: usize,
    /// Byte offset one past the last character (exclusive).
    pub end: usize,
    /// 1-based line number.
    pub line: u32,
    /// 1-based column of `start`, counted in characters.
    pub column: u32,
}

impl Span {
    /// Creates a new span.
    #[must_use]
    pub const fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    /// Length in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true for a zero-width span, such as end of line.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The covered text of the line this span was lexed from.
    #[must_use]
    pub fn text<'a>(&self, line: &'a str) -> &'a str {
        &line[self.start..self.end]
    }

    /// Error context pointing at this span's line and column.
    #[must_use]
    pub fn context(&self) -> ErrorContext {
        ErrorContext::new().with_position(self.line as usize, self.column as usize)
    }
}
