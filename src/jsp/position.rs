//! Source positions for diagnostics
//!
//! Syntax problems are reported as `(line, column)` pairs: the line is 1-based and the
//! column is the 0-based byte offset inside that line, the convention most template
//! tooling uses. Internally offsets are tracked as bytes and converted on demand.

use std::fmt;

/// A line/column position inside a template source
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Provides fast conversion from byte offsets to line/column positions
pub struct SourceLocation {
    /// Byte offsets where each line starts
    line_starts: Vec<usize>,
}

impl SourceLocation {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];

        for (byte_pos, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(byte_pos + 1);
            }
        }

        Self { line_starts }
    }

    /// Convert a byte offset to a 1-based line, 0-based column position
    pub fn byte_to_position(&self, byte_offset: usize) -> Position {
        let line = self
            .line_starts
            .binary_search(&byte_offset)
            .unwrap_or_else(|i| i - 1);

        let column = byte_offset - self.line_starts[line];

        Position::new(line + 1, column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_line_is_one() {
        let loc = SourceLocation::new("<% a %>");
        assert_eq!(loc.byte_to_position(0), Position::new(1, 0));
        assert_eq!(loc.byte_to_position(3), Position::new(1, 3));
    }

    #[test]
    fn test_position_after_newlines() {
        let loc = SourceLocation::new("<html>\n  <% x %>\n<%= y %>");

        assert_eq!(loc.byte_to_position(6), Position::new(1, 6));
        assert_eq!(loc.byte_to_position(7), Position::new(2, 0));
        assert_eq!(loc.byte_to_position(9), Position::new(2, 2));
        assert_eq!(loc.byte_to_position(17), Position::new(3, 0));
    }

    #[test]
    fn test_display() {
        assert_eq!(Position::new(4, 12).to_string(), "4:12");
    }
}
