//! Source positions for extracted messages.
//!
//! Lines are one-based and columns are zero-based UTF-16 code unit offsets
//! within the line, matching the positions JavaScript tooling reports for
//! message origins.

use serde::{Deserialize, Serialize};

/// A position in source text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    line: usize,
    column: usize,
}

impl SourceLocation {
    /// Builds a new location.
    ///
    /// # Examples
    ///
    /// ```
    /// use glossa_common::SourceLocation;
    ///
    /// let location = SourceLocation::new(3, 5);
    /// assert_eq!(location.line(), 3);
    /// assert_eq!(location.column(), 5);
    /// ```
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Returns the one-based line number.
    #[must_use]
    pub const fn line(self) -> usize {
        self.line
    }

    /// Returns the zero-based column.
    #[must_use]
    pub const fn column(self) -> usize {
        self.column
    }
}

/// Maps byte offsets into a source string to [`SourceLocation`]s.
///
/// Lookups are binary searches over tables built in one pass, so resolving
/// every token of a long single-line file stays linear overall.
#[derive(Clone, Debug)]
pub struct LineIndex<'src> {
    source: &'src str,
    line_starts: Vec<usize>,
    /// For every non-ASCII character, the offset just past it and how many
    /// more UTF-8 bytes than UTF-16 units the source has used up to there.
    wide_chars: Vec<(usize, usize)>,
}

impl<'src> LineIndex<'src> {
    /// Index the line starts of `source`.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        let mut line_starts = vec![0];
        let mut wide_chars = Vec::new();
        let mut surplus = 0;
        for (offset, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(offset + 1);
            } else if !ch.is_ascii() {
                surplus += ch.len_utf8() - ch.len_utf16();
                wide_chars.push((offset + ch.len_utf8(), surplus));
            }
        }
        Self {
            source,
            line_starts,
            wide_chars,
        }
    }

    /// Resolve a byte offset.
    ///
    /// Offsets past the end clamp to the end of the source. Offsets inside a
    /// multi-byte character count that character as already passed.
    ///
    /// # Examples
    ///
    /// ```
    /// use glossa_common::{LineIndex, SourceLocation};
    ///
    /// let index = LineIndex::new("let a;\nlet ü = b; 😀 c");
    /// assert_eq!(index.location(0), SourceLocation::new(1, 0));
    /// assert_eq!(index.location(11), SourceLocation::new(2, 4));
    /// // The emoji is two UTF-16 units wide.
    /// assert_eq!(index.location(24), SourceLocation::new(2, 14));
    /// ```
    #[must_use]
    pub fn location(&self, offset: usize) -> SourceLocation {
        let offset = self.char_boundary_at_or_after(offset);
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .max(1);
        let line_start = self.line_starts.get(line - 1).copied().unwrap_or_default();
        let column = self.utf16_offset(offset) - self.utf16_offset(line_start);
        SourceLocation::new(line, column)
    }

    fn char_boundary_at_or_after(&self, offset: usize) -> usize {
        let len = self.source.len();
        (offset.min(len)..len)
            .find(|&candidate| self.source.is_char_boundary(candidate))
            .unwrap_or(len)
    }

    /// UTF-16 length of `source[..offset]` for a character boundary `offset`.
    fn utf16_offset(&self, offset: usize) -> usize {
        let passed = self.wide_chars.partition_point(|&(end, _)| end <= offset);
        let surplus = passed
            .checked_sub(1)
            .and_then(|last| self.wide_chars.get(last))
            .map_or(0, |&(_, surplus)| surplus);
        offset - surplus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 1, 0)]
    #[case(3, 1, 3)]
    #[case(4, 2, 0)]
    #[case(6, 2, 2)]
    #[case(8, 3, 0)]
    fn maps_offsets_to_lines_and_columns(
        #[case] offset: usize,
        #[case] line: usize,
        #[case] column: usize,
    ) {
        let index = LineIndex::new("abc\ndef\n");
        assert_eq!(index.location(offset), SourceLocation::new(line, column));
    }

    #[rstest]
    #[case("こんにちは x", 1, 6)]
    #[case("a😀 x", 1, 4)]
    #[case("😀😀\n😀 x", 2, 3)]
    fn columns_count_utf16_units_not_bytes(
        #[case] source: &str,
        #[case] line: usize,
        #[case] column: usize,
    ) {
        let index = LineIndex::new(source);
        let offset = source.find('x').unwrap_or_default();
        assert_eq!(index.location(offset), SourceLocation::new(line, column));
    }

    #[rstest]
    fn offsets_inside_a_character_count_it_as_passed() {
        let index = LineIndex::new("é x");
        assert_eq!(index.location(1), SourceLocation::new(1, 1));
    }

    #[rstest]
    fn long_single_lines_resolve_every_offset() {
        let source = "é".repeat(100_000);
        let index = LineIndex::new(&source);
        let columns: Vec<_> = (0..source.len())
            .step_by(2)
            .map(|offset| index.location(offset).column())
            .collect();
        assert_eq!(columns.len(), 100_000);
        assert!(columns.iter().enumerate().all(|(at, &column)| at == column));
    }

    #[rstest]
    fn clamps_offsets_past_the_end() {
        let index = LineIndex::new("ab");
        assert_eq!(index.location(99), SourceLocation::new(1, 2));
    }
}
