// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Source location tracking.

/// Logical identifier of a source buffer, supplied by the hosting tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FileId(pub u32);

/// A half-open byte range `[start, end)` in a source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Zero-width span at `pos`.
    pub fn empty_at(pos: usize) -> Self {
        Self { start: pos, end: pos }
    }

    /// Span covering both `self` and `other`.
    pub fn to(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// True if `other` lies entirely within `self`.
    pub fn contains(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// The source text covered by this span, if it is in bounds.
    pub fn slice<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.start..self.end)
    }
}

/// A 1-based line/column pair. Columns count bytes, as Go tooling does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub line: u32,
    pub col: u32,
}

/// Precomputed line-start offsets for O(log n) byte-offset → line:col lookup.
#[derive(Debug, Clone)]
pub struct LineMap {
    /// Byte offset of the start of each line. line_starts[0] is always 0.
    line_starts: Vec<u32>,
}

impl LineMap {
    /// Build a line map by scanning source for `\n`. O(n).
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0u32];
        line_starts.extend(
            source
                .bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'\n')
                .map(|(i, _)| (i + 1) as u32),
        );
        LineMap { line_starts }
    }

    /// Convert byte offset to a 1-based position. O(log n).
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset as u32;
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        Position {
            line: (line_idx + 1) as u32,
            col: offset - self.line_starts[line_idx] + 1,
        }
    }

    /// Convert byte offset to (line, col), both 1-based.
    pub fn offset_to_line_col(&self, offset: usize) -> (u32, u32) {
        let pos = self.position(offset);
        (pos.line, pos.col)
    }

    /// Source text of a 1-based line, without its terminator (`\n` or `\r\n`).
    pub fn line_text<'a>(&self, source: &'a str, line: u32) -> Option<&'a str> {
        let idx = (line as usize).checked_sub(1)?;
        let start = *self.line_starts.get(idx)? as usize;
        let end = self
            .line_starts
            .get(idx + 1)
            .map(|&s| (s as usize).saturating_sub(1))
            .unwrap_or(source.len());
        source.get(start..end).map(|text| text.strip_suffix('\r').unwrap_or(text))
    }

    pub fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_on_empty_source() {
        let lm = LineMap::new("");
        assert_eq!(lm.position(0), Position { line: 1, col: 1 });
        assert_eq!(lm.line_count(), 1);
    }

    #[test]
    fn position_across_lines() {
        let src = "package main\n\nfunc main() {}\n";
        let lm = LineMap::new(src);
        assert_eq!(lm.line_count(), 4);
        assert_eq!(lm.offset_to_line_col(0), (1, 1));
        assert_eq!(lm.offset_to_line_col(8), (1, 9));
        assert_eq!(lm.offset_to_line_col(13), (2, 1));
        assert_eq!(lm.offset_to_line_col(14), (3, 1));
        assert_eq!(lm.offset_to_line_col(19), (3, 6));
    }

    #[test]
    fn newline_byte_belongs_to_its_line() {
        let lm = LineMap::new("ab\ncd\n");
        assert_eq!(lm.offset_to_line_col(2), (1, 3));
        assert_eq!(lm.offset_to_line_col(3), (2, 1));
    }

    #[test]
    fn line_text_strips_crlf() {
        let src = "let x = 1\r\nlet y = 2\r\n";
        let lm = LineMap::new(src);
        assert_eq!(lm.line_text(src, 1), Some("let x = 1"));
        assert_eq!(lm.line_text(src, 2), Some("let y = 2"));
        assert_eq!(lm.line_text(src, 3), Some(""));
        assert_eq!(lm.line_text(src, 4), None);
    }

    #[test]
    fn span_join_and_contains() {
        let a = Span::new(4, 9);
        let b = Span::new(12, 15);
        let joined = a.to(b);
        assert_eq!(joined, Span::new(4, 15));
        assert!(joined.contains(a));
        assert!(joined.contains(b));
        assert!(!a.contains(joined));
        assert_eq!(joined.len(), 11);
        assert!(Span::empty_at(3).is_empty());
    }

    #[test]
    fn span_slice_is_bounds_checked() {
        let src = "x := 1";
        assert_eq!(Span::new(0, 1).slice(src), Some("x"));
        assert_eq!(Span::new(2, 40).slice(src), None);
    }
}
