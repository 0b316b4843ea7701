//! Forward-only line cursor.

/// Source lines with a single forward-only cursor.
///
/// Look-ahead methods inspect lines without moving the cursor; only
/// [`LineStream::advance`] and [`LineStream::next_line`] consume.
#[derive(Debug, Clone)]
pub struct LineStream<'a> {
    lines: Vec<&'a str>,
    pos: usize,
}

impl<'a> LineStream<'a> {
    /// Split text into lines (`\n` or `\r\n`).
    pub fn new(text: &'a str) -> Self {
        Self::from_lines(text.lines().collect())
    }

    /// Build from already split lines.
    pub fn from_lines(lines: Vec<&'a str>) -> Self {
        Self { lines, pos: 0 }
    }

    /// Cursor position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Total number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if there are no lines at all.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Line under the cursor.
    pub fn current(&self) -> Option<&'a str> {
        self.lines.get(self.pos).copied()
    }

    /// Line `offset` positions after the cursor.
    pub fn peek(&self, offset: usize) -> Option<&'a str> {
        self.lines.get(self.pos + offset).copied()
    }

    /// Move the cursor forward by one line.
    pub fn advance(&mut self) {
        if self.pos < self.lines.len() {
            self.pos += 1;
        }
    }

    /// Return the current line and move past it.
    pub fn next_line(&mut self) -> Option<&'a str> {
        let line = self.current()?;
        self.pos += 1;
        Some(line)
    }

    /// Consume lines while `pred` holds, returning them.
    pub fn take_while(&mut self, mut pred: impl FnMut(&str) -> bool) -> Vec<&'a str> {
        let mut taken = Vec::new();
        while let Some(line) = self.current() {
            if !pred(line) {
                break;
            }
            taken.push(line);
            self.pos += 1;
        }
        taken
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peek_does_not_move() {
        let stream = LineStream::new("a\nb\nc");
        assert_eq!(stream.peek(1), Some("b"));
        assert_eq!(stream.peek(5), None);
        assert_eq!(stream.position(), 0);
    }

    #[test]
    fn test_take_while() {
        let mut stream = LineStream::new("| a |\n| b |\ntext");
        let taken = stream.take_while(|l| l.trim_start().starts_with('|'));
        assert_eq!(taken, vec!["| a |", "| b |"]);
        assert_eq!(stream.current(), Some("text"));
    }

    #[test]
    fn test_cursor_monotonic() {
        let mut stream = LineStream::new("a\n\n\nb");
        assert_eq!(stream.next_line(), Some("a"));
        stream.take_while(|l| l.trim().is_empty());
        assert_eq!(stream.position(), 3);
        assert_eq!(stream.next_line(), Some("b"));
        assert_eq!(stream.current(), None);
        stream.advance();
        assert_eq!(stream.position(), 4);
        assert_eq!(stream.next_line(), None);
    }
}
