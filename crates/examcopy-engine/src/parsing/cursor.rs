/// A scanning cursor over the marker stream.
///
/// Advances one character at a time (never splitting a multi-byte
/// character), so `pos()` is always a valid slice boundary. Delimiter
/// matches report absolute byte offsets, letting the segmenter slice the
/// source directly.
#[derive(Clone)]
pub struct Cursor<'a> {
    s: &'a str,
    i: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { s, i: 0 }
    }

    /// Current absolute byte position.
    pub fn pos(&self) -> usize {
        self.i
    }

    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }

    /// The unconsumed remainder of the input.
    pub fn rest(&self) -> &'a str {
        &self.s[self.i..]
    }

    /// Whether the remainder starts with `pat`.
    pub fn starts_with(&self, pat: &str) -> bool {
        self.rest().starts_with(pat)
    }

    /// Advances past the next character.
    pub fn bump(&mut self) {
        if let Some(c) = self.rest().chars().next() {
            self.i += c.len_utf8();
        }
    }

    /// Moves the cursor to an absolute byte position previously obtained
    /// from a delimiter match.
    pub fn jump(&mut self, to: usize) {
        debug_assert!(to >= self.i && to <= self.s.len());
        self.i = to;
    }

    /// Finds `pat` at or after `pos() + offset`, returning its absolute
    /// byte position.
    pub fn find_from(&self, offset: usize, pat: &str) -> Option<usize> {
        let from = self.i + offset;
        if from > self.s.len() {
            return None;
        }
        self.s[from..].find(pat).map(|at| from + at)
    }
}
