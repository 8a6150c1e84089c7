use super::{ends_with_escape, find_unescaped};

/// Double-ended iterator over the escaped words of one line
///
/// Runs of unescaped delimiters are skipped, so empty words never appear.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Words<'a> {
    inner: &'a str,
    delim: char,
}

impl<'a> Words<'a> {
    /// Split `inner` on unescaped `delim`
    pub fn new(inner: &'a str, delim: char) -> Self {
        Self { inner, delim }
    }

    fn rfind_sow(&self) -> usize {
        for (i, c) in self.inner.char_indices().rev() {
            if c == self.delim && !ends_with_escape(&self.inner[..i]) {
                return i + c.len_utf8();
            }
        }
        0
    }

    fn trim_end_delims(&mut self) {
        while let Some(rest) = self.inner.strip_suffix(self.delim) {
            if ends_with_escape(rest) {
                break;
            }
            self.inner = rest;
        }
    }
}

impl<'a> Iterator for Words<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        // The front is always a word start or an unescaped delimiter
        self.inner = self.inner.trim_start_matches(self.delim);
        if self.inner.is_empty() {
            return None;
        }

        let eow = find_unescaped(self.inner, self.delim);
        let (word, rest) = self.inner.split_at(eow);
        self.inner = rest;
        Some(word)
    }
}

impl<'a> DoubleEndedIterator for Words<'a> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.trim_end_delims();
        if self.inner.is_empty() {
            return None;
        }

        let sow = self.rfind_sow();
        let (rest, word) = self.inner.split_at(sow);
        self.inner = rest;
        Some(word)
    }
}
