//! Escape-aware parsing of segmented and tagged text
//!
//! Words are separated by a word-bound character (tab by default), fields
//! inside a word by [`TAG_DELIM`]. Either delimiter may appear inside a
//! surface or tag when preceded by [`ESCAPE`]; a doubled escape is a literal
//! escape character. Parsing never copies: iterators hand out slices of the
//! input, and [`unescape`] only allocates when an escape is present.

mod surface;
pub use surface::Surface;

mod tag;
pub use tag::{Parsed, TagFields, Tags};

mod words;
pub use words::Words;

use crate::{ESCAPE, TAG_DELIM, WORD_DELIM};
use std::borrow::Cow;
use std::marker::PhantomData;
use std::str::Lines;

/// Byte offset of the first unescaped `delim` in `s`, or `s.len()`
pub(crate) fn find_unescaped(s: &str, delim: char) -> usize {
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        if escaped {
            escaped = false;
        } else if c == ESCAPE {
            escaped = true;
        } else if c == delim {
            return i;
        }
    }
    s.len()
}

/// Whether `s` ends in an odd run of escape characters
pub(crate) fn ends_with_escape(s: &str) -> bool {
    s.bytes().rev().take_while(|&b| b == ESCAPE as u8).count() % 2 == 1
}

/// Escape the word-bound, tag delimiter and escape characters in `s`
pub fn escape(s: &str, word_bound: char) -> Cow<'_, str> {
    let needs = |c: char| c == ESCAPE || c == TAG_DELIM || c == word_bound;
    if !s.chars().any(needs) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len() + 4);
    for c in s.chars() {
        if needs(c) {
            out.push(ESCAPE);
        }
        out.push(c);
    }
    Cow::Owned(out)
}

/// Drop escape characters, keeping the character each one protects
pub fn unescape(s: &str) -> Cow<'_, str> {
    if !s.contains(ESCAPE) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut escaped = false;
    for c in s.chars() {
        if escaped || c != ESCAPE {
            out.push(c);
            escaped = false;
        } else {
            escaped = true;
        }
    }
    Cow::Owned(out)
}

/// Typed iterator over every word of multi-line tagged text
///
/// Each word is decoded through [`Tags`], so the item type picks which
/// fields are kept: `Surface`, `(Surface, &str)`, `(Surface, String, String)`...
/// Words can be taken from both ends; each end walks lines lazily.
#[derive(Debug, Clone)]
pub struct WordIterator<'a, T> {
    lines: Lines<'a>,
    front: Option<Words<'a>>,
    back: Option<Words<'a>>,
    delim: char,
    len_last_consumed: usize,
    phantom: PhantomData<T>,
}

impl<'a, T> WordIterator<'a, T> {
    /// Iterate words of `text` separated by the default word delimiter
    pub fn from_lines(text: &'a str) -> Self {
        Self::with_delim(text, WORD_DELIM)
    }

    /// Iterate words of `text` separated by `delim`
    pub fn with_delim(text: &'a str, delim: char) -> Self {
        Self {
            lines: text.lines(),
            front: None,
            back: None,
            delim,
            len_last_consumed: 0,
            phantom: PhantomData,
        }
    }

    /// Byte length of the last word returned, tags and escapes included
    #[inline]
    pub fn len_last_consumed(&self) -> usize {
        self.len_last_consumed
    }

    /// Same position, different item type
    pub fn clone_with_tags<U: Tags<'a>>(&self) -> WordIterator<'a, U> {
        WordIterator {
            lines: self.lines.clone(),
            front: self.front,
            back: self.back,
            delim: self.delim,
            len_last_consumed: 0,
            phantom: PhantomData,
        }
    }
}

impl<'a, T: Tags<'a>> WordIterator<'a, T> {
    fn decode(&mut self, word: &'a str) -> T {
        self.len_last_consumed = word.len();
        T::from_tags(&mut TagFields::from(word))
    }
}

impl<'a, T: Tags<'a>> Iterator for WordIterator<'a, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(word) = self.front.as_mut().and_then(Iterator::next) {
                return Some(self.decode(word));
            }
            match self.lines.next() {
                Some(line) => self.front = Some(Words::new(line, self.delim)),
                None => {
                    let word = self.back.as_mut().and_then(Iterator::next)?;
                    return Some(self.decode(word));
                }
            }
        }
    }
}

impl<'a, T: Tags<'a>> DoubleEndedIterator for WordIterator<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(word) = self.back.as_mut().and_then(DoubleEndedIterator::next_back) {
                return Some(self.decode(word));
            }
            match self.lines.next_back() {
                Some(line) => self.back = Some(Words::new(line, self.delim)),
                None => {
                    let word = self
                        .front
                        .as_mut()
                        .and_then(DoubleEndedIterator::next_back)?;
                    return Some(self.decode(word));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_word_iterator() {
        let text = "\na/名詞\tb/形容詞\nc/d\n\ne/UNK\n";
        let mut it = WordIterator::<(Surface, &str)>::from_lines(text);
        assert_eq!(it.next(), Some((Surface("a"), "名詞")));
        assert_eq!(it.next(), Some((Surface("b"), "形容詞")));
        assert_eq!(it.next(), Some((Surface("c"), "d")));
        assert_eq!(it.next(), Some((Surface("e"), "UNK")));
        assert_eq!(it.next(), None);

        let surfaces: Vec<Surface> = WordIterator::from_lines(text).collect();
        assert_eq!(surfaces, vec!["a", "b", "c", "e"]);
    }

    #[test]
    fn test_word_iterator_consumed_len() {
        let text = "\na/名詞\tb/形容詞\nc/d\n\ne/UNK\n";
        let mut it = WordIterator::<Surface>::from_lines(text);
        assert_eq!(it.len_last_consumed(), 0);
        assert_eq!(it.next(), Some(Surface("a")));
        assert_eq!(it.len_last_consumed(), 8);
        assert_eq!(it.next(), Some(Surface("b")));
        assert_eq!(it.len_last_consumed(), 11);
        assert_eq!(it.next(), Some(Surface("c")));
        assert_eq!(it.len_last_consumed(), 3);
        assert_eq!(it.next(), Some(Surface("e")));
        assert_eq!(it.len_last_consumed(), 5);
        assert_eq!(it.next(), None);
    }

    #[test]
    fn test_word_iterator_rev() {
        let text = "a/x\tb/y\n\nc/z\td/w\n";
        let words: Vec<(Surface, &str)> = WordIterator::from_lines(text).rev().collect();
        assert_eq!(
            words,
            vec![
                (Surface("d"), "w"),
                (Surface("c"), "z"),
                (Surface("b"), "y"),
                (Surface("a"), "x")
            ]
        );

        let mut it = WordIterator::<Surface>::from_lines(text);
        assert_eq!(it.next_back(), Some(Surface("d")));
        assert_eq!(it.len_last_consumed(), 3);
        assert_eq!(it.next(), Some(Surface("a")));
        assert_eq!(it.next_back(), Some(Surface("c")));
        assert_eq!(it.next(), Some(Surface("b")));
        assert_eq!(it.next(), None);
        assert_eq!(it.next_back(), None);
    }

    #[test]
    fn test_word_iterator_meets_in_one_line() {
        let mut it = WordIterator::<Surface>::from_lines("a\tb\tc");
        assert_eq!(it.next(), Some(Surface("a")));
        assert_eq!(it.next_back(), Some(Surface("c")));
        assert_eq!(it.next_back(), Some(Surface("b")));
        assert_eq!(it.next(), None);
        assert_eq!(it.next_back(), None);
    }

    #[test]
    fn test_word_iterator_custom_delim() {
        let text = "ab/AB cd/CD";
        let words: Vec<(Surface, String)> = WordIterator::with_delim(text, ' ').collect();
        assert_eq!(
            words,
            vec![
                (Surface("ab"), "AB".to_string()),
                (Surface("cd"), "CD".to_string())
            ]
        );
    }

    #[test]
    fn test_clone_with_tags() {
        let text = "a/x/1\tb/y/2";
        let mut it = WordIterator::<Surface>::from_lines(text);
        assert_eq!(it.next(), Some(Surface("a")));

        let mut typed = it.clone_with_tags::<(Surface, &str, &str)>();
        assert_eq!(typed.next(), Some((Surface("b"), "y", "2")));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("abc", '\t'), "abc");
        assert_eq!(escape("a/b", '\t'), "a\\/b");
        assert_eq!(escape("a\tb", '\t'), "a\\\tb");
        assert_eq!(escape("a\\b", '\t'), "a\\\\b");
        assert_eq!(escape("a b", ' '), "a\\ b");
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape("abc"), "abc");
        assert_eq!(unescape("a\\/b"), "a/b");
        assert_eq!(unescape("a\\\\b"), "a\\b");
        assert_eq!(unescape("\\\t"), "\t");
    }

    #[test]
    fn test_find_unescaped() {
        assert_eq!(find_unescaped("ab/cd", '/'), 2);
        assert_eq!(find_unescaped("a\\/b/c", '/'), 4);
        assert_eq!(find_unescaped("a\\\\/b", '/'), 3);
        assert_eq!(find_unescaped("abc", '/'), 3);
    }

    proptest! {
        #[test]
        fn escaped_surface_is_one_word_and_one_field(s in "[a-z/\\\\\t猫 ]{1,12}") {
            let escaped = escape(&s, '\t');
            let mut words = Words::new(&escaped, '\t');
            let word = words.next().unwrap();
            prop_assert_eq!(words.next(), None);

            let mut fields = TagFields::from(word);
            let field = fields.next().unwrap();
            prop_assert_eq!(fields.next(), None);
            prop_assert_eq!(unescape(field), s.as_str());
        }
    }
}
