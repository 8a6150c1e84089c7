//! Token streams over segmented or tagged text
//!
//! A [`Token`] is one word of the text with its unescaped surface, its
//! position among the emitted tokens and the byte range it occupies.
//! The range covers the whole escaped word, tags included, so
//! `&text[token.offset_from..token.offset_to]` is the word as written.
//! Streams are cursors: call [`TokenStream::advance`], then read
//! [`TokenStream::token`].

use crate::parser::{Surface, Tags, WordIterator};
use crate::WORD_DELIM;
use serde::{Deserialize, Serialize};

/// One word of tokenized text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Byte offset of the first byte of the word
    pub offset_from: usize,
    /// Byte offset one past the last byte of the word, tags included
    pub offset_to: usize,
    /// Index among the tokens the stream emitted
    pub position: usize,
    /// Unescaped surface
    pub text: String,
}

impl Default for Token {
    fn default() -> Self {
        Self {
            offset_from: 0,
            offset_to: 0,
            position: usize::MAX,
            text: String::new(),
        }
    }
}

/// Cursor over the tokens of a text
pub trait TokenStream {
    /// Move to the next token, returning `false` once the text is exhausted
    fn advance(&mut self) -> bool;

    /// Token under the cursor
    fn token(&self) -> &Token;

    /// Token under the cursor, for filters that rewrite it in place
    fn token_mut(&mut self) -> &mut Token;

    /// Advance and return a copy of the new token
    fn next_token(&mut self) -> Option<Token> {
        if self.advance() {
            Some(self.token().clone())
        } else {
            None
        }
    }
}

fn offset_in(text: &str, part: &str) -> usize {
    (part.as_ptr() as usize).saturating_sub(text.as_ptr() as usize)
}

#[derive(Debug, Clone)]
struct Cursor<'a, T> {
    text: &'a str,
    words: WordIterator<'a, (Surface<'a>, T)>,
    count: usize,
    tags: Option<T>,
    token: Token,
}

impl<'a, T: Tags<'a>> Cursor<'a, T> {
    fn new(text: &'a str, delim: char) -> Self {
        Self {
            text,
            words: WordIterator::with_delim(text, delim),
            count: 0,
            tags: None,
            token: Token::default(),
        }
    }

    fn step<F>(&mut self, keep: &mut F) -> bool
    where
        F: FnMut(&(Surface<'a>, T)) -> bool,
    {
        loop {
            let Some(item) = self.words.next() else {
                self.tags = None;
                return false;
            };
            if !keep(&item) {
                continue;
            }

            let (surface, tags) = item;
            let offset_from = offset_in(self.text, surface.as_str());
            self.token.offset_from = offset_from;
            self.token.offset_to = offset_from + self.words.len_last_consumed();
            self.token.position = self.count;
            self.token.text.clear();
            self.token.text.push_str(&surface.unescape());
            self.count += 1;
            self.tags = Some(tags);
            return true;
        }
    }
}

/// Every word of the text as a token
///
/// `T` picks which tag fields are decoded alongside the surface; the
/// default `()` skips them.
#[derive(Debug, Clone)]
pub struct ParsedTokens<'a, T = ()> {
    cursor: Cursor<'a, T>,
}

impl<'a> ParsedTokens<'a, ()> {
    /// Tokens of `text`, words separated by the default word delimiter
    pub fn new(text: &'a str) -> Self {
        Self::typed(text, WORD_DELIM)
    }
}

impl<'a, T: Tags<'a>> ParsedTokens<'a, T> {
    /// Tokens of `text` with their tags decoded as `T`
    pub fn typed(text: &'a str, delim: char) -> Self {
        Self {
            cursor: Cursor::new(text, delim),
        }
    }

    /// Tags of the current token
    pub fn tags(&self) -> Option<&T> {
        self.cursor.tags.as_ref()
    }
}

impl<'a, T: Tags<'a>> TokenStream for ParsedTokens<'a, T> {
    fn advance(&mut self) -> bool {
        self.cursor.step(&mut |_: &(Surface<'a>, T)| true)
    }

    fn token(&self) -> &Token {
        &self.cursor.token
    }

    fn token_mut(&mut self) -> &mut Token {
        &mut self.cursor.token
    }
}

/// Words accepted by a predicate, as tokens
///
/// Rejected words are skipped entirely: they take no position, so the
/// positions of emitted tokens stay consecutive.
pub struct FilteredTokens<'a, F, T = ()> {
    cursor: Cursor<'a, T>,
    predicate: F,
}

impl<'a, F> FilteredTokens<'a, F, ()>
where
    F: FnMut(&(Surface<'a>, ())) -> bool,
{
    /// Tokens of `text` whose surface passes `predicate`
    pub fn new(text: &'a str, predicate: F) -> Self {
        Self::typed(text, WORD_DELIM, predicate)
    }
}

impl<'a, F, T> FilteredTokens<'a, F, T>
where
    F: FnMut(&(Surface<'a>, T)) -> bool,
    T: Tags<'a>,
{
    /// Tokens of `text` whose surface and tags pass `predicate`
    pub fn typed(text: &'a str, delim: char, predicate: F) -> Self {
        Self {
            cursor: Cursor::new(text, delim),
            predicate,
        }
    }

    /// Tags of the current token
    pub fn tags(&self) -> Option<&T> {
        self.cursor.tags.as_ref()
    }
}

impl<'a, F, T> TokenStream for FilteredTokens<'a, F, T>
where
    F: FnMut(&(Surface<'a>, T)) -> bool,
    T: Tags<'a>,
{
    fn advance(&mut self) -> bool {
        self.cursor.step(&mut self.predicate)
    }

    fn token(&self) -> &Token {
        &self.cursor.token
    }

    fn token_mut(&mut self) -> &mut Token {
        &mut self.cursor.token
    }
}
