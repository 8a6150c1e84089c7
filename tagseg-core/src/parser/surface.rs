use std::borrow::Cow;

/// Escaped surface of a word, borrowed from the parsed text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Surface<'a>(pub &'a str);

impl<'a> Surface<'a> {
    /// Surface with escapes removed
    pub fn unescape(self) -> Cow<'a, str> {
        super::unescape(self.0)
    }

    /// Whether the surface is a single whitespace character
    pub fn is_whitespace(self) -> bool {
        let text = self.unescape();
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => c.is_whitespace(),
            _ => false,
        }
    }

    /// The escaped text
    #[inline]
    pub const fn as_str(self) -> &'a str {
        self.0
    }
}

impl<'a, 'b> PartialEq<&'b str> for Surface<'a> {
    #[inline]
    fn eq(&self, &other: &&'b str) -> bool {
        self.0 == other
    }
}

impl<'a> From<Surface<'a>> for String {
    #[inline]
    fn from(surface: Surface<'a>) -> Self {
        surface.unescape().into_owned()
    }
}

impl AsRef<str> for Surface<'_> {
    #[inline]
    fn as_ref(&self) -> &str {
        self.0
    }
}

impl std::ops::Deref for Surface<'_> {
    type Target = str;

    #[inline]
    fn deref(&self) -> &str {
        self.0
    }
}
