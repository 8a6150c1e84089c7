use super::{find_unescaped, Surface};
use crate::TAG_DELIM;
use std::str::FromStr;

/// Decode a value from the fields of one word
///
/// Missing fields decode as empty, extra fields are left in the iterator.
pub trait Tags<'a> {
    /// Consume as many fields as this type needs
    fn from_tags<I: Iterator<Item = &'a str>>(tags: &mut I) -> Self;
}

macro_rules! impl_tags {
    ($($ty:ident),* $(,)?) => {
        #[allow(non_snake_case)]
        impl<'a, $($ty: Tags<'a>,)*> Tags<'a> for ($($ty,)*) {
            fn from_tags<I: Iterator<Item = &'a str>>(tags: &mut I) -> Self {
                $(
                    let $ty = <$ty as Tags<'a>>::from_tags(tags);
                )*
                ($($ty,)*)
            }
        }
    };
}

impl<'a> Tags<'a> for () {
    fn from_tags<I: Iterator<Item = &'a str>>(_tags: &mut I) -> Self {}
}

impl_tags! { T1 }
impl_tags! { T1, T2 }
impl_tags! { T1, T2, T3 }
impl_tags! { T1, T2, T3, T4 }

impl<'a> Tags<'a> for &'a str {
    fn from_tags<I: Iterator<Item = &'a str>>(tags: &mut I) -> Self {
        tags.next().unwrap_or("")
    }
}

impl<'a> Tags<'a> for String {
    fn from_tags<I: Iterator<Item = &'a str>>(tags: &mut I) -> Self {
        super::unescape(<&str as Tags>::from_tags(tags)).into_owned()
    }
}

impl<'a> Tags<'a> for Option<&'a str> {
    fn from_tags<I: Iterator<Item = &'a str>>(tags: &mut I) -> Self {
        tags.next().filter(|t| !t.is_empty())
    }
}

impl<'a> Tags<'a> for Surface<'a> {
    fn from_tags<I: Iterator<Item = &'a str>>(tags: &mut I) -> Self {
        Surface(<&str as Tags>::from_tags(tags))
    }
}

/// One field parsed into a typed tag
///
/// The field is unescaped before parsing. A missing field, or one that `T`
/// does not recognise, decodes as `T::default()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Parsed<T>(pub T);

impl<'a, T: FromStr + Default> Tags<'a> for Parsed<T> {
    fn from_tags<I: Iterator<Item = &'a str>>(tags: &mut I) -> Self {
        let value = tags
            .next()
            .and_then(|field| super::unescape(field).parse().ok())
            .unwrap_or_default();
        Parsed(value)
    }
}

/// Iterator over the `/`-separated fields of one escaped word
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct TagFields<'a> {
    inner: &'a str,
}

impl<'a> From<&'a str> for TagFields<'a> {
    fn from(inner: &'a str) -> Self {
        Self { inner }
    }
}

impl<'a> Iterator for TagFields<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.inner.is_empty() {
            return None;
        }

        let ind = find_unescaped(self.inner, TAG_DELIM);
        let field = &self.inner[..ind];
        self.inner = if ind == self.inner.len() {
            ""
        } else {
            &self.inner[ind + TAG_DELIM.len_utf8()..]
        };

        Some(field)
    }
}
