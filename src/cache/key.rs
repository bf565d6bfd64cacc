//! Cache Key Module
//!
//! Builds structured cache keys such as `subreddit:rust:hot`.

use std::borrow::Cow;

// == Key Part ==
/// A value that may contribute one segment to a cache key.
///
/// `None` parts are skipped when the key is built.
pub trait KeyPart {
    fn key_part(&self) -> Option<Cow<'_, str>>;
}

impl KeyPart for str {
    fn key_part(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self))
    }
}

impl KeyPart for String {
    fn key_part(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self.as_str()))
    }
}

impl<T: KeyPart + ?Sized> KeyPart for &T {
    fn key_part(&self) -> Option<Cow<'_, str>> {
        (**self).key_part()
    }
}

impl<T: KeyPart> KeyPart for Option<T> {
    fn key_part(&self) -> Option<Cow<'_, str>> {
        self.as_ref().and_then(|part| part.key_part())
    }
}

macro_rules! impl_key_part_display {
    ($($t:ty),*) => {
        $(
            impl KeyPart for $t {
                fn key_part(&self) -> Option<Cow<'_, str>> {
                    Some(Cow::Owned(self.to_string()))
                }
            }
        )*
    };
}

impl_key_part_display!(bool, char, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

// == Create Key ==
/// Joins the present parts with `:` and lowercases the result.
pub fn create_key(parts: &[&dyn KeyPart]) -> String {
    parts
        .iter()
        .filter_map(|part| part.key_part())
        .collect::<Vec<_>>()
        .join(":")
        .to_lowercase()
}

/// Builds a cache key from heterogeneous parts.
///
/// ```
/// use quota_cache::cache_key;
///
/// let key = cache_key!("a", None::<&str>, "B", 3);
/// assert_eq!(key, "a:b:3");
/// ```
#[macro_export]
macro_rules! cache_key {
    ($($part:expr),* $(,)?) => {
        $crate::cache::create_key(&[$(&$part as &dyn $crate::cache::KeyPart),*])
    };
}
