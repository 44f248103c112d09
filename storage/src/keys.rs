//! KV key layout for namespaced storage.
//!
//! ```text
//! nskv:{namespace}:{logical_key}   → codec-encoded value
//! ```
//!
//! The logical key is recovered by removing the exact
//! `nskv:{namespace}:` prefix. Logical keys may contain the separator, the
//! namespace, or the global prefix; only the leading prefix is stripped.
//! Namespaces may not contain the separator, otherwise `("a:b", "z")` and
//! `("a", "b:z")` would share a physical key.

use std::borrow::Cow;

use crate::error::{Result, StorageError};

/// Fixed prefix shared by every namespace, separating these keys from
/// unrelated data in the same store.
pub const GLOBAL_PREFIX: &str = "nskv";

/// Separator between key components.
pub const SEPARATOR: char = ':';

/// Reject namespaces that would make physical keys ambiguous.
pub fn validate_namespace(namespace: &str) -> Result<()> {
    if namespace.contains(SEPARATOR) {
        return Err(StorageError::Config(format!(
            "namespace {namespace:?} must not contain {SEPARATOR:?}"
        )));
    }
    Ok(())
}

/// Prefix shared by all physical keys of a namespace.
/// Format: "nskv:{namespace}:"
pub fn namespace_prefix(namespace: &str) -> String {
    format!("{GLOBAL_PREFIX}{SEPARATOR}{namespace}{SEPARATOR}")
}

/// Physical key for a logical key in a namespace.
/// Format: "nskv:{namespace}:{key}"
pub fn physical_key(namespace: &str, key: &str) -> String {
    format!("{GLOBAL_PREFIX}{SEPARATOR}{namespace}{SEPARATOR}{key}")
}

/// Recover the logical key from a physical key, given the namespace prefix
/// from [`namespace_prefix`]. Returns `None` when the physical key belongs
/// to another namespace.
pub fn strip_namespace<'a>(prefix: &str, physical: &'a str) -> Option<&'a str> {
    physical.strip_prefix(prefix)
}

/// Anything usable as a logical key.
///
/// Text is used as-is. Bytes are decoded as UTF-8 with invalid sequences
/// replaced, so the same bytes always map to the same key. Integers use
/// their decimal form.
pub trait LogicalKey {
    fn to_key(&self) -> Cow<'_, str>;
}

impl LogicalKey for str {
    fn to_key(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

impl LogicalKey for String {
    fn to_key(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }
}

impl LogicalKey for [u8] {
    fn to_key(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self)
    }
}

impl LogicalKey for Vec<u8> {
    fn to_key(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self)
    }
}

impl<const N: usize> LogicalKey for [u8; N] {
    fn to_key(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self)
    }
}

impl<T: LogicalKey + ?Sized> LogicalKey for &T {
    fn to_key(&self) -> Cow<'_, str> {
        (**self).to_key()
    }
}

macro_rules! int_logical_key {
    ($($t:ty),*) => {
        $(
            impl LogicalKey for $t {
                fn to_key(&self) -> Cow<'_, str> {
                    Cow::Owned(self.to_string())
                }
            }
        )*
    };
}

int_logical_key!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
