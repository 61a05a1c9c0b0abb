//! String interner for efficient symbol storage.
//!
//! The [`Interner`] deduplicates strings and assigns each unique string a
//! [`Name`] (an index). Equal byte sequences always map to the same `Name`,
//! so equality checks elsewhere in the compiler are integer comparisons.
//!
//! Storage is a single monotonically growing byte buffer plus an
//! `(offset, len)` side table; a content-hash bucket table with chained
//! entries gives O(1) average lookup. Nothing is ever freed: a `Name` is
//! valid for the lifetime of the compilation.

use serde::Serialize;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::Hasher;

use parking_lot::Mutex;

/// An interned string identifier.
///
/// This is a lightweight handle (just a `u32`) that can be used to
/// retrieve the original string from an [`Interner`].
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash, Serialize)]
pub struct Name(pub u32);

/// Internal interner state.
#[derive(Debug)]
struct Internal {
    /// The byte arena. Grows monotonically; offsets below `buf.len()` are
    /// stable forever.
    buf: String,
    /// `(offset, len)` of each interned string, indexed by `Name`.
    spans: Vec<(u32, u32)>,
    /// Content hash -> chain of names with that hash.
    buckets: HashMap<u64, Vec<Name>>,
}

impl Internal {
    fn text(&self, name: Name) -> &str {
        let (offset, len) = self.spans[name.0 as usize];
        &self.buf[offset as usize..(offset + len) as usize]
    }
}

fn content_hash(s: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    hasher.write(s.as_bytes());
    hasher.finish()
}

/// A thread-safe string interner.
///
/// Interns strings to produce [`Name`] handles that can be compared
/// cheaply and used to retrieve the original string.
#[derive(Debug)]
pub struct Interner {
    data: Mutex<Internal>,
}

impl Interner {
    /// Create a new empty interner.
    pub fn new() -> Interner {
        Interner {
            data: Mutex::new(Internal {
                buf: String::new(),
                spans: Vec::new(),
                buckets: HashMap::new(),
            }),
        }
    }

    /// Intern a string, returning its unique [`Name`].
    ///
    /// If the string was already interned, returns the existing name.
    pub fn intern(&self, s: &str) -> Name {
        let mut data = self.data.lock();
        let hash = content_hash(s);

        if let Some(chain) = data.buckets.get(&hash) {
            for &name in chain {
                if data.text(name) == s {
                    return name;
                }
            }
        }

        let offset = data.buf.len() as u32;
        data.buf.push_str(s);

        let name = Name(data.spans.len() as u32);
        data.spans.push((offset, s.len() as u32));
        data.buckets.entry(hash).or_default().push(name);

        name
    }

    /// Get the string for a previously interned [`Name`].
    pub fn str(&self, name: Name) -> String {
        let data = self.data.lock();
        data.text(name).to_string()
    }

    /// Number of distinct strings interned so far.
    pub fn len(&self) -> usize {
        self.data.lock().spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_deduplicates() {
        let interner = Interner::new();

        assert_eq!(Name(0), interner.intern("hello"));
        assert_eq!(Name(0), interner.intern("hello"));

        assert_eq!(Name(1), interner.intern("world"));
        assert_eq!(Name(1), interner.intern("world"));

        assert_eq!("hello", interner.str(Name(0)));
        assert_eq!("world", interner.str(Name(1)));
    }

    #[test]
    fn test_distinct_content_distinct_names() {
        let interner = Interner::new();

        let a = interner.intern("proc");
        let b = interner.intern("proc_");
        let c = interner.intern("pro");

        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);
        assert_eq!(interner.len(), 3);
    }

    #[test]
    fn test_empty_and_long_strings() {
        let interner = Interner::new();

        let empty = interner.intern("");
        assert_eq!(interner.str(empty), "");

        let long = "x".repeat(4096);
        let name = interner.intern(&long);
        assert_eq!(interner.str(name), long);
        assert_eq!(interner.intern(&long), name);
    }
}
