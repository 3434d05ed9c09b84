//! String interning.
//!
//! [`Interner`] canonicalizes byte sequences to stable `(ptr, len)` handles:
//! identical bytes always intern to the same [`Symbol`]. Storage is a bump
//! arena (`bumpalo::Bump`) — allocations are never moved or freed until the
//! whole interner drops, so a `Symbol`'s borrow is valid for exactly as long
//! as the `Interner` that produced it.
//!
//! Hashing is FNV-1a over the length-delimited bytes, the usual choice for
//! a compiler's string table. `std::collections::HashMap` keyed by the
//! interned byte slice, using FNV-1a as its `BuildHasher`, gives fast
//! canonicalization without a hand-rolled table.

use std::cell::RefCell;
use std::collections::HashMap;
use std::hash::{BuildHasherDefault, Hash, Hasher};

use bumpalo::Bump;

/// FNV-1a, 64-bit variant.
#[derive(Default)]
pub struct FnvHasher(u64);

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

impl Hasher for FnvHasher {
    fn write(&mut self, bytes: &[u8]) {
        let mut hash = if self.0 == 0 { FNV_OFFSET_BASIS } else { self.0 };
        for &b in bytes {
            hash ^= b as u64;
            hash = hash.wrapping_mul(FNV_PRIME);
        }
        self.0 = hash;
    }

    fn finish(&self) -> u64 {
        self.0
    }
}

type FnvBuildHasher = BuildHasherDefault<FnvHasher>;

/// A stable handle to an interned byte string.
///
/// Two symbols compare equal iff they were interned from byte-identical
/// input — the underlying pointers are then guaranteed equal too, since the
/// arena never deduplicates are interns twice.
#[derive(Clone, Copy)]
pub struct Symbol<'i> {
    bytes: &'i [u8],
}

impl<'i> Symbol<'i> {
    pub fn as_bytes(&self) -> &'i [u8] {
        self.bytes
    }

    /// The interned spelling as `str`.
    ///
    /// # Panics
    /// Panics if the interned bytes are not valid UTF-8. Identifier and
    /// keyword spellings are always ASCII/UTF-8 by construction; this is
    /// safe to call on every `Symbol` the lexer hands out for those token
    /// kinds. Raw header-name bytes (which may contain arbitrary bytes) use
    /// [`Symbol::as_bytes`] instead.
    pub fn as_str(&self) -> &'i str {
        std::str::from_utf8(self.bytes).expect("interned identifier/keyword is not valid UTF-8")
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl PartialEq for Symbol<'_> {
    fn eq(&self, other: &Self) -> bool {
        // Interning identity: equal pointer+length, not merely equal bytes.
        // Since the arena is the sole allocator for interned bytes, this is
        // equivalent to byte equality for anything actually produced by
        // `Interner::intern`, but checking the pointer first keeps the
        // common case (comparing two symbols from the same run) O(1).
        std::ptr::eq(self.bytes, other.bytes) || self.bytes == other.bytes
    }
}

impl Eq for Symbol<'_> {}

impl Hash for Symbol<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
    }
}

impl std::fmt::Debug for Symbol<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match std::str::from_utf8(self.bytes) {
            Ok(s) => write!(f, "Symbol({s:?})"),
            Err(_) => write!(f, "Symbol({:?})", self.bytes),
        }
    }
}

impl std::fmt::Display for Symbol<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match std::str::from_utf8(self.bytes) {
            Ok(s) => f.write_str(s),
            Err(_) => write!(f, "{:?}", self.bytes),
        }
    }
}

/// Bump-allocated canonical string store.
///
/// Lifetime of every `Symbol` it returns is tied to the `Interner` itself:
/// `intern` borrows `&self`, so the interner must outlive every token that
/// carries one of its symbols. Dropping the `Interner` releases the whole
/// arena at once.
pub struct Interner {
    arena: Bump,
    // Interior mutability: `intern` only needs `&self` so a single
    // `Interner` can be shared (not aliased across threads — see the
    // crate's concurrency notes) between a `Lexer` and its caller without
    // forcing `&mut` plumbing through every lexer method.
    table: RefCell<HashMap<&'static [u8], (), FnvBuildHasher>>,
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl Interner {
    pub fn new() -> Self {
        Self {
            arena: Bump::new(),
            table: RefCell::new(HashMap::with_hasher(FnvBuildHasher::default())),
        }
    }

    /// Interns `bytes`, returning a [`Symbol`] valid for the lifetime of
    /// this interner. Byte-identical input always returns a symbol whose
    /// underlying slice is the exact same allocation.
    pub fn intern(&self, bytes: &[u8]) -> Symbol<'_> {
        let mut table = self.table.borrow_mut();
        if let Some((&existing, _)) = table.get_key_value(bytes) {
            // Safety: `existing` was allocated out of `self.arena`, which
            // outlives `self` (and hence the `'_` we're about to shrink the
            // 'static lifetime down to). The table never hands out a
            // reference with a lifetime longer than the arena backing it.
            return Symbol { bytes: existing };
        }
        let copied: &[u8] = self.arena.alloc_slice_copy(bytes);
        // Safety: see above — we immediately re-shrink this lifetime to
        // `&self` on every observable path (`intern`'s return type), so no
        // caller ever sees the artificial `'static`.
        let extended: &'static [u8] = unsafe { std::mem::transmute(copied) };
        table.insert(extended, ());
        Symbol { bytes: copied }
    }

    pub fn intern_str(&self, s: &str) -> Symbol<'_> {
        self.intern(s.as_bytes())
    }

    pub fn len(&self) -> usize {
        self.table.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.borrow().is_empty()
    }
}

/// Ergonomic shortcut for single-file CLI use: a process-wide default
/// interner, constructed lazily. Never the *only* option — every lexer API
/// also accepts a caller-owned `&Interner` (see the crate's concurrency
/// notes on why this is not a singleton by necessity).
pub fn global() -> &'static Interner {
    static GLOBAL: std::sync::OnceLock<Interner> = std::sync::OnceLock::new();
    GLOBAL.get_or_init(Interner::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_idempotence() {
        let i = Interner::new();
        let a = i.intern(b"hello");
        let b = i.intern(b"hello");
        assert_eq!(a, b);
        assert!(std::ptr::eq(a.as_bytes(), b.as_bytes()));
    }

    #[test]
    fn distinct_strings_distinct_symbols() {
        let i = Interner::new();
        let a = i.intern(b"foo");
        let b = i.intern(b"bar");
        assert_ne!(a, b);
    }

    #[test]
    fn empty_bytes_intern() {
        let i = Interner::new();
        let a = i.intern(b"");
        let b = i.intern(b"");
        assert_eq!(a, b);
        assert!(a.is_empty());
    }

    #[test]
    fn rehash_survives_many_distinct_entries() {
        let i = Interner::new();
        let mut symbols = Vec::new();
        for n in 0..4096 {
            symbols.push((n, i.intern(n.to_string().as_bytes())));
        }
        for (n, sym) in &symbols {
            assert_eq!(sym.as_str(), n.to_string());
        }
    }

    // Invariant 1 (§8, "round-trip / idempotence"): `intern(x) == intern(x)`
    // for any byte-equal `x`, over arbitrary `quickcheck`-generated inputs
    // rather than a handful of hand-picked strings.
    #[quickcheck_macros::quickcheck]
    fn intern_is_idempotent_for_arbitrary_strings(s: String) -> bool {
        let i = Interner::new();
        i.intern(s.as_bytes()) == i.intern(s.as_bytes())
    }

    #[quickcheck_macros::quickcheck]
    fn distinct_strings_never_equal_unless_byte_identical(a: String, b: String) -> bool {
        let i = Interner::new();
        let sa = i.intern(a.as_bytes());
        let sb = i.intern(b.as_bytes());
        (sa == sb) == (a.as_bytes() == b.as_bytes())
    }
}
