//! Deterministic hash-based symbol identity.
//!
//! Emitted instructions reference classes, functions, methods and global
//! variables by [`SymbolHash`] rather than by name. The hash is computed from
//! the name with XXHash64 and mixed with a per-domain constant, so a class
//! and a free function that share a name still get distinct identities.
//!
//! The language has no overloading, so parameter types do not take part in
//! the hash.
//!
//! ```
//! use classgen_core::SymbolHash;
//!
//! let a = SymbolHash::from_function("main");
//! let b = SymbolHash::from_function("main");
//! assert_eq!(a, b);
//! assert_ne!(a, SymbolHash::from_class("main"));
//! ```

use std::fmt;
use xxhash_rust::xxh64::xxh64;

/// Domain-specific mixing constants for hash computation.
pub mod hash_constants {
    /// Domain marker for class hashes
    pub const CLASS: u64 = 0x2fac10b63a6cc57c;

    /// Domain marker for free function hashes
    pub const FUNCTION: u64 = 0x5ea77ffbcdf5f302;

    /// Domain marker for method hashes
    pub const METHOD: u64 = 0x7d3c8b4a92e15f6d;

    /// Domain marker for global variable hashes
    pub const GLOBAL: u64 = 0x1a095090689d4647;
}

/// A deterministic 64-bit hash identifying a class, function, method or
/// global variable.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct SymbolHash(pub u64);

impl SymbolHash {
    /// Empty/invalid hash constant.
    pub const EMPTY: SymbolHash = SymbolHash(0);

    /// Hash of a class name.
    #[inline]
    pub fn from_class(name: &str) -> Self {
        SymbolHash(hash_constants::CLASS ^ xxh64(name.as_bytes(), 0))
    }

    /// Hash of a free function.
    #[inline]
    pub fn from_function(name: &str) -> Self {
        SymbolHash(hash_constants::FUNCTION ^ xxh64(name.as_bytes(), 0))
    }

    /// Hash of a method, qualified by its owning class.
    ///
    /// The owner is folded in with a multiply so `A::b` and `B::a` never
    /// cancel out the way a plain XOR of both names could.
    #[inline]
    pub fn from_method(owner: SymbolHash, name: &str) -> Self {
        let name_hash = xxh64(name.as_bytes(), 0);
        SymbolHash(
            (hash_constants::METHOD ^ owner.0)
                .wrapping_mul(0x9e3779b97f4a7c15)
                .wrapping_add(name_hash),
        )
    }

    /// Hash of a global variable.
    #[inline]
    pub fn from_global(name: &str) -> Self {
        SymbolHash(hash_constants::GLOBAL ^ xxh64(name.as_bytes(), 0))
    }

    /// Check if this is an empty/invalid hash.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Get the underlying u64 value.
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for SymbolHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolHash({:#018x})", self.0)
    }
}

impl fmt::Display for SymbolHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}
