//! Deterministic hash-based type identity.
//!
//! [`TypeHash`] is a 64-bit hash computed from a type's name (and, for
//! generic instances, its type arguments). Two [`DataType`](crate::DataType)
//! values describe the same type exactly when their hashes are equal, so
//! type comparisons in the semantic model never need string compares.
//!
//! # Examples
//!
//! ```
//! use convfix_core::TypeHash;
//!
//! let int_hash = TypeHash::from_name("int");
//! assert_eq!(int_hash, TypeHash::from_name("int"));
//!
//! let list_int = TypeHash::from_generic(TypeHash::from_name("List"), &[int_hash]);
//! let list_long = TypeHash::from_generic(TypeHash::from_name("List"), &[TypeHash::from_name("long")]);
//! assert_ne!(list_int, list_long);
//! ```

use std::fmt;
use xxhash_rust::xxh64::xxh64;

/// Domain-specific mixing constants for hash computation.
pub mod hash_constants {
    /// Separator constant for argument mixing.
    pub const SEP: u64 = 0x4bc94d6bd06053ad;

    /// Domain marker for named type hashes.
    pub const TYPE: u64 = 0x2fac10b63a6cc57c;

    /// Domain marker for array types.
    pub const ARRAY: u64 = 0x7d3c8b4a92e15f6d;

    /// Argument position mixing constants.
    /// Each position gets a unique constant so argument order matters.
    pub const ARG_MARKERS: [u64; 8] = [
        0x9e3779b97f4a7c15,
        0xbf58476d1ce4e5b9,
        0x94d049bb133111eb,
        0xd6e8feb86659fd93,
        0xe7037ed1a0b428db,
        0xc6a4a7935bd1e995,
        0x8648dbbc94d49b8d,
        0xa2b48b2c69e0d657,
    ];
}

/// A deterministic 64-bit hash identifying a type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeHash(pub u64);

impl TypeHash {
    /// Empty/invalid hash constant.
    pub const EMPTY: TypeHash = TypeHash(0);

    /// Create a type hash from a type name.
    #[inline]
    pub fn from_name(name: &str) -> Self {
        TypeHash(hash_constants::TYPE ^ xxh64(name.as_bytes(), 0))
    }

    /// Create the hash of a generic instance from its definition hash and
    /// argument hashes. `Map<int, string>` and `Map<string, int>` differ.
    #[inline]
    pub fn from_generic(definition: TypeHash, args: &[TypeHash]) -> Self {
        let mut hash = definition.0;
        for (i, arg) in args.iter().enumerate() {
            let marker = hash_constants::ARG_MARKERS
                .get(i)
                .copied()
                .unwrap_or_else(|| hash_constants::ARG_MARKERS[0].wrapping_add(i as u64));
            hash = hash
                .wrapping_mul(hash_constants::SEP)
                .wrapping_add(marker ^ arg.0);
        }
        TypeHash(hash)
    }

    /// Create the hash of an array of `element` with the given rank.
    #[inline]
    pub fn from_array(element: TypeHash, rank: u8) -> Self {
        TypeHash(
            (element.0 ^ hash_constants::ARRAY)
                .wrapping_mul(hash_constants::SEP)
                .wrapping_add(rank as u64),
        )
    }

    /// Check if this is an empty/invalid hash.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHash({:#018x})", self.0)
    }
}
