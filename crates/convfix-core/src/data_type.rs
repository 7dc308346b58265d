//! Resolved data types as seen by the semantic model.
//!
//! A [`DataType`] is a named type with optional generic arguments and an
//! optional array rank. Identity is the [`TypeHash`] computed from all
//! three, so `List<int>` and `List<long>` are different types while two
//! separately constructed `List<int>` values compare equal.
//!
//! # Example
//!
//! ```text
//! int          -> DataType { name: "int", args: [], array_rank: 0 }
//! List<Order>  -> DataType { name: "List", args: [Order], array_rank: 0 }
//! int[]        -> DataType { name: "int", args: [], array_rank: 1 }
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::TypeHash;

/// Names of the built-in types.
pub mod primitives {
    /// `void`
    pub const VOID: &str = "void";
    /// `bool`
    pub const BOOL: &str = "bool";
    /// `int` (32-bit signed)
    pub const INT: &str = "int";
    /// `long` (64-bit signed)
    pub const LONG: &str = "long";
    /// `float`
    pub const FLOAT: &str = "float";
    /// `double`
    pub const DOUBLE: &str = "double";
    /// `string`
    pub const STRING: &str = "string";
    /// Type of the `null` literal.
    pub const NULL: &str = "null";

    /// Generic definitions whose instances are lazily produced sequences.
    pub const SEQUENCE_TYPES: [&str; 2] = ["IEnumerable", "IEnumerator"];
}

/// A resolved type.
#[derive(Clone)]
pub struct DataType {
    name: String,
    args: Vec<DataType>,
    array_rank: u8,
    hash: TypeHash,
}

impl DataType {
    /// A non-generic named type.
    pub fn named(name: impl Into<String>) -> Self {
        Self::generic(name, Vec::new())
    }

    /// A generic instance such as `List<int>`.
    pub fn generic(name: impl Into<String>, args: Vec<DataType>) -> Self {
        let name = name.into();
        let arg_hashes: Vec<TypeHash> = args.iter().map(|a| a.hash).collect();
        let hash = TypeHash::from_generic(TypeHash::from_name(&name), &arg_hashes);
        Self {
            name,
            args,
            array_rank: 0,
            hash,
        }
    }

    /// An array of `self` with one more dimension.
    pub fn array_of(self) -> Self {
        let rank = self.array_rank + 1;
        self.with_rank(rank)
    }

    fn with_rank(self, rank: u8) -> Self {
        let base = TypeHash::from_generic(
            TypeHash::from_name(&self.name),
            &self.args.iter().map(|a| a.hash).collect::<Vec<_>>(),
        );
        let hash = if rank == 0 {
            base
        } else {
            TypeHash::from_array(base, rank)
        };
        Self {
            array_rank: rank,
            hash,
            ..self
        }
    }

    /// `void`
    pub fn void() -> Self {
        Self::named(primitives::VOID)
    }

    /// `bool`
    pub fn bool() -> Self {
        Self::named(primitives::BOOL)
    }

    /// `int`
    pub fn int() -> Self {
        Self::named(primitives::INT)
    }

    /// `long`
    pub fn long() -> Self {
        Self::named(primitives::LONG)
    }

    /// `float`
    pub fn float() -> Self {
        Self::named(primitives::FLOAT)
    }

    /// `double`
    pub fn double() -> Self {
        Self::named(primitives::DOUBLE)
    }

    /// `string`
    pub fn string() -> Self {
        Self::named(primitives::STRING)
    }

    /// The type of the `null` literal.
    pub fn null_literal() -> Self {
        Self::named(primitives::NULL)
    }

    /// The base name, without generic arguments or array suffix.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Generic arguments (empty for non-generic types).
    #[inline]
    pub fn type_args(&self) -> &[DataType] {
        &self.args
    }

    /// Number of array dimensions (0 for non-arrays).
    #[inline]
    pub fn array_rank(&self) -> u8 {
        self.array_rank
    }

    /// The identity hash of this type.
    #[inline]
    pub fn type_hash(&self) -> TypeHash {
        self.hash
    }

    #[inline]
    pub fn is_array(&self) -> bool {
        self.array_rank > 0
    }

    #[inline]
    pub fn is_void(&self) -> bool {
        !self.is_array() && self.name == primitives::VOID
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        !self.is_array() && self.name == primitives::NULL
    }

    #[inline]
    pub fn is_bool(&self) -> bool {
        !self.is_array() && self.name == primitives::BOOL
    }

    /// Position in the implicit numeric promotion order, if numeric.
    ///
    /// `int < long < float < double`
    pub fn numeric_rank(&self) -> Option<u8> {
        if self.is_array() {
            return None;
        }
        match self.name.as_str() {
            primitives::INT => Some(0),
            primitives::LONG => Some(1),
            primitives::FLOAT => Some(2),
            primitives::DOUBLE => Some(3),
            _ => None,
        }
    }

    #[inline]
    pub fn is_numeric(&self) -> bool {
        self.numeric_rank().is_some()
    }

    /// The wider of two numeric types, or `None` if either is not numeric.
    pub fn promote(&self, other: &DataType) -> Option<DataType> {
        let lhs = self.numeric_rank()?;
        let rhs = other.numeric_rank()?;
        Some(if lhs >= rhs { self.clone() } else { other.clone() })
    }

    /// Whether this is a lazily produced sequence (`IEnumerable<T>`,
    /// `IEnumerator<T>`), the return type of a function that yields.
    pub fn is_lazy_sequence(&self) -> bool {
        !self.is_array()
            && self.args.len() == 1
            && primitives::SEQUENCE_TYPES.contains(&self.name.as_str())
    }

    /// The element type of an array or single-argument generic collection.
    pub fn element_type(&self) -> Option<DataType> {
        if self.is_array() {
            let rank = self.array_rank - 1;
            return Some(self.clone().with_rank(rank));
        }
        match self.args.as_slice() {
            [element] => Some(element.clone()),
            _ => None,
        }
    }
}

impl PartialEq for DataType {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for DataType {}

impl Hash for DataType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.hash.hash(state);
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.args.is_empty() {
            f.write_str("<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{arg}")?;
            }
            f.write_str(">")?;
        }
        for _ in 0..self.array_rank {
            f.write_str("[]")?;
        }
        Ok(())
    }
}

impl fmt::Debug for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DataType({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_source_form() {
        let list = DataType::generic("Map", vec![DataType::string(), DataType::int().array_of()]);
        assert_eq!(list.to_string(), "Map<string, int[]>");
    }

    #[test]
    fn equality_is_structural() {
        let a = DataType::generic("List", vec![DataType::named("Order")]);
        let b = DataType::generic("List", vec![DataType::named("Order")]);
        let c = DataType::generic("List", vec![DataType::named("OrderDto")]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn array_is_distinct_from_element() {
        let int = DataType::int();
        let arr = int.clone().array_of();
        assert_ne!(int, arr);
        assert_eq!(arr.element_type(), Some(int));
    }

    #[test]
    fn numeric_promotion() {
        assert_eq!(DataType::int().promote(&DataType::long()), Some(DataType::long()));
        assert_eq!(DataType::double().promote(&DataType::float()), Some(DataType::double()));
        assert_eq!(DataType::int().promote(&DataType::string()), None);
        assert_eq!(DataType::int().array_of().numeric_rank(), None);
    }

    #[test]
    fn lazy_sequence_types() {
        let seq = DataType::generic("IEnumerable", vec![DataType::int()]);
        assert!(seq.is_lazy_sequence());
        assert_eq!(seq.element_type(), Some(DataType::int()));

        assert!(!DataType::generic("List", vec![DataType::int()]).is_lazy_sequence());
        assert!(!DataType::named("IEnumerable").is_lazy_sequence());
    }

    #[test]
    fn primitive_predicates() {
        assert!(DataType::void().is_void());
        assert!(DataType::null_literal().is_null());
        assert!(DataType::bool().is_bool());
        assert!(!DataType::bool().is_numeric());
    }
}
