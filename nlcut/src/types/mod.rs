//! Particle types and unordered pairs of them

use std::{collections::HashMap, fmt::Display};

use anyhow::{Result, anyhow};

/// Dense index of a particle type (types are never removed, so indices stay valid)
pub type TypeID = usize;

/// Unordered pair of particle types
///
/// The pair is stored with the lower type first, so `(A,B)` and `(B,A)` hash
/// and compare equal.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct TypePair {
    lo: TypeID,
    hi: TypeID
}

impl TypePair {
    pub const fn new(type_a: TypeID, type_b: TypeID) -> Self {
        if type_a <= type_b {
            Self { lo: type_a, hi: type_b }
        }
        else {
            Self { lo: type_b, hi: type_a }
        }
    }

    /// Get both types (lower one first)
    pub fn get_types(&self) -> (TypeID, TypeID) {
        (self.lo, self.hi)
    }

    pub fn contains(&self, typ: TypeID) -> bool {
        self.lo == typ || self.hi == typ
    }

    /// Iterate over all unordered pairs that can be formed from the first
    /// `num_types` types
    pub fn all(num_types: usize) -> impl Iterator<Item = TypePair> {
        (0..num_types).flat_map(move |lo| (lo..num_types).map(move |hi| TypePair { lo, hi }))
    }
}

impl Display for TypePair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.lo, self.hi)
    }
}

/* -- Type registry -- */

/// Registry of named particle types
///
/// Types can only be added. A type added between two runs simply creates new
/// pairs that nobody has defined a cutoff for yet.
#[derive(Clone, Debug, Default)]
pub struct TypeRegistry {
    /// Type names by ID
    names: Vec<String>,
    /// Fast lookup table for names
    name_table: HashMap<String, TypeID>
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new type and return its ID
    pub fn add_type<S: Into<String>>(&mut self, name: S) -> Result<TypeID> {
        let name = name.into();
        if name.is_empty() {
            return Err(anyhow!("Cannot add particle type with empty name"));
        }
        if self.name_table.contains_key(&name) {
            return Err(anyhow!("Particle type {} illegally redefined", name));
        }
        let id = self.names.len();
        self.name_table.insert(name.clone(), id);
        self.names.push(name);
        Ok(id)
    }

    pub fn get_type_by_name(&self, name: &str) -> Option<TypeID> {
        self.name_table.get(name).copied()
    }

    pub fn get_name(&self, id: TypeID) -> Option<&str> {
        self.names.get(id).map(|name| name.as_str())
    }

    /// Resolve a pair of type names
    pub fn get_pair_by_names(&self, name_a: &str, name_b: &str) -> Result<TypePair> {
        let type_a = self.get_type_by_name(name_a)
            .ok_or(anyhow!("Cannot find particle type {}", name_a))?;
        let type_b = self.get_type_by_name(name_b)
            .ok_or(anyhow!("Cannot find particle type {}", name_b))?;
        Ok(TypePair::new(type_a, type_b))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeID, &str)> {
        self.names.iter().enumerate().map(|(id, name)| (id, name.as_str()))
    }

    /// All unordered pairs of the currently registered types
    pub fn pairs(&self) -> impl Iterator<Item = TypePair> {
        TypePair::all(self.len())
    }

    /// Human readable form of a pair, e.g. `(A,B)`
    pub fn format_pair(&self, pair: TypePair) -> String {
        let (lo, hi) = pair.get_types();
        match (self.get_name(lo), self.get_name(hi)) {
            (Some(lo), Some(hi)) => format!("({},{})", lo, hi),
            _ => pair.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_is_unordered() {
        assert_eq!(TypePair::new(0, 1), TypePair::new(1, 0));
        assert_eq!(TypePair::new(3, 1).get_types(), (1, 3));
        assert!(TypePair::new(2, 5).contains(5));
        assert!(!TypePair::new(2, 5).contains(4));
    }

    #[test]
    fn all_pairs() {
        let pairs = TypePair::all(3).collect::<Vec<_>>();
        assert_eq!(pairs.len(), 6);
        assert_eq!(pairs[0], TypePair::new(0, 0));
        assert_eq!(pairs[5], TypePair::new(2, 2));
        assert_eq!(TypePair::all(0).count(), 0);
    }

    #[test]
    fn registry() {
        let mut types = TypeRegistry::new();
        assert_eq!(types.add_type("A").unwrap(), 0);
        assert_eq!(types.add_type("B").unwrap(), 1);
        assert!(types.add_type("A").is_err());
        assert!(types.add_type("").is_err());
        assert_eq!(types.get_type_by_name("B"), Some(1));
        assert_eq!(types.get_type_by_name("C"), None);
        assert_eq!(types.get_pair_by_names("B", "A").unwrap(), TypePair::new(0, 1));
        assert!(types.get_pair_by_names("A", "C").is_err());
        assert_eq!(types.format_pair(TypePair::new(1, 0)), "(A,B)");
        assert_eq!(types.pairs().count(), 3);
    }
}
