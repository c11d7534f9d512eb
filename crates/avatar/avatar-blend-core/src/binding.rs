//! Morph-name binding against the loaded avatar mesh.
//!
//! The host resolves nothing up front: signals smooth against arbitrary
//! names, and each name is looked up per write. Names with no index on the
//! loaded mesh are inert, which keeps one command stream usable across
//! avatars with different morph sets.

use hashbrown::HashMap;

/// Trait for resolving morph names to influence-array indices.
/// Hosts implement this over whatever the loaded mesh exposes; tests and the
/// common case use MorphDictionary.
pub trait MorphResolver {
    fn resolve(&self, name: &str) -> Option<usize>;
}

/// Name → influence-array index map, built once from the mesh's morph names
/// in declaration order.
#[derive(Clone, Debug, Default)]
pub struct MorphDictionary {
    index: HashMap<String, usize>,
}

impl MorphDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the mesh's morph names; index i maps to influences[i].
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let index = names
            .into_iter()
            .enumerate()
            .map(|(i, n)| (n.into(), i))
            .collect();
        Self { index }
    }

    /// Number of morph targets, i.e. the influence-array length.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl MorphResolver for MorphDictionary {
    fn resolve(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_declared_names_only() {
        let dict = MorphDictionary::from_names(["A", "E", "MouthOpen"]);
        assert_eq!(dict.resolve("A"), Some(0));
        assert_eq!(dict.resolve("MouthOpen"), Some(2));
        assert_eq!(dict.resolve("Nonexistent"), None);
        assert_eq!(dict.len(), 3);
    }
}
