//! The insertion-ordered reference table.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{RefError, Result};
use crate::names::validate_ref_name;

/// Opaque pointer stored in a reference.
///
/// Typically a snapshot identifier or an external content hash; the store
/// never interprets it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RefTarget(String);

impl RefTarget {
    pub fn new(target: impl Into<String>) -> Self {
        Self(target.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RefTarget {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RefTarget {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for RefTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Named pointer table enumerable in first-insertion order.
///
/// There is no delete: overwriting a name keeps its original position, so
/// `ref_count` never shrinks and `ref_name_at(i)` is stable for every `i`
/// handed out so far.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "IndexMap<String, RefTarget>", into = "IndexMap<String, RefTarget>")]
pub struct ReferenceStore {
    refs: IndexMap<String, RefTarget>,
}

impl TryFrom<IndexMap<String, RefTarget>> for ReferenceStore {
    type Error = RefError;

    fn try_from(refs: IndexMap<String, RefTarget>) -> Result<Self> {
        for name in refs.keys() {
            validate_ref_name(name)?;
        }
        Ok(Self { refs })
    }
}

impl From<ReferenceStore> for IndexMap<String, RefTarget> {
    fn from(store: ReferenceStore) -> Self {
        store.refs
    }
}

impl ReferenceStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `name`.
    ///
    /// Returns the previous target when the name already existed. The name
    /// is validated before anything is written.
    pub fn set_ref(&mut self, name: &str, target: RefTarget) -> Result<Option<RefTarget>> {
        validate_ref_name(name)?;
        // `IndexMap::insert` keeps the existing slot for a known key.
        let previous = self.refs.insert(name.to_string(), target);
        debug!(name, overwrite = previous.is_some(), "ref written");
        Ok(previous)
    }

    /// Look up the target of `name`.
    pub fn get_ref(&self, name: &str) -> Result<&RefTarget> {
        self.refs.get(name).ok_or_else(|| RefError::NotFound {
            name: name.to_string(),
        })
    }

    /// Number of distinct names ever written.
    pub fn ref_count(&self) -> usize {
        self.refs.len()
    }

    /// Name at enumeration position `index`.
    pub fn ref_name_at(&self, index: usize) -> Result<&str> {
        self.refs
            .get_index(index)
            .map(|(name, _)| name.as_str())
            .ok_or(RefError::IndexOutOfRange {
                index,
                count: self.refs.len(),
            })
    }

    /// All `(name, target)` pairs in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RefTarget)> {
        self.refs.iter().map(|(name, target)| (name.as_str(), target))
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ---- Test 1: Set and read a ref ----
    #[test]
    fn set_and_get_ref() {
        let mut store = ReferenceStore::new();
        assert_eq!(store.set_ref("main", "snap0".into()).unwrap(), None);
        assert_eq!(store.get_ref("main").unwrap().as_str(), "snap0");
        assert_eq!(store.ref_count(), 1);
    }

    // ---- Test 2: Missing ref is NotFound ----
    #[test]
    fn get_missing_ref() {
        let store = ReferenceStore::new();
        let err = store.get_ref("nope").unwrap_err();
        assert_eq!(
            err,
            RefError::NotFound {
                name: "nope".into()
            }
        );
    }

    // ---- Test 3: Overwrite keeps position ----
    #[test]
    fn overwrite_keeps_insertion_position() {
        let mut store = ReferenceStore::new();
        store.set_ref("a", "1".into()).unwrap();
        store.set_ref("b", "2".into()).unwrap();
        let previous = store.set_ref("a", "3".into()).unwrap();

        assert_eq!(previous, Some(RefTarget::from("1")));
        assert_eq!(store.ref_count(), 2);
        assert_eq!(store.ref_name_at(0).unwrap(), "a");
        assert_eq!(store.ref_name_at(1).unwrap(), "b");
        assert_eq!(store.get_ref("a").unwrap().as_str(), "3");
    }

    // ---- Test 4: Enumeration index out of range ----
    #[test]
    fn ref_name_at_out_of_range() {
        let mut store = ReferenceStore::new();
        store.set_ref("main", "x".into()).unwrap();
        let err = store.ref_name_at(1).unwrap_err();
        assert_eq!(err, RefError::IndexOutOfRange { index: 1, count: 1 });
    }

    // ---- Test 5: Invalid names leave the store untouched ----
    #[test]
    fn invalid_name_is_rejected_without_mutation() {
        let mut store = ReferenceStore::new();
        store.set_ref("main", "x".into()).unwrap();
        let before = store.clone();

        let err = store.set_ref("", "y".into()).unwrap_err();
        assert!(matches!(err, RefError::InvalidName { .. }));
        assert_eq!(store, before);
    }

    // ---- Test 6: Serialized order survives a round trip ----
    #[test]
    fn serde_preserves_order() {
        let mut store = ReferenceStore::new();
        for name in ["zeta", "alpha", "mid"] {
            store.set_ref(name, RefTarget::new(format!("{name}-target"))).unwrap();
        }
        let json = serde_json::to_string(&store).unwrap();
        assert!(json.starts_with("{\"zeta\""));

        let parsed: ReferenceStore = serde_json::from_str(&json).unwrap();
        let names: Vec<&str> = parsed.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    // ---- Test 7: Stored state with a bad name fails to load ----
    #[test]
    fn deserialize_rejects_invalid_names() {
        let parsed = serde_json::from_str::<ReferenceStore>(r#"{"":"x"}"#);
        assert!(parsed.is_err());
    }

    proptest! {
        // Positions are fixed by the first write of each name.
        #[test]
        fn position_follows_first_insertion(writes in proptest::collection::vec((0u8..8, 0u32..100), 1..64)) {
            let mut store = ReferenceStore::new();
            let mut first_seen: Vec<String> = Vec::new();
            for (name, value) in &writes {
                let name = format!("ref-{name}");
                if !first_seen.contains(&name) {
                    first_seen.push(name.clone());
                }
                store.set_ref(&name, RefTarget::new(value.to_string())).unwrap();
            }

            prop_assert_eq!(store.ref_count(), first_seen.len());
            for (i, name) in first_seen.iter().enumerate() {
                prop_assert_eq!(store.ref_name_at(i).unwrap(), name.as_str());
                let last = writes
                    .iter()
                    .rev()
                    .find(|(n, _)| format!("ref-{n}") == *name)
                    .map(|(_, v)| v.to_string())
                    .unwrap();
                prop_assert_eq!(store.get_ref(name).unwrap().as_str(), last.as_str());
            }
        }
    }
}
