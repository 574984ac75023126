//! Sparse bitmap over document ids.
//!
//! A [`BitSet`] is the posting list representation: one bit per document id,
//! grouped into 32-bit words keyed by `id >> 5`. Only non-zero words are
//! stored, so a posting list costs space proportional to the number of
//! distinct 32-id blocks it touches rather than to the largest id.
//!
//! The persisted form is a flat array of `(word index, word value)` pairs in
//! ascending word order, e.g. ids `{1, 33}` serialize as `[0,2,1,2]`.
//!
//! ```
//! use bitsearch::bitset::BitSet;
//!
//! let mut a: BitSet = [1, 2, 40].into_iter().collect();
//! let b: BitSet = [2, 40, 99].into_iter().collect();
//!
//! a.and(&b);
//! assert_eq!(a.iter().collect::<Vec<_>>(), vec![2, 40]);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{self, Deserializer, SeqAccess, Visitor};
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};

use crate::error::{BitsearchError, Result};
use crate::storage::StorageError;

/// Document identifier.
pub type DocId = u32;

const WORD_BITS: u32 = 32;

#[inline]
fn split(id: DocId) -> (u32, u32) {
    (id >> 5, 1u32 << (id & 31))
}

/// A sparse set of document ids.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct BitSet {
    words: BTreeMap<u32, u32>,
}

impl BitSet {
    /// Create an empty bitset.
    pub fn new() -> Self {
        BitSet::default()
    }

    /// Add `id`. Returns `true` if it was not already present.
    pub fn add(&mut self, id: DocId) -> bool {
        let (word, mask) = split(id);
        let value = self.words.entry(word).or_insert(0);
        let added = *value & mask == 0;
        *value |= mask;
        added
    }

    /// Remove `id`. Returns `true` if it was present.
    pub fn remove(&mut self, id: DocId) -> bool {
        let (word, mask) = split(id);
        let Some(value) = self.words.get_mut(&word) else {
            return false;
        };
        let removed = *value & mask != 0;
        *value &= !mask;
        if *value == 0 {
            self.words.remove(&word);
        }
        removed
    }

    pub fn contains(&self, id: DocId) -> bool {
        let (word, mask) = split(id);
        self.words.get(&word).is_some_and(|value| value & mask != 0)
    }

    /// Number of ids in the set.
    pub fn len(&self) -> usize {
        self.words.values().map(|v| v.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn clear(&mut self) {
        self.words.clear();
    }

    /// Iterate ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = DocId> + '_ {
        self.words.iter().flat_map(|(&word, &value)| {
            let base = word * WORD_BITS;
            (0..WORD_BITS)
                .filter(move |&bit| value & (1u32 << bit) != 0)
                .map(move |bit| base + bit)
        })
    }

    /// Union `other` into this set.
    pub fn or(&mut self, other: &BitSet) -> &mut Self {
        for (&word, &value) in &other.words {
            *self.words.entry(word).or_insert(0) |= value;
        }
        self
    }

    /// Intersect this set with `other`.
    pub fn and(&mut self, other: &BitSet) -> &mut Self {
        self.words.retain(|word, value| {
            *value &= other.words.get(word).copied().unwrap_or(0);
            *value != 0
        });
        self
    }

    /// Remove every id of `other` from this set.
    pub fn and_not(&mut self, other: &BitSet) -> &mut Self {
        self.words.retain(|word, value| {
            *value &= !other.words.get(word).copied().unwrap_or(0);
            *value != 0
        });
        self
    }

    /// Number of stored (non-zero) words.
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// The flat `[word, value, word, value, ..]` form.
    pub fn to_array(&self) -> Vec<u32> {
        self.words
            .iter()
            .flat_map(|(&word, &value)| [word, value])
            .collect()
    }

    /// Rebuild a bitset from its flat form. Zero words are dropped.
    pub fn from_array(pairs: &[u32]) -> Result<Self> {
        if pairs.len() % 2 != 0 {
            return Err(BitsearchError::Storage(StorageError::Corrupt(format!(
                "bitset array has odd length {}",
                pairs.len()
            ))));
        }
        let mut words = BTreeMap::new();
        for pair in pairs.chunks_exact(2) {
            if pair[1] != 0 {
                *words.entry(pair[0]).or_insert(0) |= pair[1];
            }
        }
        Ok(BitSet { words })
    }
}

impl fmt::Debug for BitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<DocId> for BitSet {
    fn from_iter<I: IntoIterator<Item = DocId>>(iter: I) -> Self {
        let mut set = BitSet::new();
        set.extend(iter);
        set
    }
}

impl Extend<DocId> for BitSet {
    fn extend<I: IntoIterator<Item = DocId>>(&mut self, iter: I) {
        for id in iter {
            self.add(id);
        }
    }
}

impl Serialize for BitSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.words.len() * 2))?;
        for (word, value) in &self.words {
            seq.serialize_element(word)?;
            seq.serialize_element(value)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for BitSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct PairsVisitor;

        impl<'de> Visitor<'de> for PairsVisitor {
            type Value = BitSet;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a flat array of (word, value) pairs")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<BitSet, A::Error> {
                let mut pairs = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(n) = seq.next_element::<u32>()? {
                    pairs.push(n);
                }
                BitSet::from_array(&pairs).map_err(de::Error::custom)
            }
        }

        deserializer.deserialize_seq(PairsVisitor)
    }
}
