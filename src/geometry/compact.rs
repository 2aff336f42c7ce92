// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Partialscan Inc.

//! Dense index-space compaction
//!
//! A mesh carries three parallel index spaces (vertices, texture coordinates,
//! normals). Pruning any of them means building an `old -> new` table over the
//! survivors and pushing every table and index row through it. This module
//! does that once, for all three.

use crate::error::{Error, Result};

/// Dense, order-preserving remap of an index space `0..n` onto `0..k`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexCompaction {
    /// `remap[old]` is the new index, or `None` when the entry was dropped
    remap: Vec<Option<usize>>,
    /// Old indices of the retained entries, ascending
    retained: Vec<usize>,
}

impl IndexCompaction {
    /// Build from a retention mask: `keep[i]` retains entry `i`.
    pub fn from_retained(keep: &[bool]) -> Self {
        let mut remap = vec![None; keep.len()];
        let mut retained = Vec::with_capacity(keep.len());

        for (old, &kept) in keep.iter().enumerate() {
            if kept {
                remap[old] = Some(retained.len());
                retained.push(old);
            }
        }

        Self { remap, retained }
    }

    /// Build from the set of indices that are still referenced.
    ///
    /// Entries of `0..len` that never appear in `references` are dropped.
    pub fn from_references<I>(len: usize, references: I) -> Result<Self>
    where
        I: IntoIterator<Item = usize>,
    {
        let mut keep = vec![false; len];
        for index in references {
            match keep.get_mut(index) {
                Some(slot) => *slot = true,
                None => {
                    return Err(Error::InvalidMesh(format!(
                        "index {} references a table of {} entries",
                        index, len
                    )))
                }
            }
        }
        Ok(Self::from_retained(&keep))
    }

    /// New index of `old`, `None` if it was dropped or never existed
    pub fn new_index(&self, old: usize) -> Option<usize> {
        self.remap.get(old).copied().flatten()
    }

    /// Old indices of the retained entries, in ascending order
    pub fn retained(&self) -> &[usize] {
        &self.retained
    }

    pub fn retained_len(&self) -> usize {
        self.retained.len()
    }

    pub fn original_len(&self) -> usize {
        self.remap.len()
    }

    pub fn dropped_len(&self) -> usize {
        self.original_len() - self.retained_len()
    }

    pub fn is_identity(&self) -> bool {
        self.dropped_len() == 0
    }

    /// Gather the retained entries of a table indexed by this space.
    ///
    /// `items` must have exactly `original_len()` entries.
    pub fn gather<T: Clone>(&self, items: &[T]) -> Result<Vec<T>> {
        if items.len() != self.original_len() {
            return Err(Error::InvalidMesh(format!(
                "table has {} entries, index space has {}",
                items.len(),
                self.original_len()
            )));
        }
        Ok(self.retained.iter().map(|&old| items[old].clone()).collect())
    }

    /// Rewrite one index row; `None` if any of its entries was dropped.
    pub fn remap_row(&self, row: &[usize]) -> Option<Vec<usize>> {
        row.iter().map(|&old| self.new_index(old)).collect()
    }

    /// Rewrite a row whose entries are all known to be retained.
    pub fn remap_rows<'a, I>(&self, rows: I) -> Result<Vec<Vec<usize>>>
    where
        I: IntoIterator<Item = &'a Vec<usize>>,
    {
        rows.into_iter()
            .map(|row| {
                self.remap_row(row).ok_or_else(|| {
                    Error::InvalidMesh(format!("row {:?} references a pruned entry", row))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_retained_is_dense_and_monotonic() {
        let compaction = IndexCompaction::from_retained(&[true, false, true, true, false]);

        assert_eq!(compaction.retained(), &[0, 2, 3]);
        assert_eq!(compaction.new_index(0), Some(0));
        assert_eq!(compaction.new_index(1), None);
        assert_eq!(compaction.new_index(2), Some(1));
        assert_eq!(compaction.new_index(3), Some(2));
        assert_eq!(compaction.new_index(4), None);
        assert_eq!(compaction.new_index(99), None);
        assert_eq!(compaction.dropped_len(), 2);
    }

    #[test]
    fn test_from_references_drops_unreferenced() {
        let compaction = IndexCompaction::from_references(6, vec![5, 1, 1, 3]).unwrap();
        assert_eq!(compaction.retained(), &[1, 3, 5]);
        assert_eq!(compaction.remap_row(&[5, 3, 1]), Some(vec![2, 1, 0]));
        assert_eq!(compaction.remap_row(&[5, 0, 1]), None);
    }

    #[test]
    fn test_from_references_rejects_out_of_range() {
        let result = IndexCompaction::from_references(3, vec![0, 3]);
        assert!(matches!(result, Err(Error::InvalidMesh(_))));
    }

    #[test]
    fn test_gather_preserves_order() {
        let compaction = IndexCompaction::from_retained(&[false, true, false, true]);
        let gathered = compaction.gather(&['a', 'b', 'c', 'd']).unwrap();
        assert_eq!(gathered, vec!['b', 'd']);

        assert!(compaction.gather(&['a']).is_err());
    }

    #[test]
    fn test_full_retention_is_identity() {
        let compaction = IndexCompaction::from_retained(&[true; 4]);
        assert!(compaction.is_identity());
        assert!(!IndexCompaction::from_retained(&[true, false]).is_identity());
        assert_eq!(
            compaction.remap_rows(&vec![vec![0, 1, 2], vec![3, 2, 1]]).unwrap(),
            vec![vec![0, 1, 2], vec![3, 2, 1]]
        );
    }
}
