//! Fine-to-coarse energy group structures

use crate::error::{Error, Result};
use crate::registry::registered_map;

/// A partition of fine energy groups into coarse groups
///
/// Wraps a coarse group map, an array of length `G` assigning every fine
/// group to a coarse-group index. Fine groups of one coarse group need not
/// be adjacent, so membership is kept as an explicit per-coarse-group list
/// of fine-group indices rather than a range.
///
/// Map labels may be arbitrary (1-based, unsorted, with gaps); they are
/// normalised to dense 0-based coarse indices ordered by label value.
///
/// ```rust
/// # use dgm_basis::GroupStructure;
/// // The 7-group structure split into two coarse groups
/// let structure = GroupStructure::from_map(7, &[1, 1, 1, 1, 2, 2, 2]).unwrap();
///
/// assert_eq!(structure.coarse_groups(), 2);
/// assert_eq!(structure.fine_indices(0), &[0, 1, 2, 3]);
/// assert_eq!(structure.fine_indices(1), &[4, 5, 6]);
/// assert_eq!(structure.max_order(0), 3);
/// ```
///
/// Once constructed a [GroupStructure] is immutable and may be shared freely
/// across every basis, projection, and collapsing call of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupStructure {
    /// Dense 0-based coarse index for each fine group
    map: Vec<usize>,
    /// Fine-group indices of each coarse group, in index order
    members: Vec<Vec<usize>>,
}

impl GroupStructure {
    /// Build a structure from an explicit coarse group map
    ///
    /// The map length must equal `fine_groups`. A mismatch is fatal, since
    /// it means the problem configuration disagrees with itself.
    pub fn from_map(fine_groups: usize, map: &[usize]) -> Result<Self> {
        if map.len() != fine_groups || fine_groups == 0 {
            return Err(Error::MapLengthMismatch {
                expected: fine_groups,
                found: map.len(),
            });
        }

        // distinct labels, ordered by value
        let mut labels: Vec<usize> = map.to_vec();
        labels.sort_unstable();
        labels.dedup();

        let dense: Vec<usize> = map
            .iter()
            .map(|label| labels.binary_search(label).expect("label is present"))
            .collect();

        let mut members = vec![Vec::new(); labels.len()];
        for (g, c) in dense.iter().enumerate() {
            members[*c].push(g);
        }

        Ok(Self { map: dense, members })
    }

    /// Build a structure for a registered fine-group count
    ///
    /// Supported counts are fixed by the registry (44 and 238). Anything
    /// else fails with an unsupported-structure error naming the missing
    /// configuration.
    ///
    /// ```rust
    /// # use dgm_basis::GroupStructure;
    /// let structure = GroupStructure::from_registry(44).unwrap();
    /// assert_eq!(structure.fine_groups(), 44);
    /// assert_eq!(structure.coarse_groups(), 4);
    ///
    /// assert!(GroupStructure::from_registry(99).is_err());
    /// ```
    pub fn from_registry(fine_groups: usize) -> Result<Self> {
        Self::from_map(fine_groups, registered_map(fine_groups)?)
    }

    /// Number of fine groups `G`
    pub fn fine_groups(&self) -> usize {
        self.map.len()
    }

    /// Number of coarse groups in the partition
    pub fn coarse_groups(&self) -> usize {
        self.members.len()
    }

    /// Dense coarse index of a fine group
    #[inline]
    pub fn coarse_of(&self, fine_group: usize) -> usize {
        self.map[fine_group]
    }

    /// Fine-group indices belonging to a coarse group, in index order
    #[inline]
    pub fn fine_indices(&self, coarse_group: usize) -> &[usize] {
        &self.members[coarse_group]
    }

    /// Number of fine groups in a coarse group
    #[inline]
    pub fn count(&self, coarse_group: usize) -> usize {
        self.members[coarse_group].len()
    }

    /// Maximum meaningful expansion order of a coarse group, `count - 1`
    #[inline]
    pub fn max_order(&self, coarse_group: usize) -> usize {
        self.count(coarse_group) - 1
    }

    /// The dense coarse group map, one entry per fine group
    pub fn map(&self) -> &[usize] {
        &self.map
    }
}

impl std::fmt::Display for GroupStructure {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} fine groups over {} coarse groups",
            self.fine_groups(),
            self.coarse_groups()
        )
    }
}

#[cfg(test)]
mod structure_tests {
    use super::*;

    #[test]
    fn labels_are_normalised() {
        // 1-based labels with the same partition as [0,0,1,1]
        let s = GroupStructure::from_map(4, &[5, 5, 9, 9]).unwrap();
        assert_eq!(s.map(), &[0, 0, 1, 1]);
        assert_eq!(s.count(0), 2);
        assert_eq!(s.count(1), 2);
    }

    #[test]
    fn non_contiguous_membership_is_index_ordered() {
        let s = GroupStructure::from_map(7, &[1, 2, 1, 2, 1, 2, 1]).unwrap();
        assert_eq!(s.fine_indices(0), &[0, 2, 4, 6]);
        assert_eq!(s.fine_indices(1), &[1, 3, 5]);
    }

    #[test]
    fn length_mismatch_is_fatal() {
        assert!(GroupStructure::from_map(7, &[1, 1, 1]).is_err());
        assert!(GroupStructure::from_map(0, &[]).is_err());
    }
}
