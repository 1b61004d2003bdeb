//! Retained expansion orders per coarse group

use crate::error::{Error, Result};

use dgm_basis::GroupStructure;

/// The expansion order retained for each coarse group
///
/// A coarse group of `count` fine groups supports moments up to order
/// `count - 1`. A truncation map may cap this below the natural maximum,
/// trading fidelity for fewer coarse solves.
///
/// `expansion_order` is the largest retained order over all coarse groups
/// and bounds the recursion: the order loop runs `0..=expansion_order`,
/// with exhausted coarse groups dropping out of the higher passes.
///
/// ```rust
/// # use dgm_basis::GroupStructure;
/// # use dgm_collapse::ExpansionOrders;
/// let structure = GroupStructure::from_map(7, &[1, 1, 1, 1, 2, 2, 2]).unwrap();
///
/// let orders = ExpansionOrders::full(&structure);
/// assert_eq!(orders.orders(), &[3, 2]);
/// assert_eq!(orders.expansion_order(), 3);
///
/// let truncated = ExpansionOrders::truncated(&structure, &[2, 1]).unwrap();
/// assert_eq!(truncated.orders(), &[2, 1]);
/// assert_eq!(truncated.expansion_order(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionOrders {
    order: Vec<usize>,
    expansion_order: usize,
}

impl ExpansionOrders {
    /// Retain every meaningful order, `count - 1` per coarse group
    pub fn full(structure: &GroupStructure) -> Self {
        let order: Vec<usize> = (0..structure.coarse_groups())
            .map(|c| structure.max_order(c))
            .collect();
        Self::from_orders(order)
    }

    /// Cap each coarse group's order with a truncation map
    ///
    /// Caps above the natural maximum are clipped to it rather than
    /// rejected, since they retain every moment the group has.
    pub fn truncated(structure: &GroupStructure, cap: &[usize]) -> Result<Self> {
        if cap.len() != structure.coarse_groups() {
            return Err(Error::TruncationLengthMismatch {
                expected: structure.coarse_groups(),
                found: cap.len(),
            });
        }

        let order: Vec<usize> = cap
            .iter()
            .enumerate()
            .map(|(c, cap)| structure.max_order(c).min(*cap))
            .collect();
        Ok(Self::from_orders(order))
    }

    fn from_orders(order: Vec<usize>) -> Self {
        // a structure has at least one coarse group
        let expansion_order = *order.iter().max().expect("at least one coarse group");
        Self {
            order,
            expansion_order,
        }
    }

    /// Retained order of a coarse group
    #[inline]
    pub fn order(&self, coarse_group: usize) -> usize {
        self.order[coarse_group]
    }

    /// Retained order of every coarse group
    pub fn orders(&self) -> &[usize] {
        &self.order
    }

    /// The largest retained order over all coarse groups
    #[inline]
    pub fn expansion_order(&self) -> usize {
        self.expansion_order
    }

    /// Whether a coarse group still carries a moment at this order
    #[inline]
    pub fn retains(&self, coarse_group: usize, order: usize) -> bool {
        order <= self.order[coarse_group]
    }
}
