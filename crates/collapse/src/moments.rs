//! Forward and inverse moment transforms
//!
//! Both directions are linear maps parameterised only by the immutable
//! basis/structure/orders triple, so a projector can be shared read-only
//! across every cell and angle of an outer transport iteration.

// crate modules
use crate::error::{Error, Result};
use crate::orders::ExpansionOrders;

// dgm modules
use dgm_basis::BasisMatrix;
use dgm_utils::SliceExt;

/// Projects fine-group vectors into coarse-group moments and back
///
/// The forward transform takes any per-fine-group vector (scalar flux,
/// angular flux for one direction, source) to its order-`i` moment per
/// coarse group. The inverse transform ("unfold") reconstructs the
/// fine-group vector from a stack of moments.
///
/// With the full untruncated order set, forward-then-inverse is an exact
/// identity; truncation turns it into a lossy low-pass projection by design.
///
/// ```rust
/// # use dgm_basis::{BasisMatrix, GroupStructure};
/// # use dgm_collapse::{ExpansionOrders, MomentProjector};
/// let structure = GroupStructure::from_map(7, &[1, 1, 1, 1, 2, 2, 2]).unwrap();
/// let basis = BasisMatrix::build(&structure).unwrap();
/// let orders = ExpansionOrders::full(&structure);
/// let projector = MomentProjector::new(&basis, &orders);
///
/// // a flat unit flux has order-0 moments of 2 and sqrt(3)
/// let flux = vec![1.0; 7];
/// let m0 = projector.project(&flux, 0).unwrap();
/// assert!((m0[0] - 2.0).abs() < 1e-12);
/// assert!((m0[1] - 3.0_f64.sqrt()).abs() < 1e-12);
///
/// // and all higher moments vanish
/// let m1 = projector.project(&flux, 1).unwrap();
/// assert!(m1[0].abs() < 1e-12);
/// assert!(m1[1].abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct MomentProjector<'a> {
    basis: &'a BasisMatrix,
    orders: &'a ExpansionOrders,
}

impl<'a> MomentProjector<'a> {
    /// A projector over a basis and its retained orders
    pub fn new(basis: &'a BasisMatrix, orders: &'a ExpansionOrders) -> Self {
        Self { basis, orders }
    }

    /// Order-`order` moment of a fine-group vector, per coarse group
    ///
    /// Coarse groups whose retained order is below `order` have exhausted
    /// their moments and contribute zero.
    pub fn project(&self, values: &[f64], order: usize) -> Result<Vec<f64>> {
        self.check_length(values)?;
        let structure = self.basis.structure();

        let moments = (0..structure.coarse_groups())
            .map(|c| {
                if !self.orders.retains(c, order) {
                    return 0.0;
                }
                structure
                    .fine_indices(c)
                    .iter()
                    .map(|g| self.basis.value(*g, order) * values[*g])
                    .sum()
            })
            .collect();

        Ok(moments)
    }

    /// Moments of every retained order, indexed `[order][coarse group]`
    pub fn project_all(&self, values: &[f64]) -> Result<Vec<Vec<f64>>> {
        (0..=self.orders.expansion_order())
            .map(|i| self.project(values, i))
            .collect()
    }

    /// Order-`order` moments of a per-angle set of fine-group vectors
    ///
    /// Applies [project()](MomentProjector::project) independently to each
    /// direction, the shape used for angular-flux and incident boundary
    /// moments.
    pub fn project_angular(&self, psi: &[Vec<f64>], order: usize) -> Result<Vec<Vec<f64>>> {
        psi.iter()
            .map(|direction| self.project(direction, order))
            .collect()
    }

    /// Reconstruct a fine-group vector from moments indexed `[order][coarse group]`
    ///
    /// Missing higher orders are simply absent from the sum, so unfolding
    /// a truncated moment stack yields the low-pass reconstruction.
    pub fn unfold(&self, moments: &[Vec<f64>]) -> Result<Vec<f64>> {
        let structure = self.basis.structure();
        let mut values = vec![0.0; structure.fine_groups()];

        for (order, m) in moments.iter().enumerate() {
            if m.len() != structure.coarse_groups() {
                return Err(Error::FineVectorLengthMismatch {
                    expected: structure.coarse_groups(),
                    found: m.len(),
                });
            }
            self.unfold_order_into(m, order, &mut values);
        }

        Ok(values)
    }

    /// Accumulate a single order's contribution into a fine-group vector
    ///
    /// This is the per-pass building block of the order recursion, where
    /// each solved order is folded into the reconstructed flux as it
    /// arrives.
    pub fn unfold_order_into(&self, moments: &[f64], order: usize, values: &mut [f64]) {
        let structure = self.basis.structure();
        for (g, value) in values.iter_mut().enumerate() {
            let c = structure.coarse_of(g);
            if self.orders.retains(c, order) {
                *value += self.basis.value(g, order) * moments[c];
            }
        }
    }

    /// Residual 2-norm of reconstructing `values` with orders up to `cap`
    ///
    /// Strictly non-increasing in `cap`, reaching zero once every coarse
    /// group's full order set is included.
    pub fn truncation_residual(&self, values: &[f64], cap: usize) -> Result<f64> {
        let mut reconstructed = vec![0.0; values.len()];
        for order in 0..=cap.min(self.orders.expansion_order()) {
            let m = self.project(values, order)?;
            self.unfold_order_into(&m, order, &mut reconstructed);
        }

        let residual: Vec<f64> = values
            .iter()
            .zip(reconstructed.iter())
            .map(|(v, r)| v - r)
            .collect();
        Ok(residual.norm())
    }

    fn check_length(&self, values: &[f64]) -> Result<()> {
        let expected = self.basis.fine_groups();
        if values.len() != expected {
            return Err(Error::FineVectorLengthMismatch {
                expected,
                found: values.len(),
            });
        }
        Ok(())
    }
}
