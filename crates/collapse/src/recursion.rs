//! Order-by-order recursive solve driver

// crate modules
use crate::config::DgmConfig;
use crate::error::{Error, Result};
use crate::moments::MomentProjector;
use crate::orders::ExpansionOrders;
use crate::xs::{CellState, HomogenizationMap, XsMomentAggregator, XsMoments};

// dgm modules
use dgm_basis::BasisMatrix;

use log::{debug, warn};

/// The converged coarse-group solution for one expansion order
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSolution {
    /// Scalar flux moments, `[cell][c]`
    pub phi_m: Vec<Vec<f64>>,
    /// Angular flux moments, `[cell][a][c]`
    pub psi_m: Vec<Vec<Vec<f64>>>,
    /// Angular flux moments at the problem boundary, `[a][c]`
    ///
    /// These drive the next order's solve as its incident flux.
    pub boundary_psi_m: Vec<Vec<f64>>,
    /// Whether the inner solve met its own convergence criterion
    pub converged: bool,
}

/// The external coarse-group transport collaborator
///
/// This trait is the sole boundary between the DGM core and the excluded
/// spatial/angular transport kernel. It is called once per expansion order
/// with that order's moment cross sections (one [XsMoments] per cell, or
/// per region when homogenizing) and the incident angular-flux moments
/// `[a][c]`, and returns the converged flux moments for the single
/// coarse-group-equivalent problem.
///
/// A solve that runs out of inner iterations should still return its best
/// flux with `converged: false`; only a hard failure (a broken mesh, an
/// unusable source) warrants an `Err`.
pub trait CoarseSolver {
    /// Solve the coarse-group-equivalent problem for one order
    fn solve(
        &mut self,
        order: usize,
        xs: &[XsMoments],
        incident: &[Vec<f64>],
    ) -> Result<OrderSolution>;
}

/// Fine-group flux reconstructed from all solved orders
#[derive(Debug, Clone, PartialEq)]
pub struct ReconstructedFlux {
    /// Scalar flux, `[cell][g]`
    pub phi: Vec<Vec<f64>>,
    /// Angular flux, `[cell][a][g]`
    pub psi: Vec<Vec<Vec<f64>>>,
    /// Orders whose inner solve did not converge, empty when clean
    pub unconverged_orders: Vec<usize>,
}

/// Drives the per-order recursive solve
///
/// Holds the relaxation state of the moment cross sections between outer
/// transport iterations; everything else is borrowed immutably. One
/// controller serves one problem for the length of a run.
///
/// The recursion is an explicit loop with bounded depth: order 0 collapses
/// cross sections from the current flux estimate and solves with the
/// caller's incident estimate (or zero); each order `i > 0` is driven by
/// order `i - 1`'s boundary angular-flux moments rather than by
/// re-projecting the fine-group flux. Every order's solution is unfolded
/// and accumulated into the reconstructed fine-group flux handed back to
/// the caller, which owns the outer iteration.
#[derive(Debug)]
pub struct OrderRecursion<'a> {
    basis: &'a BasisMatrix,
    orders: &'a ExpansionOrders,
    lambda: f64,
    scatter_leg_order: usize,
    homogenization: Option<HomogenizationMap>,
    /// Relaxed cross sections of the previous pass, per order
    previous_xs: Vec<Option<Vec<XsMoments>>>,
}

impl<'a> OrderRecursion<'a> {
    /// A controller for a validated configuration
    pub fn new(basis: &'a BasisMatrix, orders: &'a ExpansionOrders, config: &DgmConfig) -> Result<Self> {
        if !(config.lambda > 0.0 && config.lambda <= 1.0) {
            return Err(Error::InvalidRelaxationFactor(config.lambda));
        }

        Ok(Self {
            basis,
            orders,
            lambda: config.lambda,
            scatter_leg_order: config.scatter_leg_order,
            homogenization: None,
            previous_xs: vec![None; orders.expansion_order() + 1],
        })
    }

    /// Average cross-section moments over regions before each solve
    pub fn with_homogenization(mut self, map: HomogenizationMap) -> Self {
        self.homogenization = Some(map);
        self
    }

    /// Run the full order recursion for one outer transport iteration
    ///
    /// `boundary` is an optional fine-group incident angular flux estimate
    /// `[a][g]` seeding the order-0 solve; without it the order-0 incident
    /// moments are zero.
    ///
    /// Inner-solve non-convergence at any order is reported through
    /// [ReconstructedFlux::unconverged_orders] and a warning, and the
    /// recursion continues with whatever flux the solve returned.
    pub fn solve_all<S: CoarseSolver>(
        &mut self,
        solver: &mut S,
        cells: &[CellState],
        boundary: Option<&[Vec<f64>]>,
    ) -> Result<ReconstructedFlux> {
        let structure = self.basis.structure();
        let nc = structure.coarse_groups();
        let fine = structure.fine_groups();
        let n_angles = cells.first().map(|cell| cell.psi.len()).unwrap_or(0);

        let projector = MomentProjector::new(self.basis, self.orders);
        let aggregator = XsMomentAggregator::new(self.basis, self.orders, self.scatter_leg_order);

        let mut phi = vec![vec![0.0; fine]; cells.len()];
        let mut psi = vec![vec![vec![0.0; fine]; n_angles]; cells.len()];
        let mut unconverged_orders = Vec::new();

        // order-0 incident moments from the caller's boundary estimate
        let mut incident = match boundary {
            Some(estimate) => projector.project_angular(estimate, 0)?,
            None => vec![vec![0.0; nc]; n_angles],
        };

        for order in 0..=self.orders.expansion_order() {
            // collapse this order's cross sections from the flux estimate
            let new_xs = match &self.homogenization {
                Some(map) => aggregator.collapse_homogenized(cells, map, order)?,
                None => cells
                    .iter()
                    .map(|cell| aggregator.collapse(cell, order))
                    .collect::<Result<Vec<XsMoments>>>()?,
            };

            // damp against the previous pass before handing them over
            let xs = match &self.previous_xs[order] {
                Some(previous) => new_xs
                    .iter()
                    .zip(previous.iter())
                    .map(|(n, o)| n.relaxed(o, self.lambda))
                    .collect(),
                None => new_xs,
            };

            let solution = solver.solve(order, &xs, &incident)?;
            self.previous_xs[order] = Some(xs);

            if solution.phi_m.len() != cells.len() || solution.psi_m.len() != cells.len() {
                return Err(Error::SolutionShapeMismatch {
                    expected: cells.len(),
                    found: solution.phi_m.len().min(solution.psi_m.len()),
                });
            }

            // every moment vector must span the coarse groups before it is
            // indexed by the unfold
            for moments in solution
                .phi_m
                .iter()
                .chain(solution.psi_m.iter().flatten())
                .chain(solution.boundary_psi_m.iter())
            {
                if moments.len() != nc {
                    return Err(Error::SolutionShapeMismatch {
                        expected: nc,
                        found: moments.len(),
                    });
                }
            }
            for directions in &solution.psi_m {
                if directions.len() != n_angles {
                    return Err(Error::SolutionShapeMismatch {
                        expected: n_angles,
                        found: directions.len(),
                    });
                }
            }

            if !solution.converged {
                warn!("Warning: coarse solve at order {} did not converge", order);
                warn!("  - Continuing with the returned flux moments");
                unconverged_orders.push(order);
            }

            debug!("unfolding order {} into the fine-group flux", order);

            // fold this order's solution into the reconstruction
            for (cell, moments) in solution.phi_m.iter().enumerate() {
                projector.unfold_order_into(moments, order, &mut phi[cell]);
            }
            for (cell, directions) in solution.psi_m.iter().enumerate() {
                for (a, moments) in directions.iter().enumerate() {
                    projector.unfold_order_into(moments, order, &mut psi[cell][a]);
                }
            }

            // the defining recursion: the next order's incident flux is
            // this order's boundary angular-flux solution
            incident = solution.boundary_psi_m;
        }

        Ok(ReconstructedFlux {
            phi,
            psi,
            unconverged_orders,
        })
    }
}
