//! Per-order cross-section moment collapsing

// crate modules
use crate::error::{Error, Result};
use crate::orders::ExpansionOrders;

// dgm modules
use dgm_basis::BasisMatrix;

use itertools::izip;
use nalgebra::DMatrix;

/// Fine-group cross sections for one material
///
/// The scattering matrix is stored per Legendre order as `(g, g')` with `g`
/// the outgoing and `g'` the incoming fine group. `nu_sig_f` is the fission
/// cross section already multiplied by nu.
#[derive(Debug, Clone, PartialEq)]
pub struct FineXs {
    /// Total cross section per fine group
    pub sig_t: Vec<f64>,
    /// Scattering matrices, one `(g, g')` matrix per Legendre order
    pub sig_s: Vec<DMatrix<f64>>,
    /// Fission production cross section per fine group
    pub nu_sig_f: Vec<f64>,
    /// Fission spectrum per fine group
    pub chi: Vec<f64>,
}

/// Per-cell state handed to the aggregator for one outer iteration
///
/// Flux moments are the current fine-group estimate: `phi[l][g]` holds the
/// Legendre-`l` scalar flux moment and `psi[a][g]` the angular flux for
/// direction `a`. Everything is borrowed; the aggregator never owns or
/// mutates flux state.
#[derive(Debug, Clone, Copy)]
pub struct CellState<'a> {
    /// Material cross sections in this cell
    pub xs: &'a FineXs,
    /// Legendre scalar flux moments, `[l][g]`
    pub phi: &'a [Vec<f64>],
    /// Angular flux per direction, `[a][g]`
    pub psi: &'a [Vec<f64>],
    /// Cell volume, used as the homogenization weight
    pub volume: f64,
}

/// Moment-collapsed cross sections for one expansion order
///
/// Indexed by coarse group, with the scattering moments as `(c, c')`
/// coarse-to-coarse matrices per Legendre order and the delta correction
/// per direction. Negative collapsed values are representable and never
/// clamped; they are only physical at convergence.
#[derive(Debug, Clone, PartialEq)]
pub struct XsMoments {
    /// Flux-weighted total cross section, `[c]`
    pub sig_t: Vec<f64>,
    /// Angular delta correction, `[a][c]`
    pub delta: Vec<Vec<f64>>,
    /// Coarse scattering moments, one `(c, c')` matrix per Legendre order
    pub sig_s: Vec<DMatrix<f64>>,
    /// Fission production moments, `[c]`
    pub nu_sig_f: Vec<f64>,
    /// Fission spectrum moments, `[c]`
    pub chi: Vec<f64>,
}

impl XsMoments {
    /// Damped update `lambda * new + (1 - lambda) * previous`
    ///
    /// At `lambda = 1.0` this is exactly the new value; as `lambda`
    /// approaches zero the previous pass's cross sections are retained.
    pub fn relaxed(&self, previous: &XsMoments, lambda: f64) -> XsMoments {
        let blend = |new: &[f64], old: &[f64]| -> Vec<f64> {
            izip!(new, old).map(|(n, o)| lambda * n + (1.0 - lambda) * o).collect()
        };

        XsMoments {
            sig_t: blend(&self.sig_t, &previous.sig_t),
            delta: izip!(&self.delta, &previous.delta)
                .map(|(n, o)| blend(n, o))
                .collect(),
            sig_s: izip!(&self.sig_s, &previous.sig_s)
                .map(|(n, o)| n * lambda + o * (1.0 - lambda))
                .collect(),
            nu_sig_f: blend(&self.nu_sig_f, &previous.nu_sig_f),
            chi: blend(&self.chi, &previous.chi),
        }
    }
}

/// Grouping of spatial cells into homogenization regions
///
/// Region labels may be arbitrary; they are normalised to dense 0-based
/// indices ordered by label value, mirroring the coarse group map handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomogenizationMap {
    region: Vec<usize>,
    members: Vec<Vec<usize>>,
}

impl HomogenizationMap {
    /// Build from a per-cell region label array
    pub fn new(map: &[usize]) -> Self {
        let mut labels: Vec<usize> = map.to_vec();
        labels.sort_unstable();
        labels.dedup();

        let region: Vec<usize> = map
            .iter()
            .map(|label| labels.binary_search(label).expect("label is present"))
            .collect();

        let mut members = vec![Vec::new(); labels.len()];
        for (cell, r) in region.iter().enumerate() {
            members[*r].push(cell);
        }

        Self { region, members }
    }

    /// Number of cells covered by the map
    pub fn cells(&self) -> usize {
        self.region.len()
    }

    /// Number of homogenization regions
    pub fn regions(&self) -> usize {
        self.members.len()
    }

    /// Dense region index of a cell
    #[inline]
    pub fn region_of(&self, cell: usize) -> usize {
        self.region[cell]
    }

    /// Cell indices belonging to a region, in index order
    #[inline]
    pub fn members(&self, region: usize) -> &[usize] {
        &self.members[region]
    }
}

/// Collapses fine-group cross sections into per-order coarse moments
///
/// Pure with respect to its inputs: the same cell state and order always
/// produce the same moments, so collapsing may be repeated freely every
/// outer iteration.
#[derive(Debug, Clone, Copy)]
pub struct XsMomentAggregator<'a> {
    basis: &'a BasisMatrix,
    orders: &'a ExpansionOrders,
    scatter_leg_order: usize,
}

impl<'a> XsMomentAggregator<'a> {
    /// An aggregator retaining Legendre scatter orders `0..=scatter_leg_order`
    pub fn new(basis: &'a BasisMatrix, orders: &'a ExpansionOrders, scatter_leg_order: usize) -> Self {
        Self {
            basis,
            orders,
            scatter_leg_order,
        }
    }

    /// Collapse one cell's cross sections at the given expansion order
    ///
    /// - `sig_t` is the flux-weighted average total cross section and does
    ///   not vary with order; the order dependence of the removal operator
    ///   is carried entirely by `delta`.
    /// - `delta` is the basis-projected mismatch between the fine-group
    ///   removal term and its coarse approximation, per direction,
    ///   normalised by the order-0 angular flux moment.
    /// - `sig_s` projects the outgoing group at this order and weights the
    ///   incoming group with the matching Legendre flux, normalised by the
    ///   incoming coarse group's order-0 flux moment so that
    ///   `sig_s_m * phi_m0` reproduces the fine-group scattering source.
    /// - `nu_sig_f` is normalised the same way for production consistency;
    ///   `chi` is a plain basis projection of the fission spectrum.
    ///
    /// A vanishing weight denominator yields a zero moment rather than a
    /// NaN; it can only occur for an identically zero flux over a coarse
    /// group, which carries no reaction rate.
    pub fn collapse(&self, cell: &CellState, order: usize) -> Result<XsMoments> {
        self.check_cell(cell)?;

        let structure = self.basis.structure();
        let nc = structure.coarse_groups();
        let legs = self.scatter_leg_order + 1;
        let phi0 = &cell.phi[0];

        // order-0 flux moment per legendre order, the weight denominators
        let phi_m0: Vec<Vec<f64>> = (0..legs).map(|l| self.moment0(&cell.phi[l])).collect();

        let mut sig_t = vec![0.0; nc];
        let mut nu_sig_f = vec![0.0; nc];
        let mut chi = vec![0.0; nc];

        for c in 0..nc {
            let members = structure.fine_indices(c);

            let total: f64 = members.iter().map(|g| phi0[*g]).sum();
            if total != 0.0 {
                sig_t[c] = members
                    .iter()
                    .map(|g| cell.xs.sig_t[*g] * phi0[*g])
                    .sum::<f64>()
                    / total;
            }

            if phi_m0[0][c] != 0.0 {
                nu_sig_f[c] = members
                    .iter()
                    .map(|g| cell.xs.nu_sig_f[*g] * phi0[*g])
                    .sum::<f64>()
                    / phi_m0[0][c];
            }

            if self.orders.retains(c, order) {
                chi[c] = members
                    .iter()
                    .map(|g| self.basis.value(*g, order) * cell.xs.chi[*g])
                    .sum();
            }
        }

        // angular delta correction against the collapsed total
        let mut delta = vec![vec![0.0; nc]; cell.psi.len()];
        for (a, psi) in cell.psi.iter().enumerate() {
            let psi_m0 = self.moment0(psi);
            for c in 0..nc {
                if !self.orders.retains(c, order) || psi_m0[c] == 0.0 {
                    continue;
                }
                delta[a][c] = structure
                    .fine_indices(c)
                    .iter()
                    .map(|g| {
                        self.basis.value(*g, order) * (cell.xs.sig_t[*g] - sig_t[c]) * psi[*g]
                    })
                    .sum::<f64>()
                    / psi_m0[c];
            }
        }

        // coarse-to-coarse scattering moments
        let mut sig_s = Vec::with_capacity(legs);
        for l in 0..legs {
            let mut matrix = DMatrix::zeros(nc, nc);
            for c in 0..nc {
                if !self.orders.retains(c, order) {
                    continue;
                }
                for cp in 0..nc {
                    if phi_m0[l][cp] == 0.0 {
                        continue;
                    }
                    let mut value = 0.0;
                    for g in structure.fine_indices(c) {
                        let b = self.basis.value(*g, order);
                        for gp in structure.fine_indices(cp) {
                            value += b * cell.xs.sig_s[l][(*g, *gp)] * cell.phi[l][*gp];
                        }
                    }
                    matrix[(c, cp)] = value / phi_m0[l][cp];
                }
            }
            sig_s.push(matrix);
        }

        Ok(XsMoments {
            sig_t,
            delta,
            sig_s,
            nu_sig_f,
            chi,
        })
    }

    /// Collapse with spatial homogenization, returning moments per region
    ///
    /// Moment projection happens first, per cell; region averaging then
    /// weights each cell with the *same order's* scalar flux moment times
    /// the cell volume. The two averages commute for order 0 but not for
    /// higher orders, where weighting with the order-0 flux would break
    /// consistency with the per-order moment equations.
    ///
    /// Higher-order flux moments are signed, so a region's weights can sum
    /// to zero; such a region falls back to plain volume weighting.
    pub fn collapse_homogenized(
        &self,
        cells: &[CellState],
        map: &HomogenizationMap,
        order: usize,
    ) -> Result<Vec<XsMoments>> {
        if map.cells() != cells.len() {
            return Err(Error::HomogenizationLengthMismatch {
                expected: cells.len(),
                found: map.cells(),
            });
        }

        let nc = self.basis.structure().coarse_groups();
        let legs = self.scatter_leg_order + 1;

        // project every cell first, then average
        let collapsed = cells
            .iter()
            .map(|cell| self.collapse(cell, order))
            .collect::<Result<Vec<XsMoments>>>()?;

        // weight per cell and coarse group: order-i flux moment x volume
        let weights: Vec<Vec<f64>> = cells
            .iter()
            .map(|cell| {
                self.moment_at(&cell.phi[0], order)
                    .into_iter()
                    .map(|m| m * cell.volume)
                    .collect()
            })
            .collect();

        let mut regions = Vec::with_capacity(map.regions());
        for r in 0..map.regions() {
            let members = map.members(r);
            let n_angles = collapsed[members[0]].delta.len();

            let average = |select: &dyn Fn(&XsMoments, usize) -> f64, c: usize| -> f64 {
                weighted_average(
                    members.iter().map(|cell| select(&collapsed[*cell], c)),
                    members.iter().map(|cell| weights[*cell][c]),
                    members.iter().map(|cell| cells[*cell].volume),
                )
            };

            let sig_t = (0..nc).map(|c| average(&|m, c| m.sig_t[c], c)).collect();
            let nu_sig_f = (0..nc).map(|c| average(&|m, c| m.nu_sig_f[c], c)).collect();
            let chi = (0..nc).map(|c| average(&|m, c| m.chi[c], c)).collect();

            let delta = (0..n_angles)
                .map(|a| (0..nc).map(|c| average(&|m, c| m.delta[a][c], c)).collect())
                .collect();

            let mut sig_s = Vec::with_capacity(legs);
            for l in 0..legs {
                let mut matrix = DMatrix::zeros(nc, nc);
                for c in 0..nc {
                    for cp in 0..nc {
                        // weight by the incoming coarse group's flux moment
                        matrix[(c, cp)] = weighted_average(
                            members.iter().map(|cell| collapsed[*cell].sig_s[l][(c, cp)]),
                            members.iter().map(|cell| weights[*cell][cp]),
                            members.iter().map(|cell| cells[*cell].volume),
                        );
                    }
                }
                sig_s.push(matrix);
            }

            regions.push(XsMoments {
                sig_t,
                delta,
                sig_s,
                nu_sig_f,
                chi,
            });
        }

        Ok(regions)
    }

    /// Order-0 moments of a fine-group vector, per coarse group
    fn moment0(&self, values: &[f64]) -> Vec<f64> {
        self.moment_at(values, 0)
    }

    /// Order-`order` moments of a fine-group vector, per coarse group
    fn moment_at(&self, values: &[f64], order: usize) -> Vec<f64> {
        let structure = self.basis.structure();
        (0..structure.coarse_groups())
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
            .collect()
    }

    fn check_cell(&self, cell: &CellState) -> Result<()> {
        let fine = self.basis.fine_groups();
        let legs = self.scatter_leg_order + 1;

        for values in [&cell.xs.sig_t, &cell.xs.nu_sig_f, &cell.xs.chi] {
            if values.len() != fine {
                return Err(Error::FineVectorLengthMismatch {
                    expected: fine,
                    found: values.len(),
                });
            }
        }

        if cell.phi.len() < legs || cell.xs.sig_s.len() < legs {
            return Err(Error::ScatterOrderMismatch {
                expected: legs,
                found: cell.phi.len().min(cell.xs.sig_s.len()),
            });
        }

        for values in cell.phi.iter().chain(cell.psi.iter()) {
            if values.len() != fine {
                return Err(Error::FineVectorLengthMismatch {
                    expected: fine,
                    found: values.len(),
                });
            }
        }

        for matrix in &cell.xs.sig_s[..legs] {
            if matrix.nrows() != fine || matrix.ncols() != fine {
                return Err(Error::FineVectorLengthMismatch {
                    expected: fine,
                    found: matrix.nrows().min(matrix.ncols()),
                });
            }
        }

        Ok(())
    }
}

/// Weighted average with a volume-weight fallback for zero-sum weights
fn weighted_average<V, W, U>(values: V, weights: W, volumes: U) -> f64
where
    V: Iterator<Item = f64> + Clone,
    W: Iterator<Item = f64> + Clone,
    U: Iterator<Item = f64>,
{
    let total: f64 = weights.clone().sum();
    if total != 0.0 {
        return izip!(values, weights).map(|(v, w)| v * w).sum::<f64>() / total;
    }

    let volumes: Vec<f64> = volumes.collect();
    let volume_total: f64 = volumes.iter().sum();
    izip!(values, volumes).map(|(v, w)| v * w).sum::<f64>() / volume_total
}
