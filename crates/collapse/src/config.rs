//! Immutable per-problem configuration

// crate modules
use crate::error::{Error, Result};
use crate::orders::ExpansionOrders;

// dgm modules
use dgm_basis::{BasisMatrix, GroupStructure};

// standard library
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The recognised DGM configuration options
///
/// Constructed once per problem and passed by reference into the basis,
/// projection, and aggregation components. There is deliberately no global
/// mutable configuration state; every component reads from an immutable
/// config so repeated runs cannot leak settings into each other.
///
/// ```rust
/// # use dgm_collapse::DgmConfig;
/// let config = DgmConfig::new(vec![1, 1, 1, 1, 2, 2, 2], "test/7gbasis")
///     .validated()
///     .unwrap();
///
/// assert_eq!(config.lambda, 1.0);
/// assert_eq!(config.scatter_leg_order, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DgmConfig {
    /// Coarse group assignment for every fine group
    pub energy_group_map: Vec<usize>,
    /// Path to the persisted basis file
    pub dgm_basis_name: PathBuf,
    /// Optional per-coarse-group cap on the retained expansion order
    #[serde(default)]
    pub truncation_map: Option<Vec<usize>>,
    /// Relaxation factor damping moment cross-section updates, in (0, 1]
    #[serde(default = "default_lambda")]
    pub lambda: f64,
    /// Highest anisotropic scattering order retained
    #[serde(default)]
    pub scatter_leg_order: usize,
}

fn default_lambda() -> f64 {
    1.0
}

impl DgmConfig {
    /// A config with default relaxation (1.0, undamped) and isotropic scatter
    pub fn new<P: Into<PathBuf>>(energy_group_map: Vec<usize>, dgm_basis_name: P) -> Self {
        Self {
            energy_group_map,
            dgm_basis_name: dgm_basis_name.into(),
            truncation_map: None,
            lambda: default_lambda(),
            scatter_leg_order: 0,
        }
    }

    /// Check the options against their documented domains
    ///
    /// `lambda` must lie in (0, 1]. At 1.0 the damped update reduces to the
    /// plain new value; values at or below zero would freeze or reverse the
    /// update and are rejected.
    pub fn validated(self) -> Result<Self> {
        if !(self.lambda > 0.0 && self.lambda <= 1.0) {
            return Err(Error::InvalidRelaxationFactor(self.lambda));
        }
        if let Some(map) = &self.truncation_map {
            let structure = self.structure()?;
            if map.len() != structure.coarse_groups() {
                return Err(Error::TruncationLengthMismatch {
                    expected: structure.coarse_groups(),
                    found: map.len(),
                });
            }
        }
        Ok(self)
    }

    /// The group structure defined by the energy group map
    pub fn structure(&self) -> Result<GroupStructure> {
        GroupStructure::from_map(self.energy_group_map.len(), &self.energy_group_map)
            .map_err(Error::from)
    }

    /// The retained expansion orders, after any truncation
    pub fn orders(&self, structure: &GroupStructure) -> Result<ExpansionOrders> {
        match &self.truncation_map {
            Some(cap) => ExpansionOrders::truncated(structure, cap),
            None => Ok(ExpansionOrders::full(structure)),
        }
    }

    /// Load the basis matrix named by `dgm_basis_name`
    pub fn load_basis(&self, structure: &GroupStructure) -> Result<BasisMatrix> {
        BasisMatrix::from_file(&self.dgm_basis_name, structure).map_err(Error::from)
    }
}
