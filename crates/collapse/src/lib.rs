//! Moment projection, cross-section collapsing, and order recursion for the
//! DGM energy-collapsing engine
//!
//! This crate carries the moment machinery that sits between the basis
//! construction in `dgm-basis` and the external coarse-group transport
//! kernel.
//!
//! # Overview
//!
//! Every outer transport iteration proceeds the same way:
//!
//! 1. [MomentProjector] forward-transforms the current fine-group flux
//!    estimate into per-coarse-group moments.
//! 2. [XsMomentAggregator] collapses total, scattering (with the angular
//!    delta correction), fission, and chi cross sections for each expansion
//!    order, optionally homogenized over regions of cells.
//! 3. [OrderRecursion] hands the order-0 system to the external
//!    [CoarseSolver]; each higher order is driven by the previous order's
//!    boundary angular-flux moments. Moment cross sections are damped by
//!    the relaxation factor between passes.
//! 4. Every order's solution is unfolded back into fine-group resolution
//!    and accumulated into the flux returned to the caller.
//!
//! # Quickstart
//!
//! ```rust
//! # use dgm_basis::{BasisMatrix, GroupStructure};
//! # use dgm_collapse::{DgmConfig, ExpansionOrders, MomentProjector};
//! let config = DgmConfig::new(vec![1, 1, 1, 1, 2, 2, 2], "test/7gbasis")
//!     .validated()
//!     .unwrap();
//!
//! let structure = config.structure().unwrap();
//! let basis = BasisMatrix::build(&structure).unwrap();
//! let orders = config.orders(&structure).unwrap();
//!
//! // project a flux estimate and reconstruct it exactly
//! let projector = MomentProjector::new(&basis, &orders);
//! let flux = vec![0.2, 0.8, 0.6, 0.1, 0.01, 0.002, 0.0001];
//! let moments = projector.project_all(&flux).unwrap();
//! let unfolded = projector.unfold(&moments).unwrap();
//!
//! for (a, b) in flux.iter().zip(unfolded.iter()) {
//!     assert!((a - b).abs() < 1e-12);
//! }
//! ```
//!
//! The transport kernel itself (spatial sweep, quadrature, eigenvalue
//! iteration) is deliberately out of scope and reached only through the
//! [CoarseSolver] trait.

mod config;
mod error;
mod moments;
mod orders;
mod recursion;
mod xs;

#[doc(inline)]
pub use config::DgmConfig;

#[doc(inline)]
pub use moments::MomentProjector;

#[doc(inline)]
pub use orders::ExpansionOrders;

#[doc(inline)]
pub use recursion::{CoarseSolver, OrderRecursion, OrderSolution, ReconstructedFlux};

#[doc(inline)]
pub use xs::{CellState, FineXs, HomogenizationMap, XsMomentAggregator, XsMoments};

#[doc(inline)]
pub use error::{Error, Result};
