//! Discrete Legendre Polynomial basis construction for DGM energy collapsing
//!
//! This crate builds the block-orthonormal basis used to expand within-group
//! energy shape in the Discrete Generalized Moments method.
//!
//! # Quickstart
//!
//! A basis matrix needs only a group structure, either explicit or from the
//! registry of known fine-group counts:
//!
//! ```rust
//! # use dgm_basis::{BasisMatrix, GroupStructure};
//! // The 7-group structure split at fine group 4
//! let structure = GroupStructure::from_map(7, &[1, 1, 1, 1, 2, 2, 2]).unwrap();
//! let basis = BasisMatrix::build(&structure).unwrap();
//! ```
//!
//! The matrix depends only on the structure, so it is usually generated
//! offline, persisted, and reloaded per run rather than rebuilt:
//!
//! ```rust, no_run
//! # use dgm_basis::{BasisMatrix, GroupStructure};
//! let structure = GroupStructure::from_registry(44).unwrap();
//!
//! // offline
//! BasisMatrix::build(&structure).unwrap().write("44g/dlp_44g").unwrap();
//!
//! // per run
//! let basis = BasisMatrix::from_file("44g/dlp_44g", &structure).unwrap();
//! ```
//!
//! # Structure registry
//!
//! Supported fine-group counts are fixed by an explicit registry (currently
//! the 44- and 238-group libraries with their documented, non-contiguous
//! coarse maps). An unregistered count is an error rather than a guess,
//! since wrong group-structure assumptions silently corrupt the physics
//! downstream.

mod basis;
mod dlp;
mod error;
mod registry;
mod structure;

#[doc(inline)]
pub use basis::{write_registered_bases, BasisMatrix};

#[doc(inline)]
pub use dlp::dlp_block;

#[doc(inline)]
pub use registry::{registered_map, registered_structures};

#[doc(inline)]
pub use structure::GroupStructure;

#[doc(inline)]
pub use error::{Error, Result};
