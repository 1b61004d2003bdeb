//! `dgm` is a toolkit implementing the Discrete Generalized Moments method
//! for collapsing multigroup discrete-ordinates transport problems
//!
#![doc = include_str!("../readme.md")]
#![deny(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

// Re-exports of toolkit crates.
#[doc(inline)]
pub use dgm_utils as utils;

#[cfg(feature = "basis")]
#[cfg_attr(docsrs, doc(cfg(feature = "basis")))]
#[doc(inline)]
pub use dgm_basis as basis;

#[cfg(feature = "collapse")]
#[cfg_attr(docsrs, doc(cfg(feature = "collapse")))]
#[doc(inline)]
pub use dgm_collapse as collapse;
