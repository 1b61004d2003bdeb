//! Common utility for extended `std` types
//!
//! These are left public for convenience.
//!
//! For example, consistent formatting of scientific numbers is useful for
//! any whitespace-delimited numeric file, and dot products over float slices
//! are needed by every projection loop.

// Alias for the format! macro
pub use std::format as f;

// Modules
mod slice_ext;
mod value_ext;

// Flatten
pub use slice_ext::SliceExt;
pub use value_ext::ValueExt;
