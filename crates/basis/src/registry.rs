//! Registry of known fine-group structures
//!
//! Supported fine-group counts are defined by a fixed table mapping the
//! number of fine groups to a documented coarse group map. This is a
//! deliberate explicit-registry design with no runtime inference, since a
//! wrong group-structure assumption silently corrupts all downstream
//! physics. Extending to a new structure means adding a table entry here.

use crate::error::{Error, Result};

/// Coarse group map for the SCALE 44-group library
///
/// Note that coarse group 1 is non-contiguous, with fine group 20 belonging
/// to coarse group 2.
const MAP_44: [usize; 44] = [
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1, 2, 1, 1, //
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 2, 2, 2, 2, 2, 2, 3, 3,
];

/// Coarse group map for the SCALE 238-group library
///
/// Heavily non-contiguous in the resonance range, where fine groups are
/// assigned to coarse groups by flux shape rather than by adjacency.
const MAP_238: [usize; 238] = [
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, //
    1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, //
    1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 2, 2, 2, 3, 3, 3, 3, 3, 3, //
    3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 4, 3, 4, 2, 3, 4, 2, 4, 1, 2, 3, //
    2, 2, 3, 4, 1, 1, 2, 2, 3, 2, 2, 2, 2, 3, 3, 3, 3, 3, 3, 4, 5, 3, //
    1, 2, 1, 1, 1, 1, 2, 3, 4, 4, 3, 1, 1, 1, 1, 1, 2, 1, 3, 3, 1, 2, //
    3, 3, 3, 4, 6, 3, 3, 2, 2, 2, 1, 1, 2, 1, 2, 1, 1, 1, 1, 1, 1, 1, //
    1, 1, 1, 1, 2, 2, 1, 1, 1, 1, 1, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 3, //
    2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, //
    2, 2, 2, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, 3, //
    3, 3, 4, 4, 4, 4, 4, 5, 5, 5, 5, 5, 5, 6, 6, 6, 6, 7,
];

/// Look up the registered coarse group map for a fine-group count
///
/// Returns [Error::UnsupportedStructure] for anything not in the table.
pub fn registered_map(fine_groups: usize) -> Result<&'static [usize]> {
    match fine_groups {
        44 => Ok(&MAP_44),
        238 => Ok(&MAP_238),
        g => Err(Error::UnsupportedStructure(g)),
    }
}

/// Every fine-group count with a registered coarse group map
pub fn registered_structures() -> Vec<usize> {
    vec![44, 238]
}
