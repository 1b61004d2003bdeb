//! Block-structured basis matrix assembly and persistence

// crate modules
use crate::dlp::dlp_block;
use crate::error::{Error, Result};
use crate::registry::registered_structures;
use crate::structure::GroupStructure;

// dgm modules
use dgm_utils::{f, ValueExt};

// standard library
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use log::debug;
use nalgebra::DMatrix;

/// The G x G block-orthonormal basis transform for a group structure
///
/// Columns are grouped into one block per coarse group, each filled by the
/// orthonormal DLP block over exactly the fine-group rows that belong to
/// that coarse group. Everything outside a block is exactly zero, so for a
/// non-contiguous coarse group the nonzero entries of its columns are
/// scattered over the matching rows.
///
/// Invariants held by construction:
/// - every column has unit 2-norm
/// - columns within a block are mutually orthogonal
/// - cross-block entries are exactly zero
///
/// The matrix depends only on the group structure, so it is built once,
/// optionally persisted with [write()](BasisMatrix::write), and shared
/// read-only for the rest of the run.
///
/// ```rust
/// # use dgm_basis::{BasisMatrix, GroupStructure};
/// let structure = GroupStructure::from_map(7, &[1, 1, 1, 1, 2, 2, 2]).unwrap();
/// let basis = BasisMatrix::build(&structure).unwrap();
///
/// // order-0 values of the first coarse group
/// assert!((basis.value(0, 0) - 0.5).abs() < 1e-12);
/// // order-0 values of the second coarse group
/// assert!((basis.value(4, 0) - 1.0 / 3.0_f64.sqrt()).abs() < 1e-12);
/// // cross-block entries are exactly zero
/// assert_eq!(basis.matrix()[(0, 4)], 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BasisMatrix {
    /// The group structure this basis was built for
    structure: GroupStructure,
    /// Full G x G block matrix, row per fine group
    matrix: DMatrix<f64>,
    /// Starting column of each coarse group's block
    offsets: Vec<usize>,
}

impl BasisMatrix {
    /// Assemble the basis matrix for a group structure
    ///
    /// Each coarse group's block is generated by [dlp_block()](crate::dlp_block)
    /// over its fine-group indices in index order.
    pub fn build(structure: &GroupStructure) -> Result<Self> {
        let fine = structure.fine_groups();
        let mut matrix = DMatrix::zeros(fine, fine);
        let offsets = block_offsets(structure);

        for c in 0..structure.coarse_groups() {
            let rows = structure.fine_indices(c);
            let block = dlp_block(rows.len())?;

            for (j, g) in rows.iter().enumerate() {
                for i in 0..rows.len() {
                    matrix[(*g, offsets[c] + i)] = block[(j, i)];
                }
            }
        }

        debug!("assembled basis matrix for {}", structure);

        Ok(Self {
            structure: structure.clone(),
            matrix,
            offsets,
        })
    }

    /// Build directly from the registry of known fine-group counts
    pub fn from_registry(fine_groups: usize) -> Result<Self> {
        Self::build(&GroupStructure::from_registry(fine_groups)?)
    }

    /// Load a persisted basis matrix, the structural inverse of `write()`
    ///
    /// The file shape is validated against the provided group structure.
    /// Row or column count mismatches and unparsable values are fatal.
    pub fn from_file<P: AsRef<Path>>(path: P, structure: &GroupStructure) -> Result<Self> {
        let fine = structure.fine_groups();
        let reader = BufReader::new(File::open(path)?);
        let mut matrix = DMatrix::zeros(fine, fine);
        let mut rows = 0;

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            // count surplus rows through to the end so the error carries the
            // real total
            if rows >= fine {
                rows += 1;
                continue;
            }

            let values = line
                .split_whitespace()
                .map(|token| {
                    token
                        .parse::<f64>()
                        .map_err(|_| Error::ParseError(token.to_string()))
                })
                .collect::<Result<Vec<f64>>>()?;

            if values.len() != fine {
                return Err(Error::UnexpectedRowLength {
                    row: rows,
                    expected: fine,
                    found: values.len(),
                });
            }

            for (col, value) in values.into_iter().enumerate() {
                matrix[(rows, col)] = value;
            }
            rows += 1;
        }

        if rows != fine {
            return Err(Error::UnexpectedRowCount {
                expected: fine,
                found: rows,
            });
        }

        Ok(Self {
            structure: structure.clone(),
            matrix,
            offsets: block_offsets(structure),
        })
    }

    /// Persist to a whitespace-delimited numeric text file
    ///
    /// One row per fine group, one column per cumulative moment index.
    /// Values are written with 17 significant figures so a reload reproduces
    /// the matrix bit-for-bit.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        for g in 0..self.fine_groups() {
            let row = self
                .matrix
                .row(g)
                .iter()
                .map(|value| value.sci(16, 2))
                .collect::<Vec<String>>()
                .join(" ");
            writer.write_all(f!("{row}\n").as_bytes())?;
        }

        Ok(())
    }

    /// Basis value for fine group `g` at expansion order `order`
    ///
    /// This is the entry of the order-`order` basis column of the coarse
    /// group that `g` belongs to. The caller is responsible for keeping
    /// `order` at or below the coarse group's maximum order.
    #[inline]
    pub fn value(&self, g: usize, order: usize) -> f64 {
        let c = self.structure.coarse_of(g);
        self.matrix[(g, self.offsets[c] + order)]
    }

    /// Starting column of a coarse group's block
    #[inline]
    pub fn offset(&self, coarse_group: usize) -> usize {
        self.offsets[coarse_group]
    }

    /// Number of fine groups `G`
    pub fn fine_groups(&self) -> usize {
        self.structure.fine_groups()
    }

    /// The group structure this basis was built for
    pub fn structure(&self) -> &GroupStructure {
        &self.structure
    }

    /// The full G x G block matrix
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }
}

/// Write basis files for every registered group structure
///
/// Files are named `dlp_<G>g` under the target directory, matching the
/// layout expected by [BasisMatrix::from_file]. Convenient for regenerating
/// the full set offline in one call.
pub fn write_registered_bases<P: AsRef<Path>>(directory: P) -> Result<()> {
    for g in registered_structures() {
        let basis = BasisMatrix::from_registry(g)?;
        basis.write(directory.as_ref().join(f!("dlp_{g}g")))?;
    }
    Ok(())
}

/// Starting column of each coarse group's block, by cumulative count
fn block_offsets(structure: &GroupStructure) -> Vec<usize> {
    let mut offsets = Vec::with_capacity(structure.coarse_groups());
    let mut total = 0;
    for c in 0..structure.coarse_groups() {
        offsets.push(total);
        total += structure.count(c);
    }
    offsets
}
