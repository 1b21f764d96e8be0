//! Reference-fixed alignment of structure ensembles and ensemble-matrix
//! construction.
//!
//! Every member of an ensemble is superposed pairwise onto one designated
//! reference, giving all structures a common coordinate frame. Alignments are
//! independent of each other, so a member whose shape disagrees with the
//! reference is skipped with a report instead of aborting the batch. With the
//! `parallel` feature the pairwise fits run on a rayon worker pool; the
//! reference is only ever read.

use std::collections::BTreeMap;

use chrysaora_core::{ChrysaoraError, ContentAddressable, Result, Summarizable};
use sha2::{Digest, Sha256};

use crate::superposition::align_pair;
use crate::types::Point3D;

/// One ensemble member excluded from alignment, with the reason.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkippedMember {
    /// Identifier of the excluded member.
    pub id: String,
    /// Why the member was excluded.
    pub reason: String,
}

/// Result of aligning an ensemble onto a fixed reference.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnsembleAlignment {
    /// Aligned coordinates keyed by source identifier. The reference is
    /// included unchanged under its own identifier.
    pub aligned: BTreeMap<String, Vec<Point3D>>,
    /// Members excluded by per-pair errors; the batch continued without them.
    pub skipped: Vec<SkippedMember>,
}

/// Superpose every member onto `reference`, returning the aligned set plus a
/// report of skipped members.
///
/// The reference itself appears in the output unchanged, serving as its own
/// aligned copy. A member stored under the reference identifier is ignored in
/// favor of that copy. Each output is keyed by its source identifier, so the
/// mapping from input to output is stable regardless of iteration order.
///
/// # Errors
///
/// Returns [`ChrysaoraError::EmptyInput`] if the reference has zero rows.
/// Per-member failures are never propagated; they land in
/// [`EnsembleAlignment::skipped`].
pub fn align_ensemble(
    reference_id: &str,
    reference: &[Point3D],
    members: &BTreeMap<String, Vec<Point3D>>,
) -> Result<EnsembleAlignment> {
    if reference.is_empty() {
        return Err(ChrysaoraError::EmptyInput(
            "ensemble reference has zero rows".into(),
        ));
    }

    #[cfg(feature = "parallel")]
    let fits: Vec<(String, Result<Vec<Point3D>>)> = {
        use rayon::prelude::*;
        members
            .iter()
            .filter(|(id, _)| id.as_str() != reference_id)
            .collect::<Vec<_>>()
            .into_par_iter()
            .map(|(id, coords)| {
                (
                    id.clone(),
                    align_pair(coords, reference).map(|fit| fit.aligned),
                )
            })
            .collect()
    };

    #[cfg(not(feature = "parallel"))]
    let fits: Vec<(String, Result<Vec<Point3D>>)> = members
        .iter()
        .filter(|(id, _)| id.as_str() != reference_id)
        .map(|(id, coords)| {
            (
                id.clone(),
                align_pair(coords, reference).map(|fit| fit.aligned),
            )
        })
        .collect();

    let mut aligned = BTreeMap::new();
    let mut skipped = Vec::new();
    for (id, fit) in fits {
        match fit {
            Ok(coords) => {
                aligned.insert(id, coords);
            }
            Err(err) => skipped.push(SkippedMember {
                id,
                reason: err.to_string(),
            }),
        }
    }
    aligned.insert(reference_id.to_string(), reference.to_vec());

    Ok(EnsembleAlignment { aligned, skipped })
}

/// Flattened ensemble: one row per structure, columns `x1, y1, z1, x2, ...`
/// in a fixed shared residue ordering.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnsembleMatrix {
    /// Structure identifiers, one per row, in row order.
    pub ids: Vec<String>,
    /// Flattened coordinate rows; every row has the same length.
    pub rows: Vec<Vec<f64>>,
}

impl EnsembleMatrix {
    /// Number of structures (rows).
    pub fn n_structures(&self) -> usize {
        self.rows.len()
    }

    /// Number of coordinate columns.
    pub fn n_columns(&self) -> usize {
        self.rows.first().map_or(0, |r| r.len())
    }

    /// Number of residues (columns / 3).
    pub fn n_residues(&self) -> usize {
        self.n_columns() / 3
    }
}

impl Summarizable for EnsembleMatrix {
    fn summary(&self) -> String {
        format!(
            "EnsembleMatrix — {} structure(s) × {} residue(s)",
            self.n_structures(),
            self.n_residues(),
        )
    }
}

impl ContentAddressable for EnsembleMatrix {
    fn content_hash(&self) -> String {
        let mut hasher = Sha256::new();
        for (id, row) in self.ids.iter().zip(self.rows.iter()) {
            hasher.update(id.as_bytes());
            for value in row {
                hasher.update(value.to_le_bytes());
            }
        }
        hex::encode(hasher.finalize())
    }
}

/// Flatten an aligned set into an [`EnsembleMatrix`], one row per structure.
///
/// Row order follows the identifier order of the map, so the matrix is
/// reproducible for a given input set.
///
/// # Errors
///
/// Returns [`ChrysaoraError::EmptyInput`] if the set is empty and
/// [`ChrysaoraError::ShapeMismatch`] if any two members differ in residue
/// count — the alignment/trimming upstream failed and the ensemble is
/// invalid.
pub fn flatten_ensemble(aligned: &BTreeMap<String, Vec<Point3D>>) -> Result<EnsembleMatrix> {
    if aligned.is_empty() {
        return Err(ChrysaoraError::EmptyInput(
            "cannot flatten an empty ensemble".into(),
        ));
    }

    let n_residues = aligned.values().next().map_or(0, |c| c.len());
    let mut ids = Vec::with_capacity(aligned.len());
    let mut rows = Vec::with_capacity(aligned.len());
    for (id, coords) in aligned {
        if coords.len() != n_residues {
            return Err(ChrysaoraError::ShapeMismatch(format!(
                "ensemble member '{}' has {} residues, expected {}",
                id,
                coords.len(),
                n_residues
            )));
        }
        let mut row = Vec::with_capacity(n_residues * 3);
        for p in coords {
            row.push(p.x);
            row.push(p.y);
            row.push(p.z);
        }
        ids.push(id.clone());
        rows.push(row);
    }

    Ok(EnsembleMatrix { ids, rows })
}
