//! Coordinate deviation metrics: difference vectors, RMSD, and RMSD tables.

use std::collections::BTreeMap;

use chrysaora_core::{Annotated, ChrysaoraError, Result};

use crate::types::Point3D;

/// Elementwise difference `a - b`, flattened row-major to
/// `x1, y1, z1, x2, y2, z2, ...`.
///
/// # Errors
///
/// Returns [`ChrysaoraError::ShapeMismatch`] if the matrices differ in row
/// count.
pub fn coordinate_difference(a: &[Point3D], b: &[Point3D]) -> Result<Vec<f64>> {
    if a.len() != b.len() {
        return Err(ChrysaoraError::ShapeMismatch(format!(
            "coordinate matrices differ in row count: {} vs {}",
            a.len(),
            b.len()
        )));
    }
    let mut diff = Vec::with_capacity(a.len() * 3);
    for (p, q) in a.iter().zip(b.iter()) {
        let d = p.sub(q);
        diff.push(d.x);
        diff.push(d.y);
        diff.push(d.z);
    }
    Ok(diff)
}

/// RMSD from a flattened coordinate-difference vector:
/// `‖diff‖ / sqrt(len(diff) / 3)`.
///
/// The length of `diff` must be divisible by 3 (one x,y,z triple per
/// residue); a non-divisible length makes the divisor fractional and the
/// result meaningless. Vectors produced by [`coordinate_difference`] always
/// satisfy this.
pub fn rmsd_from_difference(diff: &[f64]) -> f64 {
    let norm: f64 = diff.iter().map(|d| d * d).sum::<f64>().sqrt();
    norm / (diff.len() as f64 / 3.0).sqrt()
}

/// RMSD between two equal-shape coordinate matrices (direct comparison, no
/// alignment).
///
/// # Errors
///
/// Returns [`ChrysaoraError::ShapeMismatch`] if the matrices differ in row
/// count, or [`ChrysaoraError::EmptyInput`] if both are empty.
pub fn rmsd(a: &[Point3D], b: &[Point3D]) -> Result<f64> {
    if a.is_empty() && b.is_empty() {
        return Err(ChrysaoraError::EmptyInput(
            "cannot compute RMSD of zero-row coordinate matrices".into(),
        ));
    }
    let diff = coordinate_difference(a, b)?;
    Ok(rmsd_from_difference(&diff))
}

/// One row of an RMSD comparison table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RmsdRecord {
    /// Identifier of the compared structure.
    pub id: String,
    /// Raw RMSD against the reference.
    pub rmsd: f64,
    /// Min-max normalized RMSD over the comparison set.
    pub normalized: f64,
}

impl Annotated for RmsdRecord {
    fn name(&self) -> &str {
        &self.id
    }
}

/// RMSD of every member against a shared reference, min-max normalized over
/// the set and sorted ascending by raw RMSD.
///
/// Normalization is relative to this one comparison set: the smallest record
/// maps to 0.0 and the largest to 1.0. When every raw value is equal, all
/// normalized values are 0.0. Re-running with a changed set recomputes the
/// normalization from scratch.
///
/// # Errors
///
/// Returns [`ChrysaoraError::ShapeMismatch`] if any member differs from the
/// reference in row count; callers comparing the output of ensemble alignment
/// never hit this.
pub fn rmsd_table(
    reference: &[Point3D],
    members: &BTreeMap<String, Vec<Point3D>>,
) -> Result<Vec<RmsdRecord>> {
    let mut records = Vec::with_capacity(members.len());
    for (id, coords) in members {
        let value = rmsd(coords, reference)?;
        records.push(RmsdRecord {
            id: id.clone(),
            rmsd: value,
            normalized: 0.0,
        });
    }

    if !records.is_empty() {
        let min = records.iter().map(|r| r.rmsd).fold(f64::INFINITY, f64::min);
        let max = records
            .iter()
            .map(|r| r.rmsd)
            .fold(f64::NEG_INFINITY, f64::max);
        if max > min {
            for r in &mut records {
                r.normalized = (r.rmsd - min) / (max - min);
            }
        }
    }

    records.sort_by(|a, b| a.rmsd.partial_cmp(&b.rmsd).unwrap());
    Ok(records)
}
