//! Per-residue contribution analysis from PCA loadings.
//!
//! A component vector over a flattened ensemble assigns one loading to every
//! coordinate axis of every residue. Residue `i` (1-based) occupies flattened
//! columns `{3i, 3i+1, 3i+2}` (0-based); its contribution to a component is
//! the Euclidean norm of those three loading entries. Because the triples
//! partition the component vector, the squared contributions sum to the
//! squared norm of the whole loading vector.

use chrysaora_core::{ChrysaoraError, Result};

use crate::pca::PcaResult;

/// Contribution of one residue to one principal component.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResidueContribution {
    /// 1-based residue number in the shared residue ordering.
    pub residue: usize,
    /// Euclidean norm of the residue's three loading entries.
    pub contribution: f64,
    /// Contribution divided by the set maximum; 0.0 when the maximum is zero.
    pub normalized: f64,
}

/// Per-residue contributions to component `component` (0-based), ranked
/// descending by contribution and max-normalized to `[0, 1]`.
///
/// # Errors
///
/// Returns [`ChrysaoraError::InvalidInput`] if `component` is out of range
/// and [`ChrysaoraError::ShapeMismatch`] if the loading vector's length is
/// not divisible by 3 (the ensemble columns were not x,y,z triples).
pub fn residue_contributions(
    result: &PcaResult,
    component: usize,
) -> Result<Vec<ResidueContribution>> {
    let loadings = result.components.get(component).ok_or_else(|| {
        ChrysaoraError::InvalidInput(format!(
            "component index {} out of range ({} extracted)",
            component,
            result.components.len()
        ))
    })?;
    if loadings.len() % 3 != 0 {
        return Err(ChrysaoraError::ShapeMismatch(format!(
            "loading vector length {} is not divisible by 3",
            loadings.len()
        )));
    }

    let n_residues = loadings.len() / 3;
    let mut contributions = Vec::with_capacity(n_residues);
    for i in 0..n_residues {
        let x = loadings[i * 3];
        let y = loadings[i * 3 + 1];
        let z = loadings[i * 3 + 2];
        contributions.push(ResidueContribution {
            residue: i + 1,
            contribution: (x * x + y * y + z * z).sqrt(),
            normalized: 0.0,
        });
    }

    let max = contributions
        .iter()
        .map(|c| c.contribution)
        .fold(0.0f64, f64::max);
    if max > 0.0 {
        for c in &mut contributions {
            c.normalized = c.contribution / max;
        }
    }

    contributions.sort_by(|a, b| b.contribution.partial_cmp(&a.contribution).unwrap());
    Ok(contributions)
}
