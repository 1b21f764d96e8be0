//! Principal component analysis over flattened coordinate ensembles.
//!
//! The ensemble matrix is centered column-wise before decomposition and never
//! scaled: all columns are coordinates in the same physical units, and
//! standardizing them would distort the per-residue contribution
//! interpretation downstream. Components are extracted in descending
//! explained-variance order by power iteration with deflation on the
//! covariance matrix, using ndarray for the matrix work.

use chrysaora_core::{ChrysaoraError, Result, Summarizable};
use ndarray::{Array1, Array2, Axis};

/// Component count used when a decomposition is run only to extract loadings
/// for contribution analysis.
pub const DEFAULT_LOADING_COMPONENTS: usize = 6;

/// Result of a PCA decomposition.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PcaResult {
    /// Component vectors (loadings) in original coordinate space, one per
    /// component, ordered by descending explained variance.
    /// Shape: `n_components × n_features`.
    pub components: Vec<Vec<f64>>,
    /// Variance explained by each component (covariance eigenvalues).
    pub explained_variance: Vec<f64>,
    /// Fraction of total variance explained by each component.
    pub explained_variance_ratio: Vec<f64>,
    /// Projection of each structure onto each component.
    /// Shape: `n_samples × n_components`.
    pub scores: Vec<Vec<f64>>,
    /// Column means subtracted before decomposition.
    pub mean: Vec<f64>,
}

impl PcaResult {
    /// Number of extracted components.
    pub fn n_components(&self) -> usize {
        self.components.len()
    }
}

impl Summarizable for PcaResult {
    fn summary(&self) -> String {
        format!(
            "PCA — {} component(s) over {} structure(s), PC1 ratio {:.3}",
            self.n_components(),
            self.scores.len(),
            self.explained_variance_ratio.first().copied().unwrap_or(0.0),
        )
    }
}

/// PCA of an ensemble matrix (rows = structures, columns = flattened
/// coordinates).
///
/// `n_components` of `None` extracts `min(n_samples, n_features)` components
/// (the full decomposition); pass [`DEFAULT_LOADING_COMPONENTS`] for the
/// reduced loadings workflow.
///
/// # Errors
///
/// Returns [`ChrysaoraError::EmptyInput`] for a zero-row matrix,
/// [`ChrysaoraError::DegenerateInput`] for a zero-column matrix,
/// [`ChrysaoraError::ShapeMismatch`] for ragged rows, and
/// [`ChrysaoraError::InvalidInput`] for an out-of-range component count.
pub fn pca(rows: &[Vec<f64>], n_components: Option<usize>) -> Result<PcaResult> {
    let n_samples = rows.len();
    if n_samples == 0 {
        return Err(ChrysaoraError::EmptyInput(
            "pca: ensemble matrix has zero rows".into(),
        ));
    }
    let n_features = rows[0].len();
    if n_features == 0 {
        return Err(ChrysaoraError::DegenerateInput(
            "pca: ensemble matrix has zero columns".into(),
        ));
    }
    for (i, row) in rows.iter().enumerate() {
        if row.len() != n_features {
            return Err(ChrysaoraError::ShapeMismatch(format!(
                "pca: row {} has {} columns, expected {}",
                i,
                row.len(),
                n_features
            )));
        }
    }

    let max_components = n_samples.min(n_features);
    let k = n_components.unwrap_or(max_components);
    if k == 0 || k > max_components {
        return Err(ChrysaoraError::InvalidInput(format!(
            "pca: n_components ({}) must be in [1, {}]",
            k, max_components
        )));
    }

    // Build the data matrix and center column-wise
    let mut flat = Vec::with_capacity(n_samples * n_features);
    for row in rows {
        flat.extend_from_slice(row);
    }
    let x = Array2::from_shape_vec((n_samples, n_features), flat)
        .expect("shape already validated");
    let mean_arr = x.mean_axis(Axis(0)).expect("row count checked above");
    let centered = &x - &mean_arr;

    // Covariance matrix: C = X^T X / (n-1)
    let scale = if n_samples > 1 {
        (n_samples - 1) as f64
    } else {
        1.0
    };
    let cov = centered.t().dot(&centered) / scale;
    let total_variance: f64 = cov.diag().sum();

    // Power iteration with deflation. Each extracted direction is kept
    // orthogonal to the previous ones; rank-deficient ensembles (few
    // structures, many coordinates) have a near-zero eigenvalue tail that
    // must not drift back into the span of earlier components.
    let mut cov_work = cov;
    let mut components: Vec<Array1<f64>> = Vec::with_capacity(k);
    let mut eigenvalues = Vec::with_capacity(k);
    for _ in 0..k {
        let (eigenvalue, eigenvector) = power_iteration(&cov_work, &components, 300);
        eigenvalues.push(eigenvalue);

        let v = eigenvector.view().insert_axis(Axis(1));
        cov_work = cov_work - eigenvalue * v.dot(&v.t());
        components.push(eigenvector);
    }

    let explained_variance_ratio: Vec<f64> = eigenvalues
        .iter()
        .map(|&e| {
            if total_variance > 0.0 {
                e / total_variance
            } else {
                0.0
            }
        })
        .collect();

    // Project the centered data onto the components
    let mut comp_mat = Array2::zeros((k, n_features));
    for (i, c) in components.iter().enumerate() {
        comp_mat.row_mut(i).assign(c);
    }
    let score_mat = centered.dot(&comp_mat.t());
    let scores: Vec<Vec<f64>> = score_mat.outer_iter().map(|row| row.to_vec()).collect();

    Ok(PcaResult {
        components: components.into_iter().map(|c| c.to_vec()).collect(),
        explained_variance: eigenvalues,
        explained_variance_ratio,
        scores,
        mean: mean_arr.to_vec(),
    })
}

/// Dominant eigenpair of a symmetric matrix by power iteration, constrained
/// orthogonal to the already-extracted directions.
fn power_iteration(
    matrix: &Array2<f64>,
    previous: &[Array1<f64>],
    max_iter: usize,
) -> (f64, Array1<f64>) {
    let n = matrix.nrows();

    let mut v = Array1::from_vec((0..n).map(|i| 1.0 / ((i + 1) as f64)).collect());
    orthogonalize(&mut v, previous);
    let norm = v.dot(&v).sqrt();
    if norm > 0.0 {
        v /= norm;
    }

    let mut eigenvalue = 0.0;

    for _ in 0..max_iter {
        let mut w = matrix.dot(&v);
        let new_eigenvalue = v.dot(&w);
        orthogonalize(&mut w, previous);
        let wnorm = w.dot(&w).sqrt();
        if wnorm < 1e-15 {
            break;
        }
        let w_normalized = &w / wnorm;
        let diff: f64 = (&v - &w_normalized).mapv(|x| x * x).sum();
        v = w_normalized;
        eigenvalue = new_eigenvalue;
        if diff < 1e-12 {
            break;
        }
    }

    (eigenvalue.max(0.0), v)
}

fn orthogonalize(v: &mut Array1<f64>, previous: &[Array1<f64>]) {
    for p in previous {
        let proj = v.dot(p);
        v.scaled_add(-proj, p);
    }
}
