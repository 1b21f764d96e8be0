//! Optimal rigid-body superposition via the quaternion method.
//!
//! Finds the rotation that best superposes a mobile coordinate matrix onto a
//! reference in the least-squares sense. The optimal rotation is recovered in
//! closed form as the dominant eigenvector of the symmetric 4x4 key matrix
//! built from the cross-covariance of the two centered point sets, so there is
//! no iterative refinement and no local-minimum risk.
//!
//! The superposed output lives in the *reference* frame: the centered mobile
//! set is rotated and then translated to the reference centroid, which is the
//! convention needed for overlaying structures and building ensembles.

use chrysaora_core::{ChrysaoraError, Result, Scored};

use crate::deviation::{coordinate_difference, rmsd_from_difference};
use crate::geometry::center_of_mass;
use crate::linalg::dominant_eigenvector;
use crate::types::Point3D;

/// Result of a quaternion superposition.
///
/// The rotation together with the two centroids describes the full rigid
/// transform: subtract `mobile_center`, rotate, add `reference_center`. This
/// lets a caller re-apply the fit to other coordinate sets of the same
/// structure (e.g. all atoms after fitting on alpha carbons).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SuperpositionResult {
    /// 3x3 rotation matrix (row-major), determinant +1.
    pub rotation: [[f64; 3]; 3],
    /// Centroid of the mobile matrix before centering.
    pub mobile_center: Point3D,
    /// Centroid of the reference matrix; the aligned output lives in this frame.
    pub reference_center: Point3D,
    /// Mobile coordinates after rotation and translation into the reference frame.
    pub aligned: Vec<Point3D>,
    /// RMSD between the aligned mobile matrix and the reference.
    pub rmsd: f64,
}

impl SuperpositionResult {
    /// Apply the fitted rigid transform to an arbitrary point.
    pub fn transform(&self, p: &Point3D) -> Point3D {
        let centered = p.sub(&self.mobile_center);
        rotate_point(&self.rotation, &centered).add(&self.reference_center)
    }
}

impl Scored for SuperpositionResult {
    fn score(&self) -> f64 {
        -self.rmsd
    }
}

/// Superpose `mobile` onto `reference` with the optimal least-squares rotation.
///
/// Rows must correspond one-to-one: row i of both matrices refers to the same
/// structural position. For point sets with degenerate key-matrix eigenvalues
/// (highly symmetric arrangements) the choice of eigenvector within the
/// degenerate subspace is solver-dependent; the returned rotation is still an
/// optimal one.
///
/// # Errors
///
/// Returns [`ChrysaoraError::EmptyInput`] if either matrix has zero rows, and
/// [`ChrysaoraError::ShapeMismatch`] if the row counts differ.
pub fn align_pair(mobile: &[Point3D], reference: &[Point3D]) -> Result<SuperpositionResult> {
    if mobile.is_empty() || reference.is_empty() {
        return Err(ChrysaoraError::EmptyInput(
            "cannot superpose zero-row coordinate matrices".into(),
        ));
    }
    if mobile.len() != reference.len() {
        return Err(ChrysaoraError::ShapeMismatch(format!(
            "mobile and reference differ in row count: {} vs {}",
            mobile.len(),
            reference.len()
        )));
    }

    let mobile_center = center_of_mass(mobile)?;
    let reference_center = center_of_mass(reference)?;
    let centered_mobile: Vec<Point3D> = mobile.iter().map(|p| p.sub(&mobile_center)).collect();
    let centered_reference: Vec<Point3D> = reference
        .iter()
        .map(|p| p.sub(&reference_center))
        .collect();

    let r = cross_covariance(&centered_mobile, &centered_reference);
    let f = key_matrix(&r);
    let q = dominant_eigenvector(&f);
    let rotation = quaternion_rotation(&q);

    let aligned: Vec<Point3D> = centered_mobile
        .iter()
        .map(|p| rotate_point(&rotation, p).add(&reference_center))
        .collect();

    let diff = coordinate_difference(&aligned, reference)?;
    let rmsd = rmsd_from_difference(&diff);

    Ok(SuperpositionResult {
        rotation,
        mobile_center,
        reference_center,
        aligned,
        rmsd,
    })
}

/// Cross-covariance matrix `R = Aᵀ · B` of two centered coordinate matrices.
fn cross_covariance(a: &[Point3D], b: &[Point3D]) -> [[f64; 3]; 3] {
    let mut r = [[0.0f64; 3]; 3];
    for (p, q) in a.iter().zip(b.iter()) {
        r[0][0] += p.x * q.x;
        r[0][1] += p.x * q.y;
        r[0][2] += p.x * q.z;
        r[1][0] += p.y * q.x;
        r[1][1] += p.y * q.y;
        r[1][2] += p.y * q.z;
        r[2][0] += p.z * q.x;
        r[2][1] += p.z * q.y;
        r[2][2] += p.z * q.z;
    }
    r
}

/// Symmetric 4x4 key matrix whose dominant eigenvector is the optimal
/// rotation quaternion (Kearsley formulation).
fn key_matrix(r: &[[f64; 3]; 3]) -> [[f64; 4]; 4] {
    [
        [
            r[0][0] + r[1][1] + r[2][2],
            r[1][2] - r[2][1],
            r[2][0] - r[0][2],
            r[0][1] - r[1][0],
        ],
        [
            r[1][2] - r[2][1],
            r[0][0] - r[1][1] - r[2][2],
            r[0][1] + r[1][0],
            r[0][2] + r[2][0],
        ],
        [
            r[2][0] - r[0][2],
            r[0][1] + r[1][0],
            r[1][1] - r[0][0] - r[2][2],
            r[1][2] + r[2][1],
        ],
        [
            r[0][1] - r[1][0],
            r[0][2] + r[2][0],
            r[1][2] + r[2][1],
            r[2][2] - r[1][1] - r[0][0],
        ],
    ]
}

/// Convert a unit quaternion `(q0, q1, q2, q3)` to a 3x3 rotation matrix.
fn quaternion_rotation(q: &[f64; 4]) -> [[f64; 3]; 3] {
    let (q0, q1, q2, q3) = (q[0], q[1], q[2], q[3]);
    [
        [
            q0 * q0 + q1 * q1 - q2 * q2 - q3 * q3,
            2.0 * (q1 * q2 - q0 * q3),
            2.0 * (q1 * q3 + q0 * q2),
        ],
        [
            2.0 * (q1 * q2 + q0 * q3),
            q0 * q0 - q1 * q1 + q2 * q2 - q3 * q3,
            2.0 * (q2 * q3 - q0 * q1),
        ],
        [
            2.0 * (q1 * q3 - q0 * q2),
            2.0 * (q2 * q3 + q0 * q1),
            q0 * q0 - q1 * q1 - q2 * q2 + q3 * q3,
        ],
    ]
}

fn rotate_point(m: &[[f64; 3]; 3], p: &Point3D) -> Point3D {
    Point3D {
        x: m[0][0] * p.x + m[0][1] * p.y + m[0][2] * p.z,
        y: m[1][0] * p.x + m[1][1] * p.y + m[1][2] * p.z,
        z: m[2][0] * p.x + m[2][1] * p.y + m[2][2] * p.z,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_cube() -> Vec<Point3D> {
        let mut points = Vec::new();
        for &x in &[0.0, 1.0] {
            for &y in &[0.0, 1.0] {
                for &z in &[0.0, 1.0] {
                    points.push(Point3D::new(x, y, z));
                }
            }
        }
        points
    }

    fn rotate_z_90(p: &Point3D) -> Point3D {
        Point3D::new(-p.y, p.x, p.z)
    }

    fn assert_matrix_close(got: &[[f64; 3]; 3], want: &[[f64; 3]; 3], tol: f64) {
        for i in 0..3 {
            for j in 0..3 {
                assert!(
                    (got[i][j] - want[i][j]).abs() < tol,
                    "entry [{i}][{j}]: got {}, want {}",
                    got[i][j],
                    want[i][j]
                );
            }
        }
    }

    fn check_orthonormal(r: &[[f64; 3]; 3], tol: f64) {
        // R^T * R ≈ I
        for i in 0..3 {
            for j in 0..3 {
                let mut dot = 0.0;
                for k in 0..3 {
                    dot += r[k][i] * r[k][j];
                }
                let want = if i == j { 1.0 } else { 0.0 };
                assert!((dot - want).abs() < tol, "R^T R at [{i}][{j}]: {dot}");
            }
        }
        // det(R) ≈ +1
        let det = r[0][0] * (r[1][1] * r[2][2] - r[1][2] * r[2][1])
            - r[0][1] * (r[1][0] * r[2][2] - r[1][2] * r[2][0])
            + r[0][2] * (r[1][0] * r[2][1] - r[1][1] * r[2][0]);
        assert!((det - 1.0).abs() < tol, "det(R) = {det}");
    }

    #[test]
    fn self_alignment_is_identity() {
        let points = vec![
            Point3D::new(1.0, 2.0, 3.0),
            Point3D::new(-2.0, 0.5, 1.0),
            Point3D::new(4.0, -1.0, 0.0),
            Point3D::new(0.0, 3.0, -2.0),
        ];
        let result = align_pair(&points, &points).unwrap();
        let identity = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        assert_matrix_close(&result.rotation, &identity, 1e-9);
        assert!(result.rmsd < 1e-9, "self-alignment rmsd {}", result.rmsd);
    }

    #[test]
    fn recovers_known_rotation_and_translation() {
        // Mobile = reference rotated 90° about z, then translated by (1, 2, 3).
        // The fit must recover the inverse rotation and superpose exactly.
        let reference = unit_cube();
        let shift = Point3D::new(1.0, 2.0, 3.0);
        let mobile: Vec<Point3D> = reference
            .iter()
            .map(|p| rotate_z_90(p).add(&shift))
            .collect();

        let result = align_pair(&mobile, &reference).unwrap();

        let inverse_z_90 = [[0.0, 1.0, 0.0], [-1.0, 0.0, 0.0], [0.0, 0.0, 1.0]];
        assert_matrix_close(&result.rotation, &inverse_z_90, 1e-6);
        assert!(result.rmsd < 1e-6, "post-alignment rmsd {}", result.rmsd);

        for (aligned, want) in result.aligned.iter().zip(reference.iter()) {
            assert!(aligned.distance_to(want) < 1e-6);
        }
    }

    #[test]
    fn pure_translation_recovers_identity() {
        let reference = unit_cube();
        let shift = Point3D::new(10.0, -20.0, 30.0);
        let mobile: Vec<Point3D> = reference.iter().map(|p| p.add(&shift)).collect();

        let result = align_pair(&mobile, &reference).unwrap();
        assert!(result.rmsd < 1e-9);
        assert!((result.mobile_center.x - result.reference_center.x - 10.0).abs() < 1e-9);
    }

    #[test]
    fn rotation_is_orthonormal_for_noisy_pair() {
        let reference = vec![
            Point3D::new(0.2, 1.7, -0.3),
            Point3D::new(2.1, 0.4, 1.1),
            Point3D::new(-1.3, 2.2, 0.8),
            Point3D::new(1.0, -0.6, 2.4),
            Point3D::new(-0.7, 0.9, -1.8),
        ];
        let mobile = vec![
            Point3D::new(0.5, 1.2, -0.1),
            Point3D::new(2.4, 0.1, 0.9),
            Point3D::new(-1.0, 2.5, 1.2),
            Point3D::new(0.8, -0.2, 2.0),
            Point3D::new(-0.9, 1.1, -1.5),
        ];
        let result = align_pair(&mobile, &reference).unwrap();
        check_orthonormal(&result.rotation, 1e-9);
    }

    #[test]
    fn transform_matches_aligned_output() {
        let reference = unit_cube();
        let mobile: Vec<Point3D> = reference
            .iter()
            .map(|p| rotate_z_90(p).add(&Point3D::new(5.0, 0.0, -2.0)))
            .collect();
        let result = align_pair(&mobile, &reference).unwrap();
        for (p, aligned) in mobile.iter().zip(result.aligned.iter()) {
            assert!(result.transform(p).distance_to(aligned) < 1e-9);
        }
    }

    #[test]
    fn score_is_negated_rmsd() {
        let a = vec![Point3D::new(0.0, 0.0, 0.0), Point3D::new(1.0, 1.0, 1.0)];
        let result = align_pair(&a, &a).unwrap();
        assert!((result.score() + result.rmsd).abs() < 1e-12);
    }

    #[test]
    fn empty_input_errors() {
        let a = vec![Point3D::new(0.0, 0.0, 0.0)];
        assert!(align_pair(&[], &a).is_err());
        assert!(align_pair(&a, &[]).is_err());
    }

    #[test]
    fn shape_mismatch_errors() {
        let a = vec![Point3D::new(0.0, 0.0, 0.0); 3];
        let b = vec![Point3D::new(0.0, 0.0, 0.0); 4];
        assert!(align_pair(&a, &b).is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn coord_matrix(rows: usize) -> impl Strategy<Value = Vec<Point3D>> {
        proptest::collection::vec(
            (-50.0..50.0f64, -50.0..50.0f64, -50.0..50.0f64),
            rows,
        )
        .prop_map(|v| v.into_iter().map(|(x, y, z)| Point3D::new(x, y, z)).collect())
    }

    proptest! {
        #[test]
        fn rotation_is_always_orthonormal(
            mobile in coord_matrix(12),
            reference in coord_matrix(12),
        ) {
            let result = align_pair(&mobile, &reference).unwrap();
            let r = &result.rotation;
            for i in 0..3 {
                for j in 0..3 {
                    let mut dot = 0.0;
                    for k in 0..3 {
                        dot += r[k][i] * r[k][j];
                    }
                    let want = if i == j { 1.0 } else { 0.0 };
                    prop_assert!((dot - want).abs() < 1e-9);
                }
            }
            let det = r[0][0] * (r[1][1] * r[2][2] - r[1][2] * r[2][1])
                - r[0][1] * (r[1][0] * r[2][2] - r[1][2] * r[2][0])
                + r[0][2] * (r[1][0] * r[2][1] - r[1][1] * r[2][0]);
            prop_assert!((det - 1.0).abs() < 1e-9);
        }

        #[test]
        fn self_alignment_rmsd_is_zero(points in coord_matrix(8)) {
            let result = align_pair(&points, &points).unwrap();
            prop_assert!(result.rmsd < 1e-9);
        }
    }
}
