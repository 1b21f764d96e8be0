//! Coordinate geometry primitives: centroids and centering.

use chrysaora_core::{ChrysaoraError, Result};

use crate::types::Point3D;

/// Unweighted center of mass of a coordinate matrix (column-wise mean of rows).
///
/// # Errors
///
/// Returns [`ChrysaoraError::EmptyInput`] if the matrix has zero rows.
pub fn center_of_mass(points: &[Point3D]) -> Result<Point3D> {
    if points.is_empty() {
        return Err(ChrysaoraError::EmptyInput(
            "cannot compute center of mass of a zero-row coordinate matrix".into(),
        ));
    }
    let mut sum = Point3D::zero();
    for p in points {
        sum = sum.add(p);
    }
    Ok(sum.scale(1.0 / points.len() as f64))
}

/// Shift a coordinate matrix so its center of mass lies at the origin.
///
/// Pure function; the input matrix is never mutated.
///
/// # Errors
///
/// Returns [`ChrysaoraError::EmptyInput`] if the matrix has zero rows.
pub fn center_to_origin(points: &[Point3D]) -> Result<Vec<Point3D>> {
    let com = center_of_mass(points)?;
    Ok(points.iter().map(|p| p.sub(&com)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_of_mass_known() {
        let points = vec![
            Point3D::new(0.0, 0.0, 0.0),
            Point3D::new(2.0, 0.0, 0.0),
            Point3D::new(0.0, 2.0, 0.0),
        ];
        let com = center_of_mass(&points).unwrap();
        assert!((com.x - 2.0 / 3.0).abs() < 1e-10);
        assert!((com.y - 2.0 / 3.0).abs() < 1e-10);
        assert!(com.z.abs() < 1e-10);
    }

    #[test]
    fn centered_matrix_has_zero_center() {
        let points = vec![
            Point3D::new(1.0, 2.0, 3.0),
            Point3D::new(-4.0, 0.5, 7.0),
            Point3D::new(12.0, -9.0, 0.1),
            Point3D::new(3.3, 4.4, -5.5),
        ];
        let centered = center_to_origin(&points).unwrap();
        let com = center_of_mass(&centered).unwrap();
        assert!(com.norm() < 1e-9, "residual center {:?}", com);
    }

    #[test]
    fn center_to_origin_does_not_mutate_input() {
        let points = vec![Point3D::new(1.0, 1.0, 1.0), Point3D::new(3.0, 3.0, 3.0)];
        let _ = center_to_origin(&points).unwrap();
        assert_eq!(points[0], Point3D::new(1.0, 1.0, 1.0));
    }

    #[test]
    fn empty_matrix_errors() {
        assert!(center_of_mass(&[]).is_err());
        assert!(center_to_origin(&[]).is_err());
    }
}
