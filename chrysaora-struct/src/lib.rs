//! Residue-level coordinate geometry and ensemble superposition for the
//! Chrysaora ecosystem.
//!
//! - **Geometry primitives** — Centroids and centering in [`geometry`]
//! - **Superposition** — Closed-form quaternion alignment in [`superposition`]
//! - **Deviation metrics** — Difference vectors, RMSD, RMSD tables in
//!   [`deviation`]
//! - **Ensembles** — Reference-fixed batch alignment and matrix flattening in
//!   [`ensemble`]
//!
//! Structure-file parsing and residue correspondence resolution happen
//! upstream; this crate only ever sees coordinate matrices whose rows already
//! share one residue numbering.
//!
//! # Quick start
//!
//! ```
//! use chrysaora_struct::superposition::align_pair;
//! use chrysaora_struct::types::Point3D;
//!
//! let reference = vec![
//!     Point3D::new(0.0, 0.0, 0.0),
//!     Point3D::new(1.5, 0.0, 0.0),
//!     Point3D::new(1.5, 1.5, 0.0),
//!     Point3D::new(0.0, 1.5, 1.5),
//! ];
//! // Same structure, translated away from the reference
//! let mobile: Vec<Point3D> = reference
//!     .iter()
//!     .map(|p| p.add(&Point3D::new(4.0, -2.0, 9.0)))
//!     .collect();
//!
//! let fit = align_pair(&mobile, &reference).unwrap();
//! assert!(fit.rmsd < 1e-9);
//! ```

pub mod deviation;
pub mod ensemble;
pub mod geometry;
mod linalg;
pub mod superposition;
pub mod types;

pub use deviation::{coordinate_difference, rmsd, rmsd_from_difference, rmsd_table, RmsdRecord};
pub use ensemble::{
    align_ensemble, flatten_ensemble, EnsembleAlignment, EnsembleMatrix, SkippedMember,
};
pub use geometry::{center_of_mass, center_to_origin};
pub use superposition::{align_pair, SuperpositionResult};
pub use types::Point3D;
