//! Statistical decomposition of coordinate ensembles for the Chrysaora
//! ecosystem.
//!
//! - **PCA** — Column-centered principal component analysis in [`pca`]
//! - **Contributions** — Per-residue loading magnitudes in [`contributions`]
//!
//! The public API is slice-based: an ensemble matrix is `&[Vec<f64>]` with
//! one row per structure, as produced by
//! `chrysaora_struct::flatten_ensemble`.
//!
//! # Quick start
//!
//! ```
//! use chrysaora_stats::pca::pca;
//! use chrysaora_stats::contributions::residue_contributions;
//!
//! // Three structures, two residues; only the second residue moves
//! let ensemble = vec![
//!     vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0],
//!     vec![0.0, 0.0, 0.0, 2.0, 0.0, 0.0],
//!     vec![0.0, 0.0, 0.0, 3.0, 0.0, 0.0],
//! ];
//!
//! let decomposition = pca(&ensemble, None).unwrap();
//! let ranked = residue_contributions(&decomposition, 0).unwrap();
//! assert_eq!(ranked[0].residue, 2);
//! ```

pub mod contributions;
pub mod pca;

pub use contributions::{residue_contributions, ResidueContribution};
pub use pca::{pca, PcaResult, DEFAULT_LOADING_COMPONENTS};
