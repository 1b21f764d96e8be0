//! Shared primitives and traits for the Chrysaora ensemble-analysis workspace.
//!
//! `chrysaora-core` provides the foundation that the other Chrysaora crates
//! build on:
//!
//! - **Error types** — [`ChrysaoraError`] and [`Result`] for structured error
//!   handling
//! - **Traits** — Cross-crate abstractions like [`Scored`], [`Annotated`],
//!   [`Summarizable`], [`ContentAddressable`]

pub mod error;
pub mod traits;

pub use error::{ChrysaoraError, Result};
pub use traits::*;
