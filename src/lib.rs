//! Cell-wise divergence recovery for finite element fields.
//!
//! This crate computes, for a field defined over a flat simplex mesh, a piecewise-constant
//! (one value per cell) approximation of its divergence, using the Gauss divergence theorem
//!
//! ```text
//! ∫_K div(u) dV = ∫_∂K u · n dA ≈ Σ_F u(m_F) · n_F |F|
//! ```
//!
//! where the boundary integral over each cell `K` is approximated by midpoint-rule flux
//! summation over the facets `F` of the cell. For vector fields the result is the cell-wise
//! divergence, for rank-2 tensor fields the row-wise divergence, and for scalar fields the
//! gradient. Since the facet fluxes are evaluated at facet midpoints, the recovered values
//! are exact for fields that are affine on each cell.
//!
//! Two entry points are provided:
//!
//! - [`cellwise_divergence`] evaluates the divergence of a pointwise field directly, by
//!   interpolating it into a nonconforming Crouzeix–Raviart space (degrees of freedom at
//!   facet midpoints) and summing fluxes cell by cell.
//! - [`divergence_matrix`] builds the same operation as a sparse matrix acting on the
//!   coefficients of a continuous piecewise-linear vector field, so that the one-time
//!   construction cost can be amortized over many applications.
//!
//! Only meshes whose topological dimension matches their geometric dimension are supported:
//! triangle meshes in 2D and tetrahedral meshes in 3D. Surface meshes embedded in 3D are
//! rejected with [`Error::UnsupportedTopology`].

use nalgebra::RealField;

pub mod connectivity;
pub mod divergence;
pub mod error;
pub mod field;
pub mod geometry;
pub mod kernel;
pub mod mesh;
pub mod operator;
pub mod space;

pub use divergence::{cellwise_divergence, CellwiseDivergence};
pub use error::Error;
pub use kernel::MidpointFluxKernel;
pub use operator::{divergence_matrix, DivergenceOperator, DivergenceOperatorAssembler};

pub extern crate nalgebra;
pub extern crate nalgebra_sparse;

/// A real scalar type suitable for geometric computations.
///
/// Used as a trait alias for the bounds frequently needed by generic `fluxdiv` routines.
pub trait Real: RealField + Copy {}

impl<T: RealField + Copy> Real for T {}
