//! Error types reported by the divergence entry points.
use std::fmt;
use std::fmt::{Display, Formatter};

/// Library-wide error type.
///
/// All validation happens eagerly, before any facet topology or coefficient vector is
/// constructed: a failing call does no expensive work and produces no partial results.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The field's tensor rank is not 0, 1 or 2.
    InvalidRank { rank: usize },
    /// A value dimension of the field differs from the geometric dimension of the mesh.
    ValueDimensionMismatch {
        index: usize,
        value_dimension: usize,
        geometric_dimension: usize,
    },
    /// The mesh describes a manifold embedded in a higher-dimensional space, i.e. its
    /// topological dimension differs from its geometric dimension.
    UnsupportedTopology {
        topological_dimension: usize,
        geometric_dimension: usize,
    },
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRank { rank } => {
                write!(f, "Fields of tensor rank {} are not supported (rank must be 0, 1 or 2)", rank)
            }
            Self::ValueDimensionMismatch {
                index,
                value_dimension,
                geometric_dimension,
            } => {
                write!(
                    f,
                    "Value dimension {} at tensor index {} does not match the geometric dimension {} of the mesh",
                    value_dimension, index, geometric_dimension
                )
            }
            Self::UnsupportedTopology {
                topological_dimension,
                geometric_dimension,
            } => {
                write!(
                    f,
                    "Meshes of topological dimension {} embedded in {} spatial dimensions are not supported",
                    topological_dimension, geometric_dimension
                )
            }
        }
    }
}

impl std::error::Error for Error {}
