//! Index-based cell connectivity types.
use crate::geometry::{Tetrahedron, Triangle, Triangle2d, Triangle3d};
use itertools::izip;
use nalgebra::allocator::Allocator;
use nalgebra::{DefaultAllocator, DimName, OPoint, Point2, Point3, RealField, Scalar, U2, U3};
use serde::{Deserialize, Serialize};
use std::ops::{Deref, DerefMut};

/// Facet enumeration for a cell connectivity.
///
/// Facets are the codimension-1 entities of the cell: edges of a triangle, triangular
/// faces of a tetrahedron.
pub trait Connectivity: Clone {
    type FacetConnectivity: Connectivity;

    fn num_facets(&self) -> usize;
    fn get_facet_connectivity(&self, index: usize) -> Option<Self::FacetConnectivity>;

    fn vertex_indices(&self) -> &[usize];
}

impl Connectivity for () {
    type FacetConnectivity = ();

    fn num_facets(&self) -> usize {
        0
    }

    fn get_facet_connectivity(&self, _index: usize) -> Option<Self::FacetConnectivity> {
        None
    }

    fn vertex_indices(&self) -> &[usize] {
        const EMPTY_SLICE: &[usize] = &[];
        EMPTY_SLICE
    }
}

/// A connectivity whose indices describe a geometric cell in `D` dimensions.
pub trait CellConnectivity<T, D>: Connectivity
where
    T: Scalar,
    D: DimName,
    DefaultAllocator: Allocator<T, D>,
{
    /// Topological (reference) dimension of the cell, independent of `D`.
    type ReferenceDim: DimName;
    type Cell;

    fn cell(&self, vertices: &[OPoint<T, D>]) -> Option<Self::Cell>;
}

/// Connectivity for a two-node segment in two dimensions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Segment2d2Connectivity(pub [usize; 2]);

impl Connectivity for Segment2d2Connectivity {
    type FacetConnectivity = ();

    fn num_facets(&self) -> usize {
        0
    }

    fn get_facet_connectivity(&self, _index: usize) -> Option<Self::FacetConnectivity> {
        None
    }

    fn vertex_indices(&self) -> &[usize] {
        &self.0
    }
}

/// Connectivity for a two-node segment in three dimensions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Segment2d3Connectivity(pub [usize; 2]);

impl Connectivity for Segment2d3Connectivity {
    type FacetConnectivity = ();

    fn num_facets(&self) -> usize {
        0
    }

    fn get_facet_connectivity(&self, _index: usize) -> Option<Self::FacetConnectivity> {
        None
    }

    fn vertex_indices(&self) -> &[usize] {
        &self.0
    }
}

/// Connectivity for a two-dimensional triangle element.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tri3d2Connectivity(pub [usize; 3]);

impl Connectivity for Tri3d2Connectivity {
    type FacetConnectivity = Segment2d2Connectivity;

    fn num_facets(&self) -> usize {
        3
    }

    fn get_facet_connectivity(&self, index: usize) -> Option<Self::FacetConnectivity> {
        let idx = &self.0;
        if index < 3 {
            Some(Segment2d2Connectivity([idx[index], idx[(index + 1) % 3]]))
        } else {
            None
        }
    }

    fn vertex_indices(&self) -> &[usize] {
        &self.0
    }
}

impl<T> CellConnectivity<T, U2> for Tri3d2Connectivity
where
    T: Scalar,
{
    type ReferenceDim = U2;
    type Cell = Triangle2d<T>;

    fn cell(&self, vertices: &[Point2<T>]) -> Option<Self::Cell> {
        Some(Triangle([
            vertices.get(self.0[0]).cloned()?,
            vertices.get(self.0[1]).cloned()?,
            vertices.get(self.0[2]).cloned()?,
        ]))
    }
}

impl Deref for Tri3d2Connectivity {
    type Target = [usize; 3];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Tri3d2Connectivity {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// Connectivity for a triangle element embedded in three dimensions.
///
/// Meshes built from this connectivity describe surfaces (topological dimension 2,
/// geometric dimension 3) and are rejected by the divergence entry points.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tri3d3Connectivity(pub [usize; 3]);

impl Connectivity for Tri3d3Connectivity {
    type FacetConnectivity = Segment2d3Connectivity;

    fn num_facets(&self) -> usize {
        3
    }

    fn get_facet_connectivity(&self, index: usize) -> Option<Self::FacetConnectivity> {
        let idx = &self.0;
        if index < 3 {
            Some(Segment2d3Connectivity([idx[index], idx[(index + 1) % 3]]))
        } else {
            None
        }
    }

    fn vertex_indices(&self) -> &[usize] {
        &self.0
    }
}

impl<T> CellConnectivity<T, U3> for Tri3d3Connectivity
where
    T: Scalar,
{
    type ReferenceDim = U2;
    type Cell = Triangle3d<T>;

    fn cell(&self, vertices: &[Point3<T>]) -> Option<Self::Cell> {
        Some(Triangle([
            vertices.get(self.0[0]).cloned()?,
            vertices.get(self.0[1]).cloned()?,
            vertices.get(self.0[2]).cloned()?,
        ]))
    }
}

impl Deref for Tri3d3Connectivity {
    type Target = [usize; 3];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Connectivity for a linear tetrahedral element.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tet4Connectivity(pub [usize; 4]);

impl Connectivity for Tet4Connectivity {
    type FacetConnectivity = Tri3d3Connectivity;

    fn num_facets(&self) -> usize {
        4
    }

    fn get_facet_connectivity(&self, index: usize) -> Option<Self::FacetConnectivity> {
        let v = &self.0;
        // The vertex sets per index match Tetrahedron::face
        match index {
            0 => Some(Tri3d3Connectivity([v[0], v[2], v[1]])),
            1 => Some(Tri3d3Connectivity([v[0], v[1], v[3]])),
            2 => Some(Tri3d3Connectivity([v[1], v[2], v[3]])),
            3 => Some(Tri3d3Connectivity([v[0], v[3], v[2]])),
            _ => None,
        }
    }

    fn vertex_indices(&self) -> &[usize] {
        &self.0
    }
}

impl<T> CellConnectivity<T, U3> for Tet4Connectivity
where
    T: RealField,
{
    type ReferenceDim = U3;
    type Cell = Tetrahedron<T>;

    fn cell(&self, vertices: &[Point3<T>]) -> Option<Self::Cell> {
        let mut tet_vertices = [
            Point3::origin(),
            Point3::origin(),
            Point3::origin(),
            Point3::origin(),
        ];
        for (tet_v, idx) in izip!(&mut tet_vertices, &self.0) {
            *tet_v = vertices.get(*idx).cloned()?;
        }
        Some(Tetrahedron::from_vertices(tet_vertices))
    }
}

impl Deref for Tet4Connectivity {
    type Target = [usize; 4];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
