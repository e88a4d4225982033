//! Geometric primitives for simplex cells and their facets.
//!
//! The divergence recovery only ever needs a small amount of geometry per cell: the cell
//! measure, and for every facet its midpoint, its measure and its outward unit normal.
//! [`SimplexCell`] collects exactly these queries; the concrete primitives implement them
//! for triangles and tetrahedra.
use nalgebra::allocator::Allocator;
use nalgebra::{DefaultAllocator, DimName, OPoint, OVector, Point3, Scalar, Vector2, Vector3, U2, U3};
use numeric_literals::replace_float_literals;
use serde::{Deserialize, Serialize};

use crate::Real;

/// A line segment between two points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "OPoint<T, D>: Serialize",
    deserialize = "OPoint<T, D>: Deserialize<'de>"
))]
pub struct LineSegment<T, D>(pub [OPoint<T, D>; 2])
where
    T: Scalar,
    D: DimName,
    DefaultAllocator: Allocator<T, D>;

pub type LineSegment2d<T> = LineSegment<T, U2>;
pub type LineSegment3d<T> = LineSegment<T, U3>;

impl<T, D> Copy for LineSegment<T, D>
where
    T: Scalar,
    D: DimName,
    DefaultAllocator: Allocator<T, D>,
    OPoint<T, D>: Copy,
{
}

impl<T, D> LineSegment<T, D>
where
    T: Real,
    D: DimName,
    DefaultAllocator: Allocator<T, D>,
{
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    pub fn midpoint(&self) -> OPoint<T, D> {
        OPoint::from((&self.0[0].coords + &self.0[1].coords) * 0.5)
    }

    pub fn length(&self) -> T {
        (&self.0[1] - &self.0[0]).norm()
    }
}

impl<T> LineSegment2d<T>
where
    T: Real,
{
    /// Returns a vector normal to the segment. The vector is *not* normalized.
    ///
    /// The direction is obtained by rotating the vector from start to end by -90 degrees.
    pub fn normal_dir(&self) -> Vector2<T> {
        let d = &self.0[1] - &self.0[0];
        Vector2::new(d.y, -d.x)
    }
}

/// A triangle, consisting of three vertices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound(
    serialize = "OPoint<T, D>: Serialize",
    deserialize = "OPoint<T, D>: Deserialize<'de>"
))]
pub struct Triangle<T, D>(pub [OPoint<T, D>; 3])
where
    T: Scalar,
    D: DimName,
    DefaultAllocator: Allocator<T, D>;

pub type Triangle2d<T> = Triangle<T, U2>;
pub type Triangle3d<T> = Triangle<T, U3>;

impl<T, D> Copy for Triangle<T, D>
where
    T: Scalar,
    D: DimName,
    DefaultAllocator: Allocator<T, D>,
    OPoint<T, D>: Copy,
{
}

impl<T, D> Triangle<T, D>
where
    T: Real,
    D: DimName,
    DefaultAllocator: Allocator<T, D>,
{
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    pub fn centroid(&self) -> OPoint<T, D> {
        let mut coords = OVector::<T, D>::zeros();
        for p in &self.0 {
            coords += &p.coords;
        }
        OPoint::from(coords / 3.0)
    }

    /// The edge with the given index, ordered `(a, b)`, `(b, c)`, `(c, a)`.
    ///
    /// The ordering matches the facet ordering of the triangle connectivity types.
    ///
    /// # Panics
    ///
    /// Panics if `index >= 3`.
    pub fn edge(&self, index: usize) -> LineSegment<T, D> {
        assert!(index < 3, "Edge index must be in bounds");
        LineSegment([self.0[index].clone(), self.0[(index + 1) % 3].clone()])
    }
}

impl<T> Triangle2d<T>
where
    T: Real,
{
    /// The signed area of the triangle, positive for counter-clockwise winding order.
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    pub fn signed_area(&self) -> T {
        let ab = &self.0[1] - &self.0[0];
        let ac = &self.0[2] - &self.0[0];
        0.5 * ab.perp(&ac)
    }

    pub fn area(&self) -> T {
        self.signed_area().abs()
    }
}

impl<T> Triangle3d<T>
where
    T: Real,
{
    /// Returns a vector normal to the triangle. The vector is *not* normalized.
    pub fn normal_dir(&self) -> Vector3<T> {
        let ab = &self.0[1] - &self.0[0];
        let ac = &self.0[2] - &self.0[0];
        ab.cross(&ac)
    }

    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    pub fn area(&self) -> T {
        0.5 * self.normal_dir().norm()
    }
}

/// A tetrahedron, consisting of four vertices.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "Point3<T>: Serialize"))]
#[serde(bound(deserialize = "Point3<T>: Deserialize<'de>"))]
pub struct Tetrahedron<T>
where
    T: Scalar,
{
    // Ordering uses the same conventions as Tet4Connectivity
    vertices: [Point3<T>; 4],
}

/// For each face of a tetrahedron, the local index of the vertex opposite to it.
const TET_FACE_OPPOSITE_VERTEX: [usize; 4] = [3, 2, 0, 1];

impl<T> Tetrahedron<T>
where
    T: Scalar,
{
    /// Construct a tetrahedron from the given points.
    ///
    /// Ordering is the same as for `Tet4Connectivity`.
    pub fn from_vertices(vertices: [Point3<T>; 4]) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[Point3<T>; 4] {
        &self.vertices
    }
}

impl<T> Tetrahedron<T>
where
    T: Real,
{
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    pub fn centroid(&self) -> Point3<T> {
        let mut coords = Vector3::zeros();
        for p in &self.vertices {
            coords += &p.coords;
        }
        Point3::from(coords * 0.25)
    }

    /// The signed volume of the tetrahedron, positive when vertex 3 lies on the
    /// counter-clockwise side of the face spanned by vertices 0, 1, 2.
    #[replace_float_literals(T::from_f64(literal).expect("Literal must fit in T"))]
    pub fn signed_volume(&self) -> T {
        let v = &self.vertices;
        let d1 = &v[1] - &v[0];
        let d2 = &v[2] - &v[0];
        let d3 = &v[3] - &v[0];
        d1.cross(&d2).dot(&d3) / 6.0
    }

    pub fn volume(&self) -> T {
        self.signed_volume().abs()
    }

    /// The face with the given index.
    ///
    /// The vertex sets per index match the facet ordering of `Tet4Connectivity`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= 4`.
    pub fn face(&self, index: usize) -> Triangle3d<T> {
        let v = &self.vertices;
        let tri = |i: usize, j: usize, k: usize| Triangle([v[i], v[j], v[k]]);

        match index {
            0 => tri(0, 2, 1),
            1 => tri(0, 1, 3),
            2 => tri(1, 2, 3),
            3 => tri(0, 3, 2),
            _ => panic!("Face index must be in bounds"),
        }
    }
}

/// Per-facet geometry queries for a simplex cell.
///
/// Facet indices correspond to the facet ordering of the cell's connectivity type, so that
/// the geometry reported for local facet `i` belongs to the same facet that the connectivity
/// reports vertex indices for.
pub trait SimplexCell<T, D>
where
    T: Real,
    D: DimName,
    DefaultAllocator: Allocator<T, D>,
{
    /// Topological dimension of the cell, independent of the dimension it is embedded in.
    fn topological_dim() -> usize;

    /// Number of facets (equal to the number of vertices for a simplex).
    fn num_facets(&self) -> usize;

    /// The topological-dimensional measure of the cell (area in 2D, volume in 3D).
    fn measure(&self) -> T;

    /// Midpoint (centroid) of the given facet.
    fn facet_midpoint(&self, index: usize) -> OPoint<T, D>;

    /// Measure of the given facet (edge length in 2D, face area in 3D).
    fn facet_measure(&self, index: usize) -> T;

    /// Outward unit normal of the given facet.
    fn facet_outward_normal(&self, index: usize) -> OVector<T, D>;
}

impl<T> SimplexCell<T, U2> for Triangle2d<T>
where
    T: Real,
{
    fn topological_dim() -> usize {
        2
    }

    fn num_facets(&self) -> usize {
        3
    }

    fn measure(&self) -> T {
        self.area()
    }

    fn facet_midpoint(&self, index: usize) -> OPoint<T, U2> {
        self.edge(index).midpoint()
    }

    fn facet_measure(&self, index: usize) -> T {
        self.edge(index).length()
    }

    fn facet_outward_normal(&self, index: usize) -> Vector2<T> {
        let edge = self.edge(index);
        let midpoint = edge.midpoint();
        let opposite = &self.0[(index + 2) % 3];
        let mut normal = edge.normal_dir().normalize();
        if normal.dot(&(&midpoint - opposite)) < T::zero() {
            normal = -normal;
        }
        normal
    }
}

impl<T> SimplexCell<T, U3> for Tetrahedron<T>
where
    T: Real,
{
    fn topological_dim() -> usize {
        3
    }

    fn num_facets(&self) -> usize {
        4
    }

    fn measure(&self) -> T {
        self.volume()
    }

    fn facet_midpoint(&self, index: usize) -> Point3<T> {
        self.face(index).centroid()
    }

    fn facet_measure(&self, index: usize) -> T {
        self.face(index).area()
    }

    fn facet_outward_normal(&self, index: usize) -> Vector3<T> {
        let face = self.face(index);
        let centroid = face.centroid();
        let opposite = &self.vertices[TET_FACE_OPPOSITE_VERTEX[index]];
        let mut normal = face.normal_dir().normalize();
        if normal.dot(&(&centroid - opposite)) < T::zero() {
            normal = -normal;
        }
        normal
    }
}

/// Triangles embedded in 3D report in-plane edge conormals as facet normals.
///
/// The divergence entry points reject embedded surface meshes before any geometry is
/// queried, but the implementation is total so that surface meshes remain valid inputs
/// at the type level.
impl<T> SimplexCell<T, U3> for Triangle3d<T>
where
    T: Real,
{
    fn topological_dim() -> usize {
        2
    }

    fn num_facets(&self) -> usize {
        3
    }

    fn measure(&self) -> T {
        self.area()
    }

    fn facet_midpoint(&self, index: usize) -> Point3<T> {
        self.edge(index).midpoint()
    }

    fn facet_measure(&self, index: usize) -> T {
        self.edge(index).length()
    }

    fn facet_outward_normal(&self, index: usize) -> Vector3<T> {
        let edge = self.edge(index);
        let direction = (&edge.0[1] - &edge.0[0]).normalize();
        let opposite = &self.0[(index + 2) % 3];
        // Component of (midpoint - opposite vertex) orthogonal to the edge; this lies in
        // the plane of the triangle and points away from the opposite vertex.
        let w = &edge.midpoint() - opposite;
        let conormal = &w - &(direction * w.dot(&direction));
        conormal.normalize()
    }
}
