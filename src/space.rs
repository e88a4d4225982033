//! Facet topology and the discrete spaces built on top of it.
//!
//! The nonconforming Crouzeix–Raviart space of lowest order has one degree-of-freedom block
//! per mesh facet (located at the facet midpoint), and the piecewise-constant space has one
//! block per cell. [`FacetTopology`] provides the global facet enumeration shared by both,
//! together with the precomputed facet geometry the flux summation needs.
use crate::connectivity::{CellConnectivity, Connectivity};
use crate::error::Error;
use crate::field::Field;
use crate::geometry::SimplexCell;
use crate::mesh::Mesh;
use crate::Real;
use nalgebra::allocator::Allocator;
use nalgebra::{DVector, DefaultAllocator, DimName, OPoint, OVector, Scalar};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Global enumeration of the unique facets of a simplex mesh, with precomputed geometry.
///
/// Facets are numbered in first-encounter order over the cells, so the numbering is
/// deterministic for a given mesh. Outward unit normals are stored per (cell, local facet)
/// pair, since the two cells sharing an interior facet see opposite normals.
#[derive(Debug, Clone)]
pub struct FacetTopology<T, D>
where
    T: Scalar,
    D: DimName,
    DefaultAllocator: Allocator<T, D>,
{
    num_cells: usize,
    num_vertices: usize,
    facets_per_cell: usize,
    vertices_per_facet: usize,
    /// Global facet index per (cell, local facet), row-major with stride `facets_per_cell`.
    cell_facets: Vec<usize>,
    /// Vertex indices per global facet, row-major with stride `vertices_per_facet`.
    facet_vertices: Vec<usize>,
    facet_midpoints: Vec<OPoint<T, D>>,
    facet_measures: Vec<T>,
    cell_measures: Vec<T>,
    /// Outward unit normal per (cell, local facet), row-major with stride `facets_per_cell`.
    facet_normals: Vec<OVector<T, D>>,
}

impl<T, D> FacetTopology<T, D>
where
    T: Real,
    D: DimName,
    DefaultAllocator: Allocator<T, D>,
{
    /// Build the facet topology of the given mesh.
    ///
    /// Fails with [`Error::UnsupportedTopology`] if the topological dimension of the mesh
    /// cells differs from the geometric dimension, i.e. for embedded surface meshes.
    ///
    /// # Panics
    ///
    /// Panics if the mesh connectivity references vertex indices out of bounds.
    pub fn from_mesh<C>(mesh: &Mesh<T, D, C>) -> Result<Self, Error>
    where
        C: CellConnectivity<T, D>,
        C::Cell: SimplexCell<T, D>,
    {
        let topological_dimension = C::ReferenceDim::dim();
        let geometric_dimension = D::dim();
        if topological_dimension != geometric_dimension {
            return Err(Error::UnsupportedTopology {
                topological_dimension,
                geometric_dimension,
            });
        }

        let num_cells = mesh.num_cells();
        let facets_per_cell = geometric_dimension + 1;
        let vertices_per_facet = geometric_dimension;

        let mut facet_indices: FxHashMap<Vec<usize>, usize> = FxHashMap::default();
        let mut cell_facets = Vec::with_capacity(num_cells * facets_per_cell);
        let mut facet_vertices = Vec::new();
        let mut facet_midpoints = Vec::new();
        let mut facet_measures = Vec::new();
        let mut cell_measures = Vec::with_capacity(num_cells);
        let mut facet_normals = Vec::with_capacity(num_cells * facets_per_cell);

        for connectivity in mesh.connectivity() {
            let cell = connectivity
                .cell(mesh.vertices())
                .expect("Mesh is not allowed to contain cells with indices out of bounds.");
            cell_measures.push(cell.measure());

            for local in 0..facets_per_cell {
                let facet_connectivity = connectivity
                    .get_facet_connectivity(local)
                    .expect("Simplex cells have one facet per vertex");
                let mut key = facet_connectivity.vertex_indices().to_vec();
                key.sort_unstable();

                let next_index = facet_midpoints.len();
                let global = *facet_indices.entry(key).or_insert(next_index);
                if global == next_index {
                    facet_midpoints.push(cell.facet_midpoint(local));
                    facet_measures.push(cell.facet_measure(local));
                    facet_vertices.extend_from_slice(facet_connectivity.vertex_indices());
                }

                cell_facets.push(global);
                facet_normals.push(cell.facet_outward_normal(local));
            }
        }

        Ok(Self {
            num_cells,
            num_vertices: mesh.vertices().len(),
            facets_per_cell,
            vertices_per_facet,
            cell_facets,
            facet_vertices,
            facet_midpoints,
            facet_measures,
            cell_measures,
            facet_normals,
        })
    }

    pub fn num_cells(&self) -> usize {
        self.num_cells
    }

    pub fn num_facets(&self) -> usize {
        self.facet_midpoints.len()
    }

    pub fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    pub fn facets_per_cell(&self) -> usize {
        self.facets_per_cell
    }

    pub fn vertices_per_facet(&self) -> usize {
        self.vertices_per_facet
    }

    /// Global facet index of the given local facet of a cell.
    pub fn cell_facet(&self, cell: usize, local_facet: usize) -> usize {
        self.cell_facets[self.facets_per_cell * cell + local_facet]
    }

    /// Global facet indices of all facets of a cell.
    pub fn cell_facets(&self, cell: usize) -> &[usize] {
        let begin = self.facets_per_cell * cell;
        &self.cell_facets[begin..begin + self.facets_per_cell]
    }

    /// Vertex indices of the given global facet.
    pub fn facet_vertices(&self, facet: usize) -> &[usize] {
        let begin = self.vertices_per_facet * facet;
        &self.facet_vertices[begin..begin + self.vertices_per_facet]
    }

    pub fn facet_midpoint(&self, facet: usize) -> &OPoint<T, D> {
        &self.facet_midpoints[facet]
    }

    pub fn facet_measure(&self, facet: usize) -> T {
        self.facet_measures[facet]
    }

    pub fn cell_measure(&self, cell: usize) -> T {
        self.cell_measures[cell]
    }

    /// Outward unit normal of the given local facet, as seen from the given cell.
    pub fn facet_outward_normal(&self, cell: usize, local_facet: usize) -> &OVector<T, D> {
        &self.facet_normals[self.facets_per_cell * cell + local_facet]
    }
}

/// Interpolate a field into the lowest-order Crouzeix–Raviart space by midpoint evaluation.
///
/// Each degree-of-freedom block receives the field value at the corresponding facet
/// midpoint, so the interpolation is exact at the midpoints. The coefficient layout is
/// `value_size * facet + component`.
pub fn interpolate_to_cr1<T, D, F>(field: &F, topology: &FacetTopology<T, D>) -> DVector<T>
where
    T: Real,
    D: DimName,
    F: Field<T, D> + ?Sized,
    DefaultAllocator: Allocator<T, D>,
{
    let block_size = field.value_size();
    let mut coefficients = DVector::zeros(block_size * topology.num_facets());
    let mut buffer = vec![T::zero(); block_size];

    for facet in 0..topology.num_facets() {
        field.evaluate(topology.facet_midpoint(facet), &mut buffer);
        for (component, value) in buffer.iter().enumerate() {
            coefficients[block_size * facet + component] = *value;
        }
    }

    coefficients
}

/// A function in a piecewise-constant (per-cell) space.
///
/// Stores `components` coefficients per mesh cell, in the layout
/// `components * cell + component`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dg0Field<T: Scalar> {
    components: usize,
    coefficients: DVector<T>,
}

impl<T> Dg0Field<T>
where
    T: Real,
{
    pub fn zeros(components: usize, num_cells: usize) -> Self {
        Self {
            components,
            coefficients: DVector::zeros(components * num_cells),
        }
    }

    /// Wrap an existing coefficient vector.
    ///
    /// # Panics
    ///
    /// Panics if the coefficient length is not a multiple of `components`.
    pub fn from_components_and_coefficients(components: usize, coefficients: DVector<T>) -> Self {
        assert!(
            coefficients.len() % components == 0,
            "Coefficient length must be a multiple of the number of components"
        );
        Self { components, coefficients }
    }

    pub fn components(&self) -> usize {
        self.components
    }

    pub fn num_cells(&self) -> usize {
        self.coefficients.len() / self.components
    }

    pub fn coefficients(&self) -> &DVector<T> {
        &self.coefficients
    }

    /// The coefficient block of the given cell.
    pub fn cell_values(&self, cell: usize) -> &[T] {
        let begin = self.components * cell;
        &self.coefficients.as_slice()[begin..begin + self.components]
    }
}
