//! Sparse-operator form of the cell-wise divergence.
use crate::connectivity::CellConnectivity;
use crate::error::Error;
use crate::geometry::SimplexCell;
use crate::kernel::MidpointFluxKernel;
use crate::mesh::Mesh;
use crate::space::{Dg0Field, FacetTopology};
use crate::Real;
use itertools::izip;
use log::debug;
use nalgebra::allocator::Allocator;
use nalgebra::{DVector, DVectorView, DefaultAllocator, DimName};
use nalgebra_sparse::{CooMatrix, CsrMatrix};

/// A sparse operator mapping the coefficients of a continuous piecewise-linear vector field
/// to its cell-wise divergence.
///
/// The operator has one row per mesh cell and one column per vector-valued vertex degree of
/// freedom (layout `D * vertex + component`). It is immutable after construction and `Sync`,
/// so a single operator may be applied concurrently from multiple threads.
#[derive(Debug, Clone, PartialEq)]
pub struct DivergenceOperator<T> {
    matrix: CsrMatrix<T>,
    num_cells: usize,
    num_vertices: usize,
}

impl<T> DivergenceOperator<T>
where
    T: Real,
{
    pub fn matrix(&self) -> &CsrMatrix<T> {
        &self.matrix
    }

    pub fn num_cells(&self) -> usize {
        self.num_cells
    }

    pub fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    /// Apply the operator to a vertex coefficient vector, producing the per-cell divergence.
    ///
    /// # Panics
    ///
    /// Panics if the coefficient vector length does not match the number of columns.
    pub fn apply<'a>(&self, coefficients: impl Into<DVectorView<'a, T>>) -> Dg0Field<T> {
        let coefficients = coefficients.into();
        assert_eq!(
            coefficients.len(),
            self.matrix.ncols(),
            "Coefficient vector length must match the number of vertex degrees of freedom"
        );

        let mut values = DVector::zeros(self.num_cells);
        for (row_index, row) in self.matrix.row_iter().enumerate() {
            let mut sum = T::zero();
            for (column, value) in izip!(row.col_indices(), row.values()) {
                sum += *value * coefficients[*column];
            }
            values[row_index] = sum;
        }

        Dg0Field::from_components_and_coefficients(1, values)
    }
}

/// Interpolation matrix from continuous piecewise-linear vector fields into the
/// vector-valued Crouzeix–Raviart space.
///
/// Rows are Crouzeix–Raviart degrees of freedom (`D * facet + component`), columns are
/// vertex degrees of freedom (`D * vertex + component`). A facet-midpoint value of a
/// piecewise-linear field is the arithmetic mean of the field values at the facet vertices,
/// so every row holds the weight `1 / vertices_per_facet` once per facet vertex.
pub fn assemble_p1_to_cr1_interpolation<T, D>(topology: &FacetTopology<T, D>) -> CsrMatrix<T>
where
    T: Real,
    D: DimName,
    DefaultAllocator: Allocator<T, D>,
{
    let d = D::dim();
    let weight = T::one()
        / T::from_usize(topology.vertices_per_facet()).expect("Must be able to fit usize in T");

    let mut coo = CooMatrix::new(d * topology.num_facets(), d * topology.num_vertices());
    for facet in 0..topology.num_facets() {
        for &vertex in topology.facet_vertices(facet) {
            for component in 0..d {
                coo.push(d * facet + component, d * vertex + component, weight);
            }
        }
    }

    CsrMatrix::from(&coo)
}

/// Assemble the weak-form matrix `∫ div(trial) · test dx` over the vector-valued
/// Crouzeix–Raviart trial space and the piecewise-constant test space.
///
/// On a simplex, the Crouzeix–Raviart basis function of facet `F` has the constant gradient
/// `n_F |F| / |K|`, so the cell integral of `div(φ_F e_c)` is `n_c(K, F) |F|`.
pub fn assemble_divergence_form<T, D>(topology: &FacetTopology<T, D>) -> CsrMatrix<T>
where
    T: Real,
    D: DimName,
    DefaultAllocator: Allocator<T, D>,
{
    let d = D::dim();

    let mut coo = CooMatrix::new(topology.num_cells(), d * topology.num_facets());
    for cell in 0..topology.num_cells() {
        for local in 0..topology.facets_per_cell() {
            let facet = topology.cell_facet(cell, local);
            let normal = topology.facet_outward_normal(cell, local);
            let facet_measure = topology.facet_measure(facet);
            for component in 0..d {
                coo.push(cell, d * facet + component, normal[component] * facet_measure);
            }
        }
    }

    CsrMatrix::from(&coo)
}

/// Assembles [`DivergenceOperator`]s for simplex meshes.
///
/// The assembly composes two sparse matrices: the midpoint-rule divergence matrix over the
/// Crouzeix–Raviart space (the weak-form matrix with its values reconciled by the kernel),
/// and the interpolation matrix from vertex coefficients into that space. Construction is a
/// one-time cost; the resulting operator is intended to be reused across many fields.
pub struct DivergenceOperatorAssembler {
    kernel: MidpointFluxKernel,
}

impl DivergenceOperatorAssembler {
    pub fn new(kernel: MidpointFluxKernel) -> Self {
        Self { kernel }
    }

    pub fn assemble<T, D, C>(&self, mesh: &Mesh<T, D, C>) -> Result<DivergenceOperator<T>, Error>
    where
        T: Real,
        D: DimName,
        C: CellConnectivity<T, D>,
        C::Cell: SimplexCell<T, D>,
        DefaultAllocator: Allocator<T, D>,
    {
        let topology = FacetTopology::from_mesh(mesh)?;

        let interpolation = assemble_p1_to_cr1_interpolation(&topology);
        let mut form = assemble_divergence_form(&topology);
        self.kernel.overwrite_divergence_matrix(&topology, &mut form);

        let matrix = &form * &interpolation;
        debug!(
            "Assembled divergence operator: {} x {} with {} stored entries",
            matrix.nrows(),
            matrix.ncols(),
            matrix.nnz()
        );

        Ok(DivergenceOperator {
            matrix,
            num_cells: topology.num_cells(),
            num_vertices: topology.num_vertices(),
        })
    }
}

/// Build the divergence operator for `mesh` with a default kernel.
///
/// See [`DivergenceOperatorAssembler::assemble`].
pub fn divergence_matrix<T, D, C>(mesh: &Mesh<T, D, C>) -> Result<DivergenceOperator<T>, Error>
where
    T: Real,
    D: DimName,
    C: CellConnectivity<T, D>,
    C::Cell: SimplexCell<T, D>,
    DefaultAllocator: Allocator<T, D>,
{
    DivergenceOperatorAssembler::new(MidpointFluxKernel).assemble(mesh)
}
