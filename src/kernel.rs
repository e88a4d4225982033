//! Midpoint-rule flux summation over cell boundaries.
use crate::space::FacetTopology;
use crate::Real;
use nalgebra::allocator::Allocator;
use nalgebra::{DefaultAllocator, DimName};
use nalgebra_sparse::CsrMatrix;

/// The numerical kernel of the divergence recovery.
///
/// For each cell `K`, the divergence of a vector field `u` is estimated from the midpoint
/// values of `u` on the facets of `K`:
///
/// ```text
/// div(u)|_K ≈ (1 / |K|) Σ_F u(m_F) · n_F |F|
/// ```
///
/// where `m_F` is the facet midpoint, `n_F` the outward unit normal and `|F|` the facet
/// measure. The estimate is exact whenever the normal flux is linear along each facet, in
/// particular for fields affine on the cell.
///
/// The kernel is stateless; construct it once and hand it to the components that need it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MidpointFluxKernel;

impl MidpointFluxKernel {
    /// Fill `out` with the per-cell divergence estimate of a vector-valued Crouzeix–Raviart
    /// function.
    ///
    /// `cr_coefficients` holds the facet-midpoint values of the field in the layout
    /// `D * facet + component`; `out` receives one value per cell.
    ///
    /// # Panics
    ///
    /// Panics if `cr_coefficients` or `out` do not have the expected lengths.
    pub fn accumulate_cell_divergence<T, D>(
        &self,
        topology: &FacetTopology<T, D>,
        cr_coefficients: &[T],
        out: &mut [T],
    ) where
        T: Real,
        D: DimName,
        DefaultAllocator: Allocator<T, D>,
    {
        let d = D::dim();
        assert_eq!(cr_coefficients.len(), d * topology.num_facets());
        assert_eq!(out.len(), topology.num_cells());

        for (cell, out_value) in out.iter_mut().enumerate() {
            let mut boundary_flux = T::zero();
            for local in 0..topology.facets_per_cell() {
                let facet = topology.cell_facet(cell, local);
                let normal = topology.facet_outward_normal(cell, local);
                let mut normal_flux = T::zero();
                for component in 0..d {
                    normal_flux += cr_coefficients[d * facet + component] * normal[component];
                }
                boundary_flux += normal_flux * topology.facet_measure(facet);
            }
            *out_value = boundary_flux / topology.cell_measure(cell);
        }
    }

    /// Overwrite the values of a weak-form divergence matrix with the midpoint-rule
    /// coefficients, in place.
    ///
    /// The incoming matrix must have one row per cell and one column per vector-valued
    /// Crouzeix–Raviart degree of freedom, with the sparsity pattern of the weak form
    /// `∫ div(trial) · test dx`. After the call, entry `(K, (F, c))` holds
    /// `n_c(K, F) |F| / |K|`, which makes the matrix algebraically identical to
    /// [`accumulate_cell_divergence`](Self::accumulate_cell_divergence) applied to a
    /// coefficient vector. The weak form itself differs from this by the `1 / |K|` row
    /// scaling, so the values are recomputed from the facet geometry rather than rescaled.
    ///
    /// # Panics
    ///
    /// Panics if the matrix dimensions do not match the topology, or if a stored entry
    /// refers to a facet that is not a facet of the entry's cell.
    pub fn overwrite_divergence_matrix<T, D>(
        &self,
        topology: &FacetTopology<T, D>,
        matrix: &mut CsrMatrix<T>,
    ) where
        T: Real,
        D: DimName,
        DefaultAllocator: Allocator<T, D>,
    {
        let d = D::dim();
        assert_eq!(matrix.nrows(), topology.num_cells());
        assert_eq!(matrix.ncols(), d * topology.num_facets());

        for (cell, column, value) in matrix.triplet_iter_mut() {
            let facet = column / d;
            let component = column % d;
            let local = topology
                .cell_facets(cell)
                .iter()
                .position(|&f| f == facet)
                .expect("Matrix sparsity must match the cell-facet adjacency");
            let normal = topology.facet_outward_normal(cell, local);
            *value = normal[component] * topology.facet_measure(facet) / topology.cell_measure(cell);
        }
    }
}
