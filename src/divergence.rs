//! Cell-wise divergence evaluation of pointwise fields.
use crate::connectivity::CellConnectivity;
use crate::error::Error;
use crate::field::Field;
use crate::geometry::SimplexCell;
use crate::kernel::MidpointFluxKernel;
use crate::mesh::Mesh;
use crate::space::{interpolate_to_cr1, Dg0Field, FacetTopology};
use crate::Real;
use nalgebra::allocator::Allocator;
use nalgebra::{DVector, DefaultAllocator, DimName};

/// Evaluates the cell-wise divergence of a field by the Gauss divergence theorem.
///
/// The field is interpolated into a Crouzeix–Raviart space (assigning every facet-midpoint
/// degree of freedom the field value at the midpoint), after which the flux-summation
/// kernel integrates the normal fluxes across each cell boundary. The result is a
/// piecewise-constant field: the divergence for vector input, the row-wise divergence for
/// rank-2 tensor input, and the gradient for scalar input. Since the fluxes are evaluated
/// by the midpoint rule, the computed values are exact for fields affine on each cell.
pub struct CellwiseDivergence {
    kernel: MidpointFluxKernel,
}

impl CellwiseDivergence {
    pub fn new(kernel: MidpointFluxKernel) -> Self {
        Self { kernel }
    }

    /// Compute the cell-wise divergence (or gradient) of `field` on `mesh`.
    ///
    /// The returned field has one coefficient block per mesh cell: a single component for
    /// vector input, and one component per spatial dimension for scalar and tensor input.
    ///
    /// Errors if the field's rank is not 0, 1 or 2, if a value dimension differs from the
    /// geometric dimension, or if the mesh is an embedded surface mesh. All validation
    /// happens before any topology construction or field evaluation.
    pub fn evaluate<T, D, C, F>(&self, field: &F, mesh: &Mesh<T, D, C>) -> Result<Dg0Field<T>, Error>
    where
        T: Real,
        D: DimName,
        C: CellConnectivity<T, D>,
        C::Cell: SimplexCell<T, D>,
        F: Field<T, D> + ?Sized,
        DefaultAllocator: Allocator<T, D>,
    {
        let geometric_dimension = D::dim();

        let rank = field.rank();
        if rank > 2 {
            return Err(Error::InvalidRank { rank });
        }
        let topological_dimension = C::ReferenceDim::dim();
        if topological_dimension != geometric_dimension {
            return Err(Error::UnsupportedTopology {
                topological_dimension,
                geometric_dimension,
            });
        }
        for index in 0..rank {
            let value_dimension = field.value_dimension(index);
            if value_dimension != geometric_dimension {
                return Err(Error::ValueDimensionMismatch {
                    index,
                    value_dimension,
                    geometric_dimension,
                });
            }
        }

        let topology = FacetTopology::from_mesh(mesh)?;
        let cr_coefficients = interpolate_to_cr1(field, &topology);

        // The kernel always computes the divergence of one vector field. A vector input is
        // a single such operation; scalar and tensor inputs decompose into one operation
        // per output component (component `c` of the gradient uses the flux of `f e_c`,
        // row `r` of the tensor divergence uses the flux of the r-th tensor row).
        let components = if rank == 1 { 1 } else { geometric_dimension };
        let num_facets = topology.num_facets();
        let d = geometric_dimension;

        let mut output = DVector::zeros(components * topology.num_cells());
        let mut gathered = vec![T::zero(); d * num_facets];
        let mut per_cell = vec![T::zero(); topology.num_cells()];

        for pass in 0..components {
            for facet in 0..num_facets {
                for component in 0..d {
                    gathered[d * facet + component] = match rank {
                        1 => cr_coefficients[d * facet + component],
                        0 => {
                            if component == pass {
                                cr_coefficients[facet]
                            } else {
                                T::zero()
                            }
                        }
                        _ => cr_coefficients[d * d * facet + d * pass + component],
                    };
                }
            }

            self.kernel
                .accumulate_cell_divergence(&topology, &gathered, &mut per_cell);

            for (cell, value) in per_cell.iter().enumerate() {
                output[components * cell + pass] = *value;
            }
        }

        Ok(Dg0Field::from_components_and_coefficients(components, output))
    }
}

/// Compute the cell-wise divergence of `field` on `mesh` with a default kernel.
///
/// See [`CellwiseDivergence::evaluate`].
pub fn cellwise_divergence<T, D, C, F>(field: &F, mesh: &Mesh<T, D, C>) -> Result<Dg0Field<T>, Error>
where
    T: Real,
    D: DimName,
    C: CellConnectivity<T, D>,
    C::Cell: SimplexCell<T, D>,
    F: Field<T, D> + ?Sized,
    DefaultAllocator: Allocator<T, D>,
{
    CellwiseDivergence::new(MidpointFluxKernel).evaluate(field, mesh)
}
