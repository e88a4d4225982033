//! Pointwise fields with runtime-queryable value shape.
use crate::Real;
use nalgebra::allocator::Allocator;
use nalgebra::{DefaultAllocator, DimName, OMatrix, OPoint, OVector};

/// A field that can be evaluated at arbitrary points of the mesh domain.
///
/// The value shape is queried at runtime: `rank` 0 is a scalar field, 1 a vector field and
/// 2 a rank-2 tensor field, with [`value_dimension`](Field::value_dimension) components per
/// tensor index. The divergence entry points validate that every value dimension matches the
/// geometric dimension of the mesh before doing any work.
pub trait Field<T, D>
where
    T: Real,
    D: DimName,
    DefaultAllocator: Allocator<T, D>,
{
    /// Tensor rank of the field's values.
    fn rank(&self) -> usize;

    /// Value dimension along tensor index `index`.
    ///
    /// Only meaningful for `index < rank()`.
    fn value_dimension(&self, index: usize) -> usize;

    /// Evaluate the field at `x`, writing the value components into `values`.
    ///
    /// Rank-2 tensor values are laid out row by row.
    ///
    /// # Panics
    ///
    /// Implementations are expected to panic if `values.len() != self.value_size()`.
    fn evaluate(&self, x: &OPoint<T, D>, values: &mut [T]);

    /// Total number of value components.
    fn value_size(&self) -> usize {
        (0..self.rank()).map(|i| self.value_dimension(i)).product()
    }
}

/// A scalar field backed by a closure.
pub struct ScalarField<F>(pub F);

impl<T, D, F> Field<T, D> for ScalarField<F>
where
    T: Real,
    D: DimName,
    F: Fn(&OPoint<T, D>) -> T,
    DefaultAllocator: Allocator<T, D>,
{
    fn rank(&self) -> usize {
        0
    }

    fn value_dimension(&self, _index: usize) -> usize {
        1
    }

    fn evaluate(&self, x: &OPoint<T, D>, values: &mut [T]) {
        assert_eq!(values.len(), 1);
        values[0] = (self.0)(x);
    }
}

/// A vector field backed by a closure.
pub struct VectorField<F>(pub F);

impl<T, D, F> Field<T, D> for VectorField<F>
where
    T: Real,
    D: DimName,
    F: Fn(&OPoint<T, D>) -> OVector<T, D>,
    DefaultAllocator: Allocator<T, D>,
{
    fn rank(&self) -> usize {
        1
    }

    fn value_dimension(&self, _index: usize) -> usize {
        D::dim()
    }

    fn evaluate(&self, x: &OPoint<T, D>, values: &mut [T]) {
        assert_eq!(values.len(), D::dim());
        let value = (self.0)(x);
        values.copy_from_slice(value.as_slice());
    }
}

/// A rank-2 tensor field backed by a closure.
pub struct TensorField<F>(pub F);

impl<T, D, F> Field<T, D> for TensorField<F>
where
    T: Real,
    D: DimName,
    F: Fn(&OPoint<T, D>) -> OMatrix<T, D, D>,
    DefaultAllocator: Allocator<T, D> + Allocator<T, D, D>,
{
    fn rank(&self) -> usize {
        2
    }

    fn value_dimension(&self, _index: usize) -> usize {
        D::dim()
    }

    fn evaluate(&self, x: &OPoint<T, D>, values: &mut [T]) {
        let d = D::dim();
        assert_eq!(values.len(), d * d);
        let value = (self.0)(x);
        for i in 0..d {
            for j in 0..d {
                values[d * i + j] = value[(i, j)];
            }
        }
    }
}
