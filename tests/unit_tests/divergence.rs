use fluxdiv::connectivity::{Tri3d2Connectivity, Tri3d3Connectivity};
use fluxdiv::field::{Field, ScalarField, TensorField, VectorField};
use fluxdiv::mesh::procedural::{
    create_unit_cube_uniform_tet_mesh_3d, create_unit_square_uniform_tri_mesh_2d,
};
use fluxdiv::mesh::{Mesh3d, TriangleMesh2d};
use fluxdiv::{cellwise_divergence, CellwiseDivergence, Error, MidpointFluxKernel};
use matrixcompare::{assert_scalar_eq, prop_assert_scalar_eq};
use nalgebra::{Matrix2, Point2, Point3, Vector2, Vector3, U2};
use proptest::prelude::*;

fn single_triangle_mesh() -> TriangleMesh2d<f64> {
    TriangleMesh2d::from_vertices_and_connectivity(
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ],
        vec![Tri3d2Connectivity([0, 1, 2])],
    )
}

#[test]
fn identity_vector_field_on_single_triangle() {
    // u = (x, y) has divergence 2 everywhere
    let mesh = single_triangle_mesh();
    let field = VectorField(|p: &Point2<f64>| Vector2::new(p.x, p.y));

    let divergence = cellwise_divergence(&field, &mesh).unwrap();
    assert_eq!(divergence.components(), 1);
    assert_eq!(divergence.num_cells(), 1);
    assert_scalar_eq!(divergence.cell_values(0)[0], 2.0, comp = abs, tol = 1e-12);
}

#[test]
fn identity_vector_field_on_single_tet() {
    // u = (x, y, z) has divergence 3 everywhere
    let mesh = create_unit_cube_uniform_tet_mesh_3d::<f64>(1);
    let field = VectorField(|p: &Point3<f64>| Vector3::new(p.x, p.y, p.z));

    let divergence = cellwise_divergence(&field, &mesh).unwrap();
    assert_eq!(divergence.components(), 1);
    assert_eq!(divergence.num_cells(), 6);
    for cell in 0..divergence.num_cells() {
        assert_scalar_eq!(divergence.cell_values(cell)[0], 3.0, comp = abs, tol = 1e-12);
    }
}

#[test]
fn scalar_field_gradient() {
    // f = 2x - 3y + 1 has the constant gradient (2, -3)
    let mesh = create_unit_square_uniform_tri_mesh_2d::<f64>(3);
    let field = ScalarField(|p: &Point2<f64>| 2.0 * p.x - 3.0 * p.y + 1.0);

    let gradient = cellwise_divergence(&field, &mesh).unwrap();
    assert_eq!(gradient.components(), 2);
    assert_eq!(gradient.num_cells(), mesh.num_cells());
    for cell in 0..gradient.num_cells() {
        let values = gradient.cell_values(cell);
        assert_scalar_eq!(values[0], 2.0, comp = abs, tol = 1e-12);
        assert_scalar_eq!(values[1], -3.0, comp = abs, tol = 1e-12);
    }
}

#[test]
fn tensor_field_row_wise_divergence() {
    // T = [x, 2y; 3x, x + y] has row-wise divergence (1 + 2, 3 + 1) = (3, 4)
    let mesh = create_unit_square_uniform_tri_mesh_2d::<f64>(2);
    let field = TensorField(|p: &Point2<f64>| {
        Matrix2::new(p.x, 2.0 * p.y, 3.0 * p.x, p.x + p.y)
    });

    let divergence = cellwise_divergence(&field, &mesh).unwrap();
    assert_eq!(divergence.components(), 2);
    for cell in 0..divergence.num_cells() {
        let values = divergence.cell_values(cell);
        assert_scalar_eq!(values[0], 3.0, comp = abs, tol = 1e-12);
        assert_scalar_eq!(values[1], 4.0, comp = abs, tol = 1e-12);
    }
}

#[test]
fn evaluation_is_deterministic() {
    let mesh = create_unit_square_uniform_tri_mesh_2d::<f64>(4);
    let field = VectorField(|p: &Point2<f64>| Vector2::new(p.x * p.y, p.x - p.y));

    let evaluator = CellwiseDivergence::new(MidpointFluxKernel);
    let first = evaluator.evaluate(&field, &mesh).unwrap();
    let second = evaluator.evaluate(&field, &mesh).unwrap();

    // Bit-identical results: no hidden state between evaluations
    assert_eq!(first, second);
}

struct RankThreeField;

impl Field<f64, U2> for RankThreeField {
    fn rank(&self) -> usize {
        3
    }

    fn value_dimension(&self, _index: usize) -> usize {
        2
    }

    fn evaluate(&self, _x: &Point2<f64>, _values: &mut [f64]) {
        unreachable!("Validation must reject the field before any evaluation")
    }
}

#[test]
fn rank_three_field_is_rejected_before_evaluation() {
    let mesh = single_triangle_mesh();
    let result = cellwise_divergence(&RankThreeField, &mesh);
    assert_eq!(result.unwrap_err(), Error::InvalidRank { rank: 3 });
}

struct MismatchedVectorField;

impl Field<f64, U2> for MismatchedVectorField {
    fn rank(&self) -> usize {
        1
    }

    fn value_dimension(&self, _index: usize) -> usize {
        3
    }

    fn evaluate(&self, _x: &Point2<f64>, _values: &mut [f64]) {
        unreachable!("Validation must reject the field before any evaluation")
    }
}

#[test]
fn mismatched_value_dimension_is_rejected_before_evaluation() {
    let mesh = single_triangle_mesh();
    let result = cellwise_divergence(&MismatchedVectorField, &mesh);
    assert_eq!(
        result.unwrap_err(),
        Error::ValueDimensionMismatch {
            index: 0,
            value_dimension: 3,
            geometric_dimension: 2,
        }
    );
}

#[test]
fn surface_mesh_is_rejected() {
    let mesh = Mesh3d::from_vertices_and_connectivity(
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ],
        vec![Tri3d3Connectivity([0, 1, 2])],
    );
    let field = VectorField(|p: &Point3<f64>| Vector3::new(p.x, p.y, p.z));

    let result = cellwise_divergence(&field, &mesh);
    assert_eq!(
        result.unwrap_err(),
        Error::UnsupportedTopology {
            topological_dimension: 2,
            geometric_dimension: 3,
        }
    );
}

proptest! {
    #[test]
    fn affine_vector_fields_have_exact_divergence_2d(
        a in proptest::array::uniform4(-10.0..10.0f64),
        b in proptest::array::uniform2(-10.0..10.0f64),
    ) {
        // u(x) = A x + b has the constant divergence tr(A) on every cell
        let mesh = create_unit_square_uniform_tri_mesh_2d::<f64>(3);
        let matrix = Matrix2::new(a[0], a[1], a[2], a[3]);
        let offset = Vector2::new(b[0], b[1]);
        let field = VectorField(move |p: &Point2<f64>| matrix * p.coords + offset);

        let divergence = cellwise_divergence(&field, &mesh).unwrap();
        let trace = a[0] + a[3];
        for cell in 0..divergence.num_cells() {
            prop_assert_scalar_eq!(divergence.cell_values(cell)[0], trace, comp = abs, tol = 1e-9);
        }
    }

    #[test]
    fn affine_scalar_fields_have_exact_gradient_2d(
        g in proptest::array::uniform2(-10.0..10.0f64),
        c in -10.0..10.0f64,
    ) {
        // f(x) = g . x + c has the constant gradient g on every cell
        let mesh = create_unit_square_uniform_tri_mesh_2d::<f64>(3);
        let gradient_vector = Vector2::new(g[0], g[1]);
        let field = ScalarField(move |p: &Point2<f64>| gradient_vector.dot(&p.coords) + c);

        let gradient = cellwise_divergence(&field, &mesh).unwrap();
        for cell in 0..gradient.num_cells() {
            let values = gradient.cell_values(cell);
            prop_assert_scalar_eq!(values[0], g[0], comp = abs, tol = 1e-9);
            prop_assert_scalar_eq!(values[1], g[1], comp = abs, tol = 1e-9);
        }
    }

    #[test]
    fn affine_vector_fields_have_exact_divergence_3d(
        a in proptest::array::uniform9(-10.0..10.0f64),
        b in proptest::array::uniform3(-10.0..10.0f64),
    ) {
        let mesh = create_unit_cube_uniform_tet_mesh_3d::<f64>(1);
        let matrix = nalgebra::Matrix3::from_row_slice(&a);
        let offset = Vector3::new(b[0], b[1], b[2]);
        let field = VectorField(move |p: &Point3<f64>| matrix * p.coords + offset);

        let divergence = cellwise_divergence(&field, &mesh).unwrap();
        let trace = a[0] + a[4] + a[8];
        for cell in 0..divergence.num_cells() {
            prop_assert_scalar_eq!(divergence.cell_values(cell)[0], trace, comp = abs, tol = 1e-9);
        }
    }
}
