use fluxdiv::connectivity::{Connectivity, Tet4Connectivity};
use fluxdiv::geometry::{LineSegment, SimplexCell, Tetrahedron, Triangle, Triangle2d, Triangle3d};
use itertools::sorted;
use matrixcompare::{assert_matrix_eq, assert_scalar_eq};
use nalgebra::{Point2, Point3, Vector2, Vector3};

fn unit_triangle() -> Triangle2d<f64> {
    Triangle([
        Point2::new(0.0, 0.0),
        Point2::new(1.0, 0.0),
        Point2::new(0.0, 1.0),
    ])
}

fn reference_tet() -> Tetrahedron<f64> {
    Tetrahedron::from_vertices([
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
        Point3::new(0.0, 0.0, 1.0),
    ])
}

#[test]
fn segment_midpoint_and_length() {
    let segment = LineSegment([Point2::new(1.0, 2.0), Point2::new(3.0, 6.0)]);
    assert_matrix_eq!(segment.midpoint().coords, Vector2::new(2.0, 4.0), comp = abs, tol = 1e-14);
    assert_scalar_eq!(segment.length(), 20.0f64.sqrt(), comp = abs, tol = 1e-14);
}

#[test]
fn triangle_area_and_centroid() {
    let triangle = unit_triangle();
    assert_scalar_eq!(triangle.area(), 0.5, comp = abs, tol = 1e-14);
    assert_scalar_eq!(triangle.signed_area(), 0.5, comp = abs, tol = 1e-14);
    assert_matrix_eq!(
        triangle.centroid().coords,
        Vector2::new(1.0 / 3.0, 1.0 / 3.0),
        comp = abs,
        tol = 1e-14
    );
}

#[test]
fn triangle2d_facet_normals_point_outward() {
    let triangle = unit_triangle();
    let expected_normals = [
        Vector2::new(0.0, -1.0),
        Vector2::new(1.0 / 2.0f64.sqrt(), 1.0 / 2.0f64.sqrt()),
        Vector2::new(-1.0, 0.0),
    ];

    for (index, expected) in expected_normals.iter().enumerate() {
        let normal = triangle.facet_outward_normal(index);
        assert_matrix_eq!(normal, *expected, comp = abs, tol = 1e-14);
        assert_scalar_eq!(normal.norm(), 1.0, comp = abs, tol = 1e-14);

        // Outwardness: the normal points away from the cell centroid
        let outward = normal.dot(&(triangle.facet_midpoint(index) - triangle.centroid()));
        assert!(outward > 0.0);
    }
}

#[test]
fn tetrahedron_volume_and_centroid() {
    let tet = reference_tet();
    assert_scalar_eq!(tet.volume(), 1.0 / 6.0, comp = abs, tol = 1e-14);
    assert_matrix_eq!(
        tet.centroid().coords,
        Vector3::new(0.25, 0.25, 0.25),
        comp = abs,
        tol = 1e-14
    );
}

#[test]
fn tetrahedron_facet_normals_point_outward() {
    let tet = reference_tet();
    let expected_normals = [
        Vector3::new(0.0, 0.0, -1.0),
        Vector3::new(0.0, -1.0, 0.0),
        Vector3::new(1.0, 1.0, 1.0).normalize(),
        Vector3::new(-1.0, 0.0, 0.0),
    ];

    for (index, expected) in expected_normals.iter().enumerate() {
        let normal = tet.facet_outward_normal(index);
        assert_matrix_eq!(normal, *expected, comp = abs, tol = 1e-14);

        let outward = normal.dot(&(tet.facet_midpoint(index) - tet.centroid()));
        assert!(outward > 0.0);
    }
}

#[test]
fn tetrahedron_faces_match_connectivity_facets() {
    // The geometry and the connectivity must agree on which facet a local index refers to
    let tet = reference_tet();
    let connectivity = Tet4Connectivity([0, 1, 2, 3]);

    for index in 0..4 {
        let face = tet.face(index);
        let facet_connectivity = connectivity.get_facet_connectivity(index).unwrap();

        let face_vertices: Vec<_> = face
            .0
            .iter()
            .map(|p| (p.x as usize, p.y as usize, p.z as usize))
            .collect();
        let conn_vertices: Vec<_> = facet_connectivity
            .vertex_indices()
            .iter()
            .map(|&v| {
                let p = tet.vertices()[v];
                (p.x as usize, p.y as usize, p.z as usize)
            })
            .collect();

        let lhs: Vec<_> = sorted(face_vertices).collect();
        let rhs: Vec<_> = sorted(conn_vertices).collect();
        assert_eq!(lhs, rhs);
    }
}

#[test]
fn triangle3d_edge_conormals_lie_in_plane() {
    // A triangle in the z = 1 plane: conormals match the 2D edge normals, with zero
    // z component
    let triangle: Triangle3d<f64> = Triangle([
        Point3::new(0.0, 0.0, 1.0),
        Point3::new(1.0, 0.0, 1.0),
        Point3::new(0.0, 1.0, 1.0),
    ]);
    let expected_normals = [
        Vector3::new(0.0, -1.0, 0.0),
        Vector3::new(1.0 / 2.0f64.sqrt(), 1.0 / 2.0f64.sqrt(), 0.0),
        Vector3::new(-1.0, 0.0, 0.0),
    ];

    for (index, expected) in expected_normals.iter().enumerate() {
        let conormal = triangle.facet_outward_normal(index);
        assert_matrix_eq!(conormal, *expected, comp = abs, tol = 1e-14);
    }
}
