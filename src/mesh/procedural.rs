//! Basic procedural mesh generation routines.
use crate::connectivity::{Tet4Connectivity, Tri3d2Connectivity};
use crate::mesh::{Tet4Mesh, TriangleMesh2d};
use crate::Real;
use nalgebra::{Point2, Point3};

/// Generates a uniform triangle mesh of the unit square `[0, 1]^2`.
///
/// Each of the `cells_per_dim x cells_per_dim` grid cells is split into two triangles with
/// counter-clockwise winding order, giving `2 * cells_per_dim^2` triangles in total.
pub fn create_unit_square_uniform_tri_mesh_2d<T>(cells_per_dim: usize) -> TriangleMesh2d<T>
where
    T: Real,
{
    if cells_per_dim == 0 {
        return TriangleMesh2d::from_vertices_and_connectivity(Vec::new(), Vec::new());
    }

    let num_vertices_per_dim = cells_per_dim + 1;
    let to_coord = |i: usize| {
        T::from_usize(i).expect("Must be able to fit usize in T")
            / T::from_usize(cells_per_dim).expect("Must be able to fit usize in T")
    };
    let to_global_vertex_index = |i: usize, j: usize| num_vertices_per_dim * j + i;

    let mut vertices = Vec::with_capacity(num_vertices_per_dim * num_vertices_per_dim);
    for j in 0..num_vertices_per_dim {
        for i in 0..num_vertices_per_dim {
            vertices.push(Point2::new(to_coord(i), to_coord(j)));
        }
    }

    let mut cells = Vec::with_capacity(2 * cells_per_dim * cells_per_dim);
    for j in 0..cells_per_dim {
        for i in 0..cells_per_dim {
            let v00 = to_global_vertex_index(i, j);
            let v10 = to_global_vertex_index(i + 1, j);
            let v11 = to_global_vertex_index(i + 1, j + 1);
            let v01 = to_global_vertex_index(i, j + 1);
            cells.push(Tri3d2Connectivity([v00, v10, v11]));
            cells.push(Tri3d2Connectivity([v00, v11, v01]));
        }
    }

    TriangleMesh2d::from_vertices_and_connectivity(vertices, cells)
}

/// Generates a uniform tetrahedral mesh of the unit cube `[0, 1]^3`.
///
/// Each of the `cells_per_dim^3` grid cells is split into six tetrahedra around the main
/// diagonal (the Kuhn decomposition), giving `6 * cells_per_dim^3` tetrahedra in total.
pub fn create_unit_cube_uniform_tet_mesh_3d<T>(cells_per_dim: usize) -> Tet4Mesh<T>
where
    T: Real,
{
    if cells_per_dim == 0 {
        return Tet4Mesh::from_vertices_and_connectivity(Vec::new(), Vec::new());
    }

    let num_vertices_per_dim = cells_per_dim + 1;
    let to_coord = |i: usize| {
        T::from_usize(i).expect("Must be able to fit usize in T")
            / T::from_usize(cells_per_dim).expect("Must be able to fit usize in T")
    };
    let to_global_vertex_index =
        |i: usize, j: usize, k: usize| (k * num_vertices_per_dim + j) * num_vertices_per_dim + i;

    let mut vertices = Vec::with_capacity(num_vertices_per_dim.pow(3));
    for k in 0..num_vertices_per_dim {
        for j in 0..num_vertices_per_dim {
            for i in 0..num_vertices_per_dim {
                vertices.push(Point3::new(to_coord(i), to_coord(j), to_coord(k)));
            }
        }
    }

    // Each tetrahedron follows a monotone vertex path from the cube corner (0, 0, 0) to the
    // corner (1, 1, 1), one path per permutation of the coordinate axes.
    const AXIS_PERMUTATIONS: [[usize; 3]; 6] = [
        [0, 1, 2],
        [0, 2, 1],
        [1, 0, 2],
        [1, 2, 0],
        [2, 0, 1],
        [2, 1, 0],
    ];

    let mut cells = Vec::with_capacity(6 * cells_per_dim.pow(3));
    for k in 0..cells_per_dim {
        for j in 0..cells_per_dim {
            for i in 0..cells_per_dim {
                for permutation in &AXIS_PERMUTATIONS {
                    let mut corner = [i, j, k];
                    let mut tet = [to_global_vertex_index(corner[0], corner[1], corner[2]); 4];
                    for (vertex, &axis) in tet[1..].iter_mut().zip(permutation) {
                        corner[axis] += 1;
                        *vertex = to_global_vertex_index(corner[0], corner[1], corner[2]);
                    }
                    cells.push(Tet4Connectivity(tet));
                }
            }
        }
    }

    Tet4Mesh::from_vertices_and_connectivity(vertices, cells)
}
