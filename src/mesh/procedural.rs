//! Basic procedural generation of surface meshes.
use crate::connectivity::{InterpolationOrder, SurfaceConnectivity, SurfaceGeometryType};
use crate::error::GeometryError;
use crate::mesh::SurfaceMesh;
use crate::Real;
use nalgebra::Point3;

/// Offsets of the element nodes in a lattice that is refined once per element for quadratic
/// geometries. Cells with two entries are split into two triangles.
fn cell_node_offsets(geometry_type: SurfaceGeometryType) -> &'static [&'static [(usize, usize)]] {
    use SurfaceGeometryType::*;
    match geometry_type {
        Triangle3 => &[&[(0, 0), (1, 0), (1, 1)], &[(0, 0), (1, 1), (0, 1)]],
        Triangle6 => &[
            &[(0, 0), (2, 0), (2, 2), (1, 0), (2, 1), (1, 1)],
            &[(0, 0), (2, 2), (0, 2), (1, 1), (1, 2), (0, 1)],
        ],
        Quadrilateral4 => &[&[(0, 0), (1, 0), (1, 1), (0, 1)]],
        Quadrilateral8 => &[&[(0, 0), (2, 0), (2, 2), (0, 2), (1, 0), (2, 1), (1, 2), (0, 1)]],
        Quadrilateral9 => &[&[(0, 0), (2, 0), (2, 2), (0, 2), (1, 0), (2, 1), (1, 2), (0, 1), (1, 1)]],
    }
}

/// Creates a rectangular surface in the plane `z = 0` with corners `(0, 0, 0)` and
/// `(width, height, 0)`, divided into `cells_x * cells_y` cells.
///
/// Each cell is covered by one quadrilateral or two triangles of the given geometry type. All
/// elements are oriented so that their normal points along `+z`. Vertices that no element refers
/// to, such as cell centers for 8-node quadrilaterals, are still part of the mesh.
pub fn create_planar_surface_mesh<T: Real>(
    geometry_type: SurfaceGeometryType,
    cells_x: usize,
    cells_y: usize,
    width: T,
    height: T,
) -> Result<(SurfaceMesh<T>, Vec<SurfaceConnectivity>), GeometryError> {
    let refinement = match geometry_type.order() {
        InterpolationOrder::Linear => 1,
        InterpolationOrder::Quadratic => 2,
    };
    let num_vertices_x = refinement * cells_x + 1;
    let num_vertices_y = refinement * cells_y + 1;
    let to_t = |n: usize| T::from_usize(n).expect("Must be able to fit usize in T");
    let dx = width / to_t((refinement * cells_x).max(1));
    let dy = height / to_t((refinement * cells_y).max(1));

    let mut vertices = Vec::with_capacity(num_vertices_x * num_vertices_y);
    for j in 0..num_vertices_y {
        for i in 0..num_vertices_x {
            vertices.push(Point3::new(to_t(i) * dx, to_t(j) * dy, T::zero()));
        }
    }

    let to_global_vertex_index = |i: usize, j: usize| num_vertices_x * j + i;
    let mut connectivity = Vec::new();
    for cy in 0..cells_y {
        for cx in 0..cells_x {
            let (i0, j0) = (refinement * cx, refinement * cy);
            for offsets in cell_node_offsets(geometry_type) {
                let nodes = offsets
                    .iter()
                    .map(|&(di, dj)| to_global_vertex_index(i0 + di, j0 + dj))
                    .collect();
                connectivity.push(SurfaceConnectivity::try_new(geometry_type, nodes)?);
            }
        }
    }

    Ok((SurfaceMesh::from_vertices(vertices), connectivity))
}
