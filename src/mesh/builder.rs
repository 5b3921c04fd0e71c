//! Mesh construction utilities.
//!
//! This module provides functions for building [`SurfaceMesh`] values from
//! face-vertex lists as commonly found in mesh file formats, and for
//! flattening a mesh back into that form.

use nalgebra::Point3;

use super::adapter::MeshAdapter;
use super::cell::{Cell, CellKind};
use super::index::{MeshIndex, PointId};
use super::surface::SurfaceMesh;
use crate::error::{MeshError, Result};

/// Build a surface mesh from vertices and triangle faces.
///
/// # Arguments
/// * `vertices` - List of vertex positions
/// * `faces` - List of triangle faces, each as [v0, v1, v2] indices
///
/// # Returns
/// A surface mesh, or an error if the input is invalid.
///
/// # Example
/// ```
/// use trisect::mesh::{build_from_triangles, MeshAdapter, SurfaceMesh};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
/// ];
/// let faces = vec![[0, 1, 2]];
///
/// let mesh: SurfaceMesh = build_from_triangles(&vertices, &faces).unwrap();
/// assert_eq!(mesh.num_points(), 3);
/// assert_eq!(mesh.num_cells(), 1);
/// ```
pub fn build_from_triangles<I: MeshIndex>(
    vertices: &[Point3<f64>],
    faces: &[[usize; 3]],
) -> Result<SurfaceMesh<I>> {
    let polygons: Vec<&[usize]> = faces.iter().map(|f| f.as_slice()).collect();
    build_from_polygons(vertices, &polygons)
}

/// Build a surface mesh from vertices and polygon faces of any arity.
///
/// Three-point faces become [`CellKind::Triangle`] cells; larger faces become
/// [`CellKind::Polygon`] cells and are carried through refinement unchanged.
///
/// # Errors
/// * [`MeshError::EmptyMesh`] if `faces` is empty
/// * [`MeshError::InvalidVertexIndex`] if a face points past `vertices`
/// * [`MeshError::DegenerateCell`] if a face has fewer than 3 points or
///   repeats a point
pub fn build_from_polygons<I: MeshIndex, F: AsRef<[usize]>>(
    vertices: &[Point3<f64>],
    faces: &[F],
) -> Result<SurfaceMesh<I>> {
    if faces.is_empty() {
        return Err(MeshError::EmptyMesh);
    }

    for (ci, face) in faces.iter().enumerate() {
        let face = face.as_ref();
        for &vi in face {
            if vi >= vertices.len() {
                return Err(MeshError::InvalidVertexIndex { cell: ci, point: vi });
            }
        }
        if face.len() < CellKind::Triangle.min_points() || has_repeated_points(face) {
            return Err(MeshError::DegenerateCell { cell: ci });
        }
    }

    let mut mesh = SurfaceMesh::with_capacity(vertices.len(), faces.len());

    for &pos in vertices {
        mesh.add_point(pos);
    }

    for face in faces {
        let points: Vec<PointId<I>> = face.as_ref().iter().map(|&vi| PointId::new(vi)).collect();
        mesh.add_cell(Cell::polygon(points));
    }

    Ok(mesh)
}

fn has_repeated_points(face: &[usize]) -> bool {
    face.iter()
        .enumerate()
        .any(|(i, v)| face[i + 1..].contains(v))
}

/// Convert a surface mesh back to a face-vertex representation.
///
/// Returns (vertices, faces) tuple. Line and vertex cells are omitted.
pub fn to_face_vertex<I: MeshIndex>(mesh: &SurfaceMesh<I>) -> (Vec<Point3<f64>>, Vec<Vec<usize>>) {
    let vertices = mesh.points.clone();

    let faces: Vec<Vec<usize>> = mesh
        .cells
        .iter()
        .filter(|c| c.kind.is_face())
        .map(|c| c.points.iter().map(|p| p.index()).collect())
        .collect();

    (vertices, faces)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Point3<f64>> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn test_build_tetrahedron_is_closed() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];

        let mesh: SurfaceMesh = build_from_triangles(&vertices, &faces).unwrap();

        assert_eq!(mesh.num_points(), 4);
        assert_eq!(mesh.num_cells(), 4);
        assert_eq!(mesh.num_edges(), 6);
        assert_eq!(mesh.boundary_edges().count(), 0);
        assert!(mesh.is_watertight());
        assert!(mesh.is_triangle_mesh());
    }

    #[test]
    fn test_build_mixed_polygons() {
        let vertices = square();
        let faces: Vec<Vec<usize>> = vec![vec![0, 1, 2, 3]];

        let mesh: SurfaceMesh = build_from_polygons(&vertices, &faces).unwrap();
        assert_eq!(mesh.count_kind(CellKind::Polygon), 1);
        assert!(!mesh.is_triangle_mesh());
        assert_eq!(mesh.num_edges(), 4);
    }

    #[test]
    fn test_rejects_empty_input() {
        let result: Result<SurfaceMesh> = build_from_triangles(&square(), &[]);
        assert!(matches!(result, Err(MeshError::EmptyMesh)));
    }

    #[test]
    fn test_rejects_invalid_index() {
        let result: Result<SurfaceMesh> = build_from_triangles(&square(), &[[0, 1, 9]]);
        assert!(matches!(
            result,
            Err(MeshError::InvalidVertexIndex { cell: 0, point: 9 })
        ));
    }

    #[test]
    fn test_rejects_degenerate_faces() {
        let result: Result<SurfaceMesh> = build_from_triangles(&square(), &[[0, 1, 2], [2, 3, 2]]);
        assert!(matches!(result, Err(MeshError::DegenerateCell { cell: 1 })));

        let faces: Vec<Vec<usize>> = vec![vec![0, 1]];
        let result: Result<SurfaceMesh> = build_from_polygons(&square(), &faces);
        assert!(matches!(result, Err(MeshError::DegenerateCell { cell: 0 })));
    }

    #[test]
    fn test_face_vertex_roundtrip_keeps_order() {
        let faces = vec![[0, 1, 2], [0, 2, 3]];
        let mesh: SurfaceMesh = build_from_triangles(&square(), &faces).unwrap();

        let (vertices, out_faces) = to_face_vertex(&mesh);
        assert_eq!(vertices, square());
        assert_eq!(out_faces, vec![vec![0, 1, 2], vec![0, 2, 3]]);
    }
}
