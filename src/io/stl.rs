//! STL (stereolithography) format support.
//!
//! STL stores each triangle with its own copy of every corner. Corners with
//! bit-identical coordinates are welded into one point on load so shared
//! edges become shared again; nearby-but-different coordinates are kept
//! apart. Only triangle meshes can be saved.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use log::debug;
use nalgebra::Point3;

use crate::error::{MeshError, Result};
use crate::mesh::{build_from_triangles, to_face_vertex, MeshIndex, SurfaceMesh};

/// Load a mesh from an STL file.
///
/// Automatically detects binary vs ASCII format. Triangles that collapse
/// after welding are dropped.
///
/// # Example
///
/// ```no_run
/// use trisect::io::stl;
/// use trisect::mesh::SurfaceMesh;
///
/// let mesh: SurfaceMesh = stl::load("model.stl").unwrap();
/// ```
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<SurfaceMesh<I>> {
    let path = path.as_ref();
    let mut reader = BufReader::new(File::open(path)?);

    let stl = stl_io::read_stl(&mut reader).map_err(|e| MeshError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut welded: HashMap<[u32; 3], usize> = HashMap::with_capacity(stl.vertices.len());
    let mut vertices: Vec<Point3<f64>> = Vec::with_capacity(stl.vertices.len());
    let mut remap: Vec<usize> = Vec::with_capacity(stl.vertices.len());

    for v in &stl.vertices {
        let key = [v[0].to_bits(), v[1].to_bits(), v[2].to_bits()];
        let index = *welded.entry(key).or_insert_with(|| {
            vertices.push(Point3::new(f64::from(v[0]), f64::from(v[1]), f64::from(v[2])));
            vertices.len() - 1
        });
        remap.push(index);
    }

    let mut faces: Vec<[usize; 3]> = Vec::with_capacity(stl.faces.len());
    for tri in &stl.faces {
        let [a, b, c] = tri.vertices.map(|i| remap[i]);
        if a != b && b != c && a != c {
            faces.push([a, b, c]);
        }
    }

    debug!(
        "STL loaded: {} triangles, {} welded vertices, {} dropped",
        stl.faces.len(),
        vertices.len(),
        stl.faces.len() - faces.len()
    );

    if faces.is_empty() {
        return Err(MeshError::LoadError {
            path: path.to_path_buf(),
            message: "STL file contains no valid triangles".to_string(),
        });
    }

    build_from_triangles(&vertices, &faces)
}

/// Save a mesh to a binary STL file.
///
/// # Errors
/// [`MeshError::SaveError`] if the mesh has a face that is not a triangle.
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &SurfaceMesh<I>, path: P) -> Result<()> {
    let path = path.as_ref();
    let (vertices, faces) = to_face_vertex(mesh);

    if let Some(bad) = faces.iter().position(|f| f.len() != 3) {
        return Err(MeshError::SaveError {
            path: path.to_path_buf(),
            message: format!(
                "STL stores triangles only; face {} has {} points",
                bad,
                faces[bad].len()
            ),
        });
    }

    let triangles: Vec<stl_io::Triangle> = faces
        .iter()
        .map(|f| {
            let p0 = &vertices[f[0]];
            let p1 = &vertices[f[1]];
            let p2 = &vertices[f[2]];

            let n = (p1 - p0)
                .cross(&(p2 - p0))
                .try_normalize(f64::EPSILON)
                .unwrap_or_default();

            stl_io::Triangle {
                normal: stl_io::Normal::new([n.x as f32, n.y as f32, n.z as f32]),
                vertices: [
                    stl_io::Vertex::new([p0.x as f32, p0.y as f32, p0.z as f32]),
                    stl_io::Vertex::new([p1.x as f32, p1.y as f32, p1.z as f32]),
                    stl_io::Vertex::new([p2.x as f32, p2.y as f32, p2.z as f32]),
                ],
            }
        })
        .collect();

    let mut writer = BufWriter::new(File::create(path)?);
    stl_io::write_stl(&mut writer, triangles.iter()).map_err(|e| MeshError::SaveError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::algo::refine::{refine, RefineOptions};
    use crate::io::fixtures::mixed_strip;
    use crate::mesh::MeshAdapter;

    #[test]
    fn test_round_trip_welds_shared_corners() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("refined.stl");

        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
        let mut mesh: SurfaceMesh = build_from_triangles(&vertices, &faces).unwrap();
        refine(&mut mesh, &RefineOptions::adaptive(1, [1])).unwrap();

        save(&mesh, &path).unwrap();
        let loaded: SurfaceMesh = load(&path).unwrap();

        assert_eq!(loaded.num_points(), mesh.num_points());
        assert_eq!(loaded.num_cells(), mesh.num_cells());
        assert!(loaded.is_watertight());
        assert_eq!(loaded.boundary_edges().count(), 0);
    }

    #[test]
    fn test_ascii_input_is_welded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quad.stl");
        fs::write(
            &path,
            "solid quad\n\
             facet normal 0 0 1\n outer loop\n  vertex 0 0 0\n  vertex 1 0 0\n  vertex 1 1 0\n endloop\nendfacet\n\
             facet normal 0 0 1\n outer loop\n  vertex 0 0 0\n  vertex 1 1 0\n  vertex 0 1 0\n endloop\nendfacet\n\
             endsolid quad\n",
        )
        .unwrap();

        let mesh: SurfaceMesh = load(&path).unwrap();

        assert_eq!(mesh.num_points(), 4);
        assert_eq!(mesh.num_cells(), 2);
        assert_eq!(mesh.num_edges(), 5);
    }

    #[test]
    fn test_saving_polygons_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strip.stl");

        let err = save(&mixed_strip(), &path).unwrap_err();

        assert!(matches!(err, MeshError::SaveError { .. }));
        assert!(!path.exists());
    }
}
