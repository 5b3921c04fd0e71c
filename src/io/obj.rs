//! Wavefront OBJ format support.
//!
//! Faces keep their arity: triangles load as triangle cells, larger faces as
//! polygon cells. Texture and normal indices (`f a/b/c`) are accepted and
//! ignored; negative indices are resolved relative to the current vertex
//! count. All objects and groups are merged into one mesh.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::debug;
use nalgebra::Point3;

use crate::error::{MeshError, Result};
use crate::mesh::{build_from_polygons, to_face_vertex, MeshIndex, SurfaceMesh};

/// Load a mesh from an OBJ file.
///
/// # Example
///
/// ```no_run
/// use trisect::io::obj;
/// use trisect::mesh::SurfaceMesh;
///
/// let mesh: SurfaceMesh = obj::load("model.obj").unwrap();
/// ```
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<SurfaceMesh<I>> {
    let path = path.as_ref();

    let (models, _materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: false,
            single_index: false,
            ..Default::default()
        },
    )
    .map_err(|e| MeshError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut vertices: Vec<Point3<f64>> = Vec::new();
    let mut faces: Vec<Vec<usize>> = Vec::new();

    for model in &models {
        let offset = vertices.len();
        let mesh = &model.mesh;

        for chunk in mesh.positions.chunks_exact(3) {
            vertices.push(Point3::new(
                f64::from(chunk[0]),
                f64::from(chunk[1]),
                f64::from(chunk[2]),
            ));
        }

        let index = |i: &u32| offset + *i as usize;
        if mesh.face_arities.is_empty() {
            faces.extend(mesh.indices.chunks_exact(3).map(|f| f.iter().map(index).collect()));
        } else {
            let mut start = 0;
            for &arity in &mesh.face_arities {
                let end = start + arity as usize;
                let face = mesh.indices.get(start..end).ok_or_else(|| MeshError::LoadError {
                    path: path.to_path_buf(),
                    message: format!("face in '{}' runs past its index list", model.name),
                })?;
                faces.push(face.iter().map(index).collect());
                start = end;
            }
        }
    }

    debug!(
        "OBJ loaded: {} vertices, {} faces from {} models",
        vertices.len(),
        faces.len(),
        models.len()
    );

    if faces.is_empty() {
        return Err(MeshError::LoadError {
            path: path.to_path_buf(),
            message: "OBJ file contains no faces".to_string(),
        });
    }

    build_from_polygons(&vertices, &faces)
}

/// Save a mesh to an OBJ file.
///
/// Only face cells are written; polygon cells keep their arity.
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &SurfaceMesh<I>, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let (vertices, faces) = to_face_vertex(mesh);

    writeln!(writer, "# Generated by trisect")?;
    for v in &vertices {
        writeln!(writer, "v {} {} {}", v.x, v.y, v.z)?;
    }
    for f in &faces {
        write!(writer, "f")?;
        for &i in f {
            write!(writer, " {}", i + 1)?;
        }
        writeln!(writer)?;
    }

    writer.flush()?;
    Ok(())
}
