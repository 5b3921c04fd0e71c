//! Mesh file I/O.
//!
//! # Supported Formats
//!
//! | Format | Extension | Load | Save | Notes |
//! |--------|-----------|------|------|-------|
//! | Wavefront OBJ | `.obj` | ✓ | ✓ | Polygons kept as polygon cells |
//! | STL | `.stl` | ✓ | ✓ | Binary and ASCII in, binary out; triangles only |
//! | PLY | `.ply` | ✓ | ✓ | Polygons kept; ASCII out |
//!
//! # Usage
//!
//! ```no_run
//! use trisect::io::{load, save};
//! use trisect::mesh::SurfaceMesh;
//!
//! // Load with automatic format detection
//! let mesh: SurfaceMesh = load("model.obj").unwrap();
//!
//! // Save with automatic format detection
//! save(&mesh, "output.ply").unwrap();
//! ```

pub mod obj;
pub mod ply;
pub mod stl;

use std::path::Path;

use crate::error::{MeshError, Result};
use crate::mesh::{MeshIndex, SurfaceMesh};

/// Supported mesh file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Wavefront OBJ format.
    Obj,
    /// STL (stereolithography) format.
    Stl,
    /// PLY (Stanford polygon) format.
    Ply,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "obj" => Some(Format::Obj),
            "stl" => Some(Format::Stl),
            "ply" => Some(Format::Ply),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }
}

fn detect(path: &Path) -> Result<Format> {
    Format::from_path(path).ok_or_else(|| MeshError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })
}

/// Load a mesh from a file, choosing the format by extension.
pub fn load<P: AsRef<Path>, I: MeshIndex>(path: P) -> Result<SurfaceMesh<I>> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Obj => obj::load(path),
        Format::Stl => stl::load(path),
        Format::Ply => ply::load(path),
    }
}

/// Save a mesh to a file, choosing the format by extension.
pub fn save<P: AsRef<Path>, I: MeshIndex>(mesh: &SurfaceMesh<I>, path: P) -> Result<()> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Obj => obj::save(mesh, path),
        Format::Stl => stl::save(mesh, path),
        Format::Ply => ply::save(mesh, path),
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use nalgebra::Point3;

    use crate::mesh::{build_from_polygons, SurfaceMesh};

    /// Two triangles and a quad forming a strip.
    pub fn mixed_strip() -> SurfaceMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(2.0, 0.0, 0.5),
            Point3::new(2.0, 1.0, 0.5),
        ];
        let faces: Vec<Vec<usize>> = vec![vec![0, 1, 2], vec![1, 3, 2], vec![1, 4, 5, 3]];
        build_from_polygons(&vertices, &faces).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::MeshAdapter;

    #[test]
    fn test_format_detection() {
        assert_eq!(Format::from_path("a/b/model.OBJ"), Some(Format::Obj));
        assert_eq!(Format::from_path("part.stl"), Some(Format::Stl));
        assert_eq!(Format::from_extension("ply"), Some(Format::Ply));
        assert_eq!(Format::from_path("scene.gltf"), None);
        assert_eq!(Format::from_path("no_extension"), None);
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let err = load::<_, u32>("mesh.xyz").unwrap_err();
        assert!(matches!(err, MeshError::UnsupportedFormat { extension } if extension == "xyz"));

        let err = save(&fixtures::mixed_strip(), "mesh").unwrap_err();
        assert!(matches!(err, MeshError::UnsupportedFormat { extension } if extension == "(none)"));
    }

    #[test]
    fn test_dispatch_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mesh = fixtures::mixed_strip();

        for name in ["strip.obj", "strip.ply"] {
            let path = dir.path().join(name);
            save(&mesh, &path).unwrap();
            let loaded: SurfaceMesh = load(&path).unwrap();
            assert_eq!(loaded.num_cells(), 3, "{}", name);
            assert_eq!(loaded.num_points(), 6, "{}", name);
        }
    }
}
