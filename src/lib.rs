//! # Trisect
//!
//! Uniform and adaptive subdivision of triangle meshes without cracks.
//!
//! Trisect splits triangles 1-to-4 by inserting one point per edge. In
//! adaptive mode only selected cells are split; each neighboring triangle
//! that now has a new point on one, two or three of its edges is
//! re-triangulated from a fixed template so the result stays conforming
//! (no T-junctions).
//!
//! ## Features
//!
//! - **Mesh-agnostic core**: the engine works on anything implementing
//!   [`mesh::MeshAdapter`]; [`mesh::SurfaceMesh`] is the bundled
//!   implementation
//! - **Flexible indexing**: 16-bit, 32-bit and 64-bit type-safe ids
//! - **Subdivision rules**: linear midpoints or the Loop edge mask
//! - **File formats**: OBJ, STL, PLY
//!
//! ## Quick Start
//!
//! ```no_run
//! use trisect::prelude::*;
//!
//! let mut mesh: SurfaceMesh = trisect::io::load("model.obj").unwrap();
//!
//! // Refine cells 0 and 5 twice.
//! let report = refine(&mut mesh, &RefineOptions::adaptive(2, [0, 5])).unwrap();
//! println!("added {} points", report.total_points_added());
//!
//! trisect::io::save(&mesh, "refined.obj").unwrap();
//! ```
//!
//! ## Building Meshes Programmatically
//!
//! ```
//! use trisect::prelude::*;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 1.0),
//! ];
//!
//! let faces = vec![
//!     [0, 2, 1],  // bottom
//!     [0, 1, 3],  // front
//!     [1, 2, 3],  // right
//!     [2, 0, 3],  // left
//! ];
//!
//! let mut mesh: SurfaceMesh = build_from_triangles(&vertices, &faces).unwrap();
//! assert_eq!(mesh.num_points(), 4);
//! assert_eq!(mesh.num_edges(), 6);
//!
//! refine(&mut mesh, &RefineOptions::new(1)).unwrap();
//! assert_eq!(mesh.num_cells(), 16);
//! assert_eq!(mesh.num_points(), 4 + 6);
//! assert!(mesh.is_watertight());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// ```
/// use trisect::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::refine::{refine, RefineOptions, RefineReport, Selection};
    pub use crate::algo::Progress;
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{
        build_from_polygons, build_from_triangles, to_face_vertex, Cell, CellId, CellKind,
        EdgeId, EdgeKey, MeshAdapter, MeshIndex, PointId, SurfaceMesh,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use nalgebra::Point3;

    #[test]
    fn test_closed_surface_stays_closed() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];

        let faces = vec![
            [0, 2, 1], // bottom
            [0, 1, 3], // front
            [1, 2, 3], // right
            [2, 0, 3], // left
        ];

        let mut mesh: SurfaceMesh = build_from_triangles(&vertices, &faces).unwrap();
        assert_eq!(mesh.boundary_edges().count(), 0);

        refine(&mut mesh, &RefineOptions::adaptive(2, [1])).unwrap();

        assert!(mesh.is_triangle_mesh());
        assert_eq!(mesh.boundary_edges().count(), 0);
        assert_eq!(mesh.non_manifold_edges().count(), 0);
    }

    #[test]
    fn test_small_indices() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let mut mesh: SurfaceMesh<u16> = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();

        refine(&mut mesh, &RefineOptions::new(3)).unwrap();

        assert_eq!(mesh.num_cells(), 64);
        assert_eq!(mesh.num_points(), 45);
    }
}
