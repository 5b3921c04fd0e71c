//! Core mesh data structures.
//!
//! This module provides the storage interface the refinement algorithms run
//! against, plus a concrete indexed polygon mesh that implements it.
//!
//! # Overview
//!
//! [`MeshAdapter`] is the seam between the algorithms and storage: point and
//! cell iteration, edge lookup by endpoint pair, insertion, and whole-mesh
//! replacement. [`SurfaceMesh`] implements it with dense arrays and an edge
//! table that records which cells touch each edge.
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe index wrappers:
//! - [`PointId`] - Identifies a point
//! - [`CellId`] - Identifies a cell
//! - [`EdgeId`] - Identifies an edge in a mesh's edge table
//!
//! [`EdgeKey`] names an edge by its endpoints independently of direction.
//!
//! # Construction
//!
//! ```
//! use trisect::mesh::{build_from_triangles, SurfaceMesh};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let faces = vec![[0, 1, 2]];
//!
//! let mesh: SurfaceMesh = build_from_triangles(&vertices, &faces).unwrap();
//! assert!(mesh.is_watertight());
//! ```

mod adapter;
mod builder;
mod cell;
mod index;
mod surface;

pub use adapter::MeshAdapter;
pub use builder::{build_from_polygons, build_from_triangles, to_face_vertex};
pub use cell::{Cell, CellKind};
pub use index::{CellId, EdgeId, EdgeKey, MeshIndex, PointId};
pub use surface::{Edge, SurfaceMesh};
