//! The storage interface the refinement algorithms run against.
//!
//! The subdivision engine never touches mesh storage directly. Everything it
//! needs (point and cell iteration, edge lookup, insertion, and whole-mesh
//! replacement) goes through [`MeshAdapter`], so any indexed mesh type can be
//! refined by implementing this trait. [`SurfaceMesh`](super::SurfaceMesh) is
//! the implementation that ships with the crate.

use nalgebra::Point3;

use super::cell::Cell;
use super::index::{CellId, EdgeId, MeshIndex, PointId};

/// Capabilities required by the refinement engine.
///
/// Point ids must be dense and assigned in insertion order: the first point
/// added to an empty mesh is `PointId(0)`, the next `PointId(1)`, and so on.
/// The engine relies on this to carry points into a new generation with
/// their ids unchanged.
pub trait MeshAdapter: Sized {
    /// The integer type behind this mesh's ids.
    type Index: MeshIndex;

    /// Number of points.
    fn num_points(&self) -> usize;

    /// Number of cells.
    fn num_cells(&self) -> usize;

    /// Iterate over all points in id order.
    fn points(&self) -> impl Iterator<Item = (PointId<Self::Index>, &Point3<f64>)> + '_;

    /// Iterate over all cells in id order.
    fn cells(&self) -> impl Iterator<Item = (CellId<Self::Index>, &Cell<Self::Index>)> + '_;

    /// Position of a point, if it exists.
    fn point(&self, id: PointId<Self::Index>) -> Option<&Point3<f64>>;

    /// A cell by id, if it exists.
    fn cell(&self, id: CellId<Self::Index>) -> Option<&Cell<Self::Index>>;

    /// Find the edge joining `p0` and `p1`, in either direction.
    fn find_edge(
        &self,
        p0: PointId<Self::Index>,
        p1: PointId<Self::Index>,
    ) -> Option<EdgeId<Self::Index>>;

    /// Cells incident to an edge.
    fn edge_cells(&self, edge: EdgeId<Self::Index>) -> &[CellId<Self::Index>];

    /// Append a point and return its id.
    fn add_point(&mut self, position: Point3<f64>) -> PointId<Self::Index>;

    /// Append a triangle cell and return its id.
    fn add_triangle(
        &mut self,
        v0: PointId<Self::Index>,
        v1: PointId<Self::Index>,
        v2: PointId<Self::Index>,
    ) -> CellId<Self::Index>;

    /// Append an arbitrary cell and return its id.
    fn add_cell(&mut self, cell: Cell<Self::Index>) -> CellId<Self::Index>;

    /// Capacity hint for `additional` more points. No semantic effect.
    fn reserve_points(&mut self, additional: usize);

    /// Replace this mesh's contents with `other`, dropping the old contents.
    fn replace_with(&mut self, other: Self);

    /// Create an empty mesh of the same kind to build a new generation into.
    ///
    /// Returns `None` when no target can be allocated.
    fn empty_like(&self) -> Option<Self>;
}
