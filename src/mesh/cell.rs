//! Cells: ordered point lists tagged with a kind.

use super::index::{EdgeKey, MeshIndex, PointId};

/// The kind tag carried by every cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    /// A single point.
    Vertex,
    /// A two-point segment.
    Line,
    /// A three-point face.
    Triangle,
    /// A face with four or more points.
    Polygon,
}

impl CellKind {
    /// The natural kind for a face with `n` points.
    pub fn for_arity(n: usize) -> CellKind {
        match n {
            0 | 1 => CellKind::Vertex,
            2 => CellKind::Line,
            3 => CellKind::Triangle,
            _ => CellKind::Polygon,
        }
    }

    /// Minimum number of points a cell of this kind must have.
    pub fn min_points(self) -> usize {
        match self {
            CellKind::Vertex => 1,
            CellKind::Line => 2,
            CellKind::Triangle => 3,
            CellKind::Polygon => 3,
        }
    }

    /// Whether cells of this kind bound a surface region.
    pub fn is_face(self) -> bool {
        matches!(self, CellKind::Triangle | CellKind::Polygon)
    }
}

/// A mesh cell.
///
/// Point order is significant: edge `i` joins point `i` and point
/// `(i + 1) % n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell<I: MeshIndex = u32> {
    /// The kind tag.
    pub kind: CellKind,

    /// Ordered point ids.
    pub points: Vec<PointId<I>>,
}

impl<I: MeshIndex> Cell<I> {
    /// Create a cell with an explicit kind.
    pub fn new(kind: CellKind, points: Vec<PointId<I>>) -> Self {
        Self { kind, points }
    }

    /// Create a triangle cell.
    pub fn triangle(v0: PointId<I>, v1: PointId<I>, v2: PointId<I>) -> Self {
        Self::new(CellKind::Triangle, vec![v0, v1, v2])
    }

    /// Create a face cell, tagging it by arity.
    pub fn polygon(points: Vec<PointId<I>>) -> Self {
        Self::new(CellKind::for_arity(points.len()), points)
    }

    /// Number of points in the cell.
    #[inline]
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// The three corners, if this is a proper triangle.
    pub fn as_triangle(&self) -> Option<[PointId<I>; 3]> {
        match (self.kind, self.points.as_slice()) {
            (CellKind::Triangle, &[v0, v1, v2]) => Some([v0, v1, v2]),
            _ => None,
        }
    }

    /// Whether this is a triangle-kind cell with exactly three points.
    #[inline]
    pub fn is_triangle(&self) -> bool {
        self.as_triangle().is_some()
    }

    /// Iterate over the cell's edges as `(start, end)` pairs in order.
    ///
    /// Faces are closed loops; a line yields its single segment; a vertex
    /// cell has no edges.
    pub fn edges(&self) -> impl Iterator<Item = (PointId<I>, PointId<I>)> + '_ {
        let n = self.points.len();
        let count = match self.kind {
            CellKind::Vertex => 0,
            CellKind::Line => n.saturating_sub(1),
            CellKind::Triangle | CellKind::Polygon => n,
        };
        (0..count).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Iterate over the cell's edges as undirected keys.
    pub fn edge_keys(&self) -> impl Iterator<Item = EdgeKey<I>> + '_ {
        self.edges().map(|(a, b)| EdgeKey::new(a, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[usize]) -> Vec<PointId> {
        raw.iter().map(|&i| PointId::new(i)).collect()
    }

    #[test]
    fn test_triangle_edges_follow_point_order() {
        let cell: Cell = Cell::polygon(ids(&[4, 7, 9]));
        assert_eq!(cell.kind, CellKind::Triangle);

        let edges: Vec<(usize, usize)> = cell.edges().map(|(a, b)| (a.index(), b.index())).collect();
        assert_eq!(edges, vec![(4, 7), (7, 9), (9, 4)]);
    }

    #[test]
    fn test_as_triangle_requires_kind_and_arity() {
        let quad: Cell = Cell::polygon(ids(&[0, 1, 2, 3]));
        assert_eq!(quad.kind, CellKind::Polygon);
        assert!(quad.as_triangle().is_none());

        // A polygon tag with three points is not treated as a triangle.
        let tagged: Cell = Cell::new(CellKind::Polygon, ids(&[0, 1, 2]));
        assert!(!tagged.is_triangle());

        // Nor is a triangle tag with the wrong arity.
        let broken: Cell = Cell::new(CellKind::Triangle, ids(&[0, 1, 2, 3]));
        assert!(!broken.is_triangle());
    }

    #[test]
    fn test_line_and_vertex_edges() {
        let line: Cell = Cell::new(CellKind::Line, ids(&[2, 5]));
        assert_eq!(line.edges().count(), 1);

        let vertex: Cell = Cell::new(CellKind::Vertex, ids(&[2]));
        assert_eq!(vertex.edges().count(), 0);
    }
}
