//! Indexed polygon mesh with an edge table.
//!
//! [`SurfaceMesh`] stores points and cells in dense arrays and keeps an edge
//! table up to date as cells are inserted. Every edge knows which cells touch
//! it, which gives O(1) edge lookup by endpoint pair and makes topology checks
//! such as [`SurfaceMesh::is_watertight`] cheap.

use std::collections::HashMap;

use nalgebra::Point3;

use super::adapter::MeshAdapter;
use super::cell::{Cell, CellKind};
use super::index::{CellId, EdgeId, EdgeKey, MeshIndex, PointId};

/// An edge and the cells incident to it.
#[derive(Debug, Clone)]
pub struct Edge<I: MeshIndex = u32> {
    /// The undirected endpoints.
    pub key: EdgeKey<I>,

    /// Cells using this edge, in insertion order.
    pub cells: Vec<CellId<I>>,
}

impl<I: MeshIndex> Edge<I> {
    /// Whether exactly one cell uses this edge.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.cells.len() == 1
    }

    /// Whether more than two cells use this edge.
    #[inline]
    pub fn is_non_manifold(&self) -> bool {
        self.cells.len() > 2
    }
}

/// An indexed polygon mesh.
#[derive(Debug, Clone)]
pub struct SurfaceMesh<I: MeshIndex = u32> {
    pub(crate) points: Vec<Point3<f64>>,
    pub(crate) cells: Vec<Cell<I>>,
    pub(crate) edges: Vec<Edge<I>>,
    pub(crate) edge_index: HashMap<EdgeKey<I>, EdgeId<I>>,
}

impl<I: MeshIndex> Default for SurfaceMesh<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: MeshIndex> PartialEq for SurfaceMesh<I> {
    /// Two meshes are equal when they hold the same points and cells in the
    /// same order. The edge table is derived data and is not compared.
    fn eq(&self, other: &Self) -> bool {
        self.points == other.points && self.cells == other.cells
    }
}

impl<I: MeshIndex> SurfaceMesh<I> {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self {
            points: Vec::new(),
            cells: Vec::new(),
            edges: Vec::new(),
            edge_index: HashMap::new(),
        }
    }

    /// Create a mesh with pre-allocated capacity.
    pub fn with_capacity(num_points: usize, num_cells: usize) -> Self {
        // Closed triangle meshes have E = 3F/2; leave headroom for boundaries.
        let num_edges = num_cells * 3 / 2 + num_cells / 4;

        Self {
            points: Vec::with_capacity(num_points),
            cells: Vec::with_capacity(num_cells),
            edges: Vec::with_capacity(num_edges),
            edge_index: HashMap::with_capacity(num_edges),
        }
    }

    // ==================== Accessors ====================

    /// Number of unique edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Position of a point.
    ///
    /// # Panics
    /// Panics if `id` is out of range.
    #[inline]
    pub fn position(&self, id: PointId<I>) -> &Point3<f64> {
        &self.points[id.index()]
    }

    /// An edge by handle.
    #[inline]
    pub fn edge(&self, id: EdgeId<I>) -> &Edge<I> {
        &self.edges[id.index()]
    }

    /// Iterate over all edges.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId<I>, &Edge<I>)> + '_ {
        self.edges
            .iter()
            .enumerate()
            .map(|(i, e)| (EdgeId::new(i), e))
    }

    /// Endpoints of an edge.
    #[inline]
    pub fn edge_key(&self, id: EdgeId<I>) -> EdgeKey<I> {
        self.edges[id.index()].key
    }

    /// Iterate over the corners of every proper triangle cell.
    pub fn triangles(&self) -> impl Iterator<Item = [PointId<I>; 3]> + '_ {
        self.cells.iter().filter_map(Cell::as_triangle)
    }

    /// Count cells of a given kind.
    pub fn count_kind(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|c| c.kind == kind).count()
    }

    // ==================== Topology ====================

    /// Edges used by exactly one cell.
    pub fn boundary_edges(&self) -> impl Iterator<Item = EdgeId<I>> + '_ {
        self.edges()
            .filter(|(_, e)| e.is_boundary())
            .map(|(id, _)| id)
    }

    /// Edges used by more than two cells.
    pub fn non_manifold_edges(&self) -> impl Iterator<Item = EdgeId<I>> + '_ {
        self.edges()
            .filter(|(_, e)| e.is_non_manifold())
            .map(|(id, _)| id)
    }

    /// Whether every edge is used by one (boundary) or two (interior) cells.
    pub fn is_watertight(&self) -> bool {
        self.edges
            .iter()
            .all(|e| !e.cells.is_empty() && e.cells.len() <= 2)
    }

    /// Whether every cell is a proper triangle.
    pub fn is_triangle_mesh(&self) -> bool {
        self.cells.iter().all(Cell::is_triangle)
    }

    // ==================== Geometry ====================

    /// Axis-aligned bounding box, or `None` for a mesh without points.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = self.points.first()?;
        let mut min = *first;
        let mut max = *first;

        for p in &self.points[1..] {
            min = min.inf(p);
            max = max.sup(p);
        }

        Some((min, max))
    }

    /// Area of a face cell, fanned from its first point. Zero for lines and
    /// vertices.
    pub fn cell_area(&self, id: CellId<I>) -> f64 {
        let cell = &self.cells[id.index()];
        if !cell.kind.is_face() || cell.points.len() < 3 {
            return 0.0;
        }

        let p0 = self.position(cell.points[0]);
        cell.points[1..]
            .windows(2)
            .map(|w| {
                let e1 = self.position(w[0]) - p0;
                let e2 = self.position(w[1]) - p0;
                0.5 * e1.cross(&e2).norm()
            })
            .sum()
    }

    /// Total area of all face cells.
    pub fn surface_area(&self) -> f64 {
        (0..self.cells.len())
            .map(|i| self.cell_area(CellId::new(i)))
            .sum()
    }

    // ==================== Mutation ====================

    fn register_edges(&mut self, id: CellId<I>) {
        let keys: Vec<EdgeKey<I>> = self.cells[id.index()].edge_keys().collect();

        for key in keys {
            let edge_id = match self.edge_index.get(&key) {
                Some(&e) => e,
                None => {
                    let e = EdgeId::new(self.edges.len());
                    self.edges.push(Edge {
                        key,
                        cells: Vec::with_capacity(2),
                    });
                    self.edge_index.insert(key, e);
                    e
                }
            };

            let cells = &mut self.edges[edge_id.index()].cells;
            if !cells.contains(&id) {
                cells.push(id);
            }
        }
    }
}

impl<I: MeshIndex> MeshAdapter for SurfaceMesh<I> {
    type Index = I;

    #[inline]
    fn num_points(&self) -> usize {
        self.points.len()
    }

    #[inline]
    fn num_cells(&self) -> usize {
        self.cells.len()
    }

    fn points(&self) -> impl Iterator<Item = (PointId<I>, &Point3<f64>)> + '_ {
        self.points
            .iter()
            .enumerate()
            .map(|(i, p)| (PointId::new(i), p))
    }

    fn cells(&self) -> impl Iterator<Item = (CellId<I>, &Cell<I>)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, c)| (CellId::new(i), c))
    }

    #[inline]
    fn point(&self, id: PointId<I>) -> Option<&Point3<f64>> {
        self.points.get(id.index())
    }

    #[inline]
    fn cell(&self, id: CellId<I>) -> Option<&Cell<I>> {
        self.cells.get(id.index())
    }

    #[inline]
    fn find_edge(&self, p0: PointId<I>, p1: PointId<I>) -> Option<EdgeId<I>> {
        self.edge_index.get(&EdgeKey::new(p0, p1)).copied()
    }

    fn edge_cells(&self, edge: EdgeId<I>) -> &[CellId<I>] {
        self.edges
            .get(edge.index())
            .map(|e| e.cells.as_slice())
            .unwrap_or(&[])
    }

    fn add_point(&mut self, position: Point3<f64>) -> PointId<I> {
        let id = PointId::new(self.points.len());
        self.points.push(position);
        id
    }

    fn add_triangle(&mut self, v0: PointId<I>, v1: PointId<I>, v2: PointId<I>) -> CellId<I> {
        self.add_cell(Cell::triangle(v0, v1, v2))
    }

    fn add_cell(&mut self, cell: Cell<I>) -> CellId<I> {
        let id = CellId::new(self.cells.len());
        self.cells.push(cell);
        self.register_edges(id);
        id
    }

    fn reserve_points(&mut self, additional: usize) {
        self.points.reserve(additional);
    }

    fn replace_with(&mut self, other: Self) {
        *self = other;
    }

    fn empty_like(&self) -> Option<Self> {
        Some(Self::new())
    }
}
