//! Cell subdivision rules.
//!
//! A rule splits one selected cell into children, asking the
//! [`MidpointRegistry`] for each edge point first so that a neighbor that
//! already split the shared edge is reused instead of duplicated.
//!
//! Two triangle rules are provided. Both produce the same 1-to-4 topology and
//! differ only in where the new edge points are placed:
//!
//! - [`LinearTriangleSubdivision`]: the exact edge midpoint.
//! - [`LoopTriangleSubdivision`]: the Loop edge mask
//!   `3/8 (a + b) + 1/8 (c + d)`, with `c` and `d` opposite the edge.

use nalgebra::Point3;

use crate::error::{MeshError, Result};
use crate::mesh::{Cell, CellId, EdgeId, EdgeKey, MeshAdapter, PointId};

use super::registry::MidpointRegistry;
use super::transition::{instantiate, template, FULL_SPLIT};

/// A rule that subdivides one cell into the target mesh.
///
/// Implementations must be deterministic and must route every new edge
/// point through the registry: an edge that already has an entry is reused,
/// never split twice.
pub trait CellSubdivision {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Emit the children of `cell` into `target`.
    ///
    /// `source` is the mesh of the current generation; `target` already
    /// holds every point of `source` under the same ids.
    ///
    /// # Errors
    /// * [`MeshError::UnsupportedCellType`] if the rule cannot split this
    ///   kind of cell. Nothing has been emitted in that case.
    /// * [`MeshError::InconsistentMesh`] if an edge of the cell is missing
    ///   from `source`.
    fn subdivide_cell<M: MeshAdapter>(
        &self,
        source: &M,
        id: CellId<M::Index>,
        cell: &Cell<M::Index>,
        target: &mut M,
        registry: &mut MidpointRegistry<M::Index>,
    ) -> Result<()>;
}

/// 1-to-4 triangle split with new points at exact edge midpoints.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearTriangleSubdivision;

impl CellSubdivision for LinearTriangleSubdivision {
    fn name(&self) -> &'static str {
        "linear"
    }

    fn subdivide_cell<M: MeshAdapter>(
        &self,
        source: &M,
        id: CellId<M::Index>,
        cell: &Cell<M::Index>,
        target: &mut M,
        registry: &mut MidpointRegistry<M::Index>,
    ) -> Result<()> {
        split_triangle(source, id, cell, target, registry, |_, _, a, b| midpoint(a, b))
    }
}

/// 1-to-4 triangle split with new points placed by the Loop edge mask.
///
/// Interior edges shared by exactly two triangles get
/// `3/8 (a + b) + 1/8 (c + d)`, where `c` and `d` are the corners opposite
/// the edge. Boundary and non-manifold edges fall back to the midpoint.
/// Existing points are not moved.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoopTriangleSubdivision;

impl CellSubdivision for LoopTriangleSubdivision {
    fn name(&self) -> &'static str {
        "loop"
    }

    fn subdivide_cell<M: MeshAdapter>(
        &self,
        source: &M,
        id: CellId<M::Index>,
        cell: &Cell<M::Index>,
        target: &mut M,
        registry: &mut MidpointRegistry<M::Index>,
    ) -> Result<()> {
        split_triangle(source, id, cell, target, registry, |edge, key, a, b| {
            match opposite_corners(source, edge, key) {
                Some((c, d)) => Point3::from(
                    (a.coords + b.coords) * (3.0 / 8.0) + (c.coords + d.coords) * (1.0 / 8.0),
                ),
                None => midpoint(a, b),
            }
        })
    }
}

#[inline]
fn midpoint(a: &Point3<f64>, b: &Point3<f64>) -> Point3<f64> {
    Point3::from((a.coords + b.coords) * 0.5)
}

/// Positions of the corners opposite `key` in its two incident triangles.
///
/// `None` unless the edge has exactly two incident triangles.
fn opposite_corners<M: MeshAdapter>(
    source: &M,
    edge: EdgeId<M::Index>,
    key: EdgeKey<M::Index>,
) -> Option<(Point3<f64>, Point3<f64>)> {
    let incident = source.edge_cells(edge);
    if incident.len() != 2 {
        return None;
    }

    let opposite = |cell_id: CellId<M::Index>| -> Option<Point3<f64>> {
        let corners = source.cell(cell_id)?.as_triangle()?;
        let apex = corners.into_iter().find(|&p| !key.contains(p))?;
        source.point(apex).copied()
    };

    Some((opposite(incident[0])?, opposite(incident[1])?))
}

/// Shared 1-to-4 split: resolve or create the three edge points, then emit
/// the full-split template.
fn split_triangle<M, F>(
    source: &M,
    id: CellId<M::Index>,
    cell: &Cell<M::Index>,
    target: &mut M,
    registry: &mut MidpointRegistry<M::Index>,
    mut edge_point: F,
) -> Result<()>
where
    M: MeshAdapter,
    F: FnMut(EdgeId<M::Index>, EdgeKey<M::Index>, &Point3<f64>, &Point3<f64>) -> Point3<f64>,
{
    let corners = cell.as_triangle().ok_or(MeshError::UnsupportedCellType {
        cell: id.index(),
        kind: cell.kind,
        points: cell.num_points(),
    })?;

    let position = |p: PointId<M::Index>| {
        source.point(p).ok_or(MeshError::InvalidVertexIndex {
            cell: id.index(),
            point: p.index(),
        })
    };
    let positions = [position(corners[0])?, position(corners[1])?, position(corners[2])?];

    let mut mids = [None; 3];
    for i in 0..3 {
        let j = (i + 1) % 3;
        let (a, b) = (corners[i], corners[j]);
        let key = EdgeKey::new(a, b);

        let edge = source.find_edge(a, b).ok_or(MeshError::InconsistentMesh {
            cell: id.index(),
            v0: a.index(),
            v1: b.index(),
        })?;

        let mid = registry.get_or_insert_with(key, || {
            target.add_point(edge_point(edge, key, positions[i], positions[j]))
        });
        mids[i] = Some(mid);
    }

    for [v0, v1, v2] in instantiate(template(FULL_SPLIT), &corners, &mids) {
        target.add_triangle(v0, v1, v2);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{build_from_polygons, build_from_triangles, SurfaceMesh};

    fn two_triangles() -> SurfaceMesh {
        // Shared edge (0, 1) along the x-axis, apexes above and below.
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(1.0, 2.0, 0.0),
            Point3::new(1.0, -2.0, 1.0),
        ];
        build_from_triangles(&vertices, &[[0, 1, 2], [1, 0, 3]]).unwrap()
    }

    fn seeded_target(source: &SurfaceMesh) -> SurfaceMesh {
        let mut target = SurfaceMesh::new();
        for (_, p) in source.points() {
            target.add_point(*p);
        }
        target
    }

    fn split_all<R: CellSubdivision>(rule: &R, source: &SurfaceMesh) -> (SurfaceMesh, MidpointRegistry) {
        let mut target = seeded_target(source);
        let mut registry = MidpointRegistry::new();
        for (id, cell) in source.cells() {
            rule.subdivide_cell(source, id, cell, &mut target, &mut registry)
                .unwrap();
        }
        (target, registry)
    }

    #[test]
    fn test_linear_split_single_triangle() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
        ];
        let source: SurfaceMesh = build_from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
        let (target, registry) = split_all(&LinearTriangleSubdivision, &source);

        assert_eq!(target.num_points(), 6);
        assert_eq!(target.num_cells(), 4);
        assert_eq!(registry.len(), 3);

        let m01 = registry.lookup(EdgeKey::new(PointId::new(0), PointId::new(1))).unwrap();
        assert_eq!(*target.position(m01), Point3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_shared_edge_is_split_once() {
        let source = two_triangles();
        let (target, registry) = split_all(&LinearTriangleSubdivision, &source);

        // 5 unique edges, 5 new points, not 6.
        assert_eq!(registry.len(), 5);
        assert_eq!(target.num_points(), 4 + 5);
        assert_eq!(target.num_cells(), 8);
        assert!(target.is_watertight());
    }

    #[test]
    fn test_second_caller_reuses_registration() {
        let source = two_triangles();
        let mut target = seeded_target(&source);
        let mut registry = MidpointRegistry::new();

        let shared = EdgeKey::new(PointId::new(0), PointId::new(1));
        let preset = target.add_point(Point3::new(1.0, 0.0, 0.0));
        registry.register(shared, preset);

        let cell = source.cell(CellId::new(1)).unwrap().clone();
        LinearTriangleSubdivision
            .subdivide_cell(&source, CellId::new(1), &cell, &mut target, &mut registry)
            .unwrap();

        assert_eq!(registry.lookup(shared), Some(preset));
        // Only the two unshared edges got new points.
        assert_eq!(target.num_points(), 4 + 1 + 2);
    }

    #[test]
    fn test_loop_edge_mask() {
        let source = two_triangles();
        let (target, registry) = split_all(&LoopTriangleSubdivision, &source);

        // Interior edge: 3/8 * ((0,0,0) + (2,0,0)) + 1/8 * ((1,2,0) + (1,-2,1))
        let interior = registry
            .lookup(EdgeKey::new(PointId::new(0), PointId::new(1)))
            .unwrap();
        let expected = Point3::new(1.0, 0.0, 0.125);
        assert!((target.position(interior) - expected).norm() < 1e-12);

        // Boundary edge keeps the plain midpoint.
        let boundary = registry
            .lookup(EdgeKey::new(PointId::new(1), PointId::new(2)))
            .unwrap();
        assert!((target.position(boundary) - Point3::new(1.5, 1.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn test_non_triangle_is_rejected_without_side_effects() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        let faces: Vec<Vec<usize>> = vec![vec![0, 1, 2, 3]];
        let source: SurfaceMesh = build_from_polygons(&vertices, &faces).unwrap();
        let mut target = seeded_target(&source);
        let mut registry = MidpointRegistry::new();

        let cell = source.cell(CellId::new(0)).unwrap();
        let err = LinearTriangleSubdivision
            .subdivide_cell(&source, CellId::new(0), cell, &mut target, &mut registry)
            .unwrap_err();

        assert!(err.is_recoverable());
        assert_eq!(target.num_points(), 4);
        assert_eq!(target.num_cells(), 0);
        assert!(registry.is_empty());
    }
}
