//! Transition triangulations for cells next to subdivided ones.
//!
//! When only some cells are subdivided, their unselected neighbors end up with
//! one, two or three edges carrying a new midpoint. Left alone, those edges
//! would form T-junctions. [`TransitionFixer`] re-triangulates such a cell
//! from its three corners and the midpoints already on its edges, without
//! creating any new point.
//!
//! # Template table
//!
//! The split state of a triangle is a 3-bit mask where bit `i` is set when
//! edge `i` (from corner `i` to corner `(i + 1) % 3`) has a midpoint. Each of
//! the eight masks maps to a fixed list of child triangles expressed in
//! symbolic slots ([`Slot::Corner`] and [`Slot::Mid`]):
//!
//! | Mask    | Split edges | Children |
//! |---------|-------------|----------|
//! | `0b000` | none        | 0 (cell is kept as is) |
//! | `0b001` | 0           | 2 |
//! | `0b010` | 1           | 2 |
//! | `0b100` | 2           | 2 |
//! | `0b011` | 0, 1        | 3 |
//! | `0b101` | 0, 2        | 3 |
//! | `0b110` | 1, 2        | 3 |
//! | `0b111` | all         | 4 (same as regular 1-to-4 split) |
//!
//! All templates keep the winding of the parent triangle.

use crate::error::{MeshError, Result};
use crate::mesh::{Cell, CellId, EdgeKey, MeshAdapter, MeshIndex, PointId};

use super::registry::MidpointRegistry;

/// A symbolic vertex reference inside a triangle template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Corner `i` of the parent triangle.
    Corner(usize),
    /// Midpoint of edge `i` of the parent triangle.
    Mid(usize),
}

/// Child triangles of one template.
pub type Template = &'static [[Slot; 3]];

const C0: Slot = Slot::Corner(0);
const C1: Slot = Slot::Corner(1);
const C2: Slot = Slot::Corner(2);
const M0: Slot = Slot::Mid(0);
const M1: Slot = Slot::Mid(1);
const M2: Slot = Slot::Mid(2);

/// Mask with every edge split.
pub const FULL_SPLIT: u8 = 0b111;

/// Child triangles for every split mask, indexed by the mask.
pub const TRANSITION_TABLE: [Template; 8] = [
    // 0b000
    &[],
    // 0b001: ear split on edge 0
    &[[M0, C1, C2], [M0, C2, C0]],
    // 0b010: ear split on edge 1
    &[[M1, C2, C0], [M1, C0, C1]],
    // 0b011: edges 0 and 1
    &[[C2, C0, M0], [C2, M0, M1], [M0, C1, M1]],
    // 0b100: ear split on edge 2
    &[[M2, C0, C1], [M2, C1, C2]],
    // 0b101: edges 0 and 2
    &[[C1, C2, M0], [C2, M2, M0], [M2, C0, M0]],
    // 0b110: edges 1 and 2
    &[[C0, C1, M1], [C0, M1, M2], [M1, C2, M2]],
    // 0b111: regular 1-to-4 split
    &[[C0, M0, M2], [M0, C1, M1], [M1, C2, M2], [M0, M1, M2]],
];

/// The template for a split mask. Only the low three bits are used.
#[inline]
pub fn template(mask: u8) -> Template {
    TRANSITION_TABLE[(mask & FULL_SPLIT) as usize]
}

/// Resolve a template against concrete corner and midpoint ids.
///
/// Slots referring to an edge without a midpoint resolve to an invalid id;
/// callers only pass masks whose midpoints are set.
pub fn instantiate<I: MeshIndex>(
    template: Template,
    corners: &[PointId<I>; 3],
    mids: &[Option<PointId<I>>; 3],
) -> Vec<[PointId<I>; 3]> {
    let resolve = |slot: Slot| match slot {
        Slot::Corner(i) => corners[i],
        Slot::Mid(i) => mids[i].unwrap_or_else(PointId::invalid),
    };

    template
        .iter()
        .map(|tri| [resolve(tri[0]), resolve(tri[1]), resolve(tri[2])])
        .collect()
}

/// What to do with an unselected cell after the selected cells were split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition<I: MeshIndex = u32> {
    /// Not a proper triangle; carried over unchanged.
    Skip,
    /// No edge of the triangle was split; carried over unchanged.
    Unaffected,
    /// Replace the triangle with these children.
    Split {
        /// Which edges carry a midpoint.
        mask: u8,
        /// Child triangles, parent winding preserved.
        triangles: Vec<[PointId<I>; 3]>,
    },
}

impl<I: MeshIndex> Transition<I> {
    /// Number of split edges.
    pub fn split_edges(&self) -> u32 {
        match self {
            Transition::Split { mask, .. } => mask.count_ones(),
            _ => 0,
        }
    }
}

/// Re-triangulates unselected cells whose edges were split by neighbors.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransitionFixer;

impl TransitionFixer {
    /// Create a fixer.
    pub fn new() -> Self {
        Self
    }

    /// Classify `cell` against the midpoints registered this generation.
    ///
    /// This only reads the mesh and the registry, so plans for different
    /// cells can be computed concurrently.
    ///
    /// # Errors
    /// [`MeshError::InconsistentMesh`] when an edge of the triangle is not in
    /// `source`'s edge table.
    pub fn plan<M: MeshAdapter>(
        &self,
        source: &M,
        id: CellId<M::Index>,
        cell: &Cell<M::Index>,
        registry: &MidpointRegistry<M::Index>,
    ) -> Result<Transition<M::Index>> {
        let Some(corners) = cell.as_triangle() else {
            return Ok(Transition::Skip);
        };

        let mut mids = [None; 3];
        let mut mask = 0u8;

        for i in 0..3 {
            let a = corners[i];
            let b = corners[(i + 1) % 3];

            if source.find_edge(a, b).is_none() {
                return Err(MeshError::InconsistentMesh {
                    cell: id.index(),
                    v0: a.index(),
                    v1: b.index(),
                });
            }

            if let Some(m) = registry.lookup(EdgeKey::new(a, b)) {
                mids[i] = Some(m);
                mask |= 1 << i;
            }
        }

        if mask == 0 {
            return Ok(Transition::Unaffected);
        }

        Ok(Transition::Split {
            mask,
            triangles: instantiate(template(mask), &corners, &mids),
        })
    }
}

/// Append the outcome of a plan to `target`.
pub fn emit<M: MeshAdapter>(transition: &Transition<M::Index>, cell: &Cell<M::Index>, target: &mut M) {
    match transition {
        Transition::Skip | Transition::Unaffected => {
            target.add_cell(cell.clone());
        }
        Transition::Split { triangles, .. } => {
            for &[v0, v1, v2] in triangles {
                target.add_triangle(v0, v1, v2);
            }
        }
    }
}
