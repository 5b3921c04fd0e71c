//! Crack-free cell subdivision.
//!
//! This module refines triangle meshes either uniformly (every cell is split
//! each generation) or adaptively (only selected cells are split and their
//! neighbors are re-triangulated so no T-junctions appear).
//!
//! # Algorithm
//!
//! Each generation:
//!
//! 1. Creates a fresh target mesh holding the current points under the same ids
//! 2. Clears the [`MidpointRegistry`]
//! 3. Splits every selected cell with a [`CellSubdivision`] rule, creating one
//!    point per edge and reusing the registry entry when a neighbor already
//!    split that edge
//! 4. In adaptive mode, runs the [`TransitionFixer`] over every other cell:
//!    triangles with 1, 2 or 3 split edges are replaced by a fixed template
//!    chosen by which edges were split; untouched cells are copied as is
//! 5. Replaces the working mesh with the target
//!
//! In adaptive mode the children of the selected cells form the selection of
//! the next generation, so `generations = n` refines the same region `n`
//! times.
//!
//! # Example
//!
//! ```
//! use trisect::prelude::*;
//! use trisect::algo::refine::{refine, RefineOptions};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//!     Point3::new(0.5, -1.0, 0.0),
//! ];
//! let mut mesh: SurfaceMesh = build_from_triangles(&vertices, &[[0, 1, 2], [0, 3, 1]]).unwrap();
//!
//! // Split only the first triangle; the second becomes a transition pair.
//! let report = refine(&mut mesh, &RefineOptions::adaptive(1, [0])).unwrap();
//!
//! assert_eq!(mesh.num_cells(), 4 + 2);
//! assert_eq!(report.total_points_added(), 3);
//! assert!(mesh.is_watertight());
//! ```

mod engine;
mod registry;
mod strategy;
mod transition;

pub use engine::{GenerationStats, RefineEngine, RefineReport};
pub use registry::MidpointRegistry;
pub use strategy::{CellSubdivision, LinearTriangleSubdivision, LoopTriangleSubdivision};
pub use transition::{
    emit, template, Slot, Template, Transition, TransitionFixer, FULL_SPLIT, TRANSITION_TABLE,
};

use std::collections::HashSet;

use crate::algo::Progress;
use crate::error::Result;
use crate::mesh::MeshAdapter;

/// Which cells a generation subdivides.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    /// Every cell (uniform refinement).
    #[default]
    All,
    /// Only these cell indices, in this order (adaptive refinement).
    Cells(Vec<usize>),
}

impl Selection {
    /// An adaptive selection. Repeated ids are dropped, keeping the first
    /// occurrence.
    pub fn cells<T: IntoIterator<Item = usize>>(ids: T) -> Self {
        let mut seen = HashSet::new();
        Selection::Cells(ids.into_iter().filter(|id| seen.insert(*id)).collect())
    }
}

/// Options for cell subdivision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefineOptions {
    /// Number of generations (refinement passes).
    pub generations: usize,

    /// Cells to subdivide.
    pub selection: Selection,

    /// Whether to classify transition cells in parallel (default: true).
    /// Output is identical either way.
    pub parallel: bool,
}

impl Default for RefineOptions {
    fn default() -> Self {
        Self {
            generations: 1,
            selection: Selection::All,
            parallel: true,
        }
    }
}

impl RefineOptions {
    /// Uniform refinement with the specified number of generations.
    pub fn new(generations: usize) -> Self {
        Self {
            generations,
            ..Self::default()
        }
    }

    /// Uniform refinement with the specified number of generations.
    pub fn uniform(generations: usize) -> Self {
        Self::new(generations)
    }

    /// Adaptive refinement of the given cells.
    pub fn adaptive<T: IntoIterator<Item = usize>>(generations: usize, cells: T) -> Self {
        Self::new(generations).with_selection(Selection::cells(cells))
    }

    /// Set the selection.
    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    /// Set the number of generations.
    pub fn with_generations(mut self, generations: usize) -> Self {
        self.generations = generations;
        self
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Whether every cell is subdivided.
    pub fn is_uniform(&self) -> bool {
        matches!(self.selection, Selection::All)
    }
}

/// Refine `mesh` in place with linear midpoint subdivision.
///
/// On error the mesh is left unchanged.
pub fn refine<M: MeshAdapter + Sync>(mesh: &mut M, options: &RefineOptions) -> Result<RefineReport> {
    refine_with_progress(mesh, options, &Progress::none())
}

/// Refine `mesh` in place with progress reporting.
pub fn refine_with_progress<M: MeshAdapter + Sync>(
    mesh: &mut M,
    options: &RefineOptions,
    progress: &Progress,
) -> Result<RefineReport> {
    refine_with_rule(mesh, options, LinearTriangleSubdivision, progress)
}

/// Refine `mesh` in place with a custom subdivision rule.
pub fn refine_with_rule<M, R>(
    mesh: &mut M,
    options: &RefineOptions,
    rule: R,
    progress: &Progress,
) -> Result<RefineReport>
where
    M: MeshAdapter + Sync,
    R: CellSubdivision,
{
    let engine = RefineEngine::new(options.clone()).with_rule(rule);
    let (refined, report) = engine.run_with_progress(mesh, progress)?;
    mesh.replace_with(refined);
    Ok(report)
}
