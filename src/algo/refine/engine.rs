//! The generation loop.

use std::collections::HashSet;
use std::ops::Range;

use log::{debug, warn};
use rayon::prelude::*;

use crate::algo::Progress;
use crate::error::{MeshError, Result};
use crate::mesh::{Cell, CellId, EdgeKey, MeshAdapter, MeshIndex};

use super::registry::MidpointRegistry;
use super::strategy::{CellSubdivision, LinearTriangleSubdivision};
use super::transition::{emit, Transition, TransitionFixer};
use super::{RefineOptions, Selection};

/// Counters for one generation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationStats {
    /// Points created for split edges.
    pub points_added: usize,
    /// Cells replaced by the subdivision rule.
    pub cells_subdivided: usize,
    /// Unselected cells re-triangulated by the transition fixer.
    pub cells_transitioned: usize,
    /// Unselected cells copied unchanged.
    pub cells_carried: usize,
    /// Cells the subdivision rule could not handle, copied unchanged.
    pub cells_skipped: usize,
}

/// Per-generation statistics of a refinement run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefineReport {
    /// One entry per completed generation.
    pub generations: Vec<GenerationStats>,
}

impl RefineReport {
    /// Points created over the whole run.
    pub fn total_points_added(&self) -> usize {
        self.generations.iter().map(|g| g.points_added).sum()
    }

    /// Cells subdivided over the whole run.
    pub fn total_cells_subdivided(&self) -> usize {
        self.generations.iter().map(|g| g.cells_subdivided).sum()
    }
}

/// Drives refinement generation by generation.
///
/// Each generation builds a fresh target mesh holding the current points,
/// subdivides the selected cells with the rule `R`, re-triangulates the
/// neighbors of adaptive selections, and then replaces the working mesh with
/// the target.
#[derive(Debug, Clone)]
pub struct RefineEngine<R = LinearTriangleSubdivision> {
    options: RefineOptions,
    rule: R,
    fixer: TransitionFixer,
}

impl RefineEngine<LinearTriangleSubdivision> {
    /// Create an engine using linear midpoint subdivision.
    pub fn new(options: RefineOptions) -> Self {
        Self {
            options,
            rule: LinearTriangleSubdivision,
            fixer: TransitionFixer::new(),
        }
    }
}

impl<R: CellSubdivision> RefineEngine<R> {
    /// Replace the subdivision rule.
    pub fn with_rule<S: CellSubdivision>(self, rule: S) -> RefineEngine<S> {
        RefineEngine {
            options: self.options,
            rule,
            fixer: self.fixer,
        }
    }

    /// The configured options.
    pub fn options(&self) -> &RefineOptions {
        &self.options
    }

    /// The configured subdivision rule.
    pub fn rule(&self) -> &R {
        &self.rule
    }

    /// Refine a copy of `input`.
    ///
    /// The input is left untouched. With `generations == 0` the result is an
    /// identical copy.
    pub fn run<M: MeshAdapter + Sync>(&self, input: &M) -> Result<(M, RefineReport)> {
        self.run_with_progress(input, &Progress::none())
    }

    /// Refine a copy of `input`, reporting once per generation.
    pub fn run_with_progress<M: MeshAdapter + Sync>(
        &self,
        input: &M,
        progress: &Progress,
    ) -> Result<(M, RefineReport)> {
        let generations = self.options.generations;
        let mut working = copy_mesh(input)?;
        // Roughly 1.5 edges per triangle.
        let mut registry = MidpointRegistry::with_capacity(input.num_cells() * 3 / 2);
        let mut report = RefineReport::default();

        let mut selection: Option<Vec<usize>> = match &self.options.selection {
            Selection::All => None,
            Selection::Cells(ids) => Some(ids.clone()),
        };

        for generation in 0..generations {
            progress.report(generation, generations, "Refining");

            let selected = match &selection {
                Some(ids) => Some(resolve_selection(&working, ids)?),
                None => None,
            };
            check_index_capacity(&working, selected.as_deref(), generation)?;

            let mut target = working
                .empty_like()
                .ok_or(MeshError::NullTarget { generation })?;
            seed_points(&working, &mut target);
            registry.clear();

            let stats = match selected {
                None => self.uniform_pass(&working, &mut target, &mut registry)?,
                Some(ids) => {
                    let (stats, children) =
                        self.adaptive_pass(&working, &ids, &mut target, &mut registry)?;
                    selection = Some(children.collect());
                    stats
                }
            };

            debug!(
                "generation {}/{} ({}): +{} points, {} subdivided, {} transitioned, {} carried, {} skipped",
                generation + 1,
                generations,
                self.rule.name(),
                stats.points_added,
                stats.cells_subdivided,
                stats.cells_transitioned,
                stats.cells_carried,
                stats.cells_skipped,
            );

            report.generations.push(stats);
            working = target;
        }

        progress.report(generations, generations, "Refining");
        Ok((working, report))
    }

    fn uniform_pass<M: MeshAdapter>(
        &self,
        source: &M,
        target: &mut M,
        registry: &mut MidpointRegistry<M::Index>,
    ) -> Result<GenerationStats> {
        let mut stats = GenerationStats::default();

        for (id, cell) in source.cells() {
            self.subdivide_or_carry(source, id, cell, target, registry, &mut stats)?;
        }

        stats.points_added = target.num_points() - source.num_points();
        Ok(stats)
    }

    /// Subdivide the selected cells, then fix up everything else.
    ///
    /// `selected` must be free of duplicates and in range (see
    /// [`resolve_selection`]). Returns the statistics and the id range of the
    /// selected cells' children in `target`, which become the next
    /// generation's selection.
    fn adaptive_pass<M: MeshAdapter + Sync>(
        &self,
        source: &M,
        selected: &[CellId<M::Index>],
        target: &mut M,
        registry: &mut MidpointRegistry<M::Index>,
    ) -> Result<(GenerationStats, Range<usize>)> {
        let mut stats = GenerationStats::default();
        let chosen: HashSet<CellId<M::Index>> = selected.iter().copied().collect();

        // The registry must be complete before any neighbor is classified.
        let first_child = target.num_cells();
        for &id in selected {
            if let Some(cell) = source.cell(id) {
                self.subdivide_or_carry(source, id, cell, target, registry, &mut stats)?;
            }
        }
        let children = first_child..target.num_cells();

        let remaining: Vec<(CellId<M::Index>, &Cell<M::Index>)> = source
            .cells()
            .filter(|(id, _)| !chosen.contains(id))
            .collect();

        let fixer = self.fixer;
        let registry: &MidpointRegistry<M::Index> = registry;
        let plans: Vec<Transition<M::Index>> = if self.options.parallel {
            remaining
                .par_iter()
                .map(|&(id, cell)| fixer.plan(source, id, cell, registry))
                .collect::<Result<_>>()?
        } else {
            remaining
                .iter()
                .map(|&(id, cell)| fixer.plan(source, id, cell, registry))
                .collect::<Result<_>>()?
        };

        for (&(_, cell), plan) in remaining.iter().zip(&plans) {
            match plan {
                Transition::Split { .. } => stats.cells_transitioned += 1,
                Transition::Skip | Transition::Unaffected => stats.cells_carried += 1,
            }
            emit(plan, cell, target);
        }

        stats.points_added = target.num_points() - source.num_points();
        Ok((stats, children))
    }

    fn subdivide_or_carry<M: MeshAdapter>(
        &self,
        source: &M,
        id: CellId<M::Index>,
        cell: &Cell<M::Index>,
        target: &mut M,
        registry: &mut MidpointRegistry<M::Index>,
        stats: &mut GenerationStats,
    ) -> Result<()> {
        match self.rule.subdivide_cell(source, id, cell, target, registry) {
            Ok(()) => {
                stats.cells_subdivided += 1;
                Ok(())
            }
            Err(e) if e.is_recoverable() => {
                warn!("{}; carrying cell over unchanged", e);
                target.add_cell(cell.clone());
                stats.cells_skipped += 1;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

/// Turn raw selection indices into cell ids of `mesh`.
///
/// Repeated indices are dropped, keeping the first occurrence. Indices are
/// range-checked before conversion so they can never alias another cell.
fn resolve_selection<M: MeshAdapter>(mesh: &M, ids: &[usize]) -> Result<Vec<CellId<M::Index>>> {
    let mut seen = HashSet::with_capacity(ids.len());
    let mut resolved = Vec::with_capacity(ids.len());

    for &id in ids {
        if id >= mesh.num_cells() {
            return Err(MeshError::UnknownCell { cell: id });
        }
        if seen.insert(id) {
            resolved.push(CellId::new(id));
        }
    }
    Ok(resolved)
}

/// Fail if the next generation could create more points, cells or edges
/// than `M::Index` can address.
///
/// The point count is exact (one per distinct split edge). The cell count is
/// an upper bound in adaptive mode: each split edge adds at most one child to
/// every cell around it. Edges are bounded by the total number of cell sides,
/// each new child being a triangle.
fn check_index_capacity<M: MeshAdapter>(
    mesh: &M,
    selected: Option<&[CellId<M::Index>]>,
    generation: usize,
) -> Result<()> {
    let max = <M::Index as MeshIndex>::MAX.to_usize().saturating_add(1);

    let mut split_edges: HashSet<EdgeKey<M::Index>> = HashSet::new();
    let mut extra_cells = 0usize;
    let mut visit = |cell: &Cell<M::Index>| {
        if let Some(c) = cell.as_triangle() {
            extra_cells += 3;
            split_edges.extend((0..3).map(|i| EdgeKey::new(c[i], c[(i + 1) % 3])));
        }
    };

    match selected {
        None => mesh.cells().for_each(|(_, cell)| visit(cell)),
        Some(ids) => {
            ids.iter().filter_map(|&id| mesh.cell(id)).for_each(&mut visit);
            for key in &split_edges {
                let (a, b) = key.endpoints();
                if let Some(edge) = mesh.find_edge(a, b) {
                    extra_cells += mesh.edge_cells(edge).len();
                }
            }
        }
    }

    let sides: usize = mesh.cells().map(|(_, cell)| cell.num_points()).sum();
    let needed = (mesh.num_points() + split_edges.len())
        .max(mesh.num_cells() + extra_cells)
        .max(sides + 3 * extra_cells);
    if needed > max {
        return Err(MeshError::IndexOverflow {
            generation,
            needed,
            max,
        });
    }
    Ok(())
}

/// Copy points and cells of `input` into a fresh mesh of the same kind.
fn copy_mesh<M: MeshAdapter>(input: &M) -> Result<M> {
    let mut copy = input
        .empty_like()
        .ok_or(MeshError::NullTarget { generation: 0 })?;
    seed_points(input, &mut copy);
    for (_, cell) in input.cells() {
        copy.add_cell(cell.clone());
    }
    Ok(copy)
}

/// Copy every point of `source` into `target`, keeping ids.
fn seed_points<M: MeshAdapter>(source: &M, target: &mut M) {
    // A 1-to-4 split adds roughly one point per face.
    target.reserve_points(source.num_points() + source.num_cells());
    for (_, p) in source.points() {
        target.add_point(*p);
    }
}

/// Whether every point id in `mesh`'s cells is in range.
#[cfg(test)]
pub(crate) fn cells_reference_valid_points<M: MeshAdapter>(mesh: &M) -> bool {
    let n = mesh.num_points();
    mesh.cells()
        .all(|(_, c)| c.points.iter().all(|p| p.index() < n && p.is_valid()))
}
