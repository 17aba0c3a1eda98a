use crate::{Axis, GridPos, GridRect, StructuralError};

use super::consolidate::consolidate_paragraphs;
use super::mutate::regions_after_remove;
use super::Table;

/// One compaction step: line `removed` along `axis` is folded into line `absorber`.
///
/// Indices are relative to the grid as it stands after all previous steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Fold {
    pub axis: Axis,
    pub removed: usize,
    pub absorber: usize,
}

/// Result of scanning a region layout for redundant rows and columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Compaction {
    pub folds: Vec<Fold>,
    pub regions: Vec<GridRect>,
}

/// The line along `axis` that absorbs line `index`, if that line is redundant.
///
/// A line is redundant when every position on it is covered by regions anchored on one
/// single earlier line that also continue past it. The last line of a span is never
/// redundant, so a span always keeps at least two lines along `axis`.
fn absorber_of(regions: &[GridRect], axis: Axis, index: usize, cross_len: usize) -> Option<usize> {
    if cross_len == 0 {
        return None;
    }
    let cross = axis.cross();
    let mut absorber = None;
    let mut covered = 0;
    for rect in regions {
        let (start, end) = (rect.start.along(axis), rect.end.along(axis));
        if !(start < index && index < end) {
            continue;
        }
        match absorber {
            None => absorber = Some(start),
            Some(line) if line != start => return None,
            Some(_) => {}
        }
        covered += rect.len_along(cross);
    }
    // Regions are disjoint, so full coverage means the crossing widths add up.
    (covered == cross_len).then_some(absorber).flatten()
}

/// Repeatedly remove redundant rows and columns from a region layout.
///
/// Pure: works on the region list and grid dimensions only. Removing a row can make a
/// column redundant and vice versa, so the scan restarts after every fold.
pub(crate) fn plan_compaction(regions: &[GridRect], rows: usize, cols: usize) -> Compaction {
    let mut regions = regions.to_vec();
    let mut dims = [rows, cols];
    let mut folds = Vec::new();
    'scan: loop {
        for (slot, axis) in [Axis::Row, Axis::Column].into_iter().enumerate() {
            let cross_len = dims[1 - slot];
            for index in 0..dims[slot] {
                if let Some(absorber) = absorber_of(&regions, axis, index, cross_len) {
                    folds.push(Fold {
                        axis,
                        removed: index,
                        absorber,
                    });
                    regions = regions_after_remove(&regions, axis, index);
                    dims[slot] -= 1;
                    continue 'scan;
                }
            }
        }
        break;
    }
    Compaction { folds, regions }
}

/// Everything a merge will change, computed before the table is touched.
#[derive(Debug)]
struct MergePlan {
    rect: GridRect,
    /// Non-anchor cells inside `rect` holding text, in row-major order.
    sources: Vec<GridPos>,
    regions: Vec<GridRect>,
    compaction: Compaction,
}

impl Table {
    /// Merge the cells at `a` and `b` (and everything between them) into one cell.
    ///
    /// The merged rectangle is the smallest one containing both cells' current spans,
    /// widened until it does not partially overlap any other merged region. Text from the
    /// absorbed cells is appended to the top-left cell in row-major order. Rows and
    /// columns left fully covered by a span from an earlier line are then removed, their
    /// size folded into that line.
    pub fn merge_cells(&mut self, a: GridPos, b: GridPos) -> Result<(), StructuralError> {
        let plan = self.plan_merge(a, b)?;
        log::debug!(
            "merging {} into {} ({} text sources, {} folds)",
            plan.rect,
            plan.rect.start,
            plan.sources.len(),
            plan.compaction.folds.len()
        );

        let sources: Vec<_> = plan
            .sources
            .iter()
            .map(|&pos| std::mem::take(&mut self.raw_cell_mut(pos).text))
            .collect();
        consolidate_paragraphs(&mut self.raw_cell_mut(plan.rect.start).text, sources);
        self.apply_regions(&plan.regions);

        for fold in &plan.compaction.folds {
            let size = self.line_size(fold.axis, fold.removed);
            *self.line_size_mut(fold.axis, fold.absorber) += size;
            match fold.axis {
                Axis::Row => {
                    self.rows.remove(fold.removed);
                }
                Axis::Column => {
                    for row in &mut self.rows {
                        row.cells.remove(fold.removed);
                    }
                    self.columns.remove(fold.removed);
                }
            }
            log::debug!(
                "compacted {} {} into {} ({size} EMU)",
                fold.axis,
                fold.removed,
                fold.absorber
            );
        }
        if !plan.compaction.folds.is_empty() {
            self.apply_regions(&plan.compaction.regions);
        }
        Ok(())
    }

    fn plan_merge(&self, a: GridPos, b: GridPos) -> Result<MergePlan, StructuralError> {
        let first = self.region_of(a)?;
        let second = self.region_of(b)?;
        if first.start == second.start {
            return Err(StructuralError::SameCellMerge { pos: first.start });
        }

        let existing = self.regions();
        let mut rect = first.union(&second);
        loop {
            let grown = existing
                .iter()
                .filter(|r| r.intersects(&rect))
                .fold(rect, |acc, r| acc.union(r));
            if grown == rect {
                break;
            }
            rect = grown;
        }

        let sources = rect
            .positions()
            .skip(1)
            .filter(|&pos| {
                let cell = self.raw_cell(pos);
                !cell.merge.is_covered() && !cell.text.is_empty()
            })
            .collect();

        let mut regions: Vec<GridRect> = existing
            .into_iter()
            .filter(|r| !rect.intersects(r))
            .collect();
        regions.push(rect);
        let compaction = plan_compaction(&regions, self.rows.len(), self.columns.len());

        Ok(MergePlan {
            rect,
            sources,
            regions,
            compaction,
        })
    }
}
