use crate::{Axis, Cell, ColumnWidthPolicy, GridRect, StructuralError};

use super::sizing::{check_size, rescale};
use super::{Column, Row, Table};

fn with_axis_bounds(rect: GridRect, axis: Axis, start: usize, end: usize) -> GridRect {
    let cross = axis.cross();
    GridRect {
        start: axis.pos(start, rect.start.along(cross)),
        end: axis.pos(end, rect.end.along(cross)),
    }
}

/// Region layout after inserting a new line at `index` along `axis`.
///
/// Regions at or past `index` shift by one; a region the new line lands strictly inside
/// grows by one.
pub(crate) fn regions_after_insert(regions: &[GridRect], axis: Axis, index: usize) -> Vec<GridRect> {
    regions
        .iter()
        .map(|rect| {
            let (start, end) = (rect.start.along(axis), rect.end.along(axis));
            if start >= index {
                with_axis_bounds(*rect, axis, start + 1, end + 1)
            } else if index <= end {
                with_axis_bounds(*rect, axis, start, end + 1)
            } else {
                *rect
            }
        })
        .collect()
}

/// Region layout after removing line `index` along `axis`.
///
/// Regions past `index` shift back by one, regions crossing it shrink by one, and regions
/// that end up as a single position are dropped (their anchor reverts to standalone).
pub(crate) fn regions_after_remove(regions: &[GridRect], axis: Axis, index: usize) -> Vec<GridRect> {
    regions
        .iter()
        .filter_map(|rect| {
            let (start, end) = (rect.start.along(axis), rect.end.along(axis));
            let next = if start > index {
                with_axis_bounds(*rect, axis, start - 1, end - 1)
            } else if index <= end {
                if start == end {
                    return None;
                }
                with_axis_bounds(*rect, axis, start, end - 1)
            } else {
                *rect
            };
            (!next.is_single_cell()).then_some(next)
        })
        .collect()
}

impl Table {
    fn check_insert(&self, axis: Axis, index: usize) -> Result<(), StructuralError> {
        let len = self.axis_len(axis);
        if index > len {
            return Err(StructuralError::GridIndexOutOfRange { axis, index, len });
        }
        Ok(())
    }

    /// Append an empty row of standalone cells with the default row height.
    ///
    /// Returns the new row's index.
    pub fn add_row(&mut self) -> Result<usize, StructuralError> {
        self.insert_row(self.rows.len())
    }

    /// Insert an empty row of default height before `index` (`index == row_count` appends).
    ///
    /// Existing row heights are not rescaled; the table grows by the new row's height.
    pub fn insert_row(&mut self, index: usize) -> Result<usize, StructuralError> {
        if self.columns.is_empty() {
            return Err(StructuralError::EmptyTableMutation);
        }
        self.check_insert(Axis::Row, index)?;
        let height = self.settings.default_row_height;
        check_size(height)?;
        let cells = vec![Cell::new(); self.columns.len()];
        self.insert_line(Axis::Row, index, height, cells, &[])?;
        log::debug!("inserted row {index} ({height} EMU)");
        Ok(index)
    }

    /// Insert a row before `index` whose cells copy the formatting of row `template`
    /// (fill, borders, font) but start without text. The height is copied too.
    pub fn insert_row_from_template(
        &mut self,
        index: usize,
        template: usize,
    ) -> Result<usize, StructuralError> {
        if self.columns.is_empty() {
            return Err(StructuralError::EmptyTableMutation);
        }
        self.check_insert(Axis::Row, index)?;
        self.check_index(Axis::Row, template)?;
        let cells = (0..self.columns.len())
            .map(|col| {
                let anchor = self.resolve(Axis::Row.pos(template, col))?;
                Ok(self.raw_cell(anchor).format_template())
            })
            .collect::<Result<Vec<_>, StructuralError>>()?;
        let height = self.rows[template].height;
        self.insert_line(Axis::Row, index, height, cells, &[])?;
        log::debug!("inserted row {index} from template row {template}");
        Ok(index)
    }

    /// Deep-copy row `row` (content included) and append it to the end of the table.
    ///
    /// The table grows by the row's height. Horizontal spans inside the row are kept;
    /// vertical spans are cut to the copied row.
    pub fn duplicate_row(&mut self, row: usize) -> Result<usize, StructuralError> {
        self.check_index(Axis::Row, row)?;
        let (cells, regions) = self.copy_line(Axis::Row, row)?;
        let index = self.rows.len();
        let height = self.rows[row].height;
        self.insert_line(Axis::Row, index, height, cells, &regions)?;
        log::debug!("duplicated row {row} as row {index}");
        Ok(index)
    }

    /// Remove row `index`. Remaining heights are unchanged; the table shrinks by the
    /// removed height.
    pub fn remove_row(&mut self, index: usize) -> Result<(), StructuralError> {
        self.check_index(Axis::Row, index)?;
        let height = self.remove_line(Axis::Row, index);
        log::debug!("removed row {index} ({height} EMU)");
        Ok(())
    }

    /// Insert an empty column after `index`, as wide as column `index`. The table grows
    /// by that width.
    pub fn insert_column_after(&mut self, index: usize) -> Result<usize, StructuralError> {
        self.check_index(Axis::Column, index)?;
        let width = self.columns[index].width;
        let cells = vec![Cell::new(); self.rows.len()];
        self.insert_line(Axis::Column, index + 1, width, cells, &[])?;
        log::debug!("inserted column {} ({width} EMU)", index + 1);
        Ok(index + 1)
    }

    /// Deep-copy column `col` and append it to the end of the table.
    ///
    /// Widths follow [`crate::TableSettings::column_width_policy`].
    pub fn duplicate_column(&mut self, col: usize) -> Result<usize, StructuralError> {
        self.check_index(Axis::Column, col)?;
        let (cells, regions) = self.copy_line(Axis::Column, col)?;
        let index = self.columns.len();
        let width = self.columns[col].width;
        let table_width = self.frame.width;
        self.insert_line(Axis::Column, index, width, cells, &regions)?;

        if self.settings.column_width_policy == ColumnWidthPolicy::Redistribute {
            let mut widths: Vec<i64> = self.columns.iter().map(|c| c.width).collect();
            rescale(&mut widths, table_width);
            for (column, w) in self.columns.iter_mut().zip(widths) {
                column.width = w;
            }
            self.frame.width = table_width;
        }
        log::debug!(
            "duplicated column {col} as column {index} ({:?})",
            self.settings.column_width_policy
        );
        Ok(index)
    }

    /// Remove column `index` from every row. Remaining widths are unchanged; the table
    /// shrinks by the removed width.
    pub fn remove_column(&mut self, index: usize) -> Result<(), StructuralError> {
        self.check_index(Axis::Column, index)?;
        let width = self.remove_line(Axis::Column, index);
        log::debug!("removed column {index} ({width} EMU)");
        Ok(())
    }

    /// Cells for a copy of line `index` plus the spans it keeps, placed on a new line at
    /// the end of `axis`.
    fn copy_line(
        &self,
        axis: Axis,
        index: usize,
    ) -> Result<(Vec<Cell>, Vec<GridRect>), StructuralError> {
        let cross = axis.cross();
        let target = self.axis_len(axis);
        let mut cells = Vec::with_capacity(self.axis_len(cross));
        let mut regions = Vec::new();
        for offset in 0..self.axis_len(cross) {
            let rect = self.region_of(axis.pos(index, offset))?;
            let (seg_start, seg_end) = (rect.start.along(cross), rect.end.along(cross));
            if offset != seg_start {
                cells.push(Cell::new());
                continue;
            }
            let anchor = self.raw_cell(rect.start);
            let cell = if rect.start.along(axis) == index {
                Cell {
                    merge: Default::default(),
                    ..anchor.clone()
                }
            } else {
                anchor.format_template()
            };
            cells.push(cell);
            if seg_end > seg_start {
                regions.push(GridRect::new(
                    axis.pos(target, seg_start),
                    axis.pos(target, seg_end),
                ));
            }
        }
        Ok((cells, regions))
    }

    /// Insert a line of `cells` at `index` along `axis`, growing crossing spans and adding
    /// `extra` regions (already expressed in post-insert coordinates).
    ///
    /// Fails without touching the table when the frame cannot grow by `size`.
    fn insert_line(
        &mut self,
        axis: Axis,
        index: usize,
        size: i64,
        cells: Vec<Cell>,
        extra: &[GridRect],
    ) -> Result<(), StructuralError> {
        let frame = self
            .frame_size(axis)
            .checked_add(size)
            .ok_or(StructuralError::InvalidSize { value: size })?;
        let mut regions = regions_after_insert(&self.regions(), axis, index);
        regions.extend_from_slice(extra);
        match axis {
            Axis::Row => self.rows.insert(index, Row { height: size, cells }),
            Axis::Column => {
                self.columns.insert(index, Column { width: size });
                for (row, cell) in self.rows.iter_mut().zip(cells) {
                    row.cells.insert(index, cell);
                }
            }
        }
        *self.frame_size_mut(axis) = frame;
        self.apply_regions(&regions);
        Ok(())
    }

    /// Remove line `index` along `axis`, returning its size.
    ///
    /// A surviving region whose anchor sat on the removed line re-anchors on the next line,
    /// taking the anchor's content with it.
    pub(crate) fn remove_line(&mut self, axis: Axis, index: usize) -> i64 {
        let regions = self.regions();
        for rect in &regions {
            if rect.start.along(axis) == index && rect.len_along(axis) > 1 {
                let next = axis.pos(index + 1, rect.start.along(axis.cross()));
                let anchor = std::mem::take(self.raw_cell_mut(rect.start));
                *self.raw_cell_mut(next) = anchor;
            }
        }
        let regions = regions_after_remove(&regions, axis, index);
        let size = match axis {
            Axis::Row => self.rows.remove(index).height,
            Axis::Column => {
                for row in &mut self.rows {
                    row.cells.remove(index);
                }
                self.columns.remove(index).width
            }
        };
        *self.frame_size_mut(axis) -= size;
        self.apply_regions(&regions);
        size
    }
}
