use crate::{Axis, StructuralError};

use super::Table;

/// Scale `sizes` so they sum to exactly `new_total`, keeping their proportions.
///
/// Each size is rounded to the nearest EMU and the rounding residue goes to the last
/// item. When the current sizes sum to zero, `new_total` is split evenly.
pub(crate) fn rescale(sizes: &mut [i64], new_total: i64) {
    let Some(last) = sizes.len().checked_sub(1) else {
        return;
    };
    let old_total: i64 = sizes.iter().sum();
    if old_total == 0 {
        let share = new_total / sizes.len() as i64;
        sizes.iter_mut().for_each(|s| *s = share);
    } else {
        for size in sizes.iter_mut() {
            let scaled = (*size as i128 * new_total as i128 + old_total as i128 / 2)
                / old_total as i128;
            *size = scaled as i64;
        }
    }
    let assigned: i64 = sizes[..last].iter().sum();
    sizes[last] = new_total - assigned;
}

pub(crate) fn check_size(value: i64) -> Result<(), StructuralError> {
    if value < 0 {
        return Err(StructuralError::InvalidSize { value });
    }
    Ok(())
}

/// Sum of `sizes`, or `InvalidSize` naming the size that overflows the total.
pub(crate) fn checked_total(sizes: &[i64]) -> Result<i64, StructuralError> {
    sizes.iter().try_fold(0i64, |total, &value| {
        total
            .checked_add(value)
            .ok_or(StructuralError::InvalidSize { value })
    })
}

impl Table {
    /// Set the table height, rescaling every row proportionally.
    pub fn set_table_height(&mut self, height: i64) -> Result<(), StructuralError> {
        check_size(height)?;
        if self.rows.is_empty() {
            return Err(StructuralError::EmptyTableMutation);
        }
        let mut heights: Vec<i64> = self.rows.iter().map(|r| r.height).collect();
        rescale(&mut heights, height);
        for (row, h) in self.rows.iter_mut().zip(heights) {
            row.height = h;
        }
        log::debug!("table height {} -> {height}", self.frame.height);
        self.frame.height = height;
        Ok(())
    }

    /// Set the table width, rescaling every column proportionally.
    pub fn set_table_width(&mut self, width: i64) -> Result<(), StructuralError> {
        check_size(width)?;
        if self.columns.is_empty() {
            return Err(StructuralError::EmptyTableMutation);
        }
        let mut widths: Vec<i64> = self.columns.iter().map(|c| c.width).collect();
        rescale(&mut widths, width);
        for (column, w) in self.columns.iter_mut().zip(widths) {
            column.width = w;
        }
        log::debug!("table width {} -> {width}", self.frame.width);
        self.frame.width = width;
        Ok(())
    }

    /// Set one row's height; the table grows or shrinks by the difference while other
    /// rows keep their heights.
    pub fn set_row_height(&mut self, row: usize, height: i64) -> Result<(), StructuralError> {
        self.check_index(Axis::Row, row)?;
        check_size(height)?;
        let frame = (self.frame.height - self.rows[row].height)
            .checked_add(height)
            .ok_or(StructuralError::InvalidSize { value: height })?;
        self.rows[row].height = height;
        self.frame.height = frame;
        Ok(())
    }

    /// Set one column's width; the table grows or shrinks by the difference while other
    /// columns keep their widths.
    pub fn set_column_width(&mut self, col: usize, width: i64) -> Result<(), StructuralError> {
        self.check_index(Axis::Column, col)?;
        check_size(width)?;
        let frame = (self.frame.width - self.columns[col].width)
            .checked_add(width)
            .ok_or(StructuralError::InvalidSize { value: width })?;
        self.columns[col].width = width;
        self.frame.width = frame;
        Ok(())
    }

    pub(crate) fn line_size(&self, axis: Axis, index: usize) -> i64 {
        match axis {
            Axis::Row => self.rows[index].height,
            Axis::Column => self.columns[index].width,
        }
    }

    pub(crate) fn line_size_mut(&mut self, axis: Axis, index: usize) -> &mut i64 {
        match axis {
            Axis::Row => &mut self.rows[index].height,
            Axis::Column => &mut self.columns[index].width,
        }
    }

    pub(crate) fn frame_size(&self, axis: Axis) -> i64 {
        match axis {
            Axis::Row => self.frame.height,
            Axis::Column => self.frame.width,
        }
    }

    pub(crate) fn frame_size_mut(&mut self, axis: Axis) -> &mut i64 {
        match axis {
            Axis::Row => &mut self.frame.height,
            Axis::Column => &mut self.frame.width,
        }
    }
}
