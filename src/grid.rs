use std::collections::BTreeMap;

use crate::ObjectAccess;

/// Direction in which a navigation places the expanded children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Children go to the row below the source cell.
    Down,
    /// Children go to the column right of the source cell.
    Right,
}

impl Direction {
    /// First coordinate considered for children of the cell at `(row, column)`.
    ///
    /// Returns `None` if the coordinate would overflow.
    pub fn target(&self, row: usize, column: usize) -> Option<(usize, usize)> {
        match self {
            Direction::Down => Some((row.checked_add(1)?, column)),
            Direction::Right => Some((row, column.checked_add(1)?)),
        }
    }

    /// Axis along which several children of one navigation are spread.
    ///
    /// Always orthogonal to the direction: children placed below the source
    /// line up in a row, children placed to the right stack in a column.
    pub fn fan_out(&self) -> Axis {
        match self {
            Direction::Down => Axis::Columns,
            Direction::Right => Axis::Rows,
        }
    }
}

/// Axis along which [`Grid::put_from`] looks for a free cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Keep the column, step through increasing rows.
    Rows,
    /// Keep the row, step through increasing columns.
    Columns,
}

impl Axis {
    fn next(&self, row: usize, column: usize) -> Option<(usize, usize)> {
        match self {
            Axis::Rows => Some((row.checked_add(1)?, column)),
            Axis::Columns => Some((row, column.checked_add(1)?)),
        }
    }
}

/// Number of rows and columns needed to cover every occupied cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Extent {
    pub rows: usize,
    pub columns: usize,
}

/// Sparse table of cells, each holding at most one [`ObjectAccess`].
///
/// Only occupied cells are stored, keyed by `(row, column)`. Removing a cell
/// leaves a hole: the grid is never compacted, and cells expanded from a
/// removed cell stay where they are.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    cells: BTreeMap<(usize, usize), ObjectAccess>,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the accessor at `(row, column)`, or the empty accessor.
    pub fn object_at(&self, row: usize, column: usize) -> ObjectAccess {
        self.get(row, column).cloned().unwrap_or_default()
    }

    pub fn get(&self, row: usize, column: usize) -> Option<&ObjectAccess> {
        self.cells.get(&(row, column))
    }

    pub fn is_occupied(&self, row: usize, column: usize) -> bool {
        self.cells.contains_key(&(row, column))
    }

    /// Puts `access` at exactly `(row, column)`, returning the previous occupant.
    pub fn object_at_put(
        &mut self,
        row: usize,
        column: usize,
        access: ObjectAccess,
    ) -> Option<ObjectAccess> {
        self.cells.insert((row, column), access)
    }

    /// Puts `access` at the first free cell starting at `(row, column)` and
    /// stepping along `axis`.
    ///
    /// Returns the coordinate used, or `None` (leaving the grid untouched) if
    /// the axis runs out of coordinates.
    pub fn put_from(
        &mut self,
        row: usize,
        column: usize,
        axis: Axis,
        access: ObjectAccess,
    ) -> Option<(usize, usize)> {
        let mut at = (row, column);
        while self.cells.contains_key(&at) {
            at = axis.next(at.0, at.1)?;
        }
        self.cells.insert(at, access);
        Some(at)
    }

    /// Removes the accessor at `(row, column)`. Other cells are not touched.
    pub fn remove_object_at(&mut self, row: usize, column: usize) -> Option<ObjectAccess> {
        self.cells.remove(&(row, column))
    }

    /// Applies `mutator` to the accessor at `(row, column)` in place.
    ///
    /// Returns `false` if the cell is empty.
    pub fn update_object_at<F>(&mut self, row: usize, column: usize, mutator: F) -> bool
    where
        F: FnOnce(&mut ObjectAccess),
    {
        match self.cells.get_mut(&(row, column)) {
            Some(access) => {
                mutator(access);
                true
            }
            None => false,
        }
    }

    pub fn extent(&self) -> Extent {
        self.cells
            .keys()
            .fold(Extent::default(), |extent, &(row, column)| Extent {
                rows: extent.rows.max(row.saturating_add(1)),
                columns: extent.columns.max(column.saturating_add(1)),
            })
    }

    /// Occupied cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), &ObjectAccess)> {
        self.cells.iter().map(|(&at, access)| (at, access))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
