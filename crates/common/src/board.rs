use crate::catalog::SymbolKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Value record occupying one grid cell: the pooled instance id of the symbol
/// standing there plus its type. The renderable itself lives in a side table
/// keyed by `id`; the grid never owns visuals.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolCell {
    pub id: usize,
    pub kind: SymbolKind,
}

/// Cell a staged symbol was released over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropInfo {
    pub row: usize,
    pub column: usize,
    pub index: usize,
}

/// The `columns x rows` symbol matrix, stored column-major (`grid[col][row]`)
/// with row 0 at the top. The canonical linear index of a cell is
/// `row * columns + col`. Outside of cascade transitions every column holds
/// exactly `rows` records.
#[derive(Clone, Debug, PartialEq)]
pub struct SymbolGrid {
    columns: usize,
    rows: usize,
    cells: Vec<Vec<SymbolCell>>,
}

impl SymbolGrid {
    pub fn new(columns: usize, rows: usize) -> Self {
        SymbolGrid {
            columns,
            rows,
            cells: vec![Vec::with_capacity(rows); columns],
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn index_of(&self, column: usize, row: usize) -> usize {
        row * self.columns + column
    }

    /// `(column, row)` of a linear index.
    pub fn position_of(&self, index: usize) -> (usize, usize) {
        (index % self.columns, index / self.columns)
    }

    pub fn cell(&self, column: usize, row: usize) -> Option<SymbolCell> {
        self.cells.get(column).and_then(|col| col.get(row)).copied()
    }

    pub fn kind_at(&self, column: usize, row: usize) -> Option<SymbolKind> {
        self.cell(column, row).map(|cell| cell.kind)
    }

    pub fn column(&self, column: usize) -> &[SymbolCell] {
        &self.cells[column]
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|col| col.len() == self.rows)
    }

    pub fn iter_cells(&self) -> impl Iterator<Item = (usize, usize, SymbolCell)> + '_ {
        self.cells.iter().enumerate().flat_map(|(column, cells)| {
            cells
                .iter()
                .enumerate()
                .map(move |(row, &cell)| (column, row, cell))
        })
    }

    /// Drains every record, for session reset.
    pub fn clear(&mut self) -> Vec<SymbolCell> {
        self.cells.iter_mut().flat_map(std::mem::take).collect()
    }

    /// Appends to the bottom of a column during fill.
    pub fn push(&mut self, column: usize, cell: SymbolCell) {
        self.cells[column].push(cell);
    }

    /// Swaps a record in, returning the displaced occupant.
    pub fn replace(&mut self, column: usize, row: usize, cell: SymbolCell) -> Option<SymbolCell> {
        let slot = self.cells.get_mut(column)?.get_mut(row)?;
        Some(std::mem::replace(slot, cell))
    }

    /// Groups linear indices by column as ascending column-relative row
    /// offsets. The ascending order is what lets `remove_rows` account for the
    /// index shift of earlier removals in the same column.
    pub fn rows_by_column(&self, indices: &[usize]) -> BTreeMap<usize, Vec<usize>> {
        let mut by_column: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for &index in indices {
            let (column, row) = self.position_of(index);
            by_column.entry(column).or_default().push(row);
        }
        for rows in by_column.values_mut() {
            rows.sort_unstable();
        }
        by_column
    }

    /// Removes the given pre-removal row offsets from a column. `rows` must be
    /// ascending; each removal compensates for the shift of the previous ones.
    pub fn remove_rows(&mut self, column: usize, rows: &[usize]) -> Vec<SymbolCell> {
        let cells = &mut self.cells[column];
        let mut removed = Vec::with_capacity(rows.len());
        for (shift, &row) in rows.iter().enumerate() {
            let at = row - shift;
            if at < cells.len() {
                removed.push(cells.remove(at));
            }
        }
        removed
    }

    /// Inserts records above the visible area, first record topmost.
    pub fn prepend(&mut self, column: usize, cells: Vec<SymbolCell>) {
        self.cells[column].splice(0..0, cells);
    }

    /// Trims a column back to `rows` records, returning the excess tail.
    pub fn trim_excess(&mut self, column: usize) -> Vec<SymbolCell> {
        let cells = &mut self.cells[column];
        if cells.len() > self.rows {
            cells.split_off(self.rows)
        } else {
            Vec::new()
        }
    }

    pub fn shortfall(&self, column: usize) -> usize {
        self.rows.saturating_sub(self.cells[column].len())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn cell(id: usize) -> SymbolCell {
        SymbolCell {
            id,
            kind: SymbolKind(id % 3),
        }
    }

    fn filled(columns: usize, rows: usize) -> SymbolGrid {
        let mut grid = SymbolGrid::new(columns, rows);
        for column in 0..columns {
            for row in 0..rows {
                grid.push(column, cell(grid.index_of(column, row)));
            }
        }
        grid
    }

    #[test]
    fn test_linear_index_roundtrip() {
        let grid = SymbolGrid::new(5, 4);
        assert_eq!(grid.index_of(0, 0), 0);
        assert_eq!(grid.index_of(2, 3), 17);
        assert_eq!(grid.position_of(17), (2, 3));
        assert_eq!(grid.position_of(4), (4, 0));
    }

    #[test]
    fn test_fill_and_replace() {
        let mut grid = filled(3, 3);
        assert!(grid.is_full());
        let displaced = grid.replace(1, 2, cell(99)).unwrap();
        assert_eq!(displaced.id, grid.index_of(1, 2));
        assert_eq!(grid.cell(1, 2).unwrap().id, 99);
        assert_eq!(grid.replace(3, 0, cell(1)), None);
    }

    #[test]
    fn test_rows_by_column_sorts_offsets() {
        let grid = filled(5, 5);
        // (2,4), (2,1), (0,3) as linear indices, deliberately unsorted
        let by_column = grid.rows_by_column(&[22, 7, 15]);
        assert_eq!(by_column[&2], vec![1, 4]);
        assert_eq!(by_column[&0], vec![3]);
    }

    #[test]
    fn test_remove_rows_accounts_for_shift() {
        let mut grid = filled(1, 5);
        let before: Vec<usize> = grid.column(0).iter().map(|c| c.id).collect();
        // non-contiguous removals: rows 1 and 3 of the original column
        let removed = grid.remove_rows(0, &[1, 3]);
        assert_eq!(
            removed.iter().map(|c| c.id).collect::<Vec<_>>(),
            vec![before[1], before[3]]
        );
        assert_eq!(
            grid.column(0).iter().map(|c| c.id).collect::<Vec<_>>(),
            vec![before[0], before[2], before[4]]
        );
    }

    #[test]
    fn test_prepend_trim_and_shortfall() {
        let mut grid = filled(1, 4);
        grid.remove_rows(0, &[0, 1, 2]);
        assert_eq!(grid.shortfall(0), 3);
        grid.prepend(0, vec![cell(10), cell(11)]);
        assert_eq!(grid.column(0)[0].id, 10);
        assert_eq!(grid.shortfall(0), 1);

        grid.prepend(0, vec![cell(12), cell(13)]);
        let excess = grid.trim_excess(0);
        assert_eq!(excess.len(), 1);
        assert_eq!(grid.column(0).len(), 4);
        assert!(grid.is_full());
    }

    #[test]
    fn test_clear_returns_everything() {
        let mut grid = filled(3, 3);
        let drained = grid.clear();
        assert_eq!(drained.len(), 9);
        assert!(!grid.is_full());
        assert_eq!(grid.column(1).len(), 0);
    }
}
