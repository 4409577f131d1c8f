//! Run detection over the symbol grid: the winning-run scan for a
//! hypothetical swap and the near-win scan feeding the hint overlay.

use crate::board::SymbolGrid;
use crate::catalog::SymbolKind;
use std::collections::{BTreeMap, BTreeSet};

/// Winning run produced by hypothetically placing `kind` at the swap cell.
///
/// Scans left/right along the row and up/down along the column, stopping at
/// the first mismatch or boundary (no wraparound). An axis qualifies when its
/// contiguous run reaches `min_win_count`; the result is the sorted,
/// de-duplicated union of the qualifying axes, empty when neither qualifies.
/// The grid itself is never touched: the swap cell reads as `kind` only
/// inside this scan.
pub fn find_run(
    grid: &SymbolGrid,
    column: usize,
    row: usize,
    kind: SymbolKind,
    min_win_count: usize,
) -> Vec<usize> {
    let kind_at = |c: usize, r: usize| -> Option<SymbolKind> {
        if c == column && r == row {
            Some(kind)
        } else {
            grid.kind_at(c, r)
        }
    };

    let mut horizontal = vec![grid.index_of(column, row)];
    for c in (0..column).rev() {
        if kind_at(c, row) != Some(kind) {
            break;
        }
        horizontal.push(grid.index_of(c, row));
    }
    for c in column + 1..grid.columns() {
        if kind_at(c, row) != Some(kind) {
            break;
        }
        horizontal.push(grid.index_of(c, row));
    }

    let mut vertical = vec![grid.index_of(column, row)];
    for r in (0..row).rev() {
        if kind_at(column, r) != Some(kind) {
            break;
        }
        vertical.push(grid.index_of(column, r));
    }
    for r in row + 1..grid.rows() {
        if kind_at(column, r) != Some(kind) {
            break;
        }
        vertical.push(grid.index_of(column, r));
    }

    let mut wins = BTreeSet::new();
    if horizontal.len() >= min_win_count {
        wins.extend(horizontal);
    }
    if vertical.len() >= min_win_count {
        wins.extend(vertical);
    }
    wins.into_iter().collect()
}

/// Near-win positions for each candidate kind over the current grid.
///
/// Every fixed window of `min_win_count` cells along each row and each column
/// is counted; a window holding exactly `min_win_count - 1` cells of the
/// candidate is one swap away from a run and contributes all of its indices.
/// Candidates are the current staging-strip kinds, not the whole catalog.
/// Hint data only; win determination never reads this.
pub fn find_possible_wins(
    grid: &SymbolGrid,
    candidates: &[SymbolKind],
    min_win_count: usize,
) -> BTreeMap<SymbolKind, BTreeSet<usize>> {
    let mut wins = BTreeMap::new();
    if min_win_count < 2 {
        return wins;
    }

    for kind in candidates.iter().copied().collect::<BTreeSet<_>>() {
        let mut indices = BTreeSet::new();

        if grid.columns() >= min_win_count {
            for row in 0..grid.rows() {
                for start in 0..=grid.columns() - min_win_count {
                    let window: Vec<usize> = (start..start + min_win_count)
                        .map(|column| grid.index_of(column, row))
                        .collect();
                    let matches = (start..start + min_win_count)
                        .filter(|&column| grid.kind_at(column, row) == Some(kind))
                        .count();
                    if matches == min_win_count - 1 {
                        indices.extend(window);
                    }
                }
            }
        }

        if grid.rows() >= min_win_count {
            for column in 0..grid.columns() {
                for start in 0..=grid.rows() - min_win_count {
                    let window: Vec<usize> = (start..start + min_win_count)
                        .map(|row| grid.index_of(column, row))
                        .collect();
                    let matches = (start..start + min_win_count)
                        .filter(|&row| grid.kind_at(column, row) == Some(kind))
                        .count();
                    if matches == min_win_count - 1 {
                        indices.extend(window);
                    }
                }
            }
        }

        if !indices.is_empty() {
            wins.insert(kind, indices);
        }
    }

    wins
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::board::SymbolCell;

    const B: SymbolKind = SymbolKind(0);
    const G: SymbolKind = SymbolKind(1);
    const P: SymbolKind = SymbolKind(2);

    /// Builds a grid from rows of kinds, assigning instance ids in reading
    /// order so tests can use literal layouts.
    fn from_rows(rows: &[&[SymbolKind]]) -> SymbolGrid {
        let columns = rows[0].len();
        let mut grid = SymbolGrid::new(columns, rows.len());
        for (row, kinds) in rows.iter().enumerate() {
            for (column, &kind) in kinds.iter().enumerate() {
                let id = grid.index_of(column, row);
                grid.push(column, SymbolCell { id, kind });
            }
        }
        grid
    }

    #[test]
    fn test_horizontal_run_from_swap_point() {
        // row 2 has B at columns 1 and 3; dropping B at (2,2) closes the run
        let grid = from_rows(&[
            &[G, G, P, G, P],
            &[P, P, G, P, G],
            &[G, B, P, B, G],
            &[P, G, G, P, P],
            &[G, P, P, G, G],
        ]);
        let run = find_run(&grid, 2, 2, B, 3);
        assert_eq!(run, vec![11, 12, 13]);
    }

    #[test]
    fn test_no_run_leaves_empty() {
        let grid = from_rows(&[
            &[G, G, P],
            &[P, B, G],
            &[G, P, B],
        ]);
        assert!(find_run(&grid, 1, 1, B, 3).is_empty());
    }

    #[test]
    fn test_run_stops_at_mismatch_and_boundary() {
        // four Bs on the left of row 0, a gap, then more Bs: no wraparound,
        // the scan must stop at the gap
        let grid = from_rows(&[
            &[B, B, P, B, B],
            &[G, P, G, P, G],
            &[P, G, P, G, P],
        ]);
        let run = find_run(&grid, 1, 0, B, 3);
        assert!(run.is_empty());
        let run = find_run(&grid, 2, 0, B, 3);
        assert_eq!(run, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_both_axes_union_deduplicated() {
        // dropping B at (1,1) completes the middle row and the middle column
        let grid = from_rows(&[
            &[G, B, P],
            &[B, P, B],
            &[P, B, G],
        ]);
        let run = find_run(&grid, 1, 1, B, 3);
        assert_eq!(run, vec![1, 3, 4, 5, 7]);
    }

    #[test]
    fn test_vertical_only_run() {
        let grid = from_rows(&[
            &[B, G, P],
            &[B, P, G],
            &[G, G, P],
        ]);
        let run = find_run(&grid, 0, 2, B, 3);
        assert_eq!(run, vec![0, 3, 6]);
    }

    #[test]
    fn test_possible_wins_report_only_near_misses() {
        // row 0 opens with a two-of-three window for B; row 2 ends in a full
        // B run whose own window must not be reported
        let grid = from_rows(&[
            &[B, B, G, P, P],
            &[G, P, P, G, G],
            &[P, G, B, B, B],
        ]);
        let wins = find_possible_wins(&grid, &[B], 3);
        let b_wins = wins.get(&B).unwrap();
        for index in [0, 1, 2, 11, 12, 13] {
            assert!(b_wins.contains(&index), "missing index {index}");
        }
        // the [12, 13, 14] window holds three Bs, so index 14 never appears
        assert!(!b_wins.contains(&14));
        assert!(!b_wins.contains(&10));
    }

    #[test]
    fn test_possible_wins_scoped_to_candidates() {
        let grid = from_rows(&[
            &[B, B, G],
            &[P, P, G],
            &[G, G, B],
        ]);
        let wins = find_possible_wins(&grid, &[P], 3);
        assert!(!wins.contains_key(&B));
        assert!(wins.contains_key(&P));
    }

    #[test]
    fn test_possible_wins_empty_for_no_candidates() {
        let grid = from_rows(&[
            &[B, B, G],
            &[P, P, G],
            &[G, G, B],
        ]);
        assert!(find_possible_wins(&grid, &[], 3).is_empty());
    }
}
