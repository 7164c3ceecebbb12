// step.rs - The Rule 90 update applied row by row

use crate::grid::GridState;

/// Value of `(x, y)` in the next generation.
///
/// Constant cells stay populated. Every other cell becomes the XOR of its two
/// upper diagonal neighbours, `(x-1, y-1)` and `(x+1, y-1)`; neighbours outside
/// the grid count as empty. The cell itself and the row below are never read.
pub fn next_value(grid: &GridState, x: usize, y: usize) -> bool {
    if grid.is_constant(x, y) {
        return true;
    }
    let (x, y) = (x as isize, y as isize);
    grid.get(x - 1, y - 1) != grid.get(x + 1, y - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(grid: &GridState, y: usize) -> Vec<bool> {
        (0..grid.width()).map(|x| grid.get(x as isize, y as isize)).collect()
    }

    #[test]
    fn empty_grid_stays_empty() {
        let mut grid = GridState::new(3, 3).unwrap();
        assert!(!next_value(&grid, 1, 1));

        let mut changes = 0;
        grid.advance(|_, _, _| changes += 1);
        assert_eq!(changes, 0);
        assert_eq!(grid.snapshot().population(), 0);
    }

    #[test]
    fn top_row_has_no_upper_neighbours() {
        let mut grid = GridState::new(3, 3).unwrap();
        grid.toggle_constant(1, 1);
        for x in 0..3 {
            assert_eq!(next_value(&grid, x, 0), false);
        }
    }

    #[test]
    fn edge_cell_follows_its_single_in_bounds_diagonal() {
        let mut grid = GridState::new(3, 3).unwrap();
        grid.toggle_constant(1, 0);
        // (0,1) sees (-1,0) off and (1,0) on; (2,1) sees (1,0) on and (3,0) off.
        assert!(next_value(&grid, 0, 1));
        assert!(next_value(&grid, 2, 1));
        // (1,1) sees (0,0) and (2,0), both off.
        assert!(!next_value(&grid, 1, 1));
    }

    #[test]
    fn constant_cells_always_populated() {
        let mut grid = GridState::new(3, 3).unwrap();
        grid.toggle_constant(2, 2);
        // Both diagonals of (2,2) are empty, so the rule alone would clear it.
        assert!(!grid.get(1, 1) && !grid.get(3, 1));
        assert!(next_value(&grid, 2, 2));

        for _ in 0..4 {
            grid.advance(|_, _, _| {});
            assert!(grid.get(2, 2));
        }
    }

    #[test]
    fn evaluation_is_pure() {
        let mut grid = GridState::new(5, 5).unwrap();
        grid.toggle_constant(1, 1);
        grid.toggle_constant(3, 1);
        let before = grid.snapshot();

        let first = next_value(&grid, 2, 2);
        let second = next_value(&grid, 2, 2);
        assert_eq!(first, second);
        assert!(!first);
        assert_eq!(grid.snapshot(), before);
    }

    #[test]
    fn single_seed_unrolls_rule_90() {
        let mut grid = GridState::new(5, 3).unwrap();
        grid.toggle_constant(2, 0);

        grid.advance(|_, _, _| {});
        assert_eq!(row(&grid, 0), [false, false, true, false, false]);
        assert_eq!(row(&grid, 1), [false, true, false, true, false]);
        assert_eq!(row(&grid, 2), [false; 5]);

        grid.advance(|_, _, _| {});
        assert_eq!(row(&grid, 1), [false, true, false, true, false]);
        assert_eq!(row(&grid, 2), [true, false, false, false, true]);
    }

    #[test]
    fn advance_reports_only_changed_cells() {
        let mut grid = GridState::new(5, 3).unwrap();
        grid.toggle_constant(2, 0);

        let mut changes = Vec::new();
        grid.advance(|x, y, value| changes.push((x, y, value)));
        assert_eq!(changes, vec![(1, 1, true), (3, 1, true)]);

        changes.clear();
        grid.advance(|x, y, value| changes.push((x, y, value)));
        assert_eq!(changes, vec![(0, 2, true), (4, 2, true)]);
    }
}
