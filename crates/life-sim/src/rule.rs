//! Conway's B3/S23 neighbor rule.

use crate::grid::Grid;

const NEIGHBOR_OFFSETS: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Next state of a single cell given its live-neighbor count.
#[inline]
pub fn next_state(alive: bool, live_neighbors: u8) -> bool {
    matches!((alive, live_neighbors), (true, 2..=3) | (false, 3))
}

/// Live cells among the 8 toroidally-wrapped neighbors of `(x, y)`.
pub fn live_neighbors(grid: &Grid, x: u32, y: u32) -> u8 {
    NEIGHBOR_OFFSETS
        .iter()
        .filter(|(dx, dy)| grid.get_wrapped(x as i64 + dx, y as i64 + dy))
        .count() as u8
}

/// Writes the next generation of `current` into `next`.
///
/// `current` is only read, so every cell sees the pre-step grid.
pub fn step_into(current: &Grid, next: &mut Grid) {
    debug_assert_eq!(current.size(), next.size());
    let size = current.size();
    for y in 0..size.height {
        for x in 0..size.width {
            let n = live_neighbors(current, x, y);
            next.set(x, y, next_state(current.get(x, y), n));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridSize;

    #[test]
    fn survival_and_birth_table() {
        for n in 0..=8u8 {
            assert_eq!(next_state(true, n), n == 2 || n == 3, "alive with {n}");
            assert_eq!(next_state(false, n), n == 3, "dead with {n}");
        }
    }

    #[test]
    fn neighbors_wrap_across_corners() {
        let mut g = Grid::new(GridSize::new(5, 5));
        g.set(4, 4, true);
        g.set(4, 0, true);
        g.set(0, 4, true);
        assert_eq!(live_neighbors(&g, 0, 0), 3);
    }

    #[test]
    fn self_is_not_a_neighbor() {
        let mut g = Grid::new(GridSize::new(3, 3));
        g.set(1, 1, true);
        assert_eq!(live_neighbors(&g, 1, 1), 0);
    }
}
