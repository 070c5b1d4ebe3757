use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::cells::CellType;
use crate::grid::Grid;
use crate::pathing::{scan_neighbours, Expansion, SearchStrategy, SolverKind, SolverMetrics, Trace};

/// Min-heap keyed by cumulative cell weight. Equal distances pop the lower cell index first.
#[derive(Debug, Clone, Default)]
pub struct Dijkstra {
    frontier: BinaryHeap<Reverse<(u32, usize)>>,
}

impl Dijkstra {
    pub fn new() -> Dijkstra {
        Dijkstra::default()
    }

    fn seed(&mut self, distance: u32, index: usize) {
        self.frontier.clear();
        self.frontier.push(Reverse((distance, index)));
    }
}

impl SearchStrategy for Dijkstra {
    const KIND: SolverKind = SolverKind::Dijkstra;

    fn restart(&mut self, start: usize) {
        self.seed(0, start);
    }

    fn expand(&mut self, grid: &mut Grid, metrics: &mut SolverMetrics) -> Expansion {
        let current = match self.frontier.pop() {
            Some(Reverse((_, index))) => index,
            None => return Expansion::Exhausted,
        };
        metrics.processed_cells += 1;

        let base = grid.distance_at(current);
        let frontier = &mut self.frontier;
        let found = scan_neighbours(grid, current, |grid, neighbour| {
            // First discovery fixes the distance, there is no decrease-key.
            let distance = base.saturating_add(u32::from(grid.weight_at(neighbour)));
            grid.mark(neighbour, CellType::Queued);
            grid.set_distance(neighbour, distance);
            frontier.push(Reverse((distance, neighbour)));
        });
        grid.mark(current, CellType::Processed);

        if found {
            self.seed(base, current);
            Expansion::FoundFinish
        } else if self.frontier.is_empty() {
            Expansion::Exhausted
        } else {
            Expansion::Continue
        }
    }

    fn trace(&mut self, grid: &mut Grid, metrics: &mut SolverMetrics) -> Trace {
        let current = match self.frontier.peek() {
            Some(&Reverse((_, index))) => index,
            None => return Trace::Complete,
        };
        metrics.add_path_cell(grid.weight_at(current));

        let current_distance = grid.distance_at(current);
        if current_distance == 0 {
            return Trace::Complete;
        }

        let closest = grid.neighbours(current)
            .into_iter()
            .min_by_key(|&n| grid.distance_at(n))
            .filter(|&n| grid.distance_at(n) < current_distance);

        match closest {
            Some(next) => {
                grid.mark(current, CellType::Path);
                self.seed(grid.distance_at(next), next);
                Trace::Continue
            }
            None => Trace::Complete,
        }
    }

    #[inline]
    fn frontier_len(&self) -> usize {
        self.frontier.len()
    }
}


#[cfg(test)]
mod tests {

    use itertools::Itertools;

    use super::*;
    use crate::cells::WeightChange;
    use crate::pathing::{IncrementalSolver, SearchOutcome, Solver, Stepper};
    use crate::solvers::test_support::{open_grid, run_to_completion, type_count};

    fn solver(grid: &Grid) -> IncrementalSolver<Dijkstra> {
        IncrementalSolver::new(Dijkstra::new(), grid)
    }

    fn path_cells(g: &Grid) -> Vec<usize> {
        g.cells().iter().positions(|c| c.cell_type() == CellType::Path).collect_vec()
    }

    #[test]
    fn relaxation_adds_the_neighbour_weight() {
        let mut g = open_grid(3, 3);
        g.adjust_weight_at(1, WeightChange::Increase);
        g.adjust_weight_at(1, WeightChange::Increase);
        let mut s = solver(&g);
        s.step(&mut g);

        assert_eq!(g.cell(1).unwrap().distance(), 3);
        assert_eq!(g.cell(3).unwrap().distance(), 1);
        assert_eq!(g.cell(4).unwrap().distance(), 1);
        assert_eq!(g.cell(0).unwrap().cell_type(), CellType::Start);
        assert_eq!(s.strategy().frontier_len(), 3);
    }

    #[test]
    fn equal_distances_pop_the_lower_index_first() {
        let mut g = open_grid(3, 3);
        let mut s = solver(&g);
        s.step(&mut g);
        s.step(&mut g);
        // 1, 3 and 4 all sit at distance 1; 1 goes first
        assert_eq!(g.cell(1).unwrap().cell_type(), CellType::Processed);
        assert_eq!(g.cell(3).unwrap().cell_type(), CellType::Queued);
        assert_eq!(g.cell(4).unwrap().cell_type(), CellType::Queued);
    }

    #[test]
    fn heavy_cells_are_avoided() {
        // finish in the top right corner, a weight 9 cell between it and the start
        let mut g = open_grid(3, 3);
        g.set_cell_type_at(2, CellType::Finish);
        for _ in 0..8 {
            g.adjust_weight_at(1, WeightChange::Increase);
        }
        let mut s = solver(&g);
        run_to_completion(&mut s, &mut g);

        assert_eq!(s.outcome(), SearchOutcome::Found);
        assert_eq!(path_cells(&g), vec![4]);
        // the start is counted, the finish is not
        assert_eq!(s.metrics().path_length, 2);
        assert_eq!(s.metrics().path_weight, 2);
    }

    #[test]
    fn open_grid_path_follows_the_diagonal() {
        let mut g = open_grid(5, 5);
        let mut s = solver(&g);
        run_to_completion(&mut s, &mut g);

        assert_eq!(s.metrics().path_length, 4);
        assert_eq!(s.metrics().path_weight, 4);
        assert_eq!(path_cells(&g), vec![6, 12, 18]);
    }

    #[test]
    fn unreachable_finish_leaves_no_path() {
        let mut g = open_grid(4, 4);
        for &wall in &[10, 11, 14] {
            g.set_cell_type_at(wall, CellType::Wall);
        }
        let mut s = solver(&g);
        run_to_completion(&mut s, &mut g);

        assert_eq!(s.outcome(), SearchOutcome::Unreachable);
        assert_eq!(type_count(&g, CellType::Path), 0);
        assert_eq!(s.metrics().processed_cells, 12);
        assert_eq!(s.metrics().path_length, 0);
    }
}
