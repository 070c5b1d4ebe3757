use rand::seq::SliceRandom;
use rand_xorshift::XorShiftRng;
use std::collections::VecDeque;

use crate::cells::CellType;
use crate::grid::{Grid, NeighbourSmallVec};
use crate::pathing::{scan_neighbours, Expansion, SearchStrategy, SolverKind, SolverMetrics, Trace};

/// Breadth first search over unit step costs, FIFO frontier.
///
/// Tracing walks to any neighbour strictly closer to the start, picked at random, so repeated
/// runs show the different shortest paths a grid may have.
#[derive(Debug, Clone)]
pub struct BreadthFirst {
    frontier: VecDeque<usize>,
    rng: XorShiftRng,
}

impl BreadthFirst {
    pub fn new(rng: XorShiftRng) -> BreadthFirst {
        BreadthFirst {
            frontier: VecDeque::new(),
            rng,
        }
    }
}

impl SearchStrategy for BreadthFirst {
    const KIND: SolverKind = SolverKind::BreadthFirst;

    fn restart(&mut self, start: usize) {
        self.frontier.clear();
        self.frontier.push_back(start);
    }

    fn expand(&mut self, grid: &mut Grid, metrics: &mut SolverMetrics) -> Expansion {
        let current = match self.frontier.pop_front() {
            Some(index) => index,
            None => return Expansion::Exhausted,
        };
        metrics.processed_cells += 1;

        let next_distance = grid.distance_at(current).saturating_add(1);
        let frontier = &mut self.frontier;
        let found = scan_neighbours(grid, current, |grid, neighbour| {
            grid.mark(neighbour, CellType::Queued);
            grid.set_distance(neighbour, next_distance);
            frontier.push_back(neighbour);
        });
        grid.mark(current, CellType::Processed);

        if found {
            // Tracing starts from the cell that saw the finish.
            self.restart(current);
            Expansion::FoundFinish
        } else if self.frontier.is_empty() {
            Expansion::Exhausted
        } else {
            Expansion::Continue
        }
    }

    fn trace(&mut self, grid: &mut Grid, metrics: &mut SolverMetrics) -> Trace {
        let current = match self.frontier.front() {
            Some(&index) => index,
            None => return Trace::Complete,
        };
        metrics.add_path_cell(grid.weight_at(current));

        let current_distance = grid.distance_at(current);
        let closer = grid.neighbours(current)
            .into_iter()
            .filter(|&n| grid.distance_at(n) < current_distance)
            .collect::<NeighbourSmallVec>();

        match closer.choose(&mut self.rng) {
            Some(&next) => {
                grid.mark(current, CellType::Path);
                self.restart(next);
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
