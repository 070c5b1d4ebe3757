use rand::seq::SliceRandom;
use rand_xorshift::XorShiftRng;

use crate::cells::CellType;
use crate::grid::{Grid, NeighbourSmallVec};
use crate::pathing::{scan_neighbours, Expansion, SearchStrategy, SolverKind, SolverMetrics, Trace};

/// Randomised depth first search.
///
/// The stack holds the live branch interleaved with queued siblings. Cells on the live branch are
/// marked Unfinished, so once the finish is seen the path is whatever Unfinished cells are still
/// on the stack. The route found is rarely the shortest.
#[derive(Debug, Clone)]
pub struct DepthFirst {
    stack: Vec<usize>,
    rng: XorShiftRng,
}

impl DepthFirst {
    pub fn new(rng: XorShiftRng) -> DepthFirst {
        DepthFirst { stack: vec![], rng }
    }
}

impl SearchStrategy for DepthFirst {
    const KIND: SolverKind = SolverKind::DepthFirst;

    fn restart(&mut self, start: usize) {
        self.stack.clear();
        self.stack.push(start);
    }

    fn expand(&mut self, grid: &mut Grid, metrics: &mut SolverMetrics) -> Expansion {
        let current = match self.stack.last() {
            Some(&index) => index,
            None => return Expansion::Exhausted,
        };
        grid.mark(current, CellType::Unfinished);

        let mut open = NeighbourSmallVec::new();
        if scan_neighbours(grid, current, |_, neighbour| open.push(neighbour)) {
            // The cell that saw the finish stays on top, it is the first path cell traced.
            return Expansion::FoundFinish;
        }

        if open.is_empty() {
            metrics.processed_cells += 1;
            grid.mark(current, CellType::Processed);
            self.stack.pop();
            return if self.stack.is_empty() {
                Expansion::Exhausted
            } else {
                Expansion::Continue
            };
        }

        open.shuffle(&mut self.rng);
        for neighbour in open {
            grid.mark(neighbour, CellType::Queued);
            self.stack.push(neighbour);
        }
        Expansion::Continue
    }

    fn trace(&mut self, grid: &mut Grid, metrics: &mut SolverMetrics) -> Trace {
        // The start stays at the bottom of the stack.
        if self.stack.len() <= 1 {
            return Trace::Complete;
        }

        if let Some(index) = self.stack.pop() {
            if grid.type_at(index) == CellType::Unfinished {
                grid.mark(index, CellType::Path);
                metrics.add_path_cell(grid.weight_at(index));
            }
        }

        if self.stack.len() <= 1 {
            Trace::Complete
        } else {
            Trace::Continue
        }
    }

    #[inline]
    fn frontier_len(&self) -> usize {
        self.stack.len()
    }
}
