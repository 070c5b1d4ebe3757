use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::cells::CellType;
use crate::grid::Grid;
use crate::pathing::{scan_neighbours, Expansion, SearchStrategy, SolverKind, SolverMetrics, Trace};

/// Scale applied to the straight line distance before the cell weight.
const HEURISTIC_SCALE: f32 = 10.0;

/// Frontier entry ordered by score, then by cell index.
#[derive(Copy, Clone, Debug)]
struct Scored {
    score: f32,
    index: usize,
}

impl Ord for Scored {
    fn cmp(&self, other: &Scored) -> Ordering {
        self.score.total_cmp(&other.score).then(self.index.cmp(&other.index))
    }
}

impl PartialOrd for Scored {
    fn partial_cmp(&self, other: &Scored) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Scored {
    fn eq(&self, other: &Scored) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Scored {}

/// Best first search scored by `euclidean distance to finish * 10 * cell weight`.
///
/// Distances are kept exactly as Dijkstra keeps them and tracing walks those, the score only
/// orders the frontier. The score is not an admissible heuristic, so weighted grids may be
/// solved with a costlier path than Dijkstra finds.
#[derive(Debug, Clone, Default)]
pub struct AStar {
    frontier: BinaryHeap<Reverse<Scored>>,
}

impl AStar {
    pub fn new() -> AStar {
        AStar::default()
    }

    fn seed(&mut self, score: f32, index: usize) {
        self.frontier.clear();
        self.frontier.push(Reverse(Scored { score, index }));
    }
}

impl SearchStrategy for AStar {
    const KIND: SolverKind = SolverKind::AStar;

    fn restart(&mut self, start: usize) {
        self.seed(0.0, start);
    }

    fn expand(&mut self, grid: &mut Grid, metrics: &mut SolverMetrics) -> Expansion {
        let current = match self.frontier.pop() {
            Some(Reverse(entry)) => entry.index,
            None => return Expansion::Exhausted,
        };
        metrics.processed_cells += 1;

        let base = grid.distance_at(current);
        let finish = grid.coordinate(grid.finish_index());
        let frontier = &mut self.frontier;
        let found = scan_neighbours(grid, current, |grid, neighbour| {
            let weight = grid.weight_at(neighbour);
            let score = grid.coordinate(neighbour).euclidean_distance(finish) *
                        HEURISTIC_SCALE * f32::from(weight);
            grid.mark(neighbour, CellType::Queued);
            grid.set_distance(neighbour, base.saturating_add(u32::from(weight)));
            frontier.push(Reverse(Scored { score, index: neighbour }));
        });
        grid.mark(current, CellType::Processed);

        if found {
            // Tracing is keyed by distance from here on, not by score.
            self.seed(base as f32, current);
            Expansion::FoundFinish
        } else if self.frontier.is_empty() {
            Expansion::Exhausted
        } else {
            Expansion::Continue
        }
    }

    fn trace(&mut self, grid: &mut Grid, metrics: &mut SolverMetrics) -> Trace {
        let current = match self.frontier.peek() {
            Some(Reverse(entry)) => entry.index,
            None => return Trace::Complete,
        };
        metrics.add_path_cell(grid.weight_at(current));

        let current_distance = grid.distance_at(current);
        if current_distance == 0 {
            return Trace::Complete;
        }

        // Only cells already expanded are trusted to lie on a discovered route.
        let closest = grid.neighbours(current)
            .into_iter()
            .filter(|&n| matches!(grid.type_at(n), CellType::Processed | CellType::Start))
            .min_by_key(|&n| grid.distance_at(n))
            .filter(|&n| grid.distance_at(n) < current_distance);

        match closest {
            Some(next) => {
                grid.mark(current, CellType::Path);
                self.seed(grid.distance_at(next) as f32, next);
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
