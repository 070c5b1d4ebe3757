//! The four search strategies. Each is wrapped in an `IncrementalSolver` by `pathing::new_solver`.

mod astar;
mod bfs;
mod dfs;
mod dijkstra;

pub use self::astar::AStar;
pub use self::bfs::BreadthFirst;
pub use self::dfs::DepthFirst;
pub use self::dijkstra::Dijkstra;


#[cfg(test)]
pub(crate) mod test_support {

    use crate::cells::CellType;
    use crate::grid::Grid;
    use crate::pathing::Stepper;
    use crate::units::{Height, Width};

    pub fn open_grid(w: usize, h: usize) -> Grid {
        Grid::new(Width(w), Height(h)).expect("valid grid dimensions")
    }

    /// Step until finished, failing the test if that takes implausibly long.
    pub fn run_to_completion<S: Stepper + ?Sized>(stepper: &mut S, grid: &mut Grid) {
        let limit = grid.size() * 4 + 16;
        for _ in 0..limit {
            if stepper.is_finished() {
                return;
            }
            stepper.step(grid);
        }
        assert!(stepper.is_finished(), "still running after {} steps", limit);
    }

    pub fn type_count(g: &Grid, cell_type: CellType) -> usize {
        g.cells().iter().filter(|c| c.cell_type() == cell_type).count()
    }
}
