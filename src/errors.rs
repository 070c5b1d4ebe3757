// Create the Error, ErrorKind, ResultExt, and Result types.
// Other modules `use crate::errors::*;` to get access to everything `error_chain!` creates.
use error_chain::*;

error_chain! {
    errors {
        InvalidDimensions(width: usize, height: usize) {
            description("grid too small to hold both a start and a finish cell")
            display("invalid grid dimensions {}x{}: need at least two cells and a positive cell size",
                    width, height)
        }
        ShapeMismatch(expected: (usize, usize), found: (usize, usize)) {
            description("grids have different dimensions")
            display("cannot copy a {}x{} grid into a {}x{} grid",
                    found.0, found.1, expected.0, expected.1)
        }
        UnknownSolver(name: String) {
            description("unknown solver name")
            display("unknown solver '{}', expected one of dfs, bfs, dijkstra, astar", name)
        }
        UnknownGenerator(name: String) {
            description("unknown maze generator name")
            display("unknown maze generator '{}', expected random-fill or recursive-division", name)
        }
    }
}
