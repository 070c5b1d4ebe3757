use docopt::Docopt;
use error_chain::bail;
use pathviz::{
    board::{Board, BoardConfig, BoardConfigBuilder, Lane},
    cells::{CellType, WeightChange, MAX_WEIGHT, MIN_WEIGHT},
    generators::GeneratorKind,
    grid_displays::{self, CellTypeDisplay, DistanceDisplay, GridDisplay, WeightDisplay},
    pathing::{SearchOutcome, SolverKind},
};
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;
use serde_derive::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Pathviz

Usage:
    pathviz_driver -h | --help
    pathviz_driver [--grid-width=<w>] [--grid-height=<h>] [--cell-size=<n>] [--lane-spacing=<n>] [--solvers=<list>] [--maze=<kind>] [--heavy-cells=<n>] [--seed=<n>] [--max-ticks=<n>] [--show-every=<n>] [--show-weights | --show-distances]

Options:
    -h --help              Show this screen.
    --grid-width=<w>       The grid width in a w*h grid [default: 30].
    --grid-height=<h>      The grid height in a w*h grid [default: 30].
    --cell-size=<n>        Side length of a cell in world units [default: 20].
    --lane-spacing=<n>     Gap between solver lanes, in cells [default: 10].
    --solvers=<list>       Comma separated solvers, one lane each: dfs, bfs, dijkstra, astar [default: dfs,bfs,dijkstra,astar].
    --maze=<kind>          Generate a maze on the template before solving: random-fill, recursive-division or random.
    --heavy-cells=<n>      Give n random template cells a random weight above 1.
    --seed=<n>             Seed every random choice so the run can be repeated.
    --max-ticks=<n>        Stop after this many ticks even if some solver is still running [default: 10000].
    --show-every=<n>       Print every lane each n ticks.
    --show-weights         Label cells with their weight instead of their type.
    --show-distances       Label cells with their distance from the start, in hexadecimal.
";
#[derive(Debug, Deserialize)]
struct DriverArgs {
    flag_grid_width: usize,
    flag_grid_height: usize,
    flag_cell_size: f32,
    flag_lane_spacing: usize,
    flag_solvers: String,
    flag_maze: Option<String>,
    flag_heavy_cells: Option<usize>,
    flag_seed: Option<u64>,
    flag_max_ticks: usize,
    flag_show_every: Option<usize>,
    flag_show_weights: bool,
    flag_show_distances: bool,
}

// The driver's own errors; library errors are linked in so `?` works on both.
mod errors {
    use error_chain::*;
    error_chain! {

        links {
            Engine(::pathviz::errors::Error, ::pathviz::errors::ErrorKind);
        }

        foreign_links {
            DocOptFailure(::docopt::Error);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: DriverArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;

    let config = board_config(&args)?;
    let mut board = Board::new(&config).chain_err(|| "Failed to lay out the board")?;

    if let Some(maze) = args.flag_maze.as_ref() {
        let kind = maze_kind(maze)?;
        let generated = board.generate_maze(kind);
        while board.is_generating() {
            board.update();
        }
        info!(generator = generated.name(), "maze ready");
    }

    if let Some(count) = args.flag_heavy_cells {
        add_heavy_cells(&mut board, count, args.flag_seed);
    }

    board.copy_template().chain_err(|| "Failed to copy the template to the solver lanes")?;

    let display = grid_display(&args);
    let mut ticks = 0;
    while !board.is_settled() && ticks < args.flag_max_ticks {
        board.update();
        ticks += 1;

        if let Some(every) = args.flag_show_every {
            if every > 0 && ticks % every == 0 {
                println!("tick {}", ticks);
                print_lanes(&board, display.as_ref());
            }
        }
    }

    if !board.is_settled() {
        info!(ticks, "tick limit reached before every solver finished");
    }
    print_lanes(&board, display.as_ref());
    println!("{}", metrics_table(board.lanes()));

    Ok(())
}

fn board_config(args: &DriverArgs) -> Result<BoardConfig> {
    let solvers = args.flag_solvers
        .split(',')
        .filter(|name| !name.trim().is_empty())
        .map(|name| name.parse::<SolverKind>())
        .collect::<pathviz::errors::Result<Vec<_>>>()?;
    if solvers.is_empty() {
        bail!("At least one solver is needed, got '{}'", args.flag_solvers);
    }

    Ok(BoardConfigBuilder::new()
        .grid_width(args.flag_grid_width)
        .grid_height(args.flag_grid_height)
        .cell_size(args.flag_cell_size)
        .lane_spacing(args.flag_lane_spacing)
        .solvers(solvers)
        .seed(args.flag_seed)
        .build())
}

/// None means pick one at random.
fn maze_kind(name: &str) -> Result<Option<GeneratorKind>> {
    if name.trim().eq_ignore_ascii_case("random") {
        Ok(None)
    } else {
        Ok(Some(name.parse::<GeneratorKind>()?))
    }
}

/// Raise the weight of `count` random open template cells, each by a random amount.
fn add_heavy_cells(board: &mut Board, count: usize, seed: Option<u64>) {
    let mut rng = match seed {
        Some(s) => XorShiftRng::seed_from_u64(s.wrapping_add(1)),
        None => XorShiftRng::from_entropy(),
    };

    let size = board.template().size();
    for _ in 0..count {
        let index = rng.gen_range(0..size);
        let open = board.template().cell(index).map_or(false, |c| c.cell_type() == CellType::Empty);
        let centre = board.template().cell_centre(index);
        if let (true, Some(point)) = (open, centre) {
            for _ in 0..rng.gen_range(MIN_WEIGHT..MAX_WEIGHT) {
                board.change_square_weight(point, WeightChange::Increase);
            }
        }
    }
}

fn grid_display(args: &DriverArgs) -> Box<dyn GridDisplay> {
    if args.flag_show_distances {
        Box::new(DistanceDisplay)
    } else if args.flag_show_weights {
        Box::new(WeightDisplay)
    } else {
        Box::new(CellTypeDisplay)
    }
}

fn print_lanes(board: &Board, display: &dyn GridDisplay) {
    for lane in board.lanes() {
        println!("{}", lane.name());
        print!("{}", grid_displays::render(lane.grid(), display));
    }
}

fn metrics_table(lanes: &[Lane]) -> String {
    let mut table = format!("{:<16} {:>9} {:>7} {:>7} {:>7}  {}\n",
                            "solver", "processed", "length", "weight", "ticks", "outcome");
    for lane in lanes {
        let m = lane.metrics();
        let outcome = match lane.solver().outcome() {
            SearchOutcome::Found => "found",
            SearchOutcome::Unreachable => "unreachable",
            SearchOutcome::Running => "running",
        };
        table.push_str(&format!("{:<16} {:>9} {:>7} {:>7} {:>7}  {}\n",
                                lane.name(), m.processed_cells, m.path_length, m.path_weight,
                                m.ticks, outcome));
    }
    table
}
