//! The incremental search contract shared by every solver.
//!
//! A solver is driven one `step` per animation tick. Each step either expands one frontier cell
//! (searching) or walks one cell back towards the start (tracing), painting the grid as it goes
//! so a renderer can show the progress frame by frame.
//!
//! ```text
//! Idle -> Searching -> PathFound -> Tracing -> Done (Found)
//!                  \-> Done (Unreachable)
//! ```
//!
//! The algorithm specific parts (frontier container, expansion rule, tracing rule) live behind
//! `SearchStrategy`; `IncrementalSolver` owns the lifecycle and the metrics.

use rand_xorshift::XorShiftRng;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, trace};

use crate::cells::CellType;
use crate::errors::*;
use crate::grid::Grid;
use crate::solvers::{AStar, BreadthFirst, DepthFirst, Dijkstra};

/// Something advanced by exactly one unit of work per call.
pub trait Stepper {
    /// Do one unit of work. A no-op once finished.
    fn step(&mut self, grid: &mut Grid);

    fn is_finished(&self) -> bool;
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum SolverPhase {
    /// Nothing done since construction or the last reset.
    Idle,
    Searching,
    /// The finish was discovered on the last step, tracing starts on the next one.
    PathFound,
    Tracing,
    Done,
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum SearchOutcome {
    Running,
    Found,
    /// The frontier ran dry before the finish was discovered.
    Unreachable,
}

#[derive(Default, Eq, PartialEq, Copy, Clone, Debug)]
pub struct SolverMetrics {
    pub processed_cells: u32,
    pub path_length: u32,
    pub path_weight: u32,
    /// Steps that did some work since the last reset.
    pub ticks: u32,
}

impl SolverMetrics {
    /// Count a cell onto the traced path.
    #[inline]
    pub(crate) fn add_path_cell(&mut self, weight: u8) {
        self.path_length += 1;
        self.path_weight += u32::from(weight);
    }
}

/// Result of one frontier expansion.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum Expansion {
    Continue,
    FoundFinish,
    Exhausted,
}

/// Result of one tracing step.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum Trace {
    Continue,
    Complete,
}

/// Algorithm specific half of a solver.
pub trait SearchStrategy {
    const KIND: SolverKind;

    /// Throw the frontier away and restart it from the given start cell.
    fn restart(&mut self, start: usize);

    /// One frontier expansion. Must leave the frontier seeded for tracing when the finish is found.
    fn expand(&mut self, grid: &mut Grid, metrics: &mut SolverMetrics) -> Expansion;

    /// One step of walking the discovered path back to the start.
    fn trace(&mut self, grid: &mut Grid, metrics: &mut SolverMetrics) -> Trace;

    fn frontier_len(&self) -> usize;
}

/// Lifecycle and metrics wrapper applying a `SearchStrategy` to a grid one step at a time.
pub trait Solver: Stepper {
    /// Clear the metrics and restart the frontier from the grid's start cell.
    fn reset(&mut self, grid: &Grid);

    /// Restart the frontier from the grid's start cell, keeping metrics and phase.
    fn reset_start_position(&mut self, grid: &Grid);

    /// No step taken since the last reset.
    fn is_idle(&self) -> bool;

    fn phase(&self) -> SolverPhase;

    fn outcome(&self) -> SearchOutcome;

    fn metrics(&self) -> SolverMetrics;

    fn kind(&self) -> SolverKind;

    fn name(&self) -> &'static str {
        self.kind().name()
    }
}

#[derive(Debug, Clone)]
pub struct IncrementalSolver<S: SearchStrategy> {
    strategy: S,
    phase: SolverPhase,
    outcome: SearchOutcome,
    metrics: SolverMetrics,
}

impl<S: SearchStrategy> IncrementalSolver<S> {
    pub fn new(mut strategy: S, grid: &Grid) -> IncrementalSolver<S> {
        strategy.restart(grid.start_index());
        IncrementalSolver {
            strategy,
            phase: SolverPhase::Idle,
            outcome: SearchOutcome::Running,
            metrics: SolverMetrics::default(),
        }
    }

    #[inline]
    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    fn search_step(&mut self, grid: &mut Grid) {
        match self.strategy.expand(grid, &mut self.metrics) {
            Expansion::Continue => {
                self.phase = SolverPhase::Searching;
                trace!(solver = S::KIND.name(), frontier = self.strategy.frontier_len());
            }
            Expansion::FoundFinish => {
                self.phase = SolverPhase::PathFound;
                self.outcome = SearchOutcome::Found;
                debug!(solver = S::KIND.name(),
                       processed = self.metrics.processed_cells,
                       "finish discovered");
            }
            Expansion::Exhausted => {
                self.phase = SolverPhase::Done;
                self.outcome = SearchOutcome::Unreachable;
                debug!(solver = S::KIND.name(),
                       processed = self.metrics.processed_cells,
                       "frontier exhausted, finish unreachable");
            }
        }
    }

    fn trace_step(&mut self, grid: &mut Grid) {
        match self.strategy.trace(grid, &mut self.metrics) {
            Trace::Continue => self.phase = SolverPhase::Tracing,
            Trace::Complete => {
                self.phase = SolverPhase::Done;
                debug!(solver = S::KIND.name(),
                       path_length = self.metrics.path_length,
                       path_weight = self.metrics.path_weight,
                       "path traced");
            }
        }
    }
}

impl<S: SearchStrategy> Stepper for IncrementalSolver<S> {
    fn step(&mut self, grid: &mut Grid) {
        match self.phase {
            SolverPhase::Done => return,
            SolverPhase::Idle | SolverPhase::Searching => self.search_step(grid),
            SolverPhase::PathFound | SolverPhase::Tracing => self.trace_step(grid),
        }
        self.metrics.ticks += 1;
    }

    #[inline]
    fn is_finished(&self) -> bool {
        self.phase == SolverPhase::Done
    }
}

impl<S: SearchStrategy> Solver for IncrementalSolver<S> {
    fn reset(&mut self, grid: &Grid) {
        self.metrics = SolverMetrics::default();
        self.phase = SolverPhase::Idle;
        self.outcome = SearchOutcome::Running;
        self.reset_start_position(grid);
    }

    fn reset_start_position(&mut self, grid: &Grid) {
        self.strategy.restart(grid.start_index());
    }

    #[inline]
    fn is_idle(&self) -> bool {
        self.metrics.ticks == 0
    }

    #[inline]
    fn phase(&self) -> SolverPhase {
        self.phase
    }

    #[inline]
    fn outcome(&self) -> SearchOutcome {
        self.outcome
    }

    #[inline]
    fn metrics(&self) -> SolverMetrics {
        self.metrics
    }

    #[inline]
    fn kind(&self) -> SolverKind {
        S::KIND
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum SolverKind {
    DepthFirst,
    BreadthFirst,
    Dijkstra,
    AStar,
}

impl SolverKind {
    /// Every solver, in the order the board lays out its lanes by default.
    pub const ALL: [SolverKind; 4] = [SolverKind::DepthFirst,
                                      SolverKind::BreadthFirst,
                                      SolverKind::Dijkstra,
                                      SolverKind::AStar];

    pub fn name(self) -> &'static str {
        match self {
            SolverKind::DepthFirst => "DFSSolver",
            SolverKind::BreadthFirst => "BFSSolver",
            SolverKind::Dijkstra => "DJIKSTRA Solver",
            SolverKind::AStar => "A* Solver",
        }
    }
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SolverKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<SolverKind> {
        match s.trim().to_lowercase().as_str() {
            "dfs" | "depth-first" => Ok(SolverKind::DepthFirst),
            "bfs" | "breadth-first" => Ok(SolverKind::BreadthFirst),
            "dijkstra" | "djikstra" => Ok(SolverKind::Dijkstra),
            "astar" | "a*" | "a-star" => Ok(SolverKind::AStar),
            _ => Err(ErrorKind::UnknownSolver(s.to_string()).into()),
        }
    }
}

/// Build a solver of the given kind bound to the grid's current start cell.
///
/// The rng is owned by the solver from here on; only the randomised variants draw from it.
pub fn new_solver(kind: SolverKind, grid: &Grid, rng: XorShiftRng) -> Box<dyn Solver> {
    match kind {
        SolverKind::DepthFirst => Box::new(IncrementalSolver::new(DepthFirst::new(rng), grid)),
        SolverKind::BreadthFirst => Box::new(IncrementalSolver::new(BreadthFirst::new(rng), grid)),
        SolverKind::Dijkstra => Box::new(IncrementalSolver::new(Dijkstra::new(), grid)),
        SolverKind::AStar => Box::new(IncrementalSolver::new(AStar::new(), grid)),
    }
}

/// Scan the neighbours of `index` in the fixed row-major order.
///
/// Calls `on_empty` for every Empty neighbour met before the first Finish neighbour. Returns true
/// as soon as a Finish neighbour is met; the rest of the scan is abandoned.
pub(crate) fn scan_neighbours<F>(grid: &mut Grid, index: usize, mut on_empty: F) -> bool
    where F: FnMut(&mut Grid, usize)
{
    for neighbour in grid.neighbours(index) {
        match grid.type_at(neighbour) {
            CellType::Finish => return true,
            CellType::Empty => on_empty(grid, neighbour),
            _ => {}
        }
    }
    false
}
