//! A set of solver lanes sharing one grid shape, plus a template grid the user draws obstacles on
//! and generates mazes into. The template is copied across to the lanes on request so every
//! solver races over the same obstacles.

use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;
use tracing::{debug, info};

use crate::cells::{CellType, WeightChange};
use crate::errors::*;
use crate::generators::{new_generator, GeneratorKind, MazeGenerator};
use crate::grid::{Grid, GridLayout, WorldPoint};
use crate::pathing::{new_solver, Solver, SolverKind, SolverMetrics};
use crate::units::{CellSize, Height, Width};

/// World y coordinate of the row of solver lanes.
pub const LANE_ROW_Y: f32 = 750.0;

#[derive(Debug, Clone, PartialEq)]
pub struct BoardConfig {
    pub width: Width,
    pub height: Height,
    pub cell_size: CellSize,
    /// Gap between neighbouring lanes, in cells.
    pub lane_spacing: usize,
    /// One lane per entry, left to right.
    pub solvers: Vec<SolverKind>,
    /// Master seed every solver and generator seed is drawn from. Entropy if None.
    pub seed: Option<u64>,
}

impl Default for BoardConfig {
    fn default() -> BoardConfig {
        BoardConfig {
            width: Width(30),
            height: Height(30),
            cell_size: CellSize(20.0),
            lane_spacing: 10,
            solvers: SolverKind::ALL.to_vec(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BoardConfigBuilder {
    config: BoardConfig,
}

impl BoardConfigBuilder {
    pub fn new() -> BoardConfigBuilder {
        BoardConfigBuilder::default()
    }

    pub fn grid_width(mut self, width: usize) -> BoardConfigBuilder {
        self.config.width = Width(width);
        self
    }

    pub fn grid_height(mut self, height: usize) -> BoardConfigBuilder {
        self.config.height = Height(height);
        self
    }

    pub fn cell_size(mut self, cell_size: f32) -> BoardConfigBuilder {
        self.config.cell_size = CellSize(cell_size);
        self
    }

    pub fn lane_spacing(mut self, cells: usize) -> BoardConfigBuilder {
        self.config.lane_spacing = cells;
        self
    }

    pub fn solvers(mut self, solvers: Vec<SolverKind>) -> BoardConfigBuilder {
        self.config.solvers = solvers;
        self
    }

    pub fn seed(mut self, seed: Option<u64>) -> BoardConfigBuilder {
        self.config.seed = seed;
        self
    }

    pub fn build(self) -> BoardConfig {
        self.config
    }
}

/// A grid and the solver bound to it.
pub struct Lane {
    grid: Grid,
    solver: Box<dyn Solver>,
}

impl Lane {
    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn solver(&self) -> &dyn Solver {
        &*self.solver
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.solver.name()
    }

    #[inline]
    pub fn metrics(&self) -> SolverMetrics {
        self.solver.metrics()
    }

    /// Throw away the solver's progress, unless it has not started.
    fn clear(&mut self) {
        if !self.solver.is_idle() {
            self.grid.reset_mesh();
            self.solver.reset(&self.grid);
            info!(solver = self.solver.name(), "lane cleared");
        }
    }
}

pub struct Board {
    lanes: Vec<Lane>,
    template: Grid,
    generator: Option<Box<dyn MazeGenerator>>,
    rng: XorShiftRng,
}

impl Board {
    pub fn new(config: &BoardConfig) -> Result<Board> {
        let mut rng = match config.seed {
            Some(seed) => XorShiftRng::seed_from_u64(seed),
            None => XorShiftRng::from_entropy(),
        };

        let CellSize(cell) = config.cell_size;
        let stride = (config.width.0 + config.lane_spacing) as f32 * cell;

        let template_origin = WorldPoint::new(stride * 1.5, 0.0);
        let template = Grid::with_layout(config.width,
                                         config.height,
                                         GridLayout::new(template_origin, config.cell_size))?;

        let mut lanes = Vec::with_capacity(config.solvers.len());
        for (i, &kind) in config.solvers.iter().enumerate() {
            let origin = WorldPoint::new(stride * i as f32, LANE_ROW_Y);
            let grid = Grid::with_layout(config.width,
                                         config.height,
                                         GridLayout::new(origin, config.cell_size))?;
            let solver = new_solver(kind, &grid, XorShiftRng::seed_from_u64(rng.gen()));
            lanes.push(Lane { grid, solver });
        }

        debug!(lanes = lanes.len(), width = config.width.0, height = config.height.0, "board built");
        Ok(Board {
            lanes,
            template,
            generator: None,
            rng,
        })
    }

    #[inline]
    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    #[inline]
    pub fn template(&self) -> &Grid {
        &self.template
    }

    /// The most recently started generator, finished or not.
    pub fn generator(&self) -> Option<&dyn MazeGenerator> {
        self.generator.as_deref()
    }

    pub fn is_generating(&self) -> bool {
        self.generator.as_ref().map_or(false, |g| !g.is_finished())
    }

    /// Every solver is done and no maze is being generated.
    pub fn is_settled(&self) -> bool {
        !self.is_generating() && self.lanes.iter().all(|lane| lane.solver.is_finished())
    }

    fn lane_at(&self, point: WorldPoint) -> Option<usize> {
        self.lanes.iter().position(|lane| lane.grid.is_within_bounds(point))
    }

    /// Set the type of the cell under a world point, on whichever grid contains it.
    ///
    /// Editing a lane throws away its solver's progress. Moving a lane's Start or Finish also
    /// points its solver at the new Start.
    pub fn set_square_type(&mut self, point: WorldPoint, cell_type: CellType) -> bool {
        if let Some(index) = self.lane_at(point) {
            let lane = &mut self.lanes[index];
            let changed = lane.grid.set_cell_type(point, cell_type);
            if cell_type.is_endpoint() {
                lane.solver.reset_start_position(&lane.grid);
            }
            lane.clear();
            changed
        } else if self.template.is_within_bounds(point) {
            self.template.set_cell_type(point, cell_type)
        } else {
            false
        }
    }

    /// Raise or lower the weight of the cell under a world point, on whichever grid contains it.
    pub fn change_square_weight(&mut self, point: WorldPoint, change: WeightChange) -> bool {
        if let Some(index) = self.lane_at(point) {
            let lane = &mut self.lanes[index];
            let changed = lane.grid.adjust_weight(point, change);
            lane.clear();
            changed
        } else if self.template.is_within_bounds(point) {
            self.template.adjust_weight(point, change)
        } else {
            false
        }
    }

    /// Copy the template into every lane and put the solvers back at the start.
    pub fn copy_template(&mut self) -> Result<()> {
        for lane in &mut self.lanes {
            lane.grid.copy_from(&self.template)
                .chain_err(|| format!("copying the template into the {} lane", lane.solver.name()))?;
            lane.clear();
            lane.solver.reset_start_position(&lane.grid);
        }
        info!(lanes = self.lanes.len(), "template copied");
        Ok(())
    }

    /// Wipe the template and start generating a maze on it, of a random kind if none is given.
    pub fn generate_maze(&mut self, kind: Option<GeneratorKind>) -> GeneratorKind {
        let kind = kind.unwrap_or_else(|| GeneratorKind::random(&mut self.rng));
        self.template.clear_mesh();
        let rng = XorShiftRng::seed_from_u64(self.rng.gen());
        self.generator = Some(new_generator(kind, &self.template, rng));
        info!(generator = kind.name(), "maze generation started");
        kind
    }

    /// One tick: the generator steps first, then every lane solver once.
    pub fn update(&mut self) {
        if let Some(generator) = self.generator.as_mut() {
            generator.step(&mut self.template);
        }
        for lane in &mut self.lanes {
            lane.solver.step(&mut lane.grid);
        }
    }
}
