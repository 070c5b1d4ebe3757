use rand::Rng;
use rand_xorshift::XorShiftRng;
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::cells::CellType;
use crate::errors::*;
use crate::grid::Grid;
use crate::pathing::Stepper;
use crate::units::{Height, Width};

/// Chance an Empty cell is turned into a wall by `RandomFill`.
pub const WALL_PROBABILITY: f32 = 0.33;

/// Regions narrower or shorter than this are left undivided.
const MIN_DIVISION_SIZE: usize = 5;

/// A maze generator paints walls onto a grid one unit of work per step.
pub trait MazeGenerator: Stepper {
    fn kind(&self) -> GeneratorKind;
}

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum GeneratorKind {
    RandomFill,
    RecursiveDivision,
}

impl GeneratorKind {
    pub const ALL: [GeneratorKind; 2] = [GeneratorKind::RandomFill, GeneratorKind::RecursiveDivision];

    pub fn name(self) -> &'static str {
        match self {
            GeneratorKind::RandomFill => "random-fill",
            GeneratorKind::RecursiveDivision => "recursive-division",
        }
    }

    /// Uniform pick over every generator.
    pub fn random<R: Rng>(rng: &mut R) -> GeneratorKind {
        GeneratorKind::ALL[rng.gen_range(0..GeneratorKind::ALL.len())]
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GeneratorKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<GeneratorKind> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "random-fill" | "randomfill" | "fill" => Ok(GeneratorKind::RandomFill),
            "recursive-division" | "recursivedivision" | "division" => {
                Ok(GeneratorKind::RecursiveDivision)
            }
            _ => Err(ErrorKind::UnknownGenerator(s.to_string()).into()),
        }
    }
}

/// Build a generator of the given kind for the grid's current dimensions.
pub fn new_generator(kind: GeneratorKind, grid: &Grid, rng: XorShiftRng) -> Box<dyn MazeGenerator> {
    match kind {
        GeneratorKind::RandomFill => Box::new(RandomFill::new(grid, rng)),
        GeneratorKind::RecursiveDivision => Box::new(RecursiveDivision::new(grid, rng)),
    }
}

/// Visits every cell in index order, walling off Empty cells with probability `WALL_PROBABILITY`.
#[derive(Debug, Clone)]
pub struct RandomFill {
    cursor: usize,
    cell_count: usize,
    rng: XorShiftRng,
}

impl RandomFill {
    pub fn new(grid: &Grid, rng: XorShiftRng) -> RandomFill {
        RandomFill {
            cursor: 0,
            cell_count: grid.size(),
            rng,
        }
    }
}

impl Stepper for RandomFill {
    fn step(&mut self, grid: &mut Grid) {
        if self.is_finished() {
            return;
        }
        let is_empty = grid.cell(self.cursor).map_or(false, |c| c.cell_type() == CellType::Empty);
        if is_empty && self.rng.gen::<f32>() < WALL_PROBABILITY {
            grid.mark(self.cursor, CellType::Wall);
        }
        self.cursor += 1;

        if self.is_finished() {
            debug!(generator = GeneratorKind::RandomFill.name(), "maze generated");
        }
    }

    #[inline]
    fn is_finished(&self) -> bool {
        self.cursor >= self.cell_count
    }
}

impl MazeGenerator for RandomFill {
    fn kind(&self) -> GeneratorKind {
        GeneratorKind::RandomFill
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
enum Orientation {
    /// Wall runs along a row.
    Horizontal,
    /// Wall runs along a column.
    Vertical,
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
struct Region {
    x: usize,
    y: usize,
    width: usize,
    height: usize,
    orientation: Orientation,
}

/// Splits the grid with a wall holding a single opening, then splits both halves the same way
/// until the pieces are too small.
///
/// Walls go on even offsets and openings on odd offsets within a region. The two halves share
/// the wall line.
#[derive(Debug, Clone)]
pub struct RecursiveDivision {
    width: Width,
    walls: VecDeque<usize>,
    regions: VecDeque<Region>,
    rng: XorShiftRng,
}

impl RecursiveDivision {
    pub fn new(grid: &Grid, rng: XorShiftRng) -> RecursiveDivision {
        let (Width(w), Height(h)) = (grid.width(), grid.height());
        let mut generator = RecursiveDivision {
            width: grid.width(),
            walls: VecDeque::new(),
            regions: VecDeque::new(),
            rng,
        };
        let orientation = generator.orientation(w, h);
        generator.divide(Region {
            x: 0,
            y: 0,
            width: w,
            height: h,
            orientation,
        });
        generator
    }

    /// Wall cells still to paint.
    pub fn pending_walls(&self) -> usize {
        self.walls.len()
    }

    /// Regions still to divide.
    pub fn pending_regions(&self) -> usize {
        self.regions.len()
    }

    fn orientation(&mut self, width: usize, height: usize) -> Orientation {
        if width < height {
            Orientation::Horizontal
        } else if width > height {
            Orientation::Vertical
        } else if self.rng.gen() {
            Orientation::Horizontal
        } else {
            Orientation::Vertical
        }
    }

    /// Random even offset in [low, high] rounded down to even.
    fn even_offset(&mut self, low: usize, high: usize) -> usize {
        self.rng.gen_range(low..=high) / 2 * 2
    }

    fn divide(&mut self, region: Region) {
        let Region { x, y, width, height, orientation } = region;
        if width < MIN_DIVISION_SIZE || height < MIN_DIVISION_SIZE {
            return;
        }

        let Width(grid_width) = self.width;
        match orientation {
            Orientation::Horizontal => {
                let wall_y = y + self.even_offset(2, height - 3);
                let opening_x = x + self.even_offset(1, width - 2) + 1;
                self.walls.extend((x..x + width)
                    .filter(|&cx| cx != opening_x)
                    .map(|cx| wall_y * grid_width + cx));

                let top_height = wall_y - y + 1;
                let bottom_height = y + height - wall_y;
                self.push_region(x, y, width, top_height);
                self.push_region(x, wall_y, width, bottom_height);
            }
            Orientation::Vertical => {
                let wall_x = x + self.even_offset(2, width - 3);
                let opening_y = y + self.even_offset(1, height - 2) + 1;
                self.walls.extend((y..y + height)
                    .filter(|&cy| cy != opening_y)
                    .map(|cy| cy * grid_width + wall_x));

                let left_width = wall_x - x;
                let right_width = x + width - wall_x;
                self.push_region(x, y, left_width, height);
                self.push_region(wall_x, y, right_width, height);
            }
        }
    }

    fn push_region(&mut self, x: usize, y: usize, width: usize, height: usize) {
        let orientation = self.orientation(width, height);
        self.regions.push_back(Region { x, y, width, height, orientation });
    }
}

impl Stepper for RecursiveDivision {
    fn step(&mut self, grid: &mut Grid) {
        if let Some(index) = self.walls.pop_front() {
            // Start and Finish may have been moved onto a wall line.
            grid.mark(index, CellType::Wall);
        } else if let Some(region) = self.regions.pop_front() {
            self.divide(region);
        } else {
            return;
        }

        if self.is_finished() {
            debug!(generator = GeneratorKind::RecursiveDivision.name(), "maze generated");
        }
    }

    #[inline]
    fn is_finished(&self) -> bool {
        self.walls.is_empty() && self.regions.is_empty()
    }
}

impl MazeGenerator for RecursiveDivision {
    fn kind(&self) -> GeneratorKind {
        GeneratorKind::RecursiveDivision
    }
}
