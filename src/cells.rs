use std::convert::From;

use crate::units::{ColumnIndex, RowIndex, Width};

/// Distance of a cell the search has not reached yet.
pub const UNREACHED: u32 = u32::MAX;

pub const MIN_WEIGHT: u8 = 1;
pub const MAX_WEIGHT: u8 = 9;

/// (row, column) offsets of the 8 surrounding cells in row-major order.
///
/// Every solver scans neighbours in exactly this order and stops at the first Finish cell, so
/// which neighbour "discovers" the Finish is decided here.
pub const NEIGHBOUR_OFFSETS: [(isize, isize); 8] = [(-1, -1), (-1, 0), (-1, 1),
                                                    (0, -1), (0, 1),
                                                    (1, -1), (1, 0), (1, 1)];

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum CellType {
    Empty,
    Start,
    Finish,
    /// Sitting in a solver frontier.
    Queued,
    /// On the live depth-first branch, children still open.
    Unfinished,
    Processed,
    ProcessedAlt,
    Path,
    Wall,
}

impl CellType {
    #[inline]
    pub fn is_endpoint(self) -> bool {
        self == CellType::Start || self == CellType::Finish
    }

    /// Marks left behind by a solver run, the ones `Grid::reset_mesh` wipes.
    #[inline]
    pub fn is_search_mark(self) -> bool {
        match self {
            CellType::Queued |
            CellType::Unfinished |
            CellType::Processed |
            CellType::ProcessedAlt |
            CellType::Path => true,
            CellType::Empty | CellType::Start | CellType::Finish | CellType::Wall => false,
        }
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum WeightChange {
    Increase,
    Decrease,
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Cell {
    pub(crate) cell_type: CellType,
    pub(crate) distance: u32,
    pub(crate) weight: u8,
}

impl Default for Cell {
    fn default() -> Cell {
        Cell {
            cell_type: CellType::Empty,
            distance: UNREACHED,
            weight: MIN_WEIGHT,
        }
    }
}

impl Cell {
    #[inline]
    pub fn cell_type(&self) -> CellType {
        self.cell_type
    }

    /// Cumulative cost from the start cell, `UNREACHED` if not discovered.
    #[inline]
    pub fn distance(&self) -> u32 {
        self.distance
    }

    #[inline]
    pub fn weight(&self) -> u8 {
        self.weight
    }

    #[inline]
    pub fn is_reached(&self) -> bool {
        self.distance != UNREACHED
    }

    /// Back to a blank cell, keeping the weight the user painted.
    pub(crate) fn empty(&mut self) {
        self.cell_type = CellType::Empty;
        self.distance = UNREACHED;
    }

    /// Returns true if the weight moved, false at the [1, 9] boundary.
    pub(crate) fn adjust_weight(&mut self, change: WeightChange) -> bool {
        match change {
            WeightChange::Increase if self.weight < MAX_WEIGHT => {
                self.weight += 1;
                true
            }
            WeightChange::Decrease if self.weight > MIN_WEIGHT => {
                self.weight -= 1;
                true
            }
            _ => false,
        }
    }
}

#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct Cartesian2DCoordinate {
    pub x: u32,
    pub y: u32,
}

impl Cartesian2DCoordinate {
    pub fn new(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate { x, y }
    }

    #[inline]
    pub fn from_row_major_index(index: usize, width: Width) -> Cartesian2DCoordinate {
        let Width(w) = width;
        Cartesian2DCoordinate::new((index % w) as u32, (index / w) as u32)
    }

    #[inline]
    pub fn from_row_column_indices(col_index: ColumnIndex, row_index: RowIndex) -> Self {
        let (ColumnIndex(col), RowIndex(row)) = (col_index, row_index);
        Cartesian2DCoordinate::new(col as u32, row as u32)
    }

    #[inline]
    pub fn row_major_index(&self, width: Width) -> usize {
        self.y as usize * width.0 + self.x as usize
    }

    /// Straight line distance between two cell centres, in cells.
    pub fn euclidean_distance(&self, other: Cartesian2DCoordinate) -> f32 {
        let dx = other.x as f32 - self.x as f32;
        let dy = other.y as f32 - self.y as f32;
        (dx * dx + dy * dy).sqrt()
    }
}
