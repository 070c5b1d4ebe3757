use error_chain::bail;
use smallvec::SmallVec;
use std::fmt;
use tracing::trace;

use crate::cells::{Cartesian2DCoordinate, Cell, CellType, WeightChange, NEIGHBOUR_OFFSETS, UNREACHED};
use crate::errors::*;
use crate::units::{CellSize, ColumnIndex, Height, RowIndex, Width};

pub type NeighbourSmallVec = SmallVec<[usize; 8]>;

#[derive(PartialEq, Copy, Clone, Debug)]
pub struct WorldPoint {
    pub x: f32,
    pub y: f32,
}

impl WorldPoint {
    pub fn new(x: f32, y: f32) -> WorldPoint {
        WorldPoint { x, y }
    }
}

/// Where a grid sits in world space. Resolving a point to a cell only needs these two values.
#[derive(PartialEq, Copy, Clone, Debug)]
pub struct GridLayout {
    pub origin: WorldPoint,
    pub cell_size: CellSize,
}

impl GridLayout {
    pub fn new(origin: WorldPoint, cell_size: CellSize) -> GridLayout {
        GridLayout { origin, cell_size }
    }
}

impl Default for GridLayout {
    fn default() -> GridLayout {
        GridLayout::new(WorldPoint::new(0.0, 0.0), CellSize(1.0))
    }
}

/// Row-major matrix of cells with exactly one Start and one Finish cell.
#[derive(Clone, PartialEq)]
pub struct Grid {
    cells: Vec<Cell>,
    width: Width,
    height: Height,
    start_index: usize,
    finish_index: usize,
    layout: GridLayout,
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Grid :: width: {:?}, height: {:?}, start: {}, finish: {}, layout: {:?}",
               self.width, self.height, self.start_index, self.finish_index, self.layout)
    }
}

impl Grid {
    /// A grid at the world origin with unit sized cells.
    pub fn new(width: Width, height: Height) -> Result<Grid> {
        Grid::with_layout(width, height, GridLayout::default())
    }

    pub fn with_layout(width: Width, height: Height, layout: GridLayout) -> Result<Grid> {
        let (Width(w), Height(h)) = (width, height);
        let size = w.checked_mul(h).unwrap_or(0);
        if size < 2 || !(layout.cell_size.0 > 0.0) {
            bail!(ErrorKind::InvalidDimensions(w, h));
        }

        let mut grid = Grid {
            cells: vec![Cell::default(); size],
            width,
            height,
            start_index: 0,
            finish_index: size - 1,
            layout,
        };
        grid.place_endpoints();
        Ok(grid)
    }

    fn place_endpoints(&mut self) {
        self.start_index = 0;
        self.finish_index = self.cells.len() - 1;

        let start = &mut self.cells[self.start_index];
        start.cell_type = CellType::Start;
        start.distance = 0;
        self.cells[self.finish_index].cell_type = CellType::Finish;
    }

    #[inline]
    pub fn width(&self) -> Width {
        self.width
    }

    #[inline]
    pub fn height(&self) -> Height {
        self.height
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    #[inline]
    pub fn start_index(&self) -> usize {
        self.start_index
    }

    #[inline]
    pub fn finish_index(&self) -> usize {
        self.finish_index
    }

    #[inline]
    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub fn coordinate(&self, index: usize) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::from_row_major_index(index, self.width)
    }

    #[inline]
    pub fn index_of(&self, coord: Cartesian2DCoordinate) -> Option<usize> {
        if (coord.x as usize) < self.width.0 && (coord.y as usize) < self.height.0 {
            Some(coord.row_major_index(self.width))
        } else {
            None
        }
    }

    /// Is the world space point strictly inside the area covered by this grid?
    pub fn is_within_bounds(&self, point: WorldPoint) -> bool {
        let GridLayout { origin, cell_size: CellSize(cell) } = self.layout;
        let right = origin.x + self.width.0 as f32 * cell;
        let bottom = origin.y + self.height.0 as f32 * cell;

        point.x > origin.x && point.x < right && point.y > origin.y && point.y < bottom
    }

    /// Resolve a world space point to a cell index, None if the point is off the grid.
    pub fn index_at(&self, point: WorldPoint) -> Option<usize> {
        if !self.is_within_bounds(point) {
            return None;
        }
        let GridLayout { origin, cell_size: CellSize(cell) } = self.layout;
        let col = ((point.x - origin.x) / cell) as usize;
        let row = ((point.y - origin.y) / cell) as usize;

        // Float rounding at the far edges can land one past the last row/column.
        self.index_of(Cartesian2DCoordinate::from_row_column_indices(ColumnIndex(col),
                                                                    RowIndex(row)))
    }

    /// World space centre of a cell.
    pub fn cell_centre(&self, index: usize) -> Option<WorldPoint> {
        if index >= self.cells.len() {
            return None;
        }
        let GridLayout { origin, cell_size: CellSize(cell) } = self.layout;
        let coord = self.coordinate(index);
        Some(WorldPoint::new(origin.x + (coord.x as f32 + 0.5) * cell,
                             origin.y + (coord.y as f32 + 0.5) * cell))
    }

    /// Change the type of the cell under a world point.
    ///
    /// Returns true if the grid changed. See `set_cell_type_at`.
    pub fn set_cell_type(&mut self, point: WorldPoint, cell_type: CellType) -> bool {
        match self.index_at(point) {
            Some(index) => self.set_cell_type_at(index, cell_type),
            None => false,
        }
    }

    /// Change the type of a cell.
    ///
    /// Start and Finish cells are never overwritten. Setting a Start or Finish type moves that
    /// endpoint here and demotes the old one to an Empty cell.
    pub fn set_cell_type_at(&mut self, index: usize, cell_type: CellType) -> bool {
        let current = match self.cells.get(index) {
            Some(cell) => cell.cell_type,
            None => return false,
        };
        if current.is_endpoint() {
            trace!(index, ?cell_type, "refusing to overwrite an endpoint cell");
            return false;
        }

        match cell_type {
            CellType::Start => {
                self.cells[self.start_index].empty();
                let cell = &mut self.cells[index];
                cell.cell_type = CellType::Start;
                cell.distance = 0;
                self.start_index = index;
            }
            CellType::Finish => {
                self.cells[self.finish_index].empty();
                let cell = &mut self.cells[index];
                cell.cell_type = CellType::Finish;
                cell.distance = UNREACHED;
                self.finish_index = index;
            }
            CellType::Empty | CellType::Wall => {
                let cell = &mut self.cells[index];
                cell.cell_type = cell_type;
                cell.distance = UNREACHED;
            }
            _ => self.cells[index].cell_type = cell_type,
        }
        true
    }

    /// Raise or lower the weight of the cell under a world point, clamped to [1, 9].
    pub fn adjust_weight(&mut self, point: WorldPoint, change: WeightChange) -> bool {
        match self.index_at(point) {
            Some(index) => self.adjust_weight_at(index, change),
            None => false,
        }
    }

    pub fn adjust_weight_at(&mut self, index: usize, change: WeightChange) -> bool {
        self.cells.get_mut(index).map_or(false, |cell| cell.adjust_weight(change))
    }

    /// Wipe everything a solver run painted, keeping endpoints, walls and weights.
    pub fn reset_mesh(&mut self) {
        for cell in self.cells.iter_mut().filter(|c| c.cell_type.is_search_mark()) {
            cell.empty();
        }
    }

    /// Back to the freshly constructed state: no walls, unit weights, default endpoints.
    pub fn clear_mesh(&mut self) {
        for cell in &mut self.cells {
            *cell = Cell::default();
        }
        self.place_endpoints();
    }

    /// Copy every cell and both endpoints from a grid of the same shape.
    ///
    /// The world layout of `self` is kept.
    pub fn copy_from(&mut self, other: &Grid) -> Result<()> {
        if self.width != other.width || self.height != other.height {
            bail!(ErrorKind::ShapeMismatch((self.width.0, self.height.0),
                                           (other.width.0, other.height.0)));
        }
        self.cells.copy_from_slice(&other.cells);
        self.start_index = other.start_index;
        self.finish_index = other.finish_index;
        Ok(())
    }

    /// Indices of the up to 8 cells surrounding `index`, clipped to the grid, in the
    /// `NEIGHBOUR_OFFSETS` order.
    pub fn neighbours(&self, index: usize) -> NeighbourSmallVec {
        let (Width(w), Height(h)) = (self.width, self.height);
        let row = (index / w) as isize;
        let col = (index % w) as isize;

        NEIGHBOUR_OFFSETS.iter()
            .map(|&(dr, dc)| (row + dr, col + dc))
            .filter(|&(r, c)| r >= 0 && c >= 0 && (r as usize) < h && (c as usize) < w)
            .map(|(r, c)| r as usize * w + c as usize)
            .collect()
    }

    /// Paint a search or maze mark. Endpoints keep their type.
    #[inline]
    pub(crate) fn mark(&mut self, index: usize, cell_type: CellType) {
        let cell = &mut self.cells[index];
        if !cell.cell_type.is_endpoint() {
            cell.cell_type = cell_type;
        }
    }

    #[inline]
    pub(crate) fn set_distance(&mut self, index: usize, distance: u32) {
        self.cells[index].distance = distance;
    }

    /// Type of a cell known to be in range.
    #[inline]
    pub(crate) fn type_at(&self, index: usize) -> CellType {
        self.cells[index].cell_type
    }

    #[inline]
    pub(crate) fn distance_at(&self, index: usize) -> u32 {
        self.cells[index].distance
    }

    #[inline]
    pub(crate) fn weight_at(&self, index: usize) -> u8 {
        self.cells[index].weight
    }
}


#[cfg(test)]
mod tests {

    use itertools::Itertools;
    use quickcheck::{quickcheck, TestResult};

    use super::*;
    use crate::cells::{MAX_WEIGHT, MIN_WEIGHT};

    fn grid(w: usize, h: usize) -> Grid {
        Grid::new(Width(w), Height(h)).expect("valid grid dimensions")
    }

    // Unit cells at the origin: the centre of cell (x, y) is (x + 0.5, y + 0.5).
    fn centre(x: usize, y: usize) -> WorldPoint {
        WorldPoint::new(x as f32 + 0.5, y as f32 + 0.5)
    }

    fn count_of(g: &Grid, cell_type: CellType) -> usize {
        g.cells().iter().filter(|c| c.cell_type() == cell_type).count()
    }

    #[test]
    fn new_grid_has_endpoints_at_the_corners() {
        let g = grid(4, 3);
        assert_eq!(g.size(), 12);
        assert_eq!(g.start_index(), 0);
        assert_eq!(g.finish_index(), 11);
        assert_eq!(g.cell(0).unwrap().cell_type(), CellType::Start);
        assert_eq!(g.cell(0).unwrap().distance(), 0);
        assert_eq!(g.cell(11).unwrap().cell_type(), CellType::Finish);
        assert_eq!(count_of(&g, CellType::Empty), 10);
    }

    #[test]
    fn too_small_grids_are_rejected() {
        assert!(Grid::new(Width(1), Height(1)).is_err());
        assert!(Grid::new(Width(0), Height(5)).is_err());
        assert!(Grid::new(Width(2), Height(1)).is_ok());
        let bad_layout = GridLayout::new(WorldPoint::new(0.0, 0.0), CellSize(0.0));
        assert!(Grid::with_layout(Width(3), Height(3), bad_layout).is_err());
    }

    #[test]
    fn point_resolution() {
        let layout = GridLayout::new(WorldPoint::new(100.0, 50.0), CellSize(20.0));
        let g = Grid::with_layout(Width(5), Height(4), layout).unwrap();

        assert_eq!(g.index_at(WorldPoint::new(101.0, 51.0)), Some(0));
        assert_eq!(g.index_at(WorldPoint::new(145.0, 75.0)), Some(5 + 2));
        assert_eq!(g.index_at(WorldPoint::new(199.0, 129.0)), Some(19));

        // edges and outside
        assert_eq!(g.index_at(WorldPoint::new(100.0, 60.0)), None);
        assert_eq!(g.index_at(WorldPoint::new(200.0, 60.0)), None);
        assert_eq!(g.index_at(WorldPoint::new(150.0, 130.0)), None);
        assert_eq!(g.index_at(WorldPoint::new(-5.0, -5.0)), None);
        assert!(!g.is_within_bounds(WorldPoint::new(99.0, 60.0)));
    }

    #[test]
    fn cell_centres_resolve_back_to_their_cell() {
        let layout = GridLayout::new(WorldPoint::new(-40.0, 10.0), CellSize(8.0));
        let g = Grid::with_layout(Width(6), Height(3), layout).unwrap();
        for index in 0..g.size() {
            let centre = g.cell_centre(index).unwrap();
            assert_eq!(g.index_at(centre), Some(index));
        }
        assert_eq!(g.cell_centre(0), Some(WorldPoint::new(-36.0, 14.0)));
        assert_eq!(g.cell_centre(18), None);
    }

    #[test]
    fn out_of_bounds_edits_are_ignored() {
        let mut g = grid(3, 3);
        let before = g.clone();
        assert!(!g.set_cell_type(WorldPoint::new(10.0, 10.0), CellType::Wall));
        assert!(!g.adjust_weight(WorldPoint::new(-1.0, 1.0), WeightChange::Increase));
        assert!(!g.set_cell_type_at(9, CellType::Wall));
        assert!(!g.adjust_weight_at(100, WeightChange::Increase));
        assert_eq!(g, before);
    }

    #[test]
    fn endpoints_cannot_be_overwritten() {
        let mut g = grid(3, 3);
        assert!(!g.set_cell_type(centre(0, 0), CellType::Wall));
        assert!(!g.set_cell_type(centre(2, 2), CellType::Empty));
        assert!(!g.set_cell_type(centre(2, 2), CellType::Start));
        assert_eq!(g.start_index(), 0);
        assert_eq!(g.finish_index(), 8);
        assert_eq!(g.cell(8).unwrap().cell_type(), CellType::Finish);
    }

    #[test]
    fn moving_the_start() {
        let mut g = grid(3, 3);
        assert!(g.set_cell_type(centre(1, 1), CellType::Start));
        assert_eq!(g.start_index(), 4);
        assert_eq!(g.cell(4).unwrap().cell_type(), CellType::Start);
        assert_eq!(g.cell(4).unwrap().distance(), 0);
        assert_eq!(g.cell(0).unwrap().cell_type(), CellType::Empty);
        assert_eq!(g.cell(0).unwrap().distance(), UNREACHED);
        assert_eq!(count_of(&g, CellType::Start), 1);
    }

    #[test]
    fn moving_the_finish() {
        let mut g = grid(3, 3);
        assert!(g.set_cell_type(centre(2, 0), CellType::Finish));
        assert_eq!(g.finish_index(), 2);
        assert_eq!(g.cell(8).unwrap().cell_type(), CellType::Empty);
        assert_eq!(g.cell(2).unwrap().cell_type(), CellType::Finish);
        assert_eq!(count_of(&g, CellType::Finish), 1);
    }

    #[test]
    fn walls_and_weights() {
        let mut g = grid(3, 3);
        assert!(g.set_cell_type(centre(1, 0), CellType::Wall));
        assert_eq!(g.cell(1).unwrap().cell_type(), CellType::Wall);

        assert!(g.adjust_weight(centre(2, 1), WeightChange::Increase));
        assert_eq!(g.cell(5).unwrap().weight(), 2);
        assert!(g.adjust_weight(centre(2, 1), WeightChange::Decrease));
        assert!(!g.adjust_weight(centre(2, 1), WeightChange::Decrease));
        assert_eq!(g.cell(5).unwrap().weight(), MIN_WEIGHT);
    }

    #[test]
    fn reset_mesh_keeps_user_state() {
        let mut g = grid(4, 4);
        g.set_cell_type_at(1, CellType::Wall);
        g.adjust_weight_at(2, WeightChange::Increase);
        for (index, mark) in [(2, CellType::Queued),
                              (3, CellType::Unfinished),
                              (4, CellType::Processed),
                              (5, CellType::ProcessedAlt),
                              (6, CellType::Path)]
            .iter()
            .cloned() {
            g.mark(index, mark);
            g.set_distance(index, 3);
        }

        g.reset_mesh();

        assert_eq!(g.type_at(0), CellType::Start);
        assert_eq!(g.distance_at(0), 0);
        assert_eq!(g.type_at(1), CellType::Wall);
        assert_eq!(g.type_at(15), CellType::Finish);
        for index in 2..7 {
            assert_eq!(g.type_at(index), CellType::Empty);
            assert_eq!(g.distance_at(index), UNREACHED);
        }
        assert_eq!(g.weight_at(2), 2);
    }

    #[test]
    fn clear_mesh_matches_a_fresh_grid() {
        let mut g = grid(5, 4);
        g.set_cell_type_at(7, CellType::Start);
        g.set_cell_type_at(3, CellType::Finish);
        g.set_cell_type_at(9, CellType::Wall);
        g.adjust_weight_at(10, WeightChange::Increase);
        g.mark(11, CellType::Path);

        g.clear_mesh();
        assert_eq!(g, grid(5, 4));
    }

    #[test]
    fn copy_between_grids() {
        let mut template = grid(4, 4);
        template.set_cell_type_at(5, CellType::Start);
        template.set_cell_type_at(6, CellType::Wall);
        template.adjust_weight_at(7, WeightChange::Increase);

        let layout = GridLayout::new(WorldPoint::new(500.0, 0.0), CellSize(10.0));
        let mut lane = Grid::with_layout(Width(4), Height(4), layout).unwrap();
        lane.copy_from(&template).expect("same shape");

        assert_eq!(lane.cells(), template.cells());
        assert_eq!(lane.start_index(), 5);
        assert_eq!(lane.finish_index(), 15);
        assert_eq!(*lane.layout(), layout);
    }

    #[test]
    fn copy_requires_the_same_shape() {
        let mut a = grid(4, 4);
        let b = grid(4, 5);
        let before = a.clone();
        match a.copy_from(&b) {
            Err(Error(ErrorKind::ShapeMismatch(expected, found), _)) => {
                assert_eq!(expected, (4, 4));
                assert_eq!(found, (4, 5));
            }
            other => panic!("unexpected copy result {:?}", other.map(|_| ())),
        }
        assert_eq!(a, before);
    }

    #[test]
    fn neighbour_cells() {
        let g = grid(4, 3);
        let sorted = |index| g.neighbours(index).iter().cloned().sorted().collect::<Vec<_>>();

        // corners
        assert_eq!(sorted(0), vec![1, 4, 5]);
        assert_eq!(sorted(3), vec![2, 6, 7]);
        assert_eq!(sorted(11), vec![6, 7, 10]);
        // edge
        assert_eq!(sorted(1), vec![0, 2, 4, 5, 6]);
        // inside, in scan order
        assert_eq!(&*g.neighbours(5), &[0, 1, 2, 4, 6, 8, 9, 10]);
    }

    #[test]
    fn endpoint_and_weight_invariants_hold_under_random_edits() {
        fn edits_keep_invariants(edits: Vec<(u8, u8)>) -> TestResult {
            let mut g = Grid::new(Width(6), Height(5)).unwrap();
            for (i, op) in edits {
                let index = i as usize % 32; // some indices fall off the grid
                match op % 6 {
                    0 => g.set_cell_type_at(index, CellType::Start),
                    1 => g.set_cell_type_at(index, CellType::Finish),
                    2 => g.set_cell_type_at(index, CellType::Wall),
                    3 => g.set_cell_type_at(index, CellType::Empty),
                    4 => g.adjust_weight_at(index, WeightChange::Increase),
                    _ => g.adjust_weight_at(index, WeightChange::Decrease),
                };
            }
            let starts = g.cells().iter().positions(|c| c.cell_type() == CellType::Start).collect_vec();
            let finishes = g.cells().iter().positions(|c| c.cell_type() == CellType::Finish).collect_vec();
            let weights_ok = g.cells().iter().all(|c| c.weight() >= MIN_WEIGHT && c.weight() <= MAX_WEIGHT);

            TestResult::from_bool(starts == vec![g.start_index()] &&
                                  finishes == vec![g.finish_index()] &&
                                  weights_ok)
        }
        quickcheck(edits_keep_invariants as fn(Vec<(u8, u8)>) -> TestResult);
    }
}
