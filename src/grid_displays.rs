use std::fmt;

use crate::cells::CellType;
use crate::grid::Grid;
use crate::units::Width;

const WALL_BODY: &str = "███";

pub trait GridDisplay {
    /// Render the contents of a grid cell as text.
    /// The String should be 3 glyphs long, padded if required.
    fn render_cell_body(&self, _grid: &Grid, _index: usize) -> String {
        String::from("   ")
    }
}

/// One glyph per cell type, the default text view.
#[derive(Debug, Copy, Clone, Default)]
pub struct CellTypeDisplay;

impl GridDisplay for CellTypeDisplay {
    fn render_cell_body(&self, grid: &Grid, index: usize) -> String {
        let body = match grid.cell(index).map(|c| c.cell_type()) {
            Some(CellType::Start) => " S ",
            Some(CellType::Finish) => " E ",
            Some(CellType::Queued) => " o ",
            Some(CellType::Unfinished) => " ~ ",
            Some(CellType::Processed) => " . ",
            Some(CellType::ProcessedAlt) => " : ",
            Some(CellType::Path) => " * ",
            Some(CellType::Wall) => WALL_BODY,
            Some(CellType::Empty) | None => "   ",
        };
        String::from(body)
    }
}

/// Weight labels, walls drawn solid.
#[derive(Debug, Copy, Clone, Default)]
pub struct WeightDisplay;

impl GridDisplay for WeightDisplay {
    fn render_cell_body(&self, grid: &Grid, index: usize) -> String {
        match grid.cell(index) {
            Some(c) if c.cell_type() == CellType::Wall => String::from(WALL_BODY),
            Some(c) => format!("{:^3}", c.weight()),
            None => String::from("   "),
        }
    }
}

/// Distance from the start of every reached cell.
#[derive(Debug, Copy, Clone, Default)]
pub struct DistanceDisplay;

impl GridDisplay for DistanceDisplay {
    fn render_cell_body(&self, grid: &Grid, index: usize) -> String {
        match grid.cell(index) {
            Some(c) if c.cell_type() == CellType::Wall => String::from(WALL_BODY),
            // centre align, padding 3, lowercase hexadecimal
            Some(c) if c.is_reached() => format!("{:^3x}", c.distance()),
            _ => String::from("   "),
        }
    }
}

/// Draw the grid inside a box, one text row per grid row.
pub fn render(grid: &Grid, display: &dyn GridDisplay) -> String {
    const WALL_LR_3: &str = "───";
    const WALL_UD: &str = "│";

    let Width(w) = grid.width();
    let horizontal = WALL_LR_3.repeat(w);
    let mut output = String::with_capacity((w * 3 + 3) * (grid.height().0 + 2) * 3);

    output.push('┌');
    output.push_str(&horizontal);
    output.push_str("┐\n");

    for row_start in (0..grid.size()).step_by(w) {
        output.push_str(WALL_UD);
        for index in row_start..row_start + w {
            output.push_str(&display.render_cell_body(grid, index));
        }
        output.push_str(WALL_UD);
        output.push('\n');
    }

    output.push('└');
    output.push_str(&horizontal);
    output.push_str("┘\n");
    output
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&render(self, &CellTypeDisplay))
    }
}
