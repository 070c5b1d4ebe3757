//! **pathviz** steps grid pathfinding and maze generation algorithms one unit of work at a time,
//! so every frame of a search can be drawn.

pub mod board;
pub mod cells;
pub mod errors;
pub mod generators;
pub mod grid;
pub mod grid_displays;
pub mod pathing;
pub mod solvers;
pub mod units;
