use serde::{Deserialize, Serialize};

pub mod builder;
pub mod camera;
pub mod config;
pub mod layout;
pub mod map;
pub mod occupancy;
pub mod placement;
pub mod placer;
pub mod walls;

/// Represents a cell coordinate on the room grid.
///
/// `y` grows upwards: row `0` is the bottom wall of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPosition {
    pub x: i32,
    pub y: i32,
}

impl GridPosition {
    pub const fn new(x: i32, y: i32) -> Self {
        GridPosition { x, y }
    }
}

/// The kind of entity placed in a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Wall,
    Obstacle,
    Item,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Category::Wall => "wall",
            Category::Obstacle => "obstacle",
            Category::Item => "item",
        };
        f.write_str(name)
    }
}

/// Reasons a generation run is refused before it touches any cell.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("Room size ({width}, {height}) is too small for a perimeter wall (minimum 2x2)")]
    InvalidDimensions { width: i32, height: i32 },
    #[error("Room size ({width}, {height}) has no interior cells for random placement (minimum 3x3)")]
    EmptyInterior { width: i32, height: i32 },
    #[error("Cannot place {requested} random {category}(s): only {available} free interior cell(s)")]
    Overcrowded {
        category: Category,
        requested: usize,
        available: usize,
    },
}
