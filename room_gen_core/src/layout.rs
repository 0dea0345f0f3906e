use serde::{Deserialize, Serialize};

use crate::{
    Category, GridPosition,
    occupancy::OccupancySet,
    placement::{PlacementSink, PlacementTally, PrototypeResolver, place},
};

/// One authored object in a layout asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomObjectEntry {
    #[serde(alias = "type")]
    pub category: Category,
    pub position: GridPosition,
}

/// A designer-authored room. Read-only to the generator.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoomLayoutAsset {
    pub width: i32,
    pub height: i32,
    #[serde(default)]
    pub objects: Vec<RoomObjectEntry>,
}

/// Represents errors that can occur while loading a layout asset.
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("Invalid layout JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Layout map is empty.")]
    EmptyMap,
    #[error("Inconsistent width at row {row}: expected {expected}, found {found}")]
    InconsistentWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Unknown layout code '{code}' at position ({x}, {y}).")]
    UnknownCode { code: String, x: usize, y: usize },
}

/// Replays every entry of `layout` in stored order.
///
/// Each entry claims its cell, even if an earlier entry already did, and is emitted
/// whenever its category resolves. Replay never skips on occupancy.
pub fn replay_layout<R, S>(
    layout: &RoomLayoutAsset,
    resolver: &R,
    occupancy: &mut OccupancySet,
    sink: &mut S,
    tally: &mut PlacementTally,
) where
    R: PrototypeResolver + ?Sized,
    S: PlacementSink<R::Prototype> + ?Sized,
{
    for entry in &layout.objects {
        place(entry.category, entry.position, resolver, occupancy, sink, tally);
    }
    log::debug!(
        "Replayed {} layout object(s) for a {}x{} room",
        layout.objects.len(),
        layout.width,
        layout.height
    );
}

/// Loads a layout asset from its JSON form.
pub fn load_layout_from_json(json: &str) -> Result<RoomLayoutAsset, LayoutError> {
    Ok(serde_json::from_str(json)?)
}

/// Loads a layout asset from a whitespace-separated token map.
///
/// Codes: `WL` wall, `OB` obstacle, `IT` item, `BL` blank. The first line of text is the
/// top row of the room, so it gets the highest `y`.
pub fn load_layout_from_map(map_string: &str) -> Result<RoomLayoutAsset, LayoutError> {
    let lines: Vec<&str> = map_string.trim().lines().collect();
    if lines.is_empty() {
        return Err(LayoutError::EmptyMap);
    }

    let height = lines.len();
    let mut width = 0;
    let mut parsed_rows: Vec<Vec<&str>> = Vec::with_capacity(height);

    for (row, line) in lines.iter().enumerate() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if row == 0 {
            width = tokens.len();
        } else if tokens.len() != width {
            return Err(LayoutError::InconsistentWidth {
                row,
                expected: width,
                found: tokens.len(),
            });
        }
        parsed_rows.push(tokens);
    }

    let mut objects = Vec::new();
    for (row, row_tokens) in parsed_rows.iter().enumerate() {
        let y = height - 1 - row;
        for (x, token) in row_tokens.iter().enumerate() {
            let category = match *token {
                "BL" => continue,
                "WL" => Category::Wall,
                "OB" => Category::Obstacle,
                "IT" => Category::Item,
                unknown => {
                    return Err(LayoutError::UnknownCode {
                        code: unknown.to_string(),
                        x,
                        y,
                    });
                }
            };
            objects.push(RoomObjectEntry {
                category,
                position: GridPosition::new(x as i32, y as i32),
            });
        }
    }

    Ok(RoomLayoutAsset {
        width: width as i32,
        height: height as i32,
        objects,
    })
}
