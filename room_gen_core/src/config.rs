use serde::{Deserialize, Serialize};

use crate::{Category, GenerationError, placer::InteriorBounds, walls::check_ring_dimensions};

/// Parameters for procedurally generated rooms.
///
/// Ignored by layout replay, except for `frame_camera`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomConfig {
    pub room_width: i32,
    pub room_height: i32,
    pub generate_random_obstacles: bool,
    pub obstacle_count: usize,
    pub generate_random_items: bool,
    pub item_count: usize,
    /// Frame the camera target once the room is complete.
    pub frame_camera: bool,
}

impl Default for RoomConfig {
    fn default() -> Self {
        RoomConfig {
            room_width: 10,
            room_height: 8,
            generate_random_obstacles: true,
            obstacle_count: 5,
            generate_random_items: true,
            item_count: 3,
            frame_camera: true,
        }
    }
}

impl RoomConfig {
    /// Number of obstacles the procedural branch will place.
    pub fn requested_obstacles(&self) -> usize {
        if self.generate_random_obstacles {
            self.obstacle_count
        } else {
            0
        }
    }

    /// Number of items the procedural branch will place.
    pub fn requested_items(&self) -> usize {
        if self.generate_random_items {
            self.item_count
        } else {
            0
        }
    }

    /// Checks that a procedural run with this config can complete.
    ///
    /// Returns the interior bounds when any random placement is requested.
    pub fn validate(&self) -> Result<Option<InteriorBounds>, GenerationError> {
        check_ring_dimensions(self.room_width, self.room_height)?;

        let obstacles = self.requested_obstacles();
        let items = self.requested_items();
        if obstacles == 0 && items == 0 {
            return Ok(None);
        }

        let bounds = InteriorBounds::new(self.room_width, self.room_height)?;
        let capacity = bounds.capacity();
        if obstacles > capacity {
            return Err(GenerationError::Overcrowded {
                category: Category::Obstacle,
                requested: obstacles,
                available: capacity,
            });
        }
        // Items go in after obstacles and only get what is left.
        if items > capacity - obstacles {
            return Err(GenerationError::Overcrowded {
                category: Category::Item,
                requested: items,
                available: capacity - obstacles,
            });
        }
        Ok(Some(bounds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(width: i32, height: i32, obstacles: usize, items: usize) -> RoomConfig {
        RoomConfig {
            room_width: width,
            room_height: height,
            obstacle_count: obstacles,
            item_count: items,
            ..RoomConfig::default()
        }
    }

    #[test]
    fn default_config_is_valid() {
        let bounds = RoomConfig::default().validate().unwrap().unwrap();
        assert_eq!(bounds.capacity(), 48);
    }

    #[test]
    fn walls_only_room_may_have_no_interior() {
        let cfg = RoomConfig {
            generate_random_obstacles: false,
            generate_random_items: false,
            ..config(2, 2, 5, 3)
        };
        assert_eq!(cfg.validate(), Ok(None));
        assert_eq!(config(2, 2, 0, 0).validate(), Ok(None));
    }

    #[test]
    fn rejects_small_rooms() {
        assert_eq!(
            config(1, 8, 0, 0).validate(),
            Err(GenerationError::InvalidDimensions {
                width: 1,
                height: 8
            })
        );
        assert_eq!(
            config(2, 8, 1, 0).validate(),
            Err(GenerationError::EmptyInterior {
                width: 2,
                height: 8
            })
        );
    }

    #[test]
    fn items_only_get_cells_left_by_obstacles() {
        // 5x5 has a 3x3 interior.
        assert!(config(5, 5, 9, 0).validate().is_ok());
        assert_eq!(
            config(5, 5, 9, 1).validate(),
            Err(GenerationError::Overcrowded {
                category: Category::Item,
                requested: 1,
                available: 0,
            })
        );
        assert_eq!(
            config(5, 5, 10, 0).validate(),
            Err(GenerationError::Overcrowded {
                category: Category::Obstacle,
                requested: 10,
                available: 9,
            })
        );
    }

    #[test]
    fn huge_counts_are_rejected_not_wrapped() {
        let result = config(10, 8, usize::MAX, 1).validate();
        assert!(matches!(
            result,
            Err(GenerationError::Overcrowded {
                category: Category::Obstacle,
                requested: usize::MAX,
                available: 48,
            })
        ));
        assert!(matches!(
            config(10, 8, 0, usize::MAX).validate(),
            Err(GenerationError::Overcrowded {
                category: Category::Item,
                ..
            })
        ));
    }

    #[test]
    fn disabled_categories_do_not_count() {
        let cfg = RoomConfig {
            generate_random_items: false,
            ..config(5, 5, 9, 100)
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg: RoomConfig = serde_json::from_str(r#"{ "room_width": 12 }"#).unwrap();
        assert_eq!(cfg.room_width, 12);
        assert_eq!(cfg.room_height, 8);
        assert_eq!(cfg.obstacle_count, 5);
    }
}
