use rand::Rng;

use crate::{
    Category, GenerationError, GridPosition,
    occupancy::OccupancySet,
    placement::{PlacementSink, PlacementTally, PrototypeResolver, place},
};

/// Inclusive range of cells strictly inside the perimeter walls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
///
/// Only constructed through [`InteriorBounds::new`], so the ranges are never empty.
pub struct InteriorBounds {
    min_x: i32,
    max_x: i32,
    min_y: i32,
    max_y: i32,
}

impl InteriorBounds {
    /// Interior of a `width` x `height` room: x in `[1, width - 2]`, y in `[1, height - 2]`.
    pub fn new(width: i32, height: i32) -> Result<Self, GenerationError> {
        if width < 3 || height < 3 {
            return Err(GenerationError::EmptyInterior { width, height });
        }
        Ok(InteriorBounds {
            min_x: 1,
            max_x: width - 2,
            min_y: 1,
            max_y: height - 2,
        })
    }

    pub fn min_x(&self) -> i32 {
        self.min_x
    }

    pub fn max_x(&self) -> i32 {
        self.max_x
    }

    pub fn min_y(&self) -> i32 {
        self.min_y
    }

    pub fn max_y(&self) -> i32 {
        self.max_y
    }

    #[inline]
    pub fn contains(&self, p: GridPosition) -> bool {
        (self.min_x..=self.max_x).contains(&p.x) && (self.min_y..=self.max_y).contains(&p.y)
    }

    /// Total number of interior cells.
    pub fn capacity(&self) -> usize {
        let w = (self.max_x - self.min_x + 1) as usize;
        let h = (self.max_y - self.min_y + 1) as usize;
        w.saturating_mul(h)
    }

    /// Draws a uniformly distributed interior cell.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> GridPosition {
        GridPosition {
            x: rng.random_range(self.min_x..=self.max_x),
            y: rng.random_range(self.min_y..=self.max_y),
        }
    }
}

/// Places `count` entities of `category` on free interior cells.
///
/// Each placement draws cells until it hits one that is not occupied, claims it and emits.
/// Requests larger than the number of free interior cells are refused before any draw.
#[allow(clippy::too_many_arguments)]
pub fn place_random<G, R, S>(
    rng: &mut G,
    bounds: &InteriorBounds,
    occupancy: &mut OccupancySet,
    count: usize,
    category: Category,
    resolver: &R,
    sink: &mut S,
    tally: &mut PlacementTally,
) -> Result<(), GenerationError>
where
    G: Rng + ?Sized,
    R: PrototypeResolver + ?Sized,
    S: PlacementSink<R::Prototype> + ?Sized,
{
    let available = bounds.capacity() - occupancy.count_within(bounds);
    if count > available {
        return Err(GenerationError::Overcrowded {
            category,
            requested: count,
            available,
        });
    }

    for _ in 0..count {
        let position = loop {
            let candidate = bounds.sample(rng);
            if !occupancy.contains(candidate) {
                break candidate;
            }
        };
        place(category, position, resolver, occupancy, sink, tally);
    }
    log::debug!("Placed {count} random {category}(s)");
    Ok(())
}
