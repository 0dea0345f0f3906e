use serde::{Deserialize, Serialize};

use crate::{Category, GridPosition, occupancy::OccupancySet};

/// Receives placement instructions produced by the generators.
///
/// The host turns these into actual world objects; the core never touches them.
pub trait PlacementSink<P> {
    fn emit(&mut self, category: Category, prototype: &P, position: GridPosition);
}

/// Maps a category to the template the host should instantiate for it.
///
/// Returning `None` is a valid outcome: the cell is still marked occupied.
pub trait PrototypeResolver {
    type Prototype;

    fn resolve(&self, category: Category) -> Option<&Self::Prototype>;
}

/// A recorded placement instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement<P> {
    pub category: Category,
    pub prototype: P,
    pub position: GridPosition,
}

/// Recording sink, mostly useful for tests and for replaying into another sink later.
impl<P: Clone> PlacementSink<P> for Vec<Placement<P>> {
    fn emit(&mut self, category: Category, prototype: &P, position: GridPosition) {
        self.push(Placement {
            category,
            prototype: prototype.clone(),
            position,
        });
    }
}

/// Stock resolver holding at most one prototype per category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prototypes<P> {
    pub wall: Option<P>,
    pub obstacle: Option<P>,
    pub item: Option<P>,
}

impl<P> Default for Prototypes<P> {
    fn default() -> Self {
        Prototypes {
            wall: None,
            obstacle: None,
            item: None,
        }
    }
}

impl<P> Prototypes<P> {
    pub fn new(wall: P, obstacle: P, item: P) -> Self {
        Prototypes {
            wall: Some(wall),
            obstacle: Some(obstacle),
            item: Some(item),
        }
    }

    pub fn with(mut self, category: Category, prototype: Option<P>) -> Self {
        match category {
            Category::Wall => self.wall = prototype,
            Category::Obstacle => self.obstacle = prototype,
            Category::Item => self.item = prototype,
        }
        self
    }
}

impl<P> PrototypeResolver for Prototypes<P> {
    type Prototype = P;

    fn resolve(&self, category: Category) -> Option<&P> {
        match category {
            Category::Wall => self.wall.as_ref(),
            Category::Obstacle => self.obstacle.as_ref(),
            Category::Item => self.item.as_ref(),
        }
    }
}

/// Counts of what a run emitted, per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementTally {
    pub walls: usize,
    pub obstacles: usize,
    pub items: usize,
    /// Placements that claimed a cell but had no prototype to emit.
    pub skipped: usize,
}

impl PlacementTally {
    pub fn emitted(&self) -> usize {
        self.walls + self.obstacles + self.items
    }

    pub fn get(&self, category: Category) -> usize {
        match category {
            Category::Wall => self.walls,
            Category::Obstacle => self.obstacles,
            Category::Item => self.items,
        }
    }

    fn record(&mut self, category: Category) {
        match category {
            Category::Wall => self.walls += 1,
            Category::Obstacle => self.obstacles += 1,
            Category::Item => self.items += 1,
        }
    }
}

/// Claims `position` and emits `category` there if a prototype resolves.
///
/// Occupancy is marked whether or not anything is emitted.
pub(crate) fn place<R, S>(
    category: Category,
    position: GridPosition,
    resolver: &R,
    occupancy: &mut OccupancySet,
    sink: &mut S,
    tally: &mut PlacementTally,
) where
    R: PrototypeResolver + ?Sized,
    S: PlacementSink<R::Prototype> + ?Sized,
{
    occupancy.insert(position);
    match resolver.resolve(category) {
        Some(prototype) => {
            sink.emit(category, prototype, position);
            tally.record(category);
        }
        None => {
            log::debug!("No prototype for {category} at {position:?}, cell kept occupied");
            tally.skipped += 1;
        }
    }
}
