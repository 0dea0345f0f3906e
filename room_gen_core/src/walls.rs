use crate::{
    Category, GenerationError, GridPosition,
    occupancy::OccupancySet,
    placement::{PlacementSink, PlacementTally, PrototypeResolver, place},
};

/// Checks that a `width` x `height` room has a non-degenerate perimeter.
pub fn check_ring_dimensions(width: i32, height: i32) -> Result<(), GenerationError> {
    if width < 2 || height < 2 {
        return Err(GenerationError::InvalidDimensions { width, height });
    }
    Ok(())
}

/// Yields the perimeter cells of a `width` x `height` room.
///
/// Bottom and top rows come first, column by column; then the left and right columns
/// without the corners. Callers must validate with [`check_ring_dimensions`] first,
/// smaller rooms would yield duplicate cells.
pub fn wall_ring_positions(width: i32, height: i32) -> impl Iterator<Item = GridPosition> {
    let rows = (0..width).flat_map(move |x| {
        [GridPosition::new(x, 0), GridPosition::new(x, height - 1)]
    });
    let columns = (1..height - 1).flat_map(move |y| {
        [GridPosition::new(0, y), GridPosition::new(width - 1, y)]
    });
    rows.chain(columns)
}

/// Number of cells on the perimeter of a valid room.
pub fn wall_ring_len(width: i32, height: i32) -> usize {
    let (width, height) = (i64::from(width), i64::from(height));
    (2 * width + 2 * (height - 2)).max(0) as usize
}

/// Emits the perimeter walls and marks every wall cell occupied.
///
/// Does not consult the occupancy set beforehand.
pub fn build_wall_ring<R, S>(
    width: i32,
    height: i32,
    resolver: &R,
    occupancy: &mut OccupancySet,
    sink: &mut S,
    tally: &mut PlacementTally,
) -> Result<(), GenerationError>
where
    R: PrototypeResolver + ?Sized,
    S: PlacementSink<R::Prototype> + ?Sized,
{
    check_ring_dimensions(width, height)?;
    for position in wall_ring_positions(width, height) {
        place(Category::Wall, position, resolver, occupancy, sink, tally);
    }
    log::debug!(
        "Wall ring for {}x{} room: {} cells",
        width,
        height,
        wall_ring_len(width, height)
    );
    Ok(())
}
