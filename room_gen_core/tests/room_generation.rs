//! End-to-end tests for room generation through `RoomBuilder`.
//!
//! Everything here is pure placement logic: prototypes are plain chars and the sink is a
//! recording `Vec`.

use std::collections::HashSet;

use rand::{SeedableRng, rngs::StdRng};
use room_gen_core::{
    Category, GenerationError, GridPosition,
    builder::{Branch, RoomBuilder},
    camera::{CameraFrame, CameraTarget},
    config::RoomConfig,
    layout::{RoomLayoutAsset, RoomObjectEntry, load_layout_from_map},
    map::Grid,
    placement::{Placement, Prototypes},
    placer::InteriorBounds,
};

// ── Helpers ────────────────────────────────────────────────────────────

fn prototypes() -> Prototypes<char> {
    Prototypes::new('#', 'o', '*')
}

fn procedural(width: i32, height: i32, obstacles: usize, items: usize) -> RoomConfig {
    RoomConfig {
        room_width: width,
        room_height: height,
        generate_random_obstacles: true,
        obstacle_count: obstacles,
        generate_random_items: true,
        item_count: items,
        frame_camera: false,
    }
}

fn generate(config: RoomConfig, seed: u64) -> Result<Vec<Placement<char>>, GenerationError> {
    let resolver = prototypes();
    let mut sink = Vec::new();
    RoomBuilder::new(config, &resolver).build(&mut StdRng::seed_from_u64(seed), &mut sink)?;
    Ok(sink)
}

fn entry(category: Category, x: i32, y: i32) -> RoomObjectEntry {
    RoomObjectEntry {
        category,
        position: GridPosition::new(x, y),
    }
}

#[derive(Default)]
struct Viewport {
    frames: Vec<CameraFrame>,
}

impl CameraTarget for Viewport {
    fn aspect(&self) -> f32 {
        1.0
    }

    fn apply(&mut self, frame: CameraFrame) {
        self.frames.push(frame);
    }
}

// ── Procedural rooms ───────────────────────────────────────────────────

#[test]
fn default_room_scenario() {
    let sink = generate(procedural(10, 8, 5, 3), 2024).unwrap();
    assert_eq!(sink.len(), 40);

    let walls: Vec<GridPosition> = sink
        .iter()
        .filter(|p| p.category == Category::Wall)
        .map(|p| p.position)
        .collect();
    assert_eq!(walls.len(), 32);
    assert!(
        walls
            .iter()
            .all(|p| p.x == 0 || p.x == 9 || p.y == 0 || p.y == 7)
    );

    let random: Vec<&Placement<char>> = sink
        .iter()
        .filter(|p| p.category != Category::Wall)
        .collect();
    assert_eq!(random.len(), 8);
    for placement in &random {
        let p = placement.position;
        assert!((1..=8).contains(&p.x), "{p:?} outside interior");
        assert!((1..=6).contains(&p.y), "{p:?} outside interior");
    }
    assert_eq!(
        random
            .iter()
            .filter(|p| p.category == Category::Obstacle)
            .count(),
        5
    );

    let all: HashSet<GridPosition> = sink.iter().map(|p| p.position).collect();
    assert_eq!(all.len(), sink.len(), "two placements share a cell");
}

#[test]
fn procedural_placements_never_overlap() {
    for seed in 0..50 {
        for (w, h, o, i) in [(10, 8, 5, 3), (5, 5, 6, 3), (12, 3, 4, 6), (3, 3, 1, 0)] {
            let sink = generate(procedural(w, h, o, i), seed).unwrap();
            let cells: HashSet<GridPosition> = sink.iter().map(|p| p.position).collect();
            assert_eq!(cells.len(), sink.len(), "overlap for seed {seed} in {w}x{h}");
        }
    }
}

#[test]
fn full_interior_request_terminates() {
    let bounds = InteriorBounds::new(7, 6).unwrap();
    let capacity = bounds.capacity();
    let sink = generate(procedural(7, 6, capacity - 3, 3), 11).unwrap();

    let interior: HashSet<GridPosition> = sink
        .iter()
        .filter(|p| p.category != Category::Wall)
        .map(|p| p.position)
        .collect();
    assert_eq!(interior.len(), capacity);
    assert!(interior.iter().all(|p| bounds.contains(*p)));
}

#[test]
fn item_is_rejected_when_obstacles_fill_interior() {
    let capacity = InteriorBounds::new(10, 8).unwrap().capacity();
    assert_eq!(
        generate(procedural(10, 8, capacity, 1), 0),
        Err(GenerationError::Overcrowded {
            category: Category::Item,
            requested: 1,
            available: 0,
        })
    );
}

#[test]
fn over_dense_request_is_rejected() {
    assert!(matches!(
        generate(procedural(4, 4, 5, 0), 0),
        Err(GenerationError::Overcrowded {
            category: Category::Obstacle,
            ..
        })
    ));
}

#[test]
fn invalid_dimensions_are_rejected() {
    assert_eq!(
        generate(procedural(1, 1, 0, 0), 0),
        Err(GenerationError::InvalidDimensions {
            width: 1,
            height: 1
        })
    );
    assert_eq!(
        generate(procedural(2, 9, 0, 1), 0),
        Err(GenerationError::EmptyInterior {
            width: 2,
            height: 9
        })
    );
}

#[test]
fn same_seed_same_room() {
    let a = generate(procedural(10, 8, 5, 3), 77).unwrap();
    let b = generate(procedural(10, 8, 5, 3), 77).unwrap();
    assert_eq!(a, b);
}

#[test]
fn walls_without_prototype_still_block_random_placement() {
    let resolver = prototypes().with(Category::Wall, None);
    let bounds = InteriorBounds::new(5, 4).unwrap();

    for seed in 0..20 {
        let mut sink: Vec<Placement<char>> = Vec::new();
        // Fills the whole 3x2 interior, so any wall cell drawn would be a collision.
        let report = RoomBuilder::new(procedural(5, 4, 4, 2), &resolver)
            .build(&mut StdRng::seed_from_u64(seed), &mut sink)
            .unwrap();

        assert_eq!(report.tally.walls, 0);
        assert_eq!(report.tally.skipped, 2 * 5 + 2 * (4 - 2));
        assert_eq!(report.occupied, 5 * 4);
        assert_eq!(sink.len(), bounds.capacity());
        assert!(sink.iter().all(|p| p.category != Category::Wall));
        assert!(sink.iter().all(|p| bounds.contains(p.position)));
        let cells: HashSet<GridPosition> = sink.iter().map(|p| p.position).collect();
        assert_eq!(cells.len(), sink.len());
    }
}

#[test]
fn huge_obstacle_count_is_rejected_before_placing() {
    let resolver = prototypes();
    let config = RoomConfig {
        obstacle_count: usize::MAX,
        item_count: 1,
        ..RoomConfig::default()
    };
    let mut sink: Vec<Placement<char>> = Vec::new();

    let result =
        RoomBuilder::new(config, &resolver).build(&mut StdRng::seed_from_u64(0), &mut sink);

    assert!(matches!(
        result,
        Err(GenerationError::Overcrowded {
            category: Category::Obstacle,
            ..
        })
    ));
    assert!(sink.is_empty());
}

// ── Layout replay ──────────────────────────────────────────────────────

#[test]
fn duplicate_cell_layout_scenario() {
    let layout = RoomLayoutAsset {
        width: 4,
        height: 4,
        objects: vec![
            entry(Category::Wall, 1, 1),
            entry(Category::Obstacle, 2, 2),
            entry(Category::Item, 2, 2),
        ],
    };
    let resolver = prototypes();
    let mut sink: Vec<Placement<char>> = Vec::new();

    let report = RoomBuilder::new(RoomConfig::default(), &resolver)
        .with_layout(Some(&layout))
        .build(&mut StdRng::seed_from_u64(0), &mut sink)
        .unwrap();

    let at_shared_cell: Vec<Category> = sink
        .iter()
        .filter(|p| p.position == GridPosition::new(2, 2))
        .map(|p| p.category)
        .collect();
    assert_eq!(at_shared_cell, vec![Category::Obstacle, Category::Item]);
    assert_eq!(sink.len(), 3);
    assert_eq!(report.occupied, 2);
}

#[test]
fn replay_is_deterministic() {
    let layout = load_layout_from_map(
        "
        WL WL WL WL WL
        WL IT BL OB WL
        WL BL OB BL WL
        WL WL WL WL WL
        ",
    )
    .unwrap();
    let resolver = prototypes();

    let mut runs = Vec::new();
    for seed in [1, 2] {
        let mut sink: Vec<Placement<char>> = Vec::new();
        RoomBuilder::new(RoomConfig::default(), &resolver)
            .with_layout(Some(&layout))
            .build(&mut StdRng::seed_from_u64(seed), &mut sink)
            .unwrap();
        runs.push(sink);
    }
    assert_eq!(runs[0], runs[1]);
    assert_eq!(runs[0].len(), 17);
}

#[test]
fn replay_without_item_prototype_keeps_cells() {
    let layout = RoomLayoutAsset {
        width: 3,
        height: 3,
        objects: vec![entry(Category::Item, 1, 1), entry(Category::Wall, 0, 0)],
    };
    let resolver = prototypes().with(Category::Item, None);
    let mut sink: Vec<Placement<char>> = Vec::new();

    let report = RoomBuilder::new(RoomConfig::default(), &resolver)
        .with_layout(Some(&layout))
        .build(&mut StdRng::seed_from_u64(0), &mut sink)
        .unwrap();

    assert_eq!(report.branch, Branch::Layout);
    assert_eq!(report.tally.skipped, 1);
    assert_eq!(report.occupied, 2);
    assert_eq!(sink.len(), 1);
}

// ── Camera and hosts ───────────────────────────────────────────────────

#[test]
fn camera_is_framed_once_after_generation() {
    let resolver = prototypes();
    let mut viewport = Viewport::default();
    let mut sink: Vec<Placement<char>> = Vec::new();

    let report = RoomBuilder::new(RoomConfig::default(), &resolver)
        .with_camera(&mut viewport)
        .build(&mut StdRng::seed_from_u64(5), &mut sink)
        .unwrap();

    assert_eq!(viewport.frames.len(), 1);
    assert_eq!(report.camera, Some(viewport.frames[0]));
    assert_eq!(viewport.frames[0].center_x, 4.5);
    assert_eq!(viewport.frames[0].center_y, 3.5);
}

#[test]
fn missing_camera_does_not_fail_generation() {
    let resolver = prototypes();
    let mut sink: Vec<Placement<char>> = Vec::new();

    let report = RoomBuilder::new(RoomConfig::default(), &resolver)
        .build(&mut StdRng::seed_from_u64(5), &mut sink)
        .unwrap();

    assert_eq!(report.camera, None);
    assert_eq!(report.tally.emitted(), 40);
}

#[test]
fn grid_sink_rasterizes_room() {
    let resolver = prototypes();
    let config = procedural(6, 4, 2, 1);
    let mut grid: Grid<Option<char>> = Grid::new(config.room_width, config.room_height);

    RoomBuilder::new(config, &resolver)
        .build(&mut StdRng::seed_from_u64(3), &mut grid)
        .unwrap();

    let top: String = grid.rows_top_down().next().unwrap().iter().flatten().collect();
    assert_eq!(top, "######");
    let filled = grid.enumerate().filter(|(_, cell)| cell.is_some()).count();
    assert_eq!(filled, 16 + 3);
}
