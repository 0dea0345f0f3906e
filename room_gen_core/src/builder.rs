use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    Category, GenerationError,
    camera::{CameraFrame, CameraTarget, frame_camera},
    config::RoomConfig,
    layout::{RoomLayoutAsset, replay_layout},
    occupancy::OccupancySet,
    placement::{PlacementSink, PlacementTally, PrototypeResolver},
    placer::place_random,
    walls::build_wall_ring,
};

/// Which way a room was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Branch {
    /// Replayed from a layout asset.
    Layout,
    /// Wall ring plus random obstacles and items.
    Procedural,
}

/// Summary of a completed generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub branch: Branch,
    pub width: i32,
    pub height: i32,
    pub tally: PlacementTally,
    /// Distinct cells claimed during the run.
    pub occupied: usize,
    /// The frame applied to the camera target, if one was framed.
    pub camera: Option<CameraFrame>,
}

/// Lays out one room, either from a layout asset or procedurally.
///
/// `build` consumes the builder: a run goes from unstarted to complete in one call.
pub struct RoomBuilder<'a, R: PrototypeResolver + ?Sized> {
    config: RoomConfig,
    resolver: &'a R,
    layout: Option<&'a RoomLayoutAsset>,
    camera: Option<&'a mut dyn CameraTarget>,
}

impl<'a, R: PrototypeResolver + ?Sized> RoomBuilder<'a, R> {
    pub fn new(config: RoomConfig, resolver: &'a R) -> Self {
        RoomBuilder {
            config,
            resolver,
            layout: None,
            camera: None,
        }
    }

    /// Supplies the layout asset; `None` selects procedural generation.
    pub fn with_layout(mut self, layout: Option<&'a RoomLayoutAsset>) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_camera(mut self, camera: &'a mut dyn CameraTarget) -> Self {
        self.camera = Some(camera);
        self
    }

    /// Runs the generation pass, emitting every placement into `sink`.
    ///
    /// Procedural configs are validated before any cell is claimed, so an error leaves
    /// the sink untouched.
    pub fn build<G, S>(self, rng: &mut G, sink: &mut S) -> Result<GenerationReport, GenerationError>
    where
        G: Rng + ?Sized,
        S: PlacementSink<R::Prototype> + ?Sized,
    {
        let RoomBuilder {
            config,
            resolver,
            layout,
            camera,
        } = self;

        let mut occupancy = OccupancySet::new();
        let mut tally = PlacementTally::default();

        let (branch, width, height) = match layout {
            Some(layout) => {
                replay_layout(layout, resolver, &mut occupancy, sink, &mut tally);
                (Branch::Layout, layout.width, layout.height)
            }
            None => {
                log::info!(
                    "No room layout supplied, generating a {}x{} room procedurally",
                    config.room_width,
                    config.room_height
                );
                let bounds = config.validate()?;

                build_wall_ring(
                    config.room_width,
                    config.room_height,
                    resolver,
                    &mut occupancy,
                    sink,
                    &mut tally,
                )?;

                if let Some(bounds) = bounds {
                    for (category, count) in [
                        (Category::Obstacle, config.requested_obstacles()),
                        (Category::Item, config.requested_items()),
                    ] {
                        if count > 0 {
                            place_random(
                                rng,
                                &bounds,
                                &mut occupancy,
                                count,
                                category,
                                resolver,
                                sink,
                                &mut tally,
                            )?;
                        }
                    }
                }
                (Branch::Procedural, config.room_width, config.room_height)
            }
        };

        let camera = if config.frame_camera {
            frame_camera(width, height, camera)
        } else {
            None
        };

        let report = GenerationReport {
            branch,
            width,
            height,
            tally,
            occupied: occupancy.len(),
            camera,
        };
        log::info!(
            "Room complete ({:?}): {} wall(s), {} obstacle(s), {} item(s), {} skipped",
            report.branch,
            tally.walls,
            tally.obstacles,
            tally.items,
            tally.skipped
        );
        Ok(report)
    }
}
