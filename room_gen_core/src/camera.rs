use serde::{Deserialize, Serialize};

/// Where a camera should look to show a whole room.
///
/// Coordinates are in cell units; tiles sit on integer coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraFrame {
    pub center_x: f32,
    pub center_y: f32,
    /// Half of the visible height, as an orthographic camera size.
    pub half_height: f32,
}

/// Something that can be pointed at a finished room.
pub trait CameraTarget {
    /// Width over height of the view.
    fn aspect(&self) -> f32;

    /// Extra cells of margin around the room.
    fn padding(&self) -> f32 {
        1.0
    }

    fn apply(&mut self, frame: CameraFrame);
}

/// Computes a frame that centers a `width` x `height` room and fits it in view.
pub fn frame_room(width: i32, height: i32, aspect: f32, padding: f32) -> CameraFrame {
    let width = width.max(0) as f32;
    let height = height.max(0) as f32;
    let aspect = if aspect.is_finite() && aspect > 0.0 {
        aspect
    } else {
        1.0
    };
    let fit_height = height / 2.0;
    let fit_width = width / (2.0 * aspect);
    CameraFrame {
        center_x: (width - 1.0) / 2.0,
        center_y: (height - 1.0) / 2.0,
        half_height: fit_height.max(fit_width) + padding,
    }
}

/// Frames `target` around the room, if there is one.
///
/// A missing target is reported and otherwise ignored.
pub fn frame_camera(
    width: i32,
    height: i32,
    target: Option<&mut dyn CameraTarget>,
) -> Option<CameraFrame> {
    match target {
        Some(target) => {
            let frame = frame_room(width, height, target.aspect(), target.padding());
            target.apply(frame);
            log::debug!("Camera framed at {frame:?}");
            Some(frame)
        }
        None => {
            log::warn!("No camera target to frame the {width}x{height} room");
            None
        }
    }
}
