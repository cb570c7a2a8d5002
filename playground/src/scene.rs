use cgmath::Matrix4;

use crate::projection::{
    display_model, model_rotation, screen_projection, view_from, OFFSCREEN_EYE_Z, SCREEN_EYE_Z,
};

/// Degrees per pixel of horizontal drag.
pub const DRAG_SCALE_X: f32 = 180.0 / 1080.0;
/// Degrees per pixel of vertical drag.
pub const DRAG_SCALE_Y: f32 = 180.0 / 1920.0;

#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct SceneState {
    pub angle_x: f32,
    pub angle_y: f32,
}

impl SceneState {
    /// Applies a pointer move of `(dx, dy)` that ended at `(x, y)` on a surface
    /// of `width` x `height`.
    ///
    /// Dragging below the middle reverses the horizontal direction, dragging
    /// left of the middle reverses the vertical one, so the square follows the
    /// pointer around its center.
    pub fn drag(&mut self, (x, y): (f32, f32), (dx, dy): (f32, f32), width: u32, height: u32) {
        let mut dx = dx;
        let mut dy = dy;

        if y > (height / 2) as f32 {
            dx = -dx;
        }

        if x < (width / 2) as f32 {
            dy = -dy;
        }

        self.angle_x += dx * DRAG_SCALE_X;
        self.angle_y += dy * DRAG_SCALE_Y;
    }

    pub fn model(&self) -> Matrix4<f32> {
        model_rotation(self.angle_x, self.angle_y)
    }
}

/// Model-view-projection matrices for the three passes of a frame.
#[derive(Debug, Copy, Clone)]
pub struct FrameMatrices {
    /// Square drawn straight to the screen.
    pub screen: Matrix4<f32>,
    /// Square drawn into the off-screen target.
    pub offscreen: Matrix4<f32>,
    /// Display quad showing the off-screen target.
    pub display: Matrix4<f32>,
}

impl FrameMatrices {
    pub fn compute(
        state: &SceneState,
        (screen_width, screen_height): (u32, u32),
        offscreen_projection: Matrix4<f32>,
        (offscreen_width, offscreen_height): (u32, u32),
    ) -> Self {
        let projection = screen_projection(screen_width, screen_height);
        let view = view_from(SCREEN_EYE_Z);
        let model = state.model();

        let screen = projection * view * model;
        let offscreen = offscreen_projection * view_from(OFFSCREEN_EYE_Z) * model;
        let display = projection * view * display_model(offscreen_width, offscreen_height);

        Self {
            screen,
            offscreen,
            display,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::offscreen_projection;
    use cgmath::Vector4;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn drag_in_top_right_quadrant_keeps_direction() {
        let mut state = SceneState::default();
        state.drag((900.0, 100.0), (108.0, 192.0), 1080, 1920);

        assert!(close(state.angle_x, 18.0));
        assert!(close(state.angle_y, 18.0));
    }

    #[test]
    fn drag_in_bottom_left_quadrant_reverses_both() {
        let mut state = SceneState::default();
        state.drag((100.0, 1800.0), (108.0, 192.0), 1080, 1920);

        assert!(close(state.angle_x, -18.0));
        assert!(close(state.angle_y, -18.0));
    }

    #[test]
    fn odd_sizes_split_at_integer_middle() {
        let mut state = SceneState::default();
        state.drag((540.25, 100.0), (0.0, 192.0), 1081, 1920);
        assert!(close(state.angle_y, 18.0));

        let mut state = SceneState::default();
        state.drag((900.0, 960.25), (108.0, 0.0), 1080, 1921);
        assert!(close(state.angle_x, -18.0));
    }

    #[test]
    fn drags_accumulate() {
        let mut state = SceneState::default();
        state.drag((900.0, 100.0), (54.0, 0.0), 1080, 1920);
        state.drag((900.0, 100.0), (54.0, 0.0), 1080, 1920);

        assert!(close(state.angle_x, 18.0));
        assert!(close(state.angle_y, 0.0));
    }

    #[test]
    fn display_quad_keeps_texture_aspect() {
        let matrices = FrameMatrices::compute(
            &SceneState::default(),
            (1600, 800),
            offscreen_projection(1600, 800),
            (1600, 800),
        );

        // the quad corner (0.5, 0.5) is scaled to x = 1.0 in world space
        let corner = matrices.display * Vector4::new(0.5, 0.5, 0.0, 1.0);

        assert!(close(corner.x / corner.w, 0.5));
        assert!(close(corner.y / corner.w, 0.5));
    }

    #[test]
    fn offscreen_pass_sees_square_center_at_origin() {
        let matrices = FrameMatrices::compute(
            &SceneState {
                angle_x: 30.0,
                angle_y: 45.0,
            },
            (800, 800),
            offscreen_projection(800, 800),
            (800, 800),
        );

        let center = matrices.offscreen * Vector4::new(0.0, 0.0, 0.0, 1.0);

        assert!(close(center.x / center.w, 0.0));
        assert!(close(center.y / center.w, 0.0));
        assert!(close(center.w, OFFSCREEN_EYE_Z));
    }
}
