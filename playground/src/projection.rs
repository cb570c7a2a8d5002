use cgmath::{Deg, Matrix4, Point3, Vector3};

pub const OFFSCREEN_NEAR: f32 = 1.5;
pub const OFFSCREEN_FAR: f32 = 300.0;

pub const SCREEN_NEAR: f32 = -10.0;
pub const SCREEN_FAR: f32 = 200.0;

/// Camera distance for passes that end up on screen.
pub const SCREEN_EYE_Z: f32 = 5.0;
/// The off-screen pass looks from further away so the square fits the texture.
pub const OFFSCREEN_EYE_Z: f32 = 9.0;

pub fn aspect(width: u32, height: u32) -> f32 {
    width as f32 / height as f32
}

/// Perspective used while rendering into the off-screen target.
pub fn offscreen_projection(width: u32, height: u32) -> Matrix4<f32> {
    let ratio = aspect(width, height);

    cgmath::frustum(-ratio, ratio, -1.0, 1.0, OFFSCREEN_NEAR, OFFSCREEN_FAR)
}

/// Orthographic projection keeping the short side of the surface at [-1, 1].
pub fn screen_projection(width: u32, height: u32) -> Matrix4<f32> {
    if width > height {
        let ratio = aspect(width, height);
        cgmath::ortho(-ratio, ratio, -1.0, 1.0, SCREEN_NEAR, SCREEN_FAR)
    } else {
        let ratio = aspect(height, width);
        cgmath::ortho(-1.0, 1.0, -ratio, ratio, SCREEN_NEAR, SCREEN_FAR)
    }
}

pub fn view_from(z: f32) -> Matrix4<f32> {
    Matrix4::look_at_rh(
        Point3::new(0.0, 0.0, z),
        Point3::new(0.0, 0.0, 0.0),
        Vector3::unit_y(),
    )
}

/// Rotation around X followed by rotation around Y, both in degrees.
pub fn model_rotation(angle_x: f32, angle_y: f32) -> Matrix4<f32> {
    Matrix4::from_angle_x(Deg(angle_x)) * Matrix4::from_angle_y(Deg(angle_y))
}

/// Stretches the unit display quad to the aspect of the texture it shows.
pub fn display_model(width: u32, height: u32) -> Matrix4<f32> {
    Matrix4::from_nonuniform_scale(aspect(width, height), 1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{SquareMatrix, Vector4};

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn offscreen_projection_is_frustum() {
        let m = offscreen_projection(1920, 1080);
        let ratio = 1920.0 / 1080.0;

        assert!(close(m.x.x, 2.0 * OFFSCREEN_NEAR / (2.0 * ratio)));
        assert!(close(m.y.y, OFFSCREEN_NEAR));
        assert!(close(
            m.z.z,
            -(OFFSCREEN_FAR + OFFSCREEN_NEAR) / (OFFSCREEN_FAR - OFFSCREEN_NEAR)
        ));
        assert!(close(m.z.w, -1.0));
        assert!(close(
            m.w.z,
            -2.0 * OFFSCREEN_FAR * OFFSCREEN_NEAR / (OFFSCREEN_FAR - OFFSCREEN_NEAR)
        ));
        assert!(close(m.w.w, 0.0));
    }

    #[test]
    fn screen_projection_follows_orientation() {
        let landscape = screen_projection(1600, 800);
        assert!(close(landscape.x.x, 0.5));
        assert!(close(landscape.y.y, 1.0));

        let portrait = screen_projection(800, 1600);
        assert!(close(portrait.x.x, 1.0));
        assert!(close(portrait.y.y, 0.5));

        let square = screen_projection(500, 500);
        assert!(close(square.x.x, 1.0));
        assert!(close(square.y.y, 1.0));
    }

    #[test]
    fn view_moves_origin_in_front_of_camera() {
        let origin = view_from(SCREEN_EYE_Z) * Vector4::new(0.0, 0.0, 0.0, 1.0);

        assert!(close(origin.x, 0.0));
        assert!(close(origin.y, 0.0));
        assert!(close(origin.z, -SCREEN_EYE_Z));
    }

    #[test]
    fn zero_rotation_is_identity() {
        assert_eq!(model_rotation(0.0, 0.0), Matrix4::identity());
    }

    #[test]
    fn rotation_about_y_turns_x_into_minus_z() {
        let v = model_rotation(0.0, 90.0) * Vector4::new(1.0, 0.0, 0.0, 0.0);

        assert!(close(v.x, 0.0));
        assert!(close(v.z, -1.0));
    }

    #[test]
    fn display_model_scales_x_only() {
        let m = display_model(1280, 640);

        assert!(close(m.x.x, 2.0));
        assert!(close(m.y.y, 1.0));
        assert!(close(m.z.z, 1.0));
    }
}
