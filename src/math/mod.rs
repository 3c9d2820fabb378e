use nalgebra::{Vector3, Vector4};

pub type Mat4 = nalgebra::Matrix4<f32>;
pub type Vec4 = Vector4<f32>;

pub mod projections {
    use super::Mat4;

    /// Build an orthographic projection matrix which transforms the given
    /// coordinate bounds to the OpenGL-style view volume.
    /// e.g. Input Values will be bounded by:
    ///  - x in [left, right]
    ///  - y in [bottom, top]
    ///  - z in [near, far]
    ///
    /// Output coordinates will be transformed to:
    ///  - left -> -1.0, right -> 1.0
    ///  - bottom -> -1.0, top -> 1.0
    ///  - near -> -1.0, far -> 1.0
    ///
    /// Passing `bottom = height` and `top = 0` gives a screen-space
    /// projection where y grows downward.
    pub fn ortho(
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> Mat4 {
        let mh = 2.0 / (right - left);
        let bh = (right + left) / (left - right);
        let mv = 2.0 / (top - bottom);
        let bv = (top + bottom) / (bottom - top);
        let mz = -2.0 / (far - near);
        let bz = (far + near) / (near - far);
        Mat4::new(
            mh, 0.0, 0.0, bh, //
            0.0, mv, 0.0, bv, //
            0.0, 0.0, mz, bz, //
            0.0, 0.0, 0.0, 1.0,
        )
    }
}

/// The model-view transform for a sprite: scale about the origin, then
/// translate to `(x, y)`.
pub fn translate_scale(x: f32, y: f32, scale: f32) -> Mat4 {
    Mat4::new_translation(&Vector3::new(x, y, 0.0))
        * Mat4::new_nonuniform_scaling(&Vector3::new(scale, scale, 1.0))
}

/// Apply a transform to a point with w = 1.
pub fn transform_point(transform: &Mat4, point: [f32; 3]) -> Vec4 {
    transform * Vec4::new(point[0], point[1], point[2], 1.0)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn screen_ortho_maps_corners_to_clip_space() {
        let projection = projections::ortho(0.0, 480.0, 800.0, 0.0, -1.0, 1.0);

        let top_left = transform_point(&projection, [0.0, 0.0, 0.0]);
        assert!((top_left.x + 1.0).abs() < 1e-6);
        assert!((top_left.y - 1.0).abs() < 1e-6);

        let bottom_right = transform_point(&projection, [480.0, 800.0, 0.0]);
        assert!((bottom_right.x - 1.0).abs() < 1e-6);
        assert!((bottom_right.y + 1.0).abs() < 1e-6);
    }

    #[test]
    fn translate_scale_scales_before_translating() {
        let model = translate_scale(100.0, 50.0, 0.5);

        let corner = transform_point(&model, [32.0, 32.0, 0.0]);

        assert!((corner.x - 116.0).abs() < 1e-6);
        assert!((corner.y - 66.0).abs() < 1e-6);
    }
}
