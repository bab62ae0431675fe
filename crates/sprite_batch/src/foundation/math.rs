//! Math utilities and types
//!
//! Provides the vector and matrix aliases used by the batcher.

pub use nalgebra::{Matrix4, Vector2, Vector3};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// Extension trait for Mat4 with projection helpers
pub trait Mat4Ext {
    /// Create an off-center orthographic projection
    ///
    /// Right-handed, column-vector convention. Maps `left..right` to `-1..1`,
    /// `bottom..top` to `-1..1` and view depth `-near..-far` to `0..1`.
    /// Passing `bottom > top` gives a Y-down screen space with the origin at
    /// the top-left corner.
    fn orthographic_off_center(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn orthographic_off_center(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
        // [2/(r-l)   0         0          (l+r)/(l-r)]
        // [0         2/(t-b)   0          (t+b)/(b-t)]
        // [0         0         1/(n-f)    n/(n-f)    ]
        // [0         0         0          1          ]
        Mat4::new(
            2.0 / (right - left), 0.0, 0.0, (left + right) / (left - right),
            0.0, 2.0 / (top - bottom), 0.0, (top + bottom) / (bottom - top),
            0.0, 0.0, 1.0 / (near - far), near / (near - far),
            0.0, 0.0, 0.0, 1.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    #[test]
    fn test_orthographic_maps_screen_corners() {
        let projection = Mat4::orthographic_off_center(0.0, 800.0, 600.0, 0.0, 0.0, 1.0);

        let top_left = projection.transform_point(&Point3::new(0.0, 0.0, 0.0));
        assert_relative_eq!(top_left, Point3::new(-1.0, 1.0, 0.0), epsilon = 1e-6);

        let bottom_right = projection.transform_point(&Point3::new(800.0, 600.0, 0.0));
        assert_relative_eq!(bottom_right, Point3::new(1.0, -1.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_orthographic_depth_range() {
        let projection = Mat4::orthographic_off_center(0.0, 1.0, 1.0, 0.0, 0.0, 1.0);

        let near = projection.transform_point(&Point3::new(0.0, 0.0, 0.0));
        let far = projection.transform_point(&Point3::new(0.0, 0.0, -1.0));
        assert_relative_eq!(near.z, 0.0, epsilon = 1e-6);
        assert_relative_eq!(far.z, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_orthographic_offset_viewport() {
        let projection = Mat4::orthographic_off_center(100.0, 300.0, 250.0, 50.0, 0.0, 1.0);

        let center = projection.transform_point(&Point3::new(200.0, 150.0, 0.0));
        assert_relative_eq!(center, Point3::new(0.0, 0.0, 0.0), epsilon = 1e-6);
    }
}
