/// Camera built on the view-matrix formulas
use nalgebra::{Matrix4, Point3, Vector3, Vector4};

use crate::view_matrix;

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

/// Camera configuration for 3D rendering
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view in degrees
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub mode: ProjectionMode,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 5.0),
            target: Point3::origin(),
            up: Vector3::y(),
            fov_y: 45.0,
            aspect: width as f32 / height.max(1) as f32,
            near: 0.1,
            far: 100.0,
            mode: ProjectionMode::Perspective,
        }
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        match self.mode {
            ProjectionMode::Perspective => {
                view_matrix::perspective(self.fov_y, self.aspect, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                // keep the target roughly the same size as in perspective
                let height = (self.position - self.target).norm();
                let width = height * self.aspect;
                view_matrix::orthographic_rect(
                    -width / 2.0,
                    width / 2.0,
                    -height / 2.0,
                    height / 2.0,
                    self.near,
                    self.far,
                )
            }
        }
    }

    /// Project a model-space point to screen space.
    ///
    /// Returns `(x, y, depth)` with `y` growing downwards, or `None` when the
    /// point lies behind the camera or outside the clip volume.
    pub fn project_to_screen(
        &self,
        point: &Point3<f32>,
        model_matrix: &Matrix4<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        let mvp = self.projection_matrix() * self.view_matrix() * model_matrix;
        let clip = mvp * point.to_homogeneous();

        if clip.w <= f32::EPSILON {
            return None;
        }

        let ndc = clip.xyz() / clip.w;
        if ndc.iter().any(|c| !(-1.0..=1.0).contains(c)) {
            return None;
        }

        let viewport = view_matrix::viewport(0.0, 0.0, width as f32, height as f32);
        let screen = viewport * Vector4::new(ndc.x, ndc.y, ndc.z, 1.0);

        Some((screen.x, height as f32 - screen.y, ndc.z))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(800, 600);
        assert_eq!(camera.mode, ProjectionMode::Perspective);
        assert_relative_eq!(camera.aspect, 800.0 / 600.0);
    }

    #[test]
    fn test_perspective_uses_view_matrix_formula() {
        let camera = Camera::new(800, 600);
        let expected = view_matrix::perspective(45.0, camera.aspect, 0.1, 100.0);
        assert_eq!(camera.projection_matrix(), expected);
    }

    #[test]
    fn test_target_projects_to_screen_centre() {
        let camera = Camera::new(80, 40);
        let (x, y, depth) = camera
            .project_to_screen(&Point3::origin(), &Matrix4::identity(), 80, 40)
            .unwrap();
        assert_relative_eq!(x, 40.0, epsilon = 1e-4);
        assert_relative_eq!(y, 20.0, epsilon = 1e-4);
        assert!(depth > -1.0 && depth < 1.0);
    }

    #[test]
    fn test_screen_y_grows_downwards() {
        let camera = Camera::new(80, 40);
        let (_, y, _) = camera
            .project_to_screen(&Point3::new(0.0, 1.0, 0.0), &Matrix4::identity(), 80, 40)
            .unwrap();
        assert!(y < 20.0);
    }

    #[test]
    fn test_point_behind_camera_is_rejected() {
        let camera = Camera::new(80, 40);
        let behind = Point3::new(0.0, 0.0, 10.0);
        assert!(camera
            .project_to_screen(&behind, &Matrix4::identity(), 80, 40)
            .is_none());
    }

    #[test]
    fn test_orthographic_keeps_target_centred() {
        let mut camera = Camera::new(100, 100);
        camera.mode = ProjectionMode::Orthographic;
        let (x, y, _) = camera
            .project_to_screen(&Point3::origin(), &Matrix4::identity(), 100, 100)
            .unwrap();
        assert_relative_eq!(x, 50.0, epsilon = 1e-4);
        assert_relative_eq!(y, 50.0, epsilon = 1e-4);
    }
}
