use glam::{Mat4, Vec3};
use skatepark_render::RenderView;

/// Orbit camera circling a target point.
///
/// Camera motion is a debugging aid and does not feed back into the stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    /// Angle about +Y measured from +X, radians.
    pub yaw: f32,
    /// Elevation above the XZ plane, radians.
    pub pitch: f32,
    /// Vertical field of view, radians.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub sensitivity: f32,
    pub zoom_speed: f32,
}

const MIN_DISTANCE: f32 = 1.0;
const MAX_DISTANCE: f32 = 500.0;
const PITCH_LIMIT: f32 = 1.5;

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::from_view(&RenderView::default(), 16.0 / 9.0)
    }
}

impl OrbitCamera {
    /// Place the camera at `view.eye` orbiting `view.target`.
    pub fn from_view(view: &RenderView, aspect: f32) -> Self {
        let offset = view.eye - view.target;
        let distance = offset.length().max(MIN_DISTANCE);
        Self {
            target: view.target,
            distance,
            yaw: offset.z.atan2(offset.x),
            pitch: (offset.y / distance).clamp(-1.0, 1.0).asin(),
            fov: view.fov_degrees.to_radians(),
            aspect,
            near: view.near,
            far: view.far,
            sensitivity: 0.005,
            zoom_speed: 0.1,
        }
    }

    pub fn eye(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        self.target + Vec3::new(cp * cy, sp, cp * sy) * self.distance
    }

    /// Orbit by a mouse delta in pixels.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.pitch = (self.pitch + dy * self.sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Positive `steps` zoom in.
    pub fn zoom(&mut self, steps: f32) {
        let factor = (1.0 - self.zoom_speed).powf(steps);
        self.distance = (self.distance * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    pub fn view(&self) -> RenderView {
        RenderView {
            eye: self.eye(),
            target: self.target,
            fov_degrees: self.fov.to_degrees(),
            near: self.near,
            far: self.far,
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_camera_starts_at_the_configured_eye() {
        let cam = OrbitCamera::default();
        assert!((cam.eye() - Vec3::new(-5.0, 5.0, 0.0)).length() < 1e-4);
        assert_eq!(cam.target, Vec3::new(10.0, 0.0, 0.0));
        assert!((cam.fov.to_degrees() - 75.0).abs() < 1e-4);
        assert!(!cam.view_projection().col(0).x.is_nan());
    }

    #[test]
    fn rotation_keeps_distance() {
        let mut cam = OrbitCamera::default();
        let before = cam.eye().distance(cam.target);
        cam.rotate(120.0, -40.0);
        assert!((cam.eye().distance(cam.target) - before).abs() < 1e-3);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut cam = OrbitCamera::default();
        cam.rotate(0.0, 10_000.0);
        assert_eq!(cam.pitch, PITCH_LIMIT);
    }

    #[test]
    fn zoom_stays_in_range() {
        let mut cam = OrbitCamera::default();
        let start = cam.distance;
        cam.zoom(1.0);
        assert!(cam.distance < start);
        cam.zoom(-1000.0);
        assert_eq!(cam.distance, MAX_DISTANCE);
        cam.zoom(1000.0);
        assert_eq!(cam.distance, MIN_DISTANCE);
    }

    #[test]
    fn view_round_trips_the_eye() {
        let cam = OrbitCamera::default();
        let view = cam.view();
        assert!((view.eye - cam.eye()).length() < 1e-5);
        assert_eq!(view.target, cam.target);
    }
}
