use glam::{Mat4, Vec3};
use paperstar_render::RenderView;

/// Keeps the polar angle off the poles, where the up vector degenerates.
const POLAR_EPSILON: f32 = 1e-3;

/// Orbit camera circling a target point.
///
/// The eye sits at `distance` from `target`, at `azimuth` around +Y
/// (0 looks down -Z from +Z) and `polar` from +Y.
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    pub azimuth: f32,
    pub polar: f32,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Radians per pixel of drag.
    pub sensitivity: f32,
    /// Target offset per pixel of drag, per unit of distance.
    pub pan_speed: f32,
    /// Distance multiplier for one scroll step towards the target.
    pub dolly_factor: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::from_view(&RenderView::default())
    }
}

impl OrbitCamera {
    /// Place the camera so its eye and target match `view`.
    pub fn from_view(view: &RenderView) -> Self {
        let offset = view.eye - view.target;
        let distance = offset.length().max(f32::EPSILON);
        Self {
            target: view.target,
            distance,
            azimuth: offset.x.atan2(offset.z),
            polar: (offset.y / distance).clamp(-1.0, 1.0).acos(),
            fov: view.fov_degrees.to_radians(),
            aspect: 16.0 / 9.0,
            near: view.near,
            far: view.far,
            sensitivity: 0.005,
            pan_speed: 0.0015,
            dolly_factor: 0.95,
            min_distance: 1.0,
            max_distance: view.far * 0.5,
        }
    }

    pub fn eye(&self) -> Vec3 {
        let (sin_p, cos_p) = self.polar.sin_cos();
        let (sin_a, cos_a) = self.azimuth.sin_cos();
        self.target + Vec3::new(sin_p * sin_a, cos_p, sin_p * cos_a) * self.distance
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.eye()).normalize_or_zero()
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize_or_zero()
    }

    pub fn up(&self) -> Vec3 {
        self.right().cross(self.forward())
    }

    /// Orbit by a mouse drag of `dx`, `dy` pixels.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.azimuth -= dx * self.sensitivity;
        self.polar -= dy * self.sensitivity;
        self.polar = self
            .polar
            .clamp(POLAR_EPSILON, std::f32::consts::PI - POLAR_EPSILON);
    }

    /// Dolly by `scroll` wheel steps; positive moves towards the target.
    pub fn zoom(&mut self, scroll: f32) {
        self.distance = (self.distance * self.dolly_factor.powf(scroll))
            .clamp(self.min_distance, self.max_distance);
    }

    /// Slide eye and target together by a drag of `dx`, `dy` pixels.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let scale = self.distance * self.pan_speed;
        self.target += (self.up() * dy - self.right() * dx) * scale;
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f32 / height as f32;
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

    /// Current eye and target as a renderer-agnostic view.
    pub fn to_view(&self) -> RenderView {
        RenderView {
            eye: self.eye(),
            target: self.target,
            fov_degrees: self.fov.to_degrees(),
            near: self.near,
            far: self.far,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_view_reproduces_eye() {
        let view = RenderView::default();
        let cam = OrbitCamera::from_view(&view);
        assert!((cam.eye() - view.eye).length() < 1e-3);
        assert!((cam.fov - 75.0_f32.to_radians()).abs() < 1e-6);
        let vp = cam.view_projection();
        assert!(!vp.col(0).x.is_nan());
    }

    #[test]
    fn rotation_keeps_distance() {
        let mut cam = OrbitCamera::default();
        let before = cam.distance;
        cam.rotate(120.0, -40.0);
        assert!(((cam.eye() - cam.target).length() - before).abs() < 1e-3);
    }

    #[test]
    fn polar_angle_stays_off_the_poles() {
        let mut cam = OrbitCamera::default();
        cam.rotate(0.0, 1e6);
        assert!(cam.polar >= POLAR_EPSILON);
        cam.rotate(0.0, -1e6);
        assert!(cam.polar <= std::f32::consts::PI - POLAR_EPSILON);
        assert!(!cam.view_matrix().col(0).x.is_nan());
    }

    #[test]
    fn zoom_in_shrinks_distance() {
        let mut cam = OrbitCamera::default();
        let before = cam.distance;
        cam.zoom(1.0);
        assert!((cam.distance - before * 0.95).abs() < 1e-4);
        cam.zoom(-2.0);
        assert!(cam.distance > before);
        cam.zoom(1000.0);
        assert_eq!(cam.distance, cam.min_distance);
    }

    #[test]
    fn pan_moves_eye_and_target_together() {
        let mut cam = OrbitCamera::default();
        let offset = cam.eye() - cam.target;
        cam.pan(30.0, 10.0);
        assert_ne!(cam.target, Vec3::ZERO);
        assert!(((cam.eye() - cam.target) - offset).length() < 1e-3);
    }

    #[test]
    fn aspect_ignores_zero_height() {
        let mut cam = OrbitCamera::default();
        cam.set_aspect(1280, 720);
        assert!((cam.aspect - 1280.0 / 720.0).abs() < 1e-6);
        cam.set_aspect(10, 0);
        assert!((cam.aspect - 1280.0 / 720.0).abs() < 1e-6);
    }
}
