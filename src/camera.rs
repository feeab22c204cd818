use glam::{Mat4, Vec3};

use crate::components::LocalTransform;
use crate::config::CameraConfig;

/// Smallest polar angle the orbit camera may reach; keeps it off the pole.
const MIN_POLAR: f32 = 0.01;
/// Radians of orbit per pixel of mouse drag.
const ROTATE_SPEED: f32 = 0.005;
/// Radius factor per wheel notch.
const ZOOM_STEP: f32 = 0.95;

pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            position: Vec3::new(25.0, 10.0, 25.0),
            target: Vec3::ZERO,
            fov: config.fov,
            near: config.near,
            far: config.far,
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov.to_radians(), aspect, self.near, self.far)
    }
}

/// Places the camera behind and above a target, looking past it.
///
/// Both points are fixed in the target's local frame, so the camera turns
/// with the character. There is no smoothing: the camera snaps to the ideal
/// point every update.
pub struct ThirdPersonCamera {
    pub offset: Vec3,
    pub look_at: Vec3,
    enabled: bool,
}

impl ThirdPersonCamera {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            offset: config.offset,
            look_at: config.look_at,
            enabled: true,
        }
    }

    pub fn ideal_offset(&self, target: &LocalTransform) -> Vec3 {
        target.rotation * self.offset + target.position
    }

    pub fn ideal_look_at(&self, target: &LocalTransform) -> Vec3 {
        target.rotation * self.look_at + target.position
    }

    pub fn update(&self, camera: &mut Camera, target: &LocalTransform) {
        if !self.enabled {
            return;
        }
        camera.position = self.ideal_offset(target);
        camera.target = self.ideal_look_at(target);
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

/// Mouse-driven orbit around a point with damped rotation and clamped zoom.
pub struct OrbitCamera {
    pub target: Vec3,
    pub radius: f32,
    /// Angle around +Y, measured from +Z.
    pub azimuth: f32,
    /// Angle down from +Y.
    pub polar: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub max_polar: f32,
    /// Fraction of the pending rotation applied per update.
    pub damping: f32,
    pub rotate_enabled: bool,
    pub zoom_enabled: bool,
    pending_azimuth: f32,
    pending_polar: f32,
}

impl OrbitCamera {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            target: config.orbit_target,
            radius: config.orbit_min_distance,
            azimuth: 0.0,
            polar: std::f32::consts::FRAC_PI_4,
            min_distance: config.orbit_min_distance,
            max_distance: config.orbit_max_distance,
            max_polar: std::f32::consts::FRAC_PI_2,
            damping: config.orbit_damping,
            rotate_enabled: true,
            zoom_enabled: true,
            pending_azimuth: 0.0,
            pending_polar: 0.0,
        }
    }

    /// Take over from wherever `camera` currently is.
    pub fn sync_from(&mut self, camera: &Camera) {
        let offset = camera.position - self.target;
        let radius = offset.length();
        if radius > 1e-4 {
            self.radius = radius.clamp(self.min_distance, self.max_distance);
            self.azimuth = offset.x.atan2(offset.z);
            self.polar = (offset.y / radius).clamp(-1.0, 1.0).acos().clamp(MIN_POLAR, self.max_polar);
        }
        self.pending_azimuth = 0.0;
        self.pending_polar = 0.0;
    }

    pub fn rotate(&mut self, dx: f32, dy: f32) {
        if !self.rotate_enabled {
            return;
        }
        self.pending_azimuth -= dx * ROTATE_SPEED;
        self.pending_polar -= dy * ROTATE_SPEED;
    }

    pub fn zoom(&mut self, notches: f32) {
        if !self.zoom_enabled {
            return;
        }
        self.radius = (self.radius * ZOOM_STEP.powf(notches)).clamp(self.min_distance, self.max_distance);
    }

    pub fn update(&mut self, camera: &mut Camera) {
        self.azimuth += self.pending_azimuth * self.damping;
        self.polar = (self.polar + self.pending_polar * self.damping).clamp(MIN_POLAR, self.max_polar);
        self.pending_azimuth *= 1.0 - self.damping;
        self.pending_polar *= 1.0 - self.damping;

        camera.position = self.target + self.offset();
        camera.target = self.target;
    }

    fn offset(&self) -> Vec3 {
        let (sin_p, cos_p) = self.polar.sin_cos();
        let (sin_a, cos_a) = self.azimuth.sin_cos();
        Vec3::new(sin_p * sin_a, cos_p, sin_p * cos_a) * self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    fn config() -> CameraConfig {
        CameraConfig::default()
    }

    #[test]
    fn ideal_points_follow_target_rotation() {
        let tp = ThirdPersonCamera::new(&config());
        let target = LocalTransform::new(Vec3::new(5.0, 0.0, 0.0))
            .with_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));

        // Local -Z rotated 90° about Y lands on world -X.
        let offset = tp.ideal_offset(&target);
        assert!((offset - Vec3::new(-20.0, 10.0, 0.0)).length() < 1e-4);
        let look = tp.ideal_look_at(&target);
        assert!((look - Vec3::new(20.0, 0.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn disabled_third_person_leaves_camera_alone() {
        let mut tp = ThirdPersonCamera::new(&config());
        let mut camera = Camera::new(&config());
        let before = camera.position;
        tp.disable();
        tp.update(&mut camera, &LocalTransform::new(Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(camera.position, before);

        tp.enable();
        tp.update(&mut camera, &LocalTransform::default());
        assert_eq!(camera.position, Vec3::new(0.0, 10.0, -25.0));
        assert_eq!(camera.target, Vec3::new(0.0, 0.0, 15.0));
    }

    #[test]
    fn orbit_zoom_is_clamped() {
        let mut orbit = OrbitCamera::new(&config());
        orbit.zoom(-100.0);
        assert_eq!(orbit.radius, 50.0);
        orbit.zoom(100.0);
        assert_eq!(orbit.radius, 10.0);

        orbit.zoom_enabled = false;
        orbit.zoom(-3.0);
        assert_eq!(orbit.radius, 10.0);
    }

    #[test]
    fn orbit_never_dips_below_the_horizon() {
        let mut orbit = OrbitCamera::new(&config());
        let mut camera = Camera::new(&config());
        orbit.rotate(0.0, -10_000.0);
        for _ in 0..200 {
            orbit.update(&mut camera);
        }
        assert!(orbit.polar <= std::f32::consts::FRAC_PI_2 + 1e-6);
        assert!(camera.position.y >= orbit.target.y - 1e-3);
    }
}
