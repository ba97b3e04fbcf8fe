//! Chase camera
//!
//! The camera rig is either third-person (orbiting the followed kart with a
//! free-look yaw/pitch) or first-person (locked to the kart's heading). The
//! view is derived from the rig and the followed pose by [`derive_view`], so
//! the follow update fully determines position and basis for the frame.

use glam::{Mat3, Mat4, Vec3};

use crate::config::CameraConfig;
use crate::motion::{Pose, heading_vector};

/// Narrowest zoom (vertical FOV in degrees)
pub const MIN_ZOOM: f32 = 1.0;
/// Widest zoom (vertical FOV in degrees)
pub const MAX_ZOOM: f32 = 45.0;
/// Pitch is clamped to +/- this many degrees
pub const PITCH_LIMIT: f32 = 89.0;

/// Camera perspective
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    ThirdPerson,
    FirstPerson,
}

impl CameraMode {
    pub fn toggled(self) -> Self {
        match self {
            CameraMode::ThirdPerson => CameraMode::FirstPerson,
            CameraMode::FirstPerson => CameraMode::ThirdPerson,
        }
    }
}

/// Free-look angles in degrees
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Orbit {
    pub yaw: f32,
    pub pitch: f32,
}

/// Camera rig state per mode
///
/// First-person keeps the third-person orbit aside so switching back restores it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraRig {
    ThirdPerson(Orbit),
    FirstPerson { stashed: Orbit },
}

impl CameraRig {
    pub fn mode(&self) -> CameraMode {
        match self {
            CameraRig::ThirdPerson(_) => CameraMode::ThirdPerson,
            CameraRig::FirstPerson { .. } => CameraMode::FirstPerson,
        }
    }

    /// Orbit angles, whether or not they currently apply
    pub fn orbit(&self) -> Orbit {
        match *self {
            CameraRig::ThirdPerson(orbit) => orbit,
            CameraRig::FirstPerson { stashed } => stashed,
        }
    }

    /// Same orbit, given mode
    pub fn with_mode(self, mode: CameraMode) -> Self {
        let orbit = self.orbit();
        match mode {
            CameraMode::ThirdPerson => CameraRig::ThirdPerson(orbit),
            CameraMode::FirstPerson => CameraRig::FirstPerson { stashed: orbit },
        }
    }
}

/// Orthonormal camera basis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Basis {
    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,
}

impl Basis {
    /// Basis looking along `forward`, with world +Y as the up reference
    pub fn looking_along(forward: Vec3) -> Self {
        let forward = forward.normalize_or(Vec3::NEG_Z);
        let right = forward.cross(Vec3::Y).normalize_or(Vec3::X);
        let up = right.cross(forward).normalize();
        Self { forward, right, up }
    }

    /// Basis for free-look angles in degrees
    pub fn from_yaw_pitch(yaw: f32, pitch: f32) -> Self {
        let (yaw_sin, yaw_cos) = yaw.to_radians().sin_cos();
        let (pitch_sin, pitch_cos) = pitch.to_radians().sin_cos();
        Self::looking_along(Vec3::new(yaw_cos * pitch_cos, pitch_sin, yaw_sin * pitch_cos))
    }
}

/// Whether a look update was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookOutcome {
    Applied,
    /// Free-look only acts in third-person
    Ignored,
}

/// Camera position and orientation for one rig variant and followed pose.
pub fn derive_view(rig: &CameraRig, pose: Pose, config: &CameraConfig) -> (Vec3, Basis) {
    match *rig {
        CameraRig::ThirdPerson(orbit) => {
            let behind = heading_vector(pose.heading + orbit.yaw + 180.0);
            let position =
                pose.position + behind * config.follow_distance + Vec3::Y * config.follow_height;
            let target =
                pose.position + pose.forward() * config.look_ahead + Vec3::Y * config.look_height;
            let forward = (target - position).normalize_or(pose.forward());
            (position, Basis::looking_along(forward))
        }
        CameraRig::FirstPerson { .. } => {
            let forward = pose.forward();
            let position = pose.position
                + forward * config.first_person_forward
                + Vec3::Y * config.first_person_height;
            (position, Basis::looking_along(forward))
        }
    }
}

/// Camera state for 3D rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    /// Camera position in world space
    pub position: Vec3,
    pub basis: Basis,
    /// Vertical field of view in degrees, in [`MIN_ZOOM`, `MAX_ZOOM`]
    pub zoom: f32,
    pub rig: CameraRig,
    /// Degrees per pointer unit
    pub sensitivity: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
}

impl CameraState {
    /// Third-person camera at the origin with the configured orbit and zoom
    pub fn new(config: &CameraConfig) -> Self {
        let orbit = Orbit {
            yaw: config.initial_yaw,
            pitch: 0.0,
        };
        Self {
            position: Vec3::ZERO,
            basis: Basis::from_yaw_pitch(orbit.yaw, orbit.pitch),
            zoom: config.initial_zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            rig: CameraRig::ThirdPerson(orbit),
            sensitivity: config.sensitivity,
            near: config.near,
            far: config.far,
        }
    }

    pub fn mode(&self) -> CameraMode {
        self.rig.mode()
    }

    /// Switch between third- and first-person
    pub fn toggle_mode(&mut self) -> CameraMode {
        self.rig = self.rig.with_mode(self.mode().toggled());
        self.mode()
    }

    /// Turn the orbit by a pointer delta without touching position or basis.
    ///
    /// Third-person only. The next [`follow_body`](Self::follow_body) picks
    /// up the new angles.
    pub fn turn_orbit(&mut self, dx: f32, dy: f32) -> LookOutcome {
        let CameraRig::ThirdPerson(orbit) = &mut self.rig else {
            tracing::debug!(dx, dy, "look input ignored outside third-person");
            return LookOutcome::Ignored;
        };

        orbit.yaw += dx * self.sensitivity;
        orbit.pitch = (orbit.pitch + dy * self.sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        LookOutcome::Applied
    }

    /// Apply a free-look pointer delta and rebuild the basis from the new angles.
    ///
    /// For use outside a world tick; inside one, follow owns the basis.
    pub fn process_look(&mut self, dx: f32, dy: f32) -> LookOutcome {
        let outcome = self.turn_orbit(dx, dy);
        if outcome == LookOutcome::Applied {
            let orbit = self.rig.orbit();
            self.basis = Basis::from_yaw_pitch(orbit.yaw, orbit.pitch);
        }
        outcome
    }

    /// Apply a scroll delta; positive values zoom in
    pub fn process_scroll(&mut self, dy: f32) {
        self.zoom = (self.zoom - dy).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Place the camera relative to a followed pose in the given mode
    pub fn follow_body(&mut self, pose: Pose, mode: CameraMode, config: &CameraConfig) {
        self.rig = self.rig.with_mode(mode);
        let (position, basis) = derive_view(&self.rig, pose, config);
        self.position = position;
        self.basis = basis;
    }

    /// Compute the view matrix (world-to-camera transform)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(
            self.position,
            self.position + self.basis.forward,
            self.basis.up,
        )
    }

    /// View matrix with translation removed, for the skybox
    pub fn sky_view_matrix(&self) -> Mat4 {
        Mat4::from_mat3(Mat3::from_mat4(self.view_matrix()))
    }

    /// Compute the projection matrix for a given aspect ratio
    pub fn projection_matrix(&self, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective_rh(self.zoom.to_radians(), aspect_ratio, self.near, self.far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn camera() -> CameraState {
        CameraState::new(&CameraConfig::default())
    }

    fn pose_at_origin(heading: f32) -> Pose {
        Pose {
            position: Vec3::ZERO,
            heading,
        }
    }

    fn assert_orthonormal(basis: &Basis) {
        assert!((basis.forward.length() - 1.0).abs() < EPS);
        assert!((basis.right.length() - 1.0).abs() < EPS);
        assert!((basis.up.length() - 1.0).abs() < EPS);
        assert!(basis.forward.dot(basis.right).abs() < EPS);
        assert!(basis.forward.dot(basis.up).abs() < EPS);
        assert!(basis.right.dot(basis.up).abs() < EPS);
        // right x up points backwards in a right-handed view basis
        assert!((basis.right.cross(basis.up) + basis.forward).length() < EPS);
    }

    // =============================================================
    // Free-look tests
    // =============================================================

    #[test]
    fn test_pitch_stays_clamped() {
        let mut cam = camera();
        for _ in 0..100 {
            cam.process_look(3.0, 500.0);
        }
        assert_eq!(cam.rig.orbit().pitch, PITCH_LIMIT);
        for _ in 0..100 {
            cam.process_look(-7.0, -900.0);
        }
        assert_eq!(cam.rig.orbit().pitch, -PITCH_LIMIT);
        assert_orthonormal(&cam.basis);
    }

    #[test]
    fn test_look_scales_by_sensitivity() {
        let mut cam = camera();
        assert_eq!(cam.process_look(100.0, 20.0), LookOutcome::Applied);
        let orbit = cam.rig.orbit();
        assert!((orbit.yaw - 5.0).abs() < EPS);
        assert!((orbit.pitch - 1.0).abs() < EPS);
    }

    #[test]
    fn test_turn_orbit_leaves_view_alone() {
        let mut cam = camera();
        cam.follow_body(pose_at_origin(0.0), CameraMode::ThirdPerson, &CameraConfig::default());
        let before = cam;

        assert_eq!(cam.turn_orbit(100.0, 20.0), LookOutcome::Applied);
        assert_eq!(cam.basis, before.basis);
        assert_eq!(cam.position, before.position);
        assert!((cam.rig.orbit().yaw - before.rig.orbit().yaw - 5.0).abs() < EPS);

        let mut looked = before;
        looked.process_look(100.0, 20.0);
        assert_eq!(looked.rig, cam.rig);
        let orbit = cam.rig.orbit();
        assert_eq!(looked.basis, Basis::from_yaw_pitch(orbit.yaw, orbit.pitch));
        assert_ne!(looked.basis, cam.basis);
    }

    #[test]
    fn test_look_ignored_in_first_person() {
        let mut cam = camera();
        cam.toggle_mode();
        let before = cam;
        assert_eq!(cam.process_look(100.0, 100.0), LookOutcome::Ignored);
        assert_eq!(cam.turn_orbit(100.0, 100.0), LookOutcome::Ignored);
        assert_eq!(cam, before);
    }

    #[test]
    fn test_free_look_basis_matches_angles() {
        let basis = Basis::from_yaw_pitch(-90.0, 0.0);
        assert!((basis.forward - Vec3::NEG_Z).length() < EPS);
        assert!((basis.right - Vec3::X).length() < EPS);
        assert!((basis.up - Vec3::Y).length() < EPS);
    }

    // =============================================================
    // Zoom tests
    // =============================================================

    #[test]
    fn test_zoom_stays_clamped() {
        let mut cam = camera();
        cam.process_scroll(10.0);
        assert_eq!(cam.zoom, 35.0);
        cam.process_scroll(1000.0);
        assert_eq!(cam.zoom, MIN_ZOOM);
        cam.process_scroll(-1000.0);
        assert_eq!(cam.zoom, MAX_ZOOM);
    }

    #[test]
    fn test_zoom_narrows_projection() {
        let mut cam = camera();
        let wide = cam.projection_matrix(4.0 / 3.0);
        cam.process_scroll(20.0);
        let narrow = cam.projection_matrix(4.0 / 3.0);
        // Larger focal length on the y axis means a narrower FOV
        assert!(narrow.y_axis.y > wide.y_axis.y);
    }

    // =============================================================
    // Follow tests
    // =============================================================

    #[test]
    fn test_third_person_sits_behind_and_above() {
        let mut cam = camera();
        cam.follow_body(pose_at_origin(0.0), CameraMode::ThirdPerson, &CameraConfig::default());
        assert!((cam.position - Vec3::new(0.0, 2.0, -7.0)).length() < EPS);
        let expected = (Vec3::new(0.0, 0.5, 3.0) - cam.position).normalize();
        assert!((cam.basis.forward - expected).length() < EPS);
        assert_orthonormal(&cam.basis);
    }

    #[test]
    fn test_third_person_orbit_yaw_rotates_offset() {
        let mut cam = camera();
        cam.rig = CameraRig::ThirdPerson(Orbit {
            yaw: 90.0,
            pitch: 0.0,
        });
        cam.follow_body(pose_at_origin(0.0), CameraMode::ThirdPerson, &CameraConfig::default());
        // heading + yaw + 180 = 270 degrees, i.e. the -X side
        assert!((cam.position - Vec3::new(-7.0, 2.0, 0.0)).length() < EPS);
    }

    #[test]
    fn test_first_person_locked_to_heading() {
        let mut cam = camera();
        cam.turn_orbit(400.0, 300.0);
        cam.follow_body(pose_at_origin(90.0), CameraMode::FirstPerson, &CameraConfig::default());
        assert_eq!(cam.mode(), CameraMode::FirstPerson);
        assert!((cam.position - Vec3::new(1.5, 0.5, 0.0)).length() < EPS);
        assert!((cam.basis.forward - Vec3::X).length() < EPS);
        assert_orthonormal(&cam.basis);
    }

    #[test]
    fn test_toggle_keeps_orbit() {
        let mut cam = camera();
        cam.turn_orbit(200.0, 40.0);
        let orbit = cam.rig.orbit();
        assert_eq!(cam.toggle_mode(), CameraMode::FirstPerson);
        assert_eq!(cam.rig, CameraRig::FirstPerson { stashed: orbit });
        assert_eq!(cam.toggle_mode(), CameraMode::ThirdPerson);
        assert_eq!(cam.rig, CameraRig::ThirdPerson(orbit));
    }

    #[test]
    fn test_derive_view_is_pure() {
        let rig = CameraRig::ThirdPerson(Orbit::default());
        let pose = pose_at_origin(30.0);
        let config = CameraConfig::default();
        assert_eq!(derive_view(&rig, pose, &config), derive_view(&rig, pose, &config));
    }

    // =============================================================
    // Matrix tests
    // =============================================================

    #[test]
    fn test_view_matrix_puts_target_in_front() {
        let mut cam = camera();
        cam.follow_body(pose_at_origin(0.0), CameraMode::ThirdPerson, &CameraConfig::default());
        let kart_in_view = cam.view_matrix().transform_point3(Vec3::ZERO);
        assert!(kart_in_view.z < 0.0);
    }

    #[test]
    fn test_sky_view_has_no_translation() {
        let mut cam = camera();
        cam.follow_body(
            Pose {
                position: Vec3::new(10.0, 0.0, -20.0),
                heading: 45.0,
            },
            CameraMode::ThirdPerson,
            &CameraConfig::default(),
        );
        let sky = cam.sky_view_matrix();
        assert_eq!(sky.w_axis, glam::Vec4::W);
        assert!(sky.transform_point3(Vec3::ZERO).length() < EPS);
    }
}
