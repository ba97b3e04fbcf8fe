//! Static scene layout and model transforms

use glam::{Mat4, Vec3};

use crate::config::RaceConfig;
use crate::motion::{BodyId, Pose};
use crate::sky::SkyMode;

use super::{MeshHandle, TextureHandle};

/// Uniform scale applied to the kart model
const KART_SCALE: f32 = 0.009;
/// Uniform scale applied to the landmark models
const LANDMARK_SCALE: f32 = 0.0099;
/// Landmark yaw in degrees, left then right
const LANDMARK_YAW: [f32; 2] = [495.0, 45.0];

/// Backend resources used to draw the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneHandles {
    pub kart_mesh: MeshHandle,
    pub landmark_mesh: MeshHandle,
    /// 50 x 100 ground quad, reused for the finish line
    pub plane_mesh: MeshHandle,
    pub kart_texture: TextureHandle,
    pub ghost_textures: [TextureHandle; 2],
    pub ground_texture: TextureHandle,
    pub finish_line_texture: TextureHandle,
    pub landmark_textures: [TextureHandle; 2],
    pub day_sky: TextureHandle,
    pub night_sky: TextureHandle,
}

impl Default for SceneHandles {
    fn default() -> Self {
        Self {
            kart_mesh: MeshHandle(0),
            landmark_mesh: MeshHandle(1),
            plane_mesh: MeshHandle(2),
            kart_texture: TextureHandle(0),
            ghost_textures: [TextureHandle(1), TextureHandle(2)],
            ground_texture: TextureHandle(3),
            finish_line_texture: TextureHandle(4),
            landmark_textures: [TextureHandle(5), TextureHandle(6)],
            day_sky: TextureHandle(7),
            night_sky: TextureHandle(8),
        }
    }
}

impl SceneHandles {
    pub fn sky(&self, mode: SkyMode) -> TextureHandle {
        match mode {
            SkyMode::Day => self.day_sky,
            SkyMode::Night => self.night_sky,
        }
    }

    pub fn body_texture(&self, id: BodyId) -> TextureHandle {
        match id {
            BodyId::Player => self.kart_texture,
            BodyId::Ghost1 => self.ghost_textures[0],
            BodyId::Ghost2 => self.ghost_textures[1],
        }
    }
}

/// Kart model transform. The mesh is authored a quarter turn off the heading axis.
pub fn kart_transform(pose: Pose) -> Mat4 {
    Mat4::from_translation(pose.position)
        * Mat4::from_rotation_y((pose.heading + 90.0).to_radians())
        * Mat4::from_scale(Vec3::splat(KART_SCALE))
}

pub fn ground_transform() -> Mat4 {
    Mat4::IDENTITY
}

/// Thin strip laid just above the ground at the finish line
pub fn finish_line_transform(finish_line_z: f32) -> Mat4 {
    Mat4::from_translation(Vec3::new(0.0, 0.01, finish_line_z))
        * Mat4::from_scale(Vec3::new(1.0, 0.001, 0.1))
}

/// The two landmarks flanking the track past the finish line
pub fn landmark_transforms(race: &RaceConfig) -> [Mat4; 2] {
    let z = race.finish_line_z + race.landmark_offset;
    let half = race.landmark_spacing / 2.0;
    [(-half, LANDMARK_YAW[0]), (half, LANDMARK_YAW[1])].map(|(x, yaw)| {
        Mat4::from_translation(Vec3::new(x, 0.0, z))
            * Mat4::from_rotation_y(yaw.to_radians())
            * Mat4::from_scale(Vec3::splat(LANDMARK_SCALE))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kart_transform_places_model_at_pose() {
        let pose = Pose {
            position: Vec3::new(1.0, 0.05, -48.0),
            heading: 0.0,
        };
        let m = kart_transform(pose);
        assert!((m.transform_point3(Vec3::ZERO) - pose.position).length() < 1e-5);
        let model_x = m.transform_vector3(Vec3::X).normalize();
        assert!((model_x - Vec3::NEG_Z).length() < 1e-5);
        assert!((m.transform_vector3(Vec3::X).length() - KART_SCALE).abs() < 1e-6);
    }

    #[test]
    fn test_finish_line_transform() {
        let m = finish_line_transform(40.0);
        assert!((m.transform_point3(Vec3::ZERO) - Vec3::new(0.0, 0.01, 40.0)).length() < 1e-6);
        assert!((m.transform_vector3(Vec3::new(25.0, 0.0, 50.0)) - Vec3::new(25.0, 0.0, 5.0)).length() < 1e-5);
    }

    #[test]
    fn test_landmarks_flank_the_track() {
        let [left, right] = landmark_transforms(&RaceConfig::default());
        assert!((left.transform_point3(Vec3::ZERO) - Vec3::new(-7.5, 0.0, 45.0)).length() < 1e-5);
        assert!((right.transform_point3(Vec3::ZERO) - Vec3::new(7.5, 0.0, 45.0)).length() < 1e-5);
    }

    #[test]
    fn test_handle_lookup() {
        let handles = SceneHandles::default();
        assert_eq!(handles.sky(SkyMode::Night), handles.night_sky);
        assert_eq!(handles.body_texture(BodyId::Ghost2), handles.ghost_textures[1]);
    }
}
