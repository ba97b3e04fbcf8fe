//! Day/night sky and the directional light derived from it

use glam::Vec3;
use serde::Serialize;

/// Which skybox is shown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum SkyMode {
    #[default]
    Day,
    Night,
}

impl SkyMode {
    pub fn toggled(self) -> Self {
        match self {
            SkyMode::Day => SkyMode::Night,
            SkyMode::Night => SkyMode::Day,
        }
    }

    /// Directional light for this sky
    pub fn light(self) -> Light {
        Light::for_mode(self)
    }
}

/// Directional light (sun or moon)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Light {
    /// Unit direction the light travels
    pub direction: Vec3,
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    /// Scales all three colors
    pub intensity: f32,
}

impl Light {
    pub fn for_mode(mode: SkyMode) -> Self {
        match mode {
            SkyMode::Day => Self {
                direction: Vec3::new(-0.5, -1.0, -0.5).normalize(),
                ambient: Vec3::splat(0.3),
                diffuse: Vec3::new(0.8, 0.8, 0.7),
                specular: Vec3::splat(0.5),
                intensity: 1.0,
            },
            SkyMode::Night => Self {
                direction: Vec3::new(-0.2, -1.0, -0.3).normalize(),
                ambient: Vec3::new(0.1, 0.1, 0.15),
                diffuse: Vec3::new(0.3, 0.3, 0.4),
                specular: Vec3::splat(0.1),
                intensity: 0.5,
            },
        }
    }

    /// Ambient, diffuse and specular colors with intensity applied
    pub fn shader_colors(&self) -> [Vec3; 3] {
        [
            self.ambient * self.intensity,
            self.diffuse * self.intensity,
            self.specular * self.intensity,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_alternates() {
        assert_eq!(SkyMode::Day.toggled(), SkyMode::Night);
        assert_eq!(SkyMode::Day.toggled().toggled(), SkyMode::Day);
        assert_eq!(SkyMode::default(), SkyMode::Day);
    }

    #[test]
    fn test_light_derived_from_mode() {
        assert_eq!(SkyMode::Day.light(), Light::for_mode(SkyMode::Day));
        assert_eq!(SkyMode::Night.light().intensity, 0.5);
        assert!((SkyMode::Night.light().direction.length() - 1.0).abs() < 1e-6);
        assert!(SkyMode::Day.light().direction.y < 0.0);
    }

    #[test]
    fn test_shader_colors_scaled_by_intensity() {
        let [ambient, diffuse, specular] = SkyMode::Night.light().shader_colors();
        assert!((ambient - Vec3::new(0.05, 0.05, 0.075)).length() < 1e-6);
        assert!((diffuse - Vec3::new(0.15, 0.15, 0.2)).length() < 1e-6);
        assert!((specular - Vec3::splat(0.05)).length() < 1e-6);

        let day = SkyMode::Day.light();
        assert_eq!(day.shader_colors()[1], day.diffuse);
    }
}
