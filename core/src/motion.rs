//! Kinematic vehicle motion
//!
//! Bodies move on the flat XZ plane. Heading is in degrees measured from the
//! +Z axis, growing toward +X, so the forward vector is `(sin h, 0, cos h)`.

use glam::Vec3;
use serde::Serialize;

use crate::config::VehicleConfig;
use crate::controls::Control;
use crate::input::FrameInput;

/// Stable identity of each simulated body
///
/// The ordering of the variants is the draw-order tie-break for bodies at
/// equal camera distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyId {
    Player = 0,
    Ghost1 = 1,
    Ghost2 = 2,
}

impl BodyId {
    pub const ALL: [BodyId; 3] = [BodyId::Player, BodyId::Ghost1, BodyId::Ghost2];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            BodyId::Player => "player",
            BodyId::Ghost1 => "ghost1",
            BodyId::Ghost2 => "ghost2",
        }
    }
}

/// Position and heading of a body, as seen by the camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    /// Degrees from +Z
    pub heading: f32,
}

impl Pose {
    /// Unit vector along the heading
    pub fn forward(&self) -> Vec3 {
        heading_vector(self.heading)
    }
}

/// A kart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub id: BodyId,
    pub position: Vec3,
    /// Degrees from +Z
    pub heading: f32,
    /// Signed speed in units/s, negative when reversing
    pub speed: f32,
}

impl Body {
    pub fn new(id: BodyId, position: Vec3, heading: f32) -> Self {
        Self {
            id,
            position,
            heading,
            speed: 0.0,
        }
    }

    pub fn pose(&self) -> Pose {
        Pose {
            position: self.position,
            heading: self.heading,
        }
    }
}

/// Unit vector on the XZ plane for a heading in degrees
pub fn heading_vector(heading: f32) -> Vec3 {
    let (sin, cos) = heading.to_radians().sin_cos();
    Vec3::new(sin, 0.0, cos)
}

/// Driving controls relevant to the player kart
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriveControls {
    pub accelerate: bool,
    pub brake: bool,
    pub turn_left: bool,
    pub turn_right: bool,
}

impl From<&FrameInput> for DriveControls {
    fn from(input: &FrameInput) -> Self {
        Self {
            accelerate: input.is_held(Control::Accelerate),
            brake: input.is_held(Control::Brake),
            turn_left: input.is_held(Control::TurnLeft),
            turn_right: input.is_held(Control::TurnRight),
        }
    }
}

/// Fraction of the base turn rate available at `speed`.
///
/// Ramps linearly from 0 at rest to 1 at `min_turn_speed`, then holds at 1.
/// Reversing scales it further by `reverse_turn_modifier`.
pub fn turn_modifier(speed: f32, config: &VehicleConfig) -> f32 {
    let mut modifier = if config.min_turn_speed > 0.0 {
        (speed.abs() / config.min_turn_speed).min(1.0)
    } else {
        1.0
    };
    if speed < 0.0 {
        modifier *= config.reverse_turn_modifier;
    }
    modifier
}

/// Advance the player kart by one frame.
///
/// Coasting drag is applied once per call, not per second, so its strength
/// depends on the frame rate.
pub fn advance_player(body: &mut Body, controls: DriveControls, dt: f32, config: &VehicleConfig) {
    if controls.accelerate {
        body.speed = (body.speed + config.acceleration * dt).min(config.max_speed);
    }
    if controls.brake {
        body.speed = (body.speed - config.acceleration * dt).max(-config.max_speed / 2.0);
    }
    if !controls.accelerate && !controls.brake {
        body.speed *= config.drag_factor;
        if body.speed.abs() < config.stop_threshold {
            body.speed = 0.0;
        }
    }

    let turn = config.base_turn_rate * turn_modifier(body.speed, config) * dt;
    if controls.turn_left {
        body.heading += turn;
    }
    if controls.turn_right {
        body.heading -= turn;
    }

    integrate(body, body.heading, body.speed, dt);
}

/// Advance a ghost kart along the heading and speed fixed at launch.
pub fn advance_ghost(body: &mut Body, fixed_heading: f32, target_speed: f32, dt: f32) {
    body.heading = fixed_heading;
    body.speed = target_speed;
    integrate(body, fixed_heading, target_speed, dt);
}

fn integrate(body: &mut Body, heading: f32, speed: f32, dt: f32) {
    let (sin, cos) = heading.to_radians().sin_cos();
    body.position.x += speed * sin * dt;
    body.position.z += speed * cos * dt;
}
