//! Headless backend driving a [`WorldState`]

use anyhow::Result;
use hashbrown::HashMap;
use serde::Serialize;

use crate::input::FrameInput;
use crate::motion::BodyId;
use crate::replay::types::DebugValueData;
use crate::world::WorldState;

use super::executor::RaceSummary;
use super::headless::HeadlessBackend;

/// A variable the world publishes to scripts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DebugVariableInfo {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub description: &'static str,
}

const fn var(
    name: &'static str,
    kind: &'static str,
    description: &'static str,
) -> DebugVariableInfo {
    DebugVariableInfo {
        name,
        kind,
        description,
    }
}

/// Variables published by [`WorldBackend`]
pub const DEBUG_VARIABLES: &[DebugVariableInfo] = &[
    var("$player_x", "f32", "Player kart X position"),
    var("$player_z", "f32", "Player kart Z position"),
    var("$player_speed", "f32", "Player speed in units per second"),
    var("$player_heading", "f32", "Player heading in degrees"),
    var("$ghost1_z", "f32", "First ghost Z position"),
    var("$ghost2_z", "f32", "Second ghost Z position"),
    var("$ghosts_moving", "bool", "Ghosts have been launched"),
    var("$race_phase", "u32", "0 idle, 1 running, 2 finished"),
    var("$race_finished", "bool", "Every kart crossed the finish line"),
    var("$player_finished", "bool", "Player crossed the finish line"),
    var("$ghost1_finished", "bool", "First ghost crossed the finish line"),
    var("$ghost2_finished", "bool", "Second ghost crossed the finish line"),
    var("$finish_time", "f64", "Race duration, present once finished"),
    var("$camera_zoom", "f32", "Vertical field of view in degrees"),
    var("$camera_yaw", "f32", "Orbit yaw in degrees"),
    var("$camera_pitch", "f32", "Orbit pitch in degrees"),
    var("$camera_first_person", "bool", "Camera is in first-person mode"),
    var("$sky_night", "bool", "Night sky and lighting active"),
    var("$translucent_first", "u32", "Body index drawn first in the translucent pass"),
];

/// Steps a world once per script frame at a fixed delta
pub struct WorldBackend {
    world: WorldState,
    input: FrameInput,
    dt: f32,
    translucent_order: Vec<BodyId>,
}

impl WorldBackend {
    pub fn new(world: WorldState, dt: f32) -> Self {
        Self {
            world,
            input: FrameInput::idle(),
            dt,
            translucent_order: Vec::new(),
        }
    }

    pub fn world(&self) -> &WorldState {
        &self.world
    }

    pub fn into_world(self) -> WorldState {
        self.world
    }
}

impl HeadlessBackend for WorldBackend {
    fn apply_inputs(&mut self, inputs: Option<&FrameInput>) -> Result<()> {
        self.input = inputs.copied().unwrap_or_default();
        Ok(())
    }

    fn update(&mut self) -> Result<()> {
        let frame = self.world.tick(self.dt, &self.input);
        self.translucent_order = frame.translucent_order();
        Ok(())
    }

    fn read_debug_values(&mut self) -> Result<HashMap<String, DebugValueData>> {
        let mut values = self.world.debug_values();
        if let Some(first) = self.translucent_order.first() {
            values.insert(
                "$translucent_first".to_string(),
                DebugValueData::U32(first.index() as u32),
            );
        }
        Ok(values)
    }

    fn race_summary(&self) -> Option<RaceSummary> {
        Some(RaceSummary::of(&self.world))
    }
}
