//! Ghostkart Core - kart racing simulation
//!
//! This crate holds everything a frontend needs to run the ghost kart demo
//! except the window and GPU: driving physics, the chase camera, the race
//! state machine and the per-frame render command list.
//!
//! # Architecture
//!
//! - [`WorldState`] - Owns all simulation state; [`WorldState::tick`] turns a
//!   [`FrameInput`] and a delta into a [`RenderCommandList`]
//! - [`FrameLoop`] - Clock-driven driver that polls an [`InputState`] and
//!   replays each frame into a [`Renderer`]
//! - [`AssetCatalog`] - Loads the OBJ meshes and textures named by the
//!   [`AssetManifest`]
//! - [`replay`] - Headless TOML scripts with snapshots and assertions

pub mod assets;
pub mod camera;
pub mod config;
pub mod controls;
pub mod input;
#[cfg(test)]
mod integration;
pub mod motion;
pub mod race;
pub mod render;
pub mod replay;
pub mod runtime;
pub mod sky;
pub mod world;

// Re-export core types
pub use assets::{AssetCatalog, AssetLoadError, AssetManifest, MeshData};
pub use camera::{CameraMode, CameraState, LookOutcome};
pub use config::{ConfigError, GameConfig, KeyBindings};
pub use controls::{Control, ControlSet};
pub use input::{EdgeDetector, FrameInput, InputState};
pub use motion::{Body, BodyId, Pose};
pub use race::{RaceEvent, RacePhase, RaceState};
pub use render::{
    DrawRequest, MeshHandle, RenderCommand, RenderCommandList, RenderPass, Renderer, SceneHandles,
    TextureHandle,
};
pub use runtime::{Clock, FrameLoop, ManualClock, RuntimeConfig, SystemClock};
pub use sky::{Light, SkyMode};
pub use world::WorldState;
