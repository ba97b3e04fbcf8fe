//! Render submission
//!
//! [`crate::world::WorldState::tick`] produces a [`RenderCommandList`]. The
//! list is plain data: a backend consumes it through the [`Renderer`] trait
//! via [`RenderCommandList::replay_into`], and tools can serialize it.

mod ordering;
mod scene;

pub use ordering::{TranslucentBody, back_to_front};
pub use scene::{
    SceneHandles, finish_line_transform, ground_transform, kart_transform, landmark_transforms,
};

use glam::Mat4;
use serde::Serialize;

use crate::motion::BodyId;
use crate::sky::{Light, SkyMode};

/// Opaque mesh resource owned by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MeshHandle(pub u32);

/// Opaque texture or cubemap resource owned by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TextureHandle(pub u32);

/// Blend/depth state for a draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderPass {
    /// Depth write on, blending off
    Opaque,
    /// Depth write off, alpha blending on
    Translucent,
}

impl RenderPass {
    pub fn depth_write(self) -> bool {
        matches!(self, RenderPass::Opaque)
    }

    pub fn blend(self) -> bool {
        matches!(self, RenderPass::Translucent)
    }
}

/// A single mesh draw
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DrawRequest {
    pub mesh: MeshHandle,
    pub texture: TextureHandle,
    /// Model-to-world transform
    pub transform: Mat4,
    /// Opacity in [0, 1]
    pub alpha: f32,
    pub pass: RenderPass,
    /// Simulated body this draw represents, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<BodyId>,
}

/// Render command for one frame, in submission order
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RenderCommand {
    BeginFrame,
    SetViewProjection { view: Mat4, projection: Mat4 },
    SetLight { light: Light },
    /// Skybox, drawn with a rotation-only view and depth write off
    DrawSky {
        mode: SkyMode,
        cubemap: TextureHandle,
        view: Mat4,
    },
    Submit(DrawRequest),
    EndFrame,
}

/// Rendering backend
pub trait Renderer {
    fn begin_frame(&mut self);
    fn set_view_projection(&mut self, view: Mat4, projection: Mat4);
    fn set_light(&mut self, light: &Light);
    fn draw_sky(&mut self, cubemap: TextureHandle, view: Mat4);
    fn submit(&mut self, request: &DrawRequest);
    fn end_frame(&mut self);
}

/// Ordered render commands for a frame
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RenderCommandList {
    commands: Vec<RenderCommand>,
}

impl RenderCommandList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: RenderCommand) {
        self.commands.push(command);
    }

    pub fn submit(&mut self, request: DrawRequest) {
        self.commands.push(RenderCommand::Submit(request));
    }

    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Mesh draws in submission order
    pub fn draws(&self) -> impl Iterator<Item = &DrawRequest> {
        self.commands.iter().filter_map(|c| match c {
            RenderCommand::Submit(request) => Some(request),
            _ => None,
        })
    }

    /// Bodies drawn in the translucent pass, in submission order
    pub fn translucent_order(&self) -> Vec<BodyId> {
        self.draws()
            .filter(|d| d.pass == RenderPass::Translucent)
            .filter_map(|d| d.body)
            .collect()
    }

    /// Feed every command to a backend, in order
    pub fn replay_into<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        for command in &self.commands {
            match command {
                RenderCommand::BeginFrame => renderer.begin_frame(),
                RenderCommand::SetViewProjection { view, projection } => {
                    renderer.set_view_projection(*view, *projection)
                }
                RenderCommand::SetLight { light } => renderer.set_light(light),
                RenderCommand::DrawSky { cubemap, view, .. } => renderer.draw_sky(*cubemap, *view),
                RenderCommand::Submit(request) => renderer.submit(request),
                RenderCommand::EndFrame => renderer.end_frame(),
            }
        }
    }
}
