//! World state and the per-frame tick
//!
//! [`WorldState`] owns every piece of mutable simulation state. A driver
//! calls [`WorldState::tick`] once per frame with the frame delta and an
//! input snapshot, and gets back the frame's [`RenderCommandList`]. Nothing
//! outside the world is read or written during a tick.

use glam::Vec3;
use hashbrown::HashMap;

use crate::camera::{CameraMode, CameraState};
use crate::config::GameConfig;
use crate::controls::Control;
use crate::input::{EdgeDetector, FrameInput};
use crate::motion::{Body, BodyId, DriveControls, advance_ghost, advance_player};
use crate::race::{GhostLaunch, RaceEvent, RaceState};
use crate::render::{
    DrawRequest, MeshHandle, RenderCommand, RenderCommandList, RenderPass, SceneHandles,
    TextureHandle, TranslucentBody, back_to_front, finish_line_transform, ground_transform,
    kart_transform, landmark_transforms,
};
use crate::replay::DebugValueData;
use crate::sky::SkyMode;

/// Complete simulation state for the demo
#[derive(Debug, Clone)]
pub struct WorldState {
    config: GameConfig,
    handles: SceneHandles,
    /// Indexed by [`BodyId::index`]
    bodies: [Body; 3],
    ghosts_moving: bool,
    launch: Option<GhostLaunch>,
    race: RaceState,
    camera: CameraState,
    sky: SkyMode,
    edges: EdgeDetector,
    /// Seconds simulated so far (sum of tick deltas)
    elapsed: f64,
}

impl WorldState {
    /// Build the starting world: all karts parked at the player start, ghosts idle.
    pub fn new(config: GameConfig, handles: SceneHandles) -> Self {
        let start = Vec3::from_array(config.race.player_start);
        let bodies = BodyId::ALL.map(|id| Body::new(id, start, 0.0));
        let mut camera = CameraState::new(&config.camera);
        camera.follow_body(bodies[0].pose(), CameraMode::ThirdPerson, &config.camera);

        Self {
            config,
            handles,
            bodies,
            ghosts_moving: false,
            launch: None,
            race: RaceState::new(),
            camera,
            sky: SkyMode::default(),
            edges: EdgeDetector::new(),
            elapsed: 0.0,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn body(&self, id: BodyId) -> &Body {
        &self.bodies[id.index()]
    }

    pub fn bodies(&self) -> &[Body; 3] {
        &self.bodies
    }

    pub fn player(&self) -> &Body {
        self.body(BodyId::Player)
    }

    pub fn ghosts_moving(&self) -> bool {
        self.ghosts_moving
    }

    /// Parameters of the most recent ghost launch
    pub fn launch(&self) -> Option<&GhostLaunch> {
        self.launch.as_ref()
    }

    pub fn race(&self) -> &RaceState {
        &self.race
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn sky(&self) -> SkyMode {
        self.sky
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Advance the world by `dt` seconds and build the frame's draw list.
    ///
    /// Order within a frame: edge-triggered toggles, player motion, ghost
    /// motion, race evaluation, free-look and zoom, camera follow, render.
    /// Free-look only turns the orbit; the follow step writes the view.
    pub fn tick(&mut self, dt: f32, input: &FrameInput) -> RenderCommandList {
        let dt = if dt.is_finite() && dt >= 0.0 {
            dt
        } else {
            tracing::debug!(dt, "non-finite or negative frame delta treated as zero");
            0.0
        };
        self.elapsed += f64::from(dt);

        self.apply_toggles(input);

        let config = &self.config;
        advance_player(
            &mut self.bodies[BodyId::Player.index()],
            DriveControls::from(input),
            dt,
            &config.vehicle,
        );
        if self.ghosts_moving
            && let Some(launch) = self.launch
        {
            for id in [BodyId::Ghost1, BodyId::Ghost2] {
                let speed = launch.speed_of(id).unwrap_or(0.0);
                advance_ghost(&mut self.bodies[id.index()], launch.heading, speed, dt);
            }
        }

        let events = self
            .race
            .evaluate(&self.bodies, config.race.finish_line_z, self.elapsed);
        for event in events {
            match event {
                RaceEvent::BodyFinished(id) => tracing::info!("{} finished", id.label()),
                RaceEvent::RaceFinished { elapsed } => {
                    tracing::info!("Race finished in {:.2}s", elapsed)
                }
            }
        }

        if input.look.x != 0.0 || input.look.y != 0.0 {
            self.camera.turn_orbit(input.look.x, input.look.y);
        }
        if input.scroll != 0.0 {
            self.camera.process_scroll(input.scroll);
        }
        let pose = self.player().pose();
        let mode = self.camera.mode();
        self.camera.follow_body(pose, mode, &self.config.camera);

        self.render()
    }

    fn apply_toggles(&mut self, input: &FrameInput) {
        // Every edge control is sampled each frame so releases are seen
        let [camera, day_night, launch] = Control::EDGE_TRIGGERED.map(|c| self.edge(input, c));

        if camera {
            let mode = self.camera.toggle_mode();
            tracing::debug!(?mode, "camera mode toggled");
        }
        if day_night {
            self.sky = self.sky.toggled();
            tracing::info!(sky = ?self.sky, "sky changed");
        }
        if launch {
            self.ghosts_moving = !self.ghosts_moving;
            if self.ghosts_moving {
                self.launch_ghosts();
            } else {
                for id in [BodyId::Ghost1, BodyId::Ghost2] {
                    self.bodies[id.index()].speed = 0.0;
                }
                tracing::info!("Ghosts stopped");
            }
        }
    }

    fn edge(&mut self, input: &FrameInput, control: Control) -> bool {
        self.edges.rose(control, input.is_held(control))
    }

    fn launch_ghosts(&mut self) {
        let launch = GhostLaunch::from_player(self.player().pose(), &self.config.ghosts);
        for id in [BodyId::Ghost1, BodyId::Ghost2] {
            let ghost = &mut self.bodies[id.index()];
            ghost.position = launch.position_of(id).unwrap_or(ghost.position);
            ghost.heading = launch.heading;
            ghost.speed = 0.0;
        }
        self.launch = Some(launch);
        self.race.start(self.elapsed);
        tracing::info!(heading = launch.heading, "Race started");
    }

    fn render(&self) -> RenderCommandList {
        let handles = &self.handles;
        let mut list = RenderCommandList::new();

        list.push(RenderCommand::BeginFrame);
        list.push(RenderCommand::SetViewProjection {
            view: self.camera.view_matrix(),
            projection: self
                .camera
                .projection_matrix(self.config.camera.aspect_ratio),
        });
        list.push(RenderCommand::SetLight {
            light: self.sky.light(),
        });
        list.push(RenderCommand::DrawSky {
            mode: self.sky,
            cubemap: handles.sky(self.sky),
            view: self.camera.sky_view_matrix(),
        });

        // Opaque pass
        list.submit(opaque(handles.plane_mesh, handles.ground_texture, ground_transform()));
        if !self.race.is_finished() {
            list.submit(opaque(
                handles.plane_mesh,
                handles.finish_line_texture,
                finish_line_transform(self.config.race.finish_line_z),
            ));
        }
        for (transform, texture) in landmark_transforms(&self.config.race)
            .into_iter()
            .zip(handles.landmark_textures)
        {
            list.submit(opaque(handles.landmark_mesh, texture, transform));
        }
        let player = self.player();
        list.submit(DrawRequest {
            body: Some(BodyId::Player),
            ..opaque(
                handles.kart_mesh,
                handles.body_texture(BodyId::Player),
                kart_transform(player.pose()),
            )
        });

        // Translucent pass
        let ghosts = [BodyId::Ghost1, BodyId::Ghost2].map(|id| TranslucentBody {
            id,
            position: self.body(id).position,
            alpha: self.config.ghosts.alpha,
        });
        for ghost in back_to_front(self.camera.position, &ghosts) {
            list.submit(DrawRequest {
                mesh: handles.kart_mesh,
                texture: handles.body_texture(ghost.id),
                transform: kart_transform(self.body(ghost.id).pose()),
                alpha: ghost.alpha,
                pass: RenderPass::Translucent,
                body: Some(ghost.id),
            });
        }

        list.push(RenderCommand::EndFrame);
        list
    }

    /// Named values for headless inspection and assertions
    pub fn debug_values(&self) -> HashMap<String, DebugValueData> {
        let mut values = HashMap::new();
        let mut put = |name: &str, value: DebugValueData| {
            values.insert(format!("${}", name), value);
        };

        let player = self.player();
        put("player_x", DebugValueData::F32(player.position.x));
        put("player_z", DebugValueData::F32(player.position.z));
        put("player_speed", DebugValueData::F32(player.speed));
        put("player_heading", DebugValueData::F32(player.heading));
        put("ghost1_z", DebugValueData::F32(self.body(BodyId::Ghost1).position.z));
        put("ghost2_z", DebugValueData::F32(self.body(BodyId::Ghost2).position.z));
        put("ghosts_moving", DebugValueData::Bool(self.ghosts_moving));

        put("race_phase", DebugValueData::U32(self.race.phase().code()));
        put("race_finished", DebugValueData::Bool(self.race.is_finished()));
        for id in BodyId::ALL {
            put(
                &format!("{}_finished", id.label()),
                DebugValueData::Bool(self.race.body_finished(id)),
            );
        }
        if let Some(time) = self.race.finish_time() {
            put("finish_time", DebugValueData::F64(time));
        }

        let orbit = self.camera.rig.orbit();
        put("camera_zoom", DebugValueData::F32(self.camera.zoom));
        put("camera_yaw", DebugValueData::F32(orbit.yaw));
        put("camera_pitch", DebugValueData::F32(orbit.pitch));
        put(
            "camera_first_person",
            DebugValueData::Bool(self.camera.mode() == CameraMode::FirstPerson),
        );
        put("sky_night", DebugValueData::Bool(self.sky == SkyMode::Night));
        values
    }
}

fn opaque(mesh: MeshHandle, texture: TextureHandle, transform: glam::Mat4) -> DrawRequest {
    DrawRequest {
        mesh,
        texture,
        transform,
        alpha: 1.0,
        pass: RenderPass::Opaque,
        body: None,
    }
}
