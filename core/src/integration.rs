//! Integration tests for the kart simulation
//!
//! Drives full scenarios through `WorldState::tick` and the headless replay
//! pipeline.

use glam::Vec3;

use crate::camera::CameraMode;
use crate::config::GameConfig;
use crate::controls::Control;
use crate::input::FrameInput;
use crate::motion::BodyId;
use crate::race::RacePhase;
use crate::render::{RenderCommand, RenderCommandList, RenderPass, SceneHandles};
use crate::replay::{
    Compiler, DEBUG_VARIABLES, HeadlessConfig, HeadlessRunner, ReplayScript, Verdict, WorldBackend,
};
use crate::sky::{Light, SkyMode};
use crate::world::WorldState;

const DT: f32 = 1.0 / 60.0;

fn world_with(config: GameConfig) -> WorldState {
    WorldState::new(config, SceneHandles::default())
}

fn world() -> WorldState {
    world_with(GameConfig::default())
}

fn run(world: &mut WorldState, frames: usize, input: FrameInput) -> RenderCommandList {
    let mut last = RenderCommandList::new();
    for _ in 0..frames {
        last = world.tick(DT, &input);
    }
    last
}

fn press(world: &mut WorldState, control: Control) -> RenderCommandList {
    world.tick(DT, &FrameInput::holding(&[control]));
    world.tick(DT, &FrameInput::idle())
}

// ============================================================================
// Driving
// ============================================================================

#[test]
fn test_two_seconds_of_acceleration_reach_top_speed() {
    let mut world = world();
    let accelerate = FrameInput::holding(&[Control::Accelerate]);
    // 120 steps of 0.075 sum to 8.9999895 in f32, one short of the clamp
    run(&mut world, 120, accelerate);
    assert!((world.player().speed - 9.0).abs() < 1e-4);
    assert!(world.player().speed < 9.0);

    run(&mut world, 1, accelerate);
    assert_eq!(world.player().speed, 9.0);
    run(&mut world, 59, accelerate);
    assert_eq!(world.player().speed, 9.0);
    assert!(world.player().position.z > -48.0);
    assert_eq!(world.player().position.x, 0.0);
}

#[test]
fn test_coasting_comes_to_rest() {
    let mut world = world();
    run(&mut world, 60, FrameInput::holding(&[Control::Accelerate]));
    run(&mut world, 30, FrameInput::idle());
    assert_eq!(world.player().speed, 0.0);
}

#[test]
fn test_cannot_turn_at_rest() {
    let mut world = world();
    run(&mut world, 30, FrameInput::holding(&[Control::TurnLeft]));
    assert_eq!(world.player().heading, 0.0);

    run(
        &mut world,
        60,
        FrameInput::holding(&[Control::Accelerate, Control::TurnLeft]),
    );
    assert!(world.player().heading > 0.0);
}

// ============================================================================
// Race flow
// ============================================================================

#[test]
fn test_launch_race_and_finish_latch() {
    let mut world = world();
    world.tick(
        DT,
        &FrameInput::holding(&[Control::Accelerate, Control::LaunchGhosts]),
    );
    assert!(world.ghosts_moving());
    assert_eq!(world.race().phase(), RacePhase::Running);
    assert!(world.race().start_time().is_some());

    // Slowest ghost covers 88 units at 6 u/s
    run(&mut world, 16 * 60, FrameInput::holding(&[Control::Accelerate]));
    assert!(world.race().is_finished());
    for id in BodyId::ALL {
        assert!(world.race().body_finished(id));
    }
    let finish = world.race().finish_time().unwrap();
    assert!((finish - 88.0 / 6.0).abs() < 0.05, "finish time {finish}");

    // Latched: reversing behind the line changes nothing
    run(&mut world, 30 * 60, FrameInput::holding(&[Control::Brake]));
    assert!(world.player().position.z < 40.0);
    assert!(world.race().is_finished());
    assert_eq!(world.race().finish_time(), Some(finish));
}

#[test]
fn test_finish_line_hidden_after_finish() {
    let mut world = world();
    let before = world.tick(DT, &FrameInput::holding(&[Control::LaunchGhosts]));
    assert_eq!(before.draws().count(), 7);

    let after = run(&mut world, 16 * 60, FrameInput::holding(&[Control::Accelerate]));
    assert!(world.race().is_finished());
    assert_eq!(after.draws().count(), 6);
    let finish_texture = SceneHandles::default().finish_line_texture;
    assert!(after.draws().all(|d| d.texture != finish_texture));
}

#[test]
fn test_held_launch_fires_once() {
    let mut world = world();
    run(&mut world, 30, FrameInput::holding(&[Control::LaunchGhosts]));
    assert!(world.ghosts_moving());

    press(&mut world, Control::LaunchGhosts);
    assert!(!world.ghosts_moving());
}

#[test]
fn test_stopping_ghosts_freezes_them() {
    let mut world = world();
    press(&mut world, Control::LaunchGhosts);
    run(&mut world, 30, FrameInput::idle());
    press(&mut world, Control::LaunchGhosts);

    let frozen = world.body(BodyId::Ghost1).position;
    run(&mut world, 30, FrameInput::idle());
    assert_eq!(world.body(BodyId::Ghost1).position, frozen);
    assert_eq!(world.body(BodyId::Ghost1).speed, 0.0);
    assert_eq!(world.race().phase(), RacePhase::Running);
}

#[test]
fn test_relaunch_resets_from_current_pose() {
    let mut world = world();
    press(&mut world, Control::LaunchGhosts);
    run(&mut world, 60, FrameInput::idle());
    press(&mut world, Control::LaunchGhosts);

    run(
        &mut world,
        90,
        FrameInput::holding(&[Control::Accelerate, Control::TurnRight]),
    );
    press(&mut world, Control::LaunchGhosts);

    let player = *world.player();
    let launch = world.launch().copied().unwrap();
    assert!((launch.heading - player.heading).abs() < 1e-3);
    let ghost1 = world.body(BodyId::Ghost1);
    assert!(ghost1.position.distance(player.position) < 3.5);
    assert_eq!(ghost1.heading, launch.heading);
    assert!(world.race().finish_time().is_none());
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn test_translucent_ghosts_drawn_far_to_near() {
    let mut config = GameConfig::default();
    config.ghosts.ghost2_speed = 20.0;
    let mut world = world_with(config);

    // Equal distance before launch: lower id first
    let frame = world.tick(DT, &FrameInput::idle());
    assert_eq!(frame.translucent_order(), vec![BodyId::Ghost1, BodyId::Ghost2]);

    press(&mut world, Control::LaunchGhosts);
    let frame = run(&mut world, 60, FrameInput::idle());
    assert_eq!(frame.translucent_order(), vec![BodyId::Ghost2, BodyId::Ghost1]);

    let camera = world.camera().position;
    let d2 = camera.distance(world.body(BodyId::Ghost2).position);
    let d1 = camera.distance(world.body(BodyId::Ghost1).position);
    assert!(d2 > d1);
}

#[test]
fn test_translucent_pass_follows_opaque_pass() {
    let mut world = world();
    let frame = world.tick(DT, &FrameInput::idle());
    let passes: Vec<RenderPass> = frame.draws().map(|d| d.pass).collect();
    let first_translucent = passes
        .iter()
        .position(|p| *p == RenderPass::Translucent)
        .unwrap();
    assert!(
        passes[first_translucent..]
            .iter()
            .all(|p| *p == RenderPass::Translucent)
    );
    assert!(
        frame
            .draws()
            .filter(|d| d.pass == RenderPass::Translucent)
            .all(|d| d.alpha == 0.5 && !d.pass.depth_write() && d.pass.blend())
    );
}

#[test]
fn test_camera_toggle_to_first_person() {
    let mut world = world();
    run(&mut world, 30, FrameInput::holding(&[Control::Accelerate]));
    press(&mut world, Control::ToggleCamera);
    assert_eq!(world.camera().mode(), CameraMode::FirstPerson);

    let player = world.player().position;
    let expected = player + Vec3::Z * 1.5 + Vec3::Y * 0.5;
    assert!(world.camera().position.distance(expected) < 1e-3);

    // Free-look is ignored in first person
    let yaw = world.camera().rig.orbit().yaw;
    let mut look = FrameInput::idle();
    look.look = glam::Vec2::new(100.0, 0.0);
    world.tick(DT, &look);
    assert_eq!(world.camera().rig.orbit().yaw, yaw);

    press(&mut world, Control::ToggleCamera);
    assert_eq!(world.camera().mode(), CameraMode::ThirdPerson);
}

#[test]
fn test_day_night_toggle_swaps_light_and_sky() {
    let mut world = world();
    let handles = SceneHandles::default();
    let frame = press(&mut world, Control::ToggleDayNight);
    assert_eq!(world.sky(), SkyMode::Night);

    let light = frame.commands().iter().find_map(|c| match c {
        RenderCommand::SetLight { light } => Some(*light),
        _ => None,
    });
    assert_eq!(light, Some(Light::for_mode(SkyMode::Night)));

    let sky = frame.commands().iter().find_map(|c| match c {
        RenderCommand::DrawSky { mode, cubemap, .. } => Some((*mode, *cubemap)),
        _ => None,
    });
    assert_eq!(sky, Some((SkyMode::Night, handles.sky(SkyMode::Night))));

    press(&mut world, Control::ToggleDayNight);
    assert_eq!(world.sky(), SkyMode::Day);
}

// ============================================================================
// Headless replay
// ============================================================================

const DRIVE_SCRIPT: &str = r#"
tick_rate = 60

frames = [
  { f = 0, input = "accelerate", snap = true },
  { f = 119, assert = "$player_speed < 9" },
  { f = 120, input = "accelerate+launch", snap = true, assert = "$player_speed == 9" },
  { f = 121, input = "W", assert = "$translucent_first == 1" },
  { f = 122, assert = "$ghosts_moving == 1" },
  { f = 180, assert = "$ghost1_z > $player_z" },
  { f = 181, snap = true },
  { f = 182, assert = "$player_z > $prev_player_z" },
]
"#;

#[test]
fn test_headless_script_through_world() {
    let config = GameConfig::default();
    let script = ReplayScript::from_toml(DRIVE_SCRIPT).unwrap();
    let compiled = Compiler::new(&config.keys).compile(&script).unwrap();

    let mut runner = HeadlessRunner::new(compiled, HeadlessConfig::default());
    runner.register_debug_variables(DEBUG_VARIABLES);
    let mut backend = WorldBackend::new(world_with(config), runner.frame_delta());

    let report = runner.execute_with_backend(&mut backend).unwrap();

    assert_eq!(report.frames_run, 183);
    assert_eq!(report.snapshots.len(), 3);
    assert_eq!(report.outcome.failed, 0, "{:?}", report.assertions);
    assert_eq!(report.outcome.passed, 6);
    assert!(report.passed());
    assert!(backend.world().ghosts_moving());

    let race = report.race.as_ref().unwrap();
    assert_eq!(race.phase, RacePhase::Running);
    assert!(race.ghosts_moving);
    assert_eq!(race.player_speed, 9.0);
    assert_ne!(race.leader, BodyId::Player);

    let launch = &report.snapshots[1];
    assert_eq!(launch.input, "accelerate+launch");
    let delta = launch.delta.as_ref().unwrap();
    assert_eq!(
        delta.get("$ghosts_moving").map(String::as_str),
        Some("false -> true")
    );
}

#[test]
fn test_headless_script_failure_is_reported() {
    let script = ReplayScript::from_toml(
        "frames = [{ f = 0, input = \"brake\" }, { f = 30, assert = \"$player_speed > 0\" }]",
    )
    .unwrap();
    let config = GameConfig::default();
    let compiled = Compiler::new(&config.keys).compile(&script).unwrap();
    let mut runner = HeadlessRunner::new(compiled, HeadlessConfig::default());
    let mut backend = WorldBackend::new(world_with(config), runner.frame_delta());

    let report = runner.execute_with_backend(&mut backend).unwrap();
    assert_eq!(report.outcome.failed, 1);
    assert_eq!(report.outcome.verdict, Verdict::Failed);
    assert!(report.assertions[0].actual.is_some_and(|v| v < 0.0));
    assert_eq!(report.assertions[0].expected.as_deref(), Some("> 0"));
    assert_eq!(report.race.as_ref().unwrap().phase, RacePhase::NotStarted);
}
