//! Race state machine
//!
//! `NotStarted -> Running -> Finished`, with a fresh `Running` on every ghost
//! launch. Each body latches its own finished flag the first frame its z
//! reaches the finish line; the race finishes once all three have latched.

use glam::Vec3;
use serde::Serialize;

use crate::config::GhostConfig;
use crate::motion::{Body, BodyId, Pose};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RacePhase {
    #[default]
    NotStarted,
    Running,
    Finished,
}

impl RacePhase {
    /// Numeric code for debug output (0, 1, 2)
    pub fn code(self) -> u32 {
        match self {
            RacePhase::NotStarted => 0,
            RacePhase::Running => 1,
            RacePhase::Finished => 2,
        }
    }
}

/// Something that happened during [`RaceState::evaluate`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RaceEvent {
    BodyFinished(BodyId),
    RaceFinished { elapsed: f64 },
}

/// Ghost headings, speeds and spawn points fixed at launch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GhostLaunch {
    pub heading: f32,
    pub ghost1_speed: f32,
    pub ghost2_speed: f32,
    pub ghost1_position: Vec3,
    pub ghost2_position: Vec3,
}

impl GhostLaunch {
    /// Place the ghosts either side of the player, facing the player's heading
    pub fn from_player(player: Pose, config: &GhostConfig) -> Self {
        let (sin, cos) = player.heading.to_radians().sin_cos();
        let side = Vec3::new(cos, 0.0, -sin) * config.side_distance;
        Self {
            heading: player.heading,
            ghost1_speed: config.ghost1_speed,
            ghost2_speed: config.ghost2_speed,
            ghost1_position: player.position + side,
            ghost2_position: player.position - side,
        }
    }

    /// Cruising speed of a ghost
    pub fn speed_of(&self, id: BodyId) -> Option<f32> {
        match id {
            BodyId::Player => None,
            BodyId::Ghost1 => Some(self.ghost1_speed),
            BodyId::Ghost2 => Some(self.ghost2_speed),
        }
    }

    /// Spawn point of a ghost
    pub fn position_of(&self, id: BodyId) -> Option<Vec3> {
        match id {
            BodyId::Player => None,
            BodyId::Ghost1 => Some(self.ghost1_position),
            BodyId::Ghost2 => Some(self.ghost2_position),
        }
    }
}

/// Per-race progress
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RaceState {
    phase: RacePhase,
    finished: [bool; 3],
    start_time: Option<f64>,
    finish_time: Option<f64>,
}

impl RaceState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> RacePhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == RacePhase::Finished
    }

    pub fn body_finished(&self, id: BodyId) -> bool {
        self.finished[id.index()]
    }

    /// World time the current race started
    pub fn start_time(&self) -> Option<f64> {
        self.start_time
    }

    /// Seconds from start to the last body crossing the line
    pub fn finish_time(&self) -> Option<f64> {
        self.finish_time
    }

    /// Begin a new race at world time `now`, clearing all progress
    pub fn start(&mut self, now: f64) {
        *self = Self {
            phase: RacePhase::Running,
            finished: [false; 3],
            start_time: Some(now),
            finish_time: None,
        };
        self.check_invariants();
    }

    /// Latch finish flags for bodies at or past `finish_line_z`.
    ///
    /// Only a running race is evaluated. Call once per frame after motion.
    pub fn evaluate(&mut self, bodies: &[Body], finish_line_z: f32, now: f64) -> Vec<RaceEvent> {
        let mut events = Vec::new();
        if self.phase != RacePhase::Running {
            return events;
        }

        for body in bodies {
            let flag = &mut self.finished[body.id.index()];
            if !*flag && body.position.z >= finish_line_z {
                *flag = true;
                events.push(RaceEvent::BodyFinished(body.id));
            }
        }

        if self.finished.iter().all(|f| *f) {
            let elapsed = now - self.start_time.unwrap_or(now);
            self.phase = RacePhase::Finished;
            self.finish_time = Some(elapsed);
            events.push(RaceEvent::RaceFinished { elapsed });
        }

        self.check_invariants();
        events
    }

    fn check_invariants(&self) {
        debug_assert!(
            self.phase != RacePhase::Finished || self.finished.iter().all(|f| *f),
            "race finished with a body still racing: {:?}",
            self.finished
        );
        debug_assert_eq!(
            self.phase == RacePhase::Finished,
            self.finish_time.is_some(),
            "finish time must be latched exactly when the race finishes"
        );
        debug_assert!(
            self.phase == RacePhase::NotStarted || self.start_time.is_some(),
            "a started race needs a start time"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bodies(zs: [f32; 3]) -> [Body; 3] {
        [
            Body::new(BodyId::Player, Vec3::new(0.0, 0.0, zs[0]), 0.0),
            Body::new(BodyId::Ghost1, Vec3::new(3.0, 0.0, zs[1]), 0.0),
            Body::new(BodyId::Ghost2, Vec3::new(-3.0, 0.0, zs[2]), 0.0),
        ]
    }

    #[test]
    fn test_not_started_ignores_crossings() {
        let mut race = RaceState::new();
        let events = race.evaluate(&bodies([50.0, 50.0, 50.0]), 40.0, 1.0);
        assert!(events.is_empty());
        assert_eq!(race.phase(), RacePhase::NotStarted);
        assert!(!race.body_finished(BodyId::Player));
    }

    #[test]
    fn test_flag_latches_across_the_line() {
        let mut race = RaceState::new();
        race.start(0.0);

        race.evaluate(&bodies([39.9, 0.0, 0.0]), 40.0, 0.1);
        assert!(!race.body_finished(BodyId::Player));

        let events = race.evaluate(&bodies([40.1, 0.0, 0.0]), 40.0, 0.2);
        assert_eq!(events, vec![RaceEvent::BodyFinished(BodyId::Player)]);
        assert!(race.body_finished(BodyId::Player));

        let events = race.evaluate(&bodies([35.0, 0.0, 0.0]), 40.0, 0.3);
        assert!(events.is_empty());
        assert!(race.body_finished(BodyId::Player));
    }

    #[test]
    fn test_exactly_on_the_line_counts() {
        let mut race = RaceState::new();
        race.start(0.0);
        race.evaluate(&bodies([40.0, 0.0, 0.0]), 40.0, 0.1);
        assert!(race.body_finished(BodyId::Player));
    }

    #[test]
    fn test_finishes_only_when_all_three_cross() {
        let mut race = RaceState::new();
        race.start(2.0);

        race.evaluate(&bodies([41.0, 41.0, 0.0]), 40.0, 5.0);
        assert_eq!(race.phase(), RacePhase::Running);
        assert_eq!(race.finish_time(), None);

        let events = race.evaluate(&bodies([41.0, 41.0, 41.0]), 40.0, 9.5);
        assert_eq!(race.phase(), RacePhase::Finished);
        assert_eq!(race.finish_time(), Some(7.5));
        assert_eq!(
            events,
            vec![
                RaceEvent::BodyFinished(BodyId::Ghost2),
                RaceEvent::RaceFinished { elapsed: 7.5 }
            ]
        );
    }

    #[test]
    fn test_finish_time_latched_once() {
        let mut race = RaceState::new();
        race.start(0.0);
        race.evaluate(&bodies([41.0, 41.0, 41.0]), 40.0, 3.0);
        let events = race.evaluate(&bodies([45.0, 45.0, 45.0]), 40.0, 8.0);
        assert!(events.is_empty());
        assert_eq!(race.finish_time(), Some(3.0));
    }

    #[test]
    fn test_restart_clears_everything() {
        let mut race = RaceState::new();
        race.start(0.0);
        race.evaluate(&bodies([41.0, 41.0, 41.0]), 40.0, 3.0);
        assert!(race.is_finished());

        race.start(10.0);
        assert_eq!(race.phase(), RacePhase::Running);
        assert_eq!(race.start_time(), Some(10.0));
        assert_eq!(race.finish_time(), None);
        for id in BodyId::ALL {
            assert!(!race.body_finished(id));
        }
    }

    #[test]
    fn test_ghost_launch_offsets_at_heading_zero() {
        let player = Pose {
            position: Vec3::new(0.0, 0.05, -48.0),
            heading: 0.0,
        };
        let launch = GhostLaunch::from_player(player, &GhostConfig::default());
        assert!((launch.ghost1_position - Vec3::new(3.0, 0.05, -48.0)).length() < 1e-5);
        assert!((launch.ghost2_position - Vec3::new(-3.0, 0.05, -48.0)).length() < 1e-5);
        assert_eq!(launch.heading, 0.0);
        assert_eq!(launch.speed_of(BodyId::Ghost1), Some(15.0));
        assert_eq!(launch.speed_of(BodyId::Ghost2), Some(6.0));
        assert_eq!(launch.speed_of(BodyId::Player), None);
    }

    #[test]
    fn test_ghost_launch_offsets_are_perpendicular_to_heading() {
        let player = Pose {
            position: Vec3::new(5.0, 0.0, 5.0),
            heading: 37.0,
        };
        let launch = GhostLaunch::from_player(player, &GhostConfig::default());
        let forward = player.forward();
        for id in [BodyId::Ghost1, BodyId::Ghost2] {
            let offset = launch.position_of(id).unwrap() - player.position;
            assert!(offset.dot(forward).abs() < 1e-5);
            assert!((offset.length() - 3.0).abs() < 1e-5);
        }
        assert_eq!(launch.heading, 37.0);
    }
}
