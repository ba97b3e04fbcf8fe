//! Input polling
//!
//! The simulation never talks to devices. A frame driver polls an
//! [`InputState`] once per frame into a [`FrameInput`] snapshot, and
//! [`crate::world::WorldState::tick`] consumes only that snapshot.

mod edge;

pub use edge::EdgeDetector;

use glam::Vec2;

use crate::controls::{Control, ControlSet};

/// Device-side input source
///
/// `is_active` is level-triggered. Pointer and scroll deltas are accumulated
/// by the implementation and drained on query.
pub trait InputState {
    /// Whether the control is currently held
    fn is_active(&self, control: Control) -> bool;

    /// Pointer movement accumulated since the last call, as `(dx, dy)`
    ///
    /// `dy` is positive when the pointer moves up.
    fn pointer_delta(&mut self) -> (f32, f32);

    /// Scroll accumulated since the last call
    fn scroll_delta(&mut self) -> f32;
}

/// Everything the simulation reads from input for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// Controls held this frame
    pub held: ControlSet,
    /// Free-look pointer delta
    pub look: Vec2,
    /// Scroll delta (positive zooms in)
    pub scroll: f32,
}

impl FrameInput {
    /// Input with nothing held and no pointer motion
    pub fn idle() -> Self {
        Self::default()
    }

    /// Input holding the given controls
    pub fn holding(controls: &[Control]) -> Self {
        Self {
            held: controls.iter().copied().collect(),
            ..Self::default()
        }
    }

    /// Poll an input source
    pub fn capture<I: InputState + ?Sized>(source: &mut I) -> Self {
        let held = Control::ALL
            .into_iter()
            .filter(|c| source.is_active(*c))
            .collect();
        let (dx, dy) = source.pointer_delta();
        Self {
            held,
            look: Vec2::new(dx, dy),
            scroll: source.scroll_delta(),
        }
    }

    /// Check whether a control is held
    pub fn is_held(&self, control: Control) -> bool {
        self.held.held(control)
    }
}
