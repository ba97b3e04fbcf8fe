//! Logical controls recognized by the simulation
//!
//! Controls are device-independent. The mapping from physical keys to controls
//! lives in [`crate::config::KeyBindings`].

use std::fmt;

/// A single logical control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Accelerate,
    Brake,
    TurnLeft,
    TurnRight,
    StrafeLeft,
    StrafeRight,
    Rise,
    Fall,
    ToggleCamera,
    ToggleDayNight,
    LaunchGhosts,
}

impl Control {
    /// Every control, in declaration order
    pub const ALL: [Control; 11] = [
        Control::Accelerate,
        Control::Brake,
        Control::TurnLeft,
        Control::TurnRight,
        Control::StrafeLeft,
        Control::StrafeRight,
        Control::Rise,
        Control::Fall,
        Control::ToggleCamera,
        Control::ToggleDayNight,
        Control::LaunchGhosts,
    ];

    /// Controls that act once per press rather than every frame
    pub const EDGE_TRIGGERED: [Control; 3] = [
        Control::ToggleCamera,
        Control::ToggleDayNight,
        Control::LaunchGhosts,
    ];

    /// Canonical snake_case name used in scripts and config files
    pub fn name(self) -> &'static str {
        match self {
            Control::Accelerate => "accelerate",
            Control::Brake => "brake",
            Control::TurnLeft => "turn_left",
            Control::TurnRight => "turn_right",
            Control::StrafeLeft => "strafe_left",
            Control::StrafeRight => "strafe_right",
            Control::Rise => "rise",
            Control::Fall => "fall",
            Control::ToggleCamera => "toggle_camera",
            Control::ToggleDayNight => "toggle_day_night",
            Control::LaunchGhosts => "launch",
        }
    }

    /// Parse a control name (case-insensitive, `-` and `_` interchangeable)
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = name.trim().to_lowercase().replace('-', "_");
        match normalized.as_str() {
            "launch_ghosts" => Some(Control::LaunchGhosts),
            "reverse" => Some(Control::Brake),
            other => Control::ALL.into_iter().find(|c| c.name() == other),
        }
    }

    /// Flag bit for this control
    pub fn flag(self) -> ControlSet {
        match self {
            Control::Accelerate => ControlSet::ACCELERATE,
            Control::Brake => ControlSet::BRAKE,
            Control::TurnLeft => ControlSet::TURN_LEFT,
            Control::TurnRight => ControlSet::TURN_RIGHT,
            Control::StrafeLeft => ControlSet::STRAFE_LEFT,
            Control::StrafeRight => ControlSet::STRAFE_RIGHT,
            Control::Rise => ControlSet::RISE,
            Control::Fall => ControlSet::FALL,
            Control::ToggleCamera => ControlSet::TOGGLE_CAMERA,
            Control::ToggleDayNight => ControlSet::TOGGLE_DAY_NIGHT,
            Control::LaunchGhosts => ControlSet::LAUNCH_GHOSTS,
        }
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

bitflags::bitflags! {
    /// Set of controls held during a frame
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ControlSet: u16 {
        const ACCELERATE = 1 << 0;
        const BRAKE = 1 << 1;
        const TURN_LEFT = 1 << 2;
        const TURN_RIGHT = 1 << 3;
        const STRAFE_LEFT = 1 << 4;
        const STRAFE_RIGHT = 1 << 5;
        const RISE = 1 << 6;
        const FALL = 1 << 7;
        const TOGGLE_CAMERA = 1 << 8;
        const TOGGLE_DAY_NIGHT = 1 << 9;
        const LAUNCH_GHOSTS = 1 << 10;
    }
}

impl ControlSet {
    /// Check whether a control is held
    pub fn held(&self, control: Control) -> bool {
        self.contains(control.flag())
    }

    /// Symbolic form, e.g. `"accelerate+turn_left"` or `"idle"`
    pub fn to_symbolic(&self) -> String {
        let names: Vec<&str> = Control::ALL
            .into_iter()
            .filter(|c| self.held(*c))
            .map(Control::name)
            .collect();
        if names.is_empty() {
            "idle".to_string()
        } else {
            names.join("+")
        }
    }
}

impl FromIterator<Control> for ControlSet {
    fn from_iter<I: IntoIterator<Item = Control>>(iter: I) -> Self {
        iter.into_iter()
            .fold(ControlSet::empty(), |set, c| set | c.flag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_name_roundtrip() {
        for control in Control::ALL {
            assert_eq!(Control::from_name(control.name()), Some(control));
        }
    }

    #[test]
    fn test_control_from_name_aliases() {
        assert_eq!(Control::from_name("Launch-Ghosts"), Some(Control::LaunchGhosts));
        assert_eq!(Control::from_name("TURN-LEFT"), Some(Control::TurnLeft));
        assert_eq!(Control::from_name("reverse"), Some(Control::Brake));
        assert_eq!(Control::from_name("jump"), None);
    }

    #[test]
    fn test_control_flags_are_distinct() {
        let all: ControlSet = Control::ALL.into_iter().collect();
        assert_eq!(all.bits().count_ones(), Control::ALL.len() as u32);
    }

    #[test]
    fn test_control_set_symbolic() {
        assert_eq!(ControlSet::empty().to_symbolic(), "idle");
        let set: ControlSet = [Control::TurnLeft, Control::Accelerate].into_iter().collect();
        assert_eq!(set.to_symbolic(), "accelerate+turn_left");
        assert!(set.held(Control::Accelerate));
        assert!(!set.held(Control::Brake));
    }
}
