//! Rising-edge detection for press-once controls

use hashbrown::HashMap;

use crate::controls::Control;

/// Remembers the last observed state of each control
#[derive(Debug, Clone, Default)]
pub struct EdgeDetector {
    previous: HashMap<Control, bool>,
}

impl EdgeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `current` for `control` and report whether it just went from
    /// released to held.
    ///
    /// Must be called every frame for a control, held or not, or releases
    /// are missed and the next press will not fire.
    pub fn rose(&mut self, control: Control, current: bool) -> bool {
        let was = self.previous.insert(control, current).unwrap_or(false);
        current && !was
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rose_fires_once_per_press() {
        let mut edges = EdgeDetector::new();
        assert!(edges.rose(Control::LaunchGhosts, true));
        assert!(!edges.rose(Control::LaunchGhosts, true));
        assert!(!edges.rose(Control::LaunchGhosts, true));
        assert!(!edges.rose(Control::LaunchGhosts, false));
        assert!(edges.rose(Control::LaunchGhosts, true));
    }

    #[test]
    fn test_controls_are_independent() {
        let mut edges = EdgeDetector::new();
        assert!(edges.rose(Control::ToggleCamera, true));
        assert!(edges.rose(Control::ToggleDayNight, true));
        assert!(!edges.rose(Control::ToggleCamera, true));
        // Releasing one control leaves the other held
        assert!(!edges.rose(Control::ToggleCamera, false));
        assert!(!edges.rose(Control::ToggleDayNight, true));
        assert!(edges.rose(Control::LaunchGhosts, true));
    }

    #[test]
    fn test_released_never_fires() {
        let mut edges = EdgeDetector::new();
        for _ in 0..3 {
            assert!(!edges.rose(Control::ToggleCamera, false));
        }
    }
}
