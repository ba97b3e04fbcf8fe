//! Replay script validation.

use hashbrown::HashSet;

use super::ast::ReplayScript;

/// Highest frame a script may name; compiled scripts hold one input per frame
pub const MAX_SCRIPT_FRAME: u64 = 1_000_000;

/// Validation errors for replay scripts.
#[derive(Debug, Clone)]
pub enum ValidationError {
    /// Tick rate must be positive.
    InvalidTickRate(u32),
    /// Script has no frame entries.
    NoFrames,
    /// Duplicate frame entry.
    DuplicateFrame(u64),
    /// Look or scroll delta is NaN or infinite.
    NonFiniteDelta(u64),
    /// Frame number past [`MAX_SCRIPT_FRAME`].
    FrameTooLarge(u64),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::InvalidTickRate(rate) => write!(f, "invalid tick rate: {}", rate),
            ValidationError::NoFrames => write!(f, "script has no frames"),
            ValidationError::DuplicateFrame(frame) => write!(f, "duplicate frame: {}", frame),
            ValidationError::NonFiniteDelta(frame) => {
                write!(f, "look/scroll must be finite at frame {}", frame)
            }
            ValidationError::FrameTooLarge(frame) => write!(
                f,
                "frame {} is past the limit of {}",
                frame, MAX_SCRIPT_FRAME
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate a parsed replay script before compilation.
pub fn validate_script(script: &ReplayScript) -> Result<(), ValidationError> {
    if script.tick_rate == 0 {
        return Err(ValidationError::InvalidTickRate(script.tick_rate));
    }

    if script.frames.is_empty() {
        return Err(ValidationError::NoFrames);
    }

    let mut frames = HashSet::new();
    for entry in &script.frames {
        if entry.f > MAX_SCRIPT_FRAME {
            return Err(ValidationError::FrameTooLarge(entry.f));
        }
        if !frames.insert(entry.f) {
            return Err(ValidationError::DuplicateFrame(entry.f));
        }

        let look_finite = entry
            .look
            .is_none_or(|[dx, dy]| dx.is_finite() && dy.is_finite());
        let scroll_finite = entry.scroll.is_none_or(f32::is_finite);
        if !look_finite || !scroll_finite {
            return Err(ValidationError::NonFiniteDelta(entry.f));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay::script::FrameEntry;

    fn script(frames: Vec<FrameEntry>) -> ReplayScript {
        ReplayScript {
            tick_rate: 60,
            frames,
        }
    }

    fn frame(f: u64) -> FrameEntry {
        FrameEntry {
            f,
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_script() {
        assert!(validate_script(&script(vec![frame(0), frame(10)])).is_ok());
    }

    #[test]
    fn test_zero_tick_rate() {
        let mut s = script(vec![frame(0)]);
        s.tick_rate = 0;
        assert!(matches!(
            validate_script(&s),
            Err(ValidationError::InvalidTickRate(0))
        ));
    }

    #[test]
    fn test_empty_script() {
        assert!(matches!(
            validate_script(&script(vec![])),
            Err(ValidationError::NoFrames)
        ));
    }

    #[test]
    fn test_duplicate_frame() {
        assert!(matches!(
            validate_script(&script(vec![frame(3), frame(1), frame(3)])),
            Err(ValidationError::DuplicateFrame(3))
        ));
    }

    #[test]
    fn test_non_finite_delta() {
        let mut bad = frame(7);
        bad.scroll = Some(f32::INFINITY);
        assert!(matches!(
            validate_script(&script(vec![frame(0), bad])),
            Err(ValidationError::NonFiniteDelta(7))
        ));
    }

    #[test]
    fn test_frame_limit() {
        assert!(validate_script(&script(vec![frame(MAX_SCRIPT_FRAME)])).is_ok());
        assert!(matches!(
            validate_script(&script(vec![frame(0), frame(1 << 62)])),
            Err(ValidationError::FrameTooLarge(f)) if f == 1 << 62
        ));
    }
}
