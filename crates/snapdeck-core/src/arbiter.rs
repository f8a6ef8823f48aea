//! Input arbiter vocabulary and pure decision rules.
//!
//! The stateful half lives in [`crate::controller`]; this module holds the
//! normalisation of raw input into intents and the outcome types every
//! handler reports.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Signed navigation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    #[inline]
    pub fn step(self) -> isize {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

/// Semantic navigation keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavKey {
    Next,
    Previous,
    First,
    Last,
}

/// A host input event, as recorded in replay traces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    /// Vertical wheel delta; positive scrolls towards later sections
    Wheel { delta_y: f64 },
    /// A semantic key press
    Key { key: NavKey },
    /// The container moved by itself (touch, inertia, scrollbar drag).
    /// `offset` optionally carries the new position for hosts that replay.
    NativeScroll {
        #[serde(default)]
        offset: Option<f64>,
    },
    /// A UI affordance asked for a specific section
    Jump { index: usize },
}

/// One recorded input, `at_ms` after the controller was attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceEntry {
    pub at_ms: u64,
    pub event: InputEvent,
}

/// Parse a JSON replay trace: an array of [`TraceEntry`]
pub fn parse_trace(json: &str) -> crate::Result<Vec<TraceEntry>> {
    Ok(serde_json::from_str(json)?)
}

/// What triggered a committed transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cause {
    Wheel,
    Key,
    Jump,
    Snap,
    DeepLink,
}

/// Why an input did not produce a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    /// The container reports no sections
    NoSections,
    /// A transition is in flight
    Locked,
    /// The post-transition cooldown has not expired
    CoolingDown,
    /// Wheel delta smaller than the deadzone
    BelowDeadzone,
    /// Already at the first or last section
    AtBoundary,
    /// Already resting on the requested section
    AlreadyThere,
}

/// Result of handing one input to the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Committed { from: usize, to: usize, cause: Cause },
    Ignored { reason: IgnoreReason },
    /// Native scroll observed; a settle check is pending
    Deferred,
}

impl Outcome {
    #[inline]
    pub fn ignored(reason: IgnoreReason) -> Self {
        Outcome::Ignored { reason }
    }

    #[inline]
    pub fn is_committed(&self) -> bool {
        matches!(self, Outcome::Committed { .. })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Committed { from, to, cause } => {
                write!(f, "committed {:?}: {} -> {}", cause, from, to)
            }
            Outcome::Ignored { reason } => write!(f, "ignored ({:?})", reason),
            Outcome::Deferred => write!(f, "deferred"),
        }
    }
}

/// Arbiter phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArbiterPhase {
    Idle,
    Cooling,
}

/// Reduce a wheel delta to a direction.
///
/// Magnitude beyond the deadzone is discarded so that devices reporting very
/// different delta scales advance by the same single section.
pub fn wheel_direction(delta_y: f64, deadzone: f64) -> Option<Direction> {
    if !delta_y.is_finite() || delta_y.abs() < deadzone.max(0.0) || delta_y == 0.0 {
        return None;
    }
    Some(if delta_y > 0.0 {
        Direction::Forward
    } else {
        Direction::Backward
    })
}

/// Step from `current` in `direction`, clamped to `[0, last]`
pub fn step_target(current: usize, direction: Direction, last: usize) -> usize {
    current
        .saturating_add_signed(direction.step())
        .min(last)
}

/// Resolve a semantic key to a target index
pub fn key_target(key: NavKey, current: usize, last: usize) -> usize {
    match key {
        NavKey::Next => step_target(current, Direction::Forward, last),
        NavKey::Previous => step_target(current, Direction::Backward, last),
        NavKey::First => 0,
        NavKey::Last => last,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wheel_deadzone() {
        assert_eq!(wheel_direction(4.0, 30.0), None);
        assert_eq!(wheel_direction(-29.9, 30.0), None);
        assert_eq!(wheel_direction(30.0, 30.0), Some(Direction::Forward));
        assert_eq!(wheel_direction(-500.0, 30.0), Some(Direction::Backward));
        assert_eq!(wheel_direction(f64::NAN, 30.0), None);
        assert_eq!(wheel_direction(0.0, 0.0), None);
    }

    #[test]
    fn test_step_target_clamps() {
        assert_eq!(step_target(0, Direction::Backward, 3), 0);
        assert_eq!(step_target(3, Direction::Forward, 3), 3);
        assert_eq!(step_target(1, Direction::Forward, 3), 2);
        assert_eq!(step_target(9, Direction::Backward, 3), 3);
    }

    #[test]
    fn test_key_target() {
        assert_eq!(key_target(NavKey::First, 2, 3), 0);
        assert_eq!(key_target(NavKey::Last, 0, 3), 3);
        assert_eq!(key_target(NavKey::Next, 3, 3), 3);
        assert_eq!(key_target(NavKey::Previous, 0, 3), 0);
    }

    #[test]
    fn test_input_event_json_shape() {
        let events: Vec<InputEvent> = serde_json::from_str(
            r#"[
                {"type": "wheel", "delta_y": -120},
                {"type": "key", "key": "last"},
                {"type": "native_scroll"},
                {"type": "jump", "index": 2}
            ]"#,
        )
        .unwrap();
        assert_eq!(events[0], InputEvent::Wheel { delta_y: -120.0 });
        assert_eq!(events[1], InputEvent::Key { key: NavKey::Last });
        assert_eq!(events[2], InputEvent::NativeScroll { offset: None });
        assert_eq!(events[3], InputEvent::Jump { index: 2 });
    }

    #[test]
    fn test_parse_trace() {
        let trace =
            parse_trace(r#"[{"at_ms": 40, "event": {"type": "key", "key": "next"}}]"#).unwrap();
        assert_eq!(
            trace,
            vec![TraceEntry {
                at_ms: 40,
                event: InputEvent::Key { key: NavKey::Next }
            }]
        );
        assert!(matches!(parse_trace("{}"), Err(crate::Error::Json(_))));
    }

    #[test]
    fn test_outcome_display() {
        let committed = Outcome::Committed {
            from: 0,
            to: 1,
            cause: Cause::Wheel,
        };
        assert_eq!(committed.to_string(), "committed Wheel: 0 -> 1");
        assert_eq!(
            Outcome::ignored(IgnoreReason::AtBoundary).to_string(),
            "ignored (AtBoundary)"
        );
    }
}
