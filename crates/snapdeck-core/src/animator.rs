//! Transition animator: moves the container to one target section at a time.

use std::time::Instant;

use crate::config::ScrollConfig;
use crate::scroll::{Frame, ScrollAnimator};

/// A section transition that is in flight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub from_index: usize,
    pub target_index: usize,
    pub target_offset: f64,
}

/// Progress report from one animation step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub offset: f64,
    /// Set once the container has reached the target
    pub completed: Option<Transition>,
}

/// Drives the scroll offset towards the committed target.
///
/// Holds no queue: the arbiter only starts a transition when none is in
/// flight, so `animate_to` simply replaces whatever was there.
#[derive(Debug, Clone)]
pub struct TransitionAnimator {
    scroll: ScrollAnimator,
    active: Option<Transition>,
}

impl TransitionAnimator {
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            scroll: ScrollAnimator::new(config),
            active: None,
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Start moving from `from_offset` to the target section's offset.
    ///
    /// Returns the first step; with smooth scrolling disabled it already
    /// carries the completion.
    pub fn animate_to(&mut self, transition: Transition, from_offset: f64, now: Instant) -> Step {
        let frame = self
            .scroll
            .scroll_to(from_offset, transition.target_offset, now);
        self.active = Some(transition);
        self.finish_if_done(frame)
    }

    /// Advance to `now`; `None` when nothing is in flight
    pub fn step(&mut self, now: Instant) -> Option<Step> {
        self.active?;
        let frame = match self.scroll.update(now) {
            Some(frame) => frame,
            // The animator can only be idle here if the transition was
            // instant, in which case it already completed.
            None => Frame {
                offset: self.scroll.current(),
                finished: true,
            },
        };
        Some(self.finish_if_done(frame))
    }

    /// Drop the in-flight transition without reaching its target
    pub fn abandon(&mut self) -> Option<Transition> {
        self.scroll.cancel();
        self.active.take()
    }

    fn finish_if_done(&mut self, frame: Frame) -> Step {
        let completed = if frame.finished {
            self.active.take()
        } else {
            None
        };
        Step {
            offset: frame.offset,
            completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn transition(to: usize, offset: f64) -> Transition {
        Transition {
            from_index: 0,
            target_index: to,
            target_offset: offset,
        }
    }

    #[test]
    fn test_completes_after_duration() {
        let mut animator = TransitionAnimator::new(ScrollConfig {
            animation_duration_ms: 200,
            ..Default::default()
        });
        let t0 = Instant::now();

        let first = animator.animate_to(transition(1, 100.0), 0.0, t0);
        assert!(first.completed.is_none());
        assert!(animator.is_running());

        let mid = animator.step(t0 + Duration::from_millis(100)).unwrap();
        assert!(mid.completed.is_none());
        assert!((mid.offset - 87.5).abs() < 0.5);

        let done = animator.step(t0 + Duration::from_millis(200)).unwrap();
        assert_eq!(done.completed.map(|t| t.target_index), Some(1));
        assert_eq!(done.offset, 100.0);
        assert!(!animator.is_running());
        assert!(animator.step(t0 + Duration::from_millis(300)).is_none());
    }

    #[test]
    fn test_instant_transition_completes_immediately() {
        let mut animator = TransitionAnimator::new(ScrollConfig {
            smooth_enabled: false,
            ..Default::default()
        });
        let step = animator.animate_to(transition(2, 200.0), 0.0, Instant::now());
        assert_eq!(step.offset, 200.0);
        assert!(step.completed.is_some());
        assert!(!animator.is_running());
    }

    #[test]
    fn test_abandon() {
        let mut animator = TransitionAnimator::new(ScrollConfig::default());
        animator.animate_to(transition(1, 100.0), 0.0, Instant::now());
        assert_eq!(animator.abandon().map(|t| t.target_index), Some(1));
        assert!(animator.abandon().is_none());
    }
}
