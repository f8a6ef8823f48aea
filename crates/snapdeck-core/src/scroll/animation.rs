//! Offset animation controller
//!
//! Moves a scroll offset from one position to another over a fixed
//! duration, decelerating into the target section.

use std::time::{Duration, Instant};

use super::timing::{is_complete, lerp, progress, ScrollConfigExt};
use crate::config::ScrollConfig;

/// Cubic ease-out: fast departure, gentle arrival at the section boundary
#[inline]
fn settle(t: f64) -> f64 {
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

/// Active scroll animation state
#[derive(Debug, Clone)]
struct ActiveAnimation {
    /// Animation start time
    start: Instant,
    /// Starting scroll offset
    from: f64,
    /// Target scroll offset
    to: f64,
    /// Animation duration
    duration: Duration,
}

/// One step of an animation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Offset to apply to the container
    pub offset: f64,
    /// Whether the animation reached its target with this frame
    pub finished: bool,
}

/// Scroll animation controller
///
/// Call `scroll_to()` to begin an animation, then `update()` each frame
/// to get the current interpolated offset.
#[derive(Debug, Clone, Default)]
pub struct ScrollAnimator {
    /// Current active animation (if any)
    animation: Option<ActiveAnimation>,
    /// Configuration
    config: ScrollConfig,
    /// Last offset produced
    current: f64,
}

impl ScrollAnimator {
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            animation: None,
            config,
            current: 0.0,
        }
    }

    /// Check if an animation is currently active
    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Final offset of the active animation, or the last produced offset
    pub fn target(&self) -> f64 {
        self.animation.as_ref().map(|a| a.to).unwrap_or(self.current)
    }

    /// Last produced offset
    #[inline]
    pub fn current(&self) -> f64 {
        self.current
    }

    /// Start an animation from `from` to `to`.
    ///
    /// Returns the first frame. With smooth scrolling disabled, or when
    /// already at the target, the first frame is already finished.
    pub fn scroll_to(&mut self, from: f64, to: f64, now: Instant) -> Frame {
        self.current = from;

        if !self.config.is_smooth() || (from - to).abs() < f64::EPSILON {
            self.animation = None;
            self.current = to;
            return Frame {
                offset: to,
                finished: true,
            };
        }

        self.animation = Some(ActiveAnimation {
            start: now,
            from,
            to,
            duration: self.config.animation_duration(),
        });

        Frame {
            offset: from,
            finished: false,
        }
    }

    /// Advance the animation to `now`.
    ///
    /// Returns `None` when no animation is active.
    pub fn update(&mut self, now: Instant) -> Option<Frame> {
        let anim = self.animation.as_ref()?;

        if is_complete(anim.start, anim.duration, now) {
            self.current = anim.to;
            self.animation = None;
            return Some(Frame {
                offset: self.current,
                finished: true,
            });
        }

        let t = progress(anim.start, anim.duration, now);
        self.current = lerp(anim.from, anim.to, settle(t));
        Some(Frame {
            offset: self.current,
            finished: false,
        })
    }

    /// Cancel any active animation and stop at the last produced offset
    pub fn cancel(&mut self) {
        self.animation = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn smooth(duration_ms: u64) -> ScrollConfig {
        ScrollConfig {
            smooth_enabled: true,
            animation_duration_ms: duration_ms,
            ..Default::default()
        }
    }

    #[test]
    fn test_settle_curve_endpoints() {
        assert!(settle(0.0).abs() < f64::EPSILON);
        assert!((settle(1.0) - 1.0).abs() < f64::EPSILON);
        assert!(settle(0.25) > 0.25);
        assert!(settle(0.6) < settle(0.7));
    }

    #[test]
    fn test_instant_when_disabled() {
        let config = ScrollConfig {
            smooth_enabled: false,
            ..Default::default()
        };
        let mut animator = ScrollAnimator::new(config);

        let frame = animator.scroll_to(0.0, 100.0, Instant::now());
        assert!(frame.finished);
        assert_eq!(frame.offset, 100.0);
        assert!(!animator.is_animating());
    }

    #[test]
    fn test_animation_interpolates_then_finishes() {
        let mut animator = ScrollAnimator::new(smooth(100));
        let t0 = Instant::now();

        let first = animator.scroll_to(0.0, 200.0, t0);
        assert!(!first.finished);
        assert!(animator.is_animating());
        assert_eq!(animator.target(), 200.0);

        let mid = animator.update(t0 + Duration::from_millis(50)).unwrap();
        assert!(!mid.finished);
        // Halfway in time is 7/8 of the distance
        assert!((mid.offset - 175.0).abs() < 0.5);

        let end = animator.update(t0 + Duration::from_millis(100)).unwrap();
        assert!(end.finished);
        assert_eq!(end.offset, 200.0);
        assert!(animator.update(t0 + Duration::from_millis(120)).is_none());
    }

    #[test]
    fn test_backward_animation() {
        let mut animator = ScrollAnimator::new(smooth(100));
        let t0 = Instant::now();
        animator.scroll_to(300.0, 100.0, t0);

        let frame = animator.update(t0 + Duration::from_millis(40)).unwrap();
        assert!(frame.offset < 300.0 && frame.offset > 100.0);
    }

    #[test]
    fn test_already_at_target() {
        let mut animator = ScrollAnimator::new(smooth(100));
        let frame = animator.scroll_to(50.0, 50.0, Instant::now());
        assert!(frame.finished);
        assert!(!animator.is_animating());
    }

    #[test]
    fn test_cancel_keeps_last_offset() {
        let mut animator = ScrollAnimator::new(smooth(100));
        let t0 = Instant::now();
        animator.scroll_to(0.0, 100.0, t0);
        animator.update(t0 + Duration::from_millis(30));
        animator.cancel();

        assert!(!animator.is_animating());
        assert!((animator.current() - 65.7).abs() < 0.5);
        assert!((animator.target() - animator.current()).abs() < f64::EPSILON);
    }
}
