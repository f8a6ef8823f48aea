//! The section controller: one per mounted page.
//!
//! Owns the host container and the navigation state, runs the input arbiter
//! over wheel, key, jump and native-scroll input, and drives the transition
//! animator. Timers are deadlines evaluated in [`SectionController::tick`];
//! the host event loop decides when to call it via
//! [`SectionController::next_deadline`] and
//! [`SectionController::needs_fast_update`].

use std::time::Instant;

use tokio::sync::watch;
use tracing::{debug, info, trace, warn};

use crate::animator::{Step, Transition, TransitionAnimator};
use crate::arbiter::{
    key_target, step_target, wheel_direction, ArbiterPhase, Cause, IgnoreReason, InputEvent,
    NavKey, Outcome,
};
use crate::config::{AppConfig, NavigationConfig, ScrollConfig};
use crate::publisher::{NavSnapshot, StatePublisher};
use crate::scroll::timing::is_due;
use crate::section::{find_by_identifier, last_index, list_sections, ScrollContainer, Section};
use crate::tracker::{current_index_for, distance_to};

/// Everything a controller needs besides its container
#[derive(Debug, Clone, Default)]
pub struct ControllerSettings {
    pub navigation: NavigationConfig,
    pub scroll: ScrollConfig,
}

impl From<&AppConfig> for ControllerSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            navigation: config.navigation.clone(),
            scroll: config.ui.scroll.clone(),
        }
    }
}

/// Mutable navigation state, one instance per attached controller
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavigationState {
    /// Section the viewport is believed to rest on
    pub current_index: usize,
    /// A committed transition has not completed or been released yet
    pub is_animating: bool,
    /// Wheel input is ignored before this instant
    pub cooldown_until: Option<Instant>,
    /// Deadline of the single native-scroll debounce timer
    pub pending_debounce: Option<Instant>,
}

#[derive(Debug, Clone)]
struct PendingDeepLink {
    identifier: String,
    due: Instant,
}

/// Extract a section identifier from a URL fragment.
///
/// Accepts `#id`, a bare `id`, or a full URL whose fragment is used.
/// Returns `Ok(None)` when there is no fragment to follow.
pub fn fragment_identifier(raw: &str) -> crate::Result<Option<String>> {
    let raw = raw.trim();
    let fragment = if raw.contains("://") {
        let url = url::Url::parse(raw)?;
        match url.fragment() {
            Some(fragment) => fragment.to_string(),
            None => return Ok(None),
        }
    } else {
        raw.trim_start_matches('#').to_string()
    };

    if fragment.is_empty() {
        return Ok(None);
    }
    if fragment.chars().any(char::is_whitespace) {
        return Err(crate::Error::InvalidFragment(fragment));
    }
    Ok(Some(fragment))
}

pub struct SectionController<C: ScrollContainer> {
    container: C,
    navigation: NavigationConfig,
    state: NavigationState,
    animator: TransitionAnimator,
    publisher: StatePublisher,
    deep_link: Option<PendingDeepLink>,
}

impl<C: ScrollContainer> SectionController<C> {
    /// Attach to `container`.
    ///
    /// `fragment` is the page URL fragment read once at mount; a matching
    /// section is jumped to after the configured settle delay.
    pub fn attach(
        container: C,
        settings: ControllerSettings,
        fragment: Option<&str>,
        now: Instant,
    ) -> Self {
        let deep_link = match fragment.map(fragment_identifier).transpose() {
            Ok(identifier) => identifier.flatten().map(|identifier| PendingDeepLink {
                identifier,
                due: now + settings.navigation.deep_link_delay(),
            }),
            Err(e) => {
                warn!("Ignoring fragment: {}", e);
                None
            }
        };

        let mut controller = Self {
            container,
            navigation: settings.navigation,
            state: NavigationState::default(),
            animator: TransitionAnimator::new(settings.scroll),
            publisher: StatePublisher::default(),
            deep_link,
        };

        let sections = controller.sections();
        if sections.is_empty() {
            info!("Attached to a container without sections; navigation disabled");
        }
        controller.refresh(&sections);
        controller.sync();
        debug!(
            sections = sections.len(),
            current = controller.state.current_index,
            deep_link = ?controller.deep_link.as_ref().map(|d| d.identifier.as_str()),
            "Section controller attached"
        );
        controller
    }

    /// Detach, handing the container back to the host
    pub fn detach(self) -> C {
        debug!(current = self.state.current_index, "Section controller detached");
        self.container
    }

    pub fn container(&self) -> &C {
        &self.container
    }

    /// Mutable access for host-side changes (resize, content updates).
    /// Scrolling through this handle should be followed by
    /// [`Self::on_native_scroll`].
    pub fn container_mut(&mut self) -> &mut C {
        &mut self.container
    }

    #[inline]
    pub fn current_index(&self) -> usize {
        self.state.current_index
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.state.is_animating
    }

    #[inline]
    pub fn is_debouncing(&self) -> bool {
        self.state.pending_debounce.is_some()
    }

    pub fn phase(&self, now: Instant) -> ArbiterPhase {
        let cooling = self.state.cooldown_until.is_some_and(|until| now < until);
        if self.state.is_animating || cooling {
            ArbiterPhase::Cooling
        } else {
            ArbiterPhase::Idle
        }
    }

    /// Live section list
    pub fn sections(&self) -> Vec<Section> {
        list_sections(&self.container)
    }

    pub fn snapshot(&self) -> NavSnapshot {
        self.publisher.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<NavSnapshot> {
        self.publisher.subscribe()
    }

    /// Whether the host should tick at animation frame rate
    #[inline]
    pub fn needs_fast_update(&self) -> bool {
        self.animator.is_running()
    }

    /// Earliest timer deadline the host must tick for
    pub fn next_deadline(&self) -> Option<Instant> {
        let release = self
            .state
            .is_animating
            .then_some(self.state.cooldown_until)
            .flatten();
        [
            release,
            self.state.pending_debounce,
            self.deep_link.as_ref().map(|d| d.due),
        ]
        .into_iter()
        .flatten()
        .min()
    }

    /// Dispatch a host input event
    pub fn handle(&mut self, event: &InputEvent, now: Instant) -> Outcome {
        match *event {
            InputEvent::Wheel { delta_y } => self.on_wheel(delta_y, now),
            InputEvent::Key { key } => self.on_key(key, now),
            InputEvent::NativeScroll { offset } => {
                if let Some(offset) = offset {
                    self.container.set_scroll_offset(offset);
                }
                self.on_native_scroll(now)
            }
            InputEvent::Jump { index } => self.request_jump(index, now),
        }
    }

    /// Wheel input: deadzone, then one section per gesture
    pub fn on_wheel(&mut self, delta_y: f64, now: Instant) -> Outcome {
        if self.state.is_animating {
            return ignore(IgnoreReason::Locked);
        }
        if self.phase(now) == ArbiterPhase::Cooling {
            return ignore(IgnoreReason::CoolingDown);
        }
        let Some(direction) = wheel_direction(delta_y, self.navigation.wheel_deadzone) else {
            return ignore(IgnoreReason::BelowDeadzone);
        };

        let sections = self.sections();
        let (Some(current), Some(last)) = (self.refresh(&sections), last_index(&sections)) else {
            return ignore(IgnoreReason::NoSections);
        };

        let target = step_target(current, direction, last);
        if target == current {
            return ignore(IgnoreReason::AtBoundary);
        }
        self.commit(current, target, &sections, Cause::Wheel, now)
    }

    /// Discrete key input: no deadzone and no cooldown gate
    pub fn on_key(&mut self, key: NavKey, now: Instant) -> Outcome {
        if self.state.is_animating {
            return ignore(IgnoreReason::Locked);
        }

        let sections = self.sections();
        let (Some(current), Some(last)) = (self.refresh(&sections), last_index(&sections)) else {
            return ignore(IgnoreReason::NoSections);
        };

        let target = key_target(key, current, last);
        if target == current {
            return ignore(match key {
                NavKey::Next | NavKey::Previous => IgnoreReason::AtBoundary,
                NavKey::First | NavKey::Last => IgnoreReason::AlreadyThere,
            });
        }
        self.commit(current, target, &sections, Cause::Key, now)
    }

    /// Jump requested by a UI affordance; out-of-range targets are clamped
    pub fn request_jump(&mut self, index: usize, now: Instant) -> Outcome {
        if self.state.is_animating {
            return ignore(IgnoreReason::Locked);
        }

        let sections = self.sections();
        let (Some(current), Some(last)) = (self.refresh(&sections), last_index(&sections)) else {
            return ignore(IgnoreReason::NoSections);
        };

        let target = index.min(last);
        if target == current {
            return ignore(IgnoreReason::AlreadyThere);
        }
        self.commit(current, target, &sections, Cause::Jump, now)
    }

    /// The container moved without the controller; restart the settle timer
    pub fn on_native_scroll(&mut self, now: Instant) -> Outcome {
        self.state.pending_debounce = Some(now + self.navigation.scroll_debounce());
        trace!("Native scroll, settle check re-armed");
        Outcome::Deferred
    }

    /// Advance animations and fire due timers.
    ///
    /// Returns the transitions committed by timers (snap, deep link).
    pub fn tick(&mut self, now: Instant) -> Vec<Outcome> {
        let mut outcomes = Vec::new();

        if let Some(step) = self.animator.step(now) {
            self.apply_step(step);
        }

        if is_due(self.state.cooldown_until, now) {
            if self.state.is_animating {
                self.force_release(now);
            }
            self.state.cooldown_until = None;
        }

        if self.deep_link.as_ref().is_some_and(|d| now >= d.due) {
            if let Some(outcome) = self.follow_deep_link() {
                outcomes.push(outcome);
            }
        }

        if is_due(self.state.pending_debounce, now) {
            self.state.pending_debounce = None;
            if self.state.is_animating {
                trace!("Settle check dropped, transition in flight");
            } else if let Some(outcome) = self.settle_native_scroll(now) {
                outcomes.push(outcome);
            }
        }

        outcomes
    }

    /// Recompute `current_index` from the live offset
    fn refresh(&mut self, sections: &[Section]) -> Option<usize> {
        let index = current_index_for(
            sections,
            self.container.scroll_offset(),
            self.container.viewport_height(),
            self.navigation.layout,
        )?;
        self.state.current_index = index;
        Some(index)
    }

    fn commit(
        &mut self,
        from: usize,
        to: usize,
        sections: &[Section],
        cause: Cause,
        now: Instant,
    ) -> Outcome {
        let transition = Transition {
            from_index: from,
            target_index: to,
            target_offset: sections[to].offset,
        };

        self.state.is_animating = true;
        self.state.cooldown_until = Some(now + self.navigation.cooldown());
        self.state.pending_debounce = None;
        debug!(from, to, ?cause, "Committing section transition");

        let step = self
            .animator
            .animate_to(transition, self.container.scroll_offset(), now);
        self.apply_step(step);
        self.sync();

        Outcome::Committed { from, to, cause }
    }

    fn apply_step(&mut self, step: Step) {
        self.container.set_scroll_offset(step.offset);
        if let Some(done) = step.completed {
            self.state.is_animating = false;
            self.state.current_index = done.target_index;
            debug!(index = done.target_index, "Section transition completed");
            self.sync();
        }
    }

    /// The cooldown expired before the animation reported completion
    fn force_release(&mut self, now: Instant) {
        if let Some(stale) = self.animator.abandon() {
            warn!(
                index = stale.target_index,
                "Transition outlived its cooldown; releasing navigation lock"
            );
            self.state.current_index = stale.target_index;
            // Reconcile with wherever the container actually ended up
            self.state.pending_debounce = Some(now + self.navigation.scroll_debounce());
        }
        self.state.is_animating = false;
        self.sync();
    }

    fn follow_deep_link(&mut self) -> Option<Outcome> {
        let link = self.deep_link.take()?;
        if self.state.is_animating {
            debug!(identifier = %link.identifier, "Deep link dropped, transition in flight");
            return None;
        }

        let sections = self.sections();
        let Some(section) = find_by_identifier(&sections, &link.identifier) else {
            warn!(identifier = %link.identifier, "No section matches the URL fragment");
            return None;
        };

        let from = self.state.current_index;
        let to = section.index;
        self.container.set_scroll_offset(section.offset);
        self.state.current_index = to;
        info!(identifier = %link.identifier, index = to, "Followed deep link");
        self.sync();

        Some(Outcome::Committed {
            from,
            to,
            cause: Cause::DeepLink,
        })
    }

    fn settle_native_scroll(&mut self, now: Instant) -> Option<Outcome> {
        let sections = self.sections();
        let previous = self.state.current_index;
        let nearest = self.refresh(&sections)?;
        self.sync();

        let offset = self.container.scroll_offset();
        let distance = distance_to(&sections[nearest], offset);
        if distance.abs() <= self.navigation.snap_tolerance {
            trace!(index = nearest, distance, "Resting within snap tolerance");
            return None;
        }

        debug!(index = nearest, distance, "Snapping to nearest section");
        let outcome = self.commit(nearest, nearest, &sections, Cause::Snap, now);
        Some(match outcome {
            Outcome::Committed { to, cause, .. } => Outcome::Committed {
                from: previous,
                to,
                cause,
            },
            other => other,
        })
    }

    /// Clamp the state to the live section range and publish it
    fn sync(&mut self) {
        let sections = self.sections();
        if let Some(last) = last_index(&sections) {
            self.state.current_index = self.state.current_index.min(last);
        } else {
            self.state.current_index = 0;
        }

        let identifier = sections
            .get(self.state.current_index)
            .map(|s| s.identifier.clone());
        self.publisher.publish(NavSnapshot::new(
            self.state.current_index,
            sections.len(),
            self.state.is_animating,
            identifier,
        ));
    }
}

fn ignore(reason: IgnoreReason) -> Outcome {
    trace!(?reason, "Input ignored");
    Outcome::ignored(reason)
}
