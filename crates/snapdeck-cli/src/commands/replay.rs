//! Offline replay of recorded input against a headless controller.

use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use snapdeck_core::arbiter::{parse_trace, InputEvent, Outcome, TraceEntry};
use snapdeck_core::deck::Deck;
use snapdeck_core::memory::MemoryContainer;
use snapdeck_core::scroll::ScrollConfigExt;
use snapdeck_core::section::SectionNode;
use snapdeck_core::{AppConfig, ControllerSettings, NavSnapshot, SectionController, SectionLayout};

/// A decision made during replay
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayLine {
    pub at_ms: u64,
    /// `None` for decisions made by timers
    pub event: Option<InputEvent>,
    pub outcome: Outcome,
}

#[derive(Debug)]
pub struct ReplayReport {
    pub lines: Vec<ReplayLine>,
    pub snapshot: NavSnapshot,
    pub offset: f64,
}

pub fn run(config: &AppConfig, deck_path: &Path, trace_path: &Path, height: f64) -> Result<()> {
    let deck = Deck::load(deck_path)?;
    let text = std::fs::read_to_string(trace_path)
        .with_context(|| format!("reading trace {}", trace_path.display()))?;
    let trace = parse_trace(&text)
        .with_context(|| format!("parsing trace {}", trace_path.display()))?;

    let report = replay(config, &deck, &trace, height);

    for line in &report.lines {
        let source = match &line.event {
            Some(event) => describe(event),
            None => "(timer)".to_string(),
        };
        println!("{:>7}ms  {:<28} {}", line.at_ms, source, line.outcome);
    }
    println!("\nfinal offset {}", report.offset);
    println!("{}", serde_json::to_string_pretty(&report.snapshot)?);

    Ok(())
}

/// Replay `trace` against a full-page container built from `deck`.
///
/// Time is simulated: between events the controller is ticked at every
/// timer deadline and at animation frame rate while a transition runs.
pub fn replay(config: &AppConfig, deck: &Deck, trace: &[TraceEntry], height: f64) -> ReplayReport {
    let mut settings = ControllerSettings::from(config);
    settings.navigation.layout = SectionLayout::FullPage;
    let frame = settings.scroll.animation_tick_duration().max(Duration::from_millis(1));

    let t0 = Instant::now();
    let mut controller = SectionController::attach(full_page(deck, height), settings, None, t0);
    let mut clock = Clock {
        t0,
        now: t0,
        frame,
        lines: Vec::new(),
    };

    for entry in trace {
        let at = t0 + Duration::from_millis(entry.at_ms);
        if at < clock.now {
            tracing::warn!(at_ms = entry.at_ms, "Trace entry out of order; replaying it now");
        }
        clock.advance(&mut controller, at);
        let outcome = controller.handle(&entry.event, clock.now);
        clock.push(Some(entry.event.clone()), outcome);
    }
    clock.drain(&mut controller);

    ReplayReport {
        lines: clock.lines,
        snapshot: controller.snapshot(),
        offset: snapdeck_core::ScrollContainer::scroll_offset(controller.container()),
    }
}

fn full_page(deck: &Deck, height: f64) -> MemoryContainer {
    let nodes = deck
        .sections
        .iter()
        .enumerate()
        .map(|(i, section)| {
            let offset = i as f64 * height;
            match &section.identifier {
                Some(id) => SectionNode::new(id.clone(), offset, height),
                None => SectionNode::anonymous(offset, height),
            }
        })
        .collect();
    MemoryContainer::new(nodes, height)
}

struct Clock {
    t0: Instant,
    now: Instant,
    frame: Duration,
    lines: Vec<ReplayLine>,
}

impl Clock {
    /// Tick through every wake-up before `until`, then move to `until`
    fn advance(&mut self, controller: &mut SectionController<MemoryContainer>, until: Instant) {
        while let Some(wake) = self.next_wake(controller) {
            if wake > until {
                break;
            }
            self.tick(controller, wake);
        }
        if until > self.now {
            self.tick(controller, until);
        }
    }

    /// Run until no transition or timer is pending
    fn drain(&mut self, controller: &mut SectionController<MemoryContainer>) {
        while let Some(wake) = self.next_wake(controller) {
            self.tick(controller, wake);
        }
    }

    fn next_wake(&self, controller: &SectionController<MemoryContainer>) -> Option<Instant> {
        let frame = controller
            .needs_fast_update()
            .then_some(self.now + self.frame);
        let wake = match (frame, controller.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }?;
        Some(wake.max(self.now))
    }

    fn tick(&mut self, controller: &mut SectionController<MemoryContainer>, at: Instant) {
        self.now = at;
        for outcome in controller.tick(at) {
            self.push(None, outcome);
        }
    }

    fn push(&mut self, event: Option<InputEvent>, outcome: Outcome) {
        let at_ms = self.now.duration_since(self.t0).as_millis() as u64;
        self.lines.push(ReplayLine {
            at_ms,
            event,
            outcome,
        });
    }
}

fn describe(event: &InputEvent) -> String {
    match event {
        InputEvent::Wheel { delta_y } => format!("wheel {:+}", delta_y),
        InputEvent::Key { key } => format!("key {:?}", key),
        InputEvent::NativeScroll { offset: Some(offset) } => format!("native scroll to {}", offset),
        InputEvent::NativeScroll { offset: None } => "native scroll".to_string(),
        InputEvent::Jump { index } => format!("jump {}", index),
    }
}
