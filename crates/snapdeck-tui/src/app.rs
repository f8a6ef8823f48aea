use std::sync::Arc;
use std::time::{Duration, Instant};

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use snapdeck_core::arbiter::Outcome;
use snapdeck_core::deck::Deck;
use snapdeck_core::scroll::ScrollConfigExt;
use snapdeck_core::{
    AppConfig, ControllerSettings, NavSnapshot, ScrollContainer, SectionController, SectionLayout,
};
use tokio::sync::watch;
use tracing::debug;

use crate::input::Action;
use crate::surface::DeckSurface;
use crate::theme::Theme;

/// Width of the dot indicator column
pub const INDICATOR_WIDTH: u16 = 3;

/// Screen regions of the main view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    pub content: Rect,
    pub indicator: Option<Rect>,
    pub status: Rect,
}

/// Split the terminal into content, indicator column and status bar
pub fn split_area(area: Rect, show_indicators: bool) -> AppLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);

    if show_indicators && rows[0].width > INDICATOR_WIDTH * 4 {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(1), Constraint::Length(INDICATOR_WIDTH)])
            .split(rows[0]);
        AppLayout {
            content: columns[0],
            indicator: Some(columns[1]),
            status: rows[1],
        }
    } else {
        AppLayout {
            content: rows[0],
            indicator: None,
            status: rows[1],
        }
    }
}

/// Application state for the deck viewer
pub struct App {
    pub config: Arc<AppConfig>,
    pub controller: SectionController<DeckSurface>,
    /// Latest navigation snapshot, refreshed from the publisher
    pub snapshot: NavSnapshot,
    pub theme: Theme,
    pub should_quit: bool,
    /// Status message to display
    pub status_message: Option<String>,
    /// Most recent arbiter decision, shown in the status bar
    pub last_outcome: Option<Outcome>,
    nav: watch::Receiver<NavSnapshot>,
    /// A resize happened mid-transition; realign once it settles
    realign_pending: bool,
}

impl App {
    pub fn new(
        config: Arc<AppConfig>,
        deck: Deck,
        layout: SectionLayout,
        fragment: Option<&str>,
        terminal_size: (u16, u16),
        now: Instant,
    ) -> Self {
        let (width, height) = terminal_size;
        let regions = split_area(Rect::new(0, 0, width, height), config.ui.show_indicators);
        let surface = DeckSurface::new(
            deck,
            layout,
            regions.content.width,
            regions.content.height,
        );

        let mut settings = ControllerSettings::from(config.as_ref());
        settings.navigation.layout = layout;

        let controller = SectionController::attach(surface, settings, fragment, now);
        let nav = controller.subscribe();
        let snapshot = nav.borrow().clone();

        Self {
            config,
            controller,
            snapshot,
            theme: Theme::default(),
            should_quit: false,
            status_message: None,
            last_outcome: None,
            nav,
            realign_pending: false,
        }
    }

    pub fn surface(&self) -> &DeckSurface {
        self.controller.container()
    }

    pub fn handle_action(&mut self, action: Action, now: Instant) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Navigate(key) => {
                let outcome = self.controller.on_key(key, now);
                self.record(outcome);
            }
            Action::JumpTo(index) => {
                if index >= self.snapshot.section_count {
                    self.status_message = Some(format!(" No section {}", index + 1));
                    return;
                }
                let outcome = self.controller.request_jump(index, now);
                self.record(outcome);
            }
            Action::NudgeDown | Action::NudgeUp => {
                let rows = if action == Action::NudgeDown { 1 } else { -1 };
                self.controller.container_mut().scroll_rows(rows);
                let outcome = self.controller.on_native_scroll(now);
                self.record(outcome);
            }
            Action::None => {}
        }
        self.refresh_snapshot();
    }

    pub fn on_wheel(&mut self, delta_y: f64, now: Instant) {
        let outcome = self.controller.on_wheel(delta_y, now);
        self.record(outcome);
        self.refresh_snapshot();
    }

    /// Resize the surface to the new content area and keep the current
    /// section at the top of the viewport
    pub fn on_resize(&mut self, width: u16, height: u16) {
        let regions = split_area(Rect::new(0, 0, width, height), self.config.ui.show_indicators);
        self.controller
            .container_mut()
            .resize(regions.content.width, regions.content.height);
        debug!(
            width = regions.content.width,
            height = regions.content.height,
            "Deck surface resized"
        );

        if self.controller.is_animating() {
            self.realign_pending = true;
        } else {
            self.realign();
        }
    }

    /// Advance animations and timers
    pub fn tick(&mut self, now: Instant) {
        for outcome in self.controller.tick(now) {
            self.record(outcome);
        }
        if self.realign_pending && !self.controller.is_animating() {
            self.realign_pending = false;
            self.realign();
        }
        self.refresh_snapshot();
    }

    /// How long the event loop may block before the next tick
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        if self.controller.needs_fast_update() {
            return self.config.ui.scroll.animation_tick_duration();
        }
        let idle = Duration::from_millis(self.config.ui.tick_rate_ms);
        match self.controller.next_deadline() {
            Some(deadline) => deadline.saturating_duration_since(now).min(idle),
            None => idle,
        }
    }

    /// Pull the latest snapshot if the publisher has a newer one
    pub fn refresh_snapshot(&mut self) {
        if self.nav.has_changed().unwrap_or(false) {
            self.snapshot = self.nav.borrow_and_update().clone();
        }
    }

    fn realign(&mut self) {
        let index = self.controller.current_index();
        if let Some(section) = self.controller.sections().get(index) {
            let offset = section.offset;
            self.controller.container_mut().set_scroll_offset(offset);
        }
    }

    fn record(&mut self, outcome: Outcome) {
        if outcome.is_committed() {
            self.status_message = None;
        }
        self.last_outcome = Some(outcome);
    }
}
