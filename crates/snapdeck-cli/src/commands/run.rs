use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use ratatui::{backend::CrosstermBackend, Terminal};

use snapdeck_core::{deck::Deck, AppConfig, SectionLayout};
use snapdeck_tui::{
    app::{split_area, App},
    event::{AppEvent, EventHandler},
    input::handle_key_event,
    keymap::Keymap,
    widgets::{IndicatorWidget, SectionViewWidget, StatusBarWidget},
};

pub async fn run(
    config: Arc<AppConfig>,
    deck_path: &Path,
    layout: SectionLayout,
    fragment: Option<&str>,
) -> Result<()> {
    // Load the deck before touching the terminal so errors print normally
    let deck = Deck::load(deck_path)?;
    tracing::info!(
        path = %deck_path.display(),
        sections = deck.len(),
        ?layout,
        "Opening deck"
    );

    // Create keymap from config
    let keymap = Keymap::from_config(&config.keymap);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    let title = format!(
        "snapdeck - {}",
        deck_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default()
    );
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle(title))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let size = crossterm::terminal::size()?;
    let mut app = App::new(config.clone(), deck, layout, fragment, size, Instant::now());

    let event_handler = EventHandler::new(config.ui.wheel_notch_delta);

    let result = event_loop(&mut terminal, &mut app, &event_handler, &keymap);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    event_handler: &EventHandler,
    keymap: &Keymap,
) -> Result<()> {
    loop {
        app.tick(Instant::now());

        // Draw UI
        terminal.draw(|frame| {
            let regions = split_area(frame.area(), app.config.ui.show_indicators);
            SectionViewWidget::render(frame, regions.content, app);
            if let Some(indicator) = regions.indicator {
                IndicatorWidget::render(frame, indicator, app);
            }
            StatusBarWidget::render(frame, regions.status, app);
        })?;

        // Block until input, the next timer deadline, or the next animation frame
        let timeout = app.poll_timeout(Instant::now());
        if let Some(event) = event_handler.next_with_timeout(timeout)? {
            let now = Instant::now();
            match event {
                AppEvent::Key(key) => {
                    let action = handle_key_event(key, keymap);
                    app.handle_action(action, now);
                }
                AppEvent::Wheel(delta_y) => app.on_wheel(delta_y, now),
                AppEvent::Resize(width, height) => app.on_resize(width, height),
                AppEvent::Tick => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    tracing::info!(
        section = app.controller.current_index(),
        "Closing deck"
    );
    Ok(())
}
