use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::info;

use pulldown_core::{AppConfig, RefreshCompletion};
use pulldown_tui::{
    app::App,
    event::{AppEvent, EventHandler, RefreshResult},
    input::{handle_key_event, map_mouse_event},
    transition::UiConfigExt,
    ui,
};

pub async fn run(config: Arc<AppConfig>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle("pulldown"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Refresh completions go back into the controller, demo results into the page
    let (completion_tx, mut completion_rx) = mpsc::unbounded_channel::<RefreshCompletion>();
    let (result_tx, mut result_rx) = mpsc::unbounded_channel::<RefreshResult>();

    let mut app = App::new(config.clone(), completion_tx, result_tx);
    let event_handler = EventHandler::new(
        config.ui.tick_duration(),
        config.ui.animation_tick_duration(),
    );
    let spinner_interval = Duration::from_millis(config.ui.tick_rate_ms.max(1));
    let mut last_spin = tokio::time::Instant::now();

    info!("Demo started");
    let result = main_loop(
        &mut terminal,
        &mut app,
        &event_handler,
        &mut completion_rx,
        &mut result_rx,
        spinner_interval,
        &mut last_spin,
    );

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    info!(refreshes = app.refresh_count, "Demo finished");
    result
}

fn main_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    event_handler: &EventHandler,
    completion_rx: &mut mpsc::UnboundedReceiver<RefreshCompletion>,
    result_rx: &mut mpsc::UnboundedReceiver<RefreshResult>,
    spinner_interval: Duration,
    last_spin: &mut tokio::time::Instant,
) -> Result<()> {
    // Checked at the end of each iteration to pick the next poll timeout
    let mut needs_fast_update = false;

    loop {
        // Results first, so new items are in place when recovery starts
        while let Ok(result) = result_rx.try_recv() {
            app.handle_refresh_result(result);
        }
        while let Ok(completion) = completion_rx.try_recv() {
            app.handle_refresh_completion(completion);
        }

        app.update_animation();

        // The spinner runs on wall time, not on the poll rate
        if last_spin.elapsed() >= spinner_interval {
            app.tick_spinner();
            *last_spin = tokio::time::Instant::now();
        }

        terminal.draw(|frame| ui::draw(frame, app))?;

        let event = if needs_fast_update {
            event_handler.next_animation()?
        } else {
            event_handler.next()?
        };
        if let Some(event) = event {
            match event {
                AppEvent::Key(key) => {
                    let action = handle_key_event(key, app);
                    app.handle_action(action);
                }
                AppEvent::Mouse(mouse) => {
                    if let Some(input) = map_mouse_event(mouse, app.config.ui.pixels_per_row) {
                        app.handle_pointer(input);
                    }
                }
                AppEvent::Resize(_, _) => {
                    // Viewport is recomputed on the next draw
                }
                AppEvent::Tick => {}
            }
        }

        needs_fast_update = app.needs_fast_update();

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
