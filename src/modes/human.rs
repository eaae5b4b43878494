use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::{Duration, Instant};
use tokio::time::interval;
use tracing::info;

use crate::error::ResourceError;
use crate::input::{InputHandler, KeyAction};
use crate::render::Renderer;
use crate::session::{Phase, Session};

/// Frame cadence for input handling and drawing. The simulation runs at its
/// own, slower tick rate behind the session's tick gate.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

pub struct HumanMode {
    session: Session,
    renderer: Renderer,
    input_handler: InputHandler,
    /// Session clock origin; every timestamp handed to the session is
    /// measured from here
    epoch: Instant,
    muted: bool,
}

impl HumanMode {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            epoch: Instant::now(),
            muted: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()
            .map_err(ResourceError::Terminal)
            .context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen)
            .map_err(ResourceError::Terminal)
            .context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend)
            .map_err(ResourceError::Terminal)
            .context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut frame_timer = interval(FRAME_INTERVAL);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                // Tick gate check and render
                _ = frame_timer.tick() => {
                    let now = self.now();
                    self.session.update(now);
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.session, now);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.session.quit();
                }
            }

            if self.session.should_quit() {
                break;
            }
        }

        info!(summary = %self.session.metrics().format_summary(), "leaving game");
        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };

        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return;
        }

        let now = self.now();
        match self.input_handler.handle_key_event(key) {
            KeyAction::Steer(direction) => self.session.steer(direction),
            KeyAction::Play => self.session.play(now),
            KeyAction::Restart => {
                if self.session.phase() != Phase::Intro {
                    self.session.restart(now);
                }
            }
            KeyAction::ToggleMute => {
                self.muted = !self.muted;
                self.session.set_muted(self.muted);
            }
            KeyAction::Quit => self.session.quit(),
            KeyAction::None => {}
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
