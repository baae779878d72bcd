use crate::events::terminal::Handler as TerminalEventHandler;
use crate::events::timer::{Handler as TimerEventHandler, TimerReceiver, TimerSender};
use crate::ui::Theme;
use anyhow::Result;
use citizen_portal::catalog::Catalog;
use citizen_portal::config::Config;
use citizen_portal::logger::LogBuffer;
use citizen_portal::session::SessionStore;
use citizen_portal::state::{Scheduled, State};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::*;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::stdout;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Oversees event processing, state management, and terminal output.
///
pub struct App {
    state: Arc<Mutex<State>>,
    config: Config,
    theme: Theme,
    log_buffer: LogBuffer,
}

impl App {
    /// Start a new application according to the given configuration. Returns
    /// the result of the application execution.
    ///
    pub async fn start(
        config: Config,
        catalog: Catalog,
        store: Box<dyn SessionStore>,
        log_buffer: LogBuffer,
    ) -> Result<()> {
        info!("Starting application...");
        let (tx, rx) = std::sync::mpsc::channel::<Scheduled>();
        let theme = Theme::from_name(&config.theme_name).unwrap_or_else(|| {
            warn!(
                "Unknown theme '{}', available: {}",
                config.theme_name,
                Theme::available_themes().join(", ")
            );
            Theme::default()
        });

        let mut state = State::new(catalog, config.timing, store);
        let splash = state.start()?;
        let app = App {
            state: Arc::new(Mutex::new(state)),
            config,
            theme,
            log_buffer,
        };
        app.start_timers(rx);
        tx.send(splash)?;
        app.start_ui(tx).await?;

        info!("Exiting application...");
        Ok(())
    }

    /// Start a separate thread resolving deferred tasks.
    ///
    fn start_timers(&self, receiver: TimerReceiver) {
        debug!("Creating new thread for deferred tasks...");
        let handler = TimerEventHandler::new(&self.state, self.config.payment_success_rate);
        std::thread::spawn(move || {
            let runtime = match tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    error!("Failed to build timer runtime: {}", e);
                    return;
                }
            };
            runtime.block_on(async {
                while let Ok(scheduled) = receiver.recv() {
                    let handler = handler.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handler.handle(scheduled).await {
                            error!("Failed to resolve deferred task: {}", e);
                        }
                    });
                }
            })
        });
    }

    /// Begin the terminal event poll on a separate thread before starting the
    /// render loop on the main thread. Return the result following an exit
    /// request or unrecoverable error.
    ///
    async fn start_ui(&self, timer_sender: TimerSender) -> Result<()> {
        debug!("Starting user interface on main thread...");
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen)?;
        enable_raw_mode()?;

        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        terminal.hide_cursor()?;

        let terminal_event_handler = TerminalEventHandler::new(timer_sender);
        let result = loop {
            let mut state = self.state.lock().await;
            for line in self.log_buffer.drain() {
                state.add_log_entry(line);
            }
            if let Err(e) = terminal.draw(|frame| crate::ui::render(frame, &state, &self.theme)) {
                break Err(e.into());
            }
            match terminal_event_handler.handle_next(&mut state) {
                Ok(true) => {}
                Ok(false) => {
                    debug!("Received application exit request.");
                    break Ok(());
                }
                Err(e) => break Err(e),
            }
        };

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }
}
