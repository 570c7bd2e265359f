//! C6 — Event Loop / Controller (`spec.md` §4.6).
//!
//! Owns the model exclusively; the only path into it is the message inbox
//! (`spec.md` §5 "Shared-resource policy"). Background tasks, spawned by
//! `commands::spawn`, never touch the model directly.

pub mod commands;
pub mod messages;
pub mod reducer;
pub mod state;

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::mpsc;

use crate::adapters::llm;
use crate::config::Settings;
use crate::error::AppError;

use commands::Cmd;
use messages::Msg;
use state::Model;

const TICK_INTERVAL: Duration = Duration::from_millis(250);

/// Run the application to completion: init terminal, seed demo data, spawn
/// the real-data load, process messages until quit, restore the terminal.
pub async fn run(settings: Settings) -> Result<(), AppError> {
    let mut terminal = init_terminal()?;

    let mut model = Model::new(settings.clone());
    crate::demo::seed(&mut model);

    model.llm = resolve_llm_client(&settings);

    let (tx, mut rx) = mpsc::unbounded_channel::<Msg>();

    if !model.demo_mode {
        // `spec.md` §4.6 startup sequence step 2: spawn a command to load
        // real subscriptions with a short deadline; the demo seed already
        // rendered the first frame.
        commands::spawn(Cmd::LoadSubscriptions, tx.clone());
    }

    spawn_input_reader(tx.clone());

    let mut tick_interval = tokio::time::interval(TICK_INTERVAL);

    let result = loop {
        tokio::select! {
            _ = tick_interval.tick() => {
                let cmds = reducer::reduce(&mut model, Msg::Tick(std::time::Instant::now()));
                for cmd in cmds {
                    commands::spawn(cmd, tx.clone());
                }
            }
            maybe_msg = rx.recv() => {
                let Some(msg) = maybe_msg else { break Ok(()); };
                let cmds = reducer::reduce(&mut model, msg);
                for cmd in cmds {
                    commands::spawn(cmd, tx.clone());
                }
            }
        }

        if let Err(e) = terminal.draw(|frame| crate::ui::render(frame, &model)) {
            break Err(AppError::Internal(e.to_string()));
        }

        if model.should_quit {
            crate::logging::journal("shutdown requested, quitting");
            break Ok(());
        }
    };

    restore_terminal(&mut terminal)?;
    result
}

fn resolve_llm_client(settings: &Settings) -> Option<std::sync::Arc<llm::LlmClient>> {
    let copilot_token = std::env::var("COPILOT_TOKEN").ok();
    let openai_key = std::env::var("OPENAI_API_KEY").ok();
    let kind = llm::resolve_provider_kind(settings.use_copilot, &copilot_token, &openai_key)?;
    let backend = llm::resolve_backend(
        kind,
        copilot_token,
        std::env::var("OPENAI_BASE_URL").ok(),
        openai_key,
        std::env::var("OPENAI_MODEL").ok(),
    )
    .ok()?;
    Some(std::sync::Arc::new(llm::LlmClient::new(backend)))
}

/// Poll crossterm events on a blocking thread and forward them as `Msg`
/// values; crossterm's event reader is synchronous, so it gets its own
/// OS thread rather than a tokio task (`spec.md` §5: "every ... suspension
/// point lives in a background task").
fn spawn_input_reader(tx: mpsc::UnboundedSender<Msg>) {
    std::thread::spawn(move || loop {
        match event::poll(Duration::from_millis(100)) {
            Ok(true) => match event::read() {
                Ok(Event::Key(key)) => {
                    if tx.send(Msg::Key(key)).is_err() {
                        return;
                    }
                }
                Ok(Event::Resize(w, h)) => {
                    if tx.send(Msg::Resize(w, h)).is_err() {
                        return;
                    }
                }
                _ => {}
            },
            Ok(false) => {}
            Err(_) => return,
        }
    });
}

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

fn init_terminal() -> Result<Tui, AppError> {
    enable_raw_mode().map_err(|e| AppError::Internal(e.to_string()))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).map_err(|e| AppError::Internal(e.to_string()))?;
    Terminal::new(CrosstermBackend::new(stdout)).map_err(|e| AppError::Internal(e.to_string()))
}

fn restore_terminal(terminal: &mut Tui) -> Result<(), AppError> {
    disable_raw_mode().map_err(|e| AppError::Internal(e.to_string()))?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen).map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(())
}
