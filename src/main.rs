use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use spyword::cli::{render_draft, render_event, Input, HELP};
use spyword::config::AppConfig;
use spyword::countdown::spawn_countdown;
use spyword::handlers::handle_command;
use spyword::haptics::{HapticFeedback, NoHaptics, TerminalBell};
use spyword::prefs::{self, FilePreferenceStore, PreferenceStore};
use spyword::protocol::{Command, Event};
use spyword::setup::SetupDraft;
use spyword::state::AppState;

fn show(event: &Event) {
    if let Some(text) = render_event(event) {
        println!("{}", text);
    }
}

#[tokio::main]
async fn main() {
    // Load .env file if present (before any env var reads)
    if let Err(e) = dotenvy::dotenv() {
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    // Logs go to stderr so they stay out of the game screen
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "spyword=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = AppConfig::from_env();
    tracing::info!("Starting spyword with {:?}", config);

    let store = FilePreferenceStore::new(&config.data_dir);
    let mut draft = SetupDraft::new(
        prefs::load_players(&store).await,
        prefs::load_settings(&store).await,
    );

    let state = match config.seed {
        Some(seed) => AppState::with_seed(seed),
        None => AppState::from_entropy(),
    };
    let state = match state {
        Ok(state) => Arc::new(state),
        Err(e) => {
            tracing::error!("Failed to load game content: {}", e);
            std::process::exit(1);
        }
    };

    let haptics: Arc<dyn HapticFeedback> = if config.haptics {
        Arc::new(TerminalBell)
    } else {
        Arc::new(NoHaptics)
    };
    let countdown = spawn_countdown(state.clone(), config.tick, haptics);

    let mut events = state.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}\n\n{}", HELP, render_draft(&draft));

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        tracing::error!("Failed to read input: {}", e);
                        break;
                    }
                };

                let input = match line.parse::<Input>() {
                    Ok(input) => input,
                    Err(e) => {
                        println!("! {}", e);
                        continue;
                    }
                };

                if input == Input::Quit {
                    break;
                }

                let reply = match dispatch(&input, &mut draft, &state, &store).await {
                    Some(reply) => reply,
                    None => continue,
                };

                // Stage changes caused by this command come first
                while let Ok(event) = events.try_recv() {
                    show(&event);
                }
                show(&reply);
            }
            event = events.recv() => match event {
                Ok(event) => show(&event),
                Err(RecvError::Lagged(n)) => tracing::debug!("Screen skipped {} events", n),
                Err(RecvError::Closed) => break,
            }
        }
    }

    countdown.abort();
    tracing::info!("Bye");
}

/// Turn one input line into a command, handling setup edits locally
async fn dispatch(
    input: &Input,
    draft: &mut SetupDraft,
    state: &Arc<AppState>,
    store: &dyn PreferenceStore,
) -> Option<Event> {
    if input.edits_draft() {
        if let Some(note) = input.apply(draft) {
            println!("! {}", note);
        }
        prefs::save_players(store, &draft.names).await;
        prefs::save_settings(store, &draft.settings).await;
        println!("{}", render_draft(draft));
        return None;
    }

    let cmd = match input {
        Input::ShowSetup => {
            println!("{}", render_draft(draft));
            return None;
        }
        Input::Help => {
            println!("{}", HELP);
            return None;
        }
        Input::Start => Command::StartMatch {
            names: draft.names.clone(),
            settings: draft.settings.clone(),
        },
        Input::Next => Command::RevealNext,
        Input::Question => Command::NextQuestion,
        Input::Vote(n) => {
            let active = state.active_players().await;
            match n.checked_sub(1).and_then(|i| active.get(i)) {
                Some(player) => Command::Vote {
                    target: player.id.clone(),
                },
                None => return Some(Event::error("VOTE_REJECTED", format!("No player {}", n))),
            }
        }
        Input::Continue => Command::Continue,
        Input::End => Command::EndMatch,
        Input::Status => Command::Status,
        _ => return None,
    };

    handle_command(cmd, state).await
}
