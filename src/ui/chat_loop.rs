use std::error::Error;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use ratatui::crossterm::{
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::api::{ChatReply, ChatRequest};
use crate::core::chat_request::{finish_submit, ChatBackend, RequestError};
use crate::core::store::ChatStore;
use crate::ui::renderer::ui;
use crate::ui::view::{ChatView, KeyOutcome};

type ChatTerminal = Terminal<CrosstermBackend<io::Stdout>>;

enum UiEvent {
    Crossterm(Event),
    InputFailed(io::Error),
}

/// Runs the interactive chat screen until the user quits.
pub async fn run_chat(
    mut store: ChatStore,
    backend: Arc<dyn ChatBackend>,
) -> Result<(), Box<dyn Error>> {
    let dirty = Arc::new(AtomicBool::new(true));
    let subscriber_flag = Arc::clone(&dirty);
    store.subscribe(move |_, _| subscriber_flag.store(true, Ordering::Relaxed));

    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, &mut store, backend, &dirty).await;
    restore_terminal(&mut terminal)?;
    result
}

fn setup_terminal() -> Result<ChatTerminal, Box<dyn Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout)).inspect_err(|_| {
        let _ = disable_raw_mode();
    })?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut ChatTerminal) -> Result<(), Box<dyn Error>> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Reads terminal events on a blocking thread until the receiver goes away.
fn spawn_event_reader(event_tx: mpsc::UnboundedSender<UiEvent>) {
    std::thread::spawn(move || loop {
        match event::poll(Duration::from_millis(100)) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    if event_tx.send(UiEvent::Crossterm(ev)).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    let _ = event_tx.send(UiEvent::InputFailed(err));
                    break;
                }
            },
            Ok(false) => {
                if event_tx.is_closed() {
                    break;
                }
            }
            Err(err) => {
                let _ = event_tx.send(UiEvent::InputFailed(err));
                break;
            }
        }
    });
}

fn spawn_request(
    backend: Arc<dyn ChatBackend>,
    request: ChatRequest,
    reply_tx: mpsc::UnboundedSender<Result<ChatReply, RequestError>>,
) {
    debug!(model = %request.model, turns = request.messages.len(), "sending chat turn");
    tokio::spawn(async move {
        let request_task = tokio::spawn(async move { backend.complete(&request).await });
        // A result is sent on every path so the loop always lowers the loading flag.
        let result = match request_task.await {
            Ok(result) => result,
            Err(err) => {
                warn!(error = %err, "chat request ended without a reply");
                let reason = if err.is_panic() {
                    "chat request panicked"
                } else {
                    "chat request was cancelled"
                };
                Err(RequestError::Transport(reason.to_string()))
            }
        };
        let _ = reply_tx.send(result);
    });
}

async fn event_loop(
    terminal: &mut ChatTerminal,
    store: &mut ChatStore,
    backend: Arc<dyn ChatBackend>,
    dirty: &AtomicBool,
) -> Result<(), Box<dyn Error>> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<UiEvent>();
    spawn_event_reader(event_tx);

    let (reply_tx, mut reply_rx) = mpsc::unbounded_channel();
    let mut view = ChatView::default();
    let mut request_redraw = true;

    loop {
        if dirty.swap(false, Ordering::Relaxed) || request_redraw {
            terminal.draw(|f| ui(f, store.state(), &view))?;
            request_redraw = false;
        }

        tokio::select! {
            event = event_rx.recv() => {
                let outcome = match event {
                    Some(UiEvent::Crossterm(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        view.handle_key(store, key)
                    }
                    Some(UiEvent::Crossterm(Event::Paste(text))) => view.paste(store, &text),
                    Some(UiEvent::Crossterm(Event::Resize(_, _))) => KeyOutcome::Redraw,
                    Some(UiEvent::Crossterm(_)) => KeyOutcome::Ignored,
                    Some(UiEvent::InputFailed(err)) => return Err(err.into()),
                    None => KeyOutcome::Quit,
                };

                match outcome {
                    KeyOutcome::Quit => break,
                    KeyOutcome::Submit(request) => {
                        spawn_request(Arc::clone(&backend), request, reply_tx.clone());
                        request_redraw = true;
                    }
                    KeyOutcome::Redraw => request_redraw = true,
                    KeyOutcome::Ignored => {}
                }
            }
            Some(result) = reply_rx.recv() => {
                let outcome = finish_submit(store, result);
                view.apply_outcome(&outcome);
                request_redraw = true;
            }
        }
    }

    info!("chat session closed");
    Ok(())
}
