//! The thread that owns the board.
//!
//! `BoardApp` is single-threaded, so it lives on one dedicated OS thread.
//! Handlers talk to it through a command channel and await a oneshot reply;
//! commands are served strictly one at a time, which keeps every store
//! mutation and its notification atomic with respect to other requests.

use anyhow::anyhow;
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::{debug, info, warn};

use taskboard_core::dom::EventOutcome;
use taskboard_core::validation::RawProjectInput;
use taskboard_core::{BoardApp, BoardResult, MoveOutcome, Project, ProjectStatus};

use crate::state::WebSocketMessage;

const COMMAND_BUFFER: usize = 64;

enum BoardCommand {
    Projects {
        reply: oneshot::Sender<Vec<Project>>,
    },
    RenderPage {
        reply: oneshot::Sender<BoardResult<String>>,
    },
    RenderList {
        category: ProjectStatus,
        reply: oneshot::Sender<BoardResult<String>>,
    },
    Submit {
        input: RawProjectInput,
        reply: oneshot::Sender<BoardResult<EventOutcome>>,
    },
    Drop {
        project_id: String,
        target: ProjectStatus,
        reply: oneshot::Sender<BoardResult<MoveOutcome>>,
    },
    Move {
        project_id: String,
        status: ProjectStatus,
        reply: oneshot::Sender<MoveOutcome>,
    },
}

/// Cloneable handle to the board thread.
#[derive(Clone)]
pub struct BoardHandle {
    tx: mpsc::Sender<BoardCommand>,
}

impl BoardHandle {
    /// Spawn the board thread and wait until the page is mounted.
    ///
    /// Every store notification is forwarded to `events` as a
    /// [`WebSocketMessage::BoardRefresh`].
    pub async fn spawn(events: broadcast::Sender<WebSocketMessage>) -> anyhow::Result<Self> {
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        let (ready_tx, ready_rx) = oneshot::channel();

        std::thread::Builder::new()
            .name("taskboard-board".to_string())
            .spawn(move || run(rx, events, ready_tx))?;

        ready_rx
            .await
            .map_err(|_| anyhow!("board thread exited during startup"))??;
        Ok(Self { tx })
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> BoardCommand) -> anyhow::Result<T> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(command(reply))
            .await
            .map_err(|_| anyhow!("board thread is not running"))?;
        rx.await.map_err(|_| anyhow!("board thread dropped the request"))
    }

    pub async fn projects(&self) -> anyhow::Result<Vec<Project>> {
        self.request(|reply| BoardCommand::Projects { reply }).await
    }

    /// The mounted `#app` subtree as HTML.
    pub async fn render_page(&self) -> anyhow::Result<String> {
        Ok(self.request(|reply| BoardCommand::RenderPage { reply }).await??)
    }

    pub async fn render_list(&self, category: ProjectStatus) -> anyhow::Result<String> {
        Ok(self
            .request(|reply| BoardCommand::RenderList { category, reply })
            .await??)
    }

    /// Submit the form with `input`; the outer error is a transport failure.
    pub async fn submit(&self, input: RawProjectInput) -> anyhow::Result<BoardResult<EventOutcome>> {
        self.request(|reply| BoardCommand::Submit { input, reply }).await
    }

    /// Perform a full drag gesture of `project_id` onto the `target` list.
    pub async fn drop_card(&self, project_id: String, target: ProjectStatus) -> anyhow::Result<BoardResult<MoveOutcome>> {
        self.request(|reply| BoardCommand::Drop {
            project_id,
            target,
            reply,
        })
        .await
    }

    /// Move through the store directly, bypassing the drag protocol.
    pub async fn move_project(&self, project_id: String, status: ProjectStatus) -> anyhow::Result<MoveOutcome> {
        self.request(|reply| BoardCommand::Move {
            project_id,
            status,
            reply,
        })
        .await
    }
}

fn run(
    mut rx: mpsc::Receiver<BoardCommand>,
    events: broadcast::Sender<WebSocketMessage>,
    ready: oneshot::Sender<anyhow::Result<()>>,
) {
    let mut app = match BoardApp::new() {
        Ok(app) => app,
        Err(e) => {
            let _ = ready.send(Err(e.into()));
            return;
        }
    };

    app.subscribe(move |snapshot| {
        let message = WebSocketMessage::BoardRefresh {
            active: snapshot.filtered(ProjectStatus::Active).len(),
            finished: snapshot.filtered(ProjectStatus::Finished).len(),
        };
        // no connected clients is not an error
        let _ = events.send(message);
    });

    if ready.send(Ok(())).is_err() {
        return;
    }
    info!("Board thread started");

    while let Some(command) = rx.blocking_recv() {
        handle(&mut app, command);
    }
    info!("Board thread stopped");
}

fn handle(app: &mut BoardApp, command: BoardCommand) {
    // a dropped reply receiver means the client went away; nothing to do
    match command {
        BoardCommand::Projects { reply } => {
            let _ = reply.send(app.snapshot().to_vec());
        }
        BoardCommand::RenderPage { reply } => {
            let _ = reply.send(app.render_html());
        }
        BoardCommand::RenderList { category, reply } => {
            let _ = reply.send(app.render_list(category));
        }
        BoardCommand::Submit { input, reply } => {
            let outcome = app.submit(&input);
            if let Err(e) = &outcome {
                warn!(error = %e, "Form submission failed");
            }
            let _ = reply.send(outcome);
        }
        BoardCommand::Drop {
            project_id,
            target,
            reply,
        } => {
            let outcome = app.move_via_drag(&project_id, target);
            debug!(project_id = %project_id, target = %target, ok = outcome.is_ok(), "Drop handled");
            let _ = reply.send(outcome);
        }
        BoardCommand::Move {
            project_id,
            status,
            reply,
        } => {
            let outcome = app.store().borrow_mut().move_project(&project_id, status);
            let _ = reply.send(outcome);
        }
    }
}
