//! Application state.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::runtime::BoardHandle;

/// WebSocket message types.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(tag = "type", content = "data")]
pub enum WebSocketMessage {
    /// The store changed; clients refetch the list fragments.
    BoardRefresh { active: usize, finished: usize },
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub board: BoardHandle,
    pub tx: broadcast::Sender<WebSocketMessage>,
}

impl AppState {
    /// Start the board runtime and wire its store notifications to the
    /// broadcast channel.
    pub async fn new() -> anyhow::Result<Self> {
        let (tx, _rx) = broadcast::channel(100);
        let board = BoardHandle::spawn(tx.clone()).await?;
        Ok(Self { board, tx })
    }
}
