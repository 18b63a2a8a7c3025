use crate::AppState;
use crate::error::LobbyError;
use crate::game::core::messages::LobbyEvent;
use crate::game::lobby::Lobby;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::Response;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, warn};

/// Upgrade to a WebSocket that streams every change to one lobby.
/// Unknown lobbies are rejected before the upgrade is checked.
pub async fn lobby_events(
    Path(code): Path<String>,
    State(state): State<AppState>,
    ws: Option<WebSocketUpgrade>,
) -> Result<Response, LobbyError> {
    let (lobby, events) = state.lobbies.subscribe(&code)?;
    let ws = ws.ok_or_else(|| {
        LobbyError::BadRequest("expected a WebSocket upgrade request".to_string())
    })?;
    Ok(ws.on_upgrade(move |socket| run_subscription(socket, lobby, events)))
}

async fn send_event(
    sender: &mut SplitSink<WebSocket, Message>,
    event: &LobbyEvent,
) -> Result<(), axum::Error> {
    let json = match serde_json::to_string(event) {
        Ok(json) => json,
        Err(err) => {
            warn!(%err, "Failed to serialize lobby event");
            return Ok(());
        }
    };
    sender.send(Message::Text(json)).await
}

/// Push the current lobby, then each later event, until the lobby closes or
/// the client goes away.
async fn run_subscription(
    socket: WebSocket,
    lobby: Lobby,
    mut events: broadcast::Receiver<LobbyEvent>,
) {
    let code = lobby.code.clone();
    info!(code, "Lobby subscriber connected");
    let (mut sender, mut receiver) = socket.split();

    let mut send_task = tokio::spawn(async move {
        if send_event(&mut sender, &LobbyEvent::LobbyUpdated { lobby })
            .await
            .is_err()
        {
            return;
        }

        loop {
            let event = match events.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    // Every event is a full snapshot, so the next one catches up
                    warn!(skipped, "Lobby subscriber lagged");
                    continue;
                }
                Err(RecvError::Closed) => LobbyEvent::LobbyClosed,
            };

            let closed = matches!(event, LobbyEvent::LobbyClosed);
            if send_event(&mut sender, &event).await.is_err() || closed {
                break;
            }
        }

        let _ = sender.close().await;
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            if let Message::Close(_) = msg {
                break;
            }
            debug!("Ignoring client frame on event stream");
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    info!(code, "Lobby subscriber disconnected");
}
