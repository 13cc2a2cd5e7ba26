//! WebSocket connection handling.
//!
//! Each connection registers with the event bus, runs an outbound forwarder
//! with heartbeat pings, and processes room commands until the peer goes
//! away. Membership cleanup happens here, not in the client.

use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures_util::{SinkExt, StreamExt};
use tokio::time::interval;
use tracing::{debug, info, warn};

use gigboard_models::{ClientCommand, UserId};
use gigboard_realtime::{ConnectionId, EventBus, Room};

use crate::state::AppState;

const WS_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// WebSocket endpoint.
pub async fn ws_connect(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Drive one connection until it closes.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    let (tx, mut rx) = EventBus::channel();
    let conn_id = state.bus.register(tx).await;
    info!(conn = %conn_id, "websocket connected");

    // Forward bus events to the peer, interleaved with heartbeat pings.
    let send_task = tokio::spawn(async move {
        let mut heartbeat = interval(WS_HEARTBEAT_INTERVAL);
        heartbeat.tick().await; // the first tick fires immediately
        loop {
            tokio::select! {
                event = rx.recv() => match event {
                    Some(event) => {
                        let json = match serde_json::to_string(&event) {
                            Ok(json) => json,
                            Err(_) => continue,
                        };
                        if sender.send(Message::Text(json)).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                },
                _ = heartbeat.tick() => {
                    if sender.send(Message::Ping(Vec::new())).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientCommand>(&text) {
                Ok(command) => handle_command(&state, conn_id, command).await,
                Err(e) => debug!(conn = %conn_id, "ignoring malformed command: {e}"),
            },
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(_) => break,
        }
    }

    // Connection gone: drop every room membership it held.
    state.bus.disconnect(conn_id).await;
    send_task.abort();
    info!(conn = %conn_id, "websocket disconnected");
}

async fn handle_command(state: &AppState, conn: ConnectionId, command: ClientCommand) {
    match command {
        ClientCommand::JoinRoom { token } => match state.keys.verify(&token) {
            Ok(claims) => {
                let user_id = UserId::from_string(claims.sub);
                state.bus.join(conn, &Room::user(user_id.clone())).await;
                state.bus.join(conn, &Room::AllUsers).await;
                debug!(conn = %conn, user = %user_id, "joined personal and broadcast rooms");
            }
            Err(e) => warn!(conn = %conn, "join-room rejected: {e}"),
        },
        ClientCommand::JoinGigRoom { gig_id } => {
            state.bus.join(conn, &Room::gig(gig_id)).await;
        }
        ClientCommand::LeaveGigRoom { gig_id } => {
            state.bus.leave(conn, &Room::gig(gig_id)).await;
        }
    }
}
