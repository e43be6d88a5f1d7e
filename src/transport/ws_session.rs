use crate::app::time::now_millis;
use crate::config::GameConfig;
use crate::game::session::{GameSession, SessionStatus};
use crate::protocol::{self, ClientMessage, ServerMessage};
use super::outbound::{outbound, OutboundTx};
use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use uuid::Uuid;

/// Drive one game over one socket until either side goes away.
pub async fn handle_socket(socket: WebSocket, session_id: Uuid, config: GameConfig, tick_ms: u64) {
    let (mut sender, mut receiver) = socket.split();
    let (outbound_tx, mut outbound_rx) = outbound();
    let (inbound_tx, inbound_rx) = mpsc::unbounded_channel::<ClientMessage>();

    let send_task = tokio::spawn(async move {
        while let Some(payload) = outbound_rx.next().await {
            if sender.send(Message::Text(payload)).await.is_err() {
                break;
            }
        }
    });
    let game_task = tokio::spawn(run_game(session_id, config, tick_ms, inbound_rx, outbound_tx));

    while let Some(result) = receiver.next().await {
        let Ok(message) = result else { break };
        match message {
            Message::Text(text) => {
                let Some(message) = protocol::decode_client_message(&text) else { continue };
                if inbound_tx.send(message).is_err() {
                    break;
                }
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    game_task.abort();
    send_task.abort();
}

async fn run_game(
    session_id: Uuid,
    config: GameConfig,
    tick_ms: u64,
    mut inbound: UnboundedReceiver<ClientMessage>,
    outbound: OutboundTx,
) {
    let mut game = GameSession::new(config, StdRng::from_entropy(), now_millis());
    let mut interval = tokio::time::interval(Duration::from_millis(tick_ms));
    let mut prompted = false;
    tracing::debug!(%session_id, "game started");

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if prompted {
                    continue;
                }
                let now = now_millis();
                let status = game.tick(now);
                let frame = protocol::encode_server_message(&ServerMessage::Frame(game.snapshot(now)));
                if let Some(frame) = frame {
                    if !outbound.frame(frame) {
                        break;
                    }
                }
                if status == SessionStatus::GameOver {
                    prompted = true;
                    tracing::info!(%session_id, score = game.score(now), level = game.level(), "game over");
                    let prompt = protocol::encode_server_message(&ServerMessage::game_over(&game, now));
                    if let Some(prompt) = prompt {
                        if !outbound.prompt(prompt).await {
                            break;
                        }
                    }
                }
            }
            message = inbound.recv() => {
                let Some(message) = message else { break };
                match message {
                    ClientMessage::Input { direction } => game.handle_input(direction),
                    ClientMessage::Restart => {
                        if prompted {
                            game.restart(now_millis());
                            prompted = false;
                        }
                    }
                }
            }
        }
    }

    tracing::debug!(%session_id, "game stopped");
}
