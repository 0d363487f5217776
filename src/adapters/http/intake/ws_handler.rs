//! WebSocket handler for the voice stream.
//!
//! # Connection Flow
//! 1. Client requests WebSocket upgrade on `/api/voice-stream`
//! 2. Server opens an intake session and sends the greeting as `audio`
//! 3. Client sends `{ "text": ... }` per transcribed utterance
//! 4. Server answers with `status`, then `update_data` / `audio` / `success`
//! 5. On a failed turn, server sends `status` with the error and closes
//!
//! Frames are processed strictly one at a time; the next frame is not read
//! until the current turn has finished.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{Sink, SinkExt, Stream, StreamExt};
use std::fmt::Display;

use super::handlers::IntakeAppState;
use super::streaming::{StreamClientMessage, StreamServerMessage, PROCESSING_NOTICE};
use crate::application::handlers::intake::IntakeSession;

/// Handle WebSocket upgrade for the voice stream.
///
/// Route: `GET /api/voice-stream`
pub async fn voice_stream_handler(
    ws: WebSocketUpgrade,
    State(state): State<IntakeAppState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_voice_socket(socket, state))
}

/// Drive one session over an established connection.
async fn handle_voice_socket(socket: WebSocket, state: IntakeAppState) {
    let (mut sender, mut receiver) = socket.split();
    let mut session = state.new_session();

    tracing::info!(session_id = %session.id(), "voice stream connected");

    drive_session(&mut sender, &mut receiver, &mut session).await;

    tracing::info!(
        session_id = %session.id(),
        completed = session.is_completed(),
        turns = session.transcript().len(),
        "voice stream closed"
    );
}

/// Greets, then answers inbound frames until the client leaves or a turn fails.
async fn drive_session<S, R, E>(sender: &mut S, receiver: &mut R, session: &mut IntakeSession)
where
    S: Sink<Message> + Unpin,
    R: Stream<Item = Result<Message, E>> + Unpin,
    E: Display,
{
    let session_id = session.id();

    for event in session.start().await {
        if send_server_message(sender, &event.into()).await.is_err() {
            return;
        }
    }

    'frames: while let Some(result) = receiver.next().await {
        match result {
            Ok(Message::Text(text)) => {
                let inbound = match serde_json::from_str::<StreamClientMessage>(&text) {
                    Ok(inbound) => inbound,
                    Err(e) => {
                        tracing::warn!(session_id = %session_id, "Failed to parse client message: {}", e);
                        let notice = StreamServerMessage::status("Invalid message format");
                        if send_server_message(sender, &notice).await.is_err() {
                            break;
                        }
                        continue;
                    }
                };

                let processing = StreamServerMessage::status(PROCESSING_NOTICE);
                if send_server_message(sender, &processing).await.is_err() {
                    break;
                }

                match session.handle_utterance(&inbound.text).await {
                    Ok(events) => {
                        for event in events {
                            if send_server_message(sender, &event.into()).await.is_err() {
                                break 'frames;
                            }
                        }
                    }
                    Err(err) => {
                        tracing::error!(session_id = %session_id, error = %err, "turn failed, closing session");
                        let notice = StreamServerMessage::status(format!("Error: {}", err));
                        let _ = send_server_message(sender, &notice).await;
                        let _ = sender.send(Message::Close(None)).await;
                        break;
                    }
                }
            }
            Ok(Message::Close(_)) => {
                tracing::debug!(session_id = %session_id, "Client closed connection");
                break;
            }
            Ok(Message::Ping(data)) => {
                if sender.send(Message::Pong(data)).await.is_err() {
                    break;
                }
            }
            Ok(_) => {}
            Err(e) => {
                tracing::debug!(session_id = %session_id, "WebSocket error: {}", e);
                break;
            }
        }
    }
}

async fn send_server_message<S>(sender: &mut S, msg: &StreamServerMessage) -> Result<(), S::Error>
where
    S: Sink<Message> + Unpin,
{
    match serde_json::to_string(msg) {
        Ok(json) => sender.send(Message::Text(json)).await,
        Err(e) => {
            tracing::warn!("Failed to serialize server message: {}", e);
            Ok(())
        }
    }
}
