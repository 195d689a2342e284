//! Bridges one accepted websocket to one running table's command channel.
//!
//! A `tokio::select! { biased; ... }` loop reads the table's outbox on one arm and
//! the client's incoming frames on the other, decoding and validating each frame
//! through `table_session::Protocol`'s typed `ClientMessage`/`ServerMessage`
//! protocol before it ever reaches the table actor.
use std::time::{SystemTime, UNIX_EPOCH};

use futures::StreamExt;
use tokio::sync::mpsc::unbounded_channel;

use table_persistence::TableKey;
use table_session::{validate_ticket, ClientMessage, Identity, Protocol, ServerMessage, TableHandle};

/// Drives one websocket connection until it closes. Nothing here mutates table state
/// directly -- every effect is a call through `handle`, which the table actor
/// serializes along with every other socket's commands.
pub async fn bridge(
    table_id: TableKey,
    handle: TableHandle,
    mut session: actix_ws::Session,
    mut stream: actix_ws::MessageStream,
) {
    let (outbox_tx, mut outbox_rx) = unbounded_channel::<ServerMessage>();
    let mut identity: Option<Identity> = None;
    let mut my_seat: Option<usize> = None;

    'conn: loop {
        tokio::select! {
            biased;
            outgoing = outbox_rx.recv() => match outgoing {
                Some(message) => {
                    if session.text(message.to_json()).await.is_err() {
                        break 'conn;
                    }
                }
                None => break 'conn,
            },
            incoming = stream.next() => match incoming {
                Some(Ok(actix_ws::Message::Text(text))) => {
                    handle_frame(table_id, &handle, &outbox_tx, &mut identity, &mut my_seat, &text).await;
                }
                Some(Ok(actix_ws::Message::Close(_))) | None => break 'conn,
                Some(Err(_)) => break 'conn,
                _ => continue 'conn,
            },
        }
    }

    if let Some(seat_index) = my_seat {
        handle.disconnected(seat_index);
    }
    let _ = session.close(None).await;
}

async fn handle_frame(
    table_id: TableKey,
    handle: &TableHandle,
    outbox: &tokio::sync::mpsc::UnboundedSender<ServerMessage>,
    identity: &mut Option<Identity>,
    my_seat: &mut Option<usize>,
    raw: &str,
) {
    let message = match Protocol::decode(raw) {
        Ok(message) => message,
        Err(err) => {
            outbox.send(ServerMessage::error_msg(err)).ok();
            return;
        }
    };

    match message {
        ClientMessage::AuthenticateWithTicket { ticket } => {
            match validate_ticket(&ticket, now_unix()) {
                Ok(bound) => {
                    // A reconnecting identity is re-seated and gets `auth_ok`/`sat`
                    // from the table actor itself, which emits the private view to it
                    // immediately. A brand-new identity has no seat yet, so this
                    // socket announces its own successful authentication instead.
                    match handle.rebind(bound.clone(), outbox.clone()).await {
                        Ok(seat_index) => *my_seat = Some(seat_index),
                        Err(_) => {
                            outbox.send(ServerMessage::auth_ok(table_id, &bound)).ok();
                        }
                    }
                    *identity = Some(bound);
                }
                Err(err) => {
                    outbox.send(ServerMessage::auth_error(err)).ok();
                }
            }
        }
        ClientMessage::Sit { seat_index } => {
            let Some(bound) = identity.clone() else {
                outbox.send(ServerMessage::error_msg("authenticate before sitting")).ok();
                return;
            };
            match handle.sit(seat_index, bound, outbox.clone()).await {
                Ok(()) => *my_seat = Some(seat_index),
                Err(err) => {
                    outbox.send(ServerMessage::error_msg(err)).ok();
                }
            }
        }
        ClientMessage::Action { seat_index, action } => {
            let Some(bound) = identity.clone() else {
                outbox.send(ServerMessage::error_msg("authenticate before acting")).ok();
                return;
            };
            if let Err(err) = handle.act(seat_index, bound, action).await {
                outbox.send(ServerMessage::error_msg(err)).ok();
            }
        }
        ClientMessage::Leave {} => {
            let (Some(bound), Some(seat_index)) = (identity.clone(), *my_seat) else {
                outbox.send(ServerMessage::error_msg("not seated")).ok();
                return;
            };
            match handle.leave(seat_index, bound).await {
                Ok(()) => *my_seat = None,
                Err(err) => {
                    outbox.send(ServerMessage::error_msg(err)).ok();
                }
            }
        }
    }
}

fn now_unix() -> i64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs() as i64).unwrap_or(0)
}
