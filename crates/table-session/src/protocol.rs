use serde::{Deserialize, Serialize};
use table_core::{Chips, ID};
use table_engine::{Action, PotResult, PublicView};

use crate::identity::Identity;

/// Everything a client may send. The `type` discriminant is snake_case
/// (`authenticate_with_ticket`, `sit`, ...) but every field name is camelCase
/// (`seatIndex`, not `seat_index`) since this is the one boundary in the repo that
/// talks to a client outside this workspace's control.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    AuthenticateWithTicket { ticket: String },
    #[serde(rename_all = "camelCase")]
    Sit { seat_index: usize },
    #[serde(rename_all = "camelCase")]
    Action { seat_index: usize, action: Action },
    Leave {},
}

/// A single side-pot's settlement, as broadcast in the `showdown` extras object on
/// the hand-completion `table_state` frame.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PotWinners {
    pub pot_index: usize,
    pub winners: Vec<usize>,
}

impl From<(usize, &PotResult)> for PotWinners {
    fn from((pot_index, pot): (usize, &PotResult)) -> Self {
        Self { pot_index, winners: pot.winners.clone() }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ShowdownExtras {
    pub winners: Vec<PotWinners>,
}

/// Everything the server may send back. `Clone` so one broadcast can fan out to
/// every bound socket's outbox without re-serializing per recipient. As with
/// `ClientMessage`, the `type` tag is snake_case but every field is camelCase.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    #[serde(rename_all = "camelCase")]
    AuthOk { table_id: String, identity: String },
    AuthError { error: String },
    #[serde(rename_all = "camelCase")]
    Sat { seat_index: usize },
    ErrorMsg { error: String },
    #[serde(rename_all = "camelCase")]
    TableState {
        id: String,
        seats: Vec<Option<table_engine::PublicSeat>>,
        community: Vec<table_cards::Card>,
        pot: Chips,
        stage: table_engine::Stage,
        current_bet_to_call: Chips,
        current_turn_index: Option<usize>,
        dealer_index: Option<usize>,
        last_raise_amount: Chips,
        action_timeout_ms: u64,
        #[serde(skip_serializing_if = "Option::is_none")]
        extras: Option<ShowdownExtras>,
    },
    #[serde(rename_all = "camelCase")]
    PrivateState {
        my_index: usize,
        my_hole: Vec<table_cards::Card>,
        time_ms: u64,
    },
    #[serde(rename_all = "camelCase")]
    AutoFold { seat_index: usize },
}

impl ServerMessage {
    pub fn auth_ok<T>(table_id: ID<T>, identity: &Identity) -> Self {
        Self::AuthOk { table_id: table_id.inner().to_string(), identity: identity.to_string() }
    }

    pub fn auth_error(error: impl std::fmt::Display) -> Self {
        Self::AuthError { error: error.to_string() }
    }

    pub fn sat(seat_index: usize) -> Self {
        Self::Sat { seat_index }
    }

    pub fn error_msg(error: impl std::fmt::Display) -> Self {
        Self::ErrorMsg { error: error.to_string() }
    }

    pub fn table_state<T>(
        id: ID<T>,
        view: &PublicView,
        action_timeout_ms: u64,
        extras: Option<ShowdownExtras>,
    ) -> Self {
        Self::TableState {
            id: id.inner().to_string(),
            seats: view.seats.clone(),
            community: view.community.clone(),
            pot: view.pot,
            stage: view.stage,
            current_bet_to_call: view.current_bet_to_call,
            current_turn_index: view.current_turn_index,
            dealer_index: view.dealer_index,
            last_raise_amount: view.last_raise_amount,
            action_timeout_ms,
            extras,
        }
    }

    pub fn private_state(my_index: usize, my_hole: Option<table_cards::Hole>, time_ms: u64) -> Self {
        Self::PrivateState {
            my_index,
            my_hole: my_hole.map(|h| h.cards().to_vec()).unwrap_or_default(),
            time_ms,
        }
    }

    pub fn auto_fold(seat_index: usize) -> Self {
        Self::AutoFold { seat_index }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("serialize server message")
    }
}

/// Parses and validates a raw client frame. Separated from dispatch so the session
/// actor's command loop never touches a malformed frame directly: a bad frame
/// is a protocol error, reported as `error_msg`, never mutates state.
pub struct Protocol;

impl Protocol {
    pub fn decode(raw: &str) -> Result<ClientMessage, ProtocolError> {
        serde_json::from_str(raw).map_err(|e| ProtocolError::Malformed(e.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    Malformed(String),
}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(reason) => write!(f, "malformed frame: {reason}"),
        }
    }
}

impl std::error::Error for ProtocolError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_a_sit_frame() {
        let msg = Protocol::decode(r#"{"type":"sit","seatIndex":2}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Sit { seat_index: 2 }));
    }

    #[test]
    fn decodes_an_action_frame() {
        let msg =
            Protocol::decode(r#"{"type":"action","seatIndex":0,"action":{"type":"raise","amount":4}}"#).unwrap();
        assert!(matches!(
            msg,
            ClientMessage::Action { seat_index: 0, action: Action::Raise { amount: 4 } }
        ));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(Protocol::decode("not json").is_err());
    }
}
