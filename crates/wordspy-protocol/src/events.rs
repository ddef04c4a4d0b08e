//! The event vocabulary spoken over a socket, in both directions.
//!
//! Every frame is a JSON object `{"event": <name>, "data": <payload>}`;
//! events without a payload omit `data` entirely. Unknown event names and
//! malformed payloads fail to decode and are dropped by the connection
//! handler — the server never guesses at intent.

use serde::{Deserialize, Serialize};

use crate::{Consensus, Difficulty, GameState, Mode, Role, Team};

/// Everything a client can ask the server to do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ClientEvent {
    CreateRoom {
        room: String,
        nickname: String,
        password: String,
    },
    JoinRoom {
        room: String,
        nickname: String,
        password: String,
    },
    LeaveRoom,
    NewGame,
    RandomizeTeams,
    EndTurn,
    JoinTeam {
        team: Team,
    },
    SwitchRole {
        role: Role,
    },
    SwitchDifficulty {
        difficulty: Difficulty,
    },
    SwitchMode {
        #[serde(default)]
        room: Option<String>,
        mode: Mode,
        // Minutes, as typed into the client's input box.
        #[serde(rename = "timer_amount", default)]
        timer_amount: Option<String>,
    },
    SwitchConsensus {
        #[serde(default)]
        room: Option<String>,
        consensus: Consensus,
    },
    ClickTile {
        i: usize,
        j: usize,
    },
    DeclareClue {
        word: String,
        // Kept as a string on the wire; the handler parses with fallback 1.
        count: String,
    },
    ChangeCards {
        pack: String,
    },
    TimerSlider {
        // Float minutes as a string; the handler parses with fallback 5.
        value: String,
    },
}

/// Everything the server sends back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ServerEvent {
    ServerStats {
        players: usize,
        rooms: usize,
        session_id: String,
        is_existing_player: bool,
        game_state: Option<GameState>,
    },
    GameState(GameState),
    /// Tells the client to drop back to a clean lobby state.
    Reset,
    CreateResponse {
        message: String,
        success: bool,
    },
    JoinResponse {
        message: String,
        success: bool,
    },
    LeaveResponse {
        message: String,
        success: bool,
    },
    SwitchRoleResponse {
        message: String,
        success: bool,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        role: Option<Role>,
    },
}
