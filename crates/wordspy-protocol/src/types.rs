//! Wire-visible game data: teams, tiles, clues, the per-round game state
//! and the snapshot shape broadcast to every client in a room.
//!
//! These types are shared between the rules engine (which mutates them)
//! and the transport (which serializes them). Field and variant spellings
//! are part of the protocol — the browser client matches on them — so
//! every enum pins its wire form with serde attributes and the tests below
//! assert the exact JSON.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A team color. `Undecided` is the lobby state before a player picks
/// (or is dealt) a side; it never appears as a game turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Team {
    Blue,
    Red,
    Undecided,
}

impl Team {
    /// The opposing color. `Undecided` has no opponent and maps to itself.
    pub fn other(self) -> Team {
        match self {
            Team::Blue => Team::Red,
            Team::Red => Team::Blue,
            Team::Undecided => Team::Undecided,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::Blue => write!(f, "blue"),
            Team::Red => write!(f, "red"),
            Team::Undecided => write!(f, "undecided"),
        }
    }
}

/// What a player is allowed to do in the room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Guesser,
    Spymaster,
    Spectator,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Guesser => write!(f, "guesser"),
            Role::Spymaster => write!(f, "spymaster"),
            Role::Spectator => write!(f, "spectator"),
        }
    }
}

/// Ownership of a board tile. `Death` is the assassin: flipping it ends
/// the game immediately for the flipping team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileType {
    Blue,
    Red,
    Death,
    Neutral,
}

impl TileType {
    /// The team that owns tiles of this type, if any.
    pub fn team(self) -> Option<Team> {
        match self {
            TileType::Blue => Some(Team::Blue),
            TileType::Red => Some(Team::Red),
            TileType::Death | TileType::Neutral => None,
        }
    }
}

/// Room pacing setting. Purely informational for the server; the client
/// renders a countdown in timed mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Casual,
    Timed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Normal,
    Hard,
}

/// Whether a single guesser can flip a tile alone or the whole team must
/// propose the same word first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Consensus {
    Single,
    Consensus,
}

/// One cell of the 5×5 board. The full type is broadcast to everyone;
/// hiding it from guessers is a client-side concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub word: String,
    #[serde(rename = "type")]
    pub tile_type: TileType,
    pub flipped: bool,
}

/// A spymaster's hint: a word and how many tiles it points at. The
/// guessing team gets at most `count + 1` flips before the turn ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clue {
    pub word: String,
    pub count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LogEvent {
    FlipTile,
    EndTurn,
    DeclareClue,
}

/// One entry of the append-only game log. Optional fields are omitted
/// from the JSON when unset, matching the client's expectations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameLog {
    pub event: LogEvent,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub team: Option<Team>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub word: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none", default)]
    pub tile_type: Option<TileType>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub clue: Option<Clue>,
    pub ended_turn: bool,
}

/// A single round's state. Mutated only by the rules engine; serialized
/// wholesale into every broadcast snapshot.
///
/// `turns_taken` counts successful same-team flips within the current
/// clue and is deliberately not broadcast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub timer_amount: f64,
    pub timer: f64,
    pub word_pool: usize,

    // Enabled word packs, mirrored here for client display only; the
    // authoritative mask lives on the room.
    pub base: bool,
    pub duet: bool,
    pub undercover: bool,
    pub custom: bool,
    pub nsfw: bool,

    // Remaining unflipped tiles per team.
    pub red: u32,
    pub blue: u32,

    pub turn: Team,
    pub over: bool,
    pub winner: Option<Team>,
    pub board: [[Tile; 5]; 5],
    pub log: Vec<GameLog>,
    pub clue: Option<Clue>,

    #[serde(skip)]
    pub turns_taken: u32,
}

/// A player as seen by every client in the room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    pub nickname: String,
    pub room: String,
    pub team: Team,
    pub role: Role,
    pub guess_proposal: Option<String>,
}

/// The full room snapshot broadcast after every successful mutation.
/// `team` is present only in the caller-scoped variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub room: String,
    pub players: HashMap<String, Player>,
    pub game: Game,
    pub difficulty: Difficulty,
    pub mode: Mode,
    pub consensus: Consensus,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub team: Option<Team>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(word: &str, tile_type: TileType) -> Tile {
        Tile {
            word: word.into(),
            tile_type,
            flipped: false,
        }
    }

    fn sample_game() -> Game {
        let board: [[Tile; 5]; 5] = std::array::from_fn(|i| {
            std::array::from_fn(|j| tile(&format!("w{i}{j}"), TileType::Neutral))
        });
        Game {
            timer_amount: 300.0,
            timer: 300.0,
            word_pool: 42,
            base: true,
            duet: false,
            undercover: false,
            custom: false,
            nsfw: false,
            red: 8,
            blue: 9,
            turn: Team::Blue,
            over: false,
            winner: None,
            board,
            log: Vec::new(),
            clue: None,
            turns_taken: 3,
        }
    }

    #[test]
    fn test_team_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Team::Blue).unwrap(), "\"blue\"");
        assert_eq!(serde_json::to_string(&Team::Red).unwrap(), "\"red\"");
        assert_eq!(
            serde_json::to_string(&Team::Undecided).unwrap(),
            "\"undecided\""
        );
    }

    #[test]
    fn test_team_other() {
        assert_eq!(Team::Blue.other(), Team::Red);
        assert_eq!(Team::Red.other(), Team::Blue);
        assert_eq!(Team::Undecided.other(), Team::Undecided);
    }

    #[test]
    fn test_tile_type_wire_names() {
        assert_eq!(serde_json::to_string(&TileType::Death).unwrap(), "\"death\"");
        assert_eq!(
            serde_json::to_string(&TileType::Neutral).unwrap(),
            "\"neutral\""
        );
    }

    #[test]
    fn test_tile_type_team() {
        assert_eq!(TileType::Blue.team(), Some(Team::Blue));
        assert_eq!(TileType::Red.team(), Some(Team::Red));
        assert_eq!(TileType::Death.team(), None);
        assert_eq!(TileType::Neutral.team(), None);
    }

    #[test]
    fn test_unknown_team_fails_to_decode() {
        let result: Result<Team, _> = serde_json::from_str("\"green\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_tile_uses_type_as_field_name() {
        let t = tile("apple", TileType::Neutral);
        let json: serde_json::Value = serde_json::to_value(&t).unwrap();
        assert_eq!(json["type"], "neutral");
        assert_eq!(json["word"], "apple");
        assert_eq!(json["flipped"], false);
    }

    #[test]
    fn test_game_log_omits_unset_fields() {
        let entry = GameLog {
            event: LogEvent::EndTurn,
            team: Some(Team::Red),
            word: None,
            tile_type: None,
            clue: None,
            ended_turn: false,
        };
        let json: serde_json::Value = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["event"], "endTurn");
        assert_eq!(json["team"], "red");
        assert_eq!(json["endedTurn"], false);
        assert!(json.get("word").is_none());
        assert!(json.get("type").is_none());
        assert!(json.get("clue").is_none());
    }

    #[test]
    fn test_game_log_flip_tile_round_trip() {
        let entry = GameLog {
            event: LogEvent::FlipTile,
            team: Some(Team::Blue),
            word: Some("apple".into()),
            tile_type: Some(TileType::Blue),
            clue: None,
            ended_turn: true,
        };
        let bytes = serde_json::to_vec(&entry).unwrap();
        let decoded: GameLog = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(entry, decoded);
    }

    #[test]
    fn test_game_skips_turns_taken() {
        let json: serde_json::Value = serde_json::to_value(sample_game()).unwrap();
        assert!(json.get("turnsTaken").is_none());
        assert!(json.get("turns_taken").is_none());
        assert_eq!(json["timerAmount"], 300.0);
        assert_eq!(json["wordPool"], 42);
        assert_eq!(json["blue"], 9);
        assert_eq!(json["board"].as_array().unwrap().len(), 5);

        // Decoding resets the counter to its default.
        let decoded: Game = serde_json::from_value(json).unwrap();
        assert_eq!(decoded.turns_taken, 0);
    }

    #[test]
    fn test_player_guess_proposal_field_name() {
        let p = Player {
            id: "player:abc".into(),
            nickname: "ada".into(),
            room: "r".into(),
            team: Team::Blue,
            role: Role::Guesser,
            guess_proposal: Some("apple".into()),
        };
        let json: serde_json::Value = serde_json::to_value(&p).unwrap();
        assert_eq!(json["guessProposal"], "apple");
        assert_eq!(json["role"], "guesser");
        assert_eq!(json["nickname"], "ada");
    }

    #[test]
    fn test_game_state_team_omitted_when_unscoped() {
        let gs = GameState {
            room: "den".into(),
            players: HashMap::new(),
            game: sample_game(),
            difficulty: Difficulty::Normal,
            mode: Mode::Casual,
            consensus: Consensus::Single,
            team: None,
        };
        let json: serde_json::Value = serde_json::to_value(&gs).unwrap();
        assert!(json.get("team").is_none());
        assert_eq!(json["room"], "den");
        assert_eq!(json["difficulty"], "normal");
        assert_eq!(json["consensus"], "single");
        assert_eq!(json["mode"], "casual");
    }

    #[test]
    fn test_game_state_includes_caller_team_when_scoped() {
        let gs = GameState {
            room: "den".into(),
            players: HashMap::new(),
            game: sample_game(),
            difficulty: Difficulty::Hard,
            mode: Mode::Timed,
            consensus: Consensus::Consensus,
            team: Some(Team::Red),
        };
        let json: serde_json::Value = serde_json::to_value(&gs).unwrap();
        assert_eq!(json["team"], "red");
        assert_eq!(json["mode"], "timed");
    }
}
