//! A room and its rules engine.
//!
//! Every method here runs on the room's actor task, so `&mut self` access
//! is never concurrent. Callers that fail a precondition (unknown player,
//! wrong turn, spectator touching a setting, …) are silently dropped with
//! a warning — the client UI is fire-and-forget and resynchronizes from
//! the next broadcast snapshot.

use std::collections::HashMap;
use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;

use wordspy_protocol::{
    Clue, Consensus, Difficulty, Game, GameLog, GameState, LogEvent, Mode, Player, Role, Team,
    TileType,
};

use crate::{new_game, BoardType, WordPools, DEFAULT_TIMER_SECS};

pub struct Room {
    name: String,
    password: String,
    players: HashMap<String, Player>,
    difficulty: Difficulty,
    mode: Mode,
    consensus: Consensus,
    game: Game,
    board_type: BoardType,
    pools: Arc<WordPools>,
}

impl Room {
    pub fn new(name: &str, password: &str, pools: Arc<WordPools>) -> Self {
        let game = new_game(&pools, BoardType::DEFAULT, DEFAULT_TIMER_SECS);
        Self {
            name: name.to_string(),
            password: password.to_string(),
            players: HashMap::new(),
            difficulty: Difficulty::Normal,
            mode: Mode::Casual,
            consensus: Consensus::Single,
            game,
            board_type: BoardType::DEFAULT,
            pools,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Bytewise password comparison, as typed by the joining client.
    pub fn password_matches(&self, candidate: &str) -> bool {
        self.password == candidate
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn player(&self, player_id: &str) -> Option<&Player> {
        self.players.get(player_id)
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn consensus(&self) -> Consensus {
        self.consensus
    }

    /// Adds a player to the room. Calling it again for a player already
    /// present is a no-op: no nickname suffixing, no team re-roll.
    ///
    /// A nickname already taken in this room gets `_` appended until it
    /// is unique. The team is dealt by fair coin; everyone starts as a
    /// guesser.
    pub fn join(&mut self, player_id: &str, nickname: &str) {
        if self.players.contains_key(player_id) {
            return;
        }

        let mut nickname = nickname.to_string();
        while self.players.values().any(|p| p.nickname == nickname) {
            nickname.push('_');
        }

        let team = if rand::rng().random_bool(0.5) {
            Team::Blue
        } else {
            Team::Red
        };

        self.players.insert(
            player_id.to_string(),
            Player {
                id: player_id.to_string(),
                nickname,
                room: self.name.clone(),
                team,
                role: Role::Guesser,
                guess_proposal: None,
            },
        );
    }

    /// Removes a player. Team tile counters are untouched: they count
    /// tiles, not players.
    pub fn leave(&mut self, player_id: &str) {
        if self.players.remove(player_id).is_none() {
            tracing::warn!(room = %self.name, player_id, "non-member tried to leave");
        }
    }

    pub fn change_team(&mut self, player_id: &str, team: Team) {
        match self.players.get_mut(player_id) {
            Some(player) => player.team = team,
            None => {
                tracing::warn!(room = %self.name, player_id, "unknown player tried to change team");
            }
        }
    }

    /// Shuffles the players and deals the first half to blue, the rest
    /// to red.
    pub fn randomize_teams(&mut self, _player_id: &str) {
        let mut players: Vec<&mut Player> = self.players.values_mut().collect();
        players.shuffle(&mut rand::rng());

        let half = players.len() / 2;
        for (idx, player) in players.into_iter().enumerate() {
            player.team = if idx < half { Team::Blue } else { Team::Red };
        }
    }

    /// Replaces the game with a fresh round drawn from the current pack
    /// mask. Players and the configured timer carry over.
    pub fn new_game(&mut self) {
        self.game = new_game(&self.pools, self.board_type, self.game.timer_amount);
    }

    /// Sets the player's role. Spectators also drop to the undecided
    /// team. Returns the applied role, or `None` for an unknown player.
    pub fn switch_role(&mut self, player_id: &str, role: Role) -> Option<Role> {
        let Some(player) = self.players.get_mut(player_id) else {
            tracing::warn!(room = %self.name, player_id, "unknown player tried to switch role");
            return None;
        };
        player.role = role;
        if role == Role::Spectator {
            player.team = Team::Undecided;
        }
        Some(role)
    }

    pub fn change_difficulty(&mut self, player_id: &str, difficulty: Difficulty) {
        if !self.settings_allowed(player_id, "change difficulty") {
            return;
        }
        self.difficulty = difficulty;
    }

    /// Switches the pacing mode and applies the timer value carried by
    /// the event (minutes).
    pub fn switch_mode(&mut self, player_id: &str, mode: Mode, timer_minutes: f64) {
        if !self.settings_allowed(player_id, "switch mode") {
            return;
        }
        self.mode = mode;
        self.set_timer_minutes(timer_minutes);
    }

    pub fn switch_consensus(&mut self, player_id: &str, consensus: Consensus) {
        if !self.settings_allowed(player_id, "switch consensus") {
            return;
        }
        self.consensus = consensus;
    }

    /// Stores a new timer amount, interpreted as minutes.
    pub fn change_timer(&mut self, player_id: &str, minutes: f64) {
        if !self.settings_allowed(player_id, "change the timer") {
            return;
        }
        self.set_timer_minutes(minutes);
    }

    /// Room settings are off-limits to spectators and unknown callers.
    fn settings_allowed(&self, player_id: &str, what: &str) -> bool {
        match self.players.get(player_id) {
            Some(player) if player.role == Role::Spectator => {
                tracing::warn!(room = %self.name, player_id, "spectator tried to {what}");
                false
            }
            Some(_) => true,
            None => {
                tracing::warn!(room = %self.name, player_id, "unknown player tried to {what}");
                false
            }
        }
    }

    fn set_timer_minutes(&mut self, minutes: f64) {
        self.game.timer_amount = minutes * 60.0;
        self.game.timer = self.game.timer_amount;
    }

    /// Hands the turn to the other team unconditionally.
    pub fn end_turn(&mut self, player_id: &str) {
        if !self.players.contains_key(player_id) {
            tracing::warn!(room = %self.name, player_id, "unknown player tried to end the turn");
            return;
        }
        self.switch_turns();
        self.game.log.push(GameLog {
            event: LogEvent::EndTurn,
            team: Some(self.game.turn),
            word: None,
            tile_type: None,
            clue: None,
            ended_turn: true,
        });
    }

    /// Records the active clue. Whether the caller is actually the
    /// active team's spymaster is the client's problem.
    pub fn declare_clue(&mut self, player_id: &str, word: &str, count: u32) {
        if !self.players.contains_key(player_id) {
            tracing::warn!(room = %self.name, player_id, "unknown player tried to declare a clue");
            return;
        }
        let clue = Clue {
            word: word.to_string(),
            count,
        };
        self.game.clue = Some(clue.clone());
        self.game.log.push(GameLog {
            event: LogEvent::DeclareClue,
            team: Some(self.game.turn),
            word: None,
            tile_type: None,
            clue: Some(clue),
            ended_turn: false,
        });
    }

    /// Toggles a word pack on the room's mask. The current board is left
    /// alone; the next new game draws from the updated mask.
    pub fn change_cards(&mut self, player_id: &str, pack: &str) {
        if !self.players.contains_key(player_id) {
            tracing::warn!(room = %self.name, player_id, "unknown player tried to change packs");
            return;
        }
        let Some(bit) = BoardType::from_pack(pack) else {
            tracing::warn!(room = %self.name, player_id, pack, "unknown word pack");
            return;
        };
        self.board_type.toggle(bit);

        self.game.base = self.board_type.contains(BoardType::DEFAULT);
        self.game.duet = self.board_type.contains(BoardType::DUET);
        self.game.undercover = self.board_type.contains(BoardType::UNDERCOVER);
        self.game.custom = self.board_type.contains(BoardType::CUSTOM);
        self.game.nsfw = self.board_type.contains(BoardType::NSFW);
        self.game.word_pool = self.pools.pool_size(self.board_type);
    }

    /// A guesser flips (or, under consensus, proposes) the tile at
    /// `(i, j)`. Every precondition failure is a silent drop.
    pub fn select_tile(&mut self, player_id: &str, i: usize, j: usize) {
        let Some(player) = self.players.get(player_id) else {
            tracing::warn!(room = %self.name, player_id, "unknown player clicked a tile");
            return;
        };
        let team = player.team;
        let role = player.role;

        if self.game.over {
            return;
        }
        if team != self.game.turn {
            tracing::warn!(room = %self.name, player_id, "click out of turn");
            return;
        }
        if matches!(role, Role::Spectator | Role::Spymaster) {
            tracing::warn!(room = %self.name, player_id, ?role, "role may not flip tiles");
            return;
        }
        let Some(clue) = self.game.clue.clone() else {
            tracing::warn!(room = %self.name, player_id, "click before any clue");
            return;
        };
        if self.game.turns_taken >= clue.count + 1 {
            tracing::warn!(room = %self.name, player_id, "guess budget exhausted");
            return;
        }
        if i >= 5 || j >= 5 {
            tracing::warn!(room = %self.name, player_id, i, j, "tile out of bounds");
            return;
        }
        if self.game.board[i][j].flipped {
            return;
        }

        let word = self.game.board[i][j].word.clone();

        if self.consensus == Consensus::Consensus {
            if let Some(player) = self.players.get_mut(player_id) {
                player.guess_proposal = Some(word.clone());
            }
            let all_agree = self
                .players
                .values()
                .filter(|p| {
                    p.team == team && !matches!(p.role, Role::Spymaster | Role::Spectator)
                })
                .all(|p| p.guess_proposal.as_deref() == Some(word.as_str()));
            if !all_agree {
                return;
            }
        }

        self.game.board[i][j].flipped = true;
        let tile_type = self.game.board[i][j].tile_type;
        let mut ended_turn = false;

        match tile_type {
            TileType::Death => {
                self.game.over = true;
                self.game.winner = Some(team.other());
                ended_turn = true;
            }
            TileType::Neutral => {
                self.switch_turns();
                ended_turn = true;
            }
            TileType::Blue => {
                self.game.blue -= 1;
                if team == Team::Blue {
                    self.game.turns_taken += 1;
                } else {
                    self.switch_turns();
                    ended_turn = true;
                }
            }
            TileType::Red => {
                self.game.red -= 1;
                if team == Team::Red {
                    self.game.turns_taken += 1;
                } else {
                    self.switch_turns();
                    ended_turn = true;
                }
            }
        }

        // A team whose last word is found wins, no matter who flipped it.
        if !self.game.over {
            let finished = match tile_type.team() {
                Some(color) => {
                    (color == Team::Blue && self.game.blue == 0)
                        || (color == Team::Red && self.game.red == 0)
                }
                None => false,
            };
            if finished {
                self.game.over = true;
                self.game.winner = tile_type.team();
                ended_turn = true;
            }
        }

        self.clear_proposals(team);

        if !self.game.over {
            if let Some(clue) = &self.game.clue {
                if self.game.turns_taken >= clue.count + 1 {
                    self.switch_turns();
                    ended_turn = true;
                }
            }
        }

        self.game.log.push(GameLog {
            event: LogEvent::FlipTile,
            team: Some(team),
            word: Some(word),
            tile_type: Some(tile_type),
            clue: None,
            ended_turn,
        });
    }

    fn switch_turns(&mut self) {
        let incoming = self.game.turn.other();
        self.game.turn = incoming;
        self.game.turns_taken = 0;
        self.game.clue = None;
        self.clear_proposals(incoming);
    }

    fn clear_proposals(&mut self, team: Team) {
        for player in self.players.values_mut() {
            if player.team == team {
                player.guess_proposal = None;
            }
        }
    }

    /// A deep snapshot of the room, safe to hand to the broadcaster —
    /// it shares nothing with the live state.
    pub fn game_state(&self) -> GameState {
        GameState {
            room: self.name.clone(),
            players: self.players.clone(),
            game: self.game.clone(),
            difficulty: self.difficulty,
            mode: self.mode,
            consensus: self.consensus,
            team: None,
        }
    }

    /// Like [`game_state`](Self::game_state), scoped to one caller: the
    /// snapshot additionally carries that player's team.
    pub fn player_game_state(&self, player_id: &str) -> GameState {
        let mut state = self.game_state();
        state.team = self.players.get(player_id).map(|p| p.team);
        state
    }
}
