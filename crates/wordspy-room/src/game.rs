//! Round construction. The [`Game`] struct itself lives in the protocol
//! crate (it is broadcast wholesale); this module owns how a fresh round
//! comes into being.

use rand::Rng;

use wordspy_protocol::{Game, Team};

use crate::{generate_board, BoardType, WordPools};

/// Seconds on the clock for a brand-new room.
pub const DEFAULT_TIMER_SECS: f64 = 300.0;

/// Builds a fresh round: a fair coin picks the starting team, which owns
/// nine tiles to the opponent's eight.
pub fn new_game(pools: &WordPools, mask: BoardType, timer_amount: f64) -> Game {
    let mut rng = rand::rng();
    let turn = if rng.random_bool(0.5) {
        Team::Blue
    } else {
        Team::Red
    };
    let (blue, red) = match turn {
        Team::Red => (8, 9),
        _ => (9, 8),
    };

    let mask_in_use = mask.effective();

    Game {
        timer_amount,
        timer: timer_amount,
        word_pool: pools.pool_size(mask),

        base: mask_in_use.contains(BoardType::DEFAULT),
        duet: mask_in_use.contains(BoardType::DUET),
        undercover: mask_in_use.contains(BoardType::UNDERCOVER),
        custom: mask_in_use.contains(BoardType::CUSTOM),
        nsfw: mask_in_use.contains(BoardType::NSFW),

        red,
        blue,

        turn,
        over: false,
        winner: None,
        board: generate_board(pools, mask, turn),
        log: Vec::new(),
        clue: None,
        turns_taken: 0,
    }
}
