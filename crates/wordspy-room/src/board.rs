//! Board type mask and the 5×5 board generator.

use rand::seq::{IndexedRandom, SliceRandom};
use std::collections::HashSet;

use wordspy_protocol::{Team, Tile, TileType};

use crate::WordPools;

/// Bitmask over the word packs a room draws its boards from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardType(u8);

impl BoardType {
    pub const DEFAULT: BoardType = BoardType(1);
    pub const DUET: BoardType = BoardType(1 << 1);
    pub const UNDERCOVER: BoardType = BoardType(1 << 2);
    pub const CUSTOM: BoardType = BoardType(1 << 3);
    pub const NSFW: BoardType = BoardType(1 << 4);

    /// The fixed order packs are visited when drawing words.
    pub const DRAW_ORDER: [BoardType; 5] = [
        Self::DEFAULT,
        Self::CUSTOM,
        Self::DUET,
        Self::NSFW,
        Self::UNDERCOVER,
    ];

    /// Maps a wire-level pack name to its bit. `base` is the historical
    /// client name for the default pack.
    pub fn from_pack(pack: &str) -> Option<BoardType> {
        match pack {
            "base" => Some(Self::DEFAULT),
            "duet" => Some(Self::DUET),
            "undercover" => Some(Self::UNDERCOVER),
            "custom" => Some(Self::CUSTOM),
            "nsfw" => Some(Self::NSFW),
            _ => None,
        }
    }

    pub fn contains(self, other: BoardType) -> bool {
        self.0 & other.0 != 0
    }

    pub fn toggle(&mut self, other: BoardType) {
        self.0 ^= other.0;
    }

    pub fn count(self) -> usize {
        self.0.count_ones() as usize
    }

    /// The mask actually used for drawing: an empty mask falls back to
    /// the default pack alone.
    pub fn effective(self) -> BoardType {
        if self.0 == 0 {
            Self::DEFAULT
        } else {
            self
        }
    }
}

/// Builds a shuffled 5×5 board: one assassin, nine tiles for the starting
/// team, eight for the other, seven neutral, all words distinct.
///
/// Words are drawn without replacement from each enabled pack in
/// [`BoardType::DRAW_ORDER`]; duplicates across packs collapse. If the
/// draw comes up short of 25 the remainder is refilled from the default
/// pack, which the registry guarantees is large enough.
pub fn generate_board(pools: &WordPools, mask: BoardType, starting_team: Team) -> [[Tile; 5]; 5] {
    let mask = mask.effective();
    let per_pack = 25 / mask.count() + 1;

    let mut rng = rand::rng();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut words: Vec<String> = Vec::with_capacity(25);

    for pack in BoardType::DRAW_ORDER {
        if !mask.contains(pack) {
            continue;
        }
        for word in pools.words_for(pack).choose_multiple(&mut rng, per_pack) {
            if seen.insert(word.as_str()) {
                words.push(word.clone());
            }
        }
    }

    if words.len() < 25 {
        let default = pools.words_for(BoardType::DEFAULT);
        for word in default.choose_multiple(&mut rng, default.len()) {
            if words.len() >= 25 {
                break;
            }
            if seen.insert(word.as_str()) {
                words.push(word.clone());
            }
        }
    }

    words.truncate(25);

    let first_color = match starting_team {
        Team::Red => TileType::Red,
        _ => TileType::Blue,
    };
    let second_color = match first_color {
        TileType::Red => TileType::Blue,
        _ => TileType::Red,
    };

    let mut tiles: Vec<Tile> = words
        .into_iter()
        .enumerate()
        .map(|(idx, word)| {
            let tile_type = match idx {
                0 => TileType::Death,
                1..=9 => first_color,
                10..=17 => second_color,
                _ => TileType::Neutral,
            };
            Tile {
                word,
                tile_type,
                flipped: false,
            }
        })
        .collect();

    tiles.shuffle(&mut rng);

    let mut tiles = tiles.into_iter();
    std::array::from_fn(|_| {
        std::array::from_fn(|_| tiles.next().expect("board has exactly 25 tiles"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_pools;

    fn census(board: &[[Tile; 5]; 5]) -> (usize, usize, usize, usize) {
        let mut counts = (0, 0, 0, 0);
        for row in board {
            for tile in row {
                match tile.tile_type {
                    TileType::Blue => counts.0 += 1,
                    TileType::Red => counts.1 += 1,
                    TileType::Death => counts.2 += 1,
                    TileType::Neutral => counts.3 += 1,
                }
            }
        }
        counts
    }

    #[test]
    fn test_board_type_from_pack() {
        assert_eq!(BoardType::from_pack("base"), Some(BoardType::DEFAULT));
        assert_eq!(BoardType::from_pack("duet"), Some(BoardType::DUET));
        assert_eq!(BoardType::from_pack("nsfw"), Some(BoardType::NSFW));
        assert_eq!(BoardType::from_pack("jumbo"), None);
    }

    #[test]
    fn test_board_type_toggle_round_trips() {
        let mut mask = BoardType::DEFAULT;
        mask.toggle(BoardType::DUET);
        assert!(mask.contains(BoardType::DUET));
        assert_eq!(mask.count(), 2);
        mask.toggle(BoardType::DUET);
        assert!(!mask.contains(BoardType::DUET));
        assert_eq!(mask, BoardType::DEFAULT);
    }

    #[test]
    fn test_empty_mask_falls_back_to_default() {
        let mut mask = BoardType::DEFAULT;
        mask.toggle(BoardType::DEFAULT);
        assert_eq!(mask.count(), 0);
        assert_eq!(mask.effective(), BoardType::DEFAULT);
    }

    #[test]
    fn test_board_census_blue_starts() {
        let pools = test_pools();
        let board = generate_board(&pools, BoardType::DEFAULT, Team::Blue);
        let (blue, red, death, neutral) = census(&board);
        assert_eq!(blue, 9);
        assert_eq!(red, 8);
        assert_eq!(death, 1);
        assert_eq!(neutral, 7);
    }

    #[test]
    fn test_board_census_red_starts() {
        let pools = test_pools();
        let board = generate_board(&pools, BoardType::DEFAULT, Team::Red);
        let (blue, red, death, neutral) = census(&board);
        assert_eq!(blue, 8);
        assert_eq!(red, 9);
        assert_eq!(death, 1);
        assert_eq!(neutral, 7);
    }

    #[test]
    fn test_board_words_are_distinct() {
        let pools = test_pools();
        for _ in 0..20 {
            let board = generate_board(
                &pools,
                BoardType::DEFAULT.effective(),
                Team::Blue,
            );
            let words: HashSet<&str> = board
                .iter()
                .flatten()
                .map(|t| t.word.as_str())
                .collect();
            assert_eq!(words.len(), 25);
            assert!(board.iter().flatten().all(|t| !t.flipped));
        }
    }

    #[test]
    fn test_multi_pack_board_still_fills() {
        let pools = test_pools();
        let mut mask = BoardType::DEFAULT;
        mask.toggle(BoardType::DUET);
        mask.toggle(BoardType::CUSTOM);
        let board = generate_board(&pools, mask, Team::Blue);
        let (blue, red, death, neutral) = census(&board);
        assert_eq!(blue + red + death + neutral, 25);
        assert_eq!(death, 1);
    }

    #[test]
    fn test_short_pack_refills_from_default() {
        // The duet pack alone cannot fill a board; the generator tops up
        // from the default pack.
        let pools = crate::WordPools::from_lists(
            (0..40).map(|i| format!("base{i}")).collect(),
            vec!["tiny1".into(), "tiny2".into()],
            vec!["tiny1".into(), "tiny2".into()],
            (0..30).map(|i| format!("custom{i}")).collect(),
            (0..30).map(|i| format!("nsfw{i}")).collect(),
        )
        .unwrap();
        let board = generate_board(&pools, BoardType::DUET, Team::Blue);
        let words: HashSet<&str> = board.iter().flatten().map(|t| t.word.as_str()).collect();
        assert_eq!(words.len(), 25);
    }
}
