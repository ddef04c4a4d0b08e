//! The word-pool registry: five named packs loaded once at startup.
//!
//! The registry is immutable after construction and shared behind an
//! `Arc`; readers need no synchronization. A missing or unreadable file
//! is fatal — the server refuses to start without its words.

use std::fs;
use std::path::Path;

use crate::{BoardType, RoomError};

/// The smallest default pack that can always fill a 25-tile board,
/// including the refill path for short packs.
const MIN_DEFAULT_WORDS: usize = 25;

/// Read-only word lists keyed by pack.
#[derive(Debug, Clone)]
pub struct WordPools {
    default: Vec<String>,
    duet: Vec<String>,
    undercover: Vec<String>,
    custom: Vec<String>,
    nsfw: Vec<String>,
}

impl WordPools {
    /// Loads all five packs from `dir`.
    ///
    /// The `undercover` pack reads the duet file — the lists have always
    /// shipped that way and the client counts both packs separately.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, RoomError> {
        let dir = dir.as_ref();
        let default = read_words(&dir.join("words.txt"))?;
        let duet = read_words(&dir.join("duet-words.txt"))?;
        let undercover = duet.clone();
        let custom = read_words(&dir.join("custom-words.txt"))?;
        let nsfw = read_words(&dir.join("nsfw-words.txt"))?;
        Self::from_lists(default, duet, undercover, custom, nsfw)
    }

    /// Builds a registry from in-memory lists.
    pub fn from_lists(
        default: Vec<String>,
        duet: Vec<String>,
        undercover: Vec<String>,
        custom: Vec<String>,
        nsfw: Vec<String>,
    ) -> Result<Self, RoomError> {
        if default.len() < MIN_DEFAULT_WORDS {
            return Err(RoomError::WordListTooSmall {
                name: "default",
                len: default.len(),
                min: MIN_DEFAULT_WORDS,
            });
        }
        for (name, list) in [
            ("duet", &duet),
            ("undercover", &undercover),
            ("custom", &custom),
            ("nsfw", &nsfw),
        ] {
            if list.is_empty() {
                return Err(RoomError::WordListTooSmall {
                    name,
                    len: 0,
                    min: 1,
                });
            }
        }
        Ok(Self {
            default,
            duet,
            undercover,
            custom,
            nsfw,
        })
    }

    /// The word list for a single pack bit. Multi-bit masks resolve to
    /// the default pack.
    pub fn words_for(&self, pack: BoardType) -> &[String] {
        match pack {
            BoardType::DUET => &self.duet,
            BoardType::UNDERCOVER => &self.undercover,
            BoardType::CUSTOM => &self.custom,
            BoardType::NSFW => &self.nsfw,
            _ => &self.default,
        }
    }

    /// Total number of words feeding a board drawn with `mask`.
    pub fn pool_size(&self, mask: BoardType) -> usize {
        let mask = mask.effective();
        BoardType::DRAW_ORDER
            .iter()
            .filter(|pack| mask.contains(**pack))
            .map(|pack| self.words_for(*pack).len())
            .sum()
    }
}

fn read_words(path: &Path) -> Result<Vec<String>, RoomError> {
    let text = fs::read_to_string(path).map_err(|source| RoomError::WordList {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lists(n: usize, prefix: &str) -> Vec<String> {
        (0..n).map(|i| format!("{prefix}{i}")).collect()
    }

    #[test]
    fn test_from_lists_rejects_small_default() {
        let result = WordPools::from_lists(
            lists(10, "w"),
            lists(5, "d"),
            lists(5, "u"),
            lists(5, "c"),
            lists(5, "n"),
        );
        assert!(matches!(
            result,
            Err(RoomError::WordListTooSmall { name: "default", .. })
        ));
    }

    #[test]
    fn test_from_lists_rejects_empty_pack() {
        let result = WordPools::from_lists(
            lists(30, "w"),
            Vec::new(),
            lists(5, "u"),
            lists(5, "c"),
            lists(5, "n"),
        );
        assert!(matches!(
            result,
            Err(RoomError::WordListTooSmall { name: "duet", .. })
        ));
    }

    #[test]
    fn test_pool_size_sums_enabled_packs() {
        let pools = WordPools::from_lists(
            lists(30, "w"),
            lists(10, "d"),
            lists(10, "u"),
            lists(7, "c"),
            lists(5, "n"),
        )
        .unwrap();

        assert_eq!(pools.pool_size(BoardType::DEFAULT), 30);

        let mut mask = BoardType::DEFAULT;
        mask.toggle(BoardType::CUSTOM);
        assert_eq!(pools.pool_size(mask), 37);

        mask.toggle(BoardType::DUET);
        mask.toggle(BoardType::NSFW);
        assert_eq!(pools.pool_size(mask), 52);
    }

    #[test]
    fn test_pool_size_empty_mask_counts_default() {
        let pools = WordPools::from_lists(
            lists(30, "w"),
            lists(10, "d"),
            lists(10, "u"),
            lists(7, "c"),
            lists(5, "n"),
        )
        .unwrap();
        let mut mask = BoardType::DEFAULT;
        mask.toggle(BoardType::DEFAULT);
        assert_eq!(pools.pool_size(mask), 30);
    }

    #[test]
    fn test_load_reads_files_and_aliases_undercover() {
        let dir = std::env::temp_dir().join(format!("wordspy-words-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let default: Vec<String> = lists(30, "word");
        fs::write(dir.join("words.txt"), default.join("\n")).unwrap();
        fs::write(dir.join("duet-words.txt"), "pair\nmatch\n\n  \n").unwrap();
        fs::write(dir.join("custom-words.txt"), "house\nrule").unwrap();
        fs::write(dir.join("nsfw-words.txt"), "tequila").unwrap();

        let pools = WordPools::load(&dir).unwrap();
        assert_eq!(pools.words_for(BoardType::DEFAULT).len(), 30);
        // Blank lines are dropped.
        assert_eq!(pools.words_for(BoardType::DUET), &["pair", "match"]);
        // The undercover pack aliases the duet file.
        assert_eq!(
            pools.words_for(BoardType::UNDERCOVER),
            pools.words_for(BoardType::DUET)
        );

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let result = WordPools::load("/nonexistent/wordspy-words");
        assert!(matches!(result, Err(RoomError::WordList { .. })));
    }
}
