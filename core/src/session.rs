use core::fmt;
use core::str::FromStr;

use rand::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::*;

/// The three board presets offered by the game window.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const fn config(self) -> GameConfig {
        match self {
            Self::Easy => GameConfig::new(9, 9, 10),
            Self::Medium => GameConfig::new(16, 16, 40),
            Self::Hard => GameConfig::new(16, 30, 99),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
#[error("Unknown difficulty preset")]
pub struct ParseDifficultyError;

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(ParseDifficultyError),
        }
    }
}

/// Owns one [`Game`] at a time plus the session-scoped RNG that seeds each
/// new board.
///
/// Input dispatch is forgiving: anything the engine rejects is swallowed and
/// reported as "no update". Restarts and difficulty changes retire the old
/// game and construct a fresh, independently seeded one in a single call, so
/// no input ever observes a half-replaced instance.
#[derive(Clone, Debug)]
pub struct GameSession {
    config: GameConfig,
    difficulty: Option<Difficulty>,
    rng: SmallRng,
    game: Game,
}

impl GameSession {
    /// Session over a custom board. Fails only when the board is too dense
    /// to generate.
    pub fn new(config: GameConfig, seed: u64) -> Result<Self> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let game = Game::new(config, rng.random())?;
        Ok(Self {
            config,
            difficulty: None,
            rng,
            game,
        })
    }

    pub fn with_difficulty(difficulty: Difficulty, seed: u64) -> Self {
        let mut session = Self::new(difficulty.config(), seed).expect("preset configs are valid");
        session.difficulty = Some(difficulty);
        session
    }

    /// Session over a fixed, pre-built layout; restarts fall back to random
    /// generation on the same dimensions.
    pub fn from_layout(layout: MineLayout, seed: u64) -> Self {
        let game = Game::from_layout(layout);
        Self {
            config: game.config(),
            difficulty: None,
            rng: SmallRng::seed_from_u64(seed),
            game,
        }
    }

    /// Primary action: uncover a cell. Returns whether anything changed.
    pub fn reveal(&mut self, row: Coord, col: Coord) -> bool {
        self.game
            .reveal((row, col))
            .map_or(false, RevealOutcome::has_update)
    }

    /// Secondary action: mark or unmark a suspected mine.
    pub fn toggle_flag(&mut self, row: Coord, col: Coord) -> bool {
        self.game
            .toggle_flag((row, col))
            .map_or(false, FlagOutcome::has_update)
    }

    /// One-second timer tick; returns whether the readout changed.
    pub fn tick(&mut self) -> bool {
        self.game.tick()
    }

    /// Discards the board and starts over on the same configuration.
    pub fn reset(&mut self) {
        self.game = self.fresh_game();
        log::debug!(
            "session reset, {}x{} with {} mines",
            self.config.rows,
            self.config.cols,
            self.config.mines
        );
    }

    /// Retires the current game and its board, replacing them with a fresh
    /// instance on the selected preset.
    pub fn change_difficulty(&mut self, difficulty: Difficulty) {
        self.config = difficulty.config();
        self.difficulty = Some(difficulty);
        self.game = self.fresh_game();
        log::debug!("difficulty changed to {}", difficulty);
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn size(&self) -> Coord2 {
        self.config.size()
    }

    pub fn state(&self) -> GameState {
        self.game.state()
    }

    pub fn outcome(&self) -> Outcome {
        self.game.outcome()
    }

    pub fn is_finished(&self) -> bool {
        self.game.is_finished()
    }

    pub fn total_mines(&self) -> CellCount {
        self.config.mines
    }

    pub fn mines_left(&self) -> isize {
        self.game.mines_left()
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.game.elapsed_secs()
    }

    pub fn cell_at(&self, coords: Coord2) -> CellState {
        self.game.cell_at(coords)
    }

    fn fresh_game(&mut self) -> Game {
        Game::new(self.config, self.rng.random())
            .expect("config was validated when the session was created")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2x2 with the mine pinned at (0, 0) so every move is deterministic
    fn tiny_session() -> GameSession {
        let layout = MineLayout::from_mine_coords((2, 2), &[(0, 0)]).unwrap();
        GameSession::from_layout(layout, 99)
    }

    #[test]
    fn preset_names_round_trip() {
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            assert_eq!(difficulty.name().parse(), Ok(difficulty));
        }
        assert_eq!(
            "expert".parse::<Difficulty>(),
            Err(ParseDifficultyError)
        );
    }

    #[test]
    fn preset_configs_match_the_classic_boards() {
        assert_eq!(Difficulty::Easy.config(), GameConfig::new(9, 9, 10));
        assert_eq!(Difficulty::Medium.config(), GameConfig::new(16, 16, 40));
        assert_eq!(Difficulty::Hard.config(), GameConfig::new(16, 30, 99));
    }

    #[test]
    fn construction_rejects_invalid_boards() {
        assert_eq!(
            GameSession::new(GameConfig::new(2, 2, 4), 0).map(|_| ()),
            Err(GameError::TooManyMines)
        );
    }

    #[test]
    fn invalid_input_is_silently_ignored() {
        let mut session = tiny_session();

        assert!(!session.reveal(5, 5));
        assert!(!session.toggle_flag(0, 0));

        assert!(session.reveal(1, 1));
        assert_eq!(session.outcome(), Outcome::InProgress);
    }

    #[test]
    fn loss_freezes_input_until_reset() {
        let mut session = tiny_session();

        assert!(session.reveal(1, 1));
        assert!(session.reveal(0, 0));
        assert_eq!(session.outcome(), Outcome::Lost);

        assert!(!session.reveal(0, 1));
        assert!(!session.toggle_flag(0, 1));
        assert!(!session.tick());

        session.reset();
        assert_eq!(session.outcome(), Outcome::InProgress);
        assert_eq!(session.elapsed_secs(), 0);
        assert_eq!(session.mines_left(), 1);
        assert_eq!(session.cell_at((0, 0)), CellState::Hidden);
        assert!(session.reveal(0, 0));
    }

    #[test]
    fn flag_then_unflag_restores_the_counter_and_cell() {
        let mut session = tiny_session();

        session.reveal(1, 1);
        assert_eq!(session.mines_left(), 1);

        assert!(session.toggle_flag(0, 1));
        assert_eq!(session.mines_left(), 0);
        assert!(session.toggle_flag(0, 1));
        assert_eq!(session.mines_left(), 1);
        assert_eq!(session.cell_at((0, 1)), CellState::Hidden);
    }

    #[test]
    fn changing_difficulty_swaps_the_whole_board() {
        let mut session = GameSession::with_difficulty(Difficulty::Easy, 7);
        assert_eq!(session.size(), (9, 9));

        session.reveal(4, 4);
        session.tick();

        session.change_difficulty(Difficulty::Hard);
        assert_eq!(session.difficulty(), Some(Difficulty::Hard));
        assert_eq!(session.size(), (16, 30));
        assert_eq!(session.total_mines(), 99);
        assert_eq!(session.mines_left(), 99);
        assert_eq!(session.elapsed_secs(), 0);
        assert_eq!(session.state(), GameState::Fresh);
    }

    #[test]
    fn tick_flows_through_to_the_game() {
        let mut session = tiny_session();

        assert!(!session.tick());
        session.reveal(1, 1);
        assert!(session.tick());
        assert_eq!(session.elapsed_secs(), 1);
    }
}
