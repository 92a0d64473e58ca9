use alloc::collections::{BTreeSet, VecDeque};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Lifecycle of one game.
///
/// Valid transitions:
/// - `Fresh -> InProgress` on the first reveal, which also places the mines
/// - `InProgress -> Won`
/// - `InProgress -> Lost`
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameState {
    Fresh,
    InProgress,
    Won,
    Lost,
}

impl GameState {
    pub const fn is_fresh(self) -> bool {
        matches!(self, Self::Fresh)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::Fresh
    }
}

/// Settled result as seen by the presentation layer.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Outcome {
    InProgress,
    Won,
    Lost,
}

/// One game from construction to a terminal state.
///
/// The board starts empty; mines are placed on the first reveal with the
/// clicked cell excluded, so the first reveal can never detonate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Game {
    config: GameConfig,
    seed: u64,
    layout: Option<MineLayout>,
    grid: Array2<CellState>,
    revealed_count: CellCount,
    flagged_count: CellCount,
    state: GameState,
    elapsed_secs: u32,
}

impl Game {
    pub fn new(config: GameConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            seed,
            layout: None,
            grid: Array2::default(config.size().to_nd_index()),
            revealed_count: 0,
            flagged_count: 0,
            state: Default::default(),
            elapsed_secs: 0,
        })
    }

    /// Game over a fixed, pre-built layout; the first reveal skips
    /// generation and may hit a mine.
    pub fn from_layout(layout: MineLayout) -> Self {
        let config = layout.game_config();
        Self {
            config,
            seed: 0,
            layout: Some(layout),
            grid: Array2::default(config.size().to_nd_index()),
            revealed_count: 0,
            flagged_count: 0,
            state: Default::default(),
            elapsed_secs: 0,
        }
    }

    pub const fn state(&self) -> GameState {
        self.state
    }

    /// Tri-state result; a game with no reveals yet is still in progress.
    pub const fn outcome(&self) -> Outcome {
        match self.state {
            GameState::Fresh | GameState::InProgress => Outcome::InProgress,
            GameState::Won => Outcome::Won,
            GameState::Lost => Outcome::Lost,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub const fn config(&self) -> GameConfig {
        self.config
    }

    pub const fn size(&self) -> Coord2 {
        self.config.size()
    }

    pub const fn total_mines(&self) -> CellCount {
        self.config.mines
    }

    /// Mines minus flags placed; negative when the player over-flags.
    pub const fn mines_left(&self) -> isize {
        (self.config.mines as isize) - (self.flagged_count as isize)
    }

    pub const fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    pub fn cell_at(&self, coords: Coord2) -> CellState {
        self.grid[coords.to_nd_index()]
    }

    /// Uncover a cell. Out-of-bounds coordinates and settled games are
    /// rejected with an error; revealed and flagged cells are a quiet
    /// `NoChange`.
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        let coords = self.validate_coords(coords)?;
        self.check_not_finished()?;

        if !matches!(self.grid[coords.to_nd_index()], CellState::Hidden) {
            return Ok(RevealOutcome::NoChange);
        }

        self.ensure_layout(coords);
        self.mark_started();
        Ok(self.reveal_cell(coords))
    }

    /// Mark or unmark a covered cell as a suspected mine. Only legal while
    /// the game is running; revealed cells are a quiet `NoChange`.
    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<FlagOutcome> {
        let coords = self.validate_coords(coords)?;
        self.check_in_progress()?;

        Ok(match self.grid[coords.to_nd_index()] {
            CellState::Hidden => {
                self.grid[coords.to_nd_index()] = CellState::Flagged;
                self.flagged_count += 1;
                FlagOutcome::Toggled
            }
            CellState::Flagged => {
                self.grid[coords.to_nd_index()] = CellState::Hidden;
                self.flagged_count -= 1;
                FlagOutcome::Toggled
            }
            CellState::Revealed(_) => FlagOutcome::NoChange,
        })
    }

    /// One-second timer tick from the embedder; counts only while the game
    /// is running, so the readout freezes on win and loss.
    pub fn tick(&mut self) -> bool {
        if matches!(self.state, GameState::InProgress) {
            self.elapsed_secs += 1;
            true
        } else {
            false
        }
    }

    fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if self.config.contains(coords) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    fn check_in_progress(&self) -> Result<()> {
        match self.state {
            GameState::Fresh => Err(GameError::NotStarted),
            GameState::InProgress => Ok(()),
            GameState::Won | GameState::Lost => Err(GameError::AlreadyEnded),
        }
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }

    fn ensure_layout(&mut self, first_click: Coord2) {
        if self.layout.is_none() {
            let layout = RandomLayoutGenerator::new(self.seed, first_click)
                .generate(self.config)
                .expect("config was validated at construction");
            self.layout = Some(layout);
        }
    }

    fn layout(&self) -> &MineLayout {
        self.layout
            .as_ref()
            .expect("layout exists once a reveal happened")
    }

    fn mark_started(&mut self) {
        if self.state.is_fresh() {
            self.state = GameState::InProgress;
            log::debug!("first reveal, game started");
        }
    }

    fn reveal_cell(&mut self, coords: Coord2) -> RevealOutcome {
        let value = self.layout().value_at(coords);
        match value {
            CellValue::Mine => {
                log::debug!("mine hit at {:?}", coords);
                self.reveal_all_cells();
                self.state = GameState::Lost;
                RevealOutcome::HitMine
            }
            value @ CellValue::Clear(adjacent) => {
                self.grid[coords.to_nd_index()] = CellState::Revealed(value);
                self.revealed_count += 1;
                log::trace!("revealed {:?}, adjacent mines: {}", coords, adjacent);

                if adjacent == 0 {
                    self.flood_reveal_from(coords);
                }

                if self.revealed_count == self.layout().safe_cell_count() {
                    self.state = GameState::Won;
                    log::debug!("all safe cells revealed, game won");
                    RevealOutcome::Won
                } else {
                    RevealOutcome::Revealed
                }
            }
        }
    }

    /// Worklist flood fill: every cell is enqueued after a visited check, so
    /// each cell is processed at most once and the loop runs at most
    /// `rows * cols` times on any board.
    fn flood_reveal_from(&mut self, start: Coord2) {
        let mut visited = BTreeSet::from([start]);
        let mut to_visit: VecDeque<_> = self.hidden_neighbors(start).collect();

        while let Some(coords) = to_visit.pop_front() {
            if !visited.insert(coords) {
                continue;
            }

            // flags block the cascade; revealed cells are already settled
            if !matches!(self.grid[coords.to_nd_index()], CellState::Hidden) {
                continue;
            }

            // cells reached by the cascade border a zero cell, never a mine
            let value = self.layout().value_at(coords);
            self.grid[coords.to_nd_index()] = CellState::Revealed(value);
            self.revealed_count += 1;
            log::trace!("cascade revealed {:?}", coords);

            if matches!(value, CellValue::Clear(0)) {
                let next: VecDeque<_> = self
                    .hidden_neighbors(coords)
                    .filter(|pos| !visited.contains(pos))
                    .collect();
                to_visit.extend(next);
            }
        }
    }

    /// Uncovers the whole board, flags included, so the presentation can
    /// show every mine after a loss.
    fn reveal_all_cells(&mut self) {
        let (rows, cols) = self.config.size();
        for row in 0..rows {
            for col in 0..cols {
                let coords = (row, col);
                let value = self.layout().value_at(coords);
                self.grid[coords.to_nd_index()] = CellState::Revealed(value);
            }
        }
    }

    fn hidden_neighbors(&self, coords: Coord2) -> impl Iterator<Item = Coord2> + '_ {
        self.grid
            .iter_neighbors(coords)
            .filter(|&pos| matches!(self.grid[pos.to_nd_index()], CellState::Hidden))
    }
}
