use serde::{Deserialize, Serialize};

/// Hidden content of a generated cell: a mine, or its Moore-neighborhood
/// mine count in `0..=8`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Mine,
    Clear(u8),
}

impl CellValue {
    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }
}

/// Player-visible state of one cell.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CellState {
    Hidden,
    Flagged,
    Revealed(CellValue),
}

impl CellState {
    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Revealed(_))
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self, Self::Flagged)
    }
}

impl Default for CellState {
    fn default() -> Self {
        Self::Hidden
    }
}
