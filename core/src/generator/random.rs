use ndarray::Array2;

use super::*;

/// Uniform rejection-sampling generator: draws one candidate cell at a time,
/// skipping cells that already hold a mine and the single protected
/// first-click cell, until the requested number of mines is placed.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RandomLayoutGenerator {
    seed: u64,
    exclude: Coord2,
}

impl RandomLayoutGenerator {
    pub const fn new(seed: u64, exclude: Coord2) -> Self {
        Self { seed, exclude }
    }
}

impl LayoutGenerator for RandomLayoutGenerator {
    fn generate(self, config: GameConfig) -> Result<MineLayout> {
        use rand::prelude::*;

        // a full board would reject candidates forever
        config.validate()?;

        let mut mine_mask: Array2<bool> = Array2::default(config.size().to_nd_index());
        let mut placed: CellCount = 0;

        let mut rng = SmallRng::seed_from_u64(self.seed);
        while placed < config.mines {
            let candidate = (
                rng.random_range(0..config.rows),
                rng.random_range(0..config.cols),
            );
            if candidate == self.exclude || mine_mask[candidate.to_nd_index()] {
                continue;
            }
            mine_mask[candidate.to_nd_index()] = true;
            placed += 1;
        }

        log::debug!(
            "placed {} mines on a {}x{} board, protected cell {:?}",
            placed,
            config.rows,
            config.cols,
            self.exclude
        );
        Ok(MineLayout::from_mine_mask(mine_mask))
    }
}
