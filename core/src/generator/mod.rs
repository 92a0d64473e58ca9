use crate::*;
pub use random::*;

mod random;

/// Builds the mine layout for one game.
pub trait LayoutGenerator {
    fn generate(self, config: GameConfig) -> Result<MineLayout>;
}
