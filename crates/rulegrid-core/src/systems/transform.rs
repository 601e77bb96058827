//! Transform materialization: `BecomesWall` / `BecomesEmpty` carriers
//! are replaced in place by freshly-built wall or sentinel blocks.
//!
//! Replacements are constructed through the factory before any cell is
//! touched, so a factory failure leaves the grid exactly as it was.

use crate::behavior::Behavior;
use crate::blocks::Block;
use crate::error::EngineError;
use crate::grid::{Grid, Position};

/// Replace every transform-tagged block. Returns the number replaced.
pub fn materialize(grid: &mut Grid) -> Result<usize, EngineError> {
    // Stage phase: decide every replacement first.
    let mut staged: Vec<(Position, usize, Block)> = Vec::new();
    for pos in grid.positions() {
        let cell = grid.cell_checked(pos)?;
        for (index, block) in cell.blocks().iter().enumerate() {
            let target_name = if block.has_behavior(Behavior::BecomesWall) {
                "WallVisualBlock"
            } else if block.has_behavior(Behavior::BecomesEmpty) {
                "EmptyVisualBlock"
            } else {
                continue;
            };
            staged.push((pos, index, Block::from_name(target_name)?));
        }
    }

    // Commit phase: in-place replacement keeps every stack index valid.
    let replaced = staged.len();
    for (pos, index, replacement) in staged {
        if let Some(cell) = grid.cell_mut(pos) {
            cell.replace(index, replacement);
        }
    }
    if replaced > 0 {
        log::debug!("transform materialization replaced {} block(s)", replaced);
    }
    Ok(replaced)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::BlockKind;
    use crate::grid::LevelLayout;

    fn grid_with(names: &[&str]) -> Grid {
        let layout: LevelLayout = vec![vec![names.iter().map(|n| n.to_string()).collect()]];
        Grid::from_layout(1, 1, &layout).unwrap()
    }

    #[test]
    fn becomes_wall_is_materialized() {
        let mut grid = grid_with(&["BabaVisualBlock"]);
        grid.cell_mut(Position::new(0, 0)).unwrap().blocks_mut()[0]
            .add_behavior(Behavior::BecomesWall);

        let replaced = materialize(&mut grid).unwrap();
        assert_eq!(replaced, 1);

        let block = &grid.cell(Position::new(0, 0)).unwrap().blocks()[0];
        assert_eq!(block.kind(), BlockKind::WallVisual);
        assert!(block.behaviors().is_empty());
    }

    #[test]
    fn becomes_empty_is_materialized() {
        let mut grid = grid_with(&["RockVisualBlock"]);
        grid.cell_mut(Position::new(0, 0)).unwrap().blocks_mut()[0]
            .add_behavior(Behavior::BecomesEmpty);

        materialize(&mut grid).unwrap();
        assert!(grid.cell(Position::new(0, 0)).unwrap().blocks()[0].is_empty_sentinel());
    }

    #[test]
    fn untagged_blocks_are_untouched() {
        let mut grid = grid_with(&["RockVisualBlock", "BabaVisualBlock"]);
        let replaced = materialize(&mut grid).unwrap();
        assert_eq!(replaced, 0);

        let kinds: Vec<BlockKind> = grid
            .cell(Position::new(0, 0))
            .unwrap()
            .blocks()
            .iter()
            .map(|b| b.kind())
            .collect();
        assert_eq!(kinds, vec![BlockKind::RockVisual, BlockKind::BabaVisual]);
    }

    #[test]
    fn wall_takes_precedence_over_empty_on_one_block() {
        // A block tagged by both X IS WALL and X IS EMPTY becomes a wall;
        // the wall check runs first and the outcome must not depend on
        // the order the tags were assigned.
        let mut grid = grid_with(&["BabaVisualBlock"]);
        {
            let block = &mut grid.cell_mut(Position::new(0, 0)).unwrap().blocks_mut()[0];
            block.add_behavior(Behavior::BecomesWall);
            block.add_behavior(Behavior::BecomesEmpty);
        }

        materialize(&mut grid).unwrap();
        assert_eq!(
            grid.cell(Position::new(0, 0)).unwrap().blocks()[0].kind(),
            BlockKind::WallVisual
        );
    }
}
