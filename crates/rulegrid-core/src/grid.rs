//! Grid state: cells of ordered block stacks.
//!
//! The grid owns every block. Dimensions are fixed at construction
//! (resizing means building a new grid), `in_bounds` is the single
//! source of truth for boundary checks, and a cell is never empty: a
//! vacated cell is repopulated with the `EmptyVisualBlock` sentinel.

use serde::{Deserialize, Serialize};

use crate::behavior::Behavior;
use crate::blocks::{Block, BlockKind};
use crate::error::EngineError;

/// A grid coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Apply a signed delta. `None` if the result would be negative;
    /// the upper bound is the grid's to check.
    pub fn offset(self, delta: (isize, isize)) -> Option<Position> {
        let row = self.row as isize + delta.0;
        let col = self.col as isize + delta.1;
        if row < 0 || col < 0 {
            None
        } else {
            Some(Position::new(row as usize, col as usize))
        }
    }
}

/// One grid coordinate's ordered stack of blocks.
///
/// Order is insertion order. Renderer-facing empty-first ordering is
/// applied only when taking a snapshot, never to the live stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    blocks: Vec<Block>,
}

impl Cell {
    /// A cell holding only the sentinel.
    pub fn empty() -> Self {
        Self {
            blocks: vec![Block::new(BlockKind::EmptyVisual)],
        }
    }

    fn from_blocks(blocks: Vec<Block>) -> Self {
        if blocks.is_empty() {
            Self::empty()
        } else {
            Self { blocks }
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn blocks_mut(&mut self) -> &mut [Block] {
        &mut self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Whether any block in the stack carries the behavior.
    pub fn has_behavior(&self, behavior: Behavior) -> bool {
        self.blocks.iter().any(|b| b.has_behavior(behavior))
    }

    /// Whether any block in the stack can be pushed.
    pub fn has_pushable(&self) -> bool {
        self.blocks.iter().any(|b| b.is_pushable())
    }

    /// Append a block to the top of the stack.
    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Remove the block at `index`, repopulating with the sentinel if
    /// the stack would otherwise be empty.
    pub fn remove(&mut self, index: usize) -> Block {
        let block = self.blocks.remove(index);
        if self.blocks.is_empty() {
            self.blocks.push(Block::new(BlockKind::EmptyVisual));
        }
        block
    }

    /// Replace the block at `index` in place.
    pub fn replace(&mut self, index: usize, block: Block) -> Block {
        std::mem::replace(&mut self.blocks[index], block)
    }
}

/// Level layout: `[row][col][stack] -> block type name`.
pub type LevelLayout = Vec<Vec<Vec<String>>>;

/// The 2-D playing field.
#[derive(Debug, Clone)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Vec<Cell>>,
}

impl Grid {
    /// Build a grid from an initial layout.
    ///
    /// Fails with `InvalidBlockKind` for unknown type names and `Fault`
    /// if the layout does not match the declared dimensions. An empty
    /// stack in the layout becomes a sentinel-only cell.
    pub fn from_layout(rows: usize, cols: usize, layout: &LevelLayout) -> Result<Grid, EngineError> {
        if rows == 0 || cols == 0 {
            return Err(EngineError::Fault(format!(
                "grid dimensions must be positive, got {}x{}",
                rows, cols
            )));
        }
        if layout.len() != rows {
            return Err(EngineError::Fault(format!(
                "layout has {} rows, expected {}",
                layout.len(),
                rows
            )));
        }

        let mut cells = Vec::with_capacity(rows);
        for (r, layout_row) in layout.iter().enumerate() {
            if layout_row.len() != cols {
                return Err(EngineError::Fault(format!(
                    "layout row {} has {} columns, expected {}",
                    r,
                    layout_row.len(),
                    cols
                )));
            }
            let mut row = Vec::with_capacity(cols);
            for stack in layout_row {
                let mut blocks = Vec::with_capacity(stack.len().max(1));
                for name in stack {
                    blocks.push(Block::from_name(name)?);
                }
                row.push(Cell::from_blocks(blocks));
            }
            cells.push(row);
        }

        Ok(Grid { rows, cols, cells })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The single source of truth for boundary checks.
    pub fn in_bounds(&self, row: isize, col: isize) -> bool {
        row >= 0 && (row as usize) < self.rows && col >= 0 && (col as usize) < self.cols
    }

    /// Whether the coordinate lies on the outermost ring of cells.
    pub fn is_margin(&self, pos: Position) -> bool {
        pos.row == 0 || pos.col == 0 || pos.row == self.rows - 1 || pos.col == self.cols - 1
    }

    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        self.cells.get(pos.row)?.get(pos.col)
    }

    pub fn cell_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        self.cells.get_mut(pos.row)?.get_mut(pos.col)
    }

    /// Checked cell access for paths that should already have validated
    /// their coordinates; failure here is a programming-error fault.
    pub fn cell_checked(&self, pos: Position) -> Result<&Cell, EngineError> {
        self.cell(pos).ok_or(EngineError::OutOfBounds {
            row: pos.row,
            col: pos.col,
        })
    }

    /// Row-major iteration over all coordinates.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let cols = self.cols;
        (0..self.rows).flat_map(move |r| (0..cols).map(move |c| Position::new(r, c)))
    }

    /// Move the block at `from[index]` onto the top of `to`'s stack.
    /// The vacated cell is repopulated with the sentinel if needed.
    pub fn relocate_block(
        &mut self,
        from: Position,
        index: usize,
        to: Position,
    ) -> Result<(), EngineError> {
        if !self.in_bounds(from.row as isize, from.col as isize) {
            return Err(EngineError::OutOfBounds {
                row: from.row,
                col: from.col,
            });
        }
        if !self.in_bounds(to.row as isize, to.col as isize) {
            return Err(EngineError::OutOfBounds {
                row: to.row,
                col: to.col,
            });
        }
        if index >= self.cells[from.row][from.col].len() {
            return Err(EngineError::Fault(format!(
                "no block at stack index {} in cell ({}, {})",
                index, from.row, from.col
            )));
        }

        let block = self.cells[from.row][from.col].remove(index);
        self.cells[to.row][to.col].push(block);
        Ok(())
    }

    /// Positions of every cell containing a block with the behavior,
    /// in row-major order. Pure read, used by win/lose detection.
    pub fn positions_with_behavior(&self, behavior: Behavior) -> Vec<Position> {
        self.positions()
            .filter(|&pos| self.cells[pos.row][pos.col].has_behavior(behavior))
            .collect()
    }

    /// Defensive structural check: every row must hold exactly `cols`
    /// cells and every cell at least one block.
    pub fn validate_structure(&self) -> Result<(), EngineError> {
        if self.cells.len() != self.rows {
            return Err(EngineError::Fault(format!(
                "grid has {} rows, declared {}",
                self.cells.len(),
                self.rows
            )));
        }
        for (r, row) in self.cells.iter().enumerate() {
            if row.len() != self.cols {
                return Err(EngineError::Fault(format!(
                    "row {} has {} cells, declared {}",
                    r,
                    row.len(),
                    self.cols
                )));
            }
            for (c, cell) in row.iter().enumerate() {
                if cell.is_empty() {
                    return Err(EngineError::Fault(format!(
                        "cell ({}, {}) has no blocks, not even the sentinel",
                        r, c
                    )));
                }
            }
        }
        Ok(())
    }

    /// Read-only view of the whole grid for renderers and observers.
    pub fn snapshot(&self) -> GridSnapshot {
        let cells = self
            .cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| {
                        let mut views: Vec<BlockView> =
                            cell.blocks().iter().map(BlockView::from).collect();
                        // Presentation ordering only: sentinels first so
                        // renderers paint them underneath. Stable, so the
                        // relative order of real blocks is preserved.
                        views.sort_by_key(|v| !v.is_empty_sentinel);
                        views
                    })
                    .collect()
            })
            .collect();
        GridSnapshot {
            rows: self.rows,
            cols: self.cols,
            cells,
        }
    }
}

/// One block as seen through a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockView {
    pub type_name: String,
    pub is_text: bool,
    pub is_empty_sentinel: bool,
    pub behaviors: Vec<Behavior>,
}

impl From<&Block> for BlockView {
    fn from(block: &Block) -> Self {
        Self {
            type_name: block.type_name().to_string(),
            is_text: block.is_text(),
            is_empty_sentinel: block.is_empty_sentinel(),
            behaviors: block.behaviors().to_vec(),
        }
    }
}

/// Immutable view of all cells and their block stacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub rows: usize,
    pub cols: usize,
    pub cells: Vec<Vec<Vec<BlockView>>>,
}

impl GridSnapshot {
    pub fn cell(&self, row: usize, col: usize) -> &[BlockView] {
        &self.cells[row][col]
    }

    /// Names of every non-sentinel block, sorted. Handy for comparing
    /// grid contents while ignoring sentinel churn.
    pub fn real_block_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .cells
            .iter()
            .flatten()
            .flatten()
            .filter(|v| !v.is_empty_sentinel)
            .map(|v| v.type_name.clone())
            .collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_layout(rows: usize, cols: usize) -> LevelLayout {
        vec![vec![vec!["EmptyVisualBlock".to_string()]; cols]; rows]
    }

    #[test]
    fn builds_from_layout() {
        let mut layout = empty_layout(3, 4);
        layout[1][2] = vec!["BabaVisualBlock".to_string(), "RockVisualBlock".to_string()];

        let grid = Grid::from_layout(3, 4, &layout).unwrap();
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.cols(), 4);
        assert_eq!(grid.cell(Position::new(1, 2)).unwrap().len(), 2);
        grid.validate_structure().unwrap();
    }

    #[test]
    fn empty_stack_becomes_sentinel_cell() {
        let mut layout = empty_layout(2, 2);
        layout[0][0] = vec![];

        let grid = Grid::from_layout(2, 2, &layout).unwrap();
        let cell = grid.cell(Position::new(0, 0)).unwrap();
        assert_eq!(cell.len(), 1);
        assert!(cell.blocks()[0].is_empty_sentinel());
    }

    #[test]
    fn dimension_mismatch_is_a_fault() {
        let layout = empty_layout(2, 2);
        assert!(matches!(
            Grid::from_layout(3, 2, &layout),
            Err(EngineError::Fault(_))
        ));

        let mut ragged = empty_layout(2, 2);
        ragged[1].pop();
        assert!(matches!(
            Grid::from_layout(2, 2, &ragged),
            Err(EngineError::Fault(_))
        ));
    }

    #[test]
    fn unknown_block_name_fails_construction() {
        let mut layout = empty_layout(2, 2);
        layout[0][1] = vec!["MysteryBlock".to_string()];
        assert!(matches!(
            Grid::from_layout(2, 2, &layout),
            Err(EngineError::InvalidBlockKind(_))
        ));
    }

    #[test]
    fn bounds_and_margin() {
        let grid = Grid::from_layout(3, 3, &empty_layout(3, 3)).unwrap();
        assert!(grid.in_bounds(0, 0));
        assert!(grid.in_bounds(2, 2));
        assert!(!grid.in_bounds(-1, 0));
        assert!(!grid.in_bounds(0, 3));

        assert!(grid.is_margin(Position::new(0, 1)));
        assert!(grid.is_margin(Position::new(2, 2)));
        assert!(!grid.is_margin(Position::new(1, 1)));
    }

    #[test]
    fn relocation_repopulates_sentinel() {
        let mut layout = empty_layout(1, 3);
        layout[0][0] = vec!["RockVisualBlock".to_string()];
        let mut grid = Grid::from_layout(1, 3, &layout).unwrap();

        grid.relocate_block(Position::new(0, 0), 0, Position::new(0, 1))
            .unwrap();

        let vacated = grid.cell(Position::new(0, 0)).unwrap();
        assert_eq!(vacated.len(), 1);
        assert!(vacated.blocks()[0].is_empty_sentinel());

        let dest = grid.cell(Position::new(0, 1)).unwrap();
        assert_eq!(dest.blocks().last().unwrap().kind(), BlockKind::RockVisual);
    }

    #[test]
    fn relocation_out_of_bounds_is_rejected() {
        let mut grid = Grid::from_layout(2, 2, &empty_layout(2, 2)).unwrap();
        assert!(matches!(
            grid.relocate_block(Position::new(0, 0), 0, Position::new(5, 0)),
            Err(EngineError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn snapshot_sorts_sentinels_first_without_touching_the_grid() {
        let mut layout = empty_layout(1, 1);
        layout[0][0] = vec![
            "BabaVisualBlock".to_string(),
            "EmptyVisualBlock".to_string(),
        ];
        let grid = Grid::from_layout(1, 1, &layout).unwrap();

        let snap = grid.snapshot();
        assert!(snap.cell(0, 0)[0].is_empty_sentinel);
        assert_eq!(snap.cell(0, 0)[1].type_name, "BabaVisualBlock");

        // Live stack keeps insertion order.
        let cell = grid.cell(Position::new(0, 0)).unwrap();
        assert_eq!(cell.blocks()[0].kind(), BlockKind::BabaVisual);
    }
}
