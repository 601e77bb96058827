//! Interaction resolution: annihilating behavior pairs within a cell.
//!
//! Runs after movement. The winner/loser of each pairing comes from the
//! annihilation table, never from scan order; scan order only decides
//! which pair is considered first when a crowded cell offers several.

use crate::behavior::{AnnihilationTable, Behavior};
use crate::error::EngineError;
use crate::grid::{Grid, Position};

/// Resolve annihilations across the whole grid, row-major.
///
/// Within one cell, one block is removed at a time and the remaining
/// blocks are re-evaluated before any further pair resolves, so a
/// three-block pile with overlapping behaviors never loses two blocks
/// on the strength of a single relationship.
pub fn resolve(grid: &mut Grid, table: &AnnihilationTable) -> Result<usize, EngineError> {
    let mut removed_total = 0;
    for pos in grid.positions().collect::<Vec<_>>() {
        removed_total += resolve_cell(grid, pos, table)?;
    }
    if removed_total > 0 {
        log::debug!("interaction resolution removed {} block(s)", removed_total);
    }
    Ok(removed_total)
}

fn resolve_cell(
    grid: &mut Grid,
    pos: Position,
    table: &AnnihilationTable,
) -> Result<usize, EngineError> {
    let mut removed_count = 0;
    loop {
        let loser = {
            let cell = grid.cell_checked(pos)?;
            find_loser(cell.blocks(), table)
        };
        match loser {
            Some(index) => {
                if let Some(cell) = grid.cell_mut(pos) {
                    cell.remove(index);
                    removed_count += 1;
                }
            }
            None => break,
        }
    }
    Ok(removed_count)
}

/// First annihilating pair in deterministic stack order; returns the
/// index of the block designated as the removed side by the table.
fn find_loser(blocks: &[crate::blocks::Block], table: &AnnihilationTable) -> Option<usize> {
    for i in 0..blocks.len() {
        for j in (i + 1)..blocks.len() {
            for &a in blocks[i].behaviors() {
                for &b in blocks[j].behaviors() {
                    if let Some(removed) = table.removed_side(a, b) {
                        return Some(if removed == a { i } else { j });
                    }
                }
            }
        }
    }
    None
}
