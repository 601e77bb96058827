//! Movement resolution: apply one directional input to every
//! Controllable block, pushing chains and honoring the margin policy.

use serde::{Deserialize, Serialize};

use crate::behavior::Behavior;
use crate::blocks::Block;
use crate::error::EngineError;
use crate::grid::{Grid, Position};

/// A directional input, one per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit (row, col) delta.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

/// Move every Controllable block one cell in `direction`.
///
/// Movers are found by a row-major scan and resolved as one atomic
/// batch for the input, front-to-back along the direction; each mover
/// succeeds or fails independently. Returns the number of movers that
/// actually moved.
pub fn resolve(grid: &mut Grid, direction: Direction) -> Result<usize, EngineError> {
    let delta = direction.delta();

    // One entry per controllable block. The scan completes before any
    // mutation so later movers cannot be scanned twice.
    let mut movers: Vec<Position> = Vec::new();
    for pos in grid.positions() {
        if let Some(cell) = grid.cell(pos) {
            for block in cell.blocks() {
                if block.has_behavior(Behavior::Controllable) {
                    movers.push(pos);
                }
            }
        }
    }

    // Front-to-back along the input direction: a mover ahead vacates
    // its cell before anyone behind it resolves, and every displacement
    // (moves and pushes alike) lands strictly forward, in cells already
    // resolved. A block therefore moves at most once per input, even
    // when it is both Controllable and Pushable. Ties keep row-major
    // scan order; the sort is stable.
    movers.sort_by_key(|pos| {
        std::cmp::Reverse(pos.row as isize * delta.0 + pos.col as isize * delta.1)
    });

    let mut moved = 0;
    for from in movers {
        if attempt_move(grid, from, delta)? {
            moved += 1;
        }
    }
    if moved > 0 {
        log::debug!("movement resolved: {} mover(s) relocated", moved);
    }
    Ok(moved)
}

/// Margin policy, kept as an explicit named check: landing in the
/// outermost ring is allowed only while the margin cell holds no
/// Stoppable blocker. A block already on the margin facing further
/// outward fails the bounds check before this policy is consulted.
fn movable_to_margin(grid: &Grid, margin_cell: Position) -> bool {
    grid.in_bounds(margin_cell.row as isize, margin_cell.col as isize)
        && !grid
            .cell(margin_cell)
            .map(|c| c.has_behavior(Behavior::Stoppable))
            .unwrap_or(true)
}

/// Try to move the first Controllable block in `from` one cell along
/// `delta`, pushing any contiguous pushable chain ahead of it.
fn attempt_move(grid: &mut Grid, from: Position, delta: (isize, isize)) -> Result<bool, EngineError> {
    let dest = match step(grid, from, delta) {
        Some(dest) => dest,
        None => return Ok(false), // edge block facing outward
    };

    if grid.is_margin(dest) && !movable_to_margin(grid, dest) {
        return Ok(false);
    }

    // Walk the pushable chain. Every cell visited must be free of
    // Stoppable blockers, and the cell beyond the last pushable must
    // exist; otherwise the whole move is rejected.
    let mut chain: Vec<Position> = Vec::new();
    let mut cursor = dest;
    loop {
        let cell = grid.cell_checked(cursor)?;
        if cell.has_behavior(Behavior::Stoppable) {
            return Ok(false);
        }
        if cell.has_pushable() {
            chain.push(cursor);
            cursor = match step(grid, cursor, delta) {
                Some(next) => next,
                None => return Ok(false), // chain runs off the grid
            };
        } else {
            break;
        }
    }

    // Relocate the chain from the far end toward the mover so no cell's
    // outgoing blocks are overwritten by incoming ones.
    for &link in chain.iter().rev() {
        let target = step(grid, link, delta).ok_or(EngineError::OutOfBounds {
            row: link.row,
            col: link.col,
        })?;
        let pushed = extract_pushable(grid, link)?;
        for block in pushed {
            match grid.cell_mut(target) {
                Some(cell) => cell.push(block),
                None => {
                    return Err(EngineError::OutOfBounds {
                        row: target.row,
                        col: target.col,
                    })
                }
            }
        }
    }

    // Finally move the initiating block itself.
    let mover_index = grid
        .cell_checked(from)?
        .blocks()
        .iter()
        .position(|b| b.has_behavior(Behavior::Controllable));
    match mover_index {
        Some(index) => {
            grid.relocate_block(from, index, dest)?;
            Ok(true)
        }
        // No Controllable block left in the cell; nothing to move.
        None => Ok(false),
    }
}

/// Next cell along `delta`, or `None` when it would leave the grid.
fn step(grid: &Grid, pos: Position, delta: (isize, isize)) -> Option<Position> {
    let next = pos.offset(delta)?;
    if grid.in_bounds(next.row as isize, next.col as isize) {
        Some(next)
    } else {
        None
    }
}

/// Remove every pushable block from the cell, preserving stack order.
/// The cell repopulates its sentinel if everything leaves.
fn extract_pushable(grid: &mut Grid, pos: Position) -> Result<Vec<Block>, EngineError> {
    let cell = grid.cell_mut(pos).ok_or(EngineError::OutOfBounds {
        row: pos.row,
        col: pos.col,
    })?;
    let mut pushed = Vec::new();
    let mut index = 0;
    while index < cell.len() {
        if cell.blocks()[index].is_pushable() {
            pushed.push(cell.remove(index));
        } else {
            index += 1;
        }
    }
    Ok(pushed)
}
