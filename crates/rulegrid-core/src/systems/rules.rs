//! Rule interpretation: scan the text-block layer for `NOUN IS X`
//! triples, then reset and reassign every visual block's behaviors.
//!
//! Rules are transient. They are recomputed from scratch on every
//! interpretation pass and never persisted, so displacing a single text
//! block is enough to retire a rule on the next tick.

use crate::behavior::Behavior;
use crate::blocks::{BlockKind, TextRole};
use crate::error::EngineError;
use crate::grid::{Grid, Position};

/// The right-hand side of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    /// `NOUN IS PROPERTY`: grants a behavior.
    Property(Behavior),
    /// `NOUN IS NOUN`: the subject behaves as (or becomes) the predicate.
    Noun(BlockKind),
}

/// An active rule: `subject IS predicate`. The subject is stored as the
/// visual kind the noun text names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub subject: BlockKind,
    pub predicate: Predicate,
}

/// Derive the active rule set, clear all behaviors, and apply the rules.
///
/// Returns the rules in the deterministic order they were found (row
/// scan before column scan, row-major within each). Malformed triples
/// are non-matches, not errors; only structural grid corruption fails.
pub fn interpret(grid: &mut Grid) -> Result<Vec<Rule>, EngineError> {
    grid.validate_structure()?;

    let rules = derive_rules(grid);
    log::debug!("rule interpretation derived {} active rule(s)", rules.len());

    reset_behaviors(grid);
    for rule in &rules {
        apply_rule(grid, rule);
    }
    Ok(rules)
}

/// Scan rows then columns for adjacent `(i, i+1, i+2)` cell triples
/// forming a grammatical sequence. Multi-stacked cells are searched
/// exhaustively, so one cell can contribute to several rules.
pub fn derive_rules(grid: &Grid) -> Vec<Rule> {
    let mut rules = Vec::new();

    for row in 0..grid.rows() {
        for col in 0..grid.cols().saturating_sub(2) {
            collect_triples(
                grid,
                Position::new(row, col),
                Position::new(row, col + 1),
                Position::new(row, col + 2),
                &mut rules,
            );
        }
    }
    for col in 0..grid.cols() {
        for row in 0..grid.rows().saturating_sub(2) {
            collect_triples(
                grid,
                Position::new(row, col),
                Position::new(row + 1, col),
                Position::new(row + 2, col),
                &mut rules,
            );
        }
    }

    rules
}

fn collect_triples(grid: &Grid, first: Position, second: Position, third: Position, out: &mut Vec<Rule>) {
    let first = match grid.cell(first) {
        Some(cell) => cell,
        None => return,
    };
    let second = match grid.cell(second) {
        Some(cell) => cell,
        None => return,
    };
    let third = match grid.cell(third) {
        Some(cell) => cell,
        None => return,
    };

    if !second.blocks().iter().any(|b| b.kind() == BlockKind::IsText) {
        return;
    }

    for noun in first.blocks() {
        let subject = match noun.kind().noun_subject() {
            Some(subject) => subject,
            None => continue,
        };
        for predicate_block in third.blocks() {
            let kind = predicate_block.kind();
            match kind.text_role() {
                Some(TextRole::Property) => {
                    if let Some(behavior) = kind.property_behavior() {
                        out.push(Rule {
                            subject,
                            predicate: Predicate::Property(behavior),
                        });
                    }
                }
                Some(TextRole::Noun) => {
                    if let Some(target) = kind.noun_subject() {
                        out.push(Rule {
                            subject,
                            predicate: Predicate::Noun(target),
                        });
                    }
                }
                _ => {}
            }
        }
    }
}

/// Reset phase: no behavior survives from the previous tick, so a block
/// whose supporting text moved away ends up with an empty set.
fn reset_behaviors(grid: &mut Grid) {
    for pos in grid.positions().collect::<Vec<_>>() {
        if let Some(cell) = grid.cell_mut(pos) {
            for block in cell.blocks_mut() {
                if !block.is_text() {
                    block.clear_behaviors();
                }
            }
        }
    }
}

/// Apply phase for one rule, in the stable order `derive_rules` found
/// them. PROPERTY rules grant the behavior; NOUN rules tag wall/empty
/// transforms or make the subject adopt the predicate's static defaults.
fn apply_rule(grid: &mut Grid, rule: &Rule) {
    for pos in grid.positions().collect::<Vec<_>>() {
        if let Some(cell) = grid.cell_mut(pos) {
            for block in cell.blocks_mut() {
                if block.is_text() || block.kind() != rule.subject {
                    continue;
                }
                match rule.predicate {
                    Predicate::Property(behavior) => block.add_behavior(behavior),
                    Predicate::Noun(BlockKind::WallVisual) => {
                        block.add_behavior(Behavior::BecomesWall)
                    }
                    Predicate::Noun(BlockKind::EmptyVisual) => {
                        block.add_behavior(Behavior::BecomesEmpty)
                    }
                    Predicate::Noun(target) => {
                        for &behavior in target.default_behaviors() {
                            block.add_behavior(behavior);
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::LevelLayout;

    fn layout(rows: usize, cols: usize) -> LevelLayout {
        vec![vec![vec![]; cols]; rows]
    }

    fn put(layout: &mut LevelLayout, row: usize, col: usize, name: &str) {
        layout[row][col].push(name.to_string());
    }

    #[test]
    fn horizontal_triple_forms_a_rule() {
        let mut l = layout(1, 4);
        put(&mut l, 0, 0, "BabaTextBlock");
        put(&mut l, 0, 1, "IsTextBlock");
        put(&mut l, 0, 2, "YouTextBlock");
        put(&mut l, 0, 3, "BabaVisualBlock");
        let mut grid = Grid::from_layout(1, 4, &l).unwrap();

        let rules = interpret(&mut grid).unwrap();
        assert_eq!(
            rules,
            vec![Rule {
                subject: BlockKind::BabaVisual,
                predicate: Predicate::Property(Behavior::Controllable),
            }]
        );

        let baba = &grid.cell(Position::new(0, 3)).unwrap().blocks()[0];
        assert!(baba.has_behavior(Behavior::Controllable));
    }

    #[test]
    fn vertical_triple_forms_a_rule() {
        let mut l = layout(4, 1);
        put(&mut l, 0, 0, "WallTextBlock");
        put(&mut l, 1, 0, "IsTextBlock");
        put(&mut l, 2, 0, "StopTextBlock");
        put(&mut l, 3, 0, "WallVisualBlock");
        let mut grid = Grid::from_layout(4, 1, &l).unwrap();

        interpret(&mut grid).unwrap();
        let wall = &grid.cell(Position::new(3, 0)).unwrap().blocks()[0];
        assert!(wall.has_behavior(Behavior::Stoppable));
    }

    #[test]
    fn malformed_triple_is_not_a_rule() {
        // Two nouns with no verb between them.
        let mut l = layout(1, 4);
        put(&mut l, 0, 0, "BabaTextBlock");
        put(&mut l, 0, 1, "WallTextBlock");
        put(&mut l, 0, 2, "YouTextBlock");
        put(&mut l, 0, 3, "BabaVisualBlock");
        let mut grid = Grid::from_layout(1, 4, &l).unwrap();

        let rules = interpret(&mut grid).unwrap();
        assert!(rules.is_empty());
        let baba = &grid.cell(Position::new(0, 3)).unwrap().blocks()[0];
        assert!(baba.behaviors().is_empty());
    }

    #[test]
    fn reset_clears_stale_behaviors() {
        let mut l = layout(1, 4);
        put(&mut l, 0, 0, "BabaTextBlock");
        put(&mut l, 0, 1, "IsTextBlock");
        put(&mut l, 0, 2, "YouTextBlock");
        put(&mut l, 0, 3, "BabaVisualBlock");
        let mut grid = Grid::from_layout(1, 4, &l).unwrap();

        interpret(&mut grid).unwrap();
        assert!(grid.cell(Position::new(0, 3)).unwrap().blocks()[0]
            .has_behavior(Behavior::Controllable));

        // Displace the verb; the triple no longer parses.
        grid.relocate_block(Position::new(0, 1), 0, Position::new(0, 0))
            .unwrap();
        interpret(&mut grid).unwrap();

        let baba = &grid.cell(Position::new(0, 3)).unwrap().blocks()[0];
        assert!(baba.behaviors().is_empty());
    }

    #[test]
    fn stacked_text_is_searched_exhaustively() {
        // Two nouns stacked in the subject cell, one predicate.
        let mut l = layout(1, 4);
        put(&mut l, 0, 0, "BabaTextBlock");
        put(&mut l, 0, 0, "RockTextBlock");
        put(&mut l, 0, 1, "IsTextBlock");
        put(&mut l, 0, 2, "PushTextBlock");
        put(&mut l, 0, 3, "RockVisualBlock");
        let mut grid = Grid::from_layout(1, 4, &l).unwrap();

        let rules = interpret(&mut grid).unwrap();
        assert_eq!(rules.len(), 2);
        assert!(grid.cell(Position::new(0, 3)).unwrap().blocks()[0]
            .has_behavior(Behavior::Pushable));
    }

    #[test]
    fn noun_rule_adopts_predicate_defaults() {
        let mut l = layout(1, 4);
        put(&mut l, 0, 0, "BabaTextBlock");
        put(&mut l, 0, 1, "IsTextBlock");
        put(&mut l, 0, 2, "FlagTextBlock");
        put(&mut l, 0, 3, "BabaVisualBlock");
        let mut grid = Grid::from_layout(1, 4, &l).unwrap();

        interpret(&mut grid).unwrap();
        let baba = &grid.cell(Position::new(0, 3)).unwrap().blocks()[0];
        assert!(baba.has_behavior(Behavior::Winnable));
    }

    #[test]
    fn wall_and_empty_predicates_tag_transforms() {
        let mut l = layout(2, 4);
        put(&mut l, 0, 0, "BabaTextBlock");
        put(&mut l, 0, 1, "IsTextBlock");
        put(&mut l, 0, 2, "WallTextBlock");
        put(&mut l, 0, 3, "BabaVisualBlock");
        put(&mut l, 1, 0, "RockTextBlock");
        put(&mut l, 1, 1, "IsTextBlock");
        put(&mut l, 1, 2, "EmptyTextBlock");
        put(&mut l, 1, 3, "RockVisualBlock");
        let mut grid = Grid::from_layout(2, 4, &l).unwrap();

        interpret(&mut grid).unwrap();
        assert!(grid.cell(Position::new(0, 3)).unwrap().blocks()[0]
            .has_behavior(Behavior::BecomesWall));
        assert!(grid.cell(Position::new(1, 3)).unwrap().blocks()[0]
            .has_behavior(Behavior::BecomesEmpty));
    }

    #[test]
    fn derivation_is_deterministic() {
        let mut l = layout(3, 3);
        put(&mut l, 0, 0, "BabaTextBlock");
        put(&mut l, 0, 1, "IsTextBlock");
        put(&mut l, 0, 2, "YouTextBlock");
        put(&mut l, 1, 0, "IsTextBlock");
        put(&mut l, 2, 0, "WinTextBlock");
        let mut grid = Grid::from_layout(3, 3, &l).unwrap();

        let first = interpret(&mut grid).unwrap();
        let second = interpret(&mut grid).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2); // horizontal BABA IS YOU, vertical BABA IS WIN
    }
}
