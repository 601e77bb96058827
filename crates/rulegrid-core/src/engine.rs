//! Game engine - owns the grid and runs the tick pipeline.

use crate::behavior::{AnnihilationTable, Behavior};
use crate::error::EngineError;
use crate::grid::{Grid, GridSnapshot, LevelLayout, Position};
use crate::systems::movement::Direction;
use crate::systems::rules::Rule;
use crate::systems::{interaction, movement, rules, transform};

/// Listener notified once per completed tick with the new grid state.
///
/// Observers are called only after the whole tick has committed, so a
/// snapshot never exposes a half-applied input.
pub trait GridObserver {
    fn on_tick(&mut self, snapshot: &GridSnapshot);
}

/// The simulation engine: one grid, one tick pipeline, no I/O.
pub struct GameEngine {
    grid: Grid,
    annihilations: AnnihilationTable,
    observers: Vec<Box<dyn GridObserver>>,
    active_rules: Vec<Rule>,
    ticks: u64,
}

impl GameEngine {
    /// Build an engine from an initial level layout and interpret the
    /// starting rules, so queries are meaningful before the first input.
    ///
    /// Fails with `InvalidBlockKind` for unknown type names in the
    /// layout and `Fault` for dimension mismatches.
    pub fn new(rows: usize, cols: usize, layout: &LevelLayout) -> Result<Self, EngineError> {
        Self::with_annihilations(rows, cols, layout, AnnihilationTable::standard())
    }

    /// Same as [`GameEngine::new`] with a caller-supplied annihilation
    /// table.
    pub fn with_annihilations(
        rows: usize,
        cols: usize,
        layout: &LevelLayout,
        annihilations: AnnihilationTable,
    ) -> Result<Self, EngineError> {
        let mut grid = Grid::from_layout(rows, cols, layout)?;
        let active_rules = rules::interpret(&mut grid)?;
        log::info!(
            "engine constructed: {}x{} grid, {} starting rule(s)",
            rows,
            cols,
            active_rules.len()
        );
        Ok(Self {
            grid,
            annihilations,
            observers: Vec::new(),
            active_rules,
            ticks: 0,
        })
    }

    /// Run one full tick for a directional input:
    /// interpret rules → materialize transforms → resolve movement →
    /// resolve interactions → notify observers.
    ///
    /// Synchronous and atomic from the observers' point of view. On
    /// error the tick's remaining mutation is aborted; completed phases
    /// each leave the grid in a valid state.
    pub fn apply_input(&mut self, direction: Direction) -> Result<(), EngineError> {
        self.active_rules = rules::interpret(&mut self.grid)?;
        transform::materialize(&mut self.grid)?;
        movement::resolve(&mut self.grid, direction)?;
        interaction::resolve(&mut self.grid, &self.annihilations)?;

        self.ticks += 1;
        log::debug!(
            "tick {} complete ({:?}), {} active rule(s)",
            self.ticks,
            direction,
            self.active_rules.len()
        );

        let snapshot = self.grid.snapshot();
        for observer in &mut self.observers {
            observer.on_tick(&snapshot);
        }
        Ok(())
    }

    /// Read-only view of all cells and their block stacks.
    pub fn snapshot(&self) -> GridSnapshot {
        self.grid.snapshot()
    }

    /// Register an observer for per-tick notifications.
    pub fn subscribe(&mut self, observer: Box<dyn GridObserver>) {
        self.observers.push(observer);
    }

    /// The rules derived by the most recent interpretation pass.
    pub fn active_rules(&self) -> &[Rule] {
        &self.active_rules
    }

    /// Completed tick count.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    /// Query surface for external win/lose controllers: positions of
    /// cells holding a block with `behavior`. Pure read.
    pub fn positions_with_behavior(&self, behavior: Behavior) -> Vec<Position> {
        self.grid.positions_with_behavior(behavior)
    }

    /// A Controllable block shares a cell with a Winnable block.
    pub fn is_won(&self) -> bool {
        let winning = self.grid.positions_with_behavior(Behavior::Winnable);
        self.grid
            .positions_with_behavior(Behavior::Controllable)
            .iter()
            .any(|pos| winning.contains(pos))
    }

    /// No Controllable block remains anywhere: the player is stuck.
    pub fn is_stuck(&self) -> bool {
        self.grid
            .positions_with_behavior(Behavior::Controllable)
            .is_empty()
    }

    /// Direct grid access for collaborating crates' read paths.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn layout(rows: usize, cols: usize) -> LevelLayout {
        vec![vec![vec![]; cols]; rows]
    }

    fn put(layout: &mut LevelLayout, row: usize, col: usize, name: &str) {
        layout[row][col].push(name.to_string());
    }

    /// BABA IS YOU across the top, a baba in the middle.
    fn you_level() -> LevelLayout {
        let mut l = layout(4, 4);
        put(&mut l, 0, 0, "BabaTextBlock");
        put(&mut l, 0, 1, "IsTextBlock");
        put(&mut l, 0, 2, "YouTextBlock");
        put(&mut l, 2, 1, "BabaVisualBlock");
        l
    }

    #[test]
    fn construction_interprets_rules() {
        let engine = GameEngine::new(4, 4, &you_level()).unwrap();
        assert_eq!(engine.active_rules().len(), 1);
        assert_eq!(
            engine.positions_with_behavior(Behavior::Controllable),
            vec![Position::new(2, 1)]
        );
    }

    #[test]
    fn tick_moves_the_controllable_block() {
        let mut engine = GameEngine::new(4, 4, &you_level()).unwrap();
        engine.apply_input(Direction::Right).unwrap();
        assert_eq!(
            engine.positions_with_behavior(Behavior::Controllable),
            vec![Position::new(2, 2)]
        );
        assert_eq!(engine.ticks(), 1);
    }

    #[test]
    fn invalid_layout_name_fails_construction() {
        let mut l = you_level();
        put(&mut l, 3, 3, "UnknownBlock");
        assert!(matches!(
            GameEngine::new(4, 4, &l),
            Err(EngineError::InvalidBlockKind(_))
        ));
    }

    struct CountingObserver {
        count: Rc<RefCell<usize>>,
    }

    impl GridObserver for CountingObserver {
        fn on_tick(&mut self, snapshot: &GridSnapshot) {
            assert_eq!(snapshot.rows, 4);
            *self.count.borrow_mut() += 1;
        }
    }

    #[test]
    fn observers_fire_once_per_tick() {
        let mut engine = GameEngine::new(4, 4, &you_level()).unwrap();
        let count = Rc::new(RefCell::new(0));
        engine.subscribe(Box::new(CountingObserver {
            count: Rc::clone(&count),
        }));

        engine.apply_input(Direction::Left).unwrap();
        engine.apply_input(Direction::Down).unwrap();
        assert_eq!(*count.borrow(), 2);
    }

    #[test]
    fn win_query_needs_co_location() {
        let mut l = you_level();
        put(&mut l, 1, 0, "FlagTextBlock");
        put(&mut l, 1, 1, "IsTextBlock");
        put(&mut l, 1, 2, "WinTextBlock");
        put(&mut l, 2, 3, "FlagVisualBlock");
        let mut engine = GameEngine::new(4, 4, &l).unwrap();
        assert!(!engine.is_won());
        assert!(!engine.is_stuck());

        // Walk the baba from (2,1) onto the flag at (2,3).
        engine.apply_input(Direction::Right).unwrap();
        engine.apply_input(Direction::Right).unwrap();
        assert!(engine.is_won());
    }

    #[test]
    fn stuck_without_any_you_rule() {
        let engine = GameEngine::new(2, 2, &layout(2, 2)).unwrap();
        assert!(engine.is_stuck());
    }

    #[test]
    fn noop_tick_preserves_real_blocks() {
        // Baba walled in on all sides it could move.
        let mut l = layout(3, 3);
        put(&mut l, 0, 0, "BabaTextBlock");
        put(&mut l, 0, 1, "IsTextBlock");
        put(&mut l, 0, 2, "YouTextBlock");
        put(&mut l, 1, 0, "WallTextBlock");
        put(&mut l, 1, 1, "IsTextBlock");
        put(&mut l, 1, 2, "StopTextBlock");
        put(&mut l, 2, 0, "BabaVisualBlock");
        put(&mut l, 2, 1, "WallVisualBlock");
        let mut engine = GameEngine::new(3, 3, &l).unwrap();

        let before = engine.snapshot().real_block_names();
        engine.apply_input(Direction::Right).unwrap();
        let after = engine.snapshot().real_block_names();
        assert_eq!(before, after);
        assert_eq!(
            engine.positions_with_behavior(Behavior::Controllable),
            vec![Position::new(2, 0)]
        );
    }
}
