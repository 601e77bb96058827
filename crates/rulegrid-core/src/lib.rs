//! RuleGrid Core - rule-derivation puzzle engine.
//!
//! Simulates a grid world where the gameplay rules are not hard-coded
//! but derived every tick from the spatial arrangement of word blocks:
//! a noun text block, the IS verb, and a property or noun text block in
//! a row or column activate a rule (`BABA IS YOU`), and every visual
//! block's capabilities are rebuilt from the active rule set.
//!
//! The engine is single-threaded and turn-based: one directional input
//! runs exactly one tick (interpret rules → materialize transforms →
//! resolve movement → resolve interactions → notify observers) to
//! completion. Rendering, authoring and persistence are external
//! collaborators that construct the engine, feed it inputs and read
//! snapshots.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`behavior`] | Closed behavior set and the annihilation pair table |
//! | [`blocks`] | Block identity and the closed block-kind registry |
//! | [`grid`] | Cells, bounds, relocation, snapshots |
//! | [`systems`] | Rule interpretation, transforms, movement, interaction |
//! | [`engine`] | Tick orchestration, observer port, win/lose queries |
//! | [`error`] | Engine error types |
//!
//! # Example
//!
//! ```rust
//! use rulegrid_core::prelude::*;
//!
//! // 1x4 level: BABA IS YOU, with a baba to steer.
//! let layout: LevelLayout = vec![vec![
//!     vec!["BabaTextBlock".into()],
//!     vec!["IsTextBlock".into()],
//!     vec!["YouTextBlock".into()],
//!     vec!["BabaVisualBlock".into()],
//! ]];
//!
//! let mut engine = GameEngine::new(1, 4, &layout).unwrap();
//! engine.apply_input(Direction::Left).unwrap();
//! assert_eq!(engine.positions_with_behavior(Behavior::Controllable).len(), 1);
//! ```

pub mod behavior;
pub mod blocks;
pub mod engine;
pub mod error;
pub mod grid;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::behavior::{AnnihilationTable, Behavior};
    pub use crate::blocks::{Block, BlockKind, TextRole};
    pub use crate::engine::{GameEngine, GridObserver};
    pub use crate::error::EngineError;
    pub use crate::grid::{Grid, GridSnapshot, LevelLayout, Position};
    pub use crate::systems::movement::Direction;
    pub use crate::systems::rules::{Predicate, Rule};
}
