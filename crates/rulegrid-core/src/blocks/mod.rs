//! Blocks: immutable kind identity plus a per-tick behavior set.

pub mod kind;

pub use kind::{BlockKind, TextRole};

use serde::{Deserialize, Serialize};

use crate::behavior::Behavior;
use crate::error::EngineError;

/// One block on the grid.
///
/// The kind never changes for the lifetime of the block (transforms
/// replace the block rather than mutate it). The behavior set is rebuilt
/// from scratch by rule interpretation every tick; an empty set is a
/// valid state meaning no active rule applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    kind: BlockKind,
    behaviors: Vec<Behavior>,
}

impl Block {
    /// Create a block of a known kind with no behaviors.
    pub fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            behaviors: Vec::new(),
        }
    }

    /// Factory contract: create a block from a type name, failing with
    /// `InvalidBlockKind` for names outside the registry.
    pub fn from_name(name: &str) -> Result<Self, EngineError> {
        Ok(Self::new(BlockKind::from_name(name)?))
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    pub fn is_text(&self) -> bool {
        self.kind.is_text()
    }

    /// Whether this is the sentinel that keeps vacated cells non-empty.
    pub fn is_empty_sentinel(&self) -> bool {
        self.kind == BlockKind::EmptyVisual
    }

    /// Active behaviors, in assignment order.
    pub fn behaviors(&self) -> &[Behavior] {
        &self.behaviors
    }

    pub fn has_behavior(&self, behavior: Behavior) -> bool {
        self.behaviors.contains(&behavior)
    }

    /// Assign a behavior for this tick. Duplicate assignment is a no-op,
    /// so overlapping rules cannot double-register a capability.
    pub fn add_behavior(&mut self, behavior: Behavior) {
        if !self.behaviors.contains(&behavior) {
            self.behaviors.push(behavior);
        }
    }

    /// Reset-phase hook: drop every behavior from the previous tick.
    pub fn clear_behaviors(&mut self) {
        self.behaviors.clear();
    }

    /// Text blocks can always be shoved around so rules can be formed
    /// and broken by play; visual blocks need an active PUSH rule.
    pub fn is_pushable(&self) -> bool {
        self.is_text() || self.has_behavior(Behavior::Pushable)
    }
}
