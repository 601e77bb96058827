//! Behaviors and the annihilation table.
//!
//! A `Behavior` is a named capability a visual block can carry for the
//! duration of one tick. The set is closed: new gameplay verbs mean new
//! variants, not runtime registration. Equality is variant identity, so
//! two `Hotable` values are always interchangeable for matching.
//!
//! Annihilation pairs are data, not code: `AnnihilationTable` maps an
//! unordered pair of behaviors to the side that gets removed, so new
//! pairs can be added without touching the interaction resolver.

use serde::{Deserialize, Serialize};

/// A gameplay capability assigned to a visual block by an active rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Behavior {
    /// Player-movable (`X IS YOU`).
    Controllable,
    /// Displaced by movers and other pushed blocks (`X IS PUSH`).
    Pushable,
    /// Blocks displacement of others (`X IS STOP`).
    Stoppable,
    /// Co-location with a Controllable block wins the level (`X IS WIN`).
    Winnable,
    /// Sinks on contact with a Drownable block (`X IS SINK`).
    Sinkable,
    /// Drowns Sinkable blocks (`X IS DROWN`).
    Drownable,
    /// Melts Meltable blocks (`X IS HOT`).
    Hotable,
    /// Melted by Hotable blocks (`X IS MELT`).
    Meltable,
    /// Replaced by a wall during transform materialization (`X IS WALL`).
    BecomesWall,
    /// Replaced by the empty sentinel during transform materialization
    /// (`X IS EMPTY`).
    BecomesEmpty,
}

/// One annihilation pairing: when `first` and `second` co-occur in a
/// cell on two different blocks, the block holding `removed` loses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnihilationPair {
    pub first: Behavior,
    pub second: Behavior,
    pub removed: Behavior,
}

/// Pair-keyed lookup from unordered behavior pairs to the removed side.
#[derive(Debug, Clone)]
pub struct AnnihilationTable {
    pairs: Vec<AnnihilationPair>,
}

impl AnnihilationTable {
    /// The standard pairings: hot melts melt, drown sinks sink.
    pub fn standard() -> Self {
        Self {
            pairs: vec![
                AnnihilationPair {
                    first: Behavior::Hotable,
                    second: Behavior::Meltable,
                    removed: Behavior::Meltable,
                },
                AnnihilationPair {
                    first: Behavior::Sinkable,
                    second: Behavior::Drownable,
                    removed: Behavior::Sinkable,
                },
            ],
        }
    }

    /// An empty table (nothing annihilates).
    pub fn empty() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Register an additional pairing.
    pub fn add(&mut self, pair: AnnihilationPair) {
        self.pairs.push(pair);
    }

    /// Look up the removed side for two behaviors, symmetric in its
    /// arguments. `None` means the pair does not annihilate.
    pub fn removed_side(&self, a: Behavior, b: Behavior) -> Option<Behavior> {
        self.pairs
            .iter()
            .find(|p| (p.first == a && p.second == b) || (p.first == b && p.second == a))
            .map(|p| p.removed)
    }

    /// Number of registered pairings.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl Default for AnnihilationTable {
    fn default() -> Self {
        Self::standard()
    }
}
