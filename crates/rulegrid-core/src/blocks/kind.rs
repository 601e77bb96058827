//! The closed block-kind registry.
//!
//! A tagged-variant table rather than open-ended registration: every
//! valid block type name maps to exactly one `BlockKind`, and all static
//! properties (text flag, grammar role, noun linkage, property linkage,
//! default behaviors) are resolved here and nowhere else.

use serde::{Deserialize, Serialize};

use crate::behavior::Behavior;
use crate::error::EngineError;

/// Grammatical role of a text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextRole {
    Noun,
    Verb,
    Property,
}

/// Every concrete block kind the engine knows about.
///
/// Visual kinds occupy physical space and receive behaviors; text kinds
/// carry grammar and form rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    // Visual blocks
    BabaVisual,
    WallVisual,
    RockVisual,
    FlagVisual,
    WaterVisual,
    LavaVisual,
    EmptyVisual,

    // Noun text blocks
    BabaText,
    WallText,
    RockText,
    FlagText,
    WaterText,
    LavaText,
    EmptyText,

    // Verb text block
    IsText,

    // Property text blocks
    YouText,
    PushText,
    StopText,
    WinText,
    SinkText,
    DrownText,
    HotText,
    MeltText,
}

impl BlockKind {
    /// Resolve a type name to a kind. The single factory entry point:
    /// an unknown name is `InvalidBlockKind`, never a silent fallback.
    pub fn from_name(name: &str) -> Result<BlockKind, EngineError> {
        use BlockKind::*;
        match name {
            "BabaVisualBlock" => Ok(BabaVisual),
            "WallVisualBlock" => Ok(WallVisual),
            "RockVisualBlock" => Ok(RockVisual),
            "FlagVisualBlock" => Ok(FlagVisual),
            "WaterVisualBlock" => Ok(WaterVisual),
            "LavaVisualBlock" => Ok(LavaVisual),
            "EmptyVisualBlock" => Ok(EmptyVisual),
            "BabaTextBlock" => Ok(BabaText),
            "WallTextBlock" => Ok(WallText),
            "RockTextBlock" => Ok(RockText),
            "FlagTextBlock" => Ok(FlagText),
            "WaterTextBlock" => Ok(WaterText),
            "LavaTextBlock" => Ok(LavaText),
            "EmptyTextBlock" => Ok(EmptyText),
            "IsTextBlock" => Ok(IsText),
            "YouTextBlock" => Ok(YouText),
            "PushTextBlock" => Ok(PushText),
            "StopTextBlock" => Ok(StopText),
            "WinTextBlock" => Ok(WinText),
            "SinkTextBlock" => Ok(SinkText),
            "DrownTextBlock" => Ok(DrownText),
            "HotTextBlock" => Ok(HotText),
            "MeltTextBlock" => Ok(MeltText),
            other => Err(EngineError::InvalidBlockKind(other.to_string())),
        }
    }

    /// The type name string this kind was registered under.
    pub fn type_name(self) -> &'static str {
        use BlockKind::*;
        match self {
            BabaVisual => "BabaVisualBlock",
            WallVisual => "WallVisualBlock",
            RockVisual => "RockVisualBlock",
            FlagVisual => "FlagVisualBlock",
            WaterVisual => "WaterVisualBlock",
            LavaVisual => "LavaVisualBlock",
            EmptyVisual => "EmptyVisualBlock",
            BabaText => "BabaTextBlock",
            WallText => "WallTextBlock",
            RockText => "RockTextBlock",
            FlagText => "FlagTextBlock",
            WaterText => "WaterTextBlock",
            LavaText => "LavaTextBlock",
            EmptyText => "EmptyTextBlock",
            IsText => "IsTextBlock",
            YouText => "YouTextBlock",
            PushText => "PushTextBlock",
            StopText => "StopTextBlock",
            WinText => "WinTextBlock",
            SinkText => "SinkTextBlock",
            DrownText => "DrownTextBlock",
            HotText => "HotTextBlock",
            MeltText => "MeltTextBlock",
        }
    }

    /// Whether this kind is a text block.
    pub fn is_text(self) -> bool {
        self.text_role().is_some()
    }

    /// Grammar role for text kinds, `None` for visual kinds.
    pub fn text_role(self) -> Option<TextRole> {
        use BlockKind::*;
        match self {
            BabaText | WallText | RockText | FlagText | WaterText | LavaText | EmptyText => {
                Some(TextRole::Noun)
            }
            IsText => Some(TextRole::Verb),
            YouText | PushText | StopText | WinText | SinkText | DrownText | HotText
            | MeltText => Some(TextRole::Property),
            _ => None,
        }
    }

    /// The visual kind a noun text block names, `None` otherwise.
    pub fn noun_subject(self) -> Option<BlockKind> {
        use BlockKind::*;
        match self {
            BabaText => Some(BabaVisual),
            WallText => Some(WallVisual),
            RockText => Some(RockVisual),
            FlagText => Some(FlagVisual),
            WaterText => Some(WaterVisual),
            LavaText => Some(LavaVisual),
            EmptyText => Some(EmptyVisual),
            _ => None,
        }
    }

    /// The behavior a property text block grants, `None` otherwise.
    pub fn property_behavior(self) -> Option<Behavior> {
        use BlockKind::*;
        match self {
            YouText => Some(Behavior::Controllable),
            PushText => Some(Behavior::Pushable),
            StopText => Some(Behavior::Stoppable),
            WinText => Some(Behavior::Winnable),
            SinkText => Some(Behavior::Sinkable),
            DrownText => Some(Behavior::Drownable),
            HotText => Some(Behavior::Hotable),
            MeltText => Some(Behavior::Meltable),
            _ => None,
        }
    }

    /// Static default behaviors of a visual kind, used when a
    /// `NOUN IS NOUN` rule makes the subject behave as the predicate.
    pub fn default_behaviors(self) -> &'static [Behavior] {
        use BlockKind::*;
        match self {
            WallVisual => &[Behavior::Stoppable],
            RockVisual => &[Behavior::Pushable],
            FlagVisual => &[Behavior::Winnable],
            WaterVisual => &[Behavior::Drownable],
            LavaVisual => &[Behavior::Hotable],
            _ => &[],
        }
    }
}
