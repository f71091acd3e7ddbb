//! The timed interaction at a site.
//!
//! Arrival starts an [`InteractionTimer`].  The task advances it once per
//! tick and applies whatever [`InteractionSignal`] comes back:
//!
//! | Elapsed tick         | Signal  | Caller does                                        |
//! |----------------------|---------|----------------------------------------------------|
//! | [`BEGIN_TICK`] (1)   | `Begin` | open container, mark it held open, show progress   |
//! | [`CUE_TICK`] (9)     | `Cue`   | play the outcome's cue, if it has one               |
//! | [`INTERACTION_TICKS`] (60) | `End` | transfer items, close, clear the held-open mark |
//!
//! The offsets are protocol constants.  Nothing is signalled after `End`.

use hl_core::{CueId, DisplayState};

use crate::{TaskError, TaskResult};

pub const BEGIN_TICK: u32 = 1;
pub const CUE_TICK: u32 = 9;
/// Total length of one interaction; also the tick of the `End` signal.
pub const INTERACTION_TICKS: u32 = 60;

// ── Outcomes ──────────────────────────────────────────────────────────────────

/// What an interaction achieved.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum InteractionOutcome {
    PickedUpItem,
    PickedUpNothing,
    PlacedItem,
    PlacedNothing,
}

impl InteractionOutcome {
    /// `true` for the two "nothing happened" outcomes.
    #[inline]
    pub fn is_empty_handed(self) -> bool {
        matches!(self, Self::PickedUpNothing | Self::PlacedNothing)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::PickedUpItem => "picked_up_item",
            Self::PickedUpNothing => "picked_up_nothing",
            Self::PlacedItem => "placed_item",
            Self::PlacedNothing => "placed_nothing",
        }
    }
}

/// Display state and optional cue applied for one outcome.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutcomeEffects {
    pub display: DisplayState,
    #[cfg_attr(feature = "serde", serde(default))]
    pub cue:     Option<CueId>,
}

impl OutcomeEffects {
    pub const fn new(display: DisplayState, cue: Option<CueId>) -> Self {
        Self { display, cue }
    }
}

/// Static outcome → effects table.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutcomeTable {
    pub picked_up_item:    OutcomeEffects,
    pub picked_up_nothing: OutcomeEffects,
    pub placed_item:       OutcomeEffects,
    pub placed_nothing:    OutcomeEffects,
}

/// Cue ids used by [`OutcomeTable::default`].
pub mod cues {
    use hl_core::CueId;

    pub const ITEM_GET: CueId = CueId(0);
    pub const ITEM_NO_GET: CueId = CueId(1);
    pub const ITEM_DROP: CueId = CueId(2);
    pub const ITEM_NO_DROP: CueId = CueId(3);
}

impl Default for OutcomeTable {
    fn default() -> Self {
        Self {
            picked_up_item:    OutcomeEffects::new(DisplayState::GettingItem, Some(cues::ITEM_GET)),
            picked_up_nothing: OutcomeEffects::new(DisplayState::GettingNoItem, Some(cues::ITEM_NO_GET)),
            placed_item:       OutcomeEffects::new(DisplayState::DroppingItem, Some(cues::ITEM_DROP)),
            placed_nothing:    OutcomeEffects::new(DisplayState::DroppingNoItem, Some(cues::ITEM_NO_DROP)),
        }
    }
}

impl OutcomeTable {
    #[inline]
    pub fn effects(&self, outcome: InteractionOutcome) -> OutcomeEffects {
        match outcome {
            InteractionOutcome::PickedUpItem => self.picked_up_item,
            InteractionOutcome::PickedUpNothing => self.picked_up_nothing,
            InteractionOutcome::PlacedItem => self.placed_item,
            InteractionOutcome::PlacedNothing => self.placed_nothing,
        }
    }

    /// Every entry must show an in-progress display state; an `idle` entry
    /// counts as missing.
    pub fn validate(&self) -> TaskResult<()> {
        let entries = [
            ("picked_up_item", self.picked_up_item),
            ("picked_up_nothing", self.picked_up_nothing),
            ("placed_item", self.placed_item),
            ("placed_nothing", self.placed_nothing),
        ];
        for (name, effects) in entries {
            if !effects.display.is_interacting() {
                return Err(TaskError::Config(format!(
                    "outcome table entry `{name}` has no interaction display state"
                )));
            }
        }
        Ok(())
    }
}

// ── Timer ─────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum InteractionSignal {
    Begin,
    Cue,
    End,
}

/// Counts ticks since arrival at a site.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InteractionTimer {
    elapsed: u32,
    outcome: InteractionOutcome,
}

impl InteractionTimer {
    /// Start a timer with the outcome expected on arrival.
    pub fn start(expected: InteractionOutcome) -> Self {
        Self { elapsed: 0, outcome: expected }
    }

    /// Move one tick forward and return the signal due at the new tick.
    /// After `End` the timer stays finished and returns `None`.
    pub fn advance(&mut self) -> Option<InteractionSignal> {
        if self.is_finished() {
            return None;
        }
        self.elapsed += 1;
        match self.elapsed {
            BEGIN_TICK => Some(InteractionSignal::Begin),
            CUE_TICK => Some(InteractionSignal::Cue),
            INTERACTION_TICKS => Some(InteractionSignal::End),
            _ => None,
        }
    }

    #[inline]
    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.elapsed >= INTERACTION_TICKS
    }

    #[inline]
    pub fn outcome(&self) -> InteractionOutcome {
        self.outcome
    }

    /// Replace the expected outcome with the resolved one.  Returns `true`
    /// if it changed.
    pub fn resolve(&mut self, actual: InteractionOutcome) -> bool {
        let changed = self.outcome != actual;
        self.outcome = actual;
        changed
    }
}
