//! Agent display state shared with rendering and audio collaborators.

/// What an agent is visibly doing.  Set by the transport task through the
/// presenter; consumed by external rendering/audio.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DisplayState {
    /// Default moving / idle pose.
    #[default]
    Idle,
    /// Reaching into a container and finding something.
    GettingItem,
    /// Reaching into a container and finding nothing.
    GettingNoItem,
    /// Dropping the carried stack into a container.
    DroppingItem,
    /// Trying to drop the carried stack and failing.
    DroppingNoItem,
}

impl DisplayState {
    /// `true` for any of the in-container poses.
    #[inline]
    pub fn is_interacting(self) -> bool {
        !matches!(self, DisplayState::Idle)
    }

    /// Stable label, used for CSV trace columns.
    pub fn as_str(self) -> &'static str {
        match self {
            DisplayState::Idle           => "idle",
            DisplayState::GettingItem    => "getting_item",
            DisplayState::GettingNoItem  => "getting_no_item",
            DisplayState::DroppingItem   => "dropping_item",
            DisplayState::DroppingNoItem => "dropping_no_item",
        }
    }
}

impl std::fmt::Display for DisplayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
