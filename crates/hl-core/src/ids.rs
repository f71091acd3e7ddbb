//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  The inner integer is `pub` to allow
//! direct indexing into per-agent / per-container `Vec`s via `id.0 as usize`,
//! but callers should prefer the `.index()` helpers for clarity.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID": the inner type's `MAX`.
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of an agent in per-agent storage.
    pub struct AgentId(u32);
}

typed_id! {
    /// Index of a site (a tagged world location) in the `SiteIndex`.
    pub struct SiteId(u32);
}

typed_id! {
    /// Handle to a container abstraction owned by the world.
    pub struct ContainerId(u32);
}

typed_id! {
    /// Opaque handle returned by a navigator for one issued path request.
    pub struct PathHandle(u32);
}

typed_id! {
    /// Item type.  `u16` keeps stacks compact (max 65,535 kinds).
    pub struct ItemKind(u16);
}

typed_id! {
    /// Item category (e.g. "wool" spanning every colour variant).
    pub struct CategoryId(u16);
}

typed_id! {
    /// Audio/visual cue played by the presentation layer.
    pub struct CueId(u16);
}
