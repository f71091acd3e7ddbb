//! Item stacks and the rules for deciding whether two stacks "match".

use crate::{CategoryId, CoreError, CoreResult, ItemKind};

/// How strictly a carried stack must resemble a container's contents for the
/// container to count as a suitable destination.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MatchMode {
    /// Same kind and same variant (colour, enchantment, …).
    Exact,
    /// Same kind; variants are ignored.
    Kind,
    /// Same kind, or both stacks share a category.
    #[default]
    Category,
}

/// A quantity of one item kind.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemStack {
    pub kind:     ItemKind,
    /// Variant discriminator within a kind; `0` when the kind has none.
    #[cfg_attr(feature = "serde", serde(default))]
    pub variant:  u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub category: Option<CategoryId>,
    pub count:    u32,
    /// Largest count a single slot may hold for this kind.
    #[cfg_attr(feature = "serde", serde(default = "default_max_stack"))]
    pub max_stack: u32,
}

#[cfg(feature = "serde")]
fn default_max_stack() -> u32 {
    64
}

impl ItemStack {
    /// A stack of `count` plain items with the default slot limit of 64.
    pub fn new(kind: ItemKind, count: u32) -> Self {
        Self { kind, variant: 0, category: None, count, max_stack: 64 }
    }

    pub fn with_variant(mut self, variant: u32) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_category(mut self, category: CategoryId) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_max_stack(mut self, max_stack: u32) -> Self {
        self.max_stack = max_stack;
        self
    }

    /// Reject stacks no slot could hold.
    pub fn validate(&self) -> CoreResult<()> {
        if self.kind == ItemKind::INVALID {
            return Err(CoreError::Config("stack has no item kind".into()));
        }
        if self.max_stack == 0 {
            return Err(CoreError::Config(format!("{} has max stack size 0", self.kind)));
        }
        if self.count > self.max_stack {
            return Err(CoreError::Config(format!(
                "stack of {} {} exceeds its max stack size {}",
                self.count, self.kind, self.max_stack
            )));
        }
        Ok(())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// `true` if `other` can be merged into the same slot as `self`.
    #[inline]
    pub fn stacks_with(&self, other: &ItemStack) -> bool {
        self.kind == other.kind && self.variant == other.variant
    }

    /// Units that still fit in this slot.
    #[inline]
    pub fn room(&self) -> u32 {
        self.max_stack.saturating_sub(self.count)
    }

    /// Split `n` units off this stack (fewer if the stack is smaller).
    pub fn split(&mut self, n: u32) -> ItemStack {
        let taken = n.min(self.count);
        self.count -= taken;
        ItemStack { count: taken, ..*self }
    }

    /// Whether `self` and `other` count as the same item under `mode`.
    /// Empty stacks never match.
    pub fn matches(&self, other: &ItemStack, mode: MatchMode) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        match mode {
            MatchMode::Exact => self.stacks_with(other),
            MatchMode::Kind => self.kind == other.kind,
            MatchMode::Category => {
                self.kind == other.kind
                    || matches!((self.category, other.category), (Some(a), Some(b)) if a == b)
            }
        }
    }
}
