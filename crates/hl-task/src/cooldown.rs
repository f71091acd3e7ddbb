//! Per-agent restart delay between transport cycles.

/// Ticks remaining before the task may look for work again.
///
/// The task only ever [`arm`](Self::arm)s the gate.  Counting down is done
/// once per tick by the owner of the agent loop, never by the task itself.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CooldownGate {
    remaining: u32,
}

impl CooldownGate {
    /// Set the remaining ticks, replacing any previous value.
    #[inline]
    pub fn arm(&mut self, ticks: u32) {
        self.remaining = ticks;
    }

    /// Advance one tick.  Saturates at zero.
    #[inline]
    pub fn count_down(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.remaining == 0
    }

    #[inline]
    pub fn remaining(&self) -> u32 {
        self.remaining
    }
}
