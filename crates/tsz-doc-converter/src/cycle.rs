//! Expansion guard for recursive type conversion.
//!
//! Converting an inferred type may require converting the same symbol's type
//! again (`type T = { next: T }` reached through an inferred property). The
//! converter records every symbol whose type is being expanded and refuses to
//! expand it a second time further down the same call chain.
//!
//! The guard lives in the per-run converter state, so nothing leaks from one
//! run into the next.
//!
//! # Safety
//!
//! - **Debug leak detection**: In debug builds, dropping a guard with active
//!   entries panics, catching a forgotten `leave()`.
//! - **Debug double-leave detection**: In debug builds, leaving a key that is
//!   not being expanded panics.

use rustc_hash::FxHashSet;
use std::hash::Hash;

/// Result of attempting to enter an expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleResult {
    /// Proceed; the caller must `leave` with the same key.
    Entered,
    /// The key is already being expanded.
    Cycle,
    /// Nesting is too deep to continue.
    DepthExceeded,
}

impl CycleResult {
    #[inline]
    pub fn is_entered(self) -> bool {
        matches!(self, Self::Entered)
    }

    #[inline]
    pub fn is_denied(self) -> bool {
        !self.is_entered()
    }
}

/// Tracks the keys currently being expanded.
///
/// ```ignore
/// match guard.enter(symbol) {
///     CycleResult::Entered => {
///         let result = expand(symbol);
///         guard.leave(symbol);
///         result
///     }
///     CycleResult::Cycle | CycleResult::DepthExceeded => placeholder(),
/// }
/// ```
pub struct CycleGuard<K: Hash + Eq + Copy> {
    expanding: FxHashSet<K>,
    max_depth: u32,
}

impl<K: Hash + Eq + Copy> CycleGuard<K> {
    /// Depth past which expansion is refused even without a cycle.
    pub const DEFAULT_MAX_DEPTH: u32 = 500;

    pub fn new() -> Self {
        Self::with_max_depth(Self::DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(max_depth: u32) -> Self {
        Self {
            expanding: FxHashSet::default(),
            max_depth,
        }
    }

    pub fn enter(&mut self, key: K) -> CycleResult {
        if self.expanding.contains(&key) {
            return CycleResult::Cycle;
        }
        if self.expanding.len() as u32 >= self.max_depth {
            return CycleResult::DepthExceeded;
        }
        self.expanding.insert(key);
        CycleResult::Entered
    }

    /// Must be called exactly once after every successful [`enter`](Self::enter).
    pub fn leave(&mut self, key: K) {
        let was_present = self.expanding.remove(&key);
        debug_assert!(
            was_present,
            "CycleGuard::leave() called with a key that is not being expanded. \
             This indicates a double-leave or a leave without a matching enter()."
        );
    }

    #[inline]
    pub fn is_expanding(&self, key: &K) -> bool {
        self.expanding.contains(key)
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.expanding.len()
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        !self.expanding.is_empty()
    }
}

impl<K: Hash + Eq + Copy> Default for CycleGuard<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(debug_assertions)]
impl<K: Hash + Eq + Copy> Drop for CycleGuard<K> {
    fn drop(&mut self) {
        if !std::thread::panicking() && !self.expanding.is_empty() {
            panic!(
                "CycleGuard dropped with {} keys still being expanded. \
                 This indicates leaked enter() calls without matching leave() calls.",
                self.expanding.len(),
            );
        }
    }
}

#[cfg(test)]
#[path = "../tests/cycle_tests.rs"]
mod tests;
