//! Per-location fee state, keyed by location id and stamped with the cart
//! generation each request was issued under.

use std::collections::HashMap;

use relaypick_core::LocationId;
use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeState {
    NotRequested,
    Pending,
    /// The backend answered. `None` when it sent no fee field.
    Resolved(Option<Decimal>),
    Failed,
}

impl FeeState {
    /// The numeric fee, if one is known.
    #[must_use]
    pub fn amount(self) -> Option<Decimal> {
        match self {
            FeeState::Resolved(amount) => amount,
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    state: FeeState,
    generation: u64,
}

/// Keyed fee store.
///
/// Entries only change through [`FeeBook::try_begin`] and
/// [`FeeBook::complete`]; completion is a compare-and-set on the generation
/// stamp, so a response issued for an older cart never overwrites a newer one.
#[derive(Debug, Default)]
pub struct FeeBook {
    generation: u64,
    entries: HashMap<LocationId, Entry>,
}

impl FeeBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn state(&self, id: LocationId) -> FeeState {
        self.entries
            .get(&id)
            .filter(|e| e.generation == self.generation)
            .map_or(FeeState::NotRequested, |e| e.state)
    }

    /// Claims `id` for a request under the current generation.
    ///
    /// Returns the generation stamp to hand back to [`FeeBook::complete`], or
    /// `None` when the location is already pending or settled for this cart.
    pub fn try_begin(&mut self, id: LocationId) -> Option<u64> {
        if self.state(id) != FeeState::NotRequested {
            return None;
        }
        self.entries.insert(
            id,
            Entry {
                state: FeeState::Pending,
                generation: self.generation,
            },
        );
        Some(self.generation)
    }

    /// Settles a pending entry. Returns `false`, leaving the book untouched,
    /// when `generation` is stale or the entry is not pending.
    pub fn complete(&mut self, id: LocationId, generation: u64, state: FeeState) -> bool {
        if generation != self.generation {
            return false;
        }
        match self.entries.get_mut(&id) {
            Some(entry) if entry.generation == generation && entry.state == FeeState::Pending => {
                entry.state = state;
                true
            }
            _ => false,
        }
    }

    /// Starts a new generation after the cart changed. Every entry reads as
    /// [`FeeState::NotRequested`] again and in-flight completions are refused.
    pub fn advance_generation(&mut self) -> u64 {
        self.generation += 1;
        self.entries.clear();
        self.generation
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.entries
            .values()
            .filter(|e| e.generation == self.generation && e.state == FeeState::Pending)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_entries_read_as_not_requested() {
        let book = FeeBook::new();
        assert_eq!(book.state(1), FeeState::NotRequested);
        assert_eq!(book.pending_count(), 0);
    }

    #[test]
    fn begin_marks_pending_and_refuses_duplicates() {
        let mut book = FeeBook::new();
        assert_eq!(book.try_begin(1), Some(0));
        assert_eq!(book.state(1), FeeState::Pending);
        assert_eq!(book.try_begin(1), None, "in-flight request must not repeat");
        assert_eq!(book.pending_count(), 1);
    }

    #[test]
    fn settled_entries_are_not_requested_again() {
        let mut book = FeeBook::new();
        let g = book.try_begin(1).unwrap();
        assert!(book.complete(1, g, FeeState::Failed));
        assert_eq!(book.try_begin(1), None);

        let g = book.try_begin(2).unwrap();
        assert!(book.complete(2, g, FeeState::Resolved(Some(Decimal::from(7)))));
        assert_eq!(book.try_begin(2), None);
        assert_eq!(book.state(2).amount(), Some(Decimal::from(7)));
    }

    #[test]
    fn stale_generation_is_discarded() {
        let mut book = FeeBook::new();
        let old = book.try_begin(1).unwrap();
        book.advance_generation();
        assert_eq!(book.state(1), FeeState::NotRequested);

        let new = book.try_begin(1).unwrap();
        assert_ne!(old, new);
        assert!(!book.complete(1, old, FeeState::Resolved(Some(Decimal::from(9)))));
        assert_eq!(book.state(1), FeeState::Pending);
        assert!(book.complete(1, new, FeeState::Resolved(Some(Decimal::from(5)))));
        assert_eq!(book.state(1).amount(), Some(Decimal::from(5)));
    }

    #[test]
    fn complete_requires_pending_entry() {
        let mut book = FeeBook::new();
        assert!(!book.complete(3, 0, FeeState::Failed), "never begun");
        let g = book.try_begin(3).unwrap();
        assert!(book.complete(3, g, FeeState::Failed));
        assert!(
            !book.complete(3, g, FeeState::Resolved(Some(Decimal::ONE))),
            "already settled"
        );
        assert_eq!(book.state(3), FeeState::Failed);
    }

    #[test]
    fn amount_only_for_resolved_values() {
        assert_eq!(FeeState::Pending.amount(), None);
        assert_eq!(FeeState::Failed.amount(), None);
        assert_eq!(FeeState::Resolved(None).amount(), None);
        assert_eq!(
            FeeState::Resolved(Some(Decimal::ONE)).amount(),
            Some(Decimal::ONE)
        );
    }
}
