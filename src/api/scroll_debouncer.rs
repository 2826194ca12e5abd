use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::trace;

use crate::core::{AxisId, Millis};

/// Pending coalesced request for one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebounceSlot {
    pub axis: AxisId,
    pub pending_target_offset: f64,
    pub due_at: Millis,
    /// Bumped every time the timer is reset.
    pub timer_generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DebounceDecision {
    Scheduled,
    /// An earlier pending target on the same axis was superseded.
    Replaced,
    /// Below the denoise threshold; any pending request on the axis was dropped too.
    Dropped,
}

/// Last-write-wins coalescing of scroll requests, one slot per axis.
#[derive(Debug, Clone, Default)]
pub struct ScrollDebouncer {
    slots: IndexMap<AxisId, DebounceSlot>,
    generation: u64,
}

impl ScrollDebouncer {
    /// Schedules a move of `axis` to `target_offset` once `delay_ms` passes quietly.
    pub fn request(
        &mut self,
        axis: AxisId,
        target_offset: f64,
        current_offset: f64,
        delay_ms: Millis,
        denoise_threshold_px: f64,
        now: Millis,
    ) -> DebounceDecision {
        if (target_offset - current_offset).abs() < denoise_threshold_px {
            self.cancel(&axis);
            trace!(axis = %axis, target_offset, current_offset, "debounced request below threshold");
            return DebounceDecision::Dropped;
        }
        self.generation = self.generation.wrapping_add(1);
        let slot = DebounceSlot {
            axis: axis.clone(),
            pending_target_offset: target_offset,
            due_at: now.saturating_add(delay_ms),
            timer_generation: self.generation,
        };
        match self.slots.insert(axis, slot) {
            Some(_) => DebounceDecision::Replaced,
            None => DebounceDecision::Scheduled,
        }
    }

    pub fn cancel(&mut self, axis: &AxisId) -> Option<DebounceSlot> {
        self.slots.shift_remove(axis)
    }

    pub fn clear(&mut self) -> usize {
        let count = self.slots.len();
        self.slots.clear();
        count
    }

    #[must_use]
    pub fn pending(&self, axis: &AxisId) -> Option<&DebounceSlot> {
        self.slots.get(axis)
    }

    pub fn slots(&self) -> impl Iterator<Item = &DebounceSlot> {
        self.slots.values()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Removes and returns every slot whose timer elapsed, in request order.
    pub fn take_due(&mut self, now: Millis) -> SmallVec<[DebounceSlot; 2]> {
        let mut due = SmallVec::new();
        self.slots.retain(|_, slot| {
            if slot.due_at <= now {
                due.push(slot.clone());
                false
            } else {
                true
            }
        });
        due
    }
}

#[cfg(test)]
mod tests {
    use super::{DebounceDecision, ScrollDebouncer};
    use crate::core::AxisId;

    fn axis() -> AxisId {
        AxisId::horizontal("timeline")
    }

    #[test]
    fn burst_collapses_to_last_target() {
        let mut debouncer = ScrollDebouncer::default();
        assert_eq!(
            debouncer.request(axis(), 200.0, 0.0, 40, 5.0, 0),
            DebounceDecision::Scheduled
        );
        assert_eq!(
            debouncer.request(axis(), 400.0, 0.0, 40, 5.0, 10),
            DebounceDecision::Replaced
        );
        assert_eq!(
            debouncer.request(axis(), 600.0, 0.0, 40, 5.0, 20),
            DebounceDecision::Replaced
        );

        assert!(debouncer.take_due(59).is_empty());
        let due = debouncer.take_due(60);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].pending_target_offset, 600.0);
        assert!(debouncer.is_empty());
    }

    #[test]
    fn tiny_requests_are_dropped_and_clear_pending_slot() {
        let mut debouncer = ScrollDebouncer::default();
        debouncer.request(axis(), 300.0, 0.0, 40, 5.0, 0);
        assert_eq!(
            debouncer.request(axis(), 3.0, 0.0, 40, 5.0, 5),
            DebounceDecision::Dropped
        );
        assert!(debouncer.pending(&axis()).is_none());
    }

    #[test]
    fn slots_on_separate_axes_fire_together() {
        let mut debouncer = ScrollDebouncer::default();
        let vertical = AxisId::vertical("2021-06");
        debouncer.request(axis(), 300.0, 0.0, 40, 5.0, 0);
        debouncer.request(vertical.clone(), 80.0, 0.0, 40, 5.0, 0);
        let due = debouncer.take_due(40);
        assert_eq!(due.len(), 2);
        assert_eq!(due[0].axis, axis());
        assert_eq!(due[1].axis, vertical);
        assert!(due[1].timer_generation > due[0].timer_generation);
    }
}
