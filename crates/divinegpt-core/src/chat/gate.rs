//! Per-session single-flight gate and turn state machine.
//!
//! Each session handle moves through
//! `Idle -> Sending -> AwaitingAdvisor -> {Resolved | Degraded}`.
//! A `TurnPermit` holds the session for the whole send (advisor call,
//! persistence, journal) so two turns on one new session can never race to
//! create it twice.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use divinegpt_types::error::TurnError;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TurnPhase {
    #[default]
    Idle,
    Sending,
    AwaitingAdvisor,
    Resolved,
    Degraded,
}

impl TurnPhase {
    pub fn is_in_flight(self) -> bool {
        matches!(self, TurnPhase::Sending | TurnPhase::AwaitingAdvisor)
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Slot {
    phase: TurnPhase,
    held: bool,
    /// Drop the slot once the holding permit is released.
    forgotten: bool,
}

#[derive(Debug, Clone, Default)]
pub struct TurnGate {
    slots: Arc<DashMap<Uuid, Slot>>,
}

impl TurnGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase for a session handle (`Idle` if it never ran a turn).
    pub fn phase(&self, handle: Uuid) -> TurnPhase {
        self.slots
            .get(&handle)
            .map(|slot| slot.phase)
            .unwrap_or_default()
    }

    /// Whether a turn holds this session. The UI disables input while true.
    pub fn is_busy(&self, handle: Uuid) -> bool {
        self.slots.get(&handle).is_some_and(|slot| slot.held)
    }

    /// Claim the session for one turn, or fail fast if a turn already holds it.
    pub fn try_acquire(&self, handle: Uuid) -> Result<TurnPermit, TurnError> {
        match self.slots.entry(handle) {
            Entry::Occupied(mut occupied) => {
                if occupied.get().held {
                    return Err(TurnError::Busy { handle });
                }
                *occupied.get_mut() = Slot {
                    phase: TurnPhase::Sending,
                    held: true,
                    forgotten: false,
                };
            }
            Entry::Vacant(vacant) => {
                vacant.insert(Slot {
                    phase: TurnPhase::Sending,
                    held: true,
                    forgotten: false,
                });
            }
        }

        Ok(TurnPermit {
            handle,
            slots: Arc::clone(&self.slots),
        })
    }

    /// Forget a session handle entirely (e.g. after the session is switched away).
    ///
    /// A held slot stays until its permit is dropped, then goes with it.
    pub fn forget(&self, handle: Uuid) {
        if let Entry::Occupied(mut occupied) = self.slots.entry(handle) {
            if occupied.get().held {
                occupied.get_mut().forgotten = true;
            } else {
                occupied.remove();
            }
        }
    }

    /// Number of session handles with gate state.
    pub fn tracked(&self) -> usize {
        self.slots.len()
    }
}

/// Exclusive claim on one session for the duration of a turn.
///
/// Dropping the permit releases the session. A permit dropped mid-flight
/// (e.g. a cancelled future) resets the phase to `Idle`.
#[derive(Debug)]
pub struct TurnPermit {
    handle: Uuid,
    slots: Arc<DashMap<Uuid, Slot>>,
}

impl TurnPermit {
    pub fn handle(&self) -> Uuid {
        self.handle
    }

    pub fn phase(&self) -> TurnPhase {
        self.slots
            .get(&self.handle)
            .map(|slot| slot.phase)
            .unwrap_or_default()
    }

    pub(crate) fn advance(&self, phase: TurnPhase) {
        if let Some(mut slot) = self.slots.get_mut(&self.handle) {
            slot.phase = phase;
        }
    }
}

impl Drop for TurnPermit {
    fn drop(&mut self) {
        if let Entry::Occupied(mut occupied) = self.slots.entry(self.handle) {
            if occupied.get().forgotten {
                occupied.remove();
                return;
            }
            let slot = occupied.get_mut();
            slot.held = false;
            if slot.phase.is_in_flight() {
                slot.phase = TurnPhase::Idle;
            }
        }
    }
}
