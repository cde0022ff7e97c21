//! Chain-aware turn admission around one activation (§3, §4.4, §8 S5).
//!
//! Turns for an activation are normally serialized by its mailbox's single
//! executor task, so admission here never actually contends. The one case
//! it exists for is a reentrant self-call: a turn whose chain id matches
//! the turn already running is admitted immediately instead of queuing
//! behind it, which is what lets an `outer()` call recurse into `inner()`
//! on the same actor without deadlocking on its own activation.

// Layer 1: Standard library imports
use std::cell::UnsafeCell;
use std::sync::Mutex as StdMutex;

// Layer 2: Third-party crate imports
use tokio::sync::Notify;

// Layer 3: Internal module imports
use crate::util::ChainId;

#[derive(Default)]
struct GateState {
    holder: Option<ChainId>,
    depth: u32,
}

/// Admits turns into a `T` one chain at a time, letting a chain already
/// holding the gate recurse into it rather than wait behind itself.
pub struct ReentrantGate<T> {
    value: UnsafeCell<T>,
    state: StdMutex<GateState>,
    notify: Notify,
}

// Safety: `value` is only ever read or written through an `Admission`, and
// `GateState` admits at most one chain at a time. A matching-chain
// admission aliases an outstanding one, but the two never run
// concurrently: this gate has no way to run the holding chain's code off
// the task that is awaiting the nested admission, so the outer borrow is
// always suspended for the entire lifetime of the inner one.
unsafe impl<T: Send> Sync for ReentrantGate<T> {}

impl<T> ReentrantGate<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: UnsafeCell::new(value),
            state: StdMutex::new(GateState::default()),
            notify: Notify::new(),
        }
    }

    /// `true` if `chain_id` is the chain currently holding the gate, i.e. a
    /// call carrying this chain id would be a nested re-entry rather than
    /// unrelated contention.
    pub fn is_holder(&self, chain_id: ChainId) -> bool {
        self.state.lock().expect("reentrant gate poisoned").holder == Some(chain_id)
    }

    /// Admit `chain_id`, waiting out any other chain currently holding the
    /// gate. A matching chain is admitted immediately, recursively.
    pub async fn acquire(&self, chain_id: ChainId) -> Admission<'_, T> {
        loop {
            {
                let mut state = self.state.lock().expect("reentrant gate poisoned");
                if state.holder.is_none() {
                    state.holder = Some(chain_id);
                    state.depth = 1;
                    return Admission {
                        gate: self,
                        chain_id,
                    };
                }
                if state.holder == Some(chain_id) {
                    state.depth += 1;
                    return Admission {
                        gate: self,
                        chain_id,
                    };
                }
            }
            self.notify.notified().await;
        }
    }

    /// Non-blocking read access, for callers like the idle sweep that only
    /// need to peek and can skip an activation that's mid-turn.
    pub fn try_inspect<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        let state = self.state.lock().expect("reentrant gate poisoned");
        if state.holder.is_some() {
            return None;
        }
        // Safety: no chain currently holds the gate, so no `Admission` is
        // live; this shared borrow cannot alias a mutable one.
        Some(f(unsafe { &*self.value.get() }))
    }

    fn release(&self, chain_id: ChainId) {
        let mut state = self.state.lock().expect("reentrant gate poisoned");
        if state.holder != Some(chain_id) {
            return;
        }
        state.depth = state.depth.saturating_sub(1);
        if state.depth == 0 {
            state.holder = None;
            drop(state);
            self.notify.notify_waiters();
        }
    }
}

/// RAII admission into a [`ReentrantGate`]. Deref/DerefMut give exclusive
/// access to the wrapped value; dropping releases the gate, or (for a
/// nested admission) just decrements the depth counter.
pub struct Admission<'a, T> {
    gate: &'a ReentrantGate<T>,
    chain_id: ChainId,
}

impl<T> std::ops::Deref for Admission<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // Safety: holding this `Admission` is the gate's proof of exclusive access.
        unsafe { &*self.gate.value.get() }
    }
}

impl<T> std::ops::DerefMut for Admission<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        // Safety: holding this `Admission` is the gate's proof of exclusive access.
        unsafe { &mut *self.gate.value.get() }
    }
}

impl<T> Drop for Admission<'_, T> {
    fn drop(&mut self) {
        self.gate.release(self.chain_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn uncontended_acquire_grants_exclusive_access() {
        let gate = ReentrantGate::new(0_i32);
        let chain = ChainId::new();
        {
            let mut admission = gate.acquire(chain).await;
            *admission += 1;
        }
        assert_eq!(gate.try_inspect(|v| *v), Some(1));
    }

    #[tokio::test]
    async fn matching_chain_recurses_without_waiting() {
        let gate = ReentrantGate::new(0_i32);
        let chain = ChainId::new();
        let outer = gate.acquire(chain).await;
        assert!(gate.is_holder(chain));

        // A nested admission for the same chain is granted immediately,
        // without deadlocking on the outer one.
        let inner = gate.acquire(chain).await;
        drop(inner);
        assert!(gate.is_holder(chain), "outer admission still holds after inner releases");
        drop(outer);
        assert!(gate.try_inspect(|_| ()).is_some());
    }

    #[tokio::test]
    async fn different_chain_waits_for_release() {
        let gate = Arc::new(ReentrantGate::new(0_i32));
        let first = ChainId::new();
        let second = ChainId::new();

        let admission = gate.acquire(first).await;
        assert!(gate.try_inspect(|_| ()).is_none());

        let waiter = {
            let gate = Arc::clone(&gate);
            tokio::spawn(async move {
                let _admission = gate.acquire(second).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!waiter.is_finished());
        drop(admission);
        waiter.await.unwrap();
    }
}
