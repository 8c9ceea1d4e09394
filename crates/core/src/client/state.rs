use std::sync::{Mutex, MutexGuard, PoisonError};

use little_chat_model::ModelMessage;
use tokio::sync::oneshot;

use super::ChatStage;
use crate::conversation::Transcript;

/// The exchange currently awaiting a reply.
struct Pending {
    id: u64,
    cancel_tx: oneshot::Sender<()>,
}

pub(super) struct ClientState {
    pub(super) transcript: Transcript,
    system_prompt: Option<String>,
    pending: Option<Pending>,
    next_exchange_id: u64,
}

impl ClientState {
    pub(super) fn new(system_prompt: Option<String>) -> Self {
        let mut state = Self {
            transcript: Default::default(),
            system_prompt,
            pending: None,
            next_exchange_id: 1,
        };
        state.seed();
        state
    }

    #[inline]
    pub(super) fn stage(&self) -> ChatStage {
        if self.pending.is_some() {
            ChatStage::AwaitingReply
        } else {
            ChatStage::Idle
        }
    }

    /// Starts a new exchange if the client is idle.
    ///
    /// Returns the exchange id and the receiving half of its cancellation
    /// signal, or `None` if another exchange is still pending.
    pub(super) fn begin_exchange(
        &mut self,
    ) -> Option<(u64, oneshot::Receiver<()>)> {
        if self.pending.is_some() {
            return None;
        }
        let id = self.next_exchange_id;
        self.next_exchange_id += 1;

        let (cancel_tx, cancel_rx) = oneshot::channel();
        self.pending = Some(Pending { id, cancel_tx });
        Some((id, cancel_rx))
    }

    #[inline]
    pub(super) fn is_current(&self, id: u64) -> bool {
        self.pending.as_ref().is_some_and(|p| p.id == id)
    }

    /// Marks the exchange `id` as finished.
    ///
    /// Returns `false` if the exchange is no longer current, i.e. it has
    /// been cancelled or reset in the meantime.
    pub(super) fn finish_exchange(&mut self, id: u64) -> bool {
        if !self.is_current(id) {
            return false;
        }
        self.pending = None;
        true
    }

    /// Abandons the exchange `id` without signalling its waiter.
    ///
    /// With `rollback`, the user message the exchange appended is removed.
    pub(super) fn abandon_exchange(&mut self, id: u64, rollback: bool) -> bool {
        if !self.finish_exchange(id) {
            return false;
        }
        if rollback {
            self.transcript.pop_last();
        }
        true
    }

    /// Cancels the pending exchange, if any, and wakes up its waiter.
    pub(super) fn cancel_pending(&mut self, rollback: bool) -> bool {
        let Some(pending) = self.pending.take() else {
            return false;
        };
        debug!("cancelling exchange {}", pending.id);
        if rollback {
            self.transcript.pop_last();
        }
        // The waiter may have gone away already.
        pending.cancel_tx.send(()).ok();
        true
    }

    pub(super) fn reset(&mut self) {
        self.cancel_pending(false);
        self.transcript.clear();
        self.seed();
    }

    fn seed(&mut self) {
        if let Some(prompt) = &self.system_prompt {
            self.transcript.push(ModelMessage::system(prompt.clone()));
        }
    }
}

#[inline]
pub(super) fn lock(state: &Mutex<ClientState>) -> MutexGuard<'_, ClientState> {
    // Every mutation completes under one lock, so a poisoned state is
    // still consistent.
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Abandons an exchange whose `submit` future was dropped before it
/// finished.
pub(super) struct ExchangeGuard<'a> {
    pub(super) state: &'a Mutex<ClientState>,
    pub(super) id: u64,
    pub(super) rollback: bool,
    pub(super) armed: bool,
}

impl ExchangeGuard<'_> {
    #[inline]
    pub(super) fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for ExchangeGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if lock(self.state).abandon_exchange(self.id, self.rollback) {
            debug!("exchange {} dropped while awaiting reply", self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_flight() {
        let mut state = ClientState::new(None);
        assert_eq!(state.stage(), ChatStage::Idle);

        let (id, _cancel_rx) = state.begin_exchange().unwrap();
        assert_eq!(state.stage(), ChatStage::AwaitingReply);
        assert!(state.begin_exchange().is_none());

        assert!(state.finish_exchange(id));
        assert!(!state.finish_exchange(id));
        assert_eq!(state.stage(), ChatStage::Idle);
    }

    #[test]
    fn test_cancel_wakes_waiter() {
        let mut state = ClientState::new(None);
        let (id, mut cancel_rx) = state.begin_exchange().unwrap();

        assert!(state.cancel_pending(false));
        assert!(cancel_rx.try_recv().is_ok());
        assert!(!state.is_current(id));
        assert!(!state.cancel_pending(false));
    }

    #[test]
    fn test_reset_reseeds_system_prompt() {
        let mut state = ClientState::new(Some("Be brief.".to_owned()));
        state.transcript.push(ModelMessage::user("Hi"));
        state.transcript.push(ModelMessage::assistant("Hello"));

        state.reset();
        assert_eq!(state.transcript.messages(), [ModelMessage::system("Be brief.")]);
    }
}
