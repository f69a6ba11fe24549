//! Session store
//!
//! One slot per session id. Each slot guards its state with a short lock
//! that is only held while records are appended, read or taken on close.
//! Handler and completion calls happen outside it.

use dashmap::DashMap;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;

use emi_assist_core::TurnRecord;

use crate::catalog::ConfirmationRole;

/// Conversation state of one session
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionState {
    turns: Vec<TurnRecord>,
    awaiting_confirmation: bool,
    last_action: Option<String>,
    #[serde(skip)]
    ended: bool,
}

/// Outcome of a yes/no answer to a pending confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfirmation {
    pub pending_action: String,
    pub confirmed: bool,
}

impl SessionState {
    pub fn turns(&self) -> &[TurnRecord] {
        &self.turns
    }

    /// Chosen intents in turn order
    pub fn intents(&self) -> Vec<String> {
        self.turns.iter().map(|t| t.chosen_intent.clone()).collect()
    }

    pub fn awaiting_confirmation(&self) -> bool {
        self.awaiting_confirmation
    }

    pub fn last_action(&self) -> Option<&str> {
        self.last_action.as_deref()
    }

    /// Append a turn and update the confirmation flag
    ///
    /// A `Request` intent arms the flag. An `Affirm` or `Deny` intent while
    /// armed resolves and clears it. Other turns leave it untouched.
    fn record(
        &mut self,
        record: TurnRecord,
        role: ConfirmationRole,
    ) -> Option<ResolvedConfirmation> {
        let intent = record.chosen_intent.clone();
        self.turns.push(record);

        match role {
            ConfirmationRole::Request => {
                self.awaiting_confirmation = true;
                self.last_action = Some(intent);
                None
            }
            ConfirmationRole::Affirm | ConfirmationRole::Deny if self.awaiting_confirmation => {
                self.awaiting_confirmation = false;
                Some(ResolvedConfirmation {
                    pending_action: self.last_action.clone().unwrap_or_default(),
                    confirmed: role == ConfirmationRole::Affirm,
                })
            }
            _ => None,
        }
    }
}

/// Per-session slot
#[derive(Debug, Default)]
pub struct SessionSlot {
    state: Mutex<SessionState>,
}

impl SessionSlot {
    #[cfg(test)]
    fn is_ended(&self) -> bool {
        self.state.lock().ended
    }

    /// Append a turn; `Err` hands the record back when the session has already ended
    pub fn record(
        &self,
        record: TurnRecord,
        role: ConfirmationRole,
    ) -> Result<Option<ResolvedConfirmation>, TurnRecord> {
        let mut state = self.state.lock();
        if state.ended {
            return Err(record);
        }
        Ok(state.record(record, role))
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.lock().clone()
    }

    /// Mark ended and take the state; `None` if already ended
    fn close(&self) -> Option<SessionState> {
        let mut state = self.state.lock();
        if state.ended {
            return None;
        }
        let taken = std::mem::take(&mut *state);
        state.ended = true;
        Some(taken)
    }
}

/// All live sessions
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<String, Arc<SessionSlot>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Existing slot or a new one
    pub fn slot(&self, session_id: &str) -> Arc<SessionSlot> {
        let entry = self
            .sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                tracing::debug!(session_id = %session_id, "Session created");
                Arc::new(SessionSlot::default())
            });
        Arc::clone(entry.value())
    }

    pub fn get(&self, session_id: &str) -> Option<Arc<SessionSlot>> {
        self.sessions.get(session_id).map(|s| Arc::clone(s.value()))
    }

    /// Close a slot and drop it from the store
    ///
    /// Returns `None` if the slot was already closed by someone else.
    pub fn close(&self, session_id: &str, slot: &Arc<SessionSlot>) -> Option<SessionState> {
        let state = slot.close()?;
        self.sessions.remove_if(session_id, |_, current| Arc::ptr_eq(current, slot));
        Some(state)
    }

    pub fn snapshot(&self, session_id: &str) -> Option<SessionState> {
        self.get(session_id).map(|slot| slot.snapshot())
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.sessions.contains_key(session_id)
    }

    /// Session ids, sorted
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.sessions.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(intent: &str) -> TurnRecord {
        TurnRecord::new("text", intent, 0.8, "handler")
    }

    #[test]
    fn test_slot_is_created_once() {
        let store = SessionStore::new();
        let a = store.slot("s1");
        let b = store.slot("s1");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_intents_in_turn_order() {
        let store = SessionStore::new();
        let slot = store.slot("s1");
        slot.record(turn("loan_balance"), ConfirmationRole::None).unwrap();
        slot.record(turn("emi_breakdown"), ConfirmationRole::None).unwrap();

        let state = store.snapshot("s1").unwrap();
        assert_eq!(state.intents(), vec!["loan_balance", "emi_breakdown"]);
        assert_eq!(state.turns().len(), 2);
    }

    #[test]
    fn test_close_removes_and_returns_state() {
        let store = SessionStore::new();
        let slot = store.slot("s1");
        slot.record(turn("loan_balance"), ConfirmationRole::None).unwrap();

        let state = store.close("s1", &slot).unwrap();
        assert_eq!(state.intents(), vec!["loan_balance"]);
        assert!(!store.contains("s1"));
        assert!(slot.is_ended());

        // A second close finds nothing, and late records are handed back
        assert!(store.close("s1", &slot).is_none());
        assert!(slot.record(turn("deny"), ConfirmationRole::None).is_err());
    }

    #[test]
    fn test_close_leaves_newer_slot_in_place() {
        let store = SessionStore::new();
        let old = store.slot("s1");
        old.close();
        store.sessions.remove("s1");
        let fresh = store.slot("s1");

        assert!(store.close("s1", &old).is_none());
        assert!(store.contains("s1"));
        assert!(!fresh.is_ended());
    }

    #[test]
    fn test_confirmation_flag() {
        let mut state = SessionState::default();

        assert!(state.record(turn("affirm"), ConfirmationRole::Affirm).is_none());
        assert!(!state.awaiting_confirmation());

        assert!(state.record(turn("not_willing_to_pay"), ConfirmationRole::Request).is_none());
        assert!(state.awaiting_confirmation());
        assert_eq!(state.last_action(), Some("not_willing_to_pay"));

        // Unrelated turns keep the flag armed
        assert!(state.record(turn("loan_balance"), ConfirmationRole::None).is_none());
        assert!(state.awaiting_confirmation());

        let resolved = state.record(turn("deny"), ConfirmationRole::Deny).unwrap();
        assert_eq!(resolved.pending_action, "not_willing_to_pay");
        assert!(!resolved.confirmed);
        assert!(!state.awaiting_confirmation());
    }

    #[test]
    fn test_ids_sorted() {
        let store = SessionStore::new();
        store.slot("b");
        store.slot("a");
        assert_eq!(store.ids(), vec!["a", "b"]);
    }
}
