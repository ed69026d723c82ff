/*!
Session state management for room key exchange.

This module defines room session states and the state machine that
gates key acceptance and message traffic.
*/

use std::fmt;

/// Session state for tracking key-exchange progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SessionState {
    /// Local key published, waiting for a peer's public key
    AwaitingPeerKey,
    /// Shared secret derived and cipher context ready
    Established,
    /// Session closed
    Closed,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::AwaitingPeerKey => write!(f, "AwaitingPeerKey"),
            SessionState::Established => write!(f, "Established"),
            SessionState::Closed => write!(f, "Closed"),
        }
    }
}

/// Session state manager
///
/// Handles state transitions and validation of operations
/// based on the current session state.
#[derive(Debug, Clone, Copy)]
pub struct StateManager {
    /// Current state of the session
    state: SessionState,
}

impl Default for StateManager {
    fn default() -> Self {
        Self::new()
    }
}

impl StateManager {
    /// Create a new state manager
    pub fn new() -> Self {
        Self {
            state: SessionState::AwaitingPeerKey,
        }
    }

    /// Get the current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Check if the session is in the given state
    pub fn is_state(&self, state: SessionState) -> bool {
        self.state == state
    }

    /// Check if a peer key can still complete the exchange
    pub fn can_accept_peer_key(&self) -> bool {
        self.state == SessionState::AwaitingPeerKey
    }

    /// Check if messages can be encrypted and decrypted
    pub fn can_transfer_data(&self) -> bool {
        self.state == SessionState::Established
    }

    /// Transition to the established state
    pub fn transition_to_established(&mut self) {
        if self.state == SessionState::AwaitingPeerKey {
            self.state = SessionState::Established;
        }
    }

    /// Transition to the closed state
    pub fn transition_to_closed(&mut self) {
        self.state = SessionState::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_transitions() {
        let mut manager = StateManager::new();
        assert_eq!(manager.state(), SessionState::AwaitingPeerKey);
        assert!(manager.can_accept_peer_key());
        assert!(!manager.can_transfer_data());

        manager.transition_to_established();
        assert!(manager.is_state(SessionState::Established));
        assert!(!manager.can_accept_peer_key());
        assert!(manager.can_transfer_data());

        manager.transition_to_closed();
        assert_eq!(manager.state(), SessionState::Closed);
        assert!(!manager.can_transfer_data());
    }

    #[test]
    fn test_closed_session_cannot_be_established() {
        let mut manager = StateManager::new();
        manager.transition_to_closed();
        manager.transition_to_established();
        assert_eq!(manager.state(), SessionState::Closed);
    }

    #[test]
    fn test_display() {
        assert_eq!(SessionState::AwaitingPeerKey.to_string(), "AwaitingPeerKey");
        assert_eq!(SessionState::Established.to_string(), "Established");
    }
}
