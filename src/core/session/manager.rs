/*!
Per-room key exchange and cipher setup.

A [`RoomSession`] is one participant's view of a room: the room's cipher
configuration and prime, a local key pair, the peer public keys seen so
far, and the cipher context derived from the first usable peer key. An
inbound message listener and an outbound key poller may both feed peer
keys concurrently; a single mutex guards the exchange so exactly one of
them completes it.
*/

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use num_bigint::BigUint;

use crate::core::context::CipherContext;
use crate::core::crypto::config::CipherConfig;
use crate::core::crypto::key_exchange::{from_hex, DhKeyPair, DhParameters, SessionKeys};
use crate::core::error::{Error, Result};
use crate::invalid_state_err;

use super::state::{SessionState, StateManager};

/// Exchange state guarded by the session mutex
struct Exchange {
    /// State manager to track session progress
    state_manager: StateManager,

    /// Public keys received from other participants, by client id
    peer_keys: HashMap<String, BigUint>,

    /// Cipher context, present once established
    context: Option<Arc<CipherContext>>,
}

/// One participant's key exchange for one room
pub struct RoomSession {
    room_id: String,
    client_id: String,
    config: CipherConfig,
    params: DhParameters,
    key_pair: DhKeyPair,
    exchange: Mutex<Exchange>,
}

impl RoomSession {
    /// Join a room: validate the configuration and generate a key pair
    pub fn new(
        room_id: impl Into<String>,
        client_id: impl Into<String>,
        config: CipherConfig,
        params: DhParameters,
    ) -> Result<Self> {
        config.validate()?;
        let key_pair = DhKeyPair::generate(&params)?;
        let room_id = room_id.into();
        let client_id = client_id.into();
        log::debug!("Client {} joined room {} using {}", client_id, room_id, config.algorithm);

        Ok(Self {
            room_id,
            client_id,
            config,
            params,
            key_pair,
            exchange: Mutex::new(Exchange {
                state_manager: StateManager::new(),
                peer_keys: HashMap::new(),
                context: None,
            }),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Exchange>> {
        self.exchange
            .lock()
            .map_err(|_| Error::Internal("Failed to lock room session".into()))
    }

    /// Room identifier
    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    /// Local client identifier
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Cipher configuration of the room
    pub fn config(&self) -> &CipherConfig {
        &self.config
    }

    /// Diffie-Hellman parameters of the room
    pub fn parameters(&self) -> &DhParameters {
        &self.params
    }

    /// Local public value
    pub fn public_key(&self) -> &BigUint {
        self.key_pair.public_key()
    }

    /// Local public value as hex, ready to publish
    pub fn public_key_hex(&self) -> String {
        self.key_pair.public_key_hex()
    }

    /// Get the current session state
    ///
    /// A poisoned session lock is logged and reported as `Closed`.
    pub fn state(&self) -> SessionState {
        match self.lock() {
            Ok(exchange) => exchange.state_manager.state(),
            Err(e) => {
                log::error!("Room session {} unusable: {}", self.room_id, e);
                SessionState::Closed
            }
        }
    }

    /// Check whether a cipher context is available
    pub fn is_established(&self) -> bool {
        self.state() == SessionState::Established
    }

    /// Client ids whose public keys have been seen
    pub fn peers(&self) -> Result<Vec<String>> {
        let mut peers: Vec<String> = self.lock()?.peer_keys.keys().cloned().collect();
        peers.sort();
        Ok(peers)
    }

    /// Record a peer's public value and complete the exchange if still pending
    ///
    /// Returns `true` only for the call that established the session. Keys
    /// published under the local client id are ignored.
    pub fn accept_peer_key(&self, peer_id: &str, public_key: BigUint) -> Result<bool> {
        if peer_id == self.client_id {
            return Ok(false);
        }

        let mut exchange = self.lock()?;
        if exchange.state_manager.is_state(SessionState::Closed) {
            return invalid_state_err!(SessionState::AwaitingPeerKey, SessionState::Closed);
        }
        if !exchange.state_manager.can_accept_peer_key() {
            exchange.peer_keys.insert(peer_id.to_string(), public_key);
            return Ok(false);
        }

        let shared = self.key_pair.shared_secret(&public_key, &self.params)?;
        let keys = SessionKeys::derive_for_block_size(&shared, self.config.block_size)?;
        let context = CipherContext::from_config(&keys.key, &keys.iv, self.config.clone())?;

        exchange.peer_keys.insert(peer_id.to_string(), public_key);
        exchange.context = Some(Arc::new(context));
        exchange.state_manager.transition_to_established();
        log::debug!("Room {} established with peer {}", self.room_id, peer_id);
        Ok(true)
    }

    /// Hex variant of [`accept_peer_key`](Self::accept_peer_key)
    pub fn accept_peer_key_hex(&self, peer_id: &str, public_key_hex: &str) -> Result<bool> {
        let public_key = from_hex(public_key_hex).inspect_err(|e| {
            log::warn!("Ignoring unreadable public key from {} in room {}: {}", peer_id, self.room_id, e);
        })?;
        self.accept_peer_key(peer_id, public_key)
    }

    /// Get the cipher context derived for this room
    pub fn cipher_context(&self) -> Result<Arc<CipherContext>> {
        let exchange = self.lock()?;
        match &exchange.context {
            Some(context) if exchange.state_manager.can_transfer_data() => Ok(Arc::clone(context)),
            _ => invalid_state_err!(SessionState::Established, exchange.state_manager.state()),
        }
    }

    /// Encrypt a chat message with the room's context
    pub fn encrypt_message(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        self.cipher_context()?.encrypt(plaintext)
    }

    /// Decrypt a chat message with the room's context
    pub fn decrypt_message(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        self.cipher_context()?.decrypt(ciphertext)
    }

    /// Close the session and drop the cipher context
    pub fn close(&self) -> Result<()> {
        let mut exchange = self.lock()?;
        exchange.context = None;
        exchange.peer_keys.clear();
        exchange.state_manager.transition_to_closed();
        log::debug!("Room session {} closed", self.room_id);
        Ok(())
    }
}

impl std::fmt::Debug for RoomSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoomSession")
            .field("room_id", &self.room_id)
            .field("client_id", &self.client_id)
            .field("config", &self.config)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
