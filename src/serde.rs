/*!
Serialization support for room parameters and session state.

This module provides serde mirrors of the types that cross the chat
transport. Big integers travel as hex strings and cipher settings as
their string tags. It's only built when the `serde-support` feature is
enabled.
*/

use serde::{Deserialize, Serialize};

use crate::core::constants::VERSION;
use crate::core::crypto::config::CipherConfig;
use crate::core::crypto::key_exchange::{from_hex, to_hex, DhParameters};
use crate::core::error::{Error, Result};
use crate::core::session::{RoomSession, SessionState};

/// Serializable version of SessionState
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SerdeSessionState {
    /// Waiting for a peer's public key
    AwaitingPeerKey,
    /// Cipher context ready
    Established,
    /// Session closed
    Closed,
}

impl From<SessionState> for SerdeSessionState {
    fn from(state: SessionState) -> Self {
        match state {
            SessionState::AwaitingPeerKey => SerdeSessionState::AwaitingPeerKey,
            SessionState::Established => SerdeSessionState::Established,
            SessionState::Closed => SerdeSessionState::Closed,
        }
    }
}

impl From<SerdeSessionState> for SessionState {
    fn from(state: SerdeSessionState) -> Self {
        match state {
            SerdeSessionState::AwaitingPeerKey => SessionState::AwaitingPeerKey,
            SerdeSessionState::Established => SessionState::Established,
            SerdeSessionState::Closed => SessionState::Closed,
        }
    }
}

/// Cipher settings as the transport carries them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerdeCipherConfig {
    /// Algorithm tag, e.g. `"rc5"`
    pub algorithm: String,
    /// Mode tag, e.g. `"CBC"`
    pub mode: String,
    /// Padding tag, e.g. `"PKCS7"`
    pub padding: String,
}

impl From<&CipherConfig> for SerdeCipherConfig {
    fn from(config: &CipherConfig) -> Self {
        Self {
            algorithm: config.algorithm.to_string(),
            mode: config.mode.to_string(),
            padding: config.padding.to_string(),
        }
    }
}

impl TryFrom<&SerdeCipherConfig> for CipherConfig {
    type Error = Error;

    fn try_from(config: &SerdeCipherConfig) -> Result<Self> {
        CipherConfig::from_tags(&config.algorithm, &config.mode, &config.padding)
    }
}

/// Everything a participant needs to join a room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerdeRoomParameters {
    /// Engine version that produced the parameters
    pub version: u8,
    /// Room identifier
    pub room_id: String,
    /// Cipher settings
    #[serde(flatten)]
    pub cipher: SerdeCipherConfig,
    /// Prime modulus as hex
    pub prime: String,
}

impl SerdeRoomParameters {
    /// Describe a room from its configuration and parameters
    pub fn new(room_id: impl Into<String>, config: &CipherConfig, params: &DhParameters) -> Self {
        Self {
            version: VERSION,
            room_id: room_id.into(),
            cipher: config.into(),
            prime: params.prime_hex(),
        }
    }

    /// Parse the cipher configuration and Diffie-Hellman parameters
    pub fn to_parts(&self) -> Result<(CipherConfig, DhParameters)> {
        if self.version != VERSION {
            return Err(Error::InvalidData(format!("unsupported room parameter version {}", self.version)));
        }
        Ok((CipherConfig::try_from(&self.cipher)?, DhParameters::from_hex(&self.prime)?))
    }

    /// Join the described room as `client_id`
    pub fn join(&self, client_id: &str) -> Result<RoomSession> {
        let (config, params) = self.to_parts()?;
        RoomSession::new(self.room_id.clone(), client_id, config, params)
    }
}

impl From<&RoomSession> for SerdeRoomParameters {
    fn from(session: &RoomSession) -> Self {
        Self::new(session.room_id(), session.config(), session.parameters())
    }
}

/// A public key announcement from one participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerdePublicKey {
    /// Room identifier
    pub room_id: String,
    /// Announcing client
    pub client_id: String,
    /// Public value as hex
    pub public_key: String,
}

impl From<&RoomSession> for SerdePublicKey {
    fn from(session: &RoomSession) -> Self {
        Self {
            room_id: session.room_id().to_string(),
            client_id: session.client_id().to_string(),
            public_key: to_hex(session.public_key()),
        }
    }
}

impl SerdePublicKey {
    /// Feed this announcement into a session of the same room
    pub fn apply_to(&self, session: &RoomSession) -> Result<bool> {
        if self.room_id != session.room_id() {
            return Err(Error::InvalidData(format!(
                "public key for room {} offered to room {}",
                self.room_id,
                session.room_id()
            )));
        }
        session.accept_peer_key(&self.client_id, from_hex(&self.public_key)?)
    }
}
