/*!
Registry of the rooms a client has joined.
*/

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::core::crypto::config::CipherConfig;
use crate::core::crypto::key_exchange::DhParameters;
use crate::core::error::{Error, Result};

use super::manager::RoomSession;

/// Thread-safe map from room id to room session
#[derive(Debug, Default)]
pub struct SessionRegistry {
    rooms: Mutex<HashMap<String, Arc<RoomSession>>>,
}

impl SessionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, Arc<RoomSession>>>> {
        self.rooms
            .lock()
            .map_err(|_| Error::Internal("Failed to lock session registry".into()))
    }

    /// Join a room and register the new session, replacing any previous one
    pub fn create_room(
        &self,
        room_id: &str,
        client_id: &str,
        config: CipherConfig,
        params: DhParameters,
    ) -> Result<Arc<RoomSession>> {
        let session = Arc::new(RoomSession::new(room_id, client_id, config, params)?);
        if let Some(previous) = self.lock()?.insert(room_id.to_string(), Arc::clone(&session)) {
            log::debug!("Replacing session for room {}", room_id);
            previous.close()?;
        }
        Ok(session)
    }

    /// Register an existing session under its room id
    pub fn insert(&self, session: Arc<RoomSession>) -> Result<Option<Arc<RoomSession>>> {
        Ok(self.lock()?.insert(session.room_id().to_string(), session))
    }

    /// Look up a room
    pub fn get(&self, room_id: &str) -> Result<Option<Arc<RoomSession>>> {
        Ok(self.lock()?.get(room_id).cloned())
    }

    /// Remove a room, closing its session
    pub fn remove(&self, room_id: &str) -> Result<bool> {
        let removed = self.lock()?.remove(room_id);
        match removed {
            Some(session) => {
                session.close()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Ids of every registered room, sorted
    pub fn room_ids(&self) -> Result<Vec<String>> {
        let mut ids: Vec<String> = self.lock()?.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    /// Number of registered rooms
    ///
    /// A poisoned registry lock is logged and counts as empty.
    pub fn len(&self) -> usize {
        match self.lock() {
            Ok(rooms) => rooms.len(),
            Err(e) => {
                log::error!("Session registry unusable: {}", e);
                0
            }
        }
    }

    /// Check whether no room is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
