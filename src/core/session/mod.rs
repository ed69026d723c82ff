/*!
Room sessions.

This module ties key agreement to cipher setup: each joined room gets a
[`RoomSession`] that completes a Diffie-Hellman exchange with the first
usable peer key and then hands out the derived cipher context.
*/

// State management
pub mod state;

// Per-room exchange
pub mod manager;

// Joined rooms
pub mod registry;

pub use self::manager::RoomSession;
pub use self::registry::SessionRegistry;
pub use self::state::{SessionState, StateManager};
