//! State management module
//!
//! This module handles the session, its persistence and the application context

pub mod context;
pub mod session;
pub mod storage;

// Re-export commonly used state components
pub use context::AppContext;
pub use session::{Session, SessionManager, SessionSnapshot};
pub use storage::{KeyValueStore, MemoryStore, RedisStore, SessionStore};
