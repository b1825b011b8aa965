//! Durable per-session conversation history.

pub mod file;
pub mod lock;
pub mod memory;
pub mod repository;

pub use file::FileSessionRepository;
pub use lock::{SessionGuard, SessionLocks};
pub use memory::InMemorySessionRepository;
pub use repository::SessionRepository;
